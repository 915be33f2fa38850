pub mod error;
pub mod output;
pub mod shell;

pub use error::{CliError, CliResult};
pub use output::commands_table;
pub use shell::{MenuChoice, Shell};
