use thiserror::Error;

/// Errors surfaced by the interactive shell and the binary entry point
#[derive(Error, Debug)]
pub enum CliError {
    /// Failures from the store, codec, or config layers
    #[error(transparent)]
    Cmdvault(#[from] cmdvault::CmdvaultError),

    /// Console or export file I/O
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An action failed; the message already carries its context
    #[error("{0}")]
    Action(String),
}

impl From<String> for CliError {
    fn from(s: String) -> Self {
        CliError::Action(s)
    }
}

pub type CliResult<T> = Result<T, CliError>;
