//! cmdvault - a small notebook for shell commands
//!
//! Records a technology tag, a command line, and the reason it is worth
//! remembering, persisting each entry into an embedded sled database keyed
//! by an auto-incrementing sequence ID.

pub mod codec;
pub mod command;
pub mod config;
pub mod error;
pub mod export;
pub mod repository;
pub mod store;

pub use codec::{CodecError, DelimitedCodec, RecordCodec};
pub use command::Command;
pub use config::Config;
pub use error::{CmdvaultError, Result};
pub use repository::CommandRepository;
pub use store::RecordStore;
