//! Byte encoding for [`Command`] records.
//!
//! The on-disk value is a single delimited line:
//! `id,technology,command,reason,timestamp`. Free-text fields are not
//! escaped, so a delimiter inside a field shifts the field boundaries on
//! decode. Malformed IDs and timestamps decode to zero values instead of
//! failing; only a record with too few fields is rejected.

use chrono::{DateTime, SecondsFormat};
use thiserror::Error;

use crate::command::{Command, zero_time};

/// Separator between encoded fields
pub const DELIMITER: char = ',';

/// Number of fields in an encoded record
pub const FIELD_COUNT: usize = 5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("malformed record: expected {expected} fields, found {found}")]
    MissingFields { expected: usize, found: usize },
}

/// Converts records to and from their stored byte representation.
pub trait RecordCodec {
    fn encode(&self, command: &Command) -> Vec<u8>;
    fn decode(&self, bytes: &[u8]) -> Result<Command, CodecError>;
}

/// Comma-delimited text encoding with an RFC 3339 timestamp.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimitedCodec;

impl RecordCodec for DelimitedCodec {
    fn encode(&self, command: &Command) -> Vec<u8> {
        format!(
            "{id}{d}{technology}{d}{command}{d}{reason}{d}{date}",
            id = command.id,
            technology = command.technology,
            command = command.command,
            reason = command.reason,
            date = command
                .date_added
                .to_rfc3339_opts(SecondsFormat::AutoSi, false),
            d = DELIMITER,
        )
        .into_bytes()
    }

    fn decode(&self, bytes: &[u8]) -> Result<Command, CodecError> {
        let text = String::from_utf8_lossy(bytes);
        let parts: Vec<&str> = text.split(DELIMITER).collect();

        if parts.len() < FIELD_COUNT {
            return Err(CodecError::MissingFields {
                expected: FIELD_COUNT,
                found: parts.len(),
            });
        }

        let id = parts[0].parse::<u64>().unwrap_or(0);
        let date_added = DateTime::parse_from_rfc3339(parts[4]).unwrap_or_else(|_| zero_time());

        Ok(Command::new(id, parts[1], parts[2], parts[3], date_added))
    }
}
