//! The command record persisted by cmdvault.

use chrono::{DateTime, FixedOffset, Local};

/// A single remembered shell command.
///
/// Records are immutable once written; the only way to create one that is
/// persisted is [`crate::CommandRepository::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Sequence ID assigned by the store at insert time
    pub id: u64,
    /// Technology label, e.g. "Linux" or "Git"
    pub technology: String,
    /// The command line itself
    pub command: String,
    /// Why this command is worth remembering
    pub reason: String,
    /// When the command was recorded, in the offset it was recorded in
    pub date_added: DateTime<FixedOffset>,
}

impl Command {
    pub fn new(
        id: u64,
        technology: impl Into<String>,
        command: impl Into<String>,
        reason: impl Into<String>,
        date_added: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id,
            technology: technology.into(),
            command: command.into(),
            reason: reason.into(),
            date_added,
        }
    }

    /// Render `date_added` with a chrono format string.
    pub fn formatted_date(&self, format: &str) -> String {
        self.date_added.format(format).to_string()
    }
}

/// Current local time with its UTC offset preserved.
pub fn now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

/// The value substituted for timestamps that fail to parse.
pub fn zero_time() -> DateTime<FixedOffset> {
    DateTime::<chrono::Utc>::default().fixed_offset()
}
