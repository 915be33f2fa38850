//! Plain-text export of command records, one line per record.

use std::io::Write;

use crate::command::Command;

pub fn format_line(command: &Command, timestamp_format: &str) -> String {
    format!(
        "ID: {}, Technology: {}, Command: {}, Reason: {}, Date Added: {}",
        command.id,
        command.technology,
        command.command,
        command.reason,
        command.formatted_date(timestamp_format)
    )
}

/// Write every command to `writer`. Stops at the first I/O error.
pub fn write_all<W: Write>(
    writer: &mut W,
    commands: &[Command],
    timestamp_format: &str,
) -> std::io::Result<()> {
    for command in commands {
        writeln!(writer, "{}", format_line(command, timestamp_format))?;
    }
    writer.flush()
}
