use cmdvault::Command;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};

pub const TABLE_HEADER: [&str; 5] = ["ID", "Technology", "Command", "Reason", "Date Added"];

/// Build the listing table, one row per command.
pub fn commands_table(commands: &[Command], timestamp_format: &str) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(TABLE_HEADER);

    for command in commands {
        table.add_row([
            command.id.to_string(),
            command.technology.clone(),
            command.command.clone(),
            command.reason.clone(),
            command.formatted_date(timestamp_format),
        ]);
    }

    table
}
