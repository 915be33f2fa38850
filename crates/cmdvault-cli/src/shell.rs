//! Interactive menu loop over the command repository.

use std::fs::File;
use std::io::{BufRead, BufWriter, Write};

use chrono::{DateTime, FixedOffset};
use cmdvault::{CommandRepository, command, export};

use crate::error::CliResult;
use crate::output::commands_table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    List,
    Extract,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Add),
            "2" => Some(Self::List),
            "3" => Some(Self::Extract),
            "4" => Some(Self::Exit),
            _ => None,
        }
    }
}

pub struct Shell<'a, R, W> {
    repo: CommandRepository<'a>,
    input: R,
    output: W,
    timestamp_format: String,
    clock: fn() -> DateTime<FixedOffset>,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(
        repo: CommandRepository<'a>,
        input: R,
        output: W,
        timestamp_format: impl Into<String>,
    ) -> Self {
        Self {
            repo,
            input,
            output,
            timestamp_format: timestamp_format.into(),
            clock: command::now,
        }
    }

    /// Replace the source of `date_added` timestamps.
    pub fn with_clock(mut self, clock: fn() -> DateTime<FixedOffset>) -> Self {
        self.clock = clock;
        self
    }

    /// Run until the user picks Exit or input ends. Failures inside an
    /// action are logged and the menu is shown again; only errors writing
    /// to the console end the loop early.
    pub fn run(&mut self) -> CliResult<()> {
        loop {
            self.print_menu()?;

            let Some(line) = self.read_line()? else {
                tracing::debug!("Input closed, leaving shell");
                writeln!(self.output)?;
                return Ok(());
            };

            let outcome = match MenuChoice::parse(&line) {
                Some(MenuChoice::Add) => self.add(),
                Some(MenuChoice::List) => self.list(),
                Some(MenuChoice::Extract) => self.extract(),
                Some(MenuChoice::Exit) => {
                    writeln!(self.output, "Exiting...")?;
                    return Ok(());
                }
                None => {
                    writeln!(self.output, "Invalid choice. Please enter a valid option.")?;
                    Ok(())
                }
            };

            if let Err(e) = outcome {
                tracing::error!("{e}");
            }
        }
    }

    /// Give back the output writer, e.g. to inspect it after a run.
    pub fn into_output(self) -> W {
        self.output
    }

    fn print_menu(&mut self) -> CliResult<()> {
        writeln!(self.output, "Choose an option:")?;
        writeln!(self.output, "1. Add a command")?;
        writeln!(self.output, "2. List all commands")?;
        writeln!(self.output, "3. Extract commands to file")?;
        writeln!(self.output, "4. Exit")?;
        write!(self.output, "Enter your choice: ")?;
        self.output.flush()?;
        Ok(())
    }

    /// Next input line with surrounding whitespace removed; `None` at EOF.
    /// Bytes that are not valid UTF-8 are replaced rather than rejected.
    fn read_line(&mut self) -> CliResult<Option<String>> {
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&buf).trim().to_string()))
    }

    fn prompt(&mut self, message: &str) -> CliResult<String> {
        writeln!(self.output, "{message}")?;
        self.output.flush()?;
        Ok(self.read_line()?.unwrap_or_default())
    }

    fn add(&mut self) -> CliResult<()> {
        let technology = self.prompt("Enter the technology:")?;
        let command = self.prompt("Enter the command:")?;
        let reason = self.prompt("Enter the reason:")?;
        let date_added = (self.clock)();

        let id = self
            .repo
            .add(&technology, &command, &reason, date_added)
            .map_err(|e| format!("Error adding command: {e}"))?;
        tracing::debug!(id, "Command stored");

        writeln!(self.output, "Command added successfully.")?;
        Ok(())
    }

    fn list(&mut self) -> CliResult<()> {
        let commands = self
            .repo
            .list_all()
            .map_err(|e| format!("Error listing commands: {e}"))?;

        if commands.is_empty() {
            writeln!(self.output, "No commands found.")?;
            return Ok(());
        }

        writeln!(self.output, "Commands:")?;
        let table = commands_table(&commands, &self.timestamp_format);
        writeln!(self.output, "{table}")?;
        Ok(())
    }

    fn extract(&mut self) -> CliResult<()> {
        let path = self.prompt("Enter the file path to save the commands (e.g., commands.txt):")?;

        let file = File::create(&path).map_err(|e| format!("Error creating file: {e}"))?;

        let commands = self
            .repo
            .list_all()
            .map_err(|e| format!("Error getting commands: {e}"))?;

        let mut writer = BufWriter::new(file);
        export::write_all(&mut writer, &commands, &self.timestamp_format)
            .map_err(|e| format!("Error writing to file: {e}"))?;

        tracing::info!(count = commands.len(), path = %path, "Exported commands");
        writeln!(self.output, "Commands extracted to {path} successfully.")?;
        Ok(())
    }
}
