//! End-to-end tests for the interactive shell
//!
//! Drives Shell with scripted stdin against a temporary database and checks
//! what reaches the console and the export file.

use std::io::{Cursor, Write};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, FixedOffset, TimeZone};
use cmdvault::codec::{CodecError, DelimitedCodec, RecordCodec};
use cmdvault::{Command, CommandRepository, RecordStore};
use cmdvault_cli::Shell;
use tempfile::tempdir;

const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn fixed_clock() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 6, 1, 10, 20, 30)
        .unwrap()
}

/// Test fixture: Create a store in a temporary directory
fn create_test_store() -> (RecordStore, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let store = RecordStore::open(dir.path().join("commands.db"), "commands").unwrap();
    (store, dir)
}

/// Run the shell over `script` and return everything it printed.
fn run_script(store: &RecordStore, script: &str) -> String {
    run_bytes(store, script.as_bytes())
}

fn run_bytes(store: &RecordStore, input: &[u8]) -> String {
    let mut shell = Shell::new(
        CommandRepository::new(store),
        Cursor::new(input.to_vec()),
        Vec::new(),
        FORMAT,
    )
    .with_clock(fixed_clock);

    shell.run().unwrap();
    String::from_utf8(shell.into_output()).unwrap()
}

/// Shared sink for log lines emitted while a script runs
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

/// Like `run_script`, but also returns the log lines it emitted.
fn run_script_with_logs(store: &RecordStore, script: &str) -> (String, String) {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    let output = tracing::subscriber::with_default(subscriber, || run_script(store, script));
    (output, logs.contents())
}

/// Writes records that are missing fields.
struct TruncatingCodec;

impl RecordCodec for TruncatingCodec {
    fn encode(&self, command: &Command) -> Vec<u8> {
        format!("{},{}", command.id, command.technology).into_bytes()
    }

    fn decode(&self, bytes: &[u8]) -> Result<Command, CodecError> {
        DelimitedCodec.decode(bytes)
    }
}

/// Store a record the default codec cannot decode.
fn store_malformed_record(store: &RecordStore) {
    CommandRepository::with_codec(store, TruncatingCodec)
        .add("Linux", "ls", "list", fixed_clock())
        .unwrap();
}

const TWO_ADDS: &str = "1\n  Linux  \nls -la\nlist files with details\n1\nGit\ngit status\ncheck repo state\n";

mod menu_tests {
    use super::*;

    #[test]
    fn test_exit_prints_menu_and_goodbye() {
        let (store, _dir) = create_test_store();
        let output = run_script(&store, "4\n");

        assert!(output.starts_with("Choose an option:\n1. Add a command\n"));
        assert!(output.contains("Enter your choice: "));
        assert!(output.ends_with("Exiting...\n"));
    }

    #[test]
    fn test_invalid_choice_redisplays_menu() {
        let (store, _dir) = create_test_store();
        let output = run_script(&store, "9\nhello\n4\n");

        assert_eq!(
            output
                .matches("Invalid choice. Please enter a valid option.")
                .count(),
            2
        );
        assert_eq!(output.matches("Choose an option:").count(), 3);
    }

    #[test]
    fn test_non_utf8_choice_is_invalid() {
        let (store, _dir) = create_test_store();
        let output = run_bytes(&store, b"\xff\xfe\n4\n");

        assert!(output.contains("Invalid choice. Please enter a valid option."));
        assert_eq!(output.matches("Choose an option:").count(), 2);
        assert!(output.ends_with("Exiting...\n"));
    }

    #[test]
    fn test_non_utf8_field_is_stored_lossily() {
        let (store, _dir) = create_test_store();
        let output = run_bytes(&store, b"1\nLinux\nls \xff\nlist\n4\n");

        assert!(output.contains("Command added successfully."));
        let all = CommandRepository::new(&store).list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].command, "ls \u{FFFD}");
    }

    #[test]
    fn test_end_of_input_leaves_loop() {
        let (store, _dir) = create_test_store();
        let output = run_script(&store, "");

        assert_eq!(output.matches("Choose an option:").count(), 1);
        assert!(!output.contains("Exiting..."));
    }
}

mod add_and_list_tests {
    use super::*;

    #[test]
    fn test_list_empty_store() {
        let (store, _dir) = create_test_store();
        let output = run_script(&store, "2\n4\n");

        assert!(output.contains("No commands found."));
        assert!(!output.contains("Commands:"));
    }

    #[test]
    fn test_add_trims_fields_and_stores_record() {
        let (store, _dir) = create_test_store();
        let output = run_script(&store, &format!("{TWO_ADDS}4\n"));

        assert_eq!(output.matches("Command added successfully.").count(), 2);

        let all = CommandRepository::new(&store).list_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, 1);
        assert_eq!(all[0].technology, "Linux");
        assert_eq!(all[0].command, "ls -la");
        assert_eq!(all[0].reason, "list files with details");
        assert_eq!(all[0].date_added, fixed_clock());
        assert_eq!(all[1].id, 2);
        assert_eq!(all[1].technology, "Git");
    }

    #[test]
    fn test_add_accepts_empty_fields() {
        let (store, _dir) = create_test_store();
        let output = run_script(&store, "1\n\n\n\n4\n");

        assert!(output.contains("Command added successfully."));
        let all = CommandRepository::new(&store).list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].technology, "");
    }

    #[test]
    fn test_list_renders_table() {
        let (store, _dir) = create_test_store();
        let output = run_script(&store, &format!("{TWO_ADDS}2\n4\n"));

        assert!(output.contains("Commands:"));
        for header in ["ID", "Technology", "Reason", "Date"] {
            assert!(output.contains(header), "missing header {header}");
        }
        assert!(output.contains("ls -la"));
        assert!(output.contains("git status"));
        assert!(output.contains("2024-06-01"));
        assert!(output.contains("10:20:30"));
    }
}

mod failure_tests {
    use super::*;

    #[test]
    fn test_list_failure_is_logged_and_returns_to_menu() {
        let (store, _dir) = create_test_store();
        store_malformed_record(&store);

        let (output, logs) = run_script_with_logs(&store, "2\n4\n");

        assert!(!output.contains("Commands:"));
        assert!(!output.contains("No commands found."));
        assert_eq!(output.matches("Choose an option:").count(), 2);
        assert!(output.ends_with("Exiting...\n"));
        assert!(logs.contains("ERROR"));
        assert!(logs.contains("Error listing commands"));
        assert!(logs.contains("malformed record"));
    }

    #[test]
    fn test_extract_read_failure_is_logged_and_returns_to_menu() {
        let (store, dir) = create_test_store();
        store_malformed_record(&store);
        let export_path = dir.path().join("commands.txt");

        let (output, logs) =
            run_script_with_logs(&store, &format!("3\n{}\n4\n", export_path.display()));

        assert!(!output.contains("successfully"));
        assert_eq!(output.matches("Choose an option:").count(), 2);
        assert!(logs.contains("Error getting commands"));
        assert_eq!(std::fs::read_to_string(&export_path).unwrap(), "");
    }

    #[test]
    fn test_extract_create_failure_is_logged() {
        let (store, dir) = create_test_store();
        let bad_path = dir.path().join("missing").join("commands.txt");

        let (_, logs) =
            run_script_with_logs(&store, &format!("3\n{}\n4\n", bad_path.display()));

        assert!(logs.contains("Error creating file"));
    }
}

mod extract_tests {
    use super::*;

    #[test]
    fn test_extract_writes_one_line_per_record() {
        let (store, dir) = create_test_store();
        let export_path = dir.path().join("commands.txt");

        let output = run_script(
            &store,
            &format!("{TWO_ADDS}3\n{}\n4\n", export_path.display()),
        );

        assert!(output.contains(&format!(
            "Commands extracted to {} successfully.",
            export_path.display()
        )));

        let contents = std::fs::read_to_string(&export_path).unwrap();
        assert_eq!(
            contents,
            "ID: 1, Technology: Linux, Command: ls -la, Reason: list files with details, Date Added: 2024-06-01 10:20:30\n\
             ID: 2, Technology: Git, Command: git status, Reason: check repo state, Date Added: 2024-06-01 10:20:30\n"
        );
    }

    #[test]
    fn test_extract_truncates_existing_file() {
        let (store, dir) = create_test_store();
        let export_path = dir.path().join("commands.txt");
        std::fs::write(&export_path, "stale contents\nmore stale contents\n").unwrap();

        run_script(&store, &format!("3\n{}\n4\n", export_path.display()));

        let contents = std::fs::read_to_string(&export_path).unwrap();
        assert!(contents.is_empty());
    }

    #[test]
    fn test_extract_failure_returns_to_menu() {
        let (store, dir) = create_test_store();
        let bad_path = dir.path().join("missing").join("commands.txt");

        let output = run_script(&store, &format!("3\n{}\n4\n", bad_path.display()));

        assert!(!output.contains("successfully"));
        assert!(!bad_path.exists());
        assert!(output.ends_with("Exiting...\n"));
        assert_eq!(output.matches("Choose an option:").count(), 2);
    }
}
