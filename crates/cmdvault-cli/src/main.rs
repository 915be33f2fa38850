use std::path::PathBuf;

use clap::Parser;
use cmdvault::{CommandRepository, Config, RecordStore};
use cmdvault_cli::Shell;
use cmdvault_cli::error::CliResult;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cmdvault")]
#[command(about = "Remember shell commands and why you ran them")]
#[command(version)]
pub struct Cli {
    /// Path to config file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Path to the command database (default: commands.db)
    #[arg(long)]
    pub db: Option<PathBuf>,
}

fn main() {
    init_logging();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.storage.db_path = db;
    }

    let store = RecordStore::open(&config.storage.db_path, &config.storage.collection)?;
    tracing::debug!(
        "Opened {} ({} commands)",
        config.storage.db_path.display(),
        store.len()
    );

    let repo = CommandRepository::new(&store);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();

    Shell::new(
        repo,
        stdin.lock(),
        stdout.lock(),
        config.display.timestamp_format,
    )
    .run()
}
