use atmsim::application::machine::AtmMachine;
use atmsim::config::{DEFAULT_STATE_FILE, Generation, MachineConfig};
use atmsim::domain::ports::StateStoreBox;
use atmsim::error::AtmError;
use atmsim::infrastructure::in_memory::InMemoryStateStore;
use atmsim::infrastructure::json_file::JsonFileStateStore;
use atmsim::interfaces::console::{self, Prompt};
use atmsim::interfaces::csv::statement_writer::{AccountReportWriter, StatementWriter};
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::io;
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// JSON file holding the machine state.
    #[arg(long, env = "ATMSIM_STATE_FILE", default_value = DEFAULT_STATE_FILE)]
    state_file: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, conflicts_with = "ephemeral")]
    db_path: Option<PathBuf>,

    /// Keep state in memory only; nothing is read from or written to disk.
    #[arg(long)]
    ephemeral: bool,

    /// Machine behaviour to simulate.
    #[arg(long, value_enum, env = "ATMSIM_GENERATION", default_value_t = Generation::V2)]
    generation: Generation,
}

#[derive(Subcommand)]
enum Command {
    /// Start a customer session
    Customer,
    /// Open the technician panel
    Technician,
    /// Print the machine status
    Status,
    /// Export an owner's transaction log as CSV
    Statement {
        /// Account owner (case-insensitive)
        owner: String,
    },
    /// Export every account as CSV
    Report,
}

fn open_store(cli: &Cli, config: &MachineConfig) -> Result<StateStoreBox> {
    if cli.ephemeral {
        return Ok(Box::new(InMemoryStateStore::new()));
    }

    if let Some(db_path) = &cli.db_path {
        #[cfg(feature = "storage-rocksdb")]
        {
            use atmsim::infrastructure::rocksdb::RocksDbStateStore;
            let store = RocksDbStateStore::open(db_path)
                .into_diagnostic()?
                .with_protected_account(config.protected_account.clone());
            return Ok(Box::new(store));
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        {
            let _ = db_path;
            eprintln!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to the JSON state file."
            );
        }
    }

    Ok(Box::new(JsonFileStateStore::with_protected_account(
        &cli.state_file,
        config.protected_account.clone(),
    )))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("atmsim=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = MachineConfig::with_generation(cli.generation);
    let store = open_store(&cli, &config)?;
    let mut atm = AtmMachine::open(store, config)
        .await
        .into_diagnostic()?;

    let mut prompt = Prompt::new(BufReader::new(tokio::io::stdin()), io::stdout());

    match cli.command {
        None => console::run_main_menu(&mut atm, &mut prompt)
            .await
            .into_diagnostic()?,
        Some(Command::Customer) => console::customer::run(&mut atm, &mut prompt)
            .await
            .into_diagnostic()?,
        Some(Command::Technician) => console::technician::run(&mut atm, &mut prompt)
            .await
            .into_diagnostic()?,
        Some(Command::Status) => println!("{}", atm.status()),
        Some(Command::Statement { owner }) => {
            let account = atm
                .accounts()
                .iter()
                .find(|a| a.owner_matches(&owner))
                .ok_or_else(|| AtmError::AccountNotFound(owner.trim().to_string()))
                .into_diagnostic()?;
            let stdout = io::stdout();
            let mut writer = StatementWriter::new(stdout.lock());
            writer.write_statement(account).into_diagnostic()?;
        }
        Some(Command::Report) => {
            let stdout = io::stdout();
            let mut writer = AccountReportWriter::new(stdout.lock());
            writer.write_accounts(atm.accounts()).into_diagnostic()?;
        }
    }

    Ok(())
}
