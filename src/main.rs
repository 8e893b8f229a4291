use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use aba::cli::{Console, Dispatcher};
use aba::config::{AbaPaths, Settings};
use aba::crypto::CredentialHasher;
use aba::storage::Storage;

#[derive(Parser)]
#[command(
    name = "aba",
    author = "Kaylee Beyene",
    version,
    about = "Command-line address book with per-user records and an audit trail",
    long_about = "aba keeps a separate address book for every account. The admin \
                  account creates and deletes users and reads the audit log; users \
                  manage their own records. Commands are typed at the ABA> prompt."
)]
struct Cli {
    /// Directory holding accounts, records, settings and the audit log
    #[arg(long, env = "ABA_DATA_DIR", value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Log informational messages to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Log debug messages to stderr
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = AbaPaths::resolve(cli.data_dir).context("Failed to resolve data directory")?;
    paths
        .ensure_directories()
        .context("Failed to create data directory")?;
    let settings = Settings::load_or_create(&paths).context("Failed to load settings")?;

    // --debug > --verbose > RUST_LOG > settings
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let storage = Storage::open(paths, &settings, CredentialHasher::new())
        .context("Failed to open address book")?;

    let mut dispatcher = Dispatcher::new(storage);
    dispatcher.run(&mut Console::stdio())?;

    Ok(())
}
