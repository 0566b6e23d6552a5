use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use inquire::InquireError;
use log::info;

use buffon_ledger::config::SessionConfig;
use buffon_ledger::ledger::SimulationLedger;
use buffon_ledger::store::SqliteRoundStore;
use buffon_ledger::ui::cli::drivers::InquireDriver;
use buffon_ledger::ui::session::Session;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = SessionConfig::load(config_path.as_deref())?;

    let store = SqliteRoundStore::open(&config.db_path)
        .with_context(|| format!("opening {}", config.db_path.display()))?;
    let ledger = SimulationLedger::open(store).context("loading rounds")?;

    println!("Buffon's Needle Pi Estimation");
    let mut session = Session::new(ledger, InquireDriver, io::stdout(), config);
    match session.run() {
        Ok(()) => {}
        Err(e) if is_cancelled(&e) => {}
        Err(e) => return Err(e),
    }

    info!("session closed");
    Ok(())
}

fn is_cancelled(e: &anyhow::Error) -> bool {
    matches!(
        e.downcast_ref::<InquireError>(),
        Some(InquireError::OperationCanceled | InquireError::OperationInterrupted)
    )
}
