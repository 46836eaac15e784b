pub mod cli;
pub mod core;
pub mod store;

use crate::cli::power::PowerArgs;
use crate::core::config::AppConfig;
use crate::store::KeyValueStore;
use anyhow::Result;
use tracing::{debug, info, warn};

pub enum AppCommand {
    Lp,
    Items { actor: String },
    Power(PowerArgs),
}

pub fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("LP calculator starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Lp => {
            let data_path = match config.default_data_path() {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!("No data directory, LP history disabled: {e}");
                    None
                }
            };
            let store = KeyValueStore::new(data_path.as_deref());
            cli::lp::run(&config, &store)?;
            store.flush()
        }
        AppCommand::Items { actor } => cli::lp::run_items(&config, &actor),
        AppCommand::Power(args) => cli::power::run(&config, &args),
    }
}
