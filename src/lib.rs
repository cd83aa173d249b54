pub mod api;
pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::RecordField;
use crate::core::config::AppConfig;
use crate::core::reference::ReferenceData;
use crate::providers::ReferenceLoader;
use crate::store::KeyValueStore;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub enum AppCommand {
    Lookup {
        isins: Vec<String>,
        field: Option<RecordField>,
    },
    Detect {
        fund_name: String,
    },
    Serve {
        bind: Option<String>,
    },
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

async fn load_reference(config: &AppConfig, show_progress: bool) -> Result<ReferenceData> {
    let data_dir = match config.default_data_path() {
        Ok(path) => Some(path),
        Err(e) => {
            warn!("No data directory for the cache: {}", e);
            None
        }
    };
    let store = KeyValueStore::open(data_dir.as_deref());
    let loader = ReferenceLoader::new(&store, config.cache.ttl())?;

    let spinner = show_progress.then(|| cli::ui::new_spinner("Loading reference data..."));
    let result = loader.load(&config.data).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    result
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("amcolor starting...");
    let config = load_config(config_path)?;

    match command {
        AppCommand::Lookup { isins, field } => {
            let reference = load_reference(&config, field.is_none()).await?;
            cli::lookup::run(&reference, &isins, field, &config.contrast)
        }
        AppCommand::Detect { fund_name } => {
            let reference = load_reference(&config, false).await?;
            println!("{}", cli::detect::detect_output(&fund_name, reference.amc()));
            Ok(())
        }
        AppCommand::Serve { bind } => {
            let reference = Arc::new(load_reference(&config, false).await?);
            let bind = bind.unwrap_or(config.server.bind);
            api::serve(reference, &bind).await
        }
    }
}
