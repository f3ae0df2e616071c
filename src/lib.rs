pub mod cli;
pub mod core;
pub mod providers;

use crate::core::RateProvider;
use anyhow::Result;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Table {
        date: Option<NaiveDate>,
        search: String,
    },
    Chart {
        date: Option<NaiveDate>,
        search: String,
        json: bool,
    },
    Watch {
        date: Option<NaiveDate>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxrates starting...");

    let config = match config_path {
        Some(path) => crate::core::config::AppConfig::load_from_path(path)?,
        None => crate::core::config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = Arc::new(providers::NbuProvider::from_config(&config.providers.nbu)?);
    let today = chrono::Local::now().date_naive();

    match command {
        AppCommand::Table { date, search } => {
            cli::table::run(&*provider, date.unwrap_or(today), &search).await
        }
        AppCommand::Chart { date, search, json } => {
            cli::chart::run(
                &*provider,
                date.unwrap_or(today),
                &search,
                &config.pinned,
                json,
            )
            .await
        }
        AppCommand::Watch { date } => {
            let provider: Arc<dyn RateProvider> = provider;
            cli::watch::run(provider, date.unwrap_or(today)).await
        }
    }
}
