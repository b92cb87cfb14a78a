pub mod core;
pub mod error;
pub mod nav;
pub mod providers;
pub mod server;

use crate::core::config::AppConfig;
use crate::nav::NavQuery;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Serve {
        bind_address: Option<String>,
    },
    Nav {
        mutual_fund_id: String,
        start: Option<String>,
        end: Option<String>,
    },
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?.with_env_overrides(),
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {:#?}", redacted(&config));
    Ok(config)
}

fn redacted(config: &AppConfig) -> AppConfig {
    AppConfig {
        cron_secret: config.cron_secret.as_ref().map(|_| "***".to_string()),
        ..config.clone()
    }
}

pub fn build_state(config: AppConfig) -> Result<server::AppState> {
    let provider = providers::MfApiProvider::new(config.mfapi_base_url())?;
    Ok(server::AppState {
        provider: Arc::new(provider),
        config: Arc::new(config),
    })
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let mut config = load_config(config_path)?;

    match command {
        AppCommand::Serve { bind_address } => {
            if let Some(addr) = bind_address {
                config.server.bind_address = addr;
            }
            info!("Fund NAV service starting...");
            server::serve(build_state(config)?).await
        }
        AppCommand::Nav {
            mutual_fund_id,
            start,
            end,
        } => {
            let report = nav_report(config, mutual_fund_id, start, end).await?;
            println!("{report}");
            Ok(())
        }
    }
}

/// Runs a single NAV lookup and returns the pretty printed JSON response.
pub async fn nav_report(
    config: AppConfig,
    mutual_fund_id: String,
    start: Option<String>,
    end: Option<String>,
) -> Result<String> {
    let state = build_state(config)?;
    let query = NavQuery::from_pairs(&[
        ("mutualFundID", mutual_fund_id),
        ("start", start.unwrap_or_default()),
        ("end", end.unwrap_or_default()),
    ]);
    let today = chrono::Utc::now().date_naive();

    let response = nav::fetch_filtered_nav(state.provider.as_ref(), &query, today).await?;
    Ok(serde_json::to_string_pretty(&response)?)
}
