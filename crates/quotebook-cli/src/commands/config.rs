use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::ConfigCommands;
use crate::config_file::{default_config_path, CliConfig};
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct EffectiveConfig<'a> {
    config_path: String,
    db_path: String,
    #[serde(flatten)]
    config: &'a CliConfig,
}

pub fn run_config(
    command: ConfigCommands,
    config_path: Option<&Path>,
    cli_db_path: Option<PathBuf>,
) -> Result<(), CliError> {
    let config_path = config_path.map_or_else(default_config_path, Path::to_path_buf);

    match command {
        ConfigCommands::Show { json } => {
            let config = CliConfig::load(Some(&config_path)).map_err(CliError::Config)?;
            let db_path = config.resolve_db_path(cli_db_path);

            if json {
                let effective = EffectiveConfig {
                    config_path: config_path.display().to_string(),
                    db_path: db_path.display().to_string(),
                    config: &config,
                };
                println!("{}", serde_json::to_string_pretty(&effective)?);
            } else {
                println!("config file:   {}", config_path.display());
                println!("database:      {}", db_path.display());
                println!("endpoint:      {}", config.sync.endpoint);
                println!("user id:       {}", config.sync.user_id);
                println!("sync interval: {}s", config.sync.sync_interval_secs);
                println!("timeout:       {}s", config.sync.request_timeout_secs);
            }
            Ok(())
        }
        ConfigCommands::Set {
            endpoint,
            user_id,
            interval,
            timeout,
            db_path,
        } => {
            let mut config = CliConfig::load_from_path(&config_path).map_err(CliError::Config)?;
            apply_config_update(&mut config, endpoint, user_id, interval, timeout, db_path)?;
            config.save_to_path(&config_path).map_err(CliError::Config)?;
            println!("Configuration saved to {}", config_path.display());
            Ok(())
        }
    }
}

/// Apply the given values and validate the result before anything is saved.
#[allow(clippy::needless_pass_by_value)]
pub fn apply_config_update(
    config: &mut CliConfig,
    endpoint: Option<String>,
    user_id: Option<u64>,
    interval: Option<u64>,
    timeout: Option<u64>,
    db_path: Option<PathBuf>,
) -> Result<(), CliError> {
    if let Some(endpoint) = endpoint {
        config.sync.endpoint = endpoint;
    }
    if let Some(user_id) = user_id {
        config.sync.user_id = user_id;
    }
    if let Some(interval) = interval {
        config.sync.sync_interval_secs = interval;
    }
    if let Some(timeout) = timeout {
        config.sync.request_timeout_secs = timeout;
    }
    if let Some(db_path) = db_path {
        config.db_path = Some(db_path.display().to_string());
    }

    config.sync.validate().map_err(CliError::Config)?;
    config.sync.endpoint = config
        .sync
        .normalized_endpoint()
        .map_err(CliError::Config)?;
    Ok(())
}
