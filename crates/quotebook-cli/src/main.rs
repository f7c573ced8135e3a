//! Quotebook CLI - a quote collection that syncs with a remote server
//!
//! Quotes are kept in a local database and work offline; `sync` and
//! `watch` reconcile them with the configured remote collection.

mod cli;
mod commands;
mod config_file;
mod error;


use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::categories::run_categories;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::export::run_export;
use crate::commands::filter::run_filter;
use crate::commands::import::run_import;
use crate::commands::list::run_list;
use crate::commands::random::{run_random, run_show};
use crate::commands::sync::{run_sync, run_watch};
use crate::config_file::CliConfig;
use crate::error::CliError;

const DEFAULT_LOG_FILTER: &str = "quotebook=info,quotebook_core=info";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(Commands::Config { command }) = cli.command {
        return run_config(command, cli.config.as_deref(), cli.db_path);
    }

    let config = CliConfig::load(cli.config.as_deref()).map_err(CliError::Config)?;
    let db_path = config.resolve_db_path(cli.db_path);
    tracing::debug!("Using database at {}", db_path.display());

    match cli.command {
        Some(Commands::Add {
            text,
            category,
            no_push,
        }) => run_add(&text, &category, !no_push, &db_path, &config.sync).await?,
        Some(Commands::List { category, json }) => {
            run_list(category.as_deref(), json, &db_path)?;
        }
        Some(Commands::Filter { category }) => run_filter(&category, &db_path)?,
        Some(Commands::Categories { json }) => run_categories(json, &db_path)?,
        Some(Commands::Import { path }) => run_import(&path, &db_path)?,
        Some(Commands::Export { format, output }) => {
            run_export(format, output.as_deref(), &db_path)?;
        }
        Some(Commands::Sync) => run_sync(&db_path, &config.sync).await?,
        Some(Commands::Watch { interval }) => {
            run_watch(&db_path, &config.sync, interval).await?;
        }
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
        Some(Commands::Random) => run_random(&db_path)?,
        None => run_show(&db_path)?,
        Some(Commands::Config { .. }) => {}
    }

    Ok(())
}
