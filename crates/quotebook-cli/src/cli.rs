use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "quotebook")]
#[command(about = "Keep a collection of quotes and sync it with a remote server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local database file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Optional path to the CLI config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new quote
    #[command(alias = "new")]
    Add {
        /// Quote text
        #[arg(required = true)]
        text: Vec<String>,
        /// Quote category
        #[arg(short, long)]
        category: String,
        /// Keep the quote local until the next sync
        #[arg(long)]
        no_push: bool,
    },
    /// List quotes in the active category
    List {
        /// List this category instead of the active filter
        #[arg(long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the active category filter ("all" clears it)
    Filter {
        /// Category name
        category: String,
    },
    /// List known categories
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a new random quote from the active category
    Random,
    /// Import quotes from a JSON file
    Import {
        /// Path to a JSON array of quotes
        path: PathBuf,
    },
    /// Export all quotes
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Optional output file or directory (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Run one sync cycle with the remote server
    Sync,
    /// Sync periodically until interrupted
    Watch {
        /// Seconds between sync cycles
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Show or change CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl From<ExportFormat> for quotebook_core::export::ExportFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Json => Self::Json,
            ExportFormat::Markdown => Self::Markdown,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update configuration values
    Set {
        /// Remote collection endpoint
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,
        /// User id attached to pushed quotes
        #[arg(long, value_name = "ID")]
        user_id: Option<u64>,
        /// Seconds between sync cycles in `watch`
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
        /// Request timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
        /// Default database path
        #[arg(long, value_name = "PATH")]
        db_path: Option<PathBuf>,
    },
}
