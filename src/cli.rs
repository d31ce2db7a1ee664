//! Command-line argument parsing for sqlview.
//!
//! Uses clap to parse CLI arguments.

use crate::config::Config;
use crate::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// A lightweight result viewer and query console for a remote SQL engine.
#[derive(Parser, Debug)]
#[command(name = "sqlview")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Engine API base URL (e.g., http://localhost:5000/api)
    #[arg(long, value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Config file path
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Page to show (1-based, clamped into range)
    #[arg(long, value_name = "N", default_value = "1", global = true)]
    pub page: usize,

    /// Items per page (overrides the configured size for the chosen view)
    #[arg(long, value_name = "N", global = true)]
    pub page_size: Option<usize>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// What to do.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Execute one statement and show the result
    Query {
        /// SQL text to send to the engine
        sql: String,
    },
    /// List the engine's tables
    Tables {
        /// Print the statement for the table at this position on the page instead
        #[arg(long, value_name = "INDEX")]
        select: Option<usize>,
    },
    /// Show the built-in example queries
    Examples,
    /// Execute several statements in one request
    Batch {
        /// Statements, executed in order
        #[arg(required = true)]
        queries: Vec<String>,
    },
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Loads the config file and layers environment and CLI overrides on top.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = Config::load_from_file(&self.config_path())?;
        config.api.apply_env_overrides();
        self.apply_overrides(&mut config);
        Ok(config)
    }

    /// Applies CLI values over `config`.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.api_url {
            config.api.url = url.clone();
        }
        if let Some(secs) = self.timeout {
            config.api.timeout_secs = secs;
        }
        if let Some(size) = self.page_size {
            let pagination = &mut config.pagination;
            match self.command {
                Command::Query { .. } | Command::Batch { .. } => {
                    pagination.results_page_size = size
                }
                Command::Tables { .. } => pagination.tables_page_size = size,
                Command::Examples => pagination.examples_page_size = size,
            }
        }
    }
}
