//! CLI definitions for the `gila` binary.
//!
//! Global options build a [`ConfigStore`](crate::ConfigStore); the
//! subcommand then queries it.

pub mod apply;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// How query results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Inspect layered configuration from files, environment and flags
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Load this config file instead of searching for one
    #[arg(long, value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Base name of the config file to search for (default: config)
    #[arg(long, value_name = "NAME", global = true)]
    pub config_name: Option<String>,

    /// Directory to search for the config file (repeatable, searched in order)
    #[arg(long, value_name = "DIR", global = true)]
    pub config_path: Vec<String>,

    /// Only consider config files with this extension
    #[arg(long, value_name = "EXT", global = true)]
    pub config_type: Option<String>,

    /// Prefix for environment variable names
    #[arg(long, value_name = "PREFIX", global = true)]
    pub env_prefix: Option<String>,

    /// Look up every key in the environment as PREFIX_KEY
    #[arg(long, global = true)]
    pub automatic_env: bool,

    /// Bind KEY to an environment variable (default name: PREFIX_KEY)
    #[arg(long, value_name = "KEY[=VAR]", global = true)]
    pub bind: Vec<String>,

    /// Default value, parsed as YAML
    #[arg(long = "default", value_name = "KEY=VALUE", global = true)]
    pub defaults: Vec<String>,

    /// Override value, parsed as YAML
    #[arg(long = "set", value_name = "KEY=VALUE", global = true)]
    pub overrides: Vec<String>,

    /// Register ALIAS as another name for KEY
    #[arg(long = "alias", value_name = "ALIAS=KEY", global = true)]
    pub aliases: Vec<String>,

    /// Copy every PREFIX_* environment variable into the overrides
    #[arg(long, value_name = "PREFIX", global = true)]
    pub override_with_env: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    pub format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the resolved value of KEY (exit status 1 if unset)
    Get {
        key: String,

        /// Also print which source supplied the value
        #[arg(long)]
        tier: bool,
    },

    /// Print whether KEY resolves to a value
    IsSet { key: String },

    /// Print every enumerable key with its resolved value (default)
    All,

    /// Dump every source separately
    Debug,
}
