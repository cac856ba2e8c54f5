//! gila
//!
//! Resolve configuration keys through overrides, environment, config files
//! and defaults from the command line.

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use gila::cli::apply::{build_store, render};
use gila::cli::{Cli, Command};
use gila::logging::{self, LogTarget};
use gila::ProcessEnv;
use serde_json::json;
use tracing::debug;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;

    let store = build_store(&cli, Arc::new(ProcessEnv))?;
    if let Some(path) = store.config_file_used() {
        debug!(path = %path.display(), "using config file");
    }

    let mut stdout = std::io::stdout().lock();
    match cli.command.clone().unwrap_or(Command::All) {
        Command::Get { key, tier } => match store.lookup(&key) {
            Some(resolved) if tier => {
                stdout.write_all(render(&resolved, cli.format)?.as_bytes())?;
            }
            Some(resolved) => {
                stdout.write_all(render(&resolved.value, cli.format)?.as_bytes())?;
            }
            None => {
                debug!(key = %key, "key not set");
                return Ok(ExitCode::FAILURE);
            }
        },
        Command::IsSet { key } => {
            let set = store.is_set(&key);
            stdout.write_all(render(&json!(set), cli.format)?.as_bytes())?;
            if !set {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::All => {
            stdout.write_all(render(&store.all_config(), cli.format)?.as_bytes())?;
        }
        Command::Debug => {
            stdout.write_all(store.debug().as_bytes())?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
