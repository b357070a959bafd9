use crate::commands::{Check, Command, Lock, Outcome};
use crate::config::{Config, CONFIG_FILE_NAME};
use crate::error::Error;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Turn debugging information on
    #[arg(short, long)]
    pub debug: bool,

    #[arg(global = true, short, long, default_value = CONFIG_FILE_NAME)]
    pub config_file: String,

    /// Lock file to use instead of the configured one
    #[arg(global = true, long)]
    pub lock_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record the current fingerprint of each path in the lock file
    Lock {
        /// Tag to attach to newly recorded paths.  May be repeated.
        #[arg(short, long = "tag")]
        tags: Vec<String>,
        paths: Vec<String>,
    },
    /// Fail if any path no longer matches its recorded fingerprint
    Check {
        #[arg(short, long = "tag")]
        tags: Vec<String>,
        paths: Vec<String>,
    },
}

pub fn run_cli(cli: Cli) -> Result<Outcome> {
    let mut config = Config::load(&cli.config_file)
        .context(format!("could not load config from {}", &cli.config_file))?;
    if let Some(lock_file) = cli.lock_file {
        config.lock_file = lock_file;
    }

    match cli.command {
        Some(Commands::Lock { tags, paths }) => Lock { paths, tags }.execute(&config),
        Some(Commands::Check { tags, paths }) => Check { paths, tags }.execute(&config),
        None => Err(Error::MissingParams.into()),
    }
}
