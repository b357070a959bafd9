pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod lockfile;
pub mod logging;
pub mod reconcile;

pub use error::{Error, Result};
