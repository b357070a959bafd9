use crate::config::Config;
use anyhow::Result;

pub mod check;
pub mod lock;

pub use check::Check;
pub use lock::Lock;

/// Trait for executable commands.
pub trait Command {
    fn execute(&self, config: &Config) -> Result<Outcome>;
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Locked {
        recorded: Vec<String>,
        unchanged: Vec<String>,
    },
    CheckPassed,
    CheckFailed {
        modified: Vec<String>,
    },
}
