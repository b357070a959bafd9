use crate::commands::{Command, Outcome};
use crate::config::Config;
use crate::lockfile;
use crate::reconcile::{FsSource, Reconciler};
use anyhow::{Context, Result};
use console::style;
use std::io::{self, Write};
use tracing::debug;

pub struct Check {
    pub paths: Vec<String>,
    /// Accepted for symmetry with `lock`; verification covers every path
    /// regardless of how it was tagged.
    pub tags: Vec<String>,
}

/// Writes the drift report listing every modified path.
pub fn write_report<W: Write>(out: &mut W, modified: &[String]) -> io::Result<()> {
    writeln!(out, "changed without tandem lock:")?;
    for path in modified {
        writeln!(out, "  {}", style(path).yellow())?;
    }
    Ok(())
}

impl Command for Check {
    fn execute(&self, config: &Config) -> Result<Outcome> {
        let (store, _) = lockfile::load(&config.lock_file)?;
        debug!(tags = ?self.tags, "checking {} paths", self.paths.len());

        let reconciler = Reconciler::new(FsSource, config.fingerprinter());
        let report = reconciler.check(&store, &self.paths)?;

        if report.is_clean() {
            return Ok(Outcome::CheckPassed);
        }

        write_report(&mut io::stdout().lock(), &report.modified)
            .context("could not write drift report")?;

        Ok(Outcome::CheckFailed {
            modified: report.modified,
        })
    }
}
