use crate::commands::{Command, Outcome};
use crate::config::Config;
use crate::lockfile;
use crate::reconcile::{FsSource, Reconciler};
use anyhow::{Context, Result};
use tracing::info;

pub struct Lock {
    pub paths: Vec<String>,
    pub tags: Vec<String>,
}

impl Command for Lock {
    fn execute(&self, config: &Config) -> Result<Outcome> {
        let (store, revision) = lockfile::load(&config.lock_file)?;

        let tags = config.tags_or_default(&self.tags);
        let reconciler = Reconciler::new(FsSource, config.fingerprinter());
        let (store, summary) = reconciler
            .lock(store, &self.paths, &tags)
            .context("lock aborted, lock file left untouched")?;

        lockfile::save(&config.lock_file, &store, &revision)?;
        info!(
            lock_file = %config.lock_file.display(),
            recorded = summary.recorded.len(),
            unchanged = summary.unchanged.len(),
            "saved lock file"
        );

        Ok(Outcome::Locked {
            recorded: summary.recorded,
            unchanged: summary.unchanged,
        })
    }
}
