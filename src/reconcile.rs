//! Lock and check passes over a batch of paths.
//!
//! Both operations take the lock as a plain value: `lock` returns the updated
//! value for the caller to persist and `check` only reads it. Any file that
//! cannot be read stops the whole batch.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};
use crate::fingerprint::{Algorithm, Fingerprinter};
use crate::lockfile::{FileRecord, LockFile};

/// Where file contents come from.
pub trait ContentSource {
    type Reader: Read;

    fn open(&self, path: &str) -> io::Result<Self::Reader>;
}

/// Reads tracked files from the local filesystem, relative to the working
/// directory unless absolute.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSource;

impl ContentSource for FsSource {
    type Reader = File;

    fn open(&self, path: &str) -> io::Result<File> {
        File::open(Path::new(path))
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct LockSummary {
    /// Paths whose record was written or rewritten.
    pub recorded: Vec<String>,
    /// Paths whose content still matched; their records were left alone.
    pub unchanged: Vec<String>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub modified: Vec<String>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.modified.is_empty()
    }
}

pub struct Reconciler<S> {
    source: S,
    fingerprinter: Fingerprinter,
}

impl<S: ContentSource> Reconciler<S> {
    pub fn new(source: S, fingerprinter: Fingerprinter) -> Self {
        Self {
            source,
            fingerprinter,
        }
    }

    fn fingerprint(&self, path: &str, fingerprinter: Fingerprinter) -> Result<String> {
        let read_err = |source| Error::ReadFile {
            path: path.to_string(),
            source,
        };

        let reader = self.source.open(path).map_err(read_err)?;
        fingerprinter.fingerprint(reader).map_err(read_err)
    }

    /// Records fingerprints for `paths`. A path whose content still matches
    /// its record keeps that record untouched, tags included. Anything else
    /// gets a fresh record carrying exactly `tags`.
    pub fn lock(
        &self,
        mut store: LockFile,
        paths: &[String],
        tags: &[String],
    ) -> Result<(LockFile, LockSummary)> {
        let mut summary = LockSummary::default();

        for path in paths {
            let hash = self.fingerprint(path, self.fingerprinter)?;

            if store.get(path).is_some_and(|record| record.hash == hash) {
                debug!(path = %path, "unchanged");
                summary.unchanged.push(path.clone());
                continue;
            }

            debug!(path = %path, hash = %hash, "recorded");
            store.files.insert(
                path.clone(),
                FileRecord {
                    hash,
                    tags: tags.to_vec(),
                },
            );
            summary.recorded.push(path.clone());
        }

        Ok((store, summary))
    }

    /// Reports every path whose content no longer matches its record. Paths
    /// without a record count as modified.
    pub fn check(&self, store: &LockFile, paths: &[String]) -> Result<CheckReport> {
        let mut report = CheckReport::default();

        for path in paths {
            let record = store.get(path);

            // Verify with whatever algorithm wrote the record so older entries
            // keep matching after the default changes.
            let fingerprinter = record
                .and_then(|r| Algorithm::of(&r.hash))
                .map(Fingerprinter::new)
                .unwrap_or(self.fingerprinter);

            let hash = self.fingerprint(path, fingerprinter)?;
            let expected = record.map(|r| r.hash.as_str()).unwrap_or_default();

            if hash != expected {
                debug!(path = %path, expected = %expected, actual = %hash, "modified");
                report.modified.push(path.clone());
            }
        }

        Ok(report)
    }
}
