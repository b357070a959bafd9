use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use twox_hash::xxhash3_128;

use crate::error::{Error, Result};

pub const LOCK_FILE_NAME: &str = ".tandem-lock.yaml";

// The recorded state of a single tracked file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FileRecord {
    pub hash: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

// The whole lock file, a map from tracked path → FileRecord. Ordered so the
// serialized form is stable between runs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LockFile {
    #[serde(default)]
    pub files: BTreeMap<String, FileRecord>,
}

/// Identifies the exact bytes a lock file was loaded from, so a save can
/// tell whether someone else rewrote it in the meantime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Revision {
    Absent,
    Content(String),
}

impl Revision {
    fn of(bytes: &[u8]) -> Self {
        Revision::Content(format!("{:032x}", xxhash3_128::Hasher::oneshot(bytes)))
    }
}

impl LockFile {
    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.files.get(path)
    }

    /// Parses a lock document. Bytes that are not valid UTF-8 are rejected
    /// rather than replaced, so a path key is never rewritten under a new name.
    pub fn from_yaml(contents: &[u8], path: &Path) -> Result<Self> {
        if contents.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(LockFile::default());
        }

        serde_yaml::from_slice(contents).map_err(|source| Error::ParseLock {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(Error::SerializeLock)
    }
}

fn read_revision(path: &Path) -> Result<(Option<Vec<u8>>, Revision)> {
    match fs::read(path) {
        Ok(bytes) => {
            let revision = Revision::of(&bytes);
            Ok((Some(bytes), revision))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok((None, Revision::Absent)),
        Err(source) => Err(Error::ReadLock {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Loads the lock file at `path`. A missing file is an empty lock.
pub fn load(path: &Path) -> Result<(LockFile, Revision)> {
    let (bytes, revision) = read_revision(path)?;

    let lock = match bytes {
        None => LockFile::default(),
        Some(bytes) => LockFile::from_yaml(&bytes, path)?,
    };

    Ok((lock, revision))
}

/// Replaces the lock file at `path` with `lock`, provided the file on disk is
/// still the one described by `loaded`.
pub fn save(path: &Path, lock: &LockFile, loaded: &Revision) -> Result<()> {
    let (_, current) = read_revision(path)?;
    if &current != loaded {
        return Err(Error::ConcurrentModification {
            path: path.to_path_buf(),
        });
    }

    let contents = lock.to_yaml()?;
    let write_err = |source| Error::WriteLock {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut tmp = NamedTempFile::new_in(&dir).map_err(write_err)?;
    tmp.write_all(contents.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    Ok(())
}
