use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("missing params")]
    MissingParams,

    #[error("could not read {path}")]
    ReadFile {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("could not read lock file {path}")]
    ReadLock {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not parse lock file {path}")]
    ParseLock {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("could not serialize lock file")]
    SerializeLock(#[source] serde_yaml::Error),

    #[error("could not write lock file {path}")]
    WriteLock {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("lock file {path} changed on disk since it was loaded")]
    ConcurrentModification { path: PathBuf },

    #[error("unknown fingerprint algorithm '{0}'")]
    UnknownAlgorithm(String),
}
