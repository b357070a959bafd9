use crate::fingerprint::{Algorithm, Fingerprinter};
use crate::lockfile::LOCK_FILE_NAME;
use anyhow::{Context, Result};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "tandem.toml";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Config {
    /// Lock file location, relative to the working directory.
    #[serde(default = "default_lock_file")]
    pub lock_file: PathBuf,

    /// Tags attached to newly locked files when none are given.
    #[serde(default = "default_tags")]
    pub default_tags: Vec<String>,

    /// Algorithm used for new fingerprints.
    #[serde(default)]
    pub algorithm: Algorithm,
}

fn default_lock_file() -> PathBuf {
    PathBuf::from(LOCK_FILE_NAME)
}

fn default_tags() -> Vec<String> {
    vec!["default".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lock_file: default_lock_file(),
            default_tags: default_tags(),
            algorithm: Algorithm::default(),
        }
    }
}

impl Config {
    /// Reads `config_file` if present, then applies `TANDEM_*` environment
    /// overrides, e.g. `TANDEM_LOCK_FILE=locks/tandem.yaml`.
    pub fn load(config_file: &str) -> Result<Config> {
        Self::load_with_env(config_file, None)
    }

    /// Like `load`, but reads `TANDEM_*` overrides from `env` instead of the
    /// process environment when given.
    pub fn load_with_env(
        config_file: &str,
        env: Option<config::Map<String, String>>,
    ) -> Result<Config> {
        let settings: Config = config::Config::builder()
            .add_source(config::File::new(config_file, config::FileFormat::Toml).required(false))
            .add_source(
                config::Environment::with_prefix("TANDEM")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("default_tags")
                    .source(env),
            )
            .build()
            .context(format!("could not read config from {}", config_file))?
            .try_deserialize()
            .context("could not deserialise config struct")?;

        Ok(settings)
    }

    pub fn fingerprinter(&self) -> Fingerprinter {
        Fingerprinter::new(self.algorithm)
    }

    /// The tags to lock with: `tags` if any were given, otherwise the
    /// configured defaults.
    pub fn tags_or_default(&self, tags: &[String]) -> Vec<String> {
        if tags.is_empty() {
            self.default_tags.clone()
        } else {
            tags.to_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_file_uses_defaults() -> Result<()> {
        let dir = TempDir::new()?;
        let config = Config::load(&dir.path().join(CONFIG_FILE_NAME).to_string_lossy())?;

        assert_eq!(PathBuf::from(".tandem-lock.yaml"), config.lock_file);
        assert_eq!(vec!["default".to_string()], config.default_tags);
        assert_eq!(Algorithm::Murmur3_128, config.algorithm);
        Ok(())
    }

    #[test]
    fn test_config_file_overrides_defaults() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r#"
lock_file = "locks/files.yaml"
default_tags = ["docs", "release"]
algorithm = "xxh3_128"
"#,
        )?;

        let config = Config::load(&path.to_string_lossy())?;
        assert_eq!(PathBuf::from("locks/files.yaml"), config.lock_file);
        assert_eq!(vec!["docs".to_string(), "release".to_string()], config.default_tags);
        assert_eq!(Algorithm::Xxh3_128, config.algorithm);
        Ok(())
    }

    #[test]
    fn test_environment_overrides_config_file() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "lock_file = \"from-file.yaml\"\ndefault_tags = [\"ci\"]\n")?;

        let env = config::Map::from([
            ("TANDEM_LOCK_FILE".to_string(), "x/y.yaml".to_string()),
            ("TANDEM_DEFAULT_TAGS".to_string(), "a,b".to_string()),
            ("TANDEM_ALGORITHM".to_string(), "xxh3_128".to_string()),
            ("OTHER_LOCK_FILE".to_string(), "ignored.yaml".to_string()),
        ]);
        let config = Config::load_with_env(&path.to_string_lossy(), Some(env))?;

        assert_eq!(
            Config {
                lock_file: PathBuf::from("x/y.yaml"),
                default_tags: vec!["a".to_string(), "b".to_string()],
                algorithm: Algorithm::Xxh3_128,
            },
            config
        );
        Ok(())
    }

    #[test]
    fn test_unknown_algorithm_is_rejected() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "algorithm = \"md5\"\n")?;

        assert!(Config::load(&path.to_string_lossy()).is_err());
        Ok(())
    }

    #[test]
    fn test_tags_or_default() {
        let config = Config::default();
        assert_eq!(vec!["default".to_string()], config.tags_or_default(&[]));
        assert_eq!(
            vec!["docs".to_string()],
            config.tags_or_default(&["docs".to_string()])
        );
    }
}
