//! Rails-style database.yml handling
//!
//! A database.yml maps environment names ("test", "production", ...) to
//! connection parameter blocks. This module locates the file, decodes it,
//! and selects one environment's block.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Connection parameters for one environment block.
///
/// Fields missing from the yaml (or present with a null value) decode to
/// empty strings; only `host` gets a real default.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    #[serde(deserialize_with = "empty_if_null")]
    pub adapter: String,
    #[serde(deserialize_with = "empty_if_null")]
    pub host: String,
    #[serde(deserialize_with = "empty_if_null")]
    pub database: String,
    #[serde(deserialize_with = "empty_if_null")]
    pub username: String,
    #[serde(deserialize_with = "empty_if_null")]
    pub password: String,
}

impl DbConfig {
    /// If no host is set, assume localhost.
    fn fill_defaults(&mut self) {
        if self.host.is_empty() {
            self.host = "localhost".to_string();
        }
    }
}

fn empty_if_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("environment {environment} not found, use one of {available:?}")]
    EnvironmentNotFound {
        environment: String,
        available: Vec<String>,
    },
}

/// Resolve the path to the configuration file.
///
/// An empty `path` falls back to `default_dir` (only invoked when needed, so
/// callers can inject the lookup). A path without a `yml` extension is
/// treated as a directory and `config/database.yml` is appended.
pub fn locate(path: &str, default_dir: impl FnOnce() -> PathBuf) -> Result<PathBuf, ConfigError> {
    let mut resolved = if path.is_empty() {
        default_dir()
    } else {
        PathBuf::from(path)
    };

    if resolved.extension().and_then(|e| e.to_str()) != Some("yml") {
        resolved = resolved.join("config").join("database.yml");
    }

    if !resolved.exists() {
        return Err(ConfigError::NotFound(resolved));
    }

    Ok(resolved)
}

/// Read the configuration file's raw bytes.
pub fn read(path: &Path) -> Result<Vec<u8>, ConfigError> {
    std::fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode the document and select one environment, filling defaults.
///
/// A missing environment key reports every environment the document does
/// define, so the user can see what to pass instead.
pub fn parse(data: &[u8], environment: &str) -> Result<DbConfig, ConfigError> {
    let document: BTreeMap<String, DbConfig> = serde_yaml::from_slice(data)?;

    let mut config = document
        .get(environment)
        .cloned()
        .ok_or_else(|| ConfigError::EnvironmentNotFound {
            environment: environment.to_string(),
            available: document.keys().cloned().collect(),
        })?;

    config.fill_defaults();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_locate_yml_path_returned_unchanged() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("database.yml");
        fs::write(&file, "test: {}").unwrap();

        let resolved = locate(file.to_str().unwrap(), || unreachable!()).unwrap();
        assert_eq!(resolved, file);
    }

    #[test]
    fn test_locate_directory_gets_relative_path_appended() {
        let temp = TempDir::new().unwrap();
        let config_dir = temp.path().join("config");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("database.yml"), "test: {}").unwrap();

        let resolved = locate(temp.path().to_str().unwrap(), || unreachable!()).unwrap();
        assert_eq!(resolved, temp.path().join("config").join("database.yml"));
    }

    #[test]
    fn test_locate_empty_path_uses_injected_default_dir() {
        let temp = TempDir::new().unwrap();
        let config_dir = temp.path().join("config");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("database.yml"), "test: {}").unwrap();

        let resolved = locate("", || temp.path().to_path_buf()).unwrap();
        assert_eq!(resolved, temp.path().join("config").join("database.yml"));
    }

    #[test]
    fn test_locate_missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = locate(temp.path().to_str().unwrap(), || unreachable!()).unwrap_err();
        match err {
            ConfigError::NotFound(path) => {
                assert!(path.ends_with("config/database.yml"));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_selects_environment() {
        let yaml = b"test:\n  adapter: postgresql\n  host: db.local\n  database: appdb\n  username: alice\n  password: secret\n";
        let config = parse(yaml, "test").unwrap();

        assert_eq!(config.adapter, "postgresql");
        assert_eq!(config.host, "db.local");
        assert_eq!(config.database, "appdb");
        assert_eq!(config.username, "alice");
        assert_eq!(config.password, "secret");
    }

    #[test]
    fn test_parse_defaults_host_to_localhost() {
        let yaml = b"test:\n  username: alice\n  database: appdb\n";
        let config = parse(yaml, "test").unwrap();

        assert_eq!(config.host, "localhost");
        assert_eq!(config.adapter, "");
        assert_eq!(config.password, "");
    }

    #[test]
    fn test_parse_null_host_defaults_to_localhost() {
        let yaml = b"test:\n  host:\n  username: alice\n";
        let config = parse(yaml, "test").unwrap();

        assert_eq!(config.host, "localhost");
        assert_eq!(config.username, "alice");
    }

    #[test]
    fn test_parse_missing_environment_lists_available() {
        let yaml = b"development:\n  host: a\ntest:\n  host: b\n";
        let err = parse(yaml, "staging").unwrap_err();

        match err {
            ConfigError::EnvironmentNotFound {
                environment,
                available,
            } => {
                assert_eq!(environment, "staging");
                assert_eq!(available, vec!["development", "test"]);
            }
            other => panic!("expected EnvironmentNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_malformed_yaml_is_parse_error() {
        let err = parse(b"test: [unclosed", "test").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
