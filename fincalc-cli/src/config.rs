use std::io;
use std::path::{Path, PathBuf};

use fincalc_core::db::DbConfig;
use fincalc_core::rates::FALLBACK_YEAR;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings read from `fincalc.toml`.
///
/// Every field has a default, so a partial file (or no file at all) is
/// valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Year shown by `rates` when no `--year` is given.
    pub default_year: i32,
    /// Bare level or full `EnvFilter` directive. `RUST_LOG` wins over it.
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    /// Income-tax bracket overrides applied on top of the built-in tables.
    pub rates_csv: Option<PathBuf>,
    pub database: DbConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_year: FALLBACK_YEAR,
            log_level: "info".to_string(),
            log_file: None,
            rates_csv: None,
            database: DbConfig::default(),
        }
    }
}

impl Config {
    /// Loads `path`, or returns the defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file; using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_full_document() {
        let config: Config = toml::from_str(
            r#"
            default_year = 2023
            log_level = "debug"
            log_file = "fincalc.log"
            rates_csv = "brackets.csv"

            [database]
            backend = "sqlite"
            connection_string = "sqlite::memory:"
            "#,
        )
        .unwrap();

        assert_eq!(
            config,
            Config {
                default_year: 2023,
                log_level: "debug".to_string(),
                log_file: Some(PathBuf::from("fincalc.log")),
                rates_csv: Some(PathBuf::from("brackets.csv")),
                database: DbConfig {
                    backend: "sqlite".to_string(),
                    connection_string: "sqlite::memory:".to_string(),
                },
            }
        );
    }

    #[test]
    fn test_partial_database_table_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [database]
            connection_string = "sqlite:other.db"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.backend, "sqlite");
        assert_eq!(config.database.connection_string, "sqlite:other.db");
        assert_eq!(config.default_year, FALLBACK_YEAR);
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let result: Result<Config, _> = toml::from_str("default_year = \"soon\"");

        assert!(result.is_err());
    }
}
