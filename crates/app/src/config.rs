//! Configuration loaded from the environment.

use std::path::PathBuf;
use std::str::FromStr;

use lendstore_observability::LogFormat;
use lendstore_persistence::ImportOptions;

pub const DATA_FILE_VAR: &str = "LENDSTORE_DATA_FILE";
pub const PRETTY_SNAPSHOT_VAR: &str = "LENDSTORE_PRETTY_SNAPSHOT";
pub const IMPORT_DEFAULT_AVAILABLE_VAR: &str = "LENDSTORE_IMPORT_DEFAULT_AVAILABLE";
pub const LOG_FORMAT_VAR: &str = "LENDSTORE_LOG_FORMAT";

const DEFAULT_DATA_FILE: &str = "library.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Snapshot file for the session.
    pub data_file: PathBuf,
    pub pretty_snapshot: bool,
    pub import: ImportOptions,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            pretty_snapshot: true,
            import: ImportOptions::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable source. Unset variables keep their
    /// default; unparsable ones keep their default and log a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let data_file = lookup(DATA_FILE_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_file);

        Self {
            data_file,
            pretty_snapshot: parse_or(&lookup, PRETTY_SNAPSHOT_VAR, defaults.pretty_snapshot),
            import: ImportOptions {
                default_available: parse_or(
                    &lookup,
                    IMPORT_DEFAULT_AVAILABLE_VAR,
                    defaults.import.default_available,
                ),
            },
            log_format: parse_or(&lookup, LOG_FORMAT_VAR, defaults.log_format),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T
where
    T: FromStr + core::fmt::Debug,
{
    let Some(raw) = lookup(name) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(var = name, value = %raw, default = ?default, "invalid value; using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.data_file, PathBuf::from("library.json"));
        assert!(!config.import.default_available);
    }

    #[test]
    fn reads_every_variable() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (DATA_FILE_VAR, "/tmp/shelf.json"),
            (PRETTY_SNAPSHOT_VAR, "false"),
            (IMPORT_DEFAULT_AVAILABLE_VAR, "true"),
            (LOG_FORMAT_VAR, "json"),
        ]));

        assert_eq!(config.data_file, PathBuf::from("/tmp/shelf.json"));
        assert!(!config.pretty_snapshot);
        assert!(config.import.default_available);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (DATA_FILE_VAR, "   "),
            (PRETTY_SNAPSHOT_VAR, "sometimes"),
            (LOG_FORMAT_VAR, "xml"),
        ]));
        assert_eq!(config, AppConfig::default());
    }
}
