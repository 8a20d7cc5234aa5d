//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the payroll
//! engine configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{PayrollError, PayrollResult};

use super::types::PayrollConfig;

/// Loads and provides access to the payroll configuration.
///
/// # File Layout
///
/// ```text
/// config/
/// └── payroll.yaml   # chunk size, cache TTL, overtime rules
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/payroll.yaml")?;
/// println!("Chunk size: {}", loader.config().chunk_size);
/// # Ok::<(), payroll_engine::error::PayrollError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// Returns an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file contains invalid YAML or invalid values (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> PayrollResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PayrollError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse(&content, &path_str)
    }

    /// Parses configuration from YAML text. `origin` names the source in errors.
    pub fn parse(content: &str, origin: &str) -> PayrollResult<Self> {
        let config: PayrollConfig =
            serde_yaml::from_str(content).map_err(|e| PayrollError::ConfigParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?;

        config
            .validate()
            .map_err(|message| PayrollError::ConfigParseError {
                path: origin.to_string(),
                message,
            })?;

        Ok(Self { config })
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Consumes the loader and returns the configuration.
    pub fn into_config(self) -> PayrollConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn config_path() -> &'static str {
        "./config/payroll.yaml"
    }

    #[test]
    fn test_load_bundled_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let config = result.unwrap().into_config();
        assert_eq!(config.chunk_size, 20);
        assert_eq!(config.cache.ttl_seconds, 600);
        assert_eq!(config.overtime.multiplier, dec!(2));
        assert_eq!(config.overtime.hours_per_workday, dec!(8));
        assert_eq!(config.overtime.max_hours_per_day, dec!(3));
    }

    #[test]
    fn test_load_missing_file_returns_error() {
        let result = ConfigLoader::load("/nonexistent/payroll.yaml");

        match result {
            Err(PayrollError::ConfigNotFound { path }) => {
                assert!(path.contains("payroll.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_invalid_yaml_returns_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "chunk_size: [not, a, number]").unwrap();

        match ConfigLoader::load(file.path()) {
            Err(PayrollError::ConfigParseError { path, .. }) => {
                assert_eq!(path, file.path().display().to_string());
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_load_zero_chunk_size_returns_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "chunk_size: 0").unwrap();

        match ConfigLoader::load(file.path()) {
            Err(PayrollError::ConfigParseError { message, .. }) => {
                assert!(message.contains("chunk_size"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_overrides_only_given_fields() {
        let loader = ConfigLoader::parse("cache:\n  ttl_seconds: 30\n", "inline").unwrap();
        assert_eq!(loader.config().cache.ttl_seconds, 30);
        assert_eq!(loader.config().chunk_size, 20);
    }
}
