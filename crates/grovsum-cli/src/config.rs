//! Configuration for the Grovsum CLI.
//!
//! Sources, highest precedence first:
//! 1. Command-line flags (applied by the commands)
//! 2. Environment variables with the `GROVSUM_` prefix
//! 3. A YAML file (`--config`, else `~/.grovsum/config.yaml` when present)
//! 4. Default values

use grovsum_search::problem::MAX_COUNTER_DIGITS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Search run parameters
    #[serde(default)]
    pub search: SearchConfig,

    /// Local simulator settings
    #[serde(default)]
    pub simulator: SimulatorConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults for the counting and search stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Counting register width. Unset means `ceil(len / 2) + 1`.
    #[serde(default)]
    pub digits_counter: Option<u32>,

    /// Shots for the amplified search
    #[serde(default = "default_shots")]
    pub shots: u32,

    /// Shots for the counting stage
    #[serde(default = "default_shots")]
    pub shots_counter: u32,
}

/// Simulator backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Largest circuit the simulator accepts
    #[serde(default = "default_max_qubits")]
    pub max_qubits: u32,

    /// Sampling seed. Unset means fresh entropy per run.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_shots() -> u32 {
    100
}

fn default_max_qubits() -> u32 {
    grovsum_adapter_sim::DEFAULT_MAX_QUBITS
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            digits_counter: None,
            shots: default_shots(),
            shots_counter: default_shots(),
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig {
            max_qubits: default_max_qubits(),
            seed: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.display())))?;

        let config: Config = serde_yaml_ng::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;

        config.validate()?;
        Ok(config)
    }

    /// `~/.grovsum/config.yaml`, if a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".grovsum").join("config.yaml"))
    }

    /// Load the file layer, then apply environment overrides.
    ///
    /// An explicit `path` must exist; the default path is only read when
    /// present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(default) => Self::from_file(default)?,
                None => Config::default(),
            },
        };

        let config = config.merge_env_from(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `GROVSUM_*` variables as seen through `lookup`.
    ///
    /// Unset variables leave fields unchanged. Set but unparsable values are
    /// an error.
    pub fn merge_env_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
            value.trim().parse().map_err(|_| {
                ConfigError::ParseError(format!("{key}: cannot parse '{value}'"))
            })
        }

        // Search
        if let Some(v) = lookup("GROVSUM_DIGITS_COUNTER") {
            self.search.digits_counter = Some(parse("GROVSUM_DIGITS_COUNTER", &v)?);
        }
        if let Some(v) = lookup("GROVSUM_SHOTS") {
            self.search.shots = parse("GROVSUM_SHOTS", &v)?;
        }
        if let Some(v) = lookup("GROVSUM_SHOTS_COUNTER") {
            self.search.shots_counter = parse("GROVSUM_SHOTS_COUNTER", &v)?;
        }

        // Simulator
        if let Some(v) = lookup("GROVSUM_MAX_QUBITS") {
            self.simulator.max_qubits = parse("GROVSUM_MAX_QUBITS", &v)?;
        }
        if let Some(v) = lookup("GROVSUM_SEED") {
            self.simulator.seed = Some(parse("GROVSUM_SEED", &v)?);
        }

        // Logging
        if let Some(v) = lookup("GROVSUM_LOG_LEVEL") {
            self.logging.level = v;
        }

        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.shots == 0 || self.search.shots_counter == 0 {
            return Err(ConfigError::ValidationError(
                "shots and shots_counter must be greater than 0".to_string(),
            ));
        }

        if let Some(digits_counter) = self
            .search
            .digits_counter
            .filter(|d| !(1..=MAX_COUNTER_DIGITS).contains(d))
        {
            return Err(ConfigError::ValidationError(format!(
                "digits_counter must be in 1..={MAX_COUNTER_DIGITS}, got {digits_counter}"
            )));
        }

        if self.simulator.max_qubits == 0 {
            return Err(ConfigError::ValidationError(
                "max_qubits must be greater than 0".to_string(),
            ));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {other}"
                )));
            }
        }

        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|&(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.search.shots, 100);
        assert_eq!(config.search.shots_counter, 100);
        assert_eq!(config.search.digits_counter, None);
        assert_eq!(config.simulator.max_qubits, 24);
        assert_eq!(config.logging.level, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "search:\n  shots: 500\nsimulator:\n  seed: 42").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.search.shots, 500);
        assert_eq!(config.search.shots_counter, 100);
        assert_eq!(config.simulator.seed, Some(42));
        assert_eq!(config.simulator.max_qubits, 24);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_from_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.yaml");
        assert!(matches!(
            Config::from_file(&missing),
            Err(ConfigError::IoError(_))
        ));

        let bad = dir.path().join("bad.yaml");
        std::fs::write(&bad, "search: [1, 2").unwrap();
        assert!(matches!(Config::from_file(&bad), Err(ConfigError::ParseError(_))));

        let zero = dir.path().join("zero.yaml");
        std::fs::write(&zero, "search:\n  shots_counter: 0\n").unwrap();
        assert!(matches!(
            Config::from_file(&zero),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "search:\n  shots: 500\n  shots_counter: 50").unwrap();

        let config = Config::from_file(file.path())
            .unwrap()
            .merge_env_from(env(&[
                ("GROVSUM_SHOTS", "2000"),
                ("GROVSUM_DIGITS_COUNTER", "4"),
                ("GROVSUM_LOG_LEVEL", "debug"),
            ]))
            .unwrap();

        assert_eq!(config.search.shots, 2000);
        assert_eq!(config.search.shots_counter, 50);
        assert_eq!(config.search.digits_counter, Some(4));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_env_parse_error() {
        let err = Config::default()
            .merge_env_from(env(&[("GROVSUM_SEED", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("GROVSUM_SEED"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.search.digits_counter = Some(0);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.search.digits_counter = Some(33);
        assert!(config.validate().is_err());
        config.search.digits_counter = Some(MAX_COUNTER_DIGITS);
        assert!(config.validate().is_ok());

        let mut config = Config::default();
        config.simulator.max_qubits = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grovsum.yaml");
        std::fs::write(&path, "logging:\n  level: info\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.logging.level, "info");
        assert!(Config::load(Some(&dir.path().join("absent.yaml"))).is_err());
    }
}
