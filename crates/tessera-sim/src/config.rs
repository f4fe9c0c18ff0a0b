//! Simulator configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with `TESSERA_` prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Executor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Widest circuit the executor accepts. Memory is `16 · 2^n` bytes per shot.
    #[serde(default = "default_max_qubits")]
    pub max_qubits: usize,

    /// Run shots on the rayon thread pool.
    #[serde(default)]
    pub parallel_shots: bool,

    /// Allowed deviation of an `Initialize` vector's norm from 1.
    #[serde(default = "default_normalization_tolerance")]
    pub normalization_tolerance: f64,

    /// Log level for drivers that install a subscriber:
    /// "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_max_qubits() -> usize {
    20
}

fn default_normalization_tolerance() -> f64 {
    1e-6
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig {
            max_qubits: default_max_qubits(),
            parallel_shots: false,
            normalization_tolerance: default_normalization_tolerance(),
            log_level: default_log_level(),
        }
    }
}

impl SimulatorConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_yaml_str(&contents)
    }

    /// Parse configuration from a YAML document.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: SimulatorConfig = serde_yaml_ng::from_str(contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables over the defaults.
    pub fn from_env() -> Self {
        Self::default().merge_env()
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.merge_env();
        config.validate()?;
        Ok(config)
    }

    /// Merge environment variables into this configuration.
    ///
    /// Unset or unparsable variables leave the field unchanged.
    fn merge_env(mut self) -> Self {
        if let Ok(v) = std::env::var("TESSERA_MAX_QUBITS") {
            if let Ok(val) = v.parse() {
                self.max_qubits = val;
            }
        }
        if let Ok(v) = std::env::var("TESSERA_PARALLEL_SHOTS") {
            if let Ok(val) = v.parse() {
                self.parallel_shots = val;
            }
        }
        if let Ok(v) = std::env::var("TESSERA_NORM_TOLERANCE") {
            if let Ok(val) = v.parse() {
                self.normalization_tolerance = val;
            }
        }
        if let Ok(v) = std::env::var("TESSERA_LOG_LEVEL") {
            self.log_level = v;
        }
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_qubits == 0 || self.max_qubits > 30 {
            return Err(ConfigError::ValidationError(format!(
                "max_qubits must be between 1 and 30, got {}",
                self.max_qubits
            )));
        }

        if !(self.normalization_tolerance > 0.0 && self.normalization_tolerance < 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "normalization_tolerance must be in (0, 1), got {}",
                self.normalization_tolerance
            )));
        }

        match self.log_level.as_str() {
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
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SimulatorConfig::default();
        assert_eq!(config.max_qubits, 20);
        assert!(!config.parallel_shots);
        assert_eq!(config.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_partial_uses_defaults() {
        let config = SimulatorConfig::from_yaml_str("parallel_shots: true\n").unwrap();
        assert!(config.parallel_shots);
        assert_eq!(config.max_qubits, 20);
        assert_eq!(config.normalization_tolerance, 1e-6);
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = SimulatorConfig::default();
        config.log_level = "loud".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_max_qubits_bounds() {
        let mut config = SimulatorConfig::default();
        config.max_qubits = 0;
        assert!(config.validate().is_err());
        config.max_qubits = 31;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            SimulatorConfig::from_yaml_str("max_qubits: [1, 2]"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_qubits: 12\nnormalization_tolerance: 0.001").unwrap();

        let config = SimulatorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_qubits, 12);
        assert_eq!(config.normalization_tolerance, 0.001);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            SimulatorConfig::from_file("/nonexistent/tessera.yaml"),
            Err(ConfigError::IoError(_))
        ));
    }
}
