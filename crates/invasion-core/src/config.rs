//! Configuration System
//!
//! Loads run parameters from invasion.toml so they can be adjusted without
//! recompiling. Every field has a default; a partial file is fine.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::invasion::DEFAULT_MAX_MOVES;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "invasion.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvasionConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Simulation parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Rounds before the run is called off
    pub max_moves: u32,
    /// Random seed; a fresh one is drawn when absent
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_moves: DEFAULT_MAX_MOVES,
            seed: None,
        }
    }
}

/// What the report prints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub print_initial_map: bool,
    pub print_final_map: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            print_initial_map: true,
            print_final_map: true,
        }
    }
}

impl InvasionConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from `path`, or use defaults if it is missing or broken
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            warn!("Could not load {}: {}. Using defaults.", path.display(), e);
            Self::default()
        })
    }
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = InvasionConfig::default();
        assert_eq!(config.simulation.max_moves, 10_000);
        assert_eq!(config.simulation.seed, None);
        assert!(config.output.print_initial_map);
        assert!(config.output.print_final_map);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = InvasionConfig::from_str("[simulation]\nseed = 7\n").unwrap();
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.simulation.max_moves, DEFAULT_MAX_MOVES);
        assert_eq!(config.output, OutputConfig::default());

        let config = InvasionConfig::from_str("").unwrap();
        assert_eq!(config, InvasionConfig::default());
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[simulation]\nmax_moves = 50\n\n[output]\nprint_initial_map = false"
        )
        .unwrap();

        let config = InvasionConfig::load(file.path()).unwrap();
        assert_eq!(config.simulation.max_moves, 50);
        assert!(!config.output.print_initial_map);
        assert!(config.output.print_final_map);
    }

    #[test]
    fn test_invalid_config() {
        let err = InvasionConfig::from_str("[simulation]\nmax_moves = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = InvasionConfig::load("no/such/invasion.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let config = InvasionConfig::load_or_default("no/such/invasion.toml");
        assert_eq!(config, InvasionConfig::default());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not toml [").unwrap();
        assert_eq!(InvasionConfig::load_or_default(file.path()), InvasionConfig::default());
    }
}
