//! ---
//! opm_section: "01-core-functionality"
//! opm_subsection: "module"
//! opm_type: "source"
//! opm_scope: "code"
//! opm_description: "Shared primitives and utilities for the OPM runtime."
//! opm_version: "v0.1.0"
//! opm_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use tracing::debug;

use crate::logging::LogFormat;

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::StructuredJson
}

fn default_tick_interval() -> Duration {
    Duration::from_millis(3000)
}

fn default_history_capacity() -> usize {
    21
}

fn default_random_seed() -> u64 {
    0x0113_F1E1Du64
}

/// Primary configuration object for the OPM runtime.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    pub source: PathBuf,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &str = "OPM_CONFIG";

    /// Load configuration from disk, respecting the `OPM_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration from disk together with the effective source path.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(path.clone())?;
                return Ok(LoadedAppConfig {
                    config,
                    source: path,
                });
            }
        }

        for candidate in candidates {
            if candidate.as_ref().exists() {
                let path = candidate.as_ref().to_path_buf();
                let config = Self::from_path(path.clone())?;
                return Ok(LoadedAppConfig {
                    config,
                    source: path,
                });
            }
        }

        Err(anyhow!(
            "no configuration files found. inspected: {}",
            candidates
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }

    fn from_path(path: PathBuf) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = toml::from_str::<AppConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.simulation.validate()
    }
}

/// Logging sink configuration shared by every binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default)]
    pub file_prefix: Option<String>,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            file_prefix: None,
            format: default_log_format(),
        }
    }
}

/// Settings driving the telemetry random walk and the rolling history window.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Period between ticks, in milliseconds on the wire.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(default = "default_tick_interval")]
    pub tick_interval: Duration,
    /// Number of samples retained by the trend history window.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Seed for the walk generator. Fixed by default so runs are reproducible.
    #[serde(default = "default_random_seed")]
    pub random_seed: u64,
    /// Optional per-field tuning, keyed by field name (`agzu_pressure`, ...).
    #[serde(default)]
    pub fields: IndexMap<String, FieldTuning>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval: default_tick_interval(),
            history_capacity: default_history_capacity(),
            random_seed: default_random_seed(),
            fields: IndexMap::new(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval.is_zero() {
            return Err(anyhow!("simulation.tick_interval must be greater than zero"));
        }
        if self.history_capacity < 2 {
            return Err(anyhow!(
                "simulation.history_capacity must be at least 2, got {}",
                self.history_capacity
            ));
        }
        for (name, tuning) in &self.fields {
            tuning
                .validate()
                .with_context(|| format!("invalid tuning for field {}", name))?;
        }
        Ok(())
    }
}

/// Partial override of one telemetry field's walk parameters.
///
/// Unset members fall back to the built-in field table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldTuning {
    #[serde(default)]
    pub baseline: Option<f64>,
    #[serde(default)]
    pub step: Option<f64>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl FieldTuning {
    pub fn validate(&self) -> Result<()> {
        if let Some(step) = self.step {
            if step <= 0.0 {
                return Err(anyhow!("step must be positive, got {}", step));
            }
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min >= max {
                return Err(anyhow!("min {} must be below max {}", min, max));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config_validates() {
        AppConfig::default().validate().unwrap();
    }

    #[test]
    fn parses_toml_with_overrides() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[logging]
format = "pretty"

[simulation]
tick_interval = 250
history_capacity = 12
random_seed = 7

[simulation.fields.flow_rate]
step = 8.0
max = 180.0
"#
        )
        .unwrap();
        let config = AppConfig::load(&[file.path()]).unwrap();
        assert_eq!(config.simulation.tick_interval, Duration::from_millis(250));
        assert_eq!(config.simulation.history_capacity, 12);
        assert_eq!(config.simulation.random_seed, 7);
        let tuning = &config.simulation.fields["flow_rate"];
        assert_eq!(tuning.step, Some(8.0));
        assert_eq!(tuning.max, Some(180.0));
        assert_eq!(tuning.min, None);
    }

    #[test]
    fn rejects_zero_tick_interval() {
        let mut config = AppConfig::default();
        config.simulation.tick_interval = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_tiny_history_window() {
        let mut config = AppConfig::default();
        config.simulation.history_capacity = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_field_bounds() {
        let mut config = AppConfig::default();
        config.simulation.fields.insert(
            "agzu_pressure".into(),
            FieldTuning {
                min: Some(55.0),
                max: Some(50.0),
                ..FieldTuning::default()
            },
        );
        assert!(config.validate().is_err());
    }
}
