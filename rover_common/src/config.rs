//! TOML configuration loading and validation.
//!
//! All run parameters are fixed for the duration of a run: per-task
//! periods, the horizon, gains, and log locations. Every section has full
//! defaults so the binaries run without any configuration file; a partial
//! TOML only overrides the sections it names.
//!
//! # TOML Example
//!
//! ```toml
//! [run]
//! horizon_s = 20.0
//! load_threads = 1
//!
//! [periods]
//! plant_ms = 30
//! control_ms = 50
//!
//! [gains]
//! alpha1 = 3.0
//! alpha2 = 3.0
//! ```

use crate::consts;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// File read or TOML parsing failed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// Semantic validation failed.
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

/// Global run parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSection {
    /// Total run horizon [s].
    pub horizon_s: f64,
    /// Number of CPU load generator threads started with `--load`.
    pub load_threads: usize,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            horizon_s: consts::DEFAULT_HORIZON_S,
            load_threads: consts::DEFAULT_LOAD_THREADS,
        }
    }
}

/// Per-task periods [ms].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodsSection {
    pub plant_ms: u64,
    pub linearization_ms: u64,
    pub control_ms: u64,
    pub ref_model_ms: u64,
    pub reference_ms: u64,
    pub ui_ms: u64,
    /// Step period of the lockstep driver [ms]; also its logical time step.
    pub lockstep_ms: u64,
}

impl Default for PeriodsSection {
    fn default() -> Self {
        Self {
            plant_ms: consts::DEFAULT_PLANT_PERIOD_MS,
            linearization_ms: consts::DEFAULT_LIN_PERIOD_MS,
            control_ms: consts::DEFAULT_CTRL_PERIOD_MS,
            ref_model_ms: consts::DEFAULT_MODEL_PERIOD_MS,
            reference_ms: consts::DEFAULT_REF_PERIOD_MS,
            ui_ms: consts::DEFAULT_UI_PERIOD_MS,
            lockstep_ms: consts::DEFAULT_LOCKSTEP_PERIOD_MS,
        }
    }
}

/// Robot geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotSection {
    /// Distance from the wheel axle to the tracked front point [m].
    pub wheel_offset_m: f64,
}

impl Default for RobotSection {
    fn default() -> Self {
        Self {
            wheel_offset_m: consts::DEFAULT_WHEEL_OFFSET_M,
        }
    }
}

/// Controller and reference-model gains.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GainsSection {
    pub alpha1: f64,
    pub alpha2: f64,
}

impl Default for GainsSection {
    fn default() -> Self {
        Self {
            alpha1: consts::DEFAULT_ALPHA,
            alpha2: consts::DEFAULT_ALPHA,
        }
    }
}

/// Log file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogsSection {
    /// Directory all CSV logs are written under (created if missing).
    pub out_dir: PathBuf,
}

impl Default for LogsSection {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(consts::DEFAULT_OUT_DIR),
        }
    }
}

/// Complete simulation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub run: RunSection,
    pub periods: PeriodsSection,
    pub robot: RobotSection,
    pub gains: GainsSection,
    pub logs: LogsSection,
}

impl SimConfig {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let config: SimConfig =
            toml::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise use the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Semantic validation of all sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.run.horizon_s > 0.0) {
            return Err(ConfigError::Validation(format!(
                "run.horizon_s must be positive, got {}",
                self.run.horizon_s
            )));
        }
        let periods = [
            ("plant_ms", self.periods.plant_ms),
            ("linearization_ms", self.periods.linearization_ms),
            ("control_ms", self.periods.control_ms),
            ("ref_model_ms", self.periods.ref_model_ms),
            ("reference_ms", self.periods.reference_ms),
            ("ui_ms", self.periods.ui_ms),
            ("lockstep_ms", self.periods.lockstep_ms),
        ];
        for (name, value) in periods {
            if value == 0 {
                return Err(ConfigError::Validation(format!(
                    "periods.{name} must be positive"
                )));
            }
        }
        if !(self.robot.wheel_offset_m > 0.0) {
            return Err(ConfigError::Validation(format!(
                "robot.wheel_offset_m must be positive, got {}",
                self.robot.wheel_offset_m
            )));
        }
        if !(self.gains.alpha1 > 0.0) || !(self.gains.alpha2 > 0.0) {
            return Err(ConfigError::Validation(format!(
                "gains must be positive, got alpha1={} alpha2={}",
                self.gains.alpha1, self.gains.alpha2
            )));
        }
        Ok(())
    }

    /// Performance log path; the file name records whether the CPU load
    /// generator was active so loaded and unloaded runs stay comparable.
    pub fn perf_path(&self, with_load: bool) -> PathBuf {
        let name = if with_load {
            "perf_load.csv"
        } else {
            "perf_noload.csv"
        };
        self.logs.out_dir.join(name)
    }

    /// Trajectory log path (plant task only).
    pub fn traj_path(&self) -> PathBuf {
        self.logs.out_dir.join("traj.csv")
    }

    /// Lockstep sample log path.
    pub fn samples_path(&self) -> PathBuf {
        self.logs.out_dir.join("samples.csv")
    }
}

/// Convert a millisecond period to nanoseconds for scheduler arming.
pub fn period_ns(period_ms: u64) -> i64 {
    period_ms as i64 * consts::NS_PER_MS
}
