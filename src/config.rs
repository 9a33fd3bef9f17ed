//! Configuration loading and validation

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use crate::controller::pid::PidConfig;

/// Startup configuration, fixed for the process lifetime.
///
/// A gain left out of the file disables that term entirely, which is not the
/// same as setting it to zero: a disabled integral term accumulates nothing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Control frequency in ticks per second. Must be positive.
    pub freq: u32,
    pub p: Option<f64>,
    pub d: Option<f64>,
    pub i: Option<f64>,
    pub i_limit: Option<f64>,
    pub output_limit_min: Option<f64>,
    pub output_limit_max: Option<f64>,
    /// Sender stamp accepted on the measurement flow.
    pub input_sender_id: u32,
    /// Sender stamp accepted on the target flow.
    pub control_sender_id: u32,
    /// Sender stamp attached to outbound actuation envelopes.
    pub output_sender_id: u32,
    pub verbose: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            freq: 50,
            p: None,
            d: None,
            i: None,
            i_limit: None,
            output_limit_min: None,
            output_limit_max: None,
            input_sender_id: 0,
            control_sender_id: 0,
            output_sender_id: 0,
            verbose: false,
        }
    }
}

impl RuntimeConfig {
    /// Reject configurations the loop cannot run with. A zero frequency has
    /// no defined tick period and must stop startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.freq == 0 {
            return Err(ConfigError::InvalidFrequency(self.freq));
        }
        Ok(())
    }

    /// Tick period in seconds.
    pub fn dt(&self) -> f64 {
        1.0 / f64::from(self.freq)
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(self.dt())
    }

    pub fn pid(&self) -> PidConfig {
        PidConfig {
            kp: self.p,
            kd: self.d,
            ki: self.i,
            i_limit: self.i_limit,
            output_min: self.output_limit_min,
            output_max: self.output_limit_max,
            dt: self.dt(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidFrequency(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidFrequency(freq) => {
                write!(f, "control frequency must be positive, got {}", freq)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from a TOML file, falling back to defaults when the
/// file is missing or unreadable. Validation is a separate step so a broken
/// frequency still stops startup.
pub fn load_config(path: &str) -> RuntimeConfig {
    match std::fs::read_to_string(path) {
        Ok(s) => toml::from_str::<RuntimeConfig>(&s).unwrap_or_default(),
        Err(_) => RuntimeConfig::default(),
    }
}
