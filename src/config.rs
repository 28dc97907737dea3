//! Engine configuration parameters
//!
//! Sampling periods and dispatch options for the state-change engine.
//! Defaults match the shipping firmware; values can be overridden by the
//! persistent-storage collaborator (postcard blob) or by a JSON file in the
//! simulator.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Lowest alert threshold the fuel gauge accepts (percent).
const MIN_ALERT_PERCENT: u8 = 1;
/// Highest alert threshold the fuel gauge accepts (percent).
const MAX_ALERT_PERCENT: u8 = 32;

/// Core engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // --- Timing ---
    /// Digital pin sampling period (milliseconds)
    pub digital_interval_ms: u32,
    /// Analog pin sampling period (milliseconds)
    pub analog_interval_ms: u32,
    /// Battery / temperature sampling period (milliseconds)
    pub peripheral_interval_ms: u32,

    // --- Diagnostics ---
    /// Announce every dispatched event on the diagnostic sink
    pub verbose: bool,

    // --- Power ---
    /// Fuel-gauge low-battery alert threshold (1-32%)
    pub battery_alert_percent: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            digital_interval_ms: 50,       // 20 Hz
            analog_interval_ms: 60_000,    // 1/min
            peripheral_interval_ms: 60_000, // 1/min
            verbose: false,
            battery_alert_percent: 20,
        }
    }
}

impl EngineConfig {
    /// Range-check a config that came from outside (storage, file).
    ///
    /// The engine itself never calls this: `set_periods` trusts its caller.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.digital_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("digital_interval_ms"));
        }
        if self.analog_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("analog_interval_ms"));
        }
        if self.peripheral_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("peripheral_interval_ms"));
        }
        if !(MIN_ALERT_PERCENT..=MAX_ALERT_PERCENT).contains(&self.battery_alert_percent) {
            return Err(ConfigError::AlertOutOfRange(self.battery_alert_percent));
        }
        Ok(())
    }

    /// Encode for the persistent-storage collaborator.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        postcard::to_allocvec(self).map_err(|_| ConfigError::Encode)
    }

    /// Decode and validate a blob produced by [`EngineConfig::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Decode)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document. Missing fields fall back to defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|_| ConfigError::Decode)?;
        config.validate()?;
        Ok(config)
    }
}
