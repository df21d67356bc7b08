//! Service configuration.
//!
//! Provides [`BoostConfig`] with defaults matching the protocol constants.
//! Values can be overridden programmatically, from a deserialized scenario
//! file, or from environment variables via [`BoostConfig::from_env`].

use serde::{Deserialize, Serialize};

use veboost_core::constants::{BPS_DENOMINATOR, MAX_PERCENTAGE_BPS, MIN_DURATION};
use veboost_core::error::ConfigError;

/// Environment variable overriding [`BoostConfig::min_duration_secs`].
pub const ENV_MIN_DURATION: &str = "VEBOOST_MIN_DURATION_SECS";

/// Environment variable overriding [`BoostConfig::max_percentage_bps`].
pub const ENV_MAX_PERCENTAGE: &str = "VEBOOST_MAX_PERCENTAGE_BPS";

/// Limits applied by the boost service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostConfig {
    /// Minimum seconds between "now" and a requested expiry.
    pub min_duration_secs: u64,
    /// Largest percentage a single boost may request, in basis points.
    pub max_percentage_bps: u64,
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self {
            min_duration_secs: MIN_DURATION,
            max_percentage_bps: MAX_PERCENTAGE_BPS,
        }
    }
}

impl BoostConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for unset keys.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let parse = |key: &str, default: u64| -> Result<u64, ConfigError> {
            let Some(value) = lookup(key) else {
                return Ok(default);
            };
            match value.trim().parse() {
                Ok(parsed) => Ok(parsed),
                Err(_) => Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value,
                }),
            }
        };

        let config = Self {
            min_duration_secs: parse(ENV_MIN_DURATION, defaults.min_duration_secs)?,
            max_percentage_bps: parse(ENV_MAX_PERCENTAGE, defaults.max_percentage_bps)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the service cannot enforce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_duration_secs == 0 {
            return Err(ConfigError::ZeroMinDuration);
        }
        if self.max_percentage_bps == 0 || self.max_percentage_bps > BPS_DENOMINATOR {
            return Err(ConfigError::MaxPercentageOutOfRange(self.max_percentage_bps));
        }
        Ok(())
    }
}
