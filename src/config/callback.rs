//! Callback verification configuration

use serde::Deserialize;

use crate::domain::payment::{FreshnessPolicy, DEFAULT_CLOCK_SKEW_SECS, DEFAULT_TOLERANCE_SECS};

use super::error::ValidationError;

/// Freshness window for inbound callbacks
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackConfig {
    /// Maximum callback age in seconds
    #[serde(default = "default_tolerance")]
    pub tolerance_secs: i64,

    /// Allowed sender clock lead in seconds
    #[serde(default = "default_clock_skew")]
    pub clock_skew_secs: i64,
}

fn default_tolerance() -> i64 {
    DEFAULT_TOLERANCE_SECS
}

fn default_clock_skew() -> i64 {
    DEFAULT_CLOCK_SKEW_SECS
}

impl Default for CallbackConfig {
    fn default() -> Self {
        Self {
            tolerance_secs: default_tolerance(),
            clock_skew_secs: default_clock_skew(),
        }
    }
}

impl CallbackConfig {
    pub fn freshness_policy(&self) -> FreshnessPolicy {
        FreshnessPolicy::new(self.tolerance_secs, self.clock_skew_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.tolerance_secs <= 0 {
            return Err(ValidationError::InvalidTolerance);
        }
        if self.clock_skew_secs < 0 {
            return Err(ValidationError::InvalidClockSkew);
        }
        Ok(())
    }
}
