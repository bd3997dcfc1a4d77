//! Engine configuration.
//!
//! Every section defaults to the stock gallery behaviour and can be partially
//! overridden from JSON.

use crate::fit::FitConfig;
use crate::gesture::GestureConfig;
use crate::zoom::ZoomConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Delays of every scheduled task, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Quiet period after the last resize before refitting.
    pub resize_debounce_ms: u64,
    /// Settle time after an orientation change.
    pub orientation_settle_ms: u64,
    /// Fade-out time before a navigation swaps the photo.
    pub navigate_swap_ms: u64,
    /// Exit animation length before a dismiss closes the viewer.
    pub dismiss_close_ms: u64,
    /// Snap-back animation length before transitions are cleared.
    pub snap_back_clear_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            resize_debounce_ms: 200,
            orientation_settle_ms: 100,
            navigate_swap_ms: 150,
            dismiss_close_ms: 250,
            snap_back_clear_ms: 300,
        }
    }
}

impl TimingConfig {
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn orientation_settle(&self) -> Duration {
        Duration::from_millis(self.orientation_settle_ms)
    }

    pub fn navigate_swap(&self) -> Duration {
        Duration::from_millis(self.navigate_swap_ms)
    }

    pub fn dismiss_close(&self) -> Duration {
        Duration::from_millis(self.dismiss_close_ms)
    }

    pub fn snap_back_clear(&self) -> Duration {
        Duration::from_millis(self.snap_back_clear_ms)
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub zoom: ZoomConfig,
    pub fit: FitConfig,
    pub gesture: GestureConfig,
    pub timing: TimingConfig,
}

impl EngineConfig {
    /// Parse a (possibly partial) configuration object.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
