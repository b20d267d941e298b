//! Watch settings.
//!
//! Geometry and colors are compile-time constants. The only tunables are the
//! segment transition timing and an optional override of the device's
//! 12/24-hour preference. Hosts hand settings over as a postcard blob.

use embassy_time::Duration;
use serde::{Deserialize, Serialize};

use crate::clock::ClockStyle;
use crate::error::{WatchError, WatchResult};
use crate::interpolation::Curve;

/// Duration of a segment slide in milliseconds
pub const DEFAULT_TRANSITION_MS: u32 = 2000;

/// Largest encoded [`WatchConfig`]
pub const WATCH_CONFIG_MAX_BYTES: usize = 16;

/// Timing of segment show/hide animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// Zero disables animation: segments snap to their target
    pub duration_ms: u32,
    pub curve: Curve,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_TRANSITION_MS,
            curve: Curve::Linear,
        }
    }
}

impl TransitionConfig {
    /// Segments jump straight to their target rectangle
    pub const fn instant() -> Self {
        Self {
            duration_ms: 0,
            curve: Curve::Linear,
        }
    }

    pub const fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms as u64)
    }

    pub const fn is_instant(&self) -> bool {
        self.duration_ms == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WatchConfig {
    pub transition: TransitionConfig,
    /// Forces a clock style instead of following the device preference
    pub clock_style: Option<ClockStyle>,
}

impl WatchConfig {
    /// Decode a postcard settings blob
    pub fn from_bytes(bytes: &[u8]) -> WatchResult<Self> {
        postcard::from_bytes(bytes).map_err(|_| WatchError::Config)
    }

    /// Encode into `buf`, returning the used prefix
    pub fn to_slice<'a>(&self, buf: &'a mut [u8]) -> WatchResult<&'a mut [u8]> {
        postcard::to_slice(self, buf).map_err(|_| WatchError::Config)
    }

    /// Clock style to display given the device preference
    pub fn effective_style(&self, device: ClockStyle) -> ClockStyle {
        self.clock_style.unwrap_or(device)
    }
}
