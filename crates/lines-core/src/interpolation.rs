//! Animation curves and rectangle interpolation
//!
//! Progress is fixed-point: `0` is the start of an animation and
//! [`PROGRESS_MAX`] the end. Integer math keeps the interpolation exact at
//! both endpoints and free of floating point on targets without an FPU.

use embassy_time::Duration;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use serde::{Deserialize, Serialize};

/// Fixed-point value of a finished animation
pub const PROGRESS_MAX: u32 = 0xFFFF;

/// Easing applied to animation progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Curve {
    #[default]
    Linear,
    /// Starts slow, ends fast
    EaseIn,
    /// Starts fast, ends slow
    EaseOut,
    /// Slow at both ends
    EaseInOut,
}

impl Curve {
    /// Map linear progress to eased progress, both in `0..=PROGRESS_MAX`
    pub fn apply(self, progress: u32) -> u32 {
        let p = progress.min(PROGRESS_MAX) as u64;
        let max = PROGRESS_MAX as u64;
        let eased = match self {
            Self::Linear => p,
            Self::EaseIn => p * p / max,
            Self::EaseOut => {
                let rest = max - p;
                max - rest * rest / max
            }
            Self::EaseInOut => {
                let half = max / 2;
                if p <= half {
                    2 * p * p / max
                } else {
                    let rest = max - p;
                    max - 2 * rest * rest / max
                }
            }
        };
        eased as u32
    }
}

/// Linear progress of an animation `elapsed` into `duration`
pub fn progress(elapsed: Duration, duration: Duration) -> u32 {
    let total = duration.as_micros();
    if total == 0 {
        return PROGRESS_MAX;
    }
    let done = elapsed.as_micros().min(total);
    (done * PROGRESS_MAX as u64 / total) as u32
}

fn lerp_i32(from: i32, to: i32, progress: u32) -> i32 {
    let delta = to as i64 - from as i64;
    (from as i64 + delta * progress as i64 / PROGRESS_MAX as i64) as i32
}

fn lerp_u32(from: u32, to: u32, progress: u32) -> u32 {
    lerp_i32(from as i32, to as i32, progress).max(0) as u32
}

/// Rectangle between `from` and `to` at the given fixed-point progress
pub fn interpolate_rect(from: &Rectangle, to: &Rectangle, progress: u32) -> Rectangle {
    let progress = progress.min(PROGRESS_MAX);
    Rectangle::new(
        Point::new(
            lerp_i32(from.top_left.x, to.top_left.x, progress),
            lerp_i32(from.top_left.y, to.top_left.y, progress),
        ),
        Size::new(
            lerp_u32(from.size.width, to.size.width, progress),
            lerp_u32(from.size.height, to.size.height, progress),
        ),
    )
}
