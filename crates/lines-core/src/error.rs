//! Error types for the watch face and its display host

use thiserror_no_std::Error;

/// Failures reported by a display host implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HostError {
    /// No free slot left for a new layer
    #[error("Layer pool exhausted (max: {max})")]
    LayerPoolExhausted {
        /// Capacity of the layer pool
        max: usize,
    },

    /// No free slot left for a new frame animation
    #[error("Animation pool exhausted (max: {max})")]
    AnimationPoolExhausted {
        /// Capacity of the animation pool
        max: usize,
    },

    /// The handle does not refer to a live layer
    #[error("Unknown or released layer")]
    UnknownLayer,
}

/// Error types for watch face operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WatchError {
    /// Digit outside 0-9
    #[error("Invalid digit: {digit}")]
    InvalidDigit {
        /// The rejected digit
        digit: u8,
    },

    /// Clock reading outside 00:00-23:59
    #[error("Invalid time {hour}:{minute}")]
    InvalidTime {
        /// Rejected hour
        hour: u8,
        /// Rejected minute
        minute: u8,
    },

    /// The display host refused an operation
    #[error("Display host error: {0}")]
    Host(HostError),

    /// A settings blob could not be decoded or encoded
    #[error("Invalid watch configuration")]
    Config,
}

impl From<HostError> for WatchError {
    fn from(err: HostError) -> Self {
        Self::Host(err)
    }
}

/// Result type for watch face operations
pub type WatchResult<T> = Result<T, WatchError>;
