// src/host.rs
//! Display host interfaces consumed by the watch face.
//!
//! The watch face never touches pixels, timers or the system clock directly.
//! Everything it needs from the device is expressed by four traits:
//!
//! - [`DisplayTree`]: retained tree of rectangular layers with fill routines
//! - [`FrameAnimator`]: scheduled interpolation of a layer's frame
//! - [`WallClock`]: current hour/minute and the 12/24-hour preference
//! - [`MinuteTicks`]: subscription to the periodic minute signal
//!
//! [`WatchHost`] bundles them. [`Scene`](crate::scene::Scene) implements all
//! of them in memory.

use core::fmt::Debug;

use embassy_time::Duration;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::primitives::Rectangle;

use crate::clock::{ClockReading, ClockStyle};
use crate::error::HostError;
use crate::interpolation::Curve;

/// Fill routine attached to a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// Draws nothing; only groups and clips its children
    Transparent,
    /// Fills the whole layer frame
    Solid(Rgb565),
    /// Fills each rectangle, given in layer-local coordinates
    Rects(&'static [Rectangle], Rgb565),
}

/// Retained tree of visual elements
pub trait DisplayTree {
    /// Handle to a layer owned by the host
    type Layer: Copy + Eq + Debug;

    /// Create a layer; `frame` is relative to `parent` (or the screen)
    fn create_layer(
        &mut self,
        parent: Option<Self::Layer>,
        frame: Rectangle,
        fill: Fill,
    ) -> Result<Self::Layer, HostError>;

    /// Release a layer together with all of its descendants
    fn destroy_layer(&mut self, layer: Self::Layer);

    /// Move or resize a layer
    fn set_frame(&mut self, layer: Self::Layer, frame: Rectangle) -> Result<(), HostError>;

    /// Current frame of a layer, `None` for a released handle
    fn frame(&self, layer: Self::Layer) -> Option<Rectangle>;

    /// Request a redraw of the layer
    fn mark_dirty(&mut self, layer: Self::Layer);
}

/// Animated changes of a layer's frame
pub trait FrameAnimator: DisplayTree {
    /// Handle to a scheduled animation
    type Animation: Copy + Eq + Debug;

    /// Schedule an interpolation of `layer`'s frame from `from` to `to`.
    ///
    /// The frame jumps to `from` immediately and reaches `to` after
    /// `duration`, driven by the host's frame callbacks.
    fn animate_frame(
        &mut self,
        layer: Self::Layer,
        from: Rectangle,
        to: Rectangle,
        duration: Duration,
        curve: Curve,
    ) -> Result<Self::Animation, HostError>;

    /// Stop an animation where it is and release it.
    ///
    /// Finished or already cancelled handles are ignored.
    fn cancel_animation(&mut self, animation: Self::Animation);

    /// Whether the animation is still running
    fn is_animating(&self, animation: Self::Animation) -> bool;
}

/// Wall clock of the device
pub trait WallClock {
    fn now(&self) -> ClockReading;

    /// 12 or 24 hour display preference of the device
    fn clock_style(&self) -> ClockStyle;
}

/// Periodic once-per-minute signal
pub trait MinuteTicks {
    fn subscribe_minute_ticks(&mut self) -> Result<(), HostError>;

    fn unsubscribe_minute_ticks(&mut self);
}

/// Everything the watch face needs from its host
pub trait WatchHost: FrameAnimator + WallClock + MinuteTicks {}

/// Implement WatchHost for any type that implements all host traits
impl<T: FrameAnimator + WallClock + MinuteTicks> WatchHost for T {}
