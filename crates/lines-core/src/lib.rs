//! Hardware-independent core library for the Lines watch face
//!
//! This crate contains all platform-agnostic logic for the watch face: the
//! segment geometry table, the digit encoder, the segment transition engine,
//! the quadrant controller, clock-tick dispatch and the composition root.
//! The display host (layer tree, frame animations, wall clock, minute ticks)
//! is abstracted behind the traits in [`host`], with [`scene::Scene`] as an
//! in-memory implementation used by the desktop simulator and the tests.
//!
//! It is `#![no_std]` and allocation free so it compiles on both embedded
//! targets and desktop hosts.

#![no_std]

pub mod clock;
pub mod config;
pub mod digit;
pub mod error;
pub mod geometry;
pub mod host;
pub mod interpolation;
pub mod palette;
pub mod quadrant;
pub mod scene;
pub mod transition;
pub mod watch_face;

pub use clock::{ClockReading, ClockStyle, MinuteSignal, MinuteTicker};
pub use config::{TransitionConfig, WatchConfig};
pub use digit::{SegmentMask, encode, try_encode};
pub use error::{HostError, WatchError, WatchResult};
pub use geometry::{QuadrantPosition, SegmentId};
pub use host::{DisplayTree, Fill, FrameAnimator, MinuteTicks, WallClock, WatchHost};
pub use interpolation::Curve;
pub use quadrant::Quadrant;
pub use scene::{Scene, WatchScene};
pub use transition::{SegmentTransitions, TransitionReport};
pub use watch_face::{TickReport, WatchFace};
