//! Quadrant controller: one digit of the watch face.
//!
//! A quadrant owns a container layer at its screen bounds, two static point
//! layers and eight segment layers, plus the transition slots and the mask
//! it currently displays. Its only mutating operation is
//! [`Quadrant::set_digit`].

use log::{debug, info};

use crate::config::TransitionConfig;
use crate::digit::{SegmentMask, encode};
use crate::error::{HostError, WatchResult};
use crate::geometry::{POINT_COUNT, POINTS, QuadrantPosition, SEGMENT_COUNT, SEGMENTS, SegmentId};
use crate::host::{Fill, FrameAnimator};
use crate::palette::COLOR_INK;
use crate::transition::{SegmentTransitions, TransitionReport};

pub struct Quadrant<H: FrameAnimator> {
    position: QuadrantPosition,
    container: H::Layer,
    points: [H::Layer; POINT_COUNT],
    segments: [H::Layer; SEGMENT_COUNT],
    transitions: SegmentTransitions<H>,
    current: SegmentMask,
}

impl<H: FrameAnimator> Quadrant<H> {
    /// Build the quadrant's layers under `parent`.
    ///
    /// Segments start collapsed and the mask empty. If the host runs out of
    /// layers, everything created so far is released before returning.
    pub fn create(
        host: &mut H,
        parent: Option<H::Layer>,
        position: QuadrantPosition,
        config: TransitionConfig,
    ) -> WatchResult<Self> {
        let container = host.create_layer(parent, position.bounds(), Fill::Transparent)?;

        let (points, segments) = match Self::create_children(host, container) {
            Ok(children) => children,
            Err(err) => {
                host.destroy_layer(container);
                return Err(err.into());
            }
        };

        debug!("Created quadrant {:?}", position);
        Ok(Self {
            position,
            container,
            points,
            segments,
            transitions: SegmentTransitions::new(config),
            current: SegmentMask::EMPTY,
        })
    }

    #[allow(clippy::type_complexity)]
    fn create_children(
        host: &mut H,
        container: H::Layer,
    ) -> Result<([H::Layer; POINT_COUNT], [H::Layer; SEGMENT_COUNT]), HostError> {
        // Placeholders, every slot is overwritten below
        let mut points = [container; POINT_COUNT];
        for (slot, point) in points.iter_mut().zip(POINTS) {
            *slot = host.create_layer(Some(container), point, Fill::Solid(COLOR_INK))?;
        }

        let mut segments = [container; SEGMENT_COUNT];
        for (slot, shape) in segments.iter_mut().zip(SEGMENTS.iter()) {
            *slot = host.create_layer(Some(container), shape.collapsed, Fill::Solid(COLOR_INK))?;
        }

        Ok((points, segments))
    }

    /// Display `digit`, animating only the segments that change.
    ///
    /// # Panics
    ///
    /// Panics if `digit > 9`.
    pub fn set_digit(&mut self, host: &mut H, digit: u8) -> TransitionReport {
        let next = encode(digit);
        let report = self
            .transitions
            .reconcile(host, &self.segments, self.current, next);
        // The target is authoritative even while segments are still moving
        self.current = next;

        if !report.is_empty() {
            debug!(
                "Quadrant {:?} -> {} ({} shown, {} hidden, {} skipped)",
                self.position, digit, report.shown, report.hidden, report.skipped
            );
        }
        report
    }

    /// Cancel running transitions and release every layer of the quadrant
    pub fn destroy(mut self, host: &mut H) {
        self.transitions.cancel_all(host);
        host.destroy_layer(self.container);
        info!("Destroyed quadrant {:?}", self.position);
    }

    pub fn position(&self) -> QuadrantPosition {
        self.position
    }

    /// Mask of the digit being displayed (or animated towards)
    pub fn current_mask(&self) -> SegmentMask {
        self.current
    }

    pub fn container(&self) -> H::Layer {
        self.container
    }

    pub fn point_layers(&self) -> &[H::Layer; POINT_COUNT] {
        &self.points
    }

    pub fn segment_layer(&self, segment: SegmentId) -> H::Layer {
        self.segments[segment.index()]
    }

    pub fn active_transition(&self, segment: SegmentId) -> Option<H::Animation> {
        self.transitions.active(segment)
    }
}
