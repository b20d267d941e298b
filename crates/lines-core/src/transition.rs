//! Segment transition engine.
//!
//! Reconciles the mask a quadrant currently displays with a newly requested
//! mask. Only segments whose bit differs (`previous ^ next`) are touched; each
//! of them gets a show animation (collapsed → visible) or a hide animation
//! (visible → collapsed).
//!
//! # Invariants
//!
//! - At most one transition is registered per segment. Starting a new one
//!   always cancels the registered one first, even mid-flight.
//! - New transitions start from the nominal endpoint rectangle, not from
//!   wherever a cancelled animation left the segment. Minute ticks are far
//!   apart compared to the animation, so the jump this can cause is not
//!   observed in practice.
//! - Segments whose state does not change keep their running animation.
//!
//! A failed schedule is not an error for the caller: the segment is snapped
//! to its target rectangle, the failure is logged and counted in
//! [`TransitionReport::skipped`].

use embedded_graphics::primitives::Rectangle;
use log::{debug, warn};

use crate::config::TransitionConfig;
use crate::digit::SegmentMask;
use crate::geometry::{SEGMENT_COUNT, SegmentId};
use crate::host::FrameAnimator;

/// Actions issued by one reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransitionReport {
    /// Segments sent towards their visible rectangle
    pub shown: u8,
    /// Segments sent towards their collapsed rectangle
    pub hidden: u8,
    /// Actions whose animation could not be scheduled
    pub skipped: u8,
}

impl TransitionReport {
    /// Show plus hide actions
    pub const fn actions(&self) -> u32 {
        self.shown as u32 + self.hidden as u32
    }

    pub const fn is_empty(&self) -> bool {
        self.actions() == 0
    }
}

/// Per-segment transition slots of one quadrant
pub struct SegmentTransitions<H: FrameAnimator> {
    active: [Option<H::Animation>; SEGMENT_COUNT],
    config: TransitionConfig,
}

impl<H: FrameAnimator> SegmentTransitions<H> {
    pub fn new(config: TransitionConfig) -> Self {
        Self {
            active: [None; SEGMENT_COUNT],
            config,
        }
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// Transition registered for `segment`, if any.
    ///
    /// The handle may refer to an animation that has since finished; ask the
    /// host with [`FrameAnimator::is_animating`].
    pub fn active(&self, segment: SegmentId) -> Option<H::Animation> {
        self.active[segment.index()]
    }

    /// Issue the show/hide actions that take `previous` to `next`.
    ///
    /// `layers[i]` is the layer of segment `i`.
    pub fn reconcile(
        &mut self,
        host: &mut H,
        layers: &[H::Layer; SEGMENT_COUNT],
        previous: SegmentMask,
        next: SegmentMask,
    ) -> TransitionReport {
        let mut report = TransitionReport::default();
        let changed = previous.changed(next);
        if changed.is_empty() {
            return report;
        }

        for segment in changed.segments() {
            let layer = layers[segment.index()];
            let scheduled = if next.contains(segment) {
                report.shown += 1;
                self.show(host, layer, segment)
            } else {
                report.hidden += 1;
                self.hide(host, layer, segment)
            };
            if !scheduled {
                report.skipped += 1;
            }
        }
        report
    }

    fn show(&mut self, host: &mut H, layer: H::Layer, segment: SegmentId) -> bool {
        let shape = segment.shape();
        debug!("Showing segment {}", segment.index());
        self.start(host, layer, segment, shape.collapsed, shape.visible)
    }

    fn hide(&mut self, host: &mut H, layer: H::Layer, segment: SegmentId) -> bool {
        let shape = segment.shape();
        debug!("Hiding segment {}", segment.index());
        self.start(host, layer, segment, shape.visible, shape.collapsed)
    }

    /// Replace the segment's transition; returns `false` if the animation
    /// could not be scheduled
    fn start(
        &mut self,
        host: &mut H,
        layer: H::Layer,
        segment: SegmentId,
        from: Rectangle,
        to: Rectangle,
    ) -> bool {
        if let Some(running) = self.active[segment.index()].take() {
            if host.is_animating(running) {
                debug!("Cancelling in-flight transition on segment {}", segment.index());
            }
            host.cancel_animation(running);
        }

        if self.config.is_instant() {
            snap(host, layer, to);
            return true;
        }

        match host.animate_frame(layer, from, to, self.config.duration(), self.config.curve) {
            Ok(animation) => {
                self.active[segment.index()] = Some(animation);
                true
            }
            Err(err) => {
                warn!(
                    "Skipping transition on segment {}: {}",
                    segment.index(),
                    err
                );
                snap(host, layer, to);
                false
            }
        }
    }

    /// Cancel every registered transition
    pub fn cancel_all(&mut self, host: &mut H) {
        for slot in self.active.iter_mut() {
            if let Some(animation) = slot.take() {
                host.cancel_animation(animation);
            }
        }
    }
}

fn snap<H: FrameAnimator>(host: &mut H, layer: H::Layer, to: Rectangle) {
    match host.set_frame(layer, to) {
        Ok(()) => host.mark_dirty(layer),
        Err(err) => warn!("Could not place segment layer {:?}: {}", layer, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digit::encode;
    use crate::geometry::SEGMENTS;
    use crate::host::{DisplayTree, Fill};
    use crate::scene::{LayerId, Scene, WatchScene};
    use embassy_time::Instant;

    fn setup<const L: usize, const A: usize>(scene: &mut Scene<L, A>) -> [LayerId; SEGMENT_COUNT] {
        SegmentId::ALL.map(|segment| {
            scene
                .create_layer(None, segment.shape().collapsed, Fill::Transparent)
                .unwrap()
        })
    }

    fn seg(index: u8) -> SegmentId {
        SegmentId::new(index).unwrap()
    }

    #[test]
    fn test_eight_to_one_shows_three_segments() {
        let mut scene = WatchScene::new();
        let layers = setup(&mut scene);
        let mut transitions = SegmentTransitions::new(TransitionConfig::default());

        let report = transitions.reconcile(&mut scene, &layers, encode(8), encode(1));

        assert_eq!(report, TransitionReport { shown: 3, hidden: 0, skipped: 0 });
        assert_eq!(scene.live_animations(), 3);
        for index in [0u8, 1, 3] {
            let animation = transitions.active(seg(index)).unwrap();
            assert_eq!(
                scene.animation_target(animation),
                Some(SEGMENTS[index as usize].visible)
            );
        }
        for index in [2u8, 4, 5, 6, 7] {
            assert_eq!(transitions.active(seg(index)), None);
        }
    }

    #[test]
    fn test_same_mask_is_a_no_op() {
        let mut scene = WatchScene::new();
        let layers = setup(&mut scene);
        let mut transitions = SegmentTransitions::new(TransitionConfig::default());

        transitions.reconcile(&mut scene, &layers, encode(8), encode(4));
        let scheduled = scene.scheduled_total();
        let first = transitions.active(seg(1));

        let report = transitions.reconcile(&mut scene, &layers, encode(4), encode(4));

        assert!(report.is_empty());
        assert_eq!(scene.scheduled_total(), scheduled);
        assert_eq!(scene.cancelled_total(), 0);
        assert_eq!(transitions.active(seg(1)), first);
    }

    #[test]
    fn test_actions_equal_changed_bit_count() {
        for from in 0..10u8 {
            for to in 0..10u8 {
                let mut scene = WatchScene::new();
                let layers = setup(&mut scene);
                let mut transitions = SegmentTransitions::new(TransitionConfig::default());

                let report = transitions.reconcile(&mut scene, &layers, encode(from), encode(to));
                let changed = encode(from).changed(encode(to));

                assert_eq!(report.actions(), changed.count(), "{} -> {}", from, to);
                assert_eq!(scene.scheduled_total(), changed.count());
                for segment in SegmentId::ALL {
                    assert_eq!(
                        transitions.active(segment).is_some(),
                        changed.contains(segment),
                        "{} -> {} segment {:?}",
                        from,
                        to,
                        segment
                    );
                }
            }
        }
    }

    #[test]
    fn test_restart_cancels_in_flight_transition() {
        let mut scene = WatchScene::new();
        let layers = setup(&mut scene);
        let mut transitions = SegmentTransitions::new(TransitionConfig::default());

        // 8 -> 0 shows segment 3
        transitions.reconcile(&mut scene, &layers, encode(8), encode(0));
        let show = transitions.active(seg(3)).unwrap();
        scene.advance(Instant::from_millis(500));

        // 0 -> 8 hides it again before the show finished
        let report = transitions.reconcile(&mut scene, &layers, encode(0), encode(8));
        let hide = transitions.active(seg(3)).unwrap();

        assert_eq!(report, TransitionReport { shown: 0, hidden: 1, skipped: 0 });
        assert_ne!(show, hide);
        assert!(!scene.is_animating(show));
        assert_eq!(scene.cancelled_total(), 1);
        assert_eq!(scene.animations_on(layers[3]), 1);
        assert_eq!(scene.animation_target(hide), Some(SEGMENTS[3].collapsed));
        // Restarted from the nominal visible rectangle
        assert_eq!(scene.frame(layers[3]), Some(SEGMENTS[3].visible));
    }

    #[test]
    fn test_unchanged_segments_keep_their_animation() {
        let mut scene = WatchScene::new();
        let layers = setup(&mut scene);
        let mut transitions = SegmentTransitions::new(TransitionConfig::default());

        transitions.reconcile(&mut scene, &layers, encode(8), encode(1));
        let lower = transitions.active(seg(1));
        let centre = transitions.active(seg(3));

        // 1 -> 7 flips segments 0 and 7 only
        let report = transitions.reconcile(&mut scene, &layers, encode(1), encode(7));

        assert_eq!(report, TransitionReport { shown: 1, hidden: 1, skipped: 0 });
        assert_eq!(transitions.active(seg(1)), lower);
        assert_eq!(transitions.active(seg(3)), centre);
        assert!(scene.is_animating(lower.unwrap()));
        assert_eq!(scene.cancelled_total(), 1);
    }

    #[test]
    fn test_exhausted_pool_skips_and_snaps() {
        let mut scene = Scene::<8, 2>::new();
        let layers = setup(&mut scene);
        let mut transitions = SegmentTransitions::new(TransitionConfig::default());

        let report = transitions.reconcile(&mut scene, &layers, encode(8), encode(1));

        assert_eq!(report, TransitionReport { shown: 3, hidden: 0, skipped: 1 });
        assert_eq!(scene.live_animations(), 2);
        // Segment 3 is the last to be scheduled and lands directly on target
        assert_eq!(transitions.active(seg(3)), None);
        assert_eq!(scene.frame(layers[3]), Some(SEGMENTS[3].visible));
    }

    #[test]
    fn test_instant_mode_snaps_without_animating() {
        let mut scene = WatchScene::new();
        let layers = setup(&mut scene);
        let mut transitions = SegmentTransitions::new(TransitionConfig::instant());

        let report = transitions.reconcile(&mut scene, &layers, encode(8), encode(2));

        assert_eq!(report.shown, 2);
        assert_eq!(report.skipped, 0);
        assert_eq!(scene.scheduled_total(), 0);
        assert_eq!(scene.frame(layers[2]), Some(SEGMENTS[2].visible));
        assert_eq!(scene.frame(layers[7]), Some(SEGMENTS[7].visible));
        assert_eq!(scene.frame(layers[0]), Some(SEGMENTS[0].collapsed));
    }

    #[test]
    fn test_cancel_all_clears_slots() {
        let mut scene = WatchScene::new();
        let layers = setup(&mut scene);
        let mut transitions = SegmentTransitions::new(TransitionConfig::default());

        transitions.reconcile(&mut scene, &layers, encode(8), encode(7));
        transitions.cancel_all(&mut scene);

        assert_eq!(scene.live_animations(), 0);
        for segment in SegmentId::ALL {
            assert_eq!(transitions.active(segment), None);
        }
        // Nothing registered: a second pass is harmless
        transitions.cancel_all(&mut scene);
    }
}
