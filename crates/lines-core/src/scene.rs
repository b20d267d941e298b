//! In-memory display host.
//!
//! [`Scene`] is a retained layer tree with a fixed-size animation pool and a
//! settable wall clock. It implements every trait in [`crate::host`], so the
//! watch face runs on it unchanged. The desktop simulator renders it into an
//! SDL window and the unit tests use it to observe what the engine scheduled.
//!
//! Handles are generational: once a layer or animation is released its handle
//! never aliases a newer one, and operations on it are ignored.
//!
//! Frame callbacks are explicit: [`Scene::advance`] moves the scene clock and
//! steps every live animation, [`Scene::render`] draws the tree.

use embassy_time::{Duration, Instant};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::{debug, trace};

use crate::clock::{ClockReading, ClockStyle};
use crate::error::HostError;
use crate::host::{DisplayTree, Fill, FrameAnimator, MinuteTicks, WallClock};
use crate::interpolation::{Curve, PROGRESS_MAX, interpolate_rect, progress};

/// Scene sized for one watch face: window, cross, 4 x (container, 2 points,
/// 8 segments) and one animation per segment
pub type WatchScene = Scene<48, 32>;

// ---------------------------------------------------------------------------
// Generational pool
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Handle {
    index: u16,
    generation: u16,
}

struct Slot<T> {
    generation: u16,
    value: Option<T>,
}

struct Pool<T, const N: usize> {
    slots: [Slot<T>; N],
}

impl<T, const N: usize> Pool<T, N> {
    fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| Slot {
                generation: 0,
                value: None,
            }),
        }
    }

    fn insert(&mut self, value: T) -> Option<Handle> {
        let (index, slot) = self
            .slots
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| slot.value.is_none())?;
        slot.value = Some(value);
        Some(Handle {
            index: index as u16,
            generation: slot.generation,
        })
    }

    fn slot(&self, handle: Handle) -> Option<&Slot<T>> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
    }

    fn get(&self, handle: Handle) -> Option<&T> {
        self.slot(handle).and_then(|slot| slot.value.as_ref())
    }

    fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    fn remove(&mut self, handle: Handle) -> Option<T> {
        let slot = self
            .slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)?;
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        Some(value)
    }

    fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|value| {
                (
                    Handle {
                        index: index as u16,
                        generation: slot.generation,
                    },
                    value,
                )
            })
        })
    }

    fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.value.is_some()).count()
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// Handle to a layer of a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(Handle);

/// Handle to a frame animation of a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationId(Handle);

struct LayerNode {
    parent: Option<LayerId>,
    frame: Rectangle,
    fill: Fill,
}

struct FrameAnimation {
    layer: LayerId,
    from: Rectangle,
    to: Rectangle,
    start: Instant,
    duration: Duration,
    curve: Curve,
}

/// Retained layer tree with `LAYERS` layer slots and `ANIMATIONS`
/// concurrent frame animations
pub struct Scene<const LAYERS: usize, const ANIMATIONS: usize> {
    layers: Pool<LayerNode, LAYERS>,
    animations: Pool<FrameAnimation, ANIMATIONS>,
    now: Instant,
    clock: ClockReading,
    clock_style: ClockStyle,
    subscribed: bool,
    dirty: bool,
    scheduled_total: u32,
    cancelled_total: u32,
}

impl<const LAYERS: usize, const ANIMATIONS: usize> Default for Scene<LAYERS, ANIMATIONS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const LAYERS: usize, const ANIMATIONS: usize> Scene<LAYERS, ANIMATIONS> {
    /// Empty scene at time zero, midnight, 12-hour style
    pub fn new() -> Self {
        Self {
            layers: Pool::new(),
            animations: Pool::new(),
            now: Instant::from_ticks(0),
            clock: ClockReading::default(),
            clock_style: ClockStyle::default(),
            subscribed: false,
            dirty: false,
            scheduled_total: 0,
            cancelled_total: 0,
        }
    }

    // --- Clock -------------------------------------------------------------

    pub fn set_clock(&mut self, reading: ClockReading) {
        self.clock = reading;
    }

    pub fn set_clock_style(&mut self, style: ClockStyle) {
        self.clock_style = style;
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    // --- Frame callbacks ---------------------------------------------------

    /// Time of the last frame callback
    pub fn scene_time(&self) -> Instant {
        self.now
    }

    /// Move the scene clock to `now` and step every live animation.
    ///
    /// Finished animations land exactly on their target and are retired.
    /// Returns the number of animations still running.
    pub fn advance(&mut self, now: Instant) -> usize {
        if now > self.now {
            self.now = now;
        }

        let mut running = 0;
        for slot in self.animations.slots.iter_mut() {
            let Some(animation) = slot.value.as_ref() else {
                continue;
            };

            let elapsed = self.now.saturating_duration_since(animation.start);
            let linear = progress(elapsed, animation.duration);
            let frame = interpolate_rect(&animation.from, &animation.to, animation.curve.apply(linear));

            if let Some(node) = self.layers.get_mut(animation.layer.0) {
                node.frame = frame;
                self.dirty = true;
            }

            if linear >= PROGRESS_MAX {
                trace!("Animation on {:?} finished", animation.layer);
                slot.value = None;
                slot.generation = slot.generation.wrapping_add(1);
            } else {
                running += 1;
            }
        }
        running
    }

    // --- Rendering ---------------------------------------------------------

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Draw every root layer and its descendants, parents first, each clipped
    /// to its parent
    pub fn render<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let clip = target.bounding_box();
        for (handle, node) in self.layers.iter() {
            if node.parent.is_none() {
                self.draw_layer(LayerId(handle), Point::zero(), clip, target)?;
            }
        }
        Ok(())
    }

    fn draw_layer<D>(
        &self,
        layer: LayerId,
        origin: Point,
        clip: Rectangle,
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(node) = self.layers.get(layer.0) else {
            return Ok(());
        };

        let absolute = Rectangle::new(origin + node.frame.top_left, node.frame.size);
        let visible = absolute.intersection(&clip);

        match node.fill {
            Fill::Transparent => {}
            Fill::Solid(color) => {
                if !visible.is_zero_sized() {
                    target.fill_solid(&visible, color)?;
                }
            }
            Fill::Rects(rects, color) => {
                for rect in rects {
                    let area = Rectangle::new(absolute.top_left + rect.top_left, rect.size)
                        .intersection(&visible);
                    if !area.is_zero_sized() {
                        target.fill_solid(&area, color)?;
                    }
                }
            }
        }

        for (handle, child) in self.layers.iter() {
            if child.parent == Some(layer) {
                self.draw_layer(LayerId(handle), absolute.top_left, visible, target)?;
            }
        }
        Ok(())
    }

    // --- Inspection --------------------------------------------------------

    /// Number of live layers
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Number of running animations
    pub fn live_animations(&self) -> usize {
        self.animations.len()
    }

    /// Number of running animations driving `layer`
    pub fn animations_on(&self, layer: LayerId) -> usize {
        self.animations
            .iter()
            .filter(|(_, animation)| animation.layer == layer)
            .count()
    }

    /// Target frame of a running animation
    pub fn animation_target(&self, animation: AnimationId) -> Option<Rectangle> {
        self.animations.get(animation.0).map(|animation| animation.to)
    }

    /// Animations scheduled since creation
    pub fn scheduled_total(&self) -> u32 {
        self.scheduled_total
    }

    /// Animations cancelled while still running
    pub fn cancelled_total(&self) -> u32 {
        self.cancelled_total
    }

    /// Release layers whose parent is gone, and animations whose layer is
    /// gone, until nothing changes
    fn prune_orphans(&mut self) {
        loop {
            let orphan = self.layers.iter().find_map(|(handle, node)| {
                node.parent
                    .filter(|parent| self.layers.get(parent.0).is_none())
                    .map(|_| handle)
            });
            match orphan {
                Some(handle) => {
                    self.layers.remove(handle);
                }
                None => break,
            }
        }

        loop {
            let orphan = self
                .animations
                .iter()
                .find(|(_, animation)| self.layers.get(animation.layer.0).is_none())
                .map(|(handle, _)| handle);
            match orphan {
                Some(handle) => {
                    self.animations.remove(handle);
                }
                None => break,
            }
        }
    }
}

impl<const LAYERS: usize, const ANIMATIONS: usize> DisplayTree for Scene<LAYERS, ANIMATIONS> {
    type Layer = LayerId;

    fn create_layer(
        &mut self,
        parent: Option<LayerId>,
        frame: Rectangle,
        fill: Fill,
    ) -> Result<LayerId, HostError> {
        if let Some(parent) = parent
            && self.layers.get(parent.0).is_none()
        {
            return Err(HostError::UnknownLayer);
        }

        let handle = self
            .layers
            .insert(LayerNode {
                parent,
                frame,
                fill,
            })
            .ok_or(HostError::LayerPoolExhausted { max: LAYERS })?;
        self.dirty = true;
        Ok(LayerId(handle))
    }

    fn destroy_layer(&mut self, layer: LayerId) {
        if self.layers.remove(layer.0).is_some() {
            debug!("Destroying layer {:?}", layer);
            self.prune_orphans();
            self.dirty = true;
        }
    }

    fn set_frame(&mut self, layer: LayerId, frame: Rectangle) -> Result<(), HostError> {
        let node = self.layers.get_mut(layer.0).ok_or(HostError::UnknownLayer)?;
        node.frame = frame;
        self.dirty = true;
        Ok(())
    }

    fn frame(&self, layer: LayerId) -> Option<Rectangle> {
        self.layers.get(layer.0).map(|node| node.frame)
    }

    fn mark_dirty(&mut self, layer: LayerId) {
        if self.layers.get(layer.0).is_some() {
            self.dirty = true;
        }
    }
}

impl<const LAYERS: usize, const ANIMATIONS: usize> FrameAnimator for Scene<LAYERS, ANIMATIONS> {
    type Animation = AnimationId;

    fn animate_frame(
        &mut self,
        layer: LayerId,
        from: Rectangle,
        to: Rectangle,
        duration: Duration,
        curve: Curve,
    ) -> Result<AnimationId, HostError> {
        let node = self.layers.get_mut(layer.0).ok_or(HostError::UnknownLayer)?;
        node.frame = from;
        self.dirty = true;

        let handle = self
            .animations
            .insert(FrameAnimation {
                layer,
                from,
                to,
                start: self.now,
                duration,
                curve,
            })
            .ok_or(HostError::AnimationPoolExhausted { max: ANIMATIONS })?;
        self.scheduled_total += 1;
        Ok(AnimationId(handle))
    }

    fn cancel_animation(&mut self, animation: AnimationId) {
        if self.animations.remove(animation.0).is_some() {
            self.cancelled_total += 1;
        }
    }

    fn is_animating(&self, animation: AnimationId) -> bool {
        self.animations.get(animation.0).is_some()
    }
}

impl<const LAYERS: usize, const ANIMATIONS: usize> WallClock for Scene<LAYERS, ANIMATIONS> {
    fn now(&self) -> ClockReading {
        self.clock
    }

    fn clock_style(&self) -> ClockStyle {
        self.clock_style
    }
}

impl<const LAYERS: usize, const ANIMATIONS: usize> MinuteTicks for Scene<LAYERS, ANIMATIONS> {
    fn subscribe_minute_ticks(&mut self) -> Result<(), HostError> {
        self.subscribed = true;
        Ok(())
    }

    fn unsubscribe_minute_ticks(&mut self) {
        self.subscribed = false;
    }
}
