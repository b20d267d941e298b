//! Watch face composition root.
//!
//! [`WatchFace`] owns everything the face puts on screen: the full-screen
//! window layer, the cross decoration and the four digit quadrants. It is
//! driven by three lifecycle calls from the host: [`WatchFace::on_start`],
//! [`WatchFace::on_tick`] once per minute, and [`WatchFace::on_stop`].

use heapless::Vec;
use log::{debug, info};

use crate::clock::{ClockReading, ClockStyle};
use crate::config::WatchConfig;
use crate::error::WatchResult;
use crate::geometry::{CROSS_BARS, QuadrantPosition, SCREEN_BOUNDS};
use crate::host::{Fill, WatchHost};
use crate::palette::{COLOR_BACKGROUND, COLOR_INK};
use crate::quadrant::Quadrant;
use crate::transition::TransitionReport;

const QUADRANT_COUNT: usize = QuadrantPosition::ALL.len();

/// What one minute tick displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub reading: ClockReading,
    pub style: ClockStyle,
    /// Hour tens, hour units, minute tens, minute units
    pub digits: [u8; QUADRANT_COUNT],
    /// Per quadrant, in [`QuadrantPosition::ALL`] order
    pub quadrants: [TransitionReport; QUADRANT_COUNT],
}

impl TickReport {
    /// Show and hide actions across all quadrants
    pub fn actions(&self) -> u32 {
        self.quadrants.iter().map(TransitionReport::actions).sum()
    }

    pub fn skipped(&self) -> u32 {
        self.quadrants.iter().map(|report| report.skipped as u32).sum()
    }
}

pub struct WatchFace<H: WatchHost> {
    window: H::Layer,
    cross: H::Layer,
    quadrants: Vec<Quadrant<H>, QUADRANT_COUNT>,
    config: WatchConfig,
}

impl<H: WatchHost> WatchFace<H> {
    /// Start the face with default settings
    pub fn on_start(host: &mut H) -> WatchResult<Self> {
        Self::on_start_with(host, WatchConfig::default())
    }

    /// Build the layer tree, show the current time and subscribe to minute
    /// ticks.
    ///
    /// On failure everything created so far is released and the host is left
    /// unsubscribed.
    pub fn on_start_with(host: &mut H, config: WatchConfig) -> WatchResult<Self> {
        let window = host.create_layer(None, SCREEN_BOUNDS, Fill::Solid(COLOR_BACKGROUND))?;

        let (cross, quadrants) = match Self::build(host, window, &config) {
            Ok(parts) => parts,
            Err(err) => {
                host.destroy_layer(window);
                return Err(err);
            }
        };

        let mut face = Self {
            window,
            cross,
            quadrants,
            config,
        };

        let report = face.on_tick(host);
        if let Err(err) = host.subscribe_minute_ticks() {
            face.on_stop(host);
            return Err(err.into());
        }

        info!(
            "Watch face started at {:02}:{:02} ({})",
            report.reading.hour(),
            report.reading.minute(),
            report.style.label()
        );
        Ok(face)
    }

    fn build(
        host: &mut H,
        window: H::Layer,
        config: &WatchConfig,
    ) -> WatchResult<(H::Layer, Vec<Quadrant<H>, QUADRANT_COUNT>)> {
        let cross = host.create_layer(Some(window), SCREEN_BOUNDS, Fill::Rects(&CROSS_BARS, COLOR_INK))?;

        let mut quadrants = Vec::new();
        for position in QuadrantPosition::ALL {
            let quadrant = Quadrant::create(host, Some(window), position, config.transition)?;
            if let Err(extra) = quadrants.push(quadrant) {
                extra.destroy(host);
            }
        }
        Ok((cross, quadrants))
    }

    /// Show the host's current time.
    ///
    /// Quadrants are updated in [`QuadrantPosition::ALL`] order; unchanged
    /// digits issue no actions.
    pub fn on_tick(&mut self, host: &mut H) -> TickReport {
        let reading = host.now();
        let style = self.config.effective_style(host.clock_style());
        let digits = reading.digits(style);

        let mut reports = [TransitionReport::default(); QUADRANT_COUNT];
        for ((quadrant, digit), report) in self
            .quadrants
            .iter_mut()
            .zip(digits)
            .zip(reports.iter_mut())
        {
            *report = quadrant.set_digit(host, digit);
        }

        debug!(
            "Tick {:02}:{:02} -> {}{}:{}{}",
            reading.hour(),
            reading.minute(),
            digits[0],
            digits[1],
            digits[2],
            digits[3]
        );

        TickReport {
            reading,
            style,
            digits,
            quadrants: reports,
        }
    }

    /// Unsubscribe and release every layer and animation
    pub fn on_stop(self, host: &mut H) {
        host.unsubscribe_minute_ticks();
        for quadrant in self.quadrants {
            quadrant.destroy(host);
        }
        host.destroy_layer(self.cross);
        host.destroy_layer(self.window);
        info!("Watch face stopped");
    }

    pub fn quadrant(&self, position: QuadrantPosition) -> &Quadrant<H> {
        &self.quadrants[position.index()]
    }

    pub fn window(&self) -> H::Layer {
        self.window
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }
}
