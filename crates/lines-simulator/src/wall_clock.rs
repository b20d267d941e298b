//! Simulated wall clock running on a background thread.
//!
//! The thread accumulates simulated time at the configured speed-up and
//! feeds every reading to a [`MinuteTicker`], which raises
//! [`MINUTE_SIGNAL`] whenever the displayed minute changes. The UI loop only
//! ever sees the signal.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use lines_core::{ClockReading, MinuteSignal, MinuteTicker};
use log::{debug, info};

/// Raised once per simulated minute
pub static MINUTE_SIGNAL: MinuteSignal = MinuteSignal::new();

/// Real time between two clock samples
const SAMPLE_INTERVAL: Duration = Duration::from_millis(50);

/// Speed-up of fast mode: one minute per second
const FAST_TIME_SCALE: u32 = 60;

const MILLIS_PER_MINUTE: u64 = 60_000;

#[derive(Debug)]
struct ClockState {
    start: ClockReading,
    /// Simulated milliseconds since `start`
    elapsed_ms: AtomicU64,
    time_scale: AtomicU32,
    fast: AtomicBool,
    running: AtomicBool,
}

/// Handle shared between the UI loop and the clock thread
#[derive(Debug, Clone)]
pub struct SimulatedClock {
    state: Arc<ClockState>,
}

impl SimulatedClock {
    pub fn new(start: ClockReading, time_scale: u32) -> Self {
        Self {
            state: Arc::new(ClockState {
                start,
                elapsed_ms: AtomicU64::new(0),
                time_scale: AtomicU32::new(time_scale.max(1)),
                fast: AtomicBool::new(false),
                running: AtomicBool::new(true),
            }),
        }
    }

    /// Current simulated reading
    pub fn reading(&self) -> ClockReading {
        let minutes = self.state.elapsed_ms.load(Ordering::Relaxed) / MILLIS_PER_MINUTE;
        self.state.start.plus_minutes((minutes % 1440) as u32)
    }

    /// Jump to the start of the next minute
    pub fn skip_minute(&self) {
        let elapsed = self.state.elapsed_ms.load(Ordering::Relaxed);
        let next = (elapsed / MILLIS_PER_MINUTE + 1) * MILLIS_PER_MINUTE;
        self.state.elapsed_ms.store(next, Ordering::Relaxed);
        debug!("Skipped to {:?}", self.reading());
    }

    /// Switch between the configured speed and one minute per second;
    /// returns whether fast mode is now on
    pub fn toggle_fast(&self) -> bool {
        !self.state.fast.fetch_xor(true, Ordering::Relaxed)
    }

    fn time_scale(&self) -> u64 {
        if self.state.fast.load(Ordering::Relaxed) {
            FAST_TIME_SCALE as u64
        } else {
            self.state.time_scale.load(Ordering::Relaxed) as u64
        }
    }

    fn advance(&self, real: Duration) {
        let simulated = real.as_millis() as u64 * self.time_scale();
        self.state.elapsed_ms.fetch_add(simulated, Ordering::Relaxed);
    }

    /// Start the clock thread
    pub fn spawn(&self) -> thread::JoinHandle<()> {
        let clock = self.clone();
        thread::spawn(move || {
            info!("Clock thread started at {:?}", clock.reading());
            let mut ticker = MinuteTicker::new();
            while clock.state.running.load(Ordering::Relaxed) {
                ticker.observe(clock.reading(), &MINUTE_SIGNAL);
                thread::sleep(SAMPLE_INTERVAL);
                clock.advance(SAMPLE_INTERVAL);
            }
            info!("Clock thread stopped");
        })
    }

    pub fn stop(&self) {
        self.state.running.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_follows_simulated_time() {
        let clock = SimulatedClock::new(ClockReading::new(23, 58).unwrap(), 1);
        clock.advance(Duration::from_secs(59));
        assert_eq!(clock.reading(), ClockReading::new(23, 58).unwrap());

        clock.advance(Duration::from_secs(1));
        assert_eq!(clock.reading(), ClockReading::new(23, 59).unwrap());

        clock.skip_minute();
        assert_eq!(clock.reading(), ClockReading::new(0, 0).unwrap());
    }

    #[test]
    fn test_fast_mode_runs_a_minute_per_second() {
        let clock = SimulatedClock::new(ClockReading::new(6, 0).unwrap(), 1);
        assert!(clock.toggle_fast());
        clock.advance(Duration::from_secs(2));
        assert_eq!(clock.reading(), ClockReading::new(6, 2).unwrap());

        assert!(!clock.toggle_fast());
        clock.advance(Duration::from_secs(2));
        assert_eq!(clock.reading(), ClockReading::new(6, 2).unwrap());
    }
}
