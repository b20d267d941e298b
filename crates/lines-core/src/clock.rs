//! Clock readings, 12/24-hour folding and minute-tick signalling.
//!
//! The watch face shows `HH:MM` as four digits. A [`ClockReading`] holds a
//! validated 24-hour time; [`ClockStyle`] folds the hour for display and
//! [`ClockReading::digits`] splits the result into the per-quadrant digits,
//! which are always in `0..=9`.
//!
//! Hosts deliver the periodic tick through a [`MinuteSignal`].
//! [`MinuteTicker`] de-duplicates readings so the signal only fires when the
//! displayed minute actually changes.

use chrono::Timelike;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use serde::{Deserialize, Serialize};

use crate::error::{WatchError, WatchResult};

/// Hour display preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClockStyle {
    /// 1-12
    #[default]
    TwelveHour,
    /// 0-23
    TwentyFourHour,
}

impl ClockStyle {
    /// Hour as shown on the face for a raw 0-23 hour
    pub const fn display_hour(self, hour: u8) -> u8 {
        match self {
            Self::TwentyFourHour => hour,
            Self::TwelveHour => match hour % 12 {
                0 => 12,
                folded => folded,
            },
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::TwelveHour => Self::TwentyFourHour,
            Self::TwentyFourHour => Self::TwelveHour,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::TwelveHour => "12h",
            Self::TwentyFourHour => "24h",
        }
    }
}

/// Wall-clock time at minute resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockReading {
    hour: u8,
    minute: u8,
}

impl ClockReading {
    /// Validated reading, hour 0-23 and minute 0-59
    pub const fn new(hour: u8, minute: u8) -> WatchResult<Self> {
        if hour < 24 && minute < 60 {
            Ok(Self { hour, minute })
        } else {
            Err(WatchError::InvalidTime { hour, minute })
        }
    }

    /// Reading from any chrono time value
    pub fn from_time<T: Timelike>(time: &T) -> Self {
        // chrono guarantees hour < 24 and minute < 60
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }

    pub const fn hour(self) -> u8 {
        self.hour
    }

    pub const fn minute(self) -> u8 {
        self.minute
    }

    /// Reading `minutes` later, wrapping at midnight
    pub const fn plus_minutes(self, minutes: u32) -> Self {
        let total = (self.hour as u32 * 60 + self.minute as u32 + minutes % 1440) % 1440;
        Self {
            hour: (total / 60) as u8,
            minute: (total % 60) as u8,
        }
    }

    /// Digits for the four quadrants: hour tens, hour units, minute tens,
    /// minute units
    pub const fn digits(self, style: ClockStyle) -> [u8; 4] {
        let hour = style.display_hour(self.hour);
        [hour / 10, hour % 10, self.minute / 10, self.minute % 10]
    }
}

/// Periodic minute signal shared between a clock source and the UI loop
pub type MinuteSignal = Signal<CriticalSectionRawMutex, ClockReading>;

/// Raises a [`MinuteSignal`] once per displayed minute
#[derive(Debug, Default)]
pub struct MinuteTicker {
    last: Option<ClockReading>,
}

impl MinuteTicker {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Feed the latest clock reading; signals and returns `true` when the
    /// minute differs from the previous one.
    pub fn observe(&mut self, reading: ClockReading, signal: &MinuteSignal) -> bool {
        if self.last == Some(reading) {
            return false;
        }
        self.last = Some(reading);
        signal.signal(reading);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twelve_hour_folding() {
        assert_eq!(ClockStyle::TwelveHour.display_hour(0), 12);
        assert_eq!(ClockStyle::TwelveHour.display_hour(12), 12);
        assert_eq!(ClockStyle::TwelveHour.display_hour(13), 1);
        assert_eq!(ClockStyle::TwelveHour.display_hour(23), 11);
        assert_eq!(ClockStyle::TwentyFourHour.display_hour(13), 13);
        assert_eq!(ClockStyle::TwentyFourHour.display_hour(0), 0);
    }

    #[test]
    fn test_digits_are_always_in_range() {
        for style in [ClockStyle::TwelveHour, ClockStyle::TwentyFourHour] {
            for hour in 0..24 {
                for minute in 0..60 {
                    let reading = ClockReading::new(hour, minute).unwrap();
                    for digit in reading.digits(style) {
                        assert!(digit <= 9, "{:?} {:?}", reading, style);
                    }
                }
            }
        }
    }

    #[test]
    fn test_digits_decompose_folded_hour() {
        let reading = ClockReading::new(13, 47).unwrap();
        assert_eq!(reading.digits(ClockStyle::TwelveHour), [0, 1, 4, 7]);
        assert_eq!(reading.digits(ClockStyle::TwentyFourHour), [1, 3, 4, 7]);

        let midnight = ClockReading::new(0, 5).unwrap();
        assert_eq!(midnight.digits(ClockStyle::TwelveHour), [1, 2, 0, 5]);
        assert_eq!(midnight.digits(ClockStyle::TwentyFourHour), [0, 0, 0, 5]);
    }

    #[test]
    fn test_new_rejects_invalid_time() {
        assert_eq!(
            ClockReading::new(24, 0),
            Err(WatchError::InvalidTime { hour: 24, minute: 0 })
        );
        assert!(ClockReading::new(23, 60).is_err());
    }

    #[test]
    fn test_plus_minutes_wraps_midnight() {
        let reading = ClockReading::new(23, 59).unwrap();
        assert_eq!(reading.plus_minutes(1), ClockReading::new(0, 0).unwrap());
        assert_eq!(reading.plus_minutes(1440), reading);
    }

    #[test]
    fn test_from_chrono_time() {
        let time = chrono::NaiveTime::from_hms_opt(9, 41, 30).unwrap();
        assert_eq!(ClockReading::from_time(&time), ClockReading::new(9, 41).unwrap());
    }

    #[test]
    fn test_minute_ticker_signals_once_per_minute() {
        let signal = MinuteSignal::new();
        let mut ticker = MinuteTicker::new();
        let first = ClockReading::new(10, 0).unwrap();

        assert!(ticker.observe(first, &signal));
        assert_eq!(signal.try_take(), Some(first));

        assert!(!ticker.observe(first, &signal));
        assert_eq!(signal.try_take(), None);

        let next = first.plus_minutes(1);
        assert!(ticker.observe(next, &signal));
        assert!(signal.signaled());
        assert_eq!(signal.try_take(), Some(next));
    }
}
