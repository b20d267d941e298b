//! Simulator settings read from the environment.
//!
//! | Variable            | Format            | Default               |
//! |---------------------|-------------------|-----------------------|
//! | `LINES_CLOCK_STYLE` | `12h` or `24h`    | `12h`                 |
//! | `LINES_START_TIME`  | `HH:MM`           | local time            |
//! | `LINES_TIME_SCALE`  | integer >= 1      | `1` (real time)       |
//! | `LINES_CONFIG`      | path to a postcard-encoded `WatchConfig` | defaults |
//!
//! Invalid values are logged and replaced by the default.

use std::env;
use std::path::Path;

use chrono::Local;
use lines_core::{ClockReading, ClockStyle, WatchConfig};
use log::{info, warn};

pub const CLOCK_STYLE_VAR: &str = "LINES_CLOCK_STYLE";
pub const START_TIME_VAR: &str = "LINES_START_TIME";
pub const TIME_SCALE_VAR: &str = "LINES_TIME_SCALE";
pub const CONFIG_VAR: &str = "LINES_CONFIG";

#[derive(Debug, Clone, Copy)]
pub struct SimulatorSettings {
    /// Device preference reported by the simulated clock
    pub clock_style: ClockStyle,
    pub start_time: ClockReading,
    /// Simulated seconds per real second
    pub time_scale: u32,
    pub watch_config: WatchConfig,
}

impl SimulatorSettings {
    /// Load `.env` if present, then read the `LINES_*` variables
    pub fn from_env() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded settings from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => warn!("Ignoring .env file: {}", e),
        }

        let clock_style = read_var(CLOCK_STYLE_VAR, parse_clock_style).unwrap_or_default();
        let start_time = read_var(START_TIME_VAR, parse_start_time)
            .unwrap_or_else(|| ClockReading::from_time(&Local::now()));
        let time_scale = read_var(TIME_SCALE_VAR, parse_time_scale).unwrap_or(1);
        let watch_config = env::var(CONFIG_VAR)
            .ok()
            .and_then(|path| load_watch_config(Path::new(&path)))
            .unwrap_or_default();

        Self {
            clock_style,
            start_time,
            time_scale,
            watch_config,
        }
    }
}

fn read_var<T>(name: &str, parse: fn(&str) -> Option<T>) -> Option<T> {
    let value = env::var(name).ok()?;
    let parsed = parse(value.trim());
    if parsed.is_none() {
        warn!("Invalid {}={:?}, using default", name, value);
    }
    parsed
}

/// `12h`/`12` or `24h`/`24`
pub fn parse_clock_style(value: &str) -> Option<ClockStyle> {
    match value.to_ascii_lowercase().as_str() {
        "12" | "12h" => Some(ClockStyle::TwelveHour),
        "24" | "24h" => Some(ClockStyle::TwentyFourHour),
        _ => None,
    }
}

/// `HH:MM` in 24-hour notation
pub fn parse_start_time(value: &str) -> Option<ClockReading> {
    let (hour, minute) = value.split_once(':')?;
    let hour = hour.parse().ok()?;
    let minute = minute.parse().ok()?;
    ClockReading::new(hour, minute).ok()
}

pub fn parse_time_scale(value: &str) -> Option<u32> {
    value.parse().ok().filter(|scale| *scale >= 1)
}

fn load_watch_config(path: &Path) -> Option<WatchConfig> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Cannot read {}: {}", path.display(), e);
            return None;
        }
    };

    match WatchConfig::from_bytes(&bytes) {
        Ok(config) => {
            info!("Loaded watch config from {}: {:?}", path.display(), config);
            Some(config)
        }
        Err(e) => {
            warn!("Cannot decode {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clock_style() {
        assert_eq!(parse_clock_style("24h"), Some(ClockStyle::TwentyFourHour));
        assert_eq!(parse_clock_style("12H"), Some(ClockStyle::TwelveHour));
        assert_eq!(parse_clock_style("24"), Some(ClockStyle::TwentyFourHour));
        assert_eq!(parse_clock_style("military"), None);
    }

    #[test]
    fn test_parse_start_time() {
        assert_eq!(parse_start_time("09:41"), ClockReading::new(9, 41).ok());
        assert_eq!(parse_start_time("0:00"), ClockReading::new(0, 0).ok());
        assert_eq!(parse_start_time("24:00"), None);
        assert_eq!(parse_start_time("12:60"), None);
        assert_eq!(parse_start_time("1200"), None);
    }

    #[test]
    fn test_parse_time_scale() {
        assert_eq!(parse_time_scale("60"), Some(60));
        assert_eq!(parse_time_scale("0"), None);
        assert_eq!(parse_time_scale("-3"), None);
    }
}
