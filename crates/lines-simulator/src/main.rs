//! Desktop simulator for the Lines watch face.
//!
//! Runs the lines-core [`WatchFace`] on an in-memory [`WatchScene`] and
//! renders it in an SDL2 window via `embedded-graphics-simulator`. A
//! background thread plays the role of the device clock.
//!
//! # Key bindings
//!
//! | Key   | Action                         |
//! |-------|--------------------------------|
//! | H     | Toggle 12/24-hour display      |
//! | Space | Advance one minute             |
//! | F     | Toggle fast time (1 min/s)     |
//! | Q     | Quit                           |
//!
//! Settings are read from the environment, see [`settings`].

mod settings;
mod wall_clock;

use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use log::{error, info};

use lines_core::geometry::{SCREEN_HEIGHT_PX, SCREEN_WIDTH_PX};
use lines_core::palette::COLOR_BACKGROUND;
use lines_core::{TickReport, WallClock, WatchFace, WatchScene};

use crate::settings::SimulatorSettings;
use crate::wall_clock::{MINUTE_SIGNAL, SimulatedClock};

// ---------------------------------------------------------------------------
// Display constants
// ---------------------------------------------------------------------------

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 3;

/// Target frame duration (~30 FPS).
const FRAME_DURATION: Duration = Duration::from_millis(33);

fn log_tick(report: &TickReport) {
    info!(
        "{:02}:{:02} -> {}{}:{}{} ({}, {} actions, {} skipped)",
        report.reading.hour(),
        report.reading.minute(),
        report.digits[0],
        report.digits[1],
        report.digits[2],
        report.digits[3],
        report.style.label(),
        report.actions(),
        report.skipped()
    );
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    info!("Starting Lines simulator");

    let settings = SimulatorSettings::from_env();
    info!(
        "Display: {}×{} (scale {}×), clock {} x{}",
        SCREEN_WIDTH_PX,
        SCREEN_HEIGHT_PX,
        WINDOW_SCALE,
        settings.clock_style.label(),
        settings.time_scale
    );
    info!("Keys: H=12/24h  Space=+1 min  F=Fast time  Q=Quit");

    // SDL2 display and window
    let mut display = SimulatorDisplay::<Rgb565>::new(Size::new(SCREEN_WIDTH_PX, SCREEN_HEIGHT_PX));
    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("Lines Simulator", &output_settings);

    // Device stand-in
    let mut scene = WatchScene::new();
    scene.advance(embassy_time::Instant::now());
    scene.set_clock(settings.start_time);
    scene.set_clock_style(settings.clock_style);

    let clock = SimulatedClock::new(settings.start_time, settings.time_scale);
    let clock_thread = clock.spawn();

    let mut face = match WatchFace::on_start_with(&mut scene, settings.watch_config) {
        Ok(face) => face,
        Err(e) => {
            error!("Failed to start watch face: {}", e);
            clock.stop();
            return;
        }
    };
    if face.config().clock_style.is_some() {
        info!("Clock style fixed by watch config, H has no effect");
    }

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    let _ = display.clear(COLOR_BACKGROUND);
    let _ = scene.render(&mut display);
    scene.mark_clean();
    window.update(&display);

    // -----------------------------------------------------------------------
    // Main loop
    // -----------------------------------------------------------------------
    'running: loop {
        let frame_start = Instant::now();

        // --- SDL events ---------------------------------------------------
        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,

                SimulatorEvent::KeyDown { keycode, .. } => match keycode {
                    Keycode::Q | Keycode::Escape => break 'running,
                    Keycode::H => {
                        let style = scene.clock_style().toggled();
                        info!("Clock style {}", style.label());
                        scene.set_clock_style(style);
                        log_tick(&face.on_tick(&mut scene));
                    }
                    Keycode::Space => clock.skip_minute(),
                    Keycode::F => {
                        let fast = clock.toggle_fast();
                        info!("Fast time {}", if fast { "on" } else { "off" });
                    }
                    _ => {}
                },

                _ => {}
            }
        }

        // --- Minute tick --------------------------------------------------
        if let Some(reading) = MINUTE_SIGNAL.try_take() {
            scene.set_clock(reading);
            if scene.is_subscribed() {
                log_tick(&face.on_tick(&mut scene));
            }
        }

        // --- Animation frame ----------------------------------------------
        scene.advance(embassy_time::Instant::now());

        // --- Render -------------------------------------------------------
        if scene.is_dirty() {
            let _ = display.clear(COLOR_BACKGROUND);
            let _ = scene.render(&mut display);
            scene.mark_clean();
        }

        window.update(&display);

        // --- Frame pacing -------------------------------------------------
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    face.on_stop(&mut scene);
    clock.stop();
    if clock_thread.join().is_err() {
        error!("Clock thread panicked");
    }
    info!("Simulator exiting");
}
