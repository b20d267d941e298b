//! Fixed colors of the watch face
//!
//! The target display is monochrome, so the face only ever uses two RGB565
//! values: a black window background and white ink for the cross, the
//! points and the segments.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::RgbColor;

/// Window background
pub const COLOR_BACKGROUND: Rgb565 = Rgb565::BLACK;

/// Cross, points and segments
pub const COLOR_INK: Rgb565 = Rgb565::WHITE;
