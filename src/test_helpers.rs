//! Shared test utilities: filesystem fixtures and tiny images.

use image::{Rgba, RgbaImage};
use std::path::Path;

/// Create empty files named `names` in `dir`.
///
/// Enough for discovery tests, which never decode; pair with the mock
/// backend when pixels matter.
pub fn touch(dir: &Path, names: &[&str]) {
    for name in names {
        std::fs::write(dir.join(name), b"").unwrap();
    }
}

/// A `w`×`h` image filled with one RGBA color.
pub fn solid(w: u32, h: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba(rgba))
}
