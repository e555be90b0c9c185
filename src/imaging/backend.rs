//! Image I/O backend trait and shared error type.
//!
//! The [`ImageBackend`] trait covers the two operations that touch image
//! files: decoding into an RGBA8 buffer and persisting a buffer as PNG.
//! Compositing itself is pure and lives outside the trait.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests swap in a mock
//! that serves in-memory images and records writes.

use image::RgbaImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Trait for image file backends.
pub trait ImageBackend {
    /// Decode an image file, converting to 8-bit RGBA whatever its format.
    fn load_rgba(&self, path: &Path) -> Result<RgbaImage, BackendError>;

    /// Write `image` to `path` as PNG, replacing any existing file.
    fn save_png(&self, image: &RgbaImage, path: &Path) -> Result<(), BackendError>;
}
