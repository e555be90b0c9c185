//! Image decoding, encoding, and compositing — pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** (PNG, JPEG, TIFF, WebP) | `image::ImageReader` → RGBA8 |
//! | **Resize** overlay to base size | `image::imageops::resize` with `Lanczos3` on premultiplied `Rgba32FImage` |
//! | **Blend** | straight-alpha "over", [`calculations::over`] |
//! | **Encode** | `image::codecs::png::PngEncoder` |
//!
//! The module is split into:
//! - **Calculations**: per-pixel blending math (unit testable, no images)
//! - **Composite**: the [`composite`] operation over whole buffers
//! - **Backend**: [`ImageBackend`] trait for file I/O + [`RustBackend`]

pub mod backend;
pub mod calculations;
mod composite;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use composite::{composite, resize_premultiplied};
pub use rust_backend::{RustBackend, supported_input_extensions};
