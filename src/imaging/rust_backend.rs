//! Pure Rust backend on top of the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (PNG, JPEG, TIFF, WebP) | `image::ImageReader`, format sniffed from content |
//! | Convert | `DynamicImage::into_rgba8` |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |

use super::backend::{BackendError, ImageBackend};
use image::codecs::png::PngEncoder;
use image::{ImageFormat, ImageReader, RgbaImage};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::LazyLock;

/// Extensions we may accept as input, paired with the decoder they need.
const INPUT_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("png", ImageFormat::Png),
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    INPUT_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the image file extensions that have decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Backend using the `image` crate's decoders and PNG encoder.
#[derive(Debug, Default, Clone, Copy)]
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ImageBackend for RustBackend {
    fn load_rgba(&self, path: &Path) -> Result<RgbaImage, BackendError> {
        let img = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(img.into_rgba8())
    }

    fn save_png(&self, image: &RgbaImage, path: &Path) -> Result<(), BackendError> {
        let file = std::fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        image
            .write_with_encoder(PngEncoder::new(&mut writer))
            .map_err(|e| BackendError::Encode(e.to_string()))?;
        writer.flush()?;
        Ok(())
    }
}
