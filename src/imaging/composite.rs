//! Full-canvas compositing of one overlay onto the base.

use super::calculations::{over, premultiply, unpremultiply};
use image::imageops::{self, FilterType};
use image::{Rgba, Rgba32FImage, RgbaImage};
use std::borrow::Cow;

/// Alpha-composite `overlay` onto `base`, returning a new image.
///
/// The result always has the base's dimensions. An overlay of any other size
/// is first resized to exactly those dimensions with Lanczos3 (see
/// [`resize_premultiplied`]); the base is never resized. Neither input is
/// modified.
pub fn composite(base: &RgbaImage, overlay: &RgbaImage) -> RgbaImage {
    let (width, height) = base.dimensions();

    let overlay: Cow<'_, RgbaImage> = if overlay.dimensions() == (width, height) {
        Cow::Borrowed(overlay)
    } else {
        tracing::debug!(
            from = ?overlay.dimensions(),
            to = ?(width, height),
            "resizing overlay to base size"
        );
        Cow::Owned(resize_premultiplied(overlay, width, height))
    };

    let mut out = base.clone();
    for (dst, src) in out.pixels_mut().zip(overlay.pixels()) {
        *dst = Rgba(over(dst.0, src.0));
    }
    out
}

/// Lanczos3 resize carried out on premultiplied `f32` pixels, so fully
/// transparent pixels contribute no color to the result.
pub fn resize_premultiplied(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let (w, h) = image.dimensions();
    let premultiplied =
        Rgba32FImage::from_fn(w, h, |x, y| Rgba(premultiply(image.get_pixel(x, y).0)));
    let resized = imageops::resize(&premultiplied, width, height, FilterType::Lanczos3);
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba(unpremultiply(resized.get_pixel(x, y).0))
    })
}
