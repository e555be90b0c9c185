//! Pure per-pixel blending math.
//!
//! All functions here work on plain RGBA values and are testable without any
//! image buffers. Blending takes straight (not premultiplied) alpha; the
//! premultiply pair converts to and from the space used for resampling.

/// Composite `top` over `base` with the Porter-Duff "over" operator.
///
/// ```text
/// out_a = sa + da·(1 − sa)
/// out_c = (sc·sa + dc·da·(1 − sa)) / out_a
/// ```
///
/// A fully transparent `top` returns `base` untouched and a fully opaque
/// `top` returns `top` untouched, so those cases are exact.
pub fn over(base: [u8; 4], top: [u8; 4]) -> [u8; 4] {
    match top[3] {
        0 => return base,
        255 => return top,
        _ => {}
    }

    let sa = f32::from(top[3]) / 255.0;
    let da = f32::from(base[3]) / 255.0;
    let base_weight = da * (1.0 - sa);
    // sa > 0 here, so out_a > 0
    let out_a = sa + base_weight;

    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = (f32::from(top[i]) * sa + f32::from(base[i]) * base_weight) / out_a;
        out[i] = to_channel(c);
    }
    out[3] = to_channel(out_a * 255.0);
    out
}

/// Straight 8-bit RGBA to premultiplied floats in `0.0..=1.0`.
///
/// Resampling must happen in this space; otherwise the color of fully
/// transparent pixels bleeds into their visible neighbours.
pub fn premultiply(px: [u8; 4]) -> [f32; 4] {
    let a = f32::from(px[3]) / 255.0;
    [
        f32::from(px[0]) / 255.0 * a,
        f32::from(px[1]) / 255.0 * a,
        f32::from(px[2]) / 255.0 * a,
        a,
    ]
}

/// Inverse of [`premultiply`]. Values are clamped, so resampling overshoot
/// is harmless; pixels that round to zero alpha come back as `[0, 0, 0, 0]`.
pub fn unpremultiply(px: [f32; 4]) -> [u8; 4] {
    let a = px[3].clamp(0.0, 1.0);
    let alpha = to_channel(a * 255.0);
    if alpha == 0 {
        return [0, 0, 0, 0];
    }
    let mut out = [0u8; 4];
    for i in 0..3 {
        out[i] = to_channel((px[i] / a).clamp(0.0, 1.0) * 255.0);
    }
    out[3] = alpha;
    out
}

fn to_channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
