//! ARGB color to LED brightness translation.
//!
//! All functions here are pure integer arithmetic.

/// Upper bound of the luminance scale.
pub const MAX_LUMINANCE: u32 = 0xFF;

/// Split `0xAARRGGBB` into `(alpha, red, green, blue)`.
pub fn channels(color: u32) -> (u32, u32, u32, u32) {
    (
        (color >> 24) & 0xFF,
        (color >> 16) & 0xFF,
        (color >> 8) & 0xFF,
        color & 0xFF,
    )
}

/// Alpha-premultiplied luma of a packed ARGB color, in `0..=255`.
///
/// Each color channel is scaled by `alpha / 255` (truncating), then combined
/// with the fixed-point weights `77 / 150 / 29` (sum 256).
pub fn luminance(color: u32) -> u32 {
    let (alpha, red, green, blue) = channels(color);
    let red = red * alpha / MAX_LUMINANCE;
    let green = green * alpha / MAX_LUMINANCE;
    let blue = blue * alpha / MAX_LUMINANCE;
    (77 * red + 150 * green + 29 * blue) >> 8
}

/// Rescale a luminance into `0..=max_brightness`.
///
/// Zero stays zero; any non-zero luminance maps to at least 1 and 255 maps to
/// `max_brightness`. A `max_brightness` of 0 (unreadable sink) yields 0.
pub fn scale_brightness(luminance: u32, max_brightness: u32) -> u32 {
    if luminance == 0 || max_brightness == 0 {
        return 0;
    }
    let scaled = u64::from(luminance - 1) * u64::from(max_brightness - 1)
        / u64::from(MAX_LUMINANCE - 1)
        + 1;
    // luminance <= 255 keeps this <= max_brightness
    scaled as u32
}

/// [`luminance`] followed by [`scale_brightness`].
pub fn scaled_brightness(color: u32, max_brightness: u32) -> u32 {
    scale_brightness(luminance(color), max_brightness)
}
