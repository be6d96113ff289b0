//! Luminance weights used by the grayscale stage of the filter chain.
//!
//! The weights are the ITU-R BT.709 coefficients, the same ones browsers
//! use for the `grayscale()` filter, so the preview and the exported image
//! agree with a host that previews through a CSS filter.

/// BT.709 coefficient for red.
pub const LUMINANCE_R: f32 = 0.2126;

/// BT.709 coefficient for green.
pub const LUMINANCE_G: f32 = 0.7152;

/// BT.709 coefficient for blue.
pub const LUMINANCE_B: f32 = 0.0722;

/// Luminance of a channel triple, in the same units as the inputs.
///
/// Works for normalized (0.0-1.0) and byte-range (0.0-255.0) values alike
/// because the weights sum to one.
#[inline]
pub fn luminance(r: f32, g: f32, b: f32) -> f32 {
    LUMINANCE_R * r + LUMINANCE_G * g + LUMINANCE_B * b
}
