//! Tonal adjustment filter chain.
//!
//! Applies [`AdjustmentParams`] to pixel data. The same functions run for
//! the live preview and for export, so what the user sees inside the crop
//! rectangle is what gets encoded.
//!
//! ## Stage Order
//! 1. Brightness: `v * brightness / 100`
//! 2. Contrast: `(v - 128) * contrast / 100 + 128`
//! 3. Grayscale: BT.709 luminance replaces all three channels
//!
//! Values are kept in the 0-255 range, clamped after every stage, and
//! rounded once at the end.

use crate::luminance::luminance;
use crate::AdjustmentParams;

/// Contrast pivot in byte units.
const CONTRAST_PIVOT: f32 = 128.0;

/// Apply the filter chain to RGB pixel data in place.
///
/// Trailing bytes that do not form a full pixel are left alone.
pub fn apply_adjustments(pixels: &mut [u8], params: &AdjustmentParams) {
    if params.is_default() {
        return;
    }
    for chunk in pixels.chunks_exact_mut(3) {
        let [r, g, b] = adjust_pixel([chunk[0], chunk[1], chunk[2]], params);
        chunk[0] = r;
        chunk[1] = g;
        chunk[2] = b;
    }
}

/// Run one pixel through the filter chain.
#[inline]
pub fn adjust_pixel(rgb: [u8; 3], params: &AdjustmentParams) -> [u8; 3] {
    let mut r = rgb[0] as f32;
    let mut g = rgb[1] as f32;
    let mut b = rgb[2] as f32;

    (r, g, b) = apply_brightness(r, g, b, params.brightness);
    (r, g, b) = apply_contrast(r, g, b, params.contrast);
    if params.grayscale {
        (r, g, b) = apply_grayscale(r, g, b);
    }

    [to_byte(r), to_byte(g), to_byte(b)]
}

#[inline]
fn apply_brightness(r: f32, g: f32, b: f32, brightness: f32) -> (f32, f32, f32) {
    if brightness == 100.0 {
        return (r, g, b);
    }
    let factor = brightness / 100.0;
    (clamp(r * factor), clamp(g * factor), clamp(b * factor))
}

#[inline]
fn apply_contrast(r: f32, g: f32, b: f32, contrast: f32) -> (f32, f32, f32) {
    if contrast == 100.0 {
        return (r, g, b);
    }
    let factor = contrast / 100.0;
    (
        clamp((r - CONTRAST_PIVOT) * factor + CONTRAST_PIVOT),
        clamp((g - CONTRAST_PIVOT) * factor + CONTRAST_PIVOT),
        clamp((b - CONTRAST_PIVOT) * factor + CONTRAST_PIVOT),
    )
}

#[inline]
fn apply_grayscale(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let y = clamp(luminance(r, g, b));
    (y, y, y)
}

#[inline]
fn clamp(v: f32) -> f32 {
    v.clamp(0.0, 255.0)
}

#[inline]
fn to_byte(v: f32) -> u8 {
    clamp(v).round() as u8
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn params_strategy() -> impl Strategy<Value = AdjustmentParams> {
        (0.0f32..=200.0, 0.0f32..=200.0, any::<bool>()).prop_map(|(b, c, g)| AdjustmentParams {
            brightness: b,
            contrast: c,
            grayscale: g,
        })
    }

    proptest! {
        /// Property: default parameters are the identity transform.
        #[test]
        fn prop_default_is_identity(rgb in any::<[u8; 3]>()) {
            prop_assert_eq!(adjust_pixel(rgb, &AdjustmentParams::default()), rgb);
        }

        /// Property: grayscale output has equal channels.
        #[test]
        fn prop_grayscale_channels_equal(
            rgb in any::<[u8; 3]>(),
            p in params_strategy(),
        ) {
            let p = AdjustmentParams { grayscale: true, ..p };
            let [r, g, b] = adjust_pixel(rgb, &p);
            prop_assert_eq!(r, g);
            prop_assert_eq!(g, b);
        }

        /// Property: the buffer path matches the per-pixel path.
        #[test]
        fn prop_buffer_matches_pixel(
            rgb in any::<[u8; 3]>(),
            p in params_strategy(),
        ) {
            let mut packed = rgb.to_vec();
            apply_adjustments(&mut packed, &p);
            prop_assert_eq!(&packed[..], &adjust_pixel(rgb, &p)[..]);
        }

        /// Property: brightness never darkens above 100% or brightens below it.
        #[test]
        fn prop_brightness_monotonic(
            v in any::<u8>(),
            brightness in 0.0f32..=200.0,
        ) {
            let p = AdjustmentParams { brightness, ..AdjustmentParams::default() };
            let [out, _, _] = adjust_pixel([v, v, v], &p);
            if brightness >= 100.0 {
                prop_assert!(out >= v);
            } else {
                prop_assert!(out <= v);
            }
        }
    }
}
