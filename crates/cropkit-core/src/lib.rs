//! Cropkit Core - interactive crop and adjustment editor
//!
//! This crate implements the editing engine behind a photo crop dialog: a
//! draggable, resizable selection rectangle over a scaled preview, simple
//! tonal adjustments, and an export path that reproduces exactly the
//! visible crop at source resolution.
//!
//! # Module Structure
//!
//! - `geometry` - crop rectangle, display-fit transform, initial fit and clamp
//! - `hit_test` - which handle a pointer targets
//! - `drag` - gesture state machine and resize/move constraints
//! - `adjustments` - brightness, contrast and grayscale filter chain
//! - `render` - composites the preview frame
//! - `export` - maps the crop back to source pixels and encodes it
//! - `editor` - session controller tying the pieces together
//! - `decode` / `encode` - source decoding and JPEG output

pub mod adjustments;
pub mod config;
pub mod decode;
pub mod drag;
pub mod editor;
pub mod encode;
pub mod export;
pub mod geometry;
pub mod luminance;
pub mod render;

pub use config::{ConfigError, EditorConfig};
pub use decode::{decode_image, DecodeError, DecodedImage};
pub use editor::{Editor, EditorHost};
pub use encode::EncodeError;
pub use export::{ExportError, ExportJob, ExportedImage};
pub use geometry::{Corner, CropRect, DisplayFit, Point, Size, SourceRect};
pub use hit_test::Handle;
pub use render::Frame;

/// Lower bound of the brightness and contrast percentages.
pub const PERCENT_MIN: f32 = 0.0;

/// Upper bound of the brightness and contrast percentages.
pub const PERCENT_MAX: f32 = 200.0;

/// Tonal adjustments applied to both the preview and the export.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AdjustmentParams {
    /// Brightness percentage (0 to 200, 100 = unchanged)
    pub brightness: f32,
    /// Contrast percentage (0 to 200, 100 = unchanged)
    pub contrast: f32,
    /// Convert to grayscale after brightness and contrast
    pub grayscale: bool,
}

impl Default for AdjustmentParams {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            grayscale: false,
        }
    }
}

impl AdjustmentParams {
    /// Create AdjustmentParams with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if all values are at their defaults
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Copy with both percentages clamped into range.
    ///
    /// NaN falls back to the neutral 100%.
    pub fn clamped(self) -> Self {
        Self {
            brightness: clamp_percent(self.brightness),
            contrast: clamp_percent(self.contrast),
            grayscale: self.grayscale,
        }
    }
}

fn clamp_percent(value: f32) -> f32 {
    if value.is_nan() {
        100.0
    } else {
        value.clamp(PERCENT_MIN, PERCENT_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjustment_params_default() {
        let params = AdjustmentParams::new();
        assert!(params.is_default());
        assert_eq!(params.brightness, 100.0);
        assert_eq!(params.contrast, 100.0);
        assert!(!params.grayscale);
    }

    #[test]
    fn test_adjustment_params_not_default() {
        let mut params = AdjustmentParams::new();
        params.grayscale = true;
        assert!(!params.is_default());
    }

    #[test]
    fn test_clamped() {
        let params = AdjustmentParams {
            brightness: 250.0,
            contrast: -10.0,
            grayscale: true,
        }
        .clamped();
        assert_eq!(params.brightness, 200.0);
        assert_eq!(params.contrast, 0.0);
        assert!(params.grayscale);
    }

    #[test]
    fn test_clamped_nan_is_neutral() {
        let params = AdjustmentParams {
            brightness: f32::NAN,
            ..AdjustmentParams::default()
        }
        .clamped();
        assert!(params.is_default());
    }
}
