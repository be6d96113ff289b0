//! Editor configuration.
//!
//! All tunables of the crop editor live in [`EditorConfig`]. The defaults
//! reproduce the editor's standard behavior: a 20 unit minimum crop size,
//! 12 unit corner handles grabbable within 1.5x their size, and an initial
//! selection covering 75% of the shorter surface dimension.
//!
//! The config is serde-enabled so hosts can pass a partial object; missing
//! fields fall back to their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum crop rectangle width/height in surface units.
pub const MIN_SIZE: f64 = 20.0;

/// Side length of a corner handle mark in surface units.
pub const HANDLE_SIZE: f64 = 12.0;

/// Corner hit zones extend this many handle sizes from the corner.
pub const HANDLE_HIT_FACTOR: f64 = 1.5;

/// Fraction of the shorter surface dimension covered by the initial crop.
pub const INITIAL_FILL: f64 = 0.75;

/// Default JPEG quality used for export.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Errors reported by [`EditorConfig::validate`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A length that must be strictly positive was zero, negative or NaN.
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    /// The initial fill fraction is outside (0, 1].
    #[error("initial_fill must be in (0, 1], got {0}")]
    InvalidFill(f64),

    /// JPEG quality is outside 1..=100.
    #[error("jpeg_quality must be in 1..=100, got {0}")]
    InvalidQuality(u8),
}

/// Tunables for an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Minimum crop width/height.
    pub min_size: f64,
    /// Drawn size of the corner handle marks.
    pub handle_size: f64,
    /// Hit zone half-extent as a multiple of `handle_size`.
    pub handle_hit_factor: f64,
    /// Initial crop coverage of the shorter surface dimension.
    pub initial_fill: f64,
    /// Export JPEG quality (1-100).
    pub jpeg_quality: u8,
    /// RGBA fill behind the image, also used for export pixels outside the source.
    pub background: [u8; 4],
    /// RGBA colour of the crop outline and handles.
    pub outline: [u8; 4],
    /// Stroke width of the crop outline.
    pub outline_width: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_size: MIN_SIZE,
            handle_size: HANDLE_SIZE,
            handle_hit_factor: HANDLE_HIT_FACTOR,
            initial_fill: INITIAL_FILL,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            background: [0, 0, 0, 255],
            outline: [255, 255, 255, 255],
            outline_width: 2.0,
        }
    }
}

impl EditorConfig {
    /// Half-extent of each corner's square hit zone.
    #[inline]
    pub fn hit_radius(&self) -> f64 {
        self.handle_size * self.handle_hit_factor
    }

    /// Check that every field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("min_size", self.min_size),
            ("handle_size", self.handle_size),
            ("handle_hit_factor", self.handle_hit_factor),
            ("outline_width", self.outline_width),
        ] {
            // Written as a negated comparison so NaN is rejected too
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if !(self.initial_fill > 0.0 && self.initial_fill <= 1.0) {
            return Err(ConfigError::InvalidFill(self.initial_fill));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::InvalidQuality(self.jpeg_quality));
        }
        Ok(())
    }
}
