//! Adjustment WASM bindings.
//!
//! [`JsAdjustments`] mirrors the core `AdjustmentParams` so the host can
//! read and edit brightness, contrast and grayscale as one value.

use crate::types::JsDecodedImage;
use cropkit_core::AdjustmentParams;
use wasm_bindgen::prelude::*;

/// Tonal adjustments wrapper for JavaScript
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsAdjustments {
    inner: AdjustmentParams,
}

#[wasm_bindgen]
impl JsAdjustments {
    /// Neutral adjustments (100%, 100%, colour)
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Brightness percentage (0-200)
    #[wasm_bindgen(getter)]
    pub fn brightness(&self) -> f32 {
        self.inner.brightness
    }

    #[wasm_bindgen(setter)]
    pub fn set_brightness(&mut self, value: f32) {
        self.inner.brightness = value;
    }

    /// Contrast percentage (0-200)
    #[wasm_bindgen(getter)]
    pub fn contrast(&self) -> f32 {
        self.inner.contrast
    }

    #[wasm_bindgen(setter)]
    pub fn set_contrast(&mut self, value: f32) {
        self.inner.contrast = value;
    }

    #[wasm_bindgen(getter)]
    pub fn grayscale(&self) -> bool {
        self.inner.grayscale
    }

    #[wasm_bindgen(setter)]
    pub fn set_grayscale(&mut self, value: bool) {
        self.inner.grayscale = value;
    }

    pub fn is_default(&self) -> bool {
        self.inner.is_default()
    }

    pub fn reset(&mut self) {
        self.inner = AdjustmentParams::default();
    }
}

impl JsAdjustments {
    pub(crate) fn inner(&self) -> &AdjustmentParams {
        &self.inner
    }
}

impl From<AdjustmentParams> for JsAdjustments {
    fn from(inner: AdjustmentParams) -> Self {
        Self { inner }
    }
}

/// Run the filter chain over a whole image, returning a new image.
///
/// Percentages are clamped into range first, as the editor does.
#[wasm_bindgen]
pub fn apply_adjustments(image: &JsDecodedImage, adjustments: &JsAdjustments) -> JsDecodedImage {
    let mut pixels = image.pixels();
    cropkit_core::adjustments::apply_adjustments(&mut pixels, &adjustments.inner.clamped());
    JsDecodedImage::new(image.width(), image.height(), pixels)
}
