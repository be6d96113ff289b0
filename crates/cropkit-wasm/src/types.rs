//! WASM-compatible wrapper types for image data.
//!
//! These types wrap the core cropkit types and handle the conversion between
//! Rust and JavaScript data representations.

use cropkit_core::{DecodedImage, ExportedImage};
use wasm_bindgen::prelude::*;

/// A decoded RGB image held in WASM memory.
///
/// # Memory Management
///
/// Calling `pixels()` copies the buffer into a JavaScript `Uint8Array`.
/// Keep the image in WASM memory and hand it to the editor directly when
/// the pixels are not needed on the JavaScript side.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Wrap RGB pixel data (3 bytes per pixel, row-major order).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        JsDecodedImage {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 3).
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Copy of the RGB pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Release the WASM memory now instead of waiting for the finalizer.
    pub fn free(self) {}
}

impl JsDecodedImage {
    pub(crate) fn from_decoded(img: DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Convert to a core image, checking the buffer length.
    pub(crate) fn to_decoded(&self) -> Result<DecodedImage, JsValue> {
        let expected = self.width as usize * self.height as usize * 3;
        if self.pixels.len() != expected {
            return Err(JsValue::from_str(&format!(
                "Pixel buffer size mismatch: expected {} bytes, got {}",
                expected,
                self.pixels.len()
            )));
        }
        Ok(DecodedImage::new(self.width, self.height, self.pixels.clone()))
    }
}

/// The encoded output of an export, handed to the `on_confirm` callback.
#[wasm_bindgen]
pub struct JsExportedImage {
    inner: ExportedImage,
}

#[wasm_bindgen]
impl JsExportedImage {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// MIME type of `bytes()`, e.g. for building a `Blob`.
    #[wasm_bindgen(getter)]
    pub fn mime(&self) -> String {
        self.inner.mime().to_string()
    }

    /// Copy of the encoded image bytes.
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }
}

impl From<ExportedImage> for JsExportedImage {
    fn from(inner: ExportedImage) -> Self {
        Self { inner }
    }
}
