//! Image decoding WASM bindings.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode JPEG or PNG bytes, honouring EXIF orientation
//! - [`decode_rgba`] - Wrap an RGBA bitmap (e.g. from a canvas) as RGB
//! - [`image_orientation`] - Read the EXIF orientation tag only
//!
//! # Example
//!
//! ```typescript
//! import { decode_image } from '@cropkit/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! console.log(`Decoded ${image.width}x${image.height}`);
//! ```

use crate::types::JsDecodedImage;
use cropkit_core::decode;
use cropkit_core::DecodedImage;
use wasm_bindgen::prelude::*;

/// Decode an encoded image from bytes.
///
/// # Errors
///
/// Returns an error if the format is not recognised or the data is
/// corrupted or truncated.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Wrap an RGBA bitmap as an RGB image, dropping alpha.
///
/// `rgba` must hold exactly `width * height * 4` bytes, which is what
/// `CanvasRenderingContext2D.getImageData()` returns.
#[wasm_bindgen]
pub fn decode_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<JsDecodedImage, JsValue> {
    DecodedImage::from_rgba(width, height, rgba)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// EXIF orientation value (1-8) of an encoded image; 1 when absent.
#[wasm_bindgen]
pub fn image_orientation(bytes: &[u8]) -> u8 {
    decode::get_orientation(bytes) as u8
}
