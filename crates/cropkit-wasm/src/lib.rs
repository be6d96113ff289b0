//! Cropkit WASM - WebAssembly bindings for the cropkit editor
//!
//! This crate exposes the cropkit-core editor to JavaScript/TypeScript hosts
//! that draw on a `<canvas>`.
//!
//! # Module Structure
//!
//! - `editor` - `JsCropEditor`, the interactive crop/adjust session
//! - `adjustments` - brightness, contrast and grayscale parameters
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Image decoding bindings (JPEG, PNG, RGBA bitmaps)
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropEditor } from '@cropkit/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const editor = new JsCropEditor(undefined, (image) => {
//!   upload(new Blob([image.bytes()], { type: image.mime }));
//! }, () => closeDialog());
//! ```

use wasm_bindgen::prelude::*;

mod adjustments;
mod decode;
mod editor;
mod types;

// Re-export public types
pub use adjustments::{apply_adjustments, JsAdjustments};
pub use decode::{decode_image, decode_rgba, image_orientation};
pub use editor::JsCropEditor;
pub use types::{JsDecodedImage, JsExportedImage};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    // A second init (e.g. a re-imported module) finds the logger already set
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("console logger already initialized");
    }
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
