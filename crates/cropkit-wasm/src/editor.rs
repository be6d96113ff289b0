//! Crop editor WASM bindings.
//!
//! [`JsCropEditor`] wraps the core editor for a `<canvas>` host. The host
//! forwards pointer and resize events, paints the frames returned by
//! `render_image_data()`, and receives the result through the callbacks
//! given to the constructor.
//!
//! # Example
//!
//! ```typescript
//! import { JsCropEditor } from '@cropkit/wasm';
//!
//! const editor = new JsCropEditor(undefined, onConfirm, onCancel);
//! editor.resize_surface(canvas.width, canvas.height);
//! editor.load_image(new Uint8Array(await file.arrayBuffer()));
//!
//! canvas.onpointerdown = (e) => editor.pointer_down(e.offsetX, e.offsetY);
//! canvas.onpointermove = (e) => {
//!   canvas.style.cursor = editor.cursor_at(e.offsetX, e.offsetY);
//!   if (editor.pointer_move(e.offsetX, e.offsetY)) draw();
//! };
//! canvas.onpointerup = () => editor.pointer_up();
//!
//! function draw() {
//!   const frame = editor.render_image_data();
//!   if (frame) ctx.putImageData(frame, 0, 0);
//! }
//! ```

use cropkit_core::{CropRect, DecodedImage, Editor, EditorConfig, EditorHost, ExportedImage};
use cropkit_core::{Point, Size};
use js_sys::{Function, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen::Clamped;
use wasm_bindgen_futures::future_to_promise;
use web_sys::ImageData;

use crate::adjustments::JsAdjustments;
use crate::types::{JsDecodedImage, JsExportedImage};

/// Forwards editor outcomes to JavaScript callbacks.
#[derive(Clone)]
struct JsHost {
    on_confirm: Function,
    on_cancel: Function,
}

impl EditorHost for JsHost {
    fn on_confirm(&mut self, image: ExportedImage) {
        let value = JsValue::from(JsExportedImage::from(image));
        if let Err(e) = self.on_confirm.call1(&JsValue::NULL, &value) {
            log::error!("on_confirm callback threw: {:?}", e);
        }
    }

    fn on_cancel(&mut self) {
        if let Err(e) = self.on_cancel.call0(&JsValue::NULL) {
            log::error!("on_cancel callback threw: {:?}", e);
        }
    }
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Interactive crop and adjustment editor bound to one canvas.
#[wasm_bindgen]
pub struct JsCropEditor {
    editor: Editor,
    host: JsHost,
}

#[wasm_bindgen]
impl JsCropEditor {
    /// Create an editor.
    ///
    /// `config` is a partial `EditorConfig` object, or `undefined` for the
    /// defaults. `on_confirm` receives a `JsExportedImage`; `on_cancel`
    /// takes no arguments.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config: JsValue,
        on_confirm: Function,
        on_cancel: Function,
    ) -> Result<JsCropEditor, JsValue> {
        let config: EditorConfig = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let editor = Editor::new(config).map_err(to_js_error)?;
        Ok(JsCropEditor {
            editor,
            host: JsHost {
                on_confirm,
                on_cancel,
            },
        })
    }

    // ---------------------------------------------------------------------
    // Session
    // ---------------------------------------------------------------------

    /// Decode encoded bytes (JPEG or PNG) and start editing them.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        self.editor.load_bytes(bytes).map_err(to_js_error)
    }

    /// Start editing an RGBA bitmap, e.g. a video frame grabbed via a canvas.
    pub fn load_rgba(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<(), JsValue> {
        let image = DecodedImage::from_rgba(width, height, rgba).map_err(to_js_error)?;
        self.editor.load_image(image);
        Ok(())
    }

    /// Start editing an image decoded earlier with `decode_image`.
    pub fn load_decoded(&mut self, image: &JsDecodedImage) -> Result<(), JsValue> {
        self.editor.load_image(image.to_decoded()?);
        Ok(())
    }

    /// The canvas changed size. The crop rectangle is not rescaled.
    pub fn resize_surface(&mut self, width: f64, height: f64) {
        self.editor.resize_surface(Size::new(width, height));
    }

    /// Abandon the session and fire `on_cancel`.
    pub fn cancel(&mut self) {
        self.editor.cancel(&mut self.host);
    }

    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.editor.source().is_some()
    }

    // ---------------------------------------------------------------------
    // Pointer input
    // ---------------------------------------------------------------------

    /// Returns true if a drag started.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        self.editor.pointer_down(Point::new(x, y))
    }

    /// Returns true if the crop changed and a redraw is due.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.editor.pointer_move(Point::new(x, y))
    }

    /// Pointer released, left the canvas, or the touch ended.
    pub fn pointer_up(&mut self) -> bool {
        self.editor.pointer_up()
    }

    /// Pointer capture was lost.
    pub fn pointer_cancel(&mut self) {
        self.editor.pointer_cancel();
    }

    #[wasm_bindgen(getter)]
    pub fn is_dragging(&self) -> bool {
        self.editor.is_dragging()
    }

    /// CSS cursor for the region under `(x, y)`.
    pub fn cursor_at(&self, x: f64, y: f64) -> String {
        self.editor.hover(Point::new(x, y)).cursor().to_string()
    }

    // ---------------------------------------------------------------------
    // Geometry and adjustments
    // ---------------------------------------------------------------------

    /// Current `{x, y, width, height}` in canvas pixels, or `undefined`.
    pub fn crop_rect(&self) -> Result<JsValue, JsValue> {
        match self.editor.crop_rect() {
            Some(rect) => Ok(serde_wasm_bindgen::to_value(&rect)?),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Replace the crop with `{x, y, width, height}`, clipped to the canvas.
    pub fn set_crop_rect(&mut self, rect: JsValue) -> Result<bool, JsValue> {
        let rect: CropRect = serde_wasm_bindgen::from_value(rect)?;
        Ok(self.editor.set_crop_rect(rect))
    }

    pub fn reset_crop(&mut self) -> bool {
        self.editor.reset_crop()
    }

    pub fn set_brightness(&mut self, percent: f32) {
        self.editor.set_brightness(percent);
    }

    pub fn set_contrast(&mut self, percent: f32) {
        self.editor.set_contrast(percent);
    }

    pub fn set_grayscale(&mut self, enabled: bool) {
        self.editor.set_grayscale(enabled);
    }

    pub fn adjustments(&self) -> JsAdjustments {
        JsAdjustments::from(self.editor.adjustments())
    }

    pub fn set_adjustments(&mut self, adjustments: &JsAdjustments) {
        self.editor.set_adjustments(*adjustments.inner());
    }

    pub fn reset_adjustments(&mut self) {
        self.editor.reset_adjustments();
    }

    // ---------------------------------------------------------------------
    // Output
    // ---------------------------------------------------------------------

    /// RGBA bytes of the current frame, or `undefined` if nothing can be drawn.
    pub fn render(&mut self) -> Option<Vec<u8>> {
        self.editor.render().map(|frame| frame.into_raw())
    }

    /// The current frame as `ImageData`, ready for `putImageData`.
    pub fn render_image_data(&mut self) -> Result<Option<ImageData>, JsValue> {
        let Some(frame) = self.editor.render() else {
            return Ok(None);
        };
        let (width, height) = (frame.width(), frame.height());
        let data = frame.into_raw();
        ImageData::new_with_u8_clamped_array_and_sh(Clamped(&data), width, height).map(Some)
    }

    #[wasm_bindgen(getter)]
    pub fn is_exporting(&self) -> bool {
        self.editor.is_exporting()
    }

    /// Export the crop and fire `on_confirm` with the result.
    ///
    /// Throws immediately if no image is loaded or an export is already
    /// running. The returned promise rejects if encoding fails, in which
    /// case `on_confirm` is not called.
    pub fn export(&self) -> Result<Promise, JsValue> {
        let job = self.editor.export_job().map_err(to_js_error)?;
        let mut host = self.host.clone();
        Ok(future_to_promise(async move {
            let image = job.run().await.map_err(|e| {
                log::warn!("export failed: {}", e);
                to_js_error(e)
            })?;
            host.on_confirm(image);
            Ok(JsValue::UNDEFINED)
        }))
    }
}

/// Browser tests. Run with `wasm-pack test --headless --chrome`.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use serde::Serialize;
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[derive(Serialize)]
    struct TestConfig {
        min_size: f64,
    }

    fn noop() -> Function {
        Function::new_no_args("")
    }

    /// Editor over a 1000x800 gray image on a 400x400 canvas.
    fn editor() -> JsCropEditor {
        let mut editor = JsCropEditor::new(JsValue::UNDEFINED, noop(), noop()).unwrap();
        editor.resize_surface(400.0, 400.0);
        editor.load_rgba(1000, 800, &vec![90u8; 1000 * 800 * 4]).unwrap();
        editor
    }

    fn crop(editor: &JsCropEditor) -> CropRect {
        serde_wasm_bindgen::from_value(editor.crop_rect().unwrap()).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_partial_config() {
        let config = serde_wasm_bindgen::to_value(&TestConfig { min_size: 40.0 }).unwrap();
        assert!(JsCropEditor::new(config, noop(), noop()).is_ok());

        let bad = serde_wasm_bindgen::to_value(&TestConfig { min_size: -1.0 }).unwrap();
        assert!(JsCropEditor::new(bad, noop(), noop()).is_err());
    }

    #[wasm_bindgen_test]
    fn test_initial_crop() {
        let editor = editor();
        assert!(editor.has_image());
        assert_eq!(crop(&editor), CropRect::new(50.0, 80.0, 300.0, 240.0));
    }

    #[wasm_bindgen_test]
    fn test_drag_moves_crop() {
        let mut editor = editor();
        assert_eq!(editor.cursor_at(200.0, 200.0), "move");
        assert!(editor.pointer_down(200.0, 200.0));
        assert!(editor.pointer_move(210.0, 190.0));
        assert!(editor.pointer_up());
        assert_eq!(crop(&editor), CropRect::new(60.0, 70.0, 300.0, 240.0));
    }

    #[wasm_bindgen_test]
    fn test_render_image_data() {
        let mut editor = editor();
        let frame = editor.render_image_data().unwrap().unwrap();
        assert_eq!((frame.width(), frame.height()), (400, 400));
    }

    #[wasm_bindgen_test]
    fn test_render_without_image() {
        let mut editor = JsCropEditor::new(JsValue::UNDEFINED, noop(), noop()).unwrap();
        editor.resize_surface(100.0, 100.0);
        assert!(editor.render().is_none());
    }

    #[wasm_bindgen_test]
    fn test_export_before_load_throws() {
        let editor = JsCropEditor::new(JsValue::UNDEFINED, noop(), noop()).unwrap();
        assert!(editor.export().is_err());
    }

    #[wasm_bindgen_test]
    async fn test_export_calls_on_confirm() {
        let on_confirm = Function::new_with_args("image", "globalThis.__cropkitExport = image.width;");
        let mut editor = JsCropEditor::new(JsValue::UNDEFINED, on_confirm, noop()).unwrap();
        editor.resize_surface(400.0, 400.0);
        editor.load_rgba(1000, 800, &vec![90u8; 1000 * 800 * 4]).unwrap();

        let promise = editor.export().unwrap();
        assert!(editor.is_exporting());
        JsFuture::from(promise).await.unwrap();
        assert!(!editor.is_exporting());

        let width = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("__cropkitExport"))
            .unwrap();
        assert_eq!(width.as_f64(), Some(750.0));
    }

    #[wasm_bindgen_test]
    fn test_cancel_unloads() {
        let mut editor = editor();
        editor.cancel();
        assert!(!editor.has_image());
        assert!(editor.crop_rect().unwrap().is_undefined());
    }
}
