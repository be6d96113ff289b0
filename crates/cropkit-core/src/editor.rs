//! Editing session controller.
//!
//! [`Editor`] owns the geometry model (crop rectangle, adjustments and the
//! display fit) for one source image and routes host events to the hit
//! tester, the drag engine and the renderer. It never draws on its own:
//! mutating calls report whether anything changed and the host asks for a
//! new frame with [`Editor::render`].

use std::sync::Arc;

use crate::config::{ConfigError, EditorConfig};
use crate::decode::{decode_image, DecodeError, DecodedImage};
use crate::drag::DragEngine;
use crate::export::{ExportError, ExportJob, ExportRequest, ExportSlot, ExportedImage};
use crate::geometry::{clamp, fit_to_image, CropRect, DisplayFit, Point, Size};
use crate::hit_test::{classify, Handle};
use crate::render::{Frame, Renderer};
use crate::AdjustmentParams;

/// Receiver of the editor's outcomes.
pub trait EditorHost {
    /// Called once per successful export with the encoded result.
    fn on_confirm(&mut self, image: ExportedImage);

    /// Called when the user abandons the session.
    fn on_cancel(&mut self);
}

/// One interactive crop/adjust session.
#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,
    source: Option<Arc<DecodedImage>>,
    surface: Size,
    fit: Option<DisplayFit>,
    crop: Option<CropRect>,
    adjustments: AdjustmentParams,
    drag: DragEngine,
    renderer: Renderer,
    exports: ExportSlot,
}

impl Default for Editor {
    fn default() -> Self {
        let config = EditorConfig::default();
        Self {
            drag: DragEngine::new(config.min_size),
            config,
            source: None,
            surface: Size::default(),
            fit: None,
            crop: None,
            adjustments: AdjustmentParams::default(),
            renderer: Renderer::new(),
            exports: ExportSlot::new(),
        }
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            drag: DragEngine::new(config.min_size),
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn source(&self) -> Option<&DecodedImage> {
        self.source.as_deref()
    }

    pub fn surface(&self) -> Size {
        self.surface
    }

    /// Current crop rectangle; `None` until an image is loaded and fitted.
    pub fn crop_rect(&self) -> Option<CropRect> {
        self.crop
    }

    pub fn adjustments(&self) -> AdjustmentParams {
        self.adjustments
    }

    /// Transform for the displayed image at the last usable surface size.
    pub fn display_fit(&self) -> Option<DisplayFit> {
        self.fit
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    // ------------------------------------------------------------------
    // Session lifecycle
    // ------------------------------------------------------------------

    /// Start a session on an already-decoded image.
    ///
    /// Any gesture in progress is discarded and the crop is re-fitted. An
    /// empty image, or one whose buffer does not match its dimensions,
    /// leaves the editor without a source.
    pub fn load_image(&mut self, image: DecodedImage) {
        self.drag.cancel();
        self.renderer.invalidate();
        self.crop = None;
        self.fit = None;

        if !image.is_usable() {
            log::warn!(
                "ignoring {}x{} source image with a {} byte buffer",
                image.width,
                image.height,
                image.pixels.len()
            );
            self.source = None;
            return;
        }

        log::info!("loaded {}x{} source image", image.width, image.height);
        self.source = Some(Arc::new(image));
        self.refit();
    }

    /// Decode `bytes` and start a session on the result.
    ///
    /// On failure the current session is left untouched.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<(), DecodeError> {
        let image = decode_image(bytes)?;
        self.load_image(image);
        Ok(())
    }

    /// Apply a new surface size.
    ///
    /// The crop rectangle keeps its numeric value. The display fit is
    /// recomputed unless the surface has no area, in which case the
    /// previous fit stays in effect for export.
    pub fn resize_surface(&mut self, surface: Size) {
        log::debug!("surface resized to {:.0}x{:.0}", surface.width, surface.height);
        self.surface = surface;
        self.renderer.invalidate();

        let Some(source) = self.source.as_ref() else {
            return;
        };
        if let Some(fit) = DisplayFit::compute(source.size(), surface) {
            self.fit = Some(fit);
        }
        if self.crop.is_none() {
            self.refit();
        }
    }

    /// End the session without producing an image.
    pub fn cancel<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        log::info!("editing session cancelled");
        self.unload();
        host.on_cancel();
    }

    fn unload(&mut self) {
        self.drag.cancel();
        self.renderer.invalidate();
        self.source = None;
        self.fit = None;
        self.crop = None;
        self.adjustments = AdjustmentParams::default();
    }

    fn refit(&mut self) {
        let Some(source) = self.source.as_ref() else {
            return;
        };
        let size = source.size();
        if self.surface.is_empty() {
            log::debug!("deferring initial fit until the surface has a size");
            return;
        }
        self.fit = DisplayFit::compute(size, self.surface);
        self.crop = Some(fit_to_image(size, self.surface, self.config.initial_fill));
    }

    // ------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------

    /// What the pointer would grab at `point`.
    pub fn hover(&self, point: Point) -> Handle {
        match &self.crop {
            Some(crop) => classify(point, crop, self.config.hit_radius()),
            None => Handle::None,
        }
    }

    /// Primary pointer pressed. Returns true if a gesture started.
    pub fn pointer_down(&mut self, point: Point) -> bool {
        let Some(crop) = self.crop else {
            return false;
        };
        let handle = classify(point, &crop, self.config.hit_radius());
        self.drag.begin(point, crop, handle)
    }

    /// Primary pointer moved. Returns true if the crop changed.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        let Some(current) = self.crop else {
            return false;
        };
        match self.drag.update(point, current, self.surface) {
            Some(next) if next != current => {
                self.crop = Some(next);
                true
            }
            _ => false,
        }
    }

    /// Pointer released or left the surface. Returns true if a gesture ended.
    pub fn pointer_up(&mut self) -> bool {
        self.drag.end().is_some()
    }

    /// Pointer capture lost.
    pub fn pointer_cancel(&mut self) {
        self.drag.cancel();
    }

    // ------------------------------------------------------------------
    // Geometry and adjustment edits
    // ------------------------------------------------------------------

    /// Re-run the initial fit for the current surface.
    pub fn reset_crop(&mut self) -> bool {
        if self.drag.is_active() || self.source.is_none() {
            return false;
        }
        self.refit();
        self.crop.is_some()
    }

    /// Replace the crop with a host-supplied rectangle, clipped to the surface.
    ///
    /// Rejected while a gesture is active, or when the rectangle cannot be
    /// brought inside the surface at the minimum size.
    pub fn set_crop_rect(&mut self, rect: CropRect) -> bool {
        if self.drag.is_active() || self.crop.is_none() {
            return false;
        }
        let min_size = self.config.min_size;
        let finite = [rect.x, rect.y, rect.width, rect.height]
            .iter()
            .all(|v| v.is_finite());
        if !finite || rect.width < min_size || rect.height < min_size {
            log::debug!("rejecting crop rect {:?}", rect);
            return false;
        }

        let clamped = clamp(rect, self.surface, min_size);
        if !clamped.is_within(self.surface) {
            log::debug!("crop rect {:?} does not fit the surface", rect);
            return false;
        }
        self.crop = Some(clamped);
        true
    }

    pub fn set_brightness(&mut self, percent: f32) {
        self.set_adjustments(AdjustmentParams {
            brightness: percent,
            ..self.adjustments
        });
    }

    pub fn set_contrast(&mut self, percent: f32) {
        self.set_adjustments(AdjustmentParams {
            contrast: percent,
            ..self.adjustments
        });
    }

    pub fn set_grayscale(&mut self, enabled: bool) {
        self.adjustments.grayscale = enabled;
    }

    /// Replace all adjustments; percentages are clamped into range.
    pub fn set_adjustments(&mut self, params: AdjustmentParams) {
        self.adjustments = params.clamped();
    }

    pub fn reset_adjustments(&mut self) {
        self.adjustments = AdjustmentParams::default();
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    /// Render the current state, or `None` if there is nothing to draw.
    pub fn render(&mut self) -> Option<Frame> {
        let source = self.source.as_deref()?;
        let crop = self.crop.as_ref()?;
        self.renderer
            .render(source, crop, &self.adjustments, self.surface, &self.config)
    }

    pub fn is_exporting(&self) -> bool {
        self.exports.is_busy()
    }

    /// Snapshot the session into an export job.
    ///
    /// Fails with [`ExportError::Busy`] while another job is alive and with
    /// [`ExportError::ImageNotReady`] before an image is loaded and fitted.
    pub fn export_job(&self) -> Result<ExportJob, ExportError> {
        let crop = self.crop.ok_or(ExportError::ImageNotReady)?;
        self.exports.begin(ExportRequest {
            source: self.source.clone(),
            crop,
            fit: self.fit,
            adjustments: self.adjustments,
            config: self.config.clone(),
        })
    }

    /// Export and hand the result to `host`.
    ///
    /// `on_confirm` is only called on success; on failure the session stays
    /// open so the user can retry.
    pub async fn confirm<H: EditorHost + ?Sized>(&self, host: &mut H) -> Result<(), ExportError> {
        let image = self.export_job()?.run().await.map_err(|e| {
            log::warn!("export failed: {}", e);
            e
        })?;
        log::info!("export complete: {}x{}", image.width, image.height);
        host.on_confirm(image);
        Ok(())
    }
}
