//! Export resolver: turns the on-screen crop into the final image.
//!
//! The crop rectangle is mapped back into source space with the inverse of
//! the [`DisplayFit`] that was in effect for the displayed image. The
//! resulting region is deliberately not clamped to the source bounds: any
//! part of it over the letterbox comes out as background. The filter chain
//! is the same one the preview uses.
//!
//! # Concurrency
//!
//! At most one export runs at a time. [`ExportSlot::begin`] hands out an
//! [`ExportJob`] holding the slot's only permit; a second request while a
//! job is alive fails with [`ExportError::Busy`]. The job owns a snapshot
//! of everything it needs, so it is independent of later edits or surface
//! resizes.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::adjustments::apply_adjustments;
use crate::config::EditorConfig;
use crate::decode::DecodedImage;
use crate::encode::{encode_jpeg, EncodeError, JPEG_MIME};
use crate::geometry::{CropRect, DisplayFit, SourceRect};
use crate::AdjustmentParams;

/// Largest width or height the JPEG format can carry.
pub const MAX_OUTPUT_DIMENSION: u32 = 65_535;

/// Errors that can occur while exporting.
#[derive(Debug, Error)]
pub enum ExportError {
    /// No source image has been loaded and decoded yet.
    #[error("Source image is not ready")]
    ImageNotReady,

    /// Another export is still in flight.
    #[error("An export is already in progress")]
    Busy,

    /// The crop maps to less than one source pixel on some axis.
    #[error("Crop resolves to an empty {width}x{height} source region")]
    EmptyCrop { width: u32, height: u32 },

    /// The crop maps to more pixels than can be encoded or allocated.
    #[error("Crop resolves to a {width}x{height} image, which is too large to export")]
    TooLarge { width: u32, height: u32 },

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// The encoded result of a successful export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedImage {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

impl ExportedImage {
    pub fn mime(&self) -> &'static str {
        JPEG_MIME
    }
}

/// Source-space region covered by `crop` under `fit`.
#[inline]
pub fn resolve_source_rect(crop: &CropRect, fit: &DisplayFit) -> SourceRect {
    fit.to_source(crop)
}

/// Byte length of an RGB buffer, or `None` if it does not fit in `usize`.
fn rgb_buffer_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(3)
}

/// Copy `region` out of `source` and run it through the filter chain.
///
/// The output is `region.pixel_size()` pixels with the origin rounded to
/// the nearest source pixel. Pixels outside the source get `background`
/// and are not filtered. A source whose buffer does not match its
/// dimensions fails with [`ExportError::ImageNotReady`].
pub fn crop_source(
    source: &DecodedImage,
    region: &SourceRect,
    adjustments: &AdjustmentParams,
    background: [u8; 3],
) -> Result<DecodedImage, ExportError> {
    let (width, height) = region.pixel_size();
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyCrop { width, height });
    }
    if width > MAX_OUTPUT_DIMENSION || height > MAX_OUTPUT_DIMENSION {
        return Err(ExportError::TooLarge { width, height });
    }
    let capacity = rgb_buffer_len(width, height).ok_or(ExportError::TooLarge { width, height })?;
    if !source.is_usable() {
        return Err(ExportError::ImageNotReady);
    }

    let out_w = width as i64;
    let src_w = source.width as i64;
    let src_h = source.height as i64;
    let origin_x = region.x.round() as i64;
    let origin_y = region.y.round() as i64;

    // Output columns [in_start, in_end) map inside the source horizontally
    let in_start = (-origin_x).clamp(0, out_w);
    let in_end = (src_w - origin_x).clamp(in_start, out_w);

    let mut pixels = Vec::with_capacity(capacity);
    let fill = |pixels: &mut Vec<u8>, count: i64| {
        for _ in 0..count {
            pixels.extend_from_slice(&background);
        }
    };

    for row in 0..height as i64 {
        let src_y = origin_y + row;
        if !(0..src_h).contains(&src_y) || in_start == in_end {
            fill(&mut pixels, out_w);
            continue;
        }

        fill(&mut pixels, in_start);
        let begin = ((src_y * src_w + origin_x + in_start) * 3) as usize;
        let end = begin + ((in_end - in_start) * 3) as usize;
        let copied = pixels.len();
        let span = source
            .pixels
            .get(begin..end)
            .ok_or(ExportError::ImageNotReady)?;
        pixels.extend_from_slice(span);
        apply_adjustments(&mut pixels[copied..], adjustments);
        fill(&mut pixels, out_w - in_end);
    }

    Ok(DecodedImage::new(width, height, pixels))
}

/// Produce the encoded output image.
///
/// Fails with [`ExportError::ImageNotReady`] before anything is decoded or
/// encoded if `source` is absent, empty or has a mismatched buffer.
pub fn resolve(
    crop: &CropRect,
    fit: &DisplayFit,
    adjustments: &AdjustmentParams,
    source: Option<&DecodedImage>,
    config: &EditorConfig,
) -> Result<ExportedImage, ExportError> {
    let source = source
        .filter(|s| s.is_usable())
        .ok_or(ExportError::ImageNotReady)?;

    let region = resolve_source_rect(crop, fit);
    let [r, g, b, _] = config.background;
    let cropped = crop_source(source, &region, adjustments, [r, g, b])?;
    let bytes = encode_jpeg(&cropped, config.jpeg_quality)?;

    log::debug!(
        "exported {}x{} crop from source region ({:.1}, {:.1}) as {} bytes",
        cropped.width,
        cropped.height,
        region.x,
        region.y,
        bytes.len()
    );
    Ok(ExportedImage {
        bytes,
        width: cropped.width,
        height: cropped.height,
    })
}

/// Snapshot of the editor state an export needs.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub source: Option<Arc<DecodedImage>>,
    pub crop: CropRect,
    /// Fit of the image the crop currently overlays.
    pub fit: Option<DisplayFit>,
    pub adjustments: AdjustmentParams,
    pub config: EditorConfig,
}

/// Guards the single-in-flight export contract.
#[derive(Debug, Clone)]
pub struct ExportSlot {
    semaphore: Arc<Semaphore>,
}

impl Default for ExportSlot {
    fn default() -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(1)),
        }
    }
}

impl ExportSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while an [`ExportJob`] from this slot is alive.
    pub fn is_busy(&self) -> bool {
        self.semaphore.available_permits() == 0
    }

    /// Claim the slot for `request`.
    pub fn begin(&self, request: ExportRequest) -> Result<ExportJob, ExportError> {
        let permit = Arc::clone(&self.semaphore)
            .try_acquire_owned()
            .map_err(|_| {
                log::warn!("export requested while another export is in flight");
                ExportError::Busy
            })?;
        Ok(ExportJob {
            request,
            _permit: permit,
        })
    }
}

/// A claimed export. Dropping it, run or not, frees the slot.
#[derive(Debug)]
pub struct ExportJob {
    request: ExportRequest,
    _permit: OwnedSemaphorePermit,
}

impl ExportJob {
    pub fn request(&self) -> &ExportRequest {
        &self.request
    }

    /// Crop, filter and encode. The slot is released when this completes.
    pub async fn run(self) -> Result<ExportedImage, ExportError> {
        let request = &self.request;
        let fit = request.fit.as_ref().ok_or(ExportError::ImageNotReady)?;
        resolve(
            &request.crop,
            fit,
            &request.adjustments,
            request.source.as_deref(),
            &request.config,
        )
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
