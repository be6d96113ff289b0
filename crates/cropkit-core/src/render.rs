//! Render pipeline: composites one preview frame.
//!
//! # Frame Composition
//!
//! 1. Fill the surface with the background colour
//! 2. Inside the crop rectangle only, draw the source image scaled and
//!    centered per [`DisplayFit`], run through the adjustment filter chain
//! 3. Stroke the crop outline and draw the four corner handles on top,
//!    unaffected by the clip
//!
//! A pixel belongs to a region when its center lies inside it. The scaled
//! source is cached between frames and rebuilt only when the displayed
//! size changes.

use std::ops::Range;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage, RgbImage};

use crate::adjustments::adjust_pixel;
use crate::config::EditorConfig;
use crate::decode::DecodedImage;
use crate::geometry::{Corner, CropRect, DisplayFit, Size};
use crate::AdjustmentParams;

/// A rendered RGBA frame the size of the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    image: RgbaImage,
}

impl Frame {
    fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba(color)),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// RGBA value at `(x, y)`. Panics outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    /// Row-major RGBA bytes.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.image.into_raw()
    }

    /// Fill the pixels whose centers fall in `[left, right) x [top, bottom)`.
    fn fill_rect(&mut self, left: f64, top: f64, right: f64, bottom: f64, color: [u8; 4]) {
        let cols = pixel_span(left, right, self.width());
        let rows = pixel_span(top, bottom, self.height());
        for y in rows {
            for x in cols.clone() {
                self.image.put_pixel(x, y, Rgba(color));
            }
        }
    }

    fn stroke_rect(&mut self, rect: &CropRect, width: f64, color: [u8; 4]) {
        let half = width / 2.0;
        let (l, t, r, b) = (rect.x, rect.y, rect.right(), rect.bottom());
        self.fill_rect(l - half, t - half, r + half, t + half, color);
        self.fill_rect(l - half, b - half, r + half, b + half, color);
        self.fill_rect(l - half, t - half, l + half, b + half, color);
        self.fill_rect(r - half, t - half, r + half, b + half, color);
    }
}

/// Pixel indices whose centers fall in `[start, end)`, limited to `0..limit`.
fn pixel_span(start: f64, end: f64, limit: u32) -> Range<u32> {
    let to_index = |edge: f64| (edge - 0.5).ceil().clamp(0.0, limit as f64) as u32;
    let (a, b) = (to_index(start), to_index(end));
    a..b.max(a)
}

fn intersect(a: Range<u32>, b: Range<u32>) -> Range<u32> {
    let start = a.start.max(b.start);
    start..a.end.min(b.end).max(start)
}

/// Source image scaled to its displayed size.
#[derive(Debug)]
struct Preview {
    image: RgbImage,
}

impl Preview {
    fn build(source: &DecodedImage, width: u32, height: u32) -> Option<Self> {
        let view = source.as_rgb_view()?;
        let image = if (width, height) == (source.width, source.height) {
            RgbImage::from_raw(width, height, source.pixels.clone())?
        } else {
            imageops::resize(&view, width, height, FilterType::Triangle)
        };
        log::debug!("built {}x{} preview", width, height);
        Some(Self { image })
    }

    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Draws preview frames, caching the scaled source between calls.
#[derive(Debug, Default)]
pub struct Renderer {
    preview: Option<Preview>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the cached preview (new image loaded).
    pub fn invalidate(&mut self) {
        self.preview = None;
    }

    /// Size of the cached preview, if any.
    pub fn cached_preview_size(&self) -> Option<(u32, u32)> {
        self.preview.as_ref().map(Preview::size)
    }

    /// Render one frame.
    ///
    /// Returns `None` when the surface has no pixels or the source cannot
    /// be displayed; callers treat that as a silent no-op.
    pub fn render(
        &mut self,
        source: &DecodedImage,
        crop: &CropRect,
        adjustments: &AdjustmentParams,
        surface: Size,
        config: &EditorConfig,
    ) -> Option<Frame> {
        let width = surface_pixels(surface.width);
        let height = surface_pixels(surface.height);
        if width == 0 || height == 0 {
            log::trace!("render skipped: surface unavailable");
            return None;
        }
        let fit = DisplayFit::compute(source.size(), surface)?;

        let preview_w = fit.display_width.round().max(1.0) as u32;
        let preview_h = fit.display_height.round().max(1.0) as u32;
        if self.cached_preview_size() != Some((preview_w, preview_h)) {
            self.preview = Preview::build(source, preview_w, preview_h);
        }
        let preview = self.preview.as_ref()?;

        let mut frame = Frame::filled(width, height, config.background);
        draw_clipped_image(&mut frame, preview, &fit, crop, adjustments);

        frame.stroke_rect(crop, config.outline_width, config.outline);
        let half = config.handle_size / 2.0;
        for corner in Corner::ALL {
            let c = crop.corner(corner);
            frame.fill_rect(c.x - half, c.y - half, c.x + half, c.y + half, config.outline);
        }

        Some(frame)
    }
}

fn surface_pixels(extent: f64) -> u32 {
    if extent.is_finite() && extent > 0.0 {
        extent.round().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

/// Draw the filtered preview into the part of the frame covered by `crop`.
fn draw_clipped_image(
    frame: &mut Frame,
    preview: &Preview,
    fit: &DisplayFit,
    crop: &CropRect,
    adjustments: &AdjustmentParams,
) {
    let image_rect = fit.image_rect();
    let cols = intersect(
        pixel_span(crop.x, crop.right(), frame.width()),
        pixel_span(image_rect.x, image_rect.right(), frame.width()),
    );
    let rows = intersect(
        pixel_span(crop.y, crop.bottom(), frame.height()),
        pixel_span(image_rect.y, image_rect.bottom(), frame.height()),
    );

    let (pw, ph) = preview.size();
    let sx = pw as f64 / fit.display_width;
    let sy = ph as f64 / fit.display_height;

    for y in rows {
        let py = (((y as f64 + 0.5 - fit.offset_y) * sy).floor() as i64).clamp(0, ph as i64 - 1);
        for x in cols.clone() {
            let px = (((x as f64 + 0.5 - fit.offset_x) * sx).floor() as i64).clamp(0, pw as i64 - 1);
            let [r, g, b] = adjust_pixel(preview.image.get_pixel(px as u32, py as u32).0, adjustments);
            frame.image.put_pixel(x, y, Rgba([r, g, b, 255]));
        }
    }
}
