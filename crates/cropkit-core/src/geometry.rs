//! Geometry model: the crop rectangle and the display-fit transform.
//!
//! # Coordinate Spaces
//!
//! - **Surface space**: pixels of the render surface, origin top-left. The
//!   crop rectangle and pointer coordinates live here.
//! - **Source space**: pixels of the decoded source image.
//!
//! [`DisplayFit`] maps source space into surface space by a uniform scale
//! plus centering offsets. [`DisplayFit::to_source`] is the inverse used
//! by export.
//!
//! Everything in this module is a pure function of its inputs.

use serde::{Deserialize, Serialize};

/// A position in surface space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of a surface or an image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Size of a pixel grid.
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f64, height as f64)
    }

    /// True if either dimension is zero, negative or NaN.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Width divided by height.
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

/// One of the four corners of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// All corners in hit-test priority order.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// True if dragging this corner moves the rectangle's left edge.
    #[inline]
    pub fn is_left(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }

    /// True if dragging this corner moves the rectangle's top edge.
    #[inline]
    pub fn is_top(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }
}

/// Crop selection in surface coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Position of the given corner.
    pub fn corner(&self, corner: Corner) -> Point {
        match corner {
            Corner::TopLeft => Point::new(self.x, self.y),
            Corner::TopRight => Point::new(self.right(), self.y),
            Corner::BottomLeft => Point::new(self.x, self.bottom()),
            Corner::BottomRight => Point::new(self.right(), self.bottom()),
        }
    }

    /// True if `point` lies strictly inside the rectangle (edges excluded).
    pub fn contains_interior(&self, point: Point) -> bool {
        point.x > self.x && point.x < self.right() && point.y > self.y && point.y < self.bottom()
    }

    /// True if the rectangle lies within `[0, width] x [0, height]`.
    pub fn is_within(&self, surface: Size) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.right() <= surface.width
            && self.bottom() <= surface.height
    }
}

/// A rectangle in source-image space.
///
/// Not clamped to the image: it may have a negative origin or extend past
/// the source dimensions when the crop covers letterboxed background.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SourceRect {
    /// Output pixel dimensions, rounded to the nearest pixel.
    pub fn pixel_size(&self) -> (u32, u32) {
        (round_to_pixels(self.width), round_to_pixels(self.height))
    }
}

fn round_to_pixels(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

/// Uniform scale and centering offsets fitting a source image into a surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayFit {
    /// Surface units per source pixel.
    pub scale: f64,
    /// Left edge of the displayed image in surface space.
    pub offset_x: f64,
    /// Top edge of the displayed image in surface space.
    pub offset_y: f64,
    /// Displayed image width in surface space.
    pub display_width: f64,
    /// Displayed image height in surface space.
    pub display_height: f64,
}

impl DisplayFit {
    /// Compute the fit of `source` inside `surface`.
    ///
    /// Returns `None` if either size is empty.
    pub fn compute(source: Size, surface: Size) -> Option<Self> {
        if source.is_empty() || surface.is_empty() {
            return None;
        }

        let scale = (surface.width / source.width).min(surface.height / source.height);
        let display_width = source.width * scale;
        let display_height = source.height * scale;

        Some(Self {
            scale,
            offset_x: (surface.width - display_width) / 2.0,
            offset_y: (surface.height - display_height) / 2.0,
            display_width,
            display_height,
        })
    }

    /// The area covered by the displayed image, in surface space.
    pub fn image_rect(&self) -> CropRect {
        CropRect::new(
            self.offset_x,
            self.offset_y,
            self.display_width,
            self.display_height,
        )
    }

    /// Map a surface-space rectangle into source space.
    pub fn to_source(&self, rect: &CropRect) -> SourceRect {
        SourceRect {
            x: (rect.x - self.offset_x) / self.scale,
            y: (rect.y - self.offset_y) / self.scale,
            width: rect.width / self.scale,
            height: rect.height / self.scale,
        }
    }
}

/// Initial crop for a freshly loaded image.
///
/// The rectangle keeps the source aspect ratio, covers `fill` of the
/// constraining surface dimension and is centered on the surface. Both
/// sizes must be non-empty.
///
/// No minimum size is applied: a surface shorter than `min_size / fill`
/// yields a rectangle below `min_size`, and resize axes then stay frozen
/// until the rectangle is replaced.
pub fn fit_to_image(source: Size, surface: Size, fill: f64) -> CropRect {
    debug_assert!(!source.is_empty() && !surface.is_empty());

    let image_aspect = source.aspect();
    let (width, height) = if surface.aspect() < image_aspect {
        // Surface is relatively taller than the image: width constrains
        let width = surface.width * fill;
        (width, width / image_aspect)
    } else {
        let height = surface.height * fill;
        (height * image_aspect, height)
    };

    CropRect::new(
        (surface.width - width) / 2.0,
        (surface.height - height) / 2.0,
        width,
        height,
    )
}

/// Clip `rect` to `[0, surface.width] x [0, surface.height]`.
///
/// Each axis is clipped independently. If clipping an axis would leave it
/// shorter than `min_size`, that axis is returned unchanged.
pub fn clamp(rect: CropRect, surface: Size, min_size: f64) -> CropRect {
    let (x, width) = clamp_axis(rect.x, rect.width, surface.width, min_size);
    let (y, height) = clamp_axis(rect.y, rect.height, surface.height, min_size);
    CropRect::new(x, y, width, height)
}

fn clamp_axis(origin: f64, length: f64, bound: f64, min_size: f64) -> (f64, f64) {
    let start = origin.max(0.0);
    let end = (origin + length).min(bound);
    let clipped = end - start;
    if clipped >= min_size {
        (start, clipped)
    } else {
        (origin, length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn landscape_fit() -> DisplayFit {
        DisplayFit::compute(Size::new(1000.0, 800.0), Size::new(400.0, 400.0)).unwrap()
    }

    #[test]
    fn test_fit_on_tiny_surface_stays_inside() {
        // 20 * 0.75 = 15: below the minimum size, but still on the surface
        let surface = Size::new(20.0, 20.0);
        let rect = fit_to_image(Size::new(100.0, 100.0), surface, 0.75);
        assert!((rect.width - 15.0).abs() < EPS);
        assert!((rect.height - 15.0).abs() < EPS);
        assert!(rect.is_within(surface));
    }

    #[test]
    fn test_display_fit_landscape_in_square() {
        let fit = landscape_fit();
        assert!((fit.scale - 0.4).abs() < EPS);
        assert!((fit.display_width - 400.0).abs() < EPS);
        assert!((fit.display_height - 320.0).abs() < EPS);
        assert!(fit.offset_x.abs() < EPS);
        assert!((fit.offset_y - 40.0).abs() < EPS);
    }

    #[test]
    fn test_display_fit_portrait_pillarboxed() {
        let fit = DisplayFit::compute(Size::new(500.0, 1000.0), Size::new(400.0, 400.0)).unwrap();
        assert!((fit.scale - 0.4).abs() < EPS);
        assert!((fit.offset_x - 100.0).abs() < EPS);
        assert!(fit.offset_y.abs() < EPS);
    }

    #[test]
    fn test_display_fit_empty_inputs() {
        assert!(DisplayFit::compute(Size::new(0.0, 100.0), Size::new(400.0, 400.0)).is_none());
        assert!(DisplayFit::compute(Size::new(100.0, 100.0), Size::new(400.0, 0.0)).is_none());
    }

    #[test]
    fn test_fit_to_image_landscape_scenario() {
        let rect = fit_to_image(Size::new(1000.0, 800.0), Size::new(400.0, 400.0), 0.75);
        assert!((rect.x - 50.0).abs() < EPS);
        assert!((rect.y - 80.0).abs() < EPS);
        assert!((rect.width - 300.0).abs() < EPS);
        assert!((rect.height - 240.0).abs() < EPS);
    }

    #[test]
    fn test_fit_to_image_portrait_source() {
        // Image aspect 0.5 < surface aspect 1: height constrains
        let rect = fit_to_image(Size::new(500.0, 1000.0), Size::new(400.0, 400.0), 0.75);
        assert!((rect.height - 300.0).abs() < EPS);
        assert!((rect.width - 150.0).abs() < EPS);
        assert!((rect.x - 125.0).abs() < EPS);
        assert!((rect.y - 50.0).abs() < EPS);
    }

    #[test]
    fn test_to_source_full_displayed_image() {
        let fit = landscape_fit();
        let src = fit.to_source(&CropRect::new(0.0, 40.0, 400.0, 320.0));
        assert!(src.x.abs() < EPS);
        assert!(src.y.abs() < EPS);
        assert!((src.width - 1000.0).abs() < EPS);
        assert!((src.height - 800.0).abs() < EPS);
        assert_eq!(src.pixel_size(), (1000, 800));
    }

    #[test]
    fn test_to_source_letterbox_not_clamped() {
        let fit = landscape_fit();
        let src = fit.to_source(&CropRect::new(0.0, 0.0, 400.0, 400.0));
        assert!((src.y + 100.0).abs() < EPS, "origin should be negative");
        assert!((src.height - 1000.0).abs() < EPS, "height should exceed source");
    }

    #[test]
    fn test_image_rect_matches_offsets() {
        let fit = landscape_fit();
        assert_eq!(fit.image_rect(), CropRect::new(0.0, 40.0, 400.0, 320.0));
    }

    #[test]
    fn test_contains_interior_excludes_edges() {
        let rect = CropRect::new(10.0, 10.0, 100.0, 50.0);
        assert!(rect.contains_interior(Point::new(50.0, 30.0)));
        assert!(!rect.contains_interior(Point::new(10.0, 30.0)));
        assert!(!rect.contains_interior(Point::new(110.0, 30.0)));
        assert!(!rect.contains_interior(Point::new(50.0, 60.0)));
    }

    #[test]
    fn test_corner_positions() {
        let rect = CropRect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.corner(Corner::TopLeft), Point::new(10.0, 20.0));
        assert_eq!(rect.corner(Corner::TopRight), Point::new(40.0, 20.0));
        assert_eq!(rect.corner(Corner::BottomLeft), Point::new(10.0, 60.0));
        assert_eq!(rect.corner(Corner::BottomRight), Point::new(40.0, 60.0));
    }

    #[test]
    fn test_clamp_clips_overhang() {
        let surface = Size::new(400.0, 400.0);
        let rect = clamp(CropRect::new(-50.0, 350.0, 200.0, 100.0), surface, 20.0);
        assert_eq!(rect, CropRect::new(0.0, 350.0, 150.0, 50.0));
        assert!(rect.is_within(surface));
    }

    #[test]
    fn test_clamp_noop_when_axis_would_degenerate() {
        let surface = Size::new(400.0, 400.0);
        // Only 10 units of the horizontal extent are on the surface
        let rect = clamp(CropRect::new(390.0, 10.0, 100.0, 100.0), surface, 20.0);
        assert_eq!(rect.x, 390.0);
        assert_eq!(rect.width, 100.0);
        assert_eq!(rect.y, 10.0);
        assert_eq!(rect.height, 100.0);
    }

    #[test]
    fn test_clamp_inside_is_identity() {
        let rect = CropRect::new(50.0, 80.0, 300.0, 240.0);
        assert_eq!(clamp(rect, Size::new(400.0, 400.0), 20.0), rect);
    }

    #[test]
    fn test_pixel_size_handles_degenerate_values() {
        let src = SourceRect {
            x: 0.0,
            y: 0.0,
            width: f64::NAN,
            height: -5.0,
        };
        assert_eq!(src.pixel_size(), (0, 0));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn size_strategy() -> impl Strategy<Value = Size> {
        (1.0f64..=5000.0, 1.0f64..=5000.0).prop_map(|(w, h)| Size::new(w, h))
    }

    proptest! {
        /// Property: the initial crop keeps the source aspect ratio.
        #[test]
        fn prop_fit_preserves_source_aspect(
            source in size_strategy(),
            surface in size_strategy(),
        ) {
            let rect = fit_to_image(source, surface, 0.75);
            let ratio = rect.width / rect.height;
            let expected = source.aspect();
            prop_assert!(
                (ratio - expected).abs() <= expected * 1e-9,
                "ratio {} != source aspect {}", ratio, expected
            );
        }

        /// Property: the initial crop lies within the surface.
        #[test]
        fn prop_fit_within_surface(
            source in size_strategy(),
            surface in size_strategy(),
        ) {
            let rect = fit_to_image(source, surface, 0.75);
            let tol = 1e-9 * surface.width.max(surface.height);
            prop_assert!(rect.x >= -tol && rect.y >= -tol);
            prop_assert!(rect.right() <= surface.width + tol);
            prop_assert!(rect.bottom() <= surface.height + tol);
        }

        /// Property: the displayed image always fits inside the surface.
        #[test]
        fn prop_display_fit_within_surface(
            source in size_strategy(),
            surface in size_strategy(),
        ) {
            let fit = DisplayFit::compute(source, surface).unwrap();
            let tol = 1e-9 * surface.width.max(surface.height);
            prop_assert!(fit.offset_x >= -tol && fit.offset_y >= -tol);
            prop_assert!(fit.display_width <= surface.width + tol);
            prop_assert!(fit.display_height <= surface.height + tol);
        }

        /// Property: mapping the displayed image rect back yields the whole source.
        #[test]
        fn prop_image_rect_inverts_to_source(
            source in size_strategy(),
            surface in size_strategy(),
        ) {
            let fit = DisplayFit::compute(source, surface).unwrap();
            let src = fit.to_source(&fit.image_rect());
            prop_assert!(src.x.abs() < 1e-6 * source.width.max(1.0));
            prop_assert!(src.y.abs() < 1e-6 * source.height.max(1.0));
            prop_assert!((src.width - source.width).abs() < 1e-6 * source.width);
            prop_assert!((src.height - source.height).abs() < 1e-6 * source.height);
        }
    }
}
