//! Drag engine: turns a pointer gesture into crop rectangle updates.
//!
//! The engine is a two-state machine, `Idle -> Active -> Idle`. A gesture
//! starts on pointer-down over a handle and snapshots the pointer and the
//! rectangle at that instant. Every pointer-move derives a candidate from
//! that snapshot and the total pointer delta, so repeated or coalesced
//! move events never accumulate error.
//!
//! # Constraints
//!
//! - **Move**: the origin is clamped to `[0, surface - size]` per axis.
//! - **Resize**: each axis is committed only while its candidate size
//!   exceeds the minimum; otherwise that axis keeps its last committed
//!   value. No surface bound is applied to resizes.

use crate::geometry::{Corner, CropRect, Point, Size};
use crate::hit_test::Handle;

/// What an active gesture does to the rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Translate the whole rectangle.
    Move,
    /// Drag one corner, adjusting the two edges that meet there.
    Resize(Corner),
}

impl GestureKind {
    /// Gesture started by grabbing `handle`, if any.
    pub fn from_handle(handle: Handle) -> Option<Self> {
        match handle {
            Handle::Corner(corner) => Some(GestureKind::Resize(corner)),
            Handle::Move => Some(GestureKind::Move),
            Handle::None => None,
        }
    }
}

/// An in-progress drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gesture {
    pub kind: GestureKind,
    /// Pointer position at pointer-down.
    pub anchor_pointer: Point,
    /// Rectangle at pointer-down.
    pub anchor_rect: CropRect,
}

impl Gesture {
    /// Next committed rectangle for `pointer`.
    ///
    /// `current` is the last committed rectangle of this gesture; resize
    /// axes that would become too small keep its values.
    pub fn apply(&self, pointer: Point, current: CropRect, surface: Size, min_size: f64) -> CropRect {
        let dx = pointer.x - self.anchor_pointer.x;
        let dy = pointer.y - self.anchor_pointer.y;
        let anchor = self.anchor_rect;

        match self.kind {
            GestureKind::Move => CropRect {
                x: clamp_origin(anchor.x + dx, surface.width - anchor.width),
                y: clamp_origin(anchor.y + dy, surface.height - anchor.height),
                width: anchor.width,
                height: anchor.height,
            },
            GestureKind::Resize(corner) => {
                let (x, width) = resize_axis(
                    anchor.x,
                    anchor.width,
                    dx,
                    corner.is_left(),
                    (current.x, current.width),
                    min_size,
                );
                let (y, height) = resize_axis(
                    anchor.y,
                    anchor.height,
                    dy,
                    corner.is_top(),
                    (current.y, current.height),
                    min_size,
                );
                CropRect::new(x, y, width, height)
            }
        }
    }
}

/// Clamp an origin into `[0, max]`, preferring 0 when `max` is negative.
#[inline]
fn clamp_origin(value: f64, max: f64) -> f64 {
    value.min(max).max(0.0)
}

/// Resize one axis. `leading` is true when the dragged edge is the origin edge.
fn resize_axis(
    origin: f64,
    length: f64,
    delta: f64,
    leading: bool,
    committed: (f64, f64),
    min_size: f64,
) -> (f64, f64) {
    let (candidate_origin, candidate_length) = if leading {
        (origin + delta, length - delta)
    } else {
        (origin, length + delta)
    };

    if candidate_length > min_size {
        (candidate_origin, candidate_length)
    } else {
        committed
    }
}

/// Drag state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Active(Gesture),
}

/// Owns the gesture lifecycle for a single primary pointer.
#[derive(Debug, Clone)]
pub struct DragEngine {
    state: DragState,
    min_size: f64,
}

impl DragEngine {
    pub fn new(min_size: f64) -> Self {
        Self {
            state: DragState::Idle,
            min_size,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, DragState::Active(_))
    }

    /// The active gesture, if any.
    pub fn gesture(&self) -> Option<&Gesture> {
        match &self.state {
            DragState::Active(gesture) => Some(gesture),
            DragState::Idle => None,
        }
    }

    /// Start a gesture on `handle`.
    ///
    /// Returns false, leaving the state untouched, if `handle` is
    /// [`Handle::None`] or a gesture is already active.
    pub fn begin(&mut self, pointer: Point, rect: CropRect, handle: Handle) -> bool {
        if self.is_active() {
            log::trace!("ignoring pointer-down during active gesture");
            return false;
        }
        let Some(kind) = GestureKind::from_handle(handle) else {
            return false;
        };

        log::debug!("gesture {:?} started at ({:.1}, {:.1})", kind, pointer.x, pointer.y);
        self.state = DragState::Active(Gesture {
            kind,
            anchor_pointer: pointer,
            anchor_rect: rect,
        });
        true
    }

    /// Rectangle to commit for a pointer-move, or `None` when idle.
    pub fn update(&self, pointer: Point, current: CropRect, surface: Size) -> Option<CropRect> {
        let gesture = self.gesture()?;
        let next = gesture.apply(pointer, current, surface, self.min_size);
        log::trace!(
            "drag to ({:.1}, {:.1}) -> {:.1}x{:.1} at ({:.1}, {:.1})",
            pointer.x,
            pointer.y,
            next.width,
            next.height,
            next.x,
            next.y
        );
        Some(next)
    }

    /// Finish the gesture (pointer-up, pointer-leave, touch-end).
    ///
    /// No correction is applied; the last committed rectangle stays.
    pub fn end(&mut self) -> Option<Gesture> {
        match std::mem::take(&mut self.state) {
            DragState::Active(gesture) => {
                log::debug!("gesture {:?} ended", gesture.kind);
                Some(gesture)
            }
            DragState::Idle => None,
        }
    }

    /// Discard the gesture without further mutation.
    pub fn cancel(&mut self) {
        if let DragState::Active(gesture) = std::mem::take(&mut self.state) {
            log::debug!("gesture {:?} cancelled", gesture.kind);
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
