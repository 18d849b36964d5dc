//! Interactive crop-region editing.
//!
//! The engine keeps a rectangle in source-image pixel coordinates and
//! resolves pointer drags against one of nine handles. Every drag update is
//! a pure function of the drag-start snapshot and the current pointer, never
//! of accumulated deltas, so repeated delivery of the same pointer position
//! is harmless and there is no floating-point drift across long gestures.

use egui::{Pos2, Vec2};

use crate::error::CropError;
use crate::image::SourceImage;

/// Smallest allowed crop edge, in source pixels.
pub const MIN_CROP_SIZE: f32 = 50.0;

/// The nine ways a crop rectangle can be grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropHandle {
    Move,
    North,
    South,
    East,
    West,
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

/// Axis-aligned rectangle in source-image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CropRegion {
    /// The full-image region, the default when crop mode is entered.
    pub fn full(image_size: Vec2) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: image_size.x,
            height: image_size.y,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// True when the region lies inside `bounds` and respects the minimum
    /// size (minimum waived for images smaller than [`MIN_CROP_SIZE`]).
    pub fn is_valid_within(&self, bounds: Vec2) -> bool {
        let min_w = MIN_CROP_SIZE.min(bounds.x);
        let min_h = MIN_CROP_SIZE.min(bounds.y);
        self.x >= 0.0
            && self.y >= 0.0
            && self.right() <= bounds.x
            && self.bottom() <= bounds.y
            && self.width >= min_w
            && self.height >= min_h
    }
}

/// Snapshot captured at pointer-down; all updates derive from it.
#[derive(Debug, Clone, Copy)]
struct DragState {
    handle: CropHandle,
    pointer_start: Pos2,
    region_start: CropRegion,
}

/// Translates pointer-drag gestures into a valid [`CropRegion`] and
/// rasterizes the selection on commit.
#[derive(Debug)]
pub struct CropEngine {
    image_size: Vec2,
    region: Option<CropRegion>,
    drag: Option<DragState>,
}

impl CropEngine {
    /// Enter crop mode over an image; the region starts as the full image.
    pub fn new(image_size: Vec2) -> Self {
        Self {
            image_size,
            region: Some(CropRegion::full(image_size)),
            drag: None,
        }
    }

    pub fn region(&self) -> Option<CropRegion> {
        self.region
    }

    pub fn image_size(&self) -> Vec2 {
        self.image_size
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Capture the drag-start snapshot. Always succeeds; a drag with no
    /// region (possible only after cancel) is ignored at update time.
    pub fn begin_drag(&mut self, handle: CropHandle, pointer: Pos2) {
        let Some(region) = self.region else { return };
        self.drag = Some(DragState {
            handle,
            pointer_start: pointer,
            region_start: region,
        });
    }

    /// Resolve the current pointer position against the drag-start snapshot.
    ///
    /// `display_size` is the on-screen size of the image preview the pointer
    /// moves over; deltas are scaled from display space into source-pixel
    /// space before the handle transform is applied. No-op without an
    /// active drag.
    pub fn update_drag(&mut self, pointer: Pos2, display_size: Vec2) {
        let Some(drag) = self.drag else { return };
        if display_size.x <= 0.0 || display_size.y <= 0.0 {
            return;
        }
        let scale = Vec2::new(
            self.image_size.x / display_size.x,
            self.image_size.y / display_size.y,
        );
        let delta = Vec2::new(
            (pointer.x - drag.pointer_start.x) * scale.x,
            (pointer.y - drag.pointer_start.y) * scale.y,
        );
        self.region = Some(resolve_drag(
            drag.region_start,
            drag.handle,
            delta,
            self.image_size,
        ));
    }

    /// End the gesture; the region stays as last computed.
    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Rasterize the selected sub-rectangle into a new standalone bitmap at
    /// 1:1 pixel scale. On success the region is consumed and the crop
    /// session is over.
    pub fn commit(&mut self, source: Option<&SourceImage>) -> Result<SourceImage, CropError> {
        let region = self.region.ok_or(CropError::NoRegion)?;
        let source = source.ok_or(CropError::NoSourceImage)?;

        let x = region.x.round().max(0.0) as u32;
        let y = region.y.round().max(0.0) as u32;
        let width = region.width.round().max(1.0) as u32;
        let height = region.height.round().max(1.0) as u32;

        let cropped = source.crop_to(x, y, width, height);
        log::info!(
            "crop committed: {}x{} at ({x},{y}) from {}x{}",
            cropped.width(),
            cropped.height(),
            source.width(),
            source.height()
        );
        self.region = None;
        self.drag = None;
        Ok(cropped)
    }

    /// Discard the region and exit crop mode without touching the source.
    pub fn cancel(&mut self) {
        self.region = None;
        self.drag = None;
    }
}

/// Apply a handle-specific transform to the drag-start region, clamping the
/// moving edge against the opposite edge so the rectangle can never invert,
/// then clamp the whole rectangle into the image bounds.
fn resolve_drag(start: CropRegion, handle: CropHandle, delta: Vec2, bounds: Vec2) -> CropRegion {
    let min = MIN_CROP_SIZE.min(bounds.x).min(bounds.y);
    let mut r = start;

    match handle {
        CropHandle::Move => {
            r.x = (start.x + delta.x).clamp(0.0, (bounds.x - start.width).max(0.0));
            r.y = (start.y + delta.y).clamp(0.0, (bounds.y - start.height).max(0.0));
        }
        CropHandle::NorthWest => {
            r.x = (start.x + delta.x).min(start.right() - min);
            r.y = (start.y + delta.y).min(start.bottom() - min);
            r.width = start.width - (r.x - start.x);
            r.height = start.height - (r.y - start.y);
        }
        CropHandle::NorthEast => {
            r.y = (start.y + delta.y).min(start.bottom() - min);
            r.width = (start.width + delta.x).max(min);
            r.height = start.height - (r.y - start.y);
        }
        CropHandle::SouthWest => {
            r.x = (start.x + delta.x).min(start.right() - min);
            r.width = start.width - (r.x - start.x);
            r.height = (start.height + delta.y).max(min);
        }
        CropHandle::SouthEast => {
            r.width = (start.width + delta.x).max(min);
            r.height = (start.height + delta.y).max(min);
        }
        CropHandle::North => {
            r.y = (start.y + delta.y).min(start.bottom() - min);
            r.height = start.height - (r.y - start.y);
        }
        CropHandle::South => {
            r.height = (start.height + delta.y).max(min);
        }
        CropHandle::East => {
            r.width = (start.width + delta.x).max(min);
        }
        CropHandle::West => {
            r.x = (start.x + delta.x).min(start.right() - min);
            r.width = start.width - (r.x - start.x);
        }
    }

    // Containment clamp: pull the origin inside, then cap the extent at the
    // image edge.
    r.x = r.x.max(0.0);
    r.y = r.y.max(0.0);
    r.width = r.width.min(bounds.x - r.x);
    r.height = r.height.min(bounds.y - r.y);
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Vec2 = Vec2::new(500.0, 400.0);

    fn region(x: f32, y: f32, width: f32, height: f32) -> CropRegion {
        CropRegion {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn full_region_covers_image() {
        let engine = CropEngine::new(BOUNDS);
        assert_eq!(engine.region(), Some(region(0.0, 0.0, 500.0, 400.0)));
    }

    #[test]
    fn move_preserves_size_and_clamps() {
        let start = region(10.0, 10.0, 100.0, 80.0);
        let moved = resolve_drag(start, CropHandle::Move, Vec2::new(25.0, -5.0), BOUNDS);
        assert_eq!(moved, region(35.0, 5.0, 100.0, 80.0));

        // Far beyond the corner: position clamps, size is untouched.
        let shoved = resolve_drag(start, CropHandle::Move, Vec2::new(9999.0, 9999.0), BOUNDS);
        assert_eq!(shoved, region(400.0, 320.0, 100.0, 80.0));
    }

    #[test]
    fn southeast_clamps_to_image_bounds() {
        // Huge drag: the region stops at the image edge, not at an
        // arbitrary maximum.
        let start = region(10.0, 10.0, 100.0, 80.0);
        let r = resolve_drag(start, CropHandle::SouthEast, Vec2::new(1000.0, 1000.0), BOUNDS);
        assert_eq!(r, region(10.0, 10.0, 490.0, 390.0));
    }

    #[test]
    fn northwest_cannot_invert() {
        let start = region(100.0, 100.0, 200.0, 150.0);
        // Drag far past the opposite corner.
        let r = resolve_drag(start, CropHandle::NorthWest, Vec2::new(500.0, 500.0), BOUNDS);
        assert_eq!(r.width, MIN_CROP_SIZE);
        assert_eq!(r.height, MIN_CROP_SIZE);
        assert_eq!(r.right(), start.right());
        assert_eq!(r.bottom(), start.bottom());
    }

    #[test]
    fn edge_handles_move_single_axis() {
        let start = region(50.0, 50.0, 200.0, 100.0);

        let n = resolve_drag(start, CropHandle::North, Vec2::new(30.0, 20.0), BOUNDS);
        assert_eq!(n, region(50.0, 70.0, 200.0, 80.0));

        let s = resolve_drag(start, CropHandle::South, Vec2::new(30.0, 20.0), BOUNDS);
        assert_eq!(s, region(50.0, 50.0, 200.0, 120.0));

        let e = resolve_drag(start, CropHandle::East, Vec2::new(30.0, 20.0), BOUNDS);
        assert_eq!(e, region(50.0, 50.0, 230.0, 100.0));

        let w = resolve_drag(start, CropHandle::West, Vec2::new(30.0, 20.0), BOUNDS);
        assert_eq!(w, region(80.0, 50.0, 170.0, 100.0));
    }

    #[test]
    fn every_handle_preserves_invariants_under_extreme_deltas() {
        let handles = [
            CropHandle::Move,
            CropHandle::North,
            CropHandle::South,
            CropHandle::East,
            CropHandle::West,
            CropHandle::NorthWest,
            CropHandle::NorthEast,
            CropHandle::SouthWest,
            CropHandle::SouthEast,
        ];
        let deltas = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1e6, 1e6),
            Vec2::new(-1e6, -1e6),
            Vec2::new(1e6, -1e6),
            Vec2::new(-1e6, 1e6),
            Vec2::new(3.5, -7.25),
        ];
        let start = region(120.0, 90.0, 150.0, 120.0);
        for handle in handles {
            for delta in deltas {
                let r = resolve_drag(start, handle, delta, BOUNDS);
                assert!(
                    r.is_valid_within(BOUNDS),
                    "{handle:?} with delta {delta:?} produced {r:?}"
                );
            }
        }
    }

    #[test]
    fn update_is_idempotent_for_repeated_pointer_positions() {
        let mut engine = CropEngine::new(BOUNDS);
        engine.begin_drag(CropHandle::SouthEast, Pos2::new(10.0, 10.0));

        engine.update_drag(Pos2::new(-60.0, -40.0), BOUNDS);
        let first = engine.region();
        engine.update_drag(Pos2::new(-60.0, -40.0), BOUNDS);
        assert_eq!(engine.region(), first);
    }

    #[test]
    fn update_scales_display_deltas_into_source_space() {
        // Image shown at half size: a 10px pointer move is a 20px edge move.
        let mut engine = CropEngine::new(Vec2::new(400.0, 400.0));
        engine.begin_drag(CropHandle::East, Pos2::new(0.0, 0.0));
        engine.update_drag(Pos2::new(-10.0, 0.0), Vec2::new(200.0, 200.0));
        let r = engine.region().unwrap();
        assert_eq!(r.width, 380.0);
    }

    #[test]
    fn update_without_drag_is_a_noop() {
        let mut engine = CropEngine::new(BOUNDS);
        let before = engine.region();
        engine.update_drag(Pos2::new(50.0, 50.0), BOUNDS);
        assert_eq!(engine.region(), before);
    }

    #[test]
    fn commit_requires_region_and_source() {
        let mut engine = CropEngine::new(BOUNDS);
        engine.cancel();
        assert_eq!(engine.commit(None).unwrap_err(), CropError::NoRegion);

        let mut engine = CropEngine::new(BOUNDS);
        assert_eq!(engine.commit(None).unwrap_err(), CropError::NoSourceImage);
    }

    #[test]
    fn cancel_discards_region() {
        let mut engine = CropEngine::new(BOUNDS);
        engine.begin_drag(CropHandle::Move, Pos2::ZERO);
        engine.cancel();
        assert_eq!(engine.region(), None);
        assert!(!engine.is_dragging());
    }
}
