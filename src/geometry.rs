//! Logical (image pixel) geometry and the zoom/scroll viewport that maps it
//! to the screen.

use egui::{pos2, Pos2, Vec2};

use crate::config::ViewportConfig;
use crate::region::MIN_REGION_SIZE;

// ── Rectangles ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corner {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::NorthWest,
        Corner::NorthEast,
        Corner::SouthWest,
        Corner::SouthEast,
    ];

    pub fn opposite(self) -> Corner {
        match self {
            Corner::NorthWest => Corner::SouthEast,
            Corner::NorthEast => Corner::SouthWest,
            Corner::SouthWest => Corner::NorthEast,
            Corner::SouthEast => Corner::NorthWest,
        }
    }
}

/// Axis-aligned rectangle in logical image pixels. Width and height are
/// never negative.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl FieldRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Zero-sized rectangle at `p`.
    pub fn at(p: Pos2) -> Self {
        Self::new(p.x, p.y, 0.0, 0.0)
    }

    /// Bounding box of two points, in any order.
    pub fn from_corners(a: Pos2, b: Pos2) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn min(&self) -> Pos2 {
        pos2(self.left, self.top)
    }

    pub fn max(&self) -> Pos2 {
        pos2(self.right(), self.bottom())
    }

    pub fn corner(&self, corner: Corner) -> Pos2 {
        match corner {
            Corner::NorthWest => pos2(self.left, self.top),
            Corner::NorthEast => pos2(self.right(), self.top),
            Corner::SouthWest => pos2(self.left, self.bottom()),
            Corner::SouthEast => pos2(self.right(), self.bottom()),
        }
    }

    pub fn contains(&self, p: Pos2) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    /// Drag `corner` to `pointer` while the opposite corner stays put. Dragging
    /// past the opposite edge flips the rectangle instead of inverting it.
    pub fn resized(&self, corner: Corner, pointer: Pos2) -> Self {
        Self::from_corners(self.corner(corner.opposite()), pointer)
    }

    pub fn meets_minimum(&self) -> bool {
        self.width >= MIN_REGION_SIZE && self.height >= MIN_REGION_SIZE
    }
}

// ── Viewport ────────────────────────────────────────────────────────────────

/// Zoom that shows the whole image inside the viewport without scrolling.
pub fn compute_fit_zoom(viewport: Vec2, image: Vec2) -> f32 {
    if image.x <= 0.0 || image.y <= 0.0 || viewport.x <= 0.0 || viewport.y <= 0.0 {
        return 1.0;
    }
    (viewport.x / image.x).min(viewport.y / image.y)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    origin: Pos2,
    size: Vec2,
    scroll: Vec2,
    zoom: f32,
    base_zoom: f32,
    zoom_step: f32,
    min_zoom: f32,
}

impl Viewport {
    pub fn new(config: &ViewportConfig) -> Self {
        Self {
            origin: Pos2::ZERO,
            size: Vec2::ZERO,
            scroll: Vec2::ZERO,
            zoom: 1.0,
            base_zoom: 1.0,
            zoom_step: config.zoom_step,
            min_zoom: config.min_zoom.max(f32::EPSILON),
        }
    }

    /// Where the viewport sits on screen this frame.
    pub fn set_frame(&mut self, origin: Pos2, size: Vec2) {
        self.origin = origin;
        self.size = size;
    }

    /// Fit a freshly loaded image: base zoom = current zoom = fit zoom,
    /// scroll back to the top-left corner.
    pub fn fit_image(&mut self, image_size: Vec2) {
        let fit = compute_fit_zoom(self.size, image_size);
        self.base_zoom = fit;
        self.zoom = fit;
        self.scroll = Vec2::ZERO;
        log::debug!("fit zoom {fit:.3} for image {image_size:?} in {:?}", self.size);
    }

    /// Convert screen-space coords to image-space
    pub fn to_logical(&self, screen: Pos2) -> Pos2 {
        let rel = screen - self.origin + self.scroll;
        pos2(rel.x / self.zoom, rel.y / self.zoom)
    }

    /// Convert image-space coords to screen-space
    pub fn to_screen(&self, logical: Pos2) -> Pos2 {
        self.origin + logical.to_vec2() * self.zoom - self.scroll
    }

    pub fn rect_to_screen(&self, rect: &FieldRect) -> egui::Rect {
        egui::Rect::from_min_max(self.to_screen(rect.min()), self.to_screen(rect.max()))
    }

    /// Length of `screen_px` screen pixels in logical units.
    pub fn to_logical_len(&self, screen_px: f32) -> f32 {
        screen_px / self.zoom
    }

    pub fn zoom_in(&mut self) {
        self.zoom += self.zoom_step;
    }

    /// Never goes below the floor, and never zooms *in* when a fit zoom
    /// already started under it.
    pub fn zoom_out(&mut self) {
        if self.zoom <= self.min_zoom {
            return;
        }
        self.zoom = (self.zoom - self.zoom_step).max(self.min_zoom);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = self.base_zoom;
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn base_zoom(&self) -> f32 {
        self.base_zoom
    }

    pub fn scroll(&self) -> Vec2 {
        self.scroll
    }

    pub fn set_scroll(&mut self, scroll: Vec2) {
        self.scroll = scroll;
    }
}
