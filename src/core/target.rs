//! The thing being scrolled.
//!
//! The animator never owns its target; it borrows one per call so a single
//! host object (a pane, a page) can be driven by several impulse sources.

use super::geometry::{Axis, Vec2};

/// Read/write access to a scrollable surface.
pub trait ScrollTarget {
    /// Current scroll offset.
    fn scroll_offset(&self) -> Vec2;

    /// Write a new scroll offset.  Hosts may clamp it further.
    fn set_scroll_offset(&mut self, offset: Vec2);

    /// Largest valid offset per axis (content minus viewport, never negative).
    fn max_scroll(&self) -> Vec2;
}

/// An in-memory scroll surface sized in pixels.
///
/// Writes are clamped to `[0, max_scroll]`, the same way a browser viewport
/// silently clamps `scrollTo`.
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    offset: Vec2,
    content: Vec2,
    visible: Vec2,
}

impl Viewport {
    pub fn new(content: Vec2, visible: Vec2) -> Self {
        Self {
            offset: Vec2::ZERO,
            content: content.max_zero(),
            visible: visible.max_zero(),
        }
    }

    /// Size of the visible region.
    pub fn visible(&self) -> Vec2 {
        self.visible
    }

    /// Resize the viewport (terminal resize).  The offset is re-clamped.
    pub fn set_visible(&mut self, visible: Vec2) {
        self.visible = visible.max_zero();
        self.offset = self.clamp(self.offset);
    }

    /// Clamp `offset` into `[0, max_scroll]` on both axes.
    pub fn clamp(&self, offset: Vec2) -> Vec2 {
        let max = self.max_scroll();
        let mut out = offset;
        for axis in Axis::BOTH {
            out[axis] = out[axis].clamp(0.0, max[axis]);
        }
        out
    }

    /// Fraction of the scroll range covered on `axis` (0.0 when not scrollable).
    pub fn fraction(&self, axis: Axis) -> f64 {
        let max = self.max_scroll()[axis];
        if max <= 0.0 {
            0.0
        } else {
            self.offset[axis] / max
        }
    }
}

impl ScrollTarget for Viewport {
    fn scroll_offset(&self) -> Vec2 {
        self.offset
    }

    fn set_scroll_offset(&mut self, offset: Vec2) {
        self.offset = self.clamp(offset);
    }

    fn max_scroll(&self) -> Vec2 {
        (self.content - self.visible).max_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_scroll_is_content_minus_viewport() {
        let vp = Viewport::new(Vec2::new(300.0, 1000.0), Vec2::new(200.0, 400.0));
        assert_eq!(vp.max_scroll(), Vec2::new(100.0, 600.0));
    }

    #[test]
    fn content_smaller_than_viewport_is_not_scrollable() {
        let mut vp = Viewport::new(Vec2::new(50.0, 50.0), Vec2::new(200.0, 400.0));
        assert_eq!(vp.max_scroll(), Vec2::ZERO);

        vp.set_scroll_offset(Vec2::new(30.0, 30.0));
        assert_eq!(vp.scroll_offset(), Vec2::ZERO);
        assert_eq!(vp.fraction(Axis::Y), 0.0);
    }

    #[test]
    fn writes_are_clamped() {
        let mut vp = Viewport::new(Vec2::new(0.0, 1000.0), Vec2::new(0.0, 400.0));
        vp.set_scroll_offset(Vec2::new(0.0, 900.0));
        assert_eq!(vp.scroll_offset().y, 600.0);
        vp.set_scroll_offset(Vec2::new(0.0, -5.0));
        assert_eq!(vp.scroll_offset().y, 0.0);
    }

    #[test]
    fn growing_viewport_pulls_offset_back() {
        let mut vp = Viewport::new(Vec2::new(0.0, 1000.0), Vec2::new(0.0, 400.0));
        vp.set_scroll_offset(Vec2::new(0.0, 600.0));
        vp.set_visible(Vec2::new(0.0, 800.0));
        assert_eq!(vp.scroll_offset().y, 200.0);
        assert!((vp.fraction(Axis::Y) - 1.0).abs() < 1e-9);
    }
}
