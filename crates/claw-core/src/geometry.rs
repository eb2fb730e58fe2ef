#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Coordinates are layout units relative to the viewport origin (top-left),
//! as reported by a host's bounding-rectangle query. Values may be negative
//! for elements scrolled above or left of the viewport.

/// An element's bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Check if the rectangle has no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Shift the rectangle by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.left + dx, self.top + dy, self.width, self.height)
    }
}

/// The visible region of the document.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Visible width.
    pub width: f64,
    /// Visible height.
    pub height: f64,
    /// Horizontal scroll offset of the document.
    pub scroll_x: f64,
    /// Vertical scroll offset of the document.
    pub scroll_y: f64,
}

impl Viewport {
    /// Create an unscrolled viewport.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }

    /// Set the scroll offset.
    #[inline]
    #[must_use]
    pub const fn with_scroll(mut self, scroll_x: f64, scroll_y: f64) -> Self {
        self.scroll_x = scroll_x;
        self.scroll_y = scroll_y;
        self
    }

    /// Convert a viewport-relative rectangle into document coordinates.
    #[inline]
    #[must_use]
    pub fn to_document(&self, rect: Rect) -> Rect {
        rect.translate(self.scroll_x, self.scroll_y)
    }
}
