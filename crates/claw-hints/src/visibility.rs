#![forbid(unsafe_code)]

//! Visibility filter.
//!
//! An element is relevant when it has area and touches the viewport. Edges
//! are inclusive on both sides: an element whose top sits exactly on the
//! viewport's bottom edge still counts, as does one whose bottom sits
//! exactly on the top edge.

use claw_core::geometry::{Rect, Viewport};

/// Whether an element with bounding rectangle `rect` should get a label.
#[must_use]
pub fn is_relevant(rect: &Rect, viewport: &Viewport) -> bool {
    rect.width > 0.0
        && rect.height > 0.0
        && rect.bottom() >= 0.0
        && rect.right() >= 0.0
        && rect.top <= viewport.height
        && rect.left <= viewport.width
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: Viewport = Viewport::new(800.0, 600.0);

    #[test]
    fn inside_is_relevant() {
        assert!(is_relevant(&Rect::new(10.0, 10.0, 50.0, 20.0), &VP));
    }

    #[test]
    fn zero_size_is_not_relevant() {
        assert!(!is_relevant(&Rect::new(10.0, 10.0, 0.0, 20.0), &VP));
        assert!(!is_relevant(&Rect::new(10.0, 10.0, 50.0, 0.0), &VP));
    }

    #[test]
    fn top_on_bottom_edge_is_relevant() {
        assert!(is_relevant(&Rect::new(10.0, 600.0, 50.0, 20.0), &VP));
        assert!(!is_relevant(&Rect::new(10.0, 600.5, 50.0, 20.0), &VP));
    }

    #[test]
    fn left_on_right_edge_is_relevant() {
        assert!(is_relevant(&Rect::new(800.0, 10.0, 50.0, 20.0), &VP));
        assert!(!is_relevant(&Rect::new(801.0, 10.0, 50.0, 20.0), &VP));
    }

    #[test]
    fn above_and_left_edges_are_inclusive() {
        assert!(is_relevant(&Rect::new(10.0, -20.0, 50.0, 20.0), &VP));
        assert!(!is_relevant(&Rect::new(10.0, -21.0, 50.0, 20.0), &VP));
        assert!(is_relevant(&Rect::new(-50.0, 10.0, 50.0, 20.0), &VP));
        assert!(!is_relevant(&Rect::new(-51.0, 10.0, 50.0, 20.0), &VP));
    }

    #[test]
    fn partially_visible_is_relevant() {
        assert!(is_relevant(&Rect::new(-25.0, 590.0, 50.0, 40.0), &VP));
    }

    #[test]
    fn nan_geometry_is_not_relevant() {
        assert!(!is_relevant(&Rect::new(f64::NAN, 10.0, 50.0, 20.0), &VP));
    }
}
