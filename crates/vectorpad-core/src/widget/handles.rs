//! Handle definitions for shape manipulation.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Logical corner identity of a box-like shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    BottomLeft,
    BottomRight,
    TopRight,
}

impl Corner {
    /// Canonical order, also the hotzone priority order.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::BottomLeft,
        Corner::BottomRight,
        Corner::TopRight,
    ];

    /// Position in [`Corner::ALL`].
    pub fn index(self) -> usize {
        match self {
            Corner::TopLeft => 0,
            Corner::BottomLeft => 1,
            Corner::BottomRight => 2,
            Corner::TopRight => 3,
        }
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    /// Diagonally opposite corner.
    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 2)
    }
}

/// What a pointer-down engaged on a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// One of the four resize corners.
    Corner(Corner),
    /// Line endpoint (0 = start, 1 = end).
    Endpoint(usize),
    /// The shape body; dragging translates.
    Body,
}

/// A corner handle in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerHandle {
    pub corner: Corner,
    /// The real, transformed corner.
    pub point: Point,
    /// Top-left of the square hotzone centred on `point`.
    pub anchor: Point,
    /// Side length of the hotzone.
    pub size: f64,
}

impl CornerHandle {
    pub fn new(corner: Corner, point: Point, size: f64) -> Self {
        let half = size / 2.0;
        Self {
            corner,
            point,
            anchor: point - Vec2::new(half, half),
            size,
        }
    }

    /// Square hit region of the handle.
    pub fn hotzone(&self) -> Rect {
        Rect::new(
            self.anchor.x,
            self.anchor.y,
            self.anchor.x + self.size,
            self.anchor.y + self.size,
        )
    }

    /// Check if a screen point lies inside the hotzone.
    pub fn hit_test(&self, pointer: Point) -> bool {
        let zone = self.hotzone();
        pointer.x >= zone.x0 && pointer.x <= zone.x1 && pointer.y >= zone.y0 && pointer.y <= zone.y1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_order() {
        assert_eq!(Corner::from_index(5), Corner::BottomLeft);
        assert_eq!(Corner::TopLeft.opposite(), Corner::BottomRight);
        assert_eq!(Corner::TopRight.opposite(), Corner::BottomLeft);
        for corner in Corner::ALL {
            assert_eq!(Corner::from_index(corner.index()), corner);
        }
    }

    #[test]
    fn test_hotzone_centred_on_corner() {
        let handle = CornerHandle::new(Corner::TopLeft, Point::new(50.0, 50.0), 20.0);
        assert_eq!(handle.hotzone(), Rect::new(40.0, 40.0, 60.0, 60.0));
        assert!(handle.hit_test(Point::new(59.0, 41.0)));
        assert!(!handle.hit_test(Point::new(61.0, 50.0)));
    }
}
