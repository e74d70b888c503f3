use crate::RegionError;

use std::fmt;

/// A point in physical screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScreenPoint {
    /// Horizontal coordinate.
    pub x: u32,
    /// Vertical coordinate.
    pub y: u32,
}

impl ScreenPoint {
    /// Create a point from pixel coordinates.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Rectangular screen region to capture, normalized so `(x1, y1)` is the
/// top-left corner and `x1 < x2`, `y1 < y2` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    x1: u32,
    y1: u32,
    x2: u32,
    y2: u32,
}

impl BoundingBox {
    /// Build a box from two arbitrary corners of a drag gesture.
    ///
    /// Corners may be given in any order. A rectangle with zero width or
    /// zero height is rejected.
    pub fn from_corners(a: ScreenPoint, b: ScreenPoint) -> Result<Self, RegionError> {
        let (x1, x2) = (a.x.min(b.x), a.x.max(b.x));
        let (y1, y2) = (a.y.min(b.y), a.y.max(b.y));

        if x1 == x2 || y1 == y2 {
            return Err(RegionError::ZeroArea {
                width: x2 - x1,
                height: y2 - y1,
            });
        }

        Ok(Self { x1, y1, x2, y2 })
    }

    /// The whole display: `(0, 0, width, height)`.
    pub fn full_screen(width: u32, height: u32) -> Result<Self, RegionError> {
        Self::from_corners(ScreenPoint::new(0, 0), ScreenPoint::new(width, height))
    }

    /// Left edge.
    pub fn x1(&self) -> u32 {
        self.x1
    }

    /// Top edge.
    pub fn y1(&self) -> u32 {
        self.y1
    }

    /// Right edge (exclusive).
    pub fn x2(&self) -> u32 {
        self.x2
    }

    /// Bottom edge (exclusive).
    pub fn y2(&self) -> u32 {
        self.y2
    }

    /// Width in pixels. Always greater than zero.
    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    /// Height in pixels. Always greater than zero.
    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width()) / f64::from(self.height())
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})-({},{}) {}x{}",
            self.x1,
            self.y1,
            self.x2,
            self.y2,
            self.width(),
            self.height()
        )
    }
}
