//! Basic GDI Geometry Types
//!
//! Points and rectangles in device coordinates, plus the small enums shared
//! by the region and path code.
//!
//! Rectangles follow the Win32 convention: `right` and `bottom` are
//! exclusive, so a rectangle with zero width or height covers no pixels.

// ============================================================================
// Point
// ============================================================================

/// Point structure
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

// ============================================================================
// Rect
// ============================================================================

/// Rectangle structure
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// The all-zero rectangle used as the extents of an empty region
    pub const EMPTY: Rect = Rect::new(0, 0, 0, 0);

    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Rect { left, top, right, bottom }
    }

    /// Build a rectangle from two corners in any order
    pub fn from_corners(a: Point, b: Point) -> Self {
        Rect {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub const fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Swap coordinates so that left <= right and top <= bottom
    pub fn normalized(&self) -> Rect {
        Rect {
            left: self.left.min(self.right),
            top: self.top.min(self.bottom),
            right: self.left.max(self.right),
            bottom: self.top.max(self.bottom),
        }
    }

    pub fn contains_point(&self, pt: Point) -> bool {
        pt.x >= self.left && pt.x < self.right &&
        pt.y >= self.top && pt.y < self.bottom
    }

    /// True when the rectangles share at least one pixel
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right && self.right > other.left &&
        self.top < other.bottom && self.bottom > other.top
    }

    /// True when `other` lies entirely inside this rectangle
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.left <= other.left && self.top <= other.top &&
        self.right >= other.right && self.bottom >= other.bottom
    }

    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let result = Rect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        };

        if result.is_empty() {
            None
        } else {
            Some(result)
        }
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Move the rectangle; coordinates wrap on overflow
    pub fn offset(&mut self, dx: i32, dy: i32) {
        self.left = self.left.wrapping_add(dx);
        self.right = self.right.wrapping_add(dx);
        self.top = self.top.wrapping_add(dy);
        self.bottom = self.bottom.wrapping_add(dy);
    }

    /// Moved copy, or `None` if a coordinate leaves the i32 range
    pub fn checked_offset(&self, dx: i32, dy: i32) -> Option<Rect> {
        Some(Rect {
            left: self.left.checked_add(dx)?,
            top: self.top.checked_add(dy)?,
            right: self.right.checked_add(dx)?,
            bottom: self.bottom.checked_add(dy)?,
        })
    }
}

// ============================================================================
// Region Enums
// ============================================================================

/// Region complexity (NULLREGION / SIMPLEREGION / COMPLEXREGION)
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionType {
    #[default]
    Null = 1,
    Simple = 2,   // Single rectangle
    Complex = 3,  // Multiple rectangles
}

/// Region combine mode
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineMode {
    And = 1,    // Intersection
    Or = 2,     // Union
    Xor = 3,    // Exclusive or
    Diff = 4,   // Difference
    Copy = 5,   // Copy
}

impl CombineMode {
    /// Map an RGN_* value to a combine mode
    pub fn from_raw(value: u32) -> Option<Self> {
        match value {
            1 => Some(CombineMode::And),
            2 => Some(CombineMode::Or),
            3 => Some(CombineMode::Xor),
            4 => Some(CombineMode::Diff),
            5 => Some(CombineMode::Copy),
            _ => None,
        }
    }
}

// ============================================================================
// Polygon Enums
// ============================================================================

/// Polygon fill mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum FillMode {
    /// Alternate fill (odd-even rule)
    #[default]
    Alternate = 1,
    /// Winding fill (non-zero winding rule)
    Winding = 2,
}

/// Direction in which arcs are swept (AD_* constants)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum ArcDirection {
    #[default]
    CounterClockwise = 1,
    Clockwise = 2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_normalized() {
        let r = Rect::new(10, 20, 0, 5).normalized();
        assert_eq!(r, Rect::new(0, 5, 10, 20));
        assert_eq!(Rect::from_corners(Point::new(4, 1), Point::new(2, 3)), Rect::new(2, 1, 4, 3));
    }

    #[test]
    fn test_rect_exclusive_edges() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.contains_point(Point::new(0, 0)));
        assert!(r.contains_point(Point::new(9, 9)));
        assert!(!r.contains_point(Point::new(10, 5)));
        assert!(!r.intersects(&Rect::new(10, 0, 20, 10)));
        assert!(Rect::new(5, 5, 5, 9).is_empty());
    }

    #[test]
    fn test_rect_intersect_union() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 15, 15);
        assert_eq!(a.intersect(&b), Some(Rect::new(5, 5, 10, 10)));
        assert_eq!(a.union(&b), Rect::new(0, 0, 15, 15));
        assert_eq!(a.intersect(&Rect::new(20, 20, 30, 30)), None);
    }

    #[test]
    fn test_rect_offset_edges() {
        let r = Rect::new(0, 0, 10, 10);
        assert_eq!(r.checked_offset(5, -5), Some(Rect::new(5, -5, 15, 5)));
        assert_eq!(r.checked_offset(i32::MAX, 0), None);
        assert_eq!(r.checked_offset(0, i32::MIN + 5), Some(Rect::new(0, i32::MIN + 5, 10, i32::MIN + 15)));

        let mut wrapped = Rect::new(i32::MAX, 0, i32::MAX, 1);
        wrapped.offset(1, 0);
        assert_eq!(wrapped.left, i32::MIN);
    }

    #[test]
    fn test_combine_mode_from_raw() {
        assert_eq!(CombineMode::from_raw(4), Some(CombineMode::Diff));
        assert_eq!(CombineMode::from_raw(0), None);
    }
}
