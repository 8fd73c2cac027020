//! Rounded Rectangle and Elliptic Regions
//!
//! The corners are rasterized with an incremental midpoint ellipse walk
//! (K. Porter, DDJ Graphics Programming Column, 8/89). Each step adds a
//! one-scanline rectangle at the top and the mirrored one at the bottom,
//! widening by a pixel on each side as the walk moves away from the centre.
//! The straight middle section is added as one rectangle at the end.

use log::trace;

use crate::region::Region;
use crate::status::Result;
use crate::types::Rect;

impl Region {
    /// Create a rectangular region with rounded corners (CreateRoundRectRgn)
    ///
    /// `ellipse_width` and `ellipse_height` size the ellipse used for the
    /// corners. Negative sizes are taken as absolute values, oversized ones
    /// are clamped to the box, and a size below 2 in either direction gives
    /// a plain rectangle.
    pub fn round_rect(
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
        ellipse_width: i32,
        ellipse_height: i32,
    ) -> Result<Region> {
        let bounds = Rect::new(left, top, right, bottom).normalized();
        Region::rounded(bounds, (ellipse_width as i64).abs(), (ellipse_height as i64).abs())
    }

    /// Create an elliptic region inscribed in the box (CreateEllipticRgn)
    pub fn elliptic(left: i32, top: i32, right: i32, bottom: i32) -> Result<Region> {
        let bounds = Rect::new(left, top, right, bottom).normalized();
        Region::rounded(bounds, i64::MAX, i64::MAX)
    }

    /// Rounded rectangle in a normalized box with non-negative corner sizes
    fn rounded(bounds: Rect, ellipse_width: i64, ellipse_height: i64) -> Result<Region> {
        let box_w = bounds.right as i64 - bounds.left as i64;
        let box_h = bounds.bottom as i64 - bounds.top as i64;
        // Squared axes of a box spanning the coordinate space need 128 bits
        let ew = ellipse_width.min(box_w) as i128;
        let eh = ellipse_height.min(box_h) as i128;

        if ew < 2 || eh < 2 {
            return Ok(Region::from_rect(bounds));
        }

        trace!("[GDI/Region] round_rect {:?} corner {}x{}", bounds, ew, eh);

        let mut region = Region::new();
        let mut top = bounds.top;
        let mut bottom = bounds.bottom;

        let asq = ew * ew / 4; // a^2
        let bsq = eh * eh / 4; // b^2
        let mut d = bsq - asq * eh / 2 + asq / 4;
        let mut xd: i128 = 0;
        let mut yd: i128 = asq * eh; // 2a^2b

        let mut span_left = bounds.left + (ew / 2) as i32;
        let mut span_right = bounds.right - (ew / 2) as i32;

        // First half of the quadrant: x steps every iteration
        while xd < yd {
            if d > 0 {
                region.union_rect(&Rect::new(span_left, top, span_right, top + 1))?;
                top += 1;
                bottom -= 1;
                region.union_rect(&Rect::new(span_left, bottom, span_right, bottom + 1))?;
                yd -= 2 * asq;
                d -= yd;
            }
            span_left -= 1;
            span_right += 1;
            xd += 2 * bsq;
            d += bsq + xd;
        }

        // Second half: y steps every iteration
        d += (3 * (asq - bsq) / 2 - (xd + yd)) / 2;
        while yd >= 0 {
            region.union_rect(&Rect::new(span_left, top, span_right, top + 1))?;
            top += 1;
            bottom -= 1;
            region.union_rect(&Rect::new(span_left, bottom, span_right, bottom + 1))?;
            if d < 0 {
                span_left -= 1;
                span_right += 1;
                xd += 2 * bsq;
                d += xd;
            }
            yd -= 2 * asq;
            d += asq - yd;
        }

        if top <= bottom {
            region.union_rect(&Rect::new(span_left, top, span_right, bottom))?;
        }

        Ok(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Point, RegionType};

    #[test]
    fn test_small_corners_give_rectangle() {
        let rgn = Region::round_rect(10, 10, 0, 0, 1, 40).unwrap();
        assert_eq!(rgn.rects(), &[Rect::new(0, 0, 10, 10)]);
        assert_eq!(rgn.region_type(), RegionType::Simple);
    }

    #[test]
    fn test_round_rect_wider_than_i32() {
        let rgn = Region::round_rect(i32::MIN, 0, i32::MAX, 8, -4, 4).unwrap();
        assert!(rgn.is_normalized());
        assert_eq!(rgn.bounding_box(), Rect::new(i32::MIN, 0, i32::MAX, 8));
        assert!(rgn.contains_point(Point::new(0, 0)));
        assert!(!rgn.contains_point(Point::new(i32::MIN, 0)));
    }

    #[test]
    fn test_elliptic_shape() {
        let rgn = Region::elliptic(0, 0, 20, 10).unwrap();
        assert!(rgn.is_normalized());
        assert_eq!(rgn.bounding_box(), Rect::new(0, 0, 20, 10));
        assert!(rgn.contains_point(Point::new(10, 5)));
        assert!(rgn.contains_point(Point::new(0, 5)));
        assert!(!rgn.contains_point(Point::new(0, 0)));
        assert!(!rgn.contains_point(Point::new(19, 9)));
    }

    #[test]
    fn test_elliptic_is_symmetric() {
        let rgn = Region::elliptic(0, 0, 16, 16).unwrap();
        for &r in rgn.rects() {
            let mirrored = Rect::new(16 - r.right, 16 - r.bottom, 16 - r.left, 16 - r.top);
            assert!(rgn.intersects_rect(&mirrored));
            assert_eq!(r.left, 16 - r.right);
        }
    }

    #[test]
    fn test_round_rect_keeps_middle() {
        let rgn = Region::round_rect(0, 0, 100, 50, 20, 20).unwrap();
        assert!(rgn.is_normalized());
        assert_eq!(rgn.bounding_box(), Rect::new(0, 0, 100, 50));
        assert!(rgn.intersects_rect(&Rect::new(0, 10, 100, 40)));
        assert!(rgn.contains_point(Point::new(0, 25)));
        assert!(rgn.contains_point(Point::new(50, 0)));
        assert!(!rgn.contains_point(Point::new(0, 0)));
        assert!(!rgn.contains_point(Point::new(99, 49)));
    }
}
