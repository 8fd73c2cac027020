//! World Transforms
//!
//! 2x3 affine transforms in the XFORM layout, used by ExtCreateRegion to
//! map exported rectangles before rebuilding a region from them. A
//! rectangle that is rotated or sheared no longer lines up with the pixel
//! grid, so each one is scan converted as a polygon.
//!
//! # Transformation Matrix
//!
//! ```text
//! | m11  m12  0 |
//! | m21  m22  0 |
//! | dx   dy   1 |
//! ```
//!
//! x' = x * m11 + y * m21 + dx
//! y' = x * m12 + y * m22 + dy
//!
//! # References
//!
//! Based on Windows Server 2003:
//! - `windows/core/ntgdi/gre/xformobj.cxx`

use log::{trace, warn};

use crate::region::Region;
use crate::rgndata::{RgnData, RDH_RECTANGLES};
use crate::status::{GdiError, Result};
use crate::types::{CombineMode, FillMode, Point};

/// World transform (XFORM)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XForm {
    /// Horizontal scaling component
    pub m11: f32,
    /// Vertical shear component
    pub m12: f32,
    /// Horizontal shear component
    pub m21: f32,
    /// Vertical scaling component
    pub m22: f32,
    /// Horizontal translation
    pub dx: f32,
    /// Vertical translation
    pub dy: f32,
}

impl Default for XForm {
    fn default() -> Self {
        Self::identity()
    }
}

impl XForm {
    pub const fn identity() -> Self {
        Self { m11: 1.0, m12: 0.0, m21: 0.0, m22: 1.0, dx: 0.0, dy: 0.0 }
    }

    pub fn translate(dx: f32, dy: f32) -> Self {
        Self { dx, dy, ..Self::identity() }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self { m11: sx, m22: sy, ..Self::identity() }
    }

    /// Transform a point, rounding to the nearest pixel
    pub fn transform_point(&self, pt: Point) -> Point {
        let (x, y) = (pt.x as f64, pt.y as f64);
        let tx = x * self.m11 as f64 + y * self.m21 as f64 + self.dx as f64;
        let ty = x * self.m12 as f64 + y * self.m22 as f64 + self.dy as f64;
        Point::new((tx + 0.5).floor() as i32, (ty + 0.5).floor() as i32)
    }
}

impl Region {
    /// Build a region from exported data under a transform (ExtCreateRegion)
    ///
    /// Without a transform this is [`Region::from_region_data`]. With one,
    /// the corners of every rectangle are transformed and the resulting
    /// quadrilaterals are filled with the winding rule and unioned.
    pub fn from_region_data_xform(data: &RgnData, xform: Option<&XForm>) -> Result<Region> {
        let Some(xform) = xform else {
            return Region::from_region_data(data);
        };
        if data.header.i_type != RDH_RECTANGLES {
            warn!("[GDI/Region] unsupported region data type {}", data.header.i_type);
            return Err(GdiError::UnsupportedFormat);
        }

        let count = (data.header.n_count as usize).min(data.rects.len());
        trace!("[GDI/Region] from_region_data_xform: {} rects {:?}", count, xform);

        let mut region = Region::new();
        for rect in &data.rects[..count] {
            let corners = [
                Point::new(rect.left, rect.top),
                Point::new(rect.right, rect.top),
                Point::new(rect.right, rect.bottom),
                Point::new(rect.left, rect.bottom),
            ]
            .map(|pt| xform.transform_point(pt));
            let quad = Region::from_polygon(&corners, FillMode::Winding)?;
            region.combine_with(&quad, CombineMode::Or)?;
        }
        Ok(region)
    }
}
