//! Region Implementation
//!
//! Regions define arbitrary areas for clipping and hit testing.
//!
//! A region is stored as a list of rectangles in y-x banded order:
//!
//! - Rectangles are sorted by top, then by left.
//! - Rectangles with the same top share the same bottom and form a band.
//!   Within a band they are listed left to right and never touch.
//! - Two vertically abutting bands never have identical x-spans; such bands
//!   are coalesced into one taller band.
//! - The cached extents are the bounding box of the rectangles, or all zero
//!   when there are none.
//!
//! Every public operation in this crate preserves those rules, so the
//! rectangle list of a region is also its canonical form: two regions cover
//! the same pixels exactly when their rectangle lists are equal.
//!
//! # References
//!
//! Based on Windows Server 2003:
//! - `windows/core/ntgdi/gre/rgnobj.cxx`

use log::{trace, warn};

use crate::status::{self, GdiError, Result};
use crate::types::{Point, Rect, RegionType};

// ============================================================================
// Constants
// ============================================================================

/// Rectangles allocated up front for a new region
pub const RGN_DEFAULT_RECTS: usize = 2;

// ============================================================================
// Region Structure
// ============================================================================

/// Region object
#[derive(Debug, Clone)]
pub struct Region {
    /// Banded rectangle list
    pub(crate) rects: Vec<Rect>,

    /// Bounding rectangle
    pub(crate) extents: Rect,
}

impl Default for Region {
    fn default() -> Self {
        Self::new()
    }
}

impl Region {
    /// Create an empty region
    pub fn new() -> Self {
        Self {
            rects: Vec::with_capacity(RGN_DEFAULT_RECTS),
            extents: Rect::EMPTY,
        }
    }

    /// Create a region covering a single rectangle
    ///
    /// The corners may be given in any order. A rectangle with no area
    /// yields an empty region.
    pub fn from_rect(rect: Rect) -> Self {
        let mut region = Self::new();
        region.assign_rect(rect);
        region
    }

    /// Create a rectangular region from its four coordinates
    pub fn from_coords(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::from_rect(Rect::new(left, top, right, bottom))
    }

    /// Wrap an already banded rectangle list, computing its extents
    pub(crate) fn from_banded(rects: Vec<Rect>) -> Self {
        let mut region = Self { rects, extents: Rect::EMPTY };
        region.set_extents();
        region
    }

    /// Replace the rectangle list and extents in one step
    pub(crate) fn replace(&mut self, rects: Vec<Rect>, extents: Rect) {
        self.rects = rects;
        self.extents = if self.rects.is_empty() { Rect::EMPTY } else { extents };
    }

    // ------------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------------

    /// Set the region to a single rectangle (SetRectRgn)
    pub fn set_rect(&mut self, left: i32, top: i32, right: i32, bottom: i32) -> RegionType {
        self.assign_rect(Rect::new(left, top, right, bottom));
        self.region_type()
    }

    fn assign_rect(&mut self, rect: Rect) {
        let rect = rect.normalized();
        self.rects.clear();
        if rect.is_empty() {
            self.extents = Rect::EMPTY;
        } else {
            self.rects.push(rect);
            self.extents = rect;
        }
    }

    /// Remove every rectangle
    pub fn set_empty(&mut self) {
        self.rects.clear();
        self.extents = Rect::EMPTY;
    }

    /// Make this region a deep copy of `src`
    ///
    /// On allocation failure the region is left unchanged.
    pub fn copy_from(&mut self, src: &Region) -> Result<()> {
        if core::ptr::eq(self, src) {
            return Ok(());
        }

        if self.rects.capacity() < src.rects.len() {
            let additional = src.rects.len() - self.rects.len();
            status::reserve(&mut self.rects, additional)?;
        }
        self.rects.clear();
        self.rects.extend_from_slice(&src.rects);
        self.extents = src.extents;
        Ok(())
    }

    /// Move the region by (dx, dy) (OffsetRgn)
    ///
    /// Translation keeps the banding intact, so this is a plain add. A move
    /// that would push any coordinate out of the i32 range fails with
    /// [`GdiError::InvalidParameter`] and leaves the region where it was.
    pub fn offset(&mut self, dx: i32, dy: i32) -> Result<RegionType> {
        if (dx != 0 || dy != 0) && !self.rects.is_empty() {
            // Every rectangle lies inside the extents
            let extents = self.extents.checked_offset(dx, dy).ok_or_else(|| {
                warn!("[GDI/Region] offset ({},{}) overflows {:?}", dx, dy, self.extents);
                GdiError::InvalidParameter
            })?;
            for rect in self.rects.iter_mut() {
                rect.offset(dx, dy);
            }
            self.extents = extents;
        }
        Ok(self.region_type())
    }

    /// Release spare storage when usage fell below half of the capacity
    ///
    /// Never needed for correctness; callers that keep long-lived regions
    /// after large subtractions may call it to return memory.
    pub fn compact(&mut self) {
        let len = self.rects.len();
        if len < self.rects.capacity() / 2 {
            self.rects.shrink_to(len.max(RGN_DEFAULT_RECTS));
        }
    }

    /// Recompute the extents from the rectangle list
    pub(crate) fn set_extents(&mut self) {
        let (first, last) = match (self.rects.first(), self.rects.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => {
                self.extents = Rect::EMPTY;
                return;
            }
        };

        // The first rectangle has the smallest top and the last one the
        // largest bottom; only left and right need a scan.
        let mut extents = Rect::new(first.left, first.top, last.right, last.bottom);
        for rect in &self.rects {
            extents.left = extents.left.min(rect.left);
            extents.right = extents.right.max(rect.right);
        }
        self.extents = extents;
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Banded rectangle list
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Number of rectangles
    pub fn rect_count(&self) -> usize {
        self.rects.len()
    }

    /// Number of rectangles the backing storage can hold without growing
    pub fn capacity(&self) -> usize {
        self.rects.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Cached bounding rectangle
    pub fn bounding_box(&self) -> Rect {
        self.extents
    }

    /// Region complexity
    pub fn region_type(&self) -> RegionType {
        match self.rects.len() {
            0 => RegionType::Null,
            1 => RegionType::Simple,
            _ => RegionType::Complex,
        }
    }

    /// Bounding box plus complexity (GetRgnBox)
    pub fn get_rgn_box(&self) -> (RegionType, Rect) {
        (self.region_type(), self.extents)
    }

    /// Check if point is in region (PtInRegion)
    pub fn contains_point(&self, pt: Point) -> bool {
        if self.rects.is_empty() || !self.extents.contains_point(pt) {
            return false;
        }
        self.rects.iter().any(|rect| rect.contains_point(pt))
    }

    /// Check if rectangle overlaps the region at all (RectInRegion)
    ///
    /// The corners of `rect` may be given in any order.
    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        let rect = &rect.normalized();
        if self.rects.is_empty() || !self.extents.intersects(rect) {
            return false;
        }

        for cur in &self.rects {
            if cur.bottom <= rect.top {
                continue; // not far enough down yet
            }
            if cur.top >= rect.bottom {
                break; // too far down
            }
            if cur.right <= rect.left || cur.left >= rect.right {
                continue;
            }
            return true;
        }
        false
    }

    /// Compare two regions (EqualRgn)
    pub fn equal(&self, other: &Region) -> bool {
        if self.rects.len() != other.rects.len() {
            return false;
        }
        if self.rects.is_empty() {
            return true;
        }
        self.extents == other.extents && self.rects == other.rects
    }

    /// Verify the banding invariants
    ///
    /// Every region produced by this crate passes; the check exists for
    /// callers that assemble regions from untrusted data and for tests.
    pub fn is_normalized(&self) -> bool {
        if self.rects.is_empty() {
            return self.extents == Rect::EMPTY;
        }

        let mut bbox = self.rects[0];
        let mut prev_band: Option<&[Rect]> = None;
        let mut start = 0;

        while start < self.rects.len() {
            let top = self.rects[start].top;
            let bottom = self.rects[start].bottom;
            let mut end = start;
            while end < self.rects.len() && self.rects[end].top == top {
                let rect = &self.rects[end];
                if rect.is_empty() || rect.bottom != bottom {
                    return false;
                }
                if end > start && self.rects[end - 1].right >= rect.left {
                    return false;
                }
                bbox = bbox.union(rect);
                end += 1;
            }

            let band = &self.rects[start..end];
            if let Some(prev) = prev_band {
                if top < prev[0].bottom {
                    return false;
                }
                if top == prev[0].bottom && same_spans(prev, band) {
                    return false;
                }
            }
            prev_band = Some(band);
            start = end;
        }

        bbox == self.extents
    }

    /// Trace the rectangle list
    pub(crate) fn dump(&self, label: &str) {
        if !log::log_enabled!(log::Level::Trace) {
            return;
        }
        trace!("[GDI/Region] {}: {} rects, extents {:?}", label, self.rects.len(), self.extents);
        for rect in &self.rects {
            trace!("[GDI/Region]   ({},{})-({},{})", rect.left, rect.top, rect.right, rect.bottom);
        }
    }
}

impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl Eq for Region {}

/// True when two bands have the same x-spans in the same order
pub(crate) fn same_spans(a: &[Rect], b: &[Rect]) -> bool {
    a.len() == b.len() &&
        a.iter().zip(b).all(|(x, y)| x.left == y.left && x.right == y.right)
}
