//! Polygon Scan Conversion
//!
//! Converts one or more closed polygons into a banded region.
//!
//! The sweep keeps two structures:
//!
//! - The edge table: for every scanline at which at least one edge starts,
//!   the list of edges entering there, sorted by x. Horizontal edges are
//!   never entered. An edge covers the scanlines from its top y up to, but
//!   not including, its bottom y, so shared vertices are not counted twice
//!   and the bottom row of the polygon is left out.
//! - The active edge table: edges crossing the current scanline, kept in x
//!   order as a doubly linked list. For the winding rule a second linkage
//!   threads the subset of active edges where the winding number changes
//!   between zero and non-zero.
//!
//! Edges are advanced from one scanline to the next with an integer
//! Bresenham stepper, so x positions match what line drawing produces.
//!
//! All edges live in one arena; links are indices into it and index 0 is the
//! head of the active list.
//!
//! # References
//!
//! Based on Windows Server 2003:
//! - `windows/core/ntgdi/gre/rgnobj.cxx` - RGNMEMOBJ::vCreate (polygon)

use log::{debug, trace};

use crate::combine::coalesce;
use crate::region::Region;
use crate::status::{self, GdiError, Result};
use crate::types::{FillMode, Point, Rect};

// ============================================================================
// Bresenham Stepper
// ============================================================================

/// Integer x tracker for one non-horizontal edge
///
/// `m` is the whole-pixel x step per scanline and `m1` the step taken when
/// the error term overflows. Edges moving right flip as soon as they may;
/// edges moving left only after traversing a whole pixel.
#[derive(Debug, Clone, Copy, Default)]
struct BresInfo {
    /// Current x
    minor_axis: i32,
    /// Decision term
    d: i64,
    m: i64,
    m1: i64,
    incr1: i64,
    incr2: i64,
}

impl BresInfo {
    /// Stepper for an edge spanning `dy > 0` scanlines from x1 to x2
    fn new(dy: i64, x1: i32, x2: i32) -> Self {
        let dx = x2 as i64 - x1 as i64;
        let m = dx / dy;

        if dx < 0 {
            let m1 = m - 1;
            BresInfo {
                minor_axis: x1,
                d: 2 * m * dy - 2 * dx - 2 * dy,
                m,
                m1,
                incr1: -2 * dx + 2 * dy * m1,
                incr2: -2 * dx + 2 * dy * m,
            }
        } else {
            let m1 = m + 1;
            BresInfo {
                minor_axis: x1,
                d: -2 * m * dy + 2 * dx,
                m,
                m1,
                incr1: 2 * dx - 2 * dy * m1,
                incr2: 2 * dx - 2 * dy * m,
            }
        }
    }

    /// Advance to the next scanline
    fn step(&mut self) {
        let overflow = if self.m1 > 0 { self.d > 0 } else { self.d >= 0 };
        if overflow {
            self.minor_axis = (self.minor_axis as i64 + self.m1) as i32;
            self.d += self.incr1;
        } else {
            self.minor_axis = (self.minor_axis as i64 + self.m) as i32;
            self.d += self.incr2;
        }
    }
}

// ============================================================================
// Edge Table
// ============================================================================

/// Index of the active list head in the arena
const AET_HEAD: usize = 0;

#[derive(Debug, Clone, Copy)]
struct EdgeEntry {
    /// Last scanline on which the edge is active
    ymax: i32,
    bres: BresInfo,
    /// Next edge in the active list
    next: Option<usize>,
    /// Previous edge in the active list (the head for the first one)
    back: usize,
    /// Next edge bounding a winding span
    next_wete: Option<usize>,
    /// Edge runs downward (winding +1); upward edges count -1
    clockwise: bool,
}

impl EdgeEntry {
    fn head() -> Self {
        EdgeEntry {
            ymax: i32::MIN,
            bres: BresInfo { minor_axis: i32::MIN, ..BresInfo::default() },
            next: None,
            back: AET_HEAD,
            next_wete: None,
            clockwise: false,
        }
    }
}

/// Edges entering at one scanline, sorted by x
#[derive(Debug)]
struct ScanLineList {
    scanline: i32,
    edges: Vec<usize>,
}

#[derive(Debug)]
struct EdgeTable {
    ymin: i32,
    ymax: i32,
    /// Sorted by scanline
    scanlines: Vec<ScanLineList>,
    /// Arena; index 0 is the active list head
    entries: Vec<EdgeEntry>,
}

impl EdgeTable {
    /// Build the edge table for every polygon with at least two points
    fn build(points: &[Point], counts: &[usize]) -> Result<Self> {
        let mut table = EdgeTable {
            ymin: i32::MAX,
            ymax: i32::MIN,
            scanlines: Vec::new(),
            entries: Vec::new(),
        };
        status::reserve(&mut table.entries, points.len() + 1)?;
        table.entries.push(EdgeEntry::head());

        let mut start = 0;
        for &count in counts {
            let poly = &points[start..start + count];
            start += count;
            if count < 2 {
                continue;
            }

            let mut prev = poly[count - 1];
            for &curr in poly {
                // top is the endpoint with the smaller y
                let (top, bottom, clockwise) = if prev.y > curr.y {
                    (curr, prev, false)
                } else {
                    (prev, curr, true)
                };

                if top.y != bottom.y {
                    let index = table.entries.len();
                    table.entries.push(EdgeEntry {
                        ymax: bottom.y - 1,
                        bres: BresInfo::new(bottom.y as i64 - top.y as i64, top.x, bottom.x),
                        next: None,
                        back: AET_HEAD,
                        next_wete: None,
                        clockwise,
                    });
                    table.insert(index, top.y)?;

                    table.ymin = table.ymin.min(top.y);
                    table.ymax = table.ymax.max(bottom.y);
                }
                prev = curr;
            }
        }

        Ok(table)
    }

    /// File an edge under the scanline where it starts
    fn insert(&mut self, edge: usize, scanline: i32) -> Result<()> {
        let slot = self.scanlines.partition_point(|sll| sll.scanline < scanline);
        if slot == self.scanlines.len() || self.scanlines[slot].scanline != scanline {
            status::reserve(&mut self.scanlines, 1)?;
            self.scanlines.insert(slot, ScanLineList { scanline, edges: Vec::new() });
        }

        let x = self.entries[edge].bres.minor_axis;
        let entries = &self.entries;
        let bucket = &mut self.scanlines[slot].edges;
        let pos = bucket.partition_point(|&e| entries[e].bres.minor_axis < x);
        status::reserve(bucket, 1)?;
        bucket.insert(pos, edge);
        Ok(())
    }
}

// ============================================================================
// Active Edge Table
// ============================================================================

struct ActiveEdges<'a> {
    e: &'a mut [EdgeEntry],
}

impl ActiveEdges<'_> {
    fn x(&self, edge: usize) -> i32 {
        self.e[edge].bres.minor_axis
    }

    /// Merge an x-sorted bucket into the active list
    fn load(&mut self, bucket: &[usize]) {
        let mut prev = AET_HEAD;
        let mut cur = self.e[AET_HEAD].next;

        for &edge in bucket {
            let x = self.x(edge);
            while let Some(c) = cur {
                if self.x(c) >= x {
                    break;
                }
                prev = c;
                cur = self.e[c].next;
            }

            self.e[edge].next = cur;
            if let Some(c) = cur {
                self.e[c].back = edge;
            }
            self.e[edge].back = prev;
            self.e[prev].next = Some(edge);
            prev = edge;
        }
    }

    /// Relink the winding list: keep the edges where the running winding
    /// number moves between zero and non-zero
    fn compute_winding(&mut self) {
        let mut inside = true;
        let mut winding = 0i32;
        let mut wete = AET_HEAD;

        self.e[AET_HEAD].next_wete = None;
        let mut cur = self.e[AET_HEAD].next;
        while let Some(c) = cur {
            winding += if self.e[c].clockwise { 1 } else { -1 };

            if (!inside && winding == 0) || (inside && winding != 0) {
                self.e[wete].next_wete = Some(c);
                wete = c;
                inside = !inside;
            }
            cur = self.e[c].next;
        }
        self.e[wete].next_wete = None;
    }

    /// One insertion sort pass by x; true when anything moved
    fn sort(&mut self) -> bool {
        let mut changed = false;
        let mut cur = self.e[AET_HEAD].next;

        while let Some(insert) = cur {
            let x = self.x(insert);
            let mut chase = insert;
            while self.x(self.e[chase].back) > x {
                chase = self.e[chase].back;
            }

            cur = self.e[insert].next;
            if chase != insert {
                let chase_back = self.e[chase].back;
                let insert_back = self.e[insert].back;

                // Unlink insert
                self.e[insert_back].next = cur;
                if let Some(c) = cur {
                    self.e[c].back = insert_back;
                }

                // Relink it in front of chase
                self.e[insert].next = Some(chase);
                self.e[chase_back].next = Some(insert);
                self.e[chase].back = insert;
                self.e[insert].back = chase_back;
                changed = true;
            }
        }
        changed
    }

    /// Sample the active edges at scanline `y` and advance them to `y + 1`
    ///
    /// With `winding` only edges on the winding list are sampled. Returns
    /// true when an edge expired.
    fn sample_and_step(&mut self, y: i32, winding: bool, xs: &mut Vec<i32>) -> Result<bool> {
        let mut expired = false;
        let mut prev = AET_HEAD;
        let mut cur = self.e[AET_HEAD].next;
        let mut wete = cur;

        while let Some(c) = cur {
            if !winding {
                status::push(xs, self.x(c))?;
            } else if wete == Some(c) {
                status::push(xs, self.x(c))?;
                wete = self.e[c].next_wete;
            }

            if self.e[c].ymax == y {
                // Leaving this edge
                let next = self.e[c].next;
                self.e[prev].next = next;
                if let Some(n) = next {
                    self.e[n].back = prev;
                }
                cur = next;
                expired = true;
            } else {
                self.e[c].bres.step();
                prev = c;
                cur = self.e[c].next;
            }
        }
        Ok(expired)
    }
}

// ============================================================================
// Rectangle Assembly
// ============================================================================

/// Collects one-scanline spans into a banded rectangle list
struct BandBuilder {
    rects: Vec<Rect>,
    prev_band: usize,
}

impl BandBuilder {
    fn new() -> Self {
        BandBuilder { rects: Vec::new(), prev_band: 0 }
    }

    /// Add the spans of scanline `y`; `xs` holds sorted in/out pairs
    fn push_scanline(&mut self, y: i32, xs: &[i32]) -> Result<()> {
        let cur_band = self.rects.len();

        for pair in xs.chunks_exact(2) {
            let (left, right) = (pair[0], pair[1]);
            if left >= right {
                continue;
            }

            if self.rects.len() > cur_band {
                if let Some(last) = self.rects.last_mut() {
                    if last.right >= left {
                        last.right = last.right.max(right);
                        continue;
                    }
                }
            }
            status::push(&mut self.rects, Rect::new(left, y, right, y + 1))?;
        }

        if self.rects.len() != cur_band {
            self.prev_band = coalesce(&mut self.rects, self.prev_band, cur_band);
        }
        Ok(())
    }

    fn finish(self) -> Region {
        Region::from_banded(self.rects)
    }
}

// ============================================================================
// Polygon Region Creation
// ============================================================================

/// Axis-aligned rectangle given as 4 corners, or 5 with the first repeated
fn as_rectangle(pts: &[Point]) -> Option<Rect> {
    let closed5 = pts.len() == 5 && pts[4] == pts[0];
    if pts.len() != 4 && !closed5 {
        return None;
    }

    let horizontal_first = pts[0].y == pts[1].y && pts[1].x == pts[2].x &&
        pts[2].y == pts[3].y && pts[3].x == pts[0].x;
    let vertical_first = pts[0].x == pts[1].x && pts[1].y == pts[2].y &&
        pts[2].x == pts[3].x && pts[3].y == pts[0].y;

    if horizontal_first || vertical_first {
        Some(Rect::from_corners(pts[0], pts[2]))
    } else {
        None
    }
}

impl Region {
    /// Create a region from a single polygon (CreatePolygonRgn)
    ///
    /// The polygon is implicitly closed.
    pub fn from_polygon(points: &[Point], mode: FillMode) -> Result<Region> {
        Region::from_poly_polygon(points, &[points.len()], mode)
    }

    /// Create a region from several polygons (CreatePolyPolygonRgn)
    ///
    /// `counts[i]` is the number of points in polygon `i`, taken in order
    /// from `points`. The counts must add up to `points.len()`. Polygons
    /// with fewer than two points are skipped.
    pub fn from_poly_polygon(points: &[Point], counts: &[usize], mode: FillMode) -> Result<Region> {
        let total = counts.iter().try_fold(0usize, |acc, &c| acc.checked_add(c));
        if total != Some(points.len()) {
            return Err(GdiError::InvalidParameter);
        }

        if counts.len() == 1 {
            if let Some(rect) = as_rectangle(points) {
                debug!("[GDI/Region] polygon is a rectangle {:?}", rect);
                return Ok(Region::from_rect(rect));
            }
        }

        let mut table = EdgeTable::build(points, counts)?;
        trace!("[GDI/Region] scan {} edges, y {}..{}, {:?}",
            table.entries.len() - 1, table.ymin, table.ymax, mode);

        let winding = mode == FillMode::Winding;
        let scanlines = core::mem::take(&mut table.scanlines);
        let mut aet = ActiveEdges { e: &mut table.entries };
        let mut builder = BandBuilder::new();
        let mut next_bucket = scanlines.iter().peekable();
        let mut xs = Vec::new();

        let mut y = table.ymin;
        while y < table.ymax {
            if let Some(sll) = next_bucket.next_if(|sll| sll.scanline == y) {
                aet.load(&sll.edges);
                if winding {
                    aet.compute_winding();
                }
            }

            xs.clear();
            let expired = aet.sample_and_step(y, winding, &mut xs)?;
            builder.push_scanline(y, &xs)?;

            let resorted = aet.sort();
            if winding && (resorted || expired) {
                aet.compute_winding();
            }
            y += 1;
        }

        let region = builder.finish();
        region.dump("polygon");
        Ok(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RegionType;

    fn pts(coords: &[(i32, i32)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn two_squares() -> (Vec<Point>, Vec<usize>) {
        let points = pts(&[
            (0, 0), (10, 0), (10, 10), (0, 10),
            (5, 5), (15, 5), (15, 15), (5, 15),
        ]);
        (points, vec![4, 4])
    }

    #[test]
    fn test_bres_vertical_edge() {
        let mut b = BresInfo::new(10, 3, 3);
        for _ in 0..10 {
            b.step();
            assert_eq!(b.minor_axis, 3);
        }
    }

    #[test]
    fn test_bres_diagonal_edge() {
        let mut b = BresInfo::new(4, 0, 8);
        let mut xs = vec![b.minor_axis];
        for _ in 0..4 {
            b.step();
            xs.push(b.minor_axis);
        }
        assert_eq!(xs, vec![0, 2, 4, 6, 8]);

        let mut b = BresInfo::new(5, 5, 0);
        for _ in 0..5 {
            b.step();
        }
        assert_eq!(b.minor_axis, 0);
    }

    #[test]
    fn test_bres_step_wider_than_i32() {
        let mut b = BresInfo::new(1, i32::MIN, i32::MAX);
        b.step();
        assert_eq!(b.minor_axis, i32::MAX);
    }

    #[test]
    fn test_polygon_spanning_coordinate_space() {
        let points = pts(&[(i32::MIN, 0), (i32::MIN + 10, 0), (i32::MAX, 1), (i32::MAX - 10, 1)]);
        let rgn = Region::from_polygon(&points, FillMode::Alternate).unwrap();
        assert!(rgn.is_normalized());
        let bbox = rgn.bounding_box();
        assert_eq!((bbox.top, bbox.bottom), (0, 1));
        assert!(rgn.contains_point(Point::new(i32::MIN + 5, 0)));
    }

    #[test]
    fn test_rectangle_fast_path() {
        let rgn = Region::from_polygon(&pts(&[(10, 0), (0, 0), (0, 5), (10, 5)]), FillMode::Alternate).unwrap();
        assert_eq!(rgn.rects(), &[Rect::new(0, 0, 10, 5)]);

        let closed = pts(&[(0, 0), (0, 5), (10, 5), (10, 0), (0, 0)]);
        let rgn = Region::from_polygon(&closed, FillMode::Winding).unwrap();
        assert_eq!(rgn.rects(), &[Rect::new(0, 0, 10, 5)]);
    }

    #[test]
    fn test_square_by_scan() {
        // Rotated start point defeats the fast path check on pts[0..4]
        let square = pts(&[(0, 0), (10, 0), (10, 10), (0, 10), (0, 5)]);
        let rgn = Region::from_polygon(&square, FillMode::Alternate).unwrap();
        assert_eq!(rgn.rects(), &[Rect::new(0, 0, 10, 10)]);
    }

    #[test]
    fn test_overlapping_squares_fill_rules() {
        let (points, counts) = two_squares();
        let a = Region::from_coords(0, 0, 10, 10);
        let b = Region::from_coords(5, 5, 15, 15);

        let even_odd = Region::from_poly_polygon(&points, &counts, FillMode::Alternate).unwrap();
        assert_eq!(even_odd, a.xor(&b).unwrap());

        let winding = Region::from_poly_polygon(&points, &counts, FillMode::Winding).unwrap();
        assert_eq!(winding, a.union(&b).unwrap());
        assert_eq!(winding.bounding_box(), even_odd.bounding_box());
    }

    #[test]
    fn test_bowtie() {
        let bowtie = pts(&[(0, 0), (10, 10), (10, 0), (0, 10)]);
        let alt = Region::from_polygon(&bowtie, FillMode::Alternate).unwrap();
        let wind = Region::from_polygon(&bowtie, FillMode::Winding).unwrap();

        assert!(alt.is_normalized());
        assert!(wind.is_normalized());
        // Row 0 has only zero-width spans
        assert_eq!(alt.bounding_box(), Rect::new(0, 1, 10, 10));
        assert_eq!(alt.bounding_box(), wind.bounding_box());
        // No pixel is covered twice, so both rules agree
        assert_eq!(alt, wind);
        assert!(alt.contains_point(Point::new(1, 5)));
        assert!(alt.contains_point(Point::new(9, 5)));
        assert!(!alt.contains_point(Point::new(5, 1)));
    }

    #[test]
    fn test_triangle_excludes_bottom_row() {
        let tri = pts(&[(0, 0), (8, 8), (0, 8)]);
        let rgn = Region::from_polygon(&tri, FillMode::Alternate).unwrap();
        assert!(rgn.is_normalized());
        assert_eq!(rgn.bounding_box(), Rect::new(0, 1, 7, 8));
        assert!(rgn.contains_point(Point::new(0, 7)));
        assert!(!rgn.contains_point(Point::new(0, 8)));
        assert!(!rgn.contains_point(Point::new(7, 1)));
    }

    #[test]
    fn test_degenerate_inputs() {
        let flat = pts(&[(0, 3), (10, 3), (20, 3)]);
        assert!(Region::from_polygon(&flat, FillMode::Alternate).unwrap().is_empty());
        assert!(Region::from_polygon(&pts(&[(4, 4)]), FillMode::Winding).unwrap().is_empty());
        assert!(Region::from_polygon(&[], FillMode::Alternate).unwrap().is_empty());
    }

    #[test]
    fn test_count_mismatch() {
        let (points, _) = two_squares();
        assert_eq!(
            Region::from_poly_polygon(&points, &[4, 3], FillMode::Alternate),
            Err(GdiError::InvalidParameter)
        );
    }

    #[test]
    fn test_separate_polygons_complex() {
        let points = pts(&[
            (0, 0), (4, 0), (4, 4), (0, 4), (0, 2),
            (8, 0), (12, 0), (12, 4), (8, 4), (8, 2),
        ]);
        let rgn = Region::from_poly_polygon(&points, &[5, 5], FillMode::Alternate).unwrap();
        assert_eq!(rgn.region_type(), RegionType::Complex);
        assert_eq!(rgn.rects(), &[Rect::new(0, 0, 4, 4), Rect::new(8, 0, 12, 4)]);
    }
}
