//! Path Objects
//!
//! GDI path support: drawing calls made between BeginPath and EndPath are
//! recorded as device-space points instead of being drawn. A closed path can
//! then be read back, flattened, or converted into a region for filling and
//! clipping.
//!
//! # Path States
//!
//! - **Empty**: nothing recorded (initial state, and after abort or after
//!   the path was consumed)
//! - **Open**: between BeginPath and EndPath; drawing calls append points
//! - **Closed**: EndPath was called; the path can be used but not extended
//!
//! # Point Types
//!
//! Every point carries a type: MOVETO starts a stroke, LINETO draws a line
//! from the previous point, and BEZIERTO points come in groups of three
//! (two control points and an end point). CLOSEFIGURE may be ORed onto the
//! last point of a figure.
//!
//! # References
//!
//! Based on Windows Server 2003:
//! - `windows/core/ntgdi/gre/pathobj.cxx` - Path object management
//! - `windows/core/ntgdi/gre/pathgdi.cxx` - Path GDI entry points
//! - `windows/core/ntgdi/gre/pathflat.cxx` - Path flattening (curves to lines)

use log::{trace, warn};

use crate::region::Region;
use crate::status::{self, GdiError, Result};
use crate::types::{FillMode, Point};

// ============================================================================
// Constants
// ============================================================================

/// Initial number of point slots allocated for a path
pub const NUM_ENTRIES_INITIAL: usize = 16;

/// Bezier curve flattening tolerance (in pixels)
pub const BEZIER_TOLERANCE: f64 = 0.25;

/// Maximum subdivision depth when flattening one Bezier segment
pub const MAX_BEZIER_DEPTH: u32 = 10;

// ============================================================================
// Path Point Types
// ============================================================================

bitflags::bitflags! {
    /// Point type flags (PT_* constants from Windows)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PointType: u8 {
        /// Close figure flag
        const CLOSEFIGURE = 0x01;
        /// Line to point
        const LINETO = 0x02;
        /// Bezier control point
        const BEZIERTO = 0x04;
        /// Move to point (start new figure)
        const MOVETO = 0x06;
    }
}

impl PointType {
    /// Point type without the close-figure flag
    pub fn kind(self) -> PointType {
        self - PointType::CLOSEFIGURE
    }
}

// ============================================================================
// Path State
// ============================================================================

/// Path recording state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathState {
    /// No path
    #[default]
    Empty,
    /// Path is being recorded (between BeginPath/EndPath)
    Open,
    /// Path has been recorded and is ready to use
    Closed,
}

// ============================================================================
// Path Object
// ============================================================================

/// Path object: parallel point and type arrays plus recording state
#[derive(Debug, Clone, Default)]
pub struct Path {
    points: Vec<Point>,
    flags: Vec<PointType>,
    state: PathState,
    /// Next line-type call must start with a MOVETO
    new_stroke: bool,
}

impl Path {
    /// Create an empty path
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PathState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == PathState::Open
    }

    /// Get number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn flags(&self) -> &[PointType] {
        &self.flags
    }

    /// Drop all points and return to the empty state
    fn clear(&mut self) {
        self.points.clear();
        self.flags.clear();
        self.state = PathState::Empty;
        self.new_stroke = true;
    }

    fn require(&self, state: PathState, op: &str) -> Result<()> {
        if self.state != state {
            warn!("[GDI/Path] {}: path is {:?}, needs {:?}", op, self.state, state);
            return Err(GdiError::WrongState);
        }
        Ok(())
    }

    pub(crate) fn require_open(&self, op: &str) -> Result<()> {
        self.require(PathState::Open, op)
    }

    pub(crate) fn require_closed(&self, op: &str) -> Result<()> {
        self.require(PathState::Closed, op)
    }

    // ------------------------------------------------------------------------
    // Storage
    // ------------------------------------------------------------------------

    /// Make room for `additional` more entries, growing geometrically
    fn reserve_entries(&mut self, additional: usize) -> Result<()> {
        let needed = self.points.len().checked_add(additional).ok_or(GdiError::NoMemory)?;
        if needed <= self.points.capacity() && needed <= self.flags.capacity() {
            return Ok(());
        }

        let target = needed.max(self.points.capacity() * 2).max(NUM_ENTRIES_INITIAL);
        self.points
            .try_reserve_exact(target - self.points.len())
            .map_err(|_| GdiError::NoMemory)?;
        self.flags
            .try_reserve_exact(target - self.flags.len())
            .map_err(|_| GdiError::NoMemory)?;
        Ok(())
    }

    /// Append one entry
    pub(crate) fn add_entry(&mut self, pt: Point, flags: PointType) -> Result<()> {
        trace!("[GDI/Path] ({},{}) - {:?}", pt.x, pt.y, flags);
        self.reserve_entries(1)?;
        self.points.push(pt);
        self.flags.push(flags);
        Ok(())
    }

    /// Append several entries of one type; returns the index of the first
    fn add_points(&mut self, pts: &[Point], flags: PointType) -> Result<usize> {
        self.reserve_entries(pts.len())?;
        let first = self.points.len();
        self.points.extend_from_slice(pts);
        self.flags.resize(first + pts.len(), flags);
        Ok(first)
    }

    /// Emit a MOVETO at `current` unless a stroke already ends there
    pub(crate) fn start_new_stroke(&mut self, current: Point) -> Result<()> {
        let continuing = !self.new_stroke &&
            self.flags.last().is_some_and(|f| !f.contains(PointType::CLOSEFIGURE)) &&
            self.points.last() == Some(&current);
        if continuing {
            return Ok(());
        }
        self.new_stroke = false;
        self.add_entry(current, PointType::MOVETO)
    }

    /// Set CLOSEFIGURE on the last point, if any
    pub(crate) fn mark_closed(&mut self) {
        if let Some(last) = self.flags.last_mut() {
            *last |= PointType::CLOSEFIGURE;
        }
        self.new_stroke = true;
    }

    // ------------------------------------------------------------------------
    // State Machine
    // ------------------------------------------------------------------------

    /// Start recording (BeginPath)
    ///
    /// Any previous path is discarded. Calling it while a path is already
    /// open does nothing.
    pub fn begin(&mut self) -> Result<()> {
        if self.state == PathState::Open {
            return Ok(());
        }
        self.clear();
        self.state = PathState::Open;
        trace!("[GDI/Path] begin");
        Ok(())
    }

    /// Stop recording (EndPath)
    pub fn end(&mut self) -> Result<()> {
        self.require_open("end")?;
        self.state = PathState::Closed;
        trace!("[GDI/Path] end with {} points", self.points.len());
        Ok(())
    }

    /// Discard the path in any state (AbortPath)
    pub fn abort(&mut self) {
        trace!("[GDI/Path] abort");
        self.clear();
    }

    /// Close the current figure (CloseFigure)
    ///
    /// The close is virtual: no closing line is added, the last point just
    /// gets the CLOSEFIGURE flag. The next line starts a new stroke.
    pub fn close_figure(&mut self) -> Result<()> {
        self.require_open("close_figure")?;
        self.mark_closed();
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Drawing Calls
    // ------------------------------------------------------------------------

    /// Record a MoveTo
    ///
    /// Nothing is appended: the next line-type call starts its stroke at
    /// the device context's position at that time.
    pub fn move_to(&mut self) -> Result<()> {
        self.require_open("move_to")?;
        self.new_stroke = true;
        Ok(())
    }

    /// Record a LineTo from `current` to `pt`
    pub fn line_to(&mut self, current: Point, pt: Point) -> Result<()> {
        self.require_open("line_to")?;
        self.start_new_stroke(current)?;
        self.add_entry(pt, PointType::LINETO)
    }

    /// Record a Polyline: a new stroke through `pts`
    pub fn polyline(&mut self, pts: &[Point]) -> Result<()> {
        self.poly_polyline(pts, &[pts.len()])
    }

    /// Record a PolylineTo: lines from `current` through `pts`
    pub fn polyline_to(&mut self, current: Point, pts: &[Point]) -> Result<()> {
        self.require_open("polyline_to")?;
        if pts.is_empty() {
            return Err(GdiError::InvalidParameter);
        }
        self.start_new_stroke(current)?;
        self.add_points(pts, PointType::LINETO)?;
        Ok(())
    }

    /// Record a closed Polygon
    pub fn polygon(&mut self, pts: &[Point]) -> Result<()> {
        self.poly_polygon(pts, &[pts.len()])
    }

    /// Record several closed polygons (PolyPolygon)
    ///
    /// Each polygon starts with a MOVETO and its last point carries
    /// CLOSEFIGURE. Every polygon needs at least two points.
    pub fn poly_polygon(&mut self, pts: &[Point], counts: &[usize]) -> Result<()> {
        self.require_open("poly_polygon")?;
        check_counts(pts, counts)?;

        let mut first = self.add_points(pts, PointType::LINETO)?;
        for &count in counts {
            self.flags[first] = PointType::MOVETO;
            self.flags[first + count - 1] = PointType::LINETO | PointType::CLOSEFIGURE;
            first += count;
        }
        Ok(())
    }

    /// Record several open polylines (PolyPolyline)
    ///
    /// Each polyline starts its own stroke and needs at least two points.
    pub fn poly_polyline(&mut self, pts: &[Point], counts: &[usize]) -> Result<()> {
        self.require_open("poly_polyline")?;
        check_counts(pts, counts)?;

        let mut first = self.add_points(pts, PointType::LINETO)?;
        for &count in counts {
            self.flags[first] = PointType::MOVETO;
            first += count;
        }
        Ok(())
    }

    /// Record a PolyBezier: a start point followed by groups of three
    pub fn poly_bezier(&mut self, pts: &[Point]) -> Result<()> {
        self.require_open("poly_bezier")?;
        if pts.is_empty() || (pts.len() - 1) % 3 != 0 {
            return Err(GdiError::InvalidParameter);
        }
        let first = self.add_points(pts, PointType::BEZIERTO)?;
        self.flags[first] = PointType::MOVETO;
        Ok(())
    }

    /// Record a PolyBezierTo starting at `current`
    pub fn poly_bezier_to(&mut self, current: Point, pts: &[Point]) -> Result<()> {
        self.require_open("poly_bezier_to")?;
        if pts.len() % 3 != 0 {
            return Err(GdiError::InvalidParameter);
        }
        self.start_new_stroke(current)?;
        self.add_points(pts, PointType::BEZIERTO)?;
        Ok(())
    }

    /// Record a PolyDraw: points with explicit types, starting at `current`
    ///
    /// MOVETO moves the pen without recording anything, LINETO draws a line
    /// and BEZIERTO must come in groups of three. CLOSEFIGURE may be set on
    /// a LINETO or on the last point of a Bezier group; it closes the figure
    /// and moves the pen back to the figure's start. The whole call is
    /// checked before anything is recorded. Returns the new pen position.
    pub fn poly_draw(&mut self, current: Point, pts: &[Point], types: &[PointType]) -> Result<Point> {
        self.require_open("poly_draw")?;
        if pts.len() != types.len() {
            return Err(GdiError::InvalidParameter);
        }
        validate_draw_types(types)?;

        let mut pos = current;
        let mut last_move = self.flags.iter().rposition(|&f| f == PointType::MOVETO).unwrap_or(0);

        let mut i = 0;
        while i < pts.len() {
            let kind = types[i].kind();
            let step = if kind == PointType::MOVETO {
                self.new_stroke = true;
                pos = pts[i];
                last_move = self.points.len();
                1
            } else if kind == PointType::LINETO {
                self.start_new_stroke(pos)?;
                self.add_entry(pts[i], PointType::LINETO)?;
                pos = pts[i];
                1
            } else {
                self.start_new_stroke(pos)?;
                self.add_points(&pts[i..i + 3], PointType::BEZIERTO)?;
                pos = pts[i + 2];
                3
            };

            if types[i + step - 1].contains(PointType::CLOSEFIGURE) {
                self.mark_closed();
                if let Some(&start) = self.points.get(last_move) {
                    pos = start;
                }
            }
            i += step;
        }
        Ok(pos)
    }

    // ------------------------------------------------------------------------
    // Consumers
    // ------------------------------------------------------------------------

    /// Copy out the recorded points and types (GetPath)
    ///
    /// With empty buffers the number of points is returned. Buffers shorter
    /// than the path fail with [`GdiError::InvalidParameter`].
    pub fn get_path(&self, points: &mut [Point], types: &mut [PointType]) -> Result<usize> {
        self.require_closed("get_path")?;
        let count = self.points.len();

        if points.is_empty() && types.is_empty() {
            return Ok(count);
        }
        if points.len() < count || types.len() < count {
            return Err(GdiError::InvalidParameter);
        }

        points[..count].copy_from_slice(&self.points);
        types[..count].copy_from_slice(&self.flags);
        Ok(count)
    }

    /// Replace every Bezier in a closed path by line segments (FlattenPath)
    pub fn flatten_path(&mut self) -> Result<()> {
        self.require_closed("flatten_path")?;
        let flat = self.flattened()?;
        self.replace_points(flat);
        Ok(())
    }

    /// Empty path in the same state, to build a replacement into
    pub(crate) fn sibling(&self) -> Path {
        Path {
            state: self.state,
            ..Path::default()
        }
    }

    /// Take over the points of `other`, keeping this path's state
    pub(crate) fn replace_points(&mut self, other: Path) {
        self.points = other.points;
        self.flags = other.flags;
    }

    /// Copy of the path with Beziers replaced by lines
    pub(crate) fn flattened(&self) -> Result<Path> {
        let mut out = self.sibling();
        out.reserve_entries(self.points.len())?;

        let mut i = 0;
        while i < self.points.len() {
            let flags = self.flags[i];
            if flags.kind() == PointType::BEZIERTO {
                // Malformed trailing control points are dropped
                if i == 0 || i + 2 >= self.points.len() {
                    break;
                }
                let p0 = self.points[i - 1];
                let closed = self.flags[i + 2].contains(PointType::CLOSEFIGURE);
                let start = out.points.len();
                flatten_cubic_bezier(
                    &mut out,
                    to_f64(p0),
                    to_f64(self.points[i]),
                    to_f64(self.points[i + 1]),
                    to_f64(self.points[i + 2]),
                    BEZIER_TOLERANCE,
                    MAX_BEZIER_DEPTH,
                )?;
                if closed && out.points.len() > start {
                    out.mark_closed();
                }
                i += 3;
            } else {
                out.add_entry(self.points[i], flags)?;
                i += 1;
            }
        }
        Ok(out)
    }

    /// Convert a closed path to a region (PathToRegion)
    ///
    /// Every stroke becomes one polygon. The path is emptied on success and
    /// left as it was on failure.
    pub fn to_region(&mut self, mode: FillMode) -> Result<Region> {
        self.require_closed("to_region")?;
        let flat = self.flattened()?;

        let mut counts: Vec<usize> = Vec::new();
        for flags in &flat.flags {
            match counts.last_mut() {
                Some(count) if flags.kind() != PointType::MOVETO => *count += 1,
                _ => status::push(&mut counts, 1)?,
            }
        }

        let region = Region::from_poly_polygon(&flat.points, &counts, mode)?;
        trace!("[GDI/Path] to_region: {} figures -> {:?}", counts.len(), region.region_type());
        self.clear();
        Ok(region)
    }
}

/// Check per-figure point counts: at least one figure, two or more points
/// each, and exactly `pts.len()` points in total
fn check_counts(pts: &[Point], counts: &[usize]) -> Result<()> {
    if counts.is_empty() || counts.iter().any(|&c| c < 2) {
        warn!("[GDI/Path] bad figure counts {:?}", counts);
        return Err(GdiError::InvalidParameter);
    }
    if counts.iter().try_fold(0usize, |acc, &c| acc.checked_add(c)) != Some(pts.len()) {
        warn!("[GDI/Path] counts {:?} do not cover {} points", counts, pts.len());
        return Err(GdiError::InvalidParameter);
    }
    Ok(())
}

/// Reject PolyDraw type sequences that cannot be recorded
fn validate_draw_types(types: &[PointType]) -> Result<()> {
    let mut i = 0;
    while i < types.len() {
        let t = types[i];
        if t == PointType::MOVETO || t.kind() == PointType::LINETO {
            i += 1;
        } else if t == PointType::BEZIERTO &&
            types.get(i + 1) == Some(&PointType::BEZIERTO) &&
            types.get(i + 2).is_some_and(|t| t.kind() == PointType::BEZIERTO)
        {
            i += 3;
        } else {
            warn!("[GDI/Path] poly_draw: bad point type {:?} at {}", t, i);
            return Err(GdiError::InvalidParameter);
        }
    }
    Ok(())
}

// ============================================================================
// Bezier Flattening
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct PointF {
    x: f64,
    y: f64,
}

fn to_f64(pt: Point) -> PointF {
    PointF { x: pt.x as f64, y: pt.y as f64 }
}

fn midpoint(a: PointF, b: PointF) -> PointF {
    PointF { x: (a.x + b.x) * 0.5, y: (a.y + b.y) * 0.5 }
}

fn round_point(pt: PointF) -> Point {
    Point::new((pt.x + 0.5).floor() as i32, (pt.y + 0.5).floor() as i32)
}

/// Recursively flatten a cubic Bezier curve to line segments
///
/// Appends LINETO points for everything after `p0`.
fn flatten_cubic_bezier(
    path: &mut Path,
    p0: PointF,
    p1: PointF,
    p2: PointF,
    p3: PointF,
    tolerance: f64,
    depth: u32,
) -> Result<()> {
    // Maximum distance of the control points from the chord p0-p3
    let dx = p3.x - p0.x;
    let dy = p3.y - p0.y;
    let len = (dx * dx + dy * dy).sqrt();

    let max_dist = if len < 1.0 {
        let d1 = (p1.x - p0.x).hypot(p1.y - p0.y);
        let d2 = (p2.x - p0.x).hypot(p2.y - p0.y);
        d1.max(d2)
    } else {
        let d1 = ((p1.x - p0.x) * dy - (p1.y - p0.y) * dx).abs();
        let d2 = ((p2.x - p0.x) * dy - (p2.y - p0.y) * dx).abs();
        d1.max(d2) / len
    };

    if max_dist <= tolerance || depth == 0 {
        let end = round_point(p3);
        if path.points.last() != Some(&end) {
            path.add_entry(end, PointType::LINETO)?;
        }
        return Ok(());
    }

    // Subdivide using de Casteljau's algorithm
    let p01 = midpoint(p0, p1);
    let p12 = midpoint(p1, p2);
    let p23 = midpoint(p2, p3);
    let p012 = midpoint(p01, p12);
    let p123 = midpoint(p12, p23);
    let p0123 = midpoint(p012, p123);

    flatten_cubic_bezier(path, p0, p01, p012, p0123, tolerance, depth - 1)?;
    flatten_cubic_bezier(path, p0123, p123, p23, p3, tolerance, depth - 1)
}
