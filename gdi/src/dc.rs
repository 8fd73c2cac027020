//! Device Context Collaboration
//!
//! The region and path code never owns a device context; it talks to one
//! through [`DeviceContext`], which supplies the drawing state a path needs
//! (current position, fill mode, arc direction) and accepts the regions the
//! path produces (to paint, or to install as the clip region).
//!
//! [`MemoryDc`] is a self-contained implementation: it records which pixels
//! were painted as a region instead of touching a bitmap, which makes the
//! whole path pipeline observable without an output driver.
//!
//! # References
//!
//! Based on Windows Server 2003:
//! - `windows/core/ntgdi/gre/dcobj.cxx`
//! - `windows/core/ntgdi/gre/pathgdi.cxx` - FillPath, SelectClipPath,
//!   StrokePath, StrokeAndFillPath, WidenPath

use log::{debug, trace, warn};

use crate::path::{Path, PointType};
use crate::pen::{Pen, PenStyle, PenType, DEFAULT_MITER_LIMIT};
use crate::region::Region;
use crate::status::{GdiError, Result};
use crate::types::{ArcDirection, CombineMode, FillMode, Point, Rect, RegionType};

// ============================================================================
// Collaborator Trait
// ============================================================================

/// Drawing state and sinks a path needs from its device context
pub trait DeviceContext {
    /// Current pen position
    fn current_position(&self) -> Point;

    /// Polygon fill mode used when a path becomes a region
    fn poly_fill_mode(&self) -> FillMode;

    /// Direction in which arcs are swept
    fn arc_direction(&self) -> ArcDirection;

    /// Pen used to stroke and widen paths
    fn pen(&self) -> Pen {
        Pen::default()
    }

    fn miter_limit(&self) -> f64 {
        DEFAULT_MITER_LIMIT
    }

    fn path(&self) -> &Path;

    fn path_mut(&mut self) -> &mut Path;

    /// Fill a device-space region
    fn paint_region(&mut self, region: &Region) -> Result<()>;

    /// Combine `region` into the clip region (ExtSelectClipRgn)
    fn select_clip_region(&mut self, region: &Region, mode: CombineMode) -> Result<RegionType>;
}

// ============================================================================
// Path Consumers
// ============================================================================

/// Convert the DC's closed path to a region and empty the path (PathToRegion)
pub fn path_to_region<D: DeviceContext + ?Sized>(dc: &mut D) -> Result<Region> {
    let mode = dc.poly_fill_mode();
    dc.path_mut().to_region(mode)
}

/// Fill the interior of the DC's closed path (FillPath)
pub fn fill_path<D: DeviceContext + ?Sized>(dc: &mut D) -> Result<()> {
    let region = path_to_region(dc)?;
    debug!("[GDI/Path] fill_path: {} rects", region.rect_count());
    dc.paint_region(&region)
}

/// Combine the DC's closed path into its clip region (SelectClipPath)
pub fn select_clip_path<D: DeviceContext + ?Sized>(dc: &mut D, mode: CombineMode) -> Result<RegionType> {
    let region = path_to_region(dc)?;
    dc.select_clip_region(&region, mode)
}

/// Replace the DC's closed path by the outline of its pen (WidenPath)
pub fn widen_path<D: DeviceContext + ?Sized>(dc: &mut D) -> Result<()> {
    let pen = dc.pen();
    let limit = dc.miter_limit();
    dc.path_mut().widen(&pen, limit)
}

/// Area the DC's pen covers along its closed path, leaving the path alone
///
/// Cosmetic pens stroke as one pixel wide geometric pens.
fn stroke_region<D: DeviceContext + ?Sized>(dc: &D) -> Result<Region> {
    let path = dc.path();
    path.require_closed("stroke_path")?;

    let pen = dc.pen();
    if pen.style == PenStyle::Null {
        return Ok(Region::new());
    }
    let pen = match pen.pen_type {
        PenType::Geometric => pen,
        PenType::Cosmetic => Pen { pen_type: PenType::Geometric, width: 1, ..pen },
    };

    let mut outline = path.widened(&pen, dc.miter_limit())?;
    outline.to_region(FillMode::Winding)
}

/// Paint the outline of the DC's closed path and empty it (StrokePath)
pub fn stroke_path<D: DeviceContext + ?Sized>(dc: &mut D) -> Result<()> {
    let region = stroke_region(dc)?;
    dc.path_mut().abort();
    debug!("[GDI/Path] stroke_path: {} rects", region.rect_count());
    dc.paint_region(&region)
}

/// Fill the DC's closed path, paint its outline, and empty it
/// (StrokeAndFillPath)
pub fn stroke_and_fill_path<D: DeviceContext + ?Sized>(dc: &mut D) -> Result<()> {
    let stroke = stroke_region(dc)?;
    let fill = path_to_region(dc)?;
    let region = fill.union(&stroke)?;
    debug!("[GDI/Path] stroke_and_fill_path: {} rects", region.rect_count());
    dc.paint_region(&region)
}

// ============================================================================
// Memory DC
// ============================================================================

/// Device context backed by a coverage region instead of pixels
#[derive(Debug, Clone)]
pub struct MemoryDc {
    /// Surface bounds
    bounds: Rect,

    /// Clipping region; `None` means the whole surface
    clip: Option<Region>,

    /// Pixels painted so far
    painted: Region,

    /// Current pen position
    current_pos: Point,

    fill_mode: FillMode,

    arc_direction: ArcDirection,

    pen: Pen,

    miter_limit: f64,

    path: Path,
}

impl MemoryDc {
    /// Create a DC for a surface of the given size
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            bounds: Rect::new(0, 0, width, height).normalized(),
            clip: None,
            painted: Region::new(),
            current_pos: Point::default(),
            fill_mode: FillMode::default(),
            arc_direction: ArcDirection::default(),
            pen: Pen::default(),
            miter_limit: DEFAULT_MITER_LIMIT,
            path: Path::new(),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn clip_region(&self) -> Option<&Region> {
        self.clip.as_ref()
    }

    /// Remove the clip region
    pub fn reset_clip(&mut self) {
        self.clip = None;
    }

    /// Everything painted so far
    pub fn painted(&self) -> &Region {
        &self.painted
    }

    /// Forget painted coverage
    pub fn clear(&mut self) {
        self.painted.set_empty();
    }

    /// Set the fill mode, returning the previous one (SetPolyFillMode)
    pub fn set_poly_fill_mode(&mut self, mode: FillMode) -> FillMode {
        core::mem::replace(&mut self.fill_mode, mode)
    }

    /// Set the arc direction, returning the previous one (SetArcDirection)
    pub fn set_arc_direction(&mut self, direction: ArcDirection) -> ArcDirection {
        core::mem::replace(&mut self.arc_direction, direction)
    }

    /// Select a pen, returning the previous one (SelectObject)
    pub fn set_pen(&mut self, pen: Pen) -> Pen {
        core::mem::replace(&mut self.pen, pen)
    }

    /// Set the miter limit, returning the previous one (SetMiterLimit)
    ///
    /// Limits below 1 are rejected.
    pub fn set_miter_limit(&mut self, limit: f64) -> Result<f64> {
        if limit.is_nan() || limit < 1.0 {
            warn!("[GDI/DC] miter limit {} below 1", limit);
            return Err(GdiError::InvalidParameter);
        }
        Ok(core::mem::replace(&mut self.miter_limit, limit))
    }

    /// Area drawing may touch: the clip region or the whole surface
    fn visible(&self) -> Region {
        match &self.clip {
            Some(clip) => clip.clone(),
            None => Region::from_rect(self.bounds),
        }
    }

    // ------------------------------------------------------------------------
    // Path Bracket
    // ------------------------------------------------------------------------

    pub fn begin_path(&mut self) -> Result<()> {
        self.path.begin()
    }

    pub fn end_path(&mut self) -> Result<()> {
        self.path.end()
    }

    pub fn abort_path(&mut self) {
        self.path.abort()
    }

    pub fn close_figure(&mut self) -> Result<()> {
        self.path.close_figure()
    }

    pub fn flatten_path(&mut self) -> Result<()> {
        self.path.flatten_path()
    }

    pub fn get_path(&self, points: &mut [Point], types: &mut [PointType]) -> Result<usize> {
        self.path.get_path(points, types)
    }

    pub fn path_to_region(&mut self) -> Result<Region> {
        path_to_region(self)
    }

    pub fn fill_path(&mut self) -> Result<()> {
        fill_path(self)
    }

    pub fn select_clip_path(&mut self, mode: CombineMode) -> Result<RegionType> {
        select_clip_path(self, mode)
    }

    pub fn widen_path(&mut self) -> Result<()> {
        widen_path(self)
    }

    pub fn stroke_path(&mut self) -> Result<()> {
        stroke_path(self)
    }

    pub fn stroke_and_fill_path(&mut self) -> Result<()> {
        stroke_and_fill_path(self)
    }

    // ------------------------------------------------------------------------
    // Drawing Calls
    // ------------------------------------------------------------------------
    //
    // While a path is open every call is recorded in it. Otherwise filled
    // shapes paint their interior and line-type calls only move the pen.

    /// Move the pen, returning the previous position (MoveToEx)
    pub fn move_to(&mut self, x: i32, y: i32) -> Result<Point> {
        if self.path.is_open() {
            self.path.move_to()?;
        }
        Ok(core::mem::replace(&mut self.current_pos, Point::new(x, y)))
    }

    pub fn line_to(&mut self, x: i32, y: i32) -> Result<()> {
        let pt = Point::new(x, y);
        if self.path.is_open() {
            self.path.line_to(self.current_pos, pt)?;
        }
        self.current_pos = pt;
        Ok(())
    }

    pub fn polyline(&mut self, pts: &[Point]) -> Result<()> {
        if self.path.is_open() {
            self.path.polyline(pts)?;
        }
        Ok(())
    }

    /// Several polylines; the pen does not move (PolyPolyline)
    pub fn poly_polyline(&mut self, pts: &[Point], counts: &[usize]) -> Result<()> {
        if self.path.is_open() {
            self.path.poly_polyline(pts, counts)?;
        }
        Ok(())
    }

    pub fn polyline_to(&mut self, pts: &[Point]) -> Result<()> {
        if self.path.is_open() {
            self.path.polyline_to(self.current_pos, pts)?;
        }
        if let Some(&last) = pts.last() {
            self.current_pos = last;
        }
        Ok(())
    }

    pub fn poly_bezier(&mut self, pts: &[Point]) -> Result<()> {
        if self.path.is_open() {
            self.path.poly_bezier(pts)?;
        }
        Ok(())
    }

    pub fn poly_bezier_to(&mut self, pts: &[Point]) -> Result<()> {
        if self.path.is_open() {
            self.path.poly_bezier_to(self.current_pos, pts)?;
        }
        if let Some(&last) = pts.last() {
            self.current_pos = last;
        }
        Ok(())
    }

    /// Lines and curves with explicit point types (PolyDraw)
    pub fn poly_draw(&mut self, pts: &[Point], types: &[PointType]) -> Result<()> {
        if self.path.is_open() {
            self.current_pos = self.path.poly_draw(self.current_pos, pts, types)?;
            return Ok(());
        }
        let mut scratch = Path::new();
        scratch.begin()?;
        self.current_pos = scratch.poly_draw(self.current_pos, pts, types)?;
        Ok(())
    }

    pub fn polygon(&mut self, pts: &[Point]) -> Result<()> {
        if self.path.is_open() {
            return self.path.polygon(pts);
        }
        let region = Region::from_polygon(pts, self.fill_mode)?;
        self.paint_region(&region)
    }

    pub fn poly_polygon(&mut self, pts: &[Point], counts: &[usize]) -> Result<()> {
        if self.path.is_open() {
            return self.path.poly_polygon(pts, counts);
        }
        let region = Region::from_poly_polygon(pts, counts, self.fill_mode)?;
        self.paint_region(&region)
    }

    pub fn rectangle(&mut self, left: i32, top: i32, right: i32, bottom: i32) -> Result<()> {
        let bounds = Rect::new(left, top, right, bottom);
        if self.path.is_open() {
            return self.path.rectangle(bounds, self.arc_direction);
        }
        self.paint_region(&Region::from_rect(bounds))
    }

    pub fn ellipse(&mut self, left: i32, top: i32, right: i32, bottom: i32) -> Result<()> {
        if self.path.is_open() {
            return self.path.ellipse(Rect::new(left, top, right, bottom), self.arc_direction);
        }
        let region = Region::elliptic(left, top, right, bottom)?;
        self.paint_region(&region)
    }

    pub fn round_rect(&mut self, left: i32, top: i32, right: i32, bottom: i32, width: i32, height: i32) -> Result<()> {
        if self.path.is_open() {
            let bounds = Rect::new(left, top, right, bottom);
            return self.path.round_rect(bounds, width, height, self.arc_direction);
        }
        let region = Region::round_rect(left, top, right, bottom, width, height)?;
        self.paint_region(&region)
    }

    pub fn arc(&mut self, bounds: Rect, start: Point, end: Point) -> Result<()> {
        if self.path.is_open() {
            self.path.arc(bounds, start, end, self.arc_direction)?;
        }
        Ok(())
    }

    /// Arc joined to the pen position; the pen ends on the arc's end point
    pub fn arc_to(&mut self, bounds: Rect, start: Point, end: Point) -> Result<()> {
        let direction = self.arc_direction;
        let current = self.current_pos;
        self.pen_figure(|path| path.arc_to(current, bounds, start, end, direction))
    }

    /// Arc by centre, radius and angles in degrees (AngleArc)
    ///
    /// Like ArcTo, the pen ends on the arc's end point.
    pub fn angle_arc(&mut self, x: i32, y: i32, radius: u32, start: f32, sweep: f32) -> Result<()> {
        let current = self.current_pos;
        self.pen_figure(|path| path.angle_arc(current, Point::new(x, y), radius, start, sweep))
    }

    /// Record a figure that moves the pen to its last point
    fn pen_figure<F>(&mut self, record: F) -> Result<()>
    where
        F: FnOnce(&mut Path) -> Result<()>,
    {
        let last = if self.path.is_open() {
            let before = self.path.len();
            record(&mut self.path)?;
            self.path.points()[before..].last().copied()
        } else {
            let mut scratch = Path::new();
            scratch.begin()?;
            record(&mut scratch)?;
            scratch.points().last().copied()
        };
        if let Some(pt) = last {
            self.current_pos = pt;
        }
        Ok(())
    }

    pub fn chord(&mut self, bounds: Rect, start: Point, end: Point) -> Result<()> {
        let direction = self.arc_direction;
        self.arc_figure(|path| path.chord(bounds, start, end, direction))
    }

    pub fn pie(&mut self, bounds: Rect, start: Point, end: Point) -> Result<()> {
        let direction = self.arc_direction;
        self.arc_figure(|path| path.pie(bounds, start, end, direction))
    }

    /// Record a closed arc figure, or fill it through a scratch path
    fn arc_figure<F>(&mut self, record: F) -> Result<()>
    where
        F: Fn(&mut Path) -> Result<()>,
    {
        if self.path.is_open() {
            return record(&mut self.path);
        }

        let mut scratch = Path::new();
        scratch.begin()?;
        record(&mut scratch)?;
        scratch.end()?;
        let region = scratch.to_region(self.fill_mode)?;
        self.paint_region(&region)
    }
}

impl DeviceContext for MemoryDc {
    fn current_position(&self) -> Point {
        self.current_pos
    }

    fn poly_fill_mode(&self) -> FillMode {
        self.fill_mode
    }

    fn arc_direction(&self) -> ArcDirection {
        self.arc_direction
    }

    fn pen(&self) -> Pen {
        self.pen
    }

    fn miter_limit(&self) -> f64 {
        self.miter_limit
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn path_mut(&mut self) -> &mut Path {
        &mut self.path
    }

    fn paint_region(&mut self, region: &Region) -> Result<()> {
        let visible = region.intersection(&self.visible())?;
        trace!("[GDI/DC] paint {} rects, {} visible", region.rect_count(), visible.rect_count());
        self.painted.combine_with(&visible, CombineMode::Or)?;
        Ok(())
    }

    fn select_clip_region(&mut self, region: &Region, mode: CombineMode) -> Result<RegionType> {
        let clip = match mode {
            CombineMode::Copy => {
                let mut copy = Region::new();
                copy.copy_from(region)?;
                copy
            }
            _ => {
                let mut clip = self.visible();
                clip.combine_with(region, mode)?;
                clip
            }
        };
        let kind = clip.region_type();
        debug!("[GDI/DC] clip {:?} -> {:?} {:?}", mode, kind, clip.bounding_box());
        self.clip = Some(clip);
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathState;
    use crate::pen::{EndCap, LineJoin};

    #[test]
    fn test_drawing_outside_path_paints() {
        let mut dc = MemoryDc::new(100, 100);
        dc.rectangle(10, 10, 20, 20).unwrap();
        assert_eq!(dc.painted().rects(), &[Rect::new(10, 10, 20, 20)]);

        dc.rectangle(90, 90, 120, 120).unwrap();
        assert!(dc.painted().contains_point(Point::new(99, 99)));
        assert!(!dc.painted().contains_point(Point::new(100, 100)));
    }

    #[test]
    fn test_fill_path_consumes_path() {
        let mut dc = MemoryDc::new(100, 100);
        dc.begin_path().unwrap();
        dc.move_to(0, 0).unwrap();
        dc.line_to(40, 0).unwrap();
        dc.line_to(40, 40).unwrap();
        dc.line_to(0, 40).unwrap();
        dc.close_figure().unwrap();
        assert!(dc.painted().is_empty());

        assert_eq!(dc.fill_path(), Err(GdiError::WrongState));
        dc.end_path().unwrap();
        dc.fill_path().unwrap();

        assert_eq!(dc.painted().rects(), &[Rect::new(0, 0, 40, 40)]);
        assert_eq!(dc.path().state(), PathState::Empty);
        assert_eq!(dc.current_position(), Point::new(0, 40));
    }

    #[test]
    fn test_select_clip_path_limits_painting() {
        let mut dc = MemoryDc::new(100, 100);
        dc.begin_path().unwrap();
        dc.rectangle(0, 0, 50, 50).unwrap();
        dc.end_path().unwrap();
        assert_eq!(dc.select_clip_path(CombineMode::Copy), Ok(RegionType::Simple));

        dc.rectangle(25, 25, 75, 75).unwrap();
        assert_eq!(dc.painted().rects(), &[Rect::new(25, 25, 50, 50)]);
    }

    #[test]
    fn test_clip_without_existing_clip_uses_bounds() {
        let mut dc = MemoryDc::new(100, 100);
        let hole = Region::from_coords(40, 40, 60, 60);
        assert_eq!(dc.select_clip_region(&hole, CombineMode::Diff), Ok(RegionType::Complex));
        let clip = dc.clip_region().unwrap();
        assert_eq!(clip.bounding_box(), Rect::new(0, 0, 100, 100));
        assert!(!clip.contains_point(Point::new(50, 50)));
        dc.reset_clip();
        assert!(dc.clip_region().is_none());
    }

    #[test]
    fn test_winding_mode_from_dc() {
        let pts = [
            Point::new(0, 0), Point::new(10, 0), Point::new(10, 10), Point::new(0, 10),
            Point::new(5, 5), Point::new(15, 5), Point::new(15, 15), Point::new(5, 15),
        ];
        let mut dc = MemoryDc::new(50, 50);
        dc.set_poly_fill_mode(FillMode::Winding);
        dc.begin_path().unwrap();
        dc.poly_polygon(&pts, &[4, 4]).unwrap();
        dc.end_path().unwrap();
        let rgn = dc.path_to_region().unwrap();
        assert!(rgn.contains_point(Point::new(7, 7)));

        dc.set_poly_fill_mode(FillMode::Alternate);
        dc.poly_polygon(&pts, &[4, 4]).unwrap();
        assert!(!dc.painted().contains_point(Point::new(7, 7)));
        assert!(dc.painted().contains_point(Point::new(2, 2)));
    }

    #[test]
    fn test_arc_to_moves_pen() {
        let mut dc = MemoryDc::new(50, 50);
        dc.set_arc_direction(ArcDirection::Clockwise);
        dc.arc_to(Rect::new(0, 0, 20, 20), Point::new(20, 10), Point::new(10, 20)).unwrap();
        assert_eq!(dc.current_position(), Point::new(10, 20));
        assert!(dc.painted().is_empty());
    }

    #[test]
    fn test_pie_outside_path_paints() {
        let mut dc = MemoryDc::new(50, 50);
        dc.set_arc_direction(ArcDirection::Clockwise);
        dc.pie(Rect::new(0, 0, 40, 40), Point::new(40, 20), Point::new(20, 40)).unwrap();
        assert!(dc.painted().contains_point(Point::new(25, 25)));
        assert!(!dc.painted().contains_point(Point::new(15, 15)));
        assert_eq!(dc.path().state(), PathState::Empty);
    }

    #[test]
    fn test_rectangle_follows_arc_direction() {
        let mut dc = MemoryDc::new(50, 50);
        dc.begin_path().unwrap();
        dc.rectangle(0, 0, 10, 20).unwrap();
        assert_eq!(dc.path().points()[0], Point::new(10, 0));

        dc.set_arc_direction(ArcDirection::Clockwise);
        dc.rectangle(0, 0, 10, 20).unwrap();
        assert_eq!(dc.path().points()[4], Point::new(10, 20));
        assert_eq!(dc.path().flags()[4], PointType::MOVETO);

        dc.round_rect(0, 0, 40, 30, 10, 10).unwrap();
        assert_eq!(dc.path().points()[8], Point::new(40, 25));
    }

    #[test]
    fn test_poly_draw_moves_pen() {
        let mut dc = MemoryDc::new(50, 50);
        dc.begin_path().unwrap();
        let pts = [Point::new(5, 5), Point::new(15, 5), Point::new(15, 15)];
        let types = [PointType::MOVETO, PointType::LINETO, PointType::LINETO];
        dc.poly_draw(&pts, &types).unwrap();
        assert_eq!(dc.current_position(), Point::new(15, 15));
        assert_eq!(dc.path().len(), 3);

        let bad = [PointType::BEZIERTO, PointType::LINETO, PointType::LINETO];
        assert_eq!(dc.poly_draw(&pts, &bad), Err(GdiError::InvalidParameter));
        assert_eq!(dc.current_position(), Point::new(15, 15));

        dc.abort_path();
        dc.poly_draw(&pts[..2], &types[..2]).unwrap();
        assert_eq!(dc.current_position(), Point::new(15, 5));
        assert!(dc.painted().is_empty());
    }

    #[test]
    fn test_angle_arc_moves_pen() {
        let mut dc = MemoryDc::new(100, 100);
        dc.move_to(0, 0).unwrap();
        dc.angle_arc(50, 50, 10, 0.0, 180.0).unwrap();
        assert_eq!(dc.current_position(), Point::new(40, 50));

        dc.begin_path().unwrap();
        dc.angle_arc(50, 50, 10, 90.0, -90.0).unwrap();
        assert_eq!(dc.path().points()[0], Point::new(40, 50));
        assert_eq!(dc.current_position(), Point::new(60, 50));
    }

    #[test]
    fn test_stroke_path_paints_outline() {
        let mut dc = MemoryDc::new(100, 100);
        dc.set_pen(Pen::geometric(4, EndCap::Flat, LineJoin::Miter));
        dc.begin_path().unwrap();
        dc.move_to(10, 10).unwrap();
        dc.line_to(30, 10).unwrap();
        assert_eq!(dc.stroke_path(), Err(GdiError::WrongState));
        dc.end_path().unwrap();
        dc.stroke_path().unwrap();

        assert_eq!(dc.painted().rects(), &[Rect::new(10, 8, 30, 12)]);
        assert_eq!(dc.path().state(), PathState::Empty);
    }

    #[test]
    fn test_stroke_and_fill_path() {
        let mut dc = MemoryDc::new(100, 100);
        dc.set_pen(Pen::geometric(4, EndCap::Flat, LineJoin::Miter));
        dc.begin_path().unwrap();
        dc.rectangle(10, 10, 30, 30).unwrap();
        dc.end_path().unwrap();
        dc.stroke_and_fill_path().unwrap();

        assert_eq!(dc.painted().rects(), &[Rect::new(8, 8, 32, 32)]);
        assert_eq!(dc.path().state(), PathState::Empty);
    }

    #[test]
    fn test_null_pen_strokes_nothing() {
        let mut dc = MemoryDc::new(100, 100);
        dc.set_pen(Pen { style: PenStyle::Null, ..Pen::default() });
        dc.begin_path().unwrap();
        dc.rectangle(10, 10, 30, 30).unwrap();
        dc.end_path().unwrap();
        dc.stroke_path().unwrap();
        assert!(dc.painted().is_empty());
        assert_eq!(dc.path().state(), PathState::Empty);
    }

    #[test]
    fn test_widen_path_uses_dc_pen() {
        let mut dc = MemoryDc::new(100, 100);
        dc.begin_path().unwrap();
        dc.polyline(&[Point::new(10, 10), Point::new(30, 10)]).unwrap();
        dc.end_path().unwrap();
        assert_eq!(dc.widen_path(), Err(GdiError::InvalidParameter));

        dc.set_pen(Pen::geometric(6, EndCap::Flat, LineJoin::Bevel));
        assert_eq!(dc.set_miter_limit(0.5), Err(GdiError::InvalidParameter));
        assert_eq!(dc.set_miter_limit(4.0), Ok(DEFAULT_MITER_LIMIT));
        dc.widen_path().unwrap();
        assert_eq!(dc.path().state(), PathState::Closed);
        assert_eq!(dc.path_to_region().unwrap().rects(), &[Rect::new(10, 7, 30, 13)]);
    }
}
