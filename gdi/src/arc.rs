//! Arc Decomposition
//!
//! Arcs, ellipses and rounded rectangles are recorded in a path as cubic
//! Bezier splines, one per quadrant (or part of a quadrant) the arc spans.
//!
//! Angles are measured on the unit circle mapped onto the bounding box, with
//! y pointing down. For a segment from angle `s` to `e` with half-angle
//! `h = (e - s) / 2`, the inner control points sit along the tangents at a
//! distance of `a = 4/3 * (1 - cos h) / sin h`.

use core::f64::consts::{FRAC_PI_2, PI};

use log::{trace, warn};

use crate::path::{Path, PointType};
use crate::status::{GdiError, Result};
use crate::types::{ArcDirection, Point, Rect};

/// Extra lines added around an arc
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArcLines {
    /// Plain arc, starts a new stroke
    None,
    /// ArcTo: continues from the current position
    ArcTo,
    /// Chord: closes the figure
    Chord,
    /// Pie: line to the centre, then close
    Pie,
}

/// Bounding box in floating point, top-left first
#[derive(Debug, Clone, Copy)]
pub(crate) struct Corners {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

impl Corners {
    pub(crate) fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Corners { x0, y0, x1, y1 }
    }

    fn from_rect(rect: &Rect) -> Self {
        Corners::new(rect.left as f64, rect.top as f64, rect.right as f64, rect.bottom as f64)
    }

    /// Map a point to [-1, 1] box coordinates
    fn normalize(&self, pt: Point) -> (f64, f64) {
        let x = (pt.x as f64 - self.x0) / (self.x1 - self.x0) * 2.0 - 1.0;
        let y = (pt.y as f64 - self.y0) / (self.y1 - self.y0) * 2.0 - 1.0;
        (x, y)
    }

    /// Map [-1, 1] box coordinates back to a device point
    fn scale(&self, x: f64, y: f64) -> Point {
        let px = self.x0 + (self.x1 - self.x0) * 0.5 * (x + 1.0);
        let py = self.y0 + (self.y1 - self.y0) * 0.5 * (y + 1.0);
        Point::new(gdi_round(px), gdi_round(py))
    }
}

impl Path {
    /// Append one Bezier spline for the arc from `start` to `end` radians
    ///
    /// The span must not exceed a quarter circle. With `start_type` the
    /// first point is added too; otherwise the path is assumed to already
    /// end there.
    pub(crate) fn arc_part(&mut self, corners: &Corners, start: f64, end: f64, start_type: Option<PointType>) -> Result<()> {
        debug_assert!((end - start).abs() <= FRAC_PI_2 + 1e-9);

        let half = (end - start) / 2.0;
        let (xs, ys) = if half.abs() > 1e-8 {
            let a = 4.0 / 3.0 * (1.0 - half.cos()) / half.sin();
            let (x0, y0) = (start.cos(), start.sin());
            let (x3, y3) = (end.cos(), end.sin());
            (
                [x0, x0 - a * y0, x3 + a * y3, x3],
                [y0, y0 + a * x0, y3 - a * x3, y3],
            )
        } else {
            ([start.cos(); 4], [start.sin(); 4])
        };

        if let Some(flags) = start_type {
            self.add_entry(corners.scale(xs[0], ys[0]), flags)?;
        }
        for (&x, &y) in xs.iter().zip(&ys).skip(1) {
            self.add_entry(corners.scale(x, y), PointType::BEZIERTO)?;
        }
        Ok(())
    }

    fn do_arc(
        &mut self,
        current: Point,
        bounds: Rect,
        start_pt: Point,
        end_pt: Point,
        direction: ArcDirection,
        lines: ArcLines,
    ) -> Result<()> {
        self.require_open("arc")?;

        // Zero width or height draws nothing
        if bounds.left == bounds.right || bounds.top == bounds.bottom {
            return Ok(());
        }

        let corners = Corners::from_rect(&bounds.normalized());

        let (x, y) = corners.normalize(start_pt);
        let angle_start = y.atan2(x);
        let (x, y) = corners.normalize(end_pt);
        let mut angle_end = y.atan2(x);

        // Put the end angle on the correct side of the start angle
        match direction {
            ArcDirection::Clockwise => {
                if angle_end <= angle_start {
                    angle_end += 2.0 * PI;
                }
            }
            ArcDirection::CounterClockwise => {
                if angle_end >= angle_start {
                    angle_end -= 2.0 * PI;
                }
            }
        }

        trace!("[GDI/Path] arc {:?} {:.4}..{:.4} {:?} {:?}",
            bounds, angle_start, angle_end, direction, lines);

        if lines == ArcLines::ArcTo {
            self.start_new_stroke(current)?;
        }

        // One spline per quadrant boundary crossed
        let mut seg_start = angle_start;
        let mut seg_end = match direction {
            ArcDirection::Clockwise => ((angle_start / FRAC_PI_2).floor() + 1.0) * FRAC_PI_2,
            ArcDirection::CounterClockwise => ((angle_start / FRAC_PI_2).ceil() - 1.0) * FRAC_PI_2,
        };
        let mut first = true;

        loop {
            let last = match direction {
                ArcDirection::Clockwise => angle_end <= seg_end,
                ArcDirection::CounterClockwise => angle_end >= seg_end,
            };
            if last {
                seg_end = angle_end;
            }

            let start_type = if !first {
                None
            } else if lines == ArcLines::ArcTo {
                Some(PointType::LINETO)
            } else {
                Some(PointType::MOVETO)
            };
            self.arc_part(&corners, seg_start, seg_end, start_type)?;
            first = false;

            if last {
                break;
            }
            seg_start = seg_end;
            seg_end += match direction {
                ArcDirection::Clockwise => FRAC_PI_2,
                ArcDirection::CounterClockwise => -FRAC_PI_2,
            };
        }

        match lines {
            ArcLines::Chord => self.mark_closed(),
            ArcLines::Pie => {
                let centre = Point::new(
                    ((corners.x0 + corners.x1) / 2.0) as i32,
                    ((corners.y0 + corners.y1) / 2.0) as i32,
                );
                self.add_entry(centre, PointType::LINETO | PointType::CLOSEFIGURE)?;
            }
            ArcLines::None | ArcLines::ArcTo => {}
        }
        Ok(())
    }

    /// Record an elliptical arc (Arc)
    ///
    /// The arc runs on the ellipse inscribed in `bounds`, from the ray
    /// through `start` to the ray through `end`, in `direction`.
    pub fn arc(&mut self, bounds: Rect, start: Point, end: Point, direction: ArcDirection) -> Result<()> {
        self.do_arc(Point::default(), bounds, start, end, direction, ArcLines::None)
    }

    /// Record an arc connected to the current position by a line (ArcTo)
    pub fn arc_to(
        &mut self,
        current: Point,
        bounds: Rect,
        start: Point,
        end: Point,
        direction: ArcDirection,
    ) -> Result<()> {
        self.do_arc(current, bounds, start, end, direction, ArcLines::ArcTo)
    }

    /// Record an arc closed by its chord (Chord)
    pub fn chord(&mut self, bounds: Rect, start: Point, end: Point, direction: ArcDirection) -> Result<()> {
        self.do_arc(Point::default(), bounds, start, end, direction, ArcLines::Chord)
    }

    /// Record an arc closed through the centre of the ellipse (Pie)
    ///
    /// The closing line ends at the midpoint of the box with both
    /// coordinates truncated toward zero, not rounded.
    pub fn pie(&mut self, bounds: Rect, start: Point, end: Point, direction: ArcDirection) -> Result<()> {
        self.do_arc(Point::default(), bounds, start, end, direction, ArcLines::Pie)
    }

    /// Record a full ellipse (Ellipse)
    pub fn ellipse(&mut self, bounds: Rect, direction: ArcDirection) -> Result<()> {
        let mid = Point::new(bounds.left, (bounds.top + bounds.bottom) / 2);
        self.do_arc(Point::default(), bounds, mid, mid, direction, ArcLines::None)?;
        self.close_figure()
    }

    /// Record a rectangle (Rectangle)
    ///
    /// Any open figure is closed first. The corners are recorded starting
    /// at the top right and running counter-clockwise, or in the reverse
    /// order when `direction` is clockwise.
    pub fn rectangle(&mut self, bounds: Rect, direction: ArcDirection) -> Result<()> {
        self.require_open("rectangle")?;
        let r = bounds.normalized();

        let mut pts = [
            Point::new(r.right, r.top),
            Point::new(r.left, r.top),
            Point::new(r.left, r.bottom),
            Point::new(r.right, r.bottom),
        ];
        if direction == ArcDirection::Clockwise {
            pts.reverse();
        }

        self.mark_closed();
        self.add_figure(&pts, |_| PointType::LINETO)
    }

    /// Record a rectangle with elliptical corners (RoundRect)
    ///
    /// The corner ellipse sizes are taken as absolute values and limited to
    /// the box; a zero size records a plain rectangle. Four corner splines
    /// are joined by lines, starting on the right edge below the top right
    /// corner.
    pub fn round_rect(
        &mut self,
        bounds: Rect,
        ellipse_width: i32,
        ellipse_height: i32,
        direction: ArcDirection,
    ) -> Result<()> {
        if ellipse_width == 0 || ellipse_height == 0 {
            return self.rectangle(bounds, direction);
        }
        self.require_open("round_rect")?;
        let r = bounds.normalized();

        let box_w = r.right as i64 - r.left as i64;
        let box_h = r.bottom as i64 - r.top as i64;
        let w = (ellipse_width as i64).abs().min(box_w) as f64 / 2.0;
        let h = (ellipse_height as i64).abs().min(box_h) as f64 / 2.0;

        let (l, t, rt, b) = (r.left, r.top, r.right, r.bottom);
        let (dw, dh) = (gdi_round(w), gdi_round(h));
        let (cw, ch) = (gdi_round(w * (1.0 - ROUND_RECT_FACTOR)), gdi_round(h * (1.0 - ROUND_RECT_FACTOR)));

        let mut pts = [
            Point::new(rt, t + dh),
            Point::new(rt, t + ch),
            Point::new(rt - cw, t),
            Point::new(rt - dw, t),
            Point::new(l + dw, t),
            Point::new(l + cw, t),
            Point::new(l, t + ch),
            Point::new(l, t + dh),
            Point::new(l, b - dh),
            Point::new(l, b - ch),
            Point::new(l + cw, b),
            Point::new(l + dw, b),
            Point::new(rt - dw, b),
            Point::new(rt - cw, b),
            Point::new(rt, b - ch),
            Point::new(rt, b - dh),
        ];
        if direction == ArcDirection::Clockwise {
            pts.reverse();
        }

        self.add_figure(&pts, |i| if i % 4 == 0 { PointType::LINETO } else { PointType::BEZIERTO })
    }

    /// Record an arc given by centre, radius and angles in degrees (AngleArc)
    ///
    /// A line joins the current position to the start of the arc. Angles
    /// run counter-clockwise on screen, so a positive sweep draws
    /// counter-clockwise and a negative one clockwise.
    pub fn angle_arc(&mut self, current: Point, centre: Point, radius: u32, start: f32, sweep: f32) -> Result<()> {
        self.require_open("angle_arc")?;

        let r = radius as i64;
        let (cx, cy) = (centre.x as i64, centre.y as i64);
        let bounds = match (
            i32::try_from(cx - r),
            i32::try_from(cy - r),
            i32::try_from(cx + r),
            i32::try_from(cy + r),
        ) {
            (Ok(left), Ok(top), Ok(right), Ok(bottom)) => Rect::new(left, top, right, bottom),
            _ => {
                warn!("[GDI/Path] angle_arc: radius {} around {:?} leaves the coordinate space", radius, centre);
                return Err(GdiError::InvalidParameter);
            }
        };

        let ray = |degrees: f32| {
            let rad = degrees as f64 * PI / 180.0;
            Point::new(
                gdi_round(centre.x as f64 + rad.cos() * radius as f64),
                gdi_round(centre.y as f64 - rad.sin() * radius as f64),
            )
        };
        let direction = if sweep >= 0.0 {
            ArcDirection::CounterClockwise
        } else {
            ArcDirection::Clockwise
        };

        self.do_arc(current, bounds, ray(start), ray(start + sweep), direction, ArcLines::ArcTo)
    }

    /// Add a closed figure: MOVETO, then `kind(i)` for every later point
    fn add_figure(&mut self, pts: &[Point], kind: impl Fn(usize) -> PointType) -> Result<()> {
        for (i, &pt) in pts.iter().enumerate() {
            let flags = if i == 0 { PointType::MOVETO } else { kind(i) };
            self.add_entry(pt, flags)?;
        }
        self.close_figure()
    }
}

/// Control point distance for a quarter circle, 4/3 * (sqrt(2) - 1)
const ROUND_RECT_FACTOR: f64 = 0.55428475;

fn gdi_round(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathState;
    use crate::status::GdiError;
    use crate::types::FillMode;

    fn open_path() -> Path {
        let mut path = Path::new();
        path.begin().unwrap();
        path
    }

    fn count(path: &Path, kind: PointType) -> usize {
        path.flags().iter().filter(|f| f.kind() == kind).count()
    }

    #[test]
    fn test_ellipse_four_splines() {
        let mut path = open_path();
        path.ellipse(Rect::new(0, 0, 100, 50), ArcDirection::CounterClockwise).unwrap();

        assert_eq!(path.len(), 13);
        assert_eq!(path.flags()[0], PointType::MOVETO);
        assert_eq!(count(&path, PointType::BEZIERTO), 12);
        assert_eq!(path.points()[0], Point::new(0, 25));
        assert_eq!(path.points()[12], Point::new(0, 25));
        assert!(path.flags()[12].contains(PointType::CLOSEFIGURE));
        // Quadrant end points lie on the box edges
        assert!(path.points().contains(&Point::new(50, 0)));
        assert!(path.points().contains(&Point::new(100, 25)));
        assert!(path.points().contains(&Point::new(50, 50)));
    }

    #[test]
    fn test_full_sweep_off_axis_uses_five_splines() {
        let mut path = open_path();
        let bounds = Rect::new(-10, -10, 10, 10);
        let pt = Point::new(10, 10);
        path.arc(bounds, pt, pt, ArcDirection::Clockwise).unwrap();
        assert_eq!(count(&path, PointType::BEZIERTO), 15);
    }

    #[test]
    fn test_quarter_arc_direction() {
        let bounds = Rect::new(-10, -10, 10, 10);
        let right = Point::new(10, 0);
        let bottom = Point::new(0, 10);

        let mut cw = open_path();
        cw.arc(bounds, right, bottom, ArcDirection::Clockwise).unwrap();
        assert_eq!(cw.len(), 4);
        assert_eq!(cw.points()[3], Point::new(0, 10));

        let mut ccw = open_path();
        ccw.arc(bounds, right, bottom, ArcDirection::CounterClockwise).unwrap();
        assert_eq!(ccw.len(), 10);
        assert!(ccw.points().contains(&Point::new(0, -10)));
        assert!(ccw.points().contains(&Point::new(-10, 0)));
    }

    #[test]
    fn test_zero_size_box() {
        let mut path = open_path();
        path.arc(Rect::new(5, 0, 5, 10), Point::new(0, 0), Point::new(1, 1), ArcDirection::Clockwise).unwrap();
        assert!(path.is_empty());

        let mut closed = Path::new();
        assert_eq!(
            closed.arc(Rect::new(0, 0, 5, 5), Point::new(0, 0), Point::new(1, 1), ArcDirection::Clockwise),
            Err(GdiError::WrongState)
        );
    }

    #[test]
    fn test_arc_to_continues_stroke() {
        let mut path = open_path();
        let bounds = Rect::new(0, 0, 20, 20);
        path.arc_to(Point::new(-5, -5), bounds, Point::new(20, 10), Point::new(10, 20), ArcDirection::Clockwise)
            .unwrap();
        assert_eq!(path.flags()[0], PointType::MOVETO);
        assert_eq!(path.points()[0], Point::new(-5, -5));
        assert_eq!(path.flags()[1], PointType::LINETO);
        assert_eq!(path.points()[1], Point::new(20, 10));
    }

    #[test]
    fn test_pie_and_chord_close() {
        let bounds = Rect::new(0, 0, 20, 20);
        let mut pie = open_path();
        pie.pie(bounds, Point::new(20, 10), Point::new(10, 20), ArcDirection::Clockwise).unwrap();
        assert_eq!(pie.points().last(), Some(&Point::new(10, 10)));
        assert_eq!(pie.flags().last(), Some(&(PointType::LINETO | PointType::CLOSEFIGURE)));

        let mut chord = open_path();
        chord.chord(bounds, Point::new(20, 10), Point::new(10, 20), ArcDirection::Clockwise).unwrap();
        assert!(chord.flags().last().is_some_and(|f| f.contains(PointType::CLOSEFIGURE)));
    }

    #[test]
    fn test_rectangle_points() {
        let mut path = open_path();
        path.rectangle(Rect::new(10, 20, 0, 0), ArcDirection::CounterClockwise).unwrap();
        assert_eq!(path.points(), &[
            Point::new(10, 0),
            Point::new(0, 0),
            Point::new(0, 20),
            Point::new(10, 20),
        ]);
        assert_eq!(path.flags()[0], PointType::MOVETO);
        assert_eq!(path.flags()[3], PointType::LINETO | PointType::CLOSEFIGURE);

        path.end().unwrap();
        let rgn = path.to_region(FillMode::Alternate).unwrap();
        assert_eq!(rgn.rects(), &[Rect::new(0, 0, 10, 20)]);
        assert_eq!(path.state(), PathState::Empty);
    }

    #[test]
    fn test_rectangle_clockwise_reverses() {
        let mut path = open_path();
        path.rectangle(Rect::new(0, 0, 10, 20), ArcDirection::Clockwise).unwrap();
        assert_eq!(path.points(), &[
            Point::new(10, 20),
            Point::new(0, 20),
            Point::new(0, 0),
            Point::new(10, 0),
        ]);
        assert_eq!(path.flags(), &[
            PointType::MOVETO,
            PointType::LINETO,
            PointType::LINETO,
            PointType::LINETO | PointType::CLOSEFIGURE,
        ]);
    }

    #[test]
    fn test_round_rect_path_region() {
        let mut path = open_path();
        path.round_rect(Rect::new(0, 0, 40, 30), 10, 10, ArcDirection::CounterClockwise).unwrap();
        assert_eq!(path.len(), 16);
        assert_eq!(path.flags()[0], PointType::MOVETO);
        assert_eq!(path.points()[0], Point::new(40, 5));
        assert_eq!(count(&path, PointType::LINETO), 3);
        assert_eq!(count(&path, PointType::BEZIERTO), 12);
        assert_eq!(path.points()[4], Point::new(5, 0));

        path.end().unwrap();
        let rgn = path.to_region(FillMode::Winding).unwrap();
        assert!(rgn.is_normalized());
        assert!(rgn.contains_point(Point::new(20, 15)));
        assert!(rgn.contains_point(Point::new(0, 15)));
        assert!(!rgn.contains_point(Point::new(0, 0)));
    }

    #[test]
    fn test_round_rect_direction_order() {
        let bounds = Rect::new(0, 0, 40, 30);
        let mut ccw = open_path();
        ccw.round_rect(bounds, 10, 10, ArcDirection::CounterClockwise).unwrap();
        let mut cw = open_path();
        cw.round_rect(bounds, 10, 10, ArcDirection::Clockwise).unwrap();

        let reversed: Vec<Point> = ccw.points().iter().rev().copied().collect();
        assert_eq!(cw.points(), reversed.as_slice());
        assert_eq!(cw.points()[0], Point::new(40, 25));
        assert_eq!(cw.flags()[0], PointType::MOVETO);
        assert_eq!(cw.flags()[4], PointType::LINETO);
        assert!(cw.flags()[15].contains(PointType::CLOSEFIGURE));
    }

    #[test]
    fn test_round_rect_corner_sizes_limited_to_box() {
        let bounds = Rect::new(0, 0, 40, 30);
        for (ew, eh) in [(100, 100), (-10, -10), (-100, 7)] {
            let mut path = open_path();
            path.round_rect(bounds, ew, eh, ArcDirection::CounterClockwise).unwrap();
            for pt in path.points() {
                assert!((0..=40).contains(&pt.x) && (0..=30).contains(&pt.y), "{:?} for {},{}", pt, ew, eh);
            }
            path.end().unwrap();
            let rgn = path.to_region(FillMode::Winding).unwrap();
            let bbox = rgn.bounding_box();
            assert!(bbox.left >= 0 && bbox.top >= 0 && bbox.right <= 40 && bbox.bottom <= 30, "{:?}", bbox);
        }

        // Negative sizes behave like their absolute values
        let mut neg = open_path();
        neg.round_rect(bounds, -10, -10, ArcDirection::CounterClockwise).unwrap();
        let mut pos = open_path();
        pos.round_rect(bounds, 10, 10, ArcDirection::CounterClockwise).unwrap();
        assert_eq!(neg.points(), pos.points());
    }

    #[test]
    fn test_round_rect_zero_corner_is_rectangle() {
        let bounds = Rect::new(0, 0, 40, 30);
        let mut path = open_path();
        path.round_rect(bounds, 0, 12, ArcDirection::Clockwise).unwrap();
        let mut rect = open_path();
        rect.rectangle(bounds, ArcDirection::Clockwise).unwrap();
        assert_eq!(path.points(), rect.points());
        assert_eq!(path.flags(), rect.flags());
    }

    #[test]
    fn test_angle_arc() {
        let mut path = open_path();
        path.angle_arc(Point::new(0, 0), Point::new(50, 50), 10, 0.0, 90.0).unwrap();
        assert_eq!(path.flags()[0], PointType::MOVETO);
        assert_eq!(path.points()[0], Point::new(0, 0));
        assert_eq!(path.flags()[1], PointType::LINETO);
        assert_eq!(path.points()[1], Point::new(60, 50));
        // Positive sweep goes up the screen
        assert_eq!(path.points().last(), Some(&Point::new(50, 40)));
        assert_eq!(path.len(), 5);

        let mut down = open_path();
        down.angle_arc(Point::new(60, 50), Point::new(50, 50), 10, 0.0, -90.0).unwrap();
        assert_eq!(down.points()[0], Point::new(60, 50));
        assert_eq!(down.points().last(), Some(&Point::new(50, 60)));
    }

    #[test]
    fn test_angle_arc_out_of_range() {
        let mut path = open_path();
        assert_eq!(
            path.angle_arc(Point::new(0, 0), Point::new(i32::MAX - 5, 0), 10, 0.0, 45.0),
            Err(GdiError::InvalidParameter)
        );
        assert!(path.is_empty());
    }
}
