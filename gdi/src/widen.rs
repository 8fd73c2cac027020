//! Path Widening
//!
//! WidenPath replaces every stroke of a closed path by the outline a
//! geometric pen covers when it draws that stroke. The outline is a plain
//! polygon path, so it can be read back, filled or turned into a region
//! like any other path. StrokePath fills it with the winding rule.
//!
//! Each stroke is walked once. Points on the pen's outer side of a vertex
//! go to an "up" list and points on the inner side to a "down" list; the
//! outline is the up list followed by the down list reversed. Open strokes
//! get end caps, and every vertex in between gets a join.

use core::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use core::ops::Range;

use log::{trace, warn};

use crate::arc::Corners;
use crate::path::{Path, PointType};
use crate::pen::{EndCap, LineJoin, Pen};
use crate::status::{self, GdiError, Result};
use crate::types::Point;

/// Point at `dist` from `origin` in direction `angle`, rounded half away
/// from zero
fn polar(origin: Point, dist: f64, angle: f64) -> Point {
    Point::new(
        origin.x.saturating_add((dist * angle.cos()).round() as i32),
        origin.y.saturating_add((dist * angle.sin()).round() as i32),
    )
}

fn angle_to(from: Point, to: Point) -> f64 {
    (to.y as f64 - from.y as f64).atan2(to.x as f64 - from.x as f64)
}

/// Half-widths of the pen on the inner and outer side of the centre line
#[derive(Debug, Clone, Copy)]
struct Widths {
    inner: f64,
    outer: f64,
}

impl Path {
    /// Replace the closed path by the outline `pen` would cover (WidenPath)
    ///
    /// Curves are flattened first. Cosmetic pens cannot be widened. A miter
    /// join longer than `miter_limit` times the half-width becomes a bevel.
    pub fn widen(&mut self, pen: &Pen, miter_limit: f64) -> Result<()> {
        self.require_closed("widen")?;
        let outline = self.widened(pen, miter_limit)?;
        self.replace_points(outline);
        Ok(())
    }

    /// Outline of the path as drawn by `pen`, in the path's state
    pub(crate) fn widened(&self, pen: &Pen, miter_limit: f64) -> Result<Path> {
        if !pen.is_geometric() {
            warn!("[GDI/Path] widen: cosmetic pen");
            return Err(GdiError::InvalidParameter);
        }

        let flat = self.flattened()?;
        let strokes = split_strokes(&flat)?;
        let (inner, outer) = pen.half_widths();
        let widths = Widths { inner, outer };

        let mut out = self.sibling();
        for range in strokes {
            let pts = &flat.points()[range.clone()];
            if pts.len() < 2 {
                continue;
            }
            let closed = flat.flags()[range.end - 1].contains(PointType::CLOSEFIGURE);

            let mut up = Path::new();
            let mut down = Path::new();
            for j in 0..pts.len() {
                if !closed && (j == 0 || j == pts.len() - 1) {
                    add_end_cap(&mut up, pts, j, pen.end_cap, widths)?;
                } else {
                    add_join(&mut up, &mut down, pts, j, pen.join, miter_limit, widths)?;
                }
            }

            // Control points from round caps are kept as polygon vertices
            let mut start = true;
            for &pt in up.points() {
                out.add_entry(pt, if start { PointType::MOVETO } else { PointType::LINETO })?;
                start = false;
            }
            start |= closed;
            for &pt in down.points().iter().rev() {
                out.add_entry(pt, if start { PointType::MOVETO } else { PointType::LINETO })?;
                start = false;
            }
        }

        trace!("[GDI/Path] widen: {} points -> {} outline points", self.len(), out.len());
        Ok(out)
    }
}

/// Index ranges of the strokes in a flattened path
///
/// Every stroke must open with a MOVETO, and nothing but a MOVETO may
/// follow a closed figure.
fn split_strokes(flat: &Path) -> Result<Vec<Range<usize>>> {
    let flags = flat.flags();
    let mut strokes: Vec<Range<usize>> = Vec::new();

    for (i, &flag) in flags.iter().enumerate() {
        let expect_move = i == 0 || flags[i - 1].contains(PointType::CLOSEFIGURE);
        if flag == PointType::MOVETO {
            status::push(&mut strokes, i..i + 1)?;
        } else if !expect_move && flag.kind() == PointType::LINETO {
            if let Some(stroke) = strokes.last_mut() {
                stroke.end = i + 1;
            }
        } else {
            warn!("[GDI/Path] widen: unexpected {:?} at point {}", flag, i);
            return Err(GdiError::InvalidParameter);
        }
    }
    Ok(strokes)
}

/// Cap the open end at `pts[j]`, which is the first or the last point
fn add_end_cap(up: &mut Path, pts: &[Point], j: usize, cap: EndCap, w: Widths) -> Result<()> {
    let o = pts[j];
    let neighbour = if j == 0 { pts[1] } else { pts[j - 1] };
    // Direction back into the stroke
    let theta = angle_to(o, neighbour);

    match cap {
        EndCap::Square => {
            up.add_entry(polar(o, 2f64.sqrt() * w.outer, theta + 3.0 * FRAC_PI_4), PointType::LINETO)?;
            up.add_entry(polar(o, 2f64.sqrt() * w.inner, theta - 3.0 * FRAC_PI_4), PointType::LINETO)?;
        }
        EndCap::Flat => {
            up.add_entry(polar(o, w.outer, theta + FRAC_PI_2), PointType::LINETO)?;
            up.add_entry(polar(o, -w.inner, theta + FRAC_PI_2), PointType::LINETO)?;
        }
        EndCap::Round => {
            let corners = Corners::new(
                o.x as f64 - w.inner,
                o.y as f64 - w.inner,
                o.x as f64 + w.outer,
                o.y as f64 + w.outer,
            );
            // The last point's cap continues from the join before it
            let first = (j == 0).then_some(PointType::MOVETO);
            up.arc_part(&corners, theta + FRAC_PI_2, theta + 3.0 * FRAC_PI_4, first)?;
            up.arc_part(&corners, theta + 3.0 * FRAC_PI_4, theta + PI, None)?;
            up.arc_part(&corners, theta + PI, theta + 5.0 * FRAC_PI_4, None)?;
            up.arc_part(&corners, theta + 5.0 * FRAC_PI_4, theta + 3.0 * FRAC_PI_2, None)?;
        }
    }
    Ok(())
}

/// Join the two segments meeting at `pts[j]`
///
/// Closed strokes wrap around, so the first and last points get joins too.
fn add_join(
    up: &mut Path,
    down: &mut Path,
    pts: &[Point],
    j: usize,
    join: LineJoin,
    miter_limit: f64,
    w: Widths,
) -> Result<()> {
    let n = pts.len();
    let o = pts[j];
    let prev = pts[if j == 0 { n - 1 } else { j - 1 }];
    let next = pts[if j == n - 1 { 0 } else { j + 1 }];

    let theta = angle_to(prev, o);
    let mut alpha = angle_to(o, next) - theta;
    if alpha > 0.0 {
        alpha -= PI;
    } else {
        alpha += PI;
    }

    let join = if join == LineJoin::Miter && miter_limit < (1.0 / (alpha / 2.0).sin()).abs() {
        LineJoin::Bevel
    } else {
        join
    };

    // Turning back on itself: no join
    if alpha == 0.0 {
        return Ok(());
    }
    let side = alpha.signum();
    let (inside, outside) = if alpha > 0.0 { (up, down) } else { (down, up) };

    inside.add_entry(polar(o, -side * w.inner, theta + FRAC_PI_2), PointType::LINETO)?;
    inside.add_entry(polar(o, side * w.inner, FRAC_PI_2 + alpha + theta), PointType::LINETO)?;

    match join {
        LineJoin::Miter => {
            let miter = (w.outer / (FRAC_PI_2 - alpha.abs() / 2.0).cos()).abs();
            outside.add_entry(polar(o, miter, theta + alpha / 2.0), PointType::LINETO)?;
        }
        LineJoin::Bevel => {
            outside.add_entry(polar(o, side * w.outer, theta + FRAC_PI_2), PointType::LINETO)?;
            outside.add_entry(polar(o, -side * w.outer, FRAC_PI_2 + alpha + theta), PointType::LINETO)?;
        }
        LineJoin::Round => {
            outside.add_entry(polar(o, side * w.outer, theta + FRAC_PI_2), PointType::LINETO)?;
            outside.add_entry(polar(o, w.outer, theta + alpha / 2.0), PointType::LINETO)?;
            outside.add_entry(polar(o, -side * w.outer, FRAC_PI_2 + alpha + theta), PointType::LINETO)?;
        }
    }
    Ok(())
}
