//! Region Combination
//!
//! All boolean operations on regions run through a single sweep,
//! [`region_op`], which walks the bands of two regions top to bottom. The
//! plane is cut into horizontal strips covered by only the first region,
//! only the second, or both, and a [`BandOp`] decides which rectangles each
//! strip contributes:
//!
//! | Operation  | first only | second only | both                         |
//! |------------|------------|-------------|------------------------------|
//! | Union      | copy       | copy        | merge spans, leftmost first  |
//! | Intersect  | -          | -           | x-overlap of the two spans   |
//! | Subtract   | copy       | -           | first minus second           |
//!
//! Xor is the union of the two differences.
//!
//! After every emitted band the output is coalesced with the band above it,
//! so the result is already minimal when the sweep ends. The output is built
//! in fresh storage and only swapped into the destination at the end, which
//! makes it safe for the destination to be one of the sources and leaves the
//! destination untouched when growing the storage fails.
//!
//! # References
//!
//! Based on Windows Server 2003:
//! - `windows/core/ntgdi/gre/rgnobj.cxx` - RGNOBJ::bMerge, vCoalesce

use log::{debug, trace};

use crate::region::{same_spans, Region};
use crate::status::{self, GdiError, Result};
use crate::types::{CombineMode, Rect, RegionType};

// ============================================================================
// Band Operations
// ============================================================================

/// Per-band policy plugged into the sweep
trait BandOp {
    /// Emit rectangles for a strip covered by both regions
    fn overlap(&self, out: &mut Vec<Rect>, r1: &[Rect], r2: &[Rect], top: i32, bottom: i32) -> Result<()>;

    /// Emit rectangles for a strip covered only by the first region
    fn first_only(&self, _out: &mut Vec<Rect>, _band: &[Rect], _top: i32, _bottom: i32) -> Result<()> {
        Ok(())
    }

    /// Emit rectangles for a strip covered only by the second region
    fn second_only(&self, _out: &mut Vec<Rect>, _band: &[Rect], _top: i32, _bottom: i32) -> Result<()> {
        Ok(())
    }
}

/// Copy a band's x-spans clipped to [top, bottom)
fn copy_band(out: &mut Vec<Rect>, band: &[Rect], top: i32, bottom: i32) -> Result<()> {
    status::reserve(out, band.len())?;
    out.extend(band.iter().map(|r| Rect::new(r.left, top, r.right, bottom)));
    Ok(())
}

struct Intersect;

impl BandOp for Intersect {
    fn overlap(&self, out: &mut Vec<Rect>, r1: &[Rect], r2: &[Rect], top: i32, bottom: i32) -> Result<()> {
        let (mut i, mut j) = (0, 0);

        while i < r1.len() && j < r2.len() {
            let left = r1[i].left.max(r2[j].left);
            let right = r1[i].right.min(r2[j].right);

            if left < right {
                status::push(out, Rect::new(left, top, right, bottom))?;
            }

            // Advance whichever span ends first; the other may still overlap
            // the next span on the opposite side.
            if r1[i].right < r2[j].right {
                i += 1;
            } else if r2[j].right < r1[i].right {
                j += 1;
            } else {
                i += 1;
                j += 1;
            }
        }
        Ok(())
    }
}

struct Union;

impl Union {
    /// Append a span, extending the last one in this band if they touch
    fn merge(out: &mut Vec<Rect>, span: &Rect, top: i32, bottom: i32) -> Result<()> {
        if let Some(last) = out.last_mut() {
            if last.top == top && last.bottom == bottom && last.right >= span.left {
                if last.right < span.right {
                    last.right = span.right;
                }
                return Ok(());
            }
        }
        status::push(out, Rect::new(span.left, top, span.right, bottom))
    }
}

impl BandOp for Union {
    fn overlap(&self, out: &mut Vec<Rect>, r1: &[Rect], r2: &[Rect], top: i32, bottom: i32) -> Result<()> {
        let (mut i, mut j) = (0, 0);

        while i < r1.len() && j < r2.len() {
            if r1[i].left < r2[j].left {
                Self::merge(out, &r1[i], top, bottom)?;
                i += 1;
            } else {
                Self::merge(out, &r2[j], top, bottom)?;
                j += 1;
            }
        }
        for span in &r1[i..] {
            Self::merge(out, span, top, bottom)?;
        }
        for span in &r2[j..] {
            Self::merge(out, span, top, bottom)?;
        }
        Ok(())
    }

    fn first_only(&self, out: &mut Vec<Rect>, band: &[Rect], top: i32, bottom: i32) -> Result<()> {
        copy_band(out, band, top, bottom)
    }

    fn second_only(&self, out: &mut Vec<Rect>, band: &[Rect], top: i32, bottom: i32) -> Result<()> {
        copy_band(out, band, top, bottom)
    }
}

struct Subtract;

impl BandOp for Subtract {
    /// `left` tracks the leftmost point of the current minuend span that is
    /// not yet known to be covered or emitted.
    fn overlap(&self, out: &mut Vec<Rect>, r1: &[Rect], r2: &[Rect], top: i32, bottom: i32) -> Result<()> {
        let (mut i, mut j) = (0, 0);
        let mut left = r1[0].left;

        while i < r1.len() && j < r2.len() {
            let minuend = r1[i];
            let subtrahend = r2[j];

            if subtrahend.right <= left {
                // Subtrahend lies entirely to the left
                j += 1;
            } else if subtrahend.left <= left {
                // Subtrahend covers the left edge of the minuend
                left = subtrahend.right;
                if left >= minuend.right {
                    i += 1;
                    if i < r1.len() {
                        left = r1[i].left;
                    }
                } else {
                    j += 1;
                }
            } else if subtrahend.left < minuend.right {
                // Subtrahend starts inside the minuend
                status::push(out, Rect::new(left, top, subtrahend.left, bottom))?;
                left = subtrahend.right;
                if left >= minuend.right {
                    i += 1;
                    if i < r1.len() {
                        left = r1[i].left;
                    }
                } else {
                    j += 1;
                }
            } else {
                // Subtrahend starts past the minuend: flush what is left
                if minuend.right > left {
                    status::push(out, Rect::new(left, top, minuend.right, bottom))?;
                }
                i += 1;
                if i < r1.len() {
                    left = r1[i].left;
                }
            }
        }

        while i < r1.len() {
            status::push(out, Rect::new(left, top, r1[i].right, bottom))?;
            i += 1;
            if i < r1.len() {
                left = r1[i].left;
            }
        }
        Ok(())
    }

    fn first_only(&self, out: &mut Vec<Rect>, band: &[Rect], top: i32, bottom: i32) -> Result<()> {
        copy_band(out, band, top, bottom)
    }
}

// ============================================================================
// Sweep
// ============================================================================

/// Index one past the last rectangle of the band starting at `start`
fn band_end(rects: &[Rect], start: usize) -> usize {
    let top = rects[start].top;
    let mut end = start;
    while end < rects.len() && rects[end].top == top {
        end += 1;
    }
    end
}

/// Merge the band starting at `cur_start` into the band at `prev_start`
///
/// Bands merge when they abut vertically and carry identical x-spans: the
/// previous band's bottoms are extended and the current band is dropped.
/// Returns the start of the band the next call should treat as previous.
pub(crate) fn coalesce(rects: &mut Vec<Rect>, prev_start: usize, cur_start: usize) -> usize {
    let reg_end = rects.len();
    if cur_start >= reg_end || prev_start >= cur_start {
        return cur_start;
    }

    let cur_end = band_end(rects, cur_start);
    let cur_num = cur_end - cur_start;
    let prev_num = cur_start - prev_start;

    // Several bands may have been added at once when one source ran out;
    // the next call has to start from the last of them.
    let mut next_start = cur_start;
    if cur_end != reg_end {
        let mut last = reg_end - 1;
        while rects[last - 1].top == rects[last].top {
            last -= 1;
        }
        next_start = last;
    }

    if cur_num != prev_num || rects[prev_start].bottom != rects[cur_start].top {
        return next_start;
    }
    if !same_spans(&rects[prev_start..cur_start], &rects[cur_start..cur_end]) {
        return next_start;
    }

    let bottom = rects[cur_start].bottom;
    for rect in &mut rects[prev_start..cur_start] {
        rect.bottom = bottom;
    }

    if cur_end == reg_end {
        rects.truncate(cur_start);
        prev_start
    } else {
        rects.drain(cur_start..cur_end);
        next_start - cur_num
    }
}

/// Run the band sweep over two non-empty regions
fn region_op(reg1: &Region, reg2: &Region, op: &impl BandOp) -> Result<Vec<Rect>> {
    let r1s = reg1.rects();
    let r2s = reg2.rects();
    debug_assert!(!r1s.is_empty() && !r2s.is_empty());

    let mut out = Vec::new();
    status::reserve(&mut out, r1s.len().max(r2s.len()) * 2)?;

    let (mut r1, mut r2) = (0, 0);

    // For a strip covered by one region, ybot is the bottom of the last
    // overlap (clips the top) and ytop the top of the next overlap (clips
    // the bottom). For an overlap strip they are its top and bottom.
    let mut ybot = reg1.extents.top.min(reg2.extents.top);
    let mut prev_band = 0;

    loop {
        let mut cur_band = out.len();
        let r1_band_end = band_end(r1s, r1);
        let r2_band_end = band_end(r2s, r2);

        let ytop;
        if r1s[r1].top < r2s[r2].top {
            let top = r1s[r1].top.max(ybot);
            let bottom = r1s[r1].bottom.min(r2s[r2].top);
            if top != bottom {
                op.first_only(&mut out, &r1s[r1..r1_band_end], top, bottom)?;
            }
            ytop = r2s[r2].top;
        } else if r2s[r2].top < r1s[r1].top {
            let top = r2s[r2].top.max(ybot);
            let bottom = r2s[r2].bottom.min(r1s[r1].top);
            if top != bottom {
                op.second_only(&mut out, &r2s[r2..r2_band_end], top, bottom)?;
            }
            ytop = r1s[r1].top;
        } else {
            ytop = r1s[r1].top;
        }

        if out.len() != cur_band {
            prev_band = coalesce(&mut out, prev_band, cur_band);
        }

        ybot = r1s[r1].bottom.min(r2s[r2].bottom);
        cur_band = out.len();
        if ybot > ytop {
            op.overlap(&mut out, &r1s[r1..r1_band_end], &r2s[r2..r2_band_end], ytop, ybot)?;
        }

        if out.len() != cur_band {
            prev_band = coalesce(&mut out, prev_band, cur_band);
        }

        if r1s[r1].bottom == ybot {
            r1 = r1_band_end;
        }
        if r2s[r2].bottom == ybot {
            r2 = r2_band_end;
        }
        if r1 == r1s.len() || r2 == r2s.len() {
            break;
        }
    }

    // Whatever is left of either region is covered by that region only
    let cur_band = out.len();
    while r1 < r1s.len() {
        let end = band_end(r1s, r1);
        op.first_only(&mut out, &r1s[r1..end], r1s[r1].top.max(ybot), r1s[r1].bottom)?;
        r1 = end;
    }
    while r2 < r2s.len() {
        let end = band_end(r2s, r2);
        op.second_only(&mut out, &r2s[r2..end], r2s[r2].top.max(ybot), r2s[r2].bottom)?;
        r2 = end;
    }

    if out.len() != cur_band {
        coalesce(&mut out, prev_band, cur_band);
    }

    Ok(out)
}

// ============================================================================
// Operations
// ============================================================================

/// Deep copy with fallible allocation
fn duplicate(src: &Region) -> Result<Region> {
    let mut copy = Region::new();
    copy.copy_from(src)?;
    Ok(copy)
}

fn intersect_region(reg1: &Region, reg2: &Region) -> Result<Region> {
    if reg1.is_empty() || reg2.is_empty() || !reg1.extents.intersects(&reg2.extents) {
        debug!("[GDI/Region] intersect: trivial reject");
        return Ok(Region::new());
    }
    if core::ptr::eq(reg1, reg2) {
        return duplicate(reg1);
    }
    Ok(Region::from_banded(region_op(reg1, reg2, &Intersect)?))
}

fn union_region(reg1: &Region, reg2: &Region) -> Result<Region> {
    if core::ptr::eq(reg1, reg2) || reg1.is_empty() {
        return duplicate(reg2);
    }
    if reg2.is_empty() {
        return duplicate(reg1);
    }

    // One single-rectangle region completely subsumes the other
    if reg1.rect_count() == 1 && reg1.extents.contains_rect(&reg2.extents) {
        debug!("[GDI/Region] union: first operand subsumes second");
        return duplicate(reg1);
    }
    if reg2.rect_count() == 1 && reg2.extents.contains_rect(&reg1.extents) {
        debug!("[GDI/Region] union: second operand subsumes first");
        return duplicate(reg2);
    }

    let rects = region_op(reg1, reg2, &Union)?;
    let mut result = Region::new();
    result.replace(rects, reg1.extents.union(&reg2.extents));
    Ok(result)
}

fn subtract_region(minuend: &Region, subtrahend: &Region) -> Result<Region> {
    if core::ptr::eq(minuend, subtrahend) {
        return Ok(Region::new());
    }
    if minuend.is_empty() || subtrahend.is_empty() ||
        !minuend.extents.intersects(&subtrahend.extents)
    {
        return duplicate(minuend);
    }
    Ok(Region::from_banded(region_op(minuend, subtrahend, &Subtract)?))
}

fn xor_region(reg1: &Region, reg2: &Region) -> Result<Region> {
    let first = subtract_region(reg1, reg2)?;
    let second = subtract_region(reg2, reg1)?;
    union_region(&first, &second)
}

impl Region {
    /// Union of two regions
    pub fn union(&self, other: &Region) -> Result<Region> {
        union_region(self, other)
    }

    /// Intersection of two regions
    pub fn intersection(&self, other: &Region) -> Result<Region> {
        intersect_region(self, other)
    }

    /// Part of this region not covered by `other`
    pub fn subtract(&self, other: &Region) -> Result<Region> {
        subtract_region(self, other)
    }

    /// Part covered by exactly one of the two regions
    pub fn xor(&self, other: &Region) -> Result<Region> {
        xor_region(self, other)
    }

    /// Store `src1 <mode> src2` in this region (CombineRgn)
    ///
    /// `src2` is ignored for [`CombineMode::Copy`]. On failure this region
    /// is left as it was.
    pub fn combine(&mut self, src1: &Region, src2: &Region, mode: CombineMode) -> Result<RegionType> {
        src1.dump("combine src1");
        let result = match mode {
            CombineMode::Copy => duplicate(src1)?,
            CombineMode::And => intersect_region(src1, src2)?,
            CombineMode::Or => union_region(src1, src2)?,
            CombineMode::Xor => xor_region(src1, src2)?,
            CombineMode::Diff => subtract_region(src1, src2)?,
        };
        if mode != CombineMode::Copy {
            src2.dump("combine src2");
        }
        *self = result;
        trace!("[GDI/Region] combine {:?} -> {:?}", mode, self.region_type());
        self.dump("combine dest");
        Ok(self.region_type())
    }

    /// Replace this region with `self <mode> other`
    pub fn combine_with(&mut self, other: &Region, mode: CombineMode) -> Result<RegionType> {
        let result = match mode {
            CombineMode::Copy => duplicate(other)?,
            CombineMode::And => intersect_region(self, other)?,
            CombineMode::Or => union_region(self, other)?,
            CombineMode::Xor => xor_region(self, other)?,
            CombineMode::Diff => subtract_region(self, other)?,
        };
        *self = result;
        Ok(self.region_type())
    }

    /// Add one rectangle to the region
    ///
    /// Degenerate rectangles leave the region unchanged.
    pub fn union_rect(&mut self, rect: &Rect) -> Result<()> {
        let single = Region::from_rect(*rect);
        if single.is_empty() {
            return Ok(());
        }
        *self = union_region(self, &single)?;
        Ok(())
    }

    /// Outline of this region, `x` pixels wide horizontally and `y` pixels
    /// vertically (FrameRgn)
    ///
    /// The interior is the intersection of the region shifted by the frame
    /// size in all four directions; the frame is what remains after
    /// removing it.
    pub fn frame(&self, x: i32, y: i32) -> Result<Region> {
        if self.is_empty() {
            return Err(GdiError::InvalidParameter);
        }

        let shifted = |dx: i32, dy: i32| -> Result<Region> {
            let mut rgn = duplicate(self)?;
            rgn.offset(dx, dy)?;
            Ok(rgn)
        };
        let neg_x = x.checked_neg().ok_or(GdiError::InvalidParameter)?;
        let neg_y = y.checked_neg().ok_or(GdiError::InvalidParameter)?;

        let mut interior = shifted(neg_x, 0)?;
        interior = interior.intersection(&shifted(x, 0)?)?;
        interior = interior.intersection(&shifted(0, neg_y)?)?;
        interior = interior.intersection(&shifted(0, y)?)?;
        self.subtract(&interior)
    }
}
