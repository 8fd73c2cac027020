//! Region Data Export
//!
//! RGNDATA layout as seen by GetRegionData / ExtCreateRegion:
//!
//! ```text
//! offset  size  field
//!      0     4  dwSize     header size (32)
//!      4     4  iType      RDH_RECTANGLES
//!      8     4  nCount     number of rectangles
//!     12     4  nRgnSize   bytes of rectangle data (nCount * 16)
//!     16    16  rcBound    bounding rectangle
//!     32  16*n  Buffer     rectangles, left/top/right/bottom
//! ```
//!
//! All fields are little-endian 32-bit values.

use log::{trace, warn};

use crate::region::Region;
use crate::status::{self, GdiError, Result};
use crate::types::Rect;

// ============================================================================
// Constants
// ============================================================================

/// Region data holds a plain rectangle list
pub const RDH_RECTANGLES: u32 = 1;

/// Serialized size of [`RgnDataHeader`]
pub const RGNDATAHEADER_SIZE: usize = 32;

/// Serialized size of one rectangle
pub const RECT_SIZE: usize = 16;

// ============================================================================
// Structures
// ============================================================================

/// RGNDATAHEADER
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgnDataHeader {
    pub dw_size: u32,
    pub i_type: u32,
    pub n_count: u32,
    pub n_rgn_size: u32,
    pub rc_bound: Rect,
}

/// RGNDATA: header plus rectangle buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgnData {
    pub header: RgnDataHeader,
    pub rects: Vec<Rect>,
}

fn put_u32(out: &mut [u8], offset: usize, value: u32) {
    out[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn put_rect(out: &mut [u8], offset: usize, rect: &Rect) {
    put_u32(out, offset, rect.left as u32);
    put_u32(out, offset + 4, rect.top as u32);
    put_u32(out, offset + 8, rect.right as u32);
    put_u32(out, offset + 12, rect.bottom as u32);
}

fn get_u32(data: &[u8], offset: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&data[offset..offset + 4]);
    u32::from_le_bytes(raw)
}

fn get_rect(data: &[u8], offset: usize) -> Rect {
    Rect::new(
        get_u32(data, offset) as i32,
        get_u32(data, offset + 4) as i32,
        get_u32(data, offset + 8) as i32,
        get_u32(data, offset + 12) as i32,
    )
}

impl RgnData {
    /// Bytes needed to serialize this data
    pub fn byte_len(&self) -> usize {
        RGNDATAHEADER_SIZE + self.rects.len() * RECT_SIZE
    }

    /// Serialize into `out`, returning the number of bytes written
    pub fn write_to(&self, out: &mut [u8]) -> Result<usize> {
        let needed = self.byte_len();
        if out.len() < needed {
            return Err(GdiError::BufferTooSmall);
        }

        let h = &self.header;
        put_u32(out, 0, h.dw_size);
        put_u32(out, 4, h.i_type);
        put_u32(out, 8, h.n_count);
        put_u32(out, 12, h.n_rgn_size);
        put_rect(out, 16, &h.rc_bound);

        for (i, rect) in self.rects.iter().enumerate() {
            put_rect(out, RGNDATAHEADER_SIZE + i * RECT_SIZE, rect);
        }
        Ok(needed)
    }

    /// Serialize into a new buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        status::reserve(&mut out, self.byte_len())?;
        out.resize(self.byte_len(), 0);
        self.write_to(&mut out)?;
        Ok(out)
    }

    /// Parse serialized region data
    ///
    /// Only the header and the `nCount` rectangles it announces are read;
    /// trailing bytes are ignored.
    pub fn from_bytes(data: &[u8]) -> Result<RgnData> {
        if data.len() < RGNDATAHEADER_SIZE {
            return Err(GdiError::InvalidParameter);
        }

        let header = RgnDataHeader {
            dw_size: get_u32(data, 0),
            i_type: get_u32(data, 4),
            n_count: get_u32(data, 8),
            n_rgn_size: get_u32(data, 12),
            rc_bound: get_rect(data, 16),
        };

        let count = header.n_count as usize;
        let available = (data.len() - RGNDATAHEADER_SIZE) / RECT_SIZE;
        if count > available {
            return Err(GdiError::InvalidParameter);
        }

        let mut rects = Vec::new();
        status::reserve(&mut rects, count)?;
        for i in 0..count {
            rects.push(get_rect(data, RGNDATAHEADER_SIZE + i * RECT_SIZE));
        }

        Ok(RgnData { header, rects })
    }
}

// ============================================================================
// Region Export / Rebuild
// ============================================================================

impl Region {
    /// Bytes GetRegionData needs for this region
    pub fn region_data_size(&self) -> usize {
        RGNDATAHEADER_SIZE + self.rect_count() * RECT_SIZE
    }

    /// Export the region as RGNDATA
    pub fn region_data(&self) -> Result<RgnData> {
        let mut rects = Vec::new();
        status::reserve(&mut rects, self.rect_count())?;
        rects.extend_from_slice(self.rects());

        Ok(RgnData {
            header: RgnDataHeader {
                dw_size: RGNDATAHEADER_SIZE as u32,
                i_type: RDH_RECTANGLES,
                n_count: self.rect_count() as u32,
                n_rgn_size: (self.rect_count() * RECT_SIZE) as u32,
                rc_bound: self.bounding_box(),
            },
            rects,
        })
    }

    /// Serialize the region into `buffer` (GetRegionData)
    ///
    /// With no buffer the required size is returned. A buffer too small for
    /// the full data fails with [`GdiError::BufferTooSmall`] and is left
    /// untouched. Otherwise the number of bytes written is returned.
    pub fn get_region_data(&self, buffer: Option<&mut [u8]>) -> Result<usize> {
        let size = self.region_data_size();
        trace!("[GDI/Region] get_region_data: {} rects, {} bytes", self.rect_count(), size);

        match buffer {
            None => Ok(size),
            Some(out) if out.len() < size => Err(GdiError::BufferTooSmall),
            Some(out) => self.region_data()?.write_to(out),
        }
    }

    /// Build a region from exported data (ExtCreateRegion)
    ///
    /// Every non-degenerate rectangle is unioned in, so the result is
    /// normalized even when the input is unordered or overlapping.
    pub fn from_region_data(data: &RgnData) -> Result<Region> {
        if data.header.i_type != RDH_RECTANGLES {
            warn!("[GDI/Region] unsupported region data type {}", data.header.i_type);
            return Err(GdiError::UnsupportedFormat);
        }

        let count = (data.header.n_count as usize).min(data.rects.len());
        let mut region = Region::new();
        for rect in &data.rects[..count] {
            if rect.left < rect.right && rect.top < rect.bottom {
                region.union_rect(rect)?;
            }
        }
        Ok(region)
    }

    /// Parse serialized region data and build a region from it
    pub fn from_region_bytes(bytes: &[u8]) -> Result<Region> {
        Region::from_region_data(&RgnData::from_bytes(bytes)?)
    }
}
