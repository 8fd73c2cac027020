//! GDI Regions and Paths
//!
//! Region and path geometry following the Windows NT GDI model: regions are
//! stored as y-x banded rectangle lists and combined with a band sweep,
//! paths record figures between BeginPath/EndPath and are scan converted
//! into regions.
//!
//! # Components
//!
//! - **types**: Points, rectangles and the shared GDI enums
//! - **status**: Error type and fallible allocation helpers
//! - **region**: Region object (HRGN) and its queries
//! - **combine**: CombineRgn (AND, OR, XOR, DIFF, COPY) and FrameRgn
//! - **rgndata**: GetRegionData / ExtCreateRegion serialization
//! - **ellipse**: CreateRoundRectRgn, CreateEllipticRgn
//! - **polyfill**: CreatePolygonRgn, CreatePolyPolygonRgn
//! - **path**: Path recording, flattening and PathToRegion
//! - **arc**: Arc, AngleArc, Chord, Pie, Ellipse, Rectangle and RoundRect in paths
//! - **pen**: Pen width, end caps and joins
//! - **widen**: WidenPath
//! - **xform**: World transforms for ExtCreateRegion
//! - **dc**: Device context trait, FillPath, StrokePath, SelectClipPath
//!
//! # Example
//!
//! ```
//! use gdi_region::{CombineMode, Region, RegionType};
//!
//! let a = Region::from_coords(0, 0, 10, 10);
//! let b = Region::from_coords(5, 5, 15, 15);
//! let mut dst = Region::new();
//! assert_eq!(dst.combine(&a, &b, CombineMode::Or).unwrap(), RegionType::Complex);
//! assert_eq!(dst.rect_count(), 3);
//! ```
//!
//! # References
//!
//! Based on Windows Server 2003:
//! - `windows/core/ntgdi/gre/rgnobj.cxx` - Region objects
//! - `windows/core/ntgdi/gre/pathobj.cxx` - Path objects

pub mod types;
pub mod status;
pub mod region;
pub mod combine;
pub mod rgndata;
pub mod ellipse;
pub mod polyfill;
pub mod path;
pub mod arc;
pub mod pen;
pub mod widen;
pub mod xform;
pub mod dc;

pub use types::{ArcDirection, CombineMode, FillMode, Point, Rect, RegionType};
pub use status::{GdiError, Result};
pub use region::Region;
pub use rgndata::{RgnData, RgnDataHeader};
pub use path::{Path, PathState, PointType};
pub use pen::{EndCap, LineJoin, Pen, PenStyle, PenType};
pub use xform::XForm;
pub use dc::{
    fill_path, path_to_region, select_clip_path, stroke_and_fill_path, stroke_path, widen_path,
    DeviceContext, MemoryDc,
};
