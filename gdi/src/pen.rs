//! Pen Attributes
//!
//! The parts of a pen that decide the outline a stroked path covers: width,
//! end caps and line joins. Colour and dash patterns do not change coverage
//! and are not modelled.
//!
//! # Pen Types
//!
//! - **Cosmetic**: Thin lines (1 pixel wide in device units)
//! - **Geometric**: Lines with width, end caps, join styles
//!
//! # References
//!
//! Based on Windows Server 2003:
//! - `windows/core/ntgdi/gre/penobj.cxx`

// ============================================================================
// Constants
// ============================================================================

/// Miter limit of a fresh device context (SetMiterLimit)
pub const DEFAULT_MITER_LIMIT: f64 = 10.0;

// ============================================================================
// Types
// ============================================================================

/// Pen style
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PenStyle {
    #[default]
    Solid = 0,
    /// Draws nothing
    Null = 5,
}

/// Pen type
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PenType {
    #[default]
    Cosmetic = 0,
    Geometric = 1,
}

/// End cap style
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndCap {
    #[default]
    Round = 0,
    Square = 1,
    Flat = 2,
}

/// Line join style
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Round = 0,
    Bevel = 1,
    Miter = 2,
}

// ============================================================================
// Pen Structure
// ============================================================================

/// Pen object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pen {
    pub style: PenStyle,

    pub pen_type: PenType,

    /// Pen width in device units
    pub width: u32,

    /// End cap style (geometric pens)
    pub end_cap: EndCap,

    /// Line join style (geometric pens)
    pub join: LineJoin,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            style: PenStyle::Solid,
            pen_type: PenType::Cosmetic,
            width: 1,
            end_cap: EndCap::Round,
            join: LineJoin::Round,
        }
    }
}

impl Pen {
    /// Solid geometric pen (ExtCreatePen with PS_GEOMETRIC)
    pub fn geometric(width: u32, end_cap: EndCap, join: LineJoin) -> Self {
        Self {
            pen_type: PenType::Geometric,
            width,
            end_cap,
            join,
            ..Self::default()
        }
    }

    pub fn is_geometric(&self) -> bool {
        self.pen_type == PenType::Geometric
    }

    /// Split the width into the parts on either side of the centre line
    ///
    /// An odd width puts the extra pixel on the outer side.
    pub(crate) fn half_widths(&self) -> (f64, f64) {
        let inner = self.width / 2;
        let outer = self.width - inner;
        (inner as f64, outer as f64)
    }
}
