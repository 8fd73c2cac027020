//! GDI Status Codes
//!
//! Every fallible region or path operation reports one of these to its
//! immediate caller. Nothing is retried internally and nothing is fatal: a
//! failed call leaves the object it was given in a valid state.

use core::fmt;

/// Failure reported by a region or path operation
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GdiError {
    /// Growing rectangle or point storage failed
    NoMemory = 0xC0000017,
    /// Path call made in a state that does not allow it
    WrongState = 0xC0000184,
    /// Malformed argument (mismatched counts, short buffers on input, ...)
    InvalidParameter = 0xC000000D,
    /// Output buffer cannot hold the requested data
    BufferTooSmall = 0xC0000023,
    /// Region data carries a type tag other than RDH_RECTANGLES
    UnsupportedFormat = 0xC00000BB,
}

impl GdiError {
    /// Raw NTSTATUS-style code
    pub fn code(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for GdiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GdiError::NoMemory => "out of memory",
            GdiError::WrongState => "object is in the wrong state for this call",
            GdiError::InvalidParameter => "invalid parameter",
            GdiError::BufferTooSmall => "buffer too small",
            GdiError::UnsupportedFormat => "unsupported region data format",
        };
        write!(f, "{} ({:#010x})", text, self.code())
    }
}

impl std::error::Error for GdiError {}

/// Result type used throughout the crate
pub type Result<T> = core::result::Result<T, GdiError>;

/// Reserve room for `additional` more elements, reporting allocation failure
pub(crate) fn reserve<T>(vec: &mut Vec<T>, additional: usize) -> Result<()> {
    vec.try_reserve(additional).map_err(|_| GdiError::NoMemory)
}

/// Push with fallible growth
pub(crate) fn push<T>(vec: &mut Vec<T>, value: T) -> Result<()> {
    reserve(vec, 1)?;
    vec.push(value);
    Ok(())
}
