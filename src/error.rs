//! Error types for Reed-Muller coding operations

use thiserror::Error;

/// Errors that can occur while building, encoding, transmitting or decoding
///
/// Every variant is detected before any output is produced, so a caller never
/// observes a partially transformed stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    /// A code order or channel probability outside its valid range
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Stream length is not a multiple of the block size
    #[error("Stream length {len} is not a multiple of block size {block}")]
    LengthMismatch { len: usize, block: usize },

    /// Matrix shape inconsistent with the declared block dimensions
    #[error("Dimension mismatch in {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// A bit stream element that is neither 0 nor 1
    #[error("Non-binary symbol {value} at position {position}")]
    NonBinarySymbol { position: usize, value: u8 },

    /// Processing stopped between blocks at the caller's request
    #[error("Cancelled after {completed} of {total} blocks")]
    Cancelled { completed: usize, total: usize },
}

impl CodeError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        CodeError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Type alias for Result with CodeError
pub type Result<T> = std::result::Result<T, CodeError>;
