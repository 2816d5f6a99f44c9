//! Error types for image byte map operations.
//!
//! This module provides structured error types using thiserror. Range
//! violations carry both the requested span and the configured range so
//! callers can inspect exactly which bound was violated.

use thiserror::Error;

use crate::core::address::Addr;

/// Main error type for image operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    /// An address range with `min > max` was supplied. The stored range
    /// has been reset to `(0, 0)`.
    #[error("Invalid address range: min {min} is greater than max {max}")]
    InvalidAddressRange { min: Addr, max: Addr },

    /// A read or write span falls outside the configured address range.
    #[error("Address span {address} (len={len}) is out of range [{min}, {max}]")]
    OutOfRange {
        address: Addr,
        len: u64,
        min: Addr,
        max: Addr,
    },

    /// Offset arithmetic on an address would wrap.
    #[error("Address overflow: {address} + {offset:#x}")]
    AddressOverflow { address: Addr, offset: u64 },

    /// Malformed serialized record
    #[error("Format error: {0}")]
    Format(String),

    /// Encoding a record failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ImageError {
    /// True for errors caused by caller misuse rather than bad input data.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            ImageError::InvalidAddressRange { .. }
                | ImageError::OutOfRange { .. }
                | ImageError::AddressOverflow { .. }
        )
    }
}

/// Result type alias for image operations
pub type Result<T> = std::result::Result<T, ImageError>;
