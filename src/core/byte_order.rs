//! Byte order of multi-byte values in an image.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How multi-byte values stored in an image should be interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ByteOrder {
    /// Little-endian byte order
    #[default]
    Little,
    /// Big-endian byte order
    Big,
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteOrder::Little => write!(f, "Little"),
            ByteOrder::Big => write!(f, "Big"),
        }
    }
}
