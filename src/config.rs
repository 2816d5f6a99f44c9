//! Configuration for image byte maps.
//!
//! Settings that change how an [`ImageByteMap`](crate::core::image_byte_map::ImageByteMap)
//! behaves at runtime. None of these are part of the serialized record.

use serde::{Deserialize, Serialize};

use crate::core::byte_order::ByteOrder;
use crate::error::{ImageError, Result};

/// How byte-fill writes are validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillPolicy {
    /// Write each byte individually with no whole-span range check. A fill
    /// that runs past the valid range is applied anyway; only address
    /// overflow stops it, after the bytes before the overflow were written.
    #[default]
    Unchecked,
    /// Validate the whole span like a single-span write before touching
    /// any byte.
    Checked,
}

/// Runtime settings for an image byte map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Validation applied by `set_data_fill`.
    pub fill_policy: FillPolicy,
    /// Byte order assigned to newly created and freshly deserialized maps.
    pub default_byte_order: ByteOrder,
    /// Emit a trace event for every accepted read and write.
    pub trace_accesses: bool,
}

impl ImageConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| ImageError::Format(e.to_string()))
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ImageError::Serialization(e.to_string()))
    }
}
