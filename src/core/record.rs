//! Wire records for persisting image entities.
//!
//! Each entity converts to and from a plain record struct. Records encode
//! to bincode (compact, for storage) or JSON (for interchange and
//! debugging). Field presence is the compatibility contract; identifiers
//! travel as raw 16-byte strings.

use bincode::{Decode, Encode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ImageError, Result};

/// Upper bound on the size of a bincode record. Length prefixes that claim
/// more than this are rejected before anything is allocated.
pub const MAX_RECORD_BYTES: usize = 1 << 30;

/// Encoding helpers shared by every record type.
pub trait WireRecord: Serialize + DeserializeOwned + Encode + Decode<()> + Sized {
    /// Serialize to bincode.
    fn to_bincode(&self) -> Result<Vec<u8>> {
        let cfg = bincode::config::standard();
        bincode::encode_to_vec(self, cfg).map_err(|e| ImageError::Serialization(e.to_string()))
    }

    /// Deserialize from bincode. Trailing bytes are rejected.
    fn from_bincode(data: &[u8]) -> Result<Self> {
        let cfg = bincode::config::standard().with_limit::<MAX_RECORD_BYTES>();
        let (v, read): (Self, usize) = bincode::decode_from_slice(data, cfg).map_err(|e| {
            crate::log_error!(ImageError::Format(e.to_string()), "decoding bincode record")
        })?;
        if read != data.len() {
            return Err(crate::log_error!(ImageError::Format(format!(
                "{} trailing bytes after record",
                data.len() - read
            ))));
        }
        Ok(v)
    }

    /// Serialize to a JSON string.
    fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ImageError::Serialization(e.to_string()))
    }

    /// Deserialize from a JSON string.
    fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| {
            crate::log_error!(ImageError::Format(e.to_string()), "decoding JSON record")
        })
    }
}

/// One contiguous run of stored bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct RegionRecord {
    pub address: u64,
    pub data: Vec<u8>,
}

/// Serialized form of a byte store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct ByteMapRecord {
    pub regions: Vec<RegionRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct LocatedObjectRecord {
    pub uuid: Vec<u8>,
    pub address: u64,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct BlockRecord {
    pub uuid: Vec<u8>,
    pub address: u64,
    pub size: u64,
    pub decode_mode: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct OffsetRecord {
    pub element_id: Vec<u8>,
    pub displacement: u64,
}

/// Serialized form of an image byte map. Byte order is not part of the
/// record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct ImageByteMapRecord {
    pub uuid: Vec<u8>,
    pub byte_map: ByteMapRecord,
    pub file_name: String,
    pub addr_min: u64,
    pub addr_max: u64,
    pub base_address: u64,
    pub entry_point_address: u64,
    pub rebase_delta: i64,
    pub is_relocated: bool,
}

impl WireRecord for RegionRecord {}
impl WireRecord for ByteMapRecord {}
impl WireRecord for LocatedObjectRecord {}
impl WireRecord for BlockRecord {}
impl WireRecord for OffsetRecord {}
impl WireRecord for ImageByteMapRecord {}
