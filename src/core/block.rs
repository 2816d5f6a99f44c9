//! Block type for located code regions.
//!
//! A block is a located object whose bytes decode as instructions. The
//! decode mode selects an ISA sub-mode (e.g. ARM vs Thumb); zero is the
//! architecture default.

use std::fmt;

use crate::core::address::Addr;
use crate::core::id::{IdAllocator, NodeId};
use crate::core::record::{BlockRecord, WireRecord};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Block {
    id: NodeId,
    address: Addr,
    size: u64,
    decode_mode: u64,
}

impl Block {
    pub fn new(ids: &dyn IdAllocator, address: Addr, size: u64, decode_mode: u64) -> Self {
        Self {
            id: ids.allocate(),
            address,
            size,
            decode_mode,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn address(&self) -> Addr {
        self.address
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn decode_mode(&self) -> u64 {
        self.decode_mode
    }

    pub fn to_record(&self) -> BlockRecord {
        BlockRecord {
            uuid: self.id.to_vec(),
            address: self.address.value(),
            size: self.size,
            decode_mode: self.decode_mode,
        }
    }

    pub fn from_record(record: &BlockRecord) -> Result<Self> {
        Ok(Self {
            id: NodeId::from_slice(&record.uuid)?,
            address: Addr::new(record.address),
            size: record.size,
            decode_mode: record.decode_mode,
        })
    }

    pub fn to_bincode(&self) -> Result<Vec<u8>> {
        self.to_record().to_bincode()
    }

    pub fn from_bincode(data: &[u8]) -> Result<Self> {
        Self::from_record(&BlockRecord::from_bincode(data)?)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block({}, size={}, mode={})",
            self.address, self.size, self.decode_mode
        )
    }
}
