//! LocatedObject: a sized byte range of interest inside an image.
//!
//! A located object is a value: an address and a size, plus the identifier
//! it was given at creation. It does not check alignment or overlap with
//! anything else; callers validate placement.

use std::fmt;

use crate::core::address::Addr;
use crate::core::id::{IdAllocator, NodeId};
use crate::core::record::{LocatedObjectRecord, WireRecord};
use crate::error::Result;

/// An `(address, size)` pair identifying data within an image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocatedObject {
    id: NodeId,
    address: Addr,
    size: u64,
}

impl LocatedObject {
    /// Create a located object with a freshly allocated id.
    pub fn new(ids: &dyn IdAllocator, address: Addr, size: u64) -> Self {
        Self::with_id(ids.allocate(), address, size)
    }

    pub fn with_id(id: NodeId, address: Addr, size: u64) -> Self {
        Self { id, address, size }
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

    /// One past the last byte, or `None` if that is not representable.
    pub fn end(&self) -> Option<Addr> {
        self.address.checked_add(self.size)
    }

    /// Whether `addr` falls inside `[address, address + size)`.
    pub fn contains(&self, addr: Addr) -> bool {
        addr >= self.address && addr.value() - self.address.value() < self.size
    }

    pub fn to_record(&self) -> LocatedObjectRecord {
        LocatedObjectRecord {
            uuid: self.id.to_vec(),
            address: self.address.value(),
            size: self.size,
        }
    }

    pub fn from_record(record: &LocatedObjectRecord) -> Result<Self> {
        Ok(Self {
            id: NodeId::from_slice(&record.uuid)?,
            address: Addr::new(record.address),
            size: record.size,
        })
    }

    pub fn to_bincode(&self) -> Result<Vec<u8>> {
        self.to_record().to_bincode()
    }

    pub fn from_bincode(data: &[u8]) -> Result<Self> {
        Self::from_record(&LocatedObjectRecord::from_bincode(data)?)
    }

    pub fn to_json(&self) -> Result<String> {
        self.to_record().to_json()
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Self::from_record(&LocatedObjectRecord::from_json(s)?)
    }
}

impl fmt::Display for LocatedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocatedObject({}, size={})", self.address, self.size)
    }
}
