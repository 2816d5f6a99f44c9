//! Offset: a position relative to the start of another entity.

use std::fmt;

use crate::core::id::NodeId;
use crate::core::record::OffsetRecord;
use crate::error::Result;

/// `displacement` bytes past the start of the entity named by `element_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Offset {
    pub element_id: NodeId,
    pub displacement: u64,
}

impl Offset {
    pub fn new(element_id: NodeId, displacement: u64) -> Self {
        Self {
            element_id,
            displacement,
        }
    }

    pub fn to_record(&self) -> OffsetRecord {
        OffsetRecord {
            element_id: self.element_id.to_vec(),
            displacement: self.displacement,
        }
    }

    pub fn from_record(record: &OffsetRecord) -> Result<Self> {
        Ok(Self {
            element_id: NodeId::from_slice(&record.element_id)?,
            displacement: record.displacement,
        })
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{:#x}", self.element_id, self.displacement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::id::{IdAllocator, SequentialIdAllocator};
    use crate::core::record::WireRecord;

    #[test]
    fn test_offset_record() {
        let ids = SequentialIdAllocator::new("offset");
        let off = Offset::new(ids.allocate(), 0x24);
        let rec = OffsetRecord::from_json(&off.to_record().to_json().unwrap()).unwrap();
        assert_eq!(Offset::from_record(&rec).unwrap(), off);
    }

    #[test]
    fn test_offsets_order_by_element_then_displacement() {
        let ids = SequentialIdAllocator::new("offset");
        let id = ids.allocate();
        assert!(Offset::new(id, 1) < Offset::new(id, 2));
    }
}
