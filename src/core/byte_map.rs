//! Sparse byte storage keyed by address.
//!
//! [`ByteStore`] is the seam between an image and whatever physically holds
//! its bytes. [`SparseByteMap`] is the default engine: a set of disjoint,
//! non-adjacent regions kept in a `BTreeMap`. It performs no range
//! validation of its own; that is the image's job.

use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

use crate::core::address::Addr;
use crate::core::record::{ByteMapRecord, RegionRecord};
use crate::error::{ImageError, Result};

/// Storage engine for image bytes.
pub trait ByteStore: Sized {
    /// Store `data` starting at `addr`, replacing anything already there.
    fn set_data(&mut self, addr: Addr, data: &[u8]);

    /// Read `count` bytes starting at `addr`. Bytes never written read as
    /// zero.
    fn get_data(&self, addr: Addr, count: usize) -> Vec<u8>;

    fn to_record(&self) -> ByteMapRecord;

    fn from_record(record: &ByteMapRecord) -> Result<Self>;
}

/// Region-based sparse byte map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseByteMap {
    // start -> bytes; regions never overlap or touch
    regions: BTreeMap<u64, Vec<u8>>,
}

fn region_end(start: u64, data: &[u8]) -> u128 {
    start as u128 + data.len() as u128
}

impl SparseByteMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of disjoint regions currently stored.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Total number of bytes stored across all regions.
    pub fn len(&self) -> u64 {
        self.regions.values().map(|d| d.len() as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Iterate regions in ascending address order.
    pub fn regions(&self) -> impl Iterator<Item = (Addr, &[u8])> {
        self.regions
            .iter()
            .map(|(start, data)| (Addr::new(*start), data.as_slice()))
    }

    /// Keys of every region that overlaps or touches `[start, end)`.
    fn touching(&self, start: u128, end: u128) -> Vec<u64> {
        let upper = end.min(u64::MAX as u128) as u64;
        let mut keys: Vec<u64> = self
            .regions
            .range(..=upper)
            .rev()
            .take_while(|(s, d)| region_end(**s, d) >= start)
            .map(|(s, _)| *s)
            .collect();
        keys.reverse();
        keys
    }

    /// Write in place when `[start, start + data.len())` overlaps or extends
    /// the region at or before `start` and touches nothing else. Returns
    /// false when a full merge is needed.
    fn write_in_place(&mut self, start: u64, data: &[u8]) -> bool {
        let Some((prev_start, prev_end)) = self
            .regions
            .range(..=start)
            .next_back()
            .map(|(s, d)| (*s, region_end(*s, d)))
        else {
            return false;
        };
        let new_end = start as u128 + data.len() as u128;
        if prev_end < start as u128 {
            return false;
        }
        let next = self.regions.range((Excluded(prev_start), Unbounded)).next();
        if next.is_some_and(|(s, _)| *s as u128 <= new_end) {
            return false;
        }
        let Some(region) = self.regions.get_mut(&prev_start) else {
            return false;
        };
        let off = (start - prev_start) as usize;
        if off + data.len() > region.len() {
            region.resize(off + data.len(), 0);
        }
        region[off..off + data.len()].copy_from_slice(data);
        true
    }
}

impl ByteStore for SparseByteMap {
    fn set_data(&mut self, addr: Addr, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        if self.write_in_place(addr.value(), data) {
            return;
        }
        let new_start = addr.value() as u128;
        let new_end = new_start + data.len() as u128;

        let keys = self.touching(new_start, new_end);
        if keys.is_empty() {
            self.regions.insert(addr.value(), data.to_vec());
            return;
        }

        let merged_start = new_start.min(keys[0] as u128);
        let last_key = keys[keys.len() - 1];
        let merged_end = new_end.max(region_end(last_key, &self.regions[&last_key]));

        let mut merged = vec![0u8; (merged_end - merged_start) as usize];
        for key in &keys {
            if let Some(old) = self.regions.remove(key) {
                let at = (*key as u128 - merged_start) as usize;
                merged[at..at + old.len()].copy_from_slice(&old);
            }
        }
        let at = (new_start - merged_start) as usize;
        merged[at..at + data.len()].copy_from_slice(data);

        tracing::trace!(
            start = merged_start as u64,
            len = merged.len(),
            absorbed = keys.len(),
            "merged byte map regions"
        );
        self.regions.insert(merged_start as u64, merged);
    }

    fn get_data(&self, addr: Addr, count: usize) -> Vec<u8> {
        let mut out = vec![0u8; count];
        if count == 0 {
            return out;
        }
        let want_start = addr.value() as u128;
        let want_end = want_start + count as u128;
        let upper = (want_end - 1).min(u64::MAX as u128) as u64;

        for (start, data) in self.regions.range(..=upper).rev() {
            let end = region_end(*start, data);
            if end <= want_start {
                break;
            }
            let lo = want_start.max(*start as u128);
            let hi = want_end.min(end);
            let src = (lo - *start as u128) as usize;
            let dst = (lo - want_start) as usize;
            let n = (hi - lo) as usize;
            out[dst..dst + n].copy_from_slice(&data[src..src + n]);
        }
        out
    }

    fn to_record(&self) -> ByteMapRecord {
        ByteMapRecord {
            regions: self
                .regions
                .iter()
                .map(|(address, data)| RegionRecord {
                    address: *address,
                    data: data.clone(),
                })
                .collect(),
        }
    }

    fn from_record(record: &ByteMapRecord) -> Result<Self> {
        let mut sorted: Vec<&RegionRecord> =
            record.regions.iter().filter(|r| !r.data.is_empty()).collect();
        sorted.sort_by_key(|r| r.address);

        let mut prev_end: Option<u128> = None;
        for r in &sorted {
            let end = region_end(r.address, &r.data);
            if end > u64::MAX as u128 + 1 {
                return Err(ImageError::Format(format!(
                    "region at {:#x} (len={}) runs past the end of the address space",
                    r.address,
                    r.data.len()
                )));
            }
            if let Some(p) = prev_end {
                if (r.address as u128) < p {
                    return Err(ImageError::Format(format!(
                        "overlapping byte map region at {:#x}",
                        r.address
                    )));
                }
            }
            prev_end = Some(end);
        }

        // Adjacent regions are merged back together by set_data.
        let mut map = SparseByteMap::new();
        for r in sorted {
            map.set_data(Addr::new(r.address), &r.data);
        }
        Ok(map)
    }
}
