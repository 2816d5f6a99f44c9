//! ImageByteMap: range-checked byte storage for a loaded image.
//!
//! The map owns its storage engine and carries the metadata that ties the
//! stored bytes to the binary they came from: file name, base and entry
//! addresses, the valid address range, rebase delta and byte order.
//!
//! Single-span reads and writes are validated against the inclusive range
//! `[min, max]` before the engine is touched, so a rejected call has no
//! effect. The byte-fill write is weaker by default; see
//! [`FillPolicy`](crate::config::FillPolicy).

use tracing::{debug, trace, warn};

use crate::config::{FillPolicy, ImageConfig};
use crate::core::address::Addr;
use crate::core::byte_map::{ByteStore, SparseByteMap};
use crate::core::byte_order::ByteOrder;
use crate::core::id::{IdAllocator, NodeId};
use crate::core::record::{ImageByteMapRecord, WireRecord};
use crate::core::view::MemoryView;
use crate::error::{ImageError, Result};

/// Byte contents and layout metadata of one loaded image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageByteMap<B: ByteStore = SparseByteMap> {
    id: NodeId,
    byte_map: B,
    file_name: String,
    base_address: Addr,
    entry_point_address: Addr,
    addr_min_max: (Addr, Addr),
    rebase_delta: i64,
    is_relocated: bool,
    byte_order: ByteOrder,
    config: ImageConfig,
}

impl ImageByteMap<SparseByteMap> {
    /// Create an empty map backed by a [`SparseByteMap`].
    pub fn new(ids: &dyn IdAllocator) -> Self {
        Self::with_config(ids, ImageConfig::default())
    }

    pub fn with_config(ids: &dyn IdAllocator, config: ImageConfig) -> Self {
        Self::with_store(ids.allocate(), SparseByteMap::new(), config)
    }

    /// Rebuild a map from its record. The address range is taken as is,
    /// without re-checking `min <= max`. Byte order is not stored in the
    /// record and comes back as the configured default.
    pub fn from_record(record: &ImageByteMapRecord) -> Result<Self> {
        Self::from_record_with_config(record, ImageConfig::default())
    }

    pub fn from_bincode(data: &[u8]) -> Result<Self> {
        Self::from_record(&ImageByteMapRecord::from_bincode(data)?)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Self::from_record(&ImageByteMapRecord::from_json(s)?)
    }
}

impl<B: ByteStore> ImageByteMap<B> {
    /// Create a map around an existing storage engine.
    pub fn with_store(id: NodeId, byte_map: B, config: ImageConfig) -> Self {
        Self {
            id,
            byte_map,
            file_name: String::new(),
            base_address: Addr::ZERO,
            entry_point_address: Addr::ZERO,
            addr_min_max: (Addr::ZERO, Addr::ZERO),
            rebase_delta: 0,
            is_relocated: false,
            byte_order: config.default_byte_order,
            config,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn config(&self) -> &ImageConfig {
        &self.config
    }

    /// The underlying storage engine, read-only.
    pub fn byte_map(&self) -> &B {
        &self.byte_map
    }

    pub fn set_file_name(&mut self, name: impl Into<String>) {
        self.file_name = name.into();
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn set_base_address(&mut self, addr: Addr) {
        self.base_address = addr;
    }

    pub fn base_address(&self) -> Addr {
        self.base_address
    }

    /// Entry point; not required to lie inside the address range.
    pub fn set_entry_point_address(&mut self, addr: Addr) {
        self.entry_point_address = addr;
    }

    pub fn entry_point_address(&self) -> Addr {
        self.entry_point_address
    }

    /// Set the inclusive range of valid addresses.
    ///
    /// Returns `false` and resets the range to `(0, 0)` when `min > max`.
    pub fn set_addr_min_max(&mut self, min: Addr, max: Addr) -> bool {
        if min <= max {
            self.addr_min_max = (min, max);
            return true;
        }
        debug!(%min, %max, "rejected inverted address range");
        self.addr_min_max = (Addr::ZERO, Addr::ZERO);
        false
    }

    /// Like [`set_addr_min_max`](Self::set_addr_min_max), reporting the
    /// rejected pair as an error. The range is still reset on failure.
    pub fn try_set_addr_min_max(&mut self, min: Addr, max: Addr) -> Result<()> {
        if self.set_addr_min_max(min, max) {
            Ok(())
        } else {
            Err(ImageError::InvalidAddressRange { min, max })
        }
    }

    pub fn addr_min_max(&self) -> (Addr, Addr) {
        self.addr_min_max
    }

    /// Difference between the actual and the preferred load address.
    /// Descriptive only; reads and writes never apply it.
    pub fn set_rebase_delta(&mut self, delta: i64) {
        self.rebase_delta = delta;
    }

    pub fn rebase_delta(&self) -> i64 {
        self.rebase_delta
    }

    /// Base address with the rebase delta backed out.
    pub fn preferred_address(&self) -> Option<Addr> {
        self.base_address
            .checked_offset(self.rebase_delta.checked_neg()?)
    }

    /// Mark the image as relocated. There is no way to clear the flag.
    pub fn set_is_relocated(&mut self) {
        self.is_relocated = true;
    }

    pub fn is_relocated(&self) -> bool {
        self.is_relocated
    }

    pub fn set_byte_order(&mut self, order: ByteOrder) {
        self.byte_order = order;
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn contains(&self, addr: Addr) -> bool {
        let (min, max) = self.addr_min_max;
        addr >= min && addr <= max
    }

    /// Whether `len` bytes starting at `addr` all lie inside the range.
    /// An empty span only needs its start address in range.
    pub fn contains_span(&self, addr: Addr, len: u64) -> bool {
        let (min, max) = self.addr_min_max;
        if addr < min {
            return false;
        }
        match addr.span_last(len) {
            Some(last) => last <= max,
            None => len == 0 && addr <= max,
        }
    }

    fn check_span(&self, address: Addr, len: u64) -> Result<()> {
        if self.contains_span(address, len) {
            return Ok(());
        }
        let (min, max) = self.addr_min_max;
        debug!(%address, len, %min, %max, "span outside image range");
        Err(ImageError::OutOfRange {
            address,
            len,
            min,
            max,
        })
    }

    /// Write `data` starting at `address`.
    ///
    /// # Errors
    /// `ImageError::OutOfRange` if any byte of the span falls outside the
    /// address range. Nothing is written in that case.
    pub fn set_data(&mut self, address: Addr, data: &[u8]) -> Result<()> {
        self.check_span(address, data.len() as u64)?;
        if self.config.trace_accesses {
            trace!(%address, len = data.len(), "write");
        }
        self.byte_map.set_data(address, data);
        Ok(())
    }

    /// Fill `count` bytes starting at `address` with `value`.
    ///
    /// Under [`FillPolicy::Unchecked`] each byte is handed to the store on
    /// its own and the span is not range-checked first; bytes outside the
    /// range are written anyway. Under [`FillPolicy::Checked`] the span is
    /// validated like [`set_data`](Self::set_data).
    ///
    /// # Errors
    /// `ImageError::OutOfRange` under the checked policy.
    /// `ImageError::AddressOverflow` when the fill would run past the top
    /// of the address space; under the unchecked policy the bytes before
    /// that point have already been written.
    pub fn set_data_fill(&mut self, address: Addr, count: usize, value: u8) -> Result<()> {
        match self.config.fill_policy {
            FillPolicy::Checked => self.check_span(address, count as u64)?,
            FillPolicy::Unchecked => {
                if !self.contains_span(address, count as u64) {
                    let (min, max) = self.addr_min_max;
                    warn!(%address, count, %min, %max, "unchecked fill extends outside image range");
                }
            }
        }
        if self.config.trace_accesses {
            trace!(%address, count, value, "fill");
        }
        for i in 0..count as u64 {
            let at = address
                .checked_add(i)
                .ok_or_else(|| ImageError::AddressOverflow { address, offset: i })?;
            self.byte_map.set_data(at, &[value]);
        }
        Ok(())
    }

    /// Read `count` bytes starting at `address`.
    ///
    /// # Errors
    /// `ImageError::OutOfRange` if any byte of the span falls outside the
    /// address range.
    pub fn get_data(&self, address: Addr, count: usize) -> Result<Vec<u8>> {
        self.check_span(address, count as u64)?;
        if self.config.trace_accesses {
            trace!(%address, count, "read");
        }
        Ok(self.byte_map.get_data(address, count))
    }

    pub fn to_record(&self) -> ImageByteMapRecord {
        ImageByteMapRecord {
            uuid: self.id.to_vec(),
            byte_map: self.byte_map.to_record(),
            file_name: self.file_name.clone(),
            addr_min: self.addr_min_max.0.value(),
            addr_max: self.addr_min_max.1.value(),
            base_address: self.base_address.value(),
            entry_point_address: self.entry_point_address.value(),
            rebase_delta: self.rebase_delta,
            is_relocated: self.is_relocated,
        }
    }

    pub fn from_record_with_config(record: &ImageByteMapRecord, config: ImageConfig) -> Result<Self> {
        let _span = crate::span_trace!(
            "image_from_record",
            file = %record.file_name,
            regions = record.byte_map.regions.len()
        )
        .entered();
        let id = NodeId::from_slice(&record.uuid)?;
        let byte_map = B::from_record(&record.byte_map)?;
        let mut map = Self::with_store(id, byte_map, config);
        map.file_name = record.file_name.clone();
        map.addr_min_max = (Addr::new(record.addr_min), Addr::new(record.addr_max));
        map.base_address = Addr::new(record.base_address);
        map.entry_point_address = Addr::new(record.entry_point_address);
        map.rebase_delta = record.rebase_delta;
        map.is_relocated = record.is_relocated;
        Ok(map)
    }

    pub fn to_bincode(&self) -> Result<Vec<u8>> {
        self.to_record().to_bincode()
    }

    pub fn to_json(&self) -> Result<String> {
        self.to_record().to_json()
    }
}

impl<B: ByteStore> MemoryView for ImageByteMap<B> {
    fn read_bytes(&self, addr: Addr, len: usize) -> Result<Vec<u8>> {
        self.get_data(addr, len)
    }
}
