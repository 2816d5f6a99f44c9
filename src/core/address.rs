//! Address type for image byte maps.
//!
//! `Addr` is an opaque unsigned location in a byte-addressed space. Offset
//! arithmetic is checked; nothing in this crate relies on wrapping.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// A location in a byte-addressed space.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Encode,
    Decode,
)]
#[serde(transparent)]
pub struct Addr(u64);

impl Addr {
    /// The zero address, also used as the sentinel for an unset range.
    pub const ZERO: Addr = Addr(0);
    pub const MAX: Addr = Addr(u64::MAX);

    pub const fn new(value: u64) -> Self {
        Addr(value)
    }

    /// The raw numeric value.
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Add an offset, returning `None` if the result would not fit.
    pub fn checked_add(self, offset: u64) -> Option<Addr> {
        self.0.checked_add(offset).map(Addr)
    }

    /// Subtract an offset, returning `None` on underflow.
    pub fn checked_sub(self, offset: u64) -> Option<Addr> {
        self.0.checked_sub(offset).map(Addr)
    }

    /// Apply a signed displacement, returning `None` if the result would
    /// leave the address space.
    pub fn checked_offset(self, delta: i64) -> Option<Addr> {
        self.0.checked_add_signed(delta).map(Addr)
    }

    /// Last address of a span of `len` bytes starting here.
    ///
    /// Returns `None` for an empty span or when `self + len - 1` overflows.
    pub fn span_last(self, len: u64) -> Option<Addr> {
        let extra = len.checked_sub(1)?;
        self.checked_add(extra)
    }
}

impl From<u64> for Addr {
    fn from(value: u64) -> Self {
        Addr(value)
    }
}

impl From<Addr> for u64 {
    fn from(addr: Addr) -> Self {
        addr.0
    }
}

/// Panics on overflow like plain integer addition in debug builds. Use
/// [`Addr::checked_add`] where the operands are not already validated.
impl Add<u64> for Addr {
    type Output = Addr;

    fn add(self, rhs: u64) -> Addr {
        match self.0.checked_add(rhs) {
            Some(v) => Addr(v),
            None => panic!("address overflow: {} + {:#x}", self, rhs),
        }
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::LowerHex for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}
