//! MemoryView: bounded, typed reads by address.
//!
//! Implementors supply `read_bytes`; the integer helpers decode fixed-width
//! values in the requested byte order on top of it. Out-of-range reads are
//! errors, never panics.

use crate::core::address::Addr;
use crate::core::byte_order::ByteOrder;
use crate::error::{ImageError, Result};

/// Bounded memory reads by address.
pub trait MemoryView {
    /// Read `len` bytes starting at `addr`.
    fn read_bytes(&self, addr: Addr, len: usize) -> Result<Vec<u8>>;

    fn read_u8(&self, addr: Addr) -> Result<u8> {
        Ok(read_array::<1, Self>(self, addr)?[0])
    }

    /// Read a little/big-endian u16.
    fn read_u16(&self, addr: Addr, order: ByteOrder) -> Result<u16> {
        let b = read_array::<2, Self>(self, addr)?;
        Ok(match order {
            ByteOrder::Little => u16::from_le_bytes(b),
            ByteOrder::Big => u16::from_be_bytes(b),
        })
    }

    /// Read a little/big-endian u32.
    fn read_u32(&self, addr: Addr, order: ByteOrder) -> Result<u32> {
        let b = read_array::<4, Self>(self, addr)?;
        Ok(match order {
            ByteOrder::Little => u32::from_le_bytes(b),
            ByteOrder::Big => u32::from_be_bytes(b),
        })
    }

    /// Read a little/big-endian u64.
    fn read_u64(&self, addr: Addr, order: ByteOrder) -> Result<u64> {
        let b = read_array::<8, Self>(self, addr)?;
        Ok(match order {
            ByteOrder::Little => u64::from_le_bytes(b),
            ByteOrder::Big => u64::from_be_bytes(b),
        })
    }
}

fn read_array<const N: usize, V: MemoryView + ?Sized>(view: &V, addr: Addr) -> Result<[u8; N]> {
    let bytes = view.read_bytes(addr, N)?;
    bytes.try_into().map_err(|b: Vec<u8>| {
        ImageError::Format(format!("read_bytes returned {} bytes, expected {}", b.len(), N))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<u8>);

    impl MemoryView for Fixed {
        fn read_bytes(&self, addr: Addr, len: usize) -> Result<Vec<u8>> {
            let start = addr.value() as usize;
            self.0
                .get(start..start + len)
                .map(<[u8]>::to_vec)
                .ok_or(ImageError::OutOfRange {
                    address: addr,
                    len: len as u64,
                    min: Addr::ZERO,
                    max: Addr::new(self.0.len() as u64 - 1),
                })
        }
    }

    struct Short;

    impl MemoryView for Short {
        fn read_bytes(&self, _addr: Addr, _len: usize) -> Result<Vec<u8>> {
            Ok(vec![1])
        }
    }

    #[test]
    fn test_usable_as_trait_object() {
        let views: Vec<Box<dyn MemoryView>> = vec![Box::new(Fixed(vec![0x34, 0x12, 0, 0]))];
        for v in &views {
            assert_eq!(v.read_u16(Addr::ZERO, ByteOrder::Little).unwrap(), 0x1234);
            assert_eq!(v.read_u32(Addr::ZERO, ByteOrder::Big).unwrap(), 0x34120000);
            assert!(v.read_u64(Addr::ZERO, ByteOrder::Little).is_err());
        }
    }

    #[test]
    fn test_short_read_is_error_not_panic() {
        let err = Short.read_u32(Addr::ZERO, ByteOrder::Little).unwrap_err();
        assert_eq!(
            err,
            ImageError::Format("read_bytes returned 1 bytes, expected 4".to_string())
        );
        assert_eq!(Short.read_u8(Addr::ZERO).unwrap(), 1);
    }
}
