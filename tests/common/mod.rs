//! Shared fixtures for integration tests.

#![allow(dead_code)]

use image_bytemap::{Addr, ImageByteMap, SequentialIdAllocator};

/// Inclusive range used by most fixtures.
pub const TEXT_MIN: u64 = 0x1000;
pub const TEXT_MAX: u64 = 0x1fff;

/// Deterministic allocator so ids are stable across test runs.
pub fn ids(seed: &str) -> SequentialIdAllocator {
    SequentialIdAllocator::new(seed)
}

/// A populated image over `[TEXT_MIN, TEXT_MAX]` with a few written spans.
pub fn sample_image(ids: &SequentialIdAllocator) -> ImageByteMap {
    let mut image = ImageByteMap::new(ids);
    assert!(image.set_addr_min_max(Addr::new(TEXT_MIN), Addr::new(TEXT_MAX)));
    image.set_file_name("hello-gcc-O0");
    image.set_base_address(Addr::new(TEXT_MIN));
    image.set_entry_point_address(Addr::new(0x1040));
    image.set_rebase_delta(-0x400000);
    image
        .set_data(Addr::new(0x1000), b"\x7fELF\x02\x01\x01")
        .expect("header in range");
    image
        .set_data(Addr::new(0x1040), &[0x55, 0x48, 0x89, 0xe5, 0xc3])
        .expect("code in range");
    image
}
