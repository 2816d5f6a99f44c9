//! Range-checked byte storage for loaded binary images.
//!
//! [`ImageByteMap`](core::image_byte_map::ImageByteMap) holds the bytes of
//! one image together with its layout metadata and rejects any access
//! outside the configured address range.
//! [`LocatedObject`](core::located::LocatedObject) describes an
//! `(address, size)` span of interest inside such an image. Both persist
//! through the record types in [`core::record`].

/// Configuration
pub mod config;
/// Core data types module
pub mod core;
pub mod error;
pub mod logging;

pub use crate::config::{FillPolicy, ImageConfig};
pub use crate::core::address::Addr;
pub use crate::core::byte_map::{ByteStore, SparseByteMap};
pub use crate::core::byte_order::ByteOrder;
pub use crate::core::id::{IdAllocator, NodeId, RandomIdAllocator, SequentialIdAllocator};
pub use crate::core::image_byte_map::ImageByteMap;
pub use crate::core::located::LocatedObject;
pub use crate::core::view::MemoryView;
pub use crate::error::{ImageError, Result};
