//! Core data types for image byte maps.
//!
//! Starts from `Addr`, the location type every other entity is keyed by,
//! and builds up to the image byte map and the objects located inside it.

pub mod address;
pub mod block;
pub mod byte_map;
pub mod byte_order;
pub mod id;
pub mod image_byte_map;
pub mod located;
pub mod offset;
pub mod record;
pub mod view;
