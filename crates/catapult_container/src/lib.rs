//! # Catapult Container
//!
//! Zero-copy framing of size-prefixed binary entities.
//!
//! Every record handled here starts with a little-endian `u32` holding its own
//! length. Records nest: a container's variable data is a region of further
//! records, laid out back to back and padded to 8 bytes, except the last one.
//!
//! This crate provides:
//! - Borrowed typed views ([`SizePrefixedEntity`])
//! - A bounds-checked cursor with two error policies ([`RecordCursor`])
//! - Implicit and explicit element region sizing ([`EntityContainer`])
//! - A recursive size validator ([`check_size`], [`is_size_valid`])
//!
//! ## Usage
//!
//! ```
//! use catapult_container::{
//!     is_size_valid, EntityContainer, ImplicitPayloadSize, SizePrefixedEntity,
//! };
//!
//! #[derive(Clone, Copy)]
//! struct Record<'a>(&'a [u8]);
//!
//! impl<'a> SizePrefixedEntity<'a> for Record<'a> {
//!     const HEADER_SIZE: usize = 4;
//!     const NAME: &'static str = "record";
//!
//!     fn from_bytes_unchecked(bytes: &'a [u8]) -> Self {
//!         Self(bytes)
//!     }
//!
//!     fn bytes(&self) -> &'a [u8] {
//!         self.0
//!     }
//! }
//!
//! #[derive(Clone, Copy)]
//! struct Batch<'a>(&'a [u8]);
//!
//! impl<'a> SizePrefixedEntity<'a> for Batch<'a> {
//!     const HEADER_SIZE: usize = 8;
//!     const NAME: &'static str = "batch";
//!
//!     fn from_bytes_unchecked(bytes: &'a [u8]) -> Self {
//!         Self(bytes)
//!     }
//!
//!     fn bytes(&self) -> &'a [u8] {
//!         self.0
//!     }
//! }
//!
//! impl<'a> EntityContainer<'a> for Batch<'a> {
//!     type Element = Record<'a>;
//!     type Sizing = ImplicitPayloadSize;
//! }
//!
//! // 8 byte header, a 5 byte record padded to 8, then a 4 byte record
//! let bytes = [
//!     20, 0, 0, 0, 0, 0, 0, 0,
//!     5, 0, 0, 0, 0xAA, 0, 0, 0,
//!     4, 0, 0, 0,
//! ];
//!
//! let batch = Batch::parse(&bytes).unwrap();
//! assert!(is_size_valid(&batch, |_| true));
//! assert_eq!(batch.elements().iter().count(), 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod container;
mod cursor;
mod entity;
mod error;
mod layout;
mod validation;

#[cfg(test)]
mod test_support;

pub use container::{
    ContainerView, EntityContainer, ExplicitPayloadSize, HasPayloadSize, ImplicitPayloadSize,
    PayloadSizing,
};
pub use cursor::{Entities, EntitiesMut, ErrorPolicy, RecordCursor};
pub use entity::{entity_eq, payload_start, SelfSizedEntity, SizePrefixedEntity};
pub use error::{ContainerError, ContainerResult};
pub use layout::{
    align_up, calculate_container_size, padding_size, read_array, read_size, read_u16, read_u32,
    read_u64, ENTITY_ALIGNMENT, SIZE_FIELD_LEN,
};
pub use validation::{check_size, is_size_valid};
