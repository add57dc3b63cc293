//! Minimal entities and containers shared by the unit tests of this crate.

use crate::container::{EntityContainer, ExplicitPayloadSize, HasPayloadSize, ImplicitPayloadSize};
use crate::entity::SizePrefixedEntity;
use crate::layout::read_u32;

/// Size of the fixed portion of [`TestEntity`].
pub const TEST_ENTITY_SIZE: usize = 8;

/// Size of the fixed portion of the test containers.
pub const TEST_CONTAINER_HEADER_SIZE: usize = 16;

/// `Size u32 | Value u32 | padding...`
#[derive(Debug, Clone, Copy)]
pub struct TestEntity<'a>(&'a [u8]);

impl<'a> SizePrefixedEntity<'a> for TestEntity<'a> {
    const HEADER_SIZE: usize = TEST_ENTITY_SIZE;
    const NAME: &'static str = "test entity";

    fn from_bytes_unchecked(bytes: &'a [u8]) -> Self {
        Self(bytes)
    }

    fn bytes(&self) -> &'a [u8] {
        self.0
    }
}

impl TestEntity<'_> {
    pub fn value(&self) -> u32 {
        read_u32(self.0, 4).unwrap_or(0)
    }
}

/// `Size u32 | reserved u32 | Extension u32 | reserved u32`, elements follow
/// the header plus `Extension` bytes.
#[derive(Debug, Clone, Copy)]
pub struct ImplicitContainer<'a>(&'a [u8]);

impl<'a> SizePrefixedEntity<'a> for ImplicitContainer<'a> {
    const HEADER_SIZE: usize = TEST_CONTAINER_HEADER_SIZE;
    const NAME: &'static str = "implicit container";

    fn from_bytes_unchecked(bytes: &'a [u8]) -> Self {
        Self(bytes)
    }

    fn bytes(&self) -> &'a [u8] {
        self.0
    }
}

impl<'a> EntityContainer<'a> for ImplicitContainer<'a> {
    type Element = TestEntity<'a>;
    type Sizing = ImplicitPayloadSize;

    fn container_header_size(&self) -> usize {
        Self::HEADER_SIZE + read_u32(self.0, 8).unwrap_or(0) as usize
    }
}

/// `Size u32 | PayloadSize u32 | Extension u32 | reserved u32`, followed by
/// elements and 8-byte trailing records.
#[derive(Debug, Clone, Copy)]
pub struct ExplicitContainer<'a>(&'a [u8]);

impl<'a> SizePrefixedEntity<'a> for ExplicitContainer<'a> {
    const HEADER_SIZE: usize = TEST_CONTAINER_HEADER_SIZE;
    const NAME: &'static str = "explicit container";

    fn from_bytes_unchecked(bytes: &'a [u8]) -> Self {
        Self(bytes)
    }

    fn bytes(&self) -> &'a [u8] {
        self.0
    }
}

impl HasPayloadSize for ExplicitContainer<'_> {
    fn payload_size(&self) -> u32 {
        read_u32(self.0, 4).unwrap_or(0)
    }
}

impl<'a> EntityContainer<'a> for ExplicitContainer<'a> {
    type Element = TestEntity<'a>;
    type Sizing = ExplicitPayloadSize;

    const TRAILING_ELEMENT_SIZE: usize = 8;

    fn container_header_size(&self) -> usize {
        Self::HEADER_SIZE + read_u32(self.0, 8).unwrap_or(0) as usize
    }
}

/// Writes a test entity at `offset`.
pub fn write_entity(buffer: &mut [u8], offset: usize, size: u32, value: u32) {
    buffer[offset..offset + 4].copy_from_slice(&size.to_le_bytes());
    buffer[offset + 4..offset + 8].copy_from_slice(&value.to_le_bytes());
}

/// Builds back-to-back minimal test entities, which need no padding.
pub fn fixed_entities(values: &[u32]) -> Vec<u8> {
    let mut buffer = vec![0u8; values.len() * TEST_ENTITY_SIZE];
    for (i, value) in values.iter().enumerate() {
        write_entity(&mut buffer, i * TEST_ENTITY_SIZE, TEST_ENTITY_SIZE as u32, *value);
    }

    buffer
}

/// Builds a container around entities with the given sizes.
///
/// Entity `i` carries value `i + 1`. `trailing` bytes are appended after the
/// elements and `payload_size` is written at offset 4.
pub fn container_buffer(extension: u32, entity_sizes: &[u32], trailing: usize) -> Vec<u8> {
    let header_size = TEST_CONTAINER_HEADER_SIZE + extension as usize;
    let sizes = entity_sizes.iter().map(|size| *size as usize);
    let payload_size = crate::layout::calculate_container_size(0, sizes, 0) as usize;
    let size = header_size + payload_size + trailing;

    let mut buffer = vec![0u8; size];
    buffer[..4].copy_from_slice(&(size as u32).to_le_bytes());
    buffer[4..8].copy_from_slice(&(payload_size as u32).to_le_bytes());
    buffer[8..12].copy_from_slice(&extension.to_le_bytes());

    let mut offset = header_size;
    for (i, entity_size) in entity_sizes.iter().enumerate() {
        write_entity(&mut buffer, offset, *entity_size, i as u32 + 1);
        offset = crate::layout::align_up(offset - header_size + *entity_size as usize) + header_size;
    }

    buffer
}

/// Overwrites the `u32` at `offset`.
pub fn set_u32(buffer: &mut [u8], offset: usize, value: u32) {
    buffer[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
