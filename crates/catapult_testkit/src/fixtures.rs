//! Buffer fixtures.
//!
//! Provides ready-made aggregates, finalization proofs and raw record regions,
//! plus the offsets needed to corrupt them in place.

use catapult_container::{
    align_up, calculate_container_size, read_u32, EntityContainer, ImplicitPayloadSize, SizePrefixedEntity,
};
use catapult_model::aggregate::{AggregateTransactionBuilder, Cosignature};
use catapult_model::finalization::{FinalizationProofBuilder, FinalizationStage, MessageGroupBuilder};
use catapult_model::{
    AggregateTransaction, EntityType, FinalizationProof, FinalizationRound, Hash256, Height, Key, Signature,
    TreeSignature,
};

use crate::mocks::mock_transaction;

/// Type written into fixture aggregates.
pub const AGGREGATE_TYPE: EntityType = EntityType(0x4141);

/// Offset of the `PayloadSize` field of an aggregate.
pub const AGGREGATE_PAYLOAD_SIZE_OFFSET: usize = 160;

/// Offset of the `HashesCount` field of a message group.
pub const MESSAGE_GROUP_HASHES_COUNT_OFFSET: usize = 4;

/// Offset of the `SignaturesCount` field of a message group.
pub const MESSAGE_GROUP_SIGNATURES_COUNT_OFFSET: usize = 6;

/// Round written into fixture proofs.
pub const PROOF_ROUND: FinalizationRound = FinalizationRound::new(7, 3);

/// Height written into fixture proofs.
pub const PROOF_HEIGHT: Height = Height(246);

/// Overwrites a little-endian `u16` at `offset`.
pub fn set_u16(bytes: &mut [u8], offset: usize, value: u16) {
    bytes[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

/// Overwrites a little-endian `u32` at `offset`.
pub fn set_u32(bytes: &mut [u8], offset: usize, value: u32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Reads the little-endian `u32` at `offset`, or zero past the end.
#[must_use]
pub fn get_u32(bytes: &[u8], offset: usize) -> u32 {
    read_u32(bytes, offset).unwrap_or(0)
}

/// A cosignature with recognizable key and signature bytes.
#[must_use]
pub fn cosignature(seed: u8) -> Cosignature {
    Cosignature::new(Key::filled(seed), Signature::filled(seed.wrapping_add(1)))
}

/// Builds an aggregate of mock transactions with the given data sizes,
/// followed by `cosignatures` cosignatures.
#[must_use]
pub fn aggregate_with_data_sizes(data_sizes: &[u16], cosignatures: usize) -> Vec<u8> {
    let mut builder = AggregateTransactionBuilder::new(AGGREGATE_TYPE)
        .signer_public_key(Key::filled(0x5A))
        .transactions_hash(Hash256::filled(0x3C));
    for (i, data_size) in data_sizes.iter().enumerate() {
        builder = builder.transaction(mock_transaction(*data_size, i as u8 + 1));
    }

    for i in 0..cosignatures {
        builder = builder.cosignature(cosignature(i as u8 * 2));
    }

    builder.build().unwrap_or_default()
}

/// Builds an aggregate of mock transactions followed by `trailing` raw bytes
/// of cosignature space, which need not be a whole number of cosignatures.
#[must_use]
pub fn aggregate_with_trailing_bytes(data_sizes: &[u16], trailing: usize) -> Vec<u8> {
    let mut bytes = aggregate_with_data_sizes(data_sizes, 0);
    bytes.extend((0..trailing).map(|i| i as u8));
    let size = bytes.len() as u32;
    set_u32(&mut bytes, 0, size);
    bytes
}

/// Absolute offsets of the embedded transactions of a well-formed aggregate.
#[must_use]
pub fn transaction_offsets(bytes: &[u8]) -> Vec<usize> {
    let mut offsets = Vec::new();
    let Ok(aggregate) = AggregateTransaction::parse(bytes) else {
        return offsets;
    };

    let mut offset = aggregate.container_header_size();
    for transaction in aggregate.transactions().iter().map_while(Result::ok) {
        offsets.push(offset);
        offset += align_up(transaction.size() as usize);
    }

    offsets
}

/// Builds a message group with `hashes` hashes and `signatures` signatures.
#[must_use]
pub fn message_group(stage: FinalizationStage, height: Height, hashes: u16, signatures: u16) -> Vec<u8> {
    let mut builder = MessageGroupBuilder::new(stage, height);
    for i in 0..hashes {
        builder = builder.hash(Hash256::filled(height.0 as u8 ^ i as u8));
    }

    for i in 0..signatures {
        builder = builder.signature(TreeSignature::filled(i as u8));
    }

    builder.build().unwrap_or_default()
}

/// Builds a proof with one prevote message group per `(hashes, signatures)` pair.
#[must_use]
pub fn finalization_proof_with_groups(groups: &[(u16, u16)]) -> Vec<u8> {
    let mut builder = FinalizationProofBuilder::new(PROOF_ROUND, PROOF_HEIGHT, Hash256::filled(0xF0));
    for (i, (hashes, signatures)) in groups.iter().enumerate() {
        let height = Height(PROOF_HEIGHT.0 + i as u64);
        builder = builder.message_group(message_group(FinalizationStage::Prevote, height, *hashes, *signatures));
    }

    builder.build().unwrap_or_default()
}

/// Absolute offsets of the message groups of a well-formed proof.
#[must_use]
pub fn message_group_offsets(bytes: &[u8]) -> Vec<usize> {
    let mut offsets = Vec::new();
    let Ok(proof) = FinalizationProof::parse(bytes) else {
        return offsets;
    };

    let mut offset = proof.container_header_size();
    for group in proof.message_groups().iter().map_while(Result::ok) {
        offsets.push(offset);
        offset += align_up(group.size() as usize);
    }

    offsets
}

/// Minimal record used to exercise raw regions: a size followed by a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestRecord<'a> {
    bytes: &'a [u8],
}

impl<'a> SizePrefixedEntity<'a> for TestRecord<'a> {
    const HEADER_SIZE: usize = 8;
    const NAME: &'static str = "test record";

    fn from_bytes_unchecked(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    fn bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl TestRecord<'_> {
    /// Returns the value stored after the size.
    #[must_use]
    pub fn value(&self) -> u32 {
        get_u32(self.bytes, 4)
    }
}

/// Implicitly sized container of [`TestRecord`]s with an 8 byte header.
#[derive(Debug, Clone, Copy)]
pub struct TestBatch<'a> {
    bytes: &'a [u8],
}

impl<'a> SizePrefixedEntity<'a> for TestBatch<'a> {
    const HEADER_SIZE: usize = 8;
    const NAME: &'static str = "test batch";

    fn from_bytes_unchecked(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    fn bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a> EntityContainer<'a> for TestBatch<'a> {
    type Element = TestRecord<'a>;
    type Sizing = ImplicitPayloadSize;
}

/// Lays out records with the given sizes, padded to 8 bytes except the last.
/// Record `i` stores the value `i + 1`.
#[must_use]
pub fn record_region(sizes: &[u32]) -> Vec<u8> {
    let total = calculate_container_size(0, sizes.iter().map(|size| *size as usize), 0);
    let mut buffer = vec![0u8; total as usize];
    let mut offset = 0;
    for (i, size) in sizes.iter().enumerate() {
        let end = buffer.len().min(offset + 4);
        buffer[offset..end].copy_from_slice(&size.to_le_bytes()[..end - offset]);
        if *size as usize >= TestRecord::HEADER_SIZE {
            set_u32(&mut buffer, offset + 4, i as u32 + 1);
        }

        offset = align_up(offset + *size as usize);
    }

    buffer
}

/// Wraps a record region into a [`TestBatch`].
#[must_use]
pub fn batch(sizes: &[u32]) -> Vec<u8> {
    let region = record_region(sizes);
    let mut bytes = Vec::with_capacity(TestBatch::HEADER_SIZE + region.len());
    bytes.extend_from_slice(&((TestBatch::HEADER_SIZE + region.len()) as u32).to_le_bytes());
    bytes.extend_from_slice(&[0; 4]);
    bytes.extend_from_slice(&region);
    bytes
}
