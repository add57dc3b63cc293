//! Serializable test vectors.
//!
//! Vectors pair a hex-encoded entity with its expected validation outcome so
//! they can be exported as JSON and replayed by other implementations.

use catapult_container::ContainerError;
use catapult_model::{ModelError, TreeSignature};
use serde::{Deserialize, Serialize};

use crate::fixtures::{
    aggregate_with_data_sizes, aggregate_with_trailing_bytes, batch, finalization_proof_with_groups, get_u32,
    message_group_offsets, set_u16, set_u32, transaction_offsets, AGGREGATE_PAYLOAD_SIZE_OFFSET,
    MESSAGE_GROUP_SIGNATURES_COUNT_OFFSET,
};

/// Kind of entity a vector holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorEntity {
    /// Implicitly sized batch of test records.
    Batch,
    /// Aggregate transaction of mock transactions.
    Aggregate,
    /// Finalization proof.
    FinalizationProof,
}

/// A test vector that can be shared across implementations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// Entity kind.
    pub entity: VectorEntity,
    /// Entity bytes (hex-encoded).
    pub input_hex: String,
    /// Expected error kind, or `None` if the entity is size-valid.
    pub expected_error: Option<String>,
}

impl TestVector {
    fn new(
        id: &str,
        description: &str,
        entity: VectorEntity,
        input: &[u8],
        expected_error: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            entity,
            input_hex: hex_encode(input),
            expected_error: expected_error.map(Into::into),
        }
    }
}

/// Returns a stable name for the kind of `error`.
#[must_use]
pub fn error_kind(error: &ContainerError) -> &'static str {
    match error {
        ContainerError::TruncatedLengthField { .. } => "truncated_length_field",
        ContainerError::DeclaredSizeBelowMinimum { .. } => "declared_size_below_minimum",
        ContainerError::RecordOverflowsRegion { .. } => "record_overflows_region",
        ContainerError::PayloadSizeMismatch { .. } => "payload_size_mismatch",
        ContainerError::TrailingBytesNotMultipleOfElementSize { .. } => "trailing_bytes_not_multiple_of_element_size",
        ContainerError::NestedElementInvalid { .. } => "nested_element_invalid",
        ContainerError::TruncatedHeader { .. } => "truncated_header",
        ContainerError::IteratedPastEnd => "iterated_past_end",
    }
}

/// Returns a stable name for the kind of `error`.
#[must_use]
pub fn model_error_kind(error: &ModelError) -> &'static str {
    match error {
        ModelError::Container(error) => error_kind(error),
        ModelError::EntityTooLarge { .. } => "entity_too_large",
        ModelError::LimitExceeded { .. } => "limit_exceeded",
        ModelError::UnsupportedEntityType { .. } => "unsupported_entity_type",
        ModelError::BuilderOverflow { .. } => "builder_overflow",
    }
}

/// Batch vectors.
pub fn batch_vectors() -> Vec<TestVector> {
    let mut truncated = batch(&[20, 30, 10]);
    set_u32(&mut truncated, 8 + 24, 2);

    let mut overflowing = batch(&[20, 30, 10]);
    set_u32(&mut overflowing, 8 + 56, 11);

    vec![
        TestVector::new("batch_empty", "Batch without records", VectorEntity::Batch, &batch(&[]), None),
        TestVector::new(
            "batch_three_records",
            "Three padded records",
            VectorEntity::Batch,
            &batch(&[20, 30, 10]),
            None,
        ),
        TestVector::new(
            "batch_record_below_minimum",
            "Second record declares a size smaller than its header",
            VectorEntity::Batch,
            &truncated,
            Some("declared_size_below_minimum"),
        ),
        TestVector::new(
            "batch_record_overflows",
            "Last record extends past the batch",
            VectorEntity::Batch,
            &overflowing,
            Some("record_overflows_region"),
        ),
    ]
}

/// Aggregate transaction vectors.
pub fn aggregate_vectors() -> Vec<TestVector> {
    let mut large_payload = aggregate_with_data_sizes(&[1, 2, 3], 0);
    let payload_size = get_u32(&large_payload, AGGREGATE_PAYLOAD_SIZE_OFFSET);
    set_u32(&mut large_payload, AGGREGATE_PAYLOAD_SIZE_OFFSET, payload_size + 1);

    let mut zero_sized = aggregate_with_data_sizes(&[1, 2, 3], 0);
    if let Some(offset) = transaction_offsets(&zero_sized).get(1).copied() {
        set_u32(&mut zero_sized, offset, 0);
    }

    let mut bad_data_size = aggregate_with_data_sizes(&[1, 2, 3], 0);
    if let Some(offset) = transaction_offsets(&bad_data_size).get(1).copied() {
        set_u16(&mut bad_data_size, offset + 48, 1);
    }

    vec![
        TestVector::new(
            "aggregate_empty",
            "Aggregate without transactions",
            VectorEntity::Aggregate,
            &aggregate_with_data_sizes(&[], 0),
            None,
        ),
        TestVector::new(
            "aggregate_three_transactions",
            "Three transactions and two cosignatures",
            VectorEntity::Aggregate,
            &aggregate_with_data_sizes(&[1, 2, 3], 2),
            None,
        ),
        TestVector::new(
            "aggregate_partial_cosignature",
            "Cosignature space is not a multiple of the cosignature size",
            VectorEntity::Aggregate,
            &aggregate_with_trailing_bytes(&[1, 2, 3], 2 * 104 + 52),
            Some("trailing_bytes_not_multiple_of_element_size"),
        ),
        TestVector::new(
            "aggregate_payload_too_large",
            "PayloadSize exceeds the space after the header",
            VectorEntity::Aggregate,
            &large_payload,
            Some("payload_size_mismatch"),
        ),
        TestVector::new(
            "aggregate_zero_sized_transaction",
            "Second embedded transaction declares a zero size",
            VectorEntity::Aggregate,
            &zero_sized,
            Some("declared_size_below_minimum"),
        ),
        TestVector::new(
            "aggregate_inconsistent_transaction",
            "Second embedded transaction disagrees with its plugin",
            VectorEntity::Aggregate,
            &bad_data_size,
            Some("nested_element_invalid"),
        ),
    ]
}

/// Finalization proof vectors.
pub fn finalization_proof_vectors() -> Vec<TestVector> {
    let mut inconsistent = finalization_proof_with_groups(&[(3, 1), (1, 2), (2, 1)]);
    if let Some(offset) = message_group_offsets(&inconsistent).get(1).copied() {
        set_u16(&mut inconsistent, offset + MESSAGE_GROUP_SIGNATURES_COUNT_OFFSET, 3);
    }

    let mut truncated = finalization_proof_with_groups(&[(1, 1)]);
    truncated.truncate(truncated.len() - TreeSignature::SIZE / 2);

    vec![
        TestVector::new(
            "proof_empty",
            "Proof without message groups",
            VectorEntity::FinalizationProof,
            &finalization_proof_with_groups(&[]),
            None,
        ),
        TestVector::new(
            "proof_three_groups",
            "Three message groups",
            VectorEntity::FinalizationProof,
            &finalization_proof_with_groups(&[(3, 1), (1, 2), (2, 1)]),
            None,
        ),
        TestVector::new(
            "proof_inconsistent_group",
            "Second message group counts more signatures than it holds",
            VectorEntity::FinalizationProof,
            &inconsistent,
            Some("nested_element_invalid"),
        ),
        TestVector::new(
            "proof_truncated",
            "Proof declares more bytes than the buffer holds",
            VectorEntity::FinalizationProof,
            &truncated,
            Some("record_overflows_region"),
        ),
    ]
}

/// Generate all test vectors as JSON.
pub fn all_vectors_json() -> serde_json::Result<String> {
    let vectors = AllTestVectors {
        batch: batch_vectors(),
        aggregate: aggregate_vectors(),
        finalization_proof: finalization_proof_vectors(),
    };

    serde_json::to_string_pretty(&vectors)
}

#[derive(Debug, Serialize, Deserialize)]
struct AllTestVectors {
    batch: Vec<TestVector>,
    aggregate: Vec<TestVector>,
    finalization_proof: Vec<TestVector>,
}

/// Encodes bytes as lowercase hexadecimal.
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Decodes a hexadecimal string, ignoring whitespace.
pub fn hex_decode(hex: &str) -> Option<Vec<u8>> {
    let hex = hex.replace([' ', '\n', '\r'], "");
    if hex.len() % 2 != 0 {
        return None;
    }

    (0..hex.len())
        .step_by(2)
        .map(|i| hex.get(i..i + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
        .collect()
}
