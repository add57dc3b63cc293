//! Aggregate transaction scenarios built from mock transactions.

use catapult_container::{ContainerError, EntityContainer, ErrorPolicy, HasPayloadSize, SizePrefixedEntity};
use catapult_model::aggregate::{Cosignature, EmbeddedTransaction, TransactionRegistry};
use catapult_model::{AggregateTransaction, EntityReader, ModelError, ValidationLimits};
use catapult_testkit::{
    aggregate_with_data_sizes, aggregate_with_trailing_bytes, cosignature, get_u32, mock_registry, set_u16,
    set_u32, transaction_offsets, MockTransactionPlugin, AGGREGATE_PAYLOAD_SIZE_OFFSET, MOCK_TRANSACTION_TYPE,
    TOP_LEVEL_MOCK_TRANSACTION_TYPE,
};

const EXTRA_SIZES: [u16; 3] = [1, 2, 3];

fn check(bytes: &[u8]) -> Result<(), ContainerError> {
    AggregateTransaction::parse(bytes)?.check_size(&mock_registry())
}

fn is_valid(bytes: &[u8]) -> bool {
    AggregateTransaction::parse(bytes).is_ok_and(|aggregate| aggregate.is_size_valid(&mock_registry()))
}

fn second_transaction_offset(bytes: &[u8]) -> usize {
    transaction_offsets(bytes)[1]
}

// region accessors

#[test]
fn transactions_are_inaccessible_when_aggregate_has_none() {
    let bytes = aggregate_with_data_sizes(&[], 0);
    let aggregate = AggregateTransaction::parse(&bytes).unwrap();

    assert_eq!(aggregate.payload_size(), 0);
    assert!(aggregate.transactions().is_empty());
    assert_eq!(aggregate.transactions().iter().count(), 0);
}

#[test]
fn transactions_are_accessible_when_aggregate_has_some() {
    let bytes = aggregate_with_data_sizes(&EXTRA_SIZES, 0);
    let aggregate = AggregateTransaction::parse(&bytes).unwrap();

    let sizes: Vec<u32> = aggregate
        .transactions()
        .iter()
        .map(|transaction| transaction.unwrap().size())
        .collect();
    assert_eq!(sizes, vec![51, 52, 53]);
    assert_eq!(aggregate.elements_offset(), Some(AggregateTransaction::HEADER_SIZE));
}

#[test]
fn cosignatures_are_inaccessible_when_size_is_less_than_header() {
    let mut bytes = aggregate_with_data_sizes(&[], 0);
    set_u32(&mut bytes, 0, AggregateTransaction::HEADER_SIZE as u32 - 1);
    let aggregate = AggregateTransaction::parse(&bytes).unwrap();

    assert_eq!(aggregate.cosignatures_count(), 0);
    assert!(aggregate.cosignatures().is_none());
}

#[test]
fn cosignatures_are_inaccessible_when_there_are_none() {
    let bytes = aggregate_with_data_sizes(&EXTRA_SIZES, 0);
    let aggregate = AggregateTransaction::parse(&bytes).unwrap();

    assert_eq!(aggregate.cosignatures_count(), 0);
    assert!(aggregate.cosignatures().is_none());
}

#[test]
fn cosignatures_are_accessible_without_transactions() {
    let bytes = aggregate_with_data_sizes(&[], 2);
    let aggregate = AggregateTransaction::parse(&bytes).unwrap();

    let cosignatures: Vec<Cosignature> = aggregate.cosignatures().unwrap().collect();
    assert_eq!(cosignatures, vec![cosignature(0), cosignature(2)]);
    assert!(is_valid(&bytes));
}

#[test]
fn cosignatures_are_accessible_after_transactions() {
    let bytes = aggregate_with_data_sizes(&EXTRA_SIZES, 1);
    let aggregate = AggregateTransaction::parse(&bytes).unwrap();

    let payload_end = AggregateTransaction::HEADER_SIZE + aggregate.payload_size() as usize;
    let cosignatures = aggregate.trailing_bytes().unwrap();
    assert_eq!(cosignatures.as_ptr(), bytes[payload_end..].as_ptr());
    assert_eq!(aggregate.cosignatures().unwrap().collect::<Vec<_>>(), vec![cosignature(0)]);
}

#[test]
fn partial_cosignature_is_ignored_by_accessor() {
    let bytes = aggregate_with_trailing_bytes(&EXTRA_SIZES, 2 * Cosignature::SIZE + Cosignature::SIZE / 2);
    let aggregate = AggregateTransaction::parse(&bytes).unwrap();

    assert_eq!(aggregate.cosignatures_count(), 2);
    assert_eq!(aggregate.cosignatures().unwrap().len(), 2);
    assert_eq!(
        check(&bytes),
        Err(ContainerError::TrailingBytesNotMultipleOfElementSize {
            trailing: 260,
            element_size: Cosignature::SIZE
        })
    );
}

// endregion

// region size validation

#[test]
fn size_invalid_if_reported_size_is_zero() {
    let mut bytes = aggregate_with_data_sizes(&[], 0);
    set_u32(&mut bytes, 0, 0);

    assert!(!is_valid(&bytes));
}

#[test]
fn size_invalid_if_reported_size_is_less_than_header_size() {
    let mut bytes = aggregate_with_data_sizes(&[], 0);
    set_u32(&mut bytes, 0, AggregateTransaction::HEADER_SIZE as u32 - 1);

    assert!(matches!(check(&bytes), Err(ContainerError::DeclaredSizeBelowMinimum { .. })));
}

#[test]
fn size_valid_if_reported_size_is_equal_to_header_size() {
    let bytes = aggregate_with_data_sizes(&[], 0);

    assert_eq!(bytes.len(), AggregateTransaction::HEADER_SIZE);
    assert!(is_valid(&bytes));
}

#[test]
fn size_invalid_if_any_transaction_has_partial_header() {
    let mut bytes = aggregate_with_data_sizes(&[], 0);
    bytes.push(0);
    set_u32(&mut bytes, 0, AggregateTransaction::HEADER_SIZE as u32 + 1);
    set_u32(&mut bytes, AGGREGATE_PAYLOAD_SIZE_OFFSET, 1);

    assert_eq!(
        check(&bytes),
        Err(ContainerError::TruncatedLengthField {
            offset: 0,
            region_len: 1
        })
    );
}

#[test]
fn size_invalid_if_any_transaction_has_invalid_data_size() {
    let mut bytes = aggregate_with_data_sizes(&EXTRA_SIZES, 0);
    let offset = second_transaction_offset(&bytes);
    set_u16(&mut bytes, offset + EmbeddedTransaction::HEADER_SIZE, 1);

    assert_eq!(
        check(&bytes),
        Err(ContainerError::NestedElementInvalid {
            entity: EmbeddedTransaction::NAME,
            index: 1,
            offset: 56
        })
    );
}

#[test]
fn size_invalid_if_any_transaction_has_zero_size() {
    let mut bytes = aggregate_with_data_sizes(&EXTRA_SIZES, 0);
    let offset = second_transaction_offset(&bytes);
    set_u32(&mut bytes, offset, 0);

    assert_eq!(
        check(&bytes),
        Err(ContainerError::DeclaredSizeBelowMinimum {
            offset: 56,
            size: 0,
            minimum: EmbeddedTransaction::HEADER_SIZE
        })
    );
}

#[test]
fn size_invalid_if_any_transaction_has_size_increased_by_one() {
    let mut bytes = aggregate_with_data_sizes(&EXTRA_SIZES, 0);
    let offset = second_transaction_offset(&bytes);
    let size = get_u32(&bytes, offset);
    set_u32(&mut bytes, offset, size + 1);

    assert!(matches!(
        check(&bytes),
        Err(ContainerError::NestedElementInvalid { index: 1, .. })
    ));
}

#[test]
fn size_invalid_if_any_inner_transaction_expands_beyond_buffer() {
    let mut bytes = aggregate_with_data_sizes(&EXTRA_SIZES, 0);
    let offset = second_transaction_offset(&bytes);
    let size = (bytes.len() - offset + 1) as u32;
    set_u32(&mut bytes, offset, size);

    assert!(matches!(
        check(&bytes),
        Err(ContainerError::RecordOverflowsRegion { offset: 56, .. })
    ));
}

#[test]
fn size_invalid_if_outer_size_is_increased_by_one() {
    let mut bytes = aggregate_with_data_sizes(&EXTRA_SIZES, 0);
    let size = get_u32(&bytes, 0);
    set_u32(&mut bytes, 0, size + 1);
    assert!(matches!(check(&bytes), Err(ContainerError::RecordOverflowsRegion { offset: 0, .. })));

    bytes.push(0);
    assert_eq!(
        check(&bytes),
        Err(ContainerError::TrailingBytesNotMultipleOfElementSize {
            trailing: 1,
            element_size: Cosignature::SIZE
        })
    );
}

#[test]
fn size_invalid_if_any_transaction_has_unknown_type() {
    let bytes = aggregate_with_data_sizes(&EXTRA_SIZES, 0);
    let aggregate = AggregateTransaction::parse(&bytes).unwrap();
    let registry = TransactionRegistry::new().with(MockTransactionPlugin::top_level_only());

    assert!(!aggregate.is_size_valid(&registry));
}

#[test]
fn size_invalid_if_any_transaction_does_not_support_embedding() {
    let mut bytes = aggregate_with_data_sizes(&EXTRA_SIZES, 0);
    let offset = second_transaction_offset(&bytes);
    set_u16(&mut bytes, offset + 46, TOP_LEVEL_MOCK_TRANSACTION_TYPE.0);

    let aggregate = AggregateTransaction::parse(&bytes).unwrap();
    let types: Vec<_> = aggregate
        .transactions()
        .iter()
        .map(|transaction| transaction.unwrap().entity_type())
        .collect();
    assert_eq!(types, vec![MOCK_TRANSACTION_TYPE, TOP_LEVEL_MOCK_TRANSACTION_TYPE, MOCK_TRANSACTION_TYPE]);
    assert!(!is_valid(&bytes));
}

#[test]
fn size_invalid_if_payload_size_is_too_large_relative_to_size() {
    let mut bytes = aggregate_with_data_sizes(&EXTRA_SIZES, 0);
    let payload_size = get_u32(&bytes, AGGREGATE_PAYLOAD_SIZE_OFFSET);
    set_u32(&mut bytes, AGGREGATE_PAYLOAD_SIZE_OFFSET, payload_size + 1);

    assert_eq!(
        check(&bytes),
        Err(ContainerError::PayloadSizeMismatch {
            payload_size: u64::from(payload_size) + 1,
            available: u64::from(payload_size)
        })
    );
}

#[test]
fn size_invalid_if_space_for_cosignatures_is_not_multiple_of_cosignature_size() {
    for extra_size in [1, 3, Cosignature::SIZE - 1] {
        let bytes = aggregate_with_trailing_bytes(&EXTRA_SIZES, 2 * Cosignature::SIZE + extra_size);

        assert!(!is_valid(&bytes), "extra size: {extra_size}");
    }
}

#[test]
fn size_valid_if_reported_size_covers_header_and_transactions() {
    let bytes = aggregate_with_data_sizes(&EXTRA_SIZES, 0);

    assert_eq!(bytes.len(), 168 + 56 + 56 + 53);
    assert!(is_valid(&bytes));
}

#[test]
fn size_valid_if_reported_size_covers_header_transactions_and_cosignatures() {
    let bytes = aggregate_with_data_sizes(&EXTRA_SIZES, 3);

    assert_eq!(bytes.len(), 168 + 56 + 56 + 53 + 3 * Cosignature::SIZE);
    assert!(is_valid(&bytes));
}

// endregion

#[test]
fn suppressing_iteration_stops_at_first_invalid_transaction() {
    let mut bytes = aggregate_with_data_sizes(&EXTRA_SIZES, 0);
    let offset = transaction_offsets(&bytes)[2];
    set_u32(&mut bytes, offset, 1);

    let aggregate = AggregateTransaction::parse(&bytes).unwrap();
    let mut transactions = aggregate.transactions_with_policy(ErrorPolicy::Suppress).iter();
    assert_eq!(transactions.by_ref().count(), 2);
    assert!(transactions.has_error());
}

#[test]
fn transactions_can_be_rewritten_in_place() {
    let mut bytes = aggregate_with_data_sizes(&EXTRA_SIZES, 1);
    for transaction in AggregateTransaction::transactions_mut(&mut bytes, ErrorPolicy::Throw).unwrap() {
        let transaction = transaction.unwrap();
        transaction[EmbeddedTransaction::HEADER_SIZE + 2..].fill(0xEE);
    }

    let aggregate = AggregateTransaction::parse(&bytes).unwrap();
    assert!(aggregate.is_size_valid(&mock_registry()));
    assert!(aggregate
        .transactions()
        .iter()
        .all(|transaction| transaction.unwrap().body()[2..].iter().all(|byte| 0xEE == *byte)));
}

#[test]
fn reader_applies_limits_after_validation() {
    let bytes = aggregate_with_data_sizes(&EXTRA_SIZES, 2);
    let registry = mock_registry();

    assert!(EntityReader::default().read_aggregate(&bytes, &registry).is_ok());

    let strict = EntityReader::new(ValidationLimits::new().max_cosignatures_per_aggregate(1));
    assert_eq!(
        strict.read_aggregate(&bytes, &registry).unwrap_err(),
        ModelError::limit_exceeded(AggregateTransaction::NAME, "cosignatures", 2, 1)
    );

    let mut corrupt = bytes.clone();
    set_u32(&mut corrupt, 0, 0);
    assert!(strict.read_aggregate(&corrupt, &registry).unwrap_err().is_malformed_input());
}
