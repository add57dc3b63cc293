//! Fuzz testing harnesses.
//!
//! Each target accepts arbitrary bytes and must never panic. Targets also
//! assert the invariants that hold whenever validation succeeds, so they can
//! be driven by cargo-fuzz or by proptest.

use catapult_container::{
    Entities, EntitiesMut, EntityContainer, ErrorPolicy, HasPayloadSize, SizePrefixedEntity,
};
use catapult_model::aggregate::Cosignature;
use catapult_model::{AggregateTransaction, EntityReader, FinalizationProof, ValidationLimits};

use crate::fixtures::{aggregate_with_data_sizes, finalization_proof_with_groups, TestRecord};
use crate::mocks::mock_registry;

/// Fuzz target for raw region iteration.
///
/// Checks that:
/// - `Throw` yields at most one error, as its last item
/// - `Suppress` yields only entities and records the same error
/// - the mutable iterator visits the same entities
pub fn fuzz_cursor(data: &[u8]) {
    let throwing: Vec<_> = Entities::<TestRecord<'_>>::new(data, ErrorPolicy::Throw).collect();
    let errors = throwing.iter().filter(|item| item.is_err()).count();
    assert!(errors <= 1, "throwing iteration yielded {errors} errors");
    if errors == 1 {
        assert!(throwing.last().is_some_and(Result::is_err), "error was not the last item");
    }

    let mut suppressing = Entities::<TestRecord<'_>>::new(data, ErrorPolicy::Suppress);
    let values: Vec<u32> = suppressing
        .by_ref()
        .map(|record| record.map_or(0, |record| record.value()))
        .collect();
    assert_eq!(values.len(), throwing.len() - errors, "policies disagree on entity count");
    assert_eq!(suppressing.has_error(), errors == 1, "policies disagree on failure");

    let mut copy = data.to_vec();
    let mut mutable = EntitiesMut::new(&mut copy, TestRecord::HEADER_SIZE, ErrorPolicy::Suppress);
    let visited = mutable.by_ref().filter(Result::is_ok).count();
    assert_eq!(visited, values.len(), "mutable iteration disagrees on entity count");
    assert_eq!(mutable.has_error(), errors == 1, "mutable iteration disagrees on failure");
}

/// Fuzz target for aggregate validation.
pub fn fuzz_aggregate(data: &[u8]) {
    let Ok(aggregate) = AggregateTransaction::parse(data) else {
        return;
    };

    let registry = mock_registry();
    let valid = aggregate.is_size_valid(&registry);
    let _ = aggregate.cosignatures().map(Iterator::count);
    let _ = aggregate.transactions_with_policy(ErrorPolicy::Suppress).iter().count();

    let read = EntityReader::new(ValidationLimits::unbounded()).read_aggregate(data, &registry);
    assert_eq!(valid, read.is_ok(), "reader disagrees with validation");
    if !valid {
        return;
    }

    assert!(
        aggregate.transactions().iter().all(|transaction| transaction.is_ok()),
        "valid aggregate yielded an iteration error"
    );

    let trailing = aggregate.cosignatures_count() * Cosignature::SIZE;
    assert_eq!(
        aggregate.container_header_size() + aggregate.payload_size() as usize + trailing,
        aggregate.size() as usize,
        "valid aggregate does not account for every byte"
    );
}

/// Fuzz target for finalization proof validation.
pub fn fuzz_finalization_proof(data: &[u8]) {
    let Ok(proof) = FinalizationProof::parse(data) else {
        return;
    };

    let valid = proof.is_size_valid();
    let _ = proof.message_groups_with_policy(ErrorPolicy::Suppress).iter().count();

    let read = EntityReader::new(ValidationLimits::unbounded()).read_finalization_proof(data);
    assert_eq!(valid, read.is_ok(), "reader disagrees with validation");
    if !valid {
        return;
    }

    for group in proof.message_groups() {
        assert!(group.is_ok(), "valid proof yielded an iteration error");
        let Ok(group) = group else {
            continue;
        };

        assert_eq!(group.hashes().map_or(0, |hashes| hashes.len()), usize::from(group.hashes_count()));
        assert_eq!(
            group.signatures().map_or(0, |signatures| signatures.len()),
            usize::from(group.signatures_count())
        );
    }
}

/// Fuzz target that overwrites bytes of a well-formed aggregate.
///
/// `data` is consumed as `(position, value)` pairs.
pub fn fuzz_aggregate_mutations(data: &[u8]) {
    let mut bytes = aggregate_with_data_sizes(&[1, 2, 3], 2);
    apply_mutations(&mut bytes, data);
    fuzz_aggregate(&bytes);
}

/// Fuzz target that overwrites bytes of a well-formed finalization proof.
///
/// `data` is consumed as `(position, value)` pairs.
pub fn fuzz_finalization_proof_mutations(data: &[u8]) {
    let mut bytes = finalization_proof_with_groups(&[(3, 1), (1, 2), (2, 1)]);
    apply_mutations(&mut bytes, data);
    fuzz_finalization_proof(&bytes);
}

fn apply_mutations(bytes: &mut [u8], data: &[u8]) {
    if bytes.is_empty() {
        return;
    }

    for pair in data.chunks_exact(3) {
        let position = usize::from(u16::from_le_bytes([pair[0], pair[1]])) % bytes.len();
        bytes[position] = pair[2];
    }
}
