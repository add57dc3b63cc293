//! Property tests over generated and corrupted entities.

use catapult_container::{Entities, ErrorPolicy, SelfSizedEntity, SizePrefixedEntity};
use catapult_model::finalization::{create_finalization_proof, FinalizationStatistics};
use catapult_model::{AggregateTransaction, EntityReader, FinalizationProof, Hash256};
use catapult_testkit::prelude::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(PropTestConfig::default().to_proptest_config())]

    #[test]
    fn generated_regions_iterate_fully((sizes, region) in record_region_strategy(12)) {
        for policy in [ErrorPolicy::Throw, ErrorPolicy::Suppress] {
            let mut records = Entities::<TestRecord<'_>>::new(&region, policy);
            let values: Vec<u32> = records.by_ref().map(|record| record.unwrap().value()).collect();
            prop_assert_eq!(values, (1..=sizes.len() as u32).collect::<Vec<_>>());
            prop_assert!(!records.has_error());
        }
    }

    #[test]
    fn arbitrary_regions_never_panic(data in prop::collection::vec(any::<u8>(), 0..256)) {
        fuzz_cursor(&data);
    }

    #[test]
    fn generated_aggregates_are_valid(case in aggregate_strategy()) {
        let aggregate = EntityReader::default().read_aggregate(&case.bytes, &mock_registry()).unwrap();
        prop_assert_eq!(aggregate.transactions().iter().count(), case.data_sizes.len());
        prop_assert_eq!(aggregate.cosignatures_count(), case.cosignatures);
        fuzz_aggregate(&case.bytes);
    }

    #[test]
    fn corrupted_aggregates_never_panic(
        case in aggregate_strategy(),
        corruptions in prop::collection::vec(corruption_strategy(), 1..4),
    ) {
        let mut bytes = case.bytes;
        for corruption in &corruptions {
            corruption.apply(&mut bytes);
        }
        fuzz_aggregate(&bytes);
    }

    #[test]
    fn truncated_aggregates_are_rejected(case in aggregate_strategy(), cut in 1usize..64) {
        let len = case.bytes.len().saturating_sub(cut);
        if let Ok(aggregate) = AggregateTransaction::parse(&case.bytes[..len]) {
            prop_assert!(!aggregate.is_size_valid(&mock_registry()));
        }
    }

    #[test]
    fn generated_proofs_are_valid((groups, bytes) in finalization_proof_strategy()) {
        let proof = EntityReader::default().read_finalization_proof(&bytes).unwrap();
        let counts: Vec<(u16, u16)> = proof
            .message_groups()
            .iter()
            .map(|group| {
                let group = group.unwrap();
                (group.hashes_count(), group.signatures_count())
            })
            .collect();
        prop_assert_eq!(counts, groups);
        fuzz_finalization_proof(&bytes);
    }

    #[test]
    fn corrupted_proofs_never_panic(
        (_, bytes) in finalization_proof_strategy(),
        corruptions in prop::collection::vec(corruption_strategy(), 1..4),
    ) {
        let mut bytes = bytes;
        for corruption in &corruptions {
            corruption.apply(&mut bytes);
        }
        fuzz_finalization_proof(&bytes);
    }

    #[test]
    fn mutation_targets_never_panic(data in prop::collection::vec(any::<u8>(), 0..30)) {
        fuzz_aggregate_mutations(&data);
        fuzz_finalization_proof_mutations(&data);
    }

    #[test]
    fn created_proofs_hold_every_vote_of_the_round(votes in prop::collection::vec(vote_strategy(), 0..20)) {
        let statistics = FinalizationStatistics {
            round: PROOF_ROUND,
            height: PROOF_HEIGHT,
            hash: Hash256::filled(7),
        };
        let bytes = create_finalization_proof(&statistics, &votes).unwrap();
        let proof = EntityReader::default().read_finalization_proof(&bytes).unwrap();
        prop_assert_eq!(proof.size() as usize, bytes.len());

        let expected = votes.iter().filter(|vote| vote.step.round == PROOF_ROUND).count();
        let signatures: usize = proof
            .message_groups()
            .iter()
            .map(|group| usize::from(group.unwrap().signatures_count()))
            .sum();
        prop_assert_eq!(signatures, expected);

        for group in proof.message_groups() {
            prop_assert!(group.unwrap().is_size_valid());
        }
    }
}

#[test]
fn finalization_proof_parses_bare_header() {
    let bytes = finalization_proof_with_groups(&[]);
    let proof = FinalizationProof::parse(&bytes).unwrap();
    assert_eq!(proof.size() as usize, FinalizationProof::HEADER_SIZE);
    assert!(proof.is_size_valid());
}
