//! Benchmark utilities.

use catapult_container::{padding_size, ENTITY_ALIGNMENT};
use catapult_model::aggregate::{AggregateTransactionBuilder, Cosignature};
use catapult_model::finalization::{
    create_finalization_proof, FinalizationStage, FinalizationStatistics, StepIdentifier, Vote,
};
use catapult_model::{EntityType, FinalizationRound, Hash256, Height, Key, Signature, TreeSignature};
use catapult_testkit::{mock_transaction_with_type, MOCK_TRANSACTION_TYPE};
use rand::Rng;

/// Entity type of generated aggregates.
pub const AGGREGATE_TYPE: EntityType = EntityType(0x4141);

/// Round of generated finalization proofs.
pub const ROUND: FinalizationRound = FinalizationRound::new(11, 2);

/// Generate random data of the specified size.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

fn random_array<const N: usize>() -> [u8; N] {
    let mut bytes = [0; N];
    rand::thread_rng().fill(&mut bytes[..]);
    bytes
}

/// Generate a region of `count` records with random sizes in `8..max_size`.
///
/// Every record stores its size in the leading `u32`.
pub fn random_record_region(count: usize, max_size: u32) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    let sizes: Vec<u32> = (0..count).map(|_| rng.gen_range(8..max_size.max(9))).collect();

    let mut region = Vec::new();
    for (i, size) in sizes.iter().enumerate() {
        let start = region.len();
        region.extend_from_slice(&size.to_le_bytes());
        region.extend(random_data(*size as usize - 4));
        if i + 1 < sizes.len() {
            let padding = padding_size(region.len() - start, ENTITY_ALIGNMENT);
            region.resize(region.len() + padding, 0);
        }
    }
    region
}

/// Generate an aggregate of `transactions` mock transactions carrying up to
/// `max_data_size` random bytes each, followed by `cosignatures` cosignatures.
pub fn random_aggregate(transactions: usize, max_data_size: u16, cosignatures: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    let mut builder = AggregateTransactionBuilder::new(AGGREGATE_TYPE);
    for _ in 0..transactions {
        let data = random_data(usize::from(rng.gen_range(0..=max_data_size)));
        builder = builder.transaction(mock_transaction_with_type(MOCK_TRANSACTION_TYPE, &data).expect("mock data fits"));
    }
    for _ in 0..cosignatures {
        builder = builder.cosignature(Cosignature::new(
            Key::from_bytes(random_array()),
            Signature::from_bytes(random_array()),
        ));
    }
    builder.build().expect("aggregate fits")
}

/// Generate `count` votes of the benchmark round spread over a few groups.
pub fn random_votes(count: usize, groups: u64) -> Vec<Vote> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let height = rng.gen_range(0..groups.max(1));
            Vote {
                step: StepIdentifier {
                    round: ROUND,
                    stage: if rng.gen() {
                        FinalizationStage::Precommit
                    } else {
                        FinalizationStage::Prevote
                    },
                },
                height: Height(height),
                hashes: vec![Hash256::filled(height as u8)],
                signature: TreeSignature::from_bytes(random_array()),
            }
        })
        .collect()
}

/// Generate a finalization proof holding `votes` votes.
pub fn random_finalization_proof(votes: usize, groups: u64) -> Vec<u8> {
    let statistics = FinalizationStatistics {
        round: ROUND,
        height: Height(groups),
        hash: Hash256::from_bytes(random_array()),
    };
    create_finalization_proof(&statistics, &random_votes(votes, groups)).expect("proof fits")
}
