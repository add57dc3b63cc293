//! Property-based test generators using proptest.
//!
//! Provides strategies for generating well-formed entities, together with
//! corruptions that keep the buffer length intact.

use catapult_model::finalization::{FinalizationStage, StepIdentifier, Vote};
use catapult_model::{FinalizationRound, Hash256, Height, TreeSignature};
use proptest::prelude::*;

use crate::fixtures::{aggregate_with_data_sizes, finalization_proof_with_groups, record_region, PROOF_ROUND};

/// Strategy for record sizes that form a valid region.
pub fn record_sizes_strategy(max_records: usize) -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(8u32..96, 0..max_records)
}

/// Strategy for a valid record region together with its sizes.
pub fn record_region_strategy(max_records: usize) -> impl Strategy<Value = (Vec<u32>, Vec<u8>)> {
    record_sizes_strategy(max_records).prop_map(|sizes| {
        let region = record_region(&sizes);
        (sizes, region)
    })
}

/// Strategy for mock transaction data sizes.
pub fn data_sizes_strategy() -> impl Strategy<Value = Vec<u16>> {
    prop::collection::vec(0u16..64, 0..6)
}

/// Description of a generated aggregate.
#[derive(Debug, Clone)]
pub struct AggregateCase {
    /// Data sizes of the mock transactions.
    pub data_sizes: Vec<u16>,
    /// Number of cosignatures.
    pub cosignatures: usize,
    /// Serialized aggregate.
    pub bytes: Vec<u8>,
}

/// Strategy for well-formed aggregates of mock transactions.
pub fn aggregate_strategy() -> impl Strategy<Value = AggregateCase> {
    (data_sizes_strategy(), 0usize..4).prop_map(|(data_sizes, cosignatures)| {
        let bytes = aggregate_with_data_sizes(&data_sizes, cosignatures);
        AggregateCase {
            data_sizes,
            cosignatures,
            bytes,
        }
    })
}

/// Strategy for `(hashes, signatures)` counts of message groups.
pub fn message_group_counts_strategy() -> impl Strategy<Value = Vec<(u16, u16)>> {
    prop::collection::vec((0u16..5, 0u16..4), 0..5)
}

/// Strategy for well-formed finalization proofs with their group counts.
pub fn finalization_proof_strategy() -> impl Strategy<Value = (Vec<(u16, u16)>, Vec<u8>)> {
    message_group_counts_strategy().prop_map(|groups| {
        let bytes = finalization_proof_with_groups(&groups);
        (groups, bytes)
    })
}

/// Strategy for votes drawn from a small space so that some of them share
/// a message group and some are cast in a different round.
pub fn vote_strategy() -> impl Strategy<Value = Vote> {
    (
        prop::bool::weighted(0.8),
        prop::bool::ANY,
        0u64..3,
        prop::collection::vec(0u8..3, 1..3),
        any::<u8>(),
    )
        .prop_map(|(same_round, precommit, height, hashes, signature)| Vote {
            step: StepIdentifier {
                round: if same_round {
                    PROOF_ROUND
                } else {
                    FinalizationRound::new(PROOF_ROUND.epoch.0, PROOF_ROUND.point.0 + 1)
                },
                stage: if precommit {
                    FinalizationStage::Precommit
                } else {
                    FinalizationStage::Prevote
                },
            },
            height: Height(height),
            hashes: hashes.into_iter().map(Hash256::filled).collect(),
            signature: TreeSignature::filled(signature),
        })
}

/// A single byte overwrite applied to a buffer.
#[derive(Debug, Clone, Copy)]
pub struct Corruption {
    /// Position as a fraction of the buffer length.
    pub position: f64,
    /// Replacement byte.
    pub value: u8,
}

impl Corruption {
    /// Applies the corruption to `bytes`.
    pub fn apply(&self, bytes: &mut [u8]) {
        if bytes.is_empty() {
            return;
        }

        let index = ((bytes.len() as f64 * self.position) as usize).min(bytes.len() - 1);
        bytes[index] = self.value;
    }
}

/// Strategy for byte corruptions.
pub fn corruption_strategy() -> impl Strategy<Value = Corruption> {
    (0.0f64..1.0, any::<u8>()).prop_map(|(position, value)| Corruption { position, value })
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catapult_container::{align_up, padding_size, SizePrefixedEntity};
    use catapult_model::{AggregateTransaction, FinalizationProof};

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn record_regions_have_expected_length((sizes, region) in record_region_strategy(8)) {
            let padded: usize = sizes.iter().map(|size| align_up(*size as usize)).sum();
            let last_padding = sizes.last().map_or(0, |size| padding_size(*size as usize, 8));
            prop_assert_eq!(region.len(), padded - last_padding);
        }

        #[test]
        fn aggregates_declare_their_length(case in aggregate_strategy()) {
            let aggregate = AggregateTransaction::parse(&case.bytes).unwrap();
            prop_assert_eq!(aggregate.size() as usize, case.bytes.len());
            prop_assert_eq!(aggregate.cosignatures_count(), case.cosignatures);
        }

        #[test]
        fn proofs_declare_their_length((_, bytes) in finalization_proof_strategy()) {
            let proof = FinalizationProof::parse(&bytes).unwrap();
            prop_assert_eq!(proof.size() as usize, bytes.len());
        }

        #[test]
        fn corruption_keeps_length(case in aggregate_strategy(), corruption in corruption_strategy()) {
            let mut bytes = case.bytes.clone();
            corruption.apply(&mut bytes);
            prop_assert_eq!(bytes.len(), case.bytes.len());
        }
    }
}
