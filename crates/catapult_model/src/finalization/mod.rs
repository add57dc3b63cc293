//! Finalization proofs and the message groups they contain.
//!
//! A proof is an implicitly sized container: every byte after its header
//! belongs to the message group region. Message groups are self-sized, so
//! their declared size must match the size implied by their counts.

mod builder;
mod message_group;
mod proof;
mod vote;

pub use builder::{
    create_finalization_proof, FinalizationProofBuilder, MessageGroupBuilder, FINALIZATION_PROOF_VERSION,
};
pub use message_group::{calculate_message_group_size, FinalizationStage, MessageGroup};
pub use proof::FinalizationProof;
pub use vote::{FinalizationStatistics, StepIdentifier, Vote};
