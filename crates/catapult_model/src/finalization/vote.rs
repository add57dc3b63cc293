//! Finalization votes and statistics consumed by proof creation.

use super::FinalizationStage;
use crate::types::{FinalizationRound, Hash256, Height, TreeSignature};

/// Identifies the voting step a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepIdentifier {
    /// Voting round.
    pub round: FinalizationRound,
    /// Voting stage.
    pub stage: FinalizationStage,
}

/// Summary of a finalized block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalizationStatistics {
    /// Round that finalized the block.
    pub round: FinalizationRound,
    /// Finalized height.
    pub height: Height,
    /// Finalized block hash.
    pub hash: Hash256,
}

/// A single signed finalization vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    /// Step the vote was cast in.
    pub step: StepIdentifier,
    /// Height of the first voted hash.
    pub height: Height,
    /// Voted hash chain starting at `height`.
    pub hashes: Vec<Hash256>,
    /// Voter signature.
    pub signature: TreeSignature,
}
