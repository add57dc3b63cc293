//! Builders serializing message groups and finalization proofs.

use bytes::BufMut;
use catapult_container::{calculate_container_size, padding_size, SizePrefixedEntity, ENTITY_ALIGNMENT};
use tracing::trace;

use super::{
    calculate_message_group_size, FinalizationProof, FinalizationStage, FinalizationStatistics, MessageGroup,
    Vote,
};
use crate::error::{ModelError, ModelResult};
use crate::types::{FinalizationRound, Hash256, Height, TreeSignature};

/// Proof format version written by [`FinalizationProofBuilder`].
pub const FINALIZATION_PROOF_VERSION: u32 = 1;

/// Builds a message group.
#[derive(Debug, Clone)]
pub struct MessageGroupBuilder {
    stage: FinalizationStage,
    height: Height,
    hashes: Vec<Hash256>,
    signatures: Vec<TreeSignature>,
}

impl MessageGroupBuilder {
    /// Creates a builder for a group without hashes or signatures.
    #[must_use]
    pub fn new(stage: FinalizationStage, height: Height) -> Self {
        Self {
            stage,
            height,
            hashes: Vec::new(),
            signatures: Vec::new(),
        }
    }

    /// Appends a hash.
    #[must_use]
    pub fn hash(mut self, hash: Hash256) -> Self {
        self.hashes.push(hash);
        self
    }

    /// Appends hashes.
    #[must_use]
    pub fn hashes(mut self, hashes: impl IntoIterator<Item = Hash256>) -> Self {
        self.hashes.extend(hashes);
        self
    }

    /// Appends a signature.
    #[must_use]
    pub fn signature(mut self, signature: TreeSignature) -> Self {
        self.signatures.push(signature);
        self
    }

    /// Serializes the group.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::LimitExceeded`] if a count does not fit in its
    /// `u16` field, or [`ModelError::BuilderOverflow`] if the group does not
    /// fit in its size field.
    pub fn build(&self) -> ModelResult<Vec<u8>> {
        let hashes_count = count_field("hashes", self.hashes.len())?;
        let signatures_count = count_field("signatures", self.signatures.len())?;
        let size = calculate_message_group_size(self.hashes.len(), self.signatures.len());
        let size = u32::try_from(size).map_err(|_| ModelError::BuilderOverflow {
            entity: MessageGroup::NAME,
            size,
        })?;

        let mut buffer = Vec::with_capacity(size as usize);
        buffer.put_u32_le(size);
        buffer.put_u16_le(hashes_count);
        buffer.put_u16_le(signatures_count);
        buffer.put_u32_le(self.stage.as_u32());
        buffer.put_u64_le(self.height.0);
        for hash in &self.hashes {
            buffer.put_slice(hash.as_bytes());
        }

        for signature in &self.signatures {
            buffer.put_slice(signature.as_bytes());
        }

        Ok(buffer)
    }
}

fn count_field(item: &'static str, count: usize) -> ModelResult<u16> {
    u16::try_from(count)
        .map_err(|_| ModelError::limit_exceeded(MessageGroup::NAME, item, count, usize::from(u16::MAX)))
}

/// Builds a finalization proof from serialized message groups.
#[derive(Debug, Clone)]
pub struct FinalizationProofBuilder {
    round: FinalizationRound,
    height: Height,
    hash: Hash256,
    message_groups: Vec<Vec<u8>>,
}

impl FinalizationProofBuilder {
    /// Creates a builder for a proof of the block at `height` with `hash`.
    #[must_use]
    pub fn new(round: FinalizationRound, height: Height, hash: Hash256) -> Self {
        Self {
            round,
            height,
            hash,
            message_groups: Vec::new(),
        }
    }

    /// Appends a serialized message group.
    #[must_use]
    pub fn message_group(mut self, message_group: Vec<u8>) -> Self {
        self.message_groups.push(message_group);
        self
    }

    /// Serializes the proof.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::BuilderOverflow`] if the proof does not fit in
    /// its size field.
    pub fn build(&self) -> ModelResult<Vec<u8>> {
        let size = calculate_container_size(
            FinalizationProof::HEADER_SIZE,
            self.message_groups.iter().map(Vec::len),
            0,
        );
        let size = u32::try_from(size).map_err(|_| ModelError::BuilderOverflow {
            entity: FinalizationProof::NAME,
            size,
        })?;

        let mut buffer = Vec::with_capacity(size as usize);
        buffer.put_u32_le(size);
        buffer.put_u32_le(FINALIZATION_PROOF_VERSION);
        buffer.put_u32_le(self.round.epoch.0);
        buffer.put_u32_le(self.round.point.0);
        buffer.put_u64_le(self.height.0);
        buffer.put_slice(self.hash.as_bytes());

        let count = self.message_groups.len();
        for (i, message_group) in self.message_groups.iter().enumerate() {
            buffer.put_slice(message_group);
            if i + 1 != count {
                buffer.put_bytes(0, padding_size(message_group.len(), ENTITY_ALIGNMENT));
            }
        }

        Ok(buffer)
    }
}

/// Creates a proof for `statistics` from the collected `votes`.
///
/// Votes cast in a different round are skipped. Votes sharing stage, height
/// and hashes are merged into a single message group, in first-seen order,
/// with their signatures appended in vote order.
///
/// # Errors
///
/// Fails if a message group or the proof cannot be serialized.
pub fn create_finalization_proof(statistics: &FinalizationStatistics, votes: &[Vote]) -> ModelResult<Vec<u8>> {
    let mut groups: Vec<MessageGroupBuilder> = Vec::new();
    for vote in votes {
        if vote.step.round != statistics.round {
            trace!(
                expected = %statistics.round,
                actual = %vote.step.round,
                "skipping vote from other round"
            );
            continue;
        }

        let existing = groups.iter_mut().find(|group| {
            group.stage == vote.step.stage && group.height == vote.height && group.hashes == vote.hashes
        });

        match existing {
            Some(group) => group.signatures.push(vote.signature),
            None => groups.push(
                MessageGroupBuilder::new(vote.step.stage, vote.height)
                    .hashes(vote.hashes.iter().copied())
                    .signature(vote.signature),
            ),
        }
    }

    let mut builder = FinalizationProofBuilder::new(statistics.round, statistics.height, statistics.hash);
    for group in &groups {
        builder = builder.message_group(group.build()?);
    }

    builder.build()
}
