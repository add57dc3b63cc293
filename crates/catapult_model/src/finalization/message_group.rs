//! Finalization message groups.

use std::fmt;

use catapult_container::{
    entity_eq, read_array, read_u16, read_u32, read_u64, SelfSizedEntity, SizePrefixedEntity,
};

use crate::types::{Hash256, Height, TreeSignature};

const HASHES_COUNT_OFFSET: usize = 4;
const SIGNATURES_COUNT_OFFSET: usize = 6;
const STAGE_OFFSET: usize = 8;
const HEIGHT_OFFSET: usize = 12;

/// Voting stage of a finalization message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FinalizationStage {
    /// Prevote stage.
    Prevote,
    /// Precommit stage.
    Precommit,
}

impl FinalizationStage {
    /// Returns the stage encoded as `value`.
    #[must_use]
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Prevote),
            1 => Some(Self::Precommit),
            _ => None,
        }
    }

    /// Returns the wire encoding of the stage.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        match self {
            Self::Prevote => 0,
            Self::Precommit => 1,
        }
    }
}

/// Borrowed view over a group of finalization messages sharing a stage,
/// height and hash chain.
///
/// ```text
///  0 Size u32 | 4 HashesCount u16 | 6 SignaturesCount u16 | 8 Stage u32
/// 12 Height u64 | 20 hashes [32] x HashesCount | signatures [192] x SignaturesCount
/// ```
#[derive(Clone, Copy)]
pub struct MessageGroup<'a> {
    bytes: &'a [u8],
}

impl<'a> SizePrefixedEntity<'a> for MessageGroup<'a> {
    const HEADER_SIZE: usize = 20;
    const NAME: &'static str = "message group";

    fn from_bytes_unchecked(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    fn bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a> SelfSizedEntity<'a> for MessageGroup<'a> {
    fn real_size(&self) -> u64 {
        calculate_message_group_size(usize::from(self.hashes_count()), usize::from(self.signatures_count()))
    }
}

/// Size of a message group with the given counts.
#[must_use]
pub fn calculate_message_group_size(hashes_count: usize, signatures_count: usize) -> u64 {
    (MessageGroup::HEADER_SIZE + hashes_count * Hash256::SIZE + signatures_count * TreeSignature::SIZE)
        as u64
}

impl<'a> MessageGroup<'a> {
    /// Returns the number of hashes.
    #[must_use]
    pub fn hashes_count(&self) -> u16 {
        read_u16(self.bytes, HASHES_COUNT_OFFSET).unwrap_or(0)
    }

    /// Returns the number of signatures.
    #[must_use]
    pub fn signatures_count(&self) -> u16 {
        read_u16(self.bytes, SIGNATURES_COUNT_OFFSET).unwrap_or(0)
    }

    /// Returns the raw stage value.
    #[must_use]
    pub fn raw_stage(&self) -> u32 {
        read_u32(self.bytes, STAGE_OFFSET).unwrap_or(0)
    }

    /// Returns the stage, or `None` if the stage value is unknown.
    #[must_use]
    pub fn stage(&self) -> Option<FinalizationStage> {
        FinalizationStage::from_u32(self.raw_stage())
    }

    /// Returns the height of the first hash.
    #[must_use]
    pub fn height(&self) -> Height {
        Height(read_u64(self.bytes, HEIGHT_OFFSET).unwrap_or(0))
    }

    /// Returns the serialized hashes, or `None` if there are none or the
    /// declared size does not match the counts.
    #[must_use]
    pub fn hashes_bytes(&self) -> Option<&'a [u8]> {
        if 0 == self.hashes_count() {
            return None;
        }

        let start = self.payload_start()?;
        let len = usize::from(self.hashes_count()) * Hash256::SIZE;
        self.bytes.get(start..start + len)
    }

    /// Returns the hashes, or `None` if there are none or the declared size
    /// does not match the counts.
    pub fn hashes(&self) -> Option<impl ExactSizeIterator<Item = Hash256> + 'a> {
        self.hashes_bytes().map(|bytes| {
            bytes
                .chunks_exact(Hash256::SIZE)
                .map(|chunk| Hash256(read_array(chunk, 0).unwrap_or_default()))
        })
    }

    /// Returns the serialized signatures, or `None` if there are none or the
    /// declared size does not match the counts.
    #[must_use]
    pub fn signatures_bytes(&self) -> Option<&'a [u8]> {
        if 0 == self.signatures_count() {
            return None;
        }

        let start = self.payload_start()? + usize::from(self.hashes_count()) * Hash256::SIZE;
        let len = usize::from(self.signatures_count()) * TreeSignature::SIZE;
        self.bytes.get(start..start + len)
    }

    /// Returns the signatures, or `None` if there are none or the declared
    /// size does not match the counts.
    pub fn signatures(&self) -> Option<impl ExactSizeIterator<Item = TreeSignature> + 'a> {
        self.signatures_bytes().map(|bytes| {
            bytes
                .chunks_exact(TreeSignature::SIZE)
                .map(|chunk| TreeSignature(read_array(chunk, 0).unwrap_or([0; 192])))
        })
    }
}

impl PartialEq for MessageGroup<'_> {
    fn eq(&self, other: &Self) -> bool {
        entity_eq(self.bytes, other.bytes)
    }
}

impl fmt::Debug for MessageGroup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageGroup")
            .field("size", &self.size())
            .field("stage", &self.stage())
            .field("height", &self.height())
            .field("hashes_count", &self.hashes_count())
            .field("signatures_count", &self.signatures_count())
            .finish()
    }
}
