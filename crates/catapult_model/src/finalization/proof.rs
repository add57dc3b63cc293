//! Finalization proofs.

use std::fmt;

use catapult_container::{
    check_size, entity_eq, read_array, read_u32, read_u64, ContainerResult, ContainerView,
    EntitiesMut, EntityContainer, ErrorPolicy, ImplicitPayloadSize, SelfSizedEntity,
    SizePrefixedEntity,
};
use tracing::debug;

use super::MessageGroup;
use crate::error::ModelResult;
use crate::types::{FinalizationRound, Hash256, Height};

const VERSION_OFFSET: usize = 4;
const EPOCH_OFFSET: usize = 8;
const POINT_OFFSET: usize = 12;
const HEIGHT_OFFSET: usize = 16;
const HASH_OFFSET: usize = 24;

/// Borrowed view over a finalization proof.
///
/// The element region spans everything after the header, so the proof is
/// implicitly sized.
///
/// ```text
///  0 Size u32 | 4 Version u32 | 8 Epoch u32 | 12 Point u32 | 16 Height u64
/// 24 Hash [32] | 56 message groups...
/// ```
#[derive(Clone, Copy)]
pub struct FinalizationProof<'a> {
    bytes: &'a [u8],
}

impl<'a> SizePrefixedEntity<'a> for FinalizationProof<'a> {
    const HEADER_SIZE: usize = 56;
    const NAME: &'static str = "finalization proof";

    fn from_bytes_unchecked(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    fn bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a> EntityContainer<'a> for FinalizationProof<'a> {
    type Element = MessageGroup<'a>;
    type Sizing = ImplicitPayloadSize;
}

impl<'a> FinalizationProof<'a> {
    /// Returns the proof format version.
    #[must_use]
    pub fn version(&self) -> u32 {
        read_u32(self.bytes, VERSION_OFFSET).unwrap_or(0)
    }

    /// Returns the finalized round.
    #[must_use]
    pub fn round(&self) -> FinalizationRound {
        FinalizationRound::new(
            read_u32(self.bytes, EPOCH_OFFSET).unwrap_or(0),
            read_u32(self.bytes, POINT_OFFSET).unwrap_or(0),
        )
    }

    /// Returns the finalized height.
    #[must_use]
    pub fn height(&self) -> Height {
        Height(read_u64(self.bytes, HEIGHT_OFFSET).unwrap_or(0))
    }

    /// Returns the finalized block hash.
    #[must_use]
    pub fn hash(&self) -> Hash256 {
        Hash256(read_array(self.bytes, HASH_OFFSET).unwrap_or_default())
    }

    /// Returns the message groups.
    #[must_use]
    pub fn message_groups(&self) -> ContainerView<'a, MessageGroup<'a>> {
        self.elements()
    }

    /// Returns the message groups using `policy`.
    #[must_use]
    pub fn message_groups_with_policy(&self, policy: ErrorPolicy) -> ContainerView<'a, MessageGroup<'a>> {
        self.elements_with_policy(policy)
    }

    /// Checks that the proof and all of its message groups are size-valid.
    ///
    /// # Errors
    ///
    /// Returns the first structural violation found.
    pub fn check_size(&self) -> ContainerResult<()> {
        check_size(self, |group| group.is_size_valid())
    }

    /// Returns `true` if the proof and all of its message groups are size-valid.
    #[must_use]
    pub fn is_size_valid(&self) -> bool {
        match self.check_size() {
            Ok(()) => true,
            Err(error) => {
                debug!(round = %self.round(), error = %error, "finalization proof failed size validation");
                false
            }
        }
    }

    /// Returns a mutable iterator over the message groups of the proof
    /// stored in `buffer`.
    ///
    /// # Errors
    ///
    /// Fails if `buffer` is not a proof or if its declared size exceeds the
    /// buffer, regardless of `policy`.
    pub fn message_groups_mut(buffer: &mut [u8], policy: ErrorPolicy) -> ModelResult<EntitiesMut<'_>> {
        let range = {
            let proof = FinalizationProof::parse(buffer)?;
            let view = proof.elements();
            if let Some(error) = view.overflow_error() {
                return Err(error.into());
            }

            let start = proof.container_header_size();
            start..start + view.region().map_or(0, <[u8]>::len)
        };

        Ok(EntitiesMut::new(&mut buffer[range], MessageGroup::HEADER_SIZE, policy))
    }
}

impl PartialEq for FinalizationProof<'_> {
    fn eq(&self, other: &Self) -> bool {
        entity_eq(self.bytes, other.bytes)
    }
}

impl fmt::Debug for FinalizationProof<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinalizationProof")
            .field("size", &self.size())
            .field("version", &self.version())
            .field("round", &self.round())
            .field("height", &self.height())
            .finish()
    }
}
