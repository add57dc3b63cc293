//! Aggregate transactions.
//!
//! An aggregate carries an explicit `PayloadSize`. Its element region holds
//! embedded transactions, padded to 8 bytes except the last one; the bytes
//! between the payload end and `Size` are a flat array of cosignatures.

mod builder;
mod cosignature;
mod embedded;
mod registry;

pub use builder::{AggregateTransactionBuilder, EmbeddedTransactionBuilder};
pub use cosignature::{Cosignature, Cosignatures};
pub use embedded::EmbeddedTransaction;
pub use registry::{
    EmbeddedSizeValidator, EmbeddedTransactionPlugin, FixedSizeTransactionPlugin,
    TransactionRegistry,
};

use std::fmt;

use catapult_container::{
    check_size, entity_eq, read_array, read_u16, read_u32, read_u64, ContainerResult,
    ContainerView, EntitiesMut, EntityContainer, ErrorPolicy, ExplicitPayloadSize, HasPayloadSize,
    SizePrefixedEntity,
};
use tracing::debug;

use crate::error::ModelResult;
use crate::types::{Amount, EntityType, Hash256, Key, NetworkType, Signature, Timestamp};

pub(crate) const SIGNATURE_OFFSET: usize = 8;
pub(crate) const SIGNER_OFFSET: usize = 72;
pub(crate) const VERSION_OFFSET: usize = 108;
pub(crate) const NETWORK_OFFSET: usize = 109;
pub(crate) const TYPE_OFFSET: usize = 110;
pub(crate) const MAX_FEE_OFFSET: usize = 112;
pub(crate) const DEADLINE_OFFSET: usize = 120;
pub(crate) const TRANSACTIONS_HASH_OFFSET: usize = 128;
pub(crate) const PAYLOAD_SIZE_OFFSET: usize = 160;

/// Borrowed view over an aggregate transaction.
///
/// ```text
///   0 Size u32 | 4 reserved u32 | 8 Signature [64] | 72 SignerPublicKey [32]
/// 104 reserved u32 | 108 Version u8 | 109 Network u8 | 110 Type u16
/// 112 MaxFee u64 | 120 Deadline u64 | 128 TransactionsHash [32]
/// 160 PayloadSize u32 | 164 reserved u32 | 168 transactions... cosignatures...
/// ```
#[derive(Clone, Copy)]
pub struct AggregateTransaction<'a> {
    bytes: &'a [u8],
}

impl<'a> SizePrefixedEntity<'a> for AggregateTransaction<'a> {
    const HEADER_SIZE: usize = 168;
    const NAME: &'static str = "aggregate transaction";

    fn from_bytes_unchecked(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    fn bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl HasPayloadSize for AggregateTransaction<'_> {
    fn payload_size(&self) -> u32 {
        read_u32(self.bytes, PAYLOAD_SIZE_OFFSET).unwrap_or(0)
    }
}

impl<'a> EntityContainer<'a> for AggregateTransaction<'a> {
    type Element = EmbeddedTransaction<'a>;
    type Sizing = ExplicitPayloadSize;

    const TRAILING_ELEMENT_SIZE: usize = Cosignature::SIZE;
}

impl<'a> AggregateTransaction<'a> {
    /// Returns the signature of the aggregate signer.
    #[must_use]
    pub fn signature(&self) -> Signature {
        Signature(read_array(self.bytes, SIGNATURE_OFFSET).unwrap_or([0; 64]))
    }

    /// Returns the aggregate signer public key.
    #[must_use]
    pub fn signer_public_key(&self) -> Key {
        Key(read_array(self.bytes, SIGNER_OFFSET).unwrap_or_default())
    }

    /// Returns the transaction version.
    #[must_use]
    pub fn version(&self) -> u8 {
        self.bytes.get(VERSION_OFFSET).copied().unwrap_or(0)
    }

    /// Returns the network type.
    #[must_use]
    pub fn network(&self) -> NetworkType {
        NetworkType(self.bytes.get(NETWORK_OFFSET).copied().unwrap_or(0))
    }

    /// Returns the transaction type.
    #[must_use]
    pub fn entity_type(&self) -> EntityType {
        EntityType(read_u16(self.bytes, TYPE_OFFSET).unwrap_or(0))
    }

    /// Returns the maximum fee.
    #[must_use]
    pub fn max_fee(&self) -> Amount {
        Amount(read_u64(self.bytes, MAX_FEE_OFFSET).unwrap_or(0))
    }

    /// Returns the deadline.
    #[must_use]
    pub fn deadline(&self) -> Timestamp {
        Timestamp(read_u64(self.bytes, DEADLINE_OFFSET).unwrap_or(0))
    }

    /// Returns the hash of the embedded transactions.
    #[must_use]
    pub fn transactions_hash(&self) -> Hash256 {
        Hash256(read_array(self.bytes, TRANSACTIONS_HASH_OFFSET).unwrap_or_default())
    }

    /// Returns the embedded transactions.
    ///
    /// Iteration reports malformed transactions as errors; use
    /// [`transactions_with_policy`](Self::transactions_with_policy) to
    /// tolerate them.
    #[must_use]
    pub fn transactions(&self) -> ContainerView<'a, EmbeddedTransaction<'a>> {
        self.elements()
    }

    /// Returns the embedded transactions using `policy`.
    #[must_use]
    pub fn transactions_with_policy(
        &self,
        policy: ErrorPolicy,
    ) -> ContainerView<'a, EmbeddedTransaction<'a>> {
        self.elements_with_policy(policy)
    }

    /// Returns the number of whole cosignatures following the payload.
    ///
    /// Trusts `PayloadSize`; a partial trailing cosignature is not counted.
    #[must_use]
    pub fn cosignatures_count(&self) -> usize {
        self.trailing_bytes()
            .map_or(0, |trailing| trailing.len() / Cosignature::SIZE)
    }

    /// Returns the cosignatures, or `None` if there are none.
    #[must_use]
    pub fn cosignatures(&self) -> Option<Cosignatures<'a>> {
        if 0 == self.cosignatures_count() {
            return None;
        }

        self.trailing_bytes().map(Cosignatures::new)
    }

    /// Checks that the aggregate and its embedded transactions are size-valid.
    ///
    /// # Errors
    ///
    /// Returns the first structural violation found.
    pub fn check_size<V>(&self, validator: &V) -> ContainerResult<()>
    where
        V: EmbeddedSizeValidator + ?Sized,
    {
        check_size(self, |transaction| validator.is_embedded_size_valid(transaction))
    }

    /// Returns `true` if the aggregate and its embedded transactions are size-valid.
    #[must_use]
    pub fn is_size_valid<V>(&self, validator: &V) -> bool
    where
        V: EmbeddedSizeValidator + ?Sized,
    {
        match self.check_size(validator) {
            Ok(()) => true,
            Err(error) => {
                debug!(error = %error, "aggregate transaction failed size validation");
                false
            }
        }
    }

    /// Returns a mutable iterator over the embedded transactions of the
    /// aggregate stored in `buffer`.
    ///
    /// # Errors
    ///
    /// Fails if `buffer` is not an aggregate or if its declared payload does
    /// not fit, regardless of `policy`.
    pub fn transactions_mut(buffer: &mut [u8], policy: ErrorPolicy) -> ModelResult<EntitiesMut<'_>> {
        let range = {
            let aggregate = AggregateTransaction::parse(buffer)?;
            let view = aggregate.elements();
            if let Some(error) = view.overflow_error() {
                return Err(error.into());
            }

            let start = aggregate.container_header_size();
            start..start + view.region().map_or(0, <[u8]>::len)
        };

        Ok(EntitiesMut::new(
            &mut buffer[range],
            EmbeddedTransaction::HEADER_SIZE,
            policy,
        ))
    }
}

impl PartialEq for AggregateTransaction<'_> {
    fn eq(&self, other: &Self) -> bool {
        entity_eq(self.bytes, other.bytes)
    }
}

impl fmt::Debug for AggregateTransaction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregateTransaction")
            .field("size", &self.size())
            .field("payload_size", &self.payload_size())
            .field("entity_type", &self.entity_type())
            .field("cosignatures_count", &self.cosignatures_count())
            .finish()
    }
}
