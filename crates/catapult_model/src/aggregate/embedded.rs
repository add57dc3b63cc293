//! Embedded transaction view.

use std::fmt;

use catapult_container::{entity_eq, read_array, read_u16, SizePrefixedEntity};

use crate::types::{EntityType, Key, NetworkType};

const SIGNER_OFFSET: usize = 8;
const VERSION_OFFSET: usize = 44;
const NETWORK_OFFSET: usize = 45;
const TYPE_OFFSET: usize = 46;

/// Borrowed view over a transaction embedded in an aggregate.
///
/// ```text
///  0 Size u32 | 4 reserved u32 | 8 SignerPublicKey [32] | 40 reserved u32
/// 44 Version u8 | 45 Network u8 | 46 Type u16 | 48 body...
/// ```
#[derive(Clone, Copy)]
pub struct EmbeddedTransaction<'a> {
    bytes: &'a [u8],
}

impl<'a> SizePrefixedEntity<'a> for EmbeddedTransaction<'a> {
    const HEADER_SIZE: usize = 48;
    const NAME: &'static str = "embedded transaction";

    fn from_bytes_unchecked(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    fn bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a> EmbeddedTransaction<'a> {
    /// Returns the signer public key.
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

    /// Returns the type-specific bytes following the header, bounded by the
    /// declared size and the wrapped bytes.
    #[must_use]
    pub fn body(&self) -> &'a [u8] {
        let end = (self.size() as usize).min(self.bytes.len());
        self.bytes.get(Self::HEADER_SIZE..end).unwrap_or(&[])
    }
}

impl PartialEq for EmbeddedTransaction<'_> {
    fn eq(&self, other: &Self) -> bool {
        entity_eq(self.bytes, other.bytes)
    }
}

impl fmt::Debug for EmbeddedTransaction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedTransaction")
            .field("size", &self.size())
            .field("entity_type", &self.entity_type())
            .field("version", &self.version())
            .finish()
    }
}
