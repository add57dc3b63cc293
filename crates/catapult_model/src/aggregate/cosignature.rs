//! Cosignatures trailing an aggregate transaction.

use std::iter::FusedIterator;
use std::slice::ChunksExact;

use bytes::BufMut;
use catapult_container::{read_array, read_u64};

use crate::types::{Key, Signature};

/// Signature of a cosignatory over an aggregate.
///
/// `0 Version u64 | 8 SignerPublicKey [32] | 40 Signature [64]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cosignature {
    /// Cosignature version.
    pub version: u64,
    /// Cosignatory public key.
    pub signer_public_key: Key,
    /// Cosignatory signature.
    pub signature: Signature,
}

impl Cosignature {
    /// Serialized size.
    pub const SIZE: usize = 104;

    /// Creates a version 0 cosignature.
    #[must_use]
    pub const fn new(signer_public_key: Key, signature: Signature) -> Self {
        Self {
            version: 0,
            signer_public_key,
            signature,
        }
    }

    /// Reads a cosignature from the start of `bytes`.
    #[must_use]
    pub fn read(bytes: &[u8]) -> Option<Self> {
        Some(Self {
            version: read_u64(bytes, 0)?,
            signer_public_key: Key(read_array(bytes, 8)?),
            signature: Signature(read_array(bytes, 40)?),
        })
    }

    /// Appends the serialized cosignature to `buffer`.
    pub fn write_to(&self, buffer: &mut impl BufMut) {
        buffer.put_u64_le(self.version);
        buffer.put_slice(self.signer_public_key.as_bytes());
        buffer.put_slice(self.signature.as_bytes());
    }
}

/// Iterator over the cosignatures of an aggregate.
#[derive(Debug, Clone)]
pub struct Cosignatures<'a> {
    chunks: ChunksExact<'a, u8>,
}

impl<'a> Cosignatures<'a> {
    /// Iterates the whole cosignatures in `bytes`; a partial trailing
    /// cosignature is ignored.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            chunks: bytes.chunks_exact(Cosignature::SIZE),
        }
    }
}

impl Iterator for Cosignatures<'_> {
    type Item = Cosignature;

    fn next(&mut self) -> Option<Self::Item> {
        self.chunks.next().and_then(Cosignature::read)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for Cosignatures<'_> {}

impl FusedIterator for Cosignatures<'_> {}
