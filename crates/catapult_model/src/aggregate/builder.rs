//! Builders serializing embedded and aggregate transactions.

use bytes::BufMut;
use catapult_container::{calculate_container_size, padding_size, SizePrefixedEntity, ENTITY_ALIGNMENT};

use super::{AggregateTransaction, Cosignature, EmbeddedTransaction};
use crate::error::{ModelError, ModelResult};
use crate::types::{Amount, EntityType, Hash256, Key, NetworkType, Signature, Timestamp};

fn checked_size(entity: &'static str, size: u64) -> ModelResult<u32> {
    u32::try_from(size).map_err(|_| ModelError::BuilderOverflow { entity, size })
}

/// Builds an embedded transaction.
#[derive(Debug, Clone)]
pub struct EmbeddedTransactionBuilder {
    signer_public_key: Key,
    version: u8,
    network: NetworkType,
    entity_type: EntityType,
    body: Vec<u8>,
}

impl EmbeddedTransactionBuilder {
    /// Creates a builder for a transaction of `entity_type` with an empty body.
    #[must_use]
    pub fn new(entity_type: EntityType) -> Self {
        Self {
            signer_public_key: Key::default(),
            version: 1,
            network: NetworkType::default(),
            entity_type,
            body: Vec::new(),
        }
    }

    /// Sets the signer public key.
    #[must_use]
    pub fn signer_public_key(mut self, key: Key) -> Self {
        self.signer_public_key = key;
        self
    }

    /// Sets the version.
    #[must_use]
    pub fn version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    /// Sets the network type.
    #[must_use]
    pub fn network(mut self, network: NetworkType) -> Self {
        self.network = network;
        self
    }

    /// Sets the type-specific body.
    #[must_use]
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Serializes the transaction.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::BuilderOverflow`] if the transaction does not fit
    /// in its size field.
    pub fn build(&self) -> ModelResult<Vec<u8>> {
        let size = (EmbeddedTransaction::HEADER_SIZE + self.body.len()) as u64;
        let size = checked_size(EmbeddedTransaction::NAME, size)?;

        let mut buffer = Vec::with_capacity(size as usize);
        buffer.put_u32_le(size);
        buffer.put_u32_le(0);
        buffer.put_slice(self.signer_public_key.as_bytes());
        buffer.put_u32_le(0);
        buffer.put_u8(self.version);
        buffer.put_u8(self.network.0);
        buffer.put_u16_le(self.entity_type.0);
        buffer.put_slice(&self.body);
        Ok(buffer)
    }
}

/// Builds an aggregate transaction from serialized embedded transactions.
///
/// `PayloadSize` and `Size` are computed from the parts; embedded transactions
/// are padded to 8 bytes except the last one.
#[derive(Debug, Clone)]
pub struct AggregateTransactionBuilder {
    signature: Signature,
    signer_public_key: Key,
    version: u8,
    network: NetworkType,
    entity_type: EntityType,
    max_fee: Amount,
    deadline: Timestamp,
    transactions_hash: Hash256,
    transactions: Vec<Vec<u8>>,
    cosignatures: Vec<Cosignature>,
}

impl AggregateTransactionBuilder {
    /// Creates a builder for an aggregate of `entity_type`.
    #[must_use]
    pub fn new(entity_type: EntityType) -> Self {
        Self {
            signature: Signature::default(),
            signer_public_key: Key::default(),
            version: 1,
            network: NetworkType::default(),
            entity_type,
            max_fee: Amount::default(),
            deadline: Timestamp::default(),
            transactions_hash: Hash256::default(),
            transactions: Vec::new(),
            cosignatures: Vec::new(),
        }
    }

    /// Sets the aggregate signature.
    #[must_use]
    pub fn signature(mut self, signature: Signature) -> Self {
        self.signature = signature;
        self
    }

    /// Sets the signer public key.
    #[must_use]
    pub fn signer_public_key(mut self, key: Key) -> Self {
        self.signer_public_key = key;
        self
    }

    /// Sets the version.
    #[must_use]
    pub fn version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    /// Sets the network type.
    #[must_use]
    pub fn network(mut self, network: NetworkType) -> Self {
        self.network = network;
        self
    }

    /// Sets the maximum fee.
    #[must_use]
    pub fn max_fee(mut self, max_fee: Amount) -> Self {
        self.max_fee = max_fee;
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub fn deadline(mut self, deadline: Timestamp) -> Self {
        self.deadline = deadline;
        self
    }

    /// Sets the transactions hash.
    #[must_use]
    pub fn transactions_hash(mut self, hash: Hash256) -> Self {
        self.transactions_hash = hash;
        self
    }

    /// Appends a serialized embedded transaction.
    #[must_use]
    pub fn transaction(mut self, transaction: Vec<u8>) -> Self {
        self.transactions.push(transaction);
        self
    }

    /// Appends a cosignature.
    #[must_use]
    pub fn cosignature(mut self, cosignature: Cosignature) -> Self {
        self.cosignatures.push(cosignature);
        self
    }

    /// Serializes the aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::BuilderOverflow`] if the payload or the whole
    /// aggregate does not fit in its size field.
    pub fn build(&self) -> ModelResult<Vec<u8>> {
        let payload_size = calculate_container_size(0, self.transactions.iter().map(Vec::len), 0);
        let payload_size = checked_size(AggregateTransaction::NAME, payload_size)?;
        let size = calculate_container_size(
            AggregateTransaction::HEADER_SIZE,
            self.transactions.iter().map(Vec::len),
            self.cosignatures.len() * Cosignature::SIZE,
        );
        let size = checked_size(AggregateTransaction::NAME, size)?;

        let mut buffer = Vec::with_capacity(size as usize);
        buffer.put_u32_le(size);
        buffer.put_u32_le(0);
        buffer.put_slice(self.signature.as_bytes());
        buffer.put_slice(self.signer_public_key.as_bytes());
        buffer.put_u32_le(0);
        buffer.put_u8(self.version);
        buffer.put_u8(self.network.0);
        buffer.put_u16_le(self.entity_type.0);
        buffer.put_u64_le(self.max_fee.0);
        buffer.put_u64_le(self.deadline.0);
        buffer.put_slice(self.transactions_hash.as_bytes());
        buffer.put_u32_le(payload_size);
        buffer.put_u32_le(0);

        let count = self.transactions.len();
        for (i, transaction) in self.transactions.iter().enumerate() {
            buffer.put_slice(transaction);
            if i + 1 != count {
                buffer.put_bytes(0, padding_size(transaction.len(), ENTITY_ALIGNMENT));
            }
        }

        for cosignature in &self.cosignatures {
            cosignature.write_to(&mut buffer);
        }

        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catapult_container::HasPayloadSize;

    #[test]
    fn embedded_transaction_size_covers_header_and_body() {
        let bytes = EmbeddedTransactionBuilder::new(EntityType(1))
            .body(vec![0xAA; 5])
            .build()
            .unwrap();

        assert_eq!(bytes.len(), 53);
        assert_eq!(&bytes[..4], &53u32.to_le_bytes());
        assert_eq!(&bytes[46..48], &1u16.to_le_bytes());
    }

    #[test]
    fn aggregate_pads_all_but_last_transaction() {
        let transaction = |body_size| {
            EmbeddedTransactionBuilder::new(EntityType(1))
                .body(vec![1; body_size])
                .build()
                .unwrap()
        };

        let bytes = AggregateTransactionBuilder::new(EntityType(2))
            .transaction(transaction(1))
            .transaction(transaction(2))
            .transaction(transaction(3))
            .cosignature(Cosignature::default())
            .build()
            .unwrap();

        // 49 -> 56, 50 -> 56, 51 unpadded
        let aggregate = AggregateTransaction::parse(&bytes).unwrap();
        assert_eq!(aggregate.payload_size(), 56 + 56 + 51);
        assert_eq!(bytes.len(), 168 + 56 + 56 + 51 + 104);
        assert_eq!(aggregate.size() as usize, bytes.len());
        assert_eq!(&bytes[168 + 49..168 + 56], &[0; 7]);
    }

    #[test]
    fn empty_aggregate_is_header_only() {
        let bytes = AggregateTransactionBuilder::new(EntityType(2)).build().unwrap();
        let aggregate = AggregateTransaction::parse(&bytes).unwrap();

        assert_eq!(bytes.len(), AggregateTransaction::HEADER_SIZE);
        assert_eq!(aggregate.payload_size(), 0);
    }
}
