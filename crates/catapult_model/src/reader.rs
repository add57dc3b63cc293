//! Validating entry point for untrusted buffers.

use catapult_container::{EntityContainer, SizePrefixedEntity};
use tracing::debug;

use crate::aggregate::{AggregateTransaction, EmbeddedSizeValidator};
use crate::config::ValidationLimits;
use crate::error::{ModelError, ModelResult};
use crate::finalization::{FinalizationProof, MessageGroup};

/// Reads entities from untrusted bytes.
///
/// A returned view has passed structural validation and every configured
/// limit, so its accessors and element iteration can be trusted.
#[derive(Debug, Clone, Default)]
pub struct EntityReader {
    limits: ValidationLimits,
}

impl EntityReader {
    /// Creates a reader enforcing `limits`.
    #[must_use]
    pub fn new(limits: ValidationLimits) -> Self {
        Self { limits }
    }

    /// Returns the configured limits.
    #[must_use]
    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    /// Reads an aggregate transaction, validating embedded transactions with
    /// `validator`.
    ///
    /// # Errors
    ///
    /// Fails if the bytes are structurally invalid or exceed a limit.
    pub fn read_aggregate<'a, V>(&self, bytes: &'a [u8], validator: &V) -> ModelResult<AggregateTransaction<'a>>
    where
        V: EmbeddedSizeValidator + ?Sized,
    {
        let aggregate = AggregateTransaction::parse(bytes)?;
        self.check_entity_size(AggregateTransaction::NAME, aggregate.size())?;
        aggregate.check_size(validator).map_err(|error| {
            debug!(error = %error, "rejecting aggregate transaction");
            ModelError::from(error)
        })?;

        let transactions = aggregate.elements().iter().count();
        check_limit(
            AggregateTransaction::NAME,
            "transactions",
            transactions,
            self.limits.max_transactions_per_aggregate,
        )?;
        check_limit(
            AggregateTransaction::NAME,
            "cosignatures",
            aggregate.cosignatures_count(),
            self.limits.max_cosignatures_per_aggregate,
        )?;

        Ok(aggregate)
    }

    /// Reads a finalization proof.
    ///
    /// # Errors
    ///
    /// Fails if the bytes are structurally invalid or exceed a limit.
    pub fn read_finalization_proof<'a>(&self, bytes: &'a [u8]) -> ModelResult<FinalizationProof<'a>> {
        let proof = FinalizationProof::parse(bytes)?;
        self.check_entity_size(FinalizationProof::NAME, proof.size())?;
        proof.check_size().map_err(|error| {
            debug!(round = %proof.round(), error = %error, "rejecting finalization proof");
            ModelError::from(error)
        })?;

        let mut count = 0;
        for group in proof.elements().iter().flatten() {
            count += 1;
            check_limit(
                MessageGroup::NAME,
                "hashes",
                usize::from(group.hashes_count()),
                self.limits.max_hashes_per_group,
            )?;
            check_limit(
                MessageGroup::NAME,
                "signatures",
                usize::from(group.signatures_count()),
                self.limits.max_signatures_per_group,
            )?;
        }

        check_limit(FinalizationProof::NAME, "message groups", count, self.limits.max_message_groups)?;
        Ok(proof)
    }

    fn check_entity_size(&self, entity: &'static str, size: u32) -> ModelResult<()> {
        if size > self.limits.max_entity_size {
            debug!(entity, size, limit = self.limits.max_entity_size, "entity exceeds size limit");
            return Err(ModelError::EntityTooLarge {
                entity,
                size: u64::from(size),
                limit: self.limits.max_entity_size,
            });
        }

        Ok(())
    }
}

fn check_limit(entity: &'static str, item: &'static str, count: usize, limit: usize) -> ModelResult<()> {
    if count > limit {
        debug!(entity, item, count, limit, "entity exceeds count limit");
        return Err(ModelError::limit_exceeded(entity, item, count, limit));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{
        AggregateTransactionBuilder, Cosignature, EmbeddedTransactionBuilder, FixedSizeTransactionPlugin,
        TransactionRegistry,
    };
    use crate::finalization::{FinalizationProofBuilder, FinalizationStage, MessageGroupBuilder};
    use crate::types::{EntityType, FinalizationRound, Hash256, Height, TreeSignature};
    use catapult_container::ContainerError;

    const TRANSFER: EntityType = EntityType(0x4154);

    fn registry() -> TransactionRegistry {
        TransactionRegistry::new().with(FixedSizeTransactionPlugin::new(TRANSFER, 8))
    }

    fn aggregate(transactions: usize, cosignatures: usize) -> Vec<u8> {
        let mut builder = AggregateTransactionBuilder::new(EntityType(0x4141));
        for _ in 0..transactions {
            builder = builder.transaction(EmbeddedTransactionBuilder::new(TRANSFER).body(vec![7; 8]).build().unwrap());
        }

        for _ in 0..cosignatures {
            builder = builder.cosignature(Cosignature::default());
        }

        builder.build().unwrap()
    }

    fn proof(groups: usize, hashes: usize) -> Vec<u8> {
        let mut builder = FinalizationProofBuilder::new(FinalizationRound::new(1, 2), Height(10), Hash256::filled(1));
        for i in 0..groups {
            let group = MessageGroupBuilder::new(FinalizationStage::Prevote, Height(10 + i as u64))
                .hashes(std::iter::repeat(Hash256::filled(2)).take(hashes))
                .signature(TreeSignature::filled(3))
                .build()
                .unwrap();
            builder = builder.message_group(group);
        }

        builder.build().unwrap()
    }

    #[test]
    fn reads_valid_aggregate() {
        let bytes = aggregate(3, 2);
        let aggregate = EntityReader::default().read_aggregate(&bytes, &registry()).unwrap();

        assert_eq!(aggregate.transactions().iter().count(), 3);
        assert_eq!(aggregate.cosignatures_count(), 2);
    }

    #[test]
    fn rejects_aggregate_with_unknown_embedded_type() {
        let bytes = aggregate(2, 0);
        let result = EntityReader::default().read_aggregate(&bytes, &TransactionRegistry::new());

        assert!(matches!(
            result,
            Err(ModelError::Container(ContainerError::NestedElementInvalid { index: 0, .. }))
        ));
    }

    #[test]
    fn rejects_structurally_invalid_aggregate() {
        let mut bytes = aggregate(2, 1);
        bytes.pop();

        let error = EntityReader::default().read_aggregate(&bytes, &registry()).unwrap_err();
        assert!(error.is_malformed_input());
    }

    #[test]
    fn enforces_entity_size_limit() {
        let bytes = aggregate(1, 0);
        let reader = EntityReader::new(ValidationLimits::new().max_entity_size(100));

        assert_eq!(
            reader.read_aggregate(&bytes, &registry()).unwrap_err(),
            ModelError::EntityTooLarge {
                entity: AggregateTransaction::NAME,
                size: bytes.len() as u64,
                limit: 100
            }
        );
    }

    #[test]
    fn enforces_aggregate_count_limits() {
        let reader = EntityReader::new(
            ValidationLimits::new()
                .max_transactions_per_aggregate(2)
                .max_cosignatures_per_aggregate(1),
        );

        assert!(reader.read_aggregate(&aggregate(2, 1), &registry()).is_ok());
        assert_eq!(
            reader.read_aggregate(&aggregate(3, 1), &registry()).unwrap_err(),
            ModelError::limit_exceeded(AggregateTransaction::NAME, "transactions", 3, 2)
        );
        assert_eq!(
            reader.read_aggregate(&aggregate(2, 2), &registry()).unwrap_err(),
            ModelError::limit_exceeded(AggregateTransaction::NAME, "cosignatures", 2, 1)
        );
    }

    #[test]
    fn reads_valid_finalization_proof() {
        let bytes = proof(3, 2);
        let proof = EntityReader::default().read_finalization_proof(&bytes).unwrap();

        assert_eq!(proof.message_groups().iter().count(), 3);
        assert_eq!(proof.round(), FinalizationRound::new(1, 2));
    }

    #[test]
    fn enforces_finalization_count_limits() {
        let reader = EntityReader::new(ValidationLimits::new().max_message_groups(2).max_hashes_per_group(3));

        assert!(reader.read_finalization_proof(&proof(2, 3)).is_ok());
        assert_eq!(
            reader.read_finalization_proof(&proof(3, 1)).unwrap_err(),
            ModelError::limit_exceeded(FinalizationProof::NAME, "message groups", 3, 2)
        );
        assert_eq!(
            reader.read_finalization_proof(&proof(1, 4)).unwrap_err(),
            ModelError::limit_exceeded(MessageGroup::NAME, "hashes", 4, 3)
        );
    }

    #[test]
    fn rejects_truncated_finalization_proof() {
        let bytes = proof(1, 1);
        let error = EntityReader::default().read_finalization_proof(&bytes[..3]).unwrap_err();

        assert!(error.is_malformed_input());
    }
}
