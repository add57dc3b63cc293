//! Mock embedded transaction with a variable data tail.
//!
//! The body is a little-endian `u16` data size followed by that many bytes,
//! so the real size of a mock transaction is `48 + 2 + DataSize`.

use catapult_container::{read_u16, SizePrefixedEntity};
use catapult_model::aggregate::{
    EmbeddedTransaction, EmbeddedTransactionBuilder, EmbeddedTransactionPlugin, TransactionRegistry,
};
use catapult_model::{EntityType, ModelError, ModelResult};

/// Type of the mock transaction.
pub const MOCK_TRANSACTION_TYPE: EntityType = EntityType(0x4FFF);

/// Type of a mock transaction that may not be embedded.
pub const TOP_LEVEL_MOCK_TRANSACTION_TYPE: EntityType = EntityType(0x4FFE);

/// Size of the data size field preceding the mock data.
pub const MOCK_DATA_SIZE_LEN: usize = 2;

/// Plugin computing the real size of mock transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockTransactionPlugin {
    entity_type: EntityType,
    supports_embedding: bool,
}

impl MockTransactionPlugin {
    /// Creates the plugin for [`MOCK_TRANSACTION_TYPE`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entity_type: MOCK_TRANSACTION_TYPE,
            supports_embedding: true,
        }
    }

    /// Creates the plugin for [`TOP_LEVEL_MOCK_TRANSACTION_TYPE`].
    #[must_use]
    pub const fn top_level_only() -> Self {
        Self {
            entity_type: TOP_LEVEL_MOCK_TRANSACTION_TYPE,
            supports_embedding: false,
        }
    }
}

impl Default for MockTransactionPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddedTransactionPlugin for MockTransactionPlugin {
    fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    fn supports_embedding(&self) -> bool {
        self.supports_embedding
    }

    fn calculate_real_size(&self, transaction: &EmbeddedTransaction<'_>) -> u64 {
        let data_size = read_u16(transaction.body(), 0).map_or(0, u64::from);
        (EmbeddedTransaction::HEADER_SIZE + MOCK_DATA_SIZE_LEN) as u64 + data_size
    }
}

/// Returns a registry holding both mock plugins.
#[must_use]
pub fn mock_registry() -> TransactionRegistry {
    TransactionRegistry::new()
        .with(MockTransactionPlugin::new())
        .with(MockTransactionPlugin::top_level_only())
}

/// Serializes a mock transaction of `entity_type` carrying `data`.
///
/// # Errors
///
/// Fails if `data` does not fit in the `u16` data size field.
pub fn mock_transaction_with_type(entity_type: EntityType, data: &[u8]) -> ModelResult<Vec<u8>> {
    let data_size = u16::try_from(data.len()).map_err(|_| {
        ModelError::limit_exceeded("mock transaction", "data bytes", data.len(), usize::from(u16::MAX))
    })?;
    let mut body = Vec::with_capacity(MOCK_DATA_SIZE_LEN + data.len());
    body.extend_from_slice(&data_size.to_le_bytes());
    body.extend_from_slice(data);
    EmbeddedTransactionBuilder::new(entity_type).body(body).build()
}

/// Serializes a mock transaction carrying `data_size` bytes of `fill`.
#[must_use]
pub fn mock_transaction(data_size: u16, fill: u8) -> Vec<u8> {
    let data = vec![fill; usize::from(data_size)];
    mock_transaction_with_type(MOCK_TRANSACTION_TYPE, &data).unwrap_or_default()
}
