//! Transaction plugins deciding the real size of embedded transactions.

use std::collections::HashMap;
use std::fmt;

use catapult_container::SizePrefixedEntity;
use tracing::trace;

use super::EmbeddedTransaction;
use crate::types::EntityType;

/// Type-specific knowledge about an embedded transaction.
pub trait EmbeddedTransactionPlugin: Send + Sync {
    /// Transaction type handled by this plugin.
    fn entity_type(&self) -> EntityType;

    /// Whether transactions of this type may appear inside an aggregate.
    fn supports_embedding(&self) -> bool {
        true
    }

    /// Size the transaction should have according to its own fields.
    fn calculate_real_size(&self, transaction: &EmbeddedTransaction<'_>) -> u64;
}

/// Plugin for transaction types with a fixed-size body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSizeTransactionPlugin {
    entity_type: EntityType,
    body_size: usize,
    supports_embedding: bool,
}

impl FixedSizeTransactionPlugin {
    /// Creates an embeddable plugin.
    #[must_use]
    pub const fn new(entity_type: EntityType, body_size: usize) -> Self {
        Self {
            entity_type,
            body_size,
            supports_embedding: true,
        }
    }

    /// Creates a plugin for a type that is only valid at top level.
    #[must_use]
    pub const fn top_level_only(entity_type: EntityType, body_size: usize) -> Self {
        Self {
            entity_type,
            body_size,
            supports_embedding: false,
        }
    }
}

impl EmbeddedTransactionPlugin for FixedSizeTransactionPlugin {
    fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    fn supports_embedding(&self) -> bool {
        self.supports_embedding
    }

    fn calculate_real_size(&self, _: &EmbeddedTransaction<'_>) -> u64 {
        (EmbeddedTransaction::HEADER_SIZE + self.body_size) as u64
    }
}

/// Decides whether an embedded transaction has a consistent size.
pub trait EmbeddedSizeValidator {
    /// Returns `true` if `transaction` is size-valid.
    fn is_embedded_size_valid(&self, transaction: &EmbeddedTransaction<'_>) -> bool;
}

impl<F> EmbeddedSizeValidator for F
where
    F: Fn(&EmbeddedTransaction<'_>) -> bool,
{
    fn is_embedded_size_valid(&self, transaction: &EmbeddedTransaction<'_>) -> bool {
        self(transaction)
    }
}

/// Registry of transaction plugins keyed by type.
#[derive(Default)]
pub struct TransactionRegistry {
    plugins: HashMap<EntityType, Box<dyn EmbeddedTransactionPlugin>>,
}

impl TransactionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `plugin`, replacing and returning any plugin previously
    /// registered for the same type.
    pub fn register(
        &mut self,
        plugin: impl EmbeddedTransactionPlugin + 'static,
    ) -> Option<Box<dyn EmbeddedTransactionPlugin>> {
        self.plugins.insert(plugin.entity_type(), Box::new(plugin))
    }

    /// Registers `plugin` and returns the registry.
    #[must_use]
    pub fn with(mut self, plugin: impl EmbeddedTransactionPlugin + 'static) -> Self {
        self.register(plugin);
        self
    }

    /// Returns the plugin registered for `entity_type`.
    #[must_use]
    pub fn find(&self, entity_type: EntityType) -> Option<&dyn EmbeddedTransactionPlugin> {
        self.plugins.get(&entity_type).map(|plugin| plugin.as_ref())
    }

    /// Returns the number of registered plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns `true` if no plugin is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl EmbeddedSizeValidator for TransactionRegistry {
    fn is_embedded_size_valid(&self, transaction: &EmbeddedTransaction<'_>) -> bool {
        let entity_type = transaction.entity_type();
        let Some(plugin) = self.find(entity_type) else {
            trace!(%entity_type, "embedded transaction has unknown type");
            return false;
        };

        if !plugin.supports_embedding() {
            trace!(%entity_type, "embedded transaction type cannot be embedded");
            return false;
        }

        let real_size = plugin.calculate_real_size(transaction);
        if u64::from(transaction.size()) != real_size {
            trace!(
                %entity_type,
                size = transaction.size(),
                real_size,
                "embedded transaction has invalid size"
            );
            return false;
        }

        true
    }
}

impl fmt::Debug for TransactionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.plugins.keys().collect();
        types.sort();
        f.debug_struct("TransactionRegistry").field("types", &types).finish()
    }
}
