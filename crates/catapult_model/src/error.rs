//! Error types for entity models.

use catapult_container::ContainerError;
use thiserror::Error;

use crate::types::EntityType;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while reading or building entities.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Structural violation in the entity bytes.
    #[error("container error: {0}")]
    Container(#[from] ContainerError),

    /// Entity exceeds the configured size limit.
    #[error("{entity} of {size} bytes exceeds limit of {limit} bytes")]
    EntityTooLarge {
        /// Name of the entity.
        entity: &'static str,
        /// Declared size.
        size: u64,
        /// Configured limit.
        limit: u32,
    },

    /// A count exceeds its configured or representable limit.
    #[error("{entity} has {count} {item}, limit is {limit}")]
    LimitExceeded {
        /// Name of the entity.
        entity: &'static str,
        /// What is being counted.
        item: &'static str,
        /// Actual count.
        count: usize,
        /// Limit.
        limit: usize,
    },

    /// Embedded transaction type is unknown or cannot be embedded.
    #[error("unsupported embedded transaction type {entity_type}")]
    UnsupportedEntityType {
        /// The offending type.
        entity_type: EntityType,
    },

    /// A built entity would not fit in its `u32` size field.
    #[error("{entity} would be {size} bytes, which does not fit in its size field")]
    BuilderOverflow {
        /// Name of the entity.
        entity: &'static str,
        /// Computed size.
        size: u64,
    },
}

impl ModelError {
    /// Creates a limit error.
    pub fn limit_exceeded(entity: &'static str, item: &'static str, count: usize, limit: usize) -> Self {
        Self::LimitExceeded {
            entity,
            item,
            count,
            limit,
        }
    }

    /// Returns `true` if the error stems from malformed bytes rather than
    /// from limits or caller input.
    #[must_use]
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Self::Container(error) if error.is_malformed_input())
    }
}
