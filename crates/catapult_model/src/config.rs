//! Validation limits configuration.

/// Limits applied by [`EntityReader`](crate::EntityReader) on top of
/// structural validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationLimits {
    /// Maximum declared size of a top-level entity.
    pub max_entity_size: u32,

    /// Maximum number of embedded transactions in an aggregate.
    pub max_transactions_per_aggregate: usize,

    /// Maximum number of cosignatures attached to an aggregate.
    pub max_cosignatures_per_aggregate: usize,

    /// Maximum number of message groups in a finalization proof.
    pub max_message_groups: usize,

    /// Maximum number of hashes in a message group.
    pub max_hashes_per_group: usize,

    /// Maximum number of signatures in a message group.
    pub max_signatures_per_group: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_entity_size: 10 * 1024 * 1024, // 10 MB
            max_transactions_per_aggregate: 100,
            max_cosignatures_per_aggregate: 25,
            max_message_groups: 64,
            max_hashes_per_group: 256,
            max_signatures_per_group: 512,
        }
    }
}

impl ValidationLimits {
    /// Creates limits with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates limits that only enforce what the wire format can express.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_entity_size: u32::MAX,
            max_transactions_per_aggregate: usize::MAX,
            max_cosignatures_per_aggregate: usize::MAX,
            max_message_groups: usize::MAX,
            max_hashes_per_group: u16::MAX as usize,
            max_signatures_per_group: u16::MAX as usize,
        }
    }

    /// Sets the maximum entity size.
    #[must_use]
    pub const fn max_entity_size(mut self, size: u32) -> Self {
        self.max_entity_size = size;
        self
    }

    /// Sets the maximum number of embedded transactions per aggregate.
    #[must_use]
    pub const fn max_transactions_per_aggregate(mut self, count: usize) -> Self {
        self.max_transactions_per_aggregate = count;
        self
    }

    /// Sets the maximum number of cosignatures per aggregate.
    #[must_use]
    pub const fn max_cosignatures_per_aggregate(mut self, count: usize) -> Self {
        self.max_cosignatures_per_aggregate = count;
        self
    }

    /// Sets the maximum number of message groups per proof.
    #[must_use]
    pub const fn max_message_groups(mut self, count: usize) -> Self {
        self.max_message_groups = count;
        self
    }

    /// Sets the maximum number of hashes per message group.
    #[must_use]
    pub const fn max_hashes_per_group(mut self, count: usize) -> Self {
        self.max_hashes_per_group = count;
        self
    }

    /// Sets the maximum number of signatures per message group.
    #[must_use]
    pub const fn max_signatures_per_group(mut self, count: usize) -> Self {
        self.max_signatures_per_group = count;
        self
    }
}
