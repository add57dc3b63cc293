//! Error types for the container crate.

use thiserror::Error;

/// Result type for container operations.
pub type ContainerResult<T> = Result<T, ContainerError>;

/// Violations detected while framing or walking size-prefixed entities.
///
/// Offsets are relative to the start of the region being walked.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    /// The 4-byte size field of an entity is not fully inside the region.
    #[error("size field at offset {offset} is truncated: region has {region_len} bytes")]
    TruncatedLengthField {
        /// Offset of the entity.
        offset: usize,
        /// Length of the region being walked.
        region_len: usize,
    },

    /// An entity declares a size smaller than its minimal layout.
    #[error("entity at offset {offset} declares size {size}, below minimum {minimum}")]
    DeclaredSizeBelowMinimum {
        /// Offset of the entity.
        offset: usize,
        /// Declared size.
        size: u64,
        /// Minimal layout size.
        minimum: usize,
    },

    /// An entity extends past the end of its region.
    #[error("entity at offset {offset} with size {size} overflows region of {region_len} bytes")]
    RecordOverflowsRegion {
        /// Offset of the entity.
        offset: usize,
        /// Declared size.
        size: u64,
        /// Length of the region being walked.
        region_len: usize,
    },

    /// An explicit payload size does not fit inside the declared entity size.
    #[error("payload size {payload_size} exceeds the {available} bytes following the header")]
    PayloadSizeMismatch {
        /// Declared payload size.
        payload_size: u64,
        /// Bytes available between the header and the declared entity end.
        available: u64,
    },

    /// Trailing bytes after the payload are not a whole number of trailing elements.
    #[error("{trailing} trailing bytes are not a multiple of element size {element_size}")]
    TrailingBytesNotMultipleOfElementSize {
        /// Number of trailing bytes.
        trailing: u64,
        /// Size of a single trailing element.
        element_size: usize,
    },

    /// A nested element failed its own validity check.
    #[error("{entity} element {index} at offset {offset} is invalid")]
    NestedElementInvalid {
        /// Name of the element type.
        entity: &'static str,
        /// Zero-based position of the element.
        index: usize,
        /// Offset of the element within the element region.
        offset: usize,
    },

    /// A buffer is too short to hold the fixed header of an entity.
    #[error("{entity} header needs {needed} bytes, buffer has {available}")]
    TruncatedHeader {
        /// Name of the entity type.
        entity: &'static str,
        /// Bytes required by the fixed header.
        needed: usize,
        /// Bytes actually available.
        available: usize,
    },

    /// A cursor was dereferenced or advanced at the end of its region.
    #[error("cannot access entity beyond end of region")]
    IteratedPastEnd,
}

impl ContainerError {
    /// Creates a nested element error.
    pub fn nested_element_invalid(entity: &'static str, index: usize, offset: usize) -> Self {
        Self::NestedElementInvalid {
            entity,
            index,
            offset,
        }
    }

    /// Returns `true` if this error describes malformed input, as opposed to misuse
    /// of a cursor that was already exhausted.
    #[must_use]
    pub fn is_malformed_input(&self) -> bool {
        !matches!(self, Self::IteratedPastEnd)
    }
}
