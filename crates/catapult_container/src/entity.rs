//! Size-prefixed entity contract.
//!
//! Every record handled by this crate starts with a little-endian `u32`
//! holding its own serialized length. Typed views wrap a borrowed byte slice
//! and read their fields on demand; nothing is copied.

use crate::error::{ContainerError, ContainerResult};
use crate::layout::{read_size, SIZE_FIELD_LEN};

/// A borrowed view over a record that starts with a `u32` size prefix.
///
/// Implementors are thin wrappers around `&'a [u8]`. The wrapped slice is
/// always at least [`HEADER_SIZE`](Self::HEADER_SIZE) bytes long, so fixed
/// header fields can be read without further checks. Views produced by a
/// cursor wrap exactly `Size` bytes; views produced by [`parse`](Self::parse)
/// wrap the whole buffer handed in by the caller.
pub trait SizePrefixedEntity<'a>: Copy + Sized {
    /// Size of the fixed (non-variable) portion of the layout.
    const HEADER_SIZE: usize;

    /// Human readable name used in errors and logs.
    const NAME: &'static str;

    /// Wraps `bytes` without checking its length.
    ///
    /// Callers must guarantee `bytes.len() >= Self::HEADER_SIZE`; header
    /// accessors panic otherwise. Prefer [`parse`](Self::parse).
    fn from_bytes_unchecked(bytes: &'a [u8]) -> Self;

    /// Returns the wrapped bytes.
    fn bytes(&self) -> &'a [u8];

    /// Wraps `bytes` after checking that the fixed header is readable.
    ///
    /// The declared `Size` is not validated here; a view over a record whose
    /// size is inconsistent exposes no variable data and fails validation.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::TruncatedHeader`] if `bytes` is shorter than
    /// [`HEADER_SIZE`](Self::HEADER_SIZE).
    fn parse(bytes: &'a [u8]) -> ContainerResult<Self> {
        if bytes.len() < Self::HEADER_SIZE.max(SIZE_FIELD_LEN) {
            return Err(ContainerError::TruncatedHeader {
                entity: Self::NAME,
                needed: Self::HEADER_SIZE.max(SIZE_FIELD_LEN),
                available: bytes.len(),
            });
        }

        Ok(Self::from_bytes_unchecked(bytes))
    }

    /// Returns the declared size of the entity.
    fn size(&self) -> u32 {
        read_size(self.bytes()).unwrap_or(0)
    }

    /// Returns the `Size` bytes making up this entity, or `None` if the
    /// declared size extends past the wrapped bytes.
    fn entity_bytes(&self) -> Option<&'a [u8]> {
        self.bytes().get(..self.size() as usize)
    }
}

/// An entity whose real size can be derived from its own fields.
///
/// This covers records with count-sized trailing arrays, such as a message
/// group carrying hashes and signatures.
pub trait SelfSizedEntity<'a>: SizePrefixedEntity<'a> {
    /// Size computed from the fixed header and the entity's count fields.
    fn real_size(&self) -> u64;

    /// Returns `true` if the declared size matches the computed size.
    fn is_size_valid(&self) -> bool {
        u64::from(self.size()) == self.real_size()
    }

    /// Offset of the variable data, or `None` if the declared size is inconsistent.
    fn payload_start(&self) -> Option<usize> {
        payload_start(self.size(), self.real_size(), Self::HEADER_SIZE)
    }
}

/// Derives the start of an entity's variable data.
///
/// Returns `Some(header_size)` iff `size` equals `real_size` exactly. Any
/// other value, too small or too large, yields `None`; that is not an error
/// by itself, callers validate `size` separately.
#[must_use]
pub fn payload_start(size: u32, real_size: u64, header_size: usize) -> Option<usize> {
    (u64::from(size) == real_size).then_some(header_size)
}

/// Compares two size-prefixed entities byte for byte.
///
/// Entities are equal only if both declare the same size, both buffers hold
/// at least that many bytes, and those bytes match.
#[must_use]
pub fn entity_eq(lhs: &[u8], rhs: &[u8]) -> bool {
    let (Some(lhs_size), Some(rhs_size)) = (read_size(lhs), read_size(rhs)) else {
        return false;
    };

    if lhs_size != rhs_size {
        return false;
    }

    let size = lhs_size as usize;
    match (lhs.get(..size), rhs.get(..size)) {
        (Some(lhs), Some(rhs)) => lhs == rhs,
        _ => false,
    }
}
