//! Forward iteration over back-to-back size-prefixed entities.
//!
//! A region holds entities laid out one after another. Each entity is padded
//! to [`ENTITY_ALIGNMENT`] before the next one starts, except the last one,
//! which must end exactly at the region end.
//!
//! Every candidate entity is checked before it is exposed:
//! - its size field must be readable,
//! - its declared size must cover its minimal layout,
//! - it must not extend past the region.
//!
//! What happens on the first violation depends on the [`ErrorPolicy`].

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use tracing::trace;

use crate::entity::SizePrefixedEntity;
use crate::error::{ContainerError, ContainerResult};
use crate::layout::{align_up, padding_size, read_size, ENTITY_ALIGNMENT, SIZE_FIELD_LEN};

/// How a cursor reacts to malformed entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Report the first violation as an error and stop.
    ///
    /// Meant for buffers that already passed size validation.
    #[default]
    Throw,
    /// Stop silently at the first violation and flag the cursor.
    ///
    /// Meant for validation passes, which inspect [`RecordCursor::has_error`]
    /// after a full walk.
    Suppress,
}

/// Checks the entity starting at `rest[0]` and returns its declared size.
///
/// `offset` and `region_len` are only used for error reporting.
pub(crate) fn check_entity(
    rest: &[u8],
    offset: usize,
    region_len: usize,
    min_size: usize,
) -> ContainerResult<usize> {
    let Some(size) = read_size(rest) else {
        return Err(ContainerError::TruncatedLengthField { offset, region_len });
    };

    let minimum = min_size.max(SIZE_FIELD_LEN);
    if (size as usize) < minimum {
        return Err(ContainerError::DeclaredSizeBelowMinimum {
            offset,
            size: u64::from(size),
            minimum,
        });
    }

    if size as usize > rest.len() {
        return Err(ContainerError::RecordOverflowsRegion {
            offset,
            size: u64::from(size),
            region_len,
        });
    }

    Ok(size as usize)
}

/// Cursor over the entities of a region.
///
/// The cursor always points either at a validated entity or at the end of the
/// region. Once a violation is detected the cursor is parked at the end and
/// stays flagged.
pub struct RecordCursor<'a, E> {
    region: &'a [u8],
    offset: usize,
    policy: ErrorPolicy,
    error: Option<ContainerError>,
    _element: PhantomData<fn() -> E>,
}

impl<'a, E: SizePrefixedEntity<'a>> RecordCursor<'a, E> {
    /// Creates a cursor positioned at the first entity of `region`.
    ///
    /// # Errors
    ///
    /// Under [`ErrorPolicy::Throw`], returns the violation found in the first
    /// entity. Under [`ErrorPolicy::Suppress`] the cursor is returned parked at
    /// the end with [`has_error`](Self::has_error) set.
    pub fn begin(region: &'a [u8], policy: ErrorPolicy) -> ContainerResult<Self> {
        let (cursor, error) = Self::open(region, policy);
        match error {
            Some(error) => Err(error),
            None => Ok(cursor),
        }
    }

    /// Creates a cursor positioned at the end of `region`.
    pub fn end(region: &'a [u8], policy: ErrorPolicy) -> Self {
        Self {
            region,
            offset: region.len(),
            policy,
            error: None,
            _element: PhantomData,
        }
    }

    /// Opens a cursor and returns the error to surface under the throw policy.
    pub(crate) fn open(region: &'a [u8], policy: ErrorPolicy) -> (Self, Option<ContainerError>) {
        let mut cursor = Self {
            region,
            offset: 0,
            policy,
            error: None,
            _element: PhantomData,
        };

        if region.is_empty() {
            return (cursor, None);
        }

        let error = cursor.validate_current().err();
        (cursor, error)
    }

    /// Opens a cursor over a region that is known to be unusable.
    pub(crate) fn failed(policy: ErrorPolicy, error: ContainerError) -> (Self, Option<ContainerError>) {
        let mut cursor = Self::end(&[], policy);
        let error = cursor.fail(error).err();
        (cursor, error)
    }

    /// Returns `true` if the cursor is at the end of the region.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.offset >= self.region.len()
    }

    /// Offset of the current entity within the region.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the walked region.
    #[must_use]
    pub fn region(&self) -> &'a [u8] {
        self.region
    }

    /// Returns the error policy.
    #[must_use]
    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Returns `true` if a violation was detected.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Returns the first violation detected, if any.
    #[must_use]
    pub fn error(&self) -> Option<&ContainerError> {
        self.error.as_ref()
    }

    /// Returns the current entity.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::IteratedPastEnd`] at the end of the region,
    /// regardless of policy.
    pub fn current(&self) -> ContainerResult<E> {
        if self.is_end() {
            return Err(ContainerError::IteratedPastEnd);
        }

        let size = self.current_size();
        self.region
            .get(self.offset..self.offset + size)
            .map(E::from_bytes_unchecked)
            .ok_or(ContainerError::IteratedPastEnd)
    }

    /// Moves to the next entity.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::IteratedPastEnd`] at the end of the region,
    /// regardless of policy. Under [`ErrorPolicy::Throw`], also returns the
    /// violation found in the next entity.
    pub fn advance(&mut self) -> ContainerResult<()> {
        if self.is_end() {
            return Err(ContainerError::IteratedPastEnd);
        }

        let next = self.offset + self.current_size();
        if next == self.region.len() {
            self.offset = next;
            return Ok(());
        }

        self.offset = align_up(next);
        self.validate_current()
    }

    fn current_size(&self) -> usize {
        self.region
            .get(self.offset..)
            .and_then(read_size)
            .map_or(0, |size| size as usize)
    }

    fn validate_current(&mut self) -> ContainerResult<()> {
        let rest = self.region.get(self.offset..).unwrap_or(&[]);
        match check_entity(rest, self.offset, self.region.len(), E::HEADER_SIZE) {
            Ok(_) => Ok(()),
            Err(error) => self.fail(error),
        }
    }

    fn fail(&mut self, error: ContainerError) -> ContainerResult<()> {
        trace!(entity = E::NAME, error = %error, "stopping entity iteration");
        self.offset = self.region.len();
        self.error = Some(error.clone());
        match self.policy {
            ErrorPolicy::Throw => Err(error),
            ErrorPolicy::Suppress => Ok(()),
        }
    }
}

impl<E> Clone for RecordCursor<'_, E> {
    fn clone(&self) -> Self {
        Self {
            region: self.region,
            offset: self.offset,
            policy: self.policy,
            error: self.error.clone(),
            _element: PhantomData,
        }
    }
}

impl<E> PartialEq for RecordCursor<'_, E> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.region.as_ptr(), other.region.as_ptr())
            && self.region.len() == other.region.len()
            && self.offset == other.offset
    }
}

impl<E> Eq for RecordCursor<'_, E> {}

impl<E> fmt::Debug for RecordCursor<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordCursor")
            .field("region_len", &self.region.len())
            .field("offset", &self.offset)
            .field("policy", &self.policy)
            .field("error", &self.error)
            .finish()
    }
}

/// Iterator over the entities of a region.
///
/// Items are `Ok` for every well-formed entity. Under
/// [`ErrorPolicy::Throw`] a violation is yielded once as `Err` and iteration
/// ends; under [`ErrorPolicy::Suppress`] iteration just ends and
/// [`has_error`](Self::has_error) reports the violation.
#[derive(Debug, Clone)]
pub struct Entities<'a, E> {
    cursor: RecordCursor<'a, E>,
    pending: Option<ContainerError>,
}

impl<'a, E: SizePrefixedEntity<'a>> Entities<'a, E> {
    /// Creates an iterator over `region`.
    pub fn new(region: &'a [u8], policy: ErrorPolicy) -> Self {
        let (cursor, pending) = RecordCursor::open(region, policy);
        Self { cursor, pending }
    }

    pub(crate) fn from_parts(cursor: RecordCursor<'a, E>, pending: Option<ContainerError>) -> Self {
        Self { cursor, pending }
    }

    /// Returns the underlying cursor.
    #[must_use]
    pub fn cursor(&self) -> &RecordCursor<'a, E> {
        &self.cursor
    }

    /// Returns `true` if a violation was detected.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.cursor.has_error()
    }

    /// Returns the first violation detected, if any.
    #[must_use]
    pub fn error(&self) -> Option<&ContainerError> {
        self.cursor.error()
    }
}

impl<'a, E: SizePrefixedEntity<'a>> Iterator for Entities<'a, E> {
    type Item = ContainerResult<E>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(error) = self.pending.take() {
            return Some(Err(error));
        }

        if self.cursor.is_end() {
            return None;
        }

        let current = match self.cursor.current() {
            Ok(current) => current,
            Err(error) => return Some(Err(error)),
        };

        if let Err(error) = self.cursor.advance() {
            self.pending = Some(error);
        }

        Some(Ok(current))
    }
}

impl<'a, E: SizePrefixedEntity<'a>> FusedIterator for Entities<'a, E> {}

/// Iterator over mutable entity slices of a region.
///
/// Uses the same bounds checks as [`RecordCursor`]; only the entity bytes
/// are exposed, padding between entities is skipped. The size fields must
/// not be changed while iterating.
#[derive(Debug)]
pub struct EntitiesMut<'a> {
    rest: &'a mut [u8],
    offset: usize,
    region_len: usize,
    min_size: usize,
    policy: ErrorPolicy,
    error: Option<ContainerError>,
    pending: Option<ContainerError>,
}

impl<'a> EntitiesMut<'a> {
    /// Creates an iterator over `region` for entities of at least `min_size` bytes.
    pub fn new(region: &'a mut [u8], min_size: usize, policy: ErrorPolicy) -> Self {
        let region_len = region.len();
        let mut entities = Self {
            rest: region,
            offset: 0,
            region_len,
            min_size,
            policy,
            error: None,
            pending: None,
        };

        if region_len > 0 {
            entities.validate_current();
        }

        entities
    }

    /// Returns `true` if a violation was detected.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Returns the first violation detected, if any.
    #[must_use]
    pub fn error(&self) -> Option<&ContainerError> {
        self.error.as_ref()
    }

    fn validate_current(&mut self) {
        if let Err(error) = check_entity(self.rest, self.offset, self.region_len, self.min_size) {
            trace!(error = %error, "stopping mutable entity iteration");
            self.rest = Default::default();
            self.offset = self.region_len;
            self.error = Some(error.clone());
            if ErrorPolicy::Throw == self.policy {
                self.pending = Some(error);
            }
        }
    }
}

impl<'a> Iterator for EntitiesMut<'a> {
    type Item = ContainerResult<&'a mut [u8]>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(error) = self.pending.take() {
            return Some(Err(error));
        }

        if self.offset >= self.region_len {
            return None;
        }

        let size = read_size(self.rest).map_or(0, |size| size as usize);
        let rest = std::mem::take(&mut self.rest);
        let (entity, tail) = rest.split_at_mut(size.min(rest.len()));

        let next = self.offset + size;
        if next == self.region_len {
            self.offset = next;
            self.rest = tail;
            return Some(Ok(entity));
        }

        let padding = padding_size(next, ENTITY_ALIGNMENT);
        self.offset = next + padding;
        self.rest = if padding > tail.len() {
            Default::default()
        } else {
            tail.split_at_mut(padding).1
        };

        self.validate_current();
        Some(Ok(entity))
    }
}

impl FusedIterator for EntitiesMut<'_> {}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::layout::calculate_container_size;
    use crate::test_support::{write_entity, TestEntity, TEST_ENTITY_SIZE};
    use proptest::prelude::*;

    fn packed(sizes: &[u32]) -> Vec<u8> {
        let total = calculate_container_size(0, sizes.iter().map(|size| *size as usize), 0);
        let mut buffer = vec![0u8; total as usize];
        let mut offset = 0;
        for (i, size) in sizes.iter().enumerate() {
            write_entity(&mut buffer, offset, *size, i as u32);
            offset = align_up(offset + *size as usize);
        }

        buffer
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 64, ..ProptestConfig::default() })]

        #[test]
        fn valid_sizes_yield_every_entity_in_order(
            sizes in prop::collection::vec(TEST_ENTITY_SIZE as u32..64, 0..16)
        ) {
            let buffer = packed(&sizes);
            let mut entities = Entities::<TestEntity<'_>>::new(&buffer, ErrorPolicy::Throw);
            let seen: Vec<(u32, u32)> = entities
                .by_ref()
                .map(|entity| entity.map(|entity| (entity.size(), entity.value())))
                .collect::<ContainerResult<_>>()
                .unwrap();

            let expected: Vec<(u32, u32)> = sizes.iter().copied().zip(0..).collect();
            prop_assert_eq!(seen, expected);
            prop_assert!(!entities.has_error());
        }

        #[test]
        fn truncated_buffers_yield_a_prefix_and_flag_error(
            sizes in prop::collection::vec(TEST_ENTITY_SIZE as u32..64, 1..16),
            cut in 1usize..64
        ) {
            let buffer = packed(&sizes);
            let cut = cut.min(buffer.len());
            let region = &buffer[..buffer.len() - cut];

            let entities = Entities::<TestEntity<'_>>::new(region, ErrorPolicy::Suppress);
            let values: Vec<u32> = entities.filter_map(Result::ok).map(|entity| entity.value()).collect();
            let expected: Vec<u32> = (0..values.len() as u32).collect();
            prop_assert!(values.len() < sizes.len());
            prop_assert_eq!(values, expected);
        }

        #[test]
        fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
            for policy in [ErrorPolicy::Throw, ErrorPolicy::Suppress] {
                let entities = Entities::<TestEntity<'_>>::new(&bytes, policy);
                prop_assert!(entities.count() <= bytes.len() / TEST_ENTITY_SIZE + 1);
            }

            let mut copy = bytes.clone();
            let _ = EntitiesMut::new(&mut copy, TEST_ENTITY_SIZE, ErrorPolicy::Suppress).count();
        }
    }
}
