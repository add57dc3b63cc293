//! Containers: entities whose variable data is a region of nested entities.
//!
//! A container is itself size-prefixed. Its element region starts right
//! after [`EntityContainer::container_header_size`] bytes; its length is
//! decided by a [`PayloadSizing`] strategy:
//!
//! - [`ImplicitPayloadSize`]: everything after the header up to `Size`.
//! - [`ExplicitPayloadSize`]: a `PayloadSize` header field. Bytes between
//!   the payload end and `Size` are trailing records (e.g. cosignatures).

use std::fmt;
use std::marker::PhantomData;

use crate::cursor::{Entities, ErrorPolicy, RecordCursor};
use crate::entity::SizePrefixedEntity;
use crate::error::{ContainerError, ContainerResult};

/// Strategy computing the element region length of a container.
pub trait PayloadSizing<C: ?Sized> {
    /// Whether bytes may follow the element region inside the container.
    const ALLOWS_TRAILING_DATA: bool;

    /// Returns the element region length declared by `container`.
    fn region_size(container: &C, declared_size: u32, header_size: usize) -> u64;
}

/// Element region spans the whole container after its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImplicitPayloadSize;

impl<C: ?Sized> PayloadSizing<C> for ImplicitPayloadSize {
    const ALLOWS_TRAILING_DATA: bool = false;

    fn region_size(_: &C, declared_size: u32, header_size: usize) -> u64 {
        u64::from(declared_size).saturating_sub(header_size as u64)
    }
}

/// Element region length is stored in the container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExplicitPayloadSize;

/// Containers carrying an explicit `PayloadSize` header field.
pub trait HasPayloadSize {
    /// Returns the `PayloadSize` header field.
    fn payload_size(&self) -> u32;
}

impl<C: HasPayloadSize + ?Sized> PayloadSizing<C> for ExplicitPayloadSize {
    const ALLOWS_TRAILING_DATA: bool = true;

    fn region_size(container: &C, _: u32, _: usize) -> u64 {
        u64::from(container.payload_size())
    }
}

/// A size-prefixed entity whose variable data holds nested entities.
pub trait EntityContainer<'a>: SizePrefixedEntity<'a> {
    /// Type of the nested entities.
    type Element: SizePrefixedEntity<'a>;

    /// Strategy sizing the element region.
    type Sizing: PayloadSizing<Self>;

    /// Size of each trailing record following the element region, or 0 if
    /// the container carries none.
    const TRAILING_ELEMENT_SIZE: usize = 0;

    /// Size of the header preceding the element region.
    ///
    /// Defaults to [`HEADER_SIZE`](SizePrefixedEntity::HEADER_SIZE);
    /// containers with an expanded header override it.
    fn container_header_size(&self) -> usize {
        Self::HEADER_SIZE
    }

    /// Declared element region length.
    fn element_region_size(&self) -> u64 {
        Self::Sizing::region_size(self, self.size(), self.container_header_size())
    }

    /// Returns a view over the elements using `policy`.
    fn elements_with_policy(&self, policy: ErrorPolicy) -> ContainerView<'a, Self::Element> {
        let header_size = self.container_header_size();
        let declared_size = self.size() as usize;
        let region_size = self.element_region_size();
        if declared_size <= header_size || 0 == region_size {
            return ContainerView::empty(policy);
        }

        let bytes = self.bytes();
        let available = declared_size.min(bytes.len()).saturating_sub(header_size);
        if region_size > available as u64 {
            return ContainerView::overflow(region_size, available, policy);
        }

        let region_end = header_size + region_size as usize;
        match bytes.get(header_size..region_end) {
            Some(region) => ContainerView::new(region, policy),
            None => ContainerView::overflow(region_size, available, policy),
        }
    }

    /// Returns a view over the elements that reports violations as errors.
    fn elements(&self) -> ContainerView<'a, Self::Element> {
        self.elements_with_policy(ErrorPolicy::Throw)
    }

    /// Offset of the element region, or `None` if there is no region.
    fn elements_offset(&self) -> Option<usize> {
        self.elements().region().map(|_| self.container_header_size())
    }

    /// Bytes between the element region and the declared end of the
    /// container, bounded by the wrapped buffer.
    ///
    /// Returns `None` for implicitly sized containers and when there are no
    /// trailing bytes.
    fn trailing_bytes(&self) -> Option<&'a [u8]> {
        if !<Self::Sizing as PayloadSizing<Self>>::ALLOWS_TRAILING_DATA {
            return None;
        }

        let start = self.container_header_size() as u64 + self.element_region_size();
        let bytes = self.bytes();
        let end = (self.size() as usize).min(bytes.len());
        if start >= end as u64 {
            return None;
        }

        bytes.get(start as usize..end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region<'a> {
    Empty,
    Bytes(&'a [u8]),
    Overflow { declared: u64, available: usize },
}

/// Non-owning view over the element region of a container.
///
/// Views are cheap to create and copy; they are created per access and never
/// outlive the buffer they borrow.
pub struct ContainerView<'a, E> {
    region: Region<'a>,
    policy: ErrorPolicy,
    _element: PhantomData<fn() -> E>,
}

impl<'a, E: SizePrefixedEntity<'a>> ContainerView<'a, E> {
    /// Creates a view over `region`. An empty slice yields an empty view.
    pub fn new(region: &'a [u8], policy: ErrorPolicy) -> Self {
        let region = if region.is_empty() {
            Region::Empty
        } else {
            Region::Bytes(region)
        };

        Self {
            region,
            policy,
            _element: PhantomData,
        }
    }

    /// Creates a view without a region.
    pub fn empty(policy: ErrorPolicy) -> Self {
        Self {
            region: Region::Empty,
            policy,
            _element: PhantomData,
        }
    }

    /// Creates a view whose declared region does not fit in its container.
    fn overflow(declared: u64, available: usize, policy: ErrorPolicy) -> Self {
        Self {
            region: Region::Overflow {
                declared,
                available,
            },
            policy,
            _element: PhantomData,
        }
    }

    /// Returns the same view with a different error policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the error policy.
    #[must_use]
    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Returns the element region, or `None` if the container has none or
    /// its declared region does not fit.
    #[must_use]
    pub fn region(&self) -> Option<&'a [u8]> {
        match self.region {
            Region::Bytes(region) => Some(region),
            Region::Empty | Region::Overflow { .. } => None,
        }
    }

    /// Returns `true` if the container exposes no element region.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.region().is_none()
    }

    /// Returns the overflow violation if the declared region does not fit.
    #[must_use]
    pub fn overflow_error(&self) -> Option<ContainerError> {
        match self.region {
            Region::Overflow {
                declared,
                available,
            } => Some(ContainerError::RecordOverflowsRegion {
                offset: 0,
                size: declared,
                region_len: available,
            }),
            Region::Empty | Region::Bytes(_) => None,
        }
    }

    /// Returns an iterator over the elements.
    #[must_use]
    pub fn iter(&self) -> Entities<'a, E> {
        let (cursor, pending) = self.open();
        Entities::from_parts(cursor, pending)
    }

    /// Returns a cursor at the first element.
    ///
    /// # Errors
    ///
    /// Under [`ErrorPolicy::Throw`], returns the violation found in the first
    /// element or the overflow of the declared region.
    pub fn begin(&self) -> ContainerResult<RecordCursor<'a, E>> {
        match self.open() {
            (_, Some(error)) => Err(error),
            (cursor, None) => Ok(cursor),
        }
    }

    /// Returns a cursor at the end of the region.
    #[must_use]
    pub fn end(&self) -> RecordCursor<'a, E> {
        RecordCursor::end(self.region().unwrap_or(&[]), self.policy)
    }

    fn open(&self) -> (RecordCursor<'a, E>, Option<ContainerError>) {
        if let Some(error) = self.overflow_error() {
            return RecordCursor::failed(self.policy, error);
        }

        RecordCursor::open(self.region().unwrap_or(&[]), self.policy)
    }
}

impl<E> Clone for ContainerView<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for ContainerView<'_, E> {}

impl<E> fmt::Debug for ContainerView<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerView")
            .field("region", &self.region)
            .field("policy", &self.policy)
            .finish()
    }
}

impl<'a, E: SizePrefixedEntity<'a>> IntoIterator for ContainerView<'a, E> {
    type Item = ContainerResult<E>;
    type IntoIter = Entities<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, E: SizePrefixedEntity<'a>> IntoIterator for &ContainerView<'a, E> {
    type Item = ContainerResult<E>;
    type IntoIter = Entities<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
