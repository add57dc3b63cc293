//! Recursive size validation of containers.
//!
//! A container is size-valid when its declared size, its element region and
//! its trailing records exactly account for its bytes, and every nested
//! element passes its own check.

use tracing::debug;

use crate::container::{EntityContainer, PayloadSizing};
use crate::cursor::ErrorPolicy;
use crate::entity::SizePrefixedEntity;
use crate::error::{ContainerError, ContainerResult};

/// Checks that `container` is size-valid.
///
/// `is_element_valid` is applied to every element in order; the walk stops at
/// the first element it rejects.
///
/// # Errors
///
/// Returns the first violation found:
/// - [`ContainerError::DeclaredSizeBelowMinimum`] if `Size` does not cover the header,
/// - [`ContainerError::RecordOverflowsRegion`] if `Size` exceeds the buffer,
/// - [`ContainerError::PayloadSizeMismatch`] if the element region does not fit, or leaves
///   bytes behind in a container without trailing records,
/// - [`ContainerError::TrailingBytesNotMultipleOfElementSize`] for partial trailing records,
/// - any cursor violation found while walking the elements,
/// - [`ContainerError::NestedElementInvalid`] if `is_element_valid` rejects an element.
pub fn check_size<'a, C, F>(container: &C, mut is_element_valid: F) -> ContainerResult<()>
where
    C: EntityContainer<'a>,
    F: FnMut(&C::Element) -> bool,
{
    let header_size = container.container_header_size();
    let size = u64::from(container.size());
    if size < header_size as u64 {
        return Err(ContainerError::DeclaredSizeBelowMinimum {
            offset: 0,
            size,
            minimum: header_size,
        });
    }

    let buffer_len = container.bytes().len();
    if size > buffer_len as u64 {
        return Err(ContainerError::RecordOverflowsRegion {
            offset: 0,
            size,
            region_len: buffer_len,
        });
    }

    let available = size - header_size as u64;
    let payload_size = container.element_region_size();
    if payload_size > available {
        return Err(ContainerError::PayloadSizeMismatch {
            payload_size,
            available,
        });
    }

    let trailing = available - payload_size;
    if 0 != trailing {
        let allows_trailing = <C::Sizing as PayloadSizing<C>>::ALLOWS_TRAILING_DATA;
        match C::TRAILING_ELEMENT_SIZE {
            element_size if !allows_trailing || 0 == element_size => {
                return Err(ContainerError::PayloadSizeMismatch {
                    payload_size,
                    available,
                });
            }
            element_size if 0 != trailing % element_size as u64 => {
                return Err(ContainerError::TrailingBytesNotMultipleOfElementSize {
                    trailing,
                    element_size,
                });
            }
            _ => {}
        }
    }

    let mut entities = container.elements_with_policy(ErrorPolicy::Suppress).iter();
    let mut index = 0;
    loop {
        let offset = entities.cursor().offset();
        let Some(Ok(element)) = entities.next() else {
            break;
        };

        if !is_element_valid(&element) {
            return Err(ContainerError::nested_element_invalid(
                <C::Element as SizePrefixedEntity<'a>>::NAME,
                index,
                offset,
            ));
        }

        index += 1;
    }

    match entities.error() {
        Some(error) => Err(error.clone()),
        None => Ok(()),
    }
}

/// Returns `true` if `container` is size-valid.
///
/// Boolean form of [`check_size`]; rejections are logged at debug level.
pub fn is_size_valid<'a, C, F>(container: &C, is_element_valid: F) -> bool
where
    C: EntityContainer<'a>,
    F: FnMut(&C::Element) -> bool,
{
    match check_size(container, is_element_valid) {
        Ok(()) => true,
        Err(error) => {
            debug!(entity = C::NAME, error = %error, "container failed size validation");
            false
        }
    }
}
