//! Byte layout helpers shared by readers and writers.

/// Length of the size prefix carried by every entity.
pub const SIZE_FIELD_LEN: usize = 4;

/// Alignment applied between consecutive entities in a container.
pub const ENTITY_ALIGNMENT: usize = 8;

/// Returns the number of bytes needed to pad `size` up to a multiple of `alignment`.
///
/// An `alignment` of zero is treated as no alignment.
#[must_use]
pub const fn padding_size(size: usize, alignment: usize) -> usize {
    if alignment == 0 {
        return 0;
    }

    let remainder = size % alignment;
    if remainder == 0 {
        0
    } else {
        alignment - remainder
    }
}

/// Rounds `offset` up to the next entity boundary.
#[must_use]
pub const fn align_up(offset: usize) -> usize {
    offset + padding_size(offset, ENTITY_ALIGNMENT)
}

/// Computes the serialized size of a container.
///
/// The result is `header_size`, plus every element size padded to
/// [`ENTITY_ALIGNMENT`] except the last one, plus `trailing_size` bytes of
/// fixed-size trailing records. This mirrors the way cursors advance, so a
/// container written with this size walks cleanly.
///
/// ```
/// use catapult_container::calculate_container_size;
///
/// // 16 + (10 + 6) + (20 + 4) + 3
/// assert_eq!(59, calculate_container_size(16, [10, 20, 3], 0));
/// assert_eq!(16, calculate_container_size(16, [], 0));
/// ```
pub fn calculate_container_size(
    header_size: usize,
    element_sizes: impl IntoIterator<Item = usize>,
    trailing_size: usize,
) -> u64 {
    let mut size = header_size as u64;
    let mut last_padding = 0u64;
    for element_size in element_sizes {
        last_padding = padding_size(element_size, ENTITY_ALIGNMENT) as u64;
        size += element_size as u64 + last_padding;
    }

    size - last_padding + trailing_size as u64
}

/// Reads a little-endian `u16` at `offset`, if in bounds.
#[must_use]
pub fn read_u16(bytes: &[u8], offset: usize) -> Option<u16> {
    let field = bytes.get(offset..offset.checked_add(2)?)?;
    Some(u16::from_le_bytes([field[0], field[1]]))
}

/// Reads a little-endian `u32` at `offset`, if in bounds.
#[must_use]
pub fn read_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let field = bytes.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_le_bytes([field[0], field[1], field[2], field[3]]))
}

/// Reads a little-endian `u64` at `offset`, if in bounds.
#[must_use]
pub fn read_u64(bytes: &[u8], offset: usize) -> Option<u64> {
    let field = bytes.get(offset..offset.checked_add(8)?)?;
    let mut raw = [0u8; 8];
    raw.copy_from_slice(field);
    Some(u64::from_le_bytes(raw))
}

/// Reads a fixed-size byte array at `offset`, if in bounds.
#[must_use]
pub fn read_array<const N: usize>(bytes: &[u8], offset: usize) -> Option<[u8; N]> {
    let field = bytes.get(offset..offset.checked_add(N)?)?;
    let mut raw = [0u8; N];
    raw.copy_from_slice(field);
    Some(raw)
}

/// Reads the size prefix of the entity starting at `bytes[0]`.
#[must_use]
pub fn read_size(bytes: &[u8]) -> Option<u32> {
    read_u32(bytes, 0)
}
