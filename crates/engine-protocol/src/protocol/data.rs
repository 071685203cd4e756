//! Decoder core shared by the strict and performance façades.
//!
//! [`MessageData`] borrows a message buffer, reads the fixed header, caches
//! the parameter count and a view over the size table, and optionally walks
//! the size table once to record every parameter's absolute start offset.
//!
//! There is exactly one offset algorithm ([`walk_offsets`]). The strict path
//! runs it with a bounds check per parameter; the trusted path runs it with a
//! check that always succeeds, so the two can never drift apart.

use std::convert::Infallible;
use std::ptr;

use crate::protocol::error::DecodeError;
use crate::protocol::layout::{
    self, WireHeader, HEADER_SIZE, ID_SIZE, MAX_PARAMS, PARAM_SIZE_WIDTH,
};

// ── Size table view ───────────────────────────────────────────────────────────

/// Zero-copy view over the parameter size table.
///
/// Entry `i` is the byte length of parameter `i`'s payload, in native byte
/// order. The view borrows the message buffer and never outlives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSizes<'a> {
    table: &'a [u8],
}

impl<'a> ParamSizes<'a> {
    /// `table` must be a whole number of [`PARAM_SIZE_WIDTH`]-byte entries.
    fn new(table: &'a [u8]) -> Self {
        Self { table }
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.table.len() / PARAM_SIZE_WIDTH
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the size of parameter `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<u32> {
        let start = index.checked_mul(PARAM_SIZE_WIDTH)?;
        let entry = self.table.get(start..start.checked_add(PARAM_SIZE_WIDTH)?)?;
        Some(u32::from_ne_bytes([entry[0], entry[1], entry[2], entry[3]]))
    }

    /// Reads entry `index` without any bounds check.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`ParamSizes::len`].
    #[inline(always)]
    pub(crate) unsafe fn get_unchecked(&self, index: usize) -> u32 {
        ptr::read_unaligned(self.table.as_ptr().add(index * PARAM_SIZE_WIDTH).cast::<u32>())
    }

    /// Iterates the sizes in table order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + 'a {
        self.table
            .chunks_exact(PARAM_SIZE_WIDTH)
            .map(|entry| u32::from_ne_bytes([entry[0], entry[1], entry[2], entry[3]]))
    }

    /// The raw bytes of the table.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.table
    }

    /// Reinterprets the table as `&[u32]` without copying.
    ///
    /// Returns `None` when the table does not start on a 4-byte boundary,
    /// which cannot happen for a buffer accepted by the strict decoder.
    pub fn as_slice(&self) -> Option<&'a [u32]> {
        bytemuck::try_cast_slice(self.table).ok()
    }

    /// Sum of all declared parameter sizes.
    pub fn total(&self) -> u64 {
        self.iter().map(u64::from).sum()
    }
}

// ── Offset walk ───────────────────────────────────────────────────────────────

/// Walks the size table once, recording each parameter's absolute start.
///
/// Parameter 0 starts right after the size table; parameter `i` starts where
/// parameter `i - 1` ends. `admit(index, offset, size)` is consulted before
/// each offset is recorded and aborts the walk on the first error.
fn walk_offsets<E>(
    sizes: ParamSizes<'_>,
    mut admit: impl FnMut(usize, usize, u32) -> Result<(), E>,
) -> Result<[usize; MAX_PARAMS], E> {
    let mut offsets = [0usize; MAX_PARAMS];
    let mut cursor = layout::size_table_end(sizes.len());
    for (index, size) in sizes.iter().enumerate() {
        admit(index, cursor, size)?;
        offsets[index] = cursor;
        cursor = cursor.wrapping_add(size as usize);
    }
    Ok(offsets)
}

/// Rejects a parameter span that runs past `buffer_len`.
fn check_span(
    index: usize,
    offset: usize,
    size: u32,
    buffer_len: usize,
) -> Result<(), DecodeError> {
    match offset.checked_add(size as usize) {
        Some(end) if end <= buffer_len => Ok(()),
        _ => Err(DecodeError::ParamOverflow {
            index,
            offset,
            size,
            buffer_size: buffer_len,
        }),
    }
}

// ── Decoder core ──────────────────────────────────────────────────────────────

/// Validated, cheaply re-accessible metadata for one message buffer.
///
/// Immutable after construction. Any number of readers may share it, as long
/// as the owner of the buffer does not mutate the bytes underneath.
#[derive(Debug, Clone, Copy)]
pub struct MessageData<'a> {
    buffer: &'a [u8],
    header: &'a WireHeader,
    param_count: u16,
    sizes: ParamSizes<'a>,
    /// `None` until precomputed; a computed offset is never confused with
    /// an unset one.
    offsets: Option<[usize; MAX_PARAMS]>,
}

impl<'a> MessageData<'a> {
    /// Validates the header and size table of `buffer` and, if `precompute`
    /// is set, every parameter's span.
    ///
    /// Alignment is not checked here; that is the strict façade's concern.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::BufferTooSmall`] if the buffer cannot hold the fixed
    ///   header, or the header plus the size table.
    /// - [`DecodeError::TooManyParams`] if the declared count exceeds
    ///   [`MAX_PARAMS`], whatever the buffer length.
    /// - [`DecodeError::ParamOverflow`] for the first parameter whose span
    ///   runs past the buffer (only when `precompute` is set).
    pub fn parse(buffer: &'a [u8], precompute: bool) -> Result<Self, DecodeError> {
        let too_small = |needed: usize| DecodeError::BufferTooSmall {
            needed,
            available: buffer.len(),
        };

        let header_bytes = buffer.get(..HEADER_SIZE).ok_or_else(|| too_small(HEADER_SIZE))?;
        let header: &WireHeader =
            bytemuck::try_from_bytes(header_bytes).map_err(|_| too_small(HEADER_SIZE))?;

        let param_count = header.param_count;
        if usize::from(param_count) > MAX_PARAMS {
            return Err(DecodeError::TooManyParams {
                count: param_count,
                max: MAX_PARAMS,
            });
        }

        let table_end = layout::size_table_end(param_count.into());
        let table = buffer
            .get(HEADER_SIZE..table_end)
            .ok_or_else(|| too_small(table_end))?;
        let sizes = ParamSizes::new(table);

        let offsets = if precompute {
            Some(walk_offsets(sizes, |index, offset, size| {
                check_span(index, offset, size, buffer.len())
            })?)
        } else {
            None
        };

        Ok(Self {
            buffer,
            header,
            param_count,
            sizes,
            offsets,
        })
    }

    /// Builds the same metadata as [`MessageData::parse`] with every check
    /// skipped.
    ///
    /// # Safety
    ///
    /// `buffer` must be a well-formed message: at least [`HEADER_SIZE`] bytes,
    /// a parameter count of at most [`MAX_PARAMS`], room for the whole size
    /// table and, if `precompute` is set, room for every parameter payload.
    /// [`MessageData::parse`] would have accepted it.
    pub unsafe fn parse_unchecked(buffer: &'a [u8], precompute: bool) -> Self {
        let header = &*buffer.as_ptr().cast::<WireHeader>();
        let param_count = header.param_count;
        let table_end = layout::size_table_end(param_count.into());
        let sizes = ParamSizes::new(buffer.get_unchecked(HEADER_SIZE..table_end));

        let offsets = if precompute {
            match walk_offsets(sizes, |_, _, _| Ok::<(), Infallible>(())) {
                Ok(offsets) => Some(offsets),
                Err(never) => match never {},
            }
        } else {
            None
        };

        Self {
            buffer,
            header,
            param_count,
            sizes,
            offsets,
        }
    }

    /// The borrowed message buffer.
    pub fn buffer(&self) -> &'a [u8] {
        self.buffer
    }

    /// The 16-byte identifier at offset 0.
    pub fn id(&self) -> &'a [u8; ID_SIZE] {
        let header: &'a WireHeader = self.header;
        &header.id
    }

    /// The action code at offset 16, native byte order.
    pub fn action(&self) -> u32 {
        self.header.action
    }

    pub fn param_count(&self) -> u16 {
        self.param_count
    }

    pub fn param_sizes(&self) -> ParamSizes<'a> {
        self.sizes
    }

    /// Whether parameter offsets were computed at construction.
    pub fn is_precomputed(&self) -> bool {
        self.offsets.is_some()
    }

    /// The recorded start offset of parameter `index`.
    ///
    /// `None` when offsets were not precomputed or `index` is out of range.
    pub fn offset(&self, index: usize) -> Option<usize> {
        if index >= usize::from(self.param_count) {
            return None;
        }
        self.offsets.map(|offsets| offsets[index])
    }

    /// Start offset of parameter `index` without any check.
    ///
    /// # Safety
    ///
    /// Offsets must have been precomputed and `index` must be less than the
    /// parameter count.
    #[inline(always)]
    pub(crate) unsafe fn offset_unchecked(&self, index: usize) -> usize {
        *self.offsets.unwrap_unchecked().get_unchecked(index)
    }

    /// One past the last payload byte, when offsets are known.
    ///
    /// For a message without parameters this is the end of the (empty) size
    /// table, i.e. [`HEADER_SIZE`].
    pub fn payload_end(&self) -> Option<usize> {
        let offsets = self.offsets?;
        match usize::from(self.param_count).checked_sub(1) {
            None => Some(HEADER_SIZE),
            Some(last) => Some(offsets[last] + self.sizes.get(last)? as usize),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::layout::{OFFSET_ACTION, OFFSET_PARAM_COUNT};

    /// Builds a message buffer with the given sizes and payload bytes.
    fn frame(action: u32, sizes: &[u32], payload: &[u8]) -> Vec<u8> {
        let mut buf = vec![0u8; HEADER_SIZE];
        buf[OFFSET_ACTION..OFFSET_ACTION + 4].copy_from_slice(&action.to_ne_bytes());
        buf[OFFSET_PARAM_COUNT..OFFSET_PARAM_COUNT + 2]
            .copy_from_slice(&(sizes.len() as u16).to_ne_bytes());
        for size in sizes {
            buf.extend_from_slice(&size.to_ne_bytes());
        }
        buf.extend_from_slice(payload);
        buf
    }

    #[test]
    fn test_parse_caches_count_and_sizes() {
        // Arrange
        let buf = frame(7, &[1, 2, 3], &[0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);

        // Act
        let data = MessageData::parse(&buf, false).expect("well-formed buffer");

        // Assert
        assert_eq!(data.param_count(), 3);
        assert_eq!(data.param_sizes().iter().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(!data.is_precomputed());
        assert_eq!(data.offset(0), None);
    }

    #[test]
    fn test_precompute_records_packed_offsets() {
        let buf = frame(7, &[1, 2, 3], &[0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);

        let data = MessageData::parse(&buf, true).expect("well-formed buffer");

        assert_eq!(data.offset(0), Some(36));
        assert_eq!(data.offset(1), Some(37));
        assert_eq!(data.offset(2), Some(39));
        assert_eq!(data.offset(3), None, "index past count has no offset");
        assert_eq!(data.payload_end(), Some(42));
    }

    #[test]
    fn test_zero_sized_params_share_an_offset() {
        let buf = frame(0, &[0, 0, 2], &[0x01, 0x02]);

        let data = MessageData::parse(&buf, true).expect("well-formed buffer");

        assert_eq!(data.offset(0), Some(36));
        assert_eq!(data.offset(1), Some(36));
        assert_eq!(data.offset(2), Some(36));
    }

    #[test]
    fn test_precompute_stops_at_first_overflowing_param() {
        // Second parameter claims 10 bytes but only 2 remain.
        let buf = frame(0, &[1, 10, 1], &[0x01, 0x02, 0x03]);

        let err = MessageData::parse(&buf, true).unwrap_err();

        assert_eq!(
            err,
            DecodeError::ParamOverflow {
                index: 1,
                offset: 37,
                size: 10,
                buffer_size: 39,
            }
        );
    }

    #[test]
    fn test_huge_param_size_does_not_wrap() {
        let buf = frame(0, &[u32::MAX], &[]);

        let err = MessageData::parse(&buf, true).unwrap_err();

        assert!(matches!(err, DecodeError::ParamOverflow { index: 0, .. }));
    }

    #[test]
    fn test_overflowing_sizes_are_accepted_without_precompute() {
        let buf = frame(0, &[100], &[]);

        let data = MessageData::parse(&buf, false).expect("span is not checked lazily");

        assert_eq!(data.param_sizes().get(0), Some(100));
    }

    #[test]
    fn test_short_header_is_too_small() {
        let buf = [0u8; 10];

        let err = MessageData::parse(&buf, false).unwrap_err();

        assert_eq!(
            err,
            DecodeError::BufferTooSmall {
                needed: 24,
                available: 10,
            }
        );
    }

    #[test]
    fn test_truncated_size_table_is_too_small() {
        let mut buf = frame(0, &[1, 1], &[]);
        buf.truncate(HEADER_SIZE + 4);

        let err = MessageData::parse(&buf, false).unwrap_err();

        assert_eq!(
            err,
            DecodeError::BufferTooSmall {
                needed: 32,
                available: 28,
            }
        );
    }

    #[test]
    fn test_too_many_params_wins_over_short_table() {
        let mut buf = vec![0u8; HEADER_SIZE];
        buf[OFFSET_PARAM_COUNT..OFFSET_PARAM_COUNT + 2].copy_from_slice(&9u16.to_ne_bytes());

        let err = MessageData::parse(&buf, false).unwrap_err();

        assert_eq!(err, DecodeError::TooManyParams { count: 9, max: 8 });
    }

    #[test]
    fn test_unchecked_parse_matches_checked_parse() {
        let buf = frame(0xDEAD_BEEF, &[4, 0, 2], &[1, 2, 3, 4, 5, 6]);

        let checked = MessageData::parse(&buf, true).expect("well-formed buffer");
        // SAFETY: the checked parse above accepted the same buffer.
        let unchecked = unsafe { MessageData::parse_unchecked(&buf, true) };

        assert_eq!(unchecked.action(), checked.action());
        assert_eq!(unchecked.param_count(), checked.param_count());
        assert_eq!(unchecked.param_sizes(), checked.param_sizes());
        for index in 0..3 {
            assert_eq!(unchecked.offset(index), checked.offset(index));
        }
    }

    #[test]
    fn test_param_sizes_total_and_get_past_end() {
        let buf = frame(0, &[3, 5], &[0; 8]);
        let data = MessageData::parse(&buf, false).expect("well-formed buffer");

        let sizes = data.param_sizes();

        assert_eq!(sizes.len(), 2);
        assert_eq!(sizes.total(), 8);
        assert_eq!(sizes.get(2), None);
    }

    #[test]
    fn test_payload_end_without_params_is_header_size() {
        let buf = frame(0, &[], &[]);

        let data = MessageData::parse(&buf, true).expect("well-formed buffer");

        assert_eq!(data.payload_end(), Some(HEADER_SIZE));
    }
}
