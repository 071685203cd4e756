//! Wire layout of an engine message.
//!
//! ```text
//! offset  size  field
//! 0       16    id (opaque)
//! 16      4     action (u32)
//! 20      2     param_count (u16)
//! 22      2     reserved
//! 24      4*N   param_size[0..N) (u32 each)
//! 24+4N   ...   packed parameter payloads
//! ```
//!
//! All multi-byte integers use the host's native byte order. There is no
//! normalization: producer and consumer are expected to share a host (or at
//! least an endianness).

use bytemuck::{Pod, Zeroable};

/// Offset of the 16-byte opaque identifier.
pub const OFFSET_ID: usize = 0;

/// Width of the opaque identifier in bytes.
pub const ID_SIZE: usize = 16;

/// Offset of the 32-bit action code.
pub const OFFSET_ACTION: usize = 16;

/// Offset of the 16-bit parameter count.
pub const OFFSET_PARAM_COUNT: usize = 20;

/// Offset of the two reserved bytes. Ignored on decode.
pub const OFFSET_RESERVED: usize = 22;

/// Offset of the parameter size table; also the size of the fixed header.
pub const OFFSET_PARAMS: usize = 24;

/// Total size of the fixed header in bytes.
pub const HEADER_SIZE: usize = OFFSET_PARAMS;

/// Width of one entry in the parameter size table.
pub const PARAM_SIZE_WIDTH: usize = 4;

/// Maximum number of parameters a message may carry.
pub const MAX_PARAMS: usize = 8;

/// Base-address alignment the strict decoder requires of its buffer.
pub const REQUIRED_ALIGNMENT: usize = 4;

/// Returns the offset one past the end of the size table for `param_count`
/// parameters, which is also where parameter 0's payload begins.
#[inline]
pub const fn size_table_end(param_count: usize) -> usize {
    OFFSET_PARAMS + param_count * PARAM_SIZE_WIDTH
}

/// Plain-old-data view of the 24-byte fixed header.
///
/// The struct is `packed`, so it has an alignment of 1 and can be laid over
/// any byte buffer of at least [`HEADER_SIZE`] bytes without copying.
/// Multi-byte fields are read by value; the compiler emits unaligned loads.
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
#[repr(C, packed)]
pub struct WireHeader {
    /// Opaque message identifier.
    pub id: [u8; ID_SIZE],
    /// Operation code, native byte order.
    pub action: u32,
    /// Number of entries in the parameter size table.
    pub param_count: u16,
    /// Reserved, ignored.
    pub reserved: u16,
}

// The header view must cover exactly the fixed header.
const _: () = assert!(std::mem::size_of::<WireHeader>() == HEADER_SIZE);
const _: () = assert!(std::mem::align_of::<WireHeader>() == 1);
