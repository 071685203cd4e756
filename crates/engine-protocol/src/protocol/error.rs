//! Errors surfaced by the strict decoder.
//!
//! Every failure is terminal for the buffer that produced it: the decoder
//! never retries, never returns a partial decode and never repairs input.
//! The caller decides whether to drop the message, close the connection or
//! escalate.

use thiserror::Error;

/// Validation failures reported by [`crate::protocol::Message`].
///
/// The performance façade ([`crate::protocol::Request`]) has no error type:
/// feeding it a buffer that would produce any of these is undefined behavior.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer's base address is not a multiple of the required alignment.
    ///
    /// This points at the buffer's source (a caller bug), not at the bytes
    /// on the wire.
    #[error("buffer at {address:#x} is not {required}-byte aligned")]
    Misaligned { address: usize, required: usize },

    /// The buffer is shorter than the fixed header, or shorter than the
    /// header plus the parameter size table.
    #[error("buffer too small: need at least {needed} bytes, got {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// The header declares more parameters than the protocol allows.
    #[error("too many parameters: header declares {count}, maximum is {max}")]
    TooManyParams { count: u16, max: usize },

    /// A parameter index at or beyond the declared parameter count.
    #[error("parameter index {index} out of range for {count} parameter(s)")]
    ParamIndexOutOfRange { index: usize, count: u16 },

    /// Parameter access on a decoder constructed without precomputed offsets.
    #[error("offset of parameter {index} was not computed; construct with precompute enabled")]
    ParamOffsetNotComputed { index: usize },

    /// A parameter's declared span runs past the end of the buffer.
    #[error("parameter {index} spans {size} byte(s) from offset {offset}, past buffer size {buffer_size}")]
    ParamOverflow {
        index: usize,
        offset: usize,
        size: u32,
        buffer_size: usize,
    },
}

impl DecodeError {
    /// Returns `true` when the failure was caused by how the decoder was
    /// called rather than by the content of the buffer.
    pub fn is_caller_bug(&self) -> bool {
        matches!(
            self,
            DecodeError::Misaligned { .. }
                | DecodeError::ParamIndexOutOfRange { .. }
                | DecodeError::ParamOffsetNotComputed { .. }
        )
    }
}
