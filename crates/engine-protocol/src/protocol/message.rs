//! Strict, fully validated message decoder.
//!
//! [`Message`] is the façade to use on bytes that came from a peer, a socket
//! or a file. Construction checks alignment, the header, and the size table
//! and (optionally) every parameter span. Every accessor that can fail
//! returns a [`DecodeError`] instead of reading out of bounds.
//!
//! # Example
//!
//! ```rust
//! use engine_protocol::protocol::Message;
//!
//! // A u32-backed buffer is always 4-byte aligned.
//! let words = [0u32; 6];
//! let bytes: &[u8] = bytemuck::cast_slice(&words);
//!
//! let msg = Message::with_precompute(bytes, true).unwrap();
//! assert_eq!(msg.param_count(), 0);
//! assert_eq!(msg.params_data().unwrap(), None);
//! ```

use tracing::{debug, trace};
use uuid::Uuid;

use crate::protocol::data::{MessageData, ParamSizes};
use crate::protocol::error::DecodeError;
use crate::protocol::layout::{ID_SIZE, REQUIRED_ALIGNMENT};
use crate::protocol::request::Request;

/// A validated, read-only view over one message buffer.
#[derive(Debug, Clone, Copy)]
pub struct Message<'a> {
    data: MessageData<'a>,
}

impl<'a> Message<'a> {
    /// Decodes `buffer` without precomputing parameter offsets.
    ///
    /// Header accessors work; [`Message::param`] will report
    /// [`DecodeError::ParamOffsetNotComputed`]. Use
    /// [`Message::with_precompute`] to read parameters.
    ///
    /// # Errors
    ///
    /// See [`Message::with_precompute`].
    pub fn new(buffer: &'a [u8]) -> Result<Self, DecodeError> {
        Self::with_precompute(buffer, false)
    }

    /// Decodes `buffer`, optionally validating and caching every parameter's
    /// start offset.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::Misaligned`] if `buffer` does not start on a 4-byte
    ///   boundary.
    /// - [`DecodeError::BufferTooSmall`], [`DecodeError::TooManyParams`] for a
    ///   malformed header or size table.
    /// - [`DecodeError::ParamOverflow`] if `precompute` is set and a parameter
    ///   runs past the end of the buffer.
    pub fn with_precompute(buffer: &'a [u8], precompute: bool) -> Result<Self, DecodeError> {
        let decoded =
            check_alignment(buffer).and_then(|()| MessageData::parse(buffer, precompute));

        match decoded {
            Ok(data) => {
                trace!(
                    len = buffer.len(),
                    param_count = data.param_count(),
                    precompute,
                    "decoded message buffer"
                );
                Ok(Self { data })
            }
            Err(err) => {
                debug!(
                    len = buffer.len(),
                    precompute,
                    caller_bug = err.is_caller_bug(),
                    error = %err,
                    "rejected message buffer"
                );
                Err(err)
            }
        }
    }

    /// The 16-byte opaque identifier, unchanged.
    pub fn id(&self) -> &'a [u8; ID_SIZE] {
        self.data.id()
    }

    /// The identifier as a [`Uuid`], byte for byte.
    pub fn uuid(&self) -> Uuid {
        Uuid::from_bytes(*self.data.id())
    }

    /// The 32-bit action code in native byte order.
    pub fn action(&self) -> u32 {
        self.data.action()
    }

    pub fn param_count(&self) -> u16 {
        self.data.param_count()
    }

    /// View over the parameter size table.
    pub fn param_sizes(&self) -> ParamSizes<'a> {
        self.data.param_sizes()
    }

    /// The parameter size table as `&[u32]`, without copying.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Misaligned`] if the table cannot be viewed as `u32`s.
    /// The alignment check at construction makes this unreachable.
    pub fn param_size_table(&self) -> Result<&'a [u32], DecodeError> {
        self.data
            .param_sizes()
            .as_slice()
            .ok_or_else(|| misaligned(self.data.buffer()))
    }

    /// Whether parameter offsets were computed at construction.
    pub fn is_precomputed(&self) -> bool {
        self.data.is_precomputed()
    }

    /// The payload of parameter `index`.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::ParamIndexOutOfRange`] if `index >= param_count()`.
    /// - [`DecodeError::ParamOffsetNotComputed`] if the message was built
    ///   without precompute.
    /// - [`DecodeError::ParamOverflow`] if the span runs past the buffer.
    pub fn param(&self, index: usize) -> Result<&'a [u8], DecodeError> {
        let count = self.data.param_count();
        let out_of_range = DecodeError::ParamIndexOutOfRange { index, count };
        if index >= usize::from(count) {
            return Err(out_of_range);
        }

        let offset = self
            .data
            .offset(index)
            .ok_or(DecodeError::ParamOffsetNotComputed { index })?;
        let size = self.data.param_sizes().get(index).ok_or(out_of_range)?;

        let buffer = self.data.buffer();
        offset
            .checked_add(size as usize)
            .and_then(|end| buffer.get(offset..end))
            .ok_or(DecodeError::ParamOverflow {
                index,
                offset,
                size,
                buffer_size: buffer.len(),
            })
    }

    /// Iterates every parameter payload in order.
    pub fn params(&self) -> impl Iterator<Item = Result<&'a [u8], DecodeError>> + 'a {
        let this = *self;
        (0..usize::from(this.param_count())).map(move |index| this.param(index))
    }

    /// The packed payload region, from parameter 0's first byte through the
    /// last parameter's last byte.
    ///
    /// Returns `Ok(None)` for a message without parameters.
    ///
    /// # Errors
    ///
    /// [`DecodeError::ParamOffsetNotComputed`] if the message has parameters
    /// but was built without precompute.
    pub fn params_data(&self) -> Result<Option<&'a [u8]>, DecodeError> {
        let Some(last) = usize::from(self.data.param_count()).checked_sub(1) else {
            return Ok(None);
        };
        self.param(0)?;
        let tail = self.param(last)?;

        let (Some(start), Some(tail_start)) = (self.data.offset(0), self.data.offset(last)) else {
            return Err(DecodeError::ParamOffsetNotComputed { index: 0 });
        };
        Ok(self.data.buffer().get(start..tail_start + tail.len()))
    }

    /// Bytes covered by the header, the size table and every payload.
    ///
    /// `None` unless offsets were precomputed. Trailing bytes in the buffer
    /// beyond this length are not part of the message.
    pub fn payload_len(&self) -> Option<usize> {
        self.data.payload_end()
    }

    /// The whole borrowed buffer.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data.buffer()
    }

    /// Re-exposes this already validated message through the unchecked
    /// [`Request`] façade, for hot paths that replay it.
    ///
    /// The returned request inherits this message's precompute choice.
    pub fn as_trusted(&self) -> Request<'a> {
        Request::from_validated(self.data)
    }
}

/// An empty slice carries a placeholder address, so it is left for the
/// length check to reject.
fn check_alignment(buffer: &[u8]) -> Result<(), DecodeError> {
    if buffer.is_empty() || (buffer.as_ptr() as usize) % REQUIRED_ALIGNMENT == 0 {
        Ok(())
    } else {
        Err(misaligned(buffer))
    }
}

fn misaligned(buffer: &[u8]) -> DecodeError {
    DecodeError::Misaligned {
        address: buffer.as_ptr() as usize,
        required: REQUIRED_ALIGNMENT,
    }
}
