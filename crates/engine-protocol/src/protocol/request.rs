//! Unchecked message decoder for trusted, latency-critical paths.
//!
//! # Contract
//!
//! [`Request`] performs **no validation at all**. It lays the same header
//! view and runs the same offset walk as [`crate::protocol::Message`], but
//! every check is skipped. Handing it a buffer that the strict decoder would
//! reject, reading a parameter past the count, or reading a parameter from a
//! request built without precompute is **undefined behavior**.
//!
//! That is the whole point of this type. Do not add checks here; callers who
//! need them want [`crate::protocol::Message`]. Typical use is replaying a
//! message that was already validated upstream, either through
//! [`crate::protocol::Message::as_trusted`] (safe) or through
//! [`Request::new_unchecked`] on bytes whose provenance is known.

use uuid::Uuid;

use crate::protocol::data::{MessageData, ParamSizes};
use crate::protocol::layout::ID_SIZE;

/// An unchecked, read-only view over one message buffer.
#[derive(Debug, Clone, Copy)]
pub struct Request<'a> {
    data: MessageData<'a>,
}

impl<'a> Request<'a> {
    /// Builds a request over `buffer` without validating anything.
    ///
    /// No alignment is required.
    ///
    /// # Safety
    ///
    /// `buffer` must be a well-formed message:
    ///
    /// - at least 24 bytes long;
    /// - a parameter count of at most 8;
    /// - at least `24 + 4 * param_count` bytes long;
    /// - if `precompute` is set, every parameter payload lies inside the
    ///   buffer.
    ///
    /// Any buffer [`crate::protocol::Message::with_precompute`] accepts with
    /// the same `precompute` value qualifies.
    #[inline]
    pub unsafe fn new_unchecked(buffer: &'a [u8], precompute: bool) -> Self {
        Self {
            data: MessageData::parse_unchecked(buffer, precompute),
        }
    }

    pub(crate) fn from_validated(data: MessageData<'a>) -> Self {
        Self { data }
    }

    #[inline]
    pub fn id(&self) -> &'a [u8; ID_SIZE] {
        self.data.id()
    }

    #[inline]
    pub fn uuid(&self) -> Uuid {
        Uuid::from_bytes(*self.data.id())
    }

    #[inline]
    pub fn action(&self) -> u32 {
        self.data.action()
    }

    #[inline]
    pub fn param_count(&self) -> u16 {
        self.data.param_count()
    }

    #[inline]
    pub fn param_sizes(&self) -> ParamSizes<'a> {
        self.data.param_sizes()
    }

    pub fn is_precomputed(&self) -> bool {
        self.data.is_precomputed()
    }

    /// The payload of parameter `index`, with no checks.
    ///
    /// # Safety
    ///
    /// The request must have been built with precompute, and `index` must be
    /// less than [`Request::param_count`].
    #[inline]
    pub unsafe fn param_unchecked(&self, index: usize) -> &'a [u8] {
        let offset = self.data.offset_unchecked(index);
        let size = self.data.param_sizes().get_unchecked(index) as usize;
        self.data.buffer().get_unchecked(offset..offset + size)
    }

    /// The packed payload region, or `None` when there are no parameters.
    ///
    /// # Safety
    ///
    /// If the message has parameters, the request must have been built with
    /// precompute.
    #[inline]
    pub unsafe fn params_data_unchecked(&self) -> Option<&'a [u8]> {
        let last = usize::from(self.data.param_count()).checked_sub(1)?;
        let start = self.data.offset_unchecked(0);
        let end = self.data.offset_unchecked(last)
            + self.data.param_sizes().get_unchecked(last) as usize;
        Some(self.data.buffer().get_unchecked(start..end))
    }
}
