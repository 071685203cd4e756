//! # engine-protocol
//!
//! Zero-copy decoding and validation of the engine's fixed-layout
//! request/response messages: a 16-byte identifier, a 32-bit action code and
//! up to eight variable-length binary parameters.
//!
//! This crate never owns, copies or writes message bytes, and performs no
//! I/O. Callers hand it a borrowed buffer and receive read-only views whose
//! lifetimes are tied to that buffer.
//!
//! # Two façades over one decoder
//!
//! - **[`Message`]** – strict. Checks 4-byte alignment, the header, the size
//!   table and (with precompute) every parameter span. Every failure is a
//!   typed [`DecodeError`]. Use it for anything that came from outside the
//!   process.
//!
//! - **[`Request`]** – performance. Same layout, same offset walk, no checks.
//!   Malformed input is undefined behavior by contract; constructing one from
//!   raw bytes is `unsafe`. Use it to replay a message that has already been
//!   validated, e.g. via [`Message::as_trusted`].
//!
//! Both delegate to [`protocol::MessageData`], the decoder core.
//!
//! # Precompute
//!
//! Construction takes a `precompute` flag. When set, parameter offsets are
//! computed (and, in strict mode, bounds-checked) once up front, bounded by
//! eight iterations. When clear, construction is cheaper but parameters
//! cannot be read: the strict façade reports
//! [`DecodeError::ParamOffsetNotComputed`].

pub mod protocol;

pub use protocol::error::DecodeError;
pub use protocol::layout::{HEADER_SIZE, MAX_PARAMS};
pub use protocol::message::Message;
pub use protocol::request::Request;
