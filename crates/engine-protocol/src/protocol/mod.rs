//! Protocol module: wire layout, the shared decoder core and its two façades.

pub mod data;
pub mod error;
pub mod layout;
pub mod message;
pub mod request;

pub use data::{MessageData, ParamSizes};
pub use error::DecodeError;
pub use layout::{HEADER_SIZE, MAX_PARAMS};
pub use message::Message;
pub use request::Request;
