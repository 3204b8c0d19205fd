//! Canonical protocol types
//!
//! This module defines the request, response, and error shapes the client
//! speaks. Adapters in [`crate::providers`] convert every upstream wire format
//! to and from these structures.

pub mod error;
pub mod types;

pub use error::{EnvelopeType, ErrorBody, ErrorEnvelope, ErrorKind};
pub use types::{
    CanonicalMessage, CanonicalRequest, CanonicalResponse, ContentPart, ImageSource,
    MessageContent, MessageType, Role, StopReason, Usage,
};
