//! The notification envelope that wraps each webhook delivery.

pub mod decoder;

pub use decoder::{
    CONTENT_KEY, DecodeError, EVENT_HEADER, Envelope, HEADERS_KEY, decode_content, decode_headers,
};

/// A fixed body sent by default/test triggers instead of a real envelope.
///
/// Bodies equal to this are short-circuited before any parsing.
pub const PLACEHOLDER_BODY: &str = "This is an event body";

/// Returns true if `body` is the placeholder rather than a real envelope.
pub fn is_placeholder(body: &str) -> bool {
    body == PLACEHOLDER_BODY
}
