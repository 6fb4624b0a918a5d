//! Decoding of the outer notification envelope.
//!
//! An envelope is a JSON object whose `headers` entry carries the original
//! webhook headers (each header maps to an array of values) and whose
//! `content` entry carries the webhook body as base64-encoded UTF-8:
//!
//! ```json
//! {
//!   "headers": { "X-GitHub-Event": ["issues"], "X-GitHub-Delivery": ["..."] },
//!   "content": "eyJhY3Rpb24iOiAibGFiZWxlZCIsIC4uLn0="
//! }
//! ```
//!
//! Any other entries are carried through untouched and ignored downstream.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::types::EventType;

/// Envelope key holding the webhook headers.
pub const HEADERS_KEY: &str = "headers";
/// Envelope key holding the base64-encoded webhook body.
pub const CONTENT_KEY: &str = "content";
/// Header naming the GitHub event type.
pub const EVENT_HEADER: &str = "X-GitHub-Event";

/// Errors that can occur while decoding envelope entries.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The envelope body is not a JSON object.
    #[error("envelope is not a JSON object: {0}")]
    InvalidEnvelope(#[from] serde_json::Error),

    /// The event header is absent from the `headers` entry.
    #[error("missing required header: {0}")]
    MissingHeader(&'static str),

    /// The `headers` entry is not a JSON object.
    #[error("headers entry is not an object")]
    HeadersNotObject,

    /// The event header is present but not a non-empty array of strings.
    #[error("header {header} is malformed: {reason}")]
    MalformedHeader {
        header: &'static str,
        reason: &'static str,
    },

    /// The `content` entry is not a JSON string.
    #[error("content entry is not a string")]
    ContentNotString,

    /// The `content` entry is not valid base64.
    #[error("invalid base64 in content: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// The decoded content is not valid UTF-8.
    #[error("decoded content is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// The top-level entries of a notification envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    entries: Map<String, Value>,
}

impl Envelope {
    /// Parses an envelope body. The body must be a JSON object.
    pub fn parse(body: &str) -> Result<Self, DecodeError> {
        let entries: Map<String, Value> = serde_json::from_str(body)?;
        Ok(Envelope { entries })
    }

    /// Returns the raw `headers` entry, if present.
    pub fn headers(&self) -> Option<&Value> {
        self.entries.get(HEADERS_KEY)
    }

    /// Returns the raw `content` entry, if present.
    pub fn content(&self) -> Option<&Value> {
        self.entries.get(CONTENT_KEY)
    }

    /// Keys other than `headers` and `content`, in the map's iteration order.
    pub fn other_keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .keys()
            .map(String::as_str)
            .filter(|k| *k != HEADERS_KEY && *k != CONTENT_KEY)
    }

    /// Returns the number of top-level entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the envelope has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Extracts the event type from the `headers` entry.
///
/// The header name is matched ASCII case-insensitively, since relays
/// commonly lower-case HTTP header names. The first element of the header's
/// value array is the event type.
pub fn decode_headers(headers: &Value) -> Result<EventType, DecodeError> {
    let headers = headers.as_object().ok_or(DecodeError::HeadersNotObject)?;

    let value = headers
        .get(EVENT_HEADER)
        .or_else(|| find_header_ignore_case(headers, EVENT_HEADER))
        .ok_or(DecodeError::MissingHeader(EVENT_HEADER))?;

    let values = value.as_array().ok_or(DecodeError::MalformedHeader {
        header: EVENT_HEADER,
        reason: "expected an array of values",
    })?;
    let first = values.first().ok_or(DecodeError::MalformedHeader {
        header: EVENT_HEADER,
        reason: "value array is empty",
    })?;
    let event_type = first.as_str().ok_or(DecodeError::MalformedHeader {
        header: EVENT_HEADER,
        reason: "first value is not a string",
    })?;

    Ok(EventType::new(event_type))
}

fn find_header_ignore_case<'a>(headers: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v)
}

/// Decodes the `content` entry from base64 into UTF-8 text.
///
/// ASCII whitespace inside the encoded text is skipped, so line-wrapped
/// base64 decodes the same as the unwrapped form.
pub fn decode_content(content: &Value) -> Result<String, DecodeError> {
    let encoded = content.as_str().ok_or(DecodeError::ContentNotString)?;
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD.decode(compact)?;
    Ok(String::from_utf8(bytes)?)
}
