//! GitHub webhook payload parser.
//!
//! This module turns decoded webhook JSON into typed [`GitHubEvent`] values.
//!
//! # Parsing Strategy
//!
//! 1. The event type (from the `X-GitHub-Event` header) is looked up in
//!    [`EVENT_KINDS`]
//! 2. No entry means the event is unrecognized; the caller skips it
//! 3. Otherwise the payload is deserialized into that kind's shape
//! 4. Malformed payloads return `Err` with details
//!
//! Supporting a new event means adding a row to [`EVENT_KINDS`], a variant to
//! [`EventKind`] and a parse function.

use serde::Deserialize;
use thiserror::Error;

use crate::types::{EventType, IssueNumber};

use super::events::{GitHubEvent, IssueAction, IssuesEvent};

/// Error type for webhook parsing failures.
#[derive(Debug, Error)]
pub enum ParseError {
    /// No payload shape is registered for this event type.
    #[error("unexpected webhook type: '{}'", .0.as_ref().map(EventType::as_str).unwrap_or(""))]
    Unrecognized(Option<EventType>),

    /// JSON deserialization failed (includes missing required fields).
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// The payload shapes the parser knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Issues,
}

/// Lookup table from `X-GitHub-Event` values to payload shapes.
pub const EVENT_KINDS: &[(&str, EventKind)] = &[("issues", EventKind::Issues)];

impl EventKind {
    /// Finds the payload shape registered for `event_type`, if any.
    pub fn from_event_type(event_type: &str) -> Option<EventKind> {
        EVENT_KINDS
            .iter()
            .find(|(name, _)| *name == event_type)
            .map(|(_, kind)| *kind)
    }

    /// Deserializes `payload` into this kind's event.
    pub fn parse(self, payload: &[u8]) -> Result<GitHubEvent, ParseError> {
        match self {
            EventKind::Issues => parse_issues(payload).map(GitHubEvent::Issues),
        }
    }
}

/// Parses a decoded webhook payload into a typed event.
///
/// # Arguments
///
/// * `event_type` - The value of the `X-GitHub-Event` header, if it is known
/// * `payload` - The decoded JSON payload bytes
///
/// # Returns
///
/// * `Ok(event)` - Successfully parsed a known event type
/// * `Err(ParseError::Unrecognized)` - Absent or unsupported event type
/// * `Err(ParseError::JsonError)` - Malformed payload or missing required fields
///
/// # Examples
///
/// ```
/// use issue_labeler::types::EventType;
/// use issue_labeler::webhooks::parse_webhook;
///
/// let payload = br#"{
///     "action": "labeled",
///     "label": { "name": "customer-reported" },
///     "issue": { "number": 42 },
///     "repository": { "full_name": "dotnet/runtime" }
/// }"#;
///
/// let result = parse_webhook(Some(&EventType::new("issues")), payload);
/// assert!(result.is_ok());
/// ```
pub fn parse_webhook(
    event_type: Option<&EventType>,
    payload: &[u8],
) -> Result<GitHubEvent, ParseError> {
    let kind = event_type
        .and_then(|t| EventKind::from_event_type(t.as_str()))
        .ok_or_else(|| ParseError::Unrecognized(event_type.cloned()))?;
    kind.parse(payload)
}

// ============================================================================
// issues event
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawIssuesPayload {
    action: String,
    label: Option<RawLabel>,
    issue: RawIssue,
    repository: RawRepository,
}

#[derive(Debug, Deserialize)]
struct RawLabel {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawIssue {
    number: u64,
}

#[derive(Debug, Deserialize)]
struct RawRepository {
    full_name: String,
}

fn parse_issues(payload: &[u8]) -> Result<IssuesEvent, ParseError> {
    let raw: RawIssuesPayload = serde_json::from_slice(payload)?;

    Ok(IssuesEvent {
        action: IssueAction::parse(&raw.action),
        label: raw.label.and_then(|l| l.name),
        issue: IssueNumber(raw.issue.number),
        repository_full_name: raw.repository.full_name,
    })
}
