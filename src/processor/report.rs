//! Per-entry results of processing an envelope, and their logging.
//!
//! Processing never fails as a whole. Each envelope entry produces an
//! [`EntryReport`]; the caller decides what to do with the list, usually
//! [`ProcessReport::log`].

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{debug, error, info, trace, warn};

use crate::envelope::{DecodeError, PLACEHOLDER_BODY};
use crate::trigger::IgnoreReason;
use crate::types::{EventType, IssueNumber, MalformedRepoName, RepoId};
use crate::webhooks::ParseError;

/// Pipeline stage an entry error originated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Reading headers or base64 content out of the envelope.
    Decoding,
    /// Choosing and applying a payload shape for the event type.
    Dispatching,
    /// Evaluating the trigger label.
    Matching,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Decoding => "decoding",
            Stage::Dispatching => "dispatching",
            Stage::Matching => "matching",
        };
        f.write_str(s)
    }
}

/// Errors local to a single envelope entry.
#[derive(Debug, Error)]
pub enum EntryError {
    /// The headers carry no event type.
    #[error("missing required header: {0}")]
    MissingHeader(&'static str),

    /// Bad base64, bad UTF-8, or an entry of the wrong JSON type.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(#[source] DecodeError),

    /// No payload shape is registered for the event type (or it is unknown).
    #[error("unexpected webhook type: '{}'", .0.as_ref().map(EventType::as_str).unwrap_or(""))]
    UnrecognizedEventType(Option<EventType>),

    /// The decoded payload does not match the event's shape.
    #[error("failed to deserialize payload: {0}")]
    DeserializationFailure(#[source] serde_json::Error),

    /// The repository full name has no owner separator.
    #[error("{0}")]
    MalformedRepositoryName(#[from] MalformedRepoName),
}

impl EntryError {
    pub fn stage(&self) -> Stage {
        match self {
            EntryError::MissingHeader(_) | EntryError::MalformedEnvelope(_) => Stage::Decoding,
            EntryError::UnrecognizedEventType(_) | EntryError::DeserializationFailure(_) => {
                Stage::Dispatching
            }
            EntryError::MalformedRepositoryName(_) => Stage::Matching,
        }
    }
}

impl From<DecodeError> for EntryError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::MissingHeader(header) => EntryError::MissingHeader(header),
            other => EntryError::MalformedEnvelope(other),
        }
    }
}

impl From<ParseError> for EntryError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Unrecognized(event_type) => EntryError::UnrecognizedEventType(event_type),
            ParseError::JsonError(e) => EntryError::DeserializationFailure(e),
        }
    }
}

/// What happened to an entry that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// The headers entry yielded this event type.
    EventType(EventType),
    /// The labeler was asked to classify this issue.
    Invoked { repo: RepoId, issue: IssueNumber },
    /// The event was understood but did not match the trigger.
    NotTriggered { repo: RepoId, reason: IgnoreReason },
    /// The entry is neither headers nor content.
    Ignored,
}

/// The result of processing one envelope entry.
#[derive(Debug)]
pub struct EntryReport {
    /// The envelope key this entry was stored under.
    pub key: String,
    pub outcome: Result<EntryOutcome, EntryError>,
    /// The decoded content, if decoding got that far. Kept for diagnostics.
    pub decoded: Option<String>,
}

impl EntryReport {
    pub fn new(
        key: impl Into<String>,
        outcome: Result<EntryOutcome, EntryError>,
        decoded: Option<String>,
    ) -> Self {
        EntryReport {
            key: key.into(),
            outcome,
            decoded,
        }
    }

    /// Returns the entry's error, if processing it failed.
    pub fn error(&self) -> Option<&EntryError> {
        self.outcome.as_ref().err()
    }

    fn status(&self) -> &'static str {
        match &self.outcome {
            Ok(EntryOutcome::EventType(_)) => "event_type",
            Ok(EntryOutcome::Invoked { .. }) => "invoked",
            Ok(EntryOutcome::NotTriggered { .. }) => "not_triggered",
            Ok(EntryOutcome::Ignored) => "ignored",
            Err(_) => "error",
        }
    }

    fn log(&self) {
        let key = self.key.as_str();
        match &self.outcome {
            Ok(EntryOutcome::EventType(event_type)) => {
                info!(entry = key, event_type = %event_type, "Received event");
            }
            Ok(EntryOutcome::Invoked { repo, issue }) => {
                info!(repo = %repo, issue = %issue, "Requested label prediction");
            }
            Ok(EntryOutcome::NotTriggered { repo, reason }) => {
                debug!(repo = %repo, reason = ?reason, "Event did not match trigger");
            }
            Ok(EntryOutcome::Ignored) => {
                trace!(entry = key, "Ignoring envelope entry");
            }
            Err(err) => {
                error!(
                    entry = key,
                    stage = %err.stage(),
                    error = %err,
                    details = ?err,
                    decoded = self.decoded.as_deref().unwrap_or(""),
                    "Failed to process envelope entry"
                );
                return;
            }
        }
        if let Some(decoded) = &self.decoded {
            trace!(entry = key, decoded = decoded.as_str(), "Decoded content");
        }
    }
}

/// The result of processing a whole envelope body.
#[derive(Debug)]
pub enum ProcessReport {
    /// The body was the placeholder and was not parsed.
    Placeholder,
    /// The body was not a JSON object, so there were no entries to process.
    Rejected(EntryError),
    /// One report per envelope entry, headers first, then content.
    Processed(Vec<EntryReport>),
}

impl ProcessReport {
    pub fn entries(&self) -> &[EntryReport] {
        match self {
            ProcessReport::Processed(entries) => entries,
            _ => &[],
        }
    }

    /// All entry-level errors, including a rejected envelope.
    pub fn errors(&self) -> Vec<&EntryError> {
        match self {
            ProcessReport::Rejected(err) => vec![err],
            _ => self.entries().iter().filter_map(EntryReport::error).collect(),
        }
    }

    /// Number of times the labeler was invoked.
    pub fn invocations(&self) -> usize {
        self.entries()
            .iter()
            .filter(|e| matches!(e.outcome, Ok(EntryOutcome::Invoked { .. })))
            .count()
    }

    /// Emits one log record per entry.
    pub fn log(&self) {
        match self {
            ProcessReport::Placeholder => {
                warn!(body = PLACEHOLDER_BODY, "Ignoring placeholder event body");
            }
            ProcessReport::Rejected(err) => {
                error!(error = %err, details = ?err, "Failed to parse event envelope");
            }
            ProcessReport::Processed(entries) => {
                for entry in entries {
                    entry.log();
                }
            }
        }
    }

    /// A serializable digest for API responses.
    pub fn summary(&self) -> ReportSummary {
        let entries = match self {
            ProcessReport::Placeholder => Vec::new(),
            ProcessReport::Rejected(err) => vec![EntrySummary {
                key: "<envelope>".to_string(),
                status: "error",
                error: Some(err.to_string()),
            }],
            ProcessReport::Processed(entries) => entries
                .iter()
                .map(|e| EntrySummary {
                    key: e.key.clone(),
                    status: e.status(),
                    error: e.error().map(ToString::to_string),
                })
                .collect(),
        };
        ReportSummary {
            placeholder: matches!(self, ProcessReport::Placeholder),
            entries,
        }
    }
}

/// JSON digest of a [`ProcessReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub placeholder: bool,
    pub entries: Vec<EntrySummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySummary {
    pub key: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
