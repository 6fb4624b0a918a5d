//! Webhook handling for GitHub events.
//!
//! This module provides:
//! - Typed event representations
//! - Table-driven dispatch from the `X-GitHub-Event` value to a payload parser

pub mod events;
pub mod parser;

pub use events::{GitHubEvent, IssueAction, IssuesEvent};
pub use parser::{EVENT_KINDS, EventKind, ParseError, parse_webhook};
