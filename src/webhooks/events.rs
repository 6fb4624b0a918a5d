//! GitHub webhook event types.
//!
//! Typed representations of the webhook events the labeler understands. Each
//! variant carries only the fields the trigger matcher needs.
//!
//! # Event Types
//!
//! - `issues` - issue lifecycle; `labeled` actions may trigger prediction

use crate::types::IssueNumber;

/// A parsed GitHub webhook event.
///
/// Unknown event types never produce a value of this enum; the parser
/// reports them as unrecognized instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitHubEvent {
    /// An issue was opened, edited, labeled, etc.
    Issues(IssuesEvent),
}

/// Action performed on an issue.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IssueAction {
    Opened,
    Edited,
    Closed,
    Reopened,
    Labeled,
    Unlabeled,
    Assigned,
    Unassigned,
    Transferred,
    /// Any action not listed above. GitHub adds actions over time, so these
    /// are carried through rather than rejected.
    Other(String),
}

impl IssueAction {
    pub fn parse(action: &str) -> Self {
        match action {
            "opened" => IssueAction::Opened,
            "edited" => IssueAction::Edited,
            "closed" => IssueAction::Closed,
            "reopened" => IssueAction::Reopened,
            "labeled" => IssueAction::Labeled,
            "unlabeled" => IssueAction::Unlabeled,
            "assigned" => IssueAction::Assigned,
            "unassigned" => IssueAction::Unassigned,
            "transferred" => IssueAction::Transferred,
            other => IssueAction::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            IssueAction::Opened => "opened",
            IssueAction::Edited => "edited",
            IssueAction::Closed => "closed",
            IssueAction::Reopened => "reopened",
            IssueAction::Labeled => "labeled",
            IssueAction::Unlabeled => "unlabeled",
            IssueAction::Assigned => "assigned",
            IssueAction::Unassigned => "unassigned",
            IssueAction::Transferred => "transferred",
            IssueAction::Other(s) => s,
        }
    }
}

/// An `issues` webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuesEvent {
    /// The action that triggered this event.
    pub action: IssueAction,

    /// Name of the label that was added or removed.
    ///
    /// Only present for `labeled` and `unlabeled` actions.
    pub label: Option<String>,

    /// The issue number.
    pub issue: IssueNumber,

    /// The repository's `owner/name`, exactly as GitHub sent it.
    ///
    /// Kept unsplit so that a malformed name is reported by the trigger
    /// matcher rather than failing deserialization.
    pub repository_full_name: String,
}
