//! Decides whether an issues event should trigger label prediction.
//!
//! To avoid competing with other bots acting on the same events, prediction
//! runs only when an issue is `labeled` with the repository's trigger label.
//! Each repository may configure its own trigger under
//! `IssueModel:{repo}:TriggerLabel`; unconfigured repositories use
//! [`DEFAULT_TRIGGER_LABEL`].

use crate::config::ConfigLookup;
use crate::types::{IssueNumber, MalformedRepoName, RepoId};
use crate::webhooks::{IssueAction, IssuesEvent};

/// Trigger label used when a repository has none configured.
pub const DEFAULT_TRIGGER_LABEL: &str = "customer-reported";

/// Returns the configuration key holding `repo`'s trigger label.
pub fn trigger_label_key(repo: &str) -> String {
    format!("IssueModel:{repo}:TriggerLabel")
}

/// Resolves the trigger label for a repository name (without owner).
pub fn resolve_trigger_label(config: &impl ConfigLookup, repo: &str) -> String {
    config.get(&trigger_label_key(repo), DEFAULT_TRIGGER_LABEL)
}

/// Why an event did not trigger prediction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The action was something other than `labeled`.
    NotLabeled { action: IssueAction },
    /// The added label is not the repository's trigger label.
    LabelMismatch {
        label: Option<String>,
        trigger: String,
    },
}

/// Result of evaluating an event against the trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerDecision {
    /// Prediction should run for this issue.
    Fire { repo: RepoId, issue: IssueNumber },
    /// Nothing to do.
    Ignore { repo: RepoId, reason: IgnoreReason },
}

/// Evaluates an issues event against the repository's trigger label.
///
/// # Errors
///
/// Returns [`MalformedRepoName`] if the repository full name has no `/`.
pub fn evaluate(
    event: &IssuesEvent,
    config: &impl ConfigLookup,
) -> Result<TriggerDecision, MalformedRepoName> {
    let repo = RepoId::parse_full_name(&event.repository_full_name)?;
    let trigger = resolve_trigger_label(config, &repo.repo);

    if event.action != IssueAction::Labeled {
        return Ok(TriggerDecision::Ignore {
            repo,
            reason: IgnoreReason::NotLabeled {
                action: event.action.clone(),
            },
        });
    }

    if event.label.as_deref() != Some(trigger.as_str()) {
        return Ok(TriggerDecision::Ignore {
            repo,
            reason: IgnoreReason::LabelMismatch {
                label: event.label.clone(),
                trigger,
            },
        });
    }

    Ok(TriggerDecision::Fire {
        repo,
        issue: event.issue,
    })
}
