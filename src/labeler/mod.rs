//! The seam to the external label-prediction service.
//!
//! The crate never talks to the model or the issue tracker itself. When an
//! event triggers classification it hands a [`Labeler`] the issue and a
//! [`Decide`] function; the labeler scores the issue, asks `decide` whether
//! the top prediction is good enough, and applies the label if so.

pub mod selection;

use tracing::info;

use crate::types::{IssueNumber, LabelSuggestion, RepoId};

pub use selection::select;

/// The issue a decision is being made for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueContext {
    pub repo: RepoId,
    pub number: IssueNumber,
}

impl IssueContext {
    pub fn new(repo: RepoId, number: IssueNumber) -> Self {
        IssueContext { repo, number }
    }
}

/// Decision function handed to a [`Labeler`].
///
/// Receives the model's suggestion, the issue it was made for, and the
/// labeler's confidence threshold. Must be pure.
pub type Decide = fn(&LabelSuggestion, &IssueContext, f32) -> bool;

/// Predicts and applies labels on the issue tracker.
///
/// Implementations own the model, the threshold and the tracker client, and
/// are responsible for their own timeouts and retries. The outcome is not
/// reported back.
pub trait Labeler {
    fn apply_label_prediction(&self, repo: &RepoId, issue: IssueNumber, decide: Decide);
}

impl<T: Labeler + ?Sized> Labeler for &T {
    fn apply_label_prediction(&self, repo: &RepoId, issue: IssueNumber, decide: Decide) {
        (**self).apply_label_prediction(repo, issue, decide)
    }
}

impl<T: Labeler + ?Sized> Labeler for std::sync::Arc<T> {
    fn apply_label_prediction(&self, repo: &RepoId, issue: IssueNumber, decide: Decide) {
        (**self).apply_label_prediction(repo, issue, decide)
    }
}

/// A labeler that only logs which issues it would classify.
///
/// Used by the server binary when no prediction backend is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunLabeler;

impl Labeler for DryRunLabeler {
    fn apply_label_prediction(&self, repo: &RepoId, issue: IssueNumber, _decide: Decide) {
        info!(repo = %repo, issue = %issue, "Would request label prediction (dry run)");
    }
}
