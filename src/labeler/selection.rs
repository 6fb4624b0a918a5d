//! The accept/reject decision over a label suggestion.

use crate::types::LabelSuggestion;

use super::IssueContext;

/// Decides whether the top-scoring candidate is confident enough to apply.
///
/// The candidate with the highest score is chosen (the earliest one on
/// ties) and accepted if its score is at least `threshold`.
///
/// ```
/// use issue_labeler::labeler::{IssueContext, select};
/// use issue_labeler::types::{IssueNumber, LabelSuggestion, RepoId, ScoredLabel};
///
/// let suggestion = LabelSuggestion::new(vec![
///     ScoredLabel::new("A", 0.3),
///     ScoredLabel::new("B", 0.9),
///     ScoredLabel::new("C", 0.5),
/// ])
/// .unwrap();
/// let issue = IssueContext::new(RepoId::new("dotnet", "runtime"), IssueNumber(1));
///
/// assert!(select(&suggestion, &issue, 0.5));
/// assert!(!select(&suggestion, &issue, 0.95));
/// ```
pub fn select(suggestion: &LabelSuggestion, _issue: &IssueContext, threshold: f32) -> bool {
    suggestion.top().score >= threshold
}
