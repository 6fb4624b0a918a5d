//! Core domain types for the issue labeler.
//!
//! This module contains the identifiers and score types shared by the
//! decoding pipeline and the labeler seam.

pub mod ids;
pub mod suggestion;

// Re-export commonly used types at the module level
pub use ids::{EventType, IssueNumber, MalformedRepoName, RepoId};
pub use suggestion::{LabelSuggestion, ScoredLabel, SuggestionError};
