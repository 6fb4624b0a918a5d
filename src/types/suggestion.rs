//! Ranked label candidates produced by the prediction model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single candidate label with the model's score for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredLabel {
    pub label: String,
    pub score: f32,
}

impl ScoredLabel {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        ScoredLabel {
            label: label.into(),
            score,
        }
    }
}

/// Reasons a list of candidates cannot form a [`LabelSuggestion`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SuggestionError {
    /// The model returned no candidates at all.
    #[error("label suggestion must contain at least one candidate")]
    Empty,

    /// A candidate carried a NaN or infinite score.
    #[error("candidate {label:?} has non-finite score {score}")]
    NonFiniteScore { label: String, score: f32 },
}

/// A non-empty, ordered list of scored candidates.
///
/// The order is the order the model produced them in; it matters only for
/// breaking ties between equal scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ScoredLabel>", into = "Vec<ScoredLabel>")]
pub struct LabelSuggestion {
    candidates: Vec<ScoredLabel>,
    top: usize,
}

impl LabelSuggestion {
    /// Builds a suggestion, rejecting empty lists and non-finite scores.
    pub fn new(candidates: Vec<ScoredLabel>) -> Result<Self, SuggestionError> {
        if candidates.is_empty() {
            return Err(SuggestionError::Empty);
        }
        if let Some(bad) = candidates.iter().find(|c| !c.score.is_finite()) {
            return Err(SuggestionError::NonFiniteScore {
                label: bad.label.clone(),
                score: bad.score,
            });
        }
        let top = candidates
            .iter()
            .enumerate()
            .skip(1)
            .fold(0, |best, (i, c)| {
                if c.score > candidates[best].score { i } else { best }
            });
        Ok(LabelSuggestion { candidates, top })
    }

    /// Returns the highest-scoring candidate.
    ///
    /// When several candidates share the maximum score the earliest one wins.
    pub fn top(&self) -> &ScoredLabel {
        &self.candidates[self.top]
    }

    pub fn candidates(&self) -> &[ScoredLabel] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl TryFrom<Vec<ScoredLabel>> for LabelSuggestion {
    type Error = SuggestionError;

    fn try_from(candidates: Vec<ScoredLabel>) -> Result<Self, Self::Error> {
        LabelSuggestion::new(candidates)
    }
}

impl From<LabelSuggestion> for Vec<ScoredLabel> {
    fn from(suggestion: LabelSuggestion) -> Self {
        suggestion.candidates
    }
}
