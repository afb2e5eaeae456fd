use crate::encoder::{DecodeError, EncodeError};
use crate::feature::Feature;

/// Errors raised while answering a classification query.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// One ranked prediction from [`Classifier::score`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredOutcome<T> {
    pub outcome: T,
    pub score: f64,
}

/// A loaded, ready-to-query classifier.
///
/// Implementations hold their model and their frozen encoders, so a query
/// runs the same feature-index mapping the model was trained against.
/// Queries run on the caller's thread; there is no internal parallelism.
pub trait Classifier {
    type Outcome;

    /// Classifies one instance.
    fn classify(&self, features: &[Feature]) -> Result<Self::Outcome, ClassifyError>;

    /// Returns `(outcome, score)` pairs sorted by descending score,
    /// truncated to at most `max_results` entries.
    fn score(
        &self,
        features: &[Feature],
        max_results: usize,
    ) -> Result<Vec<ScoredOutcome<Self::Outcome>>, ClassifyError>;
}
