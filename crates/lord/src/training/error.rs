//! Errors raised while mining rules.

use crate::data::SelectorId;

/// Invariant violations detected during a rule search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("no occurrence list for selector {selector}")]
    MissingOccurrenceList { selector: SelectorId },

    #[error("selector {selector} is not a class selector")]
    UnknownClass { selector: SelectorId },

    #[error("body selector {selector} is not a predictor")]
    NonPredictorBody { selector: SelectorId },

    #[error("body is not strictly ascending at selector {selector}")]
    UnsortedBody { selector: SelectorId },
}

/// Errors that abort a training run.
#[derive(Debug, thiserror::Error)]
pub enum TrainError {
    #[error("rule search failed: {0}")]
    Search(#[from] SearchError),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
