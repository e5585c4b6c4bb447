//! Error types for the pipeline crate.

use als::AlsError;
use thiserror::Error;

/// Errors raised by the pipeline stages
///
/// Every variant aborts the run. An unknown user in the recommendation
/// query is deliberately *not* an error; it yields an empty list.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A split that must have rows came out empty
    #[error("The {name} split is empty")]
    EmptySplit { name: &'static str },

    /// Every prediction was NaN, so no metric can be computed
    #[error("No valid predictions to evaluate")]
    NoValidPredictions,

    /// Split weights that can't be normalized
    #[error("Invalid split weights: {0}")]
    InvalidSplitWeights(String),

    /// The session's thread pool couldn't be created
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Model fitting failed
    #[error(transparent)]
    Als(#[from] AlsError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
