//! Core traits for the prediction filtering pipeline.
//!
//! This module defines the PredictionFilter trait that allows composable,
//! extensible filters to be applied to prediction sets.

use als::Prediction;

/// Core trait for filtering predictions.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared across worker threads
/// - Filters are predicates: the pipeline decides whether to filter an owned
///   Vec in place or copy survivors out of a borrowed slice
pub trait PredictionFilter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Whether `prediction` survives this filter
    fn keep(&self, prediction: &Prediction) -> bool;
}
