//! Ordered composition of prediction filters.
//!
//! A prediction survives only if every filter keeps it. Filters run in the
//! order they were added, and relative order of predictions never changes.

use crate::traits::PredictionFilter;
use als::Prediction;
use tracing;

/// Ordered list of boxed filters, built up with `add_filter`.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(UserFilter::new(5))
///     .add_filter(ValidPredictionFilter);
///
/// let kept = pipeline.apply(predictions);
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn PredictionFilter>>,
}

impl FilterPipeline {
    /// A pipeline with no filters keeps everything.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Append a filter; consumes and returns the pipeline so calls chain.
    pub fn add_filter(mut self, filter: impl PredictionFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Apply all filters in sequence to an owned set of predictions.
    ///
    /// Each filter retains in place, so no copy is made. Counts before and
    /// after every filter go to the debug log.
    pub fn apply(&self, predictions: Vec<Prediction>) -> Vec<Prediction> {
        let mut current = predictions;
        for filter in &self.filters {
            tracing::debug!(
                "{}: {} predictions in",
                filter.name(),
                current.len()
            );
            current.retain(|p| filter.keep(p));
            tracing::debug!(
                "{}: {} predictions kept",
                filter.name(),
                current.len()
            );
        }
        current
    }

    /// Copy out the predictions that pass every filter.
    ///
    /// Same result as `apply`, but borrows the input, so the caller keeps
    /// the full set for later queries.
    pub fn select(&self, predictions: &[Prediction]) -> Vec<Prediction> {
        let selected: Vec<Prediction> = predictions
            .iter()
            .filter(|p| self.filters.iter().all(|f| f.keep(p)))
            .copied()
            .collect();
        tracing::debug!(
            "Selected {} of {} predictions through {} filters",
            selected.len(),
            predictions.len(),
            self.filters.len()
        );
        selected
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{UserFilter, ValidPredictionFilter};

    fn predictions() -> Vec<Prediction> {
        vec![
            Prediction { user_id: 1, movie_id: 1, rating: 4.0, predicted_rating: 3.8 },
            Prediction { user_id: 2, movie_id: 1, rating: 3.0, predicted_rating: f32::NAN },
            Prediction { user_id: 1, movie_id: 2, rating: 2.0, predicted_rating: f32::NAN },
            Prediction { user_id: 1, movie_id: 3, rating: 5.0, predicted_rating: 4.6 },
        ]
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();
        assert_eq!(pipeline.apply(predictions()).len(), 4);
    }

    #[test]
    fn test_single_filter() {
        let pipeline = FilterPipeline::new().add_filter(ValidPredictionFilter);

        let filtered = pipeline.apply(predictions());
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].movie_id, 1);
        assert_eq!(filtered[1].movie_id, 3);
    }

    #[test]
    fn test_select_matches_apply() {
        let pipeline = FilterPipeline::new()
            .add_filter(UserFilter::new(1))
            .add_filter(ValidPredictionFilter);

        let all = predictions();
        let selected = pipeline.select(&all);
        assert_eq!(selected.len(), 2);
        assert_eq!(all.len(), 4);
        // NaN != NaN, so compare ids only
        let ids = |ps: &[Prediction]| ps.iter().map(|p| (p.user_id, p.movie_id)).collect::<Vec<_>>();
        assert_eq!(ids(&selected), ids(&pipeline.apply(all.clone())));
    }
}
