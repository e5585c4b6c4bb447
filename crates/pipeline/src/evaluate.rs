//! Regression metrics over predictions.
//!
//! NaN predictions are skipped before anything is computed. If nothing is
//! left, evaluation fails with `NoValidPredictions` instead of reporting a
//! metric over an empty set.

use crate::error::{PipelineError, Result};
use als::Prediction;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which metric to compute between `rating` and `predicted_rating`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Root mean squared error
    #[default]
    Rmse,
    /// Mean squared error
    Mse,
    /// Mean absolute error
    Mae,
    /// Coefficient of determination, `1 - SS_res / SS_tot`
    R2,
}

/// Computes one metric over a prediction set
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    metric: Metric,
}

impl Evaluator {
    pub fn new(metric: Metric) -> Self {
        Self { metric }
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Evaluate the valid predictions in `predictions`
    ///
    /// Rows with a NaN prediction or a non-finite label are skipped.
    pub fn evaluate(&self, predictions: &[Prediction]) -> Result<f64> {
        let pairs: Vec<(f64, f64)> = predictions
            .iter()
            .filter(|p| p.is_valid() && p.rating.is_finite())
            .map(|p| (f64::from(p.rating), f64::from(p.predicted_rating)))
            .collect();

        if pairs.is_empty() {
            return Err(PipelineError::NoValidPredictions);
        }
        let n = pairs.len() as f64;
        debug!(
            "Evaluating {:?} over {} of {} predictions",
            self.metric,
            pairs.len(),
            predictions.len()
        );

        let sse: f64 = pairs.iter().map(|(y, p)| (y - p) * (y - p)).sum();
        let value = match self.metric {
            Metric::Rmse => (sse / n).sqrt(),
            Metric::Mse => sse / n,
            Metric::Mae => pairs.iter().map(|(y, p)| (y - p).abs()).sum::<f64>() / n,
            Metric::R2 => {
                let mean = pairs.iter().map(|(y, _)| y).sum::<f64>() / n;
                let sst: f64 = pairs.iter().map(|(y, _)| (y - mean) * (y - mean)).sum();
                1.0 - sse / sst
            }
        };
        Ok(value)
    }
}

/// RMSE over the valid predictions
pub fn rmse(predictions: &[Prediction]) -> Result<f64> {
    Evaluator::new(Metric::Rmse).evaluate(predictions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(rating: f32, predicted_rating: f32) -> Prediction {
        Prediction {
            user_id: 1,
            movie_id: 1,
            rating,
            predicted_rating,
        }
    }

    #[test]
    fn test_rmse_zero_for_exact_predictions() {
        let preds = vec![p(3.0, 3.0), p(4.5, 4.5), p(1.0, 1.0)];
        assert_eq!(rmse(&preds).unwrap(), 0.0);
    }

    #[test]
    fn test_rmse_value() {
        // errors 1 and -1 -> rmse 1
        let preds = vec![p(3.0, 4.0), p(4.0, 3.0)];
        assert!((rmse(&preds).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rmse_skips_nan() {
        let preds = vec![p(3.0, 3.0), p(5.0, f32::NAN)];
        let value = rmse(&preds).unwrap();
        assert!(value >= 0.0);
        assert_eq!(value, 0.0);
    }

    #[test]
    fn test_rmse_skips_non_finite_labels() {
        let preds = vec![p(3.0, 3.5), p(f32::NAN, 4.0), p(f32::INFINITY, 4.0)];
        assert!((rmse(&preds).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_all_nan_is_an_error() {
        let preds = vec![p(3.0, f32::NAN), p(5.0, f32::NAN)];
        assert!(matches!(rmse(&preds), Err(PipelineError::NoValidPredictions)));
        assert!(matches!(rmse(&[]), Err(PipelineError::NoValidPredictions)));
    }

    #[test]
    fn test_other_metrics() {
        let preds = vec![p(1.0, 2.0), p(3.0, 3.0), p(5.0, 4.0)];

        let mse = Evaluator::new(Metric::Mse).evaluate(&preds).unwrap();
        assert!((mse - 2.0 / 3.0).abs() < 1e-12);

        let mae = Evaluator::new(Metric::Mae).evaluate(&preds).unwrap();
        assert!((mae - 2.0 / 3.0).abs() < 1e-12);

        // SS_tot = 8, SS_res = 2
        let r2 = Evaluator::new(Metric::R2).evaluate(&preds).unwrap();
        assert!((r2 - 0.75).abs() < 1e-12);
    }
}
