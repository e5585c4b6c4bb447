//! Filter to drop predictions the model couldn't make.
//!
//! Cold-start pairs (user or movie absent from training) come out of the
//! model as NaN. They can't take part in a metric or a ranking.

use crate::traits::PredictionFilter;
use als::Prediction;

/// Removes predictions whose `predicted_rating` is NaN.
pub struct ValidPredictionFilter;

impl PredictionFilter for ValidPredictionFilter {
    fn name(&self) -> &str {
        "ValidPredictionFilter"
    }

    fn keep(&self, prediction: &Prediction) -> bool {
        prediction.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(predicted_rating: f32) -> Prediction {
        Prediction {
            user_id: 1,
            movie_id: 1,
            rating: 4.0,
            predicted_rating,
        }
    }

    #[test]
    fn test_valid_prediction_filter() {
        let filter = ValidPredictionFilter;
        assert!(filter.keep(&prediction(3.5)));
        assert!(filter.keep(&prediction(-0.2)));
        assert!(!filter.keep(&prediction(f32::NAN)));
    }
}
