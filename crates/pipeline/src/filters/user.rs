//! Filter to a single user's predictions.

use crate::traits::PredictionFilter;
use als::Prediction;
use data_loader::UserId;

/// Keeps only predictions for one user.
pub struct UserFilter {
    user_id: UserId,
}

impl UserFilter {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

impl PredictionFilter for UserFilter {
    fn name(&self) -> &str {
        "UserFilter"
    }

    fn keep(&self, prediction: &Prediction) -> bool {
        prediction.user_id == self.user_id
    }
}
