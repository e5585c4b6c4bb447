//! Top-N titles for one user.
//!
//! ## Algorithm
//! 1. Keep the user's valid predictions (UserFilter + ValidPredictionFilter)
//! 2. Inner-join with the catalogue on movie id; unknown movies drop out
//! 3. Order according to the `RankingPolicy`
//! 4. Truncate to `limit`

use crate::filter_pipeline::FilterPipeline;
use crate::filters::{UserFilter, ValidPredictionFilter};
use als::Prediction;
use data_loader::{MovieCatalog, MovieId, UserId};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Default number of titles returned
pub const DEFAULT_LIMIT: usize = 10;

/// How the query orders rows before truncating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// Keep the order the predictions arrived in
    #[default]
    SourceOrder,
    /// Highest predicted rating first
    PredictedDescending,
}

/// One recommended title
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub movie_id: MovieId,
    pub title: String,
    pub predicted_rating: f32,
}

/// Recommendation query over a prediction set
#[derive(Debug, Clone, Copy)]
pub struct RecommendationQuery {
    limit: usize,
    ranking: RankingPolicy,
}

impl Default for RecommendationQuery {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, RankingPolicy::default())
    }
}

impl RecommendationQuery {
    pub fn new(limit: usize, ranking: RankingPolicy) -> Self {
        Self { limit, ranking }
    }

    /// Up to `limit` titles for `user_id`
    ///
    /// A user with no predictions gets an empty list.
    #[instrument(skip(self, predictions, catalog), fields(predictions = predictions.len()))]
    pub fn run(
        &self,
        user_id: UserId,
        predictions: &[Prediction],
        catalog: &MovieCatalog,
    ) -> Vec<Recommendation> {
        let mine = FilterPipeline::new()
            .add_filter(UserFilter::new(user_id))
            .add_filter(ValidPredictionFilter)
            .select(predictions);

        let mut joined: Vec<Recommendation> = mine
            .iter()
            .filter_map(|p| {
                let title = catalog.title(p.movie_id)?;
                Some(Recommendation {
                    movie_id: p.movie_id,
                    title: title.to_string(),
                    predicted_rating: p.predicted_rating,
                })
            })
            .collect();

        if self.ranking == RankingPolicy::PredictedDescending {
            // Stable sort keeps source order among equal scores
            joined.sort_by(|a, b| {
                b.predicted_rating
                    .partial_cmp(&a.predicted_rating)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }

        joined.truncate(self.limit);
        debug!("Returning {} recommendations for user {}", joined.len(), user_id);
        joined
    }

    /// Titles only, in output order
    pub fn titles(&self, user_id: UserId, predictions: &[Prediction], catalog: &MovieCatalog) -> Vec<String> {
        self.run(user_id, predictions, catalog)
            .into_iter()
            .map(|r| r.title)
            .collect()
    }
}
