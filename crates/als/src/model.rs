//! The fitted factorization model.

use crate::params::ColdStartStrategy;
use data_loader::{MovieId, Rating, UserId};
use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

/// A rating paired with the model's prediction for it
///
/// `predicted_rating` is NaN when the model has no factors for the user or
/// the movie (cold start).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: f32,
    pub predicted_rating: f32,
}

impl Prediction {
    /// True unless the prediction is NaN
    pub fn is_valid(&self) -> bool {
        !self.predicted_rating.is_nan()
    }
}

/// User and item latent factors learned by ALS
///
/// Created once by [`crate::Als::fit`], queried many times, never persisted.
/// Row `i` of `user_factors` belongs to the user whose id maps to `i` in
/// `user_index` (same for items).
#[derive(Debug, Clone)]
pub struct AlsModel {
    pub(crate) user_index: HashMap<UserId, usize>,
    pub(crate) item_index: HashMap<MovieId, usize>,
    pub(crate) item_ids: Vec<MovieId>,
    pub(crate) user_factors: Array2<f32>,
    pub(crate) item_factors: Array2<f32>,
    pub(crate) cold_start: ColdStartStrategy,
}

impl AlsModel {
    /// Number of latent factors
    pub fn rank(&self) -> usize {
        self.user_factors.ncols()
    }

    /// Number of users seen in training
    pub fn user_count(&self) -> usize {
        self.user_index.len()
    }

    /// Number of items seen in training
    pub fn item_count(&self) -> usize {
        self.item_index.len()
    }

    /// Latent factors for a user, if the user was in the training set
    pub fn user_factors(&self, user_id: UserId) -> Option<ArrayView1<'_, f32>> {
        self.user_index
            .get(&user_id)
            .map(|&u| self.user_factors.row(u))
    }

    /// Latent factors for an item, if the item was in the training set
    pub fn item_factors(&self, movie_id: MovieId) -> Option<ArrayView1<'_, f32>> {
        self.item_index
            .get(&movie_id)
            .map(|&i| self.item_factors.row(i))
    }

    /// Predicted rating for one (user, movie) pair
    ///
    /// Returns NaN when either id was absent from training.
    pub fn predict(&self, user_id: UserId, movie_id: MovieId) -> f32 {
        match (self.user_factors(user_id), self.item_factors(movie_id)) {
            (Some(u), Some(i)) => u.dot(&i),
            _ => f32::NAN,
        }
    }

    /// Score a set of ratings
    ///
    /// Output order matches input order. Under `ColdStartStrategy::Drop`
    /// rows with a NaN prediction are left out.
    pub fn transform(&self, ratings: &[Rating]) -> Vec<Prediction> {
        let predictions = ratings.par_iter().map(|r| Prediction {
            user_id: r.user_id,
            movie_id: r.movie_id,
            rating: r.rating,
            predicted_rating: self.predict(r.user_id, r.movie_id),
        });

        match self.cold_start {
            ColdStartStrategy::Nan => predictions.collect(),
            ColdStartStrategy::Drop => predictions.filter(Prediction::is_valid).collect(),
        }
    }

    /// Top `n` items for a user by predicted score, highest first
    ///
    /// Scores every item seen in training, including ones the user already
    /// rated. Unknown users get an empty list.
    pub fn recommend_for_user(&self, user_id: UserId, n: usize) -> Vec<(MovieId, f32)> {
        let Some(user) = self.user_factors(user_id) else {
            return Vec::new();
        };

        let scores = self.item_factors.dot(&user);
        let mut ranked: Vec<(MovieId, f32)> = self
            .item_ids
            .iter()
            .copied()
            .zip(scores.iter().copied())
            .collect();

        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(n);
        ranked
    }
}
