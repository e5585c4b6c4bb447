//! Fitting an ALS model from ratings.
//!
//! ## Algorithm
//! 1. Map the distinct user and movie ids of the training set to dense rows
//! 2. Group observations by user and by movie
//! 3. Draw both factor matrices from a seeded standard normal and scale each
//!    row to unit length
//! 4. For `max_iter` sweeps: solve item factors with user factors fixed,
//!    then user factors with item factors fixed

use crate::error::{AlsError, Result};
use crate::model::AlsModel;
use crate::params::AlsParams;
use crate::solver::{self, Observations};
use data_loader::{MovieId, Rating, UserId};
use ndarray::Array2;
use ndarray_rand::RandomExt;
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand_distr::StandardNormal;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// ALS estimator
///
/// ## Usage
/// ```ignore
/// let model = Als::new(AlsParams::default()).fit(&training)?;
/// let predictions = model.transform(&test);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Als {
    params: AlsParams,
}

impl Als {
    pub fn new(params: AlsParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &AlsParams {
        &self.params
    }

    /// Fit user and item factors to the given ratings
    ///
    /// Row solves run in parallel on the current rayon pool; wrap the call
    /// in `ThreadPool::install` to choose the pool.
    #[instrument(skip_all, fields(ratings = ratings.len(), rank = self.params.rank))]
    pub fn fit(&self, ratings: &[Rating]) -> Result<AlsModel> {
        self.params.validate()?;
        if ratings.is_empty() {
            return Err(AlsError::EmptyTrainingSet);
        }
        if let Some(bad) = ratings.iter().find(|r| !r.rating.is_finite()) {
            return Err(AlsError::NonFiniteRating {
                user_id: bad.user_id,
                movie_id: bad.movie_id,
            });
        }

        let start = Instant::now();
        let blocks = RatingBlocks::build(ratings);
        info!(
            "Fitting ALS on {} ratings ({} users, {} items)",
            ratings.len(),
            blocks.user_ids.len(),
            blocks.item_ids.len()
        );

        let mut rng = StdRng::seed_from_u64(self.params.seed);
        let mut user_factors = init_factors(blocks.user_ids.len(), self.params.rank, &mut rng);
        let mut item_factors = init_factors(blocks.item_ids.len(), self.params.rank, &mut rng);

        for iter in 0..self.params.max_iter {
            let sweep = Instant::now();
            item_factors =
                solver::solve_factors(&user_factors, &blocks.by_item, self.params.reg_param, "item")?;
            user_factors =
                solver::solve_factors(&item_factors, &blocks.by_user, self.params.reg_param, "user")?;
            debug!("ALS iteration {} done in {:.2?}", iter + 1, sweep.elapsed());
        }

        info!("ALS fit complete in {:.2?}", start.elapsed());

        Ok(AlsModel {
            user_index: blocks.user_index,
            item_index: blocks.item_index,
            item_ids: blocks.item_ids,
            user_factors,
            item_factors,
            cold_start: self.params.cold_start,
        })
    }
}

/// Ratings re-keyed by dense row indices, grouped both ways
struct RatingBlocks {
    user_index: HashMap<UserId, usize>,
    item_index: HashMap<MovieId, usize>,
    user_ids: Vec<UserId>,
    item_ids: Vec<MovieId>,
    /// by_user[u] = [(item row, rating)]
    by_user: Vec<Observations>,
    /// by_item[i] = [(user row, rating)]
    by_item: Vec<Observations>,
}

impl RatingBlocks {
    /// Row indices are assigned in first-seen order so the layout (and with
    /// it the seeded initialization) depends only on input order.
    fn build(ratings: &[Rating]) -> Self {
        let mut user_index = HashMap::new();
        let mut item_index = HashMap::new();
        let mut user_ids = Vec::new();
        let mut item_ids = Vec::new();
        let mut by_user: Vec<Observations> = Vec::new();
        let mut by_item: Vec<Observations> = Vec::new();

        for r in ratings {
            let u = *user_index.entry(r.user_id).or_insert_with(|| {
                user_ids.push(r.user_id);
                by_user.push(Vec::new());
                user_ids.len() - 1
            });
            let i = *item_index.entry(r.movie_id).or_insert_with(|| {
                item_ids.push(r.movie_id);
                by_item.push(Vec::new());
                item_ids.len() - 1
            });
            by_user[u].push((i, r.rating));
            by_item[i].push((u, r.rating));
        }

        Self {
            user_index,
            item_index,
            user_ids,
            item_ids,
            by_user,
            by_item,
        }
    }
}

/// Standard normal factors, each row scaled to unit length
fn init_factors(rows: usize, rank: usize, rng: &mut StdRng) -> Array2<f32> {
    let mut factors = Array2::<f32>::random_using((rows, rank), StandardNormal, rng);
    for mut row in factors.rows_mut() {
        let norm = row.dot(&row).sqrt();
        if norm > 0.0 {
            row.mapv_inplace(|v| v / norm);
        }
    }
    factors
}
