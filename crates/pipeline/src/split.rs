//! Train / validation / test splitting.
//!
//! ## Algorithm
//! 1. Normalize the three weights into cumulative bounds, e.g. 6:2:2 ->
//!    [0.6, 0.8, 1.0]
//! 2. Draw `u` in [0, 1) for every rating
//! 3. Put the rating in the first split whose bound exceeds `u`
//!
//! Every rating lands in exactly one split, so the three are disjoint and
//! together cover the input. Sizes only match the weights in expectation.

use crate::error::{PipelineError, Result};
use data_loader::Rating;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Where each rating's draw comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStrategy {
    /// One draw per rating from a seeded `StdRng`, in input order
    ///
    /// Reproducible for the same seed, input order and `rand` version.
    #[default]
    SeededRandom,
    /// Draw derived from a hash of (seed, user id, movie id)
    ///
    /// Bit-exact everywhere and independent of input order.
    Hashed,
}

/// The three partitions of a rating set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Split {
    pub training: Vec<Rating>,
    pub validation: Vec<Rating>,
    pub test: Vec<Rating>,
}

impl Split {
    /// (training, validation, test) sizes
    pub fn sizes(&self) -> (usize, usize, usize) {
        (self.training.len(), self.validation.len(), self.test.len())
    }

    pub fn total(&self) -> usize {
        self.training.len() + self.validation.len() + self.test.len()
    }

    /// The training split, or `EmptySplit` if it has no rows
    pub fn training_set(&self) -> Result<&[Rating]> {
        if self.training.is_empty() {
            return Err(PipelineError::EmptySplit { name: "training" });
        }
        Ok(&self.training)
    }
}

/// Seeded three-way splitter
///
/// ## Usage
/// ```ignore
/// let split = Splitter::new([6.0, 2.0, 2.0], 4)?.split(&ratings);
/// println!("train={} val={} test={}", split.training.len(), ...);
/// ```
#[derive(Debug, Clone)]
pub struct Splitter {
    /// Cumulative upper bounds; the last one is exactly 1.0
    bounds: [f64; 3],
    seed: u64,
    strategy: SplitStrategy,
}

impl Splitter {
    /// Create a splitter from relative weights and a seed
    ///
    /// Weights must be finite and non-negative with a positive sum.
    pub fn new(weights: [f64; 3], seed: u64) -> Result<Self> {
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(PipelineError::InvalidSplitWeights(format!(
                "weights must be finite and >= 0, got {:?}",
                weights
            )));
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(PipelineError::InvalidSplitWeights(format!(
                "weights must sum to a positive value, got {:?}",
                weights
            )));
        }

        let bounds = [weights[0] / total, (weights[0] + weights[1]) / total, 1.0];
        Ok(Self {
            bounds,
            seed,
            strategy: SplitStrategy::default(),
        })
    }

    /// Choose the draw strategy (default: seeded random)
    pub fn with_strategy(mut self, strategy: SplitStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Partition the ratings
    #[instrument(skip_all, fields(ratings = ratings.len(), seed = self.seed))]
    pub fn split(&self, ratings: &[Rating]) -> Split {
        let mut split = Split::default();
        let mut rng = StdRng::seed_from_u64(self.seed);

        for rating in ratings {
            let u = match self.strategy {
                SplitStrategy::SeededRandom => rng.random::<f64>(),
                SplitStrategy::Hashed => hashed_unit(self.seed, rating),
            };

            match self.bucket(u) {
                0 => split.training.push(*rating),
                1 => split.validation.push(*rating),
                _ => split.test.push(*rating),
            }
        }

        let (training, validation, test) = split.sizes();
        info!(
            "Split {} ratings: training={}, validation={}, test={}",
            ratings.len(),
            training,
            validation,
            test
        );
        split
    }

    /// Index of the first bound strictly above `u`
    fn bucket(&self, u: f64) -> usize {
        self.bounds.iter().position(|&b| u < b).unwrap_or(2)
    }
}

/// Map (seed, user, movie) to a uniform value in [0, 1)
fn hashed_unit(seed: u64, rating: &Rating) -> f64 {
    let key = (u64::from(rating.user_id) << 32) | u64::from(rating.movie_id);
    let h = splitmix64(seed ^ splitmix64(key));
    // Top 53 bits -> exactly representable f64 in [0, 1)
    (h >> 11) as f64 / (1u64 << 53) as f64
}

/// SplitMix64 finalizer
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
