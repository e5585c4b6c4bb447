//! # ALS Crate
//!
//! Explicit-feedback matrix factorization by Alternating Least Squares.
//!
//! ## Components
//!
//! ### Params
//! `AlsParams`: rank, iteration count, regularization, seed, cold-start
//! handling. Defaults match the batch job: 5 iterations, reg 0.1, seed 4.
//!
//! ### Trainer
//! `Als::fit` learns user and item factor matrices from a training slice.
//! Each half-step solves one small regularized least-squares system per row,
//! in parallel with Rayon.
//!
//! ### Model
//! `AlsModel` predicts ratings for (user, movie) pairs, scores whole rating
//! sets (`transform`) and produces top-N lists (`recommend_for_user`).
//! Pairs involving a user or movie absent from training predict NaN.
//!
//! ## Example Usage
//!
//! ```ignore
//! use als::{Als, AlsParams};
//!
//! let model = Als::new(AlsParams::default()).fit(&training)?;
//! let predictions = model.transform(&test);
//! let top = model.recommend_for_user(5, 10);
//! ```

pub mod error;
pub mod model;
pub mod params;
mod solver;
pub mod trainer;

// Re-export commonly used types
pub use error::{AlsError, Result};
pub use model::{AlsModel, Prediction};
pub use params::{AlsParams, ColdStartStrategy};
pub use trainer::Als;
