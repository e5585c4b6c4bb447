//! Pipeline stages between loading and reporting.
//!
//! This crate provides:
//! - Session: the explicit execution context (a dedicated Rayon pool)
//! - Splitter for the seeded train/validation/test partition
//! - Training of the ALS model on the training split
//! - PredictionFilter trait and implementations, composed by FilterPipeline
//! - Evaluator for RMSE (and friends) over valid predictions
//! - RecommendationQuery for a single user's top-N titles
//!
//! ## Architecture
//! The stages run strictly in order:
//! 1. Splitter partitions the ratings
//! 2. `train_model` fits ALS on the training split
//! 3. The model scores the held-out split; filters drop NaN predictions
//! 4. Evaluator computes RMSE
//! 5. RecommendationQuery picks titles for one user
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::*;
//!
//! let session = Session::builder().num_threads(4).build()?;
//! let split = Splitter::new([6.0, 2.0, 2.0], 4)?.split(&ratings);
//! let model = train_model(&session, AlsParams::default(), &split)?;
//!
//! let predictions = FilterPipeline::new()
//!     .add_filter(ValidPredictionFilter)
//!     .apply(model.transform(&split.test));
//! let rmse = Evaluator::new(Metric::Rmse).evaluate(&predictions)?;
//! let titles = RecommendationQuery::default().titles(5, &predictions, &catalog);
//! ```

pub mod error;
pub mod evaluate;
pub mod filter_pipeline;
pub mod filters;
pub mod query;
pub mod session;
pub mod split;
pub mod traits;
pub mod train;

// Re-export main types
pub use error::{PipelineError, Result};
pub use evaluate::{Evaluator, Metric};
pub use filter_pipeline::FilterPipeline;
pub use filters::{UserFilter, ValidPredictionFilter};
pub use query::{RankingPolicy, Recommendation, RecommendationQuery};
pub use session::{Session, SessionBuilder};
pub use split::{Split, SplitStrategy, Splitter};
pub use traits::PredictionFilter;
pub use train::train_model;
