//! Filter implementations for the prediction pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod user;
pub mod valid_prediction;

// Re-export for convenience
pub use user::UserFilter;
pub use valid_prediction::ValidPredictionFilter;
