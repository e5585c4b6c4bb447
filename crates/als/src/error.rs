//! Errors raised while fitting a factorization model.

use thiserror::Error;

/// Errors that can occur when fitting an ALS model
///
/// None of these are recovered from inside the crate; they propagate to the
/// caller and abort the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlsError {
    /// There's nothing to factorize
    #[error("Training set is empty")]
    EmptyTrainingSet,

    /// A hyper-parameter is out of range
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A rating is NaN or infinite
    #[error("Rating for user {user_id}, movie {movie_id} is not finite")]
    NonFiniteRating { user_id: u32, movie_id: u32 },

    /// A least-squares system couldn't be factorized
    ///
    /// Ratings are checked to be finite before fitting, so this only
    /// happens with `reg_param == 0`, where a row with fewer observations
    /// than the rank leaves the normal equations singular.
    #[error("Normal equations are not positive definite ({side} factors)")]
    Singular { side: &'static str },
}

pub type Result<T> = std::result::Result<T, AlsError>;
