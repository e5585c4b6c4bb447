//! Fitting the recommender on the training split.

use crate::error::Result;
use crate::session::Session;
use crate::split::Split;
use als::{Als, AlsModel, AlsParams};
use tracing::info;

/// Fit ALS on the training split inside the session's pool
///
/// Fails with `EmptySplit` when the training split has no rows; solver
/// failures propagate unchanged.
pub fn train_model(session: &Session, params: AlsParams, split: &Split) -> Result<AlsModel> {
    let training = split.training_set()?;
    info!(
        "Training ALS (rank={}, max_iter={}, reg_param={}, seed={}) on {} threads",
        params.rank,
        params.max_iter,
        params.reg_param,
        params.seed,
        session.num_threads()
    );

    let model = session.install(|| Als::new(params).fit(training))?;
    Ok(model)
}
