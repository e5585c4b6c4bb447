//! ALS hyper-parameters.

use crate::error::{AlsError, Result};
use serde::{Deserialize, Serialize};

/// How `AlsModel::transform` treats pairs it has no factors for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColdStartStrategy {
    /// Emit the row with a NaN prediction
    #[default]
    Nan,
    /// Leave the row out of the output
    Drop,
}

/// Hyper-parameters for alternating least squares
///
/// Defaults: rank 10, 5 iterations, regularization 0.1, seed 4.
///
/// ## Usage
/// ```ignore
/// let params = AlsParams::default()
///     .with_max_iter(5)
///     .with_reg_param(0.1)
///     .with_seed(4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlsParams {
    /// Number of latent factors per user and item
    pub rank: usize,
    /// Number of full (items, then users) sweeps
    pub max_iter: usize,
    /// L2 penalty, scaled per row by that row's number of ratings
    pub reg_param: f64,
    /// Seed for factor initialization
    pub seed: u64,
    pub cold_start: ColdStartStrategy,
}

impl Default for AlsParams {
    fn default() -> Self {
        Self {
            rank: 10,
            max_iter: 5,
            reg_param: 0.1,
            seed: 4,
            cold_start: ColdStartStrategy::Nan,
        }
    }
}

impl AlsParams {
    pub fn with_rank(mut self, rank: usize) -> Self {
        self.rank = rank;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_reg_param(mut self, reg_param: f64) -> Self {
        self.reg_param = reg_param;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_cold_start(mut self, cold_start: ColdStartStrategy) -> Self {
        self.cold_start = cold_start;
        self
    }

    /// Check that every parameter is in range
    pub fn validate(&self) -> Result<()> {
        if self.rank == 0 {
            return Err(AlsError::InvalidParameter {
                name: "rank",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.reg_param.is_finite() || self.reg_param < 0.0 {
            return Err(AlsError::InvalidParameter {
                name: "reg_param",
                reason: format!("must be finite and >= 0, got {}", self.reg_param),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = AlsParams::default();
        assert_eq!(params.max_iter, 5);
        assert_eq!(params.seed, 4);
        assert_eq!(params.reg_param, 0.1);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_invalid_params() {
        assert!(AlsParams::default().with_rank(0).validate().is_err());
        assert!(AlsParams::default().with_reg_param(-1.0).validate().is_err());
        assert!(AlsParams::default().with_reg_param(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let params: AlsParams = serde_json::from_str(r#"{"rank": 4, "cold_start": "drop"}"#).unwrap();
        assert_eq!(params.rank, 4);
        assert_eq!(params.max_iter, 5);
        assert_eq!(params.cold_start, ColdStartStrategy::Drop);
    }
}
