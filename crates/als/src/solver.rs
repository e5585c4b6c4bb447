//! Regularized least-squares row solves.
//!
//! Each half-step of ALS fixes one factor matrix and solves, independently
//! for every row on the other side,
//!
//! ```text
//! (Σ yⱼ yⱼᵀ + λ·n·I) x = Σ rⱼ yⱼ
//! ```
//!
//! where the sums run over that row's `n` observed ratings. The systems are
//! small (rank × rank) and symmetric positive definite whenever λ·n > 0, so a
//! Cholesky factorization in f64 is enough.

use crate::error::{AlsError, Result};
use ndarray::{Array1, Array2};
use rayon::prelude::*;

/// Observed ratings for one row: (index on the fixed side, rating)
pub(crate) type Observations = Vec<(usize, f32)>;

/// Solve every row in parallel against the fixed factors
///
/// `rows[i]` holds the observations of output row `i`. Runs on whatever
/// rayon pool is current, so callers pick the pool with `install`.
pub(crate) fn solve_factors(
    fixed: &Array2<f32>,
    rows: &[Observations],
    reg_param: f64,
    side: &'static str,
) -> Result<Array2<f32>> {
    let rank = fixed.ncols();

    let solved: Vec<Array1<f32>> = rows
        .par_iter()
        .map(|obs| solve_row(fixed, obs, reg_param).ok_or(AlsError::Singular { side }))
        .collect::<Result<Vec<_>>>()?;

    let mut factors = Array2::<f32>::zeros((rows.len(), rank));
    for (i, row) in solved.into_iter().enumerate() {
        factors.row_mut(i).assign(&row);
    }
    Ok(factors)
}

/// Build and solve the normal equations for one row
///
/// Returns `None` when the system isn't positive definite.
fn solve_row(fixed: &Array2<f32>, obs: &[(usize, f32)], reg_param: f64) -> Option<Array1<f32>> {
    let k = fixed.ncols();
    let mut ata = Array2::<f64>::zeros((k, k));
    let mut atb = Array1::<f64>::zeros(k);

    // Only the lower triangle is filled; that's all Cholesky reads
    for &(j, r) in obs {
        let y = fixed.row(j);
        for a in 0..k {
            let ya = f64::from(y[a]);
            atb[a] += f64::from(r) * ya;
            for b in 0..=a {
                ata[[a, b]] += ya * f64::from(y[b]);
            }
        }
    }

    let lambda = reg_param * obs.len() as f64;
    for a in 0..k {
        ata[[a, a]] += lambda;
    }

    cholesky_solve(ata, atb).map(|x| x.mapv(|v| v as f32))
}

/// Solve `A x = b` for symmetric positive definite `A`
///
/// Factorizes `A = L Lᵀ` in place (lower triangle), then does forward and
/// back substitution. Returns `None` if a pivot is not strictly positive.
pub(crate) fn cholesky_solve(mut a: Array2<f64>, b: Array1<f64>) -> Option<Array1<f64>> {
    let n = b.len();

    for j in 0..n {
        let mut d = a[[j, j]];
        for p in 0..j {
            d -= a[[j, p]] * a[[j, p]];
        }
        if d <= 0.0 || !d.is_finite() {
            return None;
        }
        let d = d.sqrt();
        a[[j, j]] = d;

        for i in (j + 1)..n {
            let mut s = a[[i, j]];
            for p in 0..j {
                s -= a[[i, p]] * a[[j, p]];
            }
            a[[i, j]] = s / d;
        }
    }

    // L y = b
    let mut x = b;
    for i in 0..n {
        let mut s = x[i];
        for p in 0..i {
            s -= a[[i, p]] * x[p];
        }
        x[i] = s / a[[i, i]];
    }

    // Lᵀ x = y
    for i in (0..n).rev() {
        let mut s = x[i];
        for p in (i + 1)..n {
            s -= a[[p, i]] * x[p];
        }
        x[i] = s / a[[i, i]];
    }

    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_cholesky_solve() {
        // A = [[4, 2], [2, 3]], b = [2, 1] -> x = [0.5, 0]
        let a = array![[4.0, 0.0], [2.0, 3.0]];
        let x = cholesky_solve(a, array![2.0, 1.0]).unwrap();
        assert!((x[0] - 0.5).abs() < 1e-12);
        assert!(x[1].abs() < 1e-12);
    }

    #[test]
    fn test_cholesky_rejects_singular() {
        let a = array![[0.0, 0.0], [0.0, 1.0]];
        assert!(cholesky_solve(a, array![1.0, 1.0]).is_none());
    }

    #[test]
    fn test_solve_row_recovers_exact_fit() {
        // rank 1, fixed factors all 1.0: x should approach the mean rating
        let fixed = Array2::<f32>::ones((3, 1));
        let obs = vec![(0, 4.0), (1, 4.0), (2, 4.0)];
        let x = solve_row(&fixed, &obs, 0.0).unwrap();
        assert!((x[0] - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_regularization_shrinks() {
        let fixed = Array2::<f32>::ones((2, 1));
        let obs = vec![(0, 5.0), (1, 5.0)];
        let plain = solve_row(&fixed, &obs, 0.0).unwrap()[0];
        let shrunk = solve_row(&fixed, &obs, 1.0).unwrap()[0];
        assert!(shrunk < plain);
    }

    #[test]
    fn test_zero_reg_underdetermined_is_singular() {
        // rank 2 with a single observation and no penalty
        let fixed = Array2::<f32>::ones((1, 2));
        let rows = vec![vec![(0, 3.0)]];
        let err = solve_factors(&fixed, &rows, 0.0, "user").unwrap_err();
        assert_eq!(err, AlsError::Singular { side: "user" });
    }
}
