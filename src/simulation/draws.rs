//! simulation::draws — coefficient draws from a fitted model's sampling
//! distribution.
//!
//! Purpose
//! -------
//! Produce `n × k` matrices of coefficient vectors (one row per draw, one
//! column per model coefficient) to propagate estimation uncertainty into
//! the simulated pattern probabilities.
//!
//! Key behaviors
//! -------------
//! - [`DrawSource`] picks the distribution: the model's own estimate and
//!   covariance, a caller-supplied multivariate normal, or a fixed matrix.
//! - [`DrawSource::prepare`] validates the source and, for normal sources,
//!   factors the covariance once via `nalgebra::symmetric_eigen`. The
//!   resulting [`CoefficientSampler`] is reused for every grid value.
//!
//! Invariants & assumptions
//! ------------------------
//! - Covariances are symmetric positive semi-definite. Eigenvalues within
//!   [`EIGEN_EPS`] (relative to the largest magnitude) of zero are treated as
//!   zero; anything more negative is rejected.
//! - A draw is `μ + R z` with `z ~ N(0, I)` and `R = Q Λ₊^{1/2}` from
//!   `Σ = Q Λ Qᵀ`, so `R Rᵀ = Σ` on the retained eigenspace.
//!
//! Conventions
//! -----------
//! - Normal deviates come from `rand_distr::StandardNormal` on the caller's
//!   stream; no global randomness is touched.
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};
use rand::Rng;
use rand_distr::StandardNormal;

use crate::simulation::{
    errors::{SimulationError, SimulationResult},
    model::{ChoiceModel, validate_covariance},
};

/// Relative tolerance below which covariance eigenvalues count as zero.
pub const EIGEN_EPS: f64 = 1e-10;

/// DrawSource — where coefficient draws come from.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DrawSource {
    /// Multivariate normal at the model's estimates and covariance.
    #[default]
    ModelCovariance,
    /// Caller-supplied multivariate normal over the model's coefficients.
    MultivariateNormal { mean: Array1<f64>, covariance: Array2<f64> },
    /// Caller-supplied draws (`rows × k`); the row count replaces the
    /// configured number of draws.
    Fixed(Array2<f64>),
}

/// CoefficientSampler — a validated, ready-to-use draw source.
#[derive(Debug, Clone, PartialEq)]
pub enum CoefficientSampler {
    Normal { mean: Array1<f64>, root: Array2<f64> },
    Fixed(Array2<f64>),
}

impl DrawSource {
    /// Validate the source against `model` and precompute what sampling
    /// needs.
    ///
    /// Errors
    /// ------
    /// - `MissingCovariance` when `ModelCovariance` is used on a model
    ///   without a covariance.
    /// - `CoefficientLengthMismatch` / `NonFiniteEstimate` for a bad
    ///   caller-supplied mean.
    /// - `CovarianceShape`, `NonFiniteCovariance`, `CovarianceNotPsd`.
    /// - `DrawShape` for a fixed matrix without one column per coefficient
    ///   or with fewer than 2 rows.
    pub fn prepare<M: ChoiceModel + ?Sized>(&self, model: &M) -> SimulationResult<CoefficientSampler> {
        let k = model.coefficient_names().len();
        match self {
            DrawSource::ModelCovariance => {
                let covariance = model.covariance().ok_or(SimulationError::MissingCovariance)?;
                validate_covariance(covariance, k)?;
                Ok(CoefficientSampler::Normal {
                    mean: model.estimates().clone(),
                    root: covariance_root(covariance)?,
                })
            }
            DrawSource::MultivariateNormal { mean, covariance } => {
                if mean.len() != k {
                    return Err(SimulationError::CoefficientLengthMismatch {
                        names: k,
                        estimates: mean.len(),
                    });
                }
                for (name, &value) in model.coefficient_names().iter().zip(mean.iter()) {
                    if !value.is_finite() {
                        return Err(SimulationError::NonFiniteEstimate { name: name.clone(), value });
                    }
                }
                validate_covariance(covariance, k)?;
                Ok(CoefficientSampler::Normal {
                    mean: mean.clone(),
                    root: covariance_root(covariance)?,
                })
            }
            DrawSource::Fixed(draws) => {
                let (rows, cols) = draws.dim();
                if cols != k || rows < 2 {
                    return Err(SimulationError::DrawShape { expected_cols: k, rows, cols });
                }
                Ok(CoefficientSampler::Fixed(draws.clone()))
            }
        }
    }
}

impl CoefficientSampler {
    /// Number of draws this sampler yields when asked for `requested`.
    pub fn n_draws(&self, requested: usize) -> usize {
        match self {
            CoefficientSampler::Normal { .. } => requested,
            CoefficientSampler::Fixed(draws) => draws.nrows(),
        }
    }

    /// Draw a coefficient matrix (`n_draws(requested) × k`).
    ///
    /// Fixed sources return their matrix unchanged and leave `rng`
    /// untouched.
    pub fn draw<R: Rng + ?Sized>(&self, requested: usize, rng: &mut R) -> Array2<f64> {
        match self {
            CoefficientSampler::Normal { mean, root } => {
                let k = mean.len();
                let z = Array2::from_shape_fn((requested, k), |_| rng.sample::<f64, _>(StandardNormal));
                let mut draws = z.dot(&root.t());
                draws += mean;
                draws
            }
            CoefficientSampler::Fixed(draws) => draws.clone(),
        }
    }
}

/// Square root `R` of a symmetric PSD covariance with `R Rᵀ = Σ`.
fn covariance_root(covariance: &Array2<f64>) -> SimulationResult<Array2<f64>> {
    let k = covariance.nrows();
    let mut cov_nalg = DMatrix::<f64>::zeros(k, k);
    fill_dmatrix(covariance, &mut cov_nalg);
    let eigen = cov_nalg.symmetric_eigen();

    let scale = eigen.eigenvalues.iter().fold(1.0_f64, |acc, lambda| acc.max(lambda.abs()));
    let tolerance = EIGEN_EPS * scale;
    if let Some(&lambda) = eigen.eigenvalues.iter().find(|&&lambda| lambda < -tolerance) {
        return Err(SimulationError::CovarianceNotPsd { eigenvalue: lambda });
    }

    let q = eigen.eigenvectors;
    let root = Array2::from_shape_fn((k, k), |(i, j)| {
        let lambda = eigen.eigenvalues[j];
        if lambda > tolerance { q[(i, j)] * lambda.sqrt() } else { 0.0 }
    });
    Ok(root)
}

/// Copy an `ndarray` covariance into a `DMatrix`, symmetrizing the
/// off-diagonal pairs.
fn fill_dmatrix(cov: &Array2<f64>, cov_nalg: &mut DMatrix<f64>) {
    let n = cov.ncols();
    for j in 0..n {
        cov_nalg[(j, j)] = cov[[j, j]];
        for i in (j + 1)..n {
            let value = 0.5 * (cov[[i, j]] + cov[[j, i]]);
            cov_nalg[(i, j)] = value;
            cov_nalg[(j, i)] = value;
        }
    }
}
