//! sampling::errors — invalid Plackett–Luce sampler configurations.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use rand::distributions::WeightedError;

use crate::permutations::errors::RankingError;

/// Result alias for sampling operations.
pub type SamplingResult<T> = Result<T, SamplingError>;

/// SamplingError — rejected item weights, labels, or orderings.
///
/// Variants
/// --------
/// - `EmptyWeights`: no items were supplied.
/// - `InvalidWeight { index, value }`: an item weight γ is non-finite or
///   not strictly positive (index is 0-based).
/// - `NonFiniteTotalWeight { total }`: the weights overflow when summed.
/// - `LabelCountMismatch { expected, actual }`: labels do not match the
///   number of weights.
/// - `DuplicateLabel { label }`: two items share a label.
/// - `Distribution(WeightedError)`: a stage's weighted index was rejected.
/// - `Ranking(RankingError)`: an ordering is not a permutation of the
///   items, or is too long for the typed [`Ranking`] representation.
///
/// [`Ranking`]: crate::permutations::ranking::Ranking
#[derive(Debug, Clone, PartialEq)]
pub enum SamplingError {
    EmptyWeights,
    InvalidWeight { index: usize, value: f64 },
    NonFiniteTotalWeight { total: f64 },
    LabelCountMismatch { expected: usize, actual: usize },
    DuplicateLabel { label: String },
    Distribution(WeightedError),
    Ranking(RankingError),
}

impl std::error::Error for SamplingError {}

impl std::fmt::Display for SamplingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SamplingError::EmptyWeights => write!(f, "At least one item weight is required."),
            SamplingError::InvalidWeight { index, value } => {
                write!(f, "Item weight at index {index} must be finite and > 0; got: {value}")
            }
            SamplingError::NonFiniteTotalWeight { total } => {
                write!(f, "Item weights must have a finite sum; got: {total}")
            }
            SamplingError::LabelCountMismatch { expected, actual } => {
                write!(f, "Expected {expected} item labels (one per weight); got {actual}.")
            }
            SamplingError::DuplicateLabel { label } => {
                write!(f, "Item label {label:?} is used more than once.")
            }
            SamplingError::Distribution(err) => write!(f, "Weighted draw failed: {err}"),
            SamplingError::Ranking(err) => write!(f, "{err}"),
        }
    }
}

impl From<RankingError> for SamplingError {
    fn from(err: RankingError) -> Self {
        SamplingError::Ranking(err)
    }
}

impl From<WeightedError> for SamplingError {
    fn from(err: WeightedError) -> Self {
        SamplingError::Distribution(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<SamplingError> for PyErr {
    fn from(err: SamplingError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
