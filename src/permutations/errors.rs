//! permutations::errors — error type for rankings and permutation spaces.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias shared by the typed [`Ranking`]
//! representation and the [`PermutationSpace`] enumerator. Higher-level
//! subtrees (bias correction, sampling) wrap these errors in their own
//! enums via `From` so that `?` works across module boundaries.
//!
//! Conventions
//! -----------
//! - Messages describe the violated domain constraint ("digits must form a
//!   permutation of 1..J") and embed the offending value.
//! - With the `python-bindings` feature, errors surface as `ValueError`.
//!
//! [`Ranking`]: crate::permutations::ranking::Ranking
//! [`PermutationSpace`]: crate::permutations::space::PermutationSpace

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Result alias for ranking and permutation-space operations.
pub type RankingResult<T> = Result<T, RankingError>;

/// RankingError — invalid rankings or unsupported permutation-space sizes.
///
/// Variants
/// --------
/// - `EmptyRanking`
///   A ranking with zero items was supplied.
/// - `TooManyItems { n_items, max }`
///   The number of items exceeds what the single-digit key format (and
///   exact enumeration) can express.
/// - `InvalidKeyCharacter { key, character }`
///   A ranking key contains something other than a digit 1–9.
/// - `PositionOutOfRange { position, n_items }`
///   A position or item index lies outside `1..=n_items`.
/// - `DuplicateEntry { value }`
///   A position or item index appears more than once.
/// - `LengthMismatch { expected, actual }`
///   A ranking does not have the item count required by its context.
#[derive(Debug, Clone, PartialEq)]
pub enum RankingError {
    EmptyRanking,
    TooManyItems { n_items: usize, max: usize },
    InvalidKeyCharacter { key: String, character: char },
    PositionOutOfRange { position: usize, n_items: usize },
    DuplicateEntry { value: usize },
    LengthMismatch { expected: usize, actual: usize },
}

impl std::error::Error for RankingError {}

impl std::fmt::Display for RankingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankingError::EmptyRanking => write!(f, "Ranking must contain at least one item."),
            RankingError::TooManyItems { n_items, max } => {
                write!(f, "Ranking over {n_items} items is not supported; at most {max} items.")
            }
            RankingError::InvalidKeyCharacter { key, character } => {
                write!(f, "Ranking key {key:?} contains {character:?}; expected digits 1-9.")
            }
            RankingError::PositionOutOfRange { position, n_items } => {
                write!(f, "Entry {position} is outside 1..={n_items}.")
            }
            RankingError::DuplicateEntry { value } => {
                write!(f, "Entry {value} appears more than once; rankings must be permutations.")
            }
            RankingError::LengthMismatch { expected, actual } => {
                write!(f, "Ranking has {actual} items; expected {expected}.")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<RankingError> for PyErr {
    fn from(err: RankingError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
