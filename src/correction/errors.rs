//! correction::errors — precondition failures for bias correction.
//!
//! Purpose
//! -------
//! Define [`CorrectionError`] and [`CorrectionResult`] for survey-response
//! validation and anchor-statistic construction. Numerical degeneracies in
//! the correction itself (e.g. `p_non_random <= 0`) are deliberately *not*
//! errors: they are coerced to finite outputs and flagged on the outcome.
//!
//! Conventions
//! -----------
//! - Row indices in messages are 0-based.
//! - Ranking parse failures keep the underlying [`RankingError`] and the row
//!   index where they occurred.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::permutations::errors::RankingError;

/// Result alias for bias-correction operations.
pub type CorrectionResult<T> = Result<T, CorrectionError>;

/// CorrectionError — invalid survey inputs for the bias corrector.
///
/// Variants
/// --------
/// - `EmptyResponses`: no respondents were supplied.
/// - `ColumnLengthMismatch`: an auxiliary column (weights, anchor) does not
///   have one entry per respondent.
/// - `InconsistentItemCount`: a ranking has a different item count than the
///   first one.
/// - `InvalidRanking`: a ranking key failed to parse.
/// - `InvalidWeight`: a survey weight is negative or non-finite.
/// - `NonPositiveTotalWeight`: the weights sum to zero.
/// - `NonFiniteTotalWeight`: the weights overflow when summed.
/// - `InvalidAnchorAccuracy`: the anchor accuracy is non-finite or outside
///   `[0, 1]`.
/// - `MissingAnchorColumn`: the anchor-correctness column was required but
///   absent.
/// - `ItemCountMismatch`: an explicitly configured `J` disagrees with the
///   data.
/// - `Ranking`: a permutation-space error (e.g. `J` too large).
#[derive(Debug, Clone, PartialEq)]
pub enum CorrectionError {
    // ---- Input/data validation ----
    EmptyResponses,
    ColumnLengthMismatch { column: &'static str, expected: usize, actual: usize },
    InconsistentItemCount { index: usize, expected: usize, actual: usize },
    InvalidRanking { index: usize, source: RankingError },
    InvalidWeight { index: usize, value: f64 },
    NonPositiveTotalWeight { total: f64 },
    NonFiniteTotalWeight { total: f64 },

    // ---- Anchor statistic ----
    InvalidAnchorAccuracy { value: f64 },
    MissingAnchorColumn,

    // ---- Configuration ----
    ItemCountMismatch { expected: usize, actual: usize },

    // ---- Permutation space ----
    Ranking(RankingError),
}

impl std::error::Error for CorrectionError {}

impl std::fmt::Display for CorrectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input/data validation ----
            CorrectionError::EmptyResponses => write!(f, "Survey responses are empty."),
            CorrectionError::ColumnLengthMismatch { column, expected, actual } => {
                write!(f, "Column {column} has {actual} entries; expected one per respondent ({expected}).")
            }
            CorrectionError::InconsistentItemCount { index, expected, actual } => {
                write!(
                    f,
                    "Ranking at row {index} covers {actual} items; all rankings must cover {expected}."
                )
            }
            CorrectionError::InvalidRanking { index, source } => {
                write!(f, "Ranking at row {index} is invalid: {source}")
            }
            CorrectionError::InvalidWeight { index, value } => {
                write!(f, "Weight at row {index} must be finite and >= 0; got: {value}")
            }
            CorrectionError::NonPositiveTotalWeight { total } => {
                write!(f, "Total survey weight must be > 0; got: {total}")
            }
            CorrectionError::NonFiniteTotalWeight { total } => {
                write!(f, "Total survey weight must be finite; got: {total}")
            }
            // ---- Anchor statistic ----
            CorrectionError::InvalidAnchorAccuracy { value } => {
                write!(f, "Anchor accuracy must be finite and in [0, 1]; got: {value}")
            }
            CorrectionError::MissingAnchorColumn => {
                write!(f, "Anchor-correctness column is required to estimate the random-response rate.")
            }
            // ---- Configuration ----
            CorrectionError::ItemCountMismatch { expected, actual } => {
                write!(f, "Configured item count {expected} does not match the data ({actual}).")
            }
            // ---- Permutation space ----
            CorrectionError::Ranking(err) => write!(f, "{err}"),
        }
    }
}

impl From<RankingError> for CorrectionError {
    fn from(err: RankingError) -> Self {
        CorrectionError::Ranking(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<CorrectionError> for PyErr {
    fn from(err: CorrectionError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Verify that row-indexed variants report the row and the payload.
    //
    // Given
    // -----
    // - `InvalidWeight { index: 7, value: -2.5 }`.
    //
    // Expect
    // ------
    // - The message contains "7" and "-2.5".
    fn invalid_weight_display_includes_row_and_value() {
        // Arrange
        let err = CorrectionError::InvalidWeight { index: 7, value: -2.5 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains('7') && msg.contains("-2.5"), "Got: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Check that ranking errors convert into `CorrectionError::Ranking`
    // and keep their message.
    //
    // Given
    // -----
    // - `RankingError::EmptyRanking`.
    //
    // Expect
    // ------
    // - The converted error displays the same message as the source.
    fn ranking_error_converts_and_preserves_message() {
        // Arrange
        let source = RankingError::EmptyRanking;

        // Act
        let err: CorrectionError = source.clone().into();

        // Assert
        assert_eq!(err, CorrectionError::Ranking(source.clone()));
        assert_eq!(err.to_string(), source.to_string());
    }
}
