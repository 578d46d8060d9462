//! correction::validation — input guards for survey data and anchors.
//!
//! Purpose
//! -------
//! Centralize the checks applied to survey weights and anchor accuracies
//! before any counting or correction happens, so that the corrector itself
//! can assume well-formed inputs.
//!
//! Invariants & assumptions
//! ------------------------
//! - Weights are finite and non-negative, with a finite, strictly positive
//!   total.
//! - Anchor accuracy is finite and lies in `[0, 1]`. Values at or below
//!   chance level (`1/J!`) are accepted here; their degenerate effect on the
//!   correction is handled downstream.
use crate::correction::errors::{CorrectionError, CorrectionResult};

/// Validate a survey-weight column and return its total.
///
/// Parameters
/// ----------
/// - `weights`: `&[f64]`
///   One weight per respondent.
/// - `n_respondents`: `usize`
///   Expected column length.
///
/// Errors
/// ------
/// - `CorrectionError::ColumnLengthMismatch` when lengths differ.
/// - `CorrectionError::InvalidWeight` for the first negative or non-finite
///   weight.
/// - `CorrectionError::NonPositiveTotalWeight` when all weights are zero.
/// - `CorrectionError::NonFiniteTotalWeight` when the sum overflows.
pub fn validate_weights(weights: &[f64], n_respondents: usize) -> CorrectionResult<f64> {
    if weights.len() != n_respondents {
        return Err(CorrectionError::ColumnLengthMismatch {
            column: "weights",
            expected: n_respondents,
            actual: weights.len(),
        });
    }
    for (index, &value) in weights.iter().enumerate() {
        if !value.is_finite() || value < 0.0 {
            return Err(CorrectionError::InvalidWeight { index, value });
        }
    }
    let total: f64 = weights.iter().sum();
    if !total.is_finite() {
        return Err(CorrectionError::NonFiniteTotalWeight { total });
    }
    if total <= 0.0 {
        return Err(CorrectionError::NonPositiveTotalWeight { total });
    }
    Ok(total)
}

/// Validate an anchor accuracy rate.
///
/// Errors
/// ------
/// - `CorrectionError::InvalidAnchorAccuracy` when `accuracy` is NaN, ±∞,
///   or outside `[0, 1]`.
pub fn validate_accuracy(accuracy: f64) -> CorrectionResult<f64> {
    if !accuracy.is_finite() || !(0.0..=1.0).contains(&accuracy) {
        return Err(CorrectionError::InvalidAnchorAccuracy { value: accuracy });
    }
    Ok(accuracy)
}
