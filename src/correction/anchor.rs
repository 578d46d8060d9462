//! correction::anchor — anchor-question accuracy and attentiveness rate.
//!
//! Purpose
//! -------
//! Turn the anchor question (a ranking item with a known correct answer)
//! into an estimate of the share of attentive, non-random respondents.
//!
//! Key behaviors
//! -------------
//! - [`AnchorStatistic`] holds the empirical accuracy rate on the anchor.
//! - [`AnchorStatistic::p_non_random`] applies the chance correction
//!   `(accuracy − 1/J!) / (1 − 1/J!)`: a random respondent answers the
//!   anchor correctly with probability `1/J!`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Accuracy lies in `[0, 1]`.
//! - `p_non_random` is **not** clamped. Accuracy at or below chance gives
//!   `p_non_random <= 0`; callers should check `accuracy > 1/J!` when they
//!   need a meaningful correction. For `J = 1` the formula is undefined
//!   (0/0) and yields a non-finite rate.
use crate::{
    correction::{
        errors::{CorrectionError, CorrectionResult},
        validation::validate_accuracy,
    },
    permutations::space::factorial,
};

/// AnchorStatistic — empirical accuracy on the anchor question.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorStatistic {
    accuracy: f64,
}

impl AnchorStatistic {
    /// Wrap a precomputed accuracy rate.
    ///
    /// Errors
    /// ------
    /// - `CorrectionError::InvalidAnchorAccuracy` when `accuracy` is
    ///   non-finite or outside `[0, 1]`.
    pub fn new(accuracy: f64) -> CorrectionResult<Self> {
        Ok(AnchorStatistic { accuracy: validate_accuracy(accuracy)? })
    }

    /// Accuracy as the unweighted share of correct anchor answers.
    ///
    /// Errors
    /// ------
    /// - `CorrectionError::EmptyResponses` for an empty column.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rank_estimation::correction::anchor::AnchorStatistic;
    /// let anchor = AnchorStatistic::from_indicators(&[true, true, false, true]).unwrap();
    /// assert_eq!(anchor.accuracy(), 0.75);
    /// ```
    pub fn from_indicators(anchor_correct: &[bool]) -> CorrectionResult<Self> {
        if anchor_correct.is_empty() {
            return Err(CorrectionError::EmptyResponses);
        }
        let correct = anchor_correct.iter().filter(|&&c| c).count();
        AnchorStatistic::new(correct as f64 / anchor_correct.len() as f64)
    }

    /// Empirical accuracy rate.
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Estimated share of non-random respondents for a `J`-item ranking.
    pub fn p_non_random(&self, n_items: usize) -> f64 {
        let chance = 1.0 / factorial(n_items) as f64;
        (self.accuracy - chance) / (1.0 - chance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover the accuracy constructors and the chance-corrected
    // attentiveness rate at its boundary values.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the chance correction at perfect, chance, and intermediate
    // accuracy for J = 3 (chance = 1/6).
    //
    // Given
    // -----
    // - Accuracies 1.0, 1/6, and 0.6.
    //
    // Expect
    // ------
    // - p_non_random = 1, 0, and (0.6 − 1/6)/(5/6) = 0.52.
    fn p_non_random_matches_chance_correction() {
        let perfect = AnchorStatistic::new(1.0).expect("valid accuracy");
        let chance = AnchorStatistic::new(1.0 / 6.0).expect("valid accuracy");
        let partial = AnchorStatistic::new(0.6).expect("valid accuracy");

        assert_eq!(perfect.p_non_random(3), 1.0);
        assert!(chance.p_non_random(3).abs() < 1e-15);
        assert!((partial.p_non_random(3) - 0.52).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Ensure below-chance accuracy yields a negative, unclamped rate.
    //
    // Given
    // -----
    // - Accuracy 0.0 with J = 2 (chance = 1/2).
    //
    // Expect
    // ------
    // - p_non_random = −1.
    fn p_non_random_is_not_clamped_below_chance() {
        let anchor = AnchorStatistic::new(0.0).expect("valid accuracy");
        assert_eq!(anchor.p_non_random(2), -1.0);
    }

    #[test]
    // Purpose
    // -------
    // Check indicator-based construction and its empty-column guard.
    //
    // Given
    // -----
    // - Indicators [true, false] and an empty slice.
    //
    // Expect
    // ------
    // - Accuracy 0.5; EmptyResponses for the empty slice.
    fn from_indicators_computes_share_and_rejects_empty() {
        let anchor = AnchorStatistic::from_indicators(&[true, false]).expect("non-empty");
        assert_eq!(anchor.accuracy(), 0.5);
        assert_eq!(AnchorStatistic::from_indicators(&[]), Err(CorrectionError::EmptyResponses));
    }
}
