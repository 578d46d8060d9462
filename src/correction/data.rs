//! correction::data — survey responses and observed ranking counts.
//!
//! Purpose
//! -------
//! Provide validated containers for the tabular survey input (one ranking
//! per respondent, an optional survey weight column, and an optional
//! anchor-correctness column) and for the weighted tally of rankings joined
//! against the full permutation space.
//!
//! Key behaviors
//! -------------
//! - [`SurveyResponses`] parses ranking keys once at the boundary, infers
//!   `J` from the key length, and checks every column has one entry per
//!   respondent.
//! - [`ObservedCounts`] records, for every ranking in the space, the raw
//!   respondent count and the survey-weight sum. Unobserved rankings are
//!   present with zeros.
//!
//! Invariants & assumptions
//! ------------------------
//! - At least one respondent; all rankings cover the same `J` items.
//! - Weights (when present) are finite, non-negative, and sum to > 0.
//!   Absent weights mean one unit per respondent.
//! - `ObservedCounts` arrays are aligned with the space's key order.
use std::sync::Arc;

use ndarray::Array1;

use crate::{
    correction::{
        errors::{CorrectionError, CorrectionResult},
        validation::validate_weights,
    },
    permutations::{ranking::Ranking, space::PermutationSpace},
};

/// SurveyResponses — validated ranking responses plus auxiliary columns.
///
/// Fields
/// ------
/// - `rankings`: `Vec<Ranking>`
///   One full ranking per respondent.
/// - `weights`: `Option<Array1<f64>>`
///   Optional survey weights, one per respondent.
/// - `anchor_correct`: `Option<Vec<bool>>`
///   Optional anchor-question correctness indicators, one per respondent.
/// - `n_items`: `usize`
///   Number of ranked items `J`, shared by every ranking.
/// - `total_weight`: `f64`
///   Sum of weights (or respondent count when unweighted).
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyResponses {
    rankings: Vec<Ranking>,
    weights: Option<Array1<f64>>,
    anchor_correct: Option<Vec<bool>>,
    n_items: usize,
    total_weight: f64,
}

impl SurveyResponses {
    /// Build responses from already-parsed rankings.
    ///
    /// Parameters
    /// ----------
    /// - `rankings`: `Vec<Ranking>`
    ///   Non-empty; all rankings must cover the same number of items.
    /// - `weights`: `Option<Array1<f64>>`
    ///   Optional survey weights; `None` means uniform unit weights.
    ///
    /// Errors
    /// ------
    /// - `CorrectionError::EmptyResponses`
    /// - `CorrectionError::InconsistentItemCount { index, .. }`
    /// - Weight errors from [`validate_weights`].
    pub fn new(rankings: Vec<Ranking>, weights: Option<Array1<f64>>) -> CorrectionResult<Self> {
        let first = rankings.first().ok_or(CorrectionError::EmptyResponses)?;
        let n_items = first.n_items();
        for (index, ranking) in rankings.iter().enumerate() {
            if ranking.n_items() != n_items {
                return Err(CorrectionError::InconsistentItemCount {
                    index,
                    expected: n_items,
                    actual: ranking.n_items(),
                });
            }
        }

        let total_weight = match &weights {
            Some(w) => validate_weights(&w.to_vec(), rankings.len())?,
            None => rankings.len() as f64,
        };

        Ok(SurveyResponses { rankings, weights, anchor_correct: None, n_items, total_weight })
    }

    /// Build responses from fixed-width digit keys (e.g. `"2134"`).
    ///
    /// Errors
    /// ------
    /// - `CorrectionError::InvalidRanking { index, source }` for the first
    ///   key that does not parse as a permutation.
    /// - Everything [`SurveyResponses::new`] returns.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rank_estimation::correction::data::SurveyResponses;
    /// let responses = SurveyResponses::from_keys(&["123", "213", "123"], None).unwrap();
    /// assert_eq!(responses.n_items(), 3);
    /// assert_eq!(responses.total_weight(), 3.0);
    /// ```
    pub fn from_keys<S: AsRef<str>>(
        keys: &[S], weights: Option<Array1<f64>>,
    ) -> CorrectionResult<Self> {
        let rankings = keys
            .iter()
            .enumerate()
            .map(|(index, key)| {
                Ranking::from_key(key.as_ref())
                    .map_err(|source| CorrectionError::InvalidRanking { index, source })
            })
            .collect::<CorrectionResult<Vec<Ranking>>>()?;
        SurveyResponses::new(rankings, weights)
    }

    /// Attach the anchor-question correctness column.
    ///
    /// Errors
    /// ------
    /// - `CorrectionError::ColumnLengthMismatch` when the column does not
    ///   have one entry per respondent.
    pub fn with_anchor(mut self, anchor_correct: Vec<bool>) -> CorrectionResult<Self> {
        if anchor_correct.len() != self.rankings.len() {
            return Err(CorrectionError::ColumnLengthMismatch {
                column: "anchor_correct",
                expected: self.rankings.len(),
                actual: anchor_correct.len(),
            });
        }
        self.anchor_correct = Some(anchor_correct);
        Ok(self)
    }

    /// Number of respondents.
    pub fn len(&self) -> usize {
        self.rankings.len()
    }

    /// Always `false` for a successfully constructed value.
    pub fn is_empty(&self) -> bool {
        self.rankings.is_empty()
    }

    /// Number of ranked items `J`.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Respondent rankings, in row order.
    pub fn rankings(&self) -> &[Ranking] {
        &self.rankings
    }

    /// Survey weights, if supplied.
    pub fn weights(&self) -> Option<&Array1<f64>> {
        self.weights.as_ref()
    }

    /// Anchor correctness indicators, if supplied.
    pub fn anchor_correct(&self) -> Option<&[bool]> {
        self.anchor_correct.as_deref()
    }

    /// Weight of respondent `index` (1.0 when unweighted).
    pub fn weight(&self, index: usize) -> f64 {
        self.weights.as_ref().map_or(1.0, |w| w[index])
    }

    /// Sum of all respondent weights.
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }
}

/// ObservedCounts — per-ranking tallies joined against the full space.
///
/// Fields
/// ------
/// - `space`: `Arc<PermutationSpace>`
///   The permutation space the arrays are aligned with.
/// - `counts`: `Array1<f64>`
///   Raw respondent count per ranking.
/// - `weight_sums`: `Array1<f64>`
///   Survey-weight sum per ranking.
/// - `total_weight`: `f64`
///   Sum of `weight_sums`, taken from the responses.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedCounts {
    space: Arc<PermutationSpace>,
    counts: Array1<f64>,
    weight_sums: Array1<f64>,
    total_weight: f64,
}

impl ObservedCounts {
    /// Tally `responses` over `space`, zero-filling unobserved rankings.
    ///
    /// Errors
    /// ------
    /// - `CorrectionError::ItemCountMismatch` when the space and the
    ///   responses disagree on `J`.
    pub fn tally(
        responses: &SurveyResponses, space: Arc<PermutationSpace>,
    ) -> CorrectionResult<Self> {
        if space.n_items() != responses.n_items() {
            return Err(CorrectionError::ItemCountMismatch {
                expected: space.n_items(),
                actual: responses.n_items(),
            });
        }

        let mut counts = Array1::<f64>::zeros(space.len());
        let mut weight_sums = Array1::<f64>::zeros(space.len());
        for (row, ranking) in responses.rankings().iter().enumerate() {
            let index = space.index_of(ranking).ok_or(CorrectionError::ItemCountMismatch {
                expected: space.n_items(),
                actual: ranking.n_items(),
            })?;
            counts[index] += 1.0;
            weight_sums[index] += responses.weight(row);
        }

        Ok(ObservedCounts { space, counts, weight_sums, total_weight: responses.total_weight() })
    }

    /// The permutation space these counts are aligned with.
    pub fn space(&self) -> &Arc<PermutationSpace> {
        &self.space
    }

    /// Raw respondent counts per ranking.
    pub fn counts(&self) -> &Array1<f64> {
        &self.counts
    }

    /// Survey-weight sums per ranking.
    pub fn weight_sums(&self) -> &Array1<f64> {
        &self.weight_sums
    }

    /// Total survey weight.
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Weighted proportion of each ranking: `weight_sum[r] / total_weight`.
    pub fn proportions(&self) -> Array1<f64> {
        &self.weight_sums / self.total_weight
    }
}
