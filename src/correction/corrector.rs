//! correction::corrector — recover the attentive-respondent ranking PMF.
//!
//! Purpose
//! -------
//! Correct an observed distribution over full rankings for contamination by
//! uninformative (uniformly random) responses, using the attentiveness rate
//! estimated from an anchor question, and derive per-ranking
//! inverse-probability weights for downstream reweighting.
//!
//! Key behaviors
//! -------------
//! - Model the observed PMF as the mixture
//!   `observed = p·true + (1 − p)·uniform`, with `p = p_non_random` and
//!   `uniform = 1/J!`, and invert it algebraically:
//!   `true = (observed − uniform·(1 − p)) / p`.
//! - Clamp negative corrected mass to zero, renormalize to a PMF, and form
//!   importance weights `w[r] = corrected[r] / observed[r]`.
//! - Report the estimated random-response share `1 − p`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every table in a [`CorrectionOutcome`] is aligned with the cached
//!   [`PermutationSpace`] for `J`, so unobserved rankings carry zeros.
//! - `raw_pmf` sums to 1 up to floating error.
//! - `importance_weights` and `prop_renormalized` never contain NaN or ±∞:
//!   any ratio with a zero or non-finite denominator is coerced to 0.
//! - Degenerate anchors (`p <= 0`, or accuracy at chance) are not errors.
//!   The intermediate `prop`/`prop_adj` columns may then hold non-finite
//!   values; the renormalized PMF collapses to zeros and
//!   [`CorrectionOutcome::is_degenerate`] reports `true`.
//!
//! Downstream usage
//! ----------------
//! - Call [`CorrectionOutcome::correct_responses`] when the survey carries
//!   its anchor column, or [`CorrectionOutcome::correct`] with a
//!   precomputed [`AnchorStatistic`].
//! - Use [`CorrectionOutcome::respondent_weights`] to attach the importance
//!   weight of each respondent's ranking to other analyses.
use std::sync::Arc;

use ndarray::{Array1, Zip};

use crate::{
    correction::{
        anchor::AnchorStatistic,
        data::{ObservedCounts, SurveyResponses},
        errors::{CorrectionError, CorrectionResult},
    },
    permutations::{ranking::Ranking, space::PermutationSpace},
};

/// CorrectionOptions — configuration for a correction run.
///
/// Fields
/// ------
/// - `n_items`: `Option<usize>`
///   Explicit number of items `J`. `None` infers `J` from the ranking key
///   length; `Some(j)` must agree with the data.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CorrectionOptions {
    pub n_items: Option<usize>,
}

impl CorrectionOptions {
    pub fn new(n_items: Option<usize>) -> CorrectionOptions {
        CorrectionOptions { n_items }
    }
}

/// RankingTable — one value per ranking, aligned with a permutation space.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingTable {
    space: Arc<PermutationSpace>,
    values: Array1<f64>,
}

impl RankingTable {
    fn new(space: Arc<PermutationSpace>, values: Array1<f64>) -> RankingTable {
        RankingTable { space, values }
    }

    /// Values in the space's key order.
    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// The permutation space the values are aligned with.
    pub fn space(&self) -> &PermutationSpace {
        &self.space
    }

    /// Value for `ranking`, or `None` if it belongs to a different `J`.
    pub fn get(&self, ranking: &Ranking) -> Option<f64> {
        self.space.index_of(ranking).map(|i| self.values[i])
    }

    /// Sum of all values.
    pub fn sum(&self) -> f64 {
        self.values.sum()
    }

    /// `(ranking, value)` rows in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Ranking, f64)> + '_ {
        self.space.iter().zip(self.values.iter().copied())
    }
}

/// CorrectedPmf — the three stages of the corrected distribution.
///
/// Fields
/// ------
/// - `prop`: unclamped corrected mass `(raw − uniform·(1 − p)) / p`.
/// - `prop_adj`: `max(prop, 0)`.
/// - `prop_renormalized`: `prop_adj / Σ prop_adj`, coerced to 0 when the
///   ratio is not finite.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectedPmf {
    pub prop: RankingTable,
    pub prop_adj: RankingTable,
    pub prop_renormalized: RankingTable,
}

/// CorrectionOutcome — bias-corrected PMF, weights, and diagnostics.
///
/// Fields
/// ------
/// - `n_items`: `usize`: number of ranked items `J`.
/// - `anchor`: [`AnchorStatistic`] used for the correction.
/// - `p_non_random`: `f64`: estimated attentive share (unclamped).
/// - `est_p_random`: `f64`: `1 − p_non_random`.
/// - `observed`: [`ObservedCounts`]: raw and weighted tallies.
/// - `raw_pmf`: [`RankingTable`]: observed weighted proportions.
/// - `corrected_pmf`: [`CorrectedPmf`].
/// - `importance_weights`: [`RankingTable`]: `prop_renormalized / raw`.
/// - `degenerate`: `bool`: the clamped corrected mass had no finite,
///   positive total.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionOutcome {
    n_items: usize,
    anchor: AnchorStatistic,
    p_non_random: f64,
    est_p_random: f64,
    observed: ObservedCounts,
    raw_pmf: RankingTable,
    corrected_pmf: CorrectedPmf,
    importance_weights: RankingTable,
    degenerate: bool,
}

impl CorrectionOutcome {
    /// Bias-correct the ranking distribution of `responses`.
    ///
    /// Parameters
    /// ----------
    /// - `responses`: `&SurveyResponses`
    ///   Validated rankings with optional survey weights (uniform unit
    ///   weights when absent).
    /// - `anchor`: `AnchorStatistic`
    ///   Anchor accuracy used to estimate `p_non_random`.
    /// - `options`: `&CorrectionOptions`
    ///   Optional explicit `J`.
    ///
    /// Returns
    /// -------
    /// `CorrectionResult<CorrectionOutcome>` holding the raw PMF, the
    /// corrected PMF stages, importance weights, and `est_p_random`.
    ///
    /// Errors
    /// ------
    /// - `CorrectionError::ItemCountMismatch` when `options.n_items`
    ///   disagrees with the data.
    /// - `CorrectionError::Ranking` when `J` is outside the enumerable range.
    ///
    /// Notes
    /// -----
    /// - Steps: tally weights per ranking over the full space; `raw = w/Σw`;
    ///   `prop = (raw − (1 − p)/J!) / p`; `prop_adj = max(prop, 0)`;
    ///   `prop_renormalized = prop_adj / Σ prop_adj`;
    ///   `w = prop_renormalized / raw`, with non-finite ratios set to 0.
    /// - With `p = 1` the correction is the identity: `prop == raw`.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rank_estimation::correction::{
    /// #     anchor::AnchorStatistic, corrector::{CorrectionOptions, CorrectionOutcome},
    /// #     data::SurveyResponses,
    /// # };
    /// let responses = SurveyResponses::from_keys(&["123", "123", "213", "321"], None).unwrap();
    /// let anchor = AnchorStatistic::new(0.9).unwrap();
    /// let outcome =
    ///     CorrectionOutcome::correct(&responses, anchor, &CorrectionOptions::default()).unwrap();
    /// assert!((outcome.corrected_pmf().prop_renormalized.sum() - 1.0).abs() < 1e-9);
    /// assert!(outcome.importance_weights().values().iter().all(|w| w.is_finite()));
    /// ```
    pub fn correct(
        responses: &SurveyResponses, anchor: AnchorStatistic, options: &CorrectionOptions,
    ) -> CorrectionResult<Self> {
        let n_items = resolve_n_items(responses, options)?;
        let space = PermutationSpace::cached(n_items)?;
        let observed = ObservedCounts::tally(responses, Arc::clone(&space))?;
        let raw = observed.proportions();

        let p_non_random = anchor.p_non_random(n_items);
        tracing::debug!(
            n_items,
            respondents = responses.len(),
            accuracy = anchor.accuracy(),
            p_non_random,
            "bias-correcting ranking distribution"
        );
        if p_non_random <= 0.0 || !p_non_random.is_finite() {
            tracing::warn!(
                p_non_random,
                "anchor accuracy at or below chance; correction is degenerate"
            );
        }

        let (prop, prop_adj, prop_renormalized, adj_total) = bias_correct(&raw, p_non_random);
        let weights = importance_weights(&prop_renormalized, &raw);
        let degenerate = !(adj_total.is_finite() && adj_total > 0.0);
        if degenerate {
            tracing::warn!(adj_total, "no finite positive corrected mass; PMF collapsed to zero");
        }

        Ok(CorrectionOutcome {
            n_items,
            anchor,
            p_non_random,
            est_p_random: 1.0 - p_non_random,
            observed,
            raw_pmf: RankingTable::new(Arc::clone(&space), raw),
            corrected_pmf: CorrectedPmf {
                prop: RankingTable::new(Arc::clone(&space), prop),
                prop_adj: RankingTable::new(Arc::clone(&space), prop_adj),
                prop_renormalized: RankingTable::new(Arc::clone(&space), prop_renormalized),
            },
            importance_weights: RankingTable::new(space, weights),
            degenerate,
        })
    }

    /// Estimate the anchor accuracy from the responses' anchor column, then
    /// run [`CorrectionOutcome::correct`].
    ///
    /// Errors
    /// ------
    /// - `CorrectionError::MissingAnchorColumn` when no anchor column was
    ///   attached.
    /// - Everything [`CorrectionOutcome::correct`] returns.
    pub fn correct_responses(
        responses: &SurveyResponses, options: &CorrectionOptions,
    ) -> CorrectionResult<Self> {
        let anchor_correct = responses.anchor_correct().ok_or(CorrectionError::MissingAnchorColumn)?;
        let anchor = AnchorStatistic::from_indicators(anchor_correct)?;
        CorrectionOutcome::correct(responses, anchor, options)
    }

    /// Importance weight of each respondent's ranking, in row order.
    ///
    /// Errors
    /// ------
    /// - `CorrectionError::ItemCountMismatch` when `responses` use a
    ///   different `J` from this outcome.
    pub fn respondent_weights(&self, responses: &SurveyResponses) -> CorrectionResult<Array1<f64>> {
        if responses.n_items() != self.n_items {
            return Err(CorrectionError::ItemCountMismatch {
                expected: self.n_items,
                actual: responses.n_items(),
            });
        }
        let space = self.importance_weights.space();
        let values = self.importance_weights.values();
        responses
            .rankings()
            .iter()
            .map(|ranking| {
                space.index_of(ranking).map(|i| values[i]).ok_or(
                    CorrectionError::ItemCountMismatch {
                        expected: self.n_items,
                        actual: ranking.n_items(),
                    },
                )
            })
            .collect::<CorrectionResult<Vec<f64>>>()
            .map(Array1::from)
    }

    /// Number of ranked items `J`.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Anchor statistic used for the correction.
    pub fn anchor(&self) -> AnchorStatistic {
        self.anchor
    }

    /// Estimated attentive share (unclamped).
    pub fn p_non_random(&self) -> f64 {
        self.p_non_random
    }

    /// Estimated random-response share `1 − p_non_random`.
    pub fn est_p_random(&self) -> f64 {
        self.est_p_random
    }

    /// Raw and weighted tallies per ranking.
    pub fn observed(&self) -> &ObservedCounts {
        &self.observed
    }

    /// Observed weighted PMF.
    pub fn raw_pmf(&self) -> &RankingTable {
        &self.raw_pmf
    }

    /// Corrected PMF stages.
    pub fn corrected_pmf(&self) -> &CorrectedPmf {
        &self.corrected_pmf
    }

    /// Per-ranking importance weights.
    pub fn importance_weights(&self) -> &RankingTable {
        &self.importance_weights
    }

    /// `true` when the corrected mass could not be renormalized.
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// Observed probability of `ranking`.
    pub fn raw_probability(&self, ranking: &Ranking) -> Option<f64> {
        self.raw_pmf.get(ranking)
    }

    /// Corrected, renormalized probability of `ranking`.
    pub fn corrected_probability(&self, ranking: &Ranking) -> Option<f64> {
        self.corrected_pmf.prop_renormalized.get(ranking)
    }

    /// Importance weight of `ranking`.
    pub fn importance_weight(&self, ranking: &Ranking) -> Option<f64> {
        self.importance_weights.get(ranking)
    }
}

// ---- Helpers ----

fn resolve_n_items(
    responses: &SurveyResponses, options: &CorrectionOptions,
) -> CorrectionResult<usize> {
    match options.n_items {
        Some(expected) if expected != responses.n_items() => {
            Err(CorrectionError::ItemCountMismatch { expected, actual: responses.n_items() })
        }
        _ => Ok(responses.n_items()),
    }
}

/// Invert the uniform-contamination mixture and renormalize.
///
/// Returns `(prop, prop_adj, prop_renormalized, Σ prop_adj)`.
fn bias_correct(raw: &Array1<f64>, p_non_random: f64) -> (Array1<f64>, Array1<f64>, Array1<f64>, f64) {
    let uniform = 1.0 / raw.len() as f64;
    let prop = raw.mapv(|x| (x - uniform * (1.0 - p_non_random)) / p_non_random);
    // f64::max maps NaN to the other operand, so NaN mass clamps to 0.
    let prop_adj = prop.mapv(|x| x.max(0.0));
    let adj_total = prop_adj.sum();
    let prop_renormalized = prop_adj.mapv(|x| finite_ratio(x, adj_total));
    (prop, prop_adj, prop_renormalized, adj_total)
}

fn importance_weights(corrected: &Array1<f64>, raw: &Array1<f64>) -> Array1<f64> {
    Zip::from(corrected).and(raw).map_collect(|&c, &r| finite_ratio(c, r))
}

/// `num / den`, or 0 when the quotient is NaN or ±∞.
#[inline]
fn finite_ratio(num: f64, den: f64) -> f64 {
    let ratio = num / den;
    if ratio.is_finite() { ratio } else { 0.0 }
}
