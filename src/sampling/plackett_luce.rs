//! sampling::plackett_luce — Plackett–Luce ranking sampler and probabilities.
//!
//! Purpose
//! -------
//! Draw synthetic full rankings from a Plackett–Luce model with positive
//! item weights γ, and evaluate the analytic probability of a given
//! ordering under the same model.
//!
//! Key behaviors
//! -------------
//! - Sampling is sequential weighted choice without replacement: at each
//!   stage one remaining item is picked with probability proportional to its
//!   γ among the remaining pool, appended to the ranking, and removed.
//! - [`stagewise_probability`] evaluates the dual quantity
//!   `Π_k u[k] / Σ_{j≥k} u[j]` for utilities listed in ranking order. The
//!   choice simulator reuses it for its per-draw pattern probabilities.
//! - [`stagewise_probability_from_linear`] does the same from log-utilities
//!   (linear predictors), shifting by the maximum before exponentiating.
//!
//! Invariants & assumptions
//! ------------------------
//! - γ is non-empty and every weight is finite and strictly positive.
//! - Sampled rankings are permutations of `1..=t` (1-based item indices).
//! - One random stream serves all draws of a call; seeded calls are
//!   deterministic.
//!
//! Performance
//! -----------
//! - Each draw costs O(t²) for `t` items: every stage builds a
//!   [`WeightedIndex`] over the remaining pool. Draws are written straight
//!   into a preallocated `n × t` matrix.
use std::collections::HashSet;

use ndarray::{Array1, Array2};
use rand::{
    Rng,
    distributions::{Distribution, WeightedIndex},
};

use crate::{
    permutations::{errors::RankingError, ranking::Ranking},
    sampling::{
        errors::{SamplingError, SamplingResult},
        options::{SamplerOptions, rng_from_seed},
    },
};

/// PlackettLuce — a Plackett–Luce model over `t` items.
///
/// Fields
/// ------
/// - `weights`: `Array1<f64>`: item weights γ (finite, > 0).
/// - `labels`: `Option<Vec<String>>`: optional distinct item labels.
#[derive(Debug, Clone, PartialEq)]
pub struct PlackettLuce {
    weights: Array1<f64>,
    labels: Option<Vec<String>>,
}

impl PlackettLuce {
    /// Build a model from item weights γ.
    ///
    /// Errors
    /// ------
    /// - `SamplingError::EmptyWeights` for an empty γ.
    /// - `SamplingError::InvalidWeight` for the first non-finite or
    ///   non-positive weight.
    /// - `SamplingError::NonFiniteTotalWeight` when γ overflows on summation.
    pub fn new(weights: Array1<f64>) -> SamplingResult<Self> {
        if weights.is_empty() {
            return Err(SamplingError::EmptyWeights);
        }
        for (index, &value) in weights.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(SamplingError::InvalidWeight { index, value });
            }
        }
        let total = weights.sum();
        if !total.is_finite() {
            return Err(SamplingError::NonFiniteTotalWeight { total });
        }
        Ok(PlackettLuce { weights, labels: None })
    }

    /// Attach item labels, one per weight.
    ///
    /// Errors
    /// ------
    /// - `SamplingError::LabelCountMismatch` / `DuplicateLabel`.
    pub fn with_labels(mut self, labels: Vec<String>) -> SamplingResult<Self> {
        if labels.len() != self.weights.len() {
            return Err(SamplingError::LabelCountMismatch {
                expected: self.weights.len(),
                actual: labels.len(),
            });
        }
        let mut seen = HashSet::with_capacity(labels.len());
        for label in &labels {
            if !seen.insert(label.as_str()) {
                return Err(SamplingError::DuplicateLabel { label: label.clone() });
            }
        }
        self.labels = Some(labels);
        Ok(self)
    }

    /// Number of items `t`.
    pub fn n_items(&self) -> usize {
        self.weights.len()
    }

    /// Item weights γ.
    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    /// Item labels, if attached.
    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    /// Draw `n_draws` rankings using a stream seeded from `options`.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::array;
    /// # use rank_estimation::sampling::{PlackettLuce, SamplerOptions};
    /// let model = PlackettLuce::new(array![0.5, 0.3, 0.2]).unwrap();
    /// let first = model.sample(10, &SamplerOptions::new(Some(2024))).unwrap();
    /// let again = model.sample(10, &SamplerOptions::new(Some(2024))).unwrap();
    /// assert_eq!(first.draws(), again.draws());
    /// ```
    pub fn sample(&self, n_draws: usize, options: &SamplerOptions) -> SamplingResult<SampledRankings> {
        let mut rng = rng_from_seed(options.seed);
        self.sample_with_rng(n_draws, &mut rng)
    }

    /// Draw `n_draws` rankings from a caller-owned random stream.
    ///
    /// Notes
    /// -----
    /// - Row `i` of the result is draw `i`; column `k` holds the 1-based
    ///   index of the item placed at position `k + 1`.
    /// - The stream advances across draws; it is never re-seeded.
    ///
    /// Errors
    /// ------
    /// - `SamplingError::Distribution` if a stage's weighted index cannot be
    ///   built. Validated weights keep every pool non-empty with a finite,
    ///   positive total.
    pub fn sample_with_rng<R: Rng + ?Sized>(
        &self, n_draws: usize, rng: &mut R,
    ) -> SamplingResult<SampledRankings> {
        let n_items = self.n_items();
        tracing::debug!(n_draws, n_items, "sampling Plackett-Luce rankings");

        let mut draws = Array2::<usize>::zeros((n_draws, n_items));
        let mut pool: Vec<usize> = Vec::with_capacity(n_items);
        for mut row in draws.rows_mut() {
            pool.clear();
            pool.extend(0..n_items);
            for slot in row.iter_mut() {
                let stage = WeightedIndex::new(pool.iter().map(|&item| self.weights[item]))?;
                *slot = pool.remove(stage.sample(rng)) + 1;
            }
        }

        Ok(SampledRankings { draws, labels: self.labels.clone() })
    }

    /// Analytic probability of observing the full ordering `order`
    /// (1-based item ids, best first).
    ///
    /// Errors
    /// ------
    /// - `SamplingError::Ranking` when `order` is not a permutation of
    ///   `1..=t`.
    pub fn ranking_probability(&self, order: &[usize]) -> SamplingResult<f64> {
        if order.len() != self.n_items() {
            return Err(SamplingError::Ranking(RankingError::LengthMismatch {
                expected: self.n_items(),
                actual: order.len(),
            }));
        }
        validate_order(order)?;
        let utilities: Vec<f64> = order.iter().map(|&item| self.weights[item - 1]).collect();
        Ok(stagewise_probability(&utilities))
    }
}

/// SampledRankings — `n` sampled orderings over `t` items.
///
/// Fields
/// ------
/// - `draws`: `Array2<usize>`: `n × t`, row = draw, column = position,
///   entries are 1-based item indices.
/// - `labels`: `Option<Vec<String>>`: item labels copied from the model.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledRankings {
    draws: Array2<usize>,
    labels: Option<Vec<String>>,
}

impl SampledRankings {
    /// Number of draws `n`.
    pub fn n_draws(&self) -> usize {
        self.draws.nrows()
    }

    /// Number of items `t`.
    pub fn n_items(&self) -> usize {
        self.draws.ncols()
    }

    /// Raw `n × t` matrix of 1-based item indices.
    pub fn draws(&self) -> &Array2<usize> {
        &self.draws
    }

    /// Draws rendered with item labels, or with 1-based indices when the
    /// model had no labels.
    pub fn labelled(&self) -> Vec<Vec<String>> {
        self.draws
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .map(|&item| match &self.labels {
                        Some(labels) => labels[item - 1].clone(),
                        None => item.to_string(),
                    })
                    .collect()
            })
            .collect()
    }

    /// Draws as typed rankings.
    ///
    /// Errors
    /// ------
    /// - `SamplingError::Ranking(RankingError::TooManyItems)` when
    ///   `t > MAX_ITEMS`.
    pub fn rankings(&self) -> SamplingResult<Vec<Ranking>> {
        self.draws
            .rows()
            .into_iter()
            .map(|row| Ranking::from_order(&row.to_vec()).map_err(SamplingError::from))
            .collect()
    }
}

/// Probability that items are chosen in the listed order when each stage
/// picks among the remaining items proportionally to `utilities`.
///
/// Notes
/// -----
/// - `utilities[k]` belongs to the item ranked at position `k + 1`.
/// - The last stage always contributes a factor of 1.
/// - Denominators are suffix sums accumulated from the back, so a dominant
///   early utility never cancels a later denominator to zero. O(J).
///
/// Examples
/// --------
/// ```rust
/// # use rank_estimation::sampling::plackett_luce::stagewise_probability;
/// // 0.5/1.0 · 0.3/0.5 · 0.2/0.2
/// let p = stagewise_probability(&[0.5, 0.3, 0.2]);
/// assert!((p - 0.3).abs() < 1e-12);
/// ```
pub fn stagewise_probability(utilities: &[f64]) -> f64 {
    let Some((&last, earlier)) = utilities.split_last() else {
        return 1.0;
    };
    let mut suffix = last;
    earlier.iter().rev().fold(1.0, |probability, &utility| {
        suffix += utility;
        probability * (utility / suffix)
    })
}

/// [`stagewise_probability`] from linear predictors `η`, with utilities
/// `exp(η)`. Predictors are shifted by their maximum first so large `η`
/// cannot overflow.
pub fn stagewise_probability_from_linear(linear: &[f64]) -> f64 {
    let max = linear.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let utilities: Vec<f64> = linear.iter().map(|&eta| (eta - max).exp()).collect();
    stagewise_probability(&utilities)
}

fn validate_order(order: &[usize]) -> SamplingResult<()> {
    let n_items = order.len();
    let mut seen = vec![false; n_items];
    for &item in order {
        if item == 0 || item > n_items {
            return Err(RankingError::PositionOutOfRange { position: item, n_items }.into());
        }
        if std::mem::replace(&mut seen[item - 1], true) {
            return Err(RankingError::DuplicateEntry { value: item }.into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Weight and label validation.
    // - Permutation validity and seeded determinism of sampled rankings.
    // - Agreement between empirical first-place frequencies and γ shares.
    // - The analytic stage-wise probability, including its log-space form
    //   and the fact that it sums to 1 over all orderings.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Ensure invalid weights and labels are rejected.
    //
    // Given
    // -----
    // - Empty γ, γ with a zero, γ with NaN, γ whose sum overflows,
    //   mismatched and duplicate labels.
    //
    // Expect
    // ------
    // - EmptyWeights, InvalidWeight (index 1), InvalidWeight (index 0),
    //   NonFiniteTotalWeight, LabelCountMismatch, DuplicateLabel.
    fn new_and_with_labels_reject_invalid_inputs() {
        assert_eq!(PlackettLuce::new(Array1::zeros(0)), Err(SamplingError::EmptyWeights));
        assert!(matches!(
            PlackettLuce::new(array![1.0, 0.0]),
            Err(SamplingError::InvalidWeight { index: 1, .. })
        ));
        assert!(matches!(
            PlackettLuce::new(array![f64::NAN, 1.0]),
            Err(SamplingError::InvalidWeight { index: 0, .. })
        ));
        assert!(matches!(
            PlackettLuce::new(array![f64::MAX, f64::MAX]),
            Err(SamplingError::NonFiniteTotalWeight { .. })
        ));
        let model = PlackettLuce::new(array![1.0, 2.0]).expect("valid weights");
        assert_eq!(
            model.clone().with_labels(vec!["a".into()]),
            Err(SamplingError::LabelCountMismatch { expected: 2, actual: 1 })
        );
        assert_eq!(
            model.with_labels(vec!["a".into(), "a".into()]),
            Err(SamplingError::DuplicateLabel { label: "a".into() })
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify the concrete three-item scenario: ten seeded draws are valid
    // permutations and reproduce exactly under the same seed.
    //
    // Given
    // -----
    // - γ = [0.5, 0.3, 0.2], n = 10, seed 11.
    //
    // Expect
    // ------
    // - A 10 × 3 matrix whose rows are permutations of {1, 2, 3}; an
    //   identical second run.
    fn sample_three_items_is_valid_and_reproducible() {
        // Arrange
        let model = PlackettLuce::new(array![0.5, 0.3, 0.2]).expect("valid weights");
        let options = SamplerOptions::new(Some(11));

        // Act
        let first = model.sample(10, &options).expect("valid sampler");
        let second = model.sample(10, &options).expect("valid sampler");

        // Assert
        assert_eq!(first.draws().dim(), (10, 3));
        for row in first.draws().rows() {
            let mut items = row.to_vec();
            items.sort_unstable();
            assert_eq!(items, vec![1, 2, 3]);
        }
        assert_eq!(first, second);
    }

    #[test]
    // Purpose
    // -------
    // Check that first-place frequencies track γ shares.
    //
    // Given
    // -----
    // - γ = [6, 3, 1], 20 000 seeded draws.
    //
    // Expect
    // ------
    // - Item 1 first ≈ 0.6, item 2 ≈ 0.3, item 3 ≈ 0.1 (±0.02).
    fn sample_first_place_frequencies_track_weights() {
        // Arrange
        let model = PlackettLuce::new(array![6.0, 3.0, 1.0]).expect("valid weights");
        let n = 20_000;

        // Act
        let sampled = model.sample(n, &SamplerOptions::new(Some(5))).expect("valid sampler");

        // Assert
        let mut firsts = [0_usize; 3];
        for row in sampled.draws().rows() {
            firsts[row[0] - 1] += 1;
        }
        let shares: Vec<f64> = firsts.iter().map(|&c| c as f64 / n as f64).collect();
        for (share, expected) in shares.iter().zip([0.6, 0.3, 0.1]) {
            assert!((share - expected).abs() < 0.02, "share {share} vs {expected}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify labelled output and typed ranking conversion.
    //
    // Given
    // -----
    // - A labelled two-item model and three draws.
    //
    // Expect
    // ------
    // - Each labelled row is a permutation of the labels; typed rankings
    //   round-trip to the same orders.
    fn labelled_and_typed_views_agree_with_draws() {
        // Arrange
        let model = PlackettLuce::new(array![1.0, 1.0])
            .and_then(|m| m.with_labels(vec!["tea".into(), "coffee".into()]))
            .expect("valid model");

        // Act
        let sampled = model.sample(3, &SamplerOptions::default()).expect("valid sampler");
        let labelled = sampled.labelled();
        let rankings = sampled.rankings().expect("two items fit the key format");

        // Assert
        for ((row, labels), ranking) in sampled.draws().rows().into_iter().zip(&labelled).zip(&rankings) {
            let mut sorted = labels.clone();
            sorted.sort();
            assert_eq!(sorted, vec!["coffee".to_string(), "tea".to_string()]);
            assert_eq!(ranking.order(), row.to_vec());
        }
    }

    #[test]
    // Purpose
    // -------
    // Check the analytic ordering probability: a hand value, its log-space
    // equivalent, and normalization over all orderings.
    //
    // Given
    // -----
    // - γ = [0.5, 0.3, 0.2].
    //
    // Expect
    // ------
    // - P(1 ≻ 2 ≻ 3) = 0.5 · 0.6 · 1 = 0.3; the linear-predictor form
    //   agrees for ln γ; probabilities over the six orderings sum to 1.
    fn ranking_probability_matches_hand_value_and_normalizes() {
        // Arrange
        let model = PlackettLuce::new(array![0.5, 0.3, 0.2]).expect("valid weights");
        let orders = [[1, 2, 3], [1, 3, 2], [2, 1, 3], [2, 3, 1], [3, 1, 2], [3, 2, 1]];

        // Act
        let p123 = model.ranking_probability(&[1, 2, 3]).expect("valid order");
        let from_linear = stagewise_probability_from_linear(&[0.5_f64.ln(), 0.3_f64.ln(), 0.2_f64.ln()]);
        let total: f64 =
            orders.iter().map(|o| model.ranking_probability(o).expect("valid order")).sum();

        // Assert
        assert!((p123 - 0.3).abs() < 1e-12);
        assert!((from_linear - 0.3).abs() < 1e-12);
        assert!((total - 1.0).abs() < 1e-12);
        assert!(model.ranking_probability(&[1, 1, 2]).is_err());
        assert!(model.ranking_probability(&[1, 2]).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Ensure the log-space form does not overflow for large predictors.
    //
    // Given
    // -----
    // - Linear predictors [1000, 999, 0].
    //
    // Expect
    // ------
    // - A finite probability e/(e+1) · 1 · 1 (the last item is negligible).
    fn stagewise_probability_from_linear_is_stable_for_large_predictors() {
        let p = stagewise_probability_from_linear(&[1000.0, 999.0, 0.0]);
        let e = std::f64::consts::E;
        assert!(p.is_finite());
        assert!((p - e / (e + 1.0)).abs() < 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // Ensure a dominant utility leaves every stage finite and the ordering
    // probability at 1 rather than blowing up.
    //
    // Given
    // -----
    // - Linear predictors [0, −40] and [0, −800] (the second underflows).
    // - γ = [1, 1e−17] with the dominant item first, and the reverse order.
    //
    // Expect
    // ------
    // - Probabilities ≈ 1 for dominant-first orderings; ≈ 1e−17 for the
    //   reverse; every value finite.
    fn dominant_utility_keeps_probability_finite() {
        // Arrange
        let model = PlackettLuce::new(array![1.0, 1e-17]).expect("valid weights");

        // Act
        let gap_40 = stagewise_probability_from_linear(&[0.0, -40.0]);
        let gap_800 = stagewise_probability_from_linear(&[0.0, -800.0]);
        let dominant_first = model.ranking_probability(&[1, 2]).expect("valid order");
        let dominant_last = model.ranking_probability(&[2, 1]).expect("valid order");

        // Assert
        assert!((gap_40 - 1.0).abs() < 1e-12, "got {gap_40}");
        assert!((gap_800 - 1.0).abs() < 1e-12, "got {gap_800}");
        assert!((dominant_first - 1.0).abs() < 1e-12, "got {dominant_first}");
        assert!(dominant_last.is_finite() && (dominant_last - 1e-17).abs() < 1e-20);
        assert_eq!(stagewise_probability(&[]), 1.0);
        assert_eq!(stagewise_probability(&[3.0]), 1.0);
    }
}
