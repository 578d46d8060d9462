//! Integration tests for the anchor-based bias correction pipeline.
//!
//! Purpose
//! -------
//! - Validate the path from raw survey columns (ranking keys, anchor
//!   indicators, weights) through tallying and correction to per-respondent
//!   importance weights.
//! - Check the PMF and weight invariants over random survey data.
//!
//! Coverage
//! --------
//! - `correction::data::SurveyResponses` construction from keys.
//! - `correction::corrector::CorrectionOutcome`: `correct`,
//!   `correct_responses`, `respondent_weights`, lookups.
//! - Boundary anchors: perfect accuracy (identity correction) and chance
//!   accuracy (degenerate, clamped output).
//!
//! Exclusions
//! ----------
//! - Column validation branches; those are covered by unit tests in
//!   `correction::data` and `correction::validation`.
use ndarray::Array1;
use proptest::prelude::*;
use rank_estimation::{
    correction::prelude::*,
    permutations::{Ranking, factorial},
};

fn survey_keys() -> Vec<&'static str> {
    vec!["123", "123", "132", "213", "123", "321", "231", "123", "312", "213"]
}

#[test]
// Purpose
// -------
// Run the full pipeline on a small weighted survey and check every output
// invariant.
//
// Given
// -----
// - Ten J = 3 responses, survey weights, and an anchor column with 8/10
//   correct.
//
// Expect
// ------
// - Raw and renormalized PMFs sum to 1; all corrected values ≥ 0; all
//   weights finite; the respondent weight vector matches per-ranking
//   weights; est_p_random = 1 − p_non_random.
fn weighted_survey_pipeline_satisfies_pmf_invariants() {
    // Arrange
    let weights = Array1::from(vec![1.0, 2.0, 0.5, 1.0, 1.5, 1.0, 0.5, 2.0, 1.0, 1.0]);
    let anchor = vec![true, true, true, false, true, true, false, true, true, true];
    let responses = SurveyResponses::from_keys(&survey_keys(), Some(weights))
        .and_then(|r| r.with_anchor(anchor))
        .expect("valid survey");

    // Act
    let outcome = CorrectionOutcome::correct_responses(&responses, &CorrectionOptions::default())
        .expect("valid correction");
    let per_row = outcome.respondent_weights(&responses).expect("same J");

    // Assert
    assert_eq!(outcome.n_items(), 3);
    assert!((outcome.anchor().accuracy() - 0.8).abs() < 1e-12);
    assert!((outcome.est_p_random() - (1.0 - outcome.p_non_random())).abs() < 1e-12);
    assert!(!outcome.is_degenerate());
    assert!((outcome.raw_pmf().sum() - 1.0).abs() < 1e-9);
    let pmf = outcome.corrected_pmf();
    assert!((pmf.prop_renormalized.sum() - 1.0).abs() < 1e-9);
    assert!(pmf.prop_adj.values().iter().all(|&v| v >= 0.0));
    assert!(outcome.importance_weights().values().iter().all(|w| w.is_finite()));

    for (ranking, weight) in responses.rankings().iter().zip(per_row.iter()) {
        assert_eq!(outcome.importance_weight(ranking), Some(*weight));
    }
    // Weighted share of "123": (1 + 2 + 1.5 + 2) / 11.5.
    let top = Ranking::from_key("123").expect("valid key");
    assert!((outcome.raw_probability(&top).expect("in space") - 6.5 / 11.5).abs() < 1e-12);
}

#[test]
// Purpose
// -------
// Confirm the identity correction at perfect anchor accuracy.
//
// Given
// -----
// - The unweighted survey and accuracy 1.0 (J = 3).
//
// Expect
// ------
// - p_non_random = 1; prop equals raw exactly for every ranking; weights
//   are 1 where the ranking was observed and 0 elsewhere.
fn perfect_anchor_is_identity_correction() {
    // Arrange
    let responses = SurveyResponses::from_keys(&survey_keys(), None).expect("valid survey");
    let anchor = AnchorStatistic::new(1.0).expect("valid accuracy");

    // Act
    let outcome = CorrectionOutcome::correct(&responses, anchor, &CorrectionOptions::default())
        .expect("valid correction");

    // Assert
    assert_eq!(outcome.p_non_random(), 1.0);
    let raw = outcome.raw_pmf().values();
    assert_eq!(outcome.corrected_pmf().prop.values(), raw);
    for (&w, &r) in outcome.importance_weights().values().iter().zip(raw.iter()) {
        let expected = if r > 0.0 { 1.0 } else { 0.0 };
        assert!((w - expected).abs() < 1e-12);
    }
}

#[test]
// Purpose
// -------
// Confirm chance-level accuracy yields a defined, clamped degenerate
// result instead of a crash or Inf/NaN output.
//
// Given
// -----
// - Accuracy exactly 1/3! for J = 3.
//
// Expect
// ------
// - p_non_random = 0; the outcome is flagged degenerate; renormalized PMF
//   and weights are all finite (zero).
fn chance_anchor_is_flagged_and_clamped() {
    // Arrange
    let responses = SurveyResponses::from_keys(&survey_keys(), None).expect("valid survey");
    let anchor = AnchorStatistic::new(1.0 / factorial(3) as f64).expect("valid accuracy");

    // Act
    let outcome = CorrectionOutcome::correct(&responses, anchor, &CorrectionOptions::default())
        .expect("degenerate input does not raise");

    // Assert
    assert!(outcome.p_non_random().abs() < 1e-12);
    assert!(outcome.is_degenerate());
    let pmf = outcome.corrected_pmf();
    assert!(pmf.prop_renormalized.values().iter().all(|&v| v == 0.0));
    assert!(outcome.importance_weights().values().iter().all(|&w| w == 0.0));
}

#[test]
// Purpose
// -------
// Ensure the anchor column is required for `correct_responses`.
//
// Given
// -----
// - Responses without an anchor column.
//
// Expect
// ------
// - `CorrectionError::MissingAnchorColumn`.
fn correct_responses_requires_anchor_column() {
    let responses = SurveyResponses::from_keys(&survey_keys(), None).expect("valid survey");
    assert_eq!(
        CorrectionOutcome::correct_responses(&responses, &CorrectionOptions::default()),
        Err(CorrectionError::MissingAnchorColumn)
    );
}

fn survey(max_rows: usize) -> impl Strategy<Value = (Vec<Vec<usize>>, Vec<f64>)> {
    (2_usize..=4).prop_flat_map(move |n_items| {
        let ranking = Just((1..=n_items).collect::<Vec<usize>>()).prop_shuffle();
        prop::collection::vec((ranking, 0.1_f64..5.0), 1..=max_rows)
            .prop_map(|rows| rows.into_iter().unzip())
    })
}

proptest! {
    #[test]
    fn corrected_pmf_is_normalized_and_weights_are_finite(
        (rows, weights) in survey(40),
        accuracy in 0.0_f64..=1.0,
    ) {
        let rankings: Vec<Ranking> = rows
            .iter()
            .map(|positions| Ranking::from_positions(positions).expect("valid permutation"))
            .collect();
        let responses = SurveyResponses::new(rankings, Some(Array1::from(weights)))
            .expect("valid survey");
        let anchor = AnchorStatistic::new(accuracy).expect("accuracy in [0, 1]");

        let outcome = CorrectionOutcome::correct(&responses, anchor, &CorrectionOptions::default())
            .expect("correction never raises on valid columns");

        prop_assert!((outcome.raw_pmf().sum() - 1.0).abs() < 1e-9);
        let renormalized = &outcome.corrected_pmf().prop_renormalized;
        prop_assert!(renormalized.values().iter().all(|&v| v >= 0.0 && v.is_finite()));
        if outcome.is_degenerate() {
            prop_assert!(renormalized.values().iter().all(|&v| v == 0.0));
        } else {
            prop_assert!((renormalized.sum() - 1.0).abs() < 1e-9);
        }
        prop_assert!(outcome.importance_weights().values().iter().all(|w| w.is_finite()));
    }
}
