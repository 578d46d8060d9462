//! simulation::simulator — probability of a full ordering of alternatives
//! across a moderator grid.
//!
//! Purpose
//! -------
//! Trace how the probability that respondents rank alternatives in a given
//! pattern changes with a moderator variable, propagating the fitted
//! model's estimation uncertainty by simulation.
//!
//! Key behaviors
//! -------------
//! For each grid value `v`, in grid order:
//! 1. Draw coefficient vectors from the prepared [`DrawSource`].
//! 2. For each non-reference alternative `a` of the pattern, form the linear
//!    predictor `η_a = intercept_a + slope_a · v` (a discrete level uses its
//!    level coefficient; the first level contributes 0). The reference
//!    alternative has `η = 0`.
//! 3. Evaluate the stage-wise choice probability of the pattern per draw,
//!    `Π_k exp(η_k) / Σ_{j≥k} exp(η_j)`.
//! 4. Summarize the per-draw probabilities by their mean and a t interval
//!    with `n − 1` degrees of freedom.
//!
//! Invariants & assumptions
//! ------------------------
//! - All inputs are validated before the first draw; on error nothing is
//!   sampled.
//! - Rows are produced by grid position, never keyed by the moderator
//!   value, so arbitrary grids (unsorted, negative, fractional) align.
//! - One random stream is advanced across grid values; with a seed the
//!   whole summary is deterministic.
//!
//! Performance
//! -----------
//! - O(|grid| · n · (k·k + J)) for `k` coefficients and `J` alternatives;
//!   the covariance factorization happens once per call.
use ndarray::Array1;
use rand::Rng;
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::{
    sampling::{options::rng_from_seed, plackett_luce::stagewise_probability_from_linear},
    simulation::{
        draws::DrawSource,
        errors::{SimulationError, SimulationResult},
        model::ChoiceModel,
        moderator::{ModeratorGrid, ModeratorValue},
        options::SimulationOptions,
        pattern::PermutationPattern,
    },
};

/// PatternProbability — summary at one moderator value.
///
/// Fields
/// ------
/// - `moderator`: the grid value.
/// - `mean`: mean pattern probability across draws.
/// - `low`, `high`: t-interval bounds at the configured level.
/// - `pattern`: pattern label (alternatives joined by the separator).
#[derive(Debug, Clone, PartialEq)]
pub struct PatternProbability {
    pub moderator: ModeratorValue,
    pub mean: f64,
    pub low: f64,
    pub high: f64,
    pub pattern: String,
}

/// SimulationSummary — one [`PatternProbability`] per grid value, in grid
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSummary {
    rows: Vec<PatternProbability>,
    n_draws: usize,
    confidence_level: f64,
}

impl SimulationSummary {
    pub fn rows(&self) -> &[PatternProbability] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PatternProbability> {
        self.rows.iter()
    }

    /// Draws used per grid value.
    pub fn n_draws(&self) -> usize {
        self.n_draws
    }

    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    /// Mean probabilities in grid order.
    pub fn means(&self) -> Array1<f64> {
        self.rows.iter().map(|row| row.mean).collect()
    }
}

impl<'a> IntoIterator for &'a SimulationSummary {
    type Item = &'a PatternProbability;
    type IntoIter = std::slice::Iter<'a, PatternProbability>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Column indices feeding one non-reference alternative's linear predictor.
#[derive(Debug, Clone, Copy, PartialEq)]
struct StageTerms {
    intercept: usize,
    slope: Option<(usize, f64)>,
}

/// simulate — pattern probabilities across a moderator grid.
///
/// Parameters
/// ----------
/// - `model`: fitted choice model.
/// - `pattern`: alternatives in the order being evaluated, best first; must
///   be a full permutation ending with the model's reference alternative.
/// - `random_var`: moderator variable; must appear in the model formula.
/// - `grid`: moderator values to trace.
/// - `source`: coefficient draw source.
/// - `options`: draw count, interval level, seed, label separator.
///
/// Errors
/// ------
/// - `RandomVarNotInFormula`; pattern errors from [`PermutationPattern::new`];
///   draw-source errors from [`DrawSource::prepare`]; `MissingCoefficient`
///   when an intercept or slope the pattern needs is absent;
///   `Distribution` if the t distribution cannot be built.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::{Array2, array};
/// # use rank_estimation::simulation::prelude::*;
/// let model = FittedChoiceModel::new(
///     vec!["car:(intercept)".into(), "car:income".into()],
///     array![0.2, 0.1],
///     Some(Array2::eye(2) * 0.01),
///     vec!["bus".into(), "car".into()],
///     "bus",
///     "mode ~ 1 | income",
/// )?;
/// let grid = ModeratorGrid::continuous(vec![0.0, 1.0, 2.0])?;
/// let summary = simulate(
///     &model,
///     &["car", "bus"],
///     "income",
///     &grid,
///     &DrawSource::ModelCovariance,
///     &SimulationOptions::default(),
/// )?;
/// assert_eq!(summary.len(), 3);
/// assert_eq!(summary.rows()[0].pattern, "car_bus");
/// # Ok::<(), SimulationError>(())
/// ```
pub fn simulate<M, S>(
    model: &M, pattern: &[S], random_var: &str, grid: &ModeratorGrid, source: &DrawSource,
    options: &SimulationOptions,
) -> SimulationResult<SimulationSummary>
where
    M: ChoiceModel + ?Sized,
    S: AsRef<str>,
{
    let mut rng = rng_from_seed(options.seed());
    simulate_with_rng(model, pattern, random_var, grid, source, options, &mut rng)
}

/// [`simulate`] on a caller-owned random stream; `options.seed()` is
/// ignored.
pub fn simulate_with_rng<M, S, R>(
    model: &M, pattern: &[S], random_var: &str, grid: &ModeratorGrid, source: &DrawSource,
    options: &SimulationOptions, rng: &mut R,
) -> SimulationResult<SimulationSummary>
where
    M: ChoiceModel + ?Sized,
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    // ---- Validate everything before drawing ----
    if !model.formula_mentions(random_var) {
        return Err(SimulationError::RandomVarNotInFormula {
            random_var: random_var.to_string(),
            formula: model.formula().to_string(),
        });
    }
    let pattern = PermutationPattern::new(
        pattern.iter().map(|name| name.as_ref().to_string()).collect(),
        model,
    )?;
    let sampler = source.prepare(model)?;
    let terms: Vec<Vec<StageTerms>> = (0..grid.len())
        .map(|index| resolve_terms(model, &pattern, random_var, grid, index))
        .collect::<SimulationResult<_>>()?;

    let n_draws = sampler.n_draws(options.n_draws());
    let level = options.confidence_level();
    let critical = t_critical(n_draws, level)?;
    let label = pattern.label(options.label_separator());

    tracing::debug!(
        pattern = %label,
        random_var,
        grid_len = grid.len(),
        n_draws,
        level,
        "simulating pattern probabilities"
    );

    // ---- Accumulate by grid position ----
    let mut rows = Vec::with_capacity(grid.len());
    let mut linear = vec![0.0; pattern.len()];
    for (moderator, stage_terms) in grid.values().into_iter().zip(&terms) {
        let draws = sampler.draw(n_draws, rng);
        let probabilities: Array1<f64> = draws
            .rows()
            .into_iter()
            .map(|beta| {
                for (eta, term) in linear.iter_mut().zip(stage_terms) {
                    *eta = beta[term.intercept]
                        + term.slope.map_or(0.0, |(index, x)| beta[index] * x);
                }
                // Reference alternative stays at η = 0 in the last slot.
                stagewise_probability_from_linear(&linear)
            })
            .collect();

        let (mean, low, high) = t_interval(&probabilities, critical);
        tracing::trace!(moderator = %moderator, mean, low, high, "grid value summarized");
        rows.push(PatternProbability { moderator, mean, low, high, pattern: label.clone() });
    }

    Ok(SimulationSummary { rows, n_draws, confidence_level: level })
}

/// Coefficient columns for each non-reference alternative at grid position
/// `index`.
fn resolve_terms<M: ChoiceModel + ?Sized>(
    model: &M, pattern: &PermutationPattern, random_var: &str, grid: &ModeratorGrid, index: usize,
) -> SimulationResult<Vec<StageTerms>> {
    let slope_term = grid.slope_term(random_var, index);
    pattern
        .non_reference()
        .iter()
        .map(|alternative| {
            let intercept = model.intercept_index(alternative).ok_or_else(|| {
                SimulationError::MissingCoefficient { name: format!("{alternative}:(intercept)") }
            })?;
            let slope = match &slope_term {
                Some((term, x)) => {
                    let column = model.slope_index(alternative, term).ok_or_else(|| {
                        SimulationError::MissingCoefficient { name: format!("{alternative}:{term}") }
                    })?;
                    Some((column, *x))
                }
                None => None,
            };
            Ok(StageTerms { intercept, slope })
        })
        .collect()
}

/// Two-sided t critical value `t_{(1+level)/2, n−1}`.
fn t_critical(n_draws: usize, level: f64) -> SimulationResult<f64> {
    let dist = StudentsT::new(0.0, 1.0, (n_draws - 1) as f64)?;
    Ok(dist.inverse_cdf((1.0 + level) / 2.0))
}

/// Mean and `mean ± critical · sd / √n` of `values` (sample sd, `n − 1`).
fn t_interval(values: &Array1<f64>, critical: f64) -> (f64, f64, f64) {
    let n = values.len() as f64;
    let mean = values.sum() / n;
    let sd = values.std(1.0);
    let half_width = critical * sd / n.sqrt();
    (mean, mean - half_width, mean + half_width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::model::FittedChoiceModel;
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The per-draw stage-wise probability against hand values using fixed
    //   draws (no sampling noise).
    // - Discrete moderators with a reference level.
    // - Interval arithmetic and option-driven draw counts.
    // - Validation failures raised before sampling.
    // -------------------------------------------------------------------------

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// Three alternatives (reference "bus") with a continuous "income" slope.
    fn travel_model() -> FittedChoiceModel {
        FittedChoiceModel::new(
            strings(&["car:(intercept)", "train:(intercept)", "car:income", "train:income"]),
            array![0.5, -0.3, 0.2, 0.1],
            Some(Array2::eye(4) * 0.04),
            strings(&["bus", "car", "train"]),
            "bus",
            "mode ~ 1 | income",
        )
        .expect("valid model")
    }

    fn hand_probability(eta_first: f64, eta_second: f64) -> f64 {
        let (u1, u2, u3) = (eta_first.exp(), eta_second.exp(), 1.0);
        u1 / (u1 + u2 + u3) * u2 / (u2 + u3)
    }

    #[test]
    // Purpose
    // -------
    // Verify per-grid means against hand-computed stage-wise products when
    // draws are fixed.
    //
    // Given
    // -----
    // - Two fixed draws, pattern car ≻ train ≻ bus, grid [0, 2, −1]
    //   (unsorted, negative).
    //
    // Expect
    // ------
    // - Each row's mean equals the average of the two hand probabilities
    //   at that grid value; rows follow grid order.
    fn fixed_draws_reproduce_hand_probabilities() {
        // Arrange
        let model = travel_model();
        let draws = array![[0.5, -0.3, 0.2, 0.1], [0.0, 0.4, -0.1, 0.3]];
        let grid = ModeratorGrid::continuous(vec![0.0, 2.0, -1.0]).expect("finite grid");

        // Act
        let summary = simulate(
            &model,
            &["car", "train", "bus"],
            "income",
            &grid,
            &DrawSource::Fixed(draws.clone()),
            &SimulationOptions::default(),
        )
        .expect("valid simulation");

        // Assert
        assert_eq!(summary.n_draws(), 2);
        for (row, v) in summary.iter().zip([0.0, 2.0, -1.0]) {
            let expected: f64 = draws
                .rows()
                .into_iter()
                .map(|b| hand_probability(b[0] + b[2] * v, b[1] + b[3] * v))
                .sum::<f64>()
                / 2.0;
            assert_eq!(row.moderator, ModeratorValue::Continuous(v));
            assert!((row.mean - expected).abs() < 1e-12, "{} vs {expected}", row.mean);
            assert_eq!(row.pattern, "car_train_bus");
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify discrete moderators: the first level uses intercepts only and
    // later levels add their level coefficient.
    //
    // Given
    // -----
    // - Coefficients for levels "mid" and "high" of "age"; a single fixed
    //   draw repeated twice (zero spread).
    //
    // Expect
    // ------
    // - Means equal the hand probabilities; low == mean == high.
    fn discrete_levels_use_reference_category() {
        // Arrange
        let model = FittedChoiceModel::new(
            strings(&["b:(Intercept)", "b:agemid", "b:agehigh"]),
            array![0.0, 1.0, -1.0],
            None,
            strings(&["a", "b"]),
            "a",
            "choice ~ 1 | age",
        )
        .expect("valid model");
        let draws = array![[0.3, 1.0, -1.0], [0.3, 1.0, -1.0]];
        let grid = ModeratorGrid::discrete(strings(&["low", "mid", "high"])).expect("levels");
        let logistic = |eta: f64| eta.exp() / (eta.exp() + 1.0);

        // Act
        let summary = simulate(
            &model,
            &["b", "a"],
            "age",
            &grid,
            &DrawSource::Fixed(draws),
            &SimulationOptions::default(),
        )
        .expect("valid simulation");

        // Assert
        let expected = [logistic(0.3), logistic(1.3), logistic(-0.7)];
        for (row, p) in summary.iter().zip(expected) {
            assert!((row.mean - p).abs() < 1e-12);
            assert!((row.low - row.mean).abs() < 1e-12 && (row.high - row.mean).abs() < 1e-12);
        }
        assert_eq!(summary.rows()[1].moderator, ModeratorValue::Level("mid".into()));
    }

    #[test]
    // Purpose
    // -------
    // Check the t interval arithmetic.
    //
    // Given
    // -----
    // - Values [1, 2, 3, 4] (mean 2.5, sd √(5/3)) and the df = 3 critical
    //   value at 95 %.
    //
    // Expect
    // ------
    // - Critical ≈ 3.182446; bounds 2.5 ∓ critical · sd / 2.
    fn t_interval_matches_hand_computation() {
        let critical = t_critical(4, 0.95).expect("df = 3");
        assert!((critical - 3.182446305).abs() < 1e-6);

        let (mean, low, high) = t_interval(&array![1.0, 2.0, 3.0, 4.0], critical);
        let half = critical * (5.0_f64 / 3.0).sqrt() / 2.0;
        assert!((mean - 2.5).abs() < 1e-12);
        assert!((low - (2.5 - half)).abs() < 1e-12);
        assert!((high - (2.5 + half)).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Ensure validation failures surface before any sampling.
    //
    // Given
    // -----
    // - A moderator absent from the formula, a pattern not ending in the
    //   reference, a discrete level with no coefficient.
    //
    // Expect
    // ------
    // - RandomVarNotInFormula, ReferenceNotLast, MissingCoefficient.
    fn simulate_rejects_invalid_inputs() {
        let model = travel_model();
        let grid = ModeratorGrid::continuous(vec![0.0]).expect("finite grid");
        let options = SimulationOptions::default();
        let source = DrawSource::ModelCovariance;

        assert!(matches!(
            simulate(&model, &["car", "train", "bus"], "age", &grid, &source, &options),
            Err(SimulationError::RandomVarNotInFormula { .. })
        ));
        assert!(matches!(
            simulate(&model, &["bus", "car", "train"], "income", &grid, &source, &options),
            Err(SimulationError::ReferenceNotLast { .. })
        ));

        let levels = ModeratorGrid::discrete(strings(&["low", "high"])).expect("levels");
        assert_eq!(
            simulate(&model, &["car", "train", "bus"], "income", &levels, &source, &options),
            Err(SimulationError::MissingCoefficient { name: "car:incomehigh".into() })
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify seeded determinism and bracketed means under normal draws.
    //
    // Given
    // -----
    // - The travel model, default options (1000 draws, seed 42), grid
    //   [0, 1, 5].
    //
    // Expect
    // ------
    // - Two runs are identical; low < mean < high on every row; every mean
    //   lies in (0, 1).
    fn seeded_normal_draws_are_deterministic_and_bracketed() {
        let model = travel_model();
        let grid = ModeratorGrid::continuous(vec![0.0, 1.0, 5.0]).expect("finite grid");
        let run = || {
            simulate(
                &model,
                &["train", "car", "bus"],
                "income",
                &grid,
                &DrawSource::ModelCovariance,
                &SimulationOptions::default(),
            )
            .expect("valid simulation")
        };

        let first = run();
        let second = run();

        assert_eq!(first, second);
        for row in &first {
            assert!(row.low < row.mean && row.mean < row.high);
            assert!(row.mean > 0.0 && row.mean < 1.0);
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure a strongly dominant alternative yields finite means and
    // intervals instead of overflowing.
    //
    // Given
    // -----
    // - Two alternatives with reference "a"; fixed draws with
    //   b:(intercept) = ±40 and slope ±0.5; grid [0, 80] so η_b reaches
    //   ±80.
    // - Pattern b ≻ a.
    //
    // Expect
    // ------
    // - With +40 both means are 1 to within 1e−12; with −40 they are below
    //   1e−17; every mean and bound is finite.
    fn dominant_alternative_keeps_summary_finite() {
        // Arrange
        let model = FittedChoiceModel::new(
            strings(&["b:(intercept)", "b:x"]),
            array![40.0, 0.5],
            None,
            strings(&["a", "b"]),
            "a",
            "choice ~ 1 | x",
        )
        .expect("valid model");
        let grid = ModeratorGrid::continuous(vec![0.0, 80.0]).expect("finite grid");
        let run = |intercept: f64, slope: f64| {
            let draws = array![[intercept, slope], [intercept, slope]];
            simulate(
                &model,
                &["b", "a"],
                "x",
                &grid,
                &DrawSource::Fixed(draws),
                &SimulationOptions::default(),
            )
            .expect("valid simulation")
        };

        // Act
        let favoured = run(40.0, 0.5);
        let disfavoured = run(-40.0, -0.5);

        // Assert
        for mean in favoured.means() {
            assert!((mean - 1.0).abs() < 1e-12, "got {mean}");
        }
        assert!(disfavoured.means().iter().all(|&mean| (0.0..1e-17).contains(&mean)));
        for row in favoured.iter().chain(disfavoured.iter()) {
            assert!(row.mean.is_finite() && row.low.is_finite() && row.high.is_finite(), "{row:?}");
        }
    }
}
