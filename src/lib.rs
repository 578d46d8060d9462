//! rank_estimation — bias-corrected ranking distributions, Plackett–Luce
//! sampling, and permutation-choice simulation, with optional Python
//! bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and, with the `python-bindings`
//! feature, as the PyO3 bridge that exposes the core routines through the
//! `_rank_estimation` extension module.
//!
//! Key behaviors
//! -------------
//! - [`permutations`]: typed rankings over `J ≤ 9` items and the full
//!   permutation space in lexicographic key order.
//! - [`correction`]: anchor-based correction of survey ranking distributions
//!   for random responding, with inverse-probability weights.
//! - [`sampling`]: Plackett–Luce ranking draws and analytic ordering
//!   probabilities.
//! - [`simulation`]: probability of a full ordering of alternatives across a
//!   moderator grid, from a fitted multinomial-logit model.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; the PyO3 items in this
//!   file only convert inputs, dispatch, and map errors.
//! - Randomness is always an explicit stream (seed or caller-owned
//!   generator); nothing touches process-global random state.
//!
//! Conventions
//! -----------
//! - Python classes live under `_rank_estimation.<submodule>` and are
//!   registered in `sys.modules` for dotted imports.
//! - Errors are rich Rust enums internally and become `ValueError` at the
//!   Python boundary.
//!
//! Testing notes
//! -------------
//! - Unit tests sit beside each module; integration and property tests in
//!   `tests/` exercise the three pipelines end to end.

pub mod correction;
pub mod permutations;
pub mod sampling;
pub mod simulation;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    correction::{CorrectionOptions, CorrectionOutcome, RankingTable, SurveyResponses},
    sampling::{PlackettLuce, SamplerOptions},
    simulation::{
        DrawSource, FittedChoiceModel, ModeratorGrid, ModeratorValue, SimulationOptions,
        SimulationSummary, simulate,
    },
    utils::{extract_f64_matrix, extract_f64_vector},
};

/// BiasCorrection — Python-facing wrapper for the anchor-based correction.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `BiasCorrection(rankings, anchor_correct, weights=None, n_items=None)`:
/// - `rankings`: `list[str]`: fixed-width digit keys such as `"213"`.
/// - `anchor_correct`: `list[bool]`: anchor correctness per respondent.
/// - `weights`: optional array-like of survey weights.
/// - `n_items`: optional explicit `J`; otherwise inferred from key length.
///
/// Notes
/// -----
/// - PMF getters return values in lexicographic key order, aligned with
///   `keys`.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rank_estimation.correction")]
pub struct BiasCorrection {
    responses: SurveyResponses,
    inner: CorrectionOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl BiasCorrection {
    #[new]
    #[pyo3(
        signature = (rankings, anchor_correct, weights = None, n_items = None),
        text_signature = "(rankings, anchor_correct, /, weights=None, n_items=None)"
    )]
    pub fn new<'py>(
        rankings: Vec<String>, anchor_correct: Vec<bool>,
        weights: Option<&Bound<'py, PyAny>>, n_items: Option<usize>,
    ) -> PyResult<BiasCorrection> {
        let weights = weights.map(extract_f64_vector).transpose()?;
        let responses = SurveyResponses::from_keys(&rankings, weights)?.with_anchor(anchor_correct)?;
        let inner = CorrectionOutcome::correct_responses(&responses, &CorrectionOptions::new(n_items))?;
        Ok(BiasCorrection { responses, inner })
    }

    #[getter]
    pub fn n_items(&self) -> usize {
        self.inner.n_items()
    }

    #[getter]
    pub fn anchor_accuracy(&self) -> f64 {
        self.inner.anchor().accuracy()
    }

    #[getter]
    pub fn p_non_random(&self) -> f64 {
        self.inner.p_non_random()
    }

    #[getter]
    pub fn est_p_random(&self) -> f64 {
        self.inner.est_p_random()
    }

    #[getter]
    pub fn degenerate(&self) -> bool {
        self.inner.is_degenerate()
    }

    /// Ranking keys in table order.
    #[getter]
    pub fn keys(&self) -> Vec<String> {
        self.inner.raw_pmf().space().iter().map(|ranking| ranking.key()).collect()
    }

    #[getter]
    pub fn raw_pmf(&self) -> Vec<f64> {
        table_values(self.inner.raw_pmf())
    }

    #[getter]
    pub fn prop(&self) -> Vec<f64> {
        table_values(&self.inner.corrected_pmf().prop)
    }

    #[getter]
    pub fn prop_adj(&self) -> Vec<f64> {
        table_values(&self.inner.corrected_pmf().prop_adj)
    }

    #[getter]
    pub fn prop_renormalized(&self) -> Vec<f64> {
        table_values(&self.inner.corrected_pmf().prop_renormalized)
    }

    #[getter]
    pub fn importance_weights(&self) -> Vec<f64> {
        table_values(self.inner.importance_weights())
    }

    /// Importance weight of each respondent's ranking, in input order.
    pub fn respondent_weights(&self) -> PyResult<Vec<f64>> {
        Ok(self.inner.respondent_weights(&self.responses)?.to_vec())
    }
}

#[cfg(feature = "python-bindings")]
fn table_values(table: &RankingTable) -> Vec<f64> {
    table.values().to_vec()
}

/// PlackettLuceSampler — Python-facing wrapper for [`PlackettLuce`].
///
/// Constructed via `PlackettLuceSampler(weights, labels=None)`; `sample`
/// returns one list per draw holding 1-based item indices (or labels with
/// `labelled=True`) by position.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rank_estimation.sampling")]
pub struct PlackettLuceSampler {
    inner: PlackettLuce,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PlackettLuceSampler {
    #[new]
    #[pyo3(signature = (weights, labels = None), text_signature = "(weights, /, labels=None)")]
    pub fn new<'py>(
        weights: &Bound<'py, PyAny>, labels: Option<Vec<String>>,
    ) -> PyResult<PlackettLuceSampler> {
        let mut inner = PlackettLuce::new(extract_f64_vector(weights)?)?;
        if let Some(labels) = labels {
            inner = inner.with_labels(labels)?;
        }
        Ok(PlackettLuceSampler { inner })
    }

    #[getter]
    pub fn n_items(&self) -> usize {
        self.inner.n_items()
    }

    #[pyo3(signature = (n_draws, seed = Some(42)))]
    pub fn sample(&self, n_draws: usize, seed: Option<u64>) -> PyResult<Vec<Vec<usize>>> {
        let sampled = self.inner.sample(n_draws, &SamplerOptions::new(seed))?;
        Ok(sampled.draws().rows().into_iter().map(|row| row.to_vec()).collect())
    }

    #[pyo3(signature = (n_draws, seed = Some(42)))]
    pub fn sample_labelled(&self, n_draws: usize, seed: Option<u64>) -> PyResult<Vec<Vec<String>>> {
        Ok(self.inner.sample(n_draws, &SamplerOptions::new(seed))?.labelled())
    }

    /// Probability of the full ordering `order` (1-based items, best first).
    pub fn ranking_probability(&self, order: Vec<usize>) -> PyResult<f64> {
        Ok(self.inner.ranking_probability(&order)?)
    }
}

/// ChoiceSimulation — Python-facing wrapper for a fitted choice model and
/// [`simulate`].
///
/// Parameters
/// ----------
/// Constructed via `ChoiceSimulation(coefficient_names, estimates,
/// covariance, alternatives, reference, formula)`; `covariance` may be
/// `None` when draws are always supplied to `simulate`.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rank_estimation.simulation")]
pub struct ChoiceSimulation {
    model: FittedChoiceModel,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl ChoiceSimulation {
    #[new]
    #[pyo3(
        signature = (coefficient_names, estimates, covariance, alternatives, reference, formula),
        text_signature = "(coefficient_names, estimates, covariance, alternatives, reference, formula)"
    )]
    pub fn new<'py>(
        coefficient_names: Vec<String>, estimates: &Bound<'py, PyAny>,
        covariance: Option<&Bound<'py, PyAny>>, alternatives: Vec<String>, reference: &str,
        formula: &str,
    ) -> PyResult<ChoiceSimulation> {
        let estimates = extract_f64_vector(estimates)?;
        let covariance = covariance.map(extract_f64_matrix).transpose()?;
        let model = FittedChoiceModel::new(
            coefficient_names,
            estimates,
            covariance,
            alternatives,
            reference,
            formula,
        )?;
        Ok(ChoiceSimulation { model })
    }

    /// Trace the probability of `pattern` across `moderator`.
    ///
    /// `moderator` is a list of floats (continuous) or of strings (discrete
    /// levels, first level is the reference). `draws`, when given, is a
    /// `rows × k` coefficient matrix used instead of normal draws.
    #[pyo3(
        signature = (
            pattern,
            random_var,
            moderator,
            n_draws = 1000,
            confidence_level = 0.95,
            seed = Some(42),
            separator = "_",
            draws = None,
        )
    )]
    pub fn simulate<'py>(
        &self, pattern: Vec<String>, random_var: &str, moderator: &Bound<'py, PyAny>,
        n_draws: usize, confidence_level: f64, seed: Option<u64>, separator: &str,
        draws: Option<&Bound<'py, PyAny>>,
    ) -> PyResult<ChoiceSimulationResult> {
        let grid = if let Ok(values) = moderator.extract::<Vec<f64>>() {
            ModeratorGrid::continuous(values)?
        } else if let Ok(levels) = moderator.extract::<Vec<String>>() {
            ModeratorGrid::discrete(levels)?
        } else {
            return Err(PyValueError::new_err(
                "moderator must be a sequence of floats or a sequence of level names",
            ));
        };
        let source = match draws {
            Some(raw) => DrawSource::Fixed(extract_f64_matrix(raw)?),
            None => DrawSource::ModelCovariance,
        };
        let options = SimulationOptions::new(n_draws, confidence_level, seed, separator)?;
        let inner = simulate(&self.model, &pattern, random_var, &grid, &source, &options)?;
        Ok(ChoiceSimulationResult { inner })
    }
}

/// ChoiceSimulationResult — column view of a [`SimulationSummary`].
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rank_estimation.simulation")]
pub struct ChoiceSimulationResult {
    inner: SimulationSummary,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl ChoiceSimulationResult {
    /// Moderator values rendered as text (numbers or level names).
    #[getter]
    pub fn moderator(&self) -> Vec<String> {
        self.inner.iter().map(|row| row.moderator.to_string()).collect()
    }

    /// Numeric moderator values, or `None` for a discrete grid.
    #[getter]
    pub fn moderator_values(&self) -> Option<Vec<f64>> {
        self.inner
            .iter()
            .map(|row| match row.moderator {
                ModeratorValue::Continuous(value) => Some(value),
                ModeratorValue::Level(_) => None,
            })
            .collect()
    }

    #[getter]
    pub fn mean(&self) -> Vec<f64> {
        self.inner.iter().map(|row| row.mean).collect()
    }

    #[getter]
    pub fn low(&self) -> Vec<f64> {
        self.inner.iter().map(|row| row.low).collect()
    }

    #[getter]
    pub fn high(&self) -> Vec<f64> {
        self.inner.iter().map(|row| row.high).collect()
    }

    #[getter]
    pub fn pattern(&self) -> Option<String> {
        self.inner.rows().first().map(|row| row.pattern.clone())
    }

    #[getter]
    pub fn n_draws(&self) -> usize {
        self.inner.n_draws()
    }
}

/// _rank_estimation — PyO3 module initializer.
///
/// Creates the `correction`, `sampling`, and `simulation` submodules,
/// attaches them to the parent module, and registers them in
/// `sys.modules` so dotted imports work.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rank_estimation<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let correction_mod = PyModule::new(_py, "correction")?;
    let sampling_mod = PyModule::new(_py, "sampling")?;
    let simulation_mod = PyModule::new(_py, "simulation")?;
    correction_module(m, &correction_mod)?;
    sampling_module(m, &sampling_mod)?;
    simulation_module(m, &simulation_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    let modules = _py.import("sys")?.getattr("modules")?;
    modules.set_item("rank_estimation.correction", correction_mod)?;
    modules.set_item("rank_estimation.sampling", sampling_mod)?;
    modules.set_item("rank_estimation.simulation", simulation_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn correction_module<'py>(parent: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<BiasCorrection>()?;
    parent.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn sampling_module<'py>(parent: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<PlackettLuceSampler>()?;
    parent.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn simulation_module<'py>(parent: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<ChoiceSimulation>()?;
    m.add_class::<ChoiceSimulationResult>()?;
    parent.add_submodule(m)?;
    Ok(())
}
