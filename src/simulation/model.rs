//! simulation::model — fitted discrete-choice models consumed by the simulator.
//!
//! Purpose
//! -------
//! Define the seam between the simulator and whatever produced the fitted
//! multinomial-logit model. The simulator only needs named coefficients,
//! their sampling covariance, the alternatives with their reference level,
//! and the formula text.
//!
//! Key behaviors
//! -------------
//! - [`ChoiceModel`] is the trait external model types implement.
//! - [`FittedChoiceModel`] is the in-crate implementation; its constructor
//!   validates every structural requirement up front.
//!
//! Conventions
//! -----------
//! - Coefficients are named `"<alternative>:(intercept)"` (matched without
//!   regard to ASCII case) and `"<alternative>:<variable>"`. A discrete
//!   level `L` of `variable` uses `"<alternative>:<variable><L>"`.
//! - The reference alternative has no coefficients; its linear predictor is
//!   fixed at 0.
//! - Formula membership is decided on identifier tokens, so `"age"` does not
//!   match a formula that only mentions `"agegroup"`.
use std::collections::{HashMap, HashSet};

use ndarray::{Array1, Array2};

use crate::simulation::errors::{SimulationError, SimulationResult};

const INTERCEPT: &str = "(intercept)";

/// ChoiceModel — read access to a fitted multinomial-logit model.
///
/// Required methods expose the raw pieces; provided methods implement the
/// coefficient-naming and formula conventions on top of them.
pub trait ChoiceModel {
    /// Coefficient names, aligned with [`ChoiceModel::estimates`].
    fn coefficient_names(&self) -> &[String];

    /// Point estimates.
    fn estimates(&self) -> &Array1<f64>;

    /// Sampling covariance of the estimates, when available.
    fn covariance(&self) -> Option<&Array2<f64>>;

    /// Alternative names, as they appear in the choice-frequency table.
    fn alternatives(&self) -> &[String];

    /// Base (reference) alternative.
    fn reference(&self) -> &str;

    /// Model formula text.
    fn formula(&self) -> &str;

    /// Position of the coefficient called `name`.
    fn coefficient_index(&self, name: &str) -> Option<usize> {
        self.coefficient_names().iter().position(|candidate| candidate == name)
    }

    /// Position of the intercept of `alternative`.
    fn intercept_index(&self, alternative: &str) -> Option<usize> {
        self.coefficient_names().iter().position(|name| {
            name.strip_prefix(alternative)
                .and_then(|rest| rest.strip_prefix(':'))
                .is_some_and(|term| term.eq_ignore_ascii_case(INTERCEPT))
        })
    }

    /// Position of the coefficient of `term` for `alternative`.
    fn slope_index(&self, alternative: &str, term: &str) -> Option<usize> {
        self.coefficient_index(&format!("{alternative}:{term}"))
    }

    /// Whether `variable` appears as an identifier in the formula.
    fn formula_mentions(&self, variable: &str) -> bool {
        formula_tokens(self.formula()).any(|token| token == variable)
    }
}

/// FittedChoiceModel — a validated multinomial-logit fit.
///
/// Fields
/// ------
/// - `names`, `estimates`: aligned coefficient names and values.
/// - `covariance`: optional `k × k` sampling covariance.
/// - `alternatives`, `reference`: distinct alternative names and the base.
/// - `formula`: formula text.
/// - `lookup`: name → index map backing [`ChoiceModel::coefficient_index`].
#[derive(Debug, Clone, PartialEq)]
pub struct FittedChoiceModel {
    names: Vec<String>,
    estimates: Array1<f64>,
    covariance: Option<Array2<f64>>,
    alternatives: Vec<String>,
    reference: String,
    formula: String,
    lookup: HashMap<String, usize>,
}

impl FittedChoiceModel {
    /// Validate and assemble a fitted model.
    ///
    /// Parameters
    /// ----------
    /// - `names`: `Vec<String>`: coefficient names (distinct, non-empty).
    /// - `estimates`: `Array1<f64>`: finite, one per name.
    /// - `covariance`: `Option<Array2<f64>>`: finite, `k × k`.
    /// - `alternatives`: `Vec<String>`: at least two, distinct.
    /// - `reference`: `&str`: one of `alternatives`.
    /// - `formula`: `&str`: model formula text.
    ///
    /// Errors
    /// ------
    /// - `EmptyCoefficients`, `CoefficientLengthMismatch`,
    ///   `DuplicateCoefficient`, `NonFiniteEstimate`.
    /// - `CovarianceShape`, `NonFiniteCovariance`.
    /// - `TooFewAlternatives`, `DuplicateAlternative`, `UnknownReference`.
    ///
    /// Notes
    /// -----
    /// - Positive semi-definiteness of the covariance is checked when draws
    ///   are prepared, where the eigendecomposition is computed anyway.
    pub fn new(
        names: Vec<String>, estimates: Array1<f64>, covariance: Option<Array2<f64>>,
        alternatives: Vec<String>, reference: &str, formula: &str,
    ) -> SimulationResult<FittedChoiceModel> {
        if names.is_empty() {
            return Err(SimulationError::EmptyCoefficients);
        }
        if names.len() != estimates.len() {
            return Err(SimulationError::CoefficientLengthMismatch {
                names: names.len(),
                estimates: estimates.len(),
            });
        }
        let mut lookup = HashMap::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            if lookup.insert(name.clone(), index).is_some() {
                return Err(SimulationError::DuplicateCoefficient { name: name.clone() });
            }
            let value = estimates[index];
            if !value.is_finite() {
                return Err(SimulationError::NonFiniteEstimate { name: name.clone(), value });
            }
        }
        if let Some(cov) = &covariance {
            validate_covariance(cov, names.len())?;
        }

        if alternatives.len() < 2 {
            return Err(SimulationError::TooFewAlternatives { count: alternatives.len() });
        }
        let mut seen = HashSet::with_capacity(alternatives.len());
        for alternative in &alternatives {
            if !seen.insert(alternative.as_str()) {
                return Err(SimulationError::DuplicateAlternative { name: alternative.clone() });
            }
        }
        if !seen.contains(reference) {
            return Err(SimulationError::UnknownReference { reference: reference.to_string() });
        }

        Ok(FittedChoiceModel {
            names,
            estimates,
            covariance,
            alternatives,
            reference: reference.to_string(),
            formula: formula.to_string(),
            lookup,
        })
    }
}

impl ChoiceModel for FittedChoiceModel {
    fn coefficient_names(&self) -> &[String] {
        &self.names
    }

    fn estimates(&self) -> &Array1<f64> {
        &self.estimates
    }

    fn covariance(&self) -> Option<&Array2<f64>> {
        self.covariance.as_ref()
    }

    fn alternatives(&self) -> &[String] {
        &self.alternatives
    }

    fn reference(&self) -> &str {
        &self.reference
    }

    fn formula(&self) -> &str {
        &self.formula
    }

    fn coefficient_index(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }
}

/// Check that `cov` is a finite `k × k` matrix.
pub(crate) fn validate_covariance(cov: &Array2<f64>, k: usize) -> SimulationResult<()> {
    let (rows, cols) = cov.dim();
    if rows != k || cols != k {
        return Err(SimulationError::CovarianceShape { expected: k, rows, cols });
    }
    if cov.iter().any(|value| !value.is_finite()) {
        return Err(SimulationError::NonFiniteCovariance);
    }
    Ok(())
}

/// Identifier tokens of a formula: maximal runs of alphanumerics, `_` and
/// `.`.
fn formula_tokens(formula: &str) -> impl Iterator<Item = &str> {
    formula
        .split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
        .filter(|token| !token.is_empty())
}
