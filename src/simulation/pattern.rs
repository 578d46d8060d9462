//! simulation::pattern — the ordering of alternatives being simulated.
//!
//! A [`PermutationPattern`] is a full ordering of a choice model's
//! alternatives, best first. It is validated against the model: every
//! alternative appears exactly once and the last entry is the model's
//! reference alternative, whose linear predictor is fixed at 0.
use std::collections::HashSet;

use crate::simulation::{
    errors::{SimulationError, SimulationResult},
    model::ChoiceModel,
};

/// PermutationPattern — a validated full ordering of alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutationPattern {
    alternatives: Vec<String>,
}

impl PermutationPattern {
    /// Validate `alternatives` (best first) against `model`.
    ///
    /// Errors
    /// ------
    /// - `SimulationError::PatternLength` when the pattern does not have one
    ///   entry per alternative.
    /// - `SimulationError::UnknownAlternative` / `DuplicatePatternEntry`
    ///   for entries that are not a permutation of the alternatives.
    /// - `SimulationError::ReferenceNotLast` when the last entry is not the
    ///   model's reference alternative.
    pub fn new<M: ChoiceModel + ?Sized>(
        alternatives: Vec<String>, model: &M,
    ) -> SimulationResult<PermutationPattern> {
        let expected = model.alternatives().len();
        if alternatives.len() != expected {
            return Err(SimulationError::PatternLength { expected, actual: alternatives.len() });
        }
        let mut seen = HashSet::with_capacity(expected);
        for name in &alternatives {
            if !model.alternatives().contains(name) {
                return Err(SimulationError::UnknownAlternative { name: name.clone() });
            }
            if !seen.insert(name.as_str()) {
                return Err(SimulationError::DuplicatePatternEntry { name: name.clone() });
            }
        }
        match alternatives.last() {
            Some(last) if last == model.reference() => Ok(PermutationPattern { alternatives }),
            Some(last) => Err(SimulationError::ReferenceNotLast {
                reference: model.reference().to_string(),
                last: last.clone(),
            }),
            // Unreachable for validated models (at least two alternatives).
            None => Err(SimulationError::PatternLength { expected, actual: 0 }),
        }
    }

    /// Alternatives in pattern order.
    pub fn alternatives(&self) -> &[String] {
        &self.alternatives
    }

    /// Number of stages (alternatives).
    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// Alternatives before the reference, in pattern order.
    pub fn non_reference(&self) -> &[String] {
        &self.alternatives[..self.alternatives.len().saturating_sub(1)]
    }

    /// Label identifying the pattern: alternatives joined by `separator`.
    pub fn label(&self, separator: &str) -> String {
        self.alternatives.join(separator)
    }
}
