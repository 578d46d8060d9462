//! simulation::options — configuration for the permutation-choice simulator.
//!
//! Purpose
//! -------
//! Collect the simulation knobs (draw count, interval level, seed, label
//! separator) in one validated struct so call sites pass explicit options
//! instead of ad-hoc arguments.
//!
//! Invariants & assumptions
//! ------------------------
//! - `n_draws >= 2`, so the t interval has at least one degree of freedom.
//! - `0 < confidence_level < 1`.
//! - `label_separator` is non-empty.
//! - When a caller-supplied draw matrix is used its row count replaces
//!   `n_draws`.
use crate::simulation::errors::{SimulationError, SimulationResult};

/// SimulationOptions — validated simulator configuration.
///
/// Fields
/// ------
/// - `n_draws`: `usize`: coefficient draws per moderator value.
/// - `confidence_level`: `f64`: two-sided t-interval level.
/// - `seed`: `Option<u64>`: `Some` for a reproducible stream shared across
///   all grid values, `None` for OS entropy.
/// - `label_separator`: `String`: joins alternatives in the pattern label.
///
/// Notes
/// -----
/// - Defaults: 1000 draws, level 0.95, seed `Some(42)`, separator `"_"`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOptions {
    n_draws: usize,
    confidence_level: f64,
    seed: Option<u64>,
    label_separator: String,
}

impl SimulationOptions {
    /// Build validated options.
    ///
    /// Errors
    /// ------
    /// - `SimulationError::InvalidDrawCount` when `n_draws < 2`.
    /// - `SimulationError::InvalidConfidenceLevel` unless `0 < level < 1`
    ///   (NaN included).
    /// - `SimulationError::EmptySeparator` for an empty separator.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rank_estimation::simulation::SimulationOptions;
    /// let opts = SimulationOptions::new(500, 0.9, Some(7), "-").unwrap();
    /// assert_eq!(opts.n_draws(), 500);
    /// assert!(SimulationOptions::new(1, 0.9, None, "_").is_err());
    /// ```
    pub fn new(
        n_draws: usize, confidence_level: f64, seed: Option<u64>, label_separator: &str,
    ) -> SimulationResult<SimulationOptions> {
        if n_draws < 2 {
            return Err(SimulationError::InvalidDrawCount { n_draws });
        }
        if !(confidence_level > 0.0 && confidence_level < 1.0) {
            return Err(SimulationError::InvalidConfidenceLevel { level: confidence_level });
        }
        if label_separator.is_empty() {
            return Err(SimulationError::EmptySeparator);
        }
        Ok(SimulationOptions {
            n_draws,
            confidence_level,
            seed,
            label_separator: label_separator.to_string(),
        })
    }

    pub fn n_draws(&self) -> usize {
        self.n_draws
    }

    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn label_separator(&self) -> &str {
        &self.label_separator
    }
}

impl Default for SimulationOptions {
    fn default() -> Self {
        SimulationOptions {
            n_draws: 1000,
            confidence_level: 0.95,
            seed: Some(42),
            label_separator: "_".to_string(),
        }
    }
}
