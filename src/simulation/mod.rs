//! simulation — permutation-choice probabilities from fitted choice models.
//!
//! Purpose
//! -------
//! Given a fitted multinomial-logit model, estimate how likely respondents
//! are to rank the alternatives in one particular order, and how that
//! probability moves along a grid of moderator values. Estimation
//! uncertainty is propagated by drawing coefficient vectors and summarizing
//! the resulting probabilities with a t interval.
//!
//! Key behaviors
//! -------------
//! - [`ChoiceModel`] / [`FittedChoiceModel`]: the model seam and its
//!   validated in-crate implementation.
//! - [`PermutationPattern`]: a full ordering of alternatives ending in the
//!   reference alternative.
//! - [`ModeratorGrid`]: continuous values or discrete levels.
//! - [`DrawSource`]: model covariance, caller-supplied normal, or fixed
//!   draws.
//! - [`simulate`] / [`simulate_with_rng`]: the per-grid summaries.
//!
//! Invariants & assumptions
//! ------------------------
//! - Validation happens before sampling. Patterns that do not end in the
//!   reference alternative are rejected rather than evaluated.
//! - The stage-wise probability is the same routine the Plackett–Luce
//!   sampler uses for its analytic ordering probability.
//!
//! Testing notes
//! -------------
//! - Unit tests sit beside each submodule; `tests/choice_simulation.rs`
//!   checks interval behavior as the draw count grows.

pub mod draws;
pub mod errors;
pub mod model;
pub mod moderator;
pub mod options;
pub mod pattern;
pub mod simulator;

pub use self::draws::{CoefficientSampler, DrawSource, EIGEN_EPS};
pub use self::errors::{SimulationError, SimulationResult};
pub use self::model::{ChoiceModel, FittedChoiceModel};
pub use self::moderator::{ModeratorGrid, ModeratorValue};
pub use self::options::SimulationOptions;
pub use self::pattern::PermutationPattern;
pub use self::simulator::{PatternProbability, SimulationSummary, simulate, simulate_with_rng};

pub mod prelude {
    pub use super::draws::DrawSource;
    pub use super::errors::{SimulationError, SimulationResult};
    pub use super::model::{ChoiceModel, FittedChoiceModel};
    pub use super::moderator::{ModeratorGrid, ModeratorValue};
    pub use super::options::SimulationOptions;
    pub use super::simulator::{SimulationSummary, simulate};
}
