//! correction — anchor-based bias correction of ranking distributions.
//!
//! Purpose
//! -------
//! Recover the distribution over full rankings held by attentive survey
//! respondents from data contaminated by a fraction of uniformly random
//! answers. The contamination rate is estimated from a paired anchor
//! question whose correct ranking is known.
//!
//! Key behaviors
//! -------------
//! - Validate the tabular survey input ([`SurveyResponses`]) and tally it
//!   against the full permutation space ([`ObservedCounts`]).
//! - Estimate the attentive share from anchor accuracy
//!   ([`AnchorStatistic`]).
//! - Invert the mixture `observed = p·true + (1 − p)·uniform`, clamp,
//!   renormalize, and derive inverse-probability weights
//!   ([`CorrectionOutcome`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are validated up front; precondition failures return
//!   [`CorrectionError`] before any computation.
//! - Degenerate anchors are a caller responsibility: they do not raise, and
//!   their outputs are coerced to finite values and flagged.
//!
//! Downstream usage
//! ----------------
//! ```rust
//! use rank_estimation::correction::prelude::*;
//!
//! let responses = SurveyResponses::from_keys(&["123", "213", "123", "321"], None)?
//!     .with_anchor(vec![true, true, false, true])?;
//! let outcome = CorrectionOutcome::correct_responses(&responses, &CorrectionOptions::default())?;
//! let weights = outcome.respondent_weights(&responses)?;
//! assert_eq!(weights.len(), 4);
//! # Ok::<(), CorrectionError>(())
//! ```
//!
//! Testing notes
//! -------------
//! - Unit tests in each submodule cover validation branches and the
//!   correction arithmetic; `tests/bias_correction.rs` checks the PMF and
//!   weight invariants end to end and over random inputs.

pub mod anchor;
pub mod corrector;
pub mod data;
pub mod errors;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::anchor::AnchorStatistic;
pub use self::corrector::{CorrectedPmf, CorrectionOptions, CorrectionOutcome, RankingTable};
pub use self::data::{ObservedCounts, SurveyResponses};
pub use self::errors::{CorrectionError, CorrectionResult};

pub mod prelude {
    pub use super::anchor::AnchorStatistic;
    pub use super::corrector::{CorrectionOptions, CorrectionOutcome};
    pub use super::data::SurveyResponses;
    pub use super::errors::{CorrectionError, CorrectionResult};
}
