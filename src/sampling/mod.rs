//! sampling — synthetic rankings from a Plackett–Luce model.
//!
//! Purpose
//! -------
//! Generate full rankings with known item preferences, for exercising the
//! correction and simulation code on data whose true distribution is known.
//!
//! Key behaviors
//! -------------
//! - [`PlackettLuce`] validates item weights γ (and optional labels) and
//!   draws `n × t` rankings by sequential weighted choice without
//!   replacement.
//! - [`stagewise_probability`] and [`stagewise_probability_from_linear`]
//!   give the analytic probability of a full ordering; the simulator uses the
//!   same routine for its pattern probabilities.
//! - [`SamplerOptions`] carries the seed; every call can also take a
//!   caller-owned generator.
//!
//! Testing notes
//! -------------
//! - Unit tests live beside the sampler; `tests/plackett_luce_sampling.rs`
//!   checks empirical frequencies against the analytic probabilities.

pub mod errors;
pub mod options;
pub mod plackett_luce;

pub use self::errors::{SamplingError, SamplingResult};
pub use self::options::{SamplerOptions, rng_from_seed};
pub use self::plackett_luce::{
    PlackettLuce, SampledRankings, stagewise_probability, stagewise_probability_from_linear,
};

pub mod prelude {
    pub use super::errors::{SamplingError, SamplingResult};
    pub use super::options::SamplerOptions;
    pub use super::plackett_luce::{PlackettLuce, SampledRankings};
}
