//! sampling::options — random-stream configuration for sampling routines.
//!
//! Purpose
//! -------
//! Make randomness explicit. Every sampling entry point either takes a
//! caller-owned generator (`*_with_rng`) or builds one from a
//! [`SamplerOptions`] seed, so no routine touches process-global random
//! state and seeded runs are reproducible.
//!
//! Conventions
//! -----------
//! - The crate's stream type is [`ChaCha8Rng`]: portable and reproducible
//!   across platforms for a given seed.
//! - `seed: None` seeds from operating-system entropy.
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// SamplerOptions — seeding for Plackett–Luce draws.
///
/// Fields
/// ------
/// - `seed`: `Option<u64>`
///   `Some(seed)` gives a reproducible stream shared by all draws of one
///   call (the stream advances across draws; it is not re-seeded per
///   draw). `None` seeds from system entropy.
///
/// Notes
/// -----
/// - The default is `seed = Some(42)`, favouring reproducible experiments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerOptions {
    pub seed: Option<u64>,
}

impl SamplerOptions {
    pub fn new(seed: Option<u64>) -> SamplerOptions {
        SamplerOptions { seed }
    }
}

impl Default for SamplerOptions {
    fn default() -> Self {
        SamplerOptions { seed: Some(42) }
    }
}

/// Build the crate's random stream from an optional seed.
pub fn rng_from_seed(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}
