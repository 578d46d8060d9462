//! permutations — typed rankings and the enumerable space of all rankings.
//!
//! Purpose
//! -------
//! Provide the combinatorial vocabulary shared by the rest of the crate: a
//! validated [`Ranking`] type with string-key adapters, and the exact
//! [`PermutationSpace`] of all `J!` rankings used as the join key space for
//! bias correction.
//!
//! Key behaviors
//! -------------
//! - Parse and render the fixed-width digit encoding used by survey data
//!   (one digit per item, `J` = key length) only at the boundary; internal
//!   code works with [`Ranking`] values.
//! - Enumerate rankings in lexicographic key order and look up their index
//!   by Lehmer code.
//! - Cache one immutable space per `J` behind [`PermutationSpace::cached`].
//!
//! Invariants & assumptions
//! ------------------------
//! - `1 <= J <= MAX_ITEMS` (9). Enumeration cost grows as `J!`; callers
//!   should keep `J` small (≤ 8 in practice).
//!
//! Downstream usage
//! ----------------
//! - `correction` joins observed counts against a [`PermutationSpace`].
//! - `sampling` returns [`Ranking`] values for sampled orderings.
//!
//! Testing notes
//! -------------
//! - Unit tests cover parsing, index lookup, and size guards; property tests
//!   in `tests/permutation_properties.rs` check size and distinctness for
//!   every `J ≤ 8`.

pub mod errors;
pub mod ranking;
pub mod space;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{RankingError, RankingResult};
pub use self::ranking::{MAX_ITEMS, Ranking};
pub use self::space::{PermutationSpace, factorial};

pub mod prelude {
    pub use super::errors::{RankingError, RankingResult};
    pub use super::ranking::Ranking;
    pub use super::space::PermutationSpace;
}
