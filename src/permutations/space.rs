//! permutations::space — exact enumeration of all J! rankings.
//!
//! Purpose
//! -------
//! Enumerate every full ranking of `J` items in lexicographic key order and
//! provide O(J²) index lookup, so that observed survey data can be joined
//! against the complete outcome space without hashing.
//!
//! Key behaviors
//! -------------
//! - [`PermutationSpace::new`] generates all `J!` rankings by repeated
//!   next-permutation steps starting from the identity, which yields them
//!   already sorted by key.
//! - [`PermutationSpace::index_of`] computes the lexicographic rank of a
//!   ranking from its Lehmer code; it is the position of that ranking in
//!   [`PermutationSpace::rankings`].
//! - [`PermutationSpace::cached`] returns a shared, immutable space per `J`,
//!   built at most once per process.
//!
//! Invariants & assumptions
//! ------------------------
//! - `1 <= J <= MAX_ITEMS`. The space has `J!` elements (362 880 for
//!   `J = 9`); exact enumeration is a factorial-cost operation and callers
//!   are expected to keep `J` small. This is a scaling boundary of the
//!   method, not a defect.
//! - Rankings are distinct and strictly increasing in key order.
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

use crate::permutations::{
    errors::{RankingError, RankingResult},
    ranking::{MAX_ITEMS, Ranking},
};

static SPACE_CACHE: OnceLock<Mutex<HashMap<usize, Arc<PermutationSpace>>>> = OnceLock::new();

/// PermutationSpace — all rankings of `n_items` items in key order.
///
/// Fields
/// ------
/// - `n_items`: `usize`
///   Number of items `J`.
/// - `rankings`: `Vec<Ranking>`
///   All `J!` rankings, sorted lexicographically by key.
///
/// Invariants
/// ----------
/// - `rankings.len() == factorial(n_items)`.
/// - `index_of(&rankings[i]) == Some(i)` for every `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct PermutationSpace {
    n_items: usize,
    rankings: Vec<Ranking>,
}

impl PermutationSpace {
    /// Enumerate all rankings of `n_items` items.
    ///
    /// Errors
    /// ------
    /// - `RankingError::EmptyRanking` when `n_items == 0`.
    /// - `RankingError::TooManyItems` when `n_items > MAX_ITEMS`.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rank_estimation::permutations::space::PermutationSpace;
    /// let space = PermutationSpace::new(3).unwrap();
    /// let keys: Vec<String> = space.iter().map(|r| r.key()).collect();
    /// assert_eq!(keys, ["123", "132", "213", "231", "312", "321"]);
    /// ```
    pub fn new(n_items: usize) -> RankingResult<Self> {
        if n_items == 0 {
            return Err(RankingError::EmptyRanking);
        }
        if n_items > MAX_ITEMS {
            return Err(RankingError::TooManyItems { n_items, max: MAX_ITEMS });
        }

        let mut current: Vec<usize> = (1..=n_items).collect();
        let mut rankings = Vec::with_capacity(factorial(n_items));
        loop {
            rankings.push(Ranking::from_positions(&current)?);
            if !next_permutation(&mut current) {
                break;
            }
        }
        tracing::debug!(n_items, size = rankings.len(), "enumerated permutation space");

        Ok(PermutationSpace { n_items, rankings })
    }

    /// Shared space for `n_items`, enumerated on first request.
    ///
    /// Notes
    /// -----
    /// - The cache is process-wide and guarded by a mutex; enumeration runs
    ///   while the lock is held so each `J` is built exactly once.
    pub fn cached(n_items: usize) -> RankingResult<Arc<Self>> {
        let cache = SPACE_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
        let mut guard = cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(space) = guard.get(&n_items) {
            return Ok(Arc::clone(space));
        }
        let space = Arc::new(PermutationSpace::new(n_items)?);
        guard.insert(n_items, Arc::clone(&space));
        Ok(space)
    }

    /// Number of items `J`.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of rankings, `J!`.
    pub fn len(&self) -> usize {
        self.rankings.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.rankings.is_empty()
    }

    /// All rankings in key order.
    pub fn rankings(&self) -> &[Ranking] {
        &self.rankings
    }

    /// Iterate rankings in key order.
    pub fn iter(&self) -> std::slice::Iter<'_, Ranking> {
        self.rankings.iter()
    }

    /// Ranking at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&Ranking> {
        self.rankings.get(index)
    }

    /// Lexicographic index of `ranking`, or `None` when its item count
    /// differs from this space.
    ///
    /// Notes
    /// -----
    /// - Computed from the Lehmer code:
    ///   `Σᵢ #{j > i : pⱼ < pᵢ} · (J − 1 − i)!`, O(J²) with no allocation.
    pub fn index_of(&self, ranking: &Ranking) -> Option<usize> {
        if ranking.n_items() != self.n_items {
            return None;
        }
        let positions = ranking.positions();
        let mut index = 0;
        for i in 0..self.n_items {
            let smaller_after = positions[i + 1..].iter().filter(|&&p| p < positions[i]).count();
            index += smaller_after * factorial(self.n_items - 1 - i);
        }
        Some(index)
    }
}

impl<'a> IntoIterator for &'a PermutationSpace {
    type Item = &'a Ranking;
    type IntoIter = std::slice::Iter<'a, Ranking>;

    fn into_iter(self) -> Self::IntoIter {
        self.rankings.iter()
    }
}

/// `n!` for the small `n` used by permutation spaces.
pub fn factorial(n: usize) -> usize {
    (1..=n).product()
}

/// Advance `values` to the next permutation in lexicographic order.
/// Returns `false` (leaving `values` untouched) at the last permutation.
fn next_permutation(values: &mut [usize]) -> bool {
    let n = values.len();
    if n < 2 {
        return false;
    }
    let mut pivot = n - 1;
    while pivot > 0 && values[pivot - 1] >= values[pivot] {
        pivot -= 1;
    }
    if pivot == 0 {
        return false;
    }
    let mut successor = n - 1;
    while values[successor] <= values[pivot - 1] {
        successor -= 1;
    }
    values.swap(pivot - 1, successor);
    values[pivot..].reverse();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Exact size, distinctness, and key ordering of enumerated spaces.
    // - Agreement between `index_of` and enumeration order.
    // - Size guards (J = 0, J > MAX_ITEMS) and the shared cache.
    //
    // Randomized checks over J are in `tests/permutation_properties.rs`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the J = 4 space has 24 distinct, key-sorted rankings.
    //
    // Given
    // -----
    // - J = 4.
    //
    // Expect
    // ------
    // - 24 rankings, all keys distinct, keys strictly increasing.
    fn new_enumerates_factorial_many_sorted_distinct_rankings() {
        // Arrange
        let n_items = 4;

        // Act
        let space = PermutationSpace::new(n_items).expect("J = 4 is supported");

        // Assert
        assert_eq!(space.len(), 24);
        let keys: Vec<String> = space.iter().map(Ranking::key).collect();
        let unique: HashSet<&String> = keys.iter().collect();
        assert_eq!(unique.len(), 24);
        assert!(keys.windows(2).all(|w| w[0] < w[1]), "keys must be strictly increasing");
        assert_eq!(keys.first().map(String::as_str), Some("1234"));
        assert_eq!(keys.last().map(String::as_str), Some("4321"));
    }

    #[test]
    // Purpose
    // -------
    // Check that the Lehmer-code index reproduces enumeration order.
    //
    // Given
    // -----
    // - The J = 5 space.
    //
    // Expect
    // ------
    // - `index_of(space[i]) == Some(i)` for all i; a J = 4 ranking maps to
    //   `None`.
    fn index_of_matches_enumeration_order() {
        // Arrange
        let space = PermutationSpace::new(5).expect("J = 5 is supported");
        let foreign = Ranking::from_key("1234").expect("valid key");

        // Act & Assert
        for (i, ranking) in space.iter().enumerate() {
            assert_eq!(space.index_of(ranking), Some(i), "mismatch at {}", ranking);
        }
        assert_eq!(space.index_of(&foreign), None);
    }

    #[test]
    // Purpose
    // -------
    // Ensure unsupported sizes are rejected.
    //
    // Given
    // -----
    // - J = 0 and J = MAX_ITEMS + 1.
    //
    // Expect
    // ------
    // - EmptyRanking and TooManyItems respectively.
    fn new_rejects_unsupported_sizes() {
        assert_eq!(PermutationSpace::new(0), Err(RankingError::EmptyRanking));
        assert_eq!(
            PermutationSpace::new(MAX_ITEMS + 1),
            Err(RankingError::TooManyItems { n_items: MAX_ITEMS + 1, max: MAX_ITEMS })
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify the cache returns one shared instance per J.
    //
    // Given
    // -----
    // - Two `cached(3)` calls.
    //
    // Expect
    // ------
    // - Both handles point to the same allocation with 6 rankings.
    fn cached_returns_shared_instance() {
        // Act
        let first = PermutationSpace::cached(3).expect("J = 3 is supported");
        let second = PermutationSpace::cached(3).expect("J = 3 is supported");

        // Assert
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 6);
    }

    #[test]
    // Purpose
    // -------
    // Sanity-check the single-item space and `factorial`.
    //
    // Given
    // -----
    // - J = 1.
    //
    // Expect
    // ------
    // - One ranking "1"; factorial(0) = 1 and factorial(6) = 720.
    fn single_item_space_and_factorial() {
        let space = PermutationSpace::new(1).expect("J = 1 is supported");
        assert_eq!(space.len(), 1);
        assert_eq!(space.get(0).map(Ranking::key), Some("1".to_string()));
        assert_eq!(factorial(0), 1);
        assert_eq!(factorial(6), 720);
    }
}
