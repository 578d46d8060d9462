//! permutations::ranking — typed full rankings and their string keys.
//!
//! Purpose
//! -------
//! Represent a strict total order over `J` items as a validated, fixed-length
//! sequence and provide the string adapters used where rankings enter or
//! leave the crate (survey columns, join keys, Python).
//!
//! Key behaviors
//! -------------
//! - [`Ranking`] stores, for each item `1..=J` in item order, the 1-based
//!   position that item occupies. This is exactly the survey encoding, so
//!   the canonical key is the concatenation of those digits (e.g. `"213"`
//!   means item 1 is ranked second, item 2 first, item 3 third).
//! - [`Ranking::from_order`] / [`Ranking::order`] convert to and from the
//!   "ordered item-id" view (`order[k]` is the item placed at position
//!   `k + 1`).
//! - `Ord` on [`Ranking`] agrees with lexicographic order on the key, so a
//!   sorted collection of rankings is sorted by key.
//!
//! Invariants & assumptions
//! ------------------------
//! - `1 <= J <= MAX_ITEMS`; every position in `1..=J` appears exactly once.
//! - `MAX_ITEMS = 9`: one digit per item is a hard format constraint.
//!
//! Conventions
//! -----------
//! - Item ids and positions are 1-based at every public boundary.
//! - Construction never panics; malformed input yields [`RankingError`].
use crate::permutations::errors::{RankingError, RankingResult};

/// Largest item count expressible with one digit per item.
pub const MAX_ITEMS: usize = 9;

/// Ranking — a validated permutation stored as per-item positions.
///
/// Fields
/// ------
/// - `positions`: `Vec<u8>`
///   `positions[i]` is the 1-based position of item `i + 1`.
///
/// Invariants
/// ----------
/// - `positions` is a permutation of `1..=positions.len()` and
///   `1 <= positions.len() <= MAX_ITEMS`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ranking {
    positions: Vec<u8>,
}

impl Ranking {
    /// Build a ranking from per-item positions (`positions[i]` is the
    /// 1-based position of item `i + 1`).
    ///
    /// Errors
    /// ------
    /// - `RankingError::EmptyRanking` / `TooManyItems` for unsupported sizes.
    /// - `RankingError::PositionOutOfRange` / `DuplicateEntry` when the
    ///   positions do not form a permutation of `1..=J`.
    pub fn from_positions(positions: &[usize]) -> RankingResult<Self> {
        validate_permutation(positions)?;
        Ok(Ranking { positions: positions.iter().map(|&p| p as u8).collect() })
    }

    /// Build a ranking from an ordered sequence of 1-based item ids, where
    /// `order[k]` is the item placed at position `k + 1`.
    ///
    /// Errors
    /// ------
    /// Same as [`Ranking::from_positions`], with item ids in place of
    /// positions.
    pub fn from_order(order: &[usize]) -> RankingResult<Self> {
        validate_permutation(order)?;
        let mut positions = vec![0_u8; order.len()];
        for (k, &item) in order.iter().enumerate() {
            positions[item - 1] = (k + 1) as u8;
        }
        Ok(Ranking { positions })
    }

    /// Parse a fixed-width digit key such as `"2134"`.
    ///
    /// Parameters
    /// ----------
    /// - `key`: `&str`
    ///   One digit per item, in item order. Surrounding whitespace is
    ///   ignored.
    ///
    /// Errors
    /// ------
    /// - `RankingError::InvalidKeyCharacter`
    ///   Any character other than `1`–`9`.
    /// - Errors from [`Ranking::from_positions`] for non-permutations.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use rank_estimation::permutations::ranking::Ranking;
    /// let ranking = Ranking::from_key("231").unwrap();
    /// assert_eq!(ranking.order(), vec![3, 1, 2]);
    /// assert_eq!(ranking.key(), "231");
    /// ```
    pub fn from_key(key: &str) -> RankingResult<Self> {
        let trimmed = key.trim();
        let mut positions = Vec::with_capacity(trimmed.len());
        for character in trimmed.chars() {
            match character.to_digit(10) {
                Some(digit) if digit >= 1 => positions.push(digit as usize),
                _ => {
                    return Err(RankingError::InvalidKeyCharacter {
                        key: trimmed.to_string(),
                        character,
                    });
                }
            }
        }
        Ranking::from_positions(&positions)
    }

    /// Number of ranked items `J`.
    pub fn n_items(&self) -> usize {
        self.positions.len()
    }

    /// Per-item positions, in item order.
    pub fn positions(&self) -> &[u8] {
        &self.positions
    }

    /// 1-based position of the 1-based item `item`, if it exists.
    pub fn position_of(&self, item: usize) -> Option<usize> {
        item.checked_sub(1).and_then(|i| self.positions.get(i)).map(|&p| p as usize)
    }

    /// Ordered item ids: element `k` is the item at position `k + 1`.
    pub fn order(&self) -> Vec<usize> {
        let mut order = vec![0_usize; self.positions.len()];
        for (i, &p) in self.positions.iter().enumerate() {
            order[p as usize - 1] = i + 1;
        }
        order
    }

    /// Canonical digit key (concatenated positions in item order).
    pub fn key(&self) -> String {
        self.positions.iter().map(|&p| char::from(b'0' + p)).collect()
    }
}

impl std::fmt::Display for Ranking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key())
    }
}

impl std::str::FromStr for Ranking {
    type Err = RankingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ranking::from_key(s)
    }
}

/// Check that `values` is a permutation of `1..=values.len()` with a
/// supported length.
pub(crate) fn validate_permutation(values: &[usize]) -> RankingResult<()> {
    let n_items = values.len();
    if n_items == 0 {
        return Err(RankingError::EmptyRanking);
    }
    if n_items > MAX_ITEMS {
        return Err(RankingError::TooManyItems { n_items, max: MAX_ITEMS });
    }
    let mut seen = [false; MAX_ITEMS];
    for &value in values {
        if value == 0 || value > n_items {
            return Err(RankingError::PositionOutOfRange { position: value, n_items });
        }
        if seen[value - 1] {
            return Err(RankingError::DuplicateEntry { value });
        }
        seen[value - 1] = true;
    }
    Ok(())
}
