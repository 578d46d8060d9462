//! simulation::moderator — grids of moderator values to trace.
//!
//! A continuous moderator enters each non-reference alternative's linear
//! predictor as `slope · v`. A discrete moderator enters as the coefficient
//! of its level, with the first level acting as the reference category
//! (contribution 0).
use std::collections::HashSet;

use crate::simulation::errors::{SimulationError, SimulationResult};

/// ModeratorGrid — the values at which the pattern probability is traced.
#[derive(Debug, Clone, PartialEq)]
pub enum ModeratorGrid {
    /// Numeric values; any order, spacing, or sign.
    Continuous(Vec<f64>),
    /// Factor levels; the first is the reference category.
    Discrete { levels: Vec<String> },
}

/// ModeratorValue — one grid point, as reported in results.
#[derive(Debug, Clone, PartialEq)]
pub enum ModeratorValue {
    Continuous(f64),
    Level(String),
}

impl std::fmt::Display for ModeratorValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModeratorValue::Continuous(value) => write!(f, "{value}"),
            ModeratorValue::Level(level) => f.write_str(level),
        }
    }
}

impl ModeratorGrid {
    /// Validated continuous grid.
    ///
    /// Errors
    /// ------
    /// - `EmptyModeratorGrid`; `NonFiniteModerator` for NaN/±∞ entries.
    pub fn continuous(values: Vec<f64>) -> SimulationResult<ModeratorGrid> {
        if values.is_empty() {
            return Err(SimulationError::EmptyModeratorGrid);
        }
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(SimulationError::NonFiniteModerator { index, value });
        }
        Ok(ModeratorGrid::Continuous(values))
    }

    /// Validated discrete grid.
    ///
    /// Errors
    /// ------
    /// - `EmptyModeratorGrid`; `DuplicateLevel` for repeated levels.
    pub fn discrete(levels: Vec<String>) -> SimulationResult<ModeratorGrid> {
        if levels.is_empty() {
            return Err(SimulationError::EmptyModeratorGrid);
        }
        let mut seen = HashSet::with_capacity(levels.len());
        for level in &levels {
            if !seen.insert(level.as_str()) {
                return Err(SimulationError::DuplicateLevel { level: level.clone() });
            }
        }
        Ok(ModeratorGrid::Discrete { levels })
    }

    pub fn len(&self) -> usize {
        match self {
            ModeratorGrid::Continuous(values) => values.len(),
            ModeratorGrid::Discrete { levels } => levels.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grid points in grid order.
    pub fn values(&self) -> Vec<ModeratorValue> {
        match self {
            ModeratorGrid::Continuous(values) => {
                values.iter().map(|&v| ModeratorValue::Continuous(v)).collect()
            }
            ModeratorGrid::Discrete { levels } => {
                levels.iter().map(|level| ModeratorValue::Level(level.clone())).collect()
            }
        }
    }

    /// Slope term for grid position `index`: the coefficient-name suffix
    /// after `"<alternative>:"` and its multiplier. `None` means the point
    /// contributes nothing (the reference level of a discrete grid).
    pub(crate) fn slope_term(&self, random_var: &str, index: usize) -> Option<(String, f64)> {
        match self {
            ModeratorGrid::Continuous(values) => {
                values.get(index).map(|&v| (random_var.to_string(), v))
            }
            ModeratorGrid::Discrete { levels } => match index {
                0 => None,
                _ => levels.get(index).map(|level| (format!("{random_var}{level}"), 1.0)),
            },
        }
    }
}
