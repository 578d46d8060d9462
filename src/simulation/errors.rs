//! simulation::errors — failures of the permutation-choice simulator.
//!
//! Every variant is a precondition violation detected before any draw is
//! taken: invalid options, malformed fitted models, patterns that do not
//! match the model's alternatives, or draw sources with the wrong shape.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};
use statrs::distribution::StudentsTError;

/// Result alias for simulation operations.
pub type SimulationResult<T> = Result<T, SimulationError>;

/// SimulationError — rejected simulator inputs.
///
/// Variants
/// --------
/// Options:
/// - `InvalidDrawCount { n_draws }`: fewer than 2 draws (a t interval needs
///   at least one degree of freedom).
/// - `InvalidConfidenceLevel { level }`: level not in the open interval
///   (0, 1).
/// - `EmptySeparator`: the pattern label separator is empty.
///
/// Model:
/// - `EmptyCoefficients`, `CoefficientLengthMismatch { names, estimates }`,
///   `DuplicateCoefficient { name }`, `NonFiniteEstimate { name, value }`.
/// - `CovarianceShape { expected, rows, cols }`, `NonFiniteCovariance`,
///   `CovarianceNotPsd { eigenvalue }`, `MissingCovariance`.
/// - `TooFewAlternatives { count }`, `DuplicateAlternative { name }`,
///   `UnknownReference { reference }`.
/// - `RandomVarNotInFormula { random_var, formula }`.
/// - `MissingCoefficient { name }`: a coefficient the pattern needs is not
///   in the model.
///
/// Pattern:
/// - `PatternLength { expected, actual }`, `UnknownAlternative { name }`,
///   `DuplicatePatternEntry { name }`, `ReferenceNotLast { reference, last }`.
///
/// Grid and draws:
/// - `EmptyModeratorGrid`, `NonFiniteModerator { index, value }`,
///   `DuplicateLevel { level }`.
/// - `DrawShape { expected_cols, rows, cols }`: a caller-supplied draw
///   matrix does not have one column per coefficient or has < 2 rows.
/// - `Distribution { reason }`: the t distribution could not be built.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    // ---- Options ----
    InvalidDrawCount { n_draws: usize },
    InvalidConfidenceLevel { level: f64 },
    EmptySeparator,

    // ---- Model ----
    EmptyCoefficients,
    CoefficientLengthMismatch { names: usize, estimates: usize },
    DuplicateCoefficient { name: String },
    NonFiniteEstimate { name: String, value: f64 },
    CovarianceShape { expected: usize, rows: usize, cols: usize },
    NonFiniteCovariance,
    CovarianceNotPsd { eigenvalue: f64 },
    MissingCovariance,
    TooFewAlternatives { count: usize },
    DuplicateAlternative { name: String },
    UnknownReference { reference: String },
    RandomVarNotInFormula { random_var: String, formula: String },
    MissingCoefficient { name: String },

    // ---- Pattern ----
    PatternLength { expected: usize, actual: usize },
    UnknownAlternative { name: String },
    DuplicatePatternEntry { name: String },
    ReferenceNotLast { reference: String, last: String },

    // ---- Grid and draws ----
    EmptyModeratorGrid,
    NonFiniteModerator { index: usize, value: f64 },
    DuplicateLevel { level: String },
    DrawShape { expected_cols: usize, rows: usize, cols: usize },
    Distribution { reason: String },
}

impl std::error::Error for SimulationError {}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Options ----
            SimulationError::InvalidDrawCount { n_draws } => {
                write!(f, "Number of draws must be at least 2; got: {n_draws}")
            }
            SimulationError::InvalidConfidenceLevel { level } => {
                write!(f, "Confidence level must lie strictly between 0 and 1; got: {level}")
            }
            SimulationError::EmptySeparator => {
                write!(f, "Pattern label separator must not be empty.")
            }

            // ---- Model ----
            SimulationError::EmptyCoefficients => {
                write!(f, "Choice model must have at least one coefficient.")
            }
            SimulationError::CoefficientLengthMismatch { names, estimates } => {
                write!(f, "Choice model has {names} coefficient names but {estimates} estimates.")
            }
            SimulationError::DuplicateCoefficient { name } => {
                write!(f, "Coefficient {name:?} appears more than once.")
            }
            SimulationError::NonFiniteEstimate { name, value } => {
                write!(f, "Coefficient {name:?} must be finite; got: {value}")
            }
            SimulationError::CovarianceShape { expected, rows, cols } => {
                write!(f, "Covariance must be {expected}x{expected}; got {rows}x{cols}.")
            }
            SimulationError::NonFiniteCovariance => {
                write!(f, "Covariance matrix contains non-finite entries.")
            }
            SimulationError::CovarianceNotPsd { eigenvalue } => {
                write!(
                    f,
                    "Covariance must be positive semi-definite; found eigenvalue: {eigenvalue}"
                )
            }
            SimulationError::MissingCovariance => {
                write!(f, "Drawing from the model requires its covariance matrix.")
            }
            SimulationError::TooFewAlternatives { count } => {
                write!(f, "Choice model needs at least 2 alternatives; got: {count}")
            }
            SimulationError::DuplicateAlternative { name } => {
                write!(f, "Alternative {name:?} is listed more than once.")
            }
            SimulationError::UnknownReference { reference } => {
                write!(f, "Reference alternative {reference:?} is not one of the alternatives.")
            }
            SimulationError::RandomVarNotInFormula { random_var, formula } => {
                write!(f, "Variable {random_var:?} does not appear in the model formula {formula:?}.")
            }
            SimulationError::MissingCoefficient { name } => {
                write!(f, "Choice model has no coefficient named {name:?}.")
            }

            // ---- Pattern ----
            SimulationError::PatternLength { expected, actual } => {
                write!(f, "Pattern must list all {expected} alternatives; got {actual}.")
            }
            SimulationError::UnknownAlternative { name } => {
                write!(f, "Pattern entry {name:?} is not an alternative of the model.")
            }
            SimulationError::DuplicatePatternEntry { name } => {
                write!(f, "Pattern lists alternative {name:?} more than once.")
            }
            SimulationError::ReferenceNotLast { reference, last } => {
                write!(
                    f,
                    "Pattern must end with the reference alternative {reference:?}; ends with {last:?}."
                )
            }

            // ---- Grid and draws ----
            SimulationError::EmptyModeratorGrid => {
                write!(f, "Moderator grid must contain at least one value.")
            }
            SimulationError::NonFiniteModerator { index, value } => {
                write!(f, "Moderator value at index {index} must be finite; got: {value}")
            }
            SimulationError::DuplicateLevel { level } => {
                write!(f, "Moderator level {level:?} appears more than once.")
            }
            SimulationError::DrawShape { expected_cols, rows, cols } => {
                write!(
                    f,
                    "Coefficient draws must have at least 2 rows and {expected_cols} columns; got {rows}x{cols}."
                )
            }
            SimulationError::Distribution { reason } => {
                write!(f, "Could not build the t distribution: {reason}")
            }
        }
    }
}

impl From<StudentsTError> for SimulationError {
    fn from(err: StudentsTError) -> SimulationError {
        SimulationError::Distribution { reason: err.to_string() }
    }
}

#[cfg(feature = "python-bindings")]
impl From<SimulationError> for PyErr {
    fn from(err: SimulationError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
