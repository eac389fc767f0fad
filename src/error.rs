//! Error types for placement, validation, simulation and comparison.

use thiserror::Error;

/// The fleet cannot be laid out on the configured board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("board side must be at least 1")]
    EmptyBoard,
    #[error("{name} (length {length}) is longer than the board side {size}")]
    ShipTooLong {
        name: &'static str,
        length: usize,
        size: usize,
    },
    #[error("fleet needs {required} cells but a {size}x{size} board only has room for {capacity}")]
    FleetTooLarge {
        required: usize,
        capacity: usize,
        size: usize,
    },
    #[error("invalid placement grid: {0}")]
    InvalidGrid(String),
    #[error("placement strategy '{strategy}' needs {needs}")]
    MissingGrid {
        strategy: &'static str,
        needs: &'static str,
    },
}

/// A declarative algorithm definition is malformed or inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("malformed algorithm definition: {0}")]
    Malformed(String),
    #[error("initial state '{0}' is not declared")]
    UnknownInitialState(String),
    #[error("state '{state}' references undeclared queue '{queue}'")]
    UndeclaredQueue { state: String, queue: String },
    #[error("state '{state}' transitions to undeclared state '{target}'")]
    UndeclaredState { state: String, target: String },
    #[error("state '{state}' references undeclared variable '{variable}'")]
    UndeclaredVariable { state: String, variable: String },
    #[error("queue '{0}' is declared more than once")]
    DuplicateQueue(String),
    #[error("invalid parity {parity} in state '{state}' (expected 0 or 1)")]
    InvalidParity { state: String, parity: u8 },
}

/// A single game could not be completed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("exceeded shot cap of {cap}")]
    ShotCapExceeded { cap: usize },
    #[error("no candidate shot available in state '{state}'")]
    NoCandidate { state: String },
    #[error("algorithm fired at ({row}, {col}), outside the {size}x{size} board")]
    InvalidShot { row: usize, col: usize, size: usize },
    #[error("simulation cancelled")]
    Cancelled,
}

/// ANOVA could not be computed over the supplied groups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComparisonError {
    #[error("need at least two algorithms with samples, got {0}")]
    TooFewGroups(usize),
    #[error("group '{0}' has no samples")]
    EmptyGroup(String),
}

/// Top-level error for a run or comparison request.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("unknown algorithm id '{id}' (available: {available})")]
    UnknownAlgorithm { id: String, available: String },
    #[error("algorithm '{id}' rejected: {source}")]
    Validation {
        id: String,
        #[source]
        source: ValidationError,
    },
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error("algorithm '{id}': {aborted} of {total} games aborted (first: {first})")]
    AbortThreshold {
        id: String,
        aborted: usize,
        total: usize,
        first: SimulationError,
    },
    #[error("run cancelled")]
    Cancelled,
    #[error(transparent)]
    Comparison(#[from] ComparisonError),
    #[error("num_simulations must be at least 1")]
    NoSimulations,
    #[error("max_abort_rate must lie in 0.0..=1.0, got {0}")]
    InvalidAbortRate(f64),
    #[error("algorithm id '{0}' is already registered")]
    DuplicateAlgorithm(String),
    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
