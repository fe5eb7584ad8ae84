//! Error types surfaced by the simulation entry points.
use thiserror::Error;

use crate::player::{PlayerId, Side};

/// Errors raised when engine configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be at least {min:.2} (got {value:.2})")]
    MinViolation {
        field: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("engine config is not valid JSON: {0}")]
    Parse(String),
}

/// Precondition and contract failures reported by `simulate_game` / `resume_simulation`.
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error("cannot simulate: {side:?} lineup needs {expected} players (got {found})")]
    InvalidLineup {
        side: Side,
        expected: usize,
        found: usize,
    },
    #[error("cannot simulate: player {id} appears more than once across lineups and benches")]
    DuplicatePlayer { id: PlayerId },
    #[error(
        "resume state inconsistent with play log: period {period} holds {elapsed} of {per_period} possessions"
    )]
    InconsistentResume {
        period: u8,
        elapsed: usize,
        per_period: usize,
    },
    #[error("resume state period must be at least 1")]
    ResumePeriodZero,
    #[error(transparent)]
    Config(#[from] ConfigError),
}
