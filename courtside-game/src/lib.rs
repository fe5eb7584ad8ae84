//! Courtside Game Engine
//!
//! Platform-agnostic, possession-by-possession basketball simulation core.
//! This crate produces complete play logs, box scores and energy snapshots,
//! and can resume a paused game from its own play log. It performs no I/O
//! beyond reading its embedded JSON assets.

pub mod box_score;
pub mod config;
pub(crate) mod constants;
pub mod energy;
pub mod error;
pub mod game;
pub mod numbers;
pub mod play;
pub mod player;
pub mod possession;
pub mod rating;
pub mod rng;
pub mod scheme;
pub mod streak;
pub mod text;

// Re-export commonly used types
pub use box_score::{BoxScore, BoxScoreEntry};
pub use config::EngineConfig;
pub use energy::{EnergyMap, EnergySnapshot, energy_performance_multiplier};
pub use error::{ConfigError, SimError};
pub use game::result::{GameResult, TeamBoxScores, Winner};
pub use game::resume::{Continuation, ResumeState};
pub use game::{GameEngine, Matchup};
pub use play::{
    ActiveSchemes, CourtEnergy, Description, PlayRecord, PlayerEnergy, PlayerRef,
    PossessionRecord, ScoreSnapshot, SubstitutionRecord,
};
pub use player::{Player, PlayerId, Position, Side, StatLine};
pub use possession::{Outcome, ShotType, SpecialEvent};
pub use rating::{EffectiveRating, effective_rating, positional_multiplier};
pub use rng::RngBundle;
pub use scheme::{DefenseScheme, OffenseScheme, SchemePair, evaluate_scheme};
pub use streak::Zone;
pub use text::{BuiltinPlayText, Lang, PlayCategory, PlayTextLibrary};

/// Simulate a full game with the built-in text catalog and an entropy seed.
///
/// `my_scheme` defaults to isolation offense with man-to-man defense.
///
/// # Errors
///
/// Returns `SimError::InvalidLineup` or `SimError::DuplicatePlayer` when the
/// lineups cannot be simulated.
pub fn simulate_game(
    my_lineup: &[Player],
    opponent_lineup: &[Player],
    opponent_bench: &[Player],
    my_scheme: Option<SchemePair>,
) -> Result<GameResult, SimError> {
    let matchup = Matchup::new(my_lineup, opponent_lineup, opponent_bench)
        .with_scheme(my_scheme.unwrap_or_default());
    GameEngine::new().simulate(&matchup)
}

/// Continue a paused game from the records it produced so far.
///
/// # Errors
///
/// Returns the lineup errors of [`simulate_game`], plus
/// `SimError::InconsistentResume` / `SimError::ResumePeriodZero` when
/// `resume_state` does not reconcile with `prior_plays`.
pub fn resume_simulation(
    prior_plays: &[PlayRecord],
    my_lineup: &[Player],
    opponent_lineup: &[Player],
    opponent_bench: &[Player],
    resume_state: &ResumeState,
    my_scheme: Option<SchemePair>,
    opponent_scheme_override: Option<SchemePair>,
) -> Result<GameResult, SimError> {
    let matchup = Matchup::new(my_lineup, opponent_lineup, opponent_bench)
        .with_scheme(my_scheme.unwrap_or_default());
    GameEngine::new().resume(
        &matchup,
        prior_plays,
        resume_state,
        opponent_scheme_override,
    )
}
