//! Game driver, resume engine and the engine facade.
pub(crate) mod driver;
pub mod resume;
pub mod result;
pub mod state;

use std::collections::HashSet;

use crate::config::EngineConfig;
use crate::error::SimError;
use crate::play::PlayRecord;
use crate::player::{Player, Side, validate_roster};
use crate::rng::RngBundle;
use crate::scheme::{SchemePair, evaluate_scheme};
use crate::text::{BuiltinPlayText, PlayTextLibrary};

use self::driver::Driver;
use self::result::GameResult;
use self::resume::{ResumeState, resume_game};
use self::state::{GameState, TeamState};

/// Lineups, bench and the human scheme for one game.
#[derive(Debug, Clone, Copy)]
pub struct Matchup<'a> {
    pub my_lineup: &'a [Player],
    pub opponent_lineup: &'a [Player],
    pub opponent_bench: &'a [Player],
    pub my_scheme: SchemePair,
}

impl<'a> Matchup<'a> {
    #[must_use]
    pub fn new(
        my_lineup: &'a [Player],
        opponent_lineup: &'a [Player],
        opponent_bench: &'a [Player],
    ) -> Self {
        Self {
            my_lineup,
            opponent_lineup,
            opponent_bench,
            my_scheme: SchemePair::default(),
        }
    }

    #[must_use]
    pub const fn with_scheme(mut self, scheme: SchemePair) -> Self {
        self.my_scheme = scheme;
        self
    }

    /// Precondition check run before any random draw.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidLineup` for a lineup that is not five players and
    /// `SimError::DuplicatePlayer` when an id appears twice anywhere in the matchup.
    pub fn validate(&self) -> Result<(), SimError> {
        validate_roster(Side::Home, self.my_lineup, &[])?;
        validate_roster(Side::Away, self.opponent_lineup, self.opponent_bench)?;
        let mut seen = HashSet::new();
        for player in self
            .my_lineup
            .iter()
            .chain(self.opponent_lineup)
            .chain(self.opponent_bench)
        {
            if !seen.insert(player.id) {
                return Err(SimError::DuplicatePlayer { id: player.id });
            }
        }
        Ok(())
    }
}

/// Engine facade binding a text library, a configuration and an optional seed.
#[derive(Debug, Clone)]
pub struct GameEngine<T: PlayTextLibrary = &'static BuiltinPlayText> {
    text: T,
    config: EngineConfig,
    seed: Option<u64>,
}

impl GameEngine {
    /// Engine with the built-in text catalog and default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_text(BuiltinPlayText::default_catalog())
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PlayTextLibrary> GameEngine<T> {
    #[must_use]
    pub fn with_text(text: T) -> Self {
        Self {
            text,
            config: EngineConfig::default_config().clone(),
            seed: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Fix the user seed so every call replays bit-exactly.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn text(&self) -> &T {
        &self.text
    }

    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn rng(&self) -> RngBundle {
        self.seed
            .map_or_else(RngBundle::from_entropy, RngBundle::from_user_seed)
    }

    /// Simulate a full game from tip-off.
    ///
    /// # Errors
    ///
    /// Returns `SimError` when the configuration or the matchup is invalid.
    pub fn simulate(&self, matchup: &Matchup<'_>) -> Result<GameResult, SimError> {
        self.simulate_with(matchup, &self.rng())
    }

    /// Simulate with an explicitly supplied random bundle.
    ///
    /// # Errors
    ///
    /// Returns `SimError` when the configuration or the matchup is invalid.
    pub fn simulate_with(
        &self,
        matchup: &Matchup<'_>,
        rng: &RngBundle,
    ) -> Result<GameResult, SimError> {
        self.config.validate()?;
        matchup.validate()?;

        let fresh = self.config.fresh_energy;
        let home = TeamState::new(Side::Home, matchup.my_lineup, &[], matchup.my_scheme);
        let away = TeamState::new(
            Side::Away,
            matchup.opponent_lineup,
            matchup.opponent_bench,
            evaluate_scheme(0, 0, 1, fresh),
        );
        let mut state = GameState::new(home, away);
        state.fill_energy(fresh);
        log::debug!(
            "tip-off (seed {}): home {} vs away {}",
            rng.seed(),
            state.home.scheme,
            state.away.scheme
        );

        Driver::new(&self.config, &self.text, rng).run(&mut state, 1, 0);
        Ok(GameResult::from_state(
            state,
            self.config.regular_periods,
            rng.seed(),
        ))
    }

    /// Continue a paused game from its play-log prefix.
    ///
    /// # Errors
    ///
    /// Returns `SimError` for an invalid configuration or matchup, and
    /// `SimError::InconsistentResume` when `state` does not reconcile with `prior`.
    pub fn resume(
        &self,
        matchup: &Matchup<'_>,
        prior: &[PlayRecord],
        state: &ResumeState,
        opponent_scheme: Option<SchemePair>,
    ) -> Result<GameResult, SimError> {
        self.resume_with(matchup, prior, state, opponent_scheme, &self.rng())
    }

    /// Resume with an explicitly supplied random bundle.
    ///
    /// # Errors
    ///
    /// Same as [`GameEngine::resume`].
    pub fn resume_with(
        &self,
        matchup: &Matchup<'_>,
        prior: &[PlayRecord],
        state: &ResumeState,
        opponent_scheme: Option<SchemePair>,
        rng: &RngBundle,
    ) -> Result<GameResult, SimError> {
        self.config.validate()?;
        matchup.validate()?;
        let driver = Driver::new(&self.config, &self.text, rng);
        resume_game(&driver, &self.config, matchup, prior, state, opponent_scheme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Position;

    fn lineup(offset: u32) -> Vec<Player> {
        Position::ALL
            .iter()
            .zip(offset..)
            .map(|(&pos, id)| Player::new(id, format!("Player {id}"), pos))
            .collect()
    }

    #[test]
    fn short_lineup_fails_before_simulating() {
        let mut mine = lineup(0);
        mine.pop();
        let theirs = lineup(10);
        let err = GameEngine::new()
            .with_seed(1)
            .simulate(&Matchup::new(&mine, &theirs, &[]));
        assert!(matches!(
            err,
            Err(SimError::InvalidLineup {
                side: Side::Home,
                found: 4,
                ..
            })
        ));
    }

    #[test]
    fn shared_player_across_teams_is_rejected() {
        let mine = lineup(0);
        let theirs = lineup(4);
        let err = Matchup::new(&mine, &theirs, &[]).validate();
        assert!(matches!(err, Err(SimError::DuplicatePlayer { .. })));
    }

    #[test]
    fn invalid_config_is_reported() {
        let mine = lineup(0);
        let theirs = lineup(10);
        let engine = GameEngine::new().with_config(EngineConfig {
            possessions_per_quarter: 0,
            ..EngineConfig::default()
        });
        assert!(matches!(
            engine.simulate(&Matchup::new(&mine, &theirs, &[])),
            Err(SimError::Config(_))
        ));
    }

    #[test]
    fn seeded_engine_replays_exactly() {
        let mine = lineup(0);
        let theirs = lineup(10);
        let engine = GameEngine::new().with_seed(2024);
        let matchup = Matchup::new(&mine, &theirs, &[]);
        let first = engine.simulate(&matchup).unwrap_or_else(|err| panic!("{err}"));
        let second = engine.simulate(&matchup).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(first, second);
        assert_eq!(first.seed, 2024);
    }
}
