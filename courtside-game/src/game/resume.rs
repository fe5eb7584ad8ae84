//! Resume a paused game by replaying its play log.
//!
//! Everything the driver needs at the seam (streaks, box scores, the period
//! table, the opponent scheme) is folded out of the immutable prior records;
//! no running cache is patched.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::box_score::{Participant, record_on_court, record_possession};
use crate::config::EngineConfig;
use crate::energy::{EnergyMap, EnergySnapshot};
use crate::error::SimError;
use crate::game::Matchup;
use crate::game::driver::Driver;
use crate::game::result::{GameResult, TeamBoxScores};
use crate::game::state::{GameState, TeamState};
use crate::play::{PlayRecord, PlayerRef, ScoreSnapshot};
use crate::player::{Player, PlayerId, Position, Side};
use crate::scheme::{SchemePair, evaluate_scheme};
use crate::streak::StreakMap;
use crate::text::PlayTextLibrary;

/// Checkpoint handed back to the engine when a paused game continues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeState {
    pub score: ScoreSnapshot,
    /// One-based period the pause happened in.
    pub period: u8,
    #[serde(default)]
    pub home_energy: EnergySnapshot,
    #[serde(default)]
    pub away_energy: EnergySnapshot,
}

impl ResumeState {
    /// Derive the checkpoint from the last record of a play log.
    ///
    /// An empty log yields a tip-off checkpoint.
    #[must_use]
    pub fn from_plays(plays: &[PlayRecord]) -> Self {
        plays.last().map_or_else(
            || Self {
                score: [0, 0],
                period: 1,
                home_energy: EnergySnapshot::new(),
                away_energy: EnergySnapshot::new(),
            },
            |last| Self {
                score: last.score(),
                period: last.period(),
                home_energy: last.energy().snapshot(Side::Home),
                away_energy: last.energy().snapshot(Side::Away),
            },
        )
    }

    #[must_use]
    pub const fn energy(&self, side: Side) -> &EnergySnapshot {
        match side {
            Side::Home => &self.home_energy,
            Side::Away => &self.away_energy,
        }
    }
}

/// Where play picks up inside the paused period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Continuation {
    pub period: u8,
    /// Possessions of `period` already in the log.
    pub elapsed: u16,
    pub period_length: u16,
}

impl Continuation {
    #[must_use]
    pub const fn is_period_complete(&self) -> bool {
        self.elapsed >= self.period_length
    }

    /// Side owning the next possession.
    #[must_use]
    pub const fn next_side(&self) -> Side {
        Side::for_possession(self.elapsed)
    }
}

fn inconsistent(period: u8, elapsed: usize, length: u16) -> SimError {
    SimError::InconsistentResume {
        period,
        elapsed,
        per_period: usize::from(length),
    }
}

/// Count the possessions already played in the checkpoint period.
///
/// # Errors
///
/// `SimError::ResumePeriodZero` for a zero period, and
/// `SimError::InconsistentResume` when the log holds more possessions for the
/// period than it can have, possessions from a later period, or an earlier
/// period that was not played out in full.
pub fn locate(
    plays: &[PlayRecord],
    state: &ResumeState,
    config: &EngineConfig,
) -> Result<Continuation, SimError> {
    if state.period == 0 {
        return Err(SimError::ResumePeriodZero);
    }
    let mut counts = vec![0_usize; usize::from(state.period)];
    let mut later = 0_usize;
    for possession in plays.iter().filter_map(PlayRecord::as_possession) {
        match counts.get_mut(usize::from(possession.period.max(1)) - 1) {
            Some(count) => *count += 1,
            None => later += 1,
        }
    }

    for (period, &played) in (1..state.period).zip(&counts) {
        let length = config.period_length(period);
        if played != usize::from(length) {
            return Err(inconsistent(period, played, length));
        }
    }

    let period_length = config.period_length(state.period);
    let elapsed = counts.last().copied().unwrap_or_default();
    if later > 0 || elapsed > usize::from(period_length) {
        return Err(inconsistent(state.period, elapsed + later, period_length));
    }
    let elapsed =
        u16::try_from(elapsed).map_err(|_| inconsistent(state.period, elapsed, period_length))?;
    Ok(Continuation {
        period: state.period,
        elapsed,
        period_length,
    })
}

/// Fold the log into per-player streaks: each possession leaves the attacker's
/// post-possession value, each substitution zeroes the outgoing player.
#[must_use]
pub fn rebuild_streaks(plays: &[PlayRecord]) -> StreakMap {
    plays.iter().fold(StreakMap::new(), |mut streaks, play| {
        match play {
            PlayRecord::Possession(p) => streaks.set(p.attacker.id, p.streak),
            PlayRecord::Substitution(s) => streaks.reset(s.player_out.id),
        }
        streaks
    })
}

/// Points per period summed from the possession records.
#[must_use]
pub fn rebuild_period_scores(plays: &[PlayRecord]) -> Vec<ScoreSnapshot> {
    let mut table: Vec<ScoreSnapshot> = Vec::new();
    for possession in plays.iter().filter_map(PlayRecord::as_possession) {
        let slot = usize::from(possession.period.max(1)) - 1;
        if table.len() <= slot {
            table.resize(slot + 1, [0, 0]);
        }
        table[slot][possession.team.index()] += u32::from(possession.points);
    }
    table
}

/// Opponent scheme in force at the seam.
#[must_use]
pub fn resolve_opponent_scheme(
    plays: &[PlayRecord],
    state: &ResumeState,
    scheme_override: Option<SchemePair>,
    avg_energy: f64,
) -> SchemePair {
    scheme_override
        .or_else(|| plays.iter().rev().map(|play| play.schemes().away).next())
        .unwrap_or_else(|| {
            evaluate_scheme(
                state.score[Side::Away.index()],
                state.score[Side::Home.index()],
                state.period,
                avg_energy,
            )
        })
}

/// Latest known reference for every player seen on a roster or in the log.
#[must_use]
pub fn known_players<'a>(
    rosters: impl IntoIterator<Item = &'a Player>,
    plays: &[PlayRecord],
) -> BTreeMap<PlayerId, PlayerRef> {
    let mut known: BTreeMap<PlayerId, PlayerRef> = rosters
        .into_iter()
        .map(|p| (p.id, PlayerRef::from(p)))
        .collect();
    for play in plays {
        match play {
            PlayRecord::Possession(p) => {
                for player in [Some(&p.attacker), Some(&p.defender), p.assister.as_ref()]
                    .into_iter()
                    .flatten()
                {
                    known.insert(player.id, player.clone());
                }
            }
            PlayRecord::Substitution(s) => {
                known.insert(s.player_in.id, s.player_in.clone());
                known.insert(s.player_out.id, s.player_out.clone());
            }
        }
    }
    known
}

/// Replay every prior possession into fresh box scores.
#[must_use]
pub fn rebuild_box_scores(
    plays: &[PlayRecord],
    known: &BTreeMap<PlayerId, PlayerRef>,
) -> TeamBoxScores {
    let mut scores = TeamBoxScores::default();
    let name_of = |id: PlayerId| known.get(&id).map_or("", |p| p.name.as_str());
    for possession in plays.iter().filter_map(PlayRecord::as_possession) {
        let (offense, defense) = scores.split_mut(possession.team);
        record_possession(
            offense,
            defense,
            Participant::from(&possession.attacker),
            Participant::from(&possession.defender),
            possession.assister.as_ref().map(Participant::from),
            &possession.outcome(),
        );
        for side in Side::BOTH {
            record_on_court(
                scores.side_mut(side),
                possession.energy.on_court(side).map(|id| Participant {
                    id,
                    name: name_of(id),
                }),
            );
        }
    }
    scores
}

/// Pair the players leaving the floor at the seam with their replacements.
///
/// Replacements take the leaver from the same slot when there is one, the
/// rest are paired in lineup order. Returned as `(in, out)`.
#[must_use]
pub fn seam_swaps(
    last: Option<&PlayRecord>,
    side: Side,
    lineup: &[Player],
    known: &BTreeMap<PlayerId, PlayerRef>,
) -> Vec<(PlayerRef, PlayerRef)> {
    let Some(last) = last else {
        return Vec::new();
    };
    let previous: Vec<PlayerId> = last.energy().on_court(side).collect();
    let current: BTreeSet<PlayerId> = lineup.iter().map(|p| p.id).collect();
    let entering: Vec<&Player> = lineup.iter().filter(|p| !previous.contains(&p.id)).collect();
    // Players never named in a record keep only their id; borrow a slot from the entrants.
    let mut leaving: Vec<PlayerRef> = previous
        .iter()
        .filter(|id| !current.contains(id))
        .enumerate()
        .map(|(idx, &id)| {
            known.get(&id).cloned().unwrap_or_else(|| PlayerRef {
                id,
                name: id.to_string(),
                slot: entering.get(idx).map_or(Position::Center, |p| p.slot()),
            })
        })
        .collect();

    let mut unmatched = Vec::new();
    let mut swaps = Vec::new();
    for player in entering {
        if let Some(idx) = leaving.iter().position(|out| out.slot == player.slot()) {
            swaps.push((PlayerRef::from(player), leaving.remove(idx)));
        } else {
            unmatched.push(player);
        }
    }
    swaps.extend(
        unmatched
            .into_iter()
            .zip(leaving)
            .map(|(player, out)| (PlayerRef::from(player), out)),
    );
    swaps
}

/// Rebuild the game state at the checkpoint and play it out.
pub(crate) fn resume_game<T: PlayTextLibrary + ?Sized>(
    driver: &Driver<'_, T>,
    config: &EngineConfig,
    matchup: &Matchup<'_>,
    prior: &[PlayRecord],
    state: &ResumeState,
    opponent_scheme: Option<SchemePair>,
) -> Result<GameResult, SimError> {
    let continuation = locate(prior, state, config)?;
    let summed: u32 = prior
        .iter()
        .filter_map(PlayRecord::as_possession)
        .map(|p| u32::from(p.points))
        .sum();
    if summed != state.score[0] + state.score[1] {
        log::warn!(
            "resume score {}-{} does not match {summed} points in the log",
            state.score[0],
            state.score[1]
        );
    }

    let home = TeamState::new(Side::Home, matchup.my_lineup, &[], matchup.my_scheme);
    let away = TeamState::new(
        Side::Away,
        matchup.opponent_lineup,
        matchup.opponent_bench,
        SchemePair::default(),
    );
    let mut game = GameState::new(home, away);
    game.score = state.score;
    game.period_scores = rebuild_period_scores(prior);
    game.plays = prior.to_vec();

    let mut energy = EnergyMap::from_snapshot(&state.home_energy);
    for (&id, &value) in &state.away_energy {
        energy.set(id, value);
    }
    let home_entrant = if prior.is_empty() {
        config.fresh_energy
    } else {
        config.resume_entrant_energy
    };
    for player in &game.home.on_court {
        if !energy.contains(player.id) {
            energy.set(player.id, home_entrant);
        }
    }
    for player in game.away.roster() {
        if !energy.contains(player.id) {
            energy.set(player.id, config.fresh_energy);
        }
    }
    game.energy = energy;
    game.streaks = rebuild_streaks(prior);

    let known = known_players(game.home.roster().chain(game.away.roster()), prior);
    let box_scores = rebuild_box_scores(prior, &known);
    game.home.box_score = box_scores.home;
    game.away.box_score = box_scores.away;
    game.away.scheme = resolve_opponent_scheme(
        prior,
        state,
        opponent_scheme,
        game.average_energy(Side::Away),
    );

    if continuation.is_period_complete() && driver.is_decided(&game, continuation.period) {
        log::debug!(
            "resume after final period {}: nothing left to play",
            continuation.period
        );
        return Ok(GameResult::from_state(
            game,
            config.regular_periods,
            driver.seed(),
        ));
    }

    for side in Side::BOTH {
        let lineup = &game.team(side).on_court;
        let swaps = seam_swaps(prior.last(), side, lineup, &known);
        for (incoming, outgoing) in swaps {
            driver.push_substitution(&mut game, side, continuation.period, incoming, outgoing);
        }
    }

    let (period, index) = if continuation.is_period_complete() {
        driver.close_period(&mut game, continuation.period, opponent_scheme);
        (continuation.period.saturating_add(1), 0)
    } else {
        (continuation.period, continuation.elapsed)
    };
    log::debug!(
        "resuming at period {period} possession {index} ({:?} ball), score {}-{}, opponent {}",
        Side::for_possession(index),
        game.score[0],
        game.score[1],
        game.away.scheme
    );

    driver.run(&mut game, period, index);
    Ok(GameResult::from_state(
        game,
        config.regular_periods,
        driver.seed(),
    ))
}
