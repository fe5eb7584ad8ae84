//! Player identity, season averages and lineup slotting as consumed by the engine.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{FALLBACK_FG_PCT, FALLBACK_FT_PCT, USAGE_FLOOR, USAGE_FTA_WEIGHT};
use crate::error::SimError;
use crate::numbers::ratio_or;

/// Stable player identifier supplied by the roster collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Roster slot / natural position, ordered guard to center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "PG")]
    PointGuard,
    #[serde(rename = "SG")]
    ShootingGuard,
    #[serde(rename = "SF")]
    SmallForward,
    #[serde(rename = "PF")]
    PowerForward,
    #[serde(rename = "C")]
    Center,
}

impl Position {
    pub const ALL: [Self; 5] = [
        Self::PointGuard,
        Self::ShootingGuard,
        Self::SmallForward,
        Self::PowerForward,
        Self::Center,
    ];

    /// Index along the fixed `[PG, SG, SF, PF, C]` order.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::PointGuard => 0,
            Self::ShootingGuard => 1,
            Self::SmallForward => 2,
            Self::PowerForward => 3,
            Self::Center => 4,
        }
    }

    /// Absolute slot distance between two positions.
    #[must_use]
    pub const fn distance(self, other: Self) -> usize {
        self.index().abs_diff(other.index())
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PointGuard => "PG",
            Self::ShootingGuard => "SG",
            Self::SmallForward => "SF",
            Self::PowerForward => "PF",
            Self::Center => "C",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which bench a team occupies. Home is the human side and always attacks first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub const BOTH: [Self; 2] = [Self::Home, Self::Away];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Home => 0,
            Self::Away => 1,
        }
    }

    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Home => Self::Away,
            Self::Away => Self::Home,
        }
    }

    /// Side attacking on the given zero-based possession index of a period.
    #[must_use]
    pub const fn for_possession(index: u16) -> Self {
        if index % 2 == 0 { Self::Home } else { Self::Away }
    }
}

/// Season per-game averages. Every field defaults to zero when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatLine {
    pub points: f64,
    pub fga: f64,
    pub fgm: f64,
    pub fg3a: f64,
    pub fg3m: f64,
    pub fta: f64,
    pub ftm: f64,
    pub assists: f64,
    pub turnovers: f64,
    pub steals: f64,
    pub blocks: f64,
    pub rebounds: f64,
    pub minutes: f64,
}

/// Player as consumed by the simulation core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    /// Positions the player may occupy without penalty; empty means natural position only.
    #[serde(default)]
    pub eligible_positions: Vec<Position>,
    #[serde(default)]
    pub averages: StatLine,
    pub offense_rating: f64,
    pub defense_rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_possessions: Option<f64>,
    /// Slot the player is assigned to when it differs from the natural position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playing_as: Option<Position>,
}

impl Player {
    /// Construct a player with neutral ratings and an empty stat line.
    #[must_use]
    pub fn new(id: u32, name: impl Into<String>, position: Position) -> Self {
        Self {
            id: PlayerId(id),
            name: name.into(),
            position,
            eligible_positions: vec![position],
            averages: StatLine::default(),
            offense_rating: 100.0,
            defense_rating: 100.0,
            usage_possessions: None,
            playing_as: None,
        }
    }

    #[must_use]
    pub fn with_ratings(mut self, offense: f64, defense: f64) -> Self {
        self.offense_rating = offense;
        self.defense_rating = defense;
        self
    }

    #[must_use]
    pub fn with_averages(mut self, averages: StatLine) -> Self {
        self.averages = averages;
        self
    }

    #[must_use]
    pub fn with_eligible(mut self, positions: &[Position]) -> Self {
        self.eligible_positions = positions.to_vec();
        self
    }

    /// Assign the player to a slot, recording the mismatch label when it differs.
    #[must_use]
    pub fn playing_as(mut self, slot: Position) -> Self {
        self.playing_as = (slot != self.position).then_some(slot);
        self
    }

    /// The roster slot this player currently occupies.
    #[must_use]
    pub fn slot(&self) -> Position {
        self.playing_as.unwrap_or(self.position)
    }

    /// Eligible positions, falling back to the natural position when none are listed.
    #[must_use]
    pub fn eligible(&self) -> &[Position] {
        if self.eligible_positions.is_empty() {
            std::slice::from_ref(&self.position)
        } else {
            &self.eligible_positions
        }
    }

    #[must_use]
    pub fn can_play(&self, slot: Position) -> bool {
        self.position == slot || self.eligible().contains(&slot)
    }

    /// Expected possessions used per game: supplied value or `fga + 0.44*fta + tov`, floor 4.
    #[must_use]
    pub fn usage(&self) -> f64 {
        let computed = self.usage_possessions.unwrap_or_else(|| {
            let a = &self.averages;
            a.fga + USAGE_FTA_WEIGHT * a.fta + a.turnovers
        });
        if computed.is_finite() {
            computed.max(USAGE_FLOOR)
        } else {
            USAGE_FLOOR
        }
    }

    /// Empirical two-point make rate.
    #[must_use]
    pub fn two_point_pct(&self) -> f64 {
        let a = &self.averages;
        ratio_or(a.fgm - a.fg3m, a.fga - a.fg3a, FALLBACK_FG_PCT).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn three_point_pct(&self) -> f64 {
        let a = &self.averages;
        ratio_or(a.fg3m, a.fg3a, FALLBACK_FG_PCT).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn free_throw_pct(&self) -> f64 {
        let a = &self.averages;
        ratio_or(a.ftm, a.fta, FALLBACK_FT_PCT).clamp(0.0, 1.0)
    }

    /// Share of field-goal attempts taken from three.
    #[must_use]
    pub fn three_attempt_share(&self) -> f64 {
        let a = &self.averages;
        ratio_or(a.fg3a, a.fga, 0.0).clamp(0.0, 1.0)
    }
}

/// Check a five-player lineup plus bench before any simulation work happens.
///
/// # Errors
///
/// Returns `SimError::InvalidLineup` when the lineup is not exactly five players,
/// and `SimError::DuplicatePlayer` when an id appears twice across lineup and bench.
pub fn validate_roster(side: Side, lineup: &[Player], bench: &[Player]) -> Result<(), SimError> {
    if lineup.len() != 5 {
        return Err(SimError::InvalidLineup {
            side,
            expected: 5,
            found: lineup.len(),
        });
    }
    let mut seen = std::collections::HashSet::new();
    for player in lineup.iter().chain(bench) {
        if !seen.insert(player.id) {
            return Err(SimError::DuplicatePlayer { id: player.id });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> Player {
        Player::new(1, "Test Guard", Position::PointGuard).with_averages(StatLine {
            fga: 15.0,
            fgm: 7.0,
            fg3a: 5.0,
            fg3m: 2.0,
            fta: 5.0,
            ftm: 4.0,
            turnovers: 3.0,
            ..StatLine::default()
        })
    }

    #[test]
    fn usage_uses_formula_and_floor() {
        let player = guard();
        assert!((player.usage() - (15.0 + 0.44 * 5.0 + 3.0)).abs() < 1e-9);

        let sparse = Player::new(2, "Bench Body", Position::Center);
        assert!((sparse.usage() - 4.0).abs() < f64::EPSILON);

        let supplied = Player {
            usage_possessions: Some(2.0),
            ..guard()
        };
        assert!((supplied.usage() - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn shooting_rates_fall_back_when_absent() {
        let player = guard();
        assert!((player.two_point_pct() - 0.5).abs() < 1e-9);
        assert!((player.three_point_pct() - 0.4).abs() < 1e-9);
        assert!((player.free_throw_pct() - 0.8).abs() < 1e-9);

        let sparse = Player::new(2, "Bench Body", Position::Center);
        assert!((sparse.two_point_pct() - 0.33).abs() < 1e-9);
        assert!((sparse.free_throw_pct() - 0.70).abs() < 1e-9);
        assert!(sparse.three_attempt_share().abs() < f64::EPSILON);
    }

    #[test]
    fn slotting_tracks_mismatch_label() {
        let player = guard().playing_as(Position::SmallForward);
        assert_eq!(player.slot(), Position::SmallForward);
        assert_eq!(player.playing_as, Some(Position::SmallForward));
        let natural = guard().playing_as(Position::PointGuard);
        assert_eq!(natural.playing_as, None);
        assert!(natural.can_play(Position::PointGuard));
    }

    #[test]
    fn side_alternates_starting_with_home() {
        assert_eq!(Side::for_possession(0), Side::Home);
        assert_eq!(Side::for_possession(1), Side::Away);
        assert_eq!(Side::for_possession(38), Side::Home);
        assert_eq!(Side::Home.other(), Side::Away);
    }

    #[test]
    fn roster_validation_rejects_short_and_duplicate() {
        let lineup: Vec<Player> = (0..4)
            .map(|i| Player::new(i, format!("P{i}"), Position::ALL[i as usize]))
            .collect();
        assert!(matches!(
            validate_roster(Side::Home, &lineup, &[]),
            Err(SimError::InvalidLineup { found: 4, .. })
        ));

        let mut full = lineup.clone();
        full.push(Player::new(4, "P4", Position::Center));
        assert!(validate_roster(Side::Away, &full, &[]).is_ok());
        let bench = vec![Player::new(0, "Dup", Position::Center)];
        assert!(matches!(
            validate_roster(Side::Away, &full, &bench),
            Err(SimError::DuplicatePlayer { id: PlayerId(0) })
        ));
    }
}
