//! Final output of a simulate or resume call.
use serde::{Deserialize, Serialize};

use crate::box_score::BoxScore;
use crate::energy::EnergySnapshot;
use crate::game::state::GameState;
use crate::play::{PlayRecord, PossessionRecord, ScoreSnapshot, SubstitutionRecord};
use crate::player::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Home,
    Away,
    Tie,
}

impl Winner {
    #[must_use]
    pub const fn from_score(score: ScoreSnapshot) -> Self {
        if score[0] > score[1] {
            Self::Home
        } else if score[1] > score[0] {
            Self::Away
        } else {
            Self::Tie
        }
    }
}

/// Both teams' box scores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamBoxScores {
    pub home: BoxScore,
    pub away: BoxScore,
}

impl TeamBoxScores {
    #[must_use]
    pub const fn side(&self, side: Side) -> &BoxScore {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    /// Borrow the attacking and defending box scores at once.
    pub const fn split_mut(&mut self, offense: Side) -> (&mut BoxScore, &mut BoxScore) {
        match offense {
            Side::Home => (&mut self.home, &mut self.away),
            Side::Away => (&mut self.away, &mut self.home),
        }
    }

    pub const fn side_mut(&mut self, side: Side) -> &mut BoxScore {
        match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }
}

/// Complete game: play log, score tables, box scores and final energy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub plays: Vec<PlayRecord>,
    /// Points scored within each period as `[home, away]`.
    pub period_scores: Vec<ScoreSnapshot>,
    pub final_score: ScoreSnapshot,
    pub winner: Winner,
    pub box_scores: TeamBoxScores,
    pub final_energy: EnergySnapshot,
    pub regular_periods: u8,
    /// Seed of the random bundle that produced the new plays.
    pub seed: u64,
}

impl GameResult {
    pub(crate) fn from_state(state: GameState, regular_periods: u8, seed: u64) -> Self {
        let final_energy = state
            .energy
            .snapshot(state.home.roster().chain(state.away.roster()));
        Self {
            winner: Winner::from_score(state.score),
            final_score: state.score,
            period_scores: state.period_scores,
            plays: state.plays,
            box_scores: TeamBoxScores {
                home: state.home.box_score,
                away: state.away.box_score,
            },
            final_energy,
            regular_periods,
            seed,
        }
    }

    pub fn possessions(&self) -> impl Iterator<Item = &PossessionRecord> + '_ {
        self.plays.iter().filter_map(PlayRecord::as_possession)
    }

    pub fn substitutions(&self) -> impl Iterator<Item = &SubstitutionRecord> + '_ {
        self.plays.iter().filter_map(PlayRecord::as_substitution)
    }

    #[must_use]
    pub fn possession_count(&self) -> usize {
        self.possessions().count()
    }

    #[must_use]
    pub fn periods_played(&self) -> usize {
        self.period_scores.len()
    }

    #[must_use]
    pub fn overtime_periods(&self) -> usize {
        self.period_scores
            .len()
            .saturating_sub(usize::from(self.regular_periods))
    }

    /// Points summed from the possession records, per side.
    #[must_use]
    pub fn points_by_team(&self) -> ScoreSnapshot {
        self.possessions().fold([0, 0], |mut acc, p| {
            acc[p.team.index()] += u32::from(p.points);
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winner_follows_score() {
        assert_eq!(Winner::from_score([80, 79]), Winner::Home);
        assert_eq!(Winner::from_score([80, 81]), Winner::Away);
        assert_eq!(Winner::from_score([80, 80]), Winner::Tie);
    }

    #[test]
    fn empty_result_helpers() {
        let result = GameResult {
            plays: Vec::new(),
            period_scores: vec![[20, 18], [22, 20], [19, 21], [18, 20], [10, 8]],
            final_score: [89, 87],
            winner: Winner::Home,
            box_scores: TeamBoxScores::default(),
            final_energy: EnergySnapshot::new(),
            regular_periods: 4,
            seed: 0,
        };
        assert_eq!(result.possession_count(), 0);
        assert_eq!(result.overtime_periods(), 1);
        assert_eq!(result.periods_played(), 5);
        assert_eq!(result.points_by_team(), [0, 0]);
        assert_eq!(result.box_scores.side(Side::Away), &BoxScore::default());
    }
}
