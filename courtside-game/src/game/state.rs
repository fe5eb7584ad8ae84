//! Mutable per-call game state threaded through the driver.
use crate::box_score::BoxScore;
use crate::energy::EnergyMap;
use crate::play::{ActiveSchemes, CourtEnergy, PlayRecord, ScoreSnapshot};
use crate::player::{Player, PlayerId, Side};
use crate::scheme::SchemePair;
use crate::streak::StreakMap;

/// One side's floor, bench, scheme and box score.
#[derive(Debug, Clone)]
pub struct TeamState {
    pub side: Side,
    pub on_court: Vec<Player>,
    pub bench: Vec<Player>,
    pub scheme: SchemePair,
    pub box_score: BoxScore,
}

impl TeamState {
    #[must_use]
    pub fn new(side: Side, on_court: &[Player], bench: &[Player], scheme: SchemePair) -> Self {
        Self {
            side,
            on_court: on_court.to_vec(),
            bench: bench.to_vec(),
            scheme,
            box_score: BoxScore::new(),
        }
    }

    #[must_use]
    pub fn is_on_court(&self, id: PlayerId) -> bool {
        self.on_court.iter().any(|p| p.id == id)
    }

    pub fn roster(&self) -> impl Iterator<Item = &Player> + '_ {
        self.on_court.iter().chain(&self.bench)
    }
}

/// Everything that changes while a game is simulated.
///
/// Created fresh for every `simulate` or `resume` call and consumed into a
/// `GameResult`; nothing here outlives the call.
#[derive(Debug, Clone)]
pub struct GameState {
    pub home: TeamState,
    pub away: TeamState,
    pub energy: EnergyMap,
    pub streaks: StreakMap,
    pub score: ScoreSnapshot,
    /// Points scored within each period, indexed by `period - 1`.
    pub period_scores: Vec<ScoreSnapshot>,
    pub plays: Vec<PlayRecord>,
}

impl GameState {
    #[must_use]
    pub fn new(home: TeamState, away: TeamState) -> Self {
        Self {
            home,
            away,
            energy: EnergyMap::new(),
            streaks: StreakMap::new(),
            score: [0, 0],
            period_scores: Vec::new(),
            plays: Vec::new(),
        }
    }

    #[must_use]
    pub const fn team(&self, side: Side) -> &TeamState {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub const fn team_mut(&mut self, side: Side) -> &mut TeamState {
        match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }

    /// Borrow the attacking and defending teams at once.
    pub const fn split_mut(&mut self, offense: Side) -> (&mut TeamState, &mut TeamState) {
        match offense {
            Side::Home => (&mut self.home, &mut self.away),
            Side::Away => (&mut self.away, &mut self.home),
        }
    }

    #[must_use]
    pub const fn schemes(&self) -> ActiveSchemes {
        ActiveSchemes {
            home: self.home.scheme,
            away: self.away.scheme,
        }
    }

    /// Energy of both floors as written into play records.
    #[must_use]
    pub fn court_energy(&self) -> CourtEnergy {
        CourtEnergy::from_snapshots(
            &self.energy.snapshot(&self.home.on_court),
            &self.energy.snapshot(&self.away.on_court),
        )
    }

    #[must_use]
    pub fn average_energy(&self, side: Side) -> f64 {
        self.energy.average(&self.team(side).on_court)
    }

    /// Credit points to a side in the running total and the period table.
    pub fn add_points(&mut self, side: Side, period: u8, points: u8) {
        let points = u32::from(points);
        self.score[side.index()] += points;
        let slot = usize::from(period.max(1)) - 1;
        if self.period_scores.len() <= slot {
            self.period_scores.resize(slot + 1, [0, 0]);
        }
        self.period_scores[slot][side.index()] += points;
    }

    /// Make sure the period table has a row for `period`, even when scoreless.
    pub fn open_period(&mut self, period: u8) {
        let len = usize::from(period.max(1));
        if self.period_scores.len() < len {
            self.period_scores.resize(len, [0, 0]);
        }
    }

    /// Set a full tank for everyone on both rosters.
    pub fn fill_energy(&mut self, value: f64) {
        let ids: Vec<PlayerId> = self
            .home
            .roster()
            .chain(self.away.roster())
            .map(|p| p.id)
            .collect();
        for id in ids {
            self.energy.set(id, value);
        }
    }
}
