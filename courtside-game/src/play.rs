//! Append-only play records emitted by the driver and consumed by resume.
use serde::{Deserialize, Serialize};

use crate::box_score::Participant;
use crate::constants::FREE_THROW_ATTEMPTS_PER_TRIP;
use crate::energy::EnergySnapshot;
use crate::player::{Player, PlayerId, Position, Side};
use crate::possession::{Outcome, ShotType, SpecialEvent};
use crate::scheme::SchemePair;
use crate::streak::Zone;

/// Cumulative `[home, away]` points.
pub type ScoreSnapshot = [u32; 2];

/// Bilingual human-readable line attached to every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub en: String,
    pub zh: String,
}

/// Lightweight player reference frozen into a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: PlayerId,
    pub name: String,
    /// Slot the player occupied when the record was written.
    pub slot: Position,
}

impl From<&Player> for PlayerRef {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            slot: player.slot(),
        }
    }
}

impl<'a> From<&'a PlayerRef> for Participant<'a> {
    fn from(player: &'a PlayerRef) -> Self {
        Self {
            id: player.id,
            name: &player.name,
        }
    }
}

/// One entry of an on-court energy snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerEnergy {
    pub player: PlayerId,
    pub energy: f64,
}

/// Energy of the ten players on the floor, split by side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourtEnergy {
    pub home: Vec<PlayerEnergy>,
    pub away: Vec<PlayerEnergy>,
}

impl CourtEnergy {
    #[must_use]
    pub fn from_snapshots(home: &EnergySnapshot, away: &EnergySnapshot) -> Self {
        let convert = |snapshot: &EnergySnapshot| {
            snapshot
                .iter()
                .map(|(&player, &energy)| PlayerEnergy { player, energy })
                .collect()
        };
        Self {
            home: convert(home),
            away: convert(away),
        }
    }

    #[must_use]
    pub fn side(&self, side: Side) -> &[PlayerEnergy] {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    #[must_use]
    pub fn snapshot(&self, side: Side) -> EnergySnapshot {
        self.side(side)
            .iter()
            .map(|entry| (entry.player, entry.energy))
            .collect()
    }

    /// Ids on the floor for one side, in snapshot order.
    pub fn on_court(&self, side: Side) -> impl Iterator<Item = PlayerId> + '_ {
        self.side(side).iter().map(|entry| entry.player)
    }
}

/// Schemes in force for both sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSchemes {
    pub home: SchemePair,
    pub away: SchemePair,
}

impl ActiveSchemes {
    #[must_use]
    pub const fn side(&self, side: Side) -> SchemePair {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }
}

/// One team's offensive attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PossessionRecord {
    pub period: u8,
    /// Zero-based index within the period, counting both sides.
    pub possession: u16,
    pub team: Side,
    pub attacker: PlayerRef,
    pub defender: PlayerRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assister: Option<PlayerRef>,
    pub turnover: bool,
    pub made: bool,
    pub points: u8,
    pub shot_type: Option<ShotType>,
    pub special_event: Option<SpecialEvent>,
    #[serde(default)]
    pub free_throws_made: u8,
    #[serde(default)]
    pub defensive_rebound: bool,
    #[serde(default)]
    pub converted_three: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit_chance: Option<f64>,
    /// Post-possession energy of the attacker and defender.
    pub attacker_energy: f64,
    pub defender_energy: f64,
    /// Attacker's streak after this possession.
    pub streak: i32,
    pub zone: Zone,
    pub zone_entered: bool,
    pub schemes: ActiveSchemes,
    pub score: ScoreSnapshot,
    pub energy: CourtEnergy,
    pub description: Description,
}

impl PossessionRecord {
    /// Rebuild the simulator outcome this record was written from.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        if self.turnover {
            return Outcome::Turnover {
                steal: self.special_event == Some(SpecialEvent::Steal),
            };
        }
        match self.shot_type {
            Some(ShotType::FreeThrow) => Outcome::FreeThrows {
                attempts: FREE_THROW_ATTEMPTS_PER_TRIP,
                made: self.free_throws_made,
            },
            shot => Outcome::FieldGoal {
                shot: shot.unwrap_or(ShotType::Two),
                made: self.made,
                hit_chance: self.hit_chance.unwrap_or_default(),
                converted: self.converted_three,
                block: self.special_event == Some(SpecialEvent::Block),
                offensive_rebound: self.special_event == Some(SpecialEvent::OffensiveRebound),
                defensive_rebound: self.defensive_rebound,
            },
        }
    }
}

/// Player swap between bench and floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstitutionRecord {
    /// Quarter-boundary swaps carry the upcoming period; resume-seam swaps the paused one.
    pub period: u8,
    pub team: Side,
    pub player_in: PlayerRef,
    pub player_out: PlayerRef,
    pub schemes: ActiveSchemes,
    pub score: ScoreSnapshot,
    pub energy: CourtEnergy,
    pub description: Description,
}

/// Unit of engine output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayRecord {
    Possession(PossessionRecord),
    Substitution(SubstitutionRecord),
}

impl PlayRecord {
    #[must_use]
    pub const fn period(&self) -> u8 {
        match self {
            Self::Possession(p) => p.period,
            Self::Substitution(s) => s.period,
        }
    }

    #[must_use]
    pub const fn team(&self) -> Side {
        match self {
            Self::Possession(p) => p.team,
            Self::Substitution(s) => s.team,
        }
    }

    #[must_use]
    pub const fn score(&self) -> ScoreSnapshot {
        match self {
            Self::Possession(p) => p.score,
            Self::Substitution(s) => s.score,
        }
    }

    #[must_use]
    pub const fn energy(&self) -> &CourtEnergy {
        match self {
            Self::Possession(p) => &p.energy,
            Self::Substitution(s) => &s.energy,
        }
    }

    #[must_use]
    pub const fn schemes(&self) -> ActiveSchemes {
        match self {
            Self::Possession(p) => p.schemes,
            Self::Substitution(s) => s.schemes,
        }
    }

    #[must_use]
    pub const fn description(&self) -> &Description {
        match self {
            Self::Possession(p) => &p.description,
            Self::Substitution(s) => &s.description,
        }
    }

    #[must_use]
    pub const fn as_possession(&self) -> Option<&PossessionRecord> {
        match self {
            Self::Possession(p) => Some(p),
            Self::Substitution(_) => None,
        }
    }

    #[must_use]
    pub const fn as_substitution(&self) -> Option<&SubstitutionRecord> {
        match self {
            Self::Possession(_) => None,
            Self::Substitution(s) => Some(s),
        }
    }

    #[must_use]
    pub const fn is_possession(&self) -> bool {
        matches!(self, Self::Possession(_))
    }
}
