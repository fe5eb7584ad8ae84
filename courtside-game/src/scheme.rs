//! Offensive and defensive schemes plus the opponent scheme policy.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    ASSIST_BASE_CHANCE, ASSIST_CHANCE_BOUNDS, ISOLATION_TOP_USAGE_BOOST, POLICY_BALL_MOVEMENT_LEAD,
    POLICY_ISOLATION_DEFICIT, POLICY_PRESSURE_DEFICIT, POLICY_PRESSURE_PERIOD,
    POLICY_THREE_HEAVY_ENERGY, POLICY_THREE_HEAVY_LAST_PERIOD, POLICY_ZONE_ENERGY, POLICY_ZONE_LEAD,
    THREE_CONVERSION_CHANCE, THREE_HEAVY_VOLUME_BOOST,
};
use crate::numbers::margin;

/// Closed catalog of offensive schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OffenseScheme {
    #[default]
    Isolation,
    BallMovement,
    ThreeHeavy,
}

/// Shape of the attacker-selection weight distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UsageShape {
    /// Single highest-usage teammate gets the boost.
    TopHeavy { boost: f64 },
    /// Usage ignored; only energy matters.
    Flat,
    /// Usage weighted further by three-point attempt share.
    VolumeThree { boost: f64 },
}

/// Behavioral parameters of an offensive scheme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffenseParams {
    pub usage_shape: UsageShape,
    pub assist_multiplier: f64,
    /// Chance to upgrade a two-point attempt into a three (0 when inactive).
    pub three_conversion_chance: f64,
}

impl OffenseScheme {
    pub const ALL: [Self; 3] = [Self::Isolation, Self::BallMovement, Self::ThreeHeavy];

    #[must_use]
    pub const fn params(self) -> OffenseParams {
        match self {
            Self::Isolation => OffenseParams {
                usage_shape: UsageShape::TopHeavy {
                    boost: ISOLATION_TOP_USAGE_BOOST,
                },
                assist_multiplier: 0.75,
                three_conversion_chance: 0.0,
            },
            Self::BallMovement => OffenseParams {
                usage_shape: UsageShape::Flat,
                assist_multiplier: 1.35,
                three_conversion_chance: 0.0,
            },
            Self::ThreeHeavy => OffenseParams {
                usage_shape: UsageShape::VolumeThree {
                    boost: THREE_HEAVY_VOLUME_BOOST,
                },
                assist_multiplier: 1.0,
                three_conversion_chance: THREE_CONVERSION_CHANCE,
            },
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Isolation => "isolation",
            Self::BallMovement => "ball_movement",
            Self::ThreeHeavy => "three_heavy",
        }
    }
}

impl OffenseParams {
    /// Probability a made field goal is credited with an assist.
    #[must_use]
    pub fn assist_chance(&self) -> f64 {
        let (low, high) = ASSIST_CHANCE_BOUNDS;
        (ASSIST_BASE_CHANCE * self.assist_multiplier).clamp(low, high)
    }

    /// Selection weight for one teammate before normalization.
    #[must_use]
    pub fn usage_weight(
        &self,
        usage: f64,
        three_share: f64,
        is_top_usage: bool,
        energy_multiplier: f64,
    ) -> f64 {
        let shaped = match self.usage_shape {
            UsageShape::TopHeavy { boost } => {
                if is_top_usage {
                    usage * boost
                } else {
                    usage
                }
            }
            UsageShape::Flat => 1.0,
            UsageShape::VolumeThree { boost } => usage * (1.0 + boost * three_share),
        };
        shaped * energy_multiplier
    }
}

/// Closed catalog of defensive schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DefenseScheme {
    #[default]
    ManToMan,
    Zone,
    Pressure,
}

/// Behavioral parameters of a defensive scheme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefenseParams {
    /// How hard the defense punishes an attacker playing out of position.
    pub mismatch_penalty: f64,
    /// Replace the individual matchup with the team-average defense.
    pub team_defense: bool,
    pub opponent_turnover_multiplier: f64,
    pub defender_drain_multiplier: f64,
}

impl DefenseParams {
    /// Defender power scale derived from the attacker's positional multiplier.
    #[must_use]
    pub fn mismatch_scale(&self, attacker_positional_multiplier: f64) -> f64 {
        1.0 + self.mismatch_penalty * (1.0 - attacker_positional_multiplier).max(0.0)
    }
}

impl DefenseScheme {
    pub const ALL: [Self; 3] = [Self::ManToMan, Self::Zone, Self::Pressure];

    #[must_use]
    pub const fn params(self) -> DefenseParams {
        match self {
            Self::ManToMan => DefenseParams {
                mismatch_penalty: 0.5,
                team_defense: false,
                opponent_turnover_multiplier: 1.0,
                defender_drain_multiplier: 1.0,
            },
            // Zone never reads the individual matchup.
            Self::Zone => DefenseParams {
                mismatch_penalty: 0.0,
                team_defense: true,
                opponent_turnover_multiplier: 1.0,
                defender_drain_multiplier: 1.0,
            },
            Self::Pressure => DefenseParams {
                mismatch_penalty: 0.75,
                team_defense: false,
                opponent_turnover_multiplier: 1.25,
                defender_drain_multiplier: 1.15,
            },
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ManToMan => "man_to_man",
            Self::Zone => "zone",
            Self::Pressure => "pressure",
        }
    }
}

/// The scheme a team runs on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct SchemePair {
    pub offense: OffenseScheme,
    pub defense: DefenseScheme,
}

impl SchemePair {
    #[must_use]
    pub const fn new(offense: OffenseScheme, defense: DefenseScheme) -> Self {
        Self { offense, defense }
    }
}

impl fmt::Display for SchemePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.offense.as_str(), self.defense.as_str())
    }
}

/// Opponent scheme decision table, evaluated from the opponent's point of view.
#[must_use]
pub fn evaluate_scheme(
    my_score: u32,
    opponent_score: u32,
    period: u8,
    avg_energy: f64,
) -> SchemePair {
    let lead = margin(my_score, opponent_score);

    let defense = if lead > POLICY_ZONE_LEAD || avg_energy < POLICY_ZONE_ENERGY {
        DefenseScheme::Zone
    } else if -lead > POLICY_PRESSURE_DEFICIT && period >= POLICY_PRESSURE_PERIOD {
        DefenseScheme::Pressure
    } else {
        DefenseScheme::ManToMan
    };

    let offense = if -lead > POLICY_ISOLATION_DEFICIT {
        OffenseScheme::Isolation
    } else if lead > POLICY_BALL_MOVEMENT_LEAD {
        OffenseScheme::BallMovement
    } else if period <= POLICY_THREE_HEAVY_LAST_PERIOD && avg_energy > POLICY_THREE_HEAVY_ENERGY {
        OffenseScheme::ThreeHeavy
    } else {
        OffenseScheme::Isolation
    };

    SchemePair { offense, defense }
}
