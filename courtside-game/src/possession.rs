//! Possession simulator: the atomic stochastic unit of the engine.
//!
//! `simulate_one` is a pure function of its context and the random stream it is
//! handed; it never touches energy, streak or box-score state.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    BLOCK_RATE, DEFENSE_WEIGHT_IN_MATCHUP, DEFENSIVE_REBOUND_CHANCE, FREE_THROW_ATTEMPTS_PER_TRIP,
    FREE_THROW_MAX_CHANCE, FREE_THROW_MIN_CHANCE, FREE_THROW_RATE_CAP, FREE_THROW_TRIP_SHARE,
    MIN_POWER, OFFENSIVE_REBOUND_RATE, POWER_JITTER_MAX, POWER_JITTER_MIN, STEAL_CREDIT_RATE,
    THREE_HIT_BOUNDS, THREE_MATCHUP_SCALE, THREE_RATE_CAP, TURNOVER_MISMATCH_WEIGHT,
    TURNOVER_RATE, TWO_HIT_BOUNDS, TWO_MATCHUP_SCALE,
};
use crate::energy::{DrainEvent, energy_performance_multiplier};
use crate::numbers::ratio_or;
use crate::player::Player;
use crate::rating::player_positional_multiplier;
use crate::scheme::{DefenseScheme, OffenseScheme};

/// Shot classification carried on play records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotType {
    #[serde(rename = "2pt")]
    Two,
    #[serde(rename = "3pt")]
    Three,
    #[serde(rename = "FT")]
    FreeThrow,
}

impl ShotType {
    #[must_use]
    pub const fn points(self) -> u8 {
        match self {
            Self::Two => 2,
            Self::Three => 3,
            Self::FreeThrow => 1,
        }
    }
}

/// Secondary event attached to a possession.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialEvent {
    Steal,
    Block,
    #[serde(rename = "off_reb")]
    OffensiveRebound,
}

/// Everything the simulator needs to resolve one possession.
#[derive(Debug, Clone, Copy)]
pub struct PossessionContext<'a> {
    pub attacker: &'a Player,
    pub defender: &'a Player,
    pub attacker_energy: f64,
    pub defender_energy: f64,
    pub zone_multiplier: f64,
    pub offense: OffenseScheme,
    pub defense: DefenseScheme,
    /// Team-average defense rating used when the defensive scheme plays zone.
    pub team_defense: Option<f64>,
}

/// Resolved result of one possession. Exactly one variant per call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Turnover {
        steal: bool,
    },
    FieldGoal {
        shot: ShotType,
        made: bool,
        hit_chance: f64,
        /// Two-point look upgraded to a three by the offensive scheme.
        converted: bool,
        block: bool,
        offensive_rebound: bool,
        defensive_rebound: bool,
    },
    FreeThrows {
        attempts: u8,
        made: u8,
    },
}

impl Outcome {
    #[must_use]
    pub const fn is_turnover(&self) -> bool {
        matches!(self, Self::Turnover { .. })
    }

    /// Made field goal, or at least one free throw converted.
    #[must_use]
    pub const fn is_made(&self) -> bool {
        match self {
            Self::Turnover { .. } => false,
            Self::FieldGoal { made, .. } => *made,
            Self::FreeThrows { made, .. } => *made > 0,
        }
    }

    #[must_use]
    pub const fn points(&self) -> u8 {
        match self {
            Self::Turnover { .. } => 0,
            Self::FieldGoal { shot, made, .. } => {
                if *made {
                    shot.points()
                } else {
                    0
                }
            }
            Self::FreeThrows { made, .. } => *made,
        }
    }

    #[must_use]
    pub const fn shot_type(&self) -> Option<ShotType> {
        match self {
            Self::Turnover { .. } => None,
            Self::FieldGoal { shot, .. } => Some(*shot),
            Self::FreeThrows { .. } => Some(ShotType::FreeThrow),
        }
    }

    #[must_use]
    pub const fn special_event(&self) -> Option<SpecialEvent> {
        match self {
            Self::Turnover { steal: true } => Some(SpecialEvent::Steal),
            Self::FieldGoal { block: true, .. } => Some(SpecialEvent::Block),
            Self::FieldGoal {
                offensive_rebound: true,
                ..
            } => Some(SpecialEvent::OffensiveRebound),
            _ => None,
        }
    }

    #[must_use]
    pub const fn free_throws_made(&self) -> u8 {
        match self {
            Self::FreeThrows { made, .. } => *made,
            _ => 0,
        }
    }

    #[must_use]
    pub const fn defensive_rebound(&self) -> bool {
        matches!(
            self,
            Self::FieldGoal {
                defensive_rebound: true,
                ..
            }
        )
    }

    #[must_use]
    pub const fn converted_three(&self) -> bool {
        matches!(
            self,
            Self::FieldGoal {
                converted: true,
                ..
            }
        )
    }

    #[must_use]
    pub const fn hit_chance(&self) -> Option<f64> {
        match self {
            Self::FieldGoal { hit_chance, .. } => Some(*hit_chance),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_made_field_goal(&self) -> bool {
        matches!(self, Self::FieldGoal { made: true, .. })
    }

    /// Streak input: `Some(success)` for non-free-throw outcomes, `None` for free throws.
    #[must_use]
    pub const fn streak_result(&self) -> Option<bool> {
        match self {
            Self::Turnover { .. } => Some(false),
            Self::FieldGoal { made, .. } => Some(*made),
            Self::FreeThrows { .. } => None,
        }
    }

    /// Flags that drive the fatigue add-ons for this outcome.
    #[must_use]
    pub const fn drain_event(&self) -> DrainEvent {
        match self {
            Self::Turnover { steal } => DrainEvent {
                made_field_goal: false,
                turnover: true,
                stripped: *steal,
            },
            Self::FieldGoal { made, block, .. } => DrainEvent {
                made_field_goal: *made,
                turnover: false,
                stripped: *block,
            },
            Self::FreeThrows { .. } => DrainEvent {
                made_field_goal: false,
                turnover: false,
                stripped: false,
            },
        }
    }
}

/// Probability the attacker coughs the ball up.
#[must_use]
pub fn turnover_chance(attacker: &Player, attacker_positional: f64, defense: DefenseScheme) -> f64 {
    attacker.averages.turnovers.max(0.0)
        * TURNOVER_RATE
        * (1.0 + TURNOVER_MISMATCH_WEIGHT * (1.0 - attacker_positional))
        * defense.params().opponent_turnover_multiplier
}

/// Probability a turnover is credited to the defender as a steal.
#[must_use]
pub fn steal_credit_chance(defender: &Player, defender_positional: f64) -> f64 {
    (defender.averages.steals.max(0.0) * defender_positional * STEAL_CREDIT_RATE).clamp(0.0, 1.0)
}

/// Free-throw trip rate and three-point share of shot attempts.
#[must_use]
pub fn shot_mix(attacker: &Player) -> (f64, f64) {
    let a = &attacker.averages;
    // One trip is two attempts.
    let ft_rate =
        (ratio_or(a.fta, a.fga, 0.0) * FREE_THROW_TRIP_SHARE).clamp(0.0, FREE_THROW_RATE_CAP);
    let three_rate = attacker.three_attempt_share().min(THREE_RATE_CAP);
    (ft_rate, three_rate)
}

/// Make probability for a field goal given the two sides' power.
#[must_use]
pub fn hit_chance(make_pct: f64, attacker_power: f64, defender_power: f64, shot: ShotType) -> f64 {
    let denominator = attacker_power + DEFENSE_WEIGHT_IN_MATCHUP * defender_power;
    let matchup = if denominator > 0.0 {
        attacker_power / denominator
    } else {
        0.5
    };
    let (scale, (low, high)) = match shot {
        ShotType::Three => (THREE_MATCHUP_SCALE, THREE_HIT_BOUNDS),
        ShotType::Two | ShotType::FreeThrow => (TWO_MATCHUP_SCALE, TWO_HIT_BOUNDS),
    };
    let chance = make_pct * matchup * scale;
    if chance.is_finite() {
        chance.clamp(low, high)
    } else {
        low
    }
}

fn jitter<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(POWER_JITTER_MIN..POWER_JITTER_MAX)
}

/// Resolve one possession.
pub fn simulate_one<R>(ctx: &PossessionContext<'_>, rng: &mut R) -> Outcome
where
    R: Rng + ?Sized,
{
    let attacker = ctx.attacker;
    let defender = ctx.defender;
    let attacker_positional = player_positional_multiplier(attacker);
    let defender_positional = player_positional_multiplier(defender);
    let defense = ctx.defense.params();

    if rng.r#gen::<f64>() < turnover_chance(attacker, attacker_positional, ctx.defense) {
        let steal = rng.r#gen::<f64>() < steal_credit_chance(defender, defender_positional);
        return Outcome::Turnover { steal };
    }

    let (ft_rate, three_rate) = shot_mix(attacker);
    let shot_roll = rng.r#gen::<f64>();
    if shot_roll < ft_rate {
        let chance = (attacker_positional.sqrt() * attacker.free_throw_pct())
            .clamp(FREE_THROW_MIN_CHANCE, FREE_THROW_MAX_CHANCE);
        let made = (0..FREE_THROW_ATTEMPTS_PER_TRIP)
            .filter(|_| rng.r#gen::<f64>() < chance)
            .count();
        return Outcome::FreeThrows {
            attempts: FREE_THROW_ATTEMPTS_PER_TRIP,
            made: u8::try_from(made).unwrap_or(FREE_THROW_ATTEMPTS_PER_TRIP),
        };
    }

    let mut shot = if shot_roll < ft_rate + (1.0 - ft_rate) * three_rate {
        ShotType::Three
    } else {
        ShotType::Two
    };
    let conversion = ctx.offense.params().three_conversion_chance;
    let mut converted = false;
    if shot == ShotType::Two && conversion > 0.0 && rng.r#gen::<f64>() < conversion {
        shot = ShotType::Three;
        converted = true;
    }

    let attacker_power = attacker.offense_rating.max(MIN_POWER)
        * energy_performance_multiplier(ctx.attacker_energy)
        * attacker_positional
        * ctx.zone_multiplier
        * jitter(rng);
    let defender_power = match ctx.team_defense {
        Some(team) if defense.team_defense => team.max(0.0) * jitter(rng),
        _ => {
            defender.defense_rating.max(0.0)
                * energy_performance_multiplier(ctx.defender_energy)
                * defender_positional
                * defense.mismatch_scale(attacker_positional)
                * jitter(rng)
        }
    };
    let make_pct = match shot {
        ShotType::Three => attacker.three_point_pct(),
        ShotType::Two | ShotType::FreeThrow => attacker.two_point_pct(),
    };
    let chance = hit_chance(make_pct, attacker_power, defender_power, shot);
    let made = rng.r#gen::<f64>() < chance;

    let mut block = false;
    let mut offensive_rebound = false;
    let mut defensive_rebound = false;
    if !made {
        let block_chance =
            (defender.averages.blocks.max(0.0) * defender_positional * BLOCK_RATE).clamp(0.0, 1.0);
        block = rng.r#gen::<f64>() < block_chance;
        if !block {
            let oreb_chance =
                (attacker.averages.rebounds.max(0.0) * OFFENSIVE_REBOUND_RATE).clamp(0.0, 1.0);
            offensive_rebound = rng.r#gen::<f64>() < oreb_chance;
        }
        if !offensive_rebound {
            defensive_rebound = rng.r#gen::<f64>() < DEFENSIVE_REBOUND_CHANCE;
        }
    }

    Outcome::FieldGoal {
        shot,
        made,
        hit_chance: chance,
        converted,
        block,
        offensive_rebound,
        defensive_rebound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{Position, StatLine};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn scorer() -> Player {
        Player::new(1, "Scorer", Position::SmallForward)
            .with_ratings(200.0, 80.0)
            .with_averages(StatLine {
                fga: 18.0,
                fgm: 9.0,
                fg3a: 6.0,
                fg3m: 2.0,
                fta: 6.0,
                ftm: 5.0,
                turnovers: 2.5,
                rebounds: 6.0,
                minutes: 34.0,
                ..StatLine::default()
            })
    }

    fn stopper() -> Player {
        Player::new(2, "Stopper", Position::SmallForward)
            .with_ratings(70.0, 60.0)
            .with_averages(StatLine {
                steals: 2.0,
                blocks: 1.0,
                ..StatLine::default()
            })
    }

    fn ctx<'a>(attacker: &'a Player, defender: &'a Player) -> PossessionContext<'a> {
        PossessionContext {
            attacker,
            defender,
            attacker_energy: 100.0,
            defender_energy: 100.0,
            zone_multiplier: 1.0,
            offense: OffenseScheme::Isolation,
            defense: DefenseScheme::ManToMan,
            team_defense: None,
        }
    }

    #[test]
    fn two_point_hit_chance_stays_in_bounds_for_lopsided_matchup() {
        let attacker = scorer();
        let defender = stopper();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..2_000 {
            let outcome = simulate_one(&ctx(&attacker, &defender), &mut rng);
            if let Outcome::FieldGoal {
                shot: ShotType::Two,
                hit_chance,
                ..
            } = outcome
            {
                assert!((0.20..=0.80).contains(&hit_chance), "hit chance {hit_chance}");
            }
        }
        let direct = hit_chance(attacker.two_point_pct(), 200.0, 60.0, ShotType::Two);
        assert!((0.20..=0.80).contains(&direct));
    }

    #[test]
    fn hit_chance_clamps_by_shot_type() {
        assert!((hit_chance(1.0, 1_000.0, 0.0, ShotType::Three) - 0.55).abs() < f64::EPSILON);
        assert!((hit_chance(0.05, 1.0, 1_000.0, ShotType::Three) - 0.15).abs() < f64::EPSILON);
        assert!((hit_chance(1.0, 1_000.0, 0.0, ShotType::Two) - 0.80).abs() < f64::EPSILON);
        assert!((hit_chance(0.0, 0.0, 0.0, ShotType::Two) - 0.20).abs() < f64::EPSILON);
    }

    #[test]
    fn outcome_accessors_are_consistent() {
        let attacker = scorer();
        let defender = stopper();
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let outcome = simulate_one(&ctx(&attacker, &defender), &mut rng);
            match outcome {
                Outcome::Turnover { .. } => {
                    assert!(outcome.is_turnover());
                    assert_eq!(outcome.points(), 0);
                    assert_eq!(outcome.streak_result(), Some(false));
                }
                Outcome::FieldGoal { made, shot, .. } => {
                    assert_eq!(outcome.points(), if made { shot.points() } else { 0 });
                    if made {
                        assert_eq!(outcome.special_event(), None);
                    }
                }
                Outcome::FreeThrows { attempts, made } => {
                    assert_eq!(attempts, 2);
                    assert!(made <= 2);
                    assert_eq!(outcome.streak_result(), None);
                    assert_eq!(outcome.shot_type(), Some(ShotType::FreeThrow));
                }
            }
        }
    }

    #[test]
    fn mismatch_raises_turnover_chance() {
        let attacker = scorer();
        let base = turnover_chance(&attacker, 1.0, DefenseScheme::ManToMan);
        let mismatched = turnover_chance(&attacker, 0.65, DefenseScheme::ManToMan);
        let pressed = turnover_chance(&attacker, 1.0, DefenseScheme::Pressure);
        assert!((base - 2.5 * 0.042).abs() < 1e-12);
        assert!((mismatched - base * 1.7).abs() < 1e-12);
        assert!((pressed - base * 1.25).abs() < 1e-12);
    }

    #[test]
    fn shot_mix_caps_rates() {
        let mut chucker = scorer();
        chucker.averages.fta = 20.0;
        chucker.averages.fg3a = 17.0;
        let (ft_rate, three_rate) = shot_mix(&chucker);
        assert!((ft_rate - 0.22).abs() < f64::EPSILON);
        assert!((three_rate - 0.70).abs() < f64::EPSILON);
        let empty = Player::new(5, "Empty", Position::Center);
        assert_eq!(shot_mix(&empty), (0.0, 0.0));
    }

    #[test]
    fn three_heavy_converts_some_twos() {
        let mut attacker = scorer();
        attacker.averages.fg3a = 0.0;
        attacker.averages.fg3m = 0.0;
        attacker.averages.fta = 0.0;
        attacker.averages.turnovers = 0.0;
        let defender = stopper();
        let mut context = ctx(&attacker, &defender);
        context.offense = OffenseScheme::ThreeHeavy;
        let mut rng = SmallRng::seed_from_u64(11);
        let mut threes = 0_u32;
        let samples = 4_000_u32;
        for _ in 0..samples {
            if let Outcome::FieldGoal {
                shot: ShotType::Three,
                converted,
                ..
            } = simulate_one(&context, &mut rng)
            {
                assert!(converted);
                threes += 1;
            }
        }
        let rate = f64::from(threes) / f64::from(samples);
        assert!((rate - 0.40).abs() < 0.03, "conversion rate {rate}");
    }
}
