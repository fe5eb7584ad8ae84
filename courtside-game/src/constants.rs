//! Centralized balance and tuning constants for the Courtside simulation.

// Positional mismatch -------------------------------------------------------
pub(crate) const POSITIONAL_MULTIPLIERS: [f64; 5] = [1.00, 0.85, 0.65, 0.45, 0.20];

// Energy / fatigue ----------------------------------------------------------
pub(crate) const ENERGY_MAX: f64 = 100.0;
pub(crate) const ENERGY_MIN: f64 = 0.0;
pub(crate) const DRAIN_BASE: f64 = 2.5;
pub(crate) const DRAIN_MINUTES_WEIGHT: f64 = 2.0;
pub(crate) const DRAIN_FLOOR: f64 = 0.55;
pub(crate) const REGULATION_MINUTES: f64 = 40.0;
pub(crate) const ATTACKER_ROLE_DRAIN: f64 = 2.5;
pub(crate) const DEFENDER_ROLE_DRAIN: f64 = 2.0;
pub(crate) const ATTACKER_MADE_SHOT_DRAIN: f64 = 2.0;
pub(crate) const ATTACKER_TURNOVER_DRAIN: f64 = 1.0;
pub(crate) const ATTACKER_STRIPPED_DRAIN: f64 = 1.5;
pub(crate) const DEFENDER_DISRUPTION_DRAIN: f64 = 3.0;
pub(crate) const ENERGY_TIERS: [(f64, f64); 3] = [(70.0, 1.00), (50.0, 0.85), (30.0, 0.68)];
pub(crate) const ENERGY_EXHAUSTED_MULTIPLIER: f64 = 0.50;

// Streaks / zones -----------------------------------------------------------
pub(crate) const FIRE_STREAK: i32 = 5;
pub(crate) const HOT_STREAK: i32 = 3;
pub(crate) const COLD_STREAK: i32 = -3;
pub(crate) const FROZEN_STREAK: i32 = -5;
pub(crate) const FIRE_MULTIPLIER: f64 = 1.30;
pub(crate) const HOT_MULTIPLIER: f64 = 1.15;
pub(crate) const COLD_MULTIPLIER: f64 = 0.85;
pub(crate) const FROZEN_MULTIPLIER: f64 = 0.75;

// Usage ---------------------------------------------------------------------
pub(crate) const USAGE_FTA_WEIGHT: f64 = 0.44;
pub(crate) const USAGE_FLOOR: f64 = 4.0;
pub(crate) const ISOLATION_TOP_USAGE_BOOST: f64 = 1.8;
pub(crate) const THREE_HEAVY_VOLUME_BOOST: f64 = 1.5;

// Possession model ----------------------------------------------------------
pub(crate) const TURNOVER_RATE: f64 = 0.042;
pub(crate) const TURNOVER_MISMATCH_WEIGHT: f64 = 2.0;
pub(crate) const STEAL_CREDIT_RATE: f64 = 0.12;
pub(crate) const FREE_THROW_TRIP_SHARE: f64 = 0.5;
pub(crate) const FREE_THROW_RATE_CAP: f64 = 0.22;
pub(crate) const THREE_RATE_CAP: f64 = 0.70;
pub(crate) const FREE_THROW_ATTEMPTS_PER_TRIP: u8 = 2;
pub(crate) const FREE_THROW_MIN_CHANCE: f64 = 0.45;
pub(crate) const FREE_THROW_MAX_CHANCE: f64 = 0.95;
pub(crate) const FALLBACK_FG_PCT: f64 = 0.33;
pub(crate) const FALLBACK_FT_PCT: f64 = 0.70;
pub(crate) const THREE_CONVERSION_CHANCE: f64 = 0.40;
pub(crate) const POWER_JITTER_MIN: f64 = 0.7;
pub(crate) const POWER_JITTER_MAX: f64 = 1.3;
pub(crate) const DEFENSE_WEIGHT_IN_MATCHUP: f64 = 0.55;
pub(crate) const THREE_MATCHUP_SCALE: f64 = 1.10;
pub(crate) const TWO_MATCHUP_SCALE: f64 = 1.45;
pub(crate) const THREE_HIT_BOUNDS: (f64, f64) = (0.15, 0.55);
pub(crate) const TWO_HIT_BOUNDS: (f64, f64) = (0.20, 0.80);
pub(crate) const BLOCK_RATE: f64 = 0.07;
pub(crate) const OFFENSIVE_REBOUND_RATE: f64 = 0.03;
pub(crate) const DEFENSIVE_REBOUND_CHANCE: f64 = 0.70;
pub(crate) const MIN_POWER: f64 = 1.0;

// Assists -------------------------------------------------------------------
pub(crate) const ASSIST_BASE_CHANCE: f64 = 0.60;
pub(crate) const ASSIST_CHANCE_BOUNDS: (f64, f64) = (0.10, 0.92);
pub(crate) const POINT_GUARD_ASSIST_WEIGHT: f64 = 1.5;
pub(crate) const ASSIST_WEIGHT_FLOOR: f64 = 0.5;

// Opponent policy -----------------------------------------------------------
pub(crate) const POLICY_ZONE_LEAD: i32 = 10;
pub(crate) const POLICY_ZONE_ENERGY: f64 = 50.0;
pub(crate) const POLICY_PRESSURE_DEFICIT: i32 = 8;
pub(crate) const POLICY_PRESSURE_PERIOD: u8 = 4;
pub(crate) const POLICY_ISOLATION_DEFICIT: i32 = 10;
pub(crate) const POLICY_BALL_MOVEMENT_LEAD: i32 = 15;
pub(crate) const POLICY_THREE_HEAVY_LAST_PERIOD: u8 = 2;
pub(crate) const POLICY_THREE_HEAVY_ENERGY: f64 = 75.0;
