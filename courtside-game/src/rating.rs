//! Rating and positional mismatch model.
use serde::{Deserialize, Serialize};

use crate::constants::POSITIONAL_MULTIPLIERS;
use crate::energy::{EnergyMap, energy_performance_multiplier};
use crate::numbers::usize_to_f64;
use crate::player::{Player, Position};

/// Multiplier applied when a player occupies `assigned_slot`.
///
/// Eligible slots get 1.00; otherwise the smallest index distance from any eligible
/// position maps to 0.85 / 0.65 / 0.45 / 0.20. Missing inputs fall back to 1.00.
#[must_use]
pub fn positional_multiplier(
    natural_position: Option<Position>,
    assigned_slot: Option<Position>,
    eligible_positions: &[Position],
) -> f64 {
    let Some(slot) = assigned_slot else {
        return 1.0;
    };
    let natural = natural_position.as_slice();
    let pool = if eligible_positions.is_empty() {
        natural
    } else {
        eligible_positions
    };
    let Some(distance) = pool.iter().map(|pos| pos.distance(slot)).min() else {
        return 1.0;
    };
    POSITIONAL_MULTIPLIERS
        .get(distance)
        .copied()
        .unwrap_or(POSITIONAL_MULTIPLIERS[POSITIONAL_MULTIPLIERS.len() - 1])
}

/// Positional multiplier for a player in their current slot.
#[must_use]
pub fn player_positional_multiplier(player: &Player) -> f64 {
    positional_multiplier(
        Some(player.position),
        Some(player.slot()),
        player.eligible(),
    )
}

/// Average fatigue-adjusted defense rating of the players on the floor.
#[must_use]
pub fn team_defense_rating(defenders: &[Player], energy: &EnergyMap) -> f64 {
    if defenders.is_empty() {
        return 0.0;
    }
    let total: f64 = defenders
        .iter()
        .map(|p| p.defense_rating * energy_performance_multiplier(energy.get(p.id)))
        .sum();
    total / usize_to_f64(defenders.len())
}

/// Live effective rating for display layers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveRating {
    pub offense: f64,
    pub defense: f64,
    pub positional_multiplier: f64,
    pub energy_multiplier: f64,
}

/// Offense/defense rating after fatigue and slot mismatch.
#[must_use]
pub fn effective_rating(player: &Player, energy: f64) -> EffectiveRating {
    let positional = player_positional_multiplier(player);
    let energy_mult = energy_performance_multiplier(energy);
    EffectiveRating {
        offense: player.offense_rating * positional * energy_mult,
        defense: player.defense_rating * positional * energy_mult,
        positional_multiplier: positional,
        energy_multiplier: energy_mult,
    }
}
