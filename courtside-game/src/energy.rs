//! Energy / fatigue model: per-player stamina pools and the multipliers they drive.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::{
    ATTACKER_MADE_SHOT_DRAIN, ATTACKER_ROLE_DRAIN, ATTACKER_STRIPPED_DRAIN,
    ATTACKER_TURNOVER_DRAIN, DEFENDER_DISRUPTION_DRAIN, DEFENDER_ROLE_DRAIN, DRAIN_BASE,
    DRAIN_FLOOR, DRAIN_MINUTES_WEIGHT, ENERGY_EXHAUSTED_MULTIPLIER, ENERGY_MAX, ENERGY_MIN,
    ENERGY_TIERS, REGULATION_MINUTES,
};
use crate::numbers::usize_to_f64;
use crate::player::{Player, PlayerId};

/// Snapshot of energy values keyed by player id.
pub type EnergySnapshot = BTreeMap<PlayerId, f64>;

/// Mutable stamina pool for every player touched by one simulation call.
///
/// Values stay inside `[0, 100]`; players never seen default to a full tank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnergyMap {
    values: BTreeMap<PlayerId, f64>,
}

impl EnergyMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from an existing snapshot, clamping every value into range.
    #[must_use]
    pub fn from_snapshot(snapshot: &EnergySnapshot) -> Self {
        let mut map = Self::new();
        for (&id, &value) in snapshot {
            map.set(id, value);
        }
        map
    }

    #[must_use]
    pub fn get(&self, id: PlayerId) -> f64 {
        self.values.get(&id).copied().unwrap_or(ENERGY_MAX)
    }

    #[must_use]
    pub fn contains(&self, id: PlayerId) -> bool {
        self.values.contains_key(&id)
    }

    /// Explicit assignment (fresh game, substitution reset, resume entry).
    pub fn set(&mut self, id: PlayerId, value: f64) {
        let value = if value.is_finite() {
            value.clamp(ENERGY_MIN, ENERGY_MAX)
        } else {
            ENERGY_MAX
        };
        self.values.insert(id, value);
    }

    /// Subtract a non-negative amount, flooring at zero. Returns the new value.
    pub fn drain(&mut self, id: PlayerId, amount: f64) -> f64 {
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        let next = (self.get(id) - amount).max(ENERGY_MIN);
        self.values.insert(id, next);
        next
    }

    /// Copy the values for the given players, in id order.
    #[must_use]
    pub fn snapshot<'a>(&self, players: impl IntoIterator<Item = &'a Player>) -> EnergySnapshot {
        players
            .into_iter()
            .map(|p| (p.id, self.get(p.id)))
            .collect()
    }

    /// Mean energy across the given players (100 for an empty group).
    #[must_use]
    pub fn average<'a>(&self, players: impl IntoIterator<Item = &'a Player>) -> f64 {
        let mut total = 0.0;
        let mut count = 0_usize;
        for player in players {
            total += self.get(player.id);
            count += 1;
        }
        if count == 0 {
            ENERGY_MAX
        } else {
            total / usize_to_f64(count)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, f64)> + '_ {
        self.values.iter().map(|(&id, &value)| (id, value))
    }
}

/// Per-unit drain rate: heavier-minutes players drain slower.
#[must_use]
pub fn drain_rate(player: &Player) -> f64 {
    let minutes = player.averages.minutes;
    let minutes = if minutes.is_finite() { minutes.max(0.0) } else { 0.0 };
    (DRAIN_BASE - (minutes / REGULATION_MINUTES) * DRAIN_MINUTES_WEIGHT).max(DRAIN_FLOOR)
}

/// Step-function performance multiplier derived from remaining energy.
#[must_use]
pub fn energy_performance_multiplier(energy: f64) -> f64 {
    ENERGY_TIERS
        .iter()
        .find(|(threshold, _)| energy >= *threshold)
        .map_or(ENERGY_EXHAUSTED_MULTIPLIER, |(_, mult)| *mult)
}

/// Event flags that decide the drain add-ons for one possession.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainEvent {
    /// Attacker made a non-free-throw field goal.
    pub made_field_goal: bool,
    pub turnover: bool,
    /// Attacker was stripped (steal) or had the shot blocked.
    pub stripped: bool,
}

/// Energy removed from the two acting players on one possession.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PossessionDrain {
    pub attacker: f64,
    pub defender: f64,
}

/// Compute role drain plus event add-ons; defender drain is scaled by the defensive scheme.
#[must_use]
pub fn possession_drain(
    attacker_rate: f64,
    defender_rate: f64,
    event: DrainEvent,
    defender_scheme_multiplier: f64,
) -> PossessionDrain {
    let mut attacker = attacker_rate * ATTACKER_ROLE_DRAIN;
    if event.made_field_goal {
        attacker += attacker_rate * ATTACKER_MADE_SHOT_DRAIN;
    }
    if event.turnover {
        attacker += attacker_rate * ATTACKER_TURNOVER_DRAIN;
    }
    if event.stripped {
        attacker += attacker_rate * ATTACKER_STRIPPED_DRAIN;
    }
    let mut defender = defender_rate * DEFENDER_ROLE_DRAIN;
    if event.stripped {
        defender += defender_rate * DEFENDER_DISRUPTION_DRAIN;
    }
    PossessionDrain {
        attacker,
        defender: defender * defender_scheme_multiplier,
    }
}

/// Apply one possession worth of fatigue to all ten players on the floor.
pub fn apply_possession_drain<'a>(
    energy: &mut EnergyMap,
    attacker: &Player,
    defender: &Player,
    on_court: impl IntoIterator<Item = &'a Player>,
    event: DrainEvent,
    defender_scheme_multiplier: f64,
    passive: f64,
) {
    let drain = possession_drain(
        drain_rate(attacker),
        drain_rate(defender),
        event,
        defender_scheme_multiplier,
    );
    energy.drain(attacker.id, drain.attacker);
    energy.drain(defender.id, drain.defender);
    for player in on_court {
        if player.id != attacker.id && player.id != defender.id {
            energy.drain(player.id, passive);
        }
    }
}
