//! Hot/cold streak state machine.
//!
//! Streaks count consecutive made (positive) or missed/turned-over (negative)
//! non-free-throw possessions. The zone derived from the streak scales the
//! player's next shot.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::{
    COLD_MULTIPLIER, COLD_STREAK, FIRE_MULTIPLIER, FIRE_STREAK, FROZEN_MULTIPLIER, FROZEN_STREAK,
    HOT_MULTIPLIER, HOT_STREAK,
};
use crate::player::PlayerId;

/// Momentum band derived from a streak value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    #[default]
    Neutral,
    Hot,
    Fire,
    Cold,
    Frozen,
}

impl Zone {
    #[must_use]
    pub const fn from_streak(streak: i32) -> Self {
        if streak >= FIRE_STREAK {
            Self::Fire
        } else if streak >= HOT_STREAK {
            Self::Hot
        } else if streak <= FROZEN_STREAK {
            Self::Frozen
        } else if streak <= COLD_STREAK {
            Self::Cold
        } else {
            Self::Neutral
        }
    }

    /// Offensive power multiplier applied to the next shot.
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Fire => FIRE_MULTIPLIER,
            Self::Hot => HOT_MULTIPLIER,
            Self::Cold => COLD_MULTIPLIER,
            Self::Frozen => FROZEN_MULTIPLIER,
            Self::Neutral => 1.0,
        }
    }

    /// Label carried on play records; `None` for the neutral band.
    #[must_use]
    pub const fn label(self) -> Option<&'static str> {
        match self {
            Self::Fire => Some("fire"),
            Self::Hot => Some("hot"),
            Self::Cold => Some("cold"),
            Self::Frozen => Some("frozen"),
            Self::Neutral => None,
        }
    }
}

/// Zone multiplier for a raw streak value.
#[must_use]
pub const fn zone_multiplier(streak: i32) -> f64 {
    Zone::from_streak(streak).multiplier()
}

/// Streak after one non-free-throw result.
#[must_use]
pub const fn next_streak(previous: i32, success: bool) -> i32 {
    if success {
        if previous > 0 { previous.saturating_add(1) } else { 1 }
    } else if previous < 0 {
        previous.saturating_sub(1)
    } else {
        -1
    }
}

/// Zone newly entered between two streak values, if any.
///
/// Moving deeper inside the same band does not re-fire.
#[must_use]
pub fn zone_entered(before: i32, after: i32) -> Option<Zone> {
    let prior = Zone::from_streak(before);
    let next = Zone::from_streak(after);
    (next != prior && next != Zone::Neutral).then_some(next)
}

/// Result of feeding one possession into the streak map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub before: i32,
    pub after: i32,
    pub zone: Zone,
    pub entered: Option<Zone>,
}

/// Per-player signed streak counters for one simulation call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreakMap {
    values: BTreeMap<PlayerId, i32>,
}

impl StreakMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: PlayerId) -> i32 {
        self.values.get(&id).copied().unwrap_or(0)
    }

    pub fn set(&mut self, id: PlayerId, value: i32) {
        self.values.insert(id, value);
    }

    /// Zero a player's streak, as on substitution out.
    pub fn reset(&mut self, id: PlayerId) {
        self.values.insert(id, 0);
    }

    #[must_use]
    pub fn zone(&self, id: PlayerId) -> Zone {
        Zone::from_streak(self.get(id))
    }

    /// Record a make (`success`) or a miss/turnover for the player.
    pub fn record(&mut self, id: PlayerId, success: bool) -> StreakUpdate {
        let before = self.get(id);
        let after = next_streak(before, success);
        self.values.insert(id, after);
        StreakUpdate {
            before,
            after,
            zone: Zone::from_streak(after),
            entered: zone_entered(before, after),
        }
    }
}
