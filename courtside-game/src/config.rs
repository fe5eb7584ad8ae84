//! Engine tunables that callers may override.
//!
//! Probability coefficients stay in `constants`; this record carries the
//! game-shape knobs (period lengths, substitution threshold, entry energies).
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::error::ConfigError;

const DEFAULT_ENGINE_DATA: &str = include_str!("../assets/engine.json");

/// Game-shape configuration for one simulation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "EngineConfig::default_regular_periods")]
    pub regular_periods: u8,
    /// Possessions per team in a regular period.
    #[serde(default = "EngineConfig::default_possessions_per_quarter")]
    pub possessions_per_quarter: u16,
    /// Possessions per team in an overtime period.
    #[serde(default = "EngineConfig::default_possessions_per_overtime")]
    pub possessions_per_overtime: u16,
    #[serde(default = "EngineConfig::default_auto_sub_energy_threshold")]
    pub auto_sub_energy_threshold: f64,
    /// Energy for a human-side entrant the resume snapshot does not know.
    #[serde(default = "EngineConfig::default_resume_entrant_energy")]
    pub resume_entrant_energy: f64,
    #[serde(default = "EngineConfig::default_fresh_energy")]
    pub fresh_energy: f64,
    #[serde(default = "EngineConfig::default_same_position_defender_chance")]
    pub same_position_defender_chance: f64,
    #[serde(default = "EngineConfig::default_passive_drain")]
    pub passive_drain: f64,
}

impl EngineConfig {
    const fn default_regular_periods() -> u8 {
        4
    }

    const fn default_possessions_per_quarter() -> u16 {
        20
    }

    const fn default_possessions_per_overtime() -> u16 {
        10
    }

    const fn default_auto_sub_energy_threshold() -> f64 {
        38.0
    }

    const fn default_resume_entrant_energy() -> f64 {
        80.0
    }

    const fn default_fresh_energy() -> f64 {
        100.0
    }

    const fn default_same_position_defender_chance() -> f64 {
        0.8
    }

    const fn default_passive_drain() -> f64 {
        0.3
    }

    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_ENGINE_DATA).unwrap_or_default()
    }

    /// Built-in configuration shipped with the crate.
    #[must_use]
    pub fn default_config() -> &'static Self {
        static CONFIG: OnceLock<EngineConfig> = OnceLock::new();
        CONFIG.get_or_init(Self::load_from_static)
    }

    /// Parse and validate a caller-supplied configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON and a violation variant
    /// when a field is out of bounds.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate configuration invariants before use.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` naming the first field that violates its bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("regular_periods", f64::from(self.regular_periods), 1.0, 8.0)?;
        check_min(
            "possessions_per_quarter",
            f64::from(self.possessions_per_quarter),
            1.0,
        )?;
        check_min(
            "possessions_per_overtime",
            f64::from(self.possessions_per_overtime),
            1.0,
        )?;
        check_range("auto_sub_energy_threshold", self.auto_sub_energy_threshold, 0.0, 100.0)?;
        check_range("resume_entrant_energy", self.resume_entrant_energy, 0.0, 100.0)?;
        check_range("fresh_energy", self.fresh_energy, 0.0, 100.0)?;
        check_range(
            "same_position_defender_chance",
            self.same_position_defender_chance,
            0.0,
            1.0,
        )?;
        check_range("passive_drain", self.passive_drain, 0.0, 10.0)?;
        Ok(())
    }

    /// Clamp every field into its valid range.
    #[must_use]
    pub fn sanitize(mut self) -> Self {
        self.regular_periods = self.regular_periods.clamp(1, 8);
        self.possessions_per_quarter = self.possessions_per_quarter.max(1);
        self.possessions_per_overtime = self.possessions_per_overtime.max(1);
        self.auto_sub_energy_threshold = clamp_or(
            self.auto_sub_energy_threshold,
            0.0,
            100.0,
            Self::default_auto_sub_energy_threshold(),
        );
        self.resume_entrant_energy = clamp_or(
            self.resume_entrant_energy,
            0.0,
            100.0,
            Self::default_resume_entrant_energy(),
        );
        self.fresh_energy = clamp_or(self.fresh_energy, 0.0, 100.0, Self::default_fresh_energy());
        self.same_position_defender_chance = clamp_or(
            self.same_position_defender_chance,
            0.0,
            1.0,
            Self::default_same_position_defender_chance(),
        );
        self.passive_drain = clamp_or(self.passive_drain, 0.0, 10.0, Self::default_passive_drain());
        self
    }

    /// Possessions (both sides together) that make up a period.
    #[must_use]
    pub fn period_length(&self, period: u8) -> u16 {
        let per_team = if self.is_regulation(period) {
            self.possessions_per_quarter
        } else {
            self.possessions_per_overtime
        };
        per_team.saturating_mul(2)
    }

    #[must_use]
    pub const fn is_regulation(&self, period: u8) -> bool {
        period <= self.regular_periods
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            regular_periods: Self::default_regular_periods(),
            possessions_per_quarter: Self::default_possessions_per_quarter(),
            possessions_per_overtime: Self::default_possessions_per_overtime(),
            auto_sub_energy_threshold: Self::default_auto_sub_energy_threshold(),
            resume_entrant_energy: Self::default_resume_entrant_energy(),
            fresh_energy: Self::default_fresh_energy(),
            same_position_defender_chance: Self::default_same_position_defender_chance(),
            passive_drain: Self::default_passive_drain(),
        }
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if !(min..=max).contains(&value) {
        return Err(ConfigError::RangeViolation {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}

fn check_min(field: &'static str, value: f64, min: f64) -> Result<(), ConfigError> {
    if value < min {
        return Err(ConfigError::MinViolation { field, min, value });
    }
    Ok(())
}

fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_asset_matches_defaults() {
        assert_eq!(EngineConfig::default_config(), &EngineConfig::default());
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_json_deserializes_to_defaults() {
        let cfg = EngineConfig::from_json("{}").unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn validation_names_offending_field() {
        let err = EngineConfig::from_json(r#"{"same_position_defender_chance": 1.5}"#);
        assert!(matches!(
            err,
            Err(ConfigError::RangeViolation {
                field: "same_position_defender_chance",
                ..
            })
        ));
        let err = EngineConfig::from_json(r#"{"possessions_per_quarter": 0}"#);
        assert!(matches!(
            err,
            Err(ConfigError::MinViolation {
                field: "possessions_per_quarter",
                ..
            })
        ));
        assert!(matches!(
            EngineConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn sanitize_clamps_into_range() {
        let cfg = EngineConfig {
            regular_periods: 0,
            passive_drain: -1.0,
            fresh_energy: f64::NAN,
            ..EngineConfig::default()
        }
        .sanitize();
        assert_eq!(cfg.regular_periods, 1);
        assert!(cfg.passive_drain.abs() < f64::EPSILON);
        assert!((cfg.fresh_energy - 100.0).abs() < f64::EPSILON);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn period_length_switches_at_overtime() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.period_length(1), 40);
        assert_eq!(cfg.period_length(4), 40);
        assert_eq!(cfg.period_length(5), 20);
        assert!(!cfg.is_regulation(6));
    }
}
