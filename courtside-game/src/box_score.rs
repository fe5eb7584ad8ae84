//! Per-player box score accumulators.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::player::{Player, PlayerId};
use crate::possession::{Outcome, ShotType};

/// Counting stats for one player over one game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxScoreEntry {
    pub name: String,
    pub points: u32,
    pub rebounds: u32,
    pub offensive_rebounds: u32,
    pub defensive_rebounds: u32,
    pub assists: u32,
    pub steals: u32,
    pub blocks: u32,
    pub turnovers: u32,
    /// Free-throw trips earned.
    pub fouls_drawn: u32,
    pub fga: u32,
    pub fgm: u32,
    pub fg3a: u32,
    pub fg3m: u32,
    pub fta: u32,
    pub ftm: u32,
    /// Possessions (either end) the player was on the floor for.
    pub possessions: u32,
}

fn pct(made: u32, attempted: u32) -> Option<f64> {
    (attempted > 0).then(|| f64::from(made) / f64::from(attempted))
}

impl BoxScoreEntry {
    #[must_use]
    pub fn fg_pct(&self) -> Option<f64> {
        pct(self.fgm, self.fga)
    }

    #[must_use]
    pub fn fg3_pct(&self) -> Option<f64> {
        pct(self.fg3m, self.fg3a)
    }

    #[must_use]
    pub fn ft_pct(&self) -> Option<f64> {
        pct(self.ftm, self.fta)
    }

    fn absorb(&mut self, other: &Self) {
        self.points += other.points;
        self.rebounds += other.rebounds;
        self.offensive_rebounds += other.offensive_rebounds;
        self.defensive_rebounds += other.defensive_rebounds;
        self.assists += other.assists;
        self.steals += other.steals;
        self.blocks += other.blocks;
        self.turnovers += other.turnovers;
        self.fouls_drawn += other.fouls_drawn;
        self.fga += other.fga;
        self.fgm += other.fgm;
        self.fg3a += other.fg3a;
        self.fg3m += other.fg3m;
        self.fta += other.fta;
        self.ftm += other.ftm;
        self.possessions += other.possessions;
    }
}

/// One team's box score, keyed by player id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoxScore {
    entries: BTreeMap<PlayerId, BoxScoreEntry>,
}

impl BoxScore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for a player, created on first touch.
    pub fn entry_mut(&mut self, id: PlayerId, name: &str) -> &mut BoxScoreEntry {
        self.entries.entry(id).or_insert_with(|| BoxScoreEntry {
            name: name.to_string(),
            ..BoxScoreEntry::default()
        })
    }

    #[must_use]
    pub fn get(&self, id: PlayerId) -> Option<&BoxScoreEntry> {
        self.entries.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &BoxScoreEntry)> + '_ {
        self.entries.iter().map(|(&id, entry)| (id, entry))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.entries.values().map(|e| e.points).sum()
    }

    /// Team totals; `possessions` sums player-possessions on the floor.
    #[must_use]
    pub fn totals(&self) -> BoxScoreEntry {
        let mut total = BoxScoreEntry {
            name: "TEAM".to_string(),
            ..BoxScoreEntry::default()
        };
        for entry in self.entries.values() {
            total.absorb(entry);
        }
        total
    }
}

/// Named participant of a single possession.
#[derive(Debug, Clone, Copy)]
pub struct Participant<'a> {
    pub id: PlayerId,
    pub name: &'a str,
}

impl<'a> From<&'a Player> for Participant<'a> {
    fn from(player: &'a Player) -> Self {
        Self {
            id: player.id,
            name: &player.name,
        }
    }
}

/// Credit one possession outcome to the attacking and defending box scores.
pub fn record_possession(
    offense: &mut BoxScore,
    defense: &mut BoxScore,
    attacker: Participant<'_>,
    defender: Participant<'_>,
    assister: Option<Participant<'_>>,
    outcome: &Outcome,
) {
    match *outcome {
        Outcome::Turnover { steal } => {
            offense.entry_mut(attacker.id, attacker.name).turnovers += 1;
            if steal {
                defense.entry_mut(defender.id, defender.name).steals += 1;
            }
        }
        Outcome::FreeThrows { attempts, made } => {
            let line = offense.entry_mut(attacker.id, attacker.name);
            line.fouls_drawn += 1;
            line.fta += u32::from(attempts);
            line.ftm += u32::from(made);
            line.points += u32::from(made);
        }
        Outcome::FieldGoal {
            shot,
            made,
            block,
            offensive_rebound,
            defensive_rebound,
            ..
        } => {
            let line = offense.entry_mut(attacker.id, attacker.name);
            line.fga += 1;
            if shot == ShotType::Three {
                line.fg3a += 1;
            }
            if made {
                line.fgm += 1;
                if shot == ShotType::Three {
                    line.fg3m += 1;
                }
                line.points += u32::from(shot.points());
            }
            if offensive_rebound {
                line.rebounds += 1;
                line.offensive_rebounds += 1;
            }
            if block {
                defense.entry_mut(defender.id, defender.name).blocks += 1;
            }
            if defensive_rebound {
                let d = defense.entry_mut(defender.id, defender.name);
                d.rebounds += 1;
                d.defensive_rebounds += 1;
            }
            if made && let Some(helper) = assister {
                offense.entry_mut(helper.id, helper.name).assists += 1;
            }
        }
    }
}

/// Bump the on-floor possession counter for every listed player.
pub fn record_on_court<'a>(
    score: &mut BoxScore,
    players: impl IntoIterator<Item = Participant<'a>>,
) {
    for player in players {
        score.entry_mut(player.id, player.name).possessions += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn who(id: u32, name: &str) -> Participant<'_> {
        Participant {
            id: PlayerId(id),
            name,
        }
    }

    #[test]
    fn made_three_with_assist_credits_both() {
        let mut home = BoxScore::new();
        let mut away = BoxScore::new();
        let outcome = Outcome::FieldGoal {
            shot: ShotType::Three,
            made: true,
            hit_chance: 0.4,
            converted: false,
            block: false,
            offensive_rebound: false,
            defensive_rebound: false,
        };
        record_possession(
            &mut home,
            &mut away,
            who(1, "Shooter"),
            who(9, "Guard"),
            Some(who(2, "Passer")),
            &outcome,
        );
        let shooter = home.get(PlayerId(1)).cloned().unwrap_or_default();
        assert_eq!((shooter.points, shooter.fga, shooter.fg3m), (3, 1, 1));
        assert_eq!(home.get(PlayerId(2)).map(|e| e.assists), Some(1));
        assert!(away.is_empty());
        assert_eq!(home.points(), 3);
    }

    #[test]
    fn miss_splits_rebounds_and_blocks() {
        let mut home = BoxScore::new();
        let mut away = BoxScore::new();
        let miss = |block, oreb, dreb| Outcome::FieldGoal {
            shot: ShotType::Two,
            made: false,
            hit_chance: 0.3,
            converted: false,
            block,
            offensive_rebound: oreb,
            defensive_rebound: dreb,
        };
        record_possession(
            &mut home,
            &mut away,
            who(1, "A"),
            who(9, "D"),
            None,
            &miss(true, false, true),
        );
        record_possession(
            &mut home,
            &mut away,
            who(1, "A"),
            who(9, "D"),
            None,
            &miss(false, true, false),
        );
        let attacker = home.get(PlayerId(1)).cloned().unwrap_or_default();
        let defender = away.get(PlayerId(9)).cloned().unwrap_or_default();
        assert_eq!(attacker.fga, 2);
        assert_eq!(attacker.offensive_rebounds, 1);
        assert_eq!(defender.blocks, 1);
        assert_eq!(defender.defensive_rebounds, 1);
        assert_eq!(defender.rebounds, 1);
        assert_eq!(attacker.fg_pct(), Some(0.0));
        assert_eq!(defender.fg_pct(), None);
    }

    #[test]
    fn free_throws_and_steals_land_on_the_right_team() {
        let mut home = BoxScore::new();
        let mut away = BoxScore::new();
        record_possession(
            &mut home,
            &mut away,
            who(1, "A"),
            who(9, "D"),
            None,
            &Outcome::FreeThrows { attempts: 2, made: 1 },
        );
        record_possession(
            &mut home,
            &mut away,
            who(1, "A"),
            who(9, "D"),
            None,
            &Outcome::Turnover { steal: true },
        );
        record_on_court(&mut home, [who(1, "A"), who(2, "B")]);
        let totals = home.totals();
        assert_eq!((totals.fta, totals.ftm, totals.points), (2, 1, 1));
        assert_eq!(totals.fouls_drawn, 1);
        assert_eq!(totals.turnovers, 1);
        assert_eq!(totals.possessions, 2);
        assert_eq!(away.get(PlayerId(9)).map(|e| e.steals), Some(1));
        assert_eq!(home.totals().ft_pct(), Some(0.5));
    }
}
