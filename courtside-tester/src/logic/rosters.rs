use anyhow::{Context, Result};
use courtside_game::{Matchup, Player, Position, StatLine};
use serde::{Deserialize, Serialize};

const DEMO_ROSTERS_JSON: &str = include_str!("../../assets/demo_rosters.json");

/// One club: five starters plus reserves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRoster {
    pub name: String,
    pub lineup: Vec<Player>,
    #[serde(default)]
    pub bench: Vec<Player>,
}

/// Rosters every scenario plays with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoRosters {
    pub home: TeamRoster,
    pub away: TeamRoster,
}

impl DemoRosters {
    /// Embedded demo rosters, or generated ones when the asset cannot be parsed.
    pub fn load_default() -> Self {
        Self::from_json(DEMO_ROSTERS_JSON).unwrap_or_else(|err| {
            log::warn!("demo rosters unavailable ({err:#}); using generated rosters");
            Self::generated()
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let rosters: Self = serde_json::from_str(json).context("parsing demo rosters")?;
        anyhow::ensure!(
            rosters.home.lineup.len() == 5 && rosters.away.lineup.len() == 5,
            "demo rosters need five starters per side"
        );
        Ok(rosters)
    }

    fn generated() -> Self {
        let team = |name: &str, first_id: u32, bench_size: usize| {
            let make = |id: u32, pos: Position, scale: f64| {
                Player::new(id, format!("{name} {id}"), pos)
                    .with_ratings(90.0 + 15.0 * scale, 95.0 + 10.0 * scale)
                    .with_averages(StatLine {
                        fga: 14.0 * scale,
                        fgm: 6.3 * scale,
                        fg3a: 4.0 * scale,
                        fg3m: 1.4 * scale,
                        fta: 3.0 * scale,
                        ftm: 2.3 * scale,
                        assists: 3.0 * scale,
                        turnovers: 1.8 * scale,
                        steals: 0.9,
                        minutes: 30.0 * scale,
                        ..StatLine::default()
                    })
            };
            let lineup = Position::ALL
                .iter()
                .zip(first_id..)
                .map(|(&pos, id)| make(id, pos, 1.0))
                .collect();
            let bench = Position::ALL
                .iter()
                .take(bench_size)
                .zip(first_id + 5..)
                .map(|(&pos, id)| make(id, pos, 0.6))
                .collect();
            TeamRoster {
                name: name.to_string(),
                lineup,
                bench,
            }
        };
        Self {
            home: team("Home", 1, 4),
            away: team("Away", 11, 5),
        }
    }

    pub fn matchup(&self) -> Matchup<'_> {
        Matchup::new(&self.home.lineup, &self.away.lineup, &self.away.bench)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_rosters_parse() {
        let rosters = DemoRosters::from_json(DEMO_ROSTERS_JSON).expect("embedded rosters");
        assert_eq!(rosters.home.lineup.len(), 5);
        assert!(!rosters.home.bench.is_empty());
        assert!(!rosters.away.bench.is_empty());
        rosters.matchup().validate().expect("valid matchup");
    }

    #[test]
    fn generated_rosters_are_valid() {
        let rosters = DemoRosters::generated();
        rosters.matchup().validate().expect("valid matchup");
        assert_eq!(rosters.home.bench.len(), 4);
    }

    #[test]
    fn short_lineup_is_rejected() {
        let json = r#"{"home":{"name":"A","lineup":[]},"away":{"name":"B","lineup":[]}}"#;
        assert!(DemoRosters::from_json(json).is_err());
    }
}
