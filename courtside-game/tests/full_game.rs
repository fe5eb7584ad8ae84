use courtside_game::{
    EngineConfig, GameEngine, GameResult, Matchup, PlayRecord, Player, PlayerId, Position,
    SchemePair, Side, SimError, StatLine, Winner, energy_performance_multiplier,
    positional_multiplier, simulate_game,
};
use std::collections::HashMap;

const SEEDS: std::ops::Range<u64> = 0..24;

fn starter(id: u32, name: &str, position: Position, scoring: f64) -> Player {
    Player::new(id, name, position)
        .with_ratings(95.0 + scoring, 95.0)
        .with_averages(StatLine {
            points: scoring,
            fga: scoring * 0.8,
            fgm: scoring * 0.37,
            fg3a: scoring * 0.3,
            fg3m: scoring * 0.11,
            fta: scoring * 0.25,
            ftm: scoring * 0.19,
            assists: if position == Position::PointGuard { 7.5 } else { 2.5 },
            turnovers: 2.2,
            steals: 1.1,
            blocks: 0.6,
            rebounds: 5.0,
            minutes: 32.0,
        })
}

fn home_lineup() -> Vec<Player> {
    vec![
        starter(1, "Avery Lane", Position::PointGuard, 18.0),
        starter(2, "Blake Hart", Position::ShootingGuard, 21.0),
        starter(3, "Casey Moss", Position::SmallForward, 15.0),
        starter(4, "Devon Park", Position::PowerForward, 12.0),
        starter(5, "Emery Cole", Position::Center, 14.0),
    ]
}

fn away_lineup() -> Vec<Player> {
    vec![
        starter(11, "Finley Ross", Position::PointGuard, 16.0),
        starter(12, "Gray Walsh", Position::ShootingGuard, 19.0),
        starter(13, "Harper Quinn", Position::SmallForward, 17.0),
        starter(14, "Indy Shaw", Position::PowerForward, 13.0),
        starter(15, "Jules Reid", Position::Center, 11.0),
    ]
}

fn away_bench() -> Vec<Player> {
    Position::ALL
        .iter()
        .zip(21..)
        .map(|(&pos, id)| {
            starter(id, &format!("Reserve {id}"), pos, 7.0)
                .with_eligible(&[pos, Position::ALL[(pos.index() + 1) % 5]])
        })
        .collect()
}

fn play(seed: u64) -> GameResult {
    let home = home_lineup();
    let away = away_lineup();
    let bench = away_bench();
    GameEngine::new()
        .with_seed(seed)
        .simulate(&Matchup::new(&home, &away, &bench))
        .expect("valid matchup")
}

#[test]
fn possession_count_follows_regulation_and_overtime() {
    for seed in SEEDS {
        let result = play(seed);
        let overtime = result.overtime_periods();
        assert_eq!(
            result.possession_count(),
            160 + 20 * overtime,
            "seed {seed} produced the wrong number of possessions"
        );
        assert_ne!(result.winner, Winner::Tie, "seed {seed} ended tied");
        assert_eq!(result.periods_played(), 4 + overtime);
    }
}

#[test]
fn forced_overtime_config_plays_extra_periods() {
    let home = home_lineup();
    let away = away_lineup();
    let config = EngineConfig {
        possessions_per_quarter: 1,
        possessions_per_overtime: 1,
        ..EngineConfig::default()
    };
    let engine = GameEngine::new().with_config(config);
    for seed in SEEDS {
        let result = engine
            .clone()
            .with_seed(seed)
            .simulate(&Matchup::new(&home, &away, &[]))
            .expect("valid matchup");
        assert_eq!(
            result.possession_count(),
            8 + 2 * result.overtime_periods()
        );
        assert_ne!(result.final_score[0], result.final_score[1]);
    }
}

#[test]
fn scores_reconcile_with_possessions() {
    for seed in SEEDS {
        let result = play(seed);
        assert_eq!(result.points_by_team(), result.final_score);
        let by_period = result
            .period_scores
            .iter()
            .fold([0, 0], |acc, p| [acc[0] + p[0], acc[1] + p[1]]);
        assert_eq!(by_period, result.final_score);
        assert_eq!(result.box_scores.home.points(), result.final_score[0]);
        assert_eq!(result.box_scores.away.points(), result.final_score[1]);

        let mut running = [0_u32, 0];
        for record in &result.plays {
            if let PlayRecord::Possession(p) = record {
                running[p.team.index()] += u32::from(p.points);
            }
            assert_eq!(record.score(), running, "seed {seed} snapshot drifted");
        }
    }
}

#[test]
fn energy_only_rises_on_substitution() {
    for seed in SEEDS {
        let result = play(seed);
        let mut last_seen: HashMap<PlayerId, f64> = HashMap::new();
        for (idx, record) in result.plays.iter().enumerate() {
            // Swaps at one break land before any of their records.
            let entering: Vec<PlayerId> = result.plays[idx..]
                .iter()
                .map_while(PlayRecord::as_substitution)
                .map(|s| s.player_in.id)
                .collect();
            for side in Side::BOTH {
                for entry in record.energy().side(side) {
                    assert!((0.0..=100.0).contains(&entry.energy));
                    if !entering.contains(&entry.player)
                        && let Some(&before) = last_seen.get(&entry.player)
                    {
                        assert!(
                            entry.energy <= before + 1e-9,
                            "seed {seed}: {} rose from {before} to {}",
                            entry.player,
                            entry.energy
                        );
                    }
                    last_seen.insert(entry.player, entry.energy);
                }
            }
        }
    }
}

#[test]
fn opponent_subs_happen_only_at_quarter_breaks() {
    for seed in SEEDS {
        let result = play(seed);
        for sub in result.substitutions() {
            assert_eq!(sub.team, Side::Away);
            assert!((2..=4).contains(&sub.period), "sub in period {}", sub.period);
            assert_eq!(sub.player_in.slot, sub.player_out.slot);
        }
        for pair in result.plays.windows(2) {
            if let (PlayRecord::Possession(a), PlayRecord::Substitution(s)) = (&pair[0], &pair[1]) {
                assert_eq!(s.period, a.period + 1);
                assert_eq!(a.possession, 39);
            }
        }
    }
}

#[test]
fn tired_opponents_eventually_rotate() {
    let home = home_lineup();
    let away = away_lineup();
    let bench = away_bench();
    let config = EngineConfig {
        auto_sub_energy_threshold: 95.0,
        ..EngineConfig::default()
    };
    let result = GameEngine::new()
        .with_config(config)
        .with_seed(7)
        .simulate(&Matchup::new(&home, &away, &bench))
        .expect("valid matchup");
    let subs: Vec<_> = result.substitutions().collect();
    assert!(!subs.is_empty());
    for sub in &subs {
        assert!(sub.description.en.contains(&sub.player_in.name[..1]));
        let entrant = sub
            .energy
            .side(Side::Away)
            .iter()
            .find(|e| e.player == sub.player_in.id)
            .map(|e| e.energy);
        assert_eq!(entrant, Some(100.0));
    }
    assert_eq!(result.final_energy.len(), 15);
}

#[test]
fn same_seed_replays_identically() {
    for seed in [3_u64, 99, 2024] {
        let first = play(seed);
        let second = play(seed);
        assert_eq!(first, second);
        let json = serde_json::to_string(&first).expect("serializable");
        let back: GameResult = serde_json::from_str(&json).expect("round trip");
        assert_eq!(back.plays.len(), first.plays.len());
        assert_eq!(back.final_score, first.final_score);
    }
    assert_ne!(play(1).plays, play(2).plays);
}

#[test]
fn records_carry_schemes_and_descriptions() {
    let home = home_lineup();
    let away = away_lineup();
    let scheme = SchemePair::new(
        courtside_game::OffenseScheme::BallMovement,
        courtside_game::DefenseScheme::Pressure,
    );
    let result = GameEngine::new()
        .with_seed(5)
        .simulate(&Matchup::new(&home, &away, &[]).with_scheme(scheme))
        .expect("valid matchup");
    for possession in result.possessions() {
        assert_eq!(possession.schemes.home, scheme);
        assert!(!possession.description.en.is_empty());
        assert!(!possession.description.zh.is_empty());
        assert_eq!(possession.team, Side::for_possession(possession.possession));
        if let Some(helper) = &possession.assister {
            assert!(possession.made);
            assert_ne!(helper.id, possession.attacker.id);
        }
    }
}

#[test]
fn short_lineup_cannot_simulate() {
    let mut home = home_lineup();
    home.truncate(3);
    let err = simulate_game(&home, &away_lineup(), &[], None).expect_err("precondition");
    assert_eq!(
        err,
        SimError::InvalidLineup {
            side: Side::Home,
            expected: 5,
            found: 3,
        }
    );
    assert!(simulate_game(&home_lineup(), &[], &[], None).is_err());
}

#[test]
fn entropy_wiring_still_produces_a_full_game() {
    let result = simulate_game(&home_lineup(), &away_lineup(), &away_bench(), None)
        .expect("valid matchup");
    assert!(result.possession_count() >= 160);
    assert_eq!(result.points_by_team(), result.final_score);
}

#[test]
fn display_helpers_are_stable() {
    let expected = [1.00, 0.85, 0.65, 0.45, 0.20];
    for (distance, &value) in expected.iter().enumerate() {
        let slot = Position::ALL[distance];
        let got = positional_multiplier(Some(Position::PointGuard), Some(slot), &[]);
        assert!((got - value).abs() < f64::EPSILON, "distance {distance}");
    }
    assert!((energy_performance_multiplier(100.0) - 1.0).abs() < f64::EPSILON);
    assert!(energy_performance_multiplier(10.0) < energy_performance_multiplier(60.0));
}
