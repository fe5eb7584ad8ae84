use anyhow::{Result, ensure};
use courtside_game::streak::{next_streak, zone_entered};
use courtside_game::{PlayRecord, PlayerId, SchemePair, Side, Zone, evaluate_scheme};
use std::collections::HashMap;

use super::ScenarioCtx;
use crate::logic::IterationMetrics;

/// Running score snapshots, period table and box scores all agree with the possessions.
pub fn accounting(ctx: &ScenarioCtx<'_>) -> Result<IterationMetrics> {
    let game = ctx.play()?;
    ensure!(
        game.points_by_team() == game.final_score,
        "possession points {:?} differ from final score {:?}",
        game.points_by_team(),
        game.final_score
    );

    let by_period = game
        .period_scores
        .iter()
        .fold([0, 0], |acc, p| [acc[0] + p[0], acc[1] + p[1]]);
    ensure!(
        by_period == game.final_score,
        "period table sums to {by_period:?}"
    );
    ensure!(
        game.box_scores.home.points() == game.final_score[0]
            && game.box_scores.away.points() == game.final_score[1],
        "box scores disagree with the final score"
    );

    let mut running = [0_u32, 0];
    for (idx, record) in game.plays.iter().enumerate() {
        if let PlayRecord::Possession(p) = record {
            running[p.team.index()] += u32::from(p.points);
            ensure!(
                p.team == Side::for_possession(p.possession),
                "record {idx}: possession {} belongs to the wrong side",
                p.possession
            );
        }
        ensure!(
            record.score() == running,
            "record {idx}: snapshot {:?} but running total {running:?}",
            record.score()
        );
    }

    Ok(IterationMetrics::from_result(&game))
}

/// Energy stays in [0, 100] and never rises except for a substitution's entrant.
pub fn fatigue(ctx: &ScenarioCtx<'_>) -> Result<IterationMetrics> {
    let game = ctx.play()?;
    let mut last_seen: HashMap<PlayerId, f64> = HashMap::new();

    for (idx, record) in game.plays.iter().enumerate() {
        // Swaps at one break land before any of their records.
        let entering: Vec<PlayerId> = game.plays[idx..]
            .iter()
            .map_while(PlayRecord::as_substitution)
            .map(|s| s.player_in.id)
            .collect();
        for side in Side::BOTH {
            for entry in record.energy().side(side) {
                ensure!(
                    (0.0..=100.0).contains(&entry.energy),
                    "record {idx}: {} has energy {}",
                    entry.player,
                    entry.energy
                );
                if !entering.contains(&entry.player)
                    && let Some(&before) = last_seen.get(&entry.player)
                {
                    ensure!(
                        entry.energy <= before + 1e-9,
                        "record {idx}: {} rose from {before:.2} to {:.2}",
                        entry.player,
                        entry.energy
                    );
                }
                last_seen.insert(entry.player, entry.energy);
            }
        }
    }

    let roster_size = ctx.rosters.home.lineup.len()
        + ctx.rosters.away.lineup.len()
        + ctx.rosters.away.bench.len();
    ensure!(
        game.final_energy.len() == roster_size,
        "final energy covers {} players, expected {roster_size}",
        game.final_energy.len()
    );

    Ok(IterationMetrics::from_result(&game))
}

/// Re-derive every attacker's streak from the outcomes and compare with the log.
pub fn streaks(ctx: &ScenarioCtx<'_>) -> Result<IterationMetrics> {
    let game = ctx.play()?;
    let mut streaks: HashMap<PlayerId, i32> = HashMap::new();
    let mut zone_entries = 0usize;

    for (idx, record) in game.plays.iter().enumerate() {
        match record {
            PlayRecord::Possession(p) => {
                let before = streaks.get(&p.attacker.id).copied().unwrap_or(0);
                let expected = p
                    .outcome()
                    .streak_result()
                    .map_or(before, |success| next_streak(before, success));
                ensure!(
                    p.streak == expected,
                    "record {idx}: {} streak {} but expected {expected}",
                    p.attacker.name,
                    p.streak
                );
                ensure!(
                    p.zone == Zone::from_streak(p.streak),
                    "record {idx}: zone {:?} does not match streak {}",
                    p.zone,
                    p.streak
                );
                ensure!(
                    p.zone_entered == zone_entered(before, p.streak).is_some(),
                    "record {idx}: zone entry flag is wrong"
                );
                zone_entries += usize::from(p.zone_entered);
                streaks.insert(p.attacker.id, p.streak);
            }
            PlayRecord::Substitution(s) => {
                streaks.remove(&s.player_out.id);
            }
        }
    }

    if ctx.verbose {
        println!("     {zone_entries} zone entries");
    }
    Ok(IterationMetrics::from_result(&game))
}

/// Home keeps its chosen scheme; the opponent only re-plans at period boundaries.
pub fn schemes(ctx: &ScenarioCtx<'_>) -> Result<IterationMetrics> {
    let game = ctx.play()?;
    let home_scheme = SchemePair::default();

    if let Some(first) = game.plays.first() {
        let opening = evaluate_scheme(0, 0, 1, ctx.config.fresh_energy);
        ensure!(
            first.schemes().away == opening,
            "opening opponent scheme {} but expected {opening}",
            first.schemes().away
        );
    }

    for (idx, record) in game.plays.iter().enumerate() {
        ensure!(
            record.schemes().home == home_scheme,
            "record {idx}: home scheme drifted to {}",
            record.schemes().home
        );
    }

    let mut switches = 0usize;
    for pair in game.plays.windows(2) {
        let (before, after) = (&pair[0], &pair[1]);
        if before.schemes().away == after.schemes().away {
            continue;
        }
        ensure!(
            before.period() != after.period(),
            "opponent switched from {} to {} inside period {}",
            before.schemes().away,
            after.schemes().away,
            after.period()
        );
        switches += 1;
    }

    if ctx.verbose {
        println!("     opponent switched schemes {switches} times");
    }
    Ok(IterationMetrics::from_result(&game))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::rosters::DemoRosters;
    use courtside_game::EngineConfig;

    fn ctx<'a>(config: &'a EngineConfig, rosters: &'a DemoRosters, seed: u64) -> ScenarioCtx<'a> {
        ScenarioCtx {
            config,
            rosters,
            seed,
            verbose: false,
        }
    }

    #[test]
    fn invariant_checks_pass_on_demo_rosters() {
        let config = EngineConfig::default();
        let rosters = DemoRosters::load_default();
        for seed in [1_u64, 77, 1337] {
            let scenario = ctx(&config, &rosters, seed);
            accounting(&scenario).expect("accounting");
            fatigue(&scenario).expect("fatigue");
            streaks(&scenario).expect("streaks");
            schemes(&scenario).expect("schemes");
        }
    }

    #[test]
    fn tired_threshold_still_balances() {
        let config = EngineConfig {
            auto_sub_energy_threshold: 95.0,
            ..EngineConfig::default()
        };
        let rosters = DemoRosters::load_default();
        let metrics = fatigue(&ctx(&config, &rosters, 3)).expect("fatigue");
        assert!(metrics.substitutions > 0);
        accounting(&ctx(&config, &rosters, 3)).expect("accounting");
    }
}
