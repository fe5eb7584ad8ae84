use anyhow::{Context, Result, ensure};
use courtside_game::{Matchup, PlayRecord, Player, PlayerId, ResumeState, Side};

use super::ScenarioCtx;
use crate::logic::IterationMetrics;
use crate::logic::coach::ScriptedCoach;
use crate::logic::rosters::TeamRoster;

const COACH_SALT: u64 = 0xC0AC_4000;

/// Opponent floor at the end of `prior`, with the rest of the club as bench.
fn opponent_at_pause(roster: &TeamRoster, prior: &[PlayRecord]) -> (Vec<Player>, Vec<Player>) {
    let mut lineup = roster.lineup.clone();
    for sub in prior
        .iter()
        .filter_map(PlayRecord::as_substitution)
        .filter(|s| s.team == Side::Away)
    {
        let incoming = roster
            .lineup
            .iter()
            .chain(&roster.bench)
            .find(|p| p.id == sub.player_in.id);
        if let (Some(slot), Some(incoming)) = (
            lineup.iter_mut().find(|p| p.id == sub.player_out.id),
            incoming,
        ) {
            *slot = incoming.clone().playing_as(sub.player_in.slot);
        }
    }

    // A pause inside a run of break swaps already shows every entrant on the floor.
    if let Some(last) = prior.last() {
        let floor: Vec<PlayerId> = last.energy().on_court(Side::Away).collect();
        let entrants: Vec<Player> = roster
            .lineup
            .iter()
            .chain(&roster.bench)
            .filter(|p| floor.contains(&p.id) && lineup.iter().all(|on| on.id != p.id))
            .cloned()
            .collect();
        let mut entrants = entrants.into_iter();
        for spot in lineup.iter_mut().filter(|p| !floor.contains(&p.id)) {
            if let Some(incoming) = entrants.next() {
                let slot = spot.slot();
                *spot = incoming.playing_as(slot);
            }
        }
    }

    let bench = roster
        .lineup
        .iter()
        .chain(&roster.bench)
        .filter(|p| lineup.iter().all(|on| on.id != p.id))
        .cloned()
        .collect();
    (lineup, bench)
}

/// Simulate, pause at a coach-chosen record, apply the coach's edits and resume.
pub fn run(ctx: &ScenarioCtx<'_>) -> Result<IterationMetrics> {
    let original = ctx.play()?;
    let plan = ScriptedCoach::new(ctx.seed ^ COACH_SALT).plan_pause(&original, ctx.rosters);
    let prior = &original.plays[..plan.cut];
    let state = ResumeState::from_plays(prior);
    let (opponent_lineup, opponent_bench) = opponent_at_pause(&ctx.rosters.away, prior);

    let matchup = Matchup::new(&plan.my_lineup, &opponent_lineup, &opponent_bench)
        .with_scheme(plan.my_scheme);
    let resumed = ctx
        .engine()
        .resume(&matchup, prior, &state, plan.opponent_override)
        .with_context(|| format!("resuming seed {} at record {}", ctx.seed, plan.cut))?;

    ensure!(
        resumed.plays.get(..plan.cut) == Some(prior),
        "resume rewrote the first {} records",
        plan.cut
    );
    ensure!(
        resumed.points_by_team() == resumed.final_score,
        "resumed score {:?} but possessions add to {:?}",
        resumed.final_score,
        resumed.points_by_team()
    );

    let regulation = resumed
        .possessions()
        .filter(|p| p.period <= resumed.regular_periods)
        .count();
    ensure!(
        regulation == ctx.expected_possessions(0),
        "resumed game holds {regulation} regulation possessions"
    );

    let seam: Vec<_> = resumed.plays[plan.cut..]
        .iter()
        .map_while(PlayRecord::as_substitution)
        .filter(|s| s.period == state.period)
        .collect();
    let added = resumed.plays.len() > plan.cut;
    if added {
        ensure!(
            seam.iter().all(|s| s.team == Side::Home),
            "opponent was substituted at the seam"
        );
        ensure!(
            seam.len() == usize::from(plan.changes_lineup()),
            "expected {} seam substitutions, found {}",
            usize::from(plan.changes_lineup()),
            seam.len()
        );
        if let (Some(sub), Some(out)) = (seam.first(), plan.benched) {
            ensure!(
                sub.player_out.id == out,
                "seam benched {} instead of {out}",
                sub.player_out.id
            );
            let entrant_energy = sub
                .energy
                .side(Side::Home)
                .iter()
                .find(|e| e.player == sub.player_in.id)
                .map(|e| e.energy);
            ensure!(
                entrant_energy == Some(ctx.config.resume_entrant_energy),
                "entrant resumed at {entrant_energy:?}"
            );
        }
    }

    if ctx.verbose {
        println!(
            "     paused at {} (period {}), lineup change: {}, resumed final {}-{}",
            plan.cut,
            state.period,
            plan.changes_lineup(),
            resumed.final_score[0],
            resumed.final_score[1]
        );
    }
    Ok(IterationMetrics::from_result(&resumed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::rosters::DemoRosters;
    use courtside_game::EngineConfig;

    #[test]
    fn seam_holds_across_seeds() {
        let config = EngineConfig::default();
        let rosters = DemoRosters::load_default();
        for seed in 0..16 {
            let ctx = ScenarioCtx {
                config: &config,
                rosters: &rosters,
                seed,
                verbose: false,
            };
            run(&ctx).unwrap_or_else(|err| panic!("seed {seed}: {err:#}"));
        }
    }

    #[test]
    fn opponent_floor_follows_prior_substitutions() {
        let config = EngineConfig {
            auto_sub_energy_threshold: 95.0,
            ..EngineConfig::default()
        };
        let rosters = DemoRosters::load_default();
        let ctx = ScenarioCtx {
            config: &config,
            rosters: &rosters,
            seed: 21,
            verbose: false,
        };
        let game = ctx.play().expect("simulate");
        let (lineup, bench) = opponent_at_pause(&rosters.away, &game.plays);
        let last_floor: Vec<_> = game
            .plays
            .last()
            .map(|p| p.energy().on_court(Side::Away).collect())
            .unwrap_or_default();
        assert_eq!(lineup.len(), 5);
        for player in &lineup {
            assert!(last_floor.contains(&player.id), "{} not on the floor", player.id);
        }
        assert_eq!(
            lineup.len() + bench.len(),
            rosters.away.lineup.len() + rosters.away.bench.len()
        );
    }
}
