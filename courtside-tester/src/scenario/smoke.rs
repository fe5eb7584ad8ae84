use anyhow::{Result, ensure};
use courtside_game::Winner;

use super::ScenarioCtx;
use crate::logic::IterationMetrics;

pub fn run(ctx: &ScenarioCtx<'_>) -> Result<IterationMetrics> {
    let game = ctx.play()?;
    let expected = ctx.expected_possessions(game.overtime_periods());
    ensure!(
        game.possession_count() == expected,
        "expected {expected} possessions, got {}",
        game.possession_count()
    );
    ensure!(game.winner != Winner::Tie, "game ended tied at {:?}", game.final_score);
    ensure!(
        game.periods_played() == usize::from(game.regular_periods) + game.overtime_periods(),
        "period table has {} rows",
        game.periods_played()
    );
    if ctx.verbose {
        println!(
            "     final {}-{} after {} periods",
            game.final_score[0],
            game.final_score[1],
            game.periods_played()
        );
    }
    Ok(IterationMetrics::from_result(&game))
}
