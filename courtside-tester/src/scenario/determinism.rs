use anyhow::{Result, ensure};

use super::ScenarioCtx;
use crate::common::play_log_digest;
use crate::logic::IterationMetrics;

/// Replay the seed and compare digests; a neighbouring seed must diverge.
pub fn run(ctx: &ScenarioCtx<'_>) -> Result<IterationMetrics> {
    let first = ctx.play()?;
    let replay = ctx.play()?;
    let first_digest = play_log_digest(&first.plays)?;
    let replay_digest = play_log_digest(&replay.plays)?;
    ensure!(
        first_digest == replay_digest,
        "seed {} replayed to a different log ({first_digest} vs {replay_digest})",
        ctx.seed
    );
    ensure!(first == replay, "seed {} replayed to a different result", ctx.seed);

    let neighbour = ScenarioCtx {
        seed: ctx.seed.wrapping_add(1),
        ..*ctx
    };
    let other = neighbour.play()?;
    let other_digest = play_log_digest(&other.plays)?;
    ensure!(
        other_digest != first_digest,
        "seeds {} and {} produced identical logs",
        ctx.seed,
        neighbour.seed
    );

    if ctx.verbose {
        println!("     digest {}", &first_digest[..12]);
    }
    Ok(IterationMetrics::from_result(&first))
}
