use anyhow::{Context, Result};
use courtside_game::{EngineConfig, GameEngine, GameResult, Matchup};

use crate::logic::IterationMetrics;
use crate::logic::rosters::DemoRosters;

pub mod catalog;
pub mod determinism;
pub mod full_game;
pub mod resume;
pub mod smoke;

pub use catalog::{all_scenario_keys, get_scenario, list_scenarios};

/// Inputs shared by every scenario iteration.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioCtx<'a> {
    pub config: &'a EngineConfig,
    pub rosters: &'a DemoRosters,
    pub seed: u64,
    pub verbose: bool,
}

impl ScenarioCtx<'_> {
    pub fn engine(&self) -> GameEngine {
        GameEngine::new()
            .with_config(self.config.clone())
            .with_seed(self.seed)
    }

    /// Simulate the demo matchup under this iteration's seed.
    pub fn play(&self) -> Result<GameResult> {
        self.play_matchup(&self.rosters.matchup())
    }

    pub fn play_matchup(&self, matchup: &Matchup<'_>) -> Result<GameResult> {
        self.engine()
            .simulate(matchup)
            .with_context(|| format!("simulating seed {}", self.seed))
    }

    /// Possessions a complete game should hold given its overtime count.
    pub fn expected_possessions(&self, overtime_periods: usize) -> usize {
        let regulation = usize::from(self.config.possessions_per_quarter)
            * usize::from(self.config.regular_periods);
        2 * regulation + 2 * usize::from(self.config.possessions_per_overtime) * overtime_periods
    }
}

pub type ScenarioCheck = fn(&ScenarioCtx<'_>) -> Result<IterationMetrics>;

/// Named check run once per seed and iteration.
#[derive(Debug, Clone, Copy)]
pub struct TestScenario {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub check: ScenarioCheck,
}

impl TestScenario {
    pub fn run(&self, ctx: &ScenarioCtx<'_>) -> Result<IterationMetrics> {
        (self.check)(ctx)
    }
}
