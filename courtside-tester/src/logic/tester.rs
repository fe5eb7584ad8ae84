use colored::Colorize;
use courtside_game::{EngineConfig, GameResult};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::rosters::DemoRosters;
use crate::scenario::{ScenarioCtx, TestScenario};

/// Headline numbers from one checked game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IterationMetrics {
    pub home_points: u32,
    pub away_points: u32,
    pub possessions: usize,
    pub overtime_periods: usize,
    pub substitutions: usize,
}

impl IterationMetrics {
    pub fn from_result(result: &GameResult) -> Self {
        Self {
            home_points: result.final_score[0],
            away_points: result.final_score[1],
            possessions: result.possession_count(),
            overtime_periods: result.overtime_periods(),
            substitutions: result.substitutions().count(),
        }
    }
}

/// Averages over the successful iterations of one scenario and seed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMetrics {
    pub mean_home_points: f64,
    pub mean_away_points: f64,
    pub mean_possessions: f64,
    pub overtime_games: usize,
    pub substitutions: usize,
}

impl ScenarioMetrics {
    pub fn aggregate(samples: &[IterationMetrics]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let n = f64::from(u32::try_from(samples.len()).unwrap_or(u32::MAX));
        let mean = |f: fn(&IterationMetrics) -> f64| samples.iter().map(f).sum::<f64>() / n;
        Self {
            mean_home_points: mean(|m| f64::from(m.home_points)),
            mean_away_points: mean(|m| f64::from(m.away_points)),
            mean_possessions: mean(|m| f64::from(u32::try_from(m.possessions).unwrap_or(u32::MAX))),
            overtime_games: samples.iter().filter(|m| m.overtime_periods > 0).count(),
            substitutions: samples.iter().map(|m| m.substitutions).sum(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    pub metrics: ScenarioMetrics,
}

pub struct LogicTester {
    config: EngineConfig,
    rosters: DemoRosters,
    verbose: bool,
}

impl LogicTester {
    pub const fn new(config: EngineConfig, rosters: DemoRosters, verbose: bool) -> Self {
        Self {
            config,
            rosters,
            verbose,
        }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        seeds
            .iter()
            .map(|&seed| {
                if self.verbose {
                    println!(
                        "🧪 Testing scenario: {} (seed: {seed})",
                        scenario.name.bright_white()
                    );
                }
                self.run_single_scenario(scenario, seed, iterations)
            })
            .collect()
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let mut failures = Vec::new();
        let mut samples = Vec::new();
        let mut durations = Vec::new();

        for i in 0..iterations {
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));
            let ctx = ScenarioCtx {
                config: &self.config,
                rosters: &self.rosters,
                seed: iteration_seed,
                verbose: self.verbose,
            };

            let start_time = Instant::now();
            match scenario.run(&ctx) {
                Ok(metrics) => {
                    let duration = start_time.elapsed();
                    durations.push(duration);
                    samples.push(metrics);
                    if self.verbose {
                        println!(
                            "  ✅ Iteration {}/{iterations} passed ({duration:?}) score {}-{}",
                            i + 1,
                            metrics.home_points,
                            metrics.away_points
                        );
                    }
                }
                Err(err) => {
                    log::debug!("{} failed on seed {iteration_seed}: {err:#}", scenario.key);
                    let message = format!("Iteration {} (seed {iteration_seed}): {err:#}", i + 1);
                    if self.verbose {
                        println!(
                            "  ❌ Iteration {}/{iterations} failed: {}",
                            i + 1,
                            message.clone().red()
                        );
                    }
                    failures.push(message);
                }
            }
        }

        let average_duration = if durations.is_empty() {
            Duration::ZERO
        } else {
            durations.iter().sum::<Duration>() / u32::try_from(durations.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.to_string(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: samples.len(),
            failures,
            average_duration,
            metrics: ScenarioMetrics::aggregate(&samples),
        }
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::get_scenario;

    fn tester() -> LogicTester {
        LogicTester::new(EngineConfig::default(), DemoRosters::load_default(), false)
    }

    #[test]
    fn smoke_passes_for_each_seed() {
        let scenario = get_scenario("smoke").expect("smoke registered");
        let results = tester().run_scenario(scenario, &[1, 2], 2);
        assert_eq!(results.len(), 2);
        for result in &results {
            assert!(result.passed, "{:?}", result.failures);
            assert_eq!(result.successful_iterations, 2);
            assert!(result.metrics.mean_possessions >= 160.0);
        }
    }

    #[test]
    fn failing_check_is_reported() {
        fn always_fails(_: &ScenarioCtx<'_>) -> anyhow::Result<IterationMetrics> {
            anyhow::bail!("forced")
        }
        let scenario = TestScenario {
            key: "forced",
            name: "Forced",
            description: "always fails",
            check: always_fails,
        };
        let results = tester().run_scenario(&scenario, &[9], 3);
        assert!(!results[0].passed);
        assert_eq!(results[0].failures.len(), 3);
        assert!(results[0].failures[0].contains("seed 9"));
        assert_eq!(results[0].metrics, ScenarioMetrics::default());
    }

    #[test]
    fn metrics_average_over_samples() {
        let samples = [
            IterationMetrics {
                home_points: 100,
                away_points: 90,
                possessions: 160,
                overtime_periods: 0,
                substitutions: 2,
            },
            IterationMetrics {
                home_points: 110,
                away_points: 112,
                possessions: 180,
                overtime_periods: 1,
                substitutions: 1,
            },
        ];
        let metrics = ScenarioMetrics::aggregate(&samples);
        assert!((metrics.mean_home_points - 105.0).abs() < f64::EPSILON);
        assert!((metrics.mean_possessions - 170.0).abs() < f64::EPSILON);
        assert_eq!(metrics.overtime_games, 1);
        assert_eq!(metrics.substitutions, 3);
    }

    #[test]
    fn result_serializes_duration_as_millis() {
        let result = ScenarioResult {
            scenario_name: "Smoke".to_string(),
            seed: 1,
            passed: true,
            iterations_run: 1,
            successful_iterations: 1,
            failures: Vec::new(),
            average_duration: Duration::from_millis(12),
            metrics: ScenarioMetrics::default(),
        };
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["average_duration"], 12);
    }
}
