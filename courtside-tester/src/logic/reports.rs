use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use super::ScenarioResult;

fn success_rate(results: &[ScenarioResult]) -> f64 {
    let passed = results.iter().filter(|r| r.passed).count();
    let to_f64 = |n: usize| f64::from(u32::try_from(n).unwrap_or(u32::MAX));
    if results.is_empty() {
        0.0
    } else {
        to_f64(passed) / to_f64(results.len()) * 100.0
    }
}

pub fn generate_console_report<W: Write>(
    out: &mut W,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Logic Test Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "==============================".cyan())?;

    let total_tests = results.len();
    let passed_tests = results.iter().filter(|r| r.passed).count();
    let failed_tests = total_tests - passed_tests;

    writeln!(out, "Total scenarios: {total_tests}")?;
    writeln!(out, "Passed: {}", passed_tests.to_string().green())?;
    writeln!(out, "Failed: {}", failed_tests.to_string().red())?;
    writeln!(out, "Success rate: {:.1}%", success_rate(results))?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };

        writeln!(
            out,
            "{} {} (seed {})",
            status,
            result.scenario_name.bold(),
            result.seed
        )?;
        writeln!(
            out,
            "   Iterations: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "   Average time: {:?}", result.average_duration)?;
        writeln!(
            out,
            "   Mean score: {:.1}-{:.1} over {:.1} possessions, {} overtime games, {} substitutions",
            result.metrics.mean_home_points,
            result.metrics.mean_away_points,
            result.metrics.mean_possessions,
            result.metrics.overtime_games,
            result.metrics.substitutions
        )?;

        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }

    let fastest = results.iter().min_by_key(|r| r.average_duration);
    let slowest = results.iter().max_by_key(|r| r.average_duration);
    if let (Some(fastest), Some(slowest)) = (fastest, slowest) {
        writeln!(out, "{}", "⚡ Performance Summary".bright_yellow().bold())?;
        writeln!(out, "{}", "=====================".yellow())?;
        writeln!(
            out,
            "Fastest: {} ({:?})",
            fastest.scenario_name.green(),
            fastest.average_duration
        )?;
        writeln!(
            out,
            "Slowest: {} ({:?})",
            slowest.scenario_name.yellow(),
            slowest.average_duration
        )?;
    }
    Ok(())
}

pub fn generate_json_report<W: Write>(out: &mut W, results: &[ScenarioResult]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, results)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report<W: Write>(out: &mut W, results: &[ScenarioResult]) -> Result<()> {
    writeln!(out, "# Courtside Logic Test Results\n")?;
    writeln!(
        out,
        "_Generated {}_\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    )?;

    let total_tests = results.len();
    let passed_tests = results.iter().filter(|r| r.passed).count();

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total scenarios**: {total_tests}")?;
    writeln!(out, "- **Passed**: {passed_tests}")?;
    writeln!(out, "- **Failed**: {}", total_tests - passed_tests)?;
    writeln!(out, "- **Success rate**: {:.1}%\n", success_rate(results))?;

    writeln!(out, "## Detailed Results\n")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };
        writeln!(out, "### {status} {} (seed {})\n", result.scenario_name, result.seed)?;
        writeln!(
            out,
            "- **Iterations**: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "- **Average time**: {:?}", result.average_duration)?;
        writeln!(
            out,
            "- **Mean score**: {:.1}-{:.1}",
            result.metrics.mean_home_points, result.metrics.mean_away_points
        )?;
        writeln!(
            out,
            "- **Mean possessions**: {:.1}",
            result.metrics.mean_possessions
        )?;

        if !result.failures.is_empty() {
            writeln!(out, "- **Failures**:")?;
            for failure in &result.failures {
                writeln!(out, "  - {failure}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

const CSV_HEADER: &str = "scenario,seed,passed,iterations,successful,avg_ms,mean_home_points,mean_away_points,mean_possessions,overtime_games,substitutions";

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn generate_csv_report<W: Write>(out: &mut W, results: &[ScenarioResult]) -> Result<()> {
    writeln!(out, "{CSV_HEADER}")?;
    for result in results {
        writeln!(
            out,
            "{},{},{},{},{},{},{:.2},{:.2},{:.2},{},{}",
            csv_field(&result.scenario_name),
            result.seed,
            result.passed,
            result.iterations_run,
            result.successful_iterations,
            result.average_duration.as_millis(),
            result.metrics.mean_home_points,
            result.metrics.mean_away_points,
            result.metrics.mean_possessions,
            result.metrics.overtime_games,
            result.metrics.substitutions
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::ScenarioMetrics;

    fn sample(name: &str, passed: bool) -> ScenarioResult {
        ScenarioResult {
            scenario_name: name.to_string(),
            seed: 42,
            passed,
            iterations_run: 2,
            successful_iterations: usize::from(passed) * 2,
            failures: if passed {
                Vec::new()
            } else {
                vec!["Iteration 1 (seed 42): broken".to_string()]
            },
            average_duration: Duration::from_millis(3),
            metrics: ScenarioMetrics {
                mean_home_points: 101.5,
                mean_away_points: 99.0,
                mean_possessions: 160.0,
                overtime_games: 0,
                substitutions: 4,
            },
        }
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).expect("report");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn console_lists_failures() {
        colored::control::set_override(false);
        let results = [sample("Smoke", true), sample("Resume Seam", false)];
        let text = render(|out| generate_console_report(out, &results, Duration::from_secs(1)));
        assert!(text.contains("Total scenarios: 2"));
        assert!(text.contains("Success rate: 50.0%"));
        assert!(text.contains("broken"));
        assert!(text.contains("Fastest:"));
    }

    #[test]
    fn json_round_trips() {
        let results = [sample("Smoke", true)];
        let text = render(|out| generate_json_report(out, &results));
        let back: Vec<ScenarioResult> = serde_json::from_str(&text).expect("parse");
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].metrics, results[0].metrics);
    }

    #[test]
    fn markdown_has_sections() {
        let results = [sample("Smoke", false)];
        let text = render(|out| generate_markdown_report(out, &results));
        assert!(text.starts_with("# Courtside Logic Test Results"));
        assert!(text.contains("## Detailed Results"));
        assert!(text.contains("- **Failed**: 1"));
    }

    #[test]
    fn csv_quotes_awkward_names() {
        let results = [sample("Smoke, again", true)];
        let text = render(|out| generate_csv_report(out, &results));
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        let row = lines.next().expect("row");
        assert!(row.starts_with("\"Smoke, again\",42,true,2,2,3,101.50"));
    }
}
