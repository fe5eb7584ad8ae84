use super::{TestScenario, determinism, full_game, resume, smoke};

const CATALOG: &[TestScenario] = &[
    TestScenario {
        key: "smoke",
        name: "Smoke",
        description: "One game completes with the configured possession count",
        check: smoke::run,
    },
    TestScenario {
        key: "full-game",
        name: "Full Game Accounting",
        description: "Score snapshots, period table and box scores agree",
        check: full_game::accounting,
    },
    TestScenario {
        key: "fatigue",
        name: "Fatigue",
        description: "Energy stays in bounds and only rises for entering players",
        check: full_game::fatigue,
    },
    TestScenario {
        key: "streaks",
        name: "Streaks",
        description: "Recorded streaks and zones follow the streak rules",
        check: full_game::streaks,
    },
    TestScenario {
        key: "schemes",
        name: "Schemes",
        description: "Home scheme is fixed and the opponent adapts only between periods",
        check: full_game::schemes,
    },
    TestScenario {
        key: "determinism",
        name: "Determinism",
        description: "Same seed gives the same play log digest, other seeds differ",
        check: determinism::run,
    },
    TestScenario {
        key: "resume-seam",
        name: "Resume Seam",
        description: "Pausing, editing the lineup and resuming keeps the log consistent",
        check: resume::run,
    },
];

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    CATALOG.iter().map(|s| (s.key, s.description)).collect()
}

pub fn all_scenario_keys() -> Vec<String> {
    CATALOG.iter().map(|s| s.key.to_string()).collect()
}

pub fn get_scenario(key: &str) -> Option<&'static TestScenario> {
    let key = key.trim().to_ascii_lowercase();
    CATALOG.iter().find(|s| s.key == key)
}
