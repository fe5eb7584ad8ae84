use courtside_game::{DefenseScheme, GameResult, OffenseScheme, Player, SchemePair};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::rosters::DemoRosters;

/// Edits a coach makes while the game is paused.
#[derive(Debug, Clone)]
pub struct PausePlan {
    /// Number of records kept from the original log.
    pub cut: usize,
    pub my_lineup: Vec<Player>,
    pub my_scheme: SchemePair,
    pub opponent_override: Option<SchemePair>,
    /// Id of the starter benched at the pause, if any.
    pub benched: Option<courtside_game::PlayerId>,
}

impl PausePlan {
    pub fn changes_lineup(&self) -> bool {
        self.benched.is_some()
    }
}

/// Seeded stand-in for a human coach pausing a game mid-stream.
#[derive(Debug, Clone)]
pub struct ScriptedCoach {
    rng: ChaCha8Rng,
}

impl ScriptedCoach {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn pick_scheme(&mut self) -> SchemePair {
        let offense = OffenseScheme::ALL[self.rng.gen_range(0..OffenseScheme::ALL.len())];
        let defense = DefenseScheme::ALL[self.rng.gen_range(0..DefenseScheme::ALL.len())];
        SchemePair::new(offense, defense)
    }

    /// Choose a pause point inside regulation plus any lineup or scheme edits.
    pub fn plan_pause(&mut self, game: &GameResult, rosters: &DemoRosters) -> PausePlan {
        let regulation_end = game
            .plays
            .iter()
            .rposition(|play| play.period() <= game.regular_periods)
            .map_or(1, |idx| idx + 1);
        let cut = self.rng.gen_range(1..=regulation_end.max(1));

        let mut my_lineup = rosters.home.lineup.clone();
        let mut benched = None;
        if !rosters.home.bench.is_empty() && self.rng.gen_bool(0.5) {
            let slot_idx = self.rng.gen_range(0..my_lineup.len());
            let slot = my_lineup[slot_idx].slot();
            let pick = rosters
                .home
                .bench
                .iter()
                .find(|p| p.can_play(slot))
                .unwrap_or(&rosters.home.bench[self.rng.gen_range(0..rosters.home.bench.len())]);
            benched = Some(my_lineup[slot_idx].id);
            my_lineup[slot_idx] = pick.clone().playing_as(slot);
        }

        let my_scheme = if self.rng.gen_bool(0.5) {
            self.pick_scheme()
        } else {
            SchemePair::default()
        };
        let opponent_override = self.rng.gen_bool(0.25).then(|| self.pick_scheme());

        PausePlan {
            cut,
            my_lineup,
            my_scheme,
            opponent_override,
            benched,
        }
    }
}
