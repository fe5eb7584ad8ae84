//! Period loop, possession generation and opponent substitutions.
use rand::Rng;
use smallvec::SmallVec;

use crate::box_score::{Participant, record_on_court, record_possession};
use crate::config::EngineConfig;
use crate::constants::{ASSIST_WEIGHT_FLOOR, POINT_GUARD_ASSIST_WEIGHT};
use crate::energy::{EnergyMap, apply_possession_drain, energy_performance_multiplier};
use crate::game::state::GameState;
use crate::play::{PlayRecord, PlayerRef, PossessionRecord, SubstitutionRecord};
use crate::player::{Player, Position, Side};
use crate::possession::{PossessionContext, simulate_one};
use crate::rating::team_defense_rating;
use crate::rng::RngBundle;
use crate::scheme::{OffenseScheme, SchemePair, evaluate_scheme};
use crate::streak::Zone;
use crate::text::{PlayTextLibrary, PossessionText, describe_possession, describe_substitution};

type Weights = SmallVec<[f64; 5]>;

/// Index drawn proportionally to `weights`; uniform when every weight is zero.
pub(crate) fn pick_weighted<R>(weights: &[f64], rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    if weights.is_empty() {
        return 0;
    }
    let clean = |w: f64| if w.is_finite() { w.max(0.0) } else { 0.0 };
    let total: f64 = weights.iter().copied().map(clean).sum();
    if total <= 0.0 {
        return rng.gen_range(0..weights.len());
    }
    let mut roll = rng.r#gen::<f64>() * total;
    for (idx, &weight) in weights.iter().enumerate() {
        let weight = clean(weight);
        if roll < weight {
            return idx;
        }
        roll -= weight;
    }
    weights
        .iter()
        .rposition(|&w| clean(w) > 0.0)
        .unwrap_or(weights.len() - 1)
}

/// Choose who takes the possession under the given offensive scheme.
pub(crate) fn select_attacker<R>(
    players: &[Player],
    scheme: OffenseScheme,
    energy: &EnergyMap,
    rng: &mut R,
) -> usize
where
    R: Rng + ?Sized,
{
    let params = scheme.params();
    let mut top: Option<(usize, f64)> = None;
    for (idx, player) in players.iter().enumerate() {
        let usage = player.usage();
        if top.is_none_or(|(_, best)| usage > best) {
            top = Some((idx, usage));
        }
    }
    let top = top.map(|(idx, _)| idx);
    let weights: Weights = players
        .iter()
        .enumerate()
        .map(|(idx, p)| {
            params.usage_weight(
                p.usage(),
                p.three_attempt_share(),
                Some(idx) == top,
                energy_performance_multiplier(energy.get(p.id)),
            )
        })
        .collect();
    pick_weighted(&weights, rng)
}

/// Same-slot opponent most of the time, otherwise weighted by defense rating.
pub(crate) fn select_defender<R>(
    attacker: &Player,
    defenders: &[Player],
    same_slot_chance: f64,
    rng: &mut R,
) -> usize
where
    R: Rng + ?Sized,
{
    let roll = rng.r#gen::<f64>();
    if roll < same_slot_chance
        && let Some(idx) = defenders.iter().position(|d| d.slot() == attacker.slot())
    {
        return idx;
    }
    let weights: Weights = defenders.iter().map(|d| d.defense_rating.max(0.0)).collect();
    pick_weighted(&weights, rng)
}

/// Roll the assist credit for a made field goal.
pub(crate) fn select_assister<'p, R>(
    attacker: &Player,
    teammates: &'p [Player],
    scheme: OffenseScheme,
    rng: &mut R,
) -> Option<&'p Player>
where
    R: Rng + ?Sized,
{
    if rng.r#gen::<f64>() >= scheme.params().assist_chance() {
        return None;
    }
    let candidates: SmallVec<[&Player; 5]> =
        teammates.iter().filter(|p| p.id != attacker.id).collect();
    if candidates.is_empty() {
        return None;
    }
    let weights: Weights = candidates
        .iter()
        .map(|p| {
            let base = p.averages.assists.max(ASSIST_WEIGHT_FLOOR);
            if p.slot() == Position::PointGuard {
                base * POINT_GUARD_ASSIST_WEIGHT
            } else {
                base
            }
        })
        .collect();
    candidates.get(pick_weighted(&weights, rng)).copied()
}

/// Runs possessions against a [`GameState`] until the game is decided.
pub(crate) struct Driver<'a, T: PlayTextLibrary + ?Sized> {
    config: &'a EngineConfig,
    text: &'a T,
    rng: &'a RngBundle,
}

impl<'a, T: PlayTextLibrary + ?Sized> Driver<'a, T> {
    pub(crate) const fn new(config: &'a EngineConfig, text: &'a T, rng: &'a RngBundle) -> Self {
        Self { config, text, rng }
    }

    pub(crate) const fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Play from `index` of `period` through the final period.
    pub(crate) fn run(&self, state: &mut GameState, start_period: u8, start_index: u16) {
        let mut period = start_period;
        let mut index = start_index;
        loop {
            state.open_period(period);
            let length = self.config.period_length(period);
            while index < length {
                self.play_possession(state, period, index);
                index += 1;
            }
            log::debug!(
                "period {period} complete: {}-{}",
                state.score[0],
                state.score[1]
            );
            if self.is_decided(state, period) {
                break;
            }
            self.close_period(state, period, None);
            period = period.saturating_add(1);
            index = 0;
        }
    }

    /// Regulation is over and the totals differ.
    pub(crate) const fn is_decided(&self, state: &GameState, period: u8) -> bool {
        period >= self.config.regular_periods && state.score[0] != state.score[1]
    }

    /// Boundary processing between `period` and the next one.
    ///
    /// Tired opponents are swapped out after every non-final regular quarter,
    /// then the opponent re-picks its scheme for the upcoming period unless
    /// `scheme_override` pins it.
    pub(crate) fn close_period(
        &self,
        state: &mut GameState,
        period: u8,
        scheme_override: Option<SchemePair>,
    ) {
        let next = period.saturating_add(1);
        let swaps = if period < self.config.regular_periods {
            self.auto_substitute(state)
        } else {
            Vec::new()
        };

        let previous = state.away.scheme;
        state.away.scheme = scheme_override.unwrap_or_else(|| {
            evaluate_scheme(
                state.score[Side::Away.index()],
                state.score[Side::Home.index()],
                next,
                state.average_energy(Side::Away),
            )
        });
        if previous != state.away.scheme {
            log::debug!(
                "opponent switches from {previous} to {} for period {next}",
                state.away.scheme
            );
        }

        for (incoming, outgoing) in swaps {
            self.push_substitution(state, Side::Away, next, incoming, outgoing);
        }
    }

    fn auto_substitute(&self, state: &mut GameState) -> Vec<(PlayerRef, PlayerRef)> {
        let mut swaps = Vec::new();
        let mut benched = Vec::new();
        for slot_idx in 0..state.away.on_court.len() {
            let current = &state.away.on_court[slot_idx];
            if state.energy.get(current.id) >= self.config.auto_sub_energy_threshold {
                continue;
            }
            let slot = current.slot();
            let Some(bench_idx) = state.away.bench.iter().position(|p| p.can_play(slot)) else {
                continue;
            };
            let incoming = state.away.bench.remove(bench_idx).playing_as(slot);
            state.energy.set(incoming.id, self.config.fresh_energy);
            let incoming_ref = PlayerRef::from(&incoming);
            let mut outgoing = std::mem::replace(&mut state.away.on_court[slot_idx], incoming);
            let outgoing_ref = PlayerRef::from(&outgoing);
            outgoing.playing_as = None;
            benched.push(outgoing);
            swaps.push((incoming_ref, outgoing_ref));
        }
        state.away.bench.extend(benched);
        swaps
    }

    /// Append a substitution record; the outgoing player's streak is zeroed.
    pub(crate) fn push_substitution(
        &self,
        state: &mut GameState,
        side: Side,
        period: u8,
        player_in: PlayerRef,
        player_out: PlayerRef,
    ) {
        state.streaks.reset(player_out.id);
        log::debug!(
            "period {period}: {side:?} sends in {} for {}",
            player_in.name,
            player_out.name
        );
        let description = describe_substitution(self.text, &player_in, &player_out);
        state
            .plays
            .push(PlayRecord::Substitution(SubstitutionRecord {
                period,
                team: side,
                player_in,
                player_out,
                schemes: state.schemes(),
                score: state.score,
                energy: state.court_energy(),
                description,
            }));
    }

    fn play_possession(&self, state: &mut GameState, period: u8, index: u16) {
        let side = Side::for_possession(index);
        let schemes = state.schemes();
        let offense_scheme = schemes.side(side);
        let defense_scheme = schemes.side(side.other());

        let (attacker, defender) = {
            let mut rng = self.rng.selection();
            let offense = state.team(side);
            let defense = state.team(side.other());
            let a = select_attacker(
                &offense.on_court,
                offense_scheme.offense,
                &state.energy,
                &mut *rng,
            );
            let attacker = offense.on_court[a].clone();
            let d = select_defender(
                &attacker,
                &defense.on_court,
                self.config.same_position_defender_chance,
                &mut *rng,
            );
            (attacker, defense.on_court[d].clone())
        };

        let defense_params = defense_scheme.defense.params();
        let team_defense = defense_params
            .team_defense
            .then(|| team_defense_rating(&state.team(side.other()).on_court, &state.energy));
        let ctx = PossessionContext {
            attacker: &attacker,
            defender: &defender,
            attacker_energy: state.energy.get(attacker.id),
            defender_energy: state.energy.get(defender.id),
            zone_multiplier: state.streaks.zone(attacker.id).multiplier(),
            offense: offense_scheme.offense,
            defense: defense_scheme.defense,
            team_defense,
        };
        let outcome = simulate_one(&ctx, &mut *self.rng.possession());

        apply_possession_drain(
            &mut state.energy,
            &attacker,
            &defender,
            state.home.on_court.iter().chain(&state.away.on_court),
            outcome.drain_event(),
            defense_params.defender_drain_multiplier,
            self.config.passive_drain,
        );

        let assister = if outcome.is_made_field_goal() {
            let mut rng = self.rng.selection();
            select_assister(
                &attacker,
                &state.team(side).on_court,
                offense_scheme.offense,
                &mut *rng,
            )
            .cloned()
        } else {
            None
        };

        {
            let (offense, defense) = state.split_mut(side);
            record_possession(
                &mut offense.box_score,
                &mut defense.box_score,
                Participant::from(&attacker),
                Participant::from(&defender),
                assister.as_ref().map(Participant::from),
                &outcome,
            );
            record_on_court(
                &mut offense.box_score,
                offense.on_court.iter().map(Participant::from),
            );
            record_on_court(
                &mut defense.box_score,
                defense.on_court.iter().map(Participant::from),
            );
        }

        state.add_points(side, period, outcome.points());

        let entered = outcome
            .streak_result()
            .and_then(|success| state.streaks.record(attacker.id, success).entered);
        let streak = state.streaks.get(attacker.id);
        if let Some(zone) = entered {
            log::debug!("{} enters {zone:?} zone (streak {streak})", attacker.name);
        }

        let description = describe_possession(
            self.text,
            &PossessionText {
                attacker: &attacker,
                defender: &defender,
                assister: assister.as_ref(),
                outcome: &outcome,
                zone_entered: entered,
            },
        );
        log::trace!(
            "P{period}#{index} {side:?} {} vs {}: {outcome:?}",
            attacker.name,
            defender.name
        );

        let record = PossessionRecord {
            period,
            possession: index,
            team: side,
            attacker: PlayerRef::from(&attacker),
            defender: PlayerRef::from(&defender),
            assister: assister.as_ref().map(PlayerRef::from),
            turnover: outcome.is_turnover(),
            made: outcome.is_made(),
            points: outcome.points(),
            shot_type: outcome.shot_type(),
            special_event: outcome.special_event(),
            free_throws_made: outcome.free_throws_made(),
            defensive_rebound: outcome.defensive_rebound(),
            converted_three: outcome.converted_three(),
            hit_chance: outcome.hit_chance(),
            attacker_energy: state.energy.get(attacker.id),
            defender_energy: state.energy.get(defender.id),
            streak,
            zone: Zone::from_streak(streak),
            zone_entered: entered.is_some(),
            schemes,
            score: state.score,
            energy: state.court_energy(),
            description,
        };
        state.plays.push(PlayRecord::Possession(record));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::StatLine;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn lineup(offset: u32) -> Vec<Player> {
        Position::ALL
            .iter()
            .zip(offset..)
            .map(|(&pos, id)| Player::new(id, format!("Player {id}"), pos))
            .collect()
    }

    #[test]
    fn pick_weighted_respects_zero_weights() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..200 {
            assert_eq!(pick_weighted(&[0.0, 5.0, 0.0], &mut rng), 1);
        }
        let uniform = pick_weighted(&[0.0, 0.0], &mut rng);
        assert!(uniform < 2);
        assert_eq!(pick_weighted(&[], &mut rng), 0);
    }

    #[test]
    fn isolation_feeds_the_top_usage_player() {
        let mut players = lineup(0);
        players[2].usage_possessions = Some(25.0);
        let energy = EnergyMap::new();
        let mut rng = SmallRng::seed_from_u64(9);
        let mut counts = [0_u32; 5];
        for _ in 0..5_000 {
            counts[select_attacker(&players, OffenseScheme::Isolation, &energy, &mut rng)] += 1;
        }
        let top = counts[2];
        assert!(counts.iter().enumerate().all(|(i, &c)| i == 2 || c < top));
    }

    #[test]
    fn tired_players_get_the_ball_less() {
        let players = lineup(0);
        let mut energy = EnergyMap::new();
        energy.set(players[0].id, 10.0);
        let mut rng = SmallRng::seed_from_u64(5);
        let mut counts = [0_u32; 5];
        for _ in 0..5_000 {
            counts[select_attacker(&players, OffenseScheme::BallMovement, &energy, &mut rng)] += 1;
        }
        assert!(counts[0] < counts[1]);
    }

    #[test]
    fn defender_matches_slot_when_forced() {
        let home = lineup(0);
        let away = lineup(10);
        let mut rng = SmallRng::seed_from_u64(1);
        for attacker in &home {
            let idx = select_defender(attacker, &away, 1.0, &mut rng);
            assert_eq!(away[idx].slot(), attacker.slot());
        }
    }

    #[test]
    fn defender_matches_slot_at_configured_rate() {
        const SAMPLE_SIZE: u32 = 20_000;
        const TOLERANCE: f64 = 0.015;
        let chance = EngineConfig::default().same_position_defender_chance;
        let attacker = Player::new(1, "Wing", Position::SmallForward);
        // The matching defender carries no weight, so only the slot roll reaches it.
        let defenders: Vec<Player> = lineup(10)
            .into_iter()
            .map(|p| {
                let rating = if p.slot() == attacker.slot() { 0.0 } else { 100.0 };
                p.with_ratings(100.0, rating)
            })
            .collect();
        let mut rng = SmallRng::seed_from_u64(23);
        let mut matched = 0_u32;
        for _ in 0..SAMPLE_SIZE {
            let idx = select_defender(&attacker, &defenders, chance, &mut rng);
            if defenders[idx].slot() == attacker.slot() {
                matched += 1;
            }
        }
        let rate = f64::from(matched) / f64::from(SAMPLE_SIZE);
        assert!((rate - chance).abs() < TOLERANCE, "same-slot rate {rate}");
    }

    #[test]
    fn quarter_break_scheme_reads_post_swap_energy() {
        use crate::game::state::TeamState;
        use crate::scheme::DefenseScheme;
        use crate::text::BuiltinPlayText;

        let config = EngineConfig::default();
        let rng = RngBundle::from_user_seed(4);
        let driver = Driver::new(&config, BuiltinPlayText::default_catalog(), &rng);
        let mut state = GameState::new(
            TeamState::new(Side::Home, &lineup(0), &[], SchemePair::default()),
            TeamState::new(Side::Away, &lineup(10), &lineup(20), SchemePair::default()),
        );
        state.fill_energy(config.fresh_energy);
        for (idx, player) in lineup(10).iter().enumerate() {
            state.energy.set(player.id, if idx < 3 { 30.0 } else { 60.0 });
        }
        let tired = state.average_energy(Side::Away);
        assert_eq!(evaluate_scheme(0, 0, 2, tired).defense, DefenseScheme::Zone);

        driver.close_period(&mut state, 1, None);

        let rested = state.average_energy(Side::Away);
        assert!((rested - 84.0).abs() < 1e-9, "post-swap average {rested}");
        assert_eq!(state.away.scheme, evaluate_scheme(0, 0, 2, rested));
        assert_ne!(state.away.scheme, evaluate_scheme(0, 0, 2, tired));
        let subs: Vec<_> = state
            .plays
            .iter()
            .filter_map(PlayRecord::as_substitution)
            .collect();
        assert_eq!(subs.len(), 3);
        assert!(subs.iter().all(|s| s.period == 2 && s.schemes.away == state.away.scheme));
    }

    #[test]
    fn assister_is_never_the_shooter() {
        let mut team = lineup(0);
        team[0].averages = StatLine {
            assists: 9.0,
            ..StatLine::default()
        };
        let mut rng = SmallRng::seed_from_u64(17);
        let mut credited = 0_u32;
        for _ in 0..2_000 {
            if let Some(helper) =
                select_assister(&team[1], &team, OffenseScheme::BallMovement, &mut rng)
            {
                assert_ne!(helper.id, team[1].id);
                credited += 1;
            }
        }
        let rate = f64::from(credited) / 2_000.0;
        assert!((rate - 0.81).abs() < 0.04, "assist rate {rate}");
    }
}
