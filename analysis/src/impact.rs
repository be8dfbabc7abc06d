//! Impact rating: a per-match performance score centered around 1.00.
//!
//! Every kill and every piece of credited damage is turned into points,
//! weighted by how much the round mattered (leverage), how many players were
//! still alive (state) and whether it looked like an eco (discount). Points
//! per round are then standardized across the players of the match.

use std::collections::{BTreeMap, HashMap};

use common::{EventType, RoundEventRecord};

pub const KILL_BASE: f64 = 1.00;
/// Bonus for a kill while both teams still had all five players.
pub const OPENING_KILL_BONUS: f64 = 0.35;
pub const HEADSHOT_BONUS: f64 = 0.05;
/// Bonus by number of kills the player already had in the round.
pub const MULTI_KILL_BONUS: [f64; 4] = [0.0, 0.10, 0.20, 0.30];
pub const DAMAGE_WEIGHT: f64 = 0.35;
pub const ECO_DISCOUNT: f64 = 0.75;

pub const RATING_SCALE: f64 = 0.22;
pub const MIN_RATING: f64 = 0.50;
pub const MAX_RATING: f64 = 2.00;

const FULL_SQUADS: u32 = 10;
const VARIANCE_EPSILON: f64 = 1e-9;

/// How much a round matters given the score before it, between 1.0 and 1.55.
pub fn leverage(score_t: usize, score_ct: usize) -> f64 {
    let total = (score_t + score_ct) as f64;
    let diff = (score_t as f64 - score_ct as f64).abs();

    let closeness = (1.0 - diff / total.max(1.0)).clamp(0.0, 1.0);
    let lateness = ((total - 10.0) / 14.0).clamp(0.0, 1.0);
    let decider = if total >= 22.0 { 1.0 } else { 0.0 };

    1.0 + 0.25 * closeness + 0.15 * lateness + 0.15 * decider
}

/// Actions get worth more the fewer players are left alive.
pub fn state_factor(alive_t: u8, alive_ct: u8) -> f64 {
    let alive = alive_t as u32 + alive_ct as u32;
    let missing = FULL_SQUADS.saturating_sub(alive) as f64;

    1.0 + (missing / 10.0) * 0.8
}

pub fn eco_factor<A>(record: &RoundEventRecord<A>) -> f64 {
    if record.eco_t || record.eco_ct {
        ECO_DISCOUNT
    } else {
        1.0
    }
}

fn context_factor<A>(record: &RoundEventRecord<A>) -> f64 {
    state_factor(record.alive_t, record.alive_ct)
        * leverage(record.score_t, record.score_ct)
        * eco_factor(record)
}

/// Points for a kill, `prior_kills` being the attacker's earlier kills in the same round.
pub fn kill_points<A>(record: &RoundEventRecord<A>, prior_kills: usize) -> f64 {
    let mut value = KILL_BASE;
    if record.alive_t as u32 + record.alive_ct as u32 >= FULL_SQUADS {
        value += OPENING_KILL_BONUS;
    }
    if record.is_headshot {
        value += HEADSHOT_BONUS;
    }
    value += MULTI_KILL_BONUS[prior_kills.min(MULTI_KILL_BONUS.len() - 1)];

    value * context_factor(record)
}

pub fn damage_points<A>(record: &RoundEventRecord<A>) -> f64 {
    let damage = record.damage.clamp(0.0, 100.0);

    (damage / 100.0) * DAMAGE_WEIGHT * context_factor(record)
}

/// Mean and sample standard deviation, the deviation being 1.0 when it would be degenerate.
pub fn normalization(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 1.0);
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0).max(1.0);

    let std = if variance > VARIANCE_EPSILON {
        variance.sqrt()
    } else {
        1.0
    };
    (mean, std)
}

/// Raw impact points per actor, before normalization.
pub fn points<A>(records: &[RoundEventRecord<A>]) -> BTreeMap<A, f64>
where
    A: Ord + Clone,
{
    let mut ordered: Vec<&RoundEventRecord<A>> = records.iter().collect();
    ordered.sort_by_key(|r| (r.round_number, r.tick.unwrap_or(i64::MAX)));

    let mut points = BTreeMap::<A, f64>::new();
    let mut round_kills = BTreeMap::<(usize, A), usize>::new();

    for record in ordered {
        let attacker = match record.attacker_id.as_ref() {
            Some(a) => a,
            None => continue,
        };

        let value = match record.event_type {
            EventType::Kill => {
                let kills: &mut usize = round_kills
                    .entry((record.round_number, attacker.clone()))
                    .or_default();
                let prior = *kills;
                *kills += 1;

                kill_points(record, prior)
            }
            EventType::Damage => damage_points(record),
        };

        *points.entry(attacker.clone()).or_default() += value;
    }

    points
}

/// Computes the impact rating of every actor with at least one scored event.
#[tracing::instrument(skip(records), fields(records = records.len()))]
pub fn compute<A>(records: &[RoundEventRecord<A>], total_rounds: usize) -> BTreeMap<A, f64>
where
    A: Ord + Clone,
{
    let rounds = total_rounds.max(1) as f64;
    let per_round: BTreeMap<A, f64> = points(records)
        .into_iter()
        .map(|(actor, value)| (actor, value / rounds))
        .collect();

    let values: Vec<f64> = per_round.values().copied().collect();
    let (mean, std) = normalization(&values);
    tracing::debug!("{} rated actors, mean {:.4}, std {:.4}", values.len(), mean, std);

    per_round
        .into_iter()
        .map(|(actor, value)| {
            let z = (value - mean) / std;
            let rating = (1.0 + z * RATING_SCALE).clamp(MIN_RATING, MAX_RATING);
            (actor, crate::round_to(rating, 2))
        })
        .collect()
}

/// Rates records loaded back from storage, keyed by the identity they map to.
///
/// Actors without an entry in `identities` are rated along with everyone else
/// but left out of the result.
pub fn compute_for_identities<A, I>(
    records: &[RoundEventRecord<A>],
    total_rounds: usize,
    identities: &HashMap<A, I>,
) -> HashMap<I, f64>
where
    A: Ord + Clone + std::hash::Hash,
    I: Clone + Eq + std::hash::Hash,
{
    compute(records, total_rounds)
        .into_iter()
        .filter_map(|(actor, rating)| Some((identities.get(&actor)?.clone(), rating)))
        .collect()
}

/// Impact ratings for a finished analysis, keyed by steam id.
pub fn for_report(report: &common::demo_analysis::MatchReport) -> BTreeMap<String, f64> {
    compute(&report.round_events, report.total_rounds)
}
