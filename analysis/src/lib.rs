//! Turns the decoded events of a demo into a scored match.
//!
//! The pipeline runs [`normalize`] -> [`perround`] (which uses [`matchstart`]
//! and [`endofgame`]) and produces a [`MatchReport`]. Impact ratings are
//! computed separately by [`impact`] from the round events of the report.

use common::demo_analysis::{HalfScore, MatchReport, MatchWinner};
use common::Side;

pub mod eco;
pub mod endofgame;
pub mod error;
pub mod event;
pub mod impact;
pub mod matchstart;
pub mod normalize;
pub mod perround;

pub use error::AnalysisError;
pub use event::{ActorId, DecodedDemo, EventKind, RawEvent, RawValue};

#[derive(Debug, Clone)]
pub struct Config {
    /// Number of rounds in the first half, 12 for MR12.
    pub halftime_round: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { halftime_round: 12 }
    }
}

/// Analyses a demo, reporting failures inside the returned report.
pub fn analyse(config: &Config, demo: &DecodedDemo) -> MatchReport {
    match try_analyse(config, demo) {
        Ok(report) => report,
        Err(e) => {
            tracing::warn!("Analysis failed: {}", e);
            MatchReport::failed(e.to_string())
        }
    }
}

#[tracing::instrument(skip(config, demo), fields(map = ?demo.map_name))]
pub fn try_analyse(config: &Config, demo: &DecodedDemo) -> Result<MatchReport, AnalysisError> {
    let events = normalize::normalize(demo)?;
    let mut reconstruction = perround::reconstruct(&events)?;

    let players = endofgame::finalize(&mut reconstruction.stats, reconstruction.total_rounds);
    let (first_half, second_half) = half_scores(&reconstruction.round_winners, config.halftime_round);

    let team1_score = first_half.ct + second_half.t;
    let team2_score = first_half.t + second_half.ct;
    let winner = if team1_score > team2_score {
        MatchWinner::StartedCt
    } else {
        MatchWinner::StartedT
    };

    let round_events = reconstruction
        .stats
        .records
        .into_iter()
        .map(|record| record.map_actors(|actor| Some(actor.0)))
        .collect();

    Ok(MatchReport {
        map: demo
            .map_name
            .as_deref()
            .and_then(|m| event::clean_text(Some(m)))
            .unwrap_or_else(|| "Unknown".to_owned()),
        total_rounds: reconstruction.total_rounds,
        ct_score: reconstruction.ct_score,
        t_score: reconstruction.t_score,
        rounds_skipped: reconstruction.rounds_skipped,
        round_winners: reconstruction.round_winners,
        first_half,
        second_half,
        team1_score,
        team2_score,
        winner,
        mvp: players.first().cloned(),
        players,
        round_events,
        error: None,
    })
}

/// Splits the round wins into the two halves of the match.
pub fn half_scores(round_winners: &[Side], halftime_round: usize) -> (HalfScore, HalfScore) {
    let split = halftime_round.min(round_winners.len());
    let (first, second) = round_winners.split_at(split);

    let count = |rounds: &[Side], side: Side| rounds.iter().filter(|w| **w == side).count();
    let first_ct = count(first, Side::CT);
    let second_ct = count(second, Side::CT);

    (
        HalfScore {
            ct: first_ct,
            t: first.len() - first_ct,
        },
        HalfScore {
            ct: second_ct,
            t: second.len() - second_ct,
        },
    )
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}
