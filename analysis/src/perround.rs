use common::Side;

use crate::endofgame::{self, MatchStats, RoundContext};
use crate::error::AnalysisError;
use crate::event::{coerce_tick, CombatEvent, EventKind, RawEvent, RawValue};
use crate::matchstart::{self, MatchStart, RoundSummary};

/// Numeric winner codes used by the game for the two teams.
pub static WINNER_CODES: phf::Map<i64, Side> = phf::phf_map! {
    2_i64 => Side::T,
    3_i64 => Side::CT,
};

/// Decodes the winner column of a round end, `None` if it names neither team.
pub fn decode_winner(winner: Option<&RawValue>) -> Option<Side> {
    let code = match winner? {
        RawValue::I64(v) => *v,
        RawValue::U64(v) => i64::try_from(*v).ok()?,
        RawValue::F64(v) if v.fract() == 0.0 => *v as i64,
        RawValue::Str(s) => {
            let s = s.trim();
            if s.is_empty() || crate::event::is_placeholder(s) {
                return None;
            }

            if s.chars().all(|c| c.is_ascii_digit()) {
                s.parse::<i64>().ok()?
            } else {
                let upper = s.to_uppercase();
                if upper.contains("CT") {
                    return Some(Side::CT);
                }
                if upper == "T" || upper.contains("TERROR") {
                    return Some(Side::T);
                }
                return None;
            }
        }
        _ => return None,
    };

    WINNER_CODES.get(&code).copied()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub winner: Side,
    pub end_tick: Option<i64>,
    pub events: Vec<CombatEvent>,
}

impl Round {
    fn death_weapons(&self) -> impl Iterator<Item = &str> {
        self.events
            .iter()
            .filter(|e| e.kind == EventKind::Death)
            .map(|e| e.weapon.as_str())
    }

    pub fn has_deaths(&self) -> bool {
        self.death_weapons().next().is_some()
    }

    pub fn is_knife_only(&self) -> bool {
        self.has_deaths() && self.death_weapons().all(crate::eco::is_melee)
    }

    pub fn summary(&self) -> RoundSummary {
        RoundSummary {
            winner: self.winner,
            knife_only: self.is_knife_only(),
            has_deaths: self.has_deaths(),
            end_tick: self.end_tick,
        }
    }
}

/// Every round of the demo with a resolvable winner, warmup and knife rounds included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateRounds {
    pub rounds: Vec<Round>,
    pub announcements: Vec<Option<i64>>,
    /// Round ends dropped because their winner could not be decoded.
    pub unresolved: usize,
}

/// Splits the ordered event stream at its round ends.
pub fn collect_rounds(events: &[RawEvent]) -> Result<CandidateRounds, AnalysisError> {
    let mut result = CandidateRounds::default();

    let mut buffer = Vec::new();
    for event in events.iter() {
        match event.kind {
            EventKind::MatchStartAnnounce => {
                let tick = coerce_tick(event.tick.as_ref());
                tracing::debug!("Match start announced at tick {:?}", tick);
                result.announcements.push(tick);
            }
            EventKind::Death | EventKind::Hurt => {
                buffer.push(CombatEvent::from_raw(event)?);
            }
            EventKind::RoundEnd => {
                let events = std::mem::take(&mut buffer);
                match decode_winner(event.winner.as_ref()) {
                    Some(winner) => result.rounds.push(Round {
                        winner,
                        end_tick: coerce_tick(event.tick.as_ref()),
                        events,
                    }),
                    None => {
                        tracing::warn!("Dropping round with unknown winner {:?}", event.winner);
                        result.unresolved += 1;
                    }
                }
            }
        }
    }

    if !buffer.is_empty() {
        tracing::debug!("{} events after the last round end", buffer.len());
    }

    Ok(result)
}

#[derive(Debug, Clone)]
pub struct Reconstruction {
    pub start: MatchStart,
    pub rounds_skipped: usize,
    pub total_rounds: usize,
    pub ct_score: usize,
    pub t_score: usize,
    pub round_winners: Vec<Side>,
    pub stats: MatchStats,
}

/// Replays the scored rounds of the match, accumulating player stats and round events.
#[tracing::instrument(skip(events))]
pub fn reconstruct(events: &[RawEvent]) -> Result<Reconstruction, AnalysisError> {
    let candidates = collect_rounds(events)?;
    tracing::debug!(
        "Found {} rounds and {} announcements",
        candidates.rounds.len(),
        candidates.announcements.len()
    );

    let summaries: Vec<RoundSummary> = candidates.rounds.iter().map(|r| r.summary()).collect();
    let start = matchstart::detect(&summaries, &candidates.announcements);
    let rounds_skipped = start.first_round.min(candidates.rounds.len());
    tracing::info!(
        "Match starts at round {} ({:?}), skipping {}",
        start.first_round + 1,
        start.method,
        rounds_skipped
    );

    let mut stats = MatchStats::default();
    let mut round_winners = Vec::new();
    let (mut ct_score, mut t_score) = (0, 0);

    for (offset, round) in candidates.rounds.iter().skip(rounds_skipped).enumerate() {
        let number = offset + 1;
        let _tracing_guard = tracing::debug_span!("Round", number).entered();

        let mut context = RoundContext::new(number, t_score, ct_score);
        for event in round.events.iter() {
            match event.kind {
                EventKind::Death => endofgame::player_death(event, &mut context, &mut stats),
                EventKind::Hurt => endofgame::player_hurt(event, &mut context, &mut stats),
                _ => {}
            }
        }
        endofgame::finish_round(context, &mut stats);

        match round.winner {
            Side::CT => ct_score += 1,
            _ => t_score += 1,
        }
        round_winners.push(round.winner);
    }

    tracing::info!(
        "Final score CT {} - {} T over {} rounds",
        ct_score,
        t_score,
        round_winners.len()
    );

    Ok(Reconstruction {
        start,
        rounds_skipped,
        total_rounds: round_winners.len(),
        ct_score,
        t_score,
        round_winners,
        stats,
    })
}
