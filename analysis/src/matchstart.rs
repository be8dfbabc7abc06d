use common::Side;

/// What the detector needs to know about a candidate round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    pub winner: Side,
    /// At least one death and every death was a melee kill.
    pub knife_only: bool,
    pub has_deaths: bool,
    pub end_tick: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMethod {
    Announcement,
    KnifeRound,
    WinnerPattern,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchStart {
    /// Index into the candidate rounds of the first scored round.
    pub first_round: usize,
    pub method: StartMethod,
}

/// Rounds considered by the winner pattern heuristic.
const PATTERN_SCAN_LIMIT: usize = 5;

/// Finds the first round of the actual match, skipping warmup and knife rounds.
///
/// The checks are tried in order and the first one that applies decides:
/// the last match start announcement, then the first knife-only round, then
/// the first change of the winning side within the opening rounds.
pub fn detect(rounds: &[RoundSummary], announcements: &[Option<i64>]) -> MatchStart {
    if let Some(first_round) = after_announcement(rounds, announcements) {
        return MatchStart {
            first_round,
            method: StartMethod::Announcement,
        };
    }

    if let Some(knife_round) = rounds.iter().position(|r| r.knife_only) {
        tracing::debug!("Knife round at {}", knife_round + 1);
        return MatchStart {
            first_round: knife_round + 1,
            method: StartMethod::KnifeRound,
        };
    }

    let scan_end = PATTERN_SCAN_LIMIT.min(rounds.len().saturating_sub(1));
    if let Some(first_round) =
        (1..scan_end).find(|i| rounds[*i].winner != rounds[*i - 1].winner)
    {
        return MatchStart {
            first_round,
            method: StartMethod::WinnerPattern,
        };
    }

    MatchStart {
        first_round: 0,
        method: StartMethod::Fallback,
    }
}

fn after_announcement(rounds: &[RoundSummary], announcements: &[Option<i64>]) -> Option<usize> {
    let announced_at = (*announcements.last()?)?;
    tracing::debug!("Using last match start announcement at tick {}", announced_at);

    let (index, round) = rounds
        .iter()
        .enumerate()
        .find(|(_, r)| r.end_tick.map(|t| t > announced_at).unwrap_or(false))?;

    if round.knife_only {
        tracing::debug!("Round {} after the announcement is a knife round", index + 1);
        Some(index + 1)
    } else {
        Some(index)
    }
}
