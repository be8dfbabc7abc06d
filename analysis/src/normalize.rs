use crate::error::AnalysisError;
use crate::event::{coerce_tick, DecodedDemo, EventKind, RawEvent};

/// Merges the decoder's event categories into a single stream ordered by tick.
///
/// Events without a usable tick are moved to the end. The sort is stable, so
/// events sharing a tick keep the order deaths, hurts, round ends, announcements
/// and their order inside the category.
#[tracing::instrument(skip(demo))]
pub fn normalize(demo: &DecodedDemo) -> Result<Vec<RawEvent>, AnalysisError> {
    let categories = [
        (EventKind::Death, &demo.deaths),
        (EventKind::Hurt, &demo.hurts),
        (EventKind::RoundEnd, &demo.round_ends),
        (EventKind::MatchStartAnnounce, &demo.match_start_announcements),
    ];

    let mut events: Vec<RawEvent> = categories
        .into_iter()
        .flat_map(|(kind, events)| {
            events.iter().cloned().map(move |mut event| {
                event.kind = kind;
                event
            })
        })
        .collect();

    if events.is_empty() {
        return Err(AnalysisError::EmptyDemo);
    }

    events.sort_by_key(|event| match coerce_tick(event.tick.as_ref()) {
        Some(tick) => (0, tick),
        None => (1, 0),
    });

    tracing::debug!("Normalized {} events", events.len());

    Ok(events)
}
