#![allow(dead_code)]

use analysis::{DecodedDemo, EventKind, RawEvent};

pub const CT: &str = "CT";
pub const T: &str = "TERRORIST";

fn with_player(id: &str) -> (Option<analysis::RawValue>, Option<String>) {
    (Some(id.into()), Some(format!("player_{}", id)))
}

pub fn death(tick: i64, attacker: (&str, &str), victim: (&str, &str), weapon: &str) -> RawEvent {
    let mut event = RawEvent::new(EventKind::Death);
    event.tick = Some(tick.into());
    (event.attacker, event.attacker_name) = with_player(attacker.0);
    event.attacker_team = Some(attacker.1.to_owned());
    (event.victim, event.victim_name) = with_player(victim.0);
    event.victim_team = Some(victim.1.to_owned());
    event.weapon = Some(weapon.to_owned());
    event.headshot = Some(false.into());
    event
}

pub fn headshot(mut event: RawEvent) -> RawEvent {
    event.headshot = Some(true.into());
    event
}

pub fn assisted(mut event: RawEvent, assister: (&str, &str)) -> RawEvent {
    (event.assister, event.assister_name) = with_player(assister.0);
    event.assister_team = Some(assister.1.to_owned());
    event
}

pub fn hurt(
    tick: i64,
    attacker: (&str, &str),
    victim: (&str, &str),
    damage: f64,
    weapon: &str,
) -> RawEvent {
    let mut event = RawEvent::new(EventKind::Hurt);
    event.tick = Some(tick.into());
    (event.attacker, event.attacker_name) = with_player(attacker.0);
    event.attacker_team = Some(attacker.1.to_owned());
    (event.victim, event.victim_name) = with_player(victim.0);
    event.victim_team = Some(victim.1.to_owned());
    event.weapon = Some(weapon.to_owned());
    event.damage = Some(damage.into());
    event
}

pub fn round_end(tick: i64, winner: impl Into<analysis::RawValue>) -> RawEvent {
    let mut event = RawEvent::new(EventKind::RoundEnd);
    event.tick = Some(tick.into());
    event.winner = Some(winner.into());
    event
}

pub fn announce(tick: i64) -> RawEvent {
    let mut event = RawEvent::new(EventKind::MatchStartAnnounce);
    event.tick = Some(tick.into());
    event
}

/// Sorts the events into the decoder's categories.
pub fn demo(events: Vec<RawEvent>) -> DecodedDemo {
    let mut demo = DecodedDemo {
        map_name: Some("de_nuke".to_owned()),
        ..Default::default()
    };

    for event in events {
        match event.kind {
            EventKind::Death => demo.deaths.push(event),
            EventKind::Hurt => demo.hurts.push(event),
            EventKind::RoundEnd => demo.round_ends.push(event),
            EventKind::MatchStartAnnounce => demo.match_start_announcements.push(event),
        }
    }

    demo
}

/// A round in which `attacker` kills `victim` with `weapon`, won by `winner`.
pub fn simple_round(
    start_tick: i64,
    attacker: (&str, &str),
    victim: (&str, &str),
    weapon: &str,
    winner: &str,
) -> Vec<RawEvent> {
    vec![
        death(start_tick + 10, attacker, victim, weapon),
        round_end(start_tick + 100, winner),
    ]
}

pub fn approx(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-9
}
