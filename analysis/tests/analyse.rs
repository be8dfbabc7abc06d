mod fixtures;

use ::common::demo_analysis::{HalfScore, MatchWinner};
use ::common::Side;
use analysis::{analyse, impact, Config, DecodedDemo, RawEvent};
use fixtures::*;
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

fn short_match() -> Vec<RawEvent> {
    let mut events = Vec::new();

    // warmup
    events.extend(simple_round(100, ("1", CT), ("6", T), "ak47", "CT"));
    events.push(announce(250));
    // knife round
    events.extend(simple_round(300, ("1", CT), ("6", T), "knife", "CT"));

    events.extend(vec![
        headshot(death(510, ("1", CT), ("6", T), "m4a1")),
        hurt(520, ("1", CT), ("7", T), 60.0, "m4a1"),
        death(530, ("2", CT), ("7", T), "awp"),
        round_end(600, 3_i64),
    ]);
    events.extend(vec![
        death(710, ("6", T), ("1", CT), "ak47"),
        round_end(800, 2_i64),
    ]);
    // sides swapped
    events.extend(simple_round(900, ("1", T), ("6", CT), "ak47", "TERRORIST"));

    events
}

#[test]
#[traced_test]
fn full_match() {
    let config = Config { halftime_round: 2 };

    let report = analyse(&config, &demo(short_match()));

    assert_eq!(report.error, None);
    assert_eq!(report.map, "de_nuke");
    assert_eq!(report.rounds_skipped, 2);
    assert_eq!(report.total_rounds, 3);
    assert_eq!((report.ct_score, report.t_score), (1, 2));
    assert_eq!(report.round_winners, vec![Side::CT, Side::T, Side::T]);
    assert_eq!(report.first_half, HalfScore { ct: 1, t: 1 });
    assert_eq!(report.second_half, HalfScore { ct: 0, t: 1 });
    assert_eq!((report.team1_score, report.team2_score), (2, 1));
    assert_eq!(report.winner, MatchWinner::StartedCt);

    let scoreboard: Vec<_> = report
        .players
        .iter()
        .map(|p| (p.steam_id.as_str(), p.kills, p.deaths, p.assists, p.rating))
        .collect();
    assert_eq!(
        scoreboard,
        vec![
            ("1", 2, 1, 0, 1.07),
            ("2", 1, 0, 0, 0.69),
            ("6", 1, 2, 0, 0.52),
            ("7", 0, 1, 0, 0.17),
        ]
    );
    assert_eq!(report.players[0].adr, 20.0);
    assert_eq!(report.players[0].first_kills, 2);
    assert_eq!(report.mvp.as_ref().map(|p| p.steam_id.as_str()), Some("1"));

    assert_eq!(report.round_events.len(), 5);
    assert!(report.round_events.iter().all(|r| r.round_number >= 1 && r.round_number <= 3));

    let ratings = impact::for_report(&report);
    assert_eq!(ratings.keys().collect::<Vec<_>>(), vec!["1", "2", "6"]);
    assert!(ratings.values().all(|r| (0.5..=2.0).contains(r)));

    assert!(logs_contain("Match starts at round 3"));
}

#[test]
fn ratings_survive_storage() {
    let report = analyse(&Config::default(), &demo(short_match()));

    let stored = serde_json::to_string(&report).unwrap();
    let loaded: ::common::demo_analysis::MatchReport = serde_json::from_str(&stored).unwrap();

    assert_eq!(impact::for_report(&loaded), impact::for_report(&report));
}

#[test]
fn default_halftime() {
    let report = analyse(&Config::default(), &demo(short_match()));

    assert_eq!(report.first_half, HalfScore { ct: 1, t: 2 });
    assert_eq!(report.second_half, HalfScore { ct: 0, t: 0 });
    assert_eq!((report.team1_score, report.team2_score), (1, 2));
    assert_eq!(report.winner, MatchWinner::StartedT);
}

#[test]
#[traced_test]
fn empty_demo_reports_error() {
    let report = analyse(&Config::default(), &DecodedDemo::default());

    assert_eq!(report.error.as_deref(), Some("No events found"));
    assert_eq!(report.map, "Unknown");
    assert_eq!(report.total_rounds, 0);
    assert!(report.players.is_empty());
    assert!(report.round_events.is_empty());
    assert!(logs_contain("Analysis failed"));
}

#[test]
fn malformed_damage_reports_error() {
    let mut events = short_match();
    let mut bad = hurt(515, ("1", CT), ("6", T), 10.0, "m4a1");
    bad.damage = Some("lots".into());
    events.push(bad);

    let report = analyse(&Config::default(), &demo(events));

    assert!(report.is_error());
    assert!(report.players.is_empty());
    assert!(report.mvp.is_none());
}

#[test]
fn decoder_json() {
    let json = r#"{
        "map_name": "de_dust2",
        "deaths": [
            {"kind": "Death", "tick": "120", "attacker": 76561198000000001, "attacker_name": "a",
             "attacker_team": "CT", "victim": "76561198000000002",
             "victim_name": "b", "victim_team": "TERRORIST", "weapon": "weapon_ak47", "headshot": true}
        ],
        "hurts": [
            {"kind": "Hurt", "tick": 110.0, "attacker": 76561198000000001, "attacker_name": "a",
             "attacker_team": "CT", "victim": "76561198000000002", "victim_name": "b",
             "victim_team": "TERRORIST", "weapon": "ak47", "damage": 27}
        ],
        "round_ends": [
            {"kind": "RoundEnd", "tick": 200, "winner": "CT"}
        ]
    }"#;

    let demo: DecodedDemo = serde_json::from_str(json).unwrap();
    let report = analyse(&Config::default(), &demo);

    assert_eq!(report.error, None);
    assert_eq!(report.map, "de_dust2");
    assert_eq!(report.total_rounds, 1);

    let player = &report.players[0];
    assert_eq!(player.steam_id, "76561198000000001");
    assert_eq!((player.kills, player.headshot_percent, player.adr), (1, 100.0, 27.0));
    assert_eq!(player.weapons[0].weapon, "ak47");
    assert_eq!(player.weapons[0].damage, 27);
}
