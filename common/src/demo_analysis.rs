use crate::{RoundEventRecord, Side};

/// Everything the analysis hands over to storage for a single match.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MatchReport {
    pub map: String,
    pub total_rounds: usize,
    pub ct_score: usize,
    pub t_score: usize,
    pub rounds_skipped: usize,
    pub round_winners: Vec<Side>,
    pub first_half: HalfScore,
    pub second_half: HalfScore,
    /// Rounds won by the team that started on CT.
    pub team1_score: usize,
    /// Rounds won by the team that started on T.
    pub team2_score: usize,
    pub winner: MatchWinner,
    pub players: Vec<PlayerRow>,
    pub mvp: Option<PlayerRow>,
    pub round_events: Vec<RoundEventRecord<String>>,
    pub error: Option<String>,
}

impl MatchReport {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            map: "Unknown".to_owned(),
            total_rounds: 0,
            ct_score: 0,
            t_score: 0,
            rounds_skipped: 0,
            round_winners: Vec::new(),
            first_half: HalfScore::default(),
            second_half: HalfScore::default(),
            team1_score: 0,
            team2_score: 0,
            winner: MatchWinner::StartedT,
            players: Vec::new(),
            mvp: None,
            round_events: Vec::new(),
            error: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HalfScore {
    pub ct: usize,
    pub t: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MatchWinner {
    StartedCt,
    StartedT,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlayerRow {
    pub nickname: String,
    pub steam_id: String,
    pub team: String,
    pub kills: usize,
    pub deaths: usize,
    pub assists: usize,
    pub kd: f64,
    pub headshot_percent: f64,
    pub adr: f64,
    pub first_kills: usize,
    pub first_deaths: usize,
    pub rating: f64,
    pub weapons: Vec<WeaponRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WeaponRow {
    pub weapon: String,
    pub kills: usize,
    pub headshots: usize,
    pub damage: i64,
}
