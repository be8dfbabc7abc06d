pub mod demo_analysis;

/// The side a player was playing on when an event happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Side {
    CT,
    T,
    Unknown,
}

impl Side {
    /// Normalizes a free-text team name coming from the decoder.
    pub fn from_team_name(name: &str) -> Self {
        let upper = name.trim().to_uppercase();
        if upper.is_empty() || upper == "NAN" || upper == "NONE" {
            return Self::Unknown;
        }

        if upper.contains("CT") || upper.contains("COUNTER") {
            Self::CT
        } else if upper == "T" || upper.contains("TERROR") {
            Self::T
        } else {
            Self::Unknown
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    pub fn opposite(&self) -> Self {
        match self {
            Self::CT => Self::T,
            Self::T => Self::CT,
            Self::Unknown => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Kill,
    Damage,
}

/// A kill or a credited damage action, enriched with the round context it happened in.
///
/// `A` is the actor key. Freshly reconstructed records use the decoder's
/// identifiers, records loaded back from storage usually use a database id.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RoundEventRecord<A> {
    pub event_type: EventType,
    pub round_number: usize,
    pub tick: Option<i64>,
    pub attacker_id: Option<A>,
    pub victim_id: Option<A>,
    pub weapon: String,
    pub is_headshot: bool,
    pub damage: f64,
    /// Alive terrorists before the action.
    pub alive_t: u8,
    /// Alive counter-terrorists before the action.
    pub alive_ct: u8,
    pub eco_t: bool,
    pub eco_ct: bool,
    /// Score before the round started.
    pub score_t: usize,
    pub score_ct: usize,
}

impl<A> RoundEventRecord<A> {
    /// Swaps the actor keys, keeping every other field.
    pub fn map_actors<B, F>(self, mut f: F) -> RoundEventRecord<B>
    where
        F: FnMut(A) -> Option<B>,
    {
        RoundEventRecord {
            event_type: self.event_type,
            round_number: self.round_number,
            tick: self.tick,
            attacker_id: self.attacker_id.and_then(&mut f),
            victim_id: self.victim_id.and_then(&mut f),
            weapon: self.weapon,
            is_headshot: self.is_headshot,
            damage: self.damage,
            alive_t: self.alive_t,
            alive_ct: self.alive_ct,
            eco_t: self.eco_t,
            eco_ct: self.eco_ct,
            score_t: self.score_t,
            score_ct: self.score_ct,
        }
    }
}
