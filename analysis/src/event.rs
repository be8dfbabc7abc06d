use crate::error::AnalysisError;

/// A single value as handed over by the demo decoder.
///
/// The decoder is column based and does not guarantee any of its columns to
/// be present or to have a consistent type, so everything arrives as one of
/// these and gets coerced on use.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    Str(String),
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::I64(value)
    }
}

impl From<u64> for RawValue {
    fn from(value: u64) -> Self {
        Self::U64(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::F64(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EventKind {
    Death,
    Hurt,
    RoundEnd,
    MatchStartAnnounce,
}

/// One decoded record, exactly as the decoder produced it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RawEvent {
    pub kind: EventKind,
    #[serde(default)]
    pub tick: Option<RawValue>,

    #[serde(default)]
    pub victim: Option<RawValue>,
    #[serde(default)]
    pub victim_name: Option<String>,
    #[serde(default)]
    pub victim_team: Option<String>,

    #[serde(default)]
    pub attacker: Option<RawValue>,
    #[serde(default)]
    pub attacker_name: Option<String>,
    #[serde(default)]
    pub attacker_team: Option<String>,

    #[serde(default)]
    pub assister: Option<RawValue>,
    #[serde(default)]
    pub assister_name: Option<String>,
    #[serde(default)]
    pub assister_team: Option<String>,

    #[serde(default)]
    pub weapon: Option<String>,
    #[serde(default)]
    pub headshot: Option<RawValue>,
    #[serde(default)]
    pub damage: Option<RawValue>,
    #[serde(default)]
    pub winner: Option<RawValue>,
}

impl RawEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            tick: None,
            victim: None,
            victim_name: None,
            victim_team: None,
            attacker: None,
            attacker_name: None,
            attacker_team: None,
            assister: None,
            assister_name: None,
            assister_team: None,
            weapon: None,
            headshot: None,
            damage: None,
            winner: None,
        }
    }
}

/// The output of the external decoder for one demo, one list per event category.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DecodedDemo {
    pub map_name: Option<String>,
    #[serde(default)]
    pub deaths: Vec<RawEvent>,
    #[serde(default)]
    pub hurts: Vec<RawEvent>,
    #[serde(default)]
    pub round_ends: Vec<RawEvent>,
    #[serde(default)]
    pub match_start_announcements: Vec<RawEvent>,
}

/// Opaque identifier of a participant (usually the steam id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct ActorId(pub String);

impl ActorId {
    /// The decoder uses `0` for "no player", e.g. world damage.
    pub fn is_sentinel(&self) -> bool {
        self.0 == "0"
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

pub(crate) fn is_placeholder(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    lower.is_empty() || lower == "nan" || lower == "none"
}

/// Trims a free-text column and maps decoder placeholders to nothing.
pub fn clean_text(value: Option<&str>) -> Option<String> {
    let value = value?;
    if is_placeholder(value) {
        return None;
    }
    Some(value.trim().to_owned())
}

pub fn coerce_tick(value: Option<&RawValue>) -> Option<i64> {
    match value? {
        RawValue::I64(v) => Some(*v),
        RawValue::U64(v) => i64::try_from(*v).ok(),
        RawValue::F64(v) if v.is_finite() => Some(*v as i64),
        RawValue::Str(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(|v| v as i64)
            })
        }
        _ => None,
    }
}

pub fn coerce_actor(
    kind: EventKind,
    field: &'static str,
    value: Option<&RawValue>,
) -> Result<Option<ActorId>, AnalysisError> {
    let value = match value {
        Some(v) => v,
        None => return Ok(None),
    };

    match value {
        RawValue::I64(v) => Ok(Some(ActorId(v.to_string()))),
        RawValue::U64(v) => Ok(Some(ActorId(v.to_string()))),
        RawValue::F64(v) if v.is_nan() => Ok(None),
        RawValue::F64(v) if v.is_finite() && v.fract() == 0.0 => {
            Ok(Some(ActorId(format!("{:.0}", v))))
        }
        RawValue::Str(s) if is_placeholder(s) => Ok(None),
        RawValue::Str(s) => Ok(Some(ActorId(s.trim().to_owned()))),
        other => Err(AnalysisError::MalformedEvent {
            kind,
            field,
            value: format!("{:?}", other),
        }),
    }
}

pub fn coerce_damage(kind: EventKind, value: Option<&RawValue>) -> Result<f64, AnalysisError> {
    let malformed = |v: &RawValue| AnalysisError::MalformedEvent {
        kind,
        field: "damage",
        value: format!("{:?}", v),
    };

    let value = match value {
        Some(v) => v,
        None => return Ok(0.0),
    };

    match value {
        RawValue::I64(v) => Ok(*v as f64),
        RawValue::U64(v) => Ok(*v as f64),
        RawValue::F64(v) if v.is_nan() => Ok(0.0),
        RawValue::F64(v) => Ok(*v),
        RawValue::Str(s) if is_placeholder(s) => Ok(0.0),
        RawValue::Str(s) => s.trim().parse::<f64>().map_err(|_| malformed(value)),
        RawValue::Bool(_) => Err(malformed(value)),
    }
}

pub fn coerce_flag(value: Option<&RawValue>) -> bool {
    match value {
        Some(RawValue::Bool(b)) => *b,
        Some(RawValue::I64(v)) => *v != 0,
        Some(RawValue::U64(v)) => *v != 0,
        Some(RawValue::F64(v)) => !v.is_nan() && *v != 0.0,
        Some(RawValue::Str(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "1"),
        None => false,
    }
}

/// Weapon names are compared lower-cased, without the `weapon_` prefix some decoders emit.
pub fn normalize_weapon(value: Option<&str>) -> String {
    match clean_text(value) {
        Some(w) => {
            let lower = w.to_lowercase();
            match lower.strip_prefix("weapon_") {
                Some(stripped) => stripped.to_owned(),
                None => lower,
            }
        }
        None => String::new(),
    }
}

/// A death or hurt event with every column coerced to a usable type.
#[derive(Debug, Clone, PartialEq)]
pub struct CombatEvent {
    pub kind: EventKind,
    pub tick: Option<i64>,
    pub victim: Option<Participant>,
    pub attacker: Option<Participant>,
    pub assister: Option<Participant>,
    pub weapon: String,
    pub headshot: bool,
    pub damage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub id: ActorId,
    pub name: Option<String>,
    pub team: Option<String>,
}

impl Participant {
    pub fn side(&self) -> common::Side {
        self.team
            .as_deref()
            .map(common::Side::from_team_name)
            .unwrap_or(common::Side::Unknown)
    }
}

impl CombatEvent {
    pub fn from_raw(raw: &RawEvent) -> Result<Self, AnalysisError> {
        let participant = |field: &'static str,
                           id: Option<&RawValue>,
                           name: Option<&String>,
                           team: Option<&String>|
         -> Result<Option<Participant>, AnalysisError> {
            Ok(coerce_actor(raw.kind, field, id)?.map(|id| Participant {
                id,
                name: clean_text(name.map(|n| n.as_str())),
                team: clean_text(team.map(|t| t.as_str())),
            }))
        };

        Ok(Self {
            kind: raw.kind,
            tick: coerce_tick(raw.tick.as_ref()),
            victim: participant(
                "victim",
                raw.victim.as_ref(),
                raw.victim_name.as_ref(),
                raw.victim_team.as_ref(),
            )?,
            attacker: participant(
                "attacker",
                raw.attacker.as_ref(),
                raw.attacker_name.as_ref(),
                raw.attacker_team.as_ref(),
            )?,
            assister: participant(
                "assister",
                raw.assister.as_ref(),
                raw.assister_name.as_ref(),
                raw.assister_team.as_ref(),
            )?,
            weapon: normalize_weapon(raw.weapon.as_deref()),
            headshot: coerce_flag(raw.headshot.as_ref()),
            damage: coerce_damage(raw.kind, raw.damage.as_ref())?,
        })
    }
}
