use std::collections::{BTreeMap, HashMap};

use common::demo_analysis::{PlayerRow, WeaponRow};
use common::{EventType, RoundEventRecord, Side};

use crate::eco;
use crate::event::{ActorId, CombatEvent, Participant};

/// Most damage one player can be credited for against a single opponent in one round.
pub const MAX_ROUND_DAMAGE: f64 = 100.0;

/// Damage stored on kill records.
pub const KILL_DAMAGE: f64 = 100.0;

const SQUAD_SIZE: u8 = 5;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WeaponStats {
    pub kills: usize,
    pub headshots: usize,
    pub damage: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStats {
    pub id: ActorId,
    pub nickname: String,
    pub team: Option<String>,
    pub kills: usize,
    pub deaths: usize,
    pub assists: usize,
    pub headshots: usize,
    /// Damage after the per-round cap.
    pub damage: f64,
    pub first_kills: usize,
    pub first_deaths: usize,
    pub rounds_played: usize,
    pub weapons: Vec<(String, WeaponStats)>,
}

impl PlayerStats {
    pub fn new(id: ActorId) -> Self {
        Self {
            id,
            nickname: String::new(),
            team: None,
            kills: 0,
            deaths: 0,
            assists: 0,
            headshots: 0,
            damage: 0.0,
            first_kills: 0,
            first_deaths: 0,
            rounds_played: 0,
            weapons: Vec::new(),
        }
    }

    pub fn weapon_mut(&mut self, weapon: &str) -> &mut WeaponStats {
        let index = match self.weapons.iter().position(|(name, _)| name == weapon) {
            Some(i) => i,
            None => {
                self.weapons.push((weapon.to_owned(), WeaponStats::default()));
                self.weapons.len() - 1
            }
        };
        &mut self.weapons[index].1
    }

    pub fn weapon(&self, weapon: &str) -> Option<&WeaponStats> {
        self.weapons
            .iter()
            .find(|(name, _)| name == weapon)
            .map(|(_, stats)| stats)
    }

    fn side(&self) -> Side {
        self.team
            .as_deref()
            .map(Side::from_team_name)
            .unwrap_or(Side::Unknown)
    }
}

/// Every player seen in the match, in the order they first showed up.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Participants {
    players: Vec<PlayerStats>,
    index: HashMap<ActorId, usize>,
}

impl Participants {
    pub fn get(&self, id: &ActorId) -> Option<&PlayerStats> {
        self.index.get(id).map(|i| &self.players[*i])
    }

    pub fn get_or_insert(&mut self, id: &ActorId) -> &mut PlayerStats {
        let index = match self.index.get(id) {
            Some(i) => *i,
            None => {
                self.players.push(PlayerStats::new(id.clone()));
                self.index.insert(id.clone(), self.players.len() - 1);
                self.players.len() - 1
            }
        };
        &mut self.players[index]
    }

    /// Like [`Self::get_or_insert`], also remembering the first name and team seen for the player.
    pub fn observe(&mut self, participant: &Participant) -> &mut PlayerStats {
        let player = self.get_or_insert(&participant.id);
        if player.nickname.is_empty() {
            if let Some(name) = participant.name.as_ref() {
                player.nickname = name.clone();
            }
        }
        if player.team.is_none() {
            player.team = participant.team.clone();
        }
        player
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerStats> {
        self.players.iter()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Side of the participant for this event, falling back to the first team they were seen on.
    fn side_of(&self, participant: &Participant) -> Side {
        match participant.side() {
            Side::Unknown => self
                .get(&participant.id)
                .map(|p| p.side())
                .unwrap_or(Side::Unknown),
            side => side,
        }
    }

    /// Players whose side can not be resolved are never considered teammates.
    fn are_teammates(&self, attacker: &Participant, victim: &Participant) -> bool {
        let (a, v) = (attacker.side(), victim.side());
        if a.is_resolved() && v.is_resolved() {
            return a == v;
        }

        let stored = |p: &Participant| self.get(&p.id).map(|s| s.side()).unwrap_or(Side::Unknown);
        let (a, v) = (stored(attacker), stored(victim));
        if a.is_resolved() && v.is_resolved() {
            return a == v;
        }

        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliveState {
    pub t: u8,
    pub ct: u8,
}

impl Default for AliveState {
    fn default() -> Self {
        Self {
            t: SQUAD_SIZE,
            ct: SQUAD_SIZE,
        }
    }
}

impl AliveState {
    fn player_died(&mut self, side: Side) {
        match side {
            Side::T => self.t = self.t.saturating_sub(1),
            Side::CT => self.ct = self.ct.saturating_sub(1),
            Side::Unknown => {}
        }
    }
}

/// State that only lives for the duration of one round.
#[derive(Debug, Clone)]
pub struct RoundContext {
    pub number: usize,
    pub score_t: usize,
    pub score_ct: usize,
    pub alive: AliveState,
    first_kill_done: bool,
    damage_dealt: BTreeMap<(ActorId, ActorId), f64>,
}

impl RoundContext {
    pub fn new(number: usize, score_t: usize, score_ct: usize) -> Self {
        Self {
            number,
            score_t,
            score_ct,
            alive: AliveState::default(),
            first_kill_done: false,
            damage_dealt: BTreeMap::new(),
        }
    }

    /// Damage credited so far this round from `attacker` to `victim`.
    pub fn damage_dealt(&self, attacker: &ActorId, victim: &ActorId) -> f64 {
        self.damage_dealt
            .get(&(attacker.clone(), victim.clone()))
            .copied()
            .unwrap_or(0.0)
    }
}

/// Accumulated state of a match while its rounds are replayed.
#[derive(Debug, Default, Clone)]
pub struct MatchStats {
    pub participants: Participants,
    pub records: Vec<RoundEventRecord<ActorId>>,
}

struct Context {
    weapon: String,
    is_headshot: bool,
    alive: AliveState,
    eco_t: bool,
    eco_ct: bool,
}

impl MatchStats {
    fn context(
        &self,
        event: &CombatEvent,
        round: &RoundContext,
        attacker: Option<&Participant>,
        victim: &Participant,
    ) -> Context {
        let attacker_side = match attacker.map(|a| self.participants.side_of(a)) {
            Some(side) if side.is_resolved() => side,
            _ => self.participants.side_of(victim).opposite(),
        };
        let eco = eco::is_eco_weapon(&event.weapon);

        Context {
            weapon: event.weapon.clone(),
            is_headshot: event.headshot,
            alive: round.alive,
            eco_t: eco && attacker_side == Side::T,
            eco_ct: eco && attacker_side == Side::CT,
        }
    }

    fn push_record(
        &mut self,
        event_type: EventType,
        event: &CombatEvent,
        round: &RoundContext,
        context: Context,
        attacker: Option<ActorId>,
        victim: ActorId,
        damage: f64,
    ) {
        self.records.push(RoundEventRecord {
            event_type,
            round_number: round.number,
            tick: event.tick,
            attacker_id: attacker,
            victim_id: Some(victim),
            weapon: context.weapon,
            is_headshot: context.is_headshot,
            damage,
            alive_t: context.alive.t,
            alive_ct: context.alive.ct,
            eco_t: context.eco_t,
            eco_ct: context.eco_ct,
            score_t: round.score_t,
            score_ct: round.score_ct,
        });
    }
}

fn valid_attacker<'e>(event: &'e CombatEvent, victim: &Participant) -> Option<&'e Participant> {
    event
        .attacker
        .as_ref()
        .filter(|a| !a.id.is_sentinel() && a.id != victim.id)
}

pub fn player_death(death: &CombatEvent, round: &mut RoundContext, stats: &mut MatchStats) {
    let victim = match death.victim.as_ref() {
        Some(v) => v,
        None => {
            tracing::trace!("Death without a victim");
            return;
        }
    };

    stats.participants.observe(victim).deaths += 1;

    let attacker = valid_attacker(death, victim);
    let context = stats.context(death, round, attacker, victim);

    let mut credited = None;
    if let Some(attacker) = attacker {
        stats.participants.observe(attacker);

        if stats.participants.are_teammates(attacker, victim) {
            tracing::debug!("Team kill {} -> {}", attacker.id, victim.id);
        } else {
            let attacker_stats = stats.participants.get_or_insert(&attacker.id);
            attacker_stats.kills += 1;
            if death.headshot {
                attacker_stats.headshots += 1;
            }

            if !death.weapon.is_empty() {
                let weapon = attacker_stats.weapon_mut(&death.weapon);
                weapon.kills += 1;
                if death.headshot {
                    weapon.headshots += 1;
                }
            }

            if !round.first_kill_done {
                round.first_kill_done = true;
                attacker_stats.first_kills += 1;
                stats.participants.get_or_insert(&victim.id).first_deaths += 1;
            }

            credited = Some(attacker.id.clone());
        }
    }

    if let Some(assister) = death.assister.as_ref() {
        let attacker_id = death.attacker.as_ref().map(|a| &a.id);
        if !assister.id.is_sentinel()
            && assister.id != victim.id
            && Some(&assister.id) != attacker_id
        {
            stats.participants.observe(assister).assists += 1;
        }
    }

    stats.push_record(
        EventType::Kill,
        death,
        round,
        context,
        credited,
        victim.id.clone(),
        KILL_DAMAGE,
    );

    let victim_side = stats.participants.side_of(victim);
    round.alive.player_died(victim_side);
}

pub fn player_hurt(hurt: &CombatEvent, round: &mut RoundContext, stats: &mut MatchStats) {
    let victim = match hurt.victim.as_ref() {
        Some(v) => v,
        None => return,
    };
    let attacker = match valid_attacker(hurt, victim) {
        Some(a) => a,
        None => return,
    };

    if hurt.damage.is_nan() || hurt.damage <= 0.0 {
        return;
    }

    stats.participants.observe(attacker);
    stats.participants.observe(victim);

    if stats.participants.are_teammates(attacker, victim) {
        return;
    }

    let key = (attacker.id.clone(), victim.id.clone());
    let already_dealt = round.damage_dealt.get(&key).copied().unwrap_or(0.0);
    let allowed = MAX_ROUND_DAMAGE - already_dealt;
    if allowed <= 0.0 {
        tracing::trace!("Damage cap reached for {} -> {}", attacker.id, victim.id);
        return;
    }

    let damage = hurt.damage.min(allowed);
    round.damage_dealt.insert(key, already_dealt + damage);

    if !hurt.weapon.is_empty() {
        stats
            .participants
            .get_or_insert(&attacker.id)
            .weapon_mut(&hurt.weapon)
            .damage += damage.round_ties_even() as i64;
    }

    let context = stats.context(hurt, round, Some(attacker), victim);
    stats.push_record(
        EventType::Damage,
        hurt,
        round,
        context,
        Some(attacker.id.clone()),
        victim.id.clone(),
        damage,
    );
}

/// Moves the capped damage of the round into the players' totals.
pub fn finish_round(round: RoundContext, stats: &mut MatchStats) {
    for ((attacker, _), damage) in round.damage_dealt {
        stats.participants.get_or_insert(&attacker).damage += damage;
    }
}

fn is_junk_identity(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    matches!(lower.as_str(), "" | "nan" | "none" | "undefined" | "0")
}

/// Simple scoreboard rating, not to be confused with [`crate::impact`].
pub fn display_rating(kills: usize, deaths: usize, assists: usize, adr: f64, rounds: usize) -> f64 {
    let rounds = rounds.max(1) as f64;
    let (kills, deaths, assists) = (kills as f64, deaths as f64, assists as f64);

    let rating = ((kills / rounds) * 0.4
        + ((kills * 2.0 + assists) / rounds) * 0.3
        + ((rounds - deaths) / rounds) * 0.2
        + (adr / 100.0) * 0.1)
        * 1.3;

    crate::round_to(rating, 2)
}

/// Builds the scoreboard rows, best display rating first.
pub fn finalize(stats: &mut MatchStats, total_rounds: usize) -> Vec<PlayerRow> {
    for player in stats.participants.players.iter_mut() {
        player.rounds_played = total_rounds;
    }

    let mut rows: Vec<PlayerRow> = stats
        .participants
        .iter()
        .filter(|p| p.rounds_played > 0)
        .filter(|p| !is_junk_identity(p.id.as_str()) && !is_junk_identity(&p.nickname))
        .map(|p| {
            let rounds = p.rounds_played;
            let adr = crate::round_to(p.damage / rounds as f64, 1);
            let kd = if p.deaths > 0 {
                crate::round_to(p.kills as f64 / p.deaths as f64, 2)
            } else {
                p.kills as f64
            };
            let headshot_percent = if p.kills > 0 {
                crate::round_to(p.headshots as f64 / p.kills as f64 * 100.0, 1)
            } else {
                0.0
            };

            let mut weapons: Vec<WeaponRow> = p
                .weapons
                .iter()
                .map(|(weapon, w)| WeaponRow {
                    weapon: weapon.clone(),
                    kills: w.kills,
                    headshots: w.headshots,
                    damage: w.damage,
                })
                .collect();
            weapons.sort_by(|a, b| b.kills.cmp(&a.kills));

            PlayerRow {
                nickname: p.nickname.trim().to_owned(),
                steam_id: p.id.as_str().trim().to_owned(),
                team: p
                    .team
                    .clone()
                    .unwrap_or_else(|| "undefined".to_owned()),
                kills: p.kills,
                deaths: p.deaths,
                assists: p.assists,
                kd,
                headshot_percent,
                adr,
                first_kills: p.first_kills,
                first_deaths: p.first_deaths,
                rating: display_rating(p.kills, p.deaths, p.assists, adr, rounds),
                weapons,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    tracing::debug!(
        "{} of {} tracked players made it onto the scoreboard",
        rows.len(),
        stats.participants.len()
    );

    rows
}
