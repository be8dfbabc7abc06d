//! Eco detection from weapon identity alone.
//!
//! Demos processed here carry no economy data, so whether a player was on a
//! low budget is approximated from the weapon they used: melee weapons,
//! pistols, SMGs, the cheap shotguns and the zeus count as eco.

/// Substrings identifying melee weapons, including skinned knife variants.
pub static MELEE_KEYWORDS: &[&str] = &[
    "knife", "bayonet", "karambit", "dagger", "falchion", "butterfly", "m9", "tactical", "kukri",
    "ursus", "stiletto", "navaja", "skeleton", "survival", "paracord", "nomad", "classic",
];

/// Name prefixes of weapons cheap enough to be bought on an eco round.
pub static ECO_WEAPON_PREFIXES: &[&str] = &[
    // pistols
    "glock", "hkp2000", "p2000", "usp", "p250", "elite", "fiveseven", "tec9", "cz75", "deagle",
    "revolver",
    // smgs
    "mac10", "mp9", "mp7", "mp5", "ump45", "p90", "bizon",
    // shotguns
    "nova", "sawedoff", "mag7",
    // utility
    "taser", "zeus",
];

fn weapon_name(weapon: &str) -> String {
    let lower = weapon.trim().to_lowercase();
    match lower.strip_prefix("weapon_") {
        Some(stripped) => stripped.to_owned(),
        None => lower,
    }
}

pub fn is_melee(weapon: &str) -> bool {
    let name = weapon_name(weapon);
    if name.is_empty() || name == "none" || name == "nan" {
        return false;
    }

    MELEE_KEYWORDS.iter().any(|keyword| name.contains(keyword))
}

pub fn is_eco_weapon(weapon: &str) -> bool {
    if is_melee(weapon) {
        return true;
    }

    let name = weapon_name(weapon);
    ECO_WEAPON_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}
