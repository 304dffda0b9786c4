//! Per-cell parsers. Each one is pure and never fails: a cell that does
//! not fit its format comes back with `defaulted` set and the schema's
//! default value.

use std::sync::LazyLock;

use regex::Regex;

use crate::record::{DamageType, FiringModes};

static DV_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)([PS])").unwrap());
static LEADING_DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+").unwrap());
static CLIP_STRIP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9()]").unwrap());

/// Placeholders the rulebook prints for "not applicable". The em-dash is
/// canonical; text extraction sometimes yields an en-dash or hyphen.
const NOT_APPLICABLE: &[&str] = &["—", "–", "-"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parsed<T> {
    pub value: T,
    pub defaulted: bool,
}

impl<T> Parsed<T> {
    fn found(value: T) -> Self {
        Parsed {
            value,
            defaulted: false,
        }
    }

    fn fallback(value: T) -> Self {
        Parsed {
            value,
            defaulted: true,
        }
    }

    /// The parsed value, or `None` if the cell fell back to the default.
    pub fn ok(self) -> Option<T> {
        if self.defaulted {
            None
        } else {
            Some(self.value)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamageValue {
    pub base: i64,
    pub kind: DamageType,
}

/// Attack ratings in band order: short, medium, long, extreme.
pub type AttackRatings = [i64; 4];

/// `"8P"` → 8 physical, `"6S"` → 6 stun. Anything after the letter
/// (e.g. `"4S(e)"`) is ignored.
pub fn parse_damage(raw: &str) -> Parsed<DamageValue> {
    let Some(caps) = DV_RE.captures(raw.trim()) else {
        return Parsed::fallback(DamageValue::default());
    };
    let Ok(base) = caps[1].parse::<i64>() else {
        return Parsed::fallback(DamageValue::default());
    };
    let kind = match &caps[2] {
        "S" => DamageType::Stun,
        _ => DamageType::Physical,
    };
    Parsed::found(DamageValue { base, kind })
}

/// Slash-separated firing modes. Known abbreviations (SS, SA, BF, FA)
/// switch on their own mode wherever they appear; any other token is read
/// by position and counts unless it is a not-applicable dash.
pub fn parse_modes(raw: &str) -> Parsed<FiringModes> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Parsed::fallback(FiringModes::default());
    }

    let mut modes = FiringModes::default();
    for (idx, token) in raw.split('/').map(str::trim).enumerate().take(4) {
        let slot = match token.to_ascii_uppercase().as_str() {
            "SS" => 0,
            "SA" => 1,
            "BF" => 2,
            "FA" => 3,
            _ if token.is_empty() || NOT_APPLICABLE.contains(&token) => continue,
            _ => idx,
        };
        match slot {
            0 => modes.single_shot = true,
            1 => modes.semi_auto = true,
            2 => modes.burst_fire = true,
            _ => modes.full_auto = true,
        }
    }
    Parsed::found(modes)
}

/// `"5/10/20/40"` → [5, 10, 20, 40]. Bands that are not integers, and
/// bands past the end of the list, are 0.
pub fn parse_ratings(raw: &str) -> Parsed<AttackRatings> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Parsed::fallback([0; 4]);
    }

    let mut ratings = [0; 4];
    let mut defaulted = false;
    let mut tokens = raw.split('/').map(str::trim);
    for band in ratings.iter_mut() {
        match tokens.next().map(str::parse::<i64>) {
            Some(Ok(v)) => *band = v,
            _ => defaulted = true,
        }
    }
    Parsed {
        value: ratings,
        defaulted,
    }
}

/// Leading digits of the ammo cell: `"30(c)"` → 30.
pub fn parse_ammo_capacity(raw: &str) -> Parsed<i64> {
    LEADING_DIGITS_RE
        .find(raw.trim())
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .map(Parsed::found)
        .unwrap_or_else(|| Parsed::fallback(0))
}

/// The ammo cell without digits or parentheses: `"30(c)"` → `"c"`.
/// May be empty.
pub fn parse_clip_type(raw: &str) -> String {
    CLIP_STRIP_RE.replace_all(raw, "").trim().to_string()
}

pub fn parse_availability(raw: &str) -> String {
    raw.trim().to_string()
}

/// `"¥1,500"` → 1500. Unparseable costs are 0.
pub fn parse_cost(raw: &str) -> Parsed<i64> {
    let cleaned = raw.replace(['¥', ','], "");
    match cleaned.trim().parse::<i64>() {
        Ok(v) => Parsed::found(v),
        Err(_) => Parsed::fallback(0),
    }
}
