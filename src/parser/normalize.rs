use tracing::debug;

use super::fields;
use super::row::RawRow;
use crate::record::{IdGenerator, RecordMeta, WeaponRecord};

const WEAPON: &str = "WEAPON";
const DV: &str = "DV";
const MODES: &str = "MODES";
const ATTACK_RATINGS: &str = "ATTACK RATINGS";
const AMMO: &str = "AMMO";
const AVAILABILITY: &str = "AVAILABILITY";
const COST: &str = "COST";

/// Turns table rows into weapon records for one run. Owns the run's id
/// registry, so every record it builds has a distinct `_id`.
pub struct Normalizer {
    rulebook: String,
    meta: RecordMeta,
    ids: IdGenerator,
}

impl Normalizer {
    pub fn new(rulebook: impl Into<String>, meta: RecordMeta) -> Self {
        Normalizer {
            rulebook: rulebook.into(),
            meta,
            ids: IdGenerator::new(),
        }
    }

    #[cfg(test)]
    pub fn with_ids(rulebook: &str, ids: IdGenerator) -> Self {
        Normalizer {
            rulebook: rulebook.to_string(),
            meta: RecordMeta::default(),
            ids,
        }
    }

    /// Build the record for `row`, or `None` when the row has no weapon name.
    /// Cells that don't parse leave their fields at the schema default.
    pub fn normalize(&mut self, row: &RawRow, page: u32) -> Option<WeaponRecord> {
        let name = row.get(WEAPON).map(str::trim).filter(|n| !n.is_empty())?;

        let mut rec = WeaponRecord::new(name, self.ids.next_identity(), &self.meta);
        let sys = &mut rec.system;
        sys.description.source = format!("{} p. {}", self.rulebook, page);

        let dv = fields::parse_damage(row.cell(DV));
        if let Some(dv) = dv.ok() {
            sys.action.damage.base = dv.base;
            sys.action.damage.kind.base = dv.kind;
        } else {
            debug!("{}: no damage value in {:?}", name, row.cell(DV));
        }

        sys.range.modes = fields::parse_modes(row.cell(MODES)).value;

        let ratings = fields::parse_ratings(row.cell(ATTACK_RATINGS));
        if ratings.defaulted {
            debug!("{}: attack ratings {:?} partly defaulted", name, row.cell(ATTACK_RATINGS));
        }
        let [short, medium, long, extreme] = ratings.value;
        let ranges = &mut sys.range.ranges;
        ranges.short = short;
        ranges.medium = medium;
        ranges.long = long;
        ranges.extreme = extreme;

        let ammo = row.cell(AMMO);
        if let Some(capacity) = fields::parse_ammo_capacity(ammo).ok() {
            sys.ammo.current.value = capacity;
            sys.ammo.current.max = capacity;
        }
        sys.ammo.clip_type = fields::parse_clip_type(ammo);

        sys.technology.availability = fields::parse_availability(row.cell(AVAILABILITY));

        let cost = fields::parse_cost(row.cell(COST));
        if cost.defaulted {
            debug!("{}: cost {:?} unreadable, using 0", name, row.cell(COST));
        }
        sys.technology.cost = cost.value;

        Some(rec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DamageType, FiringModes};

    const HEADERS: &[&str] = &["WEAPON", "DV", "MODES", "ATTACK RATINGS", "AMMO", "AVAILABILITY", "COST"];

    fn row(values: &[&str]) -> RawRow {
        let headers: Vec<String> = HEADERS.iter().map(|s| s.to_string()).collect();
        let cells: Vec<Option<String>> = values.iter().map(|s| Some(s.to_string())).collect();
        RawRow::from_cells(&headers, &cells).unwrap()
    }

    fn normalizer() -> Normalizer {
        Normalizer::with_ids("SR6 Core", IdGenerator::seeded(42))
    }

    #[test]
    fn full_row() {
        let mut n = normalizer();
        let rec = n
            .normalize(&row(&["  Ares Predator VI ", "3P", "SA/BF", "10/10/8/—", "15(c)", " 2L ", "¥750"]), 247)
            .unwrap();
        assert_eq!(rec.name, "Ares Predator VI");
        let sys = &rec.system;
        assert_eq!(sys.description.source, "SR6 Core p. 247");
        assert_eq!(sys.action.damage.base, 3);
        assert_eq!(sys.action.damage.kind.base, DamageType::Physical);
        assert_eq!(
            sys.range.modes,
            FiringModes {
                single_shot: false,
                semi_auto: true,
                burst_fire: true,
                full_auto: false,
            }
        );
        assert_eq!(
            (sys.range.ranges.short, sys.range.ranges.medium, sys.range.ranges.long, sys.range.ranges.extreme),
            (10, 10, 8, 0)
        );
        assert_eq!(sys.ammo.current.value, 15);
        assert_eq!(sys.ammo.current.max, 15);
        assert_eq!(sys.ammo.clip_type, "c");
        assert_eq!(sys.technology.availability, "2L");
        assert_eq!(sys.technology.cost, 750);
        assert_eq!(rec.key, format!("!items!{}", rec.id));
    }

    #[test]
    fn stun_weapon() {
        let mut n = normalizer();
        let rec = n
            .normalize(&row(&["Defiance Super Shock", "4S(e)", "SS", "10/6/—/—", "4(m)", "1", "¥250"]), 247)
            .unwrap();
        assert_eq!(rec.system.action.damage.base, 4);
        assert_eq!(rec.system.action.damage.kind.base, DamageType::Stun);
        assert!(rec.system.range.modes.single_shot);
        assert_eq!(rec.system.ammo.clip_type, "m");
    }

    #[test]
    fn blank_name_skipped() {
        let mut n = normalizer();
        assert!(n.normalize(&row(&["", "3P", "SA", "8/8", "10(c)", "2", "¥100"]), 248).is_none());
        assert!(n.normalize(&row(&["   ", "3P", "SA", "8/8", "10(c)", "2", "¥100"]), 248).is_none());
    }

    #[test]
    fn missing_name_column_skipped() {
        let headers = vec!["ITEM".to_string(), "DV".to_string()];
        let r = RawRow::from_cells(&headers, &[Some("Knife".into()), Some("2P".into())]).unwrap();
        assert!(normalizer().normalize(&r, 1).is_none());
    }

    #[test]
    fn lowercase_header_resolves_name() {
        let headers = vec!["Weapon".to_string(), "Dv".to_string()];
        let r = RawRow::from_cells(&headers, &[Some("Knife".into()), Some("2P".into())]).unwrap();
        let rec = normalizer().normalize(&r, 1).unwrap();
        assert_eq!(rec.name, "Knife");
        assert_eq!(rec.system.action.damage.base, 2);
    }

    #[test]
    fn junk_cells_keep_defaults() {
        let mut n = normalizer();
        let rec = n.normalize(&row(&["Mystery Gun", "—", "", "5/x/20", "", "", "N/A"]), 250).unwrap();
        let sys = &rec.system;
        assert_eq!(sys.action.damage.base, 0);
        assert_eq!(sys.action.damage.kind.base, DamageType::Physical);
        assert_eq!(sys.range.modes, FiringModes::default());
        assert_eq!(sys.range.ranges.short, 5);
        assert_eq!(sys.range.ranges.medium, 0);
        assert_eq!(sys.range.ranges.long, 20);
        assert_eq!(sys.range.ranges.extreme, 0);
        assert_eq!(sys.ammo.current.max, 0);
        assert_eq!(sys.ammo.clip_type, "");
        assert_eq!(sys.ammo.partial_reload_value, -1);
        assert_eq!(sys.technology.availability, "");
        assert_eq!(sys.technology.cost, 0);
        assert_eq!(sys.technology.rating, 1);
    }

    #[test]
    fn every_record_gets_fresh_identity() {
        let mut n = normalizer();
        let r = row(&["Knife", "2P", "", "", "", "", ""]);
        let a = n.normalize(&r, 1).unwrap();
        let b = n.normalize(&r, 1).unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(a.key, b.key);
    }
}
