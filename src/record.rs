use std::collections::{BTreeMap, HashSet};

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::Value;

const ID_LEN: usize = 16;

/// One weapon item in the target pack schema. Field order here is the
/// serialized field order.
#[derive(Debug, Clone, Serialize)]
pub struct WeaponRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub img: String,
    pub system: WeaponSystem,
    pub effects: Vec<Value>,
    pub folder: Option<String>,
    pub sort: i64,
    pub permission: Permission,
    pub flags: BTreeMap<String, Value>,
    #[serde(rename = "_stats")]
    pub stats: DocumentStats,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_key")]
    pub key: String,
}

impl WeaponRecord {
    /// Fresh record with every schema field at its default, stamped with
    /// `identity` and the current time.
    pub fn new(name: &str, identity: Identity, meta: &RecordMeta) -> Self {
        let now = Utc::now().timestamp_millis();
        WeaponRecord {
            name: name.to_string(),
            kind: "weapon".to_string(),
            img: meta.img.clone(),
            system: WeaponSystem::default(),
            effects: Vec::new(),
            folder: None,
            sort: 0,
            permission: Permission::default(),
            flags: BTreeMap::new(),
            stats: DocumentStats {
                core_version: meta.core_version.clone(),
                system_id: meta.system_id.clone(),
                system_version: meta.system_version.clone(),
                created_time: now,
                modified_time: now,
                last_modified_by: meta.last_modified_by.clone(),
            },
            id: identity.id,
            key: identity.key,
        }
    }
}

/// Pack-level metadata copied into every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMeta {
    pub img: String,
    pub core_version: String,
    pub system_id: String,
    pub system_version: String,
    pub last_modified_by: String,
}

impl Default for RecordMeta {
    fn default() -> Self {
        RecordMeta {
            img: "systems/sr6elysium/dist/icons/importer/weapon/assault-rifles.svg".to_string(),
            core_version: "12.331".to_string(),
            system_id: "sr6elysium".to_string(),
            system_version: "0.0.13".to_string(),
            last_modified_by: "sr5ebuilder".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WeaponSystem {
    pub description: Description,
    pub action: Action,
    pub technology: Technology,
    pub category: String,
    pub subcategory: String,
    pub ammo: Ammo,
    pub range: RangeBlock,
    pub melee: Melee,
    pub thrown: Thrown,
}

impl Default for WeaponSystem {
    fn default() -> Self {
        WeaponSystem {
            description: Description::default(),
            action: Action::default(),
            technology: Technology::default(),
            category: "range".to_string(),
            subcategory: String::new(),
            ammo: Ammo::default(),
            range: RangeBlock::default(),
            melee: Melee::default(),
            thrown: Thrown::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Description {
    pub value: String,
    pub chat: String,
    pub source: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: String,
    pub test: String,
    pub categories: Vec<String>,
    pub attribute: String,
    pub attribute2: String,
    pub skill: String,
    pub armor: bool,
    pub spec: bool,
    #[serde(rename = "mod")]
    pub modifier: Option<i64>,
    pub mod_description: String,
    pub roll_mode: String,
    pub limit: Limit,
    pub threshold: ValueBase,
    pub extended: bool,
    pub damage: Damage,
    pub opposed: Opposed,
    pub followed: Followed,
    pub modifiers: Vec<Value>,
}

impl Default for Action {
    fn default() -> Self {
        Action {
            kind: "complex".to_string(),
            test: "RangedAttackTest".to_string(),
            categories: Vec::new(),
            attribute: "agility".to_string(),
            attribute2: String::new(),
            skill: "firearms".to_string(),
            armor: false,
            spec: false,
            modifier: None,
            mod_description: String::new(),
            roll_mode: "publicroll".to_string(),
            limit: Limit::default(),
            threshold: ValueBase::default(),
            extended: false,
            damage: Damage::default(),
            opposed: Opposed::default(),
            followed: Followed::default(),
            modifiers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Limit {
    pub value: i64,
    pub base: i64,
    pub attribute: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValueBase {
    pub value: i64,
    pub base: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValueMax {
    pub value: i64,
    pub max: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageType {
    #[default]
    Physical,
    Stun,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DamageKind {
    pub value: String,
    pub base: DamageType,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StringValueBase {
    pub value: String,
    pub base: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArmorPenetration {
    pub value: i64,
    pub base: i64,
    pub base_formula_operator: String,
    pub attribute: String,
}

impl Default for ArmorPenetration {
    fn default() -> Self {
        ArmorPenetration {
            value: 0,
            base: 0,
            base_formula_operator: "add".to_string(),
            attribute: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageSource {
    pub actor_id: String,
    pub item_id: String,
    pub item_type: String,
    pub item_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Damage {
    #[serde(rename = "type")]
    pub kind: DamageKind,
    pub element: StringValueBase,
    pub value: i64,
    pub base: i64,
    pub ap: ArmorPenetration,
    pub base_formula_operator: String,
    pub attribute: String,
    pub source: DamageSource,
}

impl Default for Damage {
    fn default() -> Self {
        Damage {
            kind: DamageKind::default(),
            element: StringValueBase::default(),
            value: 0,
            base: 0,
            ap: ArmorPenetration::default(),
            base_formula_operator: "add".to_string(),
            attribute: String::new(),
            source: DamageSource::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Opposed {
    #[serde(rename = "type")]
    pub kind: String,
    pub test: String,
    pub attribute: String,
    pub attribute2: String,
    pub skill: String,
    pub armor: bool,
    #[serde(rename = "mod")]
    pub modifier: i64,
    pub description: String,
    pub resist: Resist,
}

impl Default for Opposed {
    fn default() -> Self {
        Opposed {
            kind: String::new(),
            test: "PhysicalDefenseTest".to_string(),
            attribute: String::new(),
            attribute2: String::new(),
            skill: String::new(),
            armor: false,
            modifier: 0,
            description: String::new(),
            resist: Resist::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Resist {
    pub test: String,
    pub skill: String,
    pub attribute: String,
    pub attribute2: String,
    pub armor: bool,
    #[serde(rename = "mod")]
    pub modifier: i64,
}

impl Default for Resist {
    fn default() -> Self {
        Resist {
            test: "PhysicalResistTest".to_string(),
            skill: String::new(),
            attribute: String::new(),
            attribute2: String::new(),
            armor: false,
            modifier: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Followed {
    pub test: String,
    pub attribute: String,
    pub attribute2: String,
    pub skill: String,
    pub armor: bool,
    #[serde(rename = "mod")]
    pub modifier: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Technology {
    pub rating: i64,
    pub availability: String,
    pub quantity: i64,
    pub cost: i64,
    pub equipped: bool,
    pub conceal: BaseValue,
    pub condition_monitor: ValueMax,
    pub wireless: bool,
    #[serde(rename = "networkController")]
    pub network_controller: Option<String>,
}

impl Default for Technology {
    fn default() -> Self {
        Technology {
            rating: 1,
            availability: String::new(),
            quantity: 1,
            cost: 0,
            equipped: false,
            conceal: BaseValue::default(),
            condition_monitor: ValueMax { value: 0, max: 9 },
            wireless: true,
            network_controller: None,
        }
    }
}

/// Same as [`ValueBase`] but the schema lists `base` first.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct BaseValue {
    pub base: i64,
    pub value: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Ammo {
    pub spare_clips: ValueMax,
    pub current: ValueMax,
    pub clip_type: String,
    pub partial_reload_value: i64,
}

impl Default for Ammo {
    fn default() -> Self {
        Ammo {
            spare_clips: ValueMax::default(),
            current: ValueMax::default(),
            clip_type: String::new(),
            partial_reload_value: -1,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RangeBlock {
    pub category: String,
    pub ranges: Ranges,
    pub rc: ValueBase,
    pub modes: FiringModes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ranges {
    pub short: i64,
    pub medium: i64,
    pub long: i64,
    pub extreme: i64,
    pub category: String,
    pub attribute: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FiringModes {
    pub single_shot: bool,
    pub semi_auto: bool,
    pub burst_fire: bool,
    pub full_auto: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Melee {
    pub reach: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Thrown {
    pub ranges: ThrownRanges,
    pub blast: Blast,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThrownRanges {
    pub short: i64,
    pub medium: i64,
    pub long: i64,
    pub extreme: i64,
    pub attribute: String,
    pub category: String,
}

impl Default for ThrownRanges {
    fn default() -> Self {
        ThrownRanges {
            short: 0,
            medium: 0,
            long: 0,
            extreme: 0,
            attribute: String::new(),
            category: "manual".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Blast {
    pub radius: i64,
    pub dropoff: i64,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Permission {
    pub default: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStats {
    pub core_version: String,
    pub system_id: String,
    pub system_version: String,
    pub created_time: i64,
    pub modified_time: i64,
    pub last_modified_by: String,
}

/// Document id plus the pack storage key derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub key: String,
}

impl Identity {
    fn from_id(id: String) -> Self {
        let key = format!("!items!{}", id);
        Identity { id, key }
    }
}

/// Hands out 16-character alphanumeric ids, never the same one twice in
/// a run.
pub struct IdGenerator {
    rng: StdRng,
    issued: HashSet<String>,
}

impl IdGenerator {
    pub fn new() -> Self {
        IdGenerator {
            rng: StdRng::from_entropy(),
            issued: HashSet::new(),
        }
    }

    #[cfg(test)]
    pub fn seeded(seed: u64) -> Self {
        IdGenerator {
            rng: StdRng::seed_from_u64(seed),
            issued: HashSet::new(),
        }
    }

    pub fn next_identity(&mut self) -> Identity {
        loop {
            let id: String = (&mut self.rng)
                .sample_iter(&Alphanumeric)
                .take(ID_LEN)
                .map(char::from)
                .collect();
            if self.issued.insert(id.clone()) {
                return Identity::from_id(id);
            }
        }
    }
}
