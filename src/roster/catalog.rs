//! Static weapon, chassis and faction definitions loaded from TOML
//!
//! The catalog is read once at startup and then only borrowed. Every damage
//! and armor expression is validated while loading, so a bad formula stops
//! the program before the first shot instead of in the middle of a fight.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ai::weights::Hostility;
use crate::combat::{Ammo, CombatClass, DisplayNames, Weapon, WeaponClass};
use crate::core::error::{Result, SkirmishError};
use crate::core::types::{FactionId, WeaponId};
use crate::dice::DamageExpression;
use crate::roster::world::FactionKind;

fn default_ammo_cost() -> u32 {
    1
}

/// Catalog entry for a weapon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub short_name: String,
    pub long_name: String,
    pub class: WeaponClass,
    pub damage: DamageExpression,
    /// Magazine size; omitted means unlimited
    #[serde(default)]
    pub ammo_capacity: Option<u32>,
    #[serde(default = "default_ammo_cost")]
    pub ammo_cost_per_shot: u32,
}

impl WeaponSpec {
    /// A freshly loaded weapon built from this entry
    pub fn instantiate(&self, id: &str) -> Weapon {
        Weapon {
            id: WeaponId::new(id),
            names: DisplayNames {
                short: self.short_name.clone(),
                long: self.long_name.clone(),
            },
            class: self.class,
            damage: self.damage.clone(),
            ammo: Ammo::full(self.ammo_capacity),
            ammo_cost_per_shot: self.ammo_cost_per_shot,
        }
    }
}

/// Catalog entry for a combatant chassis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChassisSpec {
    pub hitpoints: i64,
    pub armor: DamageExpression,
    #[serde(default)]
    pub can_jump: bool,
    pub class: CombatClass,
    #[serde(default)]
    pub speed: u32,
    #[serde(default)]
    pub point_value: u32,
    /// Weapon ids, one entry per mounted weapon
    pub weapons: Vec<String>,
}

/// Catalog entry for a faction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactionSpec {
    pub kind: FactionKind,
    #[serde(default)]
    pub hostility: Hostility,
}

/// One combatant to place on the field when a skirmish starts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub chassis: String,
    pub faction: String,
}

/// Immutable definitions shared by every combatant in a session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub weapons: BTreeMap<String, WeaponSpec>,
    #[serde(default)]
    pub chassis: BTreeMap<String, ChassisSpec>,
    #[serde(default)]
    pub factions: BTreeMap<String, FactionSpec>,
    /// Starting roster, in turn order
    #[serde(default)]
    pub roster: Vec<RosterEntry>,
}

impl Catalog {
    /// Parse and validate a catalog from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let catalog: Catalog = toml::from_str(content)?;
        catalog.validate()?;
        tracing::debug!(
            "Loaded catalog: {} weapons, {} chassis, {} factions",
            catalog.weapons.len(),
            catalog.chassis.len(),
            catalog.factions.len()
        );
        Ok(catalog)
    }

    /// Load a catalog file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check cross references and evaluate every expression under the
    /// deterministic modes
    pub fn validate(&self) -> Result<()> {
        for (id, weapon) in &self.weapons {
            weapon
                .damage
                .validate()
                .map_err(|source| SkirmishError::InvalidCatalogExpression {
                    entry: format!("weapons.{}.damage", id),
                    source,
                })?;
        }

        for (id, chassis) in &self.chassis {
            chassis
                .armor
                .validate()
                .map_err(|source| SkirmishError::InvalidCatalogExpression {
                    entry: format!("chassis.{}.armor", id),
                    source,
                })?;
            if let Some(missing) = chassis
                .weapons
                .iter()
                .find(|weapon| !self.weapons.contains_key(*weapon))
            {
                return Err(SkirmishError::UnknownWeapon {
                    chassis: id.clone(),
                    weapon: missing.clone(),
                });
            }
        }

        for entry in &self.roster {
            if !self.chassis.contains_key(&entry.chassis) {
                return Err(SkirmishError::UnknownChassis(entry.chassis.clone()));
            }
            if !self.factions.contains_key(&entry.faction) {
                return Err(SkirmishError::UnknownFaction(FactionId::new(entry.faction.clone())));
            }
        }

        Ok(())
    }

    pub fn weapon(&self, id: &str) -> Option<&WeaponSpec> {
        self.weapons.get(id)
    }

    pub fn chassis(&self, id: &str) -> Option<&ChassisSpec> {
        self.chassis.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ExprError;

    const CATALOG: &str = r#"
        [weapons.laser]
        short_name = "ML"
        long_name = "Medium Laser"
        class = "energy"
        damage = "5"

        [weapons.srm]
        short_name = "SRM"
        long_name = "Short Range Missile"
        class = "missile"
        damage = "2d2"
        ammo_capacity = 6
        ammo_cost_per_shot = 2

        [chassis.hopper]
        hitpoints = 30
        armor = "1d4"
        can_jump = true
        class = "scout"
        weapons = ["laser", "srm"]

        [factions.red]
        kind = "human"

        [factions.green]
        kind = "computer"
        hostility = { random = { max = 0.1 } }

        [[roster]]
        chassis = "hopper"
        faction = "red"
    "#;

    #[test]
    fn test_load_catalog() {
        let catalog = Catalog::from_toml_str(CATALOG).unwrap();
        assert_eq!(catalog.weapons.len(), 2);
        assert_eq!(catalog.weapon("laser").unwrap().ammo_capacity, None);
        assert_eq!(catalog.weapon("laser").unwrap().ammo_cost_per_shot, 1);
        assert_eq!(catalog.weapon("srm").unwrap().ammo_cost_per_shot, 2);
        assert!(catalog.chassis("hopper").unwrap().can_jump);
        assert_eq!(catalog.factions["red"].kind, FactionKind::Human);
        assert_eq!(
            catalog.factions["green"].hostility,
            Hostility::Random { max: 0.1 }
        );
        assert_eq!(catalog.roster.len(), 1);
    }

    #[test]
    fn test_instantiate_weapon() {
        let catalog = Catalog::from_toml_str(CATALOG).unwrap();
        let srm = catalog.weapon("srm").unwrap().instantiate("srm");
        assert_eq!(
            srm.ammo,
            Ammo::Limited {
                capacity: 6,
                remaining: 6
            }
        );
        assert!(srm.matches("short range missile"));
    }

    #[test]
    fn test_malformed_damage_rejected_at_load() {
        let content = CATALOG.replace("damage = \"5\"", "damage = \"(5\"");
        assert!(matches!(
            Catalog::from_toml_str(&content),
            Err(SkirmishError::CatalogParse(_))
        ));
    }

    #[test]
    fn test_zero_divisor_rejected_at_load() {
        let content = CATALOG.replace("armor = \"1d4\"", "armor = \"8/(1d2-1)\"");
        match Catalog::from_toml_str(&content) {
            Err(SkirmishError::InvalidCatalogExpression { entry, .. }) => {
                assert_eq!(entry, "chassis.hopper.armor");
            }
            other => panic!("Expected invalid expression, got {:?}", other),
        }
    }

    #[test]
    fn test_divisor_range_through_zero_rejected_at_load() {
        let content = CATALOG.replace("damage = \"5\"", "damage = \"6/(1d4-2)\"");
        match Catalog::from_toml_str(&content) {
            Err(SkirmishError::InvalidCatalogExpression { entry, source }) => {
                assert_eq!(entry, "weapons.laser.damage");
                assert_eq!(source, ExprError::DivisionByZero { position: 1 });
            }
            other => panic!("Expected invalid expression, got {:?}", other),
        }
    }

    #[test]
    fn test_undefined_power_rejected_at_load() {
        let content = CATALOG.replace("damage = \"5\"", "damage = \"(0-8)^(1/3)\"");
        assert!(matches!(
            Catalog::from_toml_str(&content),
            Err(SkirmishError::InvalidCatalogExpression {
                source: ExprError::NonFinite { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_weapon_reference() {
        let content = CATALOG.replace("[\"laser\", \"srm\"]", "[\"laser\", \"gauss\"]");
        assert!(matches!(
            Catalog::from_toml_str(&content),
            Err(SkirmishError::UnknownWeapon { weapon, .. }) if weapon == "gauss"
        ));
    }

    #[test]
    fn test_unknown_roster_faction() {
        let content = CATALOG.replace("faction = \"red\"", "faction = \"purple\"");
        assert!(matches!(
            Catalog::from_toml_str(&content),
            Err(SkirmishError::UnknownFaction(_))
        ));
    }
}
