//! Combatants ("robots") and their combat classes

use serde::{Deserialize, Serialize};

use crate::combat::weapons::Weapon;
use crate::core::types::{CombatantId, FactionId, WeaponId};
use crate::dice::DamageExpression;

/// Role of a combatant, used to pick the AI's scoring weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatClass {
    Scout,
    Brawler,
    Sniper,
    Juggernaut,
}

/// A combatant on the field
///
/// Everything except `hitpoints` and weapon ammunition is fixed once the
/// combatant has been spawned.
#[derive(Debug, Clone, PartialEq)]
pub struct Combatant {
    pub id: CombatantId,
    /// Catalog chassis this combatant was built from
    pub chassis: String,
    pub faction: FactionId,
    pub hitpoints: i64,
    pub max_hitpoints: i64,
    pub armor: DamageExpression,
    pub can_jump: bool,
    pub arsenal: Vec<Weapon>,
    pub class: CombatClass,
    pub speed: u32,
    pub point_value: u32,
}

impl Combatant {
    pub fn is_alive(&self) -> bool {
        self.hitpoints > 0
    }

    pub fn is_dead(&self) -> bool {
        !self.is_alive()
    }

    /// True if at least one weapon can still fire
    pub fn has_any_ammo(&self) -> bool {
        self.arsenal.iter().any(Weapon::has_ammo_for_shot)
    }

    /// Weapons matching `selector` that can afford a shot, with their arsenal
    /// index
    pub fn ready_weapons<'a>(
        &'a self,
        selector: &'a str,
    ) -> impl Iterator<Item = (usize, &'a Weapon)> + 'a {
        self.arsenal
            .iter()
            .enumerate()
            .filter(move |(_, w)| w.matches(selector) && w.has_ammo_for_shot())
    }

    /// Distinct ids of weapons that can fire, in arsenal order
    pub fn ready_weapon_ids(&self) -> Vec<&WeaponId> {
        let mut ids: Vec<&WeaponId> = Vec::new();
        for weapon in self.arsenal.iter().filter(|w| w.has_ammo_for_shot()) {
            if !ids.contains(&&weapon.id) {
                ids.push(&weapon.id);
            }
        }
        ids
    }

    /// Subtract damage from hitpoints. Fractional damage rounds up.
    pub fn take_damage(&mut self, damage: f64) {
        if damage > 0.0 {
            self.hitpoints -= damage.ceil() as i64;
        }
    }

    /// `"chassis#id"`, for logs and rationale strings
    pub fn label(&self) -> String {
        format!("{}{}", self.chassis, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::weapons::{Ammo, DisplayNames, WeaponClass};

    fn weapon(id: &str, capacity: Option<u32>) -> Weapon {
        Weapon {
            id: WeaponId::new(id),
            names: DisplayNames {
                short: id.to_uppercase(),
                long: format!("{} cannon", id),
            },
            class: WeaponClass::Energy,
            damage: DamageExpression::parse("1d6").unwrap(),
            ammo: Ammo::full(capacity),
            ammo_cost_per_shot: 1,
        }
    }

    fn combatant(arsenal: Vec<Weapon>) -> Combatant {
        Combatant {
            id: CombatantId(1),
            chassis: "warden".to_string(),
            faction: FactionId::new("blue"),
            hitpoints: 20,
            max_hitpoints: 20,
            armor: DamageExpression::flat(2),
            can_jump: false,
            arsenal,
            class: CombatClass::Brawler,
            speed: 4,
            point_value: 100,
        }
    }

    #[test]
    fn test_ready_weapon_ids_are_distinct_and_ordered() {
        let unit = combatant(vec![
            weapon("laser", None),
            weapon("srm", Some(0)),
            weapon("laser", None),
            weapon("ppc", Some(4)),
        ]);
        let ids: Vec<&str> = unit.ready_weapon_ids().iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["laser", "ppc"]);
    }

    #[test]
    fn test_ready_weapons_filters_empty_magazines() {
        let unit = combatant(vec![weapon("srm", Some(0)), weapon("srm", Some(2))]);
        let ready: Vec<usize> = unit.ready_weapons("srm").map(|(i, _)| i).collect();
        assert_eq!(ready, vec![1]);
    }

    #[test]
    fn test_take_damage_can_go_negative() {
        let mut unit = combatant(vec![]);
        unit.take_damage(25.5);
        assert_eq!(unit.hitpoints, -6);
        assert!(unit.is_dead());
        assert!(!unit.has_any_ammo());
    }

    #[test]
    fn test_label() {
        assert_eq!(combatant(vec![]).label(), "warden#1");
    }
}
