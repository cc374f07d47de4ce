//! Weapons and their ammunition
//!
//! A weapon's damage is a dice expression. Ammunition is either unlimited or
//! a magazine that only the committing fire path drains.

use serde::{Deserialize, Serialize};

use crate::core::types::WeaponId;
use crate::dice::DamageExpression;

/// Broad weapon family, carried for display and catalog grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponClass {
    Ballistic,
    Energy,
    Missile,
    Melee,
}

/// Short and long display names for a weapon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayNames {
    pub short: String,
    pub long: String,
}

/// Ammunition state of a single weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ammo {
    Unlimited,
    Limited { capacity: u32, remaining: u32 },
}

impl Ammo {
    /// A full magazine, or unlimited when no capacity is given
    pub fn full(capacity: Option<u32>) -> Self {
        match capacity {
            Some(capacity) => Ammo::Limited {
                capacity,
                remaining: capacity,
            },
            None => Ammo::Unlimited,
        }
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self, Ammo::Unlimited)
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        match self {
            Ammo::Unlimited => true,
            Ammo::Limited { remaining, .. } => *remaining >= cost,
        }
    }

    fn spend(&mut self, cost: u32) {
        if let Ammo::Limited { remaining, .. } = self {
            *remaining = remaining.saturating_sub(cost);
        }
    }

    fn refill(&mut self) {
        if let Ammo::Limited {
            capacity,
            remaining,
        } = self
        {
            *remaining = *capacity;
        }
    }
}

/// A weapon mounted on a combatant
#[derive(Debug, Clone, PartialEq)]
pub struct Weapon {
    pub id: WeaponId,
    pub names: DisplayNames,
    pub class: WeaponClass,
    pub damage: DamageExpression,
    pub ammo: Ammo,
    pub ammo_cost_per_shot: u32,
}

impl Weapon {
    /// True when `selector` names this weapon by id, short name or long name
    ///
    /// Ids match exactly; display names ignore case.
    pub fn matches(&self, selector: &str) -> bool {
        self.id.as_str() == selector
            || self.names.short.eq_ignore_ascii_case(selector)
            || self.names.long.eq_ignore_ascii_case(selector)
    }

    pub fn has_ammo_for_shot(&self) -> bool {
        self.ammo.can_afford(self.ammo_cost_per_shot)
    }

    pub fn has_unlimited_ammo(&self) -> bool {
        self.ammo.is_unlimited()
    }

    /// Deduct the cost of one shot
    pub fn spend_shot(&mut self) {
        self.ammo.spend(self.ammo_cost_per_shot);
    }

    pub fn reload(&mut self) {
        self.ammo.refill();
    }
}
