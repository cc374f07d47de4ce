//! Structured result of one fire resolution

use serde::{Deserialize, Serialize};

use crate::dice::DamageObject;

/// Which dodge branch applied to a volley
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DodgeOutcome {
    /// Defender cannot jump
    NotAttempted,
    /// The whole volley was avoided
    Full,
    /// Half of the volley was avoided
    Half,
    /// The jump did not help
    Failed,
    /// Expected mode: the probability-weighted average of the branches
    Blended,
}

/// Auditable breakdown of damage from one volley
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageReport {
    pub original_damage: DamageObject,
    pub dodged: bool,
    pub dodge_outcome: DodgeOutcome,
    pub dodge_mitigation: DamageObject,
    pub armor_mitigation: DamageObject,
    pub final_damage: f64,
    /// Number of weapons that fired together
    pub fired_weapons: usize,
}

impl DamageReport {
    /// Report for a volley that never happened
    pub fn empty() -> Self {
        Self {
            original_damage: DamageObject::zero(),
            dodged: false,
            dodge_outcome: DodgeOutcome::NotAttempted,
            dodge_mitigation: DamageObject::zero(),
            armor_mitigation: DamageObject::zero(),
            final_damage: 0.0,
            fired_weapons: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fired_weapons == 0
    }
}

/// Damage left after mitigation
///
/// Both mitigations are floored and negative armor counts as none, so any
/// rounding works in the attacker's favor.
pub fn mitigated_damage(original: f64, dodge: f64, armor: f64) -> f64 {
    (original - dodge.floor() - armor.max(0.0).floor()).max(0.0)
}
