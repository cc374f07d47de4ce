//! Scoring weights for the attack selector

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::CombatClass;

/// Per-class weights for the four target sub-scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassWeights {
    /// w1: how much damage the target can do to the actor
    pub threat_to_self: f64,
    /// w2: how much damage the target can do to the actor's allies
    pub threat_to_allies: f64,
    /// w3: how badly the actor's limited-ammo weapons hurt the target
    pub vulnerability_with_ammo: f64,
    /// w4: how badly the actor's unlimited-ammo weapons hurt the target
    pub vulnerability_without_ammo: f64,
}

impl ClassWeights {
    const fn new(w1: f64, w2: f64, w3: f64, w4: f64) -> Self {
        Self {
            threat_to_self: w1,
            threat_to_allies: w2,
            vulnerability_with_ammo: w3,
            vulnerability_without_ammo: w4,
        }
    }
}

/// Fixed weight lookup by combat class
pub fn class_weights(class: CombatClass) -> ClassWeights {
    match class {
        // Fragile: stay alive first
        CombatClass::Scout => ClassWeights::new(0.4, 0.1, 0.2, 0.3),
        CombatClass::Brawler => ClassWeights::new(0.2, 0.2, 0.3, 0.3),
        // Spends its ammunition on whatever it can kill
        CombatClass::Sniper => ClassWeights::new(0.1, 0.3, 0.4, 0.2),
        // Screens the rest of the faction
        CombatClass::Juggernaut => ClassWeights::new(0.3, 0.4, 0.15, 0.15),
    }
}

/// Bonus a faction adds when targeting human-controlled enemies
///
/// Only used once three or more factions are in the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hostility {
    Fixed(f64),
    /// Uniform in `[0, max]`, drawn again for every decision
    Random { max: f64 },
}

impl Hostility {
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            Hostility::Fixed(value) => value,
            Hostility::Random { max } if max > 0.0 => rng.gen_range(0.0..=max),
            Hostility::Random { .. } => 0.0,
        }
    }
}

impl Default for Hostility {
    fn default() -> Self {
        Hostility::Fixed(0.0)
    }
}
