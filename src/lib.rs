//! Robo Skirmish - dice-formula combat for turn-based robot skirmishes
//!
//! Damage and armor are written as small dice formulas (`"2d6+3"`) and
//! evaluated under one of four modes: an actual roll, the guaranteed
//! minimum, the guaranteed maximum, or the statistical expectation.
//! On top of that sit the fire resolver, which layers dodge and armor
//! mitigation into a [`DamageReport`](combat::DamageReport), and an attack
//! selector that ranks targets by expected damage.

pub mod ai;
pub mod combat;
pub mod core;
pub mod dice;
pub mod roster;
