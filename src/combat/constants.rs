//! Combat resolution constants - all tunable values in one place
//!
//! The dodge table and the expected-mode blend are balance values. The AI
//! scores targets with expected-mode damage, so changing any of these shifts
//! target selection as well as actual fights.

/// Die rolled by a jumping defender under random evaluation
pub const DODGE_ROLL: &str = "1d10";

/// Dodge rolls at or below this value avoid the whole volley
pub const DODGE_FULL_MAX_ROLL: f64 = 4.0;

/// A dodge roll of exactly this value avoids half of the volley
pub const DODGE_HALF_ROLL: f64 = 5.0;

/// Share of the volley a half dodge prevents
pub const DODGE_HALF_SHARE: f64 = 0.5;

/// Chance of a full dodge (rolls 1-4 on the dodge die)
pub const DODGE_FULL_CHANCE: f64 = 0.4;

/// Chance of a half dodge (a roll of 5 on the dodge die)
pub const DODGE_HALF_CHANCE: f64 = 0.1;

/// Average share of damage a jump prevents:
/// `0.4 * 1.0 + 0.1 * 0.5 + 0.5 * 0.0`
pub const EXPECTED_DODGE_PREVENTION: f64 = 0.45;

/// Expected-mode armor scale against a jumping defender. In the 40% of cases
/// where the jump already stopped everything, armor adds nothing.
pub const JUMP_ARMOR_SCALE: f64 = 0.60;
