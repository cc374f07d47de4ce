pub mod combatant;
pub mod constants;
pub mod report;
pub mod resolution;
pub mod weapons;

pub use combatant::{CombatClass, Combatant};
pub use report::{mitigated_damage, DamageReport, DodgeOutcome};
pub use resolution::{assemble_volley, fire, resolve_fire, Resolution, Volley};
pub use weapons::{Ammo, DisplayNames, Weapon, WeaponClass};
