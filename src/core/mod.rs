pub mod error;
pub mod types;

pub use error::{Result, SkirmishError};
pub use types::{CombatantId, FactionId, WeaponId};
