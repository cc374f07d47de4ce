use thiserror::Error;

use crate::core::types::{CombatantId, FactionId};
use crate::dice::ExprError;

#[derive(Error, Debug)]
pub enum SkirmishError {
    #[error("Expression error: {0}")]
    Expression(#[from] ExprError),

    #[error("Invalid expression in {entry}: {source}")]
    InvalidCatalogExpression {
        entry: String,
        #[source]
        source: ExprError,
    },

    #[error("Combatant not found: {0}")]
    CombatantNotFound(CombatantId),

    #[error("Unknown chassis: {0}")]
    UnknownChassis(String),

    #[error("Chassis {chassis} references unknown weapon {weapon}")]
    UnknownWeapon { chassis: String, weapon: String },

    #[error("Unknown faction: {0}")]
    UnknownFaction(FactionId),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Catalog parse error: {0}")]
    CatalogParse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SkirmishError>;
