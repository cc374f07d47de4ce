//! Computer-controlled target and weapon selection

pub mod selector;
pub mod weights;

pub use selector::{choose_best_attack, AttackRecommendation, TargetAssessment};
pub use weights::{class_weights, ClassWeights, Hostility};
