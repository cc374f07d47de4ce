//! Static catalog data and the live skirmish session built from it

pub mod catalog;
pub mod world;

pub use catalog::{Catalog, ChassisSpec, FactionSpec, RosterEntry, WeaponSpec};
pub use world::{Faction, FactionKind, World};
