//! Skirmish session - owns every combatant and faction in play

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::ai::weights::Hostility;
use crate::combat::Combatant;
use crate::core::error::{Result, SkirmishError};
use crate::core::types::{CombatantId, FactionId};
use crate::roster::catalog::Catalog;

/// Who controls a faction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactionKind {
    Human,
    Computer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Faction {
    pub id: FactionId,
    pub kind: FactionKind,
    pub hostility: Hostility,
}

/// The combatants of one skirmish, in spawn order
pub struct World {
    combatants: Vec<Combatant>,
    index: AHashMap<CombatantId, usize>,
    factions: Vec<Faction>,
    next_id: u32,
    started: bool,
}

impl World {
    pub fn new() -> Self {
        Self {
            combatants: Vec::new(),
            index: AHashMap::new(),
            factions: Vec::new(),
            next_id: 1,
            started: false,
        }
    }

    /// Register every catalog faction and spawn the catalog roster
    pub fn from_catalog(catalog: &Catalog) -> Result<Self> {
        let mut world = Self::new();
        for (id, spec) in &catalog.factions {
            world.add_faction(FactionId::new(id.clone()), spec.kind, spec.hostility);
        }
        for entry in &catalog.roster {
            world.spawn(catalog, &entry.chassis, &FactionId::new(entry.faction.clone()))?;
        }
        Ok(world)
    }

    pub fn add_faction(&mut self, id: FactionId, kind: FactionKind, hostility: Hostility) {
        match self.factions.iter_mut().find(|f| f.id == id) {
            Some(existing) => {
                existing.kind = kind;
                existing.hostility = hostility;
            }
            None => self.factions.push(Faction {
                id,
                kind,
                hostility,
            }),
        }
    }

    /// Build a combatant from a catalog chassis with full magazines
    pub fn spawn(
        &mut self,
        catalog: &Catalog,
        chassis: &str,
        faction: &FactionId,
    ) -> Result<CombatantId> {
        if self.faction(faction).is_none() {
            return Err(SkirmishError::UnknownFaction(faction.clone()));
        }
        let spec = catalog
            .chassis(chassis)
            .ok_or_else(|| SkirmishError::UnknownChassis(chassis.to_string()))?;

        let mut arsenal = Vec::with_capacity(spec.weapons.len());
        for weapon_id in &spec.weapons {
            let weapon = catalog
                .weapon(weapon_id)
                .ok_or_else(|| SkirmishError::UnknownWeapon {
                    chassis: chassis.to_string(),
                    weapon: weapon_id.clone(),
                })?;
            arsenal.push(weapon.instantiate(weapon_id));
        }

        let id = CombatantId(self.next_id);
        self.next_id += 1;

        self.index.insert(id, self.combatants.len());
        self.combatants.push(Combatant {
            id,
            chassis: chassis.to_string(),
            faction: faction.clone(),
            hitpoints: spec.hitpoints,
            max_hitpoints: spec.hitpoints,
            armor: spec.armor.clone(),
            can_jump: spec.can_jump,
            arsenal,
            class: spec.class,
            speed: spec.speed,
            point_value: spec.point_value,
        });

        tracing::debug!("Spawned {}{} for faction {}", chassis, id, faction);
        Ok(id)
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.index.get(&id).map(|&i| &self.combatants[i])
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.index.get(&id).map(|&i| &mut self.combatants[i])
    }

    pub fn get(&self, id: CombatantId) -> Result<&Combatant> {
        self.combatant(id)
            .ok_or(SkirmishError::CombatantNotFound(id))
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Result<&mut Combatant> {
        self.combatant_mut(id)
            .ok_or(SkirmishError::CombatantNotFound(id))
    }

    /// All combatants in spawn order, dead ones included
    pub fn combatants(&self) -> impl Iterator<Item = &Combatant> + '_ {
        self.combatants.iter()
    }

    pub fn living(&self) -> impl Iterator<Item = &Combatant> + '_ {
        self.combatants.iter().filter(|c| c.is_alive())
    }

    pub fn living_ids(&self) -> Vec<CombatantId> {
        self.living().map(|c| c.id).collect()
    }

    /// Living members of the actor's faction, the actor included if alive
    pub fn allies_of(&self, actor: &Combatant) -> Vec<&Combatant> {
        self.living().filter(|c| c.faction == actor.faction).collect()
    }

    /// Living combatants of every other faction
    pub fn enemies_of(&self, actor: &Combatant) -> Vec<&Combatant> {
        self.living().filter(|c| c.faction != actor.faction).collect()
    }

    pub fn faction(&self, id: &FactionId) -> Option<&Faction> {
        self.factions.iter().find(|f| &f.id == id)
    }

    pub fn faction_kind(&self, id: &FactionId) -> Option<FactionKind> {
        self.faction(id).map(|f| f.kind)
    }

    pub fn faction_count(&self) -> usize {
        self.factions.len()
    }

    pub fn start(&mut self) {
        self.started = true;
        tracing::info!(
            "Skirmish started: {} combatants, {} factions",
            self.combatants.len(),
            self.factions.len()
        );
    }

    /// Started, with at least two factions still fielding someone
    pub fn is_in_progress(&self) -> bool {
        self.started && self.standing_factions().len() >= 2
    }

    /// The last faction standing, once everyone else is destroyed
    pub fn winning_faction(&self) -> Option<&FactionId> {
        match self.standing_factions().as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    fn standing_factions(&self) -> Vec<&FactionId> {
        let mut standing: Vec<&FactionId> = Vec::new();
        for combatant in self.living() {
            if !standing.contains(&&combatant.faction) {
                standing.push(&combatant.faction);
            }
        }
        standing
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
        [weapons.claw]
        short_name = "CL"
        long_name = "Claw"
        class = "melee"
        damage = "1d4"

        [chassis.crab]
        hitpoints = 12
        armor = "1"
        class = "brawler"
        weapons = ["claw", "claw"]

        [factions.blue]
        kind = "human"

        [factions.rust]
        kind = "computer"

        [[roster]]
        chassis = "crab"
        faction = "blue"

        [[roster]]
        chassis = "crab"
        faction = "rust"

        [[roster]]
        chassis = "crab"
        faction = "blue"
    "#;

    fn world() -> World {
        World::from_catalog(&Catalog::from_toml_str(CATALOG).unwrap()).unwrap()
    }

    #[test]
    fn test_spawn_from_catalog() {
        let world = world();
        assert_eq!(world.combatants().count(), 3);
        let first = world.get(CombatantId(1)).unwrap();
        assert_eq!(first.arsenal.len(), 2);
        assert_eq!(first.hitpoints, 12);
        assert_eq!(world.faction_kind(&first.faction), Some(FactionKind::Human));
    }

    #[test]
    fn test_allies_and_enemies() {
        let world = world();
        let actor = world.get(CombatantId(1)).unwrap();
        let allies: Vec<CombatantId> = world.allies_of(actor).iter().map(|c| c.id).collect();
        let enemies: Vec<CombatantId> = world.enemies_of(actor).iter().map(|c| c.id).collect();
        assert_eq!(allies, vec![CombatantId(1), CombatantId(3)]);
        assert_eq!(enemies, vec![CombatantId(2)]);
    }

    #[test]
    fn test_ally_list_outlives_actor_borrow() {
        let world = world();
        let allies = {
            let actor = world.get(CombatantId(2)).unwrap().clone();
            world.allies_of(&actor)
        };
        assert_eq!(allies.len(), 1);
        assert_eq!(allies[0].faction, FactionId::new("rust"));
    }

    #[test]
    fn test_progress_and_winner() {
        let mut world = world();
        assert!(!world.is_in_progress());
        world.start();
        assert!(world.is_in_progress());
        assert_eq!(world.winning_faction(), None);

        world.get_mut(CombatantId(2)).unwrap().hitpoints = 0;
        assert!(!world.is_in_progress());
        assert_eq!(world.winning_faction(), Some(&FactionId::new("blue")));
        assert_eq!(world.living_ids(), vec![CombatantId(1), CombatantId(3)]);
    }

    #[test]
    fn test_unknown_lookups() {
        let mut world = world();
        assert!(matches!(
            world.get(CombatantId(99)),
            Err(SkirmishError::CombatantNotFound(CombatantId(99)))
        ));
        let catalog = Catalog::from_toml_str(CATALOG).unwrap();
        assert!(matches!(
            world.spawn(&catalog, "crab", &FactionId::new("nobody")),
            Err(SkirmishError::UnknownFaction(_))
        ));
        assert!(matches!(
            world.spawn(&catalog, "tank", &FactionId::new("blue")),
            Err(SkirmishError::UnknownChassis(_))
        ));
    }
}
