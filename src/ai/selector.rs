//! Attack selection heuristic
//!
//! Every candidate target is scored from the actor's point of view by
//! simulating shots in expected mode:
//!
//! 1. For each living enemy, every weapon it can still fire is resolved
//!    against every living ally of the actor (the actor included), keeping
//!    the worst weapon per ally.
//! 2. Each enemy is then scored on how threatening it is to the actor and
//!    its allies, and on how vulnerable it is to the actor's own weapons.
//!
//! The highest score wins. Nothing in the world is mutated.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ai::weights::{class_weights, ClassWeights};
use crate::combat::{resolve_fire, Combatant};
use crate::core::error::Result;
use crate::core::types::{CombatantId, WeaponId};
use crate::dice::EvaluationMode;
use crate::roster::{FactionKind, World};

/// Sub-scores for one candidate target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetAssessment {
    pub target: CombatantId,
    pub score: f64,
    pub threat_to_self: f64,
    pub threat_to_others: f64,
    /// Ally (other than the actor) this target threatens most
    pub most_threatened_ally: Option<CombatantId>,
    pub vulnerability_with_ammo: f64,
    pub vulnerability_without_ammo: f64,
    pub hatred: f64,
    /// Actor's best limited-ammo weapon against this target
    pub best_limited_weapon: Option<WeaponId>,
    /// Actor's best unlimited-ammo weapon against this target
    pub best_unlimited_weapon: Option<WeaponId>,
}

/// What the actor should do this turn
///
/// An empty recommendation (no weapon, no target) is a normal outcome; the
/// rationale says why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackRecommendation {
    pub weapon: Option<WeaponId>,
    pub target: Option<CombatantId>,
    pub rationale: Vec<String>,
    /// Enemy expected to hurt the actor the most
    pub most_dangerous_enemy: Option<CombatantId>,
    /// Every scored target, best first
    pub assessments: Vec<TargetAssessment>,
}

impl AttackRecommendation {
    fn empty(reason: String) -> Self {
        tracing::debug!("No attack recommended: {}", reason);
        Self {
            weapon: None,
            target: None,
            rationale: vec![reason],
            most_dangerous_enemy: None,
            assessments: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.weapon.is_none() || self.target.is_none()
    }
}

/// Worst weapon of one enemy against one ally
#[derive(Clone)]
struct Threat<'a> {
    damage: f64,
    weapon: &'a WeaponId,
}

fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

fn ratio(damage: f64, hitpoints: i64) -> f64 {
    clamp01(damage / hitpoints.max(1) as f64)
}

/// Expected final damage of `attacker` firing the `weapon` group at `defender`
fn expected_damage<R: Rng + ?Sized>(
    attacker: &Combatant,
    defender: &Combatant,
    weapon: &WeaponId,
    rng: &mut R,
) -> Result<f64> {
    let resolution = resolve_fire(
        attacker,
        defender,
        weapon.as_str(),
        EvaluationMode::Expected,
        rng,
    )?;
    Ok(resolution.report.final_damage)
}

/// Recommend a target and weapon for `actor_id`
///
/// Fails only when `actor_id` is unknown or an expression cannot be
/// evaluated. Every gameplay reason to hold fire comes back as an empty
/// recommendation.
pub fn choose_best_attack<R: Rng + ?Sized>(
    world: &World,
    actor_id: CombatantId,
    rng: &mut R,
) -> Result<AttackRecommendation> {
    if !world.is_in_progress() {
        return Ok(AttackRecommendation::empty(
            "No game in progress".to_string(),
        ));
    }

    let actor = world.get(actor_id)?;
    if actor.is_dead() {
        return Ok(AttackRecommendation::empty(format!(
            "{} is destroyed and cannot attack",
            actor.label()
        )));
    }
    if !actor.has_any_ammo() {
        return Ok(AttackRecommendation::empty(format!(
            "{} has exhausted its ammunition",
            actor.label()
        )));
    }

    let enemies = world.enemies_of(actor);
    if enemies.is_empty() {
        return Ok(AttackRecommendation::empty(format!(
            "No living enemies remain for {}",
            actor.label()
        )));
    }

    let allies = world.allies_of(actor);
    let actor_slot = allies.iter().position(|ally| ally.id == actor.id);
    let weights = class_weights(actor.class);
    let hostility = if world.faction_count() >= 3 {
        world
            .faction(&actor.faction)
            .map(|faction| faction.hostility.draw(rng))
            .unwrap_or(0.0)
    } else {
        0.0
    };

    // Pass 1: worst enemy weapon per ally
    let mut threats: Vec<Vec<Option<Threat>>> = Vec::with_capacity(enemies.len());
    let mut most_dangerous: Option<(CombatantId, Threat)> = None;
    for enemy in &enemies {
        let mut per_ally: Vec<Option<Threat>> = vec![None; allies.len()];
        for weapon in enemy.ready_weapon_ids() {
            for (slot, ally) in allies.iter().enumerate() {
                let damage = expected_damage(enemy, ally, weapon, rng)?;
                if per_ally[slot].as_ref().map_or(true, |t| damage > t.damage) {
                    per_ally[slot] = Some(Threat { damage, weapon });
                }
            }
        }

        if let Some(Some(threat)) = actor_slot.map(|slot| &per_ally[slot]) {
            if most_dangerous
                .as_ref()
                .map_or(true, |(_, best)| threat.damage > best.damage)
            {
                most_dangerous = Some((enemy.id, threat.clone()));
            }
        }
        threats.push(per_ally);
    }

    // Pass 2: score
    let mut assessments = Vec::with_capacity(enemies.len());
    for (enemy, per_ally) in enemies.iter().zip(&threats) {
        let assessment = assess(
            actor,
            enemy,
            &allies,
            actor_slot,
            per_ally,
            &weights,
            world,
            hostility,
            rng,
        )?;
        tracing::debug!(
            "{} scores {} at {:.3} (self {:.2}, others {:.2}, ammo {:.2}, no ammo {:.2}, hatred {:.2})",
            actor.label(),
            enemy.label(),
            assessment.score,
            assessment.threat_to_self,
            assessment.threat_to_others,
            assessment.vulnerability_with_ammo,
            assessment.vulnerability_without_ammo,
            assessment.hatred
        );
        assessments.push(assessment);
    }

    // Stable: equal scores keep enumeration order
    assessments.sort_by(|a, b| b.score.total_cmp(&a.score));

    let top = &assessments[0];
    let target_id = top.target;
    let limited_pull = weights.vulnerability_with_ammo * top.vulnerability_with_ammo;
    let unlimited_pull = weights.vulnerability_without_ammo * top.vulnerability_without_ammo;
    let weapon = if limited_pull > unlimited_pull {
        top.best_limited_weapon
            .clone()
            .or_else(|| top.best_unlimited_weapon.clone())
    } else {
        top.best_unlimited_weapon
            .clone()
            .or_else(|| top.best_limited_weapon.clone())
    };

    let target = world.get(target_id)?;
    let mut rationale = vec![format!(
        "Target {} (score {:.3})",
        target.label(),
        top.score
    )];
    if let Some(weapon) = &weapon {
        rationale.push(format!(
            "Fire {} ({} ammunition)",
            weapon,
            if top.best_limited_weapon.as_ref() == Some(weapon) {
                "limited"
            } else {
                "unlimited"
            }
        ));
    }
    rationale.push(format!(
        "Threat to self {:.2}, threat to allies {:.2}",
        top.threat_to_self, top.threat_to_others
    ));
    if let Some(ally) = top.most_threatened_ally.and_then(|id| world.combatant(id)) {
        rationale.push(format!("Most threatened ally: {}", ally.label()));
    }
    if let Some((id, threat)) = &most_dangerous {
        if let Some(enemy) = world.combatant(*id) {
            rationale.push(format!(
                "Most dangerous enemy: {} with {} ({:.1} expected damage)",
                enemy.label(),
                threat.weapon,
                threat.damage
            ));
        }
    }

    tracing::info!(
        "{} targets {} with {}",
        actor.label(),
        target.label(),
        weapon.as_ref().map(WeaponId::as_str).unwrap_or("nothing")
    );

    Ok(AttackRecommendation {
        weapon,
        target: Some(target_id),
        rationale,
        most_dangerous_enemy: most_dangerous.map(|(id, _)| id),
        assessments,
    })
}

#[allow(clippy::too_many_arguments)]
fn assess<R: Rng + ?Sized>(
    actor: &Combatant,
    enemy: &Combatant,
    allies: &[&Combatant],
    actor_slot: Option<usize>,
    per_ally: &[Option<Threat>],
    weights: &ClassWeights,
    world: &World,
    hostility: f64,
    rng: &mut R,
) -> Result<TargetAssessment> {
    let threat_to_self = actor_slot
        .and_then(|slot| per_ally[slot].as_ref())
        .map_or(0.0, |threat| ratio(threat.damage, actor.hitpoints));

    let mut threat_to_others = 0.0;
    let mut most_threatened_ally = None;
    for (slot, ally) in allies.iter().enumerate() {
        if Some(slot) == actor_slot {
            continue;
        }
        if let Some(threat) = &per_ally[slot] {
            let level = ratio(threat.damage, ally.hitpoints);
            if most_threatened_ally.is_none() || level > threat_to_others {
                threat_to_others = level;
                most_threatened_ally = Some(ally.id);
            }
        }
    }

    let mut best_limited: Option<(WeaponId, f64)> = None;
    let mut best_unlimited: Option<(WeaponId, f64)> = None;
    for weapon in actor.ready_weapon_ids() {
        let unlimited = actor
            .ready_weapons(weapon.as_str())
            .next()
            .map_or(false, |(_, w)| w.has_unlimited_ammo());
        let level = ratio(expected_damage(actor, enemy, weapon, rng)?, enemy.hitpoints);
        let best = if unlimited {
            &mut best_unlimited
        } else {
            &mut best_limited
        };
        if best.as_ref().map_or(true, |(_, current)| level > *current) {
            *best = Some((weapon.clone(), level));
        }
    }

    let vulnerability_with_ammo = best_limited.as_ref().map_or(0.0, |(_, v)| *v);
    let vulnerability_without_ammo = best_unlimited.as_ref().map_or(0.0, |(_, v)| *v);
    let hatred = if world.faction_kind(&enemy.faction) == Some(FactionKind::Human) {
        hostility
    } else {
        0.0
    };

    let score = weights.threat_to_self * threat_to_self
        + weights.threat_to_allies * threat_to_others
        + weights.vulnerability_with_ammo * vulnerability_with_ammo
        + weights.vulnerability_without_ammo * vulnerability_without_ammo
        + hatred;

    Ok(TargetAssessment {
        target: enemy.id,
        score,
        threat_to_self,
        threat_to_others,
        most_threatened_ally,
        vulnerability_with_ammo,
        vulnerability_without_ammo,
        hatred,
        best_limited_weapon: best_limited.map(|(id, _)| id),
        best_unlimited_weapon: best_unlimited.map(|(id, _)| id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_helpers() {
        assert_eq!(clamp01(-0.5), 0.0);
        assert_eq!(clamp01(1.5), 1.0);
        assert_eq!(ratio(5.0, 10), 0.5);
        assert_eq!(ratio(50.0, 10), 1.0);
        assert_eq!(ratio(3.0, 0), 1.0);
    }

    #[test]
    fn test_empty_recommendation() {
        let recommendation = AttackRecommendation::empty("No game in progress".to_string());
        assert!(recommendation.is_empty());
        assert!(recommendation.assessments.is_empty());
        assert_eq!(recommendation.rationale, vec!["No game in progress"]);
    }
}
