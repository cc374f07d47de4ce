//! Fire resolution
//!
//! A shot runs in three steps. The attacker's matching weapons are summed
//! into one volley expression and evaluated, a jumping defender may dodge,
//! and armor soaks part of what is left. Nothing is mutated unless the
//! caller commits the shot.

use rand::Rng;

use crate::combat::combatant::Combatant;
use crate::combat::constants::{
    DODGE_FULL_MAX_ROLL, DODGE_HALF_ROLL, DODGE_HALF_SHARE, DODGE_ROLL,
    EXPECTED_DODGE_PREVENTION, JUMP_ARMOR_SCALE,
};
use crate::combat::report::{mitigated_damage, DamageReport, DodgeOutcome};
use crate::core::error::Result;
use crate::core::types::CombatantId;
use crate::dice::{DamageExpression, DamageObject, EvaluationMode, ExprError};
use crate::roster::World;

/// Weapons firing together as one volley
#[derive(Debug, Clone, PartialEq)]
pub struct Volley {
    /// Arsenal indices of the weapons that fire
    pub weapons: Vec<usize>,
    pub expression: DamageExpression,
}

/// A resolved shot that has not been applied yet
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub report: DamageReport,
    /// `None` when nothing could fire
    pub volley: Option<Volley>,
}

/// Group the attacker's ready weapons matching `selector` into a volley
///
/// All matching weapons that share the first match's id fire together.
/// Returns `None` when no matching weapon can afford a shot.
pub fn assemble_volley(
    attacker: &Combatant,
    selector: &str,
) -> std::result::Result<Option<Volley>, ExprError> {
    let Some((_, lead)) = attacker.ready_weapons(selector).next() else {
        return Ok(None);
    };
    let weapons: Vec<usize> = attacker
        .ready_weapons(selector)
        .filter(|(_, weapon)| weapon.id == lead.id)
        .map(|(index, _)| index)
        .collect();
    let expression = lead.damage.volley(weapons.len())?;
    Ok(Some(Volley {
        weapons,
        expression,
    }))
}

/// Resolve a shot without touching ammunition or hitpoints
pub fn resolve_fire<R: Rng + ?Sized>(
    attacker: &Combatant,
    defender: &Combatant,
    selector: &str,
    mode: EvaluationMode,
    rng: &mut R,
) -> std::result::Result<Resolution, ExprError> {
    let Some(volley) = assemble_volley(attacker, selector)? else {
        tracing::warn!(
            "{} has no weapon matching '{}' with ammunition to fire",
            attacker.label(),
            selector
        );
        return Ok(Resolution {
            report: DamageReport::empty(),
            volley: None,
        });
    };

    let original = volley.expression.evaluate(mode, rng)?;
    let (dodge_outcome, dodge) = resolve_dodge(defender, &original, mode, rng)?;
    let armor = resolve_armor(defender, mode, rng)?;
    let final_damage = mitigated_damage(original.damage, dodge.damage, armor.damage);

    tracing::debug!(
        "{} -> {} [{}] {}: {} - dodge {} - armor {} = {}",
        attacker.label(),
        defender.label(),
        mode,
        volley.expression,
        original.damage,
        dodge.damage,
        armor.damage,
        final_damage
    );

    let report = DamageReport {
        original_damage: original,
        dodged: !matches!(dodge_outcome, DodgeOutcome::NotAttempted | DodgeOutcome::Failed),
        dodge_outcome,
        dodge_mitigation: dodge,
        armor_mitigation: armor,
        final_damage,
        fired_weapons: volley.weapons.len(),
    };

    Ok(Resolution {
        report,
        volley: Some(volley),
    })
}

fn resolve_dodge<R: Rng + ?Sized>(
    defender: &Combatant,
    original: &DamageObject,
    mode: EvaluationMode,
    rng: &mut R,
) -> std::result::Result<(DodgeOutcome, DamageObject), ExprError> {
    if !defender.can_jump {
        return Ok((DodgeOutcome::NotAttempted, DamageObject::zero()));
    }

    let incoming = original.damage;
    // Mitigation is floored before it is subtracted, so a full dodge has to
    // round a fractional volley up to leave nothing behind.
    let whole = incoming.ceil();
    let resolved = match mode {
        EvaluationMode::Random => {
            let roll = DamageExpression::parse(DODGE_ROLL)?.evaluate(EvaluationMode::Random, rng)?;
            let (outcome, prevented) = if roll.damage <= DODGE_FULL_MAX_ROLL {
                (DodgeOutcome::Full, whole)
            } else if roll.damage == DODGE_HALF_ROLL {
                (DodgeOutcome::Half, incoming * DODGE_HALF_SHARE)
            } else {
                (DodgeOutcome::Failed, 0.0)
            };
            let mitigation = DamageObject {
                source_expression: roll.source_expression,
                damage: prevented,
                rolls: roll.rolls,
                minimum: prevented,
                maximum: prevented,
            };
            (outcome, mitigation)
        }
        EvaluationMode::Expected => (
            DodgeOutcome::Blended,
            DamageObject::flat(String::new(), incoming * EXPECTED_DODGE_PREVENTION),
        ),
        // The floor of damage taken assumes every jump succeeds
        EvaluationMode::Minimum => (DodgeOutcome::Full, DamageObject::flat(String::new(), whole)),
        EvaluationMode::Maximum => (DodgeOutcome::Failed, DamageObject::zero()),
    };
    Ok(resolved)
}

fn resolve_armor<R: Rng + ?Sized>(
    defender: &Combatant,
    mode: EvaluationMode,
    rng: &mut R,
) -> std::result::Result<DamageObject, ExprError> {
    // Bounding modes pair the attacker's extreme with the defender's opposite one.
    let armor_mode = match mode {
        EvaluationMode::Minimum => EvaluationMode::Maximum,
        EvaluationMode::Maximum => EvaluationMode::Minimum,
        other => other,
    };
    let mut armor = defender.armor.evaluate(armor_mode, rng)?;
    if mode == EvaluationMode::Expected && defender.can_jump {
        armor.damage *= JUMP_ARMOR_SCALE;
    }
    Ok(armor)
}

/// Resolve a shot between two combatants in `world`
///
/// With `commit`, the fired weapons pay their ammunition cost and the
/// defender loses `final_damage` hitpoints. Firing with nothing ready is not
/// an error: the report comes back empty and nothing changes.
pub fn fire<R: Rng + ?Sized>(
    world: &mut World,
    attacker_id: CombatantId,
    defender_id: CombatantId,
    selector: &str,
    mode: EvaluationMode,
    commit: bool,
    rng: &mut R,
) -> Result<DamageReport> {
    let resolution = {
        let attacker = world.get(attacker_id)?;
        let defender = world.get(defender_id)?;
        resolve_fire(attacker, defender, selector, mode, rng)?
    };

    if let (true, Some(volley)) = (commit, &resolution.volley) {
        let attacker = world.get_mut(attacker_id)?;
        for &index in &volley.weapons {
            attacker.arsenal[index].spend_shot();
        }
        let attacker_label = attacker.label();

        let defender = world.get_mut(defender_id)?;
        defender.take_damage(resolution.report.final_damage);
        tracing::info!(
            "{} fired {} x{} at {}: {} damage, {} hitpoints left",
            attacker_label,
            selector,
            volley.weapons.len(),
            defender.label(),
            resolution.report.final_damage,
            defender.hitpoints
        );
    }

    Ok(resolution.report)
}
