//! Headless Skirmish Runner
//!
//! Loads a catalog, lets the attack selector drive every combatant and
//! prints what happened as JSON or text.

use std::path::PathBuf;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use robo_skirmish::ai::choose_best_attack;
use robo_skirmish::combat::fire;
use robo_skirmish::core::error::Result;
use robo_skirmish::core::types::{CombatantId, FactionId};
use robo_skirmish::dice::EvaluationMode;
use robo_skirmish::roster::{Catalog, World};

/// Headless Skirmish Runner - AI vs AI fights from a catalog file
#[derive(Parser, Debug)]
#[command(name = "robo-skirmish")]
#[command(about = "Run a computer-controlled skirmish and report every shot")]
struct Args {
    /// Catalog with weapons, chassis, factions and the starting roster
    #[arg(long, default_value = "data/catalog.toml")]
    catalog: PathBuf,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum rounds before calling a draw
    #[arg(long, default_value_t = 50)]
    rounds: u32,

    /// Evaluation mode for committed shots: random, minimum, expected, maximum
    #[arg(long, default_value = "random")]
    mode: String,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// One committed shot
#[derive(Serialize)]
struct ShotRecord {
    round: u32,
    attacker: CombatantId,
    defender: CombatantId,
    weapon: String,
    original_damage: f64,
    final_damage: f64,
    dodged: bool,
    defender_hitpoints: i64,
    rationale: Vec<String>,
}

/// JSON output structure
#[derive(Serialize)]
struct SkirmishSummary {
    seed: u64,
    mode: EvaluationMode,
    rounds_played: u32,
    winner: Option<FactionId>,
    survivors: Vec<CombatantId>,
    shots: Vec<ShotRecord>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("robo_skirmish=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mode: EvaluationMode = args.mode.parse()?;
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let catalog = Catalog::load(&args.catalog)?;
    let mut world = World::from_catalog(&catalog)?;
    world.start();

    let mut shots = Vec::new();
    let mut rounds_played = 0;

    for round in 1..=args.rounds {
        if !world.is_in_progress() {
            break;
        }
        rounds_played = round;
        tracing::debug!("Round {}", round);

        // Combatants destroyed earlier in the round lose their turn
        for actor in world.living_ids() {
            if !world.is_in_progress() {
                break;
            }
            if world.get(actor)?.is_dead() {
                continue;
            }

            let recommendation = choose_best_attack(&world, actor, &mut rng)?;
            let (Some(weapon), Some(target)) =
                (recommendation.weapon.clone(), recommendation.target)
            else {
                tracing::info!("{} holds fire: {:?}", actor, recommendation.rationale);
                continue;
            };

            let report = fire(&mut world, actor, target, weapon.as_str(), mode, true, &mut rng)?;
            shots.push(ShotRecord {
                round,
                attacker: actor,
                defender: target,
                weapon: weapon.to_string(),
                original_damage: report.original_damage.damage,
                final_damage: report.final_damage,
                dodged: report.dodged,
                defender_hitpoints: world.get(target)?.hitpoints,
                rationale: recommendation.rationale,
            });
        }
    }

    let summary = SkirmishSummary {
        seed,
        mode,
        rounds_played,
        winner: world.winning_faction().cloned(),
        survivors: world.living_ids(),
        shots,
    };

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_text(&world, &summary);
    }

    Ok(())
}

fn print_text(world: &World, summary: &SkirmishSummary) {
    println!("=== SKIRMISH (seed {}, {} mode) ===", summary.seed, summary.mode);
    for shot in &summary.shots {
        println!(
            "[round {:>2}] {} -> {} with {}: {:.1} rolled, {:.1} dealt{} ({} hp left)",
            shot.round,
            shot.attacker,
            shot.defender,
            shot.weapon,
            shot.original_damage,
            shot.final_damage,
            if shot.dodged { ", dodged" } else { "" },
            shot.defender_hitpoints
        );
    }
    println!();
    match &summary.winner {
        Some(faction) => println!("Winner: {} after {} rounds", faction, summary.rounds_played),
        None => println!("No winner after {} rounds", summary.rounds_played),
    }
    for combatant in world.living() {
        println!(
            "  {} ({}) {}/{} hp",
            combatant.label(),
            combatant.faction,
            combatant.hitpoints,
            combatant.max_hitpoints
        );
    }
}
