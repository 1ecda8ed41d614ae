//! Multi-day learning simulation
//! Observes how diverse personalities climb the mastery ladder

use clap::Parser;
use loreforge::core::config::RetentionConfig;
use loreforge::core::types::{CharacterId, Tick, TICKS_PER_DAY};
use loreforge::curriculum::CurriculumCatalog;
use loreforge::cycle::KnowledgeEngine;
use loreforge::knowledge::{KeywordClassifier, KnowledgeStore, MemoryKnowledgeStore};
use loreforge::persona::{StaticTraitProvider, TraitKey, TraitVector};
use loreforge::progression::Belt;
use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "academy_sim", about = "Batch knowledge-learning simulation")]
struct Args {
    /// Number of characters to simulate
    #[arg(long, default_value_t = 50)]
    characters: usize,

    /// Simulated days to run
    #[arg(long, default_value_t = 30)]
    days: u64,

    /// RNG seed for traits and selection
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Named curriculum under data/curriculum/ (falls back to built-ins)
    #[arg(long)]
    curriculum: Option<String>,
}

/// Lore passages characters study
const LESSONS: &[&str] = &[
    "The quench hardens steel because rapid cooling locks the grain structure.",
    "Shield walls hold only while every soldier trusts the one beside them.",
    "Willow bark tea eases fever and then the patient can finally sleep.",
    "Supply lines decide sieges, and hunger breaks walls faster than rams.",
    "A falcon strikes from above and then climbs away before the flock turns.",
    "Mortar needs a full season to cure, so winter builds crumble by spring.",
];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    println!("╔══════════════════════════════════════════════════╗");
    println!("║        LOREFORGE: KNOWLEDGE-CYCLE SIMULATION     ║");
    println!(
        "║   {} characters x {} days (seed {})             ",
        args.characters, args.days, args.seed
    );
    println!("╚══════════════════════════════════════════════════╝\n");

    let catalog = match &args.curriculum {
        Some(name) => match loreforge::curriculum::load_curriculum(name) {
            Ok(catalog) => catalog,
            Err(e) => {
                eprintln!("failed to load curriculum '{}': {e}", name);
                std::process::exit(1);
            }
        },
        None => CurriculumCatalog::with_defaults(),
    };

    let traits = Arc::new(StaticTraitProvider::new());
    let store = Arc::new(MemoryKnowledgeStore::new(Arc::new(KeywordClassifier)));
    let engine = KnowledgeEngine::new(
        store,
        traits.clone(),
        catalog,
        RetentionConfig::default(),
        args.seed,
    );

    // Spawn characters with diverse personalities
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let characters: Vec<CharacterId> = (0..args.characters)
        .map(|_| {
            let character = CharacterId::new();
            let vector = TraitVector::new()
                .with(TraitKey::Inquisitiveness, rng.gen_range(0.0..100.0))
                .with(TraitKey::Overwhelm, rng.gen_range(0.0..60.0))
                .with(TraitKey::Impulsive, rng.gen_range(0.0..100.0))
                .with(TraitKey::Forgetful, rng.gen_range(0.0..100.0))
                .with(TraitKey::Overconfident, rng.gen_range(0.0..100.0));
            traits.set(character, vector);
            character
        })
        .collect();

    println!("Spawned {} characters\n", characters.len());

    let mut cycles_run = 0usize;
    let mut failures = 0usize;

    for day in 0..args.days {
        let now: Tick = day * TICKS_PER_DAY;

        // Fresh study: each character poses one lesson per day.
        // Different characters touch different pairs, so the sweep is safe
        // to parallelize; same-pair serialization lives in the engine.
        let day_results: Vec<bool> = characters
            .par_iter()
            .enumerate()
            .map(|(i, character)| {
                let lesson = LESSONS[(i + day as usize) % LESSONS.len()];
                engine.start_cycle(*character, lesson, None, now).is_ok()
            })
            .collect();

        cycles_run += day_results.len();
        failures += day_results.iter().filter(|ok| !**ok).count();

        // Due reviews: recall decays, so a grade-3 refresher keeps items alive
        let due = engine.due_pairs(now).unwrap_or_default();
        for (character, knowledge) in &due {
            if engine.review_knowledge(*character, *knowledge, 3, now).is_err() {
                failures += 1;
            }
        }

        if day % 10 == 0 {
            println!("day {:>3}: {} due reviews swept", day, due.len());
        }
    }

    println!("\n=== {} cycles run, {} failures ===\n", cycles_run, failures);

    // Rank distribution
    let mut by_belt = [0usize; 5];
    for character in &characters {
        if let Ok(Some(record)) = engine.store().load_progression(*character) {
            let index = Belt::all()
                .iter()
                .position(|b| *b == record.rank.belt)
                .unwrap_or(0);
            by_belt[index] += 1;
        }
    }
    println!("Final belt distribution:");
    for (belt, count) in Belt::all().iter().zip(by_belt.iter()) {
        println!("  {:<8} {}", belt.name(), count);
    }
}
