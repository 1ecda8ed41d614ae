//! Trait- and performance-driven task selection
//!
//! Difficulty starts from personality (curiosity pushes up, overwhelm pulls
//! down), then adapts to recent grades. Selection is uniform over matching
//! curriculum entries, falling back to the whole pool rather than failing.

use crate::core::types::{CharacterId, TaskId};
use crate::curriculum::catalog::{CurriculumCatalog, CurriculumEntry};
use crate::curriculum::task::{Task, TaskKind, TaskProvenance};
use crate::persona::{TraitKey, TraitVector};
use crate::retention::{Evaluation, Grade};
use rand::seq::SliceRandom;
use rand::Rng;

/// Lowest task difficulty
pub const MIN_TASK_DIFFICULTY: u8 = 1;

/// Highest task difficulty
pub const MAX_TASK_DIFFICULTY: u8 = 3;

/// Trait intensity that shifts difficulty by one step
const TRAIT_STEP_THRESHOLD: f32 = 65.0;

/// Trait intensity that shifts difficulty by a second step
const TRAIT_SURGE_THRESHOLD: f32 = 85.0;

/// Grades considered when adapting difficulty
const ADAPTIVE_WINDOW: usize = 3;

/// Mean recent grade at or above this raises difficulty
const RAISE_MEAN: f32 = 4.0;

/// Mean recent grade at or below this lowers difficulty
const LOWER_MEAN: f32 = 2.0;

/// Provenance node name for curriculum-selected tasks
const SELECTOR_NODE: &str = "curriculum-selector";

/// Base difficulty from personality alone
///
/// Starts at 1. Inquisitiveness above the step threshold adds one, above
/// the surge threshold another; overwhelm subtracts symmetrically.
pub fn base_difficulty(traits: &TraitVector) -> u8 {
    let mut difficulty = MIN_TASK_DIFFICULTY as i32;

    if traits.exceeds(TraitKey::Inquisitiveness, TRAIT_STEP_THRESHOLD) {
        difficulty += 1;
    }
    if traits.exceeds(TraitKey::Inquisitiveness, TRAIT_SURGE_THRESHOLD) {
        difficulty += 1;
    }
    if traits.exceeds(TraitKey::Overwhelm, TRAIT_STEP_THRESHOLD) {
        difficulty -= 1;
    }
    if traits.exceeds(TraitKey::Overwhelm, TRAIT_SURGE_THRESHOLD) {
        difficulty -= 1;
    }

    difficulty.clamp(MIN_TASK_DIFFICULTY as i32, MAX_TASK_DIFFICULTY as i32) as u8
}

/// Shift base difficulty by recent performance
///
/// Unchanged when there is no history.
pub fn adaptive_difficulty(base: u8, recent_grades: &[Grade]) -> u8 {
    if recent_grades.is_empty() {
        return base;
    }
    let window = &recent_grades[recent_grades.len().saturating_sub(ADAPTIVE_WINDOW)..];
    let mean =
        window.iter().map(|g| g.value() as f32).sum::<f32>() / window.len() as f32;

    let mut difficulty = base as i32;
    if mean >= RAISE_MEAN {
        difficulty += 1;
    } else if mean <= LOWER_MEAN {
        difficulty -= 1;
    }
    difficulty.clamp(MIN_TASK_DIFFICULTY as i32, MAX_TASK_DIFFICULTY as i32) as u8
}

fn build_task(
    entry: &CurriculumEntry,
    difficulty: u8,
    character: CharacterId,
    input_text: &str,
    chain_from: Option<TaskId>,
    reason: &str,
) -> Task {
    Task {
        id: TaskId::new(),
        kind: entry.kind,
        instructions: entry.instructions.clone(),
        input_text: input_text.to_string(),
        expected_format: entry.expected_format.clone(),
        difficulty,
        assigned_to: character,
        provenance: TaskProvenance {
            selector_node: SELECTOR_NODE.to_string(),
            chain_from,
            reason: reason.to_string(),
        },
    }
}

/// Pick a task uniformly among entries at the resolved difficulty
///
/// Falls back to the full curriculum pool when nothing matches the filter;
/// an empty catalog is a configuration error caught at load time, so this
/// never returns an empty selection.
pub fn select_task<R: Rng>(
    catalog: &CurriculumCatalog,
    difficulty: u8,
    kind_hint: Option<TaskKind>,
    character: CharacterId,
    input_text: &str,
    rng: &mut R,
) -> Option<Task> {
    let matching = catalog.matching(difficulty, kind_hint);
    let (pool, reason) = if matching.is_empty() {
        (
            catalog.entries.iter().collect::<Vec<_>>(),
            "no entry at resolved difficulty; full-pool fallback",
        )
    } else {
        (matching, "matched resolved difficulty")
    };

    pool.choose(rng)
        .map(|entry| build_task(entry, difficulty, character, input_text, None, reason))
}

/// Chain a follow-up after an evaluated task
///
/// Difficulty rises after strong grades and falls after weak ones, the
/// kind stays fixed. Returns `None` at a dead end (no candidate at the new
/// difficulty); the cycle terminates there rather than erroring.
pub fn follow_up<R: Rng>(
    catalog: &CurriculumCatalog,
    prior: &Task,
    evaluation: &Evaluation,
    rng: &mut R,
) -> Option<Task> {
    let mut difficulty = prior.difficulty as i32;
    if evaluation.grade.value() >= 4 {
        difficulty += 1;
    } else if evaluation.grade.value() <= 2 {
        difficulty -= 1;
    }
    let difficulty =
        difficulty.clamp(MIN_TASK_DIFFICULTY as i32, MAX_TASK_DIFFICULTY as i32) as u8;

    let candidates = catalog.matching(difficulty, Some(prior.kind));
    candidates.choose(rng).map(|entry| {
        build_task(
            entry,
            difficulty,
            prior.assigned_to,
            &prior.input_text,
            Some(prior.id),
            "follow-up after graded attempt",
        )
    })
}
