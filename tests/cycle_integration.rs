//! Full knowledge-cycle integration tests

use loreforge::core::config::RetentionConfig;
use loreforge::core::error::LoreError;
use loreforge::core::types::{CharacterId, Tick, TICKS_PER_DAY};
use loreforge::curriculum::CurriculumCatalog;
use loreforge::cycle::KnowledgeEngine;
use loreforge::knowledge::store::ResolveStatus;
use loreforge::knowledge::{KeywordClassifier, KnowledgeStore, MemoryKnowledgeStore};
use loreforge::persona::{StaticTraitProvider, TraitKey, TraitVector};
use std::sync::Arc;

fn build_engine() -> (KnowledgeEngine, Arc<StaticTraitProvider>) {
    let traits = Arc::new(StaticTraitProvider::new());
    let store = Arc::new(MemoryKnowledgeStore::new(Arc::new(KeywordClassifier)));
    (
        KnowledgeEngine::new(
            store,
            traits.clone(),
            CurriculumCatalog::with_defaults(),
            RetentionConfig::default(),
            1234,
        ),
        traits,
    )
}

const LESSON: &str = "The quench hardens steel because rapid cooling locks the grain structure.";

#[test]
fn test_full_cycle_end_to_end() {
    let (engine, traits) = build_engine();
    let character = CharacterId::new();
    traits.set(
        character,
        TraitVector::new().with(TraitKey::Inquisitiveness, 70.0),
    );

    let result = engine.start_cycle(character, LESSON, None, 0).unwrap();

    // Item created and owned
    assert_eq!(result.resolved.status, ResolveStatus::Created);
    assert_eq!(result.resolved.item.owner, character);

    // Task difficulty reflects the curious personality
    assert_eq!(result.task.difficulty, 2);
    assert_eq!(result.task.assigned_to, character);

    // Attempt was synthesized, not real
    assert!(!result.attempt.is_real_input);
    assert!(result.attempt.word_count > 0);

    // Retention state committed with one review
    assert_eq!(result.state.grade_history.len(), 1);
    assert!(result.state.invariants_hold());
    assert!(result.state.next_review > 0);

    // Progression counted the cycle
    assert_eq!(result.progression.cycles, 1);

    // Audit log matches history
    let log = engine
        .store()
        .review_log(character, result.resolved.item.id)
        .unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].grade, result.evaluation.grade);
}

#[test]
fn test_empty_query_creates_nothing() {
    let (engine, _) = build_engine();
    let character = CharacterId::new();

    let result = engine.start_cycle(character, "", None, 0);
    assert!(matches!(result, Err(LoreError::Validation(_))));

    // No knowledge state appeared as a side effect
    assert!(engine.due_pairs(Tick::MAX).unwrap().is_empty());
}

#[test]
fn test_repeated_seeding_never_duplicates_concepts() {
    let (engine, _) = build_engine();
    let character = CharacterId::new();

    let first = engine.start_cycle(character, LESSON, None, 0).unwrap();
    let complexity_before = first.resolved.item.complexity;

    // Same concept, different casing/punctuation
    let noisy = "the QUENCH hardens steel, because rapid cooling locks the grain structure!!";
    let second = engine
        .start_cycle(character, noisy, None, TICKS_PER_DAY)
        .unwrap();

    assert_eq!(second.resolved.status, ResolveStatus::Merged);
    assert_eq!(second.resolved.item.id, first.resolved.item.id);
    assert!(second.resolved.item.complexity > complexity_before);

    // Two characters, same concept: still one item
    let other = CharacterId::new();
    let third = engine
        .start_cycle(other, LESSON, None, 2 * TICKS_PER_DAY)
        .unwrap();
    assert_eq!(third.resolved.item.id, first.resolved.item.id);
    assert_eq!(third.resolved.status, ResolveStatus::Merged);
}

#[test]
fn test_grade_history_grows_across_days() {
    let (engine, _) = build_engine();
    let character = CharacterId::new();

    for day in 0..5u64 {
        engine
            .start_cycle(character, LESSON, None, day * TICKS_PER_DAY)
            .unwrap();
    }

    let result = engine
        .start_cycle(character, LESSON, None, 5 * TICKS_PER_DAY)
        .unwrap();
    assert_eq!(result.state.grade_history.len(), 6);
    assert_eq!(result.state.practice_count, 6);
    assert_eq!(result.progression.cycles, 6);

    // History ticks are monotone
    let ticks: Vec<_> = result.state.grade_history.iter().map(|e| e.tick).collect();
    assert!(ticks.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_real_input_beats_weak_synthesis() {
    let (engine, traits) = build_engine();
    let character = CharacterId::new();
    // Heavy mutation traits would mangle a synthesized attempt
    traits.set(
        character,
        TraitVector::new()
            .with(TraitKey::Impulsive, 95.0)
            .with(TraitKey::Forgetful, 95.0),
    );

    let result = engine
        .start_cycle(character, LESSON, Some(LESSON), 0)
        .unwrap();
    assert!(result.attempt.is_real_input);
    // Verbatim recall of the canonical text grades perfect
    assert_eq!(result.evaluation.grade.value(), 5);
}

#[test]
fn test_overconfident_boast_reaches_attempt() {
    let (engine, traits) = build_engine();
    let character = CharacterId::new();
    traits.set(
        character,
        TraitVector::new().with(TraitKey::Overconfident, 90.0),
    );

    let result = engine.start_cycle(character, LESSON, None, 0).unwrap();
    assert!(result.attempt.text.starts_with("Honestly"));
}

#[test]
fn test_parallel_cycles_across_characters() {
    use rayon::prelude::*;

    let (engine, _) = build_engine();
    let characters: Vec<CharacterId> = (0..16).map(|_| CharacterId::new()).collect();

    let results: Vec<_> = characters
        .par_iter()
        .map(|c| engine.start_cycle(*c, LESSON, None, 0))
        .collect();

    assert!(results.iter().all(|r| r.is_ok()));

    // All characters merged into the single concept item
    let ids: Vec<_> = results
        .iter()
        .map(|r| r.as_ref().unwrap().resolved.item.id)
        .collect();
    assert!(ids.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_failed_grading_still_commits_consistently() {
    let (engine, _) = build_engine();
    let character = CharacterId::new();

    // An off-topic real answer grades 0 but the cycle still completes
    let result = engine
        .start_cycle(character, LESSON, Some("flowers bloom nicely today"), 0)
        .unwrap();
    assert_eq!(result.evaluation.grade.value(), 0);
    assert_eq!(result.state.grade_history.len(), 1);
    // Failure hardened the item
    assert!(result.state.difficulty > 3.5);
    assert!(result.state.stability < 0.6);
}
