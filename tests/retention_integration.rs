//! Retention scheduling integration and property tests

use loreforge::core::config::RetentionConfig;
use loreforge::core::types::{CharacterId, KnowledgeId, Tick, TICKS_PER_DAY};
use loreforge::knowledge::state::CharacterKnowledgeState;
use loreforge::knowledge::{KeywordClassifier, KnowledgeStore, MemoryKnowledgeStore};
use loreforge::retention::fsrs::{apply_grade, retrievability};
use loreforge::retention::{Grade, RetentionScheduler};
use proptest::prelude::*;
use std::sync::Arc;

fn grade(raw: u8) -> Grade {
    Grade::try_from(raw).unwrap()
}

#[test]
fn test_reference_success_scenario() {
    // difficulty 3.5, stability 0.6, grade 5, same-day review
    let mut state = CharacterKnowledgeState::fresh(CharacterId::new(), KnowledgeId::new(), 0);
    let update = apply_grade(&mut state, grade(5), 0, &RetentionConfig::default());

    assert!((update.retrievability - 1.0).abs() < 1e-9);
    assert!((update.difficulty - 3.3).abs() < 1e-9);
    assert!((update.stability - 0.764).abs() < 1e-9);
    assert!((update.next_review_days - 1.91).abs() < 1e-9);
}

#[test]
fn test_reference_failure_scenario() {
    let mut state = CharacterKnowledgeState::fresh(CharacterId::new(), KnowledgeId::new(), 0);
    let update = apply_grade(&mut state, grade(1), 0, &RetentionConfig::default());

    assert!((update.difficulty - 3.9).abs() < 1e-9);
    assert!((update.stability - 0.36).abs() < 1e-9);
    assert!((update.next_review_days - 0.9).abs() < 1e-9);
}

#[test]
fn test_decay_shortens_the_next_interval() {
    let config = RetentionConfig::default();

    // Review immediately vs after three days of decay
    let mut prompt = CharacterKnowledgeState::fresh(CharacterId::new(), KnowledgeId::new(), 0);
    apply_grade(&mut prompt, grade(4), 0, &config);
    let mut early = prompt.clone();
    let mut late = prompt.clone();

    let early_update = apply_grade(&mut early, grade(4), TICKS_PER_DAY / 2, &config);
    let late_update = apply_grade(&mut late, grade(4), 3 * TICKS_PER_DAY, &config);

    assert!(late_update.retrievability < early_update.retrievability);
    assert!(late_update.next_review_days < early_update.next_review_days);
}

#[test]
fn test_long_run_alternating_grades_keep_invariants() {
    let config = RetentionConfig::default();
    let mut state = CharacterKnowledgeState::fresh(CharacterId::new(), KnowledgeId::new(), 0);

    let mut now: Tick = 0;
    for step in 0..200u64 {
        let raw = [5u8, 0, 4, 2, 3, 1][(step % 6) as usize];
        now += (step % 7 + 1) * TICKS_PER_DAY / 2;
        apply_grade(&mut state, grade(raw), now, &config);
        assert!(state.invariants_hold(), "invariants broke at step {step}");
    }
    assert_eq!(state.grade_history.len(), 200);
}

#[test]
fn test_scheduler_survives_interleaved_pairs() {
    let store = Arc::new(MemoryKnowledgeStore::new(Arc::new(KeywordClassifier)));
    let scheduler = RetentionScheduler::new(store.clone(), RetentionConfig::default());

    let character = CharacterId::new();
    let items: Vec<KnowledgeId> = (0..4).map(|_| KnowledgeId::new()).collect();

    for round in 0..5u64 {
        for (i, knowledge) in items.iter().enumerate() {
            let raw = ((round as usize + i) % 6) as u8;
            scheduler
                .review(character, *knowledge, grade(raw), round * TICKS_PER_DAY)
                .unwrap();
        }
    }

    for knowledge in &items {
        let state = store.load_state(character, *knowledge).unwrap().unwrap();
        assert_eq!(state.grade_history.len(), 5);
        assert_eq!(store.review_log(character, *knowledge).unwrap().len(), 5);
    }
}

proptest! {
    #[test]
    fn prop_retrievability_bounded(days in 0.0f64..10_000.0, stability in 0.01f64..10_000.0) {
        let r = retrievability(days, stability);
        prop_assert!((0.0..=1.0).contains(&r));
    }

    #[test]
    fn prop_success_grows_stability_eases_difficulty(
        raw in 3u8..=5,
        difficulty in 1.0f64..=8.0,
        stability in 0.3f64..50.0,
        gap_days in 0u64..60,
    ) {
        let config = RetentionConfig::default();
        let mut state = CharacterKnowledgeState::fresh(CharacterId::new(), KnowledgeId::new(), 0);
        state.difficulty = difficulty;
        state.stability = stability;
        state.last_review = Some(0);

        let update = apply_grade(&mut state, grade(raw), gap_days * TICKS_PER_DAY, &config);
        prop_assert!(update.stability > stability);
        prop_assert!(update.difficulty < difficulty || (difficulty - 1.0).abs() < 1e-9);
        prop_assert!(update.difficulty >= config.min_difficulty);
    }

    #[test]
    fn prop_failure_shrinks_stability_hardens_difficulty(
        raw in 0u8..=2,
        difficulty in 1.0f64..=8.0,
        stability in 0.5f64..50.0,
        gap_days in 0u64..60,
    ) {
        let config = RetentionConfig::default();
        let mut state = CharacterKnowledgeState::fresh(CharacterId::new(), KnowledgeId::new(), 0);
        state.difficulty = difficulty;
        state.stability = stability;
        state.last_review = Some(0);

        let update = apply_grade(&mut state, grade(raw), gap_days * TICKS_PER_DAY, &config);
        prop_assert!(update.stability < stability);
        prop_assert!(update.stability >= config.min_stability);
        prop_assert!(update.difficulty > difficulty || (difficulty - 8.0).abs() < 1e-9);
        prop_assert!(update.difficulty <= config.max_difficulty);
    }

    #[test]
    fn prop_next_review_never_precedes_now(
        raw in 0u8..=5,
        stability in 0.3f64..100.0,
        now in 0u64..1_000_000u64,
    ) {
        let config = RetentionConfig::default();
        let mut state = CharacterKnowledgeState::fresh(CharacterId::new(), KnowledgeId::new(), 0);
        state.stability = stability;
        state.last_review = Some(now / 2);

        apply_grade(&mut state, grade(raw), now, &config);
        prop_assert!(state.next_review >= now);
        prop_assert!(state.invariants_hold());
    }
}
