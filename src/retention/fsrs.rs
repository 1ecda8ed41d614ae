//! Memory decay and grade-driven state update
//!
//! Retention follows the exponential forgetting curve:
//!   R = e^(-t/S)
//!
//! Where R is retrievability (1.0 = perfect recall), t is elapsed days and
//! S is stability in days. Grades move stability and difficulty; the next
//! review lands sooner the less retrievable the item was.
//!
//! Deterministic given (difficulty, stability, last review, grade, now).

use crate::core::config::RetentionConfig;
use crate::core::types::{days_between, days_to_ticks, Tick};
use crate::knowledge::state::{CharacterKnowledgeState, GradeEntry};
use crate::retention::Grade;

/// Result of applying one grade to a memory state
#[derive(Debug, Clone, Copy)]
pub struct MemoryUpdate {
    pub retrievability: f64,
    pub difficulty: f64,
    pub stability: f64,
    pub next_review_days: f64,
    pub next_review: Tick,
}

/// Forgetting-curve retrievability after `days` at the given stability
pub fn retrievability(days: f64, stability: f64) -> f64 {
    if stability <= 0.0 {
        return 0.0;
    }
    (-days.max(0.0) / stability).exp()
}

/// Compute the post-review memory parameters without touching state
pub fn compute_update(
    state: &CharacterKnowledgeState,
    grade: Grade,
    now: Tick,
    config: &RetentionConfig,
) -> MemoryUpdate {
    let days_since = state
        .last_review
        .map_or(0.0, |last| days_between(last, now));
    let retrievability = retrievability(days_since, state.stability);

    let (difficulty, stability) = if grade.is_success() {
        let difficulty = (state.difficulty - config.success_difficulty_step)
            .max(config.min_difficulty);
        // Gain scales off the already-eased difficulty
        let gain = config.stability_base_gain
            + (config.stability_difficulty_pivot - difficulty) * config.stability_difficulty_bonus;
        (difficulty, state.stability + gain)
    } else {
        let difficulty = (state.difficulty + config.failure_difficulty_step)
            .min(config.max_difficulty);
        let stability =
            (state.stability * config.failure_stability_factor).max(config.min_stability);
        (difficulty, stability)
    };

    let next_review_days = stability * retrievability * config.interval_factor;
    MemoryUpdate {
        retrievability,
        difficulty,
        stability,
        next_review_days,
        next_review: now + days_to_ticks(next_review_days),
    }
}

/// Apply a grade to a state in place, appending to the grade history
pub fn apply_grade(
    state: &mut CharacterKnowledgeState,
    grade: Grade,
    now: Tick,
    config: &RetentionConfig,
) -> MemoryUpdate {
    let update = compute_update(state, grade, now, config);
    state.retrievability = update.retrievability;
    state.difficulty = update.difficulty;
    state.stability = update.stability;
    state.last_review = Some(now);
    state.next_review = update.next_review;
    state.grade_history.push(GradeEntry { tick: now, grade });
    state.practice_count += 1;
    update
}
