//! Per-character knowledge retention state
//!
//! One record per (character, knowledge) pair. Mutated only by the
//! retention scheduler; grade history is append-only and never reordered.

use crate::core::config::{DEFAULT_DIFFICULTY, DEFAULT_RETRIEVABILITY, DEFAULT_STABILITY};
use crate::core::types::{CharacterId, KnowledgeId, Tick};
use crate::retention::Grade;
use serde::{Deserialize, Serialize};

/// One graded review in a state's history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeEntry {
    pub tick: Tick,
    pub grade: Grade,
}

/// A character's memory state for one knowledge item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterKnowledgeState {
    pub character: CharacterId,
    pub knowledge: KnowledgeId,
    /// Item difficulty for this character (1.0 to 8.0)
    pub difficulty: f64,
    /// Memory stability in days (> 0); higher decays slower
    pub stability: f64,
    /// Modeled recall probability at the last update (0.0 to 1.0)
    pub retrievability: f64,
    /// Tick of the most recent review, if any
    pub last_review: Option<Tick>,
    /// When the item next comes due
    pub next_review: Tick,
    /// Append-only, time-ordered review grades
    pub grade_history: Vec<GradeEntry>,
    pub acquisition_completed: bool,
    pub practice_count: u32,
}

impl CharacterKnowledgeState {
    /// Fresh state for a first exposure (not yet persisted)
    pub fn fresh(character: CharacterId, knowledge: KnowledgeId, now: Tick) -> Self {
        Self {
            character,
            knowledge,
            difficulty: DEFAULT_DIFFICULTY,
            stability: DEFAULT_STABILITY,
            retrievability: DEFAULT_RETRIEVABILITY,
            last_review: None,
            next_review: now,
            grade_history: Vec::new(),
            acquisition_completed: false,
            practice_count: 0,
        }
    }

    /// Grades of the most recent `n` reviews, oldest first
    pub fn recent_grades(&self, n: usize) -> Vec<Grade> {
        let start = self.grade_history.len().saturating_sub(n);
        self.grade_history[start..].iter().map(|e| e.grade).collect()
    }

    /// Check the retention invariants hold
    pub fn invariants_hold(&self) -> bool {
        self.stability > 0.0
            && (0.0..=1.0).contains(&self.retrievability)
            && (1.0..=8.0).contains(&self.difficulty)
            && self.last_review.map_or(true, |last| self.next_review >= last)
            && self
                .grade_history
                .windows(2)
                .all(|pair| pair[0].tick <= pair[1].tick)
    }
}
