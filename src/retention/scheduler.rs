//! Review bookkeeping around the memory update
//!
//! The scheduler is the only writer of `CharacterKnowledgeState`. Every
//! graded review lands as one transactional persist: the state upsert plus
//! an append-only audit row.

use crate::core::config::RetentionConfig;
use crate::core::error::Result;
use crate::core::types::{CharacterId, KnowledgeId, ReviewId, Tick};
use crate::knowledge::state::CharacterKnowledgeState;
use crate::knowledge::store::{KnowledgeStore, ReviewLogEntry};
use crate::retention::fsrs::apply_grade;
use crate::retention::Grade;
use std::sync::Arc;

/// Result of a direct review
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub next_review: Tick,
    pub state: CharacterKnowledgeState,
}

/// Applies grades to knowledge states and persists the results
pub struct RetentionScheduler {
    store: Arc<dyn KnowledgeStore>,
    config: RetentionConfig,
}

impl RetentionScheduler {
    pub fn new(store: Arc<dyn KnowledgeStore>, config: RetentionConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &RetentionConfig {
        &self.config
    }

    /// Load the pair's state, defaulting on first exposure
    ///
    /// Only `Ok(None)` defaults; a store failure propagates rather than
    /// silently resetting a character's progress.
    pub fn load_or_default(
        &self,
        character: CharacterId,
        knowledge: KnowledgeId,
        now: Tick,
    ) -> Result<CharacterKnowledgeState> {
        Ok(self
            .store
            .load_state(character, knowledge)?
            .unwrap_or_else(|| CharacterKnowledgeState::fresh(character, knowledge, now)))
    }

    /// Grade a review and persist the updated state with its audit row
    pub fn review(
        &self,
        character: CharacterId,
        knowledge: KnowledgeId,
        grade: Grade,
        now: Tick,
    ) -> Result<ReviewOutcome> {
        let mut state = self.load_or_default(character, knowledge, now)?;
        let update = apply_grade(&mut state, grade, now, &self.config);

        let entry = ReviewLogEntry {
            review_id: ReviewId::new(),
            character,
            knowledge,
            grade,
            reviewed_at: now,
            scheduled_for: update.next_review,
        };
        self.store.persist_review(&state, &entry)?;

        tracing::debug!(
            %character,
            %knowledge,
            grade = grade.value(),
            stability = update.stability,
            next_in_days = update.next_review_days,
            "review applied"
        );
        Ok(ReviewOutcome {
            next_review: update.next_review,
            state,
        })
    }

    /// Mark the acquisition phase finished for a pair
    ///
    /// Idempotent: repeated calls leave the same final state.
    pub fn mark_acquisition_completed(
        &self,
        character: CharacterId,
        knowledge: KnowledgeId,
        now: Tick,
    ) -> Result<CharacterKnowledgeState> {
        let mut state = self.load_or_default(character, knowledge, now)?;
        if !state.acquisition_completed {
            state.acquisition_completed = true;
            self.store.persist_state(&state)?;
        }
        Ok(state)
    }
}
