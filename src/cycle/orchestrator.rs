//! One full knowledge cycle, orchestrated
//!
//! startKnowledgeCycle sequences: resolve knowledge item → select task →
//! produce attempt → grade → retention update → progression update, and
//! returns the composite result. Cycles on the same (character, knowledge)
//! pair are serialized; different pairs run freely in parallel.
//!
//! A cycle that fails after grading but before persisting reports the
//! failure; state that did not commit is not a completed cycle.

use crate::core::config::RetentionConfig;
use crate::core::error::{LoreError, Result};
use crate::core::types::{CharacterId, KnowledgeId, Tick};
use crate::curriculum::{
    adaptive_difficulty, base_difficulty, follow_up, select_task, CurriculumCatalog, Task,
};
use crate::attempt::{produce_attempt, Attempt};
use crate::knowledge::state::CharacterKnowledgeState;
use crate::knowledge::store::{KnowledgeStore, Resolved};
use crate::persona::TraitProvider;
use crate::progression::{MetricSample, ProgressionRecord};
use crate::retention::{grade_attempt_text, Evaluation, Grade, RetentionScheduler, ReviewOutcome};
use ahash::AHashMap;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::{Arc, Mutex};

/// Everything one completed cycle produced
#[derive(Debug, Clone)]
pub struct CycleResult {
    pub resolved: Resolved,
    pub task: Task,
    pub attempt: Attempt,
    pub evaluation: Evaluation,
    pub state: CharacterKnowledgeState,
    pub progression: ProgressionRecord,
}

/// The knowledge-cycle engine
///
/// Collaborators are injected; the engine owns no global state beyond its
/// seeded entropy source and the per-pair serialization registry.
pub struct KnowledgeEngine {
    store: Arc<dyn KnowledgeStore>,
    traits: Arc<dyn TraitProvider>,
    catalog: CurriculumCatalog,
    scheduler: RetentionScheduler,
    rng: Mutex<ChaCha8Rng>,
    pair_locks: Mutex<AHashMap<(CharacterId, KnowledgeId), Arc<Mutex<()>>>>,
}

impl KnowledgeEngine {
    pub fn new(
        store: Arc<dyn KnowledgeStore>,
        traits: Arc<dyn TraitProvider>,
        catalog: CurriculumCatalog,
        config: RetentionConfig,
        seed: u64,
    ) -> Self {
        Self {
            scheduler: RetentionScheduler::new(store.clone(), config),
            store,
            traits,
            catalog,
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
            pair_locks: Mutex::new(AHashMap::new()),
        }
    }

    /// Serialization guard for one (character, knowledge) pair
    ///
    /// Concurrent cycles on the same pair would race on grade history and
    /// the stability/difficulty update; different pairs stay independent.
    fn pair_guard(
        &self,
        character: CharacterId,
        knowledge: KnowledgeId,
    ) -> Result<Arc<Mutex<()>>> {
        let mut locks = self
            .pair_locks
            .lock()
            .map_err(|_| LoreError::Storage("pair-lock registry poisoned".to_string()))?;
        Ok(locks
            .entry((character, knowledge))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut ChaCha8Rng) -> T) -> Result<T> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| LoreError::Storage("rng poisoned".to_string()))?;
        Ok(f(&mut rng))
    }

    /// Run one full knowledge cycle for a query
    ///
    /// `real_input`, when present and non-blank, stands in for the
    /// synthesized attempt.
    pub fn start_cycle(
        &self,
        character: CharacterId,
        query: &str,
        real_input: Option<&str>,
        now: Tick,
    ) -> Result<CycleResult> {
        if query.trim().is_empty() {
            return Err(LoreError::Validation("query text is empty".to_string()));
        }

        let traits = self.traits.trait_vector(character)?;
        let resolved = self.store.resolve_or_create(character, query, None, now)?;
        let knowledge = resolved.item.id;

        let guard = self.pair_guard(character, knowledge)?;
        let _held = guard
            .lock()
            .map_err(|_| LoreError::Storage("pair lock poisoned".to_string()))?;

        let state = self.scheduler.load_or_default(character, knowledge, now)?;
        let difficulty = adaptive_difficulty(base_difficulty(&traits), &state.recent_grades(3));

        let task = self
            .with_rng(|rng| {
                select_task(&self.catalog, difficulty, None, character, query, rng)
            })?
            .ok_or_else(|| LoreError::Config("curriculum is empty".to_string()))?;

        let attempt = self.with_rng(|rng| {
            produce_attempt(&task, knowledge, real_input, &traits, rng, now)
        })?;

        self.finish_cycle(character, resolved, task, attempt, now)
    }

    /// Chain a follow-up cycle after an evaluated task
    ///
    /// Returns `Ok(None)` at a curriculum dead end; the chain simply stops.
    pub fn follow_up_cycle(
        &self,
        character: CharacterId,
        knowledge: KnowledgeId,
        prior_task: &Task,
        prior_eval: &Evaluation,
        real_input: Option<&str>,
        now: Tick,
    ) -> Result<Option<CycleResult>> {
        let resolved = Resolved {
            item: self
                .store
                .get_item(knowledge)?
                .ok_or(LoreError::KnowledgeNotFound(knowledge))?,
            status: crate::knowledge::store::ResolveStatus::Merged,
        };

        let Some(task) =
            self.with_rng(|rng| follow_up(&self.catalog, prior_task, prior_eval, rng))?
        else {
            tracing::debug!(%character, %knowledge, "follow-up dead end; cycle chain ends");
            return Ok(None);
        };

        let guard = self.pair_guard(character, knowledge)?;
        let _held = guard
            .lock()
            .map_err(|_| LoreError::Storage("pair lock poisoned".to_string()))?;

        let traits = self.traits.trait_vector(character)?;
        let attempt = self.with_rng(|rng| {
            produce_attempt(&task, knowledge, real_input, &traits, rng, now)
        })?;

        self.finish_cycle(character, resolved, task, attempt, now)
            .map(Some)
    }

    /// Grade, update retention, update progression, assemble the result
    fn finish_cycle(
        &self,
        character: CharacterId,
        resolved: Resolved,
        task: Task,
        attempt: Attempt,
        now: Tick,
    ) -> Result<CycleResult> {
        let evaluation = grade_attempt_text(&resolved.item.content, &attempt.text);

        let outcome = self
            .scheduler
            .review(character, resolved.item.id, evaluation.grade, now)?;

        let mut progression = self
            .store
            .load_progression(character)?
            .unwrap_or_else(|| ProgressionRecord::new(character));
        let sample = MetricSample::from_cycle(&task, &attempt, &evaluation);
        progression.record_cycle(&sample);
        self.store.persist_progression(&progression)?;

        tracing::debug!(
            %character,
            knowledge = %resolved.item.id,
            grade = evaluation.grade.value(),
            rank = %progression.rank,
            "cycle complete"
        );
        Ok(CycleResult {
            resolved,
            task,
            attempt,
            evaluation,
            state: outcome.state,
            progression,
        })
    }

    /// Direct retention update, bypassing task and attempt generation
    ///
    /// Used for explicit review events carrying their own grade.
    pub fn review_knowledge(
        &self,
        character: CharacterId,
        knowledge: KnowledgeId,
        grade: u8,
        now: Tick,
    ) -> Result<ReviewOutcome> {
        let grade = Grade::try_from(grade)?;
        if self.store.get_item(knowledge)?.is_none() {
            return Err(LoreError::KnowledgeNotFound(knowledge));
        }

        let guard = self.pair_guard(character, knowledge)?;
        let _held = guard
            .lock()
            .map_err(|_| LoreError::Storage("pair lock poisoned".to_string()))?;

        self.scheduler.review(character, knowledge, grade, now)
    }

    /// Idempotent acquisition-completed flag update
    pub fn mark_acquisition_completed(
        &self,
        character: CharacterId,
        knowledge: KnowledgeId,
        now: Tick,
    ) -> Result<CharacterKnowledgeState> {
        let guard = self.pair_guard(character, knowledge)?;
        let _held = guard
            .lock()
            .map_err(|_| LoreError::Storage("pair lock poisoned".to_string()))?;
        self.scheduler.mark_acquisition_completed(character, knowledge, now)
    }

    /// Pairs whose next review is due at `now` (batch sweep support)
    pub fn due_pairs(&self, now: Tick) -> Result<Vec<(CharacterId, KnowledgeId)>> {
        Ok(self
            .store
            .due_states(now)?
            .into_iter()
            .map(|s| (s.character, s.knowledge))
            .collect())
    }

    pub fn store(&self) -> &Arc<dyn KnowledgeStore> {
        &self.store
    }
}
