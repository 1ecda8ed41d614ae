//! Knowledge item and state storage
//!
//! The store is the only stateful collaborator in the cycle. Persistence
//! technology is a deployment concern; the trait below is what the core
//! consumes, and `MemoryKnowledgeStore` is the in-process implementation.
//!
//! State corruption here breaks the retention guarantee, so storage errors
//! always surface to the caller and the state upsert is transactional with
//! its audit review-log row.

use crate::core::error::{LoreError, Result};
use crate::core::types::{CharacterId, KnowledgeId, ReviewId, Tick};
use crate::knowledge::domain::{Domain, DomainClassifier};
use crate::knowledge::item::{normalize_concept, KnowledgeItem};
use crate::knowledge::state::CharacterKnowledgeState;
use crate::progression::ProgressionRecord;
use crate::retention::Grade;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Whether `resolve_or_create` found an existing concept or made a new item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolveStatus {
    Created,
    Merged,
}

/// A resolved knowledge item plus how it was resolved
#[derive(Debug, Clone)]
pub struct Resolved {
    pub item: KnowledgeItem,
    pub status: ResolveStatus,
}

/// Append-only audit row written with every retention update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewLogEntry {
    pub review_id: ReviewId,
    pub character: CharacterId,
    pub knowledge: KnowledgeId,
    pub grade: Grade,
    pub reviewed_at: Tick,
    pub scheduled_for: Tick,
}

/// Storage consumed by the learning cycle
///
/// `load_state` returning `Ok(None)` means first exposure; a real outage
/// must be an `Err`, never a silent fresh state.
pub trait KnowledgeStore: Send + Sync {
    /// Resolve raw text to a knowledge item, merging near-duplicate concepts
    fn resolve_or_create(
        &self,
        owner: CharacterId,
        raw_text: &str,
        explicit_concept: Option<&str>,
        now: Tick,
    ) -> Result<Resolved>;

    fn get_item(&self, id: KnowledgeId) -> Result<Option<KnowledgeItem>>;

    fn load_state(
        &self,
        character: CharacterId,
        knowledge: KnowledgeId,
    ) -> Result<Option<CharacterKnowledgeState>>;

    /// Upsert a state together with its audit row; both succeed or neither
    fn persist_review(
        &self,
        state: &CharacterKnowledgeState,
        entry: &ReviewLogEntry,
    ) -> Result<()>;

    /// Upsert a state without an audit row (acquisition flag updates)
    fn persist_state(&self, state: &CharacterKnowledgeState) -> Result<()>;

    fn review_log(
        &self,
        character: CharacterId,
        knowledge: KnowledgeId,
    ) -> Result<Vec<ReviewLogEntry>>;

    /// States whose next review is at or before `now`
    fn due_states(&self, now: Tick) -> Result<Vec<CharacterKnowledgeState>>;

    fn load_progression(&self, character: CharacterId) -> Result<Option<ProgressionRecord>>;

    fn persist_progression(&self, record: &ProgressionRecord) -> Result<()>;
}

#[derive(Debug, Default)]
struct StoreInner {
    items: AHashMap<KnowledgeId, KnowledgeItem>,
    concepts: AHashMap<String, KnowledgeId>,
    states: AHashMap<(CharacterId, KnowledgeId), CharacterKnowledgeState>,
    review_log: Vec<ReviewLogEntry>,
    progression: AHashMap<CharacterId, ProgressionRecord>,
}

/// In-memory store backing the simulation
pub struct MemoryKnowledgeStore {
    inner: RwLock<StoreInner>,
    classifier: Arc<dyn DomainClassifier>,
}

impl MemoryKnowledgeStore {
    pub fn new(classifier: Arc<dyn DomainClassifier>) -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
            classifier,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreInner>> {
        self.inner
            .read()
            .map_err(|_| LoreError::Storage("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreInner>> {
        self.inner
            .write()
            .map_err(|_| LoreError::Storage("store lock poisoned".to_string()))
    }
}

/// Reject upserts that would shrink or rewrite a state's grade history
fn check_history_extends(
    existing: &CharacterKnowledgeState,
    incoming: &CharacterKnowledgeState,
) -> Result<()> {
    let shorter = incoming.grade_history.len() < existing.grade_history.len();
    let rewritten = !incoming
        .grade_history
        .iter()
        .zip(existing.grade_history.iter())
        .all(|(new, old)| new == old);
    if shorter || rewritten {
        return Err(LoreError::Storage(format!(
            "grade history regression for ({}, {})",
            incoming.character, incoming.knowledge
        )));
    }
    Ok(())
}

impl KnowledgeStore for MemoryKnowledgeStore {
    fn resolve_or_create(
        &self,
        owner: CharacterId,
        raw_text: &str,
        explicit_concept: Option<&str>,
        now: Tick,
    ) -> Result<Resolved> {
        let concept = normalize_concept(explicit_concept.unwrap_or(raw_text));
        if concept.is_empty() {
            return Err(LoreError::Validation(
                "cannot derive a concept from empty text".to_string(),
            ));
        }

        let mut inner = self.write()?;
        if let Some(&id) = inner.concepts.get(&concept) {
            let item = inner
                .items
                .get_mut(&id)
                .ok_or_else(|| LoreError::Storage(format!("dangling concept key '{concept}'")))?;
            item.merge(raw_text);
            tracing::debug!(%id, concept = %concept, "merged into existing knowledge item");
            return Ok(Resolved {
                item: item.clone(),
                status: ResolveStatus::Merged,
            });
        }

        let domain = self.classifier.detect_domain(raw_text);
        let item = KnowledgeItem::new(owner, raw_text, concept.clone(), domain, now);
        inner.concepts.insert(concept, item.id);
        inner.items.insert(item.id, item.clone());
        tracing::debug!(id = %item.id, domain = domain.name(), "created knowledge item");
        Ok(Resolved {
            item,
            status: ResolveStatus::Created,
        })
    }

    fn get_item(&self, id: KnowledgeId) -> Result<Option<KnowledgeItem>> {
        Ok(self.read()?.items.get(&id).cloned())
    }

    fn load_state(
        &self,
        character: CharacterId,
        knowledge: KnowledgeId,
    ) -> Result<Option<CharacterKnowledgeState>> {
        Ok(self.read()?.states.get(&(character, knowledge)).cloned())
    }

    fn persist_review(
        &self,
        state: &CharacterKnowledgeState,
        entry: &ReviewLogEntry,
    ) -> Result<()> {
        let mut inner = self.write()?;
        let key = (state.character, state.knowledge);
        if let Some(existing) = inner.states.get(&key) {
            check_history_extends(existing, state)?;
        }
        // Single write lock: state upsert and audit append land together
        inner.states.insert(key, state.clone());
        inner.review_log.push(entry.clone());
        tracing::debug!(
            character = %state.character,
            knowledge = %state.knowledge,
            grade = entry.grade.value(),
            "persisted review"
        );
        Ok(())
    }

    fn persist_state(&self, state: &CharacterKnowledgeState) -> Result<()> {
        let mut inner = self.write()?;
        let key = (state.character, state.knowledge);
        if let Some(existing) = inner.states.get(&key) {
            check_history_extends(existing, state)?;
        }
        inner.states.insert(key, state.clone());
        Ok(())
    }

    fn review_log(
        &self,
        character: CharacterId,
        knowledge: KnowledgeId,
    ) -> Result<Vec<ReviewLogEntry>> {
        Ok(self
            .read()?
            .review_log
            .iter()
            .filter(|e| e.character == character && e.knowledge == knowledge)
            .cloned()
            .collect())
    }

    fn due_states(&self, now: Tick) -> Result<Vec<CharacterKnowledgeState>> {
        Ok(self
            .read()?
            .states
            .values()
            .filter(|s| s.next_review <= now)
            .cloned()
            .collect())
    }

    fn load_progression(&self, character: CharacterId) -> Result<Option<ProgressionRecord>> {
        Ok(self.read()?.progression.get(&character).cloned())
    }

    fn persist_progression(&self, record: &ProgressionRecord) -> Result<()> {
        self.write()?.progression.insert(record.character, record.clone());
        Ok(())
    }
}
