//! Knowledge items and concept-key deduplication
//!
//! A knowledge item exists once per distinct concept. Re-seeding a concept
//! merges into the stored item instead of creating a duplicate: the semantic
//! fingerprint is blended and complexity nudged upward.

use crate::core::types::{CharacterId, KnowledgeId, Tick};
use crate::knowledge::domain::Domain;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Width of the hashed bag-of-words fingerprint
pub const FINGERPRINT_WIDTH: usize = 32;

/// Complexity bump applied on each merge
const MERGE_COMPLEXITY_STEP: f32 = 0.05;

/// Where a knowledge item came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KnowledgeSource {
    /// Extracted from a character's query
    Query,
    /// Seeded from imported lore
    Imported,
}

/// A unit of knowledge a character can learn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeItem {
    pub id: KnowledgeId,
    /// Canonical content text; grading matches attempts against this
    pub content: String,
    /// Normalized concept key used for deduplication
    pub concept: String,
    pub domain: Domain,
    pub source: KnowledgeSource,
    /// Estimated complexity (0.0 to 1.0); merges nudge this upward
    pub complexity: f32,
    /// Character that first seeded the concept
    pub owner: CharacterId,
    /// Hashed bag-of-words fingerprint; merges blend this 50/50
    pub fingerprint: Vec<f32>,
    pub created_tick: Tick,
    /// How many times another seeding merged into this item
    pub merge_count: u32,
}

impl KnowledgeItem {
    pub fn new(owner: CharacterId, content: &str, concept: String, domain: Domain, now: Tick) -> Self {
        Self {
            id: KnowledgeId::new(),
            content: content.to_string(),
            concept,
            domain,
            source: KnowledgeSource::Query,
            complexity: initial_complexity(content),
            owner,
            fingerprint: fingerprint(content),
            created_tick: now,
            merge_count: 0,
        }
    }

    /// Fold a re-seeded variant of the same concept into this item
    ///
    /// Blends the fingerprint 50/50 with the incoming text and raises
    /// complexity by a bounded step, capped at 1.0. Content stays the
    /// original canonical text.
    pub fn merge(&mut self, incoming_text: &str) {
        let incoming = fingerprint(incoming_text);
        for (stored, new) in self.fingerprint.iter_mut().zip(incoming.iter()) {
            *stored = (*stored + *new) * 0.5;
        }
        self.complexity = (self.complexity + MERGE_COMPLEXITY_STEP).min(1.0);
        self.merge_count += 1;
    }
}

/// Normalize raw text into a concept key
///
/// Lowercases, strips everything but alphanumerics, and collapses runs of
/// whitespace to single spaces. Two texts with the same key are the same
/// concept.
pub fn normalize_concept(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len());
    let mut pending_space = false;
    for ch in raw.chars() {
        if ch.is_alphanumeric() {
            if pending_space && !key.is_empty() {
                key.push(' ');
            }
            pending_space = false;
            for lower in ch.to_lowercase() {
                key.push(lower);
            }
        } else {
            pending_space = true;
        }
    }
    key
}

/// Hashed bag-of-words fingerprint of a text
///
/// Each word hashes into one of `FINGERPRINT_WIDTH` buckets; the vector is
/// L1-normalized so blending two fingerprints keeps the same scale.
pub fn fingerprint(text: &str) -> Vec<f32> {
    let mut buckets = vec![0.0f32; FINGERPRINT_WIDTH];
    let mut total = 0.0f32;
    for word in text.split_whitespace() {
        let mut hasher = DefaultHasher::new();
        word.to_lowercase().hash(&mut hasher);
        let bucket = (hasher.finish() as usize) % FINGERPRINT_WIDTH;
        buckets[bucket] += 1.0;
        total += 1.0;
    }
    if total > 0.0 {
        for value in &mut buckets {
            *value /= total;
        }
    }
    buckets
}

/// Estimate complexity from sentence and vocabulary density
fn initial_complexity(content: &str) -> f32 {
    let words = content.split_whitespace().count() as f32;
    let sentences = content.split('.').filter(|s| !s.trim().is_empty()).count().max(1) as f32;
    // Longer sentences read as denser material; saturates around 25 words/sentence
    (words / sentences / 25.0).clamp(0.05, 1.0)
}
