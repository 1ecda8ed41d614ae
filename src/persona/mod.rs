//! Character personality traits consumed by the learning cycle
//!
//! Traits are plain 0-100 intensities keyed by name. The cycle reads them
//! through the `TraitProvider` seam so deployments can plug in whatever
//! character system they run.

pub mod vector;

pub use vector::{TraitKey, TraitVector};

use crate::core::error::Result;
use crate::core::types::CharacterId;
use ahash::AHashMap;
use std::sync::RwLock;

/// Read-only source of a character's trait vector
pub trait TraitProvider: Send + Sync {
    fn trait_vector(&self, character: CharacterId) -> Result<TraitVector>;
}

/// In-memory trait provider
///
/// Characters without a registered vector read as all-zero traits, which
/// gates every personality rule off.
#[derive(Debug, Default)]
pub struct StaticTraitProvider {
    vectors: RwLock<AHashMap<CharacterId, TraitVector>>,
}

impl StaticTraitProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, character: CharacterId, vector: TraitVector) {
        let mut vectors = self
            .vectors
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        vectors.insert(character, vector);
    }
}

impl TraitProvider for StaticTraitProvider {
    fn trait_vector(&self, character: CharacterId) -> Result<TraitVector> {
        let vectors = self
            .vectors
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(vectors.get(&character).cloned().unwrap_or_default())
    }
}
