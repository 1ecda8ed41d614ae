//! Trait vector storage with clamped 0-100 intensities

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Traits the learning cycle reacts to
///
/// The vector accepts arbitrary named traits; these are the ones with
/// behavioral gates in the selector and the attempt mutator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraitKey {
    /// Drives harder task selection
    Inquisitiveness,
    /// Pulls task difficulty back down
    Overwhelm,
    /// Drops the tail of an attempt
    Impulsive,
    /// Loses causal connectors
    Forgetful,
    /// Prepends boastful framing
    Overconfident,
    /// Any other trait a character system carries
    Other(&'static str),
}

impl TraitKey {
    pub fn name(&self) -> &'static str {
        match self {
            TraitKey::Inquisitiveness => "inquisitiveness",
            TraitKey::Overwhelm => "overwhelm",
            TraitKey::Impulsive => "impulsive",
            TraitKey::Forgetful => "forgetful",
            TraitKey::Overconfident => "overconfident",
            TraitKey::Other(name) => name,
        }
    }
}

/// A character's personality intensities (0.0 to 100.0 each)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraitVector {
    values: AHashMap<String, f32>,
}

impl TraitVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a trait intensity, clamped to [0, 100]
    pub fn set(&mut self, key: TraitKey, value: f32) {
        self.values
            .insert(key.name().to_string(), value.clamp(0.0, 100.0));
    }

    /// Builder-style set
    pub fn with(mut self, key: TraitKey, value: f32) -> Self {
        self.set(key, value);
        self
    }

    /// Read a trait intensity (0.0 when absent)
    pub fn get(&self, key: TraitKey) -> f32 {
        self.values.get(key.name()).copied().unwrap_or(0.0)
    }

    /// Whether the trait exceeds a gate threshold
    pub fn exceeds(&self, key: TraitKey, threshold: f32) -> bool {
        self.get(key) > threshold
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
