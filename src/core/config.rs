//! Retention scheduling configuration with documented constants
//!
//! All memory-model magic numbers are collected here with explanations of
//! their purpose and how they interact with each other.

/// Parameters of the retention scheduler's memory update
///
/// Exactly one parameter set is authoritative. Personality traits influence
/// task difficulty and attempt mutation, never this update, so scheduling
/// stays deterministic and auditable.
#[derive(Debug, Clone)]
pub struct RetentionConfig {
    // === DIFFICULTY ===
    /// How much a successful review (grade >= 3) eases an item's difficulty
    ///
    /// At the default step (0.2), an item at the default difficulty (3.5)
    /// reaches the floor after ~13 consecutive successes.
    pub success_difficulty_step: f64,

    /// How much a failed review (grade < 3) hardens an item's difficulty
    ///
    /// Twice the success step: failures move difficulty faster than
    /// successes recover it, so struggling items surface more often.
    pub failure_difficulty_step: f64,

    /// Difficulty floor
    pub min_difficulty: f64,

    /// Difficulty ceiling
    pub max_difficulty: f64,

    // === STABILITY ===
    /// Flat stability gain on success (days)
    pub stability_base_gain: f64,

    /// Extra stability gain per point of difficulty below the pivot
    ///
    /// Easy items consolidate faster: gain = base + (pivot - difficulty) * bonus.
    /// Items harder than the pivot gain less than the base.
    pub stability_difficulty_bonus: f64,

    /// Pivot difficulty for the stability bonus
    pub stability_difficulty_pivot: f64,

    /// Multiplier applied to stability on failure
    ///
    /// At 0.6, a failed review keeps 60% of accumulated stability rather
    /// than discarding the item's history outright.
    pub failure_stability_factor: f64,

    /// Stability floor (days); items never decay faster than this
    pub min_stability: f64,

    // === SCHEDULING ===
    /// Next interval = stability * retrievability * this factor
    ///
    /// At 2.5, a fully-retrievable item with 1 day of stability comes back
    /// in 2.5 days. Lower values review more aggressively.
    pub interval_factor: f64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            success_difficulty_step: 0.2,
            failure_difficulty_step: 0.4,
            min_difficulty: 1.0,
            max_difficulty: 8.0,
            stability_base_gain: 0.15,
            stability_difficulty_bonus: 0.02,
            stability_difficulty_pivot: 4.0,
            failure_stability_factor: 0.6,
            min_stability: 0.3,
            interval_factor: 2.5,
        }
    }
}

/// Defaults for a character's first exposure to a knowledge item
pub const DEFAULT_DIFFICULTY: f64 = 3.5;

/// Initial stability in days
pub const DEFAULT_STABILITY: f64 = 0.6;

/// A just-seen item is fully retrievable
pub const DEFAULT_RETRIEVABILITY: f64 = 1.0;
