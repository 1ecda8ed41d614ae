//! Mastery progression bookkeeping
//!
//! After every completed cycle the character's rolling quality metrics are
//! folded in and the tier ladder is walked at most one step. Progression
//! never regresses and never jumps ranks, however far the metrics overshoot.

use crate::attempt::Attempt;
use crate::core::types::CharacterId;
use crate::curriculum::Task;
use crate::progression::tiers::{requirement_for, Rank, RankRequirement};
use crate::retention::grading::keywords;
use crate::retention::Evaluation;
use serde::{Deserialize, Serialize};

/// Smoothing factor for the rolling metrics (weight of the newest sample)
const METRIC_ALPHA: f32 = 0.3;

/// Keyword-per-word density treated as fully efficient
const EFFICIENCY_DENSITY_SCALE: f32 = 8.0;

/// Rolling quality metrics, each bounded to [0, 1]
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub effectiveness: f32,
    pub efficiency: f32,
    pub cultural_fit: f32,
    pub innovation: f32,
}

impl QualityMetrics {
    /// Exponential moving average toward a new sample, clamped to [0, 1]
    fn absorb(&mut self, sample: &MetricSample) {
        let mix = |current: f32, new: f32| {
            ((1.0 - METRIC_ALPHA) * current + METRIC_ALPHA * new.clamp(0.0, 1.0)).clamp(0.0, 1.0)
        };
        self.effectiveness = mix(self.effectiveness, sample.effectiveness);
        self.efficiency = mix(self.efficiency, sample.efficiency);
        self.cultural_fit = mix(self.cultural_fit, sample.cultural_fit);
        self.innovation = mix(self.innovation, sample.innovation);
    }

    fn meets(&self, requirement: &RankRequirement) -> bool {
        self.effectiveness >= requirement.min_effectiveness
            && self.efficiency >= requirement.min_efficiency
            && self.cultural_fit >= requirement.min_cultural_fit
            && requirement
                .min_innovation
                .map_or(true, |min| self.innovation >= min)
    }
}

/// Quality readings taken from one completed cycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetricSample {
    pub effectiveness: f32,
    pub efficiency: f32,
    pub cultural_fit: f32,
    pub innovation: f32,
}

impl MetricSample {
    /// Derive a sample from a cycle's artifacts
    ///
    /// Effectiveness tracks the grade; cultural fit the keyword match
    /// ratio; efficiency rewards keyword-dense attempts; innovation the
    /// share of attempt vocabulary not lifted from the task input.
    pub fn from_cycle(task: &Task, attempt: &Attempt, evaluation: &Evaluation) -> Self {
        let effectiveness = evaluation.grade.value() as f32 / 5.0;

        let match_ratio = evaluation
            .diagnostics
            .as_ref()
            .map(|d| d.ratio)
            .unwrap_or(effectiveness);

        let efficiency = if attempt.word_count == 0 {
            0.0
        } else {
            let matched = evaluation
                .diagnostics
                .as_ref()
                .map(|d| d.matched.len())
                .unwrap_or(0) as f32;
            (matched * EFFICIENCY_DENSITY_SCALE / attempt.word_count as f32).clamp(0.0, 1.0)
        };

        let input_words = keywords(&task.input_text);
        let attempt_words = keywords(&attempt.text);
        let innovation = if attempt_words.is_empty() {
            0.0
        } else {
            let novel = attempt_words
                .iter()
                .filter(|w| !input_words.contains(*w))
                .count() as f32;
            (novel / attempt_words.len() as f32).clamp(0.0, 1.0)
        };

        Self {
            effectiveness,
            efficiency,
            cultural_fit: match_ratio,
            innovation,
        }
    }
}

/// A character's mastery standing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionRecord {
    pub character: CharacterId,
    pub rank: Rank,
    /// Cumulative completed cycles
    pub cycles: u32,
    pub metrics: QualityMetrics,
}

impl ProgressionRecord {
    pub fn new(character: CharacterId) -> Self {
        Self {
            character,
            rank: Rank::start(),
            cycles: 0,
            metrics: QualityMetrics::default(),
        }
    }

    /// Fold in one completed cycle and advance at most one rank step
    ///
    /// Advancement needs BOTH the cycle-count threshold AND every metric
    /// floor of the next rank; meeting thresholds for later ranks early
    /// never skips the ladder.
    pub fn record_cycle(&mut self, sample: &MetricSample) -> Option<Rank> {
        self.cycles += 1;
        self.metrics.absorb(sample);

        let next = self.rank.next()?;
        let requirement = requirement_for(next);
        if self.cycles >= requirement.min_cycles && self.metrics.meets(&requirement) {
            tracing::debug!(character = %self.character, from = %self.rank, to = %next, "rank advanced");
            self.rank = next;
            return Some(next);
        }
        None
    }
}
