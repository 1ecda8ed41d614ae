//! Belt/stripe mastery progression

pub mod ledger;
pub mod tiers;

pub use ledger::{MetricSample, ProgressionRecord, QualityMetrics};
pub use tiers::{requirement_for, Belt, Rank, RankRequirement, STRIPES_PER_BELT};
