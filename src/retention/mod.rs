//! Retention scheduling: grading, memory update, review bookkeeping

pub mod fsrs;
pub mod grading;
pub mod scheduler;

pub use fsrs::{apply_grade, retrievability, MemoryUpdate};
pub use grading::{grade_attempt_text, Evaluation, MatchDiagnostics};
pub use scheduler::{ReviewOutcome, RetentionScheduler};

use crate::core::error::LoreError;
use serde::{Deserialize, Serialize};

/// A review outcome on the 0-5 scale
///
/// 0-2 are failures, 3-5 successes. Construction validates the range;
/// malformed grades never reach the memory update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Grade(u8);

impl Grade {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 5;

    pub fn value(self) -> u8 {
        self.0
    }

    /// Grades of 3 and above count as successful recall
    pub fn is_success(self) -> bool {
        self.0 >= 3
    }

    /// Internal constructor for grades computed in-range
    pub(crate) fn clamped(raw: u8) -> Self {
        Self(raw.min(Self::MAX))
    }
}

impl TryFrom<u8> for Grade {
    type Error = LoreError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        if raw > Self::MAX {
            return Err(LoreError::Validation(format!(
                "grade {raw} outside 0..=5"
            )));
        }
        Ok(Self(raw))
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> u8 {
        grade.0
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
