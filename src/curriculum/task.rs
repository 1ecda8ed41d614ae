//! Task value objects handed from selection to attempt generation
//!
//! Tasks are ephemeral: they are not persisted by the core, only carried
//! through one cycle (collaborators may log them).

use crate::core::types::{CharacterId, TaskId};
use serde::{Deserialize, Serialize};

/// Exercise families the curriculum poses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    /// Rewrite a passage making the causal chain explicit
    CausalRewrite,
    /// Rewrite a passage into short, clear statements
    ClarityRewrite,
    /// Compress a passage to its core sentences
    Summarize,
}

impl TaskKind {
    pub fn all() -> &'static [TaskKind] {
        &[
            TaskKind::CausalRewrite,
            TaskKind::ClarityRewrite,
            TaskKind::Summarize,
        ]
    }

    /// What a good attempt at this kind is driving at
    pub fn target_intent(&self) -> &'static str {
        match self {
            TaskKind::CausalRewrite => "make cause and effect explicit",
            TaskKind::ClarityRewrite => "state each idea plainly",
            TaskKind::Summarize => "keep only what matters",
        }
    }
}

/// Who produced a task and why
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskProvenance {
    /// Selector node that generated the task
    pub selector_node: String,
    /// Prior task this one follows up on, if any
    pub chain_from: Option<TaskId>,
    pub reason: String,
}

/// One posed exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub kind: TaskKind,
    pub instructions: String,
    /// Passage the attempt works on
    pub input_text: String,
    pub expected_format: String,
    /// Assigned difficulty (1 to 3)
    pub difficulty: u8,
    pub assigned_to: CharacterId,
    pub provenance: TaskProvenance,
}

impl Task {
    pub fn is_follow_up(&self) -> bool {
        self.provenance.chain_from.is_some()
    }
}
