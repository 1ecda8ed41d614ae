//! Task curriculum and trait-driven selection

pub mod catalog;
pub mod selector;
pub mod task;

pub use catalog::{load_curriculum, CurriculumCatalog, CurriculumEntry};
pub use selector::{
    adaptive_difficulty, base_difficulty, follow_up, select_task, MAX_TASK_DIFFICULTY,
    MIN_TASK_DIFFICULTY,
};
pub use task::{Task, TaskKind, TaskProvenance};
