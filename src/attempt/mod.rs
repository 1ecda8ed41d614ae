//! Attempt synthesis and personality-conditioned mutation

pub mod generator;
pub mod mutation;

pub use generator::{produce_attempt, Attempt};
pub use mutation::{apply_personality, MutationRule, MUTATION_RULES};
