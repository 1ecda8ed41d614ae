//! Attempt production
//!
//! Real input passes through verbatim. Without it, a deterministic
//! placeholder attempt is synthesized from the task's input text, keyed by
//! task kind, then run through the personality mutation rules.

use crate::core::types::{KnowledgeId, Tick};
use crate::curriculum::task::{Task, TaskKind};
use crate::persona::TraitVector;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::mutation::apply_personality;

/// One attempt at a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    pub text: String,
    pub char_len: usize,
    pub word_count: usize,
    /// Whether the text came from a real actor rather than synthesis
    pub is_real_input: bool,
    pub task_id: crate::core::types::TaskId,
    pub knowledge_id: KnowledgeId,
    /// The task kind's declared intent, carried for downstream metrics
    pub target_intent: String,
    pub created_tick: Tick,
}

impl Attempt {
    fn from_text(task: &Task, knowledge_id: KnowledgeId, text: String, real: bool, now: Tick) -> Self {
        Self {
            char_len: text.chars().count(),
            word_count: text.split_whitespace().count(),
            is_real_input: real,
            task_id: task.id,
            knowledge_id,
            target_intent: task.kind.target_intent().to_string(),
            created_tick: now,
            text,
        }
    }
}

/// Produce an attempt for a task
///
/// Supplied non-empty real input is used verbatim and is never mutated;
/// personality rules shape only synthesized attempts.
pub fn produce_attempt<R: Rng>(
    task: &Task,
    knowledge_id: KnowledgeId,
    real_input: Option<&str>,
    traits: &TraitVector,
    rng: &mut R,
    now: Tick,
) -> Attempt {
    if let Some(input) = real_input {
        if !input.trim().is_empty() {
            return Attempt::from_text(task, knowledge_id, input.to_string(), true, now);
        }
    }

    let synthesized = synthesize(task, rng);
    let mutated = apply_personality(&synthesized, traits);
    Attempt::from_text(task, knowledge_id, mutated, false, now)
}

/// Deterministic placeholder attempt keyed by task kind
fn synthesize<R: Rng>(task: &Task, rng: &mut R) -> String {
    match task.kind {
        TaskKind::CausalRewrite => causal_rewrite(&task.input_text, rng),
        TaskKind::ClarityRewrite => clarity_rewrite(&task.input_text),
        TaskKind::Summarize => summarize(&task.input_text),
    }
}

/// Substitute sequence connectors with causal ones
fn causal_rewrite<R: Rng>(text: &str, rng: &mut R) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find("and then") {
        out.push_str(&rest[..pos]);
        out.push_str(if rng.gen_bool(0.5) { "so" } else { "therefore" });
        rest = &rest[pos + "and then".len()..];
    }
    out.push_str(rest);
    out.replace(" and ", ", because ")
}

/// Break compound sentences into short statements
fn clarity_rewrite(text: &str) -> String {
    let fragments: Vec<&str> = text
        .split(|c: char| c == ',')
        .flat_map(|piece| piece.split(" and "))
        .map(str::trim)
        .filter(|fragment| fragment.split_whitespace().count() >= 3)
        .collect();
    if fragments.is_empty() {
        return text.trim().to_string();
    }
    fragments.join(". ")
}

/// Keep the first half of the sentences, rounded up
fn summarize(text: &str) -> String {
    let sentences: Vec<&str> = text
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if sentences.is_empty() {
        return text.trim().to_string();
    }
    let keep = (sentences.len() + 1) / 2;
    let mut kept = sentences[..keep].join(". ");
    kept.push('.');
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CharacterId, TaskId};
    use crate::curriculum::task::TaskProvenance;
    use crate::persona::TraitKey;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn task(kind: TaskKind, input: &str) -> Task {
        Task {
            id: TaskId::new(),
            kind,
            instructions: "do it".into(),
            input_text: input.into(),
            expected_format: "prose".into(),
            difficulty: 1,
            assigned_to: CharacterId::new(),
            provenance: TaskProvenance {
                selector_node: "test".into(),
                chain_from: None,
                reason: "test".into(),
            },
        }
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn test_real_input_passes_through_verbatim() {
        let task = task(TaskKind::Summarize, "Long passage. With sentences.");
        let traits = TraitVector::new().with(TraitKey::Impulsive, 99.0);
        let attempt = produce_attempt(
            &task,
            KnowledgeId::new(),
            Some("My own honest answer."),
            &traits,
            &mut rng(),
            50,
        );
        assert!(attempt.is_real_input);
        // Mutation rules never touch real input
        assert_eq!(attempt.text, "My own honest answer.");
        assert_eq!(attempt.word_count, 4);
    }

    #[test]
    fn test_blank_real_input_falls_back_to_synthesis() {
        let task = task(TaskKind::Summarize, "First point. Second point.");
        let attempt = produce_attempt(
            &task,
            KnowledgeId::new(),
            Some("   "),
            &TraitVector::new(),
            &mut rng(),
            50,
        );
        assert!(!attempt.is_real_input);
        assert!(!attempt.text.is_empty());
    }

    #[test]
    fn test_summarize_keeps_first_half_rounded_up() {
        assert_eq!(summarize("One. Two. Three."), "One. Two.");
        assert_eq!(summarize("One. Two. Three. Four."), "One. Two.");
        assert_eq!(summarize("Only one."), "Only one.");
    }

    #[test]
    fn test_causal_rewrite_replaces_connectors() {
        let mut rng = rng();
        let out = causal_rewrite("He struck and then the shield cracked", &mut rng);
        assert!(!out.contains("and then"));
        assert!(out.contains("so") || out.contains("therefore"));

        let out = causal_rewrite("swing hard and step back", &mut rng);
        assert!(out.contains(", because "));
    }

    #[test]
    fn test_clarity_rewrite_drops_trivial_fragments() {
        let out = clarity_rewrite("Keep your guard up, yes, and watch the enemy line");
        assert!(out.contains("Keep your guard up"));
        assert!(out.contains("watch the enemy line"));
        assert!(!out.contains("yes"));
    }

    #[test]
    fn test_metadata_always_populated() {
        let task = task(TaskKind::ClarityRewrite, "Hold the line, and mind the flanks today");
        let attempt = produce_attempt(
            &task,
            KnowledgeId::new(),
            None,
            &TraitVector::new(),
            &mut rng(),
            123,
        );
        assert_eq!(attempt.created_tick, 123);
        assert_eq!(attempt.char_len, attempt.text.chars().count());
        assert_eq!(attempt.word_count, attempt.text.split_whitespace().count());
        assert_eq!(attempt.target_intent, "state each idea plainly");
    }

    #[test]
    fn test_synthesis_deterministic_under_fixed_seed() {
        let task = task(TaskKind::CausalRewrite, "He feinted and then he lunged and won");
        let a = produce_attempt(&task, KnowledgeId::new(), None, &TraitVector::new(), &mut rng(), 0);
        let b = produce_attempt(&task, KnowledgeId::new(), None, &TraitVector::new(), &mut rng(), 0);
        assert_eq!(a.text, b.text);
    }
}
