//! Personality-conditioned text mutation
//!
//! Rules are an ordered list of (gate, transform) pairs applied in the
//! order listed below. Each gate reads the trait vector independently, so
//! several rules may compound on the same attempt.

use crate::persona::{TraitKey, TraitVector};

/// Causal connectors a forgetful character loses
const CAUSAL_CONNECTORS: &[&str] = &[
    "because",
    "so",
    "therefore",
    "as a result",
    "which led to",
    "which caused",
];

/// Prefix an overconfident character tacks on
const BOAST: &str = "Honestly, this one is beneath me. ";

/// One personality mutation rule
pub struct MutationRule {
    pub name: &'static str,
    pub gate: fn(&TraitVector) -> bool,
    pub transform: fn(&str) -> String,
}

/// The canonical rule order; changing it changes attempt texture
pub const MUTATION_RULES: &[MutationRule] = &[
    MutationRule {
        name: "impulsive-truncation",
        gate: |traits| traits.exceeds(TraitKey::Impulsive, 70.0),
        transform: drop_final_sentence,
    },
    MutationRule {
        name: "forgetful-connector-loss",
        gate: |traits| traits.exceeds(TraitKey::Forgetful, 65.0),
        transform: elide_connectors,
    },
    MutationRule {
        name: "overconfident-boast",
        gate: |traits| traits.exceeds(TraitKey::Overconfident, 75.0),
        transform: prepend_boast,
    },
];

/// Run every gated rule over the text, in order
pub fn apply_personality(text: &str, traits: &TraitVector) -> String {
    let mut current = text.to_string();
    for rule in MUTATION_RULES {
        if (rule.gate)(traits) {
            current = (rule.transform)(&current);
        }
    }
    current
}

/// Drop the last non-empty sentence
fn drop_final_sentence(text: &str) -> String {
    let mut sentences: Vec<&str> = text
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    sentences.pop();
    if sentences.is_empty() {
        return String::new();
    }
    let mut out = sentences.join(". ");
    out.push('.');
    out
}

/// Replace causal connector words with an ellipsis
fn elide_connectors(text: &str) -> String {
    let mut out = text.to_string();
    for connector in CAUSAL_CONNECTORS {
        out = replace_word(&out, connector, "...");
    }
    out
}

/// Word-boundary-aware replacement (plain `replace` would eat substrings
/// like the "so" in "absolute")
fn replace_word(text: &str, word: &str, replacement: &str) -> String {
    let lower = text.to_lowercase();
    let target = word.to_lowercase();
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    while let Some(found) = lower[cursor..].find(&target) {
        let start = cursor + found;
        let end = start + target.len();
        let boundary_before = start == 0
            || !lower[..start]
                .chars()
                .next_back()
                .map_or(false, char::is_alphanumeric);
        let boundary_after = end == lower.len()
            || !lower[end..].chars().next().map_or(false, char::is_alphanumeric);

        out.push_str(&text[cursor..start]);
        if boundary_before && boundary_after {
            out.push_str(replacement);
        } else {
            out.push_str(&text[start..end]);
        }
        cursor = end;
    }
    out.push_str(&text[cursor..]);
    out
}

fn prepend_boast(text: &str) -> String {
    format!("{BOAST}{text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_traits_no_change() {
        let text = "Steady text. With two sentences.";
        assert_eq!(apply_personality(text, &TraitVector::new()), text);
    }

    #[test]
    fn test_impulsive_drops_last_sentence() {
        let traits = TraitVector::new().with(TraitKey::Impulsive, 80.0);
        let out = apply_personality("First point. Second point. Third point.", &traits);
        assert_eq!(out, "First point. Second point.");
    }

    #[test]
    fn test_impulsive_below_threshold_inert() {
        let traits = TraitVector::new().with(TraitKey::Impulsive, 70.0);
        let text = "First. Second.";
        assert_eq!(apply_personality(text, &traits), text);
    }

    #[test]
    fn test_forgetful_elides_connectors() {
        let traits = TraitVector::new().with(TraitKey::Forgetful, 70.0);
        let out = apply_personality("It cracked because the quench was rushed", &traits);
        assert!(out.contains("..."));
        assert!(!out.to_lowercase().contains("because"));
    }

    #[test]
    fn test_forgetful_spares_embedded_substrings() {
        let traits = TraitVector::new().with(TraitKey::Forgetful, 70.0);
        let out = apply_personality("An absolute resolute stance", &traits);
        // "so" inside words must survive
        assert_eq!(out, "An absolute resolute stance");
    }

    #[test]
    fn test_overconfident_prepends_boast() {
        let traits = TraitVector::new().with(TraitKey::Overconfident, 80.0);
        let out = apply_personality("The answer.", &traits);
        assert!(out.starts_with("Honestly, this one is beneath me. "));
        assert!(out.ends_with("The answer."));
    }

    #[test]
    fn test_rules_compound() {
        let traits = TraitVector::new()
            .with(TraitKey::Impulsive, 90.0)
            .with(TraitKey::Forgetful, 90.0)
            .with(TraitKey::Overconfident, 90.0);
        let out = apply_personality(
            "The blade bent because it was cold. Reheat it slowly. Then strike.",
            &traits,
        );
        // Impulsive removed the tail, forgetful the connector, boast leads
        assert!(out.starts_with("Honestly"));
        assert!(!out.to_lowercase().contains("because"));
        assert!(!out.contains("Then strike"));
    }

    #[test]
    fn test_multi_word_connector_elided() {
        let traits = TraitVector::new().with(TraitKey::Forgetful, 90.0);
        let out = apply_personality("He slipped as a result the line broke", &traits);
        assert!(!out.contains("as a result"));
        assert!(out.contains("..."));
    }
}
