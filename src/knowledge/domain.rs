//! Knowledge domains and the pluggable domain classifier

use serde::{Deserialize, Serialize};

/// Domain categories for knowledge items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    /// Combat: weapons, maneuvers, battlefield craft
    Combat,
    /// Craft: smithing, carpentry, brewing, etc.
    Craft,
    /// Social: persuasion, etiquette, negotiation
    Social,
    /// Medicine: wound care, herbalism, anatomy
    Medicine,
    /// Leadership: command, logistics, morale
    Leadership,
    /// Scholarship: history, languages, natural philosophy
    Scholarship,
    /// Physical: athletics, climbing, stealth
    Physical,
    /// Fallback when no domain can be inferred
    General,
}

impl Domain {
    /// Get all domains
    pub fn all() -> &'static [Domain] {
        &[
            Domain::Combat,
            Domain::Craft,
            Domain::Social,
            Domain::Medicine,
            Domain::Leadership,
            Domain::Scholarship,
            Domain::Physical,
            Domain::General,
        ]
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Domain::Combat => "Combat",
            Domain::Craft => "Craft",
            Domain::Social => "Social",
            Domain::Medicine => "Medicine",
            Domain::Leadership => "Leadership",
            Domain::Scholarship => "Scholarship",
            Domain::Physical => "Physical",
            Domain::General => "General",
        }
    }
}

/// Pluggable domain inference for new knowledge items
///
/// Implementations must not fail the create path: return `Domain::General`
/// rather than erroring when nothing matches.
pub trait DomainClassifier: Send + Sync {
    fn detect_domain(&self, text: &str) -> Domain;
}

/// Keyword cue lists per domain
const DOMAIN_CUES: &[(Domain, &[&str])] = &[
    (
        Domain::Combat,
        &["sword", "shield", "parry", "flank", "archer", "battle", "strike"],
    ),
    (
        Domain::Craft,
        &["forge", "anvil", "timber", "weave", "brew", "carve", "smith"],
    ),
    (
        Domain::Social,
        &["persuade", "etiquette", "bargain", "court", "rumor", "alliance"],
    ),
    (
        Domain::Medicine,
        &["wound", "herb", "fever", "salve", "bone", "poultice", "heal"],
    ),
    (
        Domain::Leadership,
        &["command", "morale", "supply", "banner", "muster", "orders"],
    ),
    (
        Domain::Scholarship,
        &["history", "language", "scroll", "star", "theorem", "archive"],
    ),
    (
        Domain::Physical,
        &["climb", "sprint", "swim", "balance", "stealth", "endurance"],
    ),
];

/// Default classifier: picks the domain with the most keyword cues in the text
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl DomainClassifier for KeywordClassifier {
    fn detect_domain(&self, text: &str) -> Domain {
        let lowered = text.to_lowercase();

        let mut best = Domain::General;
        let mut best_hits = 0usize;
        for (domain, cues) in DOMAIN_CUES {
            let hits = cues.iter().filter(|cue| lowered.contains(*cue)).count();
            if hits > best_hits {
                best = *domain;
                best_hits = hits;
            }
        }
        best
    }
}
