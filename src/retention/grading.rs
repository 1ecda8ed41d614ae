//! Keyword-overlap grading of free-text attempts
//!
//! When no explicit grade accompanies an attempt, the canonical content's
//! keywords are matched against the attempt's token set and the match ratio
//! maps onto the 0-5 grade scale.

use crate::retention::Grade;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Words carrying no content; excluded from keyword extraction
const STOP_WORDS: &[&str] = &[
    "the", "and", "that", "this", "with", "from", "have", "has", "are", "was",
    "were", "will", "would", "could", "should", "into", "onto", "over", "under",
    "then", "than", "when", "where", "which", "while", "their", "there", "these",
    "those", "been", "being", "because", "about", "after", "before", "very",
    "such", "some", "more", "most", "other", "each", "they", "them", "your",
    "what", "does", "also", "just", "only", "both",
];

/// Minimum keyword length; shorter words match too loosely
const MIN_KEYWORD_LEN: usize = 4;

/// Keyword match breakdown, kept on the evaluation for feedback and metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchDiagnostics {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    /// matched / (matched + missing), 0.0 when the canonical text has no keywords
    pub ratio: f32,
}

/// Graded outcome of an attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub grade: Grade,
    pub feedback: String,
    /// Present when the grade came from keyword matching
    pub diagnostics: Option<MatchDiagnostics>,
}

impl Evaluation {
    /// Wrap an externally supplied grade (no diagnostics available)
    pub fn external(grade: Grade) -> Self {
        Self {
            grade,
            feedback: format!("External review graded {grade}/5."),
            diagnostics: None,
        }
    }
}

/// Extract content keywords: length over 3, stop-words excluded, lowercase
pub fn keywords(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|w| w.len() >= MIN_KEYWORD_LEN && !STOP_WORDS.contains(&w.as_str()))
        .collect()
}

/// Map a keyword match ratio onto the grade scale
fn ratio_to_grade(ratio: f32) -> Grade {
    let raw = if ratio >= 0.9 {
        5
    } else if ratio >= 0.75 {
        4
    } else if ratio >= 0.5 {
        3
    } else if ratio >= 0.25 {
        2
    } else if ratio > 0.0 {
        1
    } else {
        0
    };
    Grade::clamped(raw)
}

/// Grade an attempt against the canonical content's keywords
pub fn grade_attempt_text(canonical: &str, attempt: &str) -> Evaluation {
    let wanted = keywords(canonical);
    let have = keywords(attempt);

    let mut matched: Vec<String> = wanted.intersection(&have).cloned().collect();
    let mut missing: Vec<String> = wanted.difference(&have).cloned().collect();
    matched.sort();
    missing.sort();

    let ratio = if wanted.is_empty() {
        0.0
    } else {
        matched.len() as f32 / wanted.len() as f32
    };
    let grade = ratio_to_grade(ratio);

    let feedback = if missing.is_empty() && !matched.is_empty() {
        "Covered every key point.".to_string()
    } else if matched.is_empty() {
        "Missed the substance entirely.".to_string()
    } else {
        format!(
            "Covered {} of {} key points; missing: {}.",
            matched.len(),
            wanted.len(),
            missing.join(", ")
        )
    };

    Evaluation {
        grade,
        feedback,
        diagnostics: Some(MatchDiagnostics {
            matched,
            missing,
            ratio,
        }),
    }
}
