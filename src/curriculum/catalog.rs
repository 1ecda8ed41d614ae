//! Curriculum catalog loaded from TOML
//!
//! Entries pair a task kind and difficulty with instruction templates.
//! Ships with built-in defaults; deployments can override via
//! `data/curriculum/{name}.toml`.

use crate::core::error::{LoreError, Result};
use crate::curriculum::task::TaskKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// One curriculum entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurriculumEntry {
    /// Stable id, referenced in task provenance
    pub id: String,
    pub kind: TaskKind,
    /// Difficulty this entry teaches at (1 to 3)
    pub difficulty: u8,
    pub instructions: String,
    pub expected_format: String,
}

/// The pool of exercises a selector draws from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurriculumCatalog {
    #[serde(default)]
    pub entries: Vec<CurriculumEntry>,
}

impl CurriculumCatalog {
    /// Built-in curriculum covering every kind at every difficulty
    pub fn with_defaults() -> Self {
        let mut entries = Vec::new();
        let templates: &[(TaskKind, &str, &str)] = &[
            (
                TaskKind::CausalRewrite,
                "Rewrite the passage so every consequence names its cause",
                "connected prose",
            ),
            (
                TaskKind::ClarityRewrite,
                "Rewrite the passage as short, plain statements",
                "one statement per line",
            ),
            (
                TaskKind::Summarize,
                "Summarize the passage, keeping only the essential points",
                "short prose",
            ),
        ];
        let levels: &[(u8, &str)] = &[
            (1, "in simple words"),
            (2, "preserving every qualification"),
            (3, "and defend each choice you make"),
        ];

        for (kind, base, format) in templates {
            for (difficulty, suffix) in levels {
                entries.push(CurriculumEntry {
                    id: format!("{:?}-{}", kind, difficulty).to_lowercase(),
                    kind: *kind,
                    difficulty: *difficulty,
                    instructions: format!("{base}, {suffix}."),
                    expected_format: format.to_string(),
                });
            }
        }
        Self { entries }
    }

    /// Parse a catalog from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let catalog: CurriculumCatalog =
            toml::from_str(text).map_err(|e| LoreError::Config(format!("curriculum TOML: {e}")))?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(LoreError::Config("curriculum has no entries".to_string()));
        }
        for entry in &self.entries {
            if !(1..=3).contains(&entry.difficulty) {
                return Err(LoreError::Config(format!(
                    "entry '{}' difficulty {} outside 1..=3",
                    entry.id, entry.difficulty
                )));
            }
        }
        Ok(())
    }

    /// Entries matching a difficulty and optionally a kind
    pub fn matching(&self, difficulty: u8, kind: Option<TaskKind>) -> Vec<&CurriculumEntry> {
        self.entries
            .iter()
            .filter(|e| e.difficulty == difficulty)
            .filter(|e| kind.map_or(true, |k| e.kind == k))
            .collect()
    }
}

/// Load a curriculum from `data/curriculum/{name}.toml`
pub fn load_curriculum(name: &str) -> Result<CurriculumCatalog> {
    let path = curriculum_path(name);
    let contents = fs::read_to_string(&path)?;
    CurriculumCatalog::from_toml(&contents)
}

fn curriculum_path(name: &str) -> PathBuf {
    PathBuf::from("data/curriculum").join(format!("{}.toml", name))
}
