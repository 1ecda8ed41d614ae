use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Knowledge item not found: {0}")]
    KnowledgeNotFound(crate::core::types::KnowledgeId),

    #[error("Character not found: {0}")]
    CharacterNotFound(crate::core::types::CharacterId),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LoreError>;
