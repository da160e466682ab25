use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration for '{field}': {reason}")]
    Configuration { field: String, reason: String },

    #[error("Item '{id}' not found")]
    ItemNotFound { id: String },

    #[error("Unknown review status '{value}'")]
    InvalidStatus { value: String },

    #[error("Invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReviewError {
    pub fn config(field: &str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

pub type ReviewResult<T> = Result<T, ReviewError>;
