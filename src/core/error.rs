use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Invalid template {id}: {reason}")]
    InvalidTemplate { id: String, reason: String },

    #[error("Catalog parse error: {0}")]
    CatalogParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl EngineError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_template(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
