//! Build-level errors
//!
//! Every fatal condition surfaces here and aborts the whole build. Lenient
//! parsing never produces an error: unrecognized corpus lines degrade to
//! continuation text and are counted in `ParseStats` instead.

use crate::nlp::NlpError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a build
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("External NLP capability unavailable: {0}")]
    ExternalCapabilityUnavailable(#[from] NlpError),

    #[error("Schema mismatch in {source_name}: {detail}")]
    SchemaMismatch { source_name: String, detail: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IndexError {
    pub fn schema_mismatch(source_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            source_name: source_name.into(),
            detail: detail.into(),
        }
    }
}

/// Result type for build operations
pub type IndexResult<T> = Result<T, IndexError>;
