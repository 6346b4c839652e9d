//! Error types for model loading

use thiserror::Error;

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Structural failures that abort a load.
///
/// Unknown field or space names are not errors; they surface as absent
/// references in the loaded model (see [`crate::diagnostics`]).
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Space {} (declaration #{position}) has no `fields` section", display_name(.space))]
    MissingFields {
        space: Option<String>,
        position: usize,
    },

    #[error("Space {} has an invalid `{section}` section: expected {expected}", display_name(.space))]
    InvalidSection {
        space: Option<String>,
        section: &'static str,
        expected: &'static str,
    },

    #[error("Invalid schema source: {0}")]
    InvalidSource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn display_name(name: &Option<String>) -> &str {
    name.as_deref().unwrap_or("<unnamed>")
}
