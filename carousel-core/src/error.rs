use std::path::PathBuf;

use crate::models::SetId;

/// Result type alias for carousel operations.
pub type Result<T> = std::result::Result<T, CarouselError>;

/// Errors surfaced by the carousel core.
///
/// `UnsupportedModel` and `UnsupportedChange` indicate a caller or
/// collaborator breaking the carousel's contract. They abort the operation
/// before any state is touched and are never retried.
#[derive(Debug, thiserror::Error)]
pub enum CarouselError {
    /// A model reference named a kind the carousel cannot select.
    #[error("Unsupported model type '{0}'")]
    UnsupportedModel(String),

    /// The source collection emitted a change the carousel cannot reconcile.
    #[error("Unsupported collection change '{action}'")]
    UnsupportedChange { action: &'static str },

    /// A set with no beatmaps was selected, so there is nothing to redirect to.
    #[error("Beatmap set {0} has no beatmaps to select")]
    EmptySet(SetId),

    /// File I/O error.
    #[error("Failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization error.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The library document does not match the library JSON Schema.
    #[error("Schema validation failed:\n{}", .0.join("\n"))]
    Schema(Vec<String>),

    /// The library deserialized but is semantically inconsistent.
    #[error("Validation failed:\n{}", .0.join("\n"))]
    Validation(Vec<String>),
}

impl CarouselError {
    /// Create an I/O error bound to the path that failed.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error signals a programming or collaborator contract
    /// violation rather than bad user input.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedModel(_) | Self::UnsupportedChange { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(CarouselError::UnsupportedChange { action: "move" }.is_fatal());
        assert!(CarouselError::UnsupportedModel("skin".to_string()).is_fatal());
        assert!(!CarouselError::EmptySet(SetId(3)).is_fatal());
    }

    #[test]
    fn test_validation_message_lists_every_problem() {
        let err = CarouselError::Validation(vec!["first".to_string(), "second".to_string()]);
        let message = err.to_string();
        assert!(message.starts_with("Validation failed"));
        assert!(message.contains("first\nsecond"));
    }
}
