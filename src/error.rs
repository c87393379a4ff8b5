//! Error types shared across the crate.

use std::fmt;
use thiserror::Error;

/// Errors raised while talking to the generation provider.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("failed to create AI client: {0}")]
    Client(String),
    #[error("OpenRouter API error: {0}")]
    Api(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("stream error: {0}")]
    Stream(String),
    #[error("no response choices received")]
    EmptyResponse,
    #[error("AI worker unavailable: {0}")]
    Worker(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationKind {
    Quiz,
    Flashcards,
}

impl fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationKind::Quiz => f.write_str("quiz"),
            GenerationKind::Flashcards => f.write_str("flashcards"),
        }
    }
}

/// Underlying reason a generation request failed. Never shown to the user.
#[derive(Debug, Error)]
pub enum GenerationCause {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("response is not valid JSON for the requested schema: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("response has the wrong shape: {0}")]
    Shape(String),
}

/// A quiz or flashcard request that could not be completed.
///
/// `Display` is the user-facing message; the cause is reachable through
/// [`std::error::Error::source`] for the debug log.
#[derive(Debug, Error)]
#[error("Failed to generate {kind}. Please check the topic and try again.")]
pub struct GenerationFailure {
    pub kind: GenerationKind,
    #[source]
    pub cause: GenerationCause,
}

impl GenerationFailure {
    pub fn new(kind: GenerationKind, cause: impl Into<GenerationCause>) -> Self {
        Self {
            kind,
            cause: cause.into(),
        }
    }

    pub fn shape(kind: GenerationKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            cause: GenerationCause::Shape(detail.into()),
        }
    }
}

/// A chat exchange that failed before or during streaming.
#[derive(Debug, Error)]
#[error("chat exchange failed: {source}")]
pub struct StreamingFailure {
    #[from]
    pub source: ProviderError,
}

/// User input rejected at the point of interaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("Please enter a valid name.")]
    EmptyName,
    #[error("A set with this name already exists. Please choose a different name.")]
    DuplicateName(String),
    #[error("There are no flashcards to save.")]
    NothingToSave,
}

/// Errors from the key-value persistence layer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to encode stored value: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_generation_failure_hides_cause_in_display() {
        let failure = GenerationFailure::shape(GenerationKind::Quiz, "expected 5 questions, got 3");
        assert_eq!(
            failure.to_string(),
            "Failed to generate quiz. Please check the topic and try again."
        );
        let source = failure.source().map(|s| s.to_string()).unwrap_or_default();
        assert!(source.contains("expected 5 questions"));
    }

    #[test]
    fn test_flashcard_failure_message() {
        let failure = GenerationFailure::new(GenerationKind::Flashcards, ProviderError::EmptyResponse);
        assert_eq!(
            failure.to_string(),
            "Failed to generate flashcards. Please check the topic and try again."
        );
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(ValidationFailure::EmptyName.to_string(), "Please enter a valid name.");
        assert!(ValidationFailure::DuplicateName("x".into())
            .to_string()
            .starts_with("A set with this name already exists"));
    }
}
