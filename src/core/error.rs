use thiserror::Error;

/// Core error types for clampgen
#[derive(Debug, Error)]
pub enum Error {
    /// The scale references something that doesn't exist (e.g. a missing base step)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Numeric input the engine cannot compute with
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// User-entered field failed validation
    #[error("Validation error in {field}: {message}")]
    Validation { field: String, message: String },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns a user-facing explanation with suggestions for recovery
    pub fn translate(&self) -> ErrorTranslation {
        match self {
            Error::Configuration(msg) => {
                ErrorTranslation::new(format!("Scale is misconfigured: {msg}"))
                    .with_suggestion("Pick a base step that exists in the step list")
                    .with_suggestion("Use `clampgen step list` to see the available step ids")
            }
            Error::InvalidInput(msg) => {
                let lower = msg.to_lowercase();
                let translation = ErrorTranslation::new(format!("Cannot compute sizes: {msg}"));
                if lower.contains("viewport") {
                    translation
                        .with_suggestion("Minimum viewport must be smaller than maximum viewport")
                        .with_suggestion("Viewports must be between 200px and 5000px")
                } else if lower.contains("flavor") {
                    translation.with_suggestion(
                        "Utility classes are only available for spacing profiles",
                    )
                } else {
                    translation
                        .with_suggestion("Scale ratios must be between 1.0 and 3.0")
                        .with_suggestion("Root sizes must be between 1px and 100px")
                }
            }
            Error::Validation { field, message } => {
                ErrorTranslation::new(format!("Invalid {field}: {message}"))
                    .with_suggestion("Correct the value and try again")
            }
            Error::Io(e) => ErrorTranslation::new(format!("File error: {e}"))
                .with_suggestion("Check that the data directory is writable"),
            Error::Serialization(e) => ErrorTranslation::new(format!("Malformed data: {e}"))
                .with_suggestion("The profile file may have been edited by hand")
                .with_suggestion("Recreate it with `clampgen init <name> --force`"),
        }
    }
}

/// Represents a translated error with helpful context
#[derive(Debug, Clone)]
pub struct ErrorTranslation {
    pub user_message: String,
    pub suggestions: Vec<String>,
}

impl ErrorTranslation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            user_message: message.into(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }
}

pub type Result<T> = std::result::Result<T, Error>;
