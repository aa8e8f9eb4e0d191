//! Error types for prompt templates.
//!
//! Uses thiserror for derive macros. Every error carries a primary message plus an
//! optional suggestion and context map so the CLI can print user-actionable output.

use crate::exit_codes;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Message, suggestion and context shared by all error variants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorDetails {
    /// The primary, human-readable message.
    pub message: String,
    /// How the user might fix the problem.
    pub suggestion: Option<String>,
    /// Advisory context (offending path, variable list, ...).
    pub context: BTreeMap<String, String>,
}

impl ErrorDetails {
    /// Create details with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            context: BTreeMap::new(),
        }
    }

    /// Attach a suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach one context entry.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {}", suggestion)?;
        }
        if !self.context.is_empty() {
            write!(f, "\nContext:")?;
            for (key, value) in &self.context {
                write!(f, "\n  {}: {}", key, value)?;
            }
        }
        Ok(())
    }
}

/// Main error type for prompt template operations.
#[derive(Error, Debug)]
pub enum PromptError {
    /// Malformed or incomplete template configuration (raised at construction).
    #[error("{0}")]
    Configuration(ErrorDetails),

    /// A template could not be located.
    #[error("{0}")]
    NotFound(ErrorDetails),

    /// Content failed strict loading; `errors` lists the field-level problems.
    #[error("{details}")]
    Validation {
        details: ErrorDetails,
        errors: Vec<String>,
    },

    /// Rendering failed: undefined variable, syntax error, evaluation or input error.
    #[error("{0}")]
    Render(ErrorDetails),

    /// Filesystem access failed.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl PromptError {
    pub fn configuration(message: impl Into<String>) -> Self {
        PromptError::Configuration(ErrorDetails::new(message))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        PromptError::NotFound(ErrorDetails::new(message))
    }

    pub fn validation(message: impl Into<String>, errors: Vec<String>) -> Self {
        PromptError::Validation {
            details: ErrorDetails::new(message),
            errors,
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        PromptError::Render(ErrorDetails::new(message))
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        PromptError::Io {
            context: context.into(),
            source,
        }
    }

    /// Structured details, when the variant has them.
    pub fn details(&self) -> Option<&ErrorDetails> {
        match self {
            PromptError::Configuration(d) | PromptError::NotFound(d) | PromptError::Render(d) => {
                Some(d)
            }
            PromptError::Validation { details, .. } => Some(details),
            PromptError::Io { .. } => None,
        }
    }

    fn details_mut(&mut self) -> Option<&mut ErrorDetails> {
        match self {
            PromptError::Configuration(d) | PromptError::NotFound(d) | PromptError::Render(d) => {
                Some(d)
            }
            PromptError::Validation { details, .. } => Some(details),
            PromptError::Io { .. } => None,
        }
    }

    /// Primary message without suggestion/context decoration.
    pub fn message(&self) -> String {
        match self.details() {
            Some(d) => d.message.clone(),
            None => self.to_string(),
        }
    }

    /// Suggestion, if any.
    pub fn suggestion(&self) -> Option<&str> {
        self.details().and_then(|d| d.suggestion.as_deref())
    }

    /// Attach a suggestion (no-op for I/O errors).
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        if let Some(d) = self.details_mut() {
            d.suggestion = Some(suggestion.into());
        }
        self
    }

    /// Attach a context entry (no-op for I/O errors).
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Some(d) = self.details_mut() {
            d.context.insert(key.into(), value.into());
        }
        self
    }

    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            PromptError::Configuration(_) => exit_codes::USER_ERROR,
            PromptError::NotFound(_) => exit_codes::USER_ERROR,
            PromptError::Io { .. } => exit_codes::USER_ERROR,
            PromptError::Validation { .. } => exit_codes::VALIDATION_FAILURE,
            PromptError::Render(_) => exit_codes::RENDER_FAILURE,
        }
    }
}

/// Result type alias for prompt template operations.
pub type Result<T> = std::result::Result<T, PromptError>;
