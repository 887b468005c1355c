use thiserror::Error;

/// Result alias used across ArchAIve crates
pub type ArchResult<T> = Result<T, ArchError>;

/// A single field that failed input validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field name as it appears in the flow input
    pub field: String,

    /// Human-readable reason, suitable for re-display on a form
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors produced by the flow engine
///
/// Three recoverable families per the caller contract:
/// - input validation (`Validation`, `FieldValidation`) - caller fixes input
///   and re-submits
/// - provider failures (`Provider`, `ProviderUnavailable`, `Schema`) - caller
///   shows a retry-later message; never retried internally
/// - configuration (`Config`) - raised before any request is made
///
/// Lookup-tool misses are not errors: tools return a not-found record.
#[derive(Error, Debug)]
pub enum ArchError {
    /// General validation failure
    #[error("Validation error: {0}")]
    Validation(String),

    /// Field-level input validation failure
    #[error("Invalid fields: {}", format_field_errors(.0))]
    FieldValidation(Vec<FieldError>),

    /// Output did not conform to its declared schema
    #[error("Schema error: {0}")]
    Schema(String),

    /// Provider returned an error response
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unreachable, overloaded, or returned uncoercible output
    #[error("Generation unavailable: {0}")]
    ProviderUnavailable(String),

    /// Tool execution failure (unknown tool, malformed arguments)
    #[error("Tool error: {0}")]
    Tool(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ArchError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ArchError::Validation(msg.into())
    }

    pub fn fields(errors: Vec<FieldError>) -> Self {
        ArchError::FieldValidation(errors)
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        ArchError::Schema(msg.into())
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        ArchError::Provider(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        ArchError::ProviderUnavailable(msg.into())
    }

    pub fn tool(msg: impl Into<String>) -> Self {
        ArchError::Tool(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        ArchError::Config(msg.into())
    }

    /// Whether the caller should present this as a transient
    /// "service unavailable, retry later" condition
    pub fn is_retry_later(&self) -> bool {
        matches!(
            self,
            ArchError::Provider(_) | ArchError::ProviderUnavailable(_) | ArchError::Schema(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_validation_display() {
        let err = ArchError::fields(vec![
            FieldError::new("query", "must not be empty"),
            FieldError::new("summary", "must be at least 10 characters"),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("query: must not be empty"));
        assert!(msg.contains("summary: must be at least 10 characters"));
    }

    #[test]
    fn test_retry_later_classification() {
        assert!(ArchError::unavailable("overloaded").is_retry_later());
        assert!(ArchError::schema("missing field").is_retry_later());
        assert!(!ArchError::fields(vec![]).is_retry_later());
        assert!(!ArchError::config("no api key").is_retry_later());
    }
}
