use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// A single way a structured payload failed its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// JSON path of the offending value, e.g. `$.files[2].changeType`.
    pub path: String,
    pub reason: String,
}

impl SchemaViolation {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("Model capability unavailable: {0}")]
    CapabilityUnavailable(String),

    #[error("Model capability timed out after {0:?}")]
    CapabilityTimeout(Duration),

    #[error("Structured output failed schema '{schema}': {}", join_violations(.violations))]
    SchemaValidation {
        schema: String,
        violations: Vec<SchemaViolation>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure to serialize the crate's own data, never a model reply.
    #[error("Encoding error: {0}")]
    Encoding(String),
}

impl PatternError {
    pub fn schema(schema: impl Into<String>, violations: Vec<SchemaViolation>) -> Self {
        PatternError::SchemaValidation {
            schema: schema.into(),
            violations,
        }
    }

    pub fn is_schema_violation(&self) -> bool {
        matches!(self, PatternError::SchemaValidation { .. })
    }
}

fn join_violations(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, PatternError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_error_is_not_a_schema_violation() {
        let err = PatternError::Encoding("review results: key must be a string".into());
        assert!(!err.is_schema_violation());
        assert_eq!(err.to_string(), "Encoding error: review results: key must be a string");
    }

    #[test]
    fn test_schema_error_lists_every_violation() {
        let err = PatternError::schema(
            "quality_metrics",
            vec![
                SchemaViolation::new("$.clarity", "11 is outside the range [1, 10]"),
                SchemaViolation::new("$.hasCallToAction", "missing required field"),
            ],
        );
        assert!(err.is_schema_violation());
        assert_eq!(
            err.to_string(),
            "Structured output failed schema 'quality_metrics': $.clarity: 11 is outside the range [1, 10]; $.hasCallToAction: missing required field"
        );
    }
}
