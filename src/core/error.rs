//! Structured error types.
//!
//! Errors must be classifiable, attributable, and actionable.
//! Every error answers: What failed? Where? What can the caller do?

use serde::{Deserialize, Serialize};

/// Error category for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// A referenced node, edge, path, or user does not exist.
    NotFound,
    /// Caller-supplied data failed a structural check.
    Validation,
    /// Internal invariant violations.
    Internal,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Validation => write!(f, "validation"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// Structured error with full context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WayfinderError {
    /// Error category for classification.
    pub category: ErrorCategory,
    /// Unique error code within category.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Component and operation that originated the error.
    pub origin: String,
}

impl WayfinderError {
    /// Creates a new error with the given parameters.
    #[must_use]
    pub fn new(
        category: ErrorCategory,
        code: impl Into<String>,
        message: impl Into<String>,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            category,
            code: code.into(),
            message: message.into(),
            origin: origin.into(),
        }
    }

    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(
        code: impl Into<String>,
        message: impl Into<String>,
        origin: impl Into<String>,
    ) -> Self {
        Self::new(ErrorCategory::NotFound, code, message, origin)
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(
        code: impl Into<String>,
        message: impl Into<String>,
        origin: impl Into<String>,
    ) -> Self {
        Self::new(ErrorCategory::Validation, code, message, origin)
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(
        code: impl Into<String>,
        message: impl Into<String>,
        origin: impl Into<String>,
    ) -> Self {
        Self::new(ErrorCategory::Internal, code, message, origin)
    }
}

impl std::fmt::Display for WayfinderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}:{}] {}", self.category, self.code, self.message)
    }
}

impl std::error::Error for WayfinderError {}

/// Result type using `WayfinderError`.
pub type Result<T> = std::result::Result<T, WayfinderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = WayfinderError::not_found(
            "edge_endpoint_missing",
            "Source node does not exist",
            "catalog:add_edge",
        );
        assert!(err.to_string().contains("not_found"));
        assert!(err.to_string().contains("edge_endpoint_missing"));
    }

    #[test]
    fn error_serialization() {
        let err = WayfinderError::validation(
            "popularity_out_of_range",
            "Popularity must be between 0 and 100",
            "catalog:add_node",
        );

        let json = serde_json::to_string(&err).expect("serialize");
        let restored: WayfinderError = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(restored.category, ErrorCategory::Validation);
        assert_eq!(restored.code, "popularity_out_of_range");
    }
}
