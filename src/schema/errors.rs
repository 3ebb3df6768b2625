//! Validation error types for the schema runtime.
//!
//! A failed validation carries one [`Issue`] per violated field. With
//! abort-early semantics the list holds exactly the first failure; with
//! collect-all semantics it enumerates every violation in field order.

use std::fmt;

/// Result type for validation operations
pub type ValidateResult<T> = Result<T, ValidationError>;

/// A single per-field validation failure
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    /// Field path, e.g. "location.latitude" or "tags[1]" ("$root" at the top level)
    pub path: String,
    /// Human-readable failure description
    pub message: String,
}

impl Issue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn missing_field(path: impl Into<String>) -> Self {
        let path = path.into();
        let message = format!("field '{}': expected a value, got nothing", path);
        Self { path, message }
    }

    pub fn null_value(path: impl Into<String>) -> Self {
        let path = path.into();
        let message = format!("field '{}': expected non-null value, got null", path);
        Self { path, message }
    }

    pub fn type_mismatch(
        path: impl Into<String>,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
    ) -> Self {
        let path = path.into();
        let message = format!("field '{}': expected {}, got {}", path, expected, actual);
        Self { path, message }
    }

    pub fn extra_field(path: impl Into<String>) -> Self {
        let path = path.into();
        let message = format!(
            "field '{}': expected no undeclared fields, got extra field",
            path
        );
        Self { path, message }
    }

    pub fn violation(path: impl Into<String>, detail: impl fmt::Display) -> Self {
        let path = path.into();
        let message = format!("field '{}': {}", path, detail);
        Self { path, message }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Validation failure exposing every collected per-field issue
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    issues: Vec<Issue>,
}

impl ValidationError {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    pub fn single(issue: Issue) -> Self {
        Self {
            issues: vec![issue],
        }
    }

    /// All collected issues, in field order
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Flattened failure messages
    pub fn messages(&self) -> Vec<&str> {
        self.issues.iter().map(|issue| issue.message.as_str()).collect()
    }

    /// Paths of every violated field
    pub fn paths(&self) -> Vec<&str> {
        self.issues.iter().map(|issue| issue.path.as_str()).collect()
    }

    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: ")?;
        for (index, issue) in self.issues.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
