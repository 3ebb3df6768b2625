//! CLI-specific error types

use thiserror::Error;

use crate::config::BuildError;
use crate::schema::ValidationError;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    /// A file argument could not be read
    #[error("Failed to read '{path}': {reason}")]
    Read { path: String, reason: String },

    /// A file argument held malformed JSON
    #[error("Failed to parse '{path}': {reason}")]
    Parse { path: String, reason: String },

    /// Schema construction failed
    #[error(transparent)]
    Build(#[from] BuildError),

    /// The input value failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_errors_pass_through_unchanged() {
        let err = CliError::from(BuildError::InvalidType("password".into()));
        assert_eq!(err.to_string(), "Type password is not valid type.");
    }

    #[test]
    fn test_read_error_names_the_path() {
        let err = CliError::Read {
            path: "missing.json".into(),
            reason: "no such file".into(),
        };
        assert!(err.to_string().contains("missing.json"));
    }
}
