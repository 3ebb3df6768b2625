//! Build error taxonomy for schema construction.
//!
//! Every error is raised at the point of detection and propagates uncaught
//! through the whole build; there is no recovery or partial result.

use thiserror::Error;

/// Result type for schema-build operations
pub type BuildResult<T> = Result<T, BuildError>;

/// Errors raised while normalizing declarations and assembling schemas
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    /// Declared type name is outside the primitive registry
    #[error("Type {0} is not valid type.")]
    InvalidType(String),

    /// Raw declaration is neither a type name nor a structured object
    #[error("Invalid configuration ({0})")]
    InvalidConfiguration(String),

    /// Declared constraint has no capability on the instantiated type
    #[error("Invalid method {method} on {type_name} type")]
    InvalidMethod { method: String, type_name: String },

    /// Conditional branch specification lacks its matcher
    #[error("Invalid configuration, property \"is\" is required in \"when\" method")]
    MissingIs,

    /// Conditional branch specification lacks its positive branch
    #[error("Invalid configuration, property \"then\" is required in \"when\" method")]
    MissingThen,

    /// Conditional branch specification lacks its negative branch
    #[error("Invalid configuration, property \"otherwise\" is required in \"when\" method")]
    MissingOtherwise,

    /// Constraint argument failed typed decoding
    #[error("Invalid argument for method {method} on {type_name} type: {reason}")]
    InvalidArgument {
        method: String,
        type_name: String,
        reason: String,
    },

    /// Declaration file could not be read
    #[error("Failed to read schema file '{path}': {reason}")]
    FileRead { path: String, reason: String },

    /// Declaration file is not valid JSON or not an object of fields
    #[error("Malformed schema file '{path}': {reason}")]
    FileParse { path: String, reason: String },

    /// Catalog already holds a schema under this name
    #[error("Schema '{0}' is already registered")]
    AlreadyRegistered(String),
}
