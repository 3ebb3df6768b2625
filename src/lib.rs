//! schemaforge - a declarative, data-driven validation schema compiler
//!
//! Field declarations expressed as plain data (bare type names or
//! structured constraint objects, typically loaded from JSON) are
//! compiled into an executable record validator that checks, coerces,
//! and reports errors against candidate values.
//!
//! ```
//! use serde_json::json;
//! use schemaforge::{build_schema, ValidateOptions};
//!
//! let declaration = json!({
//!     "username": {"type": "string", "required": true, "min": 8, "max": 12},
//!     "active": "boolean",
//! });
//!
//! let schema = build_schema(declaration.as_object().unwrap()).unwrap();
//! assert!(schema.is_valid(&json!({"username": "petar1983", "active": true})));
//! assert!(!schema.is_valid(&json!({"active": true})));
//! # let _ = ValidateOptions::default();
//! ```

pub mod cli;
pub mod config;
pub mod schema;

pub use config::{
    apply_methods, build_field, build_schema, instantiate, is_primitive_type, normalize,
    BuildError, BuildResult, CanonicalConfig, MethodCall, PrimitiveType, SchemaCatalog,
};
pub use schema::{
    capabilities, Condition, Issue, RecordSchema, SchemaNode, ValidateOptions, ValidateResult,
    ValidationError,
};
