//! Declarative configuration engine for schemaforge.
//!
//! Raw field declarations (bare type names or structured constraint
//! objects) are normalized into a canonical form, mapped onto fresh
//! validator instances, and assembled into a record-level schema:
//!
//! - Fixed primitive type registry ([`PrimitiveType`], [`is_primitive_type`])
//! - Declaration normalization ([`normalize`])
//! - Instantiation and ordered constraint application ([`instantiate`],
//!   [`apply_methods`]) including the recursive conditional construct
//! - Record assembly ([`build_schema`]) and the file-backed
//!   [`SchemaCatalog`]

mod builder;
mod errors;
mod loader;
mod normalize;
mod types;

pub use builder::{apply_methods, build_field, build_schema, instantiate};
pub use errors::{BuildError, BuildResult};
pub use loader::SchemaCatalog;
pub use normalize::normalize;
pub use types::{is_primitive_type, CanonicalConfig, MethodCall, PrimitiveType};
