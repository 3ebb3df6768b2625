//! Declaration model and the fixed primitive type registry.
//!
//! Declarations arrive as untrusted `serde_json::Value` data: either a bare
//! type name (`"string"`) or a structured object with a reserved `type` key
//! plus constraint keys (`{"type": "string", "required": true, "min": 3}`).
//! Normalization converts both shapes into [`CanonicalConfig`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The closed set of value kinds a declaration may name.
///
/// The set is fixed at compile time and is the sole source of truth for
/// type-name validity checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    /// Heterogeneous JSON array
    Array,
    /// Boolean
    Boolean,
    /// ISO-8601 or YYYY-MM-DD date string
    Date,
    /// Any value
    Mixed,
    /// 64-bit number (integer or float)
    Number,
    /// Key-value object
    Object,
    /// UTF-8 string
    String,
}

impl PrimitiveType {
    /// Every recognized primitive type, in name order.
    pub const ALL: [PrimitiveType; 7] = [
        PrimitiveType::Array,
        PrimitiveType::Boolean,
        PrimitiveType::Date,
        PrimitiveType::Mixed,
        PrimitiveType::Number,
        PrimitiveType::Object,
        PrimitiveType::String,
    ];

    /// Returns the declaration-facing type name.
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveType::Array => "array",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Date => "date",
            PrimitiveType::Mixed => "mixed",
            PrimitiveType::Number => "number",
            PrimitiveType::Object => "object",
            PrimitiveType::String => "string",
        }
    }

    /// Looks a type name up in the registry.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "array" => Some(PrimitiveType::Array),
            "boolean" => Some(PrimitiveType::Boolean),
            "date" => Some(PrimitiveType::Date),
            "mixed" => Some(PrimitiveType::Mixed),
            "number" => Some(PrimitiveType::Number),
            "object" => Some(PrimitiveType::Object),
            "string" => Some(PrimitiveType::String),
            _ => None,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Returns true iff `value` exactly matches one of the fixed primitive
/// type names.
pub fn is_primitive_type(value: &str) -> bool {
    PrimitiveType::from_name(value).is_some()
}

/// One ordered constraint application from a structured declaration.
///
/// `args` follows the boolean-flag convention: `false` disables the
/// constraint entirely, `true` applies it with no argument, any other
/// value is passed as the constraint's single argument.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    /// Constraint name as declared (e.g. "required", "min", "when")
    pub name: String,
    /// Raw argument value from the declaration
    pub args: Value,
}

/// Canonical form of a raw declaration.
///
/// `methods` is `Some` (possibly empty) when the declaration was a
/// structured object and `None` when it was a bare type name; callers
/// must distinguish the two shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalConfig {
    /// Declared primitive type, validated against the registry
    pub kind: PrimitiveType,
    /// Constraint applications in declaration order, `type` key excluded
    pub methods: Option<Vec<MethodCall>>,
}

/// Shape classification of a raw declaration, produced in a single pass.
#[derive(Debug)]
pub(crate) enum Declaration<'a> {
    /// A bare type-name string
    Bare(&'a str),
    /// A structured key-value object
    Structured(&'a serde_json::Map<String, Value>),
    /// Anything else: array, number, boolean, null
    Invalid(&'a Value),
}

impl<'a> Declaration<'a> {
    pub(crate) fn classify(value: &'a Value) -> Self {
        match value {
            Value::String(name) => Declaration::Bare(name.as_str()),
            Value::Object(map) => Declaration::Structured(map),
            other => Declaration::Invalid(other),
        }
    }
}
