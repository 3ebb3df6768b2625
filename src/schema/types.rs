//! Validator runtime model: per-kind schema nodes and record schemas.
//!
//! A [`SchemaNode`] is the opaque validator instance the configuration
//! engine assembles. Constraint application consumes the node and returns
//! the updated one; instances are never shared or mutated in place.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::{Map, Value};

use crate::config::PrimitiveType;

/// One applied constraint, decoded into its typed operation.
#[derive(Debug, Clone)]
pub(crate) enum Constraint {
    /// Minimum string/array length, inclusive
    MinLength(usize),
    /// Maximum string/array length, inclusive
    MaxLength(usize),
    /// Exact string/array length
    Length(usize),
    /// String must match the compiled pattern
    Matches(Regex),
    /// String must look like an email address
    Email,
    /// String must look like an http(s) URL
    Url,
    /// Strip surrounding whitespace before further checks
    Trim,
    /// Lowercase the value before further checks
    Lowercase,
    /// Uppercase the value before further checks
    Uppercase,
    /// Minimum numeric value, inclusive
    MinNumber(f64),
    /// Maximum numeric value, inclusive
    MaxNumber(f64),
    /// Strict upper bound
    LessThan(f64),
    /// Strict lower bound
    MoreThan(f64),
    Positive,
    Negative,
    Integer,
    /// Earliest accepted date, inclusive
    MinDate(NaiveDateTime),
    /// Latest accepted date, inclusive
    MaxDate(NaiveDateTime),
    /// Value must equal one of the listed values (after coercion)
    OneOf(Vec<Value>),
    /// Value must equal none of the listed values (after coercion)
    NotOneOf(Vec<Value>),
    /// Element schema for every array member
    Of(Box<SchemaNode>),
    /// Nested field schemas for an object value
    Shape(Vec<(String, SchemaNode)>),
    /// Reject object keys not declared in the shape
    NoUnknown,
}

/// Conditional schema selection keyed on a sibling field.
///
/// At validation time the node resolves to `then` when the sibling's raw
/// value equals `is`, and to `otherwise` in every other case (including a
/// missing sibling).
#[derive(Debug, Clone)]
pub struct Condition {
    pub(crate) field: String,
    pub(crate) is: Value,
    pub(crate) then: SchemaNode,
    pub(crate) otherwise: SchemaNode,
}

impl Condition {
    pub fn new(
        field: impl Into<String>,
        is: Value,
        then: SchemaNode,
        otherwise: SchemaNode,
    ) -> Self {
        Self {
            field: field.into(),
            is,
            then,
            otherwise,
        }
    }
}

/// A constrained validator for a single value kind.
#[derive(Debug, Clone)]
pub struct SchemaNode {
    kind: PrimitiveType,
    required: bool,
    nullable: bool,
    constraints: Vec<Constraint>,
    condition: Option<Box<Condition>>,
}

impl SchemaNode {
    /// Creates a fresh, unconstrained instance of the given kind.
    pub fn new(kind: PrimitiveType) -> Self {
        Self {
            kind,
            required: false,
            nullable: false,
            constraints: Vec::new(),
            condition: None,
        }
    }

    pub fn kind(&self) -> PrimitiveType {
        self.kind
    }

    /// Marks the value as mandatory: an absent value fails validation.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Accepts explicit null as a valid value.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Attaches a conditional branch selection; the resolved branch fully
    /// supersedes this node at validation time.
    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = Some(Box::new(condition));
        self
    }

    pub(crate) fn constrain(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub(crate) fn is_required(&self) -> bool {
        self.required
    }

    pub(crate) fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub(crate) fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// True iff the named constraint exists for this node's kind.
    pub fn supports(&self, method: &str) -> bool {
        capabilities(self.kind).iter().any(|name| *name == method)
    }

    /// Classifies a candidate value against this node's kind, without
    /// coercion. An absent value matches no kind except mixed.
    pub fn is_type(&self, value: Option<&Value>) -> bool {
        match self.kind {
            PrimitiveType::Mixed => true,
            kind => value.is_some_and(|value| kind_matches(kind, value)),
        }
    }

    /// Resolves conditional selection against the enclosing record,
    /// recursing through branch conditions.
    pub(crate) fn resolve<'a>(&'a self, record: &Map<String, Value>) -> &'a SchemaNode {
        match &self.condition {
            Some(condition) => {
                let matched = record.get(&condition.field) == Some(&condition.is);
                let branch = if matched {
                    &condition.then
                } else {
                    &condition.otherwise
                };
                branch.resolve(record)
            }
            None => self,
        }
    }
}

/// Record-shaped aggregate of per-field schemas.
///
/// Built once per invocation of the schema builder and immutable
/// thereafter; never cached or reused across builds.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    fields: Vec<(String, SchemaNode)>,
}

impl RecordSchema {
    pub fn new(fields: Vec<(String, SchemaNode)>) -> Self {
        Self { fields }
    }

    /// The schema for one named field, if declared.
    pub fn field(&self, name: &str) -> Option<&SchemaNode> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, node)| node)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub(crate) fn fields(&self) -> &[(String, SchemaNode)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// The constraint surface each kind exposes, by declaration name.
///
/// This is the static capability set the method applicator checks before
/// dispatching a declared constraint.
pub fn capabilities(kind: PrimitiveType) -> &'static [&'static str] {
    match kind {
        PrimitiveType::Mixed | PrimitiveType::Boolean => {
            &["required", "nullable", "oneOf", "notOneOf", "when"]
        }
        PrimitiveType::String => &[
            "required",
            "nullable",
            "oneOf",
            "notOneOf",
            "when",
            "min",
            "max",
            "length",
            "matches",
            "email",
            "url",
            "trim",
            "lowercase",
            "uppercase",
        ],
        PrimitiveType::Number => &[
            "required",
            "nullable",
            "oneOf",
            "notOneOf",
            "when",
            "min",
            "max",
            "lessThan",
            "moreThan",
            "positive",
            "negative",
            "integer",
        ],
        PrimitiveType::Date => &[
            "required", "nullable", "oneOf", "notOneOf", "when", "min", "max",
        ],
        PrimitiveType::Array => &[
            "required", "nullable", "oneOf", "notOneOf", "when", "min", "max", "length", "of",
        ],
        PrimitiveType::Object => &[
            "required",
            "nullable",
            "oneOf",
            "notOneOf",
            "when",
            "shape",
            "noUnknown",
        ],
    }
}

/// Strict kind membership for a present value.
fn kind_matches(kind: PrimitiveType, value: &Value) -> bool {
    match kind {
        PrimitiveType::Array => value.is_array(),
        PrimitiveType::Boolean => value.is_boolean(),
        PrimitiveType::Date => value
            .as_str()
            .is_some_and(|text| parse_date(text).is_some()),
        PrimitiveType::Mixed => true,
        PrimitiveType::Number => value.is_number(),
        PrimitiveType::Object => value.is_object(),
        PrimitiveType::String => value.is_string(),
    }
}

/// Parses an accepted date rendering: RFC 3339, `YYYY-MM-DDTHH:MM:SS`,
/// or a bare `YYYY-MM-DD` (midnight).
pub(crate) fn parse_date(text: &str) -> Option<NaiveDateTime> {
    if let Ok(stamped) = DateTime::parse_from_rfc3339(text) {
        return Some(stamped.naive_utc());
    }
    if let Ok(stamped) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(stamped);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
