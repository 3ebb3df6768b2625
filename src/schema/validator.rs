//! Record validation: type checks, coercion, and constraint evaluation.
//!
//! Semantics:
//! - An absent value passes unless the node is required; explicit null
//!   passes only on nullable nodes.
//! - Type checking coerces where a faithful conversion exists (number
//!   from numeric string, boolean from "true"/"false", date from an
//!   ISO-8601 string, string from scalars); the coerced record is
//!   returned on success.
//! - Constraints are evaluated in application order after coercion.
//! - Conditional nodes resolve against the sibling's raw value before
//!   any check runs.
//! - Validation never mutates its input.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::config::PrimitiveType;

use super::errors::{Issue, ValidateResult, ValidationError};
use super::types::{parse_date, Constraint, RecordSchema, SchemaNode};

/// Options controlling a validation pass.
#[derive(Debug, Clone, Copy)]
pub struct ValidateOptions {
    /// Stop at the first failure instead of collecting every issue
    pub abort_early: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self { abort_early: true }
    }
}

impl ValidateOptions {
    /// Collect every issue instead of stopping at the first.
    pub fn collect_all() -> Self {
        Self { abort_early: false }
    }
}

impl RecordSchema {
    /// Validates a candidate value against the record schema.
    ///
    /// Returns the (possibly coerced) record on success. An absent or
    /// null candidate is validated as the empty record. Undeclared keys
    /// pass through untouched.
    pub fn validate(&self, value: &Value, options: ValidateOptions) -> ValidateResult<Value> {
        let empty = Map::new();
        let record = match value {
            Value::Null => &empty,
            Value::Object(map) => map,
            other => {
                return Err(ValidationError::single(Issue::type_mismatch(
                    "$root",
                    "object",
                    json_type_name(other),
                )));
            }
        };

        let mut issues = Vec::new();
        let mut output = record.clone();

        for (name, node) in self.fields() {
            if let Some(coerced) =
                check_node(node, record.get(name.as_str()), record, name, &mut issues)
            {
                output.insert(name.clone(), coerced);
            }
            if options.abort_early && !issues.is_empty() {
                break;
            }
        }

        if issues.is_empty() {
            Ok(Value::Object(output))
        } else if options.abort_early {
            Err(ValidationError::single(issues.swap_remove(0)))
        } else {
            Err(ValidationError::new(issues))
        }
    }

    /// True iff the candidate passes validation.
    pub fn is_valid(&self, value: &Value) -> bool {
        self.validate(value, ValidateOptions::default()).is_ok()
    }
}

/// Validates one node against its (possibly absent) value, pushing every
/// discovered issue. Returns the coerced value when it is usable.
fn check_node(
    node: &SchemaNode,
    value: Option<&Value>,
    record: &Map<String, Value>,
    path: &str,
    issues: &mut Vec<Issue>,
) -> Option<Value> {
    let node = node.resolve(record);

    let value = match value {
        None => {
            if node.is_required() {
                issues.push(Issue::missing_field(path));
            }
            return None;
        }
        Some(Value::Null) => {
            if node.is_nullable() {
                return Some(Value::Null);
            }
            issues.push(Issue::null_value(path));
            return None;
        }
        Some(value) => value,
    };

    let mut coerced = match coerce(node.kind(), value) {
        Some(coerced) => coerced,
        None => {
            issues.push(Issue::type_mismatch(
                path,
                node.kind().name(),
                json_type_name(value),
            ));
            return None;
        }
    };

    let before = issues.len();
    for constraint in node.constraints() {
        check_constraint(constraint, node, &mut coerced, record, path, issues);
    }

    if issues.len() > before {
        return None;
    }
    Some(coerced)
}

/// Evaluates one constraint against the coerced value, applying
/// transforms in place.
fn check_constraint(
    constraint: &Constraint,
    node: &SchemaNode,
    value: &mut Value,
    record: &Map<String, Value>,
    path: &str,
    issues: &mut Vec<Issue>,
) {
    match constraint {
        Constraint::MinLength(min) => {
            if let Some(len) = measure(value) {
                if len < *min {
                    issues.push(Issue::violation(
                        path,
                        format!("expected length of at least {}, got {}", min, len),
                    ));
                }
            }
        }
        Constraint::MaxLength(max) => {
            if let Some(len) = measure(value) {
                if len > *max {
                    issues.push(Issue::violation(
                        path,
                        format!("expected length of at most {}, got {}", max, len),
                    ));
                }
            }
        }
        Constraint::Length(exact) => {
            if let Some(len) = measure(value) {
                if len != *exact {
                    issues.push(Issue::violation(
                        path,
                        format!("expected length of exactly {}, got {}", exact, len),
                    ));
                }
            }
        }
        Constraint::Matches(pattern) => {
            if let Value::String(text) = value {
                if !pattern.is_match(text) {
                    issues.push(Issue::violation(
                        path,
                        format!("expected value matching pattern '{}'", pattern.as_str()),
                    ));
                }
            }
        }
        Constraint::Email => {
            if let Value::String(text) = value {
                if !email_pattern().is_match(text) {
                    issues.push(Issue::violation(
                        path,
                        format!("expected a valid email address, got '{}'", text),
                    ));
                }
            }
        }
        Constraint::Url => {
            if let Value::String(text) = value {
                if !url_pattern().is_match(text) {
                    issues.push(Issue::violation(
                        path,
                        format!("expected a valid URL, got '{}'", text),
                    ));
                }
            }
        }
        Constraint::Trim => {
            if let Value::String(text) = value {
                *value = Value::String(text.trim().to_string());
            }
        }
        Constraint::Lowercase => {
            if let Value::String(text) = value {
                *value = Value::String(text.to_lowercase());
            }
        }
        Constraint::Uppercase => {
            if let Value::String(text) = value {
                *value = Value::String(text.to_uppercase());
            }
        }
        Constraint::MinNumber(min) => {
            if let Some(number) = value.as_f64() {
                if number < *min {
                    issues.push(Issue::violation(
                        path,
                        format!("expected at least {}, got {}", min, number),
                    ));
                }
            }
        }
        Constraint::MaxNumber(max) => {
            if let Some(number) = value.as_f64() {
                if number > *max {
                    issues.push(Issue::violation(
                        path,
                        format!("expected at most {}, got {}", max, number),
                    ));
                }
            }
        }
        Constraint::LessThan(limit) => {
            if let Some(number) = value.as_f64() {
                if number >= *limit {
                    issues.push(Issue::violation(
                        path,
                        format!("expected a value less than {}, got {}", limit, number),
                    ));
                }
            }
        }
        Constraint::MoreThan(limit) => {
            if let Some(number) = value.as_f64() {
                if number <= *limit {
                    issues.push(Issue::violation(
                        path,
                        format!("expected a value more than {}, got {}", limit, number),
                    ));
                }
            }
        }
        Constraint::Positive => {
            if let Some(number) = value.as_f64() {
                if number <= 0.0 {
                    issues.push(Issue::violation(
                        path,
                        format!("expected a positive number, got {}", number),
                    ));
                }
            }
        }
        Constraint::Negative => {
            if let Some(number) = value.as_f64() {
                if number >= 0.0 {
                    issues.push(Issue::violation(
                        path,
                        format!("expected a negative number, got {}", number),
                    ));
                }
            }
        }
        Constraint::Integer => {
            if let Some(number) = value.as_f64() {
                if number.fract() != 0.0 {
                    issues.push(Issue::violation(
                        path,
                        format!("expected an integer, got {}", number),
                    ));
                }
            }
        }
        Constraint::MinDate(min) => {
            if let Some(stamp) = value.as_str().and_then(parse_date) {
                if stamp < *min {
                    issues.push(Issue::violation(
                        path,
                        format!("expected a date on or after {}, got {}", min, stamp),
                    ));
                }
            }
        }
        Constraint::MaxDate(max) => {
            if let Some(stamp) = value.as_str().and_then(parse_date) {
                if stamp > *max {
                    issues.push(Issue::violation(
                        path,
                        format!("expected a date on or before {}, got {}", max, stamp),
                    ));
                }
            }
        }
        Constraint::OneOf(allowed) => {
            if !allowed.contains(value) {
                issues.push(Issue::violation(
                    path,
                    format!("expected one of [{}], got {}", render_list(allowed), value),
                ));
            }
        }
        Constraint::NotOneOf(banned) => {
            if banned.contains(value) {
                issues.push(Issue::violation(
                    path,
                    format!("expected none of [{}], got {}", render_list(banned), value),
                ));
            }
        }
        Constraint::Of(element) => {
            if let Value::Array(items) = value {
                for (index, item) in items.iter_mut().enumerate() {
                    let child = format!("{}[{}]", path, index);
                    let current = item.clone();
                    if let Some(coerced) =
                        check_node(element, Some(&current), record, &child, issues)
                    {
                        *item = coerced;
                    }
                }
            }
        }
        Constraint::Shape(fields) => {
            if let Value::Object(map) = value {
                // conditions inside the shape resolve against the nested object
                let snapshot = map.clone();
                for (name, sub) in fields {
                    let child = make_path(path, name);
                    if let Some(coerced) =
                        check_node(sub, snapshot.get(name), &snapshot, &child, issues)
                    {
                        map.insert(name.clone(), coerced);
                    }
                }
            }
        }
        Constraint::NoUnknown => {
            if let Value::Object(map) = value {
                let declared: Vec<&str> = node
                    .constraints()
                    .iter()
                    .filter_map(|constraint| match constraint {
                        Constraint::Shape(fields) => {
                            Some(fields.iter().map(|(name, _)| name.as_str()))
                        }
                        _ => None,
                    })
                    .flatten()
                    .collect();
                for key in map.keys() {
                    if !declared.contains(&key.as_str()) {
                        issues.push(Issue::extra_field(make_path(path, key)));
                    }
                }
            }
        }
    }
}

/// Checks kind membership and produces the coerced value, or `None` on a
/// type mismatch.
fn coerce(kind: PrimitiveType, value: &Value) -> Option<Value> {
    match kind {
        PrimitiveType::Mixed => Some(value.clone()),
        PrimitiveType::String => match value {
            Value::String(_) => Some(value.clone()),
            Value::Number(number) => Some(Value::String(number.to_string())),
            Value::Bool(flag) => Some(Value::String(flag.to_string())),
            _ => None,
        },
        PrimitiveType::Number => match value {
            Value::Number(_) => Some(value.clone()),
            Value::String(text) => {
                let text = text.trim();
                if let Ok(int) = text.parse::<i64>() {
                    Some(Value::Number(int.into()))
                } else {
                    text.parse::<f64>()
                        .ok()
                        .and_then(serde_json::Number::from_f64)
                        .map(Value::Number)
                }
            }
            _ => None,
        },
        PrimitiveType::Boolean => match value {
            Value::Bool(_) => Some(value.clone()),
            Value::String(text) => match text.as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            _ => None,
        },
        PrimitiveType::Date => match value {
            Value::String(text) => parse_date(text).map(|_| value.clone()),
            _ => None,
        },
        PrimitiveType::Array => value.is_array().then(|| value.clone()),
        PrimitiveType::Object => value.is_object().then(|| value.clone()),
    }
}

/// Returns the JSON kind name of a value for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Length of a sized value (string characters or array elements).
fn measure(value: &Value) -> Option<usize> {
    match value {
        Value::String(text) => Some(text.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Joins a field path from prefix and child name.
fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

fn render_list(values: &[Value]) -> String {
    values
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static email pattern compiles")
    })
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^https?://\S+$").expect("static URL pattern compiles"))
}
