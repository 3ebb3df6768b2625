//! Schema assembly: type instantiation, constraint application, and
//! record-level building.
//!
//! The build pipeline per field is normalize -> instantiate -> apply.
//! Conditional (`when`) branches and nested `shape`/`of` declarations
//! feed back through the same pipeline, so branch declarations are
//! ordinary raw declarations.

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::schema::types::{parse_date, Constraint};
use crate::schema::{capabilities, Condition, RecordSchema, SchemaNode};

use super::errors::{BuildError, BuildResult};
use super::normalize::{normalize, render_value};
use super::types::{CanonicalConfig, MethodCall, PrimitiveType};

/// Creates a fresh, unconstrained validator instance for a canonical
/// configuration. Every call returns an independently owned instance.
pub fn instantiate(config: &CanonicalConfig) -> SchemaNode {
    SchemaNode::new(config.kind)
}

/// Applies declared constraints onto a base instance, in order.
///
/// The capability lookup runs against the base instance's kind (the
/// static capability set), and each application yields a new running
/// instance. The first failure aborts the whole build.
pub fn apply_methods(
    base: SchemaNode,
    type_name: &str,
    methods: &[MethodCall],
) -> BuildResult<SchemaNode> {
    let kind = base.kind();
    let mut node = base;

    for call in methods {
        if !capabilities(kind).contains(&call.name.as_str()) {
            return Err(BuildError::InvalidMethod {
                method: call.name.clone(),
                type_name: type_name.to_string(),
            });
        }

        if call.name == "when" {
            node = node.when(build_condition(type_name, &call.args)?);
            continue;
        }

        node = match &call.args {
            // boolean flag opt-out: the constraint is never applied
            Value::Bool(false) => node,
            Value::Bool(true) => apply_method(node, kind, type_name, &call.name, None)?,
            args => apply_method(node, kind, type_name, &call.name, Some(args))?,
        };
    }

    Ok(node)
}

/// Builds a single field's validator from its raw declaration.
pub fn build_field(declaration: &Value) -> BuildResult<SchemaNode> {
    let config = normalize(declaration)?;
    let node = instantiate(&config);

    match &config.methods {
        Some(methods) => apply_methods(node, config.kind.name(), methods),
        None => Ok(node),
    }
}

/// Builds the aggregate record schema from a field-name -> declaration
/// mapping. Field schemas are independent; the first error aborts the
/// build with no partial aggregate.
pub fn build_schema(fields: &Map<String, Value>) -> BuildResult<RecordSchema> {
    let mut built = Vec::with_capacity(fields.len());

    for (name, declaration) in fields {
        debug!(field = %name, "building field schema");
        built.push((name.clone(), build_field(declaration)?));
    }

    Ok(RecordSchema::new(built))
}

/// Decodes the `when` argument into a conditional branch selection.
///
/// Only the first key of the argument object is inspected; any further
/// keys are ignored. The `is`, `then` and `otherwise` properties are
/// each independently required.
fn build_condition(type_name: &str, args: &Value) -> BuildResult<Condition> {
    let map = args.as_object().ok_or_else(|| {
        invalid_argument(
            "when",
            type_name,
            format!(
                "expected an object keyed by a sibling field name, got {}",
                render_value(args)
            ),
        )
    })?;

    let (field, spec) = map
        .iter()
        .next()
        .ok_or_else(|| invalid_argument("when", type_name, "expected a sibling field name"))?;

    let branches = spec.as_object().ok_or_else(|| {
        invalid_argument(
            "when",
            type_name,
            format!(
                "expected an object with \"is\", \"then\" and \"otherwise\", got {}",
                render_value(spec)
            ),
        )
    })?;

    let is = branches.get("is").ok_or(BuildError::MissingIs)?.clone();
    let then = branches.get("then").ok_or(BuildError::MissingThen)?;
    let otherwise = branches.get("otherwise").ok_or(BuildError::MissingOtherwise)?;

    Ok(Condition::new(
        field.clone(),
        is,
        build_field(then)?,
        build_field(otherwise)?,
    ))
}

/// The typed `(kind, method) -> operation` mapping.
///
/// `args` is `None` when the declaration used the bare `true` flag.
/// Reaching an unmatched arm is prevented by the capability check in
/// [`apply_methods`]; the backstop still reports an invalid method.
fn apply_method(
    node: SchemaNode,
    kind: PrimitiveType,
    type_name: &str,
    method: &str,
    args: Option<&Value>,
) -> BuildResult<SchemaNode> {
    match (kind, method) {
        (_, "required") => {
            flag_only(method, type_name, args)?;
            Ok(node.required())
        }
        (_, "nullable") => {
            flag_only(method, type_name, args)?;
            Ok(node.nullable())
        }
        (_, "oneOf") => Ok(node.constrain(Constraint::OneOf(list_arg(method, type_name, args)?))),
        (_, "notOneOf") => {
            Ok(node.constrain(Constraint::NotOneOf(list_arg(method, type_name, args)?)))
        }

        (PrimitiveType::String | PrimitiveType::Array, "min") => {
            Ok(node.constrain(Constraint::MinLength(size_arg(method, type_name, args)?)))
        }
        (PrimitiveType::String | PrimitiveType::Array, "max") => {
            Ok(node.constrain(Constraint::MaxLength(size_arg(method, type_name, args)?)))
        }
        (PrimitiveType::String | PrimitiveType::Array, "length") => {
            Ok(node.constrain(Constraint::Length(size_arg(method, type_name, args)?)))
        }
        (PrimitiveType::String, "matches") => {
            Ok(node.constrain(Constraint::Matches(pattern_arg(method, type_name, args)?)))
        }
        (PrimitiveType::String, "email") => {
            flag_only(method, type_name, args)?;
            Ok(node.constrain(Constraint::Email))
        }
        (PrimitiveType::String, "url") => {
            flag_only(method, type_name, args)?;
            Ok(node.constrain(Constraint::Url))
        }
        (PrimitiveType::String, "trim") => {
            flag_only(method, type_name, args)?;
            Ok(node.constrain(Constraint::Trim))
        }
        (PrimitiveType::String, "lowercase") => {
            flag_only(method, type_name, args)?;
            Ok(node.constrain(Constraint::Lowercase))
        }
        (PrimitiveType::String, "uppercase") => {
            flag_only(method, type_name, args)?;
            Ok(node.constrain(Constraint::Uppercase))
        }

        (PrimitiveType::Number, "min") => {
            Ok(node.constrain(Constraint::MinNumber(number_arg(method, type_name, args)?)))
        }
        (PrimitiveType::Number, "max") => {
            Ok(node.constrain(Constraint::MaxNumber(number_arg(method, type_name, args)?)))
        }
        (PrimitiveType::Number, "lessThan") => {
            Ok(node.constrain(Constraint::LessThan(number_arg(method, type_name, args)?)))
        }
        (PrimitiveType::Number, "moreThan") => {
            Ok(node.constrain(Constraint::MoreThan(number_arg(method, type_name, args)?)))
        }
        (PrimitiveType::Number, "positive") => {
            flag_only(method, type_name, args)?;
            Ok(node.constrain(Constraint::Positive))
        }
        (PrimitiveType::Number, "negative") => {
            flag_only(method, type_name, args)?;
            Ok(node.constrain(Constraint::Negative))
        }
        (PrimitiveType::Number, "integer") => {
            flag_only(method, type_name, args)?;
            Ok(node.constrain(Constraint::Integer))
        }

        (PrimitiveType::Date, "min") => {
            Ok(node.constrain(Constraint::MinDate(date_arg(method, type_name, args)?)))
        }
        (PrimitiveType::Date, "max") => {
            Ok(node.constrain(Constraint::MaxDate(date_arg(method, type_name, args)?)))
        }

        (PrimitiveType::Array, "of") => {
            let declaration = args.ok_or_else(|| {
                invalid_argument(method, type_name, "expected an element declaration")
            })?;
            Ok(node.constrain(Constraint::Of(Box::new(build_field(declaration)?))))
        }

        (PrimitiveType::Object, "shape") => {
            Ok(node.constrain(Constraint::Shape(shape_arg(method, type_name, args)?)))
        }
        (PrimitiveType::Object, "noUnknown") => {
            flag_only(method, type_name, args)?;
            Ok(node.constrain(Constraint::NoUnknown))
        }

        _ => Err(BuildError::InvalidMethod {
            method: method.to_string(),
            type_name: type_name.to_string(),
        }),
    }
}

fn invalid_argument(method: &str, type_name: &str, reason: impl Into<String>) -> BuildError {
    BuildError::InvalidArgument {
        method: method.to_string(),
        type_name: type_name.to_string(),
        reason: reason.into(),
    }
}

/// Flag-only methods take no argument beyond the `true` opt-in.
fn flag_only(method: &str, type_name: &str, args: Option<&Value>) -> BuildResult<()> {
    match args {
        None => Ok(()),
        Some(value) => Err(invalid_argument(
            method,
            type_name,
            format!("expected a boolean flag, got {}", render_value(value)),
        )),
    }
}

fn number_arg(method: &str, type_name: &str, args: Option<&Value>) -> BuildResult<f64> {
    args.and_then(Value::as_f64)
        .ok_or_else(|| invalid_argument(method, type_name, "expected a number"))
}

fn size_arg(method: &str, type_name: &str, args: Option<&Value>) -> BuildResult<usize> {
    args.and_then(Value::as_u64)
        .map(|size| size as usize)
        .ok_or_else(|| invalid_argument(method, type_name, "expected a non-negative integer"))
}

fn date_arg(
    method: &str,
    type_name: &str,
    args: Option<&Value>,
) -> BuildResult<chrono::NaiveDateTime> {
    args.and_then(Value::as_str)
        .and_then(parse_date)
        .ok_or_else(|| {
            invalid_argument(
                method,
                type_name,
                "expected a date string (YYYY-MM-DD or RFC 3339)",
            )
        })
}

fn pattern_arg(method: &str, type_name: &str, args: Option<&Value>) -> BuildResult<Regex> {
    let pattern = args
        .and_then(Value::as_str)
        .ok_or_else(|| invalid_argument(method, type_name, "expected a pattern string"))?;

    Regex::new(pattern)
        .map_err(|err| invalid_argument(method, type_name, format!("invalid pattern: {}", err)))
}

fn list_arg(method: &str, type_name: &str, args: Option<&Value>) -> BuildResult<Vec<Value>> {
    args.and_then(Value::as_array)
        .cloned()
        .ok_or_else(|| invalid_argument(method, type_name, "expected an array of values"))
}

fn shape_arg(
    method: &str,
    type_name: &str,
    args: Option<&Value>,
) -> BuildResult<Vec<(String, SchemaNode)>> {
    let fields = args.and_then(Value::as_object).ok_or_else(|| {
        invalid_argument(method, type_name, "expected an object of field declarations")
    })?;

    let mut built = Vec::with_capacity(fields.len());
    for (name, declaration) in fields {
        built.push((name.clone(), build_field(declaration)?));
    }
    Ok(built)
}
