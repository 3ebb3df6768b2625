//! Raw declaration normalization.

use serde_json::Value;

use super::errors::{BuildError, BuildResult};
use super::types::{CanonicalConfig, Declaration, MethodCall, PrimitiveType};

/// Converts a raw field declaration into its canonical form.
///
/// A bare type name yields a config with no method list; a structured
/// object yields the declared type plus its constraint applications in
/// declaration order, the reserved `type` key excluded. The input is
/// never mutated.
pub fn normalize(declaration: &Value) -> BuildResult<CanonicalConfig> {
    match Declaration::classify(declaration) {
        Declaration::Bare(name) => {
            let kind = PrimitiveType::from_name(name)
                .ok_or_else(|| BuildError::InvalidType(name.to_string()))?;

            Ok(CanonicalConfig {
                kind,
                methods: None,
            })
        }
        Declaration::Structured(map) => {
            let kind = match map.get("type") {
                Some(Value::String(name)) => PrimitiveType::from_name(name)
                    .ok_or_else(|| BuildError::InvalidType(name.clone()))?,
                Some(other) => return Err(BuildError::InvalidType(render_value(other))),
                None => return Err(BuildError::InvalidType("undefined".to_string())),
            };

            let methods = map
                .iter()
                .filter(|(key, _)| key.as_str() != "type")
                .map(|(key, value)| MethodCall {
                    name: key.clone(),
                    args: value.clone(),
                })
                .collect();

            Ok(CanonicalConfig {
                kind,
                methods: Some(methods),
            })
        }
        Declaration::Invalid(value) => {
            Err(BuildError::InvalidConfiguration(render_value(value)))
        }
    }
}

/// Best-effort rendering of an offending value for error messages.
///
/// Scalars render as themselves, null as the empty string, arrays as their
/// comma-joined element renderings (so an empty array renders empty).
pub(crate) fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_type_name() {
        let config = normalize(&json!("string")).unwrap();
        assert_eq!(config.kind, PrimitiveType::String);
        assert!(config.methods.is_none());
    }

    #[test]
    fn test_structured_without_constraints() {
        let config = normalize(&json!({"type": "string"})).unwrap();
        assert_eq!(config.kind, PrimitiveType::String);
        assert_eq!(config.methods, Some(vec![]));
    }

    #[test]
    fn test_methods_preserve_declaration_order() {
        let config = normalize(&json!({
            "type": "string",
            "required": true,
            "min": 3,
            "max": 5,
        }))
        .unwrap();

        assert_eq!(config.kind, PrimitiveType::String);
        assert_eq!(
            config.methods,
            Some(vec![
                MethodCall {
                    name: "required".into(),
                    args: json!(true),
                },
                MethodCall {
                    name: "min".into(),
                    args: json!(3),
                },
                MethodCall {
                    name: "max".into(),
                    args: json!(5),
                },
            ])
        );
    }

    #[test]
    fn test_unknown_bare_type_rejected() {
        let err = normalize(&json!("password")).unwrap_err();
        assert_eq!(err.to_string(), "Type password is not valid type.");
    }

    #[test]
    fn test_missing_type_key_renders_undefined() {
        let err = normalize(&json!({"required": true})).unwrap_err();
        assert_eq!(err.to_string(), "Type undefined is not valid type.");
    }

    #[test]
    fn test_non_string_type_key_rejected() {
        let err = normalize(&json!({"type": 5})).unwrap_err();
        assert_eq!(err.to_string(), "Type 5 is not valid type.");
    }

    #[test]
    fn test_array_declaration_rejected() {
        let err = normalize(&json!([])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid configuration ()");

        let err = normalize(&json!(["string", 1])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid configuration (string,1)");
    }

    #[test]
    fn test_scalar_declarations_rejected() {
        let err = normalize(&json!(true)).unwrap_err();
        assert_eq!(err.to_string(), "Invalid configuration (true)");

        let err = normalize(&json!(42)).unwrap_err();
        assert_eq!(err.to_string(), "Invalid configuration (42)");

        let err = normalize(&Value::Null).unwrap_err();
        assert_eq!(err.to_string(), "Invalid configuration ()");
    }
}
