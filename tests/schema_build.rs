//! End-to-end schema build and validation tests
//!
//! Covers the full pipeline: raw declarations -> normalized config ->
//! instantiated types -> constrained field schemas -> aggregate record
//! validation, including the conditional construct and the catalog.

use serde_json::{json, Map, Value};

use schemaforge::{build_schema, BuildError, SchemaCatalog, ValidateOptions};

// =============================================================================
// Helper Functions
// =============================================================================

fn fields(declaration: Value) -> Map<String, Value> {
    declaration.as_object().cloned().unwrap()
}

fn user_declaration() -> Map<String, Value> {
    fields(json!({
        "id": {"type": "number", "positive": true},
        "username": {"type": "string", "required": true, "min": 8, "max": 12},
        "password": {"type": "string", "required": true, "matches": "^[A-Za-z0-9!@#$%^&*]{8,}$"},
        "active": {"type": "boolean"},
        "created": {"type": "date", "min": "2020-04-15", "max": "2020-04-20"},
        "tags": {"type": "array", "min": 3},
    }))
}

// =============================================================================
// Round Trip
// =============================================================================

/// A value satisfying every declared constraint validates to itself.
#[test]
fn test_round_trip_identity_on_success() {
    let schema = build_schema(&user_declaration()).unwrap();

    let candidate = json!({
        "id": 6,
        "username": "petar1983",
        "password": "Test1234!",
        "active": true,
        "created": "2020-04-17",
        "tags": ["javascript", "html", "css"],
    });

    let validated = schema
        .validate(&candidate, ValidateOptions::collect_all())
        .unwrap();
    assert_eq!(validated, candidate);
}

/// Collect-all validation enumerates every violated field, not just the
/// first.
#[test]
fn test_collect_all_enumerates_every_violation() {
    let schema = build_schema(&user_declaration()).unwrap();

    let candidate = json!({
        "id": -1,
        "username": "petar",
        "password": "Test1234!",
        "active": true,
        "created": "2020-04-21",
        "tags": ["javascript", "html"],
    });

    let err = schema
        .validate(&candidate, ValidateOptions::collect_all())
        .unwrap_err();
    assert_eq!(err.paths(), vec!["id", "username", "created", "tags"]);

    // abort-early reports only the first violation
    let err = schema
        .validate(&candidate, ValidateOptions::default())
        .unwrap_err();
    assert_eq!(err.issue_count(), 1);
}

// =============================================================================
// Build Failures
// =============================================================================

#[test]
fn test_unknown_type_aborts_the_build() {
    let err = build_schema(&fields(json!({
        "username": "string",
        "password": "password",
    })))
    .unwrap_err();
    assert_eq!(err.to_string(), "Type password is not valid type.");
}

#[test]
fn test_unknown_method_aborts_the_build() {
    let err = build_schema(&fields(json!({
        "password": {"type": "string", "required": true, "min": 3, "max": 5, "password": true},
    })))
    .unwrap_err();
    assert_eq!(err.to_string(), "Invalid method password on string type");
}

#[test]
fn test_invalid_declaration_shape_aborts_the_build() {
    let err = build_schema(&fields(json!({"broken": []}))).unwrap_err();
    assert_eq!(err.to_string(), "Invalid configuration ()");

    let err = build_schema(&fields(json!({"broken": true}))).unwrap_err();
    assert_eq!(err.to_string(), "Invalid configuration (true)");
}

// =============================================================================
// Boolean-Flag Convention
// =============================================================================

/// A constraint declared with `false` behaves as if never declared.
#[test]
fn test_false_flag_is_a_strict_noop() {
    let schema = build_schema(&fields(json!({
        "username": {"type": "string", "required": false},
    })))
    .unwrap();

    assert!(schema.is_valid(&json!({})));
    assert!(schema.is_valid(&Value::Null));
    assert!(schema.is_valid(&json!({"username": "petar"})));
}

// =============================================================================
// Conditional Construct
// =============================================================================

fn conditional_declaration() -> Map<String, Value> {
    fields(json!({
        "active": {"type": "boolean", "required": true},
        "username": {
            "type": "mixed",
            "when": {
                "active": {
                    "is": true,
                    "then": {"type": "string", "required": true},
                    "otherwise": {"type": "string"},
                },
            },
        },
    }))
}

#[test]
fn test_conditional_branch_selection() {
    let schema = build_schema(&conditional_declaration()).unwrap();

    assert!(schema.is_valid(&json!({"active": true, "username": "petar"})));
    assert!(schema.is_valid(&json!({"active": false})));
    assert!(!schema.is_valid(&json!({"active": true})));
}

/// Each missing conditional property raises its own specific error at
/// build time, before any value is validated.
#[test]
fn test_conditional_build_errors_are_specific() {
    let missing_is = fields(json!({
        "username": {"type": "mixed", "when": {"active": {
            "then": {"type": "string", "required": true},
            "otherwise": {"type": "string"},
        }}},
    }));
    let err = build_schema(&missing_is).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid configuration, property \"is\" is required in \"when\" method"
    );

    let missing_then = fields(json!({
        "username": {"type": "mixed", "when": {"active": {
            "is": true,
            "otherwise": {"type": "string"},
        }}},
    }));
    let err = build_schema(&missing_then).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid configuration, property \"then\" is required in \"when\" method"
    );

    let missing_otherwise = fields(json!({
        "username": {"type": "mixed", "when": {"active": {
            "is": true,
            "then": {"type": "string", "required": true},
        }}},
    }));
    let err = build_schema(&missing_otherwise).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid configuration, property \"otherwise\" is required in \"when\" method"
    );
}

// =============================================================================
// Nested Declarations
// =============================================================================

#[test]
fn test_shape_enforces_nested_declarations() {
    let schema = build_schema(&fields(json!({
        "location": {
            "type": "object",
            "shape": {
                "address": {"type": "string"},
                "latitude": {"type": "number", "required": true},
                "longitude": {"type": "number", "required": true},
            },
        },
    })))
    .unwrap();

    assert!(schema.is_valid(&json!({
        "location": {
            "address": "Trg republike 1",
            "latitude": 44.8167441,
            "longitude": 20.4577252,
        },
    })));
    assert!(schema.is_valid(&json!({
        "location": {"latitude": 44.8167441, "longitude": 20.4577252},
    })));

    let err = schema
        .validate(
            &json!({"location": {"longitude": 20.4577252}}),
            ValidateOptions::default(),
        )
        .unwrap_err();
    assert_eq!(err.issues()[0].path, "location.latitude");
}

#[test]
fn test_of_enforces_element_declarations() {
    let schema = build_schema(&fields(json!({
        "scores": {"type": "array", "of": {"type": "number", "min": 0, "max": 100}},
    })))
    .unwrap();

    assert!(schema.is_valid(&json!({"scores": [90, 75, 100]})));

    let err = schema
        .validate(
            &json!({"scores": [90, 175, 100]}),
            ValidateOptions::default(),
        )
        .unwrap_err();
    assert_eq!(err.issues()[0].path, "scores[1]");
}

#[test]
fn test_no_unknown_rejects_undeclared_nested_keys() {
    let schema = build_schema(&fields(json!({
        "location": {
            "type": "object",
            "shape": {"city": {"type": "string"}},
            "noUnknown": true,
        },
    })))
    .unwrap();

    assert!(schema.is_valid(&json!({"location": {"city": "Beograd"}})));
    assert!(!schema.is_valid(&json!({"location": {"city": "Beograd", "zip": "11000"}})));
}

// =============================================================================
// Coercion
// =============================================================================

#[test]
fn test_scalar_coercion_per_kind() {
    let schema = build_schema(&fields(json!({
        "id": "number",
        "active": "boolean",
        "created": "date",
    })))
    .unwrap();

    assert!(schema.is_valid(&json!({"id": "1", "active": "false", "created": "2020-04-19"})));
    assert!(!schema.is_valid(&json!({"id": true})));
    assert!(!schema.is_valid(&json!({"active": "qwerty"})));
    assert!(!schema.is_valid(&json!({"created": "qwerty"})));

    let coerced = schema
        .validate(
            &json!({"id": "1", "active": "false"}),
            ValidateOptions::default(),
        )
        .unwrap();
    assert_eq!(coerced, json!({"id": 1, "active": false}));
}

#[test]
fn test_one_of_membership_after_coercion() {
    let schema = build_schema(&fields(json!({
        "active": {"type": "boolean", "oneOf": [true]},
        "kind": {"type": "number", "oneOf": [1, 2, 3]},
    })))
    .unwrap();

    assert!(schema.is_valid(&json!({"active": true, "kind": 1})));
    assert!(schema.is_valid(&json!({"active": "true"})));
    assert!(!schema.is_valid(&json!({"active": false, "kind": 3})));
    assert!(!schema.is_valid(&json!({"active": true, "kind": 4})));
}

// =============================================================================
// Catalog
// =============================================================================

#[test]
fn test_catalog_loads_and_validates() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("users.json"),
        r#"{"username": {"type": "string", "required": true, "min": 3}}"#,
    )
    .unwrap();

    let mut catalog = SchemaCatalog::new(temp_dir.path());
    catalog.load_all().unwrap();

    let users = catalog.get("users").unwrap();
    assert!(users.is_valid(&json!({"username": "petar"})));
    assert!(!users.is_valid(&json!({"username": "pe"})));

    let err = catalog
        .register("users", &fields(json!({"id": "number"})))
        .unwrap_err();
    assert_eq!(err, BuildError::AlreadyRegistered("users".into()));
}
