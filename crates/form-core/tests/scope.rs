// crates/form-core/tests/scope.rs
// ============================================================================
// Module: Scope Tests
// Description: Tests for scope parsing, display, and resolution.
// Purpose: Ensure paths address fields, attributes, and raw values exactly.
// Dependencies: form-core, serde_json
// ============================================================================
//! ## Overview
//! Covers the three scope shapes, malformed paths, and the segment reported
//! when resolution fails.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use form_core::AttributeKind;
use form_core::ResolvedTarget;
use form_core::Scope;
use form_core::ScopeError;
use serde_json::json;
use support::contact_schema;
use support::input;

// ============================================================================
// SECTION: Parsing
// ============================================================================

#[test]
fn parses_each_scope_shape() {
    let field = Scope::parse("#/fields/email").expect("field scope");
    assert!(field.is_field());
    assert_eq!(field.field_name().as_str(), "email");

    let attribute = Scope::parse("#/fields/email/value").expect("attribute scope");
    assert_eq!(attribute.attribute_name(), Some("value"));
    assert!(!attribute.unwraps_value());

    let value = Scope::parse("#/fields/email/default_value/value").expect("value scope");
    assert_eq!(value.attribute_name(), Some("default_value"));
    assert!(value.unwraps_value());
    assert_eq!(value.to_string(), "#/fields/email/default_value/value");
}

#[test]
fn rejects_malformed_paths() {
    for text in [
        "fields/email",
        "#/fields/",
        "#/fields//value",
        "#/fields/email/value/raw",
        "#/fields/email/value/value/value",
    ] {
        assert!(
            matches!(Scope::parse(text), Err(ScopeError::Malformed { .. })),
            "expected malformed: {text}"
        );
    }
}

#[test]
fn scopes_serialize_as_path_strings() {
    let scope = Scope::attribute("age", "min");
    let json = serde_json::to_string(&scope).expect("serialize");
    assert_eq!(json, "\"#/fields/age/min\"");
    let decoded: Scope = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, scope);
    assert!(serde_json::from_str::<Scope>("\"#/people/age\"").is_err());
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

#[test]
fn resolves_targets_against_current_state() {
    let mut schema = contact_schema().build().expect("schema");
    schema.input(&input(json!({"email_address": "a@b.c"}))).expect("input");

    let target = schema.traverse(&Scope::field("email_address")).expect("field");
    assert!(matches!(target, ResolvedTarget::Field(_)));
    assert_eq!(target.value()["value"], json!("a@b.c"));

    let target = schema.traverse(&Scope::attribute("email_address", "value")).expect("attribute");
    assert_eq!(target.value(), json!("a@b.c"));
    assert_eq!(target.field().name().as_str(), "email_address");

    let target = schema.traverse(&Scope::value("contact_method", "default_value")).expect("value");
    assert!(matches!(target, ResolvedTarget::Value { .. }));
    assert_eq!(target.value(), json!("email"));
    assert_eq!(target.scope(), Scope::value("contact_method", "default_value"));
}

#[test]
fn child_descends_one_segment() {
    let schema = contact_schema().build().expect("schema");
    let field = schema.traverse(&Scope::field("phone_number")).expect("field");
    let pattern = field.child(AttributeKind::Pattern.as_str()).expect("pattern attribute");
    assert_eq!(pattern.scope(), Scope::attribute("phone_number", "pattern"));
    let raw = pattern.child("value").expect("raw pattern");
    assert_eq!(raw.value(), json!(r"\+?[0-9 ]+"));
}

#[test]
fn unresolved_segments_are_reported() {
    let schema = contact_schema().build().expect("schema");
    assert_eq!(
        schema.traverse(&Scope::field("fax")),
        Err(ScopeError::NotFound {
            scope: "#/fields/fax".to_string(),
            segment: "fax".to_string(),
        })
    );
    assert_eq!(
        schema.traverse(&Scope::value("email_address", "label")),
        Err(ScopeError::NotFound {
            scope: "#/fields/email_address/label/value".to_string(),
            segment: "label".to_string(),
        })
    );
}
