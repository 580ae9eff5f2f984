// crates/form-core/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared fixtures for form core integration tests.
// ============================================================================
//! ## Overview
//! Builds the contact-form fixture used across suites and offers small JSON
//! input helpers.

#![allow(
    dead_code,
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

use form_core::Attribute;
use form_core::Field;
use form_core::FieldBuilder;
use form_core::FieldPredicate;
use form_core::FieldType;
use form_core::Rule;
use form_core::RuleBuilder;
use form_core::SchemaBuilder;
use form_core::Scope;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

// ========================================================================
// Fixtures
// ========================================================================

/// `contact_method` choice field defaulting to `"email"`.
pub fn contact_method() -> Field {
    FieldBuilder::new("contact_method", FieldType::Choice)
        .default_value(json!("email"))
        .attribute(Attribute::AllowedValues(vec![json!("email"), json!("phone")]))
        .build()
        .expect("contact_method field")
}

/// Required email field.
pub fn email_address() -> Field {
    Field::new("email_address", FieldType::Email)
}

/// Optional phone field with a digits-only pattern.
pub fn phone_number() -> Field {
    FieldBuilder::new("phone_number", FieldType::Text)
        .optional(true)
        .attribute(Attribute::Pattern(
            form_core::Pattern::new(r"\+?[0-9 ]+").expect("phone pattern"),
        ))
        .build()
        .expect("phone_number field")
}

/// When `contact_method` is `"phone"`: phone required, email optional.
pub fn phone_preference_rule() -> Rule {
    RuleBuilder::new()
        .when_leaf(FieldPredicate::equals(
            Scope::attribute("contact_method", "value"),
            json!("phone"),
        ))
        .require(Scope::field("phone_number"))
        .make_optional(Scope::field("email_address"))
        .build()
}

/// Builder for the contact-form schema.
pub fn contact_schema() -> SchemaBuilder {
    SchemaBuilder::new("contact")
        .field(contact_method())
        .field(email_address())
        .field(phone_number())
        .rule(phone_preference_rule())
}

// ========================================================================
// Input Helpers
// ========================================================================

/// Converts a JSON object literal into schema input.
pub fn input(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("input must be an object, got {other}"),
    }
}
