// crates/form-core/tests/attribute_set.rs
// ============================================================================
// Module: Attribute Set Tests
// Description: Tests for copy-on-write attribute collections and fields.
// Purpose: Ensure uniqueness, allow-lists, and receiver immutability hold.
// Dependencies: form-core, serde_json
// ============================================================================
//! ## Overview
//! Exercises [`form_core::AttributeSet`] mutators and lookups, attribute
//! parsing through the registry, and the field helpers built on top.

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

use form_core::Attribute;
use form_core::AttributeError;
use form_core::AttributeKind;
use form_core::AttributeRegistry;
use form_core::AttributeSet;
use form_core::AttributeSetError;
use form_core::Field;
use form_core::FieldBuilder;
use form_core::FieldName;
use form_core::FieldSet;
use form_core::FieldType;
use serde_json::json;

// ============================================================================
// SECTION: Copy-On-Write Mutators
// ============================================================================

#[test]
fn add_returns_new_set_and_leaves_receiver_untouched() {
    let base = AttributeSet::new();
    let next = base.add(Attribute::Label("Email".to_string())).expect("add label");
    assert!(base.is_empty());
    assert_eq!(next.len(), 1);
    assert_eq!(next.find(AttributeKind::Label), Some(&Attribute::Label("Email".to_string())));
}

#[test]
fn add_rejects_duplicate_names() {
    let set = AttributeSet::new().add(Attribute::MinLength(1)).expect("first add");
    let err = set.add(Attribute::MinLength(2)).expect_err("duplicate");
    assert_eq!(err, AttributeSetError::DuplicateAttribute(AttributeKind::MinLength));
    assert_eq!(set.find(AttributeKind::MinLength), Some(&Attribute::MinLength(1)));
}

#[test]
fn set_replaces_in_place_and_keeps_position() {
    let set = AttributeSet::new()
        .add(Attribute::Label("a".to_string()))
        .and_then(|set| set.add(Attribute::MinLength(1)))
        .and_then(|set| set.add(Attribute::MaxLength(5)))
        .expect("seed set");
    let updated = set.set(Attribute::MinLength(3)).expect("set min_length");
    assert_eq!(
        updated.kinds(),
        vec![AttributeKind::Label, AttributeKind::MinLength, AttributeKind::MaxLength]
    );
    assert_eq!(updated.get(AttributeKind::MinLength), Ok(&Attribute::MinLength(3)));
    assert_eq!(set.get(AttributeKind::MinLength), Ok(&Attribute::MinLength(1)));
}

#[test]
fn allow_list_rejects_other_kinds_but_keeps_always_allowed() {
    let set = AttributeSet::with_allowed([AttributeKind::Label]);
    assert!(set.is_allowed(AttributeKind::Label));
    assert!(set.is_allowed(AttributeKind::Value));
    assert!(set.is_allowed(AttributeKind::Optional));
    assert!(!set.is_allowed(AttributeKind::Min));

    let err = set.add(Attribute::Min(7.into())).expect_err("min not allowed");
    assert_eq!(err, AttributeSetError::AttributeNotAllowed(AttributeKind::Min));
    let with_value = set.add(Attribute::Value(json!(3))).expect("value always allowed");
    assert!(with_value.contains(AttributeKind::Value));
}

#[test]
fn from_attributes_enforces_both_invariants() {
    let duplicate = AttributeSet::from_attributes(
        [Attribute::Optional(true), Attribute::Optional(false)],
        None,
    );
    assert_eq!(duplicate, Err(AttributeSetError::DuplicateAttribute(AttributeKind::Optional)));

    let restricted = AttributeSet::from_attributes(
        [Attribute::Pattern(form_core::Pattern::new("a+").expect("pattern"))],
        Some(FieldType::Number.allowed_kinds()),
    );
    assert_eq!(restricted, Err(AttributeSetError::AttributeNotAllowed(AttributeKind::Pattern)));
}

#[test]
fn remove_is_noop_when_absent() {
    let set = AttributeSet::new().add(Attribute::Optional(true)).expect("add optional");
    assert_eq!(set.remove(AttributeKind::Label), set);
    assert!(set.remove(AttributeKind::Optional).is_empty());
}

#[test]
fn merge_overrides_by_name_and_appends_new_kinds() {
    let left = AttributeSet::new()
        .add(Attribute::Label("left".to_string()))
        .and_then(|set| set.add(Attribute::Optional(false)))
        .expect("left");
    let right = AttributeSet::new()
        .add(Attribute::Optional(true))
        .and_then(|set| set.add(Attribute::Description("d".to_string())))
        .expect("right");
    let merged = left.merge(&right).expect("merge");
    assert_eq!(
        merged.kinds(),
        vec![AttributeKind::Label, AttributeKind::Optional, AttributeKind::Description]
    );
    assert_eq!(merged.find(AttributeKind::Optional), Some(&Attribute::Optional(true)));

    let narrow = AttributeSet::with_allowed([AttributeKind::Label]);
    assert_eq!(
        narrow.merge(&right),
        Err(AttributeSetError::AttributeNotAllowed(AttributeKind::Description))
    );
}

#[test]
fn filter_keeps_allow_list() {
    let set = AttributeSet::with_allowed([AttributeKind::Label, AttributeKind::MinLength])
        .add(Attribute::Label("x".to_string()))
        .and_then(|set| set.add(Attribute::MinLength(2)))
        .expect("seed");
    let constraints = set.filter(Attribute::is_constraint);
    assert_eq!(constraints.kinds(), vec![AttributeKind::MinLength]);
    assert_eq!(constraints.allowed(), set.allowed());
}

#[test]
fn lookups_by_name_report_missing_attributes() {
    let set = AttributeSet::new().add(Attribute::MaxLength(9)).expect("add");
    assert_eq!(set.find_by_name("max_length"), Some(&Attribute::MaxLength(9)));
    assert_eq!(set.get_by_name("label"), Err(AttributeSetError::AttributeNotFound("label".to_string())));
    assert_eq!(set.iter().count(), 1);
}

// ============================================================================
// SECTION: Attribute Parsing
// ============================================================================

#[test]
fn registry_parses_known_keys_and_rejects_unknown() {
    let registry = AttributeRegistry::standard();
    assert_eq!(registry.parse("min_length", &json!(3)), Ok(Attribute::MinLength(3)));
    assert_eq!(
        registry.parse("colour", &json!("red")),
        Err(AttributeError::UnknownAttribute("colour".to_string()))
    );
    assert!(matches!(
        registry.parse("min_length", &json!(-1)),
        Err(AttributeError::InvalidValue {
            attribute: AttributeKind::MinLength,
            ..
        })
    ));
}

#[test]
fn restricted_registry_keeps_always_allowed_and_aliases() {
    let registry = AttributeRegistry::restricted([AttributeKind::Label])
        .with_alias("title", AttributeKind::Label);
    assert!(registry.contains("value"));
    assert!(registry.contains("title"));
    assert!(!registry.contains("pattern"));
    assert_eq!(registry.lookup("title"), Some(AttributeKind::Label));
}

#[test]
fn patterns_match_whole_strings() {
    let pattern = form_core::Pattern::new("[a-z]+").expect("pattern");
    assert!(pattern.is_match("abc"));
    assert!(!pattern.is_match("abc1"));
    assert!(!pattern.is_match("1abc"));
    assert_eq!(pattern.as_str(), "[a-z]+");
}

// ============================================================================
// SECTION: Fields
// ============================================================================

#[test]
fn new_field_is_seeded_and_required() {
    let field = Field::new("age", FieldType::Integer);
    assert_eq!(field.name(), &FieldName::new("age"));
    assert_eq!(field.value(), &json!(null));
    assert!(field.is_required());
    assert_eq!(
        field.attributes().kinds(),
        vec![AttributeKind::Name, AttributeKind::Type, AttributeKind::Value, AttributeKind::Optional]
    );
}

#[test]
fn field_rejects_constraints_illegal_for_its_type() {
    let err = FieldBuilder::new("flag", FieldType::Boolean)
        .attribute(Attribute::MinLength(1))
        .build()
        .expect_err("min_length on boolean");
    assert_eq!(err, AttributeSetError::AttributeNotAllowed(AttributeKind::MinLength));
}

#[test]
fn field_identity_attributes_cannot_be_replaced() {
    let field = Field::new("age", FieldType::Integer);
    assert_eq!(
        field.with_attribute(Attribute::Type(FieldType::Text)),
        Err(AttributeSetError::DuplicateAttribute(AttributeKind::Type))
    );
    let updated = field.with_attribute(Attribute::Min(18.into())).expect("min");
    assert_eq!(updated.constraints().count(), 1);
    assert_eq!(field.constraints().count(), 0);
}

#[test]
fn field_set_rejects_duplicate_names() {
    let mut fields = FieldSet::new();
    fields.insert(Field::new("a", FieldType::Text)).expect("insert a");
    assert_eq!(fields.insert(Field::new("a", FieldType::Number)), Err(FieldName::new("a")));
    assert!(fields.replace(Field::new("a", FieldType::Number).with_optional(true)));
    assert!(fields.get("a").is_some_and(Field::is_optional));
    assert!(!fields.replace(Field::new("b", FieldType::Text)));
    assert_eq!(fields.len(), 1);
}
