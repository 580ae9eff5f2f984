// crates/form-core/tests/rules.rs
// ============================================================================
// Module: Rule Evaluation Tests
// Description: Tests for rule sets, outcomes, and input handling.
// Purpose: Ensure rules run once, in order, against a fresh state per input.
// Dependencies: form-core, form-logic, serde_json
// ============================================================================
//! ## Overview
//! Exercises the rule engine through [`form_core::Schema::input`]: outcome
//! effects, order dependence, unresolved scope policies, observer events, and
//! the atomicity of a failed input.

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

use std::sync::Arc;

use form_core::EngineConfig;
use form_core::Field;
use form_core::FieldPredicate;
use form_core::FieldSet;
use form_core::FieldType;
use form_core::NoopObserver;
use form_core::ObserverEvent;
use form_core::Outcome;
use form_core::RecordingObserver;
use form_core::Rule;
use form_core::RuleBuilder;
use form_core::RuleEngine;
use form_core::RuleError;
use form_core::RuleSet;
use form_core::Schema;
use form_core::SchemaBuilder;
use form_core::Scope;
use form_core::ScopeError;
use form_core::UnresolvedScopePolicy;
use form_logic::Condition;
use form_logic::LeafErrorPolicy;
use serde_json::json;
use support::contact_schema;
use support::input;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Unconditionally marks `a` optional.
fn relax_a() -> Rule {
    RuleBuilder::new().make_optional(Scope::field("a")).build()
}

/// Requires `a` when `b` equals `"x"`.
fn require_a_when_b() -> Rule {
    RuleBuilder::new()
        .when_leaf(FieldPredicate::equals(Scope::attribute("b", "value"), json!("x")))
        .require(Scope::field("a"))
        .build()
}

/// Two-field schema with the given rules.
fn ordered_schema(rules: Vec<Rule>) -> Schema {
    let mut builder = SchemaBuilder::new("ordered")
        .field(Field::new("a", FieldType::Text))
        .field(Field::new("b", FieldType::Text).with_optional(true));
    for rule in rules {
        builder = builder.rule(rule);
    }
    builder.build().expect("ordered schema")
}

/// Returns whether the named field is optional in the current state.
fn optional(schema: &Schema, name: &str) -> bool {
    schema.field(name).expect("field exists").is_optional()
}

// ============================================================================
// SECTION: Contact Scenario
// ============================================================================

#[test]
fn phone_preference_swaps_requiredness() {
    let mut schema = contact_schema().build().expect("schema");

    schema.input(&input(json!({"contact_method": "phone"}))).expect("phone input");
    assert!(optional(&schema, "email_address"));
    assert!(!optional(&schema, "phone_number"));

    schema.input(&input(json!({}))).expect("empty input");
    assert_eq!(schema.field("contact_method").expect("field").value(), &json!("email"));
    assert!(!optional(&schema, "email_address"));
    assert!(optional(&schema, "phone_number"));
}

#[test]
fn null_input_falls_back_to_default() {
    let mut schema = contact_schema().build().expect("schema");
    schema.input(&input(json!({"contact_method": null}))).expect("input");
    assert_eq!(schema.field("contact_method").expect("field").value(), &json!("email"));
}

#[test]
fn unknown_input_keys_are_ignored() {
    let mut schema = contact_schema().build().expect("schema");
    schema.input(&input(json!({"fax": "123"}))).expect("input");
    assert!(schema.field("fax").is_none());
}

// ============================================================================
// SECTION: Ordering
// ============================================================================

#[test]
fn later_rules_win_over_earlier_rules() {
    let mut relax_first = ordered_schema(vec![relax_a(), require_a_when_b()]);
    relax_first.input(&input(json!({"b": "x"}))).expect("input");
    assert!(!optional(&relax_first, "a"));

    let mut require_first = ordered_schema(vec![require_a_when_b(), relax_a()]);
    require_first.input(&input(json!({"b": "x"}))).expect("input");
    assert!(optional(&require_first, "a"));
}

#[test]
fn rules_see_effects_of_earlier_rules() {
    let clear_b = RuleBuilder::new().clear_value(Scope::field("b")).build();
    let mut schema = ordered_schema(vec![clear_b, require_a_when_b()]);
    schema.input(&input(json!({"b": "x"}))).expect("input");
    assert_eq!(schema.field("b").expect("b").value(), &json!(null));
    assert!(!optional(&schema, "a"));
}

#[test]
fn each_input_restarts_from_the_definition() {
    let mut schema = ordered_schema(vec![require_a_when_b(), relax_a()]);
    schema.input(&input(json!({"b": "x"}))).expect("first input");
    schema.input(&input(json!({"b": "y"}))).expect("second input");
    assert!(optional(&schema, "a"));
    assert_eq!(schema.definition().get("a").map(Field::is_optional), Some(false));
}

// ============================================================================
// SECTION: Rule Sets
// ============================================================================

#[test]
fn rule_conditions_are_always_groups() {
    let predicate = FieldPredicate::exists(Scope::attribute("b", "value"));
    let from_when = RuleBuilder::new().when(Condition::leaf(predicate.clone())).build();
    let from_leaf = RuleBuilder::new().when_leaf(predicate.clone()).build();
    let direct = Rule::new(Condition::leaf(predicate.clone()), Vec::new());
    let expected = Condition::all_of(vec![Condition::leaf(predicate)]);
    assert_eq!(from_when.conditions(), &expected);
    assert_eq!(from_leaf.conditions(), &expected);
    assert_eq!(direct.conditions(), &expected);
    assert!(RuleBuilder::new().build().conditions().kind().is_some());
}

#[test]
fn rule_set_is_unique_by_identity() {
    let rule = Arc::new(relax_a());
    let twin = Arc::new(relax_a());
    let mut rules = RuleSet::new();
    rules.add(Arc::clone(&rule)).expect("first add");
    rules.add(Arc::clone(&twin)).expect("equal but distinct rule");
    assert_eq!(rules.add(Arc::clone(&rule)), Err(RuleError::DuplicateRule { index: 0 }));
    assert_eq!(rules.position(&twin), Some(1));
    assert!(rules.remove(&rule));
    assert!(!rules.contains(&rule));
    assert_eq!(rules.len(), 1);
}

#[test]
fn schema_builder_rejects_shared_rule_twice() {
    let rule = Arc::new(relax_a());
    let err = SchemaBuilder::new("dup")
        .field(Field::new("a", FieldType::Text))
        .shared_rule(Arc::clone(&rule))
        .shared_rule(rule)
        .build()
        .expect_err("duplicate rule");
    assert!(matches!(err, form_core::SchemaError::Rule(RuleError::DuplicateRule { index: 0 })));
}

// ============================================================================
// SECTION: Outcome Targets
// ============================================================================

#[test]
fn outcomes_require_whole_field_targets() {
    let mut fields = FieldSet::new();
    fields.insert(Field::new("a", FieldType::Text)).expect("insert");
    let outcome = Outcome::require(Scope::attribute("a", "value"));
    assert!(matches!(outcome.apply(&mut fields), Err(RuleError::InvalidOutcomeTarget { .. })));
    let missing = Outcome::make_optional(Scope::field("z"));
    assert!(matches!(missing.check_target(&fields), Err(RuleError::InvalidOutcomeTarget { .. })));
}

// ============================================================================
// SECTION: Unresolved Scopes
// ============================================================================

/// Rule whose condition reads a field that does not exist.
fn dangling_rule() -> Rule {
    RuleBuilder::new()
        .when_leaf(FieldPredicate::exists(Scope::attribute("ghost", "value")))
        .require(Scope::field("a"))
        .build()
}

/// Builder that skips build-time scope checks.
fn lenient(policy: UnresolvedScopePolicy) -> SchemaBuilder {
    SchemaBuilder::new("lenient")
        .field(Field::new("a", FieldType::Text).with_optional(true))
        .rule(dangling_rule())
        .config(EngineConfig {
            unresolved_scopes: policy,
            strict_scopes: false,
            ..EngineConfig::default()
        })
}

#[test]
fn strict_schemas_reject_dangling_scopes_at_build() {
    let err = SchemaBuilder::new("strict")
        .field(Field::new("a", FieldType::Text))
        .rule(dangling_rule())
        .build()
        .expect_err("dangling scope");
    assert!(matches!(
        err,
        form_core::SchemaError::UnresolvedScope {
            rule: 0,
            ..
        }
    ));
}

#[test]
fn fail_policy_aborts_input_and_keeps_previous_state() {
    let mut schema = lenient(UnresolvedScopePolicy::Fail).build().expect("schema");
    let before = schema.fields().clone();
    let err = schema.input(&input(json!({"a": "value"}))).expect_err("unresolved scope");
    assert!(matches!(err, RuleError::Scope(ScopeError::NotFound { .. })));
    assert_eq!(schema.fields(), &before);
}

#[test]
fn non_match_policy_skips_the_leaf_and_reports_it() {
    let mut schema = lenient(UnresolvedScopePolicy::TreatAsNonMatch).build().expect("schema");
    let mut observer = RecordingObserver::new();
    schema.input_with(&input(json!({})), &mut observer).expect("input");
    assert!(optional(&schema, "a"));
    let events = observer.take();
    assert!(matches!(
        events.as_slice(),
        [
            ObserverEvent::ScopeUnresolved {
                rule: 0,
                ..
            },
            ObserverEvent::RuleEvaluated {
                rule: 0,
                matched: false
            },
        ]
    ));
}

// ============================================================================
// SECTION: Engine And Observers
// ============================================================================

#[test]
fn observer_sees_rule_and_outcome_events_in_order() {
    let mut schema = contact_schema().build().expect("schema");
    let mut observer = RecordingObserver::new();
    schema.input_with(&input(json!({"contact_method": "phone"})), &mut observer).expect("input");
    assert_eq!(
        observer.events(),
        &[
            ObserverEvent::RuleEvaluated {
                rule: 0,
                matched: true
            },
            ObserverEvent::OutcomeApplied {
                rule: 0,
                outcome: Outcome::require(Scope::field("phone_number")),
            },
            ObserverEvent::OutcomeApplied {
                rule: 0,
                outcome: Outcome::make_optional(Scope::field("email_address")),
            },
        ]
    );
}

#[test]
fn engine_applies_rules_directly_to_field_sets() {
    let mut fields = FieldSet::new();
    fields.insert(Field::new("a", FieldType::Text)).expect("insert a");
    fields.insert(Field::new("b", FieldType::Text).with_value(json!("x"))).expect("insert b");
    let mut rules = RuleSet::new();
    rules.add(Arc::new(relax_a())).expect("add");
    rules
        .add(Arc::new(
            RuleBuilder::new()
                .when(Condition::none_of(vec![Condition::leaf(FieldPredicate::in_set(
                    Scope::attribute("b", "value"),
                    vec![json!("x"), json!("y")],
                ))]))
                .require(Scope::field("a"))
                .build(),
        ))
        .expect("add");
    let engine = RuleEngine::new(&rules, LeafErrorPolicy::Propagate);
    engine.apply(&mut fields, &mut NoopObserver).expect("apply");
    assert!(fields.get("a").is_some_and(Field::is_optional));
    assert_eq!(engine.policy(), LeafErrorPolicy::Propagate);
}
