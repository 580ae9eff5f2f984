// crates/form-core/src/core/predicate.rs
// ============================================================================
// Module: Field Predicates
// Description: Leaf predicates comparing a scoped value with an expected value.
// Purpose: Plug schema-aware leaves into the condition algebra.
// Dependencies: crate::core::{field, scope}, form-logic, serde, serde_json
// ============================================================================

//! ## Overview
//! A [`FieldPredicate`] resolves its target scope against the *current* field
//! set, unwraps it to raw JSON, and applies an [`Operator`]. Equality is strict
//! JSON equality: `1`, `1.0` and `"1"` are three different values. A target that
//! fails to resolve is an error; whether the error aborts evaluation is the
//! caller's [`form_logic::LeafErrorPolicy`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use form_logic::Condition;
use form_logic::ConditionEval;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::field::FieldSet;
use crate::core::scope::Scope;
use crate::core::scope::ScopeError;

// ============================================================================
// SECTION: Operators
// ============================================================================

/// Comparison applied by a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// Value equals the expected value.
    Equals,
    /// Value differs from the expected value.
    NotEquals,
    /// Value is one of the expected array items.
    InSet,
    /// Value is not null.
    Exists,
    /// Value is null.
    NotExists,
}

impl Operator {
    /// Every operator.
    pub const ALL: [Self; 5] =
        [Self::Equals, Self::NotEquals, Self::InSet, Self::Exists, Self::NotExists];

    /// Returns the canonical operator name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::InSet => "in_set",
            Self::Exists => "exists",
            Self::NotExists => "not_exists",
        }
    }

    /// Looks up an operator by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|operator| operator.as_str() == name)
    }

    /// Returns true when the operator compares against an expected value.
    #[must_use]
    pub const fn takes_expected(self) -> bool {
        matches!(self, Self::Equals | Self::NotEquals | Self::InSet)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Applies an operator to a resolved value.
///
/// A missing expected value compares as `null`; `in_set` with a non-array
/// expected value never matches.
#[must_use]
pub fn evaluate_operator(operator: Operator, expected: Option<&Value>, actual: &Value) -> bool {
    let expected = expected.unwrap_or(&Value::Null);
    match operator {
        Operator::Equals => actual == expected,
        Operator::NotEquals => actual != expected,
        Operator::InSet => expected.as_array().is_some_and(|items| items.contains(actual)),
        Operator::Exists => !actual.is_null(),
        Operator::NotExists => actual.is_null(),
    }
}

// ============================================================================
// SECTION: Field Predicate
// ============================================================================

/// Leaf predicate over a scoped schema value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPredicate {
    /// Scope whose value is inspected.
    pub target: Scope,
    /// Comparison to apply.
    pub operator: Operator,
    /// Comparison operand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
}

impl FieldPredicate {
    /// Builds an `equals` predicate.
    #[must_use]
    pub const fn equals(target: Scope, expected: Value) -> Self {
        Self {
            target,
            operator: Operator::Equals,
            expected: Some(expected),
        }
    }

    /// Builds a `not_equals` predicate.
    #[must_use]
    pub const fn not_equals(target: Scope, expected: Value) -> Self {
        Self {
            target,
            operator: Operator::NotEquals,
            expected: Some(expected),
        }
    }

    /// Builds an `in_set` predicate.
    #[must_use]
    pub const fn in_set(target: Scope, items: Vec<Value>) -> Self {
        Self {
            target,
            operator: Operator::InSet,
            expected: Some(Value::Array(items)),
        }
    }

    /// Builds an `exists` predicate.
    #[must_use]
    pub const fn exists(target: Scope) -> Self {
        Self {
            target,
            operator: Operator::Exists,
            expected: None,
        }
    }

    /// Builds a `not_exists` predicate.
    #[must_use]
    pub const fn not_exists(target: Scope) -> Self {
        Self {
            target,
            operator: Operator::NotExists,
            expected: None,
        }
    }
}

impl ConditionEval for FieldPredicate {
    type Context<'a> = FieldSet;
    type Error = ScopeError;

    fn eval(&self, context: &Self::Context<'_>) -> Result<bool, Self::Error> {
        let actual = self.target.resolve(context)?.value();
        Ok(evaluate_operator(self.operator, self.expected.as_ref(), &actual))
    }
}

// ============================================================================
// SECTION: Rule Conditions
// ============================================================================

/// Condition tree over field predicates.
pub type RuleCondition = Condition<FieldPredicate>;

/// Scope listing for predicate trees.
pub trait ConditionScopes {
    /// Returns every leaf target in depth-first order.
    fn scopes(&self) -> Vec<&Scope>;
}

impl ConditionScopes for RuleCondition {
    fn scopes(&self) -> Vec<&Scope> {
        self.leaves().into_iter().map(|leaf| &leaf.target).collect()
    }
}
