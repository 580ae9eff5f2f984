// crates/form-core/src/core/outcome.rs
// ============================================================================
// Module: Outcomes
// Description: Mutations applied to fields when a rule matches.
// Purpose: Change field requiredness or clear values through field scopes.
// Dependencies: crate::core::{field, rule, scope}, serde, serde_json
// ============================================================================

//! ## Overview
//! Outcomes carry no conditions of their own. Each targets a whole field and
//! writes by replacing that field with an updated copy.
//!
//! An outcome may also carry extra attributes (for example a `message`).
//! They do not affect application and are kept verbatim for interchange.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::core::field::Field;
use crate::core::field::FieldSet;
use crate::core::rule::RuleError;
use crate::core::scope::Scope;

// ============================================================================
// SECTION: Actions
// ============================================================================

/// Mutation kind performed by an [`Outcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeAction {
    /// Mark the target field required.
    Require,
    /// Mark the target field optional.
    MakeOptional,
    /// Reset the target field's value to null.
    ClearValue,
}

impl OutcomeAction {
    /// Every action in declaration order.
    pub const ALL: [Self; 3] = [Self::Require, Self::MakeOptional, Self::ClearValue];

    /// Returns the interchange name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Require => "require",
            Self::MakeOptional => "make_optional",
            Self::ClearValue => "clear_value",
        }
    }

    /// Looks up an action by interchange name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_str() == name)
    }
}

impl fmt::Display for OutcomeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Mutation applied by a matching rule.
///
/// # Invariants
/// - `extras` never contains the `action` or `target` keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Mutation kind.
    action: OutcomeAction,
    /// Field scope.
    target: Scope,
    /// Additional attributes carried through interchange.
    #[serde(flatten)]
    extras: Map<String, Value>,
}

impl Outcome {
    /// Creates an outcome without extra attributes.
    #[must_use]
    pub fn new(action: OutcomeAction, target: Scope) -> Self {
        Self {
            action,
            target,
            extras: Map::new(),
        }
    }

    /// Creates a `require` outcome.
    #[must_use]
    pub fn require(target: Scope) -> Self {
        Self::new(OutcomeAction::Require, target)
    }

    /// Creates a `make_optional` outcome.
    #[must_use]
    pub fn make_optional(target: Scope) -> Self {
        Self::new(OutcomeAction::MakeOptional, target)
    }

    /// Creates a `clear_value` outcome.
    #[must_use]
    pub fn clear_value(target: Scope) -> Self {
        Self::new(OutcomeAction::ClearValue, target)
    }

    /// Builds an outcome from an action name.
    #[must_use]
    pub fn from_action(action: &str, target: Scope) -> Option<Self> {
        OutcomeAction::from_name(action).map(|action| Self::new(action, target))
    }

    /// Returns a copy carrying an extra attribute.
    ///
    /// The reserved keys `action` and `target` are ignored.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if key != "action" && key != "target" {
            self.extras.insert(key, value);
        }
        self
    }

    /// Returns the mutation kind.
    #[must_use]
    pub const fn action(&self) -> OutcomeAction {
        self.action
    }

    /// Returns the target scope.
    #[must_use]
    pub const fn target(&self) -> &Scope {
        &self.target
    }

    /// Returns the extra attributes in insertion order.
    #[must_use]
    pub const fn extras(&self) -> &Map<String, Value> {
        &self.extras
    }

    /// Checks that the target addresses an existing field.
    ///
    /// # Errors
    /// Returns [`RuleError::InvalidOutcomeTarget`] otherwise.
    pub fn check_target(&self, fields: &FieldSet) -> Result<(), RuleError> {
        self.target_field(fields).map(|_| ())
    }

    /// Applies the outcome to the field set.
    ///
    /// # Errors
    /// Returns [`RuleError::InvalidOutcomeTarget`] when the target is not an
    /// existing field.
    pub fn apply(&self, fields: &mut FieldSet) -> Result<(), RuleError> {
        let field = self.target_field(fields)?;
        let updated = match self.action {
            OutcomeAction::Require => field.with_optional(false),
            OutcomeAction::MakeOptional => field.with_optional(true),
            OutcomeAction::ClearValue => field.with_value(Value::Null),
        };
        fields.replace(updated);
        Ok(())
    }

    /// Looks up the targeted field.
    fn target_field<'a>(&self, fields: &'a FieldSet) -> Result<&'a Field, RuleError> {
        let target = &self.target;
        if !target.is_field() {
            return Err(RuleError::InvalidOutcomeTarget {
                scope: target.to_string(),
                reason: "outcomes must target a whole field",
            });
        }
        fields.get(target.field_name().as_str()).ok_or_else(|| RuleError::InvalidOutcomeTarget {
            scope: target.to_string(),
            reason: "field does not exist",
        })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action, self.target)
    }
}
