// crates/form-core/src/core/rule.rs
// ============================================================================
// Module: Rules
// Description: Rules, rule builders, and identity-ordered rule sets.
// Purpose: Pair a condition tree with the outcomes it triggers.
// Dependencies: crate::core::{outcome, predicate, scope}, form-logic, thiserror
// ============================================================================

//! ## Overview
//! A [`Rule`] is immutable: a condition tree plus an ordered outcome group.
//! A [`RuleSet`] keeps rules in insertion order and rejects the same rule
//! object twice. Uniqueness is by identity (`Arc::ptr_eq`): two structurally
//! equal rules are still distinct entries.
//!
//! Evaluation lives in [`crate::runtime::engine`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use form_logic::Condition;
use thiserror::Error;

use crate::core::outcome::Outcome;
use crate::core::predicate::ConditionScopes;
use crate::core::predicate::FieldPredicate;
use crate::core::predicate::RuleCondition;
use crate::core::scope::Scope;
use crate::core::scope::ScopeError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Rule evaluation and rule set errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// A condition scope failed to resolve under the fail-fast policy.
    #[error(transparent)]
    Scope(#[from] ScopeError),
    /// An outcome target is not an existing field.
    #[error("invalid outcome target `{scope}`: {reason}")]
    InvalidOutcomeTarget {
        /// Target scope text.
        scope: String,
        /// Why the target was rejected.
        reason: &'static str,
    },
    /// The same rule object was added twice.
    #[error("rule already present at position {index}")]
    DuplicateRule {
        /// Position of the existing entry.
        index: usize,
    },
}

// ============================================================================
// SECTION: Rule
// ============================================================================

/// Condition tree plus outcomes.
///
/// # Invariants
/// - The condition root is always a group.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Condition deciding whether the rule fires.
    conditions: RuleCondition,
    /// Outcomes applied in order when it fires.
    outcomes: Vec<Outcome>,
}

impl Rule {
    /// Creates a rule. A leaf root is wrapped in an `all` group.
    #[must_use]
    pub fn new(conditions: RuleCondition, outcomes: Vec<Outcome>) -> Self {
        Self {
            conditions: conditions.into_group(),
            outcomes,
        }
    }

    /// Returns the condition tree.
    #[must_use]
    pub const fn conditions(&self) -> &RuleCondition {
        &self.conditions
    }

    /// Returns the outcomes in application order.
    #[must_use]
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Returns condition scopes followed by outcome targets.
    #[must_use]
    pub fn scopes(&self) -> Vec<&Scope> {
        let mut scopes = self.conditions.scopes();
        scopes.extend(self.outcomes.iter().map(Outcome::target));
        scopes
    }
}

/// Staged construction of a [`Rule`].
///
/// Without a condition the rule matches unconditionally (empty `all`).
#[derive(Debug, Clone, Default)]
pub struct RuleBuilder {
    /// Condition tree, if set.
    conditions: Option<RuleCondition>,
    /// Outcomes collected so far.
    outcomes: Vec<Outcome>,
}

impl RuleBuilder {
    /// Starts an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the condition tree.
    ///
    /// A leaf root is wrapped in an `all` group.
    #[must_use]
    pub fn when(mut self, conditions: RuleCondition) -> Self {
        self.conditions = Some(conditions.into_group());
        self
    }

    /// Sets a single-leaf condition wrapped in an `all` group.
    #[must_use]
    pub fn when_leaf(self, predicate: FieldPredicate) -> Self {
        self.when(Condition::leaf(predicate))
    }

    /// Appends an outcome.
    #[must_use]
    pub fn then(mut self, outcome: Outcome) -> Self {
        self.outcomes.push(outcome);
        self
    }

    /// Appends a `require` outcome.
    #[must_use]
    pub fn require(self, target: Scope) -> Self {
        self.then(Outcome::require(target))
    }

    /// Appends a `make_optional` outcome.
    #[must_use]
    pub fn make_optional(self, target: Scope) -> Self {
        self.then(Outcome::make_optional(target))
    }

    /// Appends a `clear_value` outcome.
    #[must_use]
    pub fn clear_value(self, target: Scope) -> Self {
        self.then(Outcome::clear_value(target))
    }

    /// Builds the rule.
    #[must_use]
    pub fn build(self) -> Rule {
        Rule::new(self.conditions.unwrap_or_default(), self.outcomes)
    }
}

// ============================================================================
// SECTION: Rule Set
// ============================================================================

/// Ordered rules, unique by identity.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    /// Rules in insertion order.
    rules: Vec<Arc<Rule>>,
}

impl RuleSet {
    /// Creates an empty rule set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rules: Vec::new(),
        }
    }

    /// Appends a rule.
    ///
    /// # Errors
    /// Returns [`RuleError::DuplicateRule`] when this exact rule object is
    /// already present.
    pub fn add(&mut self, rule: Arc<Rule>) -> Result<(), RuleError> {
        if let Some(index) = self.position(&rule) {
            return Err(RuleError::DuplicateRule {
                index,
            });
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Removes a rule by identity, returning true when it was present.
    pub fn remove(&mut self, rule: &Arc<Rule>) -> bool {
        match self.position(rule) {
            Some(index) => {
                self.rules.remove(index);
                true
            }
            None => false,
        }
    }

    /// Returns the position of a rule by identity.
    #[must_use]
    pub fn position(&self, rule: &Arc<Rule>) -> Option<usize> {
        self.rules.iter().position(|existing| Arc::ptr_eq(existing, rule))
    }

    /// Returns true when this rule object is present.
    #[must_use]
    pub fn contains(&self, rule: &Arc<Rule>) -> bool {
        self.position(rule).is_some()
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true when empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates rules in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Arc<Rule>> {
        self.rules.iter()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Arc<Rule>;
    type IntoIter = std::slice::Iter<'a, Arc<Rule>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
