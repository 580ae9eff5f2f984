// crates/form-core/src/runtime/engine.rs
// ============================================================================
// Module: Rule Engine
// Description: Sequential, single-pass rule evaluation over a field set.
// Purpose: Evaluate rule conditions against live fields and apply outcomes.
// Dependencies: crate::core, crate::runtime::observer, form-logic, tracing
// ============================================================================

//! ## Overview
//! Rules run in insertion order. Each rule's condition is evaluated against
//! the field set *as left by earlier rules*, so a rule sees the effects of the
//! rules before it and never those after it. There is no fixed-point
//! iteration: when two rules touch the same field, the later one wins.
//!
//! Unresolved condition scopes follow the configured
//! [`LeafErrorPolicy`]: `Propagate` aborts with [`RuleError::Scope`];
//! `TreatAsNonMatch` evaluates the leaf as false and reports it through
//! [`EvaluationObserver::on_scope_unresolved`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use form_logic::ConditionTrace;
use form_logic::LeafErrorPolicy;
use tracing::debug;
use tracing::trace;

use crate::core::FieldPredicate;
use crate::core::FieldSet;
use crate::core::RuleError;
use crate::core::RuleSet;
use crate::core::ScopeError;
use crate::runtime::observer::EvaluationObserver;

// ============================================================================
// SECTION: Rule Engine
// ============================================================================

/// Applies a rule set to a field set.
#[derive(Debug, Clone, Copy)]
pub struct RuleEngine<'a> {
    /// Rules in evaluation order.
    rules: &'a RuleSet,
    /// Handling of unresolved condition scopes.
    policy: LeafErrorPolicy,
}

impl<'a> RuleEngine<'a> {
    /// Creates an engine over a rule set.
    #[must_use]
    pub const fn new(rules: &'a RuleSet, policy: LeafErrorPolicy) -> Self {
        Self {
            rules,
            policy,
        }
    }

    /// Returns the leaf error policy.
    #[must_use]
    pub const fn policy(&self) -> LeafErrorPolicy {
        self.policy
    }

    /// Evaluates every rule once, in order, mutating `fields`.
    ///
    /// # Errors
    /// Returns [`RuleError::Scope`] for an unresolved condition scope under
    /// the fail-fast policy, or [`RuleError::InvalidOutcomeTarget`] when a
    /// matching rule targets something other than an existing field.
    pub fn apply<O>(&self, fields: &mut FieldSet, observer: &mut O) -> Result<(), RuleError>
    where
        O: EvaluationObserver + ?Sized,
    {
        for (index, rule) in self.rules.iter().enumerate() {
            let matched = {
                let mut hook = ObserverTrace {
                    rule: index,
                    observer: &mut *observer,
                };
                rule.conditions().matches_with(&*fields, self.policy, &mut hook)?
            };
            debug!(rule = index, matched, "rule evaluated");
            observer.on_rule_evaluated(index, matched);
            if !matched {
                continue;
            }
            for outcome in rule.outcomes() {
                outcome.apply(fields)?;
                debug!(rule = index, outcome = %outcome, "outcome applied");
                observer.on_outcome_applied(index, outcome);
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Trace Bridge
// ============================================================================

/// Forwards condition trace events for one rule to an observer.
struct ObserverTrace<'o, O: ?Sized> {
    /// Position of the rule being evaluated.
    rule: usize,
    /// Destination observer.
    observer: &'o mut O,
}

impl<O> ConditionTrace<FieldPredicate> for ObserverTrace<'_, O>
where
    O: EvaluationObserver + ?Sized,
{
    fn on_leaf_evaluated(&mut self, leaf: &FieldPredicate, matched: bool) {
        trace!(rule = self.rule, target = %leaf.target, operator = %leaf.operator, matched, "leaf evaluated");
    }

    fn on_leaf_suppressed(&mut self, leaf: &FieldPredicate, error: &ScopeError) {
        debug!(rule = self.rule, target = %leaf.target, %error, "unresolved scope treated as non-match");
        self.observer.on_scope_unresolved(self.rule, &leaf.target, error);
    }
}
