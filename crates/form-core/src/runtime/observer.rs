// crates/form-core/src/runtime/observer.rs
// ============================================================================
// Module: Evaluation Observers
// Description: Sinks for rule and validator evaluation events.
// Purpose: Expose evaluation decisions without changing them.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Observers receive rule, outcome, unresolved-scope and skipped-validator
//! events. They cannot influence evaluation. [`NoopObserver`] discards every
//! event; [`RecordingObserver`] keeps them in memory for inspection.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::FieldName;
use crate::core::Outcome;
use crate::core::Scope;
use crate::core::ScopeError;
use crate::core::ValidatorKind;

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Sink for evaluation events.
///
/// Rules are identified by their position in the rule set.
pub trait EvaluationObserver {
    /// Records a rule's condition outcome.
    fn on_rule_evaluated(&mut self, _rule: usize, _matched: bool) {}

    /// Records an applied outcome.
    fn on_outcome_applied(&mut self, _rule: usize, _outcome: &Outcome) {}

    /// Records a condition scope that was treated as a non-match.
    fn on_scope_unresolved(&mut self, _rule: usize, _scope: &Scope, _error: &ScopeError) {}

    /// Records a validator skipped because a dependency did not pass.
    fn on_validator_skipped(&mut self, _field: &FieldName, _validator: ValidatorKind) {}
}

/// No-op observer.
///
/// # Invariants
/// - Events are intentionally discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl EvaluationObserver for NoopObserver {}

// ============================================================================
// SECTION: Recording Observer
// ============================================================================

/// Event captured by [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObserverEvent {
    /// Rule condition decided.
    RuleEvaluated {
        /// Rule position.
        rule: usize,
        /// Whether the condition matched.
        matched: bool,
    },
    /// Outcome applied.
    OutcomeApplied {
        /// Rule position.
        rule: usize,
        /// Applied outcome.
        outcome: Outcome,
    },
    /// Scope error suppressed by policy.
    ScopeUnresolved {
        /// Rule position.
        rule: usize,
        /// Unresolved scope.
        scope: Scope,
        /// Resolution error.
        error: ScopeError,
    },
    /// Validator skipped.
    ValidatorSkipped {
        /// Owning field.
        field: FieldName,
        /// Skipped validator.
        validator: ValidatorKind,
    },
}

/// Observer that records every event in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    /// Recorded events.
    events: Vec<ObserverEvent>,
}

impl RecordingObserver {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns recorded events.
    #[must_use]
    pub fn events(&self) -> &[ObserverEvent] {
        &self.events
    }

    /// Drains recorded events.
    pub fn take(&mut self) -> Vec<ObserverEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EvaluationObserver for RecordingObserver {
    fn on_rule_evaluated(&mut self, rule: usize, matched: bool) {
        self.events.push(ObserverEvent::RuleEvaluated {
            rule,
            matched,
        });
    }

    fn on_outcome_applied(&mut self, rule: usize, outcome: &Outcome) {
        self.events.push(ObserverEvent::OutcomeApplied {
            rule,
            outcome: outcome.clone(),
        });
    }

    fn on_scope_unresolved(&mut self, rule: usize, scope: &Scope, error: &ScopeError) {
        self.events.push(ObserverEvent::ScopeUnresolved {
            rule,
            scope: scope.clone(),
            error: error.clone(),
        });
    }

    fn on_validator_skipped(&mut self, field: &FieldName, validator: ValidatorKind) {
        self.events.push(ObserverEvent::ValidatorSkipped {
            field: field.clone(),
            validator,
        });
    }
}
