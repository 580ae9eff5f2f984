// crates/form-logic/src/trace.rs
// ============================================================================
// Module: Condition Trace Hooks
// Description: Observation hooks for condition evaluation.
// Purpose: Let callers record leaf and group outcomes without changing results.
// Dependencies: crate::{condition, traits}
// ============================================================================

//! ## Overview
//! Trace hooks observe evaluation as it happens. They cannot alter results;
//! the default [`NoopTrace`] discards every event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::condition::GroupKind;
use crate::traits::ConditionEval;

// ============================================================================
// SECTION: Trace Trait
// ============================================================================

/// Trace hook for condition evaluation
pub trait ConditionTrace<P: ConditionEval> {
    /// Called after a leaf evaluates successfully.
    fn on_leaf_evaluated(&mut self, _leaf: &P, _matched: bool) {}

    /// Called when a leaf error is turned into a non-match by policy.
    fn on_leaf_suppressed(&mut self, _leaf: &P, _error: &P::Error) {}

    /// Called after a group has been decided.
    fn on_group_evaluated(&mut self, _kind: GroupKind, _matched: bool) {}
}

/// No-op trace implementation
///
/// # Invariants
/// - Trace events are intentionally discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTrace;

impl<P: ConditionEval> ConditionTrace<P> for NoopTrace {}
