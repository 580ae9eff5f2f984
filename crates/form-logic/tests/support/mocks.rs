// crates/form-logic/tests/support/mocks.rs
// ============================================================================
// Module: Mock Leaves
// Description: Shared mock leaves, contexts, and traces for condition tests.
// ============================================================================
//! ## Overview
//! Mock leaf, context, and trace types used by integration tests.

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

use std::cell::Cell;
use std::error::Error;
use std::fmt;

use form_logic::ConditionEval;
use form_logic::ConditionTrace;
use form_logic::GroupKind;
use serde::Deserialize;
use serde::Serialize;

// ========================================================================
// Mock Leaf Types
// ========================================================================

/// Simple mock leaf for testing the condition algebra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MockLeaf {
    /// Always matches.
    AlwaysTrue,

    /// Never matches.
    AlwaysFalse,

    /// Matches when the context value equals the operand.
    ValueEq(i32),

    /// Matches when the context value is at least the operand.
    ValueAtLeast(i32),

    /// Fails evaluation with a named error.
    Unresolved(u8),
}

/// Error raised by [`MockLeaf::Unresolved`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError(pub u8);

impl fmt::Display for MockError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "mock leaf {} unresolved", self.0)
    }
}

impl Error for MockError {}

// ========================================================================
// Mock Context Type
// ========================================================================

/// Evaluation context counting how many leaves were visited.
pub struct MockContext {
    /// Value compared by value leaves.
    pub value: i32,
    /// Number of leaf evaluations performed.
    pub evaluated: Cell<usize>,
}

impl MockContext {
    /// Creates a context with the given value.
    pub const fn new(value: i32) -> Self {
        Self {
            value,
            evaluated: Cell::new(0),
        }
    }

    /// Returns the number of leaf evaluations so far.
    pub fn evaluated(&self) -> usize {
        self.evaluated.get()
    }
}

impl ConditionEval for MockLeaf {
    type Context<'a> = MockContext;
    type Error = MockError;

    fn eval(&self, context: &Self::Context<'_>) -> Result<bool, Self::Error> {
        context.evaluated.set(context.evaluated.get() + 1);
        match self {
            Self::AlwaysTrue => Ok(true),
            Self::AlwaysFalse => Ok(false),
            Self::ValueEq(expected) => Ok(context.value == *expected),
            Self::ValueAtLeast(min) => Ok(context.value >= *min),
            Self::Unresolved(id) => Err(MockError(*id)),
        }
    }
}

// ========================================================================
// Recording Trace
// ========================================================================

/// Trace event captured by [`RecordingTrace`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// A leaf evaluated to the given result.
    Leaf(MockLeaf, bool),
    /// A leaf error was swallowed by policy.
    Suppressed(MockError),
    /// A group was decided.
    Group(GroupKind, bool),
}

/// Trace implementation recording every event in order.
#[derive(Debug, Default)]
pub struct RecordingTrace {
    /// Events in the order they were observed.
    pub events: Vec<TraceEvent>,
}

impl ConditionTrace<MockLeaf> for RecordingTrace {
    fn on_leaf_evaluated(&mut self, leaf: &MockLeaf, matched: bool) {
        self.events.push(TraceEvent::Leaf(*leaf, matched));
    }

    fn on_leaf_suppressed(&mut self, _leaf: &MockLeaf, error: &MockError) {
        self.events.push(TraceEvent::Suppressed(*error));
    }

    fn on_group_evaluated(&mut self, kind: GroupKind, matched: bool) {
        self.events.push(TraceEvent::Group(kind, matched));
    }
}
