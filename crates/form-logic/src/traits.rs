// crates/form-logic/src/traits.rs
// ============================================================================
// Module: Condition Traits
// Description: Leaf evaluation contract and leaf error policy.
// Purpose: Define how domain predicates plug into condition evaluation.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Domain crates implement [`ConditionEval`] for their leaf predicate type.
//! Leaves may fail (for example when a referenced scope does not resolve);
//! [`LeafErrorPolicy`] makes the handling of those failures an explicit choice
//! of the caller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Leaf Evaluation Trait
// ============================================================================

/// Core trait for leaf predicate evaluation
///
/// Implementations must be pure with respect to the context: the same leaf
/// evaluated twice against the same context returns the same result.
pub trait ConditionEval {
    /// Domain-specific evaluation context
    ///
    /// Examples: a schema snapshot plus raw input, a record, a row reader.
    type Context<'a>;

    /// Error produced when the leaf cannot be evaluated
    type Error;

    /// Evaluates the leaf against the context
    ///
    /// # Errors
    /// Returns `Self::Error` when the leaf cannot be evaluated.
    fn eval(&self, context: &Self::Context<'_>) -> Result<bool, Self::Error>;
}

// ============================================================================
// SECTION: Leaf Error Policy
// ============================================================================

/// Handling of leaf evaluation errors during tree evaluation.
///
/// # Invariants
/// - `Propagate` never converts an error into a boolean.
/// - `TreatAsNonMatch` always reports the swallowed error to the trace hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafErrorPolicy {
    /// Abort evaluation and return the leaf error.
    #[default]
    Propagate,
    /// Evaluate the failing leaf as `false` and continue.
    TreatAsNonMatch,
}
