// crates/form-logic/src/lib.rs
// ============================================================================
// Module: Condition Logic Root
// Description: Public API surface for the condition subsystem.
// Purpose: Wire together core modules, re-exports, and the condition macro.
// Dependencies: crate::{builder, condition, serde_support, trace, traits}
// ============================================================================

//! ## Overview
//! This crate exposes a domain-agnostic condition algebra: `all`, `any` and
//! `none` groups over leaf predicates supplied by the caller, plus builders,
//! trace hooks and serde helpers so domain crates can import conditions
//! uniformly.

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod builder;
pub mod condition;
pub mod serde_support;
pub mod trace;
pub mod traits;

#[cfg(test)]
mod tests;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use builder::ConditionBuilder;
pub use builder::GroupBuilder;
pub use condition::Condition;
pub use condition::GroupKind;
pub use condition::UnknownGroupKind;
pub use serde_support::ConditionSerializer;
pub use serde_support::ConditionValidator;
pub use serde_support::SerdeConfig;
pub use serde_support::SerdeError;
pub use trace::ConditionTrace;
pub use trace::NoopTrace;
pub use traits::ConditionEval;
pub use traits::LeafErrorPolicy;

// ============================================================================
// SECTION: Condition Macro
// ============================================================================

/// Macro for ergonomic condition construction
///
/// Groups take a bracketed list of nested items; leaves take an expression.
///
/// ```
/// use form_logic::Condition;
/// use form_logic::condition;
///
/// let tree: Condition<u8> = condition! {
///     all [
///         leaf(1),
///         any [leaf(2), leaf(3)],
///         none [leaf(4)],
///     ]
/// };
/// assert_eq!(tree.leaves(), vec![&1, &2, &3, &4]);
/// ```
#[macro_export]
macro_rules! condition {
    // Base case: leaf
    (leaf($pred:expr)) => {
        $crate::condition::Condition::leaf($pred)
    };

    // AllOf case
    (all [$($kind:ident $body:tt),* $(,)?]) => {
        $crate::condition::Condition::all_of(vec![$($crate::condition!($kind $body)),*])
    };

    // AnyOf case
    (any [$($kind:ident $body:tt),* $(,)?]) => {
        $crate::condition::Condition::any_of(vec![$($crate::condition!($kind $body)),*])
    };

    // NoneOf case
    (none [$($kind:ident $body:tt),* $(,)?]) => {
        $crate::condition::Condition::none_of(vec![$($crate::condition!($kind $body)),*])
    };
}
