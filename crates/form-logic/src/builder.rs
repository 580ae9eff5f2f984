// crates/form-logic/src/builder.rs
// ============================================================================
// Module: Condition Builders
// Description: Fluent builders over the condition tree.
// Purpose: Provide ergonomic, type-safe APIs for composing condition groups.
// Dependencies: crate::condition::{Condition, GroupKind}
// ============================================================================

//! ## Overview
//! Fluent builders simplify composing condition trees by enabling chained calls
//! for `all`, `any`, and `none` groups while keeping the same invariants as the
//! core [`Condition`] algebra.

use std::ops::Not;

use crate::condition::Condition;
use crate::condition::GroupKind;

// ============================================================================
// SECTION: Fluent Builder API
// ============================================================================

/// Fluent builder for constructing conditions programmatically
///
/// # Type Parameter
/// * `P` - The domain-specific leaf predicate type
pub struct ConditionBuilder<P> {
    /// Root condition under construction.
    condition: Condition<P>,
}

impl<P> ConditionBuilder<P> {
    /// Creates a new builder with the given condition as the root
    pub const fn new(condition: Condition<P>) -> Self {
        Self {
            condition,
        }
    }

    /// Creates a builder starting with a leaf
    #[must_use]
    pub const fn leaf(predicate: P) -> Self {
        Self::new(Condition::Leaf(predicate))
    }

    /// Creates a builder for an `AllOf` group
    #[must_use]
    pub const fn all_of() -> GroupBuilder<P> {
        GroupBuilder::<P>::new(GroupKind::All)
    }

    /// Creates a builder for an `AnyOf` group
    #[must_use]
    pub const fn any_of() -> GroupBuilder<P> {
        GroupBuilder::<P>::new(GroupKind::Any)
    }

    /// Creates a builder for a `NoneOf` group
    #[must_use]
    pub const fn none_of() -> GroupBuilder<P> {
        GroupBuilder::<P>::new(GroupKind::None)
    }

    /// Combines this condition with another under `AllOf`
    #[must_use]
    pub fn and_also(self, other: Condition<P>) -> Self {
        Self::new(Condition::all_of(vec![self.condition, other]))
    }

    /// Combines this condition with another under `AnyOf`
    #[must_use]
    pub fn or_else(self, other: Condition<P>) -> Self {
        Self::new(Condition::any_of(vec![self.condition, other]))
    }

    /// Builds the final condition
    pub fn build(self) -> Condition<P> {
        self.condition
    }
}

// ============================================================================
// SECTION: Operator Trait Implementations
// ============================================================================

/// Implements the `!` operator for [`ConditionBuilder`].
///
/// The negation wraps the current condition in a single-child `NoneOf`.
///
/// # Examples
///
/// ```
/// # use form_logic::builder::ConditionBuilder;
/// # use form_logic::Condition;
/// let negated = !ConditionBuilder::leaf(1_u8);
/// assert_eq!(negated.build(), Condition::none_of(vec![Condition::leaf(1_u8)]));
/// ```
impl<P> Not for ConditionBuilder<P> {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::new(!self.condition)
    }
}

// ============================================================================
// SECTION: Group Builder
// ============================================================================

/// Builder for condition groups with fluent chaining
pub struct GroupBuilder<P> {
    /// Combinator applied to the collected children.
    kind: GroupKind,
    /// Conditions collected for the group.
    conditions: Vec<Condition<P>>,
}

impl<P> GroupBuilder<P> {
    /// Creates a new group builder of the given kind
    #[must_use]
    pub const fn new(kind: GroupKind) -> Self {
        Self {
            kind,
            conditions: Vec::new(),
        }
    }

    /// Adds a condition to the group
    #[must_use]
    pub fn with(mut self, condition: Condition<P>) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Adds a leaf to the group
    #[must_use]
    pub fn with_leaf(mut self, predicate: P) -> Self {
        self.conditions.push(Condition::Leaf(predicate));
        self
    }

    /// Adds multiple conditions to the group
    #[must_use]
    pub fn with_all<I>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = Condition<P>>,
    {
        self.conditions.extend(conditions);
        self
    }

    /// Returns the number of collected children
    #[must_use]
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Returns true when no children were collected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Builds the group condition
    #[must_use]
    pub fn build(self) -> Condition<P> {
        Condition::group(self.kind, self.conditions)
    }
}

// ============================================================================
// SECTION: Convenience Facades
// ============================================================================

/// Convenience functions for creating conditions without builders
pub mod convenience {
    use super::Condition;

    /// Creates a condition requiring all of the given conditions
    #[must_use]
    pub fn all<P>(conditions: Vec<Condition<P>>) -> Condition<P> {
        Condition::all_of(conditions)
    }

    /// Creates a condition requiring any of the given conditions
    #[must_use]
    pub fn any<P>(conditions: Vec<Condition<P>>) -> Condition<P> {
        Condition::any_of(conditions)
    }

    /// Creates a condition requiring none of the given conditions
    #[must_use]
    pub fn none<P>(conditions: Vec<Condition<P>>) -> Condition<P> {
        Condition::none_of(conditions)
    }

    /// Creates a condition from a leaf predicate
    #[must_use]
    pub const fn leaf<P>(predicate: P) -> Condition<P> {
        Condition::leaf(predicate)
    }
}
