// crates/form-logic/src/condition.rs
// ============================================================================
// Module: Condition Core Types
// Description: Boolean group algebra (all/any/none) over typed leaf predicates.
// Purpose: Define `Condition` and `GroupKind` along with evaluation helpers.
// Dependencies: serde::{Deserialize, Serialize}, smallvec::SmallVec
// ============================================================================

//! ## Overview
//! This module defines the condition tree used by rules: three group
//! combinators and a leaf boundary where domain predicates are evaluated.
//! Evaluation short-circuits in child order and reports leaf failures through
//! a [`LeafErrorPolicy`] instead of coercing them silently.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use smallvec::SmallVec;

use crate::trace::ConditionTrace;
use crate::trace::NoopTrace;
use crate::traits::ConditionEval;
use crate::traits::LeafErrorPolicy;

// ============================================================================
// SECTION: Group Kind
// ============================================================================

/// Combinator applied by a condition group.
///
/// # Invariants
/// - Labels returned by [`GroupKind::as_str`] are stable interchange names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    /// Every child must match. Empty groups match.
    All,
    /// At least one child must match. Empty groups never match.
    Any,
    /// No child may match. Empty groups match.
    None,
}

impl GroupKind {
    /// Returns the stable interchange label for the group kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Any => "any",
            Self::None => "none",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a group label is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGroupKind(pub String);

impl fmt::Display for UnknownGroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown condition group '{}', expected all, any or none", self.0)
    }
}

impl std::error::Error for UnknownGroupKind {}

impl FromStr for GroupKind {
    type Err = UnknownGroupKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "all" => Ok(Self::All),
            "any" => Ok(Self::Any),
            "none" => Ok(Self::None),
            other => Err(UnknownGroupKind(other.to_string())),
        }
    }
}

// ============================================================================
// SECTION: Condition Definition
// ============================================================================

/// Condition tree with domain-specific leaves
///
/// Groups are universal and domain-agnostic; the `Leaf` variant is the
/// boundary where domain semantics (scope resolution, comparison) are
/// injected through [`ConditionEval`].
#[derive(Debug, Clone, PartialEq, Hash, Serialize, Deserialize)]
pub enum Condition<P> {
    /// Every child must match. Empty `AllOf` is vacuously true.
    AllOf(SmallVec<[Box<Self>; 4]>),

    /// At least one child must match. Empty `AnyOf` is false.
    AnyOf(SmallVec<[Box<Self>; 4]>),

    /// No child may match. Empty `NoneOf` is vacuously true.
    NoneOf(SmallVec<[Box<Self>; 4]>),

    /// Domain-specific atomic predicate.
    Leaf(P),
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

impl<P> Condition<P> {
    /// Evaluates the tree with fail-fast leaf errors.
    ///
    /// # Errors
    /// Returns the first leaf error reached during evaluation.
    pub fn matches(&self, context: &P::Context<'_>) -> Result<bool, P::Error>
    where
        P: ConditionEval,
    {
        let mut trace = NoopTrace;
        self.matches_with(context, LeafErrorPolicy::Propagate, &mut trace)
    }

    /// Evaluates the tree with an explicit leaf error policy and a trace hook.
    ///
    /// Children are visited in order and evaluation stops as soon as the
    /// group outcome is decided, so leaves after the deciding child are not
    /// evaluated and cannot report errors.
    ///
    /// # Errors
    /// Returns a leaf error when `policy` is [`LeafErrorPolicy::Propagate`].
    pub fn matches_with<T>(
        &self,
        context: &P::Context<'_>,
        policy: LeafErrorPolicy,
        trace: &mut T,
    ) -> Result<bool, P::Error>
    where
        P: ConditionEval,
        T: ConditionTrace<P>,
    {
        let (kind, matched) = match self {
            Self::Leaf(leaf) => return eval_leaf(leaf, context, policy, trace),
            Self::AllOf(children) => {
                let mut matched = true;
                for child in children {
                    if !child.matches_with(context, policy, trace)? {
                        matched = false;
                        break;
                    }
                }
                (GroupKind::All, matched)
            }
            Self::AnyOf(children) => {
                let mut matched = false;
                for child in children {
                    if child.matches_with(context, policy, trace)? {
                        matched = true;
                        break;
                    }
                }
                (GroupKind::Any, matched)
            }
            Self::NoneOf(children) => {
                let mut matched = true;
                for child in children {
                    if child.matches_with(context, policy, trace)? {
                        matched = false;
                        break;
                    }
                }
                (GroupKind::None, matched)
            }
        };
        trace.on_group_evaluated(kind, matched);
        Ok(matched)
    }
}

/// Evaluates a single leaf and applies the error policy.
fn eval_leaf<P, T>(
    leaf: &P,
    context: &P::Context<'_>,
    policy: LeafErrorPolicy,
    trace: &mut T,
) -> Result<bool, P::Error>
where
    P: ConditionEval,
    T: ConditionTrace<P>,
{
    match leaf.eval(context) {
        Ok(matched) => {
            trace.on_leaf_evaluated(leaf, matched);
            Ok(matched)
        }
        Err(error) => match policy {
            LeafErrorPolicy::Propagate => Err(error),
            LeafErrorPolicy::TreatAsNonMatch => {
                trace.on_leaf_suppressed(leaf, &error);
                Ok(false)
            }
        },
    }
}

// ============================================================================
// SECTION: Introspection
// ============================================================================

impl<P> Condition<P> {
    /// Returns the group kind, or `None` for leaves.
    #[must_use]
    pub const fn kind(&self) -> Option<GroupKind> {
        match self {
            Self::AllOf(_) => Some(GroupKind::All),
            Self::AnyOf(_) => Some(GroupKind::Any),
            Self::NoneOf(_) => Some(GroupKind::None),
            Self::Leaf(_) => None,
        }
    }

    /// Returns the direct children of a group (empty for leaves).
    #[must_use]
    pub fn children(&self) -> &[Box<Self>] {
        match self {
            Self::AllOf(children) | Self::AnyOf(children) | Self::NoneOf(children) => children,
            Self::Leaf(_) => &[],
        }
    }

    /// Returns true when this node is a leaf.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Returns every leaf in depth-first order.
    #[must_use]
    pub fn leaves(&self) -> Vec<&P> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    /// Appends leaves to `out` in depth-first order.
    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a P>) {
        match self {
            Self::Leaf(leaf) => out.push(leaf),
            Self::AllOf(children) | Self::AnyOf(children) | Self::NoneOf(children) => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }

    /// Returns the nesting depth; a lone leaf has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::AllOf(children) | Self::AnyOf(children) | Self::NoneOf(children) => {
                1 + children.iter().map(|child| child.depth()).max().unwrap_or(0)
            }
        }
    }

    /// Returns the number of nodes in the tree.
    #[must_use]
    pub fn complexity(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::AllOf(children) | Self::AnyOf(children) | Self::NoneOf(children) => {
                1 + children.iter().map(|child| child.complexity()).sum::<usize>()
            }
        }
    }

    /// Determines if this condition matches regardless of leaf values.
    #[must_use]
    pub fn is_trivially_satisfied(&self) -> bool {
        match self {
            Self::AllOf(children) => children.iter().all(|child| child.is_trivially_satisfied()),
            Self::AnyOf(children) => children.iter().any(|child| child.is_trivially_satisfied()),
            Self::NoneOf(children) => {
                children.iter().all(|child| child.is_trivially_unsatisfiable())
            }
            Self::Leaf(_) => false,
        }
    }

    /// Determines if this condition can never match regardless of leaf values.
    #[must_use]
    pub fn is_trivially_unsatisfiable(&self) -> bool {
        match self {
            Self::AllOf(children) => {
                children.iter().any(|child| child.is_trivially_unsatisfiable())
            }
            Self::AnyOf(children) => {
                children.iter().all(|child| child.is_trivially_unsatisfiable())
            }
            Self::NoneOf(children) => children.iter().any(|child| child.is_trivially_satisfied()),
            Self::Leaf(_) => false,
        }
    }

    /// Converts leaves with a fallible mapping, preserving tree shape.
    ///
    /// # Errors
    /// Returns the first error produced by `map`.
    pub fn try_map_leaves<Q, E, F>(self, map: &mut F) -> Result<Condition<Q>, E>
    where
        F: FnMut(P) -> Result<Q, E>,
    {
        let convert = |children: SmallVec<[Box<Self>; 4]>,
                       map: &mut F|
         -> Result<SmallVec<[Box<Condition<Q>>; 4]>, E> {
            children.into_iter().map(|child| (*child).try_map_leaves(map).map(Box::new)).collect()
        };
        Ok(match self {
            Self::Leaf(leaf) => Condition::Leaf(map(leaf)?),
            Self::AllOf(children) => Condition::AllOf(convert(children, map)?),
            Self::AnyOf(children) => Condition::AnyOf(convert(children, map)?),
            Self::NoneOf(children) => Condition::NoneOf(convert(children, map)?),
        })
    }
}

// ============================================================================
// SECTION: Constructor Helpers
// ============================================================================

impl<P> Condition<P> {
    /// Creates a group of the given kind.
    pub fn group(kind: GroupKind, conditions: Vec<Self>) -> Self {
        let children = conditions.into_iter().map(Box::new).collect();
        match kind {
            GroupKind::All => Self::AllOf(children),
            GroupKind::Any => Self::AnyOf(children),
            GroupKind::None => Self::NoneOf(children),
        }
    }

    /// Creates an `AllOf` group.
    pub fn all_of(conditions: Vec<Self>) -> Self {
        Self::group(GroupKind::All, conditions)
    }

    /// Creates an `AnyOf` group.
    pub fn any_of(conditions: Vec<Self>) -> Self {
        Self::group(GroupKind::Any, conditions)
    }

    /// Creates a `NoneOf` group.
    pub fn none_of(conditions: Vec<Self>) -> Self {
        Self::group(GroupKind::None, conditions)
    }

    /// Creates a leaf condition.
    pub const fn leaf(predicate: P) -> Self {
        Self::Leaf(predicate)
    }

    /// Wraps a leaf in a single-child `AllOf`; groups are returned unchanged.
    #[must_use]
    pub fn into_group(self) -> Self {
        if self.is_leaf() { Self::all_of(vec![self]) } else { self }
    }
}

impl<P> std::ops::Not for Condition<P> {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::none_of(vec![self])
    }
}

// ============================================================================
// SECTION: Default Implementations
// ============================================================================

impl<P> Default for Condition<P> {
    /// Creates an empty `AllOf` group (always matches)
    fn default() -> Self {
        Self::AllOf(SmallVec::new())
    }
}
