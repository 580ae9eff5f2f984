// crates/form-logic/src/tests.rs
// ============================================================================
// Module: Condition Logic Unit Tests
// Description: Unit tests for tree shape helpers and the condition macro.
// Purpose: Cover crate-internal helpers that integration tests cannot reach.
// Dependencies: form-logic
// ============================================================================

//! ## Overview
//! Unit tests for condition shape helpers. Evaluation semantics are covered by
//! the integration suites under `tests/`.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
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

use crate::Condition;
use crate::GroupKind;
use crate::SerdeConfig;
use crate::SerdeError;
use crate::serde_support::ConditionValidator;

// ============================================================================
// SECTION: Shape Helpers
// ============================================================================

#[test]
fn depth_counts_groups_and_leaves() {
    let tree: Condition<u8> = crate::condition! {
        all [leaf(1), any [leaf(2), none [leaf(3)]]]
    };
    assert_eq!(tree.depth(), 4);
    assert_eq!(tree.complexity(), 6);
    assert_eq!(Condition::<u8>::default().depth(), 1);
}

#[test]
fn into_group_wraps_leaves_only() {
    let leaf = Condition::leaf(7_u8).into_group();
    assert_eq!(leaf.kind(), Some(GroupKind::All));
    assert_eq!(leaf.children().len(), 1);

    let group = Condition::any_of(vec![Condition::leaf(1_u8)]).into_group();
    assert_eq!(group.kind(), Some(GroupKind::Any));
}

#[test]
fn try_map_leaves_preserves_shape() {
    let tree: Condition<u8> = crate::condition! { none [leaf(1), all [leaf(2)]] };
    let mapped: Result<Condition<String>, ()> =
        tree.try_map_leaves(&mut |value: u8| Ok(value.to_string()));
    let mapped = mapped.unwrap();
    assert_eq!(mapped.kind(), Some(GroupKind::None));
    assert_eq!(mapped.leaves(), vec!["1", "2"]);
}

#[test]
fn try_map_leaves_stops_on_first_error() {
    let tree: Condition<u8> = crate::condition! { all [leaf(1), leaf(2), leaf(3)] };
    let mut seen = Vec::new();
    let mapped: Result<Condition<u8>, u8> = tree.try_map_leaves(&mut |value: u8| {
        seen.push(value);
        if value == 2 { Err(value) } else { Ok(value) }
    });
    assert_eq!(mapped, Err(2));
    assert_eq!(seen, vec![1, 2]);
}

#[test]
fn validator_counts_root_as_depth_one() {
    let validator = ConditionValidator::new(SerdeConfig {
        max_depth: 2,
        ..SerdeConfig::default()
    });
    let shallow: Condition<u8> = crate::condition! { all [leaf(1)] };
    let deep: Condition<u8> = crate::condition! { all [any [leaf(1)]] };
    assert_eq!(validator.validate(&shallow), Ok(()));
    assert_eq!(
        validator.validate(&deep),
        Err(SerdeError::TooDeep {
            max_depth: 2,
            actual_depth: 3
        })
    );
}
