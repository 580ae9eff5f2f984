// crates/form-logic/tests/serde_support.rs
// ============================================================================
// Module: Condition Serde Tests
// Description: RON/JSON encoding and structural validation limits.
// Purpose: Ensure untrusted condition text is bounded before use.
// ============================================================================

//! Integration tests for condition serde helpers.

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

mod support;
#[path = "support/mocks.rs"]
mod mocks;

use form_logic::Condition;
use form_logic::ConditionSerializer;
use form_logic::SerdeConfig;
use form_logic::SerdeError;
use form_logic::serde_support::convenience;
use mocks::MockLeaf;
use support::TestResult;
use support::ensure;

fn sample() -> Condition<MockLeaf> {
    form_logic::condition! {
        all [
            leaf(MockLeaf::ValueEq(3)),
            any [leaf(MockLeaf::AlwaysTrue), none [leaf(MockLeaf::Unresolved(1))]],
        ]
    }
}

fn nested(depth: usize) -> Condition<MockLeaf> {
    let mut tree = Condition::leaf(MockLeaf::AlwaysTrue);
    for _ in 1 .. depth {
        tree = Condition::all_of(vec![tree]);
    }
    tree
}

#[test]
fn ron_and_json_preserve_tree() -> TestResult {
    let tree = sample();
    let ron_text = convenience::to_ron(&tree)?;
    let from_ron: Condition<MockLeaf> = convenience::from_ron(&ron_text)?;
    ensure(from_ron == tree, "RON round trip changed the tree")?;

    let json_text = convenience::to_json(&tree)?;
    let from_json: Condition<MockLeaf> = convenience::from_json(&json_text)?;
    ensure(from_json == tree, "JSON round trip changed the tree")?;
    Ok(())
}

#[test]
fn deep_trees_are_rejected_on_decode() -> TestResult {
    let serializer = ConditionSerializer::default();
    let lenient = ConditionSerializer::new(SerdeConfig {
        validate_on_serialize: false,
        ..SerdeConfig::default()
    });
    let text = lenient.to_json(&nested(40))?;
    let decoded: Result<Condition<MockLeaf>, _> = serializer.from_json(&text);
    ensure(
        decoded
            == Err(SerdeError::TooDeep {
                max_depth: 32,
                actual_depth: 33,
            }),
        format!("unexpected decode result: {decoded:?}"),
    )?;
    ensure(convenience::is_valid(&nested(32)), "32 levels fit the default limit")?;
    Ok(())
}

#[test]
fn validation_flags_apply_per_direction() -> TestResult {
    let encode_only = ConditionSerializer::new(SerdeConfig {
        validate_on_deserialize: false,
        ..SerdeConfig::default()
    });
    let too_deep = SerdeError::TooDeep {
        max_depth: 32,
        actual_depth: 33,
    };
    let encoded = encode_only.to_json(&nested(40));
    ensure(encoded == Err(too_deep.clone()), format!("encode must validate: {encoded:?}"))?;

    let decode_only = ConditionSerializer::new(SerdeConfig {
        validate_on_serialize: false,
        ..SerdeConfig::default()
    });
    let text = decode_only.to_json(&nested(40))?;
    let lenient: Condition<MockLeaf> = encode_only.from_json(&text)?;
    ensure(lenient == nested(40), "decode-side validation disabled")?;
    let strict: Result<Condition<MockLeaf>, _> = decode_only.from_json(&text);
    ensure(strict == Err(too_deep), format!("decode must validate: {strict:?}"))?;
    Ok(())
}

#[test]
fn empty_groups_rejected_when_disallowed() -> TestResult {
    let serializer = ConditionSerializer::new(SerdeConfig {
        allow_empty_groups: false,
        ..SerdeConfig::default()
    });
    let tree: Condition<MockLeaf> =
        Condition::all_of(vec![Condition::any_of(Vec::new())]);
    ensure(
        serializer.validate(&tree)
            == Err(SerdeError::EmptyGroup {
                kind: "any",
            }),
        "empty any group must be reported",
    )?;
    ensure(convenience::validate(&tree).is_ok(), "defaults allow empty groups")?;
    Ok(())
}

#[test]
fn malformed_text_reports_invalid_structure() -> TestResult {
    let decoded: Result<Condition<MockLeaf>, _> = convenience::from_json("{\"Bogus\": []}");
    ensure(
        matches!(decoded, Err(SerdeError::InvalidStructure(_))),
        "unknown variant must be rejected",
    )?;
    let decoded: Result<Condition<MockLeaf>, _> = convenience::from_ron("AllOf([");
    ensure(matches!(decoded, Err(SerdeError::InvalidStructure(_))), "truncated RON rejected")?;
    Ok(())
}
