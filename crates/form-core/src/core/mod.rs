// crates/form-core/src/core/mod.rs
// ============================================================================
// Module: Form Core Types
// Description: Field, attribute, scope, rule, and validator domain types.
// Purpose: Provide the typed vocabulary shared by the runtime and documents.
// Dependencies: form-logic, regex, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Core types describe a form schema: fields and their copy-on-write attribute
//! sets, scopes addressing fields and attributes, predicate leaves for
//! condition trees, rule outcomes, validator kinds, and validation results.
//! These types carry no evaluation state; the runtime drives them.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod attribute;
pub mod attribute_set;
pub mod field;
pub mod identifiers;
pub mod outcome;
pub mod predicate;
pub mod result;
pub mod rule;
pub mod scope;
pub mod validator;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use attribute::Attribute;
pub use attribute::AttributeError;
pub use attribute::AttributeKind;
pub use attribute::AttributeRegistry;
pub use attribute::Pattern;
pub use attribute_set::AttributeSet;
pub use attribute_set::AttributeSetError;
pub use field::Field;
pub use field::FieldBuilder;
pub use field::FieldSet;
pub use field::FieldType;
pub use field::UnknownFieldType;
pub use identifiers::FieldName;
pub use identifiers::SchemaName;
pub use outcome::Outcome;
pub use outcome::OutcomeAction;
pub use predicate::ConditionScopes;
pub use predicate::FieldPredicate;
pub use predicate::Operator;
pub use predicate::RuleCondition;
pub use predicate::evaluate_operator;
pub use result::ConstraintResult;
pub use result::FieldResult;
pub use result::SchemaResult;
pub use result::ValidationStatus;
pub use rule::Rule;
pub use rule::RuleBuilder;
pub use rule::RuleError;
pub use rule::RuleSet;
pub use scope::ResolvedTarget;
pub use scope::SCOPE_PREFIX;
pub use scope::Scope;
pub use scope::ScopeError;
pub use validator::ValidatorKind;
pub use validator::ValidatorRegistry;
