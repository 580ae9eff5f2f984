// crates/form-core/src/core/validator.rs
// ============================================================================
// Module: Validators
// Description: Validator catalog, dependency declarations, and value checks.
// Purpose: Describe what each validator checks and what it depends on.
// Dependencies: crate::core::{attribute, field}, serde, serde_json
// ============================================================================

//! ## Overview
//! Every field carries a `required` and a `type` validator; each constraint
//! attribute adds the validator of the same name. Dependencies are declared
//! by name so that a [`ValidatorRegistry`] can point a validator at any name,
//! including names that turn out not to be validators. The pipeline in
//! [`crate::runtime::pipeline`] resolves those names per field.
//!
//! Checks treat a null value as vacuously valid; only `required` looks at
//! absence.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Number;
use serde_json::Value;

use crate::core::attribute::Attribute;
use crate::core::attribute::AttributeKind;
use crate::core::field::Field;
use crate::core::field::FieldType;

// ============================================================================
// SECTION: Validator Kinds
// ============================================================================

/// Closed validator catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorKind {
    /// Required fields must hold a value.
    Required,
    /// Value must have the field type's shape.
    Type,
    /// Number at or above `min`.
    Min,
    /// Number at or below `max`.
    Max,
    /// Length at or above `min_length`.
    MinLength,
    /// Length at or below `max_length`.
    MaxLength,
    /// String fully matching `pattern`.
    Pattern,
    /// Value (or each list item) in `allowed_values`.
    AllowedValues,
}

impl ValidatorKind {
    /// Every validator kind.
    pub const ALL: [Self; 8] = [
        Self::Required,
        Self::Type,
        Self::Min,
        Self::Max,
        Self::MinLength,
        Self::MaxLength,
        Self::Pattern,
        Self::AllowedValues,
    ];

    /// Returns the validator name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Type => "type",
            Self::Min => "min",
            Self::Max => "max",
            Self::MinLength => "min_length",
            Self::MaxLength => "max_length",
            Self::Pattern => "pattern",
            Self::AllowedValues => "allowed_values",
        }
    }

    /// Looks up a validator by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Returns the validator backing a constraint attribute.
    #[must_use]
    pub const fn for_constraint(kind: AttributeKind) -> Option<Self> {
        match kind {
            AttributeKind::Min => Some(Self::Min),
            AttributeKind::Max => Some(Self::Max),
            AttributeKind::MinLength => Some(Self::MinLength),
            AttributeKind::MaxLength => Some(Self::MaxLength),
            AttributeKind::Pattern => Some(Self::Pattern),
            AttributeKind::AllowedValues => Some(Self::AllowedValues),
            _ => None,
        }
    }

    /// Returns the constraint attribute this validator checks, if any.
    #[must_use]
    pub const fn constraint(self) -> Option<AttributeKind> {
        match self {
            Self::Required | Self::Type => None,
            Self::Min => Some(AttributeKind::Min),
            Self::Max => Some(AttributeKind::Max),
            Self::MinLength => Some(AttributeKind::MinLength),
            Self::MaxLength => Some(AttributeKind::MaxLength),
            Self::Pattern => Some(AttributeKind::Pattern),
            Self::AllowedValues => Some(AttributeKind::AllowedValues),
        }
    }

    /// Returns the built-in dependencies.
    #[must_use]
    pub const fn default_dependencies(self) -> &'static [&'static str] {
        match self {
            Self::Required => &[],
            Self::Type => &["required"],
            _ => &["type"],
        }
    }

    /// Checks the field's current value.
    ///
    /// # Errors
    /// Returns a failure message when the check does not hold.
    pub fn check(self, field: &Field) -> Result<(), String> {
        let value = field.value();
        if self == Self::Required {
            return if field.is_required() && value.is_null() {
                Err("value is required".to_string())
            } else {
                Ok(())
            };
        }
        if value.is_null() {
            return Ok(());
        }
        match self {
            Self::Required => Ok(()),
            Self::Type => check_type(field.field_type(), value),
            Self::Min => match field.attribute(AttributeKind::Min) {
                Some(Attribute::Min(min)) => check_bound(value, min, true),
                _ => Ok(()),
            },
            Self::Max => match field.attribute(AttributeKind::Max) {
                Some(Attribute::Max(max)) => check_bound(value, max, false),
                _ => Ok(()),
            },
            Self::MinLength => match field.attribute(AttributeKind::MinLength) {
                Some(Attribute::MinLength(min)) => {
                    let length = value_length(value)?;
                    if length < *min {
                        Err(format!("length {length} is below minimum {min}"))
                    } else {
                        Ok(())
                    }
                }
                _ => Ok(()),
            },
            Self::MaxLength => match field.attribute(AttributeKind::MaxLength) {
                Some(Attribute::MaxLength(max)) => {
                    let length = value_length(value)?;
                    if length > *max {
                        Err(format!("length {length} exceeds maximum {max}"))
                    } else {
                        Ok(())
                    }
                }
                _ => Ok(()),
            },
            Self::Pattern => match field.attribute(AttributeKind::Pattern) {
                Some(Attribute::Pattern(pattern)) => match value.as_str() {
                    Some(text) if pattern.is_match(text) => Ok(()),
                    Some(_) => Err(format!("value does not match pattern {}", pattern.as_str())),
                    None => Err("pattern applies to strings only".to_string()),
                },
                _ => Ok(()),
            },
            Self::AllowedValues => match field.attribute(AttributeKind::AllowedValues) {
                Some(Attribute::AllowedValues(allowed)) => check_allowed(field, value, allowed),
                _ => Ok(()),
            },
        }
    }
}

impl fmt::Display for ValidatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Check Helpers
// ============================================================================

/// Checks the value shape against the field type.
fn check_type(field_type: FieldType, value: &Value) -> Result<(), String> {
    if field_type.accepts(value) { Ok(()) } else { Err(format!("value is not of type {field_type}")) }
}

/// Checks a numeric bound; `lower` selects `>=` versus `<=`.
fn check_bound(value: &Value, bound: &Number, lower: bool) -> Result<(), String> {
    let (Some(actual), Some(limit)) = (value.as_f64(), bound.as_f64()) else {
        return Err("bound applies to numbers only".to_string());
    };
    if lower && actual < limit {
        Err(format!("{actual} is below minimum {bound}"))
    } else if !lower && actual > limit {
        Err(format!("{actual} exceeds maximum {bound}"))
    } else {
        Ok(())
    }
}

/// Returns the character count of a string or the item count of an array.
fn value_length(value: &Value) -> Result<u64, String> {
    let length = match value {
        Value::String(text) => text.chars().count(),
        Value::Array(items) => items.len(),
        _ => return Err("length applies to strings and lists only".to_string()),
    };
    u64::try_from(length).map_err(|_| "length out of range".to_string())
}

/// Checks membership; list fields check every item.
fn check_allowed(field: &Field, value: &Value, allowed: &[Value]) -> Result<(), String> {
    match (field.field_type(), value) {
        (FieldType::List, Value::Array(items)) => {
            match items.iter().find(|item| !allowed.contains(item)) {
                Some(item) => Err(format!("item {item} is not an allowed value")),
                None => Ok(()),
            }
        }
        _ if allowed.contains(value) => Ok(()),
        _ => Err(format!("{value} is not an allowed value")),
    }
}

// ============================================================================
// SECTION: Validator Registry
// ============================================================================

/// Dependency declarations per validator kind.
///
/// # Invariants
/// - Kinds without an override use [`ValidatorKind::default_dependencies`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatorRegistry {
    /// Replaced dependency lists.
    overrides: BTreeMap<ValidatorKind, Vec<String>>,
}

impl ValidatorRegistry {
    /// Registry with the built-in dependencies.
    #[must_use]
    pub fn standard() -> Self {
        Self::default()
    }

    /// Replaces the dependencies of `kind`.
    #[must_use]
    pub fn with_dependencies<I, S>(mut self, kind: ValidatorKind, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.overrides.insert(kind, dependencies.into_iter().map(Into::into).collect());
        self
    }

    /// Returns the dependency names of `kind` in declared order.
    #[must_use]
    pub fn dependencies(&self, kind: ValidatorKind) -> Vec<&str> {
        match self.overrides.get(&kind) {
            Some(names) => names.iter().map(String::as_str).collect(),
            None => kind.default_dependencies().to_vec(),
        }
    }
}
