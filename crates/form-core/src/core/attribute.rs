// crates/form-core/src/core/attribute.rs
// ============================================================================
// Module: Field Attributes
// Description: Typed field attributes, attribute kinds, and the attribute registry.
// Purpose: Parse raw document values into strongly typed, immutable attributes.
// Dependencies: regex, serde_json, thiserror
// ============================================================================

//! ## Overview
//! An [`Attribute`] is an immutable `{name, value}` pair whose name is fixed by
//! its [`AttributeKind`]. Some kinds are *constraints*: they carry a value that
//! a validator checks against the field value. The [`AttributeRegistry`] maps
//! document keys to kinds and is passed explicitly into builders and the codec;
//! there is no process-wide attribute table.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde_json::Number;
use serde_json::Value;
use thiserror::Error;

use crate::core::field::FieldType;
use crate::core::identifiers::FieldName;

// ============================================================================
// SECTION: Attribute Kinds
// ============================================================================

/// Closed catalog of attribute kinds.
///
/// # Invariants
/// - `as_str` values are unique and are the canonical document keys.
/// - Declaration order is the canonical ordering used by sets of kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttributeKind {
    /// Field name.
    Name,
    /// Field type tag.
    Type,
    /// Current field value (`null` means not provided).
    Value,
    /// Value used when input provides none.
    DefaultValue,
    /// Whether the field may be left empty.
    Optional,
    /// Human-readable label.
    Label,
    /// Human-readable description.
    Description,
    /// Inclusive numeric lower bound.
    Min,
    /// Inclusive numeric upper bound.
    Max,
    /// Inclusive lower bound on string or list length.
    MinLength,
    /// Inclusive upper bound on string or list length.
    MaxLength,
    /// Regular expression the whole string value must match.
    Pattern,
    /// Closed set of accepted values.
    AllowedValues,
}

impl AttributeKind {
    /// Every kind in canonical order.
    pub const ALL: [Self; 13] = [
        Self::Name,
        Self::Type,
        Self::Value,
        Self::DefaultValue,
        Self::Optional,
        Self::Label,
        Self::Description,
        Self::Min,
        Self::Max,
        Self::MinLength,
        Self::MaxLength,
        Self::Pattern,
        Self::AllowedValues,
    ];

    /// Kinds permitted on every attribute set regardless of its allow-list.
    pub const ALWAYS_ALLOWED: [Self; 5] =
        [Self::Name, Self::Type, Self::Value, Self::DefaultValue, Self::Optional];

    /// Returns the canonical attribute name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Type => "type",
            Self::Value => "value",
            Self::DefaultValue => "default_value",
            Self::Optional => "optional",
            Self::Label => "label",
            Self::Description => "description",
            Self::Min => "min",
            Self::Max => "max",
            Self::MinLength => "min_length",
            Self::MaxLength => "max_length",
            Self::Pattern => "pattern",
            Self::AllowedValues => "allowed_values",
        }
    }

    /// Looks up a kind by its canonical name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Returns true when the kind carries a validation rule.
    #[must_use]
    pub const fn is_constraint(self) -> bool {
        matches!(
            self,
            Self::Min
                | Self::Max
                | Self::MinLength
                | Self::MaxLength
                | Self::Pattern
                | Self::AllowedValues
        )
    }

    /// Returns true when the kind bypasses attribute set allow-lists.
    #[must_use]
    pub const fn is_always_allowed(self) -> bool {
        matches!(self, Self::Name | Self::Type | Self::Value | Self::DefaultValue | Self::Optional)
    }

    /// Parses a raw document value into an attribute of this kind.
    ///
    /// # Errors
    /// Returns [`AttributeError::InvalidValue`] when the value has the wrong
    /// shape for this kind.
    pub fn parse_value(self, raw: &Value) -> Result<Attribute, AttributeError> {
        let invalid = |reason: &str| AttributeError::InvalidValue {
            attribute: self,
            reason: reason.to_string(),
        };
        match self {
            Self::Name => match raw.as_str() {
                Some(name) if !name.is_empty() => Ok(Attribute::Name(FieldName::new(name))),
                _ => Err(invalid("expected a non-empty string")),
            },
            Self::Type => {
                let tag = raw.as_str().ok_or_else(|| invalid("expected a string"))?;
                FieldType::from_str(tag)
                    .map(Attribute::Type)
                    .map_err(|err| invalid(&err.to_string()))
            }
            Self::Value => Ok(Attribute::Value(raw.clone())),
            Self::DefaultValue => Ok(Attribute::DefaultValue(raw.clone())),
            Self::Optional => {
                raw.as_bool().map(Attribute::Optional).ok_or_else(|| invalid("expected a boolean"))
            }
            Self::Label => raw
                .as_str()
                .map(|text| Attribute::Label(text.to_string()))
                .ok_or_else(|| invalid("expected a string")),
            Self::Description => raw
                .as_str()
                .map(|text| Attribute::Description(text.to_string()))
                .ok_or_else(|| invalid("expected a string")),
            Self::Min => match raw {
                Value::Number(number) => Ok(Attribute::Min(number.clone())),
                _ => Err(invalid("expected a number")),
            },
            Self::Max => match raw {
                Value::Number(number) => Ok(Attribute::Max(number.clone())),
                _ => Err(invalid("expected a number")),
            },
            Self::MinLength => raw
                .as_u64()
                .map(Attribute::MinLength)
                .ok_or_else(|| invalid("expected a non-negative integer")),
            Self::MaxLength => raw
                .as_u64()
                .map(Attribute::MaxLength)
                .ok_or_else(|| invalid("expected a non-negative integer")),
            Self::Pattern => {
                let source = raw.as_str().ok_or_else(|| invalid("expected a string"))?;
                Pattern::new(source).map(Attribute::Pattern).map_err(|err| invalid(&err.to_string()))
            }
            Self::AllowedValues => match raw {
                Value::Array(values) => Ok(Attribute::AllowedValues(values.clone())),
                _ => Err(invalid("expected an array")),
            },
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Pattern
// ============================================================================

/// Compiled regular expression that keeps its source text.
///
/// Matching is anchored: the whole value must match the expression.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// Source expression as written in the document.
    source: String,
    /// Anchored compiled expression.
    regex: Regex,
}

impl Pattern {
    /// Compiles a pattern.
    ///
    /// # Errors
    /// Returns [`regex::Error`] when the expression does not compile.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{source})$"))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Returns the source expression.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns true when the whole input matches.
    #[must_use]
    pub fn is_match(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

// ============================================================================
// SECTION: Attributes
// ============================================================================

/// Immutable, typed field attribute.
///
/// # Invariants
/// - The attribute name is always `self.kind().as_str()`.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// Field name.
    Name(FieldName),
    /// Field type tag.
    Type(FieldType),
    /// Current field value.
    Value(Value),
    /// Default used when input provides no value.
    DefaultValue(Value),
    /// Optional flag.
    Optional(bool),
    /// Human-readable label.
    Label(String),
    /// Human-readable description.
    Description(String),
    /// Numeric lower bound.
    Min(Number),
    /// Numeric upper bound.
    Max(Number),
    /// Minimum length.
    MinLength(u64),
    /// Maximum length.
    MaxLength(u64),
    /// Full-match regular expression.
    Pattern(Pattern),
    /// Accepted values.
    AllowedValues(Vec<Value>),
}

impl Attribute {
    /// Returns the kind tag of the attribute.
    #[must_use]
    pub const fn kind(&self) -> AttributeKind {
        match self {
            Self::Name(_) => AttributeKind::Name,
            Self::Type(_) => AttributeKind::Type,
            Self::Value(_) => AttributeKind::Value,
            Self::DefaultValue(_) => AttributeKind::DefaultValue,
            Self::Optional(_) => AttributeKind::Optional,
            Self::Label(_) => AttributeKind::Label,
            Self::Description(_) => AttributeKind::Description,
            Self::Min(_) => AttributeKind::Min,
            Self::Max(_) => AttributeKind::Max,
            Self::MinLength(_) => AttributeKind::MinLength,
            Self::MaxLength(_) => AttributeKind::MaxLength,
            Self::Pattern(_) => AttributeKind::Pattern,
            Self::AllowedValues(_) => AttributeKind::AllowedValues,
        }
    }

    /// Returns the attribute name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Returns true when the attribute is a constraint.
    #[must_use]
    pub const fn is_constraint(&self) -> bool {
        self.kind().is_constraint()
    }

    /// Renders the attribute value as JSON.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Name(name) => Value::String(name.to_string()),
            Self::Type(field_type) => Value::String(field_type.as_str().to_string()),
            Self::Value(value) | Self::DefaultValue(value) => value.clone(),
            Self::Optional(flag) => Value::Bool(*flag),
            Self::Label(text) | Self::Description(text) => Value::String(text.clone()),
            Self::Min(number) | Self::Max(number) => Value::Number(number.clone()),
            Self::MinLength(length) | Self::MaxLength(length) => Value::from(*length),
            Self::Pattern(pattern) => Value::String(pattern.as_str().to_string()),
            Self::AllowedValues(values) => Value::Array(values.clone()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Attribute parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeError {
    /// Raw value has the wrong shape for the attribute kind.
    #[error("invalid value for attribute {attribute}: {reason}")]
    InvalidValue {
        /// Attribute being parsed.
        attribute: AttributeKind,
        /// Why the value was rejected.
        reason: String,
    },
    /// Key is not registered.
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),
}

// ============================================================================
// SECTION: Attribute Registry
// ============================================================================

/// Maps document keys to attribute kinds.
///
/// # Invariants
/// - Always-allowed kinds are registered under their canonical names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRegistry {
    /// Document key to kind.
    entries: BTreeMap<String, AttributeKind>,
}

impl AttributeRegistry {
    /// Registry with every kind under its canonical name.
    #[must_use]
    pub fn standard() -> Self {
        Self::restricted(AttributeKind::ALL)
    }

    /// Registry limited to the given kinds plus the always-allowed kinds.
    #[must_use]
    pub fn restricted(kinds: impl IntoIterator<Item = AttributeKind>) -> Self {
        let entries = AttributeKind::ALWAYS_ALLOWED
            .into_iter()
            .chain(kinds)
            .map(|kind| (kind.as_str().to_string(), kind))
            .collect();
        Self {
            entries,
        }
    }

    /// Registers an additional key for a kind.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>, kind: AttributeKind) -> Self {
        self.entries.insert(alias.into(), kind);
        self
    }

    /// Resolves a document key.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<AttributeKind> {
        self.entries.get(key).copied()
    }

    /// Returns true when the key is registered.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns registered keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Parses a keyed raw value into an attribute.
    ///
    /// # Errors
    /// Returns [`AttributeError::UnknownAttribute`] for unregistered keys and
    /// [`AttributeError::InvalidValue`] for malformed values.
    pub fn parse(&self, key: &str, raw: &Value) -> Result<Attribute, AttributeError> {
        let kind =
            self.lookup(key).ok_or_else(|| AttributeError::UnknownAttribute(key.to_string()))?;
        kind.parse_value(raw)
    }
}

impl Default for AttributeRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
