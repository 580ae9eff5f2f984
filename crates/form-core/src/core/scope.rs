// crates/form-core/src/core/scope.rs
// ============================================================================
// Module: Scopes
// Description: Scope path parsing and read-only resolution against fields.
// Purpose: Address a field, one of its attributes, or an attribute's raw value.
// Dependencies: crate::core::{attribute, field, identifiers}, serde, thiserror
// ============================================================================

//! ## Overview
//! A [`Scope`] is a parsed path of the form
//! `#/fields/<field>[/<attribute>[/value]]`. Resolution is read-only and
//! returns a borrowed [`ResolvedTarget`]; writes happen by building an updated
//! field and replacing it in the owning [`FieldSet`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::attribute::Attribute;
use crate::core::field::Field;
use crate::core::field::FieldSet;
use crate::core::identifiers::FieldName;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix shared by every scope path.
pub const SCOPE_PREFIX: &str = "#/fields/";

/// Trailing segment that unwraps an attribute to its raw value.
const VALUE_SEGMENT: &str = "value";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Scope parsing and resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// Path text is not a valid scope.
    #[error("malformed scope `{scope}`: {reason}")]
    Malformed {
        /// Offending path text.
        scope: String,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// A segment names nothing in the schema.
    #[error("scope `{scope}` does not resolve: no `{segment}`")]
    NotFound {
        /// Scope being resolved.
        scope: String,
        /// First segment that failed to resolve.
        segment: String,
    },
}

// ============================================================================
// SECTION: Scope
// ============================================================================

/// Parsed scope path.
///
/// # Invariants
/// - `field` is non-empty and contains no `/`.
/// - `unwrap_value` implies `attribute.is_some()`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Scope {
    /// Addressed field.
    field: FieldName,
    /// Addressed attribute name.
    attribute: Option<String>,
    /// Whether the path ends in `/value`.
    unwrap_value: bool,
}

impl Scope {
    /// Parses a scope path.
    ///
    /// # Errors
    /// Returns [`ScopeError::Malformed`] for a wrong prefix, empty segments, or
    /// segments beyond `<attribute>/value`.
    pub fn parse(text: &str) -> Result<Self, ScopeError> {
        let malformed = |reason| ScopeError::Malformed {
            scope: text.to_string(),
            reason,
        };
        let rest = text
            .strip_prefix(SCOPE_PREFIX)
            .ok_or_else(|| malformed("expected `#/fields/` prefix"))?;
        let segments: Vec<&str> = rest.split('/').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(malformed("empty path segment"));
        }
        match segments.as_slice() {
            [field] => Ok(Self::field(*field)),
            [field, attribute] => Ok(Self::attribute(*field, *attribute)),
            [field, attribute, VALUE_SEGMENT] => Ok(Self::value(*field, *attribute)),
            [_, _, _] => Err(malformed("only `value` may follow an attribute")),
            _ => Err(malformed("too many path segments")),
        }
    }

    /// Scope addressing a whole field.
    #[must_use]
    pub fn field(field: impl Into<FieldName>) -> Self {
        Self {
            field: field.into(),
            attribute: None,
            unwrap_value: false,
        }
    }

    /// Scope addressing one attribute of a field.
    #[must_use]
    pub fn attribute(field: impl Into<FieldName>, attribute: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            attribute: Some(attribute.into()),
            unwrap_value: false,
        }
    }

    /// Scope addressing the raw value of a field attribute.
    #[must_use]
    pub fn value(field: impl Into<FieldName>, attribute: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            attribute: Some(attribute.into()),
            unwrap_value: true,
        }
    }

    /// Returns the addressed field name.
    #[must_use]
    pub const fn field_name(&self) -> &FieldName {
        &self.field
    }

    /// Returns the addressed attribute name, if any.
    #[must_use]
    pub fn attribute_name(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    /// Returns true when the scope addresses a whole field.
    #[must_use]
    pub const fn is_field(&self) -> bool {
        self.attribute.is_none()
    }

    /// Returns true when the scope ends in `/value`.
    #[must_use]
    pub const fn unwraps_value(&self) -> bool {
        self.unwrap_value
    }

    /// Resolves the scope against a field collection.
    ///
    /// # Errors
    /// Returns [`ScopeError::NotFound`] naming the first unresolved segment.
    pub fn resolve<'a>(&self, fields: &'a FieldSet) -> Result<ResolvedTarget<'a>, ScopeError> {
        let field = fields.get(self.field.as_str()).ok_or_else(|| ScopeError::NotFound {
            scope: self.to_string(),
            segment: self.field.to_string(),
        })?;
        let mut target = ResolvedTarget::Field(field);
        if let Some(attribute) = &self.attribute {
            target = target.child(attribute).map_err(|err| self.rescope(err))?;
            if self.unwrap_value {
                target = target.child(VALUE_SEGMENT).map_err(|err| self.rescope(err))?;
            }
        }
        Ok(target)
    }

    /// Reports a resolution error against this scope's full path.
    fn rescope(&self, err: ScopeError) -> ScopeError {
        match err {
            ScopeError::NotFound {
                segment, ..
            } => ScopeError::NotFound {
                scope: self.to_string(),
                segment,
            },
            other @ ScopeError::Malformed { .. } => other,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCOPE_PREFIX}{}", self.field)?;
        if let Some(attribute) = &self.attribute {
            write!(f, "/{attribute}")?;
            if self.unwrap_value {
                write!(f, "/{VALUE_SEGMENT}")?;
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for Scope {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Scope {
    type Error = ScopeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        scope.to_string()
    }
}

// ============================================================================
// SECTION: Resolved Targets
// ============================================================================

/// Borrowed result of resolving a scope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedTarget<'a> {
    /// A whole field.
    Field(&'a Field),
    /// One attribute of a field.
    Attribute {
        /// Owning field.
        field: &'a Field,
        /// Addressed attribute.
        attribute: &'a Attribute,
    },
    /// The raw value of a field attribute.
    Value {
        /// Owning field.
        field: &'a Field,
        /// Attribute holding the value.
        attribute: &'a Attribute,
    },
}

impl<'a> ResolvedTarget<'a> {
    /// Unwraps the target to JSON.
    ///
    /// Fields render as an object of their attributes; attributes and values
    /// render as the raw attribute value.
    #[must_use]
    pub fn value(&self) -> Value {
        match self {
            Self::Field(field) => field.to_json(),
            Self::Attribute {
                attribute, ..
            }
            | Self::Value {
                attribute, ..
            } => attribute.to_json(),
        }
    }

    /// Returns the owning field.
    #[must_use]
    pub const fn field(&self) -> &'a Field {
        match *self {
            Self::Field(field)
            | Self::Attribute {
                field, ..
            }
            | Self::Value {
                field, ..
            } => field,
        }
    }

    /// Returns the scope that addresses this target.
    #[must_use]
    pub fn scope(&self) -> Scope {
        match self {
            Self::Field(field) => Scope::field(field.name().clone()),
            Self::Attribute {
                field,
                attribute,
            } => Scope::attribute(field.name().clone(), attribute.name()),
            Self::Value {
                field,
                attribute,
            } => Scope::value(field.name().clone(), attribute.name()),
        }
    }

    /// Descends one path segment.
    ///
    /// # Errors
    /// Returns [`ScopeError::NotFound`] when the segment names nothing below
    /// this target.
    pub fn child(&self, segment: &str) -> Result<Self, ScopeError> {
        let not_found = || ScopeError::NotFound {
            scope: self.scope().to_string(),
            segment: segment.to_string(),
        };
        match *self {
            Self::Field(field) => field
                .attributes()
                .find_by_name(segment)
                .map(|attribute| Self::Attribute {
                    field,
                    attribute,
                })
                .ok_or_else(not_found),
            Self::Attribute {
                field,
                attribute,
            } if segment == VALUE_SEGMENT => Ok(Self::Value {
                field,
                attribute,
            }),
            Self::Attribute { .. } | Self::Value { .. } => Err(not_found()),
        }
    }
}
