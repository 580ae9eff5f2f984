// crates/form-core/src/core/field.rs
// ============================================================================
// Module: Fields
// Description: Field types, fields, field builders, and ordered field sets.
// Purpose: Bind an attribute set to a field type and its legal constraints.
// Dependencies: crate::core::{attribute, attribute_set, identifiers}, serde_json
// ============================================================================

//! ## Overview
//! A [`Field`] owns exactly one [`AttributeSet`] whose allow-list is derived
//! from its [`FieldType`]. Construction always seeds `name`, `type`, `value`
//! (null) and `optional` (false), in that order. Fields are immutable; every
//! change produces a new field.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::core::attribute::Attribute;
use crate::core::attribute::AttributeKind;
use crate::core::attribute_set::AttributeSet;
use crate::core::attribute_set::AttributeSetError;
use crate::core::identifiers::FieldName;

// ============================================================================
// SECTION: Field Types
// ============================================================================

/// Catalog of field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Free-form string.
    Text,
    /// String with a single `@` separating non-empty parts.
    Email,
    /// Any JSON number.
    Number,
    /// Integral JSON number.
    Integer,
    /// Boolean.
    Boolean,
    /// Any scalar, usually restricted by `allowed_values`.
    Choice,
    /// Array of items.
    List,
}

/// Error returned when a field type tag is unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFieldType(pub String);

impl fmt::Display for UnknownFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field type: {}", self.0)
    }
}

impl std::error::Error for UnknownFieldType {}

impl FieldType {
    /// Returns the canonical type tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Choice => "choice",
            Self::List => "list",
        }
    }

    /// Returns the constraint kinds legal on this type.
    #[must_use]
    pub const fn legal_constraints(self) -> &'static [AttributeKind] {
        match self {
            Self::Text | Self::Email | Self::List => &[
                AttributeKind::MinLength,
                AttributeKind::MaxLength,
                AttributeKind::Pattern,
                AttributeKind::AllowedValues,
            ],
            Self::Number | Self::Integer => {
                &[AttributeKind::Min, AttributeKind::Max, AttributeKind::AllowedValues]
            }
            Self::Boolean | Self::Choice => &[AttributeKind::AllowedValues],
        }
    }

    /// Returns every kind a field of this type accepts.
    #[must_use]
    pub fn allowed_kinds(self) -> BTreeSet<AttributeKind> {
        AttributeKind::ALWAYS_ALLOWED
            .into_iter()
            .chain([AttributeKind::Label, AttributeKind::Description])
            .chain(self.legal_constraints().iter().copied())
            .collect()
    }

    /// Returns true when a non-null value has the shape of this type.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Text => value.is_string(),
            Self::Email => value.as_str().is_some_and(is_email),
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
            Self::Choice => !value.is_array() && !value.is_object(),
            Self::List => value.is_array(),
        }
    }
}

/// Checks for exactly one `@` with non-empty local and domain parts.
fn is_email(text: &str) -> bool {
    match text.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "email" => Ok(Self::Email),
            "number" => Ok(Self::Number),
            "integer" => Ok(Self::Integer),
            "boolean" => Ok(Self::Boolean),
            "choice" => Ok(Self::Choice),
            "list" => Ok(Self::List),
            other => Err(UnknownFieldType(other.to_string())),
        }
    }
}

// ============================================================================
// SECTION: Field
// ============================================================================

/// Immutable schema field.
///
/// # Invariants
/// - `name`, `type`, `value` and `optional` are always present.
/// - The attribute allow-list is `field_type.allowed_kinds()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Cached field name.
    name: FieldName,
    /// Cached field type.
    field_type: FieldType,
    /// Attribute storage.
    attributes: AttributeSet,
}

impl Field {
    /// Creates a field with the seeded attributes.
    #[must_use]
    pub fn new(name: impl Into<FieldName>, field_type: FieldType) -> Self {
        let name = name.into();
        let attributes = AttributeSet::with_allowed(field_type.allowed_kinds())
            .replace(Attribute::Name(name.clone()))
            .replace(Attribute::Type(field_type))
            .replace(Attribute::Value(Value::Null))
            .replace(Attribute::Optional(false));
        Self {
            name,
            field_type,
            attributes,
        }
    }

    /// Returns the field name.
    #[must_use]
    pub const fn name(&self) -> &FieldName {
        &self.name
    }

    /// Returns the field type.
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Returns the attribute set.
    #[must_use]
    pub const fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    /// Returns the attribute of `kind`, if present.
    #[must_use]
    pub fn attribute(&self, kind: AttributeKind) -> Option<&Attribute> {
        self.attributes.find(kind)
    }

    /// Returns the current value (`null` when not provided).
    #[must_use]
    pub fn value(&self) -> &Value {
        match self.attributes.find(AttributeKind::Value) {
            Some(Attribute::Value(value)) => value,
            _ => &Value::Null,
        }
    }

    /// Returns the declared default value.
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        match self.attributes.find(AttributeKind::DefaultValue) {
            Some(Attribute::DefaultValue(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns true when the field may be left empty.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        matches!(self.attributes.find(AttributeKind::Optional), Some(Attribute::Optional(true)))
    }

    /// Returns true when the field must hold a value.
    #[must_use]
    pub fn is_required(&self) -> bool {
        !self.is_optional()
    }

    /// Iterates constraint attributes in declared order.
    pub fn constraints(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|attribute| attribute.is_constraint())
    }

    /// Returns a copy with `attribute` set by name.
    ///
    /// # Errors
    /// Returns [`AttributeSetError::AttributeNotAllowed`] when the kind is not
    /// legal for the field type, or [`AttributeSetError::DuplicateAttribute`]
    /// when the attribute would rename or retype the field.
    pub fn with_attribute(&self, attribute: Attribute) -> Result<Self, AttributeSetError> {
        if matches!(attribute.kind(), AttributeKind::Name | AttributeKind::Type) {
            return Err(AttributeSetError::DuplicateAttribute(attribute.kind()));
        }
        Ok(Self {
            attributes: self.attributes.set(attribute)?,
            ..self.clone()
        })
    }

    /// Returns a copy with the given value.
    #[must_use]
    pub fn with_value(&self, value: Value) -> Self {
        Self {
            attributes: self.attributes.replace(Attribute::Value(value)),
            ..self.clone()
        }
    }

    /// Returns a copy with the given optional flag.
    #[must_use]
    pub fn with_optional(&self, optional: bool) -> Self {
        Self {
            attributes: self.attributes.replace(Attribute::Optional(optional)),
            ..self.clone()
        }
    }

    /// Renders the field as a JSON object of its attributes.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let object: Map<String, Value> = self
            .attributes
            .iter()
            .map(|attribute| (attribute.name().to_string(), attribute.to_json()))
            .collect();
        Value::Object(object)
    }
}

// ============================================================================
// SECTION: Field Builder
// ============================================================================

/// Staged construction of a [`Field`].
#[derive(Debug, Clone)]
pub struct FieldBuilder {
    /// Field name.
    name: FieldName,
    /// Field type.
    field_type: FieldType,
    /// Attributes to apply after the seeded ones.
    attributes: Vec<Attribute>,
}

impl FieldBuilder {
    /// Starts a builder for a field.
    #[must_use]
    pub fn new(name: impl Into<FieldName>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            attributes: Vec::new(),
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Marks the field optional.
    #[must_use]
    pub fn optional(self, optional: bool) -> Self {
        self.attribute(Attribute::Optional(optional))
    }

    /// Declares a default value.
    #[must_use]
    pub fn default_value(self, value: Value) -> Self {
        self.attribute(Attribute::DefaultValue(value))
    }

    /// Sets a label.
    #[must_use]
    pub fn label(self, label: impl Into<String>) -> Self {
        self.attribute(Attribute::Label(label.into()))
    }

    /// Builds the field.
    ///
    /// Seeded kinds (`value`, `optional`) replace their defaults; every other
    /// kind may appear once.
    ///
    /// # Errors
    /// Returns [`AttributeSetError`] for duplicate, disallowed, or identity
    /// (`name`, `type`) attributes.
    pub fn build(self) -> Result<Field, AttributeSetError> {
        let mut field = Field::new(self.name, self.field_type);
        for attribute in self.attributes {
            field = match attribute.kind() {
                AttributeKind::Value | AttributeKind::Optional => field.with_attribute(attribute)?,
                _ => Field {
                    attributes: field.attributes.add(attribute)?,
                    ..field
                },
            };
        }
        Ok(field)
    }
}

// ============================================================================
// SECTION: Field Set
// ============================================================================

/// Ordered collection of uniquely named fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldSet {
    /// Fields in declaration order.
    fields: Vec<Field>,
}

impl FieldSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: Vec::new(),
        }
    }

    /// Appends a field.
    ///
    /// # Errors
    /// Returns the duplicate name when a field with the same name exists.
    pub fn insert(&mut self, field: Field) -> Result<(), FieldName> {
        if self.get(field.name().as_str()).is_some() {
            return Err(field.name().clone());
        }
        self.fields.push(field);
        Ok(())
    }

    /// Replaces the same-named field, returning false when none exists.
    pub fn replace(&mut self, field: Field) -> bool {
        match self.fields.iter_mut().find(|existing| existing.name() == field.name()) {
            Some(slot) => {
                *slot = field;
                true
            }
            None => false,
        }
    }

    /// Returns the named field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name().as_str() == name)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates fields in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }
}

impl<'a> IntoIterator for &'a FieldSet {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
