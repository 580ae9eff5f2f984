// crates/form-core/src/core/attribute_set.rs
// ============================================================================
// Module: Attribute Sets
// Description: Ordered, unique-by-name, copy-on-write attribute collections.
// Purpose: Hold field attributes under an optional allow-list of kinds.
// Dependencies: crate::core::attribute, thiserror
// ============================================================================

//! ## Overview
//! An [`AttributeSet`] is an ordered list of attributes in which each name
//! appears at most once. Sets may restrict which kinds they accept; the kinds
//! listed in [`AttributeKind::ALWAYS_ALLOWED`] bypass the restriction. Every
//! mutator returns a new set and leaves the receiver untouched, which is what
//! lets a schema reset to its structural definition before each input.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use thiserror::Error;

use crate::core::attribute::Attribute;
use crate::core::attribute::AttributeKind;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Attribute set errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeSetError {
    /// Kind is outside the set's allow-list.
    #[error("attribute not allowed: {0}")]
    AttributeNotAllowed(AttributeKind),
    /// An attribute with the same name is already present.
    #[error("duplicate attribute: {0}")]
    DuplicateAttribute(AttributeKind),
    /// No attribute with the requested name.
    #[error("attribute not found: {0}")]
    AttributeNotFound(String),
}

// ============================================================================
// SECTION: Attribute Set
// ============================================================================

/// Ordered, unique-by-name attribute collection.
///
/// # Invariants
/// - No two attributes share a kind.
/// - Every attribute kind is always-allowed or in `allowed` (when present).
/// - Mutators never change the receiver.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeSet {
    /// Attributes in insertion order.
    attributes: Vec<Attribute>,
    /// Accepted kinds; `None` accepts every kind.
    allowed: Option<BTreeSet<AttributeKind>>,
}

impl AttributeSet {
    /// Creates an empty set accepting every kind.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty set restricted to the given kinds.
    #[must_use]
    pub fn with_allowed(kinds: impl IntoIterator<Item = AttributeKind>) -> Self {
        Self {
            attributes: Vec::new(),
            allowed: Some(kinds.into_iter().collect()),
        }
    }

    /// Builds a set from attributes, enforcing uniqueness and the allow-list.
    ///
    /// # Errors
    /// Returns [`AttributeSetError`] on duplicate or disallowed attributes.
    pub fn from_attributes(
        attributes: impl IntoIterator<Item = Attribute>,
        allowed: Option<BTreeSet<AttributeKind>>,
    ) -> Result<Self, AttributeSetError> {
        let mut set = Self {
            attributes: Vec::new(),
            allowed,
        };
        for attribute in attributes {
            set.ensure_allowed(attribute.kind())?;
            if set.contains(attribute.kind()) {
                return Err(AttributeSetError::DuplicateAttribute(attribute.kind()));
            }
            set.attributes.push(attribute);
        }
        Ok(set)
    }

    /// Returns the allow-list, if any.
    #[must_use]
    pub const fn allowed(&self) -> Option<&BTreeSet<AttributeKind>> {
        self.allowed.as_ref()
    }

    /// Returns true when the set accepts attributes of `kind`.
    #[must_use]
    pub fn is_allowed(&self, kind: AttributeKind) -> bool {
        kind.is_always_allowed()
            || self.allowed.as_ref().is_none_or(|allowed| allowed.contains(&kind))
    }

    /// Fails when `kind` is not accepted.
    fn ensure_allowed(&self, kind: AttributeKind) -> Result<(), AttributeSetError> {
        if self.is_allowed(kind) {
            Ok(())
        } else {
            Err(AttributeSetError::AttributeNotAllowed(kind))
        }
    }

    // ------------------------------------------------------------------------
    // Copy-on-write mutators
    // ------------------------------------------------------------------------

    /// Returns a new set with `attribute` appended.
    ///
    /// # Errors
    /// Returns [`AttributeSetError::DuplicateAttribute`] when the name is
    /// present and [`AttributeSetError::AttributeNotAllowed`] when the kind is
    /// outside the allow-list.
    pub fn add(&self, attribute: Attribute) -> Result<Self, AttributeSetError> {
        self.ensure_allowed(attribute.kind())?;
        if self.contains(attribute.kind()) {
            return Err(AttributeSetError::DuplicateAttribute(attribute.kind()));
        }
        let mut next = self.clone();
        next.attributes.push(attribute);
        Ok(next)
    }

    /// Returns a new set with `attribute` replacing the same-named attribute in
    /// place, or appended when absent.
    ///
    /// # Errors
    /// Returns [`AttributeSetError::AttributeNotAllowed`] when the kind is
    /// outside the allow-list.
    pub fn set(&self, attribute: Attribute) -> Result<Self, AttributeSetError> {
        self.ensure_allowed(attribute.kind())?;
        Ok(self.replace(attribute))
    }

    /// Replace-or-append without consulting the allow-list.
    ///
    /// Callers pass only always-allowed kinds.
    pub(crate) fn replace(&self, attribute: Attribute) -> Self {
        let mut next = self.clone();
        match next.attributes.iter_mut().find(|existing| existing.kind() == attribute.kind()) {
            Some(slot) => *slot = attribute,
            None => next.attributes.push(attribute),
        }
        next
    }

    /// Returns a new set without the attribute of `kind`; absent is a no-op.
    #[must_use]
    pub fn remove(&self, kind: AttributeKind) -> Self {
        self.filter(|attribute| attribute.kind() != kind)
    }

    /// Returns a new set where `other`'s attributes override by name.
    ///
    /// Attributes already present keep their position; new ones are appended
    /// in `other`'s order. The receiver's allow-list is kept.
    ///
    /// # Errors
    /// Returns [`AttributeSetError::AttributeNotAllowed`] when `other` holds a
    /// kind outside the receiver's allow-list.
    pub fn merge(&self, other: &Self) -> Result<Self, AttributeSetError> {
        let mut next = self.clone();
        for attribute in &other.attributes {
            next = next.set(attribute.clone())?;
        }
        Ok(next)
    }

    /// Returns a new set keeping only attributes matching `predicate`.
    #[must_use]
    pub fn filter(&self, predicate: impl Fn(&Attribute) -> bool) -> Self {
        Self {
            attributes: self.attributes.iter().filter(|attr| predicate(attr)).cloned().collect(),
            allowed: self.allowed.clone(),
        }
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    /// Returns the attribute of `kind`, if present.
    #[must_use]
    pub fn find(&self, kind: AttributeKind) -> Option<&Attribute> {
        self.attributes.iter().find(|attribute| attribute.kind() == kind)
    }

    /// Returns the attribute named `name`, if present.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attribute| attribute.name() == name)
    }

    /// Returns the attribute of `kind`.
    ///
    /// # Errors
    /// Returns [`AttributeSetError::AttributeNotFound`] when absent.
    pub fn get(&self, kind: AttributeKind) -> Result<&Attribute, AttributeSetError> {
        self.find(kind).ok_or_else(|| AttributeSetError::AttributeNotFound(kind.to_string()))
    }

    /// Returns the attribute named `name`.
    ///
    /// # Errors
    /// Returns [`AttributeSetError::AttributeNotFound`] when absent.
    pub fn get_by_name(&self, name: &str) -> Result<&Attribute, AttributeSetError> {
        self.find_by_name(name).ok_or_else(|| AttributeSetError::AttributeNotFound(name.to_string()))
    }

    /// Returns true when an attribute of `kind` is present.
    #[must_use]
    pub fn contains(&self, kind: AttributeKind) -> bool {
        self.find(kind).is_some()
    }

    /// Returns the number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns true when the set holds no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterates attributes in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.attributes.iter()
    }

    /// Returns attribute kinds in order.
    #[must_use]
    pub fn kinds(&self) -> Vec<AttributeKind> {
        self.attributes.iter().map(Attribute::kind).collect()
    }
}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}
