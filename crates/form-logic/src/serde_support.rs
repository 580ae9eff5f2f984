// crates/form-logic/src/serde_support.rs
// ============================================================================
// Module: Condition Serde Support
// Description: Serde helpers for condition serialization and validation.
// Purpose: Provide error models, configuration, and tree validation helpers.
// Dependencies: serde::{Deserialize, Serialize}, ron, serde_json, std::fmt
// ============================================================================

//! ## Overview
//! Strongly typed serde helpers give deterministic serialization/deserialization
//! outcomes while exposing consistent validation errors for condition trees.
//! Deserialized conditions are untrusted; they are validated against
//! [`SerdeConfig`] limits before they are returned.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::condition::Condition;

// ============================================================================
// SECTION: Serde Errors
// ============================================================================

/// Error types that can occur during condition serialization/deserialization
///
/// # Invariants
/// - None. Variants capture structured validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerdeError {
    /// Text could not be parsed or produced
    InvalidStructure(String),

    /// Condition tree too deep
    TooDeep {
        /// Maximum supported tree depth
        max_depth: usize,
        /// Depth encountered during validation
        actual_depth: usize,
    },

    /// Empty group found while empty groups are disallowed
    EmptyGroup {
        /// Group label (`all`, `any`, `none`)
        kind: &'static str,
    },
}

// ============================================================================
// SECTION: Display Implementation
// ============================================================================

impl fmt::Display for SerdeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStructure(msg) => {
                write!(f, "Invalid condition structure: {msg}")
            }
            Self::TooDeep {
                max_depth,
                actual_depth,
            } => {
                write!(f, "Condition tree too deep: {actual_depth} levels (max {max_depth})")
            }
            Self::EmptyGroup {
                kind,
            } => {
                write!(f, "Empty '{kind}' condition group not allowed")
            }
        }
    }
}

impl std::error::Error for SerdeError {}

// ============================================================================
// SECTION: Serde Configuration
// ============================================================================

/// Configuration for condition serialization/deserialization
///
/// # Invariants
/// - No invariants are enforced; callers should choose safe bounds.
#[derive(Debug, Clone)]
pub struct SerdeConfig {
    /// Maximum allowed depth for condition trees
    pub max_depth: usize,

    /// Whether to validate condition trees before encoding them
    pub validate_on_serialize: bool,

    /// Whether to validate condition trees after decoding them
    pub validate_on_deserialize: bool,

    /// Whether to allow empty groups
    pub allow_empty_groups: bool,
}

// ============================================================================
// SECTION: Configuration Defaults
// ============================================================================

impl Default for SerdeConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            validate_on_serialize: true,
            validate_on_deserialize: true,
            allow_empty_groups: true,
        }
    }
}

// ============================================================================
// SECTION: Condition Validator
// ============================================================================

/// Validator for condition trees
///
/// # Invariants
/// - Uses the stored [`SerdeConfig`] for all validation decisions.
#[derive(Debug, Clone)]
pub struct ConditionValidator {
    /// Validation configuration for structure limits.
    config: SerdeConfig,
}

// ============================================================================
// SECTION: Validation Methods
// ============================================================================

impl ConditionValidator {
    /// Creates a new validator with the given configuration
    #[must_use]
    pub const fn new(config: SerdeConfig) -> Self {
        Self {
            config,
        }
    }

    /// Creates a validator with default configuration
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            config: SerdeConfig::default(),
        }
    }

    /// Returns the active configuration
    #[must_use]
    pub const fn config(&self) -> &SerdeConfig {
        &self.config
    }

    /// Validates a condition tree
    ///
    /// This performs structural validation only - leaf validation is handled
    /// by the domain when leaves are decoded.
    ///
    /// # Errors
    /// Returns [`SerdeError`] when the condition violates structural limits.
    pub fn validate<P>(&self, condition: &Condition<P>) -> Result<(), SerdeError> {
        self.validate_node(condition, 1)
    }

    /// Validates one node and recurses into its children
    fn validate_node<P>(&self, condition: &Condition<P>, depth: usize) -> Result<(), SerdeError> {
        if depth > self.config.max_depth {
            return Err(SerdeError::TooDeep {
                max_depth: self.config.max_depth,
                actual_depth: depth,
            });
        }

        if let Some(kind) = condition.kind() {
            let children = condition.children();
            if children.is_empty() && !self.config.allow_empty_groups {
                return Err(SerdeError::EmptyGroup {
                    kind: kind.as_str(),
                });
            }
            for child in children {
                self.validate_node(child, depth + 1)?;
            }
        }

        Ok(())
    }
}

/// Helper for serializing conditions with validation
///
/// # Invariants
/// - Uses the stored [`ConditionValidator`] for structural checks.
#[derive(Debug, Clone)]
pub struct ConditionSerializer {
    /// Validator used to enforce structural limits.
    validator: ConditionValidator,
}

impl ConditionSerializer {
    /// Creates a new serializer with the given configuration
    #[must_use]
    pub const fn new(config: SerdeConfig) -> Self {
        Self {
            validator: ConditionValidator::new(config),
        }
    }

    /// Creates a serializer with default configuration
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            validator: ConditionValidator::with_defaults(),
        }
    }

    /// Validates a tree about to be encoded, when enabled
    fn check_outgoing<P>(&self, condition: &Condition<P>) -> Result<(), SerdeError> {
        if self.validator.config.validate_on_serialize {
            self.validator.validate(condition)?;
        }
        Ok(())
    }

    /// Validates a freshly decoded tree, when enabled
    fn check_incoming<P>(&self, condition: &Condition<P>) -> Result<(), SerdeError> {
        if self.validator.config.validate_on_deserialize {
            self.validator.validate(condition)?;
        }
        Ok(())
    }

    /// Serializes a condition to RON format with validation
    ///
    /// # Errors
    /// Returns [`SerdeError`] if validation fails or serialization fails.
    pub fn to_ron<P>(&self, condition: &Condition<P>) -> Result<String, SerdeError>
    where
        P: Serialize,
    {
        self.check_outgoing(condition)?;
        ron::ser::to_string_pretty(condition, ron::ser::PrettyConfig::default())
            .map_err(|e| SerdeError::InvalidStructure(e.to_string()))
    }

    /// Deserializes a condition from RON format with validation
    ///
    /// # Errors
    /// Returns [`SerdeError`] if parsing fails or validation fails.
    pub fn from_ron<P>(&self, ron_str: &str) -> Result<Condition<P>, SerdeError>
    where
        P: for<'de> Deserialize<'de>,
    {
        let condition: Condition<P> =
            ron::from_str(ron_str).map_err(|e| SerdeError::InvalidStructure(e.to_string()))?;
        self.check_incoming(&condition)?;
        Ok(condition)
    }

    /// Serializes a condition to JSON format with validation
    ///
    /// # Errors
    /// Returns [`SerdeError`] if validation fails or serialization fails.
    pub fn to_json<P>(&self, condition: &Condition<P>) -> Result<String, SerdeError>
    where
        P: Serialize,
    {
        self.check_outgoing(condition)?;
        serde_json::to_string_pretty(condition)
            .map_err(|e| SerdeError::InvalidStructure(e.to_string()))
    }

    /// Deserializes a condition from JSON format with validation
    ///
    /// # Errors
    /// Returns [`SerdeError`] if parsing fails or validation fails.
    pub fn from_json<P>(&self, json_str: &str) -> Result<Condition<P>, SerdeError>
    where
        P: for<'de> Deserialize<'de>,
    {
        let condition: Condition<P> = serde_json::from_str(json_str)
            .map_err(|e| SerdeError::InvalidStructure(e.to_string()))?;
        self.check_incoming(&condition)?;
        Ok(condition)
    }

    /// Validates a condition without serialization
    ///
    /// # Errors
    /// Returns [`SerdeError`] when the condition violates structural limits.
    pub fn validate<P>(&self, condition: &Condition<P>) -> Result<(), SerdeError> {
        self.validator.validate(condition)
    }
}

impl Default for ConditionSerializer {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Convenience functions for serialization without explicit serializer
///
/// These functions use default configuration. For custom limits, create a
/// `ConditionSerializer` explicitly.
pub mod convenience {
    use super::Condition;
    use super::ConditionSerializer;
    use super::ConditionValidator;
    use super::Deserialize;
    use super::SerdeError;
    use super::Serialize;

    /// Serialize condition to RON with default configuration
    ///
    /// # Errors
    /// Returns [`SerdeError`] if serialization fails or validation fails.
    pub fn to_ron<P: Serialize>(condition: &Condition<P>) -> Result<String, SerdeError> {
        ConditionSerializer::default().to_ron(condition)
    }

    /// Deserialize condition from RON with default configuration
    ///
    /// # Errors
    /// Returns [`SerdeError`] if parsing fails or validation fails.
    pub fn from_ron<P: for<'de> Deserialize<'de>>(
        ron_str: &str,
    ) -> Result<Condition<P>, SerdeError> {
        ConditionSerializer::default().from_ron(ron_str)
    }

    /// Serialize condition to JSON with default configuration
    ///
    /// # Errors
    /// Returns [`SerdeError`] if serialization fails or validation fails.
    pub fn to_json<P: Serialize>(condition: &Condition<P>) -> Result<String, SerdeError> {
        ConditionSerializer::default().to_json(condition)
    }

    /// Deserialize condition from JSON with default configuration
    ///
    /// # Errors
    /// Returns [`SerdeError`] if parsing fails or validation fails.
    pub fn from_json<P: for<'de> Deserialize<'de>>(
        json_str: &str,
    ) -> Result<Condition<P>, SerdeError> {
        ConditionSerializer::default().from_json(json_str)
    }

    /// Validate a condition with default configuration
    ///
    /// # Errors
    /// Returns [`SerdeError`] when the condition violates structural limits.
    pub fn validate<P>(condition: &Condition<P>) -> Result<(), SerdeError> {
        ConditionValidator::with_defaults().validate(condition)
    }

    /// Quick validation check that returns a boolean
    pub fn is_valid<P>(condition: &Condition<P>) -> bool {
        validate(condition).is_ok()
    }
}
