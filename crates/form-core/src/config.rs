// crates/form-core/src/config.rs
// ============================================================================
// Module: Engine Configuration
// Description: Configuration loading and validation for schema evaluation.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: form-logic, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Engine configuration is read from TOML. Unknown keys, oversized files, and
//! out-of-range limits are rejected rather than ignored.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use form_logic::LeafErrorPolicy;
use form_logic::SerdeConfig;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Default maximum condition tree depth.
pub const DEFAULT_MAX_CONDITION_DEPTH: usize = 32;
/// Upper bound accepted for `max_condition_depth`.
pub const MAX_CONDITION_DEPTH_LIMIT: usize = 256;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Handling of condition scopes that do not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedScopePolicy {
    /// Abort evaluation with the resolution error.
    #[default]
    Fail,
    /// Evaluate the leaf as false and notify observers.
    TreatAsNonMatch,
}

impl UnresolvedScopePolicy {
    /// Returns the matching leaf error policy.
    #[must_use]
    pub const fn leaf_policy(self) -> LeafErrorPolicy {
        match self {
            Self::Fail => LeafErrorPolicy::Propagate,
            Self::TreatAsNonMatch => LeafErrorPolicy::TreatAsNonMatch,
        }
    }
}

/// Schema evaluation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Handling of unresolved condition scopes.
    pub unresolved_scopes: UnresolvedScopePolicy,
    /// Check every rule scope against the fields when the schema is built.
    pub strict_scopes: bool,
    /// Maximum condition tree depth (root counts as one).
    pub max_condition_depth: usize,
    /// Accept condition groups without children.
    pub allow_empty_groups: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            unresolved_scopes: UnresolvedScopePolicy::Fail,
            strict_scopes: true,
            max_condition_depth: DEFAULT_MAX_CONDITION_DEPTH,
            allow_empty_groups: true,
        }
    }
}

impl EngineConfig {
    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the file cannot be read, exceeds
    /// [`MAX_CONFIG_FILE_SIZE`], is not UTF-8, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Validates limits.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when a limit is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_condition_depth == 0 || self.max_condition_depth > MAX_CONDITION_DEPTH_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "max_condition_depth must be between 1 and {MAX_CONDITION_DEPTH_LIMIT}"
            )));
        }
        Ok(())
    }

    /// Returns the leaf error policy for rule evaluation.
    #[must_use]
    pub const fn leaf_policy(&self) -> LeafErrorPolicy {
        self.unresolved_scopes.leaf_policy()
    }

    /// Returns structural limits for condition trees.
    #[must_use]
    pub fn serde_config(&self) -> SerdeConfig {
        SerdeConfig {
            max_depth: self.max_condition_depth,
            validate_on_serialize: true,
            validate_on_deserialize: true,
            allow_empty_groups: self.allow_empty_groups,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}
