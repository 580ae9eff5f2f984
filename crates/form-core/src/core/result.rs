// crates/form-core/src/core/result.rs
// ============================================================================
// Module: Validation Results
// Description: Per-constraint statuses and their field and schema aggregates.
// Purpose: Report validation outcomes as values rather than errors.
// Dependencies: crate::core::{identifiers, validator}, serde
// ============================================================================

//! ## Overview
//! Each validator yields one [`ConstraintResult`]. A field's status is the most
//! severe of its constraint statuses, ordered `Failed > Skipped > Pending >
//! Passed`; the aggregate is for reporting and never feeds back into
//! evaluation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::FieldName;
use crate::core::validator::ValidatorKind;

// ============================================================================
// SECTION: Status
// ============================================================================

/// Outcome of one validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    /// Not yet executed.
    Pending,
    /// Check held.
    Passed,
    /// Check did not hold.
    Failed,
    /// A dependency did not pass; the check never ran.
    Skipped,
}

impl ValidationStatus {
    /// Returns the aggregation rank; higher wins.
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::Passed => 0,
            Self::Pending => 1,
            Self::Skipped => 2,
            Self::Failed => 3,
        }
    }

    /// Returns the more severe of two statuses.
    #[must_use]
    pub const fn max(self, other: Self) -> Self {
        if other.severity() > self.severity() { other } else { self }
    }
}

// ============================================================================
// SECTION: Constraint Result
// ============================================================================

/// Result of one validator on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintResult {
    /// Validator that produced the result.
    pub validator: ValidatorKind,
    /// Outcome.
    pub status: ValidationStatus,
    /// Failure message, present only when `status` is `Failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ConstraintResult {
    /// Pending result.
    #[must_use]
    pub const fn pending(validator: ValidatorKind) -> Self {
        Self {
            validator,
            status: ValidationStatus::Pending,
            message: None,
        }
    }

    /// Passed result.
    #[must_use]
    pub const fn passed(validator: ValidatorKind) -> Self {
        Self {
            validator,
            status: ValidationStatus::Passed,
            message: None,
        }
    }

    /// Failed result with a message.
    #[must_use]
    pub const fn failed(validator: ValidatorKind, message: String) -> Self {
        Self {
            validator,
            status: ValidationStatus::Failed,
            message: Some(message),
        }
    }

    /// Skipped result.
    #[must_use]
    pub const fn skipped(validator: ValidatorKind) -> Self {
        Self {
            validator,
            status: ValidationStatus::Skipped,
            message: None,
        }
    }
}

// ============================================================================
// SECTION: Field Result
// ============================================================================

/// Results of every validator attached to a field, in attachment order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldResult {
    /// Field the results belong to.
    pub field: FieldName,
    /// One entry per attached validator.
    pub constraints: Vec<ConstraintResult>,
}

impl FieldResult {
    /// Creates a result with every validator pending.
    #[must_use]
    pub fn all_pending(field: FieldName, validators: &[ValidatorKind]) -> Self {
        Self {
            field,
            constraints: validators.iter().copied().map(ConstraintResult::pending).collect(),
        }
    }

    /// Returns the aggregate status (`Passed` when there are no constraints).
    #[must_use]
    pub fn status(&self) -> ValidationStatus {
        self.constraints
            .iter()
            .fold(ValidationStatus::Passed, |status, result| status.max(result.status))
    }

    /// Returns true when every constraint passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status() == ValidationStatus::Passed
    }

    /// Returns true when any constraint failed.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.status() == ValidationStatus::Failed
    }

    /// Returns true when the worst status is `Skipped`.
    #[must_use]
    pub fn skipped(&self) -> bool {
        self.status() == ValidationStatus::Skipped
    }

    /// Returns true when the worst status is `Pending`.
    #[must_use]
    pub fn pending(&self) -> bool {
        self.status() == ValidationStatus::Pending
    }

    /// Returns the result of one validator.
    #[must_use]
    pub fn get(&self, validator: ValidatorKind) -> Option<&ConstraintResult> {
        self.constraints.iter().find(|result| result.validator == validator)
    }

    /// Returns the status of one validator.
    #[must_use]
    pub fn status_of(&self, validator: ValidatorKind) -> Option<ValidationStatus> {
        self.get(validator).map(|result| result.status)
    }

    /// Returns failed constraints.
    #[must_use]
    pub fn failed_constraints(&self) -> Vec<&ConstraintResult> {
        self.with_status(ValidationStatus::Failed)
    }

    /// Returns skipped constraints.
    #[must_use]
    pub fn skipped_constraints(&self) -> Vec<&ConstraintResult> {
        self.with_status(ValidationStatus::Skipped)
    }

    /// Returns constraints with the given status.
    fn with_status(&self, status: ValidationStatus) -> Vec<&ConstraintResult> {
        self.constraints.iter().filter(|result| result.status == status).collect()
    }
}

// ============================================================================
// SECTION: Schema Result
// ============================================================================

/// One [`FieldResult`] per field, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchemaResult {
    /// Per-field results.
    pub fields: Vec<FieldResult>,
}

impl SchemaResult {
    /// Returns the result for a field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldResult> {
        self.fields.iter().find(|result| result.field.as_str() == name)
    }

    /// Returns the most severe field status.
    #[must_use]
    pub fn status(&self) -> ValidationStatus {
        self.fields.iter().fold(ValidationStatus::Passed, |status, field| status.max(field.status()))
    }

    /// Returns true when every field passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.status() == ValidationStatus::Passed
    }

    /// Returns results of fields that did not pass.
    #[must_use]
    pub fn invalid_fields(&self) -> Vec<&FieldResult> {
        self.fields.iter().filter(|field| !field.passed()).collect()
    }
}
