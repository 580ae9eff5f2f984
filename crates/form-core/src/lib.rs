// crates/form-core/src/lib.rs
// ============================================================================
// Module: Form Core Library
// Description: Public API surface for the form schema engine.
// Purpose: Expose core types, configuration, documents, and runtime helpers.
// Dependencies: crate::{config, core, document, runtime}
// ============================================================================

//! ## Overview
//! Form core models a schema of typed fields whose requiredness and values
//! react to each other through declarative rules. Rules pair a condition tree
//! over field scopes with outcomes; validators attached per field run in
//! dependency order and report pass, fail, or skip per constraint.
//!
//! ```
//! use form_core::FieldPredicate;
//! use form_core::FieldType;
//! use form_core::Field;
//! use form_core::RuleBuilder;
//! use form_core::Schema;
//! use form_core::Scope;
//! use serde_json::json;
//!
//! let mut schema = Schema::builder("contact")
//!     .field(Field::new("phone", FieldType::Text).with_optional(true))
//!     .field(Field::new("contact_method", FieldType::Choice).with_optional(true))
//!     .rule(
//!         RuleBuilder::new()
//!             .when_leaf(FieldPredicate::equals(
//!                 Scope::attribute("contact_method", "value"),
//!                 json!("phone"),
//!             ))
//!             .require(Scope::field("phone"))
//!             .build(),
//!     )
//!     .build()?;
//!
//! let input = json!({"contact_method": "phone"});
//! let result = schema.validate(input.as_object().ok_or("object")?)?;
//! assert!(!result.is_valid());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod core;
pub mod document;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use config::ConfigError;
pub use config::EngineConfig;
pub use config::UnresolvedScopePolicy;
pub use document::DecodeNode;
pub use document::DocumentError;
pub use document::EncodeNode;
pub use runtime::EvaluationObserver;
pub use runtime::NoopObserver;
pub use runtime::ObserverEvent;
pub use runtime::PipelineError;
pub use runtime::RecordingObserver;
pub use runtime::RuleEngine;
pub use runtime::Schema;
pub use runtime::SchemaBuilder;
pub use runtime::SchemaError;
pub use runtime::ValidatorPipeline;
