// crates/form-core/src/runtime/mod.rs
// ============================================================================
// Module: Form Runtime
// Description: Rule evaluation, validator pipelines, and schema orchestration.
// Purpose: Apply rules to field state and validate fields in dependency order.
// Dependencies: crate::{config, core, document}, form-logic, tracing
// ============================================================================

//! ## Overview
//! The runtime evaluates rule sets against a [`crate::core::FieldSet`], runs
//! per-field validator pipelines, and exposes the [`Schema`] consumer API.
//! Observers receive evaluation events without influencing results.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod engine;
pub mod observer;
pub mod pipeline;
pub mod schema;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use engine::RuleEngine;
pub use observer::EvaluationObserver;
pub use observer::NoopObserver;
pub use observer::ObserverEvent;
pub use observer::RecordingObserver;
pub use pipeline::PipelineError;
pub use pipeline::ValidatorPipeline;
pub use schema::Schema;
pub use schema::SchemaBuilder;
pub use schema::SchemaError;
