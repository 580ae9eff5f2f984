// crates/form-core/src/runtime/schema.rs
// ============================================================================
// Module: Schema
// Description: Schema construction, input handling, traversal, and validation.
// Purpose: Tie fields, rules, and validator pipelines into one consumer API.
// Dependencies: crate::{config, core, document, runtime}, form-logic, serde_json
// ============================================================================

//! ## Overview
//! A [`Schema`] keeps its structural definition separately from its current
//! state. Every [`Schema::input`] call restarts from the definition, derives
//! each field's value from the input (falling back to its default), and then
//! runs the rule set once. Validator pipelines are built with the schema;
//! rules only change requiredness and values, so the attached validators never
//! change afterwards.
//!
//! # Invariants
//! - Field names are unique and addressable by scopes.
//! - A failed `input` leaves the previous state untouched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use form_logic::ConditionValidator;
use form_logic::SerdeError;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::ConfigError;
use crate::config::EngineConfig;
use crate::core::AttributeRegistry;
use crate::core::ConditionScopes;
use crate::core::Field;
use crate::core::FieldName;
use crate::core::FieldSet;
use crate::core::ResolvedTarget;
use crate::core::Rule;
use crate::core::RuleError;
use crate::core::RuleSet;
use crate::core::SchemaName;
use crate::core::SchemaResult;
use crate::core::Scope;
use crate::core::ScopeError;
use crate::core::ValidatorRegistry;
use crate::document;
use crate::document::DocumentError;
use crate::runtime::engine::RuleEngine;
use crate::runtime::observer::EvaluationObserver;
use crate::runtime::observer::NoopObserver;
use crate::runtime::pipeline::PipelineError;
use crate::runtime::pipeline::ValidatorPipeline;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Schema construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two fields share a name.
    #[error("duplicate field: {0}")]
    DuplicateField(FieldName),
    /// A field name cannot appear in a scope path.
    #[error("invalid field name: `{0}`")]
    InvalidFieldName(FieldName),
    /// A rule condition references a scope that does not resolve.
    #[error("rule {rule} references an unresolved scope: {source}")]
    UnresolvedScope {
        /// Rule position.
        rule: usize,
        /// Resolution failure.
        source: ScopeError,
    },
    /// A rule condition violates structural limits.
    #[error("rule {rule} has an invalid condition: {source}")]
    Condition {
        /// Rule position.
        rule: usize,
        /// Structural failure.
        source: SerdeError,
    },
    /// Rule set or outcome target error.
    #[error(transparent)]
    Rule(#[from] RuleError),
    /// Validator graph error.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    /// Invalid engine configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ============================================================================
// SECTION: Schema Builder
// ============================================================================

/// Staged construction of a [`Schema`].
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    /// Schema name.
    name: SchemaName,
    /// Fields in declaration order.
    fields: Vec<Field>,
    /// Rules in evaluation order.
    rules: Vec<Arc<Rule>>,
    /// Engine configuration.
    config: EngineConfig,
    /// Validator dependency declarations.
    validators: ValidatorRegistry,
}

impl SchemaBuilder {
    /// Starts a builder.
    #[must_use]
    pub fn new(name: impl Into<SchemaName>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends a rule.
    #[must_use]
    pub fn rule(self, rule: Rule) -> Self {
        self.shared_rule(Arc::new(rule))
    }

    /// Appends a shared rule object.
    #[must_use]
    pub fn shared_rule(mut self, rule: Arc<Rule>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Sets the engine configuration.
    #[must_use]
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the validator registry.
    #[must_use]
    pub fn validators(mut self, validators: ValidatorRegistry) -> Self {
        self.validators = validators;
        self
    }

    /// Returns the schema name.
    #[must_use]
    pub const fn name(&self) -> &SchemaName {
        &self.name
    }

    /// Returns the fields collected so far.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the rules collected so far.
    #[must_use]
    pub fn rules(&self) -> &[Arc<Rule>] {
        &self.rules
    }

    /// Builds the schema.
    ///
    /// # Errors
    /// Returns [`SchemaError`] for invalid configuration, duplicate or
    /// unaddressable fields, duplicate rules, condition trees over the
    /// configured limits, unresolved scopes (when `strict_scopes` is set), or
    /// validator graph errors.
    pub fn build(self) -> Result<Schema, SchemaError> {
        self.config.validate()?;

        let mut definition = FieldSet::new();
        for field in self.fields {
            if !field.name().is_addressable() {
                return Err(SchemaError::InvalidFieldName(field.name().clone()));
            }
            definition.insert(field).map_err(SchemaError::DuplicateField)?;
        }

        let mut rules = RuleSet::new();
        for rule in self.rules {
            rules.add(rule)?;
        }

        let limits = ConditionValidator::new(self.config.serde_config());
        for (index, rule) in rules.iter().enumerate() {
            limits.validate(rule.conditions()).map_err(|source| SchemaError::Condition {
                rule: index,
                source,
            })?;
            if self.config.strict_scopes {
                check_rule_scopes(index, rule, &definition)?;
            }
        }

        let pipelines = definition
            .iter()
            .map(|field| ValidatorPipeline::build(field, &self.validators))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(schema = %self.name, fields = definition.len(), rules = rules.len(), "schema built");
        Ok(Schema {
            name: self.name,
            fields: definition.clone(),
            definition,
            rules,
            pipelines,
            config: self.config,
            validators: self.validators,
        })
    }
}

/// Resolves every condition scope and outcome target of a rule.
fn check_rule_scopes(index: usize, rule: &Rule, fields: &FieldSet) -> Result<(), SchemaError> {
    for scope in rule.conditions().scopes() {
        scope.resolve(fields).map_err(|source| SchemaError::UnresolvedScope {
            rule: index,
            source,
        })?;
    }
    for outcome in rule.outcomes() {
        outcome.check_target(fields)?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Schema
// ============================================================================

/// Built schema: structural definition plus current state.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Schema name.
    name: SchemaName,
    /// Fields as declared.
    definition: FieldSet,
    /// Fields after the latest input.
    fields: FieldSet,
    /// Rules in evaluation order.
    rules: RuleSet,
    /// One validator pipeline per field, in field order.
    pipelines: Vec<ValidatorPipeline>,
    /// Engine configuration.
    config: EngineConfig,
    /// Validator dependency declarations used to build the pipelines.
    validators: ValidatorRegistry,
}

impl Schema {
    /// Starts a [`SchemaBuilder`].
    #[must_use]
    pub fn builder(name: impl Into<SchemaName>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Decodes and builds a schema from JSON with the standard registries.
    ///
    /// # Errors
    /// Returns [`DocumentError`] when decoding or building fails.
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        Ok(document::deserialize(text, &AttributeRegistry::standard())?.build()?)
    }

    /// Encodes the structural definition as JSON.
    ///
    /// # Errors
    /// Returns [`DocumentError::Parse`] when encoding fails.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        document::serialize(self)
    }

    /// Returns the schema name.
    #[must_use]
    pub const fn name(&self) -> &SchemaName {
        &self.name
    }

    /// Returns fields as declared.
    #[must_use]
    pub const fn definition(&self) -> &FieldSet {
        &self.definition
    }

    /// Returns fields after the latest input.
    #[must_use]
    pub const fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// Returns the current state of a field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Returns the rule set.
    #[must_use]
    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the validator registry.
    #[must_use]
    pub const fn validators(&self) -> &ValidatorRegistry {
        &self.validators
    }

    /// Returns the validator pipeline of a field.
    #[must_use]
    pub fn pipeline(&self, name: &str) -> Option<&ValidatorPipeline> {
        self.pipelines.iter().find(|pipeline| pipeline.field().as_str() == name)
    }

    /// Resolves a scope against the current state.
    ///
    /// # Errors
    /// Returns [`ScopeError::NotFound`] when the scope does not resolve.
    pub fn traverse(&self, scope: &Scope) -> Result<ResolvedTarget<'_>, ScopeError> {
        scope.resolve(&self.fields)
    }

    /// Applies input and re-runs the rule set.
    ///
    /// # Errors
    /// Returns [`RuleError`] when rule evaluation fails.
    pub fn input(&mut self, data: &Map<String, Value>) -> Result<(), RuleError> {
        self.input_with(data, &mut NoopObserver)
    }

    /// Applies input and re-runs the rule set, reporting to `observer`.
    ///
    /// Input keys that name no field are ignored.
    ///
    /// # Errors
    /// Returns [`RuleError`] when rule evaluation fails; the schema keeps its
    /// previous state.
    pub fn input_with<O>(
        &mut self,
        data: &Map<String, Value>,
        observer: &mut O,
    ) -> Result<(), RuleError>
    where
        O: EvaluationObserver + ?Sized,
    {
        let mut fields = self.definition.clone();
        for field in &self.definition {
            let value = match data.get(field.name().as_str()) {
                Some(value) if !value.is_null() => value.clone(),
                _ => field.default_value().cloned().unwrap_or(Value::Null),
            };
            fields.replace(field.with_value(value));
        }
        RuleEngine::new(&self.rules, self.config.leaf_policy()).apply(&mut fields, observer)?;
        self.fields = fields;
        Ok(())
    }

    /// Runs every validator pipeline against the current state.
    #[must_use]
    pub fn evaluate(&self) -> SchemaResult {
        self.evaluate_with(&mut NoopObserver)
    }

    /// Runs every validator pipeline, reporting skipped validators.
    pub fn evaluate_with<O>(&self, observer: &mut O) -> SchemaResult
    where
        O: EvaluationObserver + ?Sized,
    {
        let fields = self
            .pipelines
            .iter()
            .zip(self.fields.iter())
            .map(|(pipeline, field)| pipeline.execute(field, &mut *observer))
            .collect();
        SchemaResult {
            fields,
        }
    }

    /// Applies input, re-runs the rules, and validates every field.
    ///
    /// # Errors
    /// Returns [`RuleError`] when rule evaluation fails.
    pub fn validate(&mut self, data: &Map<String, Value>) -> Result<SchemaResult, RuleError> {
        self.validate_with(data, &mut NoopObserver)
    }

    /// [`Schema::validate`] with an observer.
    ///
    /// # Errors
    /// Returns [`RuleError`] when rule evaluation fails.
    pub fn validate_with<O>(
        &mut self,
        data: &Map<String, Value>,
        observer: &mut O,
    ) -> Result<SchemaResult, RuleError>
    where
        O: EvaluationObserver + ?Sized,
    {
        self.input_with(data, &mut *observer)?;
        Ok(self.evaluate_with(observer))
    }
}
