// crates/form-core/src/runtime/pipeline.rs
// ============================================================================
// Module: Validator Pipeline
// Description: Per-field validator graph construction and ordered execution.
// Purpose: Run validators in dependency order and skip those whose
//          dependencies did not pass.
// Dependencies: crate::core, crate::runtime::observer, thiserror, tracing
// ============================================================================

//! ## Overview
//! A [`ValidatorPipeline`] is built once per field when the schema is built.
//! `required` and `type` attach first, then one validator per constraint
//! attribute in declared order. Dependency names resolve against that
//! attached set; the graph is checked for cycles by depth-first search and
//! ordered with Kahn's algorithm, breaking ties by attachment order.
//!
//! Execution starts every validator as `Pending`. A validator whose
//! dependency did not pass is `Skipped` without running its check.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::debug;

use crate::core::ConstraintResult;
use crate::core::Field;
use crate::core::FieldName;
use crate::core::FieldResult;
use crate::core::ValidationStatus;
use crate::core::ValidatorKind;
use crate::core::ValidatorRegistry;
use crate::runtime::observer::EvaluationObserver;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Validator graph construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// Dependencies form a cycle; the first element is repeated at the end.
    #[error("circular validator dependencies on field {field}: {}", format_cycle(.cycle))]
    CircularDependenciesFound {
        /// Field whose validators form the cycle.
        field: FieldName,
        /// Cycle path, closed by repeating its first element.
        cycle: Vec<ValidatorKind>,
    },
    /// A dependency names nothing attached to the field.
    #[error("validator {validator} on field {field} depends on missing validator {dependency}")]
    ValidatorNotFound {
        /// Owning field.
        field: FieldName,
        /// Validator declaring the dependency.
        validator: ValidatorKind,
        /// Unresolved dependency name.
        dependency: String,
    },
    /// A dependency names a non-constraint attribute of the field.
    #[error("validator {validator} on field {field} depends on {dependency}, which is not a validator")]
    NotAValidator {
        /// Owning field.
        field: FieldName,
        /// Validator declaring the dependency.
        validator: ValidatorKind,
        /// Offending attribute name.
        dependency: String,
    },
}

/// Renders a cycle as `a -> b -> a`.
fn format_cycle(cycle: &[ValidatorKind]) -> String {
    cycle.iter().map(|kind| kind.as_str()).collect::<Vec<_>>().join(" -> ")
}

// ============================================================================
// SECTION: Pipeline
// ============================================================================

/// Ordered validators for one field.
///
/// # Invariants
/// - `dependencies[i]` indexes into `validators`.
/// - `order` is a topological order of every validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorPipeline {
    /// Owning field.
    field: FieldName,
    /// Validators in attachment order.
    validators: Vec<ValidatorKind>,
    /// Dependency indices per validator.
    dependencies: Vec<Vec<usize>>,
    /// Execution order as indices.
    order: Vec<usize>,
}

impl ValidatorPipeline {
    /// Builds the pipeline for a field.
    ///
    /// # Errors
    /// Returns [`PipelineError`] when a dependency does not resolve or the
    /// dependencies form a cycle.
    pub fn build(field: &Field, registry: &ValidatorRegistry) -> Result<Self, PipelineError> {
        let mut validators = vec![ValidatorKind::Required, ValidatorKind::Type];
        validators.extend(
            field.constraints().filter_map(|attribute| ValidatorKind::for_constraint(attribute.kind())),
        );

        let mut dependencies = Vec::with_capacity(validators.len());
        for &validator in &validators {
            let mut resolved = Vec::new();
            for name in registry.dependencies(validator) {
                let index = resolve_dependency(field, &validators, validator, name)?;
                if !resolved.contains(&index) {
                    resolved.push(index);
                }
            }
            dependencies.push(resolved);
        }

        if let Some(cycle) = find_cycle(&dependencies) {
            return Err(PipelineError::CircularDependenciesFound {
                field: field.name().clone(),
                cycle: cycle.into_iter().map(|index| validators[index]).collect(),
            });
        }
        let order = topological_order(&dependencies);

        Ok(Self {
            field: field.name().clone(),
            validators,
            dependencies,
            order,
        })
    }

    /// Returns the owning field name.
    #[must_use]
    pub const fn field(&self) -> &FieldName {
        &self.field
    }

    /// Returns validators in attachment order.
    #[must_use]
    pub fn validators(&self) -> &[ValidatorKind] {
        &self.validators
    }

    /// Returns validators in execution order.
    #[must_use]
    pub fn order(&self) -> Vec<ValidatorKind> {
        self.order.iter().map(|&index| self.validators[index]).collect()
    }

    /// Returns the resolved dependencies of an attached validator.
    #[must_use]
    pub fn dependencies_of(&self, validator: ValidatorKind) -> Vec<ValidatorKind> {
        self.validators
            .iter()
            .position(|&kind| kind == validator)
            .map(|index| self.dependencies[index].iter().map(|&dep| self.validators[dep]).collect())
            .unwrap_or_default()
    }

    /// Runs every validator against the field's current state.
    pub fn execute<O>(&self, field: &Field, observer: &mut O) -> FieldResult
    where
        O: EvaluationObserver + ?Sized,
    {
        let mut result = FieldResult::all_pending(self.field.clone(), &self.validators);
        for &index in &self.order {
            let validator = self.validators[index];
            let blocked = self.dependencies[index]
                .iter()
                .any(|&dep| result.constraints[dep].status != ValidationStatus::Passed);
            result.constraints[index] = if blocked {
                debug!(field = %self.field, validator = %validator, "validator skipped");
                observer.on_validator_skipped(&self.field, validator);
                ConstraintResult::skipped(validator)
            } else {
                match validator.check(field) {
                    Ok(()) => ConstraintResult::passed(validator),
                    Err(message) => {
                        debug!(field = %self.field, validator = %validator, %message, "validator failed");
                        ConstraintResult::failed(validator, message)
                    }
                }
            };
        }
        result
    }
}

// ============================================================================
// SECTION: Graph Helpers
// ============================================================================

/// Resolves one dependency name to an attached validator index.
fn resolve_dependency(
    field: &Field,
    validators: &[ValidatorKind],
    validator: ValidatorKind,
    name: &str,
) -> Result<usize, PipelineError> {
    if let Some(index) = validators.iter().position(|kind| kind.as_str() == name) {
        return Ok(index);
    }
    if field.attributes().find_by_name(name).is_some() {
        return Err(PipelineError::NotAValidator {
            field: field.name().clone(),
            validator,
            dependency: name.to_string(),
        });
    }
    Err(PipelineError::ValidatorNotFound {
        field: field.name().clone(),
        validator,
        dependency: name.to_string(),
    })
}

/// Visit state for cycle detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// Not visited yet.
    Unvisited,
    /// On the current DFS path.
    OnPath,
    /// Fully explored.
    Done,
}

/// Returns the first cycle found, closed by repeating its first node.
fn find_cycle(dependencies: &[Vec<usize>]) -> Option<Vec<usize>> {
    let mut marks = vec![Mark::Unvisited; dependencies.len()];
    let mut path = Vec::new();
    for start in 0 .. dependencies.len() {
        if marks[start] == Mark::Unvisited
            && let Some(cycle) = visit(start, dependencies, &mut marks, &mut path)
        {
            return Some(cycle);
        }
    }
    None
}

/// Depth-first visit used by [`find_cycle`].
fn visit(
    node: usize,
    dependencies: &[Vec<usize>],
    marks: &mut [Mark],
    path: &mut Vec<usize>,
) -> Option<Vec<usize>> {
    marks[node] = Mark::OnPath;
    path.push(node);
    for &dep in &dependencies[node] {
        match marks[dep] {
            Mark::OnPath => {
                let start = path.iter().position(|&entry| entry == dep)?;
                let mut cycle = path[start ..].to_vec();
                cycle.push(dep);
                return Some(cycle);
            }
            Mark::Unvisited => {
                if let Some(cycle) = visit(dep, dependencies, marks, path) {
                    return Some(cycle);
                }
            }
            Mark::Done => {}
        }
    }
    path.pop();
    marks[node] = Mark::Done;
    None
}

/// Kahn's algorithm over an acyclic graph; ties go to the lowest index.
fn topological_order(dependencies: &[Vec<usize>]) -> Vec<usize> {
    let mut remaining: Vec<usize> = dependencies.iter().map(Vec::len).collect();
    let mut dependents = vec![Vec::new(); dependencies.len()];
    for (node, deps) in dependencies.iter().enumerate() {
        for &dep in deps {
            dependents[dep].push(node);
        }
    }
    let mut ready: BTreeSet<usize> =
        remaining.iter().enumerate().filter(|(_, count)| **count == 0).map(|(node, _)| node).collect();
    let mut order = Vec::with_capacity(dependencies.len());
    while let Some(node) = ready.pop_first() {
        order.push(node);
        for &dependent in &dependents[node] {
            remaining[dependent] = remaining[dependent].saturating_sub(1);
            if remaining[dependent] == 0 {
                ready.insert(dependent);
            }
        }
    }
    order
}
