// crates/form-core/src/document.rs
// ============================================================================
// Module: Schema Documents
// Description: JSON and RON interchange for schema definitions.
// Purpose: Encode a schema's structure and decode untrusted documents into
//          schema builders.
// Dependencies: crate::{core, runtime}, form-logic, ron, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Documents describe fields and rules:
//!
//! ```json
//! {
//!   "name": "contact",
//!   "fields": {"email": {"type": "email", "optional": true}},
//!   "rules": [{
//!     "when": {"group": "all", "conditions": [
//!       {"target": "#/fields/email/value", "operator": "exists"}
//!     ]},
//!     "then": [{"action": "require", "target": "#/fields/email"}]
//!   }]
//! }
//! ```
//!
//! Decoding is explicit: each node type implements [`DecodeNode`] and
//! receives the [`AttributeRegistry`] as an argument. Errors carry a JSON
//! path (`$.rules[0].when.conditions[1]`) and the offending key. The root
//! requires `name`, `fields` and `rules`; a rule's `when` root must be a
//! group. Unknown structural keys are rejected, except on outcomes, whose
//! extra keys are carried as attributes. RON documents use the same node
//! model.
//!
//! Encoding emits field attributes in declared order, omitting `name` (it is
//! the map key) and `value` when null. Field order is preserved.

// ============================================================================
// SECTION: Imports
// ============================================================================

use form_logic::Condition;
use form_logic::GroupKind;
use form_logic::SerdeError;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::config::MAX_CONDITION_DEPTH_LIMIT;
use crate::core::Attribute;
use crate::core::AttributeError;
use crate::core::AttributeKind;
use crate::core::AttributeRegistry;
use crate::core::AttributeSetError;
use crate::core::Field;
use crate::core::FieldBuilder;
use crate::core::FieldName;
use crate::core::FieldPredicate;
use crate::core::FieldType;
use crate::core::Operator;
use crate::core::Outcome;
use crate::core::Rule;
use crate::core::RuleCondition;
use crate::core::Scope;
use crate::core::ScopeError;
use crate::runtime::Schema;
use crate::runtime::SchemaBuilder;
use crate::runtime::SchemaError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Path of the document root.
const ROOT_PATH: &str = "$";
/// Keys accepted at the document root.
const DOCUMENT_KEYS: &[&str] = &["name", "fields", "rules"];
/// Keys accepted on a rule.
const RULE_KEYS: &[&str] = &["when", "then"];
/// Keys accepted on a condition group.
const GROUP_KEYS: &[&str] = &["group", "conditions"];
/// Keys accepted on a condition leaf.
const LEAF_KEYS: &[&str] = &["target", "operator", "expected"];
/// Structural keys of an outcome; any other key is an extra attribute.
const OUTCOME_KEYS: &[&str] = &["action", "target"];

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Document decoding and encoding errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// Text is not valid JSON/RON, or encoding failed.
    #[error("document parse error: {0}")]
    Parse(String),
    /// A required key is absent.
    #[error("{path}: missing key `{key}`")]
    MissingKey {
        /// Path of the object missing the key.
        path: String,
        /// Missing key.
        key: &'static str,
    },
    /// A structural key is not recognized.
    #[error("{path}: unexpected key `{key}`")]
    UnknownKey {
        /// Path of the object.
        path: String,
        /// Unrecognized key.
        key: String,
    },
    /// A value has the wrong shape.
    #[error("{path}: {reason}")]
    InvalidValue {
        /// Path of the value.
        path: String,
        /// What is wrong with it.
        reason: String,
    },
    /// Unknown field type tag.
    #[error("{path}: unknown field type `{value}`")]
    UnknownFieldType {
        /// Path of the tag.
        path: String,
        /// Tag text.
        value: String,
    },
    /// Unknown predicate operator.
    #[error("{path}: unknown operator `{value}`")]
    UnknownOperator {
        /// Path of the operator.
        path: String,
        /// Operator text.
        value: String,
    },
    /// Unknown outcome action.
    #[error("{path}: unknown action `{value}`")]
    UnknownAction {
        /// Path of the action.
        path: String,
        /// Action text.
        value: String,
    },
    /// Unknown condition group.
    #[error("{path}: unknown group `{value}`")]
    UnknownGroup {
        /// Path of the group tag.
        path: String,
        /// Group text.
        value: String,
    },
    /// Field attribute key is not in the registry.
    #[error("{path}: unknown attribute `{key}`")]
    UnknownAttribute {
        /// Path of the field.
        path: String,
        /// Attribute key.
        key: String,
    },
    /// Attribute value rejected.
    #[error("{path}: {source}")]
    Attribute {
        /// Path of the attribute.
        path: String,
        /// Parse failure.
        source: AttributeError,
    },
    /// Attribute rejected by the field's attribute set.
    #[error("{path}: {source}")]
    AttributeSet {
        /// Path of the field.
        path: String,
        /// Set failure.
        source: AttributeSetError,
    },
    /// Scope text rejected.
    #[error("{path}: {source}")]
    Scope {
        /// Path of the scope.
        path: String,
        /// Parse failure.
        source: ScopeError,
    },
    /// Condition tree violates structural limits.
    #[error("{path}: {source}")]
    Condition {
        /// Path of the offending node.
        path: String,
        /// Structural failure.
        source: SerdeError,
    },
    /// Decoded document does not form a valid schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

// ============================================================================
// SECTION: Node Traits
// ============================================================================

/// Decodes a document node into a typed value.
pub trait DecodeNode: Sized {
    /// Decodes `node` found at `path`.
    ///
    /// # Errors
    /// Returns [`DocumentError`] naming the path and the offending key.
    fn decode(node: &Value, path: &str, registry: &AttributeRegistry)
    -> Result<Self, DocumentError>;
}

/// Encodes a typed value into a document node.
pub trait EncodeNode {
    /// Returns the document node.
    fn encode(&self) -> Value;
}

// ============================================================================
// SECTION: Public Entry Points
// ============================================================================

/// Decodes a JSON document into a schema builder.
///
/// # Errors
/// Returns [`DocumentError`] when the text is not JSON or a node is invalid.
pub fn deserialize(text: &str, registry: &AttributeRegistry) -> Result<SchemaBuilder, DocumentError> {
    let root: Value = serde_json::from_str(text).map_err(|err| DocumentError::Parse(err.to_string()))?;
    decode_document(&root, registry)
}

/// Encodes a schema's structural definition as pretty JSON.
///
/// # Errors
/// Returns [`DocumentError::Parse`] when encoding fails.
pub fn serialize(schema: &Schema) -> Result<String, DocumentError> {
    serde_json::to_string_pretty(&to_value(schema)).map_err(|err| DocumentError::Parse(err.to_string()))
}

/// Decodes a RON document into a schema builder.
///
/// # Errors
/// Returns [`DocumentError`] when the text is not RON or a node is invalid.
pub fn from_ron(text: &str, registry: &AttributeRegistry) -> Result<SchemaBuilder, DocumentError> {
    let root: Value = ron::from_str(text).map_err(|err| DocumentError::Parse(err.to_string()))?;
    decode_document(&root, registry)
}

/// Encodes a schema's structural definition as pretty RON.
///
/// # Errors
/// Returns [`DocumentError::Parse`] when encoding fails.
pub fn to_ron(schema: &Schema) -> Result<String, DocumentError> {
    ron::ser::to_string_pretty(&to_value(schema), ron::ser::PrettyConfig::default())
        .map_err(|err| DocumentError::Parse(err.to_string()))
}

/// Returns the document node for a schema's structural definition.
#[must_use]
pub fn to_value(schema: &Schema) -> Value {
    let fields: Map<String, Value> =
        schema.definition().iter().map(|field| (field.name().to_string(), field.encode())).collect();
    let rules: Vec<Value> = schema.rules().iter().map(|rule| rule.encode()).collect();
    let mut root = Map::new();
    root.insert("name".to_string(), Value::String(schema.name().to_string()));
    root.insert("fields".to_string(), Value::Object(fields));
    root.insert("rules".to_string(), Value::Array(rules));
    Value::Object(root)
}

/// Decodes the document root.
fn decode_document(root: &Value, registry: &AttributeRegistry) -> Result<SchemaBuilder, DocumentError> {
    let object = as_object(root, ROOT_PATH)?;
    ensure_keys(object, DOCUMENT_KEYS, ROOT_PATH)?;
    let name = required_str(object, "name", ROOT_PATH)?;
    let fields_node = required(object, "fields", ROOT_PATH)?;
    let fields = Vec::<Field>::decode(fields_node, &child_path(ROOT_PATH, "fields"), registry)?;

    let mut builder = SchemaBuilder::new(name);
    for field in fields {
        builder = builder.field(field);
    }
    let rules_path = child_path(ROOT_PATH, "rules");
    for (index, node) in as_array(required(object, "rules", ROOT_PATH)?, &rules_path)?.iter().enumerate() {
        builder = builder.rule(Rule::decode(node, &index_path(&rules_path, index), registry)?);
    }
    Ok(builder)
}

// ============================================================================
// SECTION: Fields
// ============================================================================

impl DecodeNode for Vec<Field> {
    fn decode(
        node: &Value,
        path: &str,
        registry: &AttributeRegistry,
    ) -> Result<Self, DocumentError> {
        let object = as_object(node, path)?;
        let mut fields = Self::with_capacity(object.len());
        for (name, field_node) in object {
            let field_path = child_path(path, name);
            fields.push(decode_field(name, field_node, &field_path, registry)?);
        }
        Ok(fields)
    }
}

/// Decodes one field keyed by `name`.
fn decode_field(
    name: &str,
    node: &Value,
    path: &str,
    registry: &AttributeRegistry,
) -> Result<Field, DocumentError> {
    let field_name = FieldName::new(name);
    if !field_name.is_addressable() {
        return Err(invalid(path, "field names must be non-empty and contain no `/`"));
    }
    let object = as_object(node, path)?;
    let type_tag = required_str(object, "type", path)?;
    let field_type: FieldType = type_tag.parse().map_err(|_| DocumentError::UnknownFieldType {
        path: child_path(path, "type"),
        value: type_tag.to_string(),
    })?;

    let mut builder = FieldBuilder::new(field_name, field_type);
    for (key, raw) in object {
        let kind = registry.lookup(key).ok_or_else(|| DocumentError::UnknownAttribute {
            path: path.to_string(),
            key: key.clone(),
        })?;
        let attribute_path = child_path(path, key);
        match kind {
            AttributeKind::Type => {}
            AttributeKind::Name => {
                if raw.as_str() != Some(name) {
                    return Err(invalid(&attribute_path, "name must match the field key"));
                }
            }
            _ => {
                let attribute = kind.parse_value(raw).map_err(|source| DocumentError::Attribute {
                    path: attribute_path,
                    source,
                })?;
                builder = builder.attribute(attribute);
            }
        }
    }
    builder.build().map_err(|source| DocumentError::AttributeSet {
        path: path.to_string(),
        source,
    })
}

impl EncodeNode for Field {
    fn encode(&self) -> Value {
        let object: Map<String, Value> = self
            .attributes()
            .iter()
            .filter(|attribute| match attribute {
                Attribute::Name(_) => false,
                Attribute::Value(value) => !value.is_null(),
                _ => true,
            })
            .map(|attribute| (attribute.name().to_string(), attribute.to_json()))
            .collect();
        Value::Object(object)
    }
}

// ============================================================================
// SECTION: Rules
// ============================================================================

impl DecodeNode for Rule {
    fn decode(
        node: &Value,
        path: &str,
        registry: &AttributeRegistry,
    ) -> Result<Self, DocumentError> {
        let object = as_object(node, path)?;
        ensure_keys(object, RULE_KEYS, path)?;
        let when = required(object, "when", path)?;
        let conditions = RuleCondition::decode(when, &child_path(path, "when"), registry)?;
        let then_path = child_path(path, "then");
        let outcomes = as_array(required(object, "then", path)?, &then_path)?
            .iter()
            .enumerate()
            .map(|(index, node)| Outcome::decode(node, &index_path(&then_path, index), registry))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(conditions, outcomes))
    }
}

impl EncodeNode for Rule {
    fn encode(&self) -> Value {
        let mut object = Map::new();
        object.insert("when".to_string(), self.conditions().encode());
        object.insert(
            "then".to_string(),
            Value::Array(self.outcomes().iter().map(EncodeNode::encode).collect()),
        );
        Value::Object(object)
    }
}

// ============================================================================
// SECTION: Conditions
// ============================================================================

impl DecodeNode for RuleCondition {
    fn decode(
        node: &Value,
        path: &str,
        registry: &AttributeRegistry,
    ) -> Result<Self, DocumentError> {
        if !as_object(node, path)?.contains_key("group") {
            return Err(DocumentError::MissingKey {
                path: path.to_string(),
                key: "group",
            });
        }
        decode_condition(node, path, registry, 1)
    }
}

/// Decodes a condition node at `depth` (root is one).
fn decode_condition(
    node: &Value,
    path: &str,
    registry: &AttributeRegistry,
    depth: usize,
) -> Result<RuleCondition, DocumentError> {
    if depth > MAX_CONDITION_DEPTH_LIMIT {
        return Err(DocumentError::Condition {
            path: path.to_string(),
            source: SerdeError::TooDeep {
                max_depth: MAX_CONDITION_DEPTH_LIMIT,
                actual_depth: depth,
            },
        });
    }
    let object = as_object(node, path)?;
    let Some(group) = object.get("group") else {
        return FieldPredicate::decode(node, path, registry).map(Condition::leaf);
    };
    ensure_keys(object, GROUP_KEYS, path)?;
    let group_path = child_path(path, "group");
    let label = group.as_str().ok_or_else(|| invalid(&group_path, "expected a string"))?;
    let kind: GroupKind = label.parse().map_err(|_| DocumentError::UnknownGroup {
        path: group_path.clone(),
        value: label.to_string(),
    })?;
    let conditions_path = child_path(path, "conditions");
    let children = as_array(required(object, "conditions", path)?, &conditions_path)?
        .iter()
        .enumerate()
        .map(|(index, child)| {
            decode_condition(child, &index_path(&conditions_path, index), registry, depth + 1)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Condition::group(kind, children))
}

impl EncodeNode for RuleCondition {
    fn encode(&self) -> Value {
        match self {
            Self::Leaf(predicate) => predicate.encode(),
            _ => {
                let mut object = Map::new();
                let kind = self.kind().map_or("all", GroupKind::as_str);
                object.insert("group".to_string(), Value::String(kind.to_string()));
                object.insert(
                    "conditions".to_string(),
                    Value::Array(self.children().iter().map(|child| child.encode()).collect()),
                );
                Value::Object(object)
            }
        }
    }
}

impl DecodeNode for FieldPredicate {
    fn decode(
        node: &Value,
        path: &str,
        _registry: &AttributeRegistry,
    ) -> Result<Self, DocumentError> {
        let object = as_object(node, path)?;
        ensure_keys(object, LEAF_KEYS, path)?;
        let target = decode_scope(object, path)?;
        let operator_name = required_str(object, "operator", path)?;
        let operator =
            Operator::from_name(operator_name).ok_or_else(|| DocumentError::UnknownOperator {
                path: child_path(path, "operator"),
                value: operator_name.to_string(),
            })?;
        let expected = object.get("expected").cloned();
        let expected_path = child_path(path, "expected");
        match (operator, &expected) {
            (Operator::InSet, Some(Value::Array(_))) | (Operator::Exists | Operator::NotExists, None) => {}
            (Operator::InSet, Some(_)) => return Err(invalid(&expected_path, "in_set expects an array")),
            (Operator::Equals | Operator::NotEquals | Operator::InSet, None) => {
                return Err(DocumentError::MissingKey {
                    path: path.to_string(),
                    key: "expected",
                });
            }
            (Operator::Exists | Operator::NotExists, Some(_)) => {
                return Err(invalid(&expected_path, "operator takes no expected value"));
            }
            (Operator::Equals | Operator::NotEquals, Some(_)) => {}
        }
        Ok(Self {
            target,
            operator,
            expected,
        })
    }
}

impl EncodeNode for FieldPredicate {
    fn encode(&self) -> Value {
        let mut object = Map::new();
        object.insert("target".to_string(), Value::String(self.target.to_string()));
        object.insert("operator".to_string(), Value::String(self.operator.as_str().to_string()));
        if let Some(expected) = &self.expected {
            object.insert("expected".to_string(), expected.clone());
        }
        Value::Object(object)
    }
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

impl DecodeNode for Outcome {
    fn decode(
        node: &Value,
        path: &str,
        _registry: &AttributeRegistry,
    ) -> Result<Self, DocumentError> {
        let object = as_object(node, path)?;
        let action = required_str(object, "action", path)?;
        let target = decode_scope(object, path)?;
        let outcome =
            Self::from_action(action, target).ok_or_else(|| DocumentError::UnknownAction {
                path: child_path(path, "action"),
                value: action.to_string(),
            })?;
        Ok(object
            .iter()
            .filter(|(key, _)| !OUTCOME_KEYS.contains(&key.as_str()))
            .fold(outcome, |outcome, (key, value)| outcome.with_extra(key.clone(), value.clone())))
    }
}

impl EncodeNode for Outcome {
    fn encode(&self) -> Value {
        let mut object = Map::new();
        object.insert("action".to_string(), Value::String(self.action().as_str().to_string()));
        object.insert("target".to_string(), Value::String(self.target().to_string()));
        for (key, value) in self.extras() {
            object.insert(key.clone(), value.clone());
        }
        Value::Object(object)
    }
}

// ============================================================================
// SECTION: Node Helpers
// ============================================================================

/// Returns `{path}.{key}`.
fn child_path(path: &str, key: &str) -> String {
    format!("{path}.{key}")
}

/// Returns `{path}[{index}]`.
fn index_path(path: &str, index: usize) -> String {
    format!("{path}[{index}]")
}

/// Builds an [`DocumentError::InvalidValue`].
fn invalid(path: &str, reason: &str) -> DocumentError {
    DocumentError::InvalidValue {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

/// Requires an object node.
fn as_object<'a>(node: &'a Value, path: &str) -> Result<&'a Map<String, Value>, DocumentError> {
    node.as_object().ok_or_else(|| invalid(path, "expected an object"))
}

/// Requires an array node.
fn as_array<'a>(node: &'a Value, path: &str) -> Result<&'a Vec<Value>, DocumentError> {
    node.as_array().ok_or_else(|| invalid(path, "expected an array"))
}

/// Requires a key.
fn required<'a>(
    object: &'a Map<String, Value>,
    key: &'static str,
    path: &str,
) -> Result<&'a Value, DocumentError> {
    object.get(key).ok_or_else(|| DocumentError::MissingKey {
        path: path.to_string(),
        key,
    })
}

/// Requires a string-valued key.
fn required_str<'a>(
    object: &'a Map<String, Value>,
    key: &'static str,
    path: &str,
) -> Result<&'a str, DocumentError> {
    required(object, key, path)?
        .as_str()
        .ok_or_else(|| invalid(&child_path(path, key), "expected a string"))
}

/// Rejects keys outside `allowed`.
fn ensure_keys(
    object: &Map<String, Value>,
    allowed: &[&str],
    path: &str,
) -> Result<(), DocumentError> {
    match object.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(DocumentError::UnknownKey {
            path: path.to_string(),
            key: key.clone(),
        }),
        None => Ok(()),
    }
}

/// Decodes the `target` scope of a leaf or outcome.
fn decode_scope(object: &Map<String, Value>, path: &str) -> Result<Scope, DocumentError> {
    let text = required_str(object, "target", path)?;
    Scope::parse(text).map_err(|source| DocumentError::Scope {
        path: child_path(path, "target"),
        source,
    })
}
