//! # Schema Merge
//!
//! Normalizes a value against a schema of the same shape, in two ordered
//! passes:
//!
//! 1. **Prune**: keys of the value absent from the schema are removed,
//!    recursively through nested objects.
//! 2. **Add defaults**: keys of the schema absent from the value are copied
//!    verbatim. For a non-empty schema array, its first element is a template
//!    whose missing keys are added to the first element of the value array.
//!
//! Neither pass descends below a typed leaf of type `string`: its inner keys
//! are locale identifiers, not schema fields.
//!
//! A value whose shape cannot be reconciled with the schema (an object where
//! the schema has a scalar, a scalar where it has an object) is a
//! [`MergeConflict`]. [`merge`] recovers from it by returning a copy of the
//! schema; [`try_merge`] reports it.

use thiserror::Error;
use tydoc_core::value::{self, keys, Object, Value};
use tydoc_core::{DataType, FieldPath, PathSegment};

/// The value cannot be reconciled with the schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{path}: {reason}")]
pub struct MergeConflict {
    /// Where the shapes diverge.
    pub path: FieldPath,
    /// What diverged.
    pub reason: String,
}

impl MergeConflict {
    fn at_root(reason: impl Into<String>) -> Self {
        Self {
            path: FieldPath::root(),
            reason: reason.into(),
        }
    }

    fn within(mut self, segment: impl Into<PathSegment>) -> Self {
        self.path.push_front(segment);
        self
    }
}

/// Merge `value` into the shape of `schema`, falling back to a copy of the
/// schema when the two cannot be reconciled.
pub fn merge(schema: &Value, value: Value) -> Value {
    match try_merge(schema, value) {
        Ok(merged) => merged,
        Err(conflict) => {
            tracing::warn!(
                path = %conflict.path,
                reason = %conflict.reason,
                "value incompatible with schema, falling back to schema defaults"
            );
            schema.clone()
        }
    }
}

/// Merge `value` into the shape of `schema`.
///
/// # Errors
///
/// Returns [`MergeConflict`] when either root is not an object or the
/// shapes diverge anywhere below.
pub fn try_merge(schema: &Value, value: Value) -> Result<Value, MergeConflict> {
    let Value::Object(schema) = schema else {
        return Err(MergeConflict::at_root(format!(
            "schema root must be an object, found {}",
            value::kind_name(schema)
        )));
    };
    let Value::Object(mut object) = value else {
        return Err(MergeConflict::at_root(format!(
            "value root must be an object, found {}",
            value::kind_name(&value)
        )));
    };

    // Order matters: defaults copied in by the second pass are never pruned.
    prune(schema, &mut object)?;
    add_defaults(schema, &mut object)?;
    Ok(Value::Object(object))
}

/// Whether `schema` is a typed leaf of type `string`.
fn is_localized_leaf(schema: &Object) -> bool {
    matches!(
        schema.get(keys::TYPE),
        Some(Value::String(tag)) if tag == DataType::LocalizedString.as_str()
    )
}

fn prune(schema: &Object, object: &mut Object) -> Result<(), MergeConflict> {
    object.retain(|key, _| {
        let keep = schema.contains_key(key);
        if !keep {
            tracing::debug!(key = %key, "pruning field absent from schema");
        }
        keep
    });

    if is_localized_leaf(schema) {
        return Ok(());
    }

    for (key, child) in object.iter_mut() {
        let Value::Object(child) = child else {
            continue;
        };
        match schema.get(key) {
            Some(Value::Object(schema_child)) => {
                prune(schema_child, child).map_err(|e| e.within(key.as_str()))?;
            }
            Some(other) => {
                return Err(MergeConflict::at_root(format!(
                    "schema holds {}, value holds an object",
                    value::kind_name(other)
                ))
                .within(key.as_str()));
            }
            None => {}
        }
    }
    Ok(())
}

fn add_defaults(schema: &Object, object: &mut Object) -> Result<(), MergeConflict> {
    let opaque = is_localized_leaf(schema);

    for (key, schema_child) in schema {
        let Some(slot) = object.get_mut(key) else {
            tracing::debug!(key = %key, "adding schema default");
            object.insert(key.clone(), schema_child.clone());
            continue;
        };
        if opaque {
            continue;
        }

        match schema_child {
            Value::Object(schema_child) => match slot {
                Value::Object(child) => {
                    add_defaults(schema_child, child).map_err(|e| e.within(key.as_str()))?;
                }
                other => {
                    return Err(MergeConflict::at_root(format!(
                        "schema holds an object, value holds {}",
                        value::kind_name(other)
                    ))
                    .within(key.as_str()));
                }
            },
            Value::Array(template) => {
                let Some(template) = template.first() else {
                    continue;
                };
                let Value::Array(items) = slot else {
                    return Err(MergeConflict::at_root(format!(
                        "schema holds an array, value holds {}",
                        value::kind_name(slot)
                    ))
                    .within(key.as_str()));
                };
                let (Some(first), Value::Object(template)) = (items.first_mut(), template) else {
                    continue;
                };
                let Value::Object(first) = first else {
                    return Err(MergeConflict::at_root(format!(
                        "array template is an object, element holds {}",
                        value::kind_name(first)
                    ))
                    .within(0usize)
                    .within(key.as_str()));
                };
                add_defaults(template, first)
                    .map_err(|e| e.within(0usize).within(key.as_str()))?;
            }
            _ => {}
        }
    }
    Ok(())
}
