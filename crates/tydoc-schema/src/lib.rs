//! # tydoc-schema: Schema Engines
//!
//! The three algorithms that give a schema document its meaning.
//!
//! ## Merge (`merge`)
//!
//! [`merge`] prunes value keys the schema does not declare and fills in
//! schema defaults for the ones it does. A value that cannot be reconciled
//! with the schema degrades to a copy of the schema; [`try_merge`] exposes
//! the underlying [`MergeConflict`] for callers that need to know.
//!
//! ## Constraint Checking (`check`)
//!
//! [`check`] validates every typed leaf against its declared data type,
//! mandatory flag, bounds, and numeric precision, failing fast with the path
//! of the offending node.
//!
//! ## Uniqueness (`unique`)
//!
//! [`enforce_uniqueness`] compares the unique fields of every document in a
//! collection against the others, honouring composite scopes and skipping
//! logically deleted documents.
//!
//! ## Crate Policy
//!
//! - Depends only on `tydoc-core` internally.
//! - Pure tree transformations: no I/O, no shared state.
//! - Emits `tracing` events; never installs a subscriber.

pub mod check;
pub mod merge;
pub mod unique;

pub use check::{check, check_leaf, check_object};
pub use merge::{merge, try_merge, MergeConflict};
pub use unique::{enforce_document, enforce_uniqueness, values_differ};

use tydoc_core::{ConstraintError, Value};

/// Optionally merge `value` into `schema`, then check it.
///
/// When the value cannot be reconciled with the schema the result is a copy
/// of the schema, returned without checking.
///
/// # Errors
///
/// Returns the first [`ConstraintError`] of the merged value.
pub fn merge_and_check(schema: Option<&Value>, value: Value) -> Result<Value, ConstraintError> {
    let Some(schema) = schema else {
        return check(value);
    };
    match try_merge(schema, value) {
        Ok(merged) => check(merged),
        Err(conflict) => {
            tracing::warn!(
                path = %conflict.path,
                reason = %conflict.reason,
                "value incompatible with schema, falling back to schema defaults"
            );
            Ok(schema.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn without_schema_only_checks() {
        let doc = json!({"n": {"type": "number", "value": 3, "max": 2}});
        assert!(merge_and_check(None, doc).is_err());
    }

    #[test]
    fn merged_value_is_checked() {
        let schema = json!({"name": {"type": "sstring", "value": "", "mandatory": "true"}});
        let err = merge_and_check(Some(&schema), json!({"name": {"value": ""}})).unwrap_err();
        assert_eq!(err.path().to_string(), "name.value");
    }

    #[test]
    fn fallback_skips_the_check() {
        let schema = json!({"name": {"type": "sstring", "value": "", "mandatory": "true"}});
        let result = merge_and_check(Some(&schema), json!({"name": "plain"})).unwrap();
        assert_eq!(result, schema);
    }
}
