//! # Uniqueness Enforcement
//!
//! Cross-document rule over a collection sharing one schema: a first-level
//! typed leaf whose `unique.value` is true must not collide with the same
//! field of any other live document.
//!
//! Without a scope a collision is an equal value. With a scope the listed
//! sibling fields form a composite key:
//!
//! - `distinct` (default): collide when the value and every scope field are
//!   equal.
//! - `pkey`: collide when every scope field is equal, whatever the value.
//!
//! Logically deleted documents (`state == -1`) neither raise nor cause
//! collisions. The search is quadratic in the collection size.

use tydoc_core::value::{self, keys, Object, Value};
use tydoc_core::{Document, DocumentId, ScopeMode, UniqueDirective, UniquenessError};

/// Check every document of `collection` against all the others.
///
/// # Errors
///
/// Returns the first [`UniquenessError`] found, in document order.
pub fn enforce_uniqueness(collection: &[Document]) -> Result<(), UniquenessError> {
    for document in collection {
        enforce_document(document, collection)?;
    }
    Ok(())
}

/// Check the unique fields of `document` against `collection`.
///
/// `collection` may contain `document` itself; members sharing its id are
/// never compared with it.
pub fn enforce_document(document: &Document, collection: &[Document]) -> Result<(), UniquenessError> {
    for (field, node) in document.as_object() {
        let Value::Object(leaf) = node else {
            continue;
        };
        let Some(unique) = leaf.get(keys::UNIQUE) else {
            continue;
        };

        if !UniqueDirective::is_enabled(field, unique)? {
            continue;
        }
        let id = document.require_id()?;
        if document.is_deleted()? {
            tracing::debug!(document = %id, "skipping deleted document");
            return Ok(());
        }

        let directive = UniqueDirective::parse(field, unique)?;
        let own_value = leaf.get(keys::VALUE).ok_or_else(|| {
            UniquenessError::malformed(format!("unique field '{field}' has no 'value'"))
        })?;

        tracing::debug!(document = %id, field = %field, "checking uniqueness");
        if let Some(conflicting) =
            find_collision(document, &id, field, own_value, &directive, collection)?
        {
            tracing::warn!(
                document = %id,
                conflicting = %conflicting,
                field = %field,
                "unique value collision"
            );
            return Err(UniquenessError::ExpectationFailed {
                field: field.clone(),
                document_id: id.to_string(),
                value: own_value.to_string(),
                conflicting_id: conflicting.to_string(),
            });
        }
    }
    Ok(())
}

fn find_collision(
    document: &Document,
    id: &DocumentId,
    field: &str,
    own_value: &Value,
    directive: &UniqueDirective,
    collection: &[Document],
) -> Result<Option<DocumentId>, UniquenessError> {
    for other in collection {
        if other.is_deleted()? {
            continue;
        }
        let other_id = other.require_id()?;
        if other_id == *id {
            continue;
        }
        let Some(Value::Object(other_leaf)) = other.get(field) else {
            continue;
        };

        let value_differs = values_differ(Some(own_value), other_leaf.get(keys::VALUE));
        let collides = match &directive.scope {
            None => !value_differs,
            Some(scope) => {
                let scope_equal = scope
                    .fields
                    .iter()
                    .all(|f| !values_differ(scope_value(document, f), scope_value(other, f)));
                match scope.mode {
                    ScopeMode::Distinct => !value_differs && scope_equal,
                    ScopeMode::PrimaryKey => scope_equal,
                }
            }
        };

        if collides {
            return Ok(Some(other_id));
        }
    }
    Ok(None)
}

/// The `value` of a first-level typed leaf.
fn scope_value<'a>(document: &'a Document, field: &str) -> Option<&'a Value> {
    document.get(field).and_then(|leaf| leaf.get(keys::VALUE))
}

/// Whether two field values count as different for uniqueness.
///
/// Objects (localized strings) are compared over the keys both sides share:
/// they differ only when every shared key differs, or when nothing is
/// shared. An object holding only the `empty` sentinel has nothing to
/// compare and always differs. Numbers compare by magnitude.
pub fn values_differ(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (None, None) => false,
        (None, Some(_)) | (Some(_), None) => true,
        (Some(Value::Object(a)), Some(Value::Object(b))) => objects_differ(a, b),
        (Some(a), Some(b)) => !value::values_equal(a, b),
    }
}

fn objects_differ(a: &Object, b: &Object) -> bool {
    if is_sentinel(a) || is_sentinel(b) {
        return true;
    }
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return false,
        (true, false) | (false, true) => return true,
        (false, false) => {}
    }

    let mut shared = a.iter().filter_map(|(k, v)| b.get(k).map(|w| (v, w))).peekable();
    if shared.peek().is_none() {
        return true;
    }
    shared.all(|(v, w)| !value::values_equal(v, w))
}

fn is_sentinel(object: &Object) -> bool {
    object.len() == 1 && object.contains_key(keys::EMPTY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tydoc_core::ErrorKind;

    fn docs(v: Value) -> Vec<Document> {
        let Value::Array(items) = v else {
            panic!("expected array");
        };
        items.into_iter().map(|i| Document::try_from(i).unwrap()).collect()
    }

    fn price(id: &str, value: i64) -> Value {
        json!({"id": id, "price2": {"type": "number", "value": value, "unique": {"value": "true"}}})
    }

    #[test]
    fn distinct_values_pass() {
        let c = docs(json!([price("a", 888), price("b", 885)]));
        assert!(enforce_uniqueness(&c).is_ok());
    }

    #[test]
    fn equal_values_collide() {
        let c = docs(json!([price("a", 888), price("b", 888)]));
        let err = enforce_uniqueness(&c).unwrap_err();
        match err {
            UniquenessError::ExpectationFailed { field, document_id, conflicting_id, value } => {
                assert_eq!(field, "price2");
                assert_eq!(document_id, "a");
                assert_eq!(conflicting_id, "b");
                assert_eq!(value, "888");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn disabled_directive_is_ignored() {
        let c = docs(json!([
            {"id": "a", "p": {"type": "number", "value": 1, "unique": {"value": false}}},
            {"id": "b", "p": {"type": "number", "value": 1, "unique": {"value": false}}}
        ]));
        assert!(enforce_uniqueness(&c).is_ok());
    }

    #[test]
    fn numbers_compare_by_magnitude() {
        let c = docs(json!([
            {"id": 1, "p": {"type": "number", "value": 888, "unique": {"value": true}}},
            {"id": 2, "p": {"type": "number", "value": 888.0, "unique": {"value": true}}}
        ]));
        assert!(enforce_uniqueness(&c).is_err());
    }

    #[test]
    fn missing_id_is_malformed() {
        let c = docs(json!([
            {"p": {"type": "number", "value": 1, "unique": {"value": true}}}
        ]));
        assert_eq!(
            enforce_uniqueness(&c).unwrap_err().kind(),
            ErrorKind::MalformedSearchableNode
        );
    }

    #[test]
    fn other_documents_need_ids_too() {
        let c = docs(json!([price("a", 1), {"name": "no id"}]));
        assert_eq!(
            enforce_uniqueness(&c).unwrap_err().kind(),
            ErrorKind::MalformedSearchableNode
        );
    }

    #[test]
    fn deleted_members_need_no_id() {
        let c = docs(json!([
            {"id": "1", "code": {"type": "sstring", "value": "A", "unique": {"value": true}}},
            {"state": -1, "code": {"type": "sstring", "value": "B"}},
            {"id": "3", "state": -1, "code": {"type": "sstring", "value": "A", "unique": {"value": true}}}
        ]));
        assert!(enforce_uniqueness(&c).is_ok());
    }

    #[test]
    fn deleted_document_directive_is_not_read() {
        let c = docs(json!([
            {"id": "a", "p": {"type": "number", "value": 1, "unique": {"value": true}}},
            {"id": "b", "state": -1,
             "p": {"type": "number", "value": 2,
                   "unique": {"value": true, "mode": "both", "scope": [{"field": "q"}]}}},
            {"id": "c", "state": -1, "p": {"type": "number", "unique": {"value": true}}}
        ]));
        assert!(enforce_uniqueness(&c).is_ok());
    }

    #[test]
    fn disabled_directive_with_stale_scope_is_ignored() {
        let c = docs(json!([
            {"id": "a", "p": {"type": "number", "value": 1,
                              "unique": {"value": false, "mode": "both", "scope": [{"field": "q"}]}}},
            {"id": "b", "p": {"type": "number", "value": 1,
                              "unique": {"value": "false", "scope": "not an array"}}},
            {"id": "c", "p": {"type": "number", "unique": {"value": false}}}
        ]));
        assert!(enforce_uniqueness(&c).is_ok());
    }

    #[test]
    fn unique_without_value_is_malformed() {
        let c = docs(json!([{"id": "a", "p": {"type": "number", "unique": {"value": true}}}]));
        assert_eq!(
            enforce_uniqueness(&c).unwrap_err().kind(),
            ErrorKind::MalformedSearchableNode
        );
    }

    #[test]
    fn same_id_is_not_a_collision() {
        let c = docs(json!([price("a", 888), price("a", 888)]));
        assert!(enforce_uniqueness(&c).is_ok());
    }

    #[test]
    fn unknown_mode_is_reported() {
        let c = docs(json!([{
            "id": "a",
            "p": {"type": "number", "value": 1,
                  "unique": {"value": true, "mode": "both", "scope": [{"field": "q"}]}}
        }]));
        assert_eq!(
            enforce_uniqueness(&c).unwrap_err().kind(),
            ErrorKind::UniqueValueUnknownScopeType
        );
    }

    #[test]
    fn object_comparison_uses_shared_keys() {
        let a = json!({"pt-pt": "Passe", "en-us": "Pass"});
        let all_differ = json!({"pt-pt": "Chave", "en-us": "Key"});
        let one_equal = json!({"pt-pt": "Passe", "en-us": "Key"});
        let disjoint = json!({"fr-fr": "Passe"});

        assert!(values_differ(Some(&a), Some(&all_differ)));
        assert!(!values_differ(Some(&a), Some(&one_equal)));
        assert!(!values_differ(Some(&a), Some(&a)));
        assert!(values_differ(Some(&a), Some(&disjoint)));
    }

    #[test]
    fn sentinel_and_empty_objects() {
        let sentinel = json!({"empty": true});
        let a = json!({"en-us": "Pass"});
        assert!(values_differ(Some(&sentinel), Some(&sentinel)));
        assert!(values_differ(Some(&a), Some(&sentinel)));
        assert!(values_differ(Some(&sentinel), Some(&a)));
        assert!(!values_differ(Some(&json!({})), Some(&json!({}))));
        assert!(values_differ(Some(&json!({})), Some(&a)));
        assert!(values_differ(Some(&a), Some(&json!("Pass"))));
    }

    #[test]
    fn missing_values() {
        assert!(!values_differ(None, None));
        assert!(values_differ(None, Some(&json!(1))));
        assert!(values_differ(Some(&json!(1)), None));
    }
}
