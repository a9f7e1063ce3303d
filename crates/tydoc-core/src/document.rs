//! # Documents
//!
//! A [`Document`] is one member of a collection: a top-level object whose
//! reserved fields (`id`, `state`, `active`, `visible`) drive the collection
//! utilities and the uniqueness engine.

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;
use crate::identity::DocumentId;
use crate::value::{self, keys, Number, Object, Value, STATE_DELETED, STATE_NORMAL};

/// A top-level object taking part in a collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Object);

impl Document {
    /// Wrap an object.
    pub fn new(object: Object) -> Self {
        Self(object)
    }

    /// Borrow the underlying object.
    pub fn as_object(&self) -> &Object {
        &self.0
    }

    /// Mutably borrow the underlying object.
    pub fn as_object_mut(&mut self) -> &mut Object {
        &mut self.0
    }

    /// Unwrap into the underlying object.
    pub fn into_object(self) -> Object {
        self.0
    }

    /// Unwrap into a [`Value::Object`].
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// A first-level field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Whether a first-level field is present.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// The document identifier.
    ///
    /// Strings and numbers are accepted; a missing, null or empty `id` is
    /// `Ok(None)`.
    pub fn id(&self) -> Result<Option<DocumentId>, DocumentError> {
        match self.0.get(keys::ID) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(DocumentId::from(s.as_str()))),
            Some(Value::Number(n)) => Ok(Some(DocumentId::from(n.to_string()))),
            Some(other) => Err(DocumentError::InvalidId {
                found: value::kind_name(other),
            }),
        }
    }

    /// The document identifier, which must be present.
    pub fn require_id(&self) -> Result<DocumentId, DocumentError> {
        self.id()?.ok_or(DocumentError::MissingId)
    }

    /// Assign the document identifier.
    pub fn set_id(&mut self, id: &DocumentId) {
        self.0
            .insert(keys::ID.to_string(), Value::String(id.as_str().to_string()));
    }

    /// Lifecycle state; `0` when absent.
    pub fn state(&self) -> Result<i64, DocumentError> {
        match self.0.get(keys::STATE) {
            None => Ok(STATE_NORMAL),
            Some(state) => value::lenient_i64(state).ok_or_else(|| DocumentError::InvalidField {
                field: keys::STATE,
                reason: format!("expected an integer, found {state}"),
            }),
        }
    }

    /// Whether the document is logically deleted (`state == -1`).
    pub fn is_deleted(&self) -> Result<bool, DocumentError> {
        Ok(self.state()? == STATE_DELETED)
    }

    /// Mark the document logically deleted.
    pub fn mark_deleted(&mut self) {
        self.0
            .insert(keys::STATE.to_string(), Value::Number(Number::from(STATE_DELETED)));
    }

    /// Whether the `active` flag is set. Absent means active.
    pub fn is_active(&self) -> Result<bool, DocumentError> {
        self.flag(keys::ACTIVE)
    }

    /// Whether the `visible` flag is set. Absent means visible.
    pub fn is_visible(&self) -> Result<bool, DocumentError> {
        self.flag(keys::VISIBLE)
    }

    fn flag(&self, field: &'static str) -> Result<bool, DocumentError> {
        let Some(leaf) = self.0.get(field) else {
            return Ok(true);
        };
        leaf.get(keys::VALUE)
            .and_then(value::lenient_i64)
            .map(|v| v > 0)
            .ok_or_else(|| DocumentError::InvalidField {
                field,
                reason: format!("expected an object with an integer 'value', found {leaf}"),
            })
    }
}

impl From<Object> for Document {
    fn from(object: Object) -> Self {
        Self(object)
    }
}

impl TryFrom<Value> for Document {
    type Error = DocumentError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(object) => Ok(Self(object)),
            other => Err(DocumentError::NotAnObject {
                found: value::kind_name(&other),
            }),
        }
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        doc.into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: Value) -> Document {
        Document::try_from(v).unwrap()
    }

    #[test]
    fn ids_accept_strings_and_numbers() {
        assert_eq!(doc(json!({"id": "a"})).id().unwrap(), Some(DocumentId::from("a")));
        assert_eq!(doc(json!({"id": 7})).id().unwrap(), Some(DocumentId::from("7")));
        assert_eq!(doc(json!({"id": ""})).id().unwrap(), None);
        assert_eq!(doc(json!({"id": null})).id().unwrap(), None);
        assert_eq!(doc(json!({})).id().unwrap(), None);
        assert!(matches!(
            doc(json!({"id": true})).id(),
            Err(DocumentError::InvalidId { found: "boolean" })
        ));
        assert_eq!(doc(json!({})).require_id(), Err(DocumentError::MissingId));
    }

    #[test]
    fn state_and_deletion() {
        assert!(!doc(json!({})).is_deleted().unwrap());
        assert!(doc(json!({"state": -1})).is_deleted().unwrap());
        assert!(doc(json!({"state": "-1"})).is_deleted().unwrap());
        assert!(!doc(json!({"state": "0"})).is_deleted().unwrap());
        assert!(doc(json!({"state": [1]})).is_deleted().is_err());

        let mut d = doc(json!({"id": "1"}));
        d.mark_deleted();
        assert_eq!(d.state().unwrap(), -1);
    }

    #[test]
    fn flags_default_to_true() {
        let d = doc(json!({"id": "1"}));
        assert!(d.is_active().unwrap());
        assert!(d.is_visible().unwrap());

        let d = doc(json!({"active": {"value": 0}, "visible": {"value": "1"}}));
        assert!(!d.is_active().unwrap());
        assert!(d.is_visible().unwrap());

        let d = doc(json!({"active": true}));
        assert!(matches!(
            d.is_active(),
            Err(DocumentError::InvalidField { field: "active", .. })
        ));
    }

    #[test]
    fn set_id_overwrites() {
        let mut d = doc(json!({"name": "x"}));
        d.set_id(&DocumentId::from("abc"));
        assert_eq!(d.get("id"), Some(&json!("abc")));
        assert!(d.has_field("id"));
    }

    #[test]
    fn non_objects_are_rejected() {
        assert!(matches!(
            Document::try_from(json!([1, 2])),
            Err(DocumentError::NotAnObject { found: "array" })
        ));
    }
}
