//! # Collections
//!
//! An ordered sequence of documents sharing one schema.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tydoc_core::{codec, CodecError, Document, DocumentId, TydocError, Value};
use tydoc_schema::{check_object, enforce_uniqueness, try_merge};

/// Ordered documents sharing one schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    pub(crate) documents: Vec<Document>,
}

impl Collection {
    /// Wrap documents without validating them.
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Build a collection the way an application accepts a submission:
    /// merge every member into `schema` (when given), check every member,
    /// then enforce uniqueness across the whole collection.
    ///
    /// # Errors
    ///
    /// Returns the first constraint, document or uniqueness failure.
    pub fn validated(schema: Option<&Value>, documents: Vec<Document>) -> Result<Self, TydocError> {
        let mut collection = Self::new(documents);
        if let Some(schema) = schema {
            collection.enforce_schema(schema)?;
        }
        collection.check_constraints()?;
        collection.enforce_uniqueness()?;
        tracing::debug!(documents = collection.len(), "collection validated");
        Ok(collection)
    }

    /// Parse and validate a collection from JSON text. Blank text is an
    /// empty collection.
    pub fn from_text(schema: Option<&Value>, text: &str) -> Result<Self, CollectionLoadError> {
        let documents = codec::parse_collection(text)?.unwrap_or_default();
        Ok(Self::validated(schema, documents)?)
    }

    /// The members, in order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Unwrap into the members.
    pub fn into_documents(self) -> Vec<Document> {
        self.documents
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether there are no members.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Iterate over the members.
    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    /// Append a member without validating it.
    pub fn push(&mut self, document: Document) {
        self.documents.push(document);
    }

    /// The collection as a JSON array.
    pub fn to_value(&self) -> Value {
        Value::Array(self.documents.iter().cloned().map(Document::into_value).collect())
    }

    /// Merge every member into `schema`.
    ///
    /// If any member cannot be reconciled with the schema, the whole
    /// collection becomes a single member holding a copy of the schema.
    ///
    /// # Errors
    ///
    /// Fails only when `schema` itself is not an object.
    pub fn enforce_schema(&mut self, schema: &Value) -> Result<(), TydocError> {
        let template = Document::try_from(schema.clone())?;

        let documents = std::mem::take(&mut self.documents);
        let mut merged = Vec::with_capacity(documents.len());
        for (i, document) in documents.into_iter().enumerate() {
            match try_merge(schema, document.into_value()) {
                Ok(value) => merged.push(Document::try_from(value)?),
                Err(conflict) => {
                    tracing::warn!(
                        index = i,
                        path = %conflict.path,
                        reason = %conflict.reason,
                        "member incompatible with schema, collection falls back to schema defaults"
                    );
                    self.documents = vec![template];
                    return Ok(());
                }
            }
        }
        self.documents = merged;
        Ok(())
    }

    /// Check every member's typed leaves. The member index leads the error path.
    pub fn check_constraints(&self) -> Result<(), TydocError> {
        for (i, document) in self.documents.iter().enumerate() {
            check_object(document.as_object()).map_err(|e| e.within(i))?;
        }
        Ok(())
    }

    /// Enforce uniqueness across all members.
    pub fn enforce_uniqueness(&self) -> Result<(), TydocError> {
        enforce_uniqueness(&self.documents)?;
        Ok(())
    }

    /// Whether a member carries `id`.
    ///
    /// # Errors
    ///
    /// Every member inspected before a match must carry an id.
    pub fn exists(&self, id: &str) -> Result<bool, TydocError> {
        for document in &self.documents {
            if document.require_id()? == id {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Find a member by id. Members without a usable id are skipped.
    pub fn find(&self, id: &str) -> Option<&Document> {
        self.documents
            .iter()
            .find(|d| matches!(d.id(), Ok(Some(ref own)) if own == id))
    }

    /// Members lacking a first-level `field`.
    pub fn documents_without(&self, field: &str) -> Vec<&Document> {
        self.documents.iter().filter(|d| !d.has_field(field)).collect()
    }

    /// Ids of every member that has one.
    pub(crate) fn ids(&self) -> Result<Vec<DocumentId>, TydocError> {
        let mut ids = Vec::with_capacity(self.documents.len());
        for document in &self.documents {
            if let Some(id) = document.id()? {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}

impl From<Vec<Document>> for Collection {
    fn from(documents: Vec<Document>) -> Self {
        Self::new(documents)
    }
}

impl IntoIterator for Collection {
    type Item = Document;
    type IntoIter = std::vec::IntoIter<Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

/// Failure loading a collection from text.
#[derive(Error, Debug)]
pub enum CollectionLoadError {
    /// The text could not be parsed into documents.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The documents failed validation.
    #[error(transparent)]
    Invalid(#[from] TydocError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tydoc_core::ErrorKind;

    fn collection(v: Value) -> Collection {
        let docs = codec::documents_from_value(v).unwrap();
        Collection::new(docs)
    }

    #[test]
    fn enforce_schema_merges_every_member() {
        let schema = json!({"id": -1, "money": {"value": 0, "type": "number"}});
        let mut c = collection(json!([
            {"id": 1, "money": {"value123123": 1, "type": "number"}},
            {"id": 2, "money": {"value": 1, "type": "number"}, "junk": true}
        ]));
        c.enforce_schema(&schema).unwrap();
        assert_eq!(
            c.to_value(),
            json!([
                {"id": 1, "money": {"type": "number", "value": 0}},
                {"id": 2, "money": {"value": 1, "type": "number"}}
            ])
        );
    }

    #[test]
    fn one_incompatible_member_resets_the_collection() {
        let schema = json!({"id": -1, "money": {"value": 0, "type": "number"}});
        let mut c = collection(json!([
            {"id": 1, "money": {"value": 1, "type": "number"}},
            {"id": 2, "money": 7}
        ]));
        c.enforce_schema(&schema).unwrap();
        assert_eq!(c.to_value(), json!([schema]));
    }

    #[test]
    fn non_object_schema_is_rejected() {
        let mut c = collection(json!([{"id": 1}]));
        let err = c.enforce_schema(&json!([1])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDataType);
    }

    #[test]
    fn check_constraints_prefixes_member_index() {
        let c = collection(json!([
            {"id": 1, "x": {"type": "number", "value": 1}},
            {"id": 2, "x": {"type": "number", "value": 3, "max": 2}}
        ]));
        match c.check_constraints().unwrap_err() {
            TydocError::Constraint(e) => assert_eq!(e.path().to_string(), "[1].x.value"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn exists_requires_ids_up_to_the_match() {
        let c = collection(json!([{"id": "1"}, {"id": 2}, {"name": "no id"}]));
        assert!(c.exists("1").unwrap());
        assert!(c.exists("2").unwrap());
        assert_eq!(c.exists("9").unwrap_err().kind(), ErrorKind::MalformedSearchableNode);
        assert!(c.find("2").is_some());
        assert!(c.find("9").is_none());
    }

    #[test]
    fn documents_without_a_field() {
        let c = collection(json!([{"id": 1}, {"id": 2, "str": "ola"}, {"id": 3}]));
        assert_eq!(c.documents_without("str").len(), 2);
        assert!(c.documents_without("id").is_empty());
    }

    #[test]
    fn blank_text_is_an_empty_collection() {
        let c = Collection::from_text(None, " ").unwrap();
        assert!(c.is_empty());
        assert!(matches!(
            Collection::from_text(None, "[1]"),
            Err(CollectionLoadError::Codec(_))
        ));
    }

    #[test]
    fn serializes_as_a_plain_array() {
        let c = collection(json!([{"id": "1"}]));
        assert_eq!(serde_json::to_value(&c).unwrap(), json!([{"id": "1"}]));
        let back: Collection = serde_json::from_value(json!([{"id": "1"}])).unwrap();
        assert_eq!(back, c);
    }
}
