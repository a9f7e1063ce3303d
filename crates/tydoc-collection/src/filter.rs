//! # Lifecycle Filters
//!
//! Drop members that are inactive, hidden or logically deleted. Members
//! whose id appears in the ignore list are always kept, whatever their
//! flags; members without a usable id are never ignored.

use tydoc_core::{Document, DocumentError, TydocError};

use crate::Collection;

impl Collection {
    /// Keep members whose `active` flag is set (absent counts as set).
    pub fn filter_active<S: AsRef<str>>(&mut self, ignore_ids: &[S]) -> Result<(), TydocError> {
        self.retain_with(ignore_ids, "active", Document::is_active)
    }

    /// Keep members whose `visible` flag is set (absent counts as set).
    pub fn filter_visible<S: AsRef<str>>(&mut self, ignore_ids: &[S]) -> Result<(), TydocError> {
        self.retain_with(ignore_ids, "visible", Document::is_visible)
    }

    /// Keep members that are not logically deleted.
    pub fn filter_not_deleted<S: AsRef<str>>(
        &mut self,
        ignore_ids: &[S],
    ) -> Result<(), TydocError> {
        self.retain_with(ignore_ids, "not-deleted", |d| d.is_deleted().map(|deleted| !deleted))
    }

    fn retain_with<S, F>(
        &mut self,
        ignore_ids: &[S],
        filter: &str,
        keep: F,
    ) -> Result<(), TydocError>
    where
        S: AsRef<str>,
        F: Fn(&Document) -> Result<bool, DocumentError>,
    {
        let before = self.documents.len();
        let mut kept = Vec::with_capacity(before);
        for document in std::mem::take(&mut self.documents) {
            if is_ignored(&document, ignore_ids) || keep(&document)? {
                kept.push(document);
            }
        }
        tracing::debug!(filter, before, after = kept.len(), "filtered collection");
        self.documents = kept;
        Ok(())
    }
}

fn is_ignored<S: AsRef<str>>(document: &Document, ignore_ids: &[S]) -> bool {
    if ignore_ids.is_empty() {
        return false;
    }
    match document.id() {
        Ok(Some(id)) => ignore_ids.iter().any(|ignored| id == ignored.as_ref()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tydoc_core::{codec, ErrorKind};

    const NONE: &[&str] = &[];

    fn flagged(flag: &str) -> Collection {
        let leaf = |v: i64| json!({"mandatory": "true", "type": "number", "value": v, "min": 0, "max": 1});
        let docs = codec::documents_from_value(json!([
            {"id": 1, flag: leaf(1)},
            {"id": 3, "dummy": leaf(1)},
            {"id": 2, flag: leaf(0)}
        ]))
        .unwrap();
        Collection::new(docs)
    }

    #[test]
    fn inactive_members_are_dropped() {
        let mut c = flagged("active");
        c.filter_active(NONE).unwrap();
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn ignored_members_survive() {
        let mut c = flagged("active");
        c.filter_active(&["2"]).unwrap();
        assert_eq!(c.len(), 3);

        let mut c = flagged("visible");
        c.filter_visible(&["2".to_string()]).unwrap();
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn hidden_members_are_dropped() {
        let mut c = flagged("visible");
        c.filter_visible(NONE).unwrap();
        assert_eq!(c.len(), 2);
        assert!(c.find("2").is_none());
    }

    #[test]
    fn deleted_members_are_dropped() {
        let docs = codec::documents_from_value(json!([
            {"id": 1, "state": -1},
            {"id": 2, "state": -1},
            {"id": 3, "state": 0}
        ]))
        .unwrap();

        let mut c = Collection::new(docs.clone());
        c.filter_not_deleted(NONE).unwrap();
        assert_eq!(c.len(), 1);

        let mut c = Collection::new(docs);
        c.filter_not_deleted(&["1"]).unwrap();
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn malformed_flags_fail() {
        let docs = codec::documents_from_value(json!([{"id": 1, "active": "yes"}])).unwrap();
        let mut c = Collection::new(docs);
        assert_eq!(c.filter_active(NONE).unwrap_err().kind(), ErrorKind::InvalidDataType);
    }

    #[test]
    fn malformed_flags_of_ignored_members_are_not_read() {
        let docs = codec::documents_from_value(json!([{"id": 1, "active": "yes"}])).unwrap();
        let mut c = Collection::new(docs);
        c.filter_active(&["1"]).unwrap();
        assert_eq!(c.len(), 1);
    }
}
