//! # Reconciling Revisions
//!
//! Utilities run when a client submits a new revision of a collection that
//! already has a stored revision. Identity is by `id`.

use std::collections::HashSet;

use tydoc_core::{DocumentId, TydocError};

use crate::Collection;

impl Collection {
    /// Assign a fresh random id to every member that lacks one.
    ///
    /// Returns the generated ids in member order. Members whose `id` is
    /// present but malformed are left alone.
    pub fn generate_missing_ids(&mut self) -> Vec<DocumentId> {
        let mut generated = Vec::new();
        for document in &mut self.documents {
            if matches!(document.id(), Ok(None)) {
                let id = DocumentId::generate();
                document.set_id(&id);
                generated.push(id);
            }
        }
        tracing::debug!(generated = generated.len(), "generated missing ids");
        generated
    }

    /// Append, marked deleted, every member of `old` whose id no longer
    /// appears in this collection.
    ///
    /// # Errors
    ///
    /// Every member of `old` must carry an id; malformed ids in either
    /// collection are reported.
    pub fn append_removed_items(&mut self, old: &Collection) -> Result<(), TydocError> {
        let current: HashSet<DocumentId> = self.ids()?.into_iter().collect();

        let mut removed = Vec::new();
        for document in old {
            let id = document.require_id()?;
            if !current.contains(&id) {
                let mut tombstone = document.clone();
                tombstone.mark_deleted();
                removed.push(tombstone);
            }
        }

        tracing::debug!(removed = removed.len(), "appending removed items");
        self.documents.extend(removed);
        Ok(())
    }

    /// Drop members without an id, or whose id does not appear in `old`.
    ///
    /// # Errors
    ///
    /// Malformed ids in either collection are reported.
    pub fn purge_invalid_items(&mut self, old: &Collection) -> Result<(), TydocError> {
        let known: HashSet<DocumentId> = old.ids()?.into_iter().collect();

        let before = self.documents.len();
        let mut kept = Vec::with_capacity(before);
        for document in std::mem::take(&mut self.documents) {
            match document.id()? {
                Some(id) if known.contains(&id) => kept.push(document),
                _ => {}
            }
        }

        tracing::debug!(purged = before - kept.len(), "purged invalid items");
        self.documents = kept;
        Ok(())
    }
}
