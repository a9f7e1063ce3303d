//! # tydoc-collection: Document Collections
//!
//! A [`Collection`] is an ordered sequence of documents sharing one schema.
//! This crate applies the schema engines of `tydoc-schema` across a whole
//! collection and adds the lifecycle utilities an application runs when a
//! client submits a new revision:
//!
//! - validated construction (merge, check, uniqueness),
//! - id generation for new members,
//! - tombstoning of members removed since the previous revision,
//! - purging of members the previous revision never knew,
//! - filtering by the `active`, `visible` and `state` flags.
//!
//! ## Crate Policy
//!
//! - Depends on `tydoc-core` and `tydoc-schema` internally.
//! - Every fallible operation returns [`tydoc_core::TydocError`].
//! - No I/O; text parsing goes through [`tydoc_core::codec`].

pub mod collection;
mod diff;
mod filter;

pub use collection::{Collection, CollectionLoadError};
