//! # tydoc-core: Foundational Types for tydoc
//!
//! This crate defines the value model and the vocabulary every other tydoc
//! crate speaks: typed-leaf views, documents and their identifiers, field
//! paths, and the error hierarchy. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Scale-preserving numbers.** Values are `serde_json::Value` built with
//!    `arbitrary_precision`; numeric work goes through `bigdecimal::BigDecimal`.
//!    No number is ever routed through `f64`.
//!
//! 2. **Closed data-type dispatch.** [`DataType`] has exactly three variants
//!    and is resolved once per typed leaf. Unknown tags are rejected at parse
//!    time, not deep inside a check.
//!
//! 3. **Structural error paths.** Every constraint failure carries a
//!    [`FieldPath`] built while unwinding and rendered only at the boundary.
//!
//! 4. **Newtype identifiers.** Document ids are [`DocumentId`], never bare
//!    strings, and numeric ids are normalized to text on read.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tydoc-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - No I/O and no logging; callers decide both.

pub mod codec;
pub mod document;
pub mod error;
pub mod identity;
pub mod leaf;
pub mod path;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use codec::CodecError;
pub use document::Document;
pub use error::{ConstraintError, DocumentError, ErrorKind, TydocError, UniquenessError};
pub use identity::DocumentId;
pub use leaf::{DataType, Scope, ScopeMode, TypedLeaf, UniqueDirective};
pub use path::{FieldPath, PathSegment};
pub use value::{keys, Map, Number, Object, Value};
