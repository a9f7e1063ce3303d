//! # Error Types: Structured Error Hierarchy
//!
//! Defines the error types used throughout tydoc. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Every failure is deterministic: re-running the same input reproduces it.
//!   Nothing here is retryable.
//! - Constraint errors carry the [`FieldPath`] of the offending node. The path
//!   is extended while the error unwinds through the checker, outermost
//!   segment first, and only rendered when displayed.
//! - Uniqueness errors name the field, the document and the conflicting
//!   document.
//! - [`ErrorKind`] is the flat taxonomy shared by all of them, for callers that
//!   respond with a stable code rather than a message.

use thiserror::Error;

use crate::path::{FieldPath, PathSegment};

/// Stable classification of every failure the engines can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // Structural
    EmptyObject,
    MalformedTypedLeaf,
    MalformedSearchableNode,
    UnknownDataType,
    UniqueValueUnknownScopeType,

    // Value/constraint
    InvalidDataType,
    MandatoryMissing,
    BelowMin,
    AboveMax,
    PrecisionExceeded,

    // Cross-document
    UniqueValueExpectationFailed,
}

impl ErrorKind {
    /// Returns the stable code for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyObject => "EMPTY_OBJECT",
            Self::MalformedTypedLeaf => "MALFORMED_TYPED_LEAF",
            Self::MalformedSearchableNode => "MALFORMED_SEARCHABLE_NODE",
            Self::UnknownDataType => "UNKNOWN_DATA_TYPE",
            Self::UniqueValueUnknownScopeType => "UNIQUE_VALUE_UNKNOWN_SCOPE_TYPE",
            Self::InvalidDataType => "INVALID_DATA_TYPE",
            Self::MandatoryMissing => "MANDATORY_MISSING",
            Self::BelowMin => "BELOW_MIN",
            Self::AboveMax => "ABOVE_MAX",
            Self::PrecisionExceeded => "PRECISION_EXCEEDED",
            Self::UniqueValueExpectationFailed => "UNIQUE_VALUE_EXPECTATION_FAILED",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Top-level error type for tydoc.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TydocError {
    /// A typed leaf or structural object failed validation.
    #[error("constraint violation: {0}")]
    Constraint(#[from] ConstraintError),

    /// A collection member broke a uniqueness rule.
    #[error("uniqueness violation: {0}")]
    Uniqueness(#[from] UniquenessError),

    /// A reserved document field was missing or malformed.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),
}

impl TydocError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Constraint(e) => e.kind(),
            Self::Uniqueness(e) => e.kind(),
            Self::Document(e) => e.kind(),
        }
    }
}

/// Failure raised by the constraint checker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    /// An object with no keys was reached.
    #[error("{path}: object has no fields")]
    EmptyObject {
        /// Location of the empty object.
        path: FieldPath,
    },

    /// A typed leaf is missing a reserved tag or carries one of the wrong shape.
    #[error("{path}: malformed typed leaf: {reason}")]
    MalformedTypedLeaf {
        /// Location of the typed leaf.
        path: FieldPath,
        /// What was wrong with it.
        reason: String,
    },

    /// The declared `type` tag is not one of the supported data types.
    #[error("{path}: unknown data type '{data_type}'")]
    UnknownDataType {
        /// Location of the typed leaf.
        path: FieldPath,
        /// The declared tag.
        data_type: String,
    },

    /// The value does not match the declared data type.
    #[error("{path}: expected {expected}, found {found}")]
    InvalidDataType {
        /// Location of the offending value.
        path: FieldPath,
        /// What the declared type requires.
        expected: &'static str,
        /// What was found instead.
        found: &'static str,
    },

    /// A mandatory string is empty.
    #[error("{path}: mandatory value is empty")]
    MandatoryMissing {
        /// Location of the empty value.
        path: FieldPath,
    },

    /// A number, or a string length, is below the declared minimum.
    #[error("{path}: {actual} is below the minimum of {min}")]
    BelowMin {
        /// Location of the offending value.
        path: FieldPath,
        /// Declared minimum.
        min: String,
        /// Observed number or length.
        actual: String,
    },

    /// A number, or a string length, is above the declared maximum.
    #[error("{path}: {actual} is above the maximum of {max}")]
    AboveMax {
        /// Location of the offending value.
        path: FieldPath,
        /// Declared maximum.
        max: String,
        /// Observed number or length.
        actual: String,
    },

    /// A number carries more decimal places than its bounds allow.
    #[error("{path}: {value} has {scale} decimal places, at most {precision} allowed")]
    PrecisionExceeded {
        /// Location of the offending value.
        path: FieldPath,
        /// The number as written.
        value: String,
        /// Its decimal scale.
        scale: u32,
        /// The precision derived from `min`/`max`.
        precision: u32,
    },
}

impl ConstraintError {
    /// Location of the failure.
    pub fn path(&self) -> &FieldPath {
        match self {
            Self::EmptyObject { path }
            | Self::MalformedTypedLeaf { path, .. }
            | Self::UnknownDataType { path, .. }
            | Self::InvalidDataType { path, .. }
            | Self::MandatoryMissing { path }
            | Self::BelowMin { path, .. }
            | Self::AboveMax { path, .. }
            | Self::PrecisionExceeded { path, .. } => path,
        }
    }

    fn path_mut(&mut self) -> &mut FieldPath {
        match self {
            Self::EmptyObject { path }
            | Self::MalformedTypedLeaf { path, .. }
            | Self::UnknownDataType { path, .. }
            | Self::InvalidDataType { path, .. }
            | Self::MandatoryMissing { path }
            | Self::BelowMin { path, .. }
            | Self::AboveMax { path, .. }
            | Self::PrecisionExceeded { path, .. } => path,
        }
    }

    /// Re-anchor the error under an enclosing segment.
    pub fn within(mut self, segment: impl Into<PathSegment>) -> Self {
        self.path_mut().push_front(segment);
        self
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyObject { .. } => ErrorKind::EmptyObject,
            Self::MalformedTypedLeaf { .. } => ErrorKind::MalformedTypedLeaf,
            Self::UnknownDataType { .. } => ErrorKind::UnknownDataType,
            Self::InvalidDataType { .. } => ErrorKind::InvalidDataType,
            Self::MandatoryMissing { .. } => ErrorKind::MandatoryMissing,
            Self::BelowMin { .. } => ErrorKind::BelowMin,
            Self::AboveMax { .. } => ErrorKind::AboveMax,
            Self::PrecisionExceeded { .. } => ErrorKind::PrecisionExceeded,
        }
    }

    /// A [`ConstraintError::MalformedTypedLeaf`] at the root path.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedTypedLeaf {
            path: FieldPath::root(),
            reason: reason.into(),
        }
    }
}

/// Failure raised by the uniqueness engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UniquenessError {
    /// A document or unique directive cannot be searched.
    #[error("malformed searchable node: {reason}")]
    MalformedSearchableNode {
        /// What was wrong with it.
        reason: String,
    },

    /// The `unique.mode` tag is neither `distinct` nor `pkey`.
    #[error("field '{field}': unknown uniqueness scope mode '{mode}'")]
    UnknownScopeMode {
        /// Field carrying the directive.
        field: String,
        /// The declared mode.
        mode: String,
    },

    /// Another document already holds this value (or composite key).
    #[error(
        "field '{field}' of document '{document_id}' has value {value} which is not unique \
         in the collection (conflicts with document '{conflicting_id}')"
    )]
    ExpectationFailed {
        /// Field carrying the directive.
        field: String,
        /// Document being checked.
        document_id: String,
        /// Its value, rendered as JSON.
        value: String,
        /// First document found colliding with it.
        conflicting_id: String,
    },
}

impl UniquenessError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedSearchableNode { .. } => ErrorKind::MalformedSearchableNode,
            Self::UnknownScopeMode { .. } => ErrorKind::UniqueValueUnknownScopeType,
            Self::ExpectationFailed { .. } => ErrorKind::UniqueValueExpectationFailed,
        }
    }

    /// A [`UniquenessError::MalformedSearchableNode`] with the given reason.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedSearchableNode {
            reason: reason.into(),
        }
    }
}

impl From<DocumentError> for UniquenessError {
    fn from(e: DocumentError) -> Self {
        Self::MalformedSearchableNode {
            reason: e.to_string(),
        }
    }
}

/// Failure reading a reserved document field (`id`, `state`, `active`, `visible`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The value offered as a document is not an object.
    #[error("a document must be an object, found {found}")]
    NotAnObject {
        /// What was found instead.
        found: &'static str,
    },

    /// The `id` field is absent, null or empty.
    #[error("document has no usable 'id' (missing, null or empty)")]
    MissingId,

    /// The `id` field is neither a string nor a number.
    #[error("document 'id' must be a string or a number, found {found}")]
    InvalidId {
        /// What was found instead.
        found: &'static str,
    },

    /// A reserved field is present with the wrong shape.
    #[error("document field '{field}' is malformed: {reason}")]
    InvalidField {
        /// The reserved field.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

impl DocumentError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingId | Self::InvalidId { .. } => ErrorKind::MalformedSearchableNode,
            Self::NotAnObject { .. } | Self::InvalidField { .. } => ErrorKind::InvalidDataType,
        }
    }
}
