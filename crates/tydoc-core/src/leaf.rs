//! # Typed Leaves
//!
//! A typed leaf is an object carrying a `type` tag whose value is not itself
//! an object. [`TypedLeaf`] is a borrowed view over such an object that reads
//! its reserved tags, and [`UniqueDirective`] is the parsed form of its
//! `unique` tag.
//!
//! Tag readers return [`ConstraintError::MalformedTypedLeaf`] at the root
//! path. Callers re-anchor the error with [`ConstraintError::within`].

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::error::{ConstraintError, UniquenessError};
use crate::path::FieldPath;
use crate::value::{self, keys, Object, Value};

/// Declared data type of a typed leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// A JSON number, bounded and scale-limited by `min`/`max`.
    #[serde(rename = "number")]
    Number,
    /// A single string, length-bounded by `min`/`max`.
    #[serde(rename = "sstring")]
    SimpleString,
    /// A map of locale to string, each entry checked like [`DataType::SimpleString`].
    #[serde(rename = "string")]
    LocalizedString,
}

impl DataType {
    /// All supported data types.
    pub fn all() -> &'static [DataType] {
        &[Self::Number, Self::SimpleString, Self::LocalizedString]
    }

    /// The tag as written in documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::SimpleString => "sstring",
            Self::LocalizedString => "string",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "number" => Ok(Self::Number),
            "sstring" => Ok(Self::SimpleString),
            "string" => Ok(Self::LocalizedString),
            other => Err(ConstraintError::UnknownDataType {
                path: FieldPath::root(),
                data_type: other.to_string(),
            }),
        }
    }
}

/// Borrowed view over an object recognized as a typed leaf.
#[derive(Debug, Clone, Copy)]
pub struct TypedLeaf<'a> {
    object: &'a Object,
}

impl<'a> TypedLeaf<'a> {
    /// View `object` as a typed leaf if it carries a non-object `type` tag.
    pub fn view(object: &'a Object) -> Option<Self> {
        match object.get(keys::TYPE) {
            Some(Value::Object(_)) | None => None,
            Some(_) => Some(Self { object }),
        }
    }

    /// The underlying object.
    pub fn object(&self) -> &'a Object {
        self.object
    }

    /// The raw `type` tag.
    pub fn type_tag(&self) -> Result<&'a str, ConstraintError> {
        match self.object.get(keys::TYPE) {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(ConstraintError::malformed(format!(
                "'type' must be a string, found {}",
                value::kind_name(other)
            ))),
            None => Err(ConstraintError::malformed("missing 'type'")),
        }
    }

    /// The declared data type.
    pub fn data_type(&self) -> Result<DataType, ConstraintError> {
        self.type_tag()?.parse()
    }

    /// The payload. Required on every typed leaf.
    pub fn value(&self) -> Result<&'a Value, ConstraintError> {
        self.object
            .get(keys::VALUE)
            .ok_or_else(|| ConstraintError::malformed("missing 'value'"))
    }

    /// Whether empty strings are rejected. Defaults to false.
    pub fn mandatory(&self) -> Result<bool, ConstraintError> {
        match self.object.get(keys::MANDATORY) {
            None => Ok(false),
            Some(tag) => value::lenient_bool(tag).ok_or_else(|| {
                ConstraintError::malformed(format!("'mandatory' is not a boolean: {tag}"))
            }),
        }
    }

    /// Numeric lower bound.
    pub fn min_decimal(&self) -> Result<Option<BigDecimal>, ConstraintError> {
        self.decimal_tag(keys::MIN)
    }

    /// Numeric upper bound.
    pub fn max_decimal(&self) -> Result<Option<BigDecimal>, ConstraintError> {
        self.decimal_tag(keys::MAX)
    }

    /// Lower length bound for string types.
    pub fn min_length(&self) -> Result<Option<i64>, ConstraintError> {
        self.integer_tag(keys::MIN)
    }

    /// Upper length bound for string types.
    pub fn max_length(&self) -> Result<Option<i64>, ConstraintError> {
        self.integer_tag(keys::MAX)
    }

    /// Maximum decimal scale a number may carry: the larger scale of `min`
    /// and `max`, or `None` when neither is given.
    pub fn precision(&self) -> Result<Option<u32>, ConstraintError> {
        let min = self.min_decimal()?.map(|d| value::decimal_scale(&d));
        let max = self.max_decimal()?.map(|d| value::decimal_scale(&d));
        Ok(match (min, max) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        })
    }

    /// The raw `unique` directive, if any.
    pub fn unique(&self) -> Option<&'a Value> {
        self.object.get(keys::UNIQUE)
    }

    fn decimal_tag(&self, key: &str) -> Result<Option<BigDecimal>, ConstraintError> {
        let Some(tag) = self.object.get(key) else {
            return Ok(None);
        };
        let decimal = match tag {
            Value::Number(_) => value::decimal_of(tag),
            Value::String(s) => value::parse_decimal(s),
            _ => None,
        };
        decimal
            .map(Some)
            .ok_or_else(|| ConstraintError::malformed(format!("'{key}' is not a decimal: {tag}")))
    }

    fn integer_tag(&self, key: &str) -> Result<Option<i64>, ConstraintError> {
        let Some(tag) = self.object.get(key) else {
            return Ok(None);
        };
        value::lenient_i64(tag)
            .map(Some)
            .ok_or_else(|| ConstraintError::malformed(format!("'{key}' is not an integer: {tag}")))
    }
}

/// How scope fields combine with the field's own value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScopeMode {
    /// Collide only when the value and every scope field are equal.
    #[default]
    #[serde(rename = "distinct")]
    Distinct,
    /// Collide when every scope field is equal, whatever the value.
    #[serde(rename = "pkey")]
    PrimaryKey,
}

impl ScopeMode {
    /// The mode as written in documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Distinct => "distinct",
            Self::PrimaryKey => "pkey",
        }
    }
}

impl fmt::Display for ScopeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScopeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "distinct" => Ok(Self::Distinct),
            "pkey" => Ok(Self::PrimaryKey),
            other => Err(other.to_string()),
        }
    }
}

/// Sibling fields forming a composite key with the unique field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// First-level field names.
    pub fields: Vec<String>,
    /// How they combine with the value.
    pub mode: ScopeMode,
}

/// Parsed `unique` tag of a first-level field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueDirective {
    /// `unique.value`.
    pub enabled: bool,
    /// `unique.scope` with its `unique.mode`.
    pub scope: Option<Scope>,
}

impl UniqueDirective {
    /// Parse the `unique` tag of `field`.
    ///
    /// Read only the `value` switch of the `unique` tag of `field`.
    pub fn is_enabled(field: &str, unique: &Value) -> Result<bool, UniquenessError> {
        let Value::Object(tag) = unique else {
            return Err(UniquenessError::malformed(format!(
                "'{field}.unique' must be an object, found {}",
                value::kind_name(unique)
            )));
        };
        tag.get(keys::VALUE).and_then(value::lenient_bool).ok_or_else(|| {
            UniquenessError::malformed(format!("'{field}.unique.value' must be a boolean"))
        })
    }

    /// Parse the `unique` tag of `field`.
    ///
    /// A disabled directive is returned as-is: its `scope` and `mode` are
    /// not read. `mode` is only read when `scope` is present; an
    /// unrecognized mode is [`UniquenessError::UnknownScopeMode`].
    pub fn parse(field: &str, unique: &Value) -> Result<Self, UniquenessError> {
        if !Self::is_enabled(field, unique)? {
            return Ok(Self {
                enabled: false,
                scope: None,
            });
        }

        let scope = match unique.get(keys::SCOPE) {
            None => None,
            Some(Value::Array(entries)) => {
                let fields = entries
                    .iter()
                    .map(|entry| match entry.get(keys::FIELD) {
                        Some(Value::String(name)) => Ok(name.clone()),
                        _ => Err(UniquenessError::malformed(format!(
                            "'{field}.unique.scope' entries must be objects with a string 'field'"
                        ))),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let mode = match unique.get(keys::MODE) {
                    None => ScopeMode::default(),
                    Some(Value::String(mode)) => {
                        mode.parse()
                            .map_err(|mode| UniquenessError::UnknownScopeMode {
                                field: field.to_string(),
                                mode,
                            })?
                    }
                    Some(other) => {
                        return Err(UniquenessError::UnknownScopeMode {
                            field: field.to_string(),
                            mode: other.to_string(),
                        })
                    }
                };
                Some(Scope { fields, mode })
            }
            Some(other) => {
                return Err(UniquenessError::malformed(format!(
                    "'{field}.unique.scope' must be an array, found {}",
                    value::kind_name(other)
                )))
            }
        };

        Ok(Self {
            enabled: true,
            scope,
        })
    }
}
