//! # Constraint Checking
//!
//! Walks a value tree and validates every typed leaf it finds against its
//! declared data type and bounds. Structural objects are transparent: the
//! checker descends into every object-valued key (and into object elements
//! of arrays), so the `value` map of a localized string and the `unique`
//! directive are visited as ordinary objects too.
//!
//! Checking is fail-fast in key order. The first failure is returned with
//! the path of the offending node.

use tydoc_core::value::{self, keys, Object, Value};
use tydoc_core::{ConstraintError, DataType, FieldPath, TypedLeaf};

/// Check every typed leaf of `value`, returning it unchanged when all pass.
///
/// # Errors
///
/// Returns the first [`ConstraintError`] found, in key order. A non-object
/// root is [`ConstraintError::InvalidDataType`].
pub fn check(value: Value) -> Result<Value, ConstraintError> {
    match &value {
        Value::Object(object) => check_object(object)?,
        other => {
            return Err(ConstraintError::InvalidDataType {
                path: FieldPath::root(),
                expected: "object",
                found: value::kind_name(other),
            })
        }
    }
    Ok(value)
}

/// Check an object in place.
pub fn check_object(object: &Object) -> Result<(), ConstraintError> {
    if object.is_empty() {
        return Err(ConstraintError::EmptyObject {
            path: FieldPath::root(),
        });
    }

    for (key, child) in object {
        match child {
            Value::Object(inner) => {
                check_object(inner).map_err(|e| e.within(key.as_str()))?;
            }
            Value::Array(items) => {
                check_array(items).map_err(|e| e.within(key.as_str()))?;
            }
            _ if key == keys::TYPE => {
                if let Some(leaf) = TypedLeaf::view(object) {
                    check_leaf(&leaf)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn check_array(items: &[Value]) -> Result<(), ConstraintError> {
    for (i, item) in items.iter().enumerate() {
        match item {
            Value::Object(inner) => check_object(inner).map_err(|e| e.within(i))?,
            Value::Array(nested) => check_array(nested).map_err(|e| e.within(i))?,
            _ => {}
        }
    }
    Ok(())
}

/// Validate one typed leaf against its declared type.
pub fn check_leaf(leaf: &TypedLeaf<'_>) -> Result<(), ConstraintError> {
    let tag = leaf.type_tag()?;
    let payload = leaf.value()?;
    let mandatory = leaf.mandatory()?;

    match tag.parse::<DataType>()? {
        DataType::Number => check_number(leaf, payload),
        DataType::SimpleString => {
            let Value::String(text) = payload else {
                return Err(invalid(DataType::SimpleString, payload).within(keys::VALUE));
            };
            let bounds = (leaf.min_length()?, leaf.max_length()?);
            check_text(text, mandatory, bounds).map_err(|e| e.within(keys::VALUE))
        }
        DataType::LocalizedString => {
            let Value::Object(entries) = payload else {
                return Err(invalid(DataType::LocalizedString, payload).within(keys::VALUE));
            };
            let bounds = (leaf.min_length()?, leaf.max_length()?);
            for (locale, entry) in entries {
                let Value::String(text) = entry else {
                    return Err(ConstraintError::InvalidDataType {
                        path: FieldPath::root(),
                        expected: "string",
                        found: value::kind_name(entry),
                    }
                    .within(locale.as_str())
                    .within(keys::VALUE));
                };
                check_text(text, mandatory, bounds)
                    .map_err(|e| e.within(locale.as_str()).within(keys::VALUE))?;
            }
            Ok(())
        }
    }
}

fn invalid(expected: DataType, found: &Value) -> ConstraintError {
    let expected = match expected {
        DataType::Number => "number",
        DataType::SimpleString => "string",
        DataType::LocalizedString => "object of locale strings",
    };
    ConstraintError::InvalidDataType {
        path: FieldPath::root(),
        expected,
        found: value::kind_name(found),
    }
}

fn check_number(leaf: &TypedLeaf<'_>, payload: &Value) -> Result<(), ConstraintError> {
    let at_value = |e: ConstraintError| e.within(keys::VALUE);

    if !payload.is_number() {
        return Err(at_value(invalid(DataType::Number, payload)));
    }
    let number = value::decimal_of(payload).ok_or_else(|| {
        at_value(ConstraintError::InvalidDataType {
            path: FieldPath::root(),
            expected: "decimal number",
            found: "unparsable number",
        })
    })?;

    if let Some(precision) = leaf.precision()? {
        let scale = value::decimal_scale(&number);
        if scale > precision {
            return Err(at_value(ConstraintError::PrecisionExceeded {
                path: FieldPath::root(),
                value: payload.to_string(),
                scale,
                precision,
            }));
        }
    }

    if let Some(min) = leaf.min_decimal()? {
        if number < min {
            return Err(at_value(ConstraintError::BelowMin {
                path: FieldPath::root(),
                min: min.to_string(),
                actual: payload.to_string(),
            }));
        }
    }
    if let Some(max) = leaf.max_decimal()? {
        if number > max {
            return Err(at_value(ConstraintError::AboveMax {
                path: FieldPath::root(),
                max: max.to_string(),
                actual: payload.to_string(),
            }));
        }
    }
    Ok(())
}

fn check_text(
    text: &str,
    mandatory: bool,
    (min, max): (Option<i64>, Option<i64>),
) -> Result<(), ConstraintError> {
    if mandatory && text.is_empty() {
        return Err(ConstraintError::MandatoryMissing {
            path: FieldPath::root(),
        });
    }

    let length = text.chars().count() as i64;
    if let Some(min) = min {
        if length < min {
            return Err(ConstraintError::BelowMin {
                path: FieldPath::root(),
                min: min.to_string(),
                actual: length.to_string(),
            });
        }
    }
    if let Some(max) = max {
        if length > max {
            return Err(ConstraintError::AboveMax {
                path: FieldPath::root(),
                max: max.to_string(),
                actual: length.to_string(),
            });
        }
    }
    Ok(())
}
