//! Single-document scenarios: merge then check, as an application would run
//! them on a submitted document.

use proptest::prelude::*;
use serde_json::json;
use tydoc_core::{codec, ConstraintError, ErrorKind, Value};
use tydoc_schema::{check, merge, merge_and_check};

fn parse(text: &str) -> Value {
    serde_json::from_str(text).unwrap()
}

fn age_leaf(value: &str, min: &str, max: &str) -> Value {
    parse(&format!(
        r#"{{"id": 1, "minAge": {{"mandatory": "true", "type": "number",
            "min": {min}, "max": {max}, "value": {value}}}}}"#
    ))
}

#[test]
fn submitted_document_is_normalized_to_schema() {
    let schema = json!({
        "id": 0,
        "num1": {"type": "number", "value": 0, "mandatory": false},
        "string1": {"type": "sstring", "value": "", "mandatory": false}
    });
    let submitted = json!({
        "id": 1,
        "num1": {"type": "number", "value": 111, "foo": 111, "mandatory": false},
        "num2": {"type": "number", "value": 222, "mandatory": false}
    });
    let result = merge_and_check(Some(&schema), submitted).unwrap();
    assert_eq!(
        result,
        json!({
            "id": 1,
            "num1": {"type": "number", "value": 111, "mandatory": false},
            "string1": {"type": "sstring", "value": "", "mandatory": false}
        })
    );
}

#[test]
fn precision_scenarios() {
    let schema = age_leaf("0", "0", "99.99");
    let err = merge_and_check(Some(&schema), age_leaf("1.111", "0", "99.99")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PrecisionExceeded);

    let schema = age_leaf("0", "0", "99");
    let err = merge_and_check(Some(&schema), age_leaf("1.1", "0", "99")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PrecisionExceeded);
    assert!(merge_and_check(Some(&schema), age_leaf("1", "0", "99")).is_ok());

    let schema = age_leaf("0", "0", "9999.99");
    assert!(merge_and_check(Some(&schema), age_leaf("0", "0", "9999.99")).is_ok());

    let schema = age_leaf("0", "0.00000001", "99");
    assert!(merge_and_check(Some(&schema), age_leaf("0.0000001", "0.00000001", "99")).is_ok());
}

#[test]
fn checked_document_survives_print_and_parse() {
    let text = r#"{"num1":{"type":"number","value":111,"mandatory":"false","xxx":[{"a":1},{"b":2}]},"price":{"type":"number","value":10.50,"max":9999.99}}"#;
    let doc = codec::parse_object(text).unwrap().unwrap().into_value();
    let checked = check(doc).unwrap();
    let printed = codec::to_text(&checked, false).unwrap();
    assert_eq!(printed, text);
    let reparsed = codec::parse_object(&printed).unwrap().unwrap().into_value();
    assert_eq!(check(reparsed).unwrap(), checked);
}

#[test]
fn error_paths_name_the_offending_node() {
    let doc = json!({
        "description": {"type": "string", "max": 4,
                        "value": {"en-us": "Pass", "pt-pt": "Passe"}}
    });
    match check(doc).unwrap_err() {
        ConstraintError::AboveMax { path, max, actual } => {
            assert_eq!(path.to_string(), "description.value.pt-pt");
            assert_eq!(max, "4");
            assert_eq!(actual, "5");
        }
        other => panic!("unexpected error: {other}"),
    }
}

proptest! {
    /// A value inside `[min, max]` with no more decimals than the bounds passes.
    #[test]
    fn in_range_values_pass(cents in 0u32..=9999) {
        let value = format!("{}.{:02}", cents / 100, cents % 100);
        let doc = age_leaf(&value, "0", "99.99");
        prop_assert!(check(doc).is_ok());
    }

    /// One extra decimal place always fails, whatever the magnitude.
    #[test]
    fn extra_decimals_fail(mills in 0u32..=99_999) {
        let value = format!("{}.{:03}", mills / 1000, mills % 1000);
        let doc = age_leaf(&value, "0", "99.99");
        let err = check(doc).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::PrecisionExceeded);
    }

    /// Merging never lets a value escape the check once a schema is given.
    #[test]
    fn merged_string_leaves_respect_bounds(text in "[a-z]{0,12}") {
        let schema = json!({"name": {"type": "sstring", "value": "", "min": 0, "max": 8}});
        let value = json!({"name": {"value": text.clone(), "extra": true}});
        let merged = merge(&schema, value);
        let result = check(merged);
        prop_assert_eq!(result.is_ok(), text.chars().count() <= 8);
    }
}
