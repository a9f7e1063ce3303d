//! # File Input
//!
//! Loads documents, collections and schemas from disk. Files ending in
//! `.yaml` or `.yml` are read as YAML and converted to JSON values; anything
//! else is read as JSON.

use std::path::Path;

use anyhow::{bail, Context, Result};
use tydoc_core::{codec, Document, Map, Number, Value};

/// Read a file as a JSON value. Blank files yield `None`.
pub fn read_value(path: &Path) -> Result<Option<Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(None);
    }

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let value = match ext {
        "yaml" | "yml" => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(&content)
                .with_context(|| format!("invalid YAML in {}", path.display()))?;
            yaml_to_json_value(&yaml)
                .with_context(|| format!("YAML-to-JSON conversion failed for {}", path.display()))?
        }
        _ => serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON in {}", path.display()))?,
    };
    Ok(Some(value))
}

/// Load a single document.
pub fn load_document(path: &Path) -> Result<Document> {
    let Some(value) = read_value(path)? else {
        bail!("{} is empty", path.display());
    };
    Document::try_from(value).with_context(|| format!("{} is not a document", path.display()))
}

/// Load the members of a collection. A blank file is an empty collection.
pub fn load_documents(path: &Path) -> Result<Vec<Document>> {
    match read_value(path)? {
        None => Ok(Vec::new()),
        Some(value) => codec::documents_from_value(value)
            .with_context(|| format!("{} is not a collection", path.display())),
    }
}

/// Load a schema document. Schemas must be non-empty objects.
pub fn load_schema(path: &Path) -> Result<Value> {
    let document = load_document(path).context("cannot load schema")?;
    if document.as_object().is_empty() {
        bail!("schema {} is an empty object", path.display());
    }
    tracing::debug!(schema = %path.display(), "loaded schema");
    Ok(document.into_value())
}

/// Convert a `serde_yaml::Value` to a JSON value.
///
/// Numbers are carried over as text so their written scale survives, as far
/// as the YAML parser preserves it. Tags are dropped.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value> {
    Ok(match yaml {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(*b),
        serde_yaml::Value::Number(n) => {
            let text = n.to_string();
            let number: Number = text
                .parse()
                .map_err(|_| anyhow::anyhow!("cannot represent YAML number {text} in JSON"))?;
            Value::Number(number)
        }
        serde_yaml::Value::String(s) => Value::String(s.clone()),
        serde_yaml::Value::Sequence(seq) => {
            Value::Array(seq.iter().map(yaml_to_json_value).collect::<Result<_>>()?)
        }
        serde_yaml::Value::Mapping(map) => {
            let mut object = Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => bail!("unsupported YAML map key: {other:?}"),
                };
                object.insert(key, yaml_to_json_value(v)?);
            }
            Value::Object(object)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value)?,
    })
}
