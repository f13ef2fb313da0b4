//! Post-hoc augmentation of serialized configuration documents.
//!
//! A freshly-encoded descriptor records only `{className, uid}`; before a
//! configuration document is handed to a consumer that decodes without the
//! original session, the save root and bundle flavor are merged into the
//! stage entry. Sibling entries are left untouched.

use serde_json::Value;

use crate::error::{CodecError, Result};

/// Merge `{"path": .., "asSpark": ..}` into the configuration entry at
/// `param_key`, leaving every other entry as it was.
pub fn augment_stage_entry(
    doc: &str,
    param_key: &str,
    path: &str,
    as_spark: bool,
) -> Result<String> {
    let mut root: Value = serde_json::from_str(doc).map_err(|e| {
        CodecError::MalformedInput(format!("configuration document is not valid JSON: {}", e))
    })?;

    let entries = root.as_object_mut().ok_or_else(|| {
        CodecError::MalformedInput("configuration document root must be a keyed object".to_string())
    })?;

    let entry = entries
        .get_mut(param_key)
        .ok_or_else(|| {
            CodecError::MalformedInput(format!("no configuration entry for '{}'", param_key))
        })?
        .as_object_mut()
        .ok_or_else(|| {
            CodecError::MalformedInput(format!(
                "configuration entry '{}' must be an object",
                param_key
            ))
        })?;

    entry.insert("path".to_string(), Value::String(path.to_string()));
    entry.insert("asSpark".to_string(), Value::Bool(as_spark));

    Ok(serde_json::to_string(&root)?)
}
