//! Per-type extraction and mutation strategies
//!
//! The dispatcher translates a generic extract/apply request into the
//! runtime-specific call sequence for the entry's type. Structured types
//! always round-trip through the full field tree: `parse_as_dict` on the way
//! out, `save_type_tree` on the way back in.

use bundlebridge_core::runtime::EntryRef;
use bundlebridge_core::{BridgeError, BridgeResult, SupportedType};
use serde_json::Value;

/// Extract an entry's payload
///
/// Returns an empty payload for types with no export strategy; callers treat
/// that as unsupported.
pub fn extract(entry: &dyn EntryRef) -> BridgeResult<Vec<u8>> {
    match SupportedType::from_name(&entry.type_name()) {
        Some(SupportedType::TextAsset) => extract_text(entry),
        Some(SupportedType::Texture2D) => Ok(entry.image_png()?),
        Some(SupportedType::Mesh) => Ok(entry.mesh_text()?.into_bytes()),
        Some(ty) if ty.tree_typed() => extract_tree(entry),
        _ => Ok(Vec::new()),
    }
}

/// Apply an imported payload onto an entry
///
/// The caller marks the session dirty only after this returns `Ok`; every
/// validation failure happens before any runtime mutation.
pub fn apply(entry: &mut dyn EntryRef, data: &[u8]) -> BridgeResult<()> {
    let type_name = entry.type_name();
    match SupportedType::from_name(&type_name) {
        Some(SupportedType::TextAsset) => {
            let text = String::from_utf8_lossy(data).into_owned();
            entry.set_field("m_Script", Value::String(text))?;
            entry.save()?;
            Ok(())
        }
        Some(SupportedType::Texture2D) => {
            entry.replace_image(data)?;
            entry.save()?;
            Ok(())
        }
        Some(ty) if ty.tree_typed() => apply_tree(entry, data),
        _ => Err(BridgeError::Unsupported(format!(
            "import_object not supported for type: {type_name}"
        ))),
    }
}

fn extract_text(entry: &dyn EntryRef) -> BridgeResult<Vec<u8>> {
    let parsed = entry.parse_as_object()?;
    if let Some(script) = parsed.get("m_Script").and_then(Value::as_str)
        && !script.is_empty()
    {
        return Ok(script.as_bytes().to_vec());
    }
    Ok(parsed
        .get("m_Bytes")
        .map(value_to_bytes)
        .unwrap_or_default())
}

fn extract_tree(entry: &dyn EntryRef) -> BridgeResult<Vec<u8>> {
    let tree = entry.parse_as_dict()?;
    let text = serde_json::to_string_pretty(&tree)?;
    Ok(text.into_bytes())
}

fn apply_tree(entry: &mut dyn EntryRef, data: &[u8]) -> BridgeResult<()> {
    let text = String::from_utf8_lossy(data);
    let text = text.trim();
    if text.is_empty() {
        return Err(BridgeError::InvalidInput("Input JSON is empty".into()));
    }
    let tree: Value = serde_json::from_str(text)
        .map_err(|e| BridgeError::InvalidInput(format!("Typetree JSON does not parse: {e}")))?;
    if !tree.is_object() {
        return Err(BridgeError::InvalidInput(
            "Typetree JSON must be a JSON object".into(),
        ));
    }
    entry.save_type_tree(&tree)?;
    Ok(())
}

/// Render a field value as raw bytes
///
/// Byte payloads surface from the runtime either as a string or as an array
/// of small integers, depending on asset version.
fn value_to_bytes(value: &Value) -> Vec<u8> {
    match value {
        Value::String(s) => s.as_bytes().to_vec(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_u64)
            .map(|n| (n & 0xFF) as u8)
            .collect(),
        _ => Vec::new(),
    }
}
