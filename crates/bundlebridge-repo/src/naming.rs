//! Archive and entry name resolution
//!
//! The runtime's attribute schema varies by asset version, so optional
//! metadata is resolved through ordered probe tables: each concept lists its
//! candidate attribute names and the first present value wins.

use bundlebridge_core::runtime::{ContainerHandle, EntryRef};
use serde_json::Value;
use std::path::Path;

/// Size-like attributes, most specific first
pub const SIZE_PROBES: &[&str] = &["byte_size", "size", "data_size", "m_Size"];

/// Container-path attributes
pub const CONTAINER_PROBES: &[&str] = &["container"];

/// Resolve an entry's byte size, if any probe hits a non-negative integer
pub fn probe_size(entry: &dyn EntryRef) -> Option<u64> {
    SIZE_PROBES
        .iter()
        .find_map(|name| entry.attr(name).as_ref().and_then(Value::as_i64))
        .and_then(|n| u64::try_from(n).ok())
}

/// Resolve an entry's container path, if present and non-empty
pub fn probe_container(entry: &dyn EntryRef) -> Option<String> {
    CONTAINER_PROBES.iter().find_map(|name| {
        entry
            .attr(name)
            .as_ref()
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    })
}

/// Resolve an entry's display name from its parsed `m_Name` field
///
/// Returns an empty string when the entry does not parse or carries no name;
/// callers substitute their own placeholder.
pub fn display_name(entry: &dyn EntryRef) -> String {
    entry
        .parse_as_object()
        .ok()
        .as_ref()
        .and_then(|parsed| parsed.get("m_Name"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

/// Resolve the owning archive's tag: declared file name, else stream name,
/// reduced to a normalized basename without extension
pub fn archive_tag(entry: &dyn EntryRef) -> String {
    let name = entry
        .assets_file_name()
        .filter(|s| !s.is_empty())
        .or_else(|| entry.assets_stream_name().filter(|s| !s.is_empty()));

    let Some(name) = name else {
        return String::new();
    };
    let base = Path::new(&name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    normalize_export_name(base)
}

/// Trim and replace spaces/dashes with underscores
pub fn normalize_export_name(s: &str) -> String {
    s.trim().replace([' ', '-'], "_")
}

/// Replace filesystem-illegal characters and trim trailing dots/spaces
///
/// Falls back to `fallback` when the input (or the sanitized result) is
/// empty.
pub fn sanitize_filename(name: &str, fallback: &str) -> String {
    let candidate = if name.trim().is_empty() {
        fallback
    } else {
        name.trim()
    };
    let cleaned: String = candidate
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' | '\n' | '\r' | '\t' => '_',
            other => other,
        })
        .collect();
    let trimmed = cleaned.trim_end_matches(['.', ' ']).trim();
    if trimmed.is_empty() {
        fallback.to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Compute the export base name for an entry
///
/// Preference order: `name_archivetag`, `name_persistentid`,
/// `typename_persistentid`; the result is sanitized with the persistent id
/// as the fallback.
pub fn export_base_name(entry: &dyn EntryRef, index: usize) -> String {
    let name = normalize_export_name(&display_name(entry));
    let tag = archive_tag(entry);
    let pid = match entry.path_id() {
        0 => index as i64,
        id => id,
    };

    let base = if !name.is_empty() && !tag.is_empty() {
        format!("{name}_{tag}")
    } else if !name.is_empty() {
        format!("{name}_{pid}")
    } else {
        format!("{}_{pid}", normalize_export_name(&entry.type_name()))
    };

    sanitize_filename(&base, &pid.to_string())
}

/// Export extension for an entry of the given type
///
/// Text entries keep a recognized container suffix; everything else follows
/// the type table.
pub fn extension_for(entry: &dyn EntryRef, type_name: &str) -> String {
    if type_name == "TextAsset" {
        let name = probe_container(entry)
            .unwrap_or_else(|| format!("textasset_{}", entry.path_id()));
        let known = [".txt", ".bytes", ".json", ".lua"];
        if known.iter().any(|suffix| name.ends_with(suffix)) {
            return extract_extension(&name);
        }
        return "txt".to_owned();
    }
    match type_name {
        "Texture2D" => "png",
        "Mesh" => "obj",
        "MonoBehaviour" | "GameObject" | "AssetBundle" => "json",
        _ => "bin",
    }
    .to_owned()
}

/// MIME type for an entry of the given type
pub fn mime_for(type_name: &str) -> &'static str {
    match type_name {
        "TextAsset" => "text/plain",
        "Texture2D" => "image/png",
        "MonoBehaviour" | "GameObject" | "AssetBundle" => "application/json",
        _ => "application/octet-stream",
    }
}

fn extract_extension(name: &str) -> String {
    match name.rfind('.') {
        Some(dot) => name[dot + 1..].to_owned(),
        None => String::new(),
    }
}

/// Keep only keys that look like archive members, not filesystem paths
pub fn keep_archive_key(key: &str) -> bool {
    if key.is_empty() {
        return false;
    }
    // the internal archive scheme wins before the drive-colon check below
    if key.starts_with("archive:/") {
        return true;
    }
    // drop filesystem absolute paths
    if key.starts_with('/') || key.starts_with('\\') || key.contains(":/") || key.contains(":\\") {
        return false;
    }
    if key.starts_with("CAB-") {
        return true;
    }
    key.ends_with(".resS") || key.ends_with(".resource") || key.ends_with(".resources")
}

/// Discover archive names from both file maps, ordered and de-duplicated
pub fn archive_names(container: &dyn ContainerHandle) -> Vec<String> {
    let mut names = Vec::new();
    for key in container
        .file_names()
        .into_iter()
        .chain(container.stream_names())
    {
        if keep_archive_key(&key) && !names.contains(&key) {
            names.push(key);
        }
    }
    names
}
