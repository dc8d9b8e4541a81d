//! Data model shared across the bridge layers
//!
//! Wire names (`idx`, `id`, `type`, ...) match the container listing format
//! the original tooling ecosystem exchanges, so exported JSON stays
//! interoperable.

use serde::{Deserialize, Serialize};

/// One entry of an opened container, immutable per snapshot
///
/// Identity is `index` (0-based, stable within one open session).
/// `modified` is the only field mutated client-side after creation; it is
/// never pushed back into the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectItem {
    #[serde(rename = "idx")]
    pub index: usize,

    /// Persistent id assigned by the container format
    #[serde(rename = "id")]
    pub path_id: i64,

    #[serde(rename = "type")]
    pub type_name: String,

    pub name: String,

    /// Uncompressed size, when the runtime's schema exposes one
    #[serde(rename = "bytes")]
    pub byte_size: Option<u64>,

    /// Container path, when the entry is addressable inside the bundle
    pub container: Option<String>,

    #[serde(default)]
    pub modified: bool,
}

/// Point-in-time extraction result for one entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectData {
    #[serde(rename = "session_id")]
    pub session_id: String,

    #[serde(rename = "idx")]
    pub index: usize,

    #[serde(rename = "id")]
    pub path_id: i64,

    pub name: String,

    #[serde(rename = "type")]
    pub type_name: String,

    pub data: Vec<u8>,
}

/// Result of opening a container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenResult {
    pub session_id: String,
    /// Recognized archive names, insertion-ordered, de-duplicated
    pub archives: Vec<String>,
    pub entries: Vec<ObjectItem>,
    /// Distinct entry type names, insertion-ordered
    pub type_names: Vec<String>,
}

/// Export metadata for one entry: suggested filename, extension and MIME type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    #[serde(rename = "type")]
    pub type_name: String,
    pub filename: String,
    #[serde(rename = "ext")]
    pub extension: String,
    pub mime: String,
}

/// Outcome of exporting one entry to a destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFileResult {
    #[serde(rename = "idx")]
    pub index: usize,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// One remembered bundle in the recents list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentBundle {
    pub path: String,
    pub display_name: String,
    /// Milliseconds since the unix epoch
    pub last_opened: u64,
}
