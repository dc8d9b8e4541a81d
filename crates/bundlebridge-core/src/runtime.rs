//! Capability surface of the embedded container runtime
//!
//! The runtime that actually parses container layouts, type trees and codecs
//! is an external collaborator. The bridge only ever talks to it through
//! these traits, and only ever from the serialized worker thread — none of
//! the implementations are required to be `Sync`.
//!
//! Field trees are exchanged as [`serde_json::Value`]: the runtime parses an
//! entry into a tree, the bridge round-trips the tree through JSON text.

use serde_json::Value;
use std::path::Path;
use thiserror::Error;

/// Result type alias for calls into the runtime
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Fault raised by the runtime collaborator
///
/// Converted to [`crate::BridgeError::RuntimeFault`] at the bridge boundary.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct RuntimeError {
    pub message: String,
    /// Runtime-side diagnostic trace, when available
    pub trace: Option<String>,
}

impl RuntimeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace: None,
        }
    }

    pub fn with_trace(message: impl Into<String>, trace: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace: Some(trace.into()),
        }
    }
}

impl From<RuntimeError> for crate::BridgeError {
    fn from(err: RuntimeError) -> Self {
        crate::BridgeError::RuntimeFault {
            message: err.message,
            trace: err.trace,
        }
    }
}

/// Entry point into the container runtime
pub trait AssetRuntime: Send {
    /// Open a container from a local path
    fn load_container(&mut self, path: &Path) -> RuntimeResult<Box<dyn ContainerHandle>>;

    /// Set the process-wide bundle decryption key
    fn set_decryption_key(&mut self, key: &str) -> RuntimeResult<()>;
}

/// An opened container owned by exactly one session
pub trait ContainerHandle: Send {
    /// Serialize the whole container back to bytes
    fn save(&mut self) -> RuntimeResult<Vec<u8>>;

    fn entry_count(&self) -> usize;

    fn entry(&self, index: usize) -> Option<&dyn EntryRef>;

    fn entry_mut(&mut self, index: usize) -> Option<&mut dyn EntryRef>;

    /// Keys of the top-level file map
    fn file_names(&self) -> Vec<String>;

    /// Keys of the underlying multi-file container's file map
    fn stream_names(&self) -> Vec<String>;
}

/// One entry inside an opened container
///
/// The attribute schema varies by asset version, so optional metadata is
/// exposed through [`EntryRef::attr`] and probed by name; see the probe
/// tables in the repository crate.
pub trait EntryRef: Send {
    fn type_name(&self) -> String;

    fn path_id(&self) -> i64;

    /// Probe an optional attribute by name
    fn attr(&self, name: &str) -> Option<Value>;

    /// Parse the entry into its typed object form
    fn parse_as_object(&self) -> RuntimeResult<Value>;

    /// Parse the entry into its full field-tree (dict) form
    fn parse_as_dict(&self) -> RuntimeResult<Value>;

    /// Replace a single field of the parsed object
    fn set_field(&mut self, name: &str, value: Value) -> RuntimeResult<()>;

    /// Persist pending field mutations back into the container
    fn save(&mut self) -> RuntimeResult<()>;

    /// Apply a full field tree back onto the entry
    fn save_type_tree(&mut self, tree: &Value) -> RuntimeResult<()>;

    /// Re-encode the entry's image as PNG (texture entries)
    fn image_png(&self) -> RuntimeResult<Vec<u8>> {
        Err(RuntimeError::new(format!(
            "image export not available for {}",
            self.type_name()
        )))
    }

    /// Decode `data` as an image and replace the entry's image (texture entries)
    fn replace_image(&mut self, _data: &[u8]) -> RuntimeResult<()> {
        Err(RuntimeError::new(format!(
            "image import not available for {}",
            self.type_name()
        )))
    }

    /// Export the entry as interchange mesh text (mesh entries)
    fn mesh_text(&self) -> RuntimeResult<String> {
        Err(RuntimeError::new(format!(
            "mesh export not available for {}",
            self.type_name()
        )))
    }

    /// Declared name of the owning assets file
    fn assets_file_name(&self) -> Option<String> {
        None
    }

    /// Name of the owning file's underlying stream
    fn assets_stream_name(&self) -> Option<String> {
        None
    }
}
