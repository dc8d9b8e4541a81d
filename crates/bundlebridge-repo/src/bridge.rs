//! Synchronous bridge core
//!
//! Owns the container runtime and the session registry, and exposes every
//! bundle operation as a plain call returning an [`Envelope`]. All calls are
//! expected to arrive on the serialized worker; the repository is the layer
//! that handles threading. Local errors (missing file, bad index) are
//! detected before any runtime mutation, so a failed call never leaves a
//! session half-modified.

use crate::registry::SessionRegistry;
use crate::{extract, naming};
use bundlebridge_core::runtime::AssetRuntime;
use bundlebridge_core::{
    BridgeError, BridgeResult, Envelope, ExportFileResult, ObjectData, ObjectInfo, ObjectItem,
    OpenResult,
};
use parking_lot::Mutex;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Placeholder shown for entries whose parsed object carries no name
const UNNAMED_ASSET: &str = "Unnamed asset";

pub struct BundleBridge {
    runtime: Mutex<Box<dyn AssetRuntime>>,
    registry: Arc<SessionRegistry>,
}

impl BundleBridge {
    /// Create a bridge owning a fresh registry
    pub fn new(runtime: Box<dyn AssetRuntime>) -> Self {
        Self::with_registry(runtime, Arc::new(SessionRegistry::new()))
    }

    /// Create a bridge sharing an existing registry
    pub fn with_registry(runtime: Box<dyn AssetRuntime>, registry: Arc<SessionRegistry>) -> Self {
        Self {
            runtime: Mutex::new(runtime),
            registry,
        }
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Open a container and register a session for it
    pub fn open_bundle(&self, path: &Path) -> Envelope<OpenResult> {
        Envelope::catch(|| {
            if !path.exists() {
                return Err(BridgeError::NotFound(format!(
                    "Input not found: {}",
                    path.display()
                )));
            }

            let container = self.runtime.lock().load_container(path)?;

            let archives = naming::archive_names(container.as_ref());
            let count = container.entry_count();
            let mut entries = Vec::with_capacity(count);
            let mut type_names: Vec<String> = Vec::new();

            for index in 0..count {
                let Some(entry) = container.entry(index) else {
                    continue;
                };
                let type_name = entry.type_name();
                let name = naming::display_name(entry);

                entries.push(ObjectItem {
                    index,
                    path_id: entry.path_id(),
                    type_name: type_name.clone(),
                    name: if name.is_empty() {
                        UNNAMED_ASSET.to_owned()
                    } else {
                        name
                    },
                    byte_size: naming::probe_size(entry),
                    container: naming::probe_container(entry),
                    modified: false,
                });

                let trimmed = type_name.trim();
                if !trimmed.is_empty() && !type_names.iter().any(|t| t == trimmed) {
                    type_names.push(trimmed.to_owned());
                }
            }

            let session_id = self.registry.create(container);
            tracing::info!(
                %session_id,
                entries = entries.len(),
                archives = archives.len(),
                "opened bundle {}",
                path.display()
            );

            Ok(OpenResult {
                session_id,
                archives,
                entries,
                type_names,
            })
        })
    }

    /// Close a session, releasing its container
    pub fn close_bundle(&self, session_id: &str) -> Envelope<()> {
        Envelope::catch(|| {
            if session_id.is_empty() {
                return Err(BridgeError::InvalidInput("Invalid session id".into()));
            }
            if self.registry.remove(session_id).is_some() {
                tracing::debug!(session_id, "closed bundle");
            }
            Ok(())
        })
    }

    /// Serialize the container and atomically replace `out_path`
    ///
    /// The destination is only touched after the temp file is fully written;
    /// on any failure the previous destination content stays intact.
    pub fn save_bundle(&self, session_id: &str, out_path: &Path) -> Envelope<bool> {
        Envelope::catch(|| {
            let session = self.registry.require(session_id)?;
            let mut session = session.lock();

            let bytes = session.container.save()?;

            if let Some(parent) = out_path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            let tmp = temp_sibling(out_path);
            fs::write(&tmp, &bytes)?;
            if let Err(err) = fs::rename(&tmp, out_path) {
                let _ = fs::remove_file(&tmp);
                return Err(err.into());
            }

            session.dirty = false;
            tracing::info!(session_id, bytes = bytes.len(), "saved bundle to {}", out_path.display());
            Ok(true)
        })
    }

    /// Configure the runtime's bundle decryption key
    pub fn set_decryption_key(&self, key: &str) -> Envelope<()> {
        Envelope::catch(|| {
            self.runtime.lock().set_decryption_key(key)?;
            Ok(())
        })
    }

    /// Extract one entry and write it to `dest`
    pub fn export_object(&self, session_id: &str, index: usize, dest: &Path) -> Envelope<ExportFileResult> {
        Envelope::catch(|| {
            let session = self.registry.require(session_id)?;
            let session = session.lock();
            let entry = require_entry(&*session, index)?;

            let type_name = entry.type_name();
            let data = extract::extract(entry)?;
            if data.is_empty() {
                return Err(BridgeError::Unsupported(format!(
                    "export_object not supported for type: {type_name}"
                )));
            }

            if let Some(parent) = dest.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            fs::write(dest, &data)?;
            tracing::debug!(session_id, index, %type_name, "exported entry");

            Ok(ExportFileResult { index, type_name })
        })
    }

    /// Read `source` and apply it onto one entry
    pub fn import_object(&self, session_id: &str, index: usize, source: &Path) -> Envelope<()> {
        Envelope::catch(|| {
            let session = self.registry.require(session_id)?;
            let mut session = session.lock();
            // validate the index before any I/O or mutation
            require_entry(&*session, index)?;

            let data = fs::read(source)?;
            self.apply_entry(&mut session, index, &data)
        })
    }

    /// Apply an in-memory payload onto one entry
    pub fn set_object_data(&self, session_id: &str, index: usize, data: &[u8]) -> Envelope<()> {
        Envelope::catch(|| {
            let session = self.registry.require(session_id)?;
            let mut session = session.lock();
            require_entry(&*session, index)?;

            self.apply_entry(&mut session, index, data)
        })
    }

    /// Extract one entry into an in-memory snapshot
    pub fn get_object_data(&self, session_id: &str, index: usize) -> Envelope<ObjectData> {
        Envelope::catch(|| {
            let session = self.registry.require(session_id)?;
            let session = session.lock();
            let entry = require_entry(&*session, index)?;

            Ok(ObjectData {
                session_id: session_id.to_owned(),
                index,
                path_id: entry.path_id(),
                name: naming::display_name(entry),
                type_name: entry.type_name(),
                data: extract::extract(entry)?,
            })
        })
    }

    /// Resolve export metadata (filename, extension, MIME) for one entry
    pub fn get_object_info(&self, session_id: &str, index: usize) -> Envelope<ObjectInfo> {
        Envelope::catch(|| {
            let session = self.registry.require(session_id)?;
            let session = session.lock();
            let entry = require_entry(&*session, index)?;

            let type_name = entry.type_name();
            Ok(ObjectInfo {
                filename: naming::export_base_name(entry, index),
                extension: naming::extension_for(entry, &type_name),
                mime: naming::mime_for(&type_name).to_owned(),
                type_name,
            })
        })
    }

    fn apply_entry(
        &self,
        session: &mut crate::registry::Session,
        index: usize,
        data: &[u8],
    ) -> BridgeResult<()> {
        let count = session.container.entry_count();
        let entry = session
            .container
            .entry_mut(index)
            .ok_or_else(|| index_error(index, count))?;
        extract::apply(entry, data)?;
        session.dirty = true;
        session.modified.insert(index);
        tracing::debug!(index, "entry payload replaced");
        Ok(())
    }
}

fn require_entry(
    session: &crate::registry::Session,
    index: usize,
) -> BridgeResult<&dyn bundlebridge_core::runtime::EntryRef> {
    let count = session.container.entry_count();
    session
        .container
        .entry(index)
        .ok_or_else(|| index_error(index, count))
}

fn index_error(index: usize, count: usize) -> BridgeError {
    BridgeError::NotFound(format!("Index out of range: {index} / {count}"))
}

fn temp_sibling(path: &Path) -> std::path::PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bundle".to_owned());
    name.push_str(".tmp");
    path.with_file_name(name)
}
