//! Session registry
//!
//! Concurrent map from opaque session id to session state. The registry is
//! the sole owner of session lifetime: a session is created by opening a
//! container and destroyed by closing it (or by being overwritten). Reads are
//! safe from any thread; the `dirty` flag is only ever written on the bridge
//! worker, which keeps the contained runtime handle single-writer.

use bundlebridge_core::runtime::ContainerHandle;
use bundlebridge_core::{BridgeError, BridgeResult};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// State of one opened container
pub struct Session {
    pub id: String,
    /// Owned handle into the container runtime
    pub container: Box<dyn ContainerHandle>,
    /// Set by any successful write operation, cleared by a successful save
    pub dirty: bool,
    /// Indices whose payload was replaced in this session; client-side
    /// bookkeeping only, never pushed back into the runtime
    pub modified: HashSet<usize>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("dirty", &self.dirty)
            .field("modified", &self.modified)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(id: impl Into<String>, container: Box<dyn ContainerHandle>) -> Self {
        Self {
            id: id.into(),
            container,
            dirty: false,
            modified: HashSet::new(),
        }
    }
}

/// Concurrent session store
///
/// Constructed and owned by the repository; there is deliberately no global
/// instance.
pub struct SessionRegistry {
    sessions: DashMap<String, Arc<Mutex<Session>>>,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Store a container under a fresh random id and return the id
    pub fn create(&self, container: Box<dyn ContainerHandle>) -> String {
        let id = new_session_id();
        self.sessions
            .insert(id.clone(), Arc::new(Mutex::new(Session::new(id.clone(), container))));
        id
    }

    /// Store a container under a caller-provided id, overwriting any holder
    pub fn put(&self, id: impl Into<String>, container: Box<dyn ContainerHandle>) {
        let id = id.into();
        self.sessions
            .insert(id.clone(), Arc::new(Mutex::new(Session::new(id, container))));
    }

    /// Get a session, or `None` if absent
    pub fn get(&self, id: &str) -> Option<Arc<Mutex<Session>>> {
        self.sessions.get(id).map(|r| r.clone())
    }

    /// Get a session, or a `NotFound` error if absent
    pub fn require(&self, id: &str) -> BridgeResult<Arc<Mutex<Session>>> {
        self.get(id)
            .ok_or_else(|| BridgeError::NotFound(format!("Session not found: {id}")))
    }

    /// True if a session exists under `id`
    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    /// Remove and return a session, or `None`
    pub fn remove(&self, id: &str) -> Option<Arc<Mutex<Session>>> {
        self.sessions.remove(id).map(|(_, v)| v)
    }

    /// Remove everything
    pub fn clear(&self) {
        self.sessions.clear();
    }

    /// Number of sessions currently stored
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Fresh random 128-bit id, hex-encoded
fn new_session_id() -> String {
    Uuid::new_v4().simple().to_string()
}
