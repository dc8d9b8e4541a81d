//! Scriptable runtime double for unit tests
//!
//! Plays the role the real container runtime plays in production: entries
//! parse into field trees, mutations stick, and failures can be injected per
//! container.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use bundlebridge_core::BridgeError;
use bundlebridge_core::runtime::{
    AssetRuntime, ContainerHandle, EntryRef, RuntimeError, RuntimeResult,
};
use bundlebridge_task::{BridgeTask, Inline};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub struct StubEntry {
    pub type_name: String,
    pub path_id: i64,
    pub attrs: HashMap<String, Value>,
    pub object: Value,
    pub dict: Value,
    pub image: Vec<u8>,
    pub mesh: String,
    pub assets_file: Option<String>,
    pub stream_name: Option<String>,
    pub fail_parse: bool,
    pub save_count: usize,
}

impl StubEntry {
    pub fn new(type_name: &str, path_id: i64) -> Self {
        Self {
            type_name: type_name.to_owned(),
            path_id,
            attrs: HashMap::new(),
            object: json!({}),
            dict: json!({}),
            image: Vec::new(),
            mesh: String::new(),
            assets_file: None,
            stream_name: None,
            fail_parse: false,
            save_count: 0,
        }
    }

    pub fn text(path_id: i64, name: &str, script: &str) -> Self {
        let mut entry = Self::new("TextAsset", path_id);
        entry.object = json!({ "m_Name": name, "m_Script": script });
        entry
    }

    pub fn texture(path_id: i64, name: &str, png: &[u8]) -> Self {
        let mut entry = Self::new("Texture2D", path_id);
        entry.object = json!({ "m_Name": name });
        entry.image = png.to_vec();
        entry
    }

    pub fn script(path_id: i64, name: &str, dict: Value) -> Self {
        let mut entry = Self::new("MonoBehaviour", path_id);
        entry.object = json!({ "m_Name": name });
        entry.dict = dict;
        entry
    }

    pub fn mesh(path_id: i64, name: &str, obj_text: &str) -> Self {
        let mut entry = Self::new("Mesh", path_id);
        entry.object = json!({ "m_Name": name });
        entry.mesh = obj_text.to_owned();
        entry
    }

    pub fn with_attr(mut self, name: &str, value: Value) -> Self {
        self.attrs.insert(name.to_owned(), value);
        self
    }

    pub fn with_archive(mut self, assets_file: &str) -> Self {
        self.assets_file = Some(assets_file.to_owned());
        self
    }
}

impl EntryRef for StubEntry {
    fn type_name(&self) -> String {
        self.type_name.clone()
    }

    fn path_id(&self) -> i64 {
        self.path_id
    }

    fn attr(&self, name: &str) -> Option<Value> {
        self.attrs.get(name).cloned()
    }

    fn parse_as_object(&self) -> RuntimeResult<Value> {
        if self.fail_parse {
            return Err(RuntimeError::with_trace(
                "parse_as_object failed",
                "stub traceback",
            ));
        }
        Ok(self.object.clone())
    }

    fn parse_as_dict(&self) -> RuntimeResult<Value> {
        if self.fail_parse {
            return Err(RuntimeError::new("parse_as_dict failed"));
        }
        Ok(self.dict.clone())
    }

    fn set_field(&mut self, name: &str, value: Value) -> RuntimeResult<()> {
        if !self.object.is_object() {
            self.object = json!({});
        }
        self.object
            .as_object_mut()
            .expect("stub object is a map")
            .insert(name.to_owned(), value);
        Ok(())
    }

    fn save(&mut self) -> RuntimeResult<()> {
        self.save_count += 1;
        Ok(())
    }

    fn save_type_tree(&mut self, tree: &Value) -> RuntimeResult<()> {
        self.dict = tree.clone();
        self.save_count += 1;
        Ok(())
    }

    fn image_png(&self) -> RuntimeResult<Vec<u8>> {
        Ok(self.image.clone())
    }

    fn replace_image(&mut self, data: &[u8]) -> RuntimeResult<()> {
        if data.is_empty() {
            return Err(RuntimeError::new("cannot decode empty image"));
        }
        self.image = data.to_vec();
        Ok(())
    }

    fn mesh_text(&self) -> RuntimeResult<String> {
        Ok(self.mesh.clone())
    }

    fn assets_file_name(&self) -> Option<String> {
        self.assets_file.clone()
    }

    fn assets_stream_name(&self) -> Option<String> {
        self.stream_name.clone()
    }
}

#[derive(Clone)]
pub enum SaveBehavior {
    Bytes(Vec<u8>),
    Fail(String),
}

pub struct StubContainer {
    pub entries: Vec<StubEntry>,
    pub files: Vec<String>,
    pub streams: Vec<String>,
    pub save_behavior: SaveBehavior,
}

impl StubContainer {
    pub fn new(entries: Vec<StubEntry>) -> Self {
        Self {
            entries,
            files: Vec::new(),
            streams: Vec::new(),
            save_behavior: SaveBehavior::Bytes(b"SAVED-CONTAINER".to_vec()),
        }
    }
}

impl ContainerHandle for StubContainer {
    fn save(&mut self) -> RuntimeResult<Vec<u8>> {
        match &self.save_behavior {
            SaveBehavior::Bytes(bytes) => Ok(bytes.clone()),
            SaveBehavior::Fail(message) => Err(RuntimeError::new(message.clone())),
        }
    }

    fn entry_count(&self) -> usize {
        self.entries.len()
    }

    fn entry(&self, index: usize) -> Option<&dyn EntryRef> {
        self.entries.get(index).map(|e| e as &dyn EntryRef)
    }

    fn entry_mut(&mut self, index: usize) -> Option<&mut dyn EntryRef> {
        self.entries.get_mut(index).map(|e| e as &mut dyn EntryRef)
    }

    fn file_names(&self) -> Vec<String> {
        self.files.clone()
    }

    fn stream_names(&self) -> Vec<String> {
        self.streams.clone()
    }
}

type ContainerFactory = Box<dyn FnMut(&Path) -> RuntimeResult<StubContainer> + Send>;

/// Runtime double whose `load_container` is driven by a factory closure
pub struct StubRuntime {
    factory: ContainerFactory,
    pub keys: Arc<Mutex<Vec<String>>>,
}

impl StubRuntime {
    pub fn serving(mut factory: impl FnMut() -> StubContainer + Send + 'static) -> Self {
        Self {
            factory: Box::new(move |_| Ok(factory())),
            keys: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(message: &str) -> Self {
        let message = message.to_owned();
        Self {
            factory: Box::new(move |_| Err(RuntimeError::new(message.clone()))),
            keys: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl AssetRuntime for StubRuntime {
    fn load_container(&mut self, path: &Path) -> RuntimeResult<Box<dyn ContainerHandle>> {
        let container = (self.factory)(path)?;
        Ok(Box::new(container))
    }

    fn set_decryption_key(&mut self, key: &str) -> RuntimeResult<()> {
        self.keys.lock().push(key.to_owned());
        Ok(())
    }
}

/// Three-entry container used by the end-to-end scenarios:
/// index 0 `TextAsset`, index 1 `Texture2D`, index 2 `MonoBehaviour`
pub fn scenario_container() -> StubContainer {
    let mut container = StubContainer::new(vec![
        StubEntry::text(101, "readme", "hello world").with_attr("container", json!("assets/readme.txt")),
        StubEntry::texture(102, "icon", b"\x89PNG-fake"),
        StubEntry::script(103, "settings", json!({ "m_Name": "settings", "m_Enabled": 1 })),
    ]);
    container.files = vec!["CAB-5f2a".into(), "/abs/path/ignored".into()];
    container.streams = vec!["CAB-5f2a.resS".into(), "archive:/CAB-5f2a/CAB-5f2a.resS".into()];
    container
}

/// Block until a task completes, returning its terminal state
pub fn await_task<T: Send + Sync + 'static>(task: &BridgeTask<T>) -> Result<Arc<T>, BridgeError> {
    let (tx, rx) = std::sync::mpsc::channel();
    task.add_on_complete_listener_on(Arc::new(Inline), move |_| {
        let _ = tx.send(());
    });
    rx.recv_timeout(Duration::from_secs(2))
        .expect("task did not complete in time");
    match task.result() {
        Some(value) => Ok(value),
        None => Err(task.error().expect("terminal task carries an error")),
    }
}
