//! Async repository facade
//!
//! Every public call constructs a closure capturing its arguments, submits
//! it to the serialized worker, and immediately returns a [`BridgeTask`]
//! resolved from the operation's eventual [`Envelope`]. Listener dispatch
//! uses the context the repository was built with.

use crate::bridge::BundleBridge;
use crate::registry::SessionRegistry;
use bundlebridge_core::runtime::AssetRuntime;
use bundlebridge_core::{BridgeResult, Envelope, ExportFileResult, ObjectData, ObjectInfo, OpenResult};
use bundlebridge_task::{BridgeTask, Dispatch, Inline, TaskSource};
use bundlebridge_worker::{BridgeWorker, WorkerConfig};
use std::path::PathBuf;
use std::sync::Arc;

pub struct BundleRepository {
    bridge: Arc<BundleBridge>,
    worker: Arc<BridgeWorker>,
    listener_ctx: Arc<dyn Dispatch>,
}

impl BundleRepository {
    /// Create a repository dispatching default listeners inline
    pub fn new(runtime: Box<dyn AssetRuntime>) -> BridgeResult<Self> {
        Self::with_context(runtime, Arc::new(Inline))
    }

    /// Create a repository dispatching default listeners on `listener_ctx`
    ///
    /// Pass the application's UI event loop here to get main-thread listener
    /// delivery without per-call ceremony.
    pub fn with_context(
        runtime: Box<dyn AssetRuntime>,
        listener_ctx: Arc<dyn Dispatch>,
    ) -> BridgeResult<Self> {
        let worker =
            BridgeWorker::new(WorkerConfig::new().with_thread_name("bundlebridge-repo"))?;
        Ok(Self {
            bridge: Arc::new(BundleBridge::new(runtime)),
            worker: Arc::new(worker),
            listener_ctx,
        })
    }

    /// The session registry owned by this repository
    pub fn registry(&self) -> Arc<SessionRegistry> {
        self.bridge.registry().clone()
    }

    pub fn open_bundle(&self, path: impl Into<PathBuf>) -> BridgeTask<OpenResult> {
        let path = path.into();
        self.run(move |bridge| bridge.open_bundle(&path))
    }

    pub fn close_bundle(&self, session_id: &str) -> BridgeTask<()> {
        let session_id = session_id.to_owned();
        self.run(move |bridge| bridge.close_bundle(&session_id))
    }

    pub fn save_bundle(&self, session_id: &str, out_path: impl Into<PathBuf>) -> BridgeTask<bool> {
        let session_id = session_id.to_owned();
        let out_path = out_path.into();
        self.run(move |bridge| bridge.save_bundle(&session_id, &out_path))
    }

    pub fn set_decryption_key(&self, key: &str) -> BridgeTask<()> {
        let key = key.to_owned();
        self.run(move |bridge| bridge.set_decryption_key(&key))
    }

    pub fn export_object(
        &self,
        session_id: &str,
        index: usize,
        dest: impl Into<PathBuf>,
    ) -> BridgeTask<ExportFileResult> {
        let session_id = session_id.to_owned();
        let dest = dest.into();
        self.run(move |bridge| bridge.export_object(&session_id, index, &dest))
    }

    pub fn import_object(
        &self,
        session_id: &str,
        index: usize,
        source: impl Into<PathBuf>,
    ) -> BridgeTask<()> {
        let session_id = session_id.to_owned();
        let source = source.into();
        self.run(move |bridge| bridge.import_object(&session_id, index, &source))
    }

    pub fn get_object_data(&self, session_id: &str, index: usize) -> BridgeTask<ObjectData> {
        let session_id = session_id.to_owned();
        self.run(move |bridge| bridge.get_object_data(&session_id, index))
    }

    pub fn set_object_data(
        &self,
        session_id: &str,
        index: usize,
        data: Vec<u8>,
    ) -> BridgeTask<()> {
        let session_id = session_id.to_owned();
        self.run(move |bridge| bridge.set_object_data(&session_id, index, &data))
    }

    pub fn get_object_info(&self, session_id: &str, index: usize) -> BridgeTask<ObjectInfo> {
        let session_id = session_id.to_owned();
        self.run(move |bridge| bridge.get_object_info(&session_id, index))
    }

    /// Close a session and reopen its backing file as a fresh session
    ///
    /// The reopen runs whether or not the close succeeded, mirroring how a
    /// viewer refreshes after an in-place save.
    pub fn reload_bundle(&self, session_id: &str, path: impl Into<PathBuf>) -> BridgeTask<OpenResult> {
        let path = path.into();
        let bridge = self.bridge.clone();
        let worker = self.worker.clone();
        let ctx = self.listener_ctx.clone();
        self.close_bundle(session_id).continue_with_task(move |_| {
            Ok(run_on(&bridge, &worker, &ctx, move |b| b.open_bundle(&path)))
        })
    }

    /// Stop accepting new work; queued operations are dropped
    pub fn shutdown(&self) {
        self.worker.stop();
    }

    fn run<T: Send + Sync + 'static>(
        &self,
        op: impl FnOnce(&BundleBridge) -> Envelope<T> + Send + 'static,
    ) -> BridgeTask<T> {
        run_on(&self.bridge, &self.worker, &self.listener_ctx, op)
    }
}

impl Drop for BundleRepository {
    fn drop(&mut self) {
        self.worker.stop();
    }
}

/// Submit one bridge operation and adapt its envelope into a task
fn run_on<T: Send + Sync + 'static>(
    bridge: &Arc<BundleBridge>,
    worker: &Arc<BridgeWorker>,
    listener_ctx: &Arc<dyn Dispatch>,
    op: impl FnOnce(&BundleBridge) -> Envelope<T> + Send + 'static,
) -> BridgeTask<T> {
    let source = TaskSource::with_context(listener_ctx.clone());
    let task = source.task();
    let rejecter = source.clone();
    let bridge = bridge.clone();

    if let Err(err) = worker.submit(move || match op(&bridge).into_result() {
        Ok(value) => source.set_result(value),
        Err(e) => source.set_error(e),
    }) {
        rejecter.set_error(err);
    }
    task
}
