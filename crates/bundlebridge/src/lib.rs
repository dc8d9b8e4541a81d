//! # bundlebridge
//!
//! A bridge layer for opening packaged binary asset containers, browsing
//! their entries, and exporting/importing/editing individual entries.
//!
//! Container parsing and codecs belong to an embedded runtime behind the
//! [`runtime`](bundlebridge_core::runtime) traits; bundlebridge contributes
//! the concurrency layer around it:
//! - a session registry tracking open containers
//! - a single-assignment task/promise primitive with context-bound listeners
//! - a serialized worker giving the (non-thread-safe) runtime exactly one
//!   caller at a time, in FIFO order
//! - a closed error taxonomy that no runtime fault escapes
//!
//! ## Quick Start
//!
//! ```ignore
//! use bundlebridge::prelude::*;
//!
//! let runtime: Box<dyn AssetRuntime> = my_runtime();
//! let repo = BundleRepository::new(runtime)?;
//!
//! repo.open_bundle("/data/sample.bundle")
//!     .add_on_success_listener(|opened| {
//!         for entry in &opened.entries {
//!             println!("{} {} ({})", entry.index, entry.name, entry.type_name);
//!         }
//!     })
//!     .add_on_failure_listener(|err| eprintln!("open failed: {err}"));
//! ```
//!
//! Operations queue on the repository's worker and complete in submission
//! order; every call returns a [`BridgeTask`](bundlebridge_task::BridgeTask)
//! immediately.

pub use bundlebridge_core::runtime;
pub use bundlebridge_core::{
    BridgeError, BridgeResult, Envelope, ExportFileResult, ObjectData, ObjectInfo, ObjectItem,
    OpenResult, RecentBundle, SupportedType,
};
pub use bundlebridge_repo::{
    AutosaveController, BundleBridge, BundleRepository, DEFAULT_AUTOSAVE_DELAY, MAX_RECENTS,
    RecentsStore, Session, SessionRegistry, extract, naming,
};
pub use bundlebridge_task::{BridgeTask, Dispatch, EventLoop, Inline, TaskSource};
pub use bundlebridge_worker::{BridgeWorker, ShutdownHandle, ShutdownSignal, WorkerConfig};

/// Prelude module for convenient imports
pub mod prelude {
    pub use bundlebridge_core::prelude::*;
    pub use bundlebridge_repo::prelude::*;
    pub use bundlebridge_task::prelude::*;
    pub use bundlebridge_worker::prelude::*;
}
