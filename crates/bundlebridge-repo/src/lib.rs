//! bundlebridge-repo - Session registry, dispatcher and repository facade
//!
//! This crate provides:
//! - [`SessionRegistry`] concurrent store of opened containers
//! - [`BundleBridge`] synchronous bridge core returning envelopes
//! - [`BundleRepository`] task-returning facade driven by the serialized worker
//! - [`extract`] / [`naming`] per-type strategies and name resolution
//! - [`AutosaveController`] debounced background saves
//! - [`RecentsStore`] recently-opened bundle list

mod autosave;
mod bridge;
pub mod extract;
pub mod naming;
mod recents;
mod registry;
mod repository;

#[cfg(test)]
pub(crate) mod testkit;

pub use autosave::{AutosaveController, DEFAULT_AUTOSAVE_DELAY};
pub use bridge::BundleBridge;
pub use recents::{MAX_RECENTS, RecentsStore};
pub use registry::{Session, SessionRegistry};
pub use repository::BundleRepository;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AutosaveController, BundleBridge, BundleRepository, RecentsStore, Session, SessionRegistry,
    };
}
