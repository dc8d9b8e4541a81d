//! bundlebridge-core - Shared types for the container bridge
//!
//! This crate provides the foundational types for the bridge layers:
//! - [`BridgeError`] closed error taxonomy and [`Envelope`] result protocol
//! - [`ObjectItem`] / [`ObjectData`] / [`OpenResult`] data model
//! - [`SupportedType`] capability table
//! - [`runtime`] capability traits for the embedded container runtime

mod envelope;
mod error;
mod model;
pub mod runtime;
mod types;

pub use envelope::Envelope;
pub use error::{BridgeError, BridgeResult};
pub use model::{ExportFileResult, ObjectData, ObjectInfo, ObjectItem, OpenResult, RecentBundle};
pub use types::SupportedType;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::runtime::{AssetRuntime, ContainerHandle, EntryRef, RuntimeError, RuntimeResult};
    pub use crate::{
        BridgeError, BridgeResult, Envelope, ExportFileResult, ObjectData, ObjectInfo, ObjectItem,
        OpenResult, RecentBundle, SupportedType,
    };
}
