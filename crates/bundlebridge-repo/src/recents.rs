//! Recently-opened bundle list
//!
//! A small JSON-file-backed store: at most [`MAX_RECENTS`] entries, newest
//! first, plus a "last open" slot. Entries whose backing file has vanished
//! are purged on read.

use bundlebridge_core::{BridgeResult, RecentBundle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Upper bound on remembered bundles
pub const MAX_RECENTS: usize = 15;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    recents: Vec<RecentBundle>,
    #[serde(default)]
    last_path: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
}

pub struct RecentsStore {
    path: PathBuf,
}

impl RecentsStore {
    /// Open a store backed by the given JSON file (created lazily)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Remember the currently open bundle
    pub fn set_last_open(&self, path: Option<&str>, display_name: Option<&str>) -> BridgeResult<()> {
        let mut file = self.load();
        file.last_path = path.map(str::to_owned);
        file.last_name = display_name.map(str::to_owned);
        self.store(&file)
    }

    pub fn last_path(&self) -> Option<String> {
        self.load().last_path
    }

    pub fn last_name(&self) -> Option<String> {
        self.load().last_name
    }

    pub fn clear_last(&self) -> BridgeResult<()> {
        self.set_last_open(None, None)
    }

    /// Insert or refresh a recent entry, newest first, bounded
    pub fn upsert(&self, path: &str, display_name: &str) -> BridgeResult<()> {
        let mut file = self.load();
        purge_missing(&mut file.recents);
        file.recents.retain(|r| r.path != path);
        file.recents.insert(
            0,
            RecentBundle {
                path: path.to_owned(),
                display_name: display_name.to_owned(),
                last_opened: now_ms(),
            },
        );
        file.recents.truncate(MAX_RECENTS);
        self.store(&file)
    }

    /// Current recents, purging entries whose file no longer exists
    pub fn recents(&self) -> Vec<RecentBundle> {
        let mut file = self.load();
        if purge_missing(&mut file.recents) {
            let _ = self.store(&file);
        }
        file.recents
    }

    /// Forget one path; clears the last-open slot when it matches
    pub fn remove(&self, path: &str) -> BridgeResult<()> {
        let mut file = self.load();
        file.recents.retain(|r| r.path != path);
        if file.last_path.as_deref() == Some(path) {
            file.last_path = None;
            file.last_name = None;
        }
        self.store(&file)
    }

    /// Forget everything, deleting the cached bundle copies on disk
    pub fn clear(&self) -> BridgeResult<()> {
        let mut file = self.load();
        for recent in &file.recents {
            let _ = fs::remove_file(&recent.path);
        }
        file.recents.clear();
        file.last_path = None;
        file.last_name = None;
        self.store(&file)
    }

    fn load(&self) -> StoreFile {
        let Ok(bytes) = fs::read(&self.path) else {
            return StoreFile::default();
        };
        serde_json::from_slice(&bytes).unwrap_or_default()
    }

    fn store(&self, file: &StoreFile) -> BridgeResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(file)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

fn purge_missing(recents: &mut Vec<RecentBundle>) -> bool {
    let before = recents.len();
    recents.retain(|r| Path::new(&r.path).exists());
    recents.len() != before
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "recents/recents_tests.rs"]
mod recents_tests;
