//! On-disk layout of persisted state

use keepsake_core::{SchemaVersion, StateId};
use std::path::{Path, PathBuf};

/// Name of the per-state version marker file
pub const VERSION_FILE: &str = "version.json";

/// Path derivation rooted at the configured persist directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateLayout {
    base: PathBuf,
}

impl StateLayout {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// `{base}/{id}`
    pub fn state_dir(&self, id: &StateId) -> PathBuf {
        self.base.join(id.as_str())
    }

    /// `{base}/{id}/{version}`
    pub fn version_dir(&self, id: &StateId, version: &SchemaVersion) -> PathBuf {
        self.state_dir(id).join(version.as_str())
    }

    /// `{base}/{id}/{version}/{id}.json`
    pub fn snapshot_path(&self, id: &StateId, version: &SchemaVersion) -> PathBuf {
        self.version_dir(id, version).join(id.file_name())
    }

    /// `{base}/{id}/version.json`
    pub fn marker_path(&self, id: &StateId) -> PathBuf {
        self.state_dir(id).join(VERSION_FILE)
    }
}
