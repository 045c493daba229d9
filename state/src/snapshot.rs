//! Snapshot file storage
//!
//! One JSON snapshot per `(state id, schema version)`. Writes overwrite the
//! target file in place; a crash mid-write can leave a truncated snapshot,
//! which later loads as "no data".

use keepsake_core::{KeepsakeError, KeepsakeResult, SchemaVersion, StateId};
use serde::{de::DeserializeOwned, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::config::PersistConfig;

/// Reads and writes state snapshots under a [`PersistConfig`]
#[derive(Debug, Clone, Copy)]
pub struct StateStore<'a> {
    config: &'a PersistConfig,
}

impl<'a> StateStore<'a> {
    pub fn new(config: &'a PersistConfig) -> Self {
        Self { config }
    }

    pub fn snapshot_path(&self, id: &StateId, version: &SchemaVersion) -> PathBuf {
        self.config.layout().snapshot_path(id, version)
    }

    /// Check whether a snapshot file is present
    pub fn exists(&self, id: &StateId, version: &SchemaVersion) -> bool {
        self.snapshot_path(id, version).is_file()
    }

    /// Load a snapshot, `Ok(None)` when no file exists
    pub fn try_load<S: DeserializeOwned>(
        &self,
        id: &StateId,
        version: &SchemaVersion,
    ) -> KeepsakeResult<Option<S>> {
        let path = self.snapshot_path(id, version);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(KeepsakeError::io(path, e)),
        };

        let value = self.config.snapshot_codec().decode(&path, &bytes)?;
        let state = serde_json::from_value(value).map_err(|e| KeepsakeError::decode(&path, e))?;
        Ok(Some(state))
    }

    /// Load a snapshot; read and decode failures are logged and reported as `None`
    pub fn load<S: DeserializeOwned>(&self, id: &StateId, version: &SchemaVersion) -> Option<S> {
        match self.try_load(id, version) {
            Ok(Some(state)) => Some(state),
            Ok(None) => {
                self.config.log_info(format!(
                    "Persisted data not found at {}",
                    self.snapshot_path(id, version).display()
                ));
                None
            }
            Err(e) => {
                self.config.log_warn(format!("Failed to restore {}: {}", id, e));
                None
            }
        }
    }

    /// Encode and write a snapshot, creating the version directory if needed
    pub fn try_save<S: Serialize>(
        &self,
        id: &StateId,
        version: &SchemaVersion,
        state: &S,
    ) -> KeepsakeResult<()> {
        let value = serde_json::to_value(state)?;
        let bytes = self.config.snapshot_codec().encode(&value)?;

        let dir = self.config.layout().version_dir(id, version);
        std::fs::create_dir_all(&dir).map_err(|e| KeepsakeError::io(&dir, e))?;

        let path = self.snapshot_path(id, version);
        std::fs::write(&path, bytes).map_err(|e| KeepsakeError::io(path, e))
    }

    /// Write a snapshot; failures are logged and swallowed
    pub fn save<S: Serialize>(&self, id: &StateId, version: &SchemaVersion, state: &S) {
        match self.try_save(id, version, state) {
            Ok(()) => self
                .config
                .log_debug(format!("State {} saved under version {}", id, version)),
            Err(e) => self.config.log_warn(format!("Failed to save {}: {}", id, e)),
        }
    }
}
