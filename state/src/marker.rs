//! Per-state schema version marker (`version.json`)

use keepsake_core::{KeepsakeError, KeepsakeResult, SchemaVersion, StateId, VersionInfo};
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::config::PersistConfig;

/// Records the last schema version a state type was settled on
#[derive(Debug, Clone, Copy)]
pub struct VersionMarker<'a> {
    config: &'a PersistConfig,
}

impl<'a> VersionMarker<'a> {
    pub fn new(config: &'a PersistConfig) -> Self {
        Self { config }
    }

    pub fn path(&self, id: &StateId) -> PathBuf {
        self.config.layout().marker_path(id)
    }

    pub fn try_get(&self, id: &StateId) -> KeepsakeResult<Option<SchemaVersion>> {
        let path = self.path(id);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(KeepsakeError::io(path, e)),
        };

        let value = self.config.snapshot_codec().decode(&path, &bytes)?;
        let info: VersionInfo =
            serde_json::from_value(value).map_err(|e| KeepsakeError::decode(&path, e))?;
        Ok(Some(info.current))
    }

    /// Current marker, `None` when missing or unreadable
    pub fn get(&self, id: &StateId) -> Option<SchemaVersion> {
        match self.try_get(id) {
            Ok(Some(version)) => Some(version),
            Ok(None) => {
                self.config.log_info(format!("Versioning file not found for {}", id));
                None
            }
            Err(e) => {
                self.config.log_warn(e);
                None
            }
        }
    }

    /// Overwrite the marker with `{ "current": version }`
    pub fn try_set(&self, id: &StateId, version: &SchemaVersion) -> KeepsakeResult<()> {
        let value = serde_json::to_value(VersionInfo::new(version.clone()))?;
        let bytes = self.config.snapshot_codec().encode(&value)?;

        let dir = self.config.layout().state_dir(id);
        std::fs::create_dir_all(&dir).map_err(|e| KeepsakeError::io(&dir, e))?;

        let path = self.path(id);
        std::fs::write(&path, bytes).map_err(|e| KeepsakeError::io(path, e))
    }

    pub fn set(&self, id: &StateId, version: &SchemaVersion) {
        if let Err(e) = self.try_set(id, version) {
            self.config.log_warn(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_marker_set_get() {
        let tmp = TempDir::new().unwrap();
        let config = PersistConfig::new(tmp.path(), SchemaVersion::new("2").unwrap());
        let marker = VersionMarker::new(&config);
        let id = StateId::new("AppState").unwrap();

        assert_eq!(marker.get(&id), None);

        marker.set(&id, &SchemaVersion::new("1").unwrap());
        marker.set(&id, &SchemaVersion::new("2").unwrap());
        assert_eq!(marker.get(&id), Some(SchemaVersion::new("2").unwrap()));

        let raw = std::fs::read_to_string(marker.path(&id)).unwrap();
        assert_eq!(raw, r#"{"current":"2"}"#);
    }

    #[test]
    fn test_unreadable_marker_is_none() {
        let tmp = TempDir::new().unwrap();
        let config = PersistConfig::new(tmp.path(), SchemaVersion::new("1").unwrap());
        let marker = VersionMarker::new(&config);
        let id = StateId::new("AppState").unwrap();

        std::fs::create_dir_all(tmp.path().join("AppState")).unwrap();
        std::fs::write(marker.path(&id), b"{\"current\": 7}").unwrap();

        assert!(matches!(marker.try_get(&id), Err(KeepsakeError::Decode { .. })));
        assert_eq!(marker.get(&id), None);
    }
}
