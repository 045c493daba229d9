//! Configuration types for keepsake

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::KeepsakeError;
use crate::traits::KeepsakeResult;
use crate::types::SchemaVersion;

/// Serializable persistence settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistSettings {
    /// Base directory holding one sub-directory per state type
    pub persist_directory: PathBuf,

    /// Schema version snapshots are written under
    pub version: String,

    /// Emit persistence diagnostics
    pub debug: bool,

    /// Indent written JSON
    pub pretty_json: bool,
}

impl Default for PersistSettings {
    fn default() -> Self {
        Self {
            persist_directory: PathBuf::from("./data"),
            version: "1".to_string(),
            debug: false,
            pretty_json: false,
        }
    }
}

impl PersistSettings {
    pub fn new(persist_directory: impl Into<PathBuf>, version: &str) -> Self {
        Self {
            persist_directory: persist_directory.into(),
            version: version.to_string(),
            ..Default::default()
        }
    }

    /// Validated schema version
    pub fn schema_version(&self) -> KeepsakeResult<SchemaVersion> {
        SchemaVersion::new(self.version.clone())
    }

    /// Save to JSON string
    pub fn to_json(&self) -> KeepsakeResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| KeepsakeError::Config(e.to_string()))
    }

    /// Load from JSON
    pub fn from_json(json: &str) -> KeepsakeResult<Self> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| KeepsakeError::Config(e.to_string()))?;
        settings.schema_version()?;
        Ok(settings)
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> KeepsakeResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| KeepsakeError::io(path, e))?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let settings = PersistSettings::from_json(r#"{"version": "3"}"#).unwrap();
        assert_eq!(settings.version, "3");
        assert_eq!(settings.persist_directory, PathBuf::from("./data"));
        assert!(!settings.debug);
    }

    #[test]
    fn test_invalid_version_rejected() {
        assert!(PersistSettings::from_json(r#"{"version": ""}"#).is_err());
        assert!(PersistSettings::from_json("not json").is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut settings = PersistSettings::new("/tmp/keepsake", "2");
        settings.debug = true;
        let parsed = PersistSettings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(parsed, settings);
    }
}
