//! Runtime persistence configuration

use keepsake_core::{
    ErasedMigration, KeepsakeResult, PersistSettings, SchemaVersion, SnapshotCodec,
};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::codec::JsonCodec;
use crate::layout::StateLayout;

/// Migrations keyed by the schema version they migrate *from*
#[derive(Default)]
pub struct MigrationRegistry {
    entries: HashMap<SchemaVersion, Box<dyn ErasedMigration>>,
}

impl MigrationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a migration, replacing any previous one for the same version
    pub fn register(&mut self, from_version: SchemaVersion, migration: Box<dyn ErasedMigration>) {
        self.entries.insert(from_version, migration);
    }

    pub fn get(&self, from_version: &SchemaVersion) -> Option<&dyn ErasedMigration> {
        self.entries.get(from_version).map(|m| m.as_ref())
    }

    pub fn contains(&self, from_version: &SchemaVersion) -> bool {
        self.entries.contains_key(from_version)
    }

    /// Registered source versions, sorted
    pub fn versions(&self) -> Vec<&SchemaVersion> {
        let mut versions: Vec<_> = self.entries.keys().collect();
        versions.sort();
        versions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for MigrationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(v, m)| (v, m.target_type())))
            .finish()
    }
}

/// Persistence configuration shared by every store built from it
pub struct PersistConfig {
    layout: StateLayout,
    version: SchemaVersion,
    codec: Arc<dyn SnapshotCodec>,
    migrations: MigrationRegistry,
    debug: bool,
}

impl PersistConfig {
    pub fn new(persist_directory: impl Into<PathBuf>, version: SchemaVersion) -> Self {
        Self {
            layout: StateLayout::new(persist_directory),
            version,
            codec: Arc::new(JsonCodec::default()),
            migrations: MigrationRegistry::new(),
            debug: false,
        }
    }

    pub fn from_settings(settings: &PersistSettings) -> KeepsakeResult<Self> {
        let codec = JsonCodec {
            pretty: settings.pretty_json,
        };
        Ok(Self::new(settings.persist_directory.clone(), settings.schema_version()?)
            .codec(codec)
            .debug(settings.debug))
    }

    /// Replace the encoder/decoder pair
    pub fn codec(mut self, codec: impl SnapshotCodec + 'static) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    /// Register a migration from `from_version` to the configured version
    pub fn migration(
        mut self,
        from_version: SchemaVersion,
        migration: impl ErasedMigration + 'static,
    ) -> Self {
        self.migrations.register(from_version, Box::new(migration));
        self
    }

    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    pub fn persist_directory(&self) -> &Path {
        self.layout.base()
    }

    pub fn layout(&self) -> &StateLayout {
        &self.layout
    }

    /// Target schema version
    pub fn version(&self) -> &SchemaVersion {
        &self.version
    }

    pub fn snapshot_codec(&self) -> &dyn SnapshotCodec {
        self.codec.as_ref()
    }

    pub fn migrations(&self) -> &MigrationRegistry {
        &self.migrations
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub(crate) fn log_debug(&self, message: impl fmt::Display) {
        if self.debug {
            debug!("{}", message);
        }
    }

    pub(crate) fn log_info(&self, message: impl fmt::Display) {
        if self.debug {
            info!("{}", message);
        }
    }

    pub(crate) fn log_warn(&self, message: impl fmt::Display) {
        if self.debug {
            warn!("{}", message);
        }
    }
}

impl fmt::Debug for PersistConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistConfig")
            .field("persist_directory", &self.layout.base())
            .field("version", &self.version)
            .field("migrations", &self.migrations)
            .field("debug", &self.debug)
            .finish()
    }
}
