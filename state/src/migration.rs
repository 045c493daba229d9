//! Schema migration between snapshot versions
//!
//! The version marker is advanced to the target version before any
//! migration work runs. A migration that fails afterwards is not retried on
//! the next start; the store falls back to its initial state instead.

use keepsake_core::{KeepsakeError, KeepsakeResult, PersistState, SchemaVersion, StateId};
use std::fmt;

use crate::config::PersistConfig;
use crate::marker::VersionMarker;
use crate::snapshot::StateStore;

/// What a migration run ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// No previous version was recorded, only the marker was written
    Fresh,
    /// A registered migration produced and saved the new state
    Migrated,
    /// A registered migration failed; the new snapshot was left absent
    Failed(String),
    /// No migration registered, the old snapshot was copied verbatim
    Copied,
    /// No migration registered and a new-version snapshot already exists
    DestinationExists,
}

impl fmt::Display for MigrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationOutcome::Fresh => write!(f, "no previous version"),
            MigrationOutcome::Migrated => write!(f, "migrated"),
            MigrationOutcome::Failed(reason) => write!(f, "migration failed: {}", reason),
            MigrationOutcome::Copied => write!(f, "copied previous snapshot"),
            MigrationOutcome::DestinationExists => write!(f, "destination exists, skipped"),
        }
    }
}

/// Moves a state type from its recorded version to the configured one
#[derive(Debug, Clone, Copy)]
pub struct Migrator<'a> {
    config: &'a PersistConfig,
}

impl<'a> Migrator<'a> {
    pub fn new(config: &'a PersistConfig) -> Self {
        Self { config }
    }

    /// Run the migration sequence for `S`, reporting disk failures
    pub fn try_run<S: PersistState>(
        &self,
        id: &StateId,
        old_version: Option<&SchemaVersion>,
    ) -> KeepsakeResult<MigrationOutcome> {
        let config = self.config;
        let target = config.version();
        let layout = config.layout();
        config.log_debug(format!("Migration of {} to version {} started", id, target));

        let target_dir = layout.version_dir(id, target);
        if target_dir.is_dir() {
            config.log_info(format!(
                "Migration will reuse existing directory '{}' for the new version",
                target
            ));
        }
        std::fs::create_dir_all(&target_dir).map_err(|e| KeepsakeError::io(&target_dir, e))?;

        VersionMarker::new(config).try_set(id, target)?;
        config.log_debug(format!("Version {} settled for {}", target, id));

        let Some(old_version) = old_version else {
            config.log_debug("No previous version found");
            return Ok(MigrationOutcome::Fresh);
        };

        let old_path = layout.snapshot_path(id, old_version);
        let new_path = layout.snapshot_path(id, target);
        config.log_debug(format!("Looking for old snapshot at {}", old_path.display()));

        if let Some(migration) = config.migrations().get(old_version) {
            config.log_debug(format!("Running migration registered for {}", old_version));
            let migrated = migration.migrate_erased(&old_path).and_then(|state| {
                state.downcast::<S>().map_err(|_| KeepsakeError::MigrationTypeMismatch {
                    from_version: old_version.to_string(),
                    expected: std::any::type_name::<S>(),
                })
            });

            return match migrated {
                Ok(state) => match StateStore::new(config).try_save(id, target, &*state) {
                    Ok(()) => Ok(MigrationOutcome::Migrated),
                    Err(e) => Ok(MigrationOutcome::Failed(e.to_string())),
                },
                Err(e) => Ok(MigrationOutcome::Failed(e.to_string())),
            };
        }

        if new_path.exists() {
            config.log_debug(format!(
                "Snapshot exists at {}, copy skipped",
                new_path.display()
            ));
            return Ok(MigrationOutcome::DestinationExists);
        }

        if !old_path.is_file() {
            return Err(KeepsakeError::MissingSnapshot(old_path));
        }

        std::fs::copy(&old_path, &new_path).map_err(|e| KeepsakeError::io(&new_path, e))?;
        Ok(MigrationOutcome::Copied)
    }

    /// Run the migration sequence, logging instead of failing
    pub fn run<S: PersistState>(&self, id: &StateId, old_version: Option<&SchemaVersion>) {
        match self.try_run::<S>(id, old_version) {
            Ok(MigrationOutcome::Failed(reason)) => {
                self.config
                    .log_warn(format!("Migration of {} failed: {}", id, reason));
            }
            Ok(outcome) => {
                self.config
                    .log_info(format!("Migration of {} finished: {}", id, outcome));
            }
            Err(e) if e.is_not_found() => self
                .config
                .log_info(format!("Nothing to migrate for {}: {}", id, e)),
            Err(e) => self.config.log_warn(format!("Migration of {} aborted: {}", id, e)),
        }
    }
}
