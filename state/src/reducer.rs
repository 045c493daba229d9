//! Persisting reducer wrapper
//!
//! Wraps a base reducer. The `Init` action restores the last snapshot
//! (migrating it first when the recorded schema version differs); every other
//! action reduces and then saves, unless the state's skip policy says the new
//! state is not worth writing.

use keepsake_core::{Action, PersistState, Reducer, StateId};
use std::sync::Arc;

use crate::config::PersistConfig;
use crate::marker::VersionMarker;
use crate::migration::Migrator;
use crate::snapshot::StateStore;

/// Lifecycle of a persisting reducer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistPhase {
    Uninitialized,
    Restoring,
    Ready,
}

/// A base reducer plus restore-on-init and save-on-change behaviour
pub struct PersistReducer<S, A> {
    config: Arc<PersistConfig>,
    state_id: StateId,
    base: Reducer<S, A>,
    phase: PersistPhase,
}

impl<S: PersistState, A> PersistReducer<S, A> {
    pub fn new(config: Arc<PersistConfig>, state_id: StateId, base: Reducer<S, A>) -> Self {
        Self {
            config,
            state_id,
            base,
            phase: PersistPhase::Uninitialized,
        }
    }

    pub fn phase(&self) -> PersistPhase {
        self.phase
    }

    pub fn state_id(&self) -> &StateId {
        &self.state_id
    }

    pub fn config(&self) -> &PersistConfig {
        &self.config
    }

    /// Reduce one action, touching disk as a side effect
    pub fn reduce(&mut self, action: &Action<A>, state: Option<&S>) -> S {
        if action.is_init() {
            if self.phase == PersistPhase::Uninitialized {
                self.phase = PersistPhase::Restoring;
                let restored = self.restore();
                self.phase = PersistPhase::Ready;

                return match restored {
                    Some(restored) => restored,
                    None => (self.base)(action, state),
                };
            }
            self.config
                .log_warn(format!("Repeated init for {} ignored, treated as update", self.state_id));
        } else if self.phase == PersistPhase::Uninitialized {
            self.config
                .log_warn(format!("Action for {} dispatched before init", self.state_id));
        }

        let new_state = (self.base)(action, state);

        if let Some(previous) = state {
            if previous.should_skip_persist(&new_state) {
                self.config
                    .log_debug(format!("Persist skipped for {}", self.state_id));
                return new_state;
            }
        }

        StateStore::new(&self.config).save(&self.state_id, self.config.version(), &new_state);
        new_state
    }

    /// Migrate if needed, then load the target-version snapshot
    fn restore(&self) -> Option<S> {
        let config = self.config.as_ref();
        let id = &self.state_id;
        config.log_debug(format!(
            "State directory: {}",
            config.layout().state_dir(id).display()
        ));

        let current = VersionMarker::new(config).get(id);
        if current.as_ref() != Some(config.version()) {
            Migrator::new(config).run::<S>(id, current.as_ref());
        } else {
            config.log_debug("No migration needed");
        }

        let restored = StateStore::new(config).load(id, config.version());
        if restored.is_some() {
            config.log_info(format!("State {} restored", id));
        }
        restored
    }

    /// Turn the wrapper into a plain reducer closure
    pub fn into_fn(mut self) -> impl FnMut(&Action<A>, Option<&S>) -> S {
        move |action: &Action<A>, state: Option<&S>| self.reduce(action, state)
    }
}

/// Wrap `base` so that it restores on init and persists on every other action
pub fn persist_reducer<S: PersistState, A>(
    config: Arc<PersistConfig>,
    state_id: StateId,
    base: Reducer<S, A>,
) -> impl FnMut(&Action<A>, Option<&S>) -> S {
    PersistReducer::new(config, state_id, base).into_fn()
}

#[cfg(test)]
mod tests {
    use super::*;
    use keepsake_core::{SchemaVersion, SkipPersist};
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        value: i64,
    }

    impl SkipPersist for Counter {}
    impl PersistState for Counter {}

    fn counter_reducer() -> Reducer<Counter, i64> {
        Box::new(|action: &Action<i64>, state: Option<&Counter>| {
            let mut state = state.cloned().unwrap_or(Counter { value: 0 });
            if let Action::Dispatch(value) = action {
                state.value = *value;
            }
            state
        })
    }

    fn config(base: &std::path::Path, version: &str) -> Arc<PersistConfig> {
        Arc::new(PersistConfig::new(base, SchemaVersion::new(version).unwrap()).debug(true))
    }

    #[test]
    fn test_phases() {
        let tmp = TempDir::new().unwrap();
        let id = StateId::new("Counter").unwrap();
        let mut reducer = PersistReducer::new(config(tmp.path(), "1"), id, counter_reducer());
        assert_eq!(reducer.phase(), PersistPhase::Uninitialized);

        let state = reducer.reduce(&Action::Init, None);
        assert_eq!(state, Counter { value: 0 });
        assert_eq!(reducer.phase(), PersistPhase::Ready);
    }

    #[test]
    fn test_init_does_not_persist() {
        let tmp = TempDir::new().unwrap();
        let cfg = config(tmp.path(), "1");
        let id = StateId::new("Counter").unwrap();
        let mut reducer = PersistReducer::new(cfg.clone(), id.clone(), counter_reducer());

        reducer.reduce(&Action::Init, None);
        assert!(!StateStore::new(&cfg).exists(&id, cfg.version()));
        assert_eq!(VersionMarker::new(&cfg).get(&id), Some(SchemaVersion::new("1").unwrap()));
    }

    #[test]
    fn test_restore_bypasses_base_init() {
        let tmp = TempDir::new().unwrap();
        let cfg = config(tmp.path(), "1");
        let id = StateId::new("Counter").unwrap();

        let mut first = persist_reducer(cfg.clone(), id.clone(), counter_reducer());
        let initial = first(&Action::Init, None);
        first(&Action::Dispatch(42), Some(&initial));

        let mut second = persist_reducer(cfg, id, counter_reducer());
        assert_eq!(second(&Action::Init, None), Counter { value: 42 });
    }

    #[test]
    fn test_repeated_init_does_not_restore_again() {
        let tmp = TempDir::new().unwrap();
        let cfg = config(tmp.path(), "1");
        let id = StateId::new("Counter").unwrap();
        StateStore::new(&cfg).save(&id, cfg.version(), &Counter { value: 5 });

        let mut reducer = PersistReducer::new(cfg.clone(), id.clone(), counter_reducer());
        let restored = reducer.reduce(&Action::Init, None);
        assert_eq!(restored, Counter { value: 5 });

        StateStore::new(&cfg).save(&id, cfg.version(), &Counter { value: 8 });
        let again = reducer.reduce(&Action::Init, Some(&restored));
        assert_eq!(again, Counter { value: 5 });
    }

    #[test]
    fn test_equal_state_is_not_rewritten() {
        let tmp = TempDir::new().unwrap();
        let cfg = config(tmp.path(), "1");
        let id = StateId::new("Counter").unwrap();
        let path = StateStore::new(&cfg).snapshot_path(&id, cfg.version());

        let mut reducer = PersistReducer::new(cfg.clone(), id, counter_reducer());
        let state = reducer.reduce(&Action::Init, None);
        let state = reducer.reduce(&Action::Dispatch(3), Some(&state));
        let before = std::fs::read(&path).unwrap();

        // Corrupt on purpose: a skipped persist must leave the file alone.
        std::fs::write(&path, b"sentinel").unwrap();
        reducer.reduce(&Action::Dispatch(3), Some(&state));
        assert_eq!(std::fs::read(&path).unwrap(), b"sentinel");

        std::fs::write(&path, &before).unwrap();
        reducer.reduce(&Action::Dispatch(4), Some(&state));
        assert_ne!(std::fs::read(&path).unwrap(), before);
    }
}
