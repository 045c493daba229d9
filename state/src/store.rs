//! Minimal dispatching store driven by a [`PersistReducer`]

use keepsake_core::{Action, PersistState, Reducer, StateId};
use std::sync::Arc;

use crate::config::PersistConfig;
use crate::reducer::{PersistPhase, PersistReducer};

/// Store whose state is restored on creation and saved on dispatch.
///
/// Dispatch is synchronous and runs file I/O inline; callers must serialize
/// access to a given state id.
pub struct PersistStore<S, A> {
    reducer: PersistReducer<S, A>,
    state: S,
}

impl<S: PersistState, A> PersistStore<S, A> {
    /// Create the store and run the init action (restore or migrate)
    pub fn new(
        config: Arc<PersistConfig>,
        state_id: StateId,
        reducer: Reducer<S, A>,
        initial_state: Option<S>,
    ) -> Self {
        let mut reducer = PersistReducer::new(config, state_id, reducer);
        let state = reducer.reduce(&Action::Init, initial_state.as_ref());
        Self { reducer, state }
    }

    /// Reduce `action` into a new state and persist it
    pub fn dispatch(&mut self, action: A) -> &S {
        let next = self.reducer.reduce(&Action::Dispatch(action), Some(&self.state));
        self.state = next;
        &self.state
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn phase(&self) -> PersistPhase {
        self.reducer.phase()
    }

    pub fn state_id(&self) -> &StateId {
        self.reducer.state_id()
    }

    pub fn config(&self) -> &PersistConfig {
        self.reducer.config()
    }

    pub fn into_state(self) -> S {
        self.state
    }
}
