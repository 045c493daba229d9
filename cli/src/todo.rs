//! Todo list state, actions and reducer

use keepsake_core::{Action, KeepsakeResult, PersistState, SkipPersist, StateId, Timestamp};
use keepsake_state::{PersistConfig, PersistStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Identifier the todo state is stored under
pub const TODO_STATE_ID: &str = "AppState";

/// A single todo entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoItem {
    pub title: String,
    pub description: Option<String>,
    pub timestamp: Timestamp,
}

impl TodoItem {
    pub fn new(title: &str, description: Option<&str>) -> Self {
        Self {
            title: title.to_string(),
            description: description.map(str::to_string),
            timestamp: Timestamp::now(),
        }
    }
}

/// Application state persisted between runs
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppState {
    pub todos: Vec<TodoItem>,
}

impl SkipPersist for AppState {}
impl PersistState for AppState {}

#[derive(Debug, Clone)]
pub enum TodoAction {
    Add(TodoItem),
    Remove(usize),
    Clear,
}

pub fn todo_reducer(action: &Action<TodoAction>, state: Option<&AppState>) -> AppState {
    let mut state = state.cloned().unwrap_or_default();
    match action {
        Action::Dispatch(TodoAction::Add(todo)) => state.todos.push(todo.clone()),
        Action::Dispatch(TodoAction::Remove(index)) => {
            if *index < state.todos.len() {
                state.todos.remove(*index);
            }
        }
        Action::Dispatch(TodoAction::Clear) => state.todos.clear(),
        Action::Init => {}
    }
    state
}

pub type TodoStore = PersistStore<AppState, TodoAction>;

/// Open the todo store, restoring whatever was saved last time
pub fn open_store(config: Arc<PersistConfig>) -> KeepsakeResult<TodoStore> {
    let id = StateId::new(TODO_STATE_ID)?;
    Ok(PersistStore::new(config, id, Box::new(todo_reducer), None))
}
