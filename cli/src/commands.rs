//! CLI Commands

use colored::Colorize;
use keepsake_core::{KeepsakeResult, PersistSettings};
use keepsake_state::PersistConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::todo::{open_store, AppState, TodoAction, TodoItem};

/// A single todo operation requested on the command line
#[derive(Debug, Clone)]
pub enum TodoCommand {
    Add {
        title: String,
        description: Option<String>,
    },
    Remove {
        index: usize,
    },
    List,
    Clear,
}

/// Default base directory: `<documents>/data`, falling back to `./data`
pub fn default_data_dir() -> PathBuf {
    dirs::document_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("data")
}

/// Open the store, apply `command` and return the resulting state
pub fn run(settings: &PersistSettings, command: TodoCommand) -> KeepsakeResult<AppState> {
    let config = Arc::new(PersistConfig::from_settings(settings)?);
    info!(
        "Using {} (schema version {})",
        config.persist_directory().display(),
        config.version()
    );

    let mut store = open_store(config)?;
    let action = match command {
        TodoCommand::Add { title, description } => {
            Some(TodoAction::Add(TodoItem::new(&title, description.as_deref())))
        }
        TodoCommand::Remove { index } => Some(TodoAction::Remove(index)),
        TodoCommand::Clear => Some(TodoAction::Clear),
        TodoCommand::List => None,
    };

    if let Some(action) = action {
        store.dispatch(action);
    }
    Ok(store.into_state())
}

/// Render todos as numbered lines
pub fn render_todos(state: &AppState) -> String {
    if state.todos.is_empty() {
        return "No todos yet.".dimmed().to_string();
    }

    let mut out = String::new();
    for (index, todo) in state.todos.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {}  {}\n",
            index,
            todo.title.bold(),
            todo.timestamp
                .as_datetime()
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .dimmed()
        ));
        if let Some(description) = &todo.description {
            out.push_str(&format!("     {}\n", description));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings(base: &std::path::Path) -> PersistSettings {
        PersistSettings::new(base, "1")
    }

    #[test]
    fn test_run_add_then_list() {
        colored::control::set_override(false);
        let tmp = TempDir::new().unwrap();

        let state = run(
            &settings(tmp.path()),
            TodoCommand::Add {
                title: "write docs".into(),
                description: Some("for the marker file".into()),
            },
        )
        .unwrap();
        assert_eq!(state.todos.len(), 1);

        let state = run(&settings(tmp.path()), TodoCommand::List).unwrap();
        let rendered = render_todos(&state);
        assert!(rendered.starts_with("  0. write docs"));
        assert!(rendered.contains("for the marker file"));
    }

    #[test]
    fn test_run_clear() {
        let tmp = TempDir::new().unwrap();
        run(
            &settings(tmp.path()),
            TodoCommand::Add {
                title: "a".into(),
                description: None,
            },
        )
        .unwrap();

        let state = run(&settings(tmp.path()), TodoCommand::Clear).unwrap();
        assert!(state.todos.is_empty());
        let state = run(&settings(tmp.path()), TodoCommand::List).unwrap();
        assert!(state.todos.is_empty());
    }

    #[test]
    fn test_invalid_version_rejected() {
        let tmp = TempDir::new().unwrap();
        let bad = PersistSettings::new(tmp.path(), "../escape");
        assert!(run(&bad, TodoCommand::List).is_err());
    }
}
