use crate::config::{load_json, save_json};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TodoError {
    #[error("Please enter a task!")]
    EmptyText,
    #[error("no task at position {0}")]
    OutOfRange(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// Ordered list mirrored to a JSON array; every mutation rewrites the file.
#[derive(Debug, Clone)]
pub struct TodoList {
    path: PathBuf,
    items: Vec<TodoItem>,
}

impl TodoList {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let items: Vec<TodoItem> = load_json(&path);
        log::debug!("loaded {} tasks from {}", items.len(), path.display());
        Self { path, items }
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn add(&mut self, text: &str) -> Result<(), TodoError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TodoError::EmptyText);
        }
        self.items.push(TodoItem {
            text: text.to_string(),
            completed: false,
        });
        self.persist();
        Ok(())
    }

    pub fn toggle(&mut self, index: usize) -> Result<bool, TodoError> {
        let item = self
            .items
            .get_mut(index)
            .ok_or(TodoError::OutOfRange(index))?;
        item.completed = !item.completed;
        let now = item.completed;
        self.persist();
        Ok(now)
    }

    pub fn delete(&mut self, index: usize) -> Result<TodoItem, TodoError> {
        if index >= self.items.len() {
            return Err(TodoError::OutOfRange(index));
        }
        let removed = self.items.remove(index);
        self.persist();
        Ok(removed)
    }

    /// Returns how many items were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !item.completed);
        let removed = before - self.items.len();
        self.persist();
        removed
    }

    pub fn save(&self) -> anyhow::Result<()> {
        save_json(&self.path, &self.items)
    }

    fn persist(&self) {
        if let Err(err) = self.save() {
            log::warn!("could not write tasks: {err:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TODO_FILE;
    use pretty_assertions::assert_eq;

    fn on_disk(list: &TodoList) -> Vec<TodoItem> {
        serde_json::from_str(&std::fs::read_to_string(list.path()).unwrap()).unwrap()
    }

    #[test]
    fn file_tracks_every_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let mut list = TodoList::load(dir.path().join(TODO_FILE));
        assert!(list.items().is_empty());

        list.add("  Read chapter 4 ").unwrap();
        list.add("Flashcards").unwrap();
        list.add("Outline essay").unwrap();
        assert_eq!(on_disk(&list), list.items());
        assert_eq!(list.items()[0].text, "Read chapter 4");

        assert_eq!(list.toggle(1), Ok(true));
        assert_eq!(on_disk(&list), list.items());

        list.delete(0).unwrap();
        assert_eq!(on_disk(&list), list.items());
        assert_eq!(list.items()[0].text, "Flashcards");
        assert!(list.items()[0].completed);

        let reloaded = TodoList::load(list.path().to_path_buf());
        assert_eq!(reloaded.items(), list.items());
    }

    #[test]
    fn blank_text_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut list = TodoList::load(dir.path().join(TODO_FILE));
        assert_eq!(list.add(" \t "), Err(TodoError::EmptyText));
        assert!(list.items().is_empty());
        assert!(!list.path().exists());
    }

    #[test]
    fn clear_completed_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut list = TodoList::load(dir.path().join(TODO_FILE));
        for t in ["a", "b", "c", "d"] {
            list.add(t).unwrap();
        }
        list.toggle(0).unwrap();
        list.toggle(2).unwrap();
        assert_eq!(list.clear_completed(), 2);
        let texts: Vec<_> = list.items().iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "d"]);
        assert_eq!(on_disk(&list), list.items());
    }

    #[test]
    fn out_of_range_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut list = TodoList::load(dir.path().join(TODO_FILE));
        assert_eq!(list.toggle(3), Err(TodoError::OutOfRange(3)));
        assert!(list.delete(0).is_err());
    }

    #[test]
    fn items_missing_completed_default_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TODO_FILE);
        std::fs::write(&path, r#"[{"text": "legacy"}]"#).unwrap();
        let list = TodoList::load(path);
        assert_eq!(
            list.items(),
            &[TodoItem {
                text: "legacy".into(),
                completed: false
            }]
        );
    }
}
