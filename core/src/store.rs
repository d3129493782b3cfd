//! The in-memory collection and its mutation operations. The store is the
//! only component that touches the list; every successful mutation writes the
//! whole collection through the repository before returning.

use std::cmp::Ordering;

use chrono::{Local, NaiveDate, NaiveTime};
use log::{error, info};
use serde_json::Value;

use crate::error::StoreError;
use crate::extract::extract;
use crate::model::{Todo, TodoPatch};
use crate::query::{self, Query};
use crate::repository::TodoRepository;
use crate::score::score_at;
use crate::time::DATE_FORMAT;

type SaveHook = Box<dyn Fn(&[Todo])>;

pub struct TodoStore<R: TodoRepository> {
    repo: R,
    todos: Vec<Todo>,
    after_save: Option<SaveHook>,
}

impl<R: TodoRepository> TodoStore<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            todos: Vec::new(),
            after_save: None,
        }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Registers a hook that runs after every successful save with the
    /// just-persisted slice. The UI layer uses this to refresh derived
    /// insights without polling.
    pub fn on_save(&mut self, hook: impl Fn(&[Todo]) + 'static) {
        self.after_save = Some(Box::new(hook));
    }

    /// Creates a todo from raw input text. The text runs through the
    /// natural-language extractor; explicitly passed date/time win over
    /// extracted ones. Empty input (before or after extraction) is rejected
    /// without touching the collection or storage.
    pub fn create(
        &mut self,
        input: &str,
        due_date: Option<NaiveDate>,
        due_time: Option<NaiveTime>,
    ) -> Result<Todo, StoreError> {
        if input.trim().is_empty() {
            return Err(StoreError::EmptyText);
        }
        let parsed = extract(input);
        if parsed.text.is_empty() {
            return Err(StoreError::EmptyText);
        }
        let todo = Todo::new(
            parsed.text,
            due_date.or(parsed.date),
            due_time.or(parsed.time),
        );
        self.todos.push(todo.clone());
        self.save()?;
        Ok(todo)
    }

    /// Unknown ids are a silent no-op, including the write.
    pub fn set_completed(&mut self, id: &str, completed: bool) -> Result<(), StoreError> {
        let Some(pos) = self.todos.iter().position(|t| t.id == id) else {
            return Ok(());
        };
        self.todos[pos].completed = completed;
        self.todos[pos].refresh_derived(Local::now());
        self.save()
    }

    pub fn toggle(&mut self, id: &str) -> Result<(), StoreError> {
        match self.get(id).map(|t| !t.completed) {
            Some(flipped) => self.set_completed(id, flipped),
            None => Ok(()),
        }
    }

    /// Applies a patch to one todo. `clear_due` wins over any date/time also
    /// present in the patch. The category and priority are recomputed from
    /// the patched fields.
    pub fn edit(&mut self, id: &str, patch: TodoPatch) -> Result<(), StoreError> {
        let Some(pos) = self.todos.iter().position(|t| t.id == id) else {
            return Ok(());
        };
        if let Some(text) = &patch.text {
            if text.trim().is_empty() {
                return Err(StoreError::EmptyText);
            }
        }

        let todo = &mut self.todos[pos];
        if let Some(text) = patch.text {
            todo.text = text.trim().to_string();
        }
        if patch.clear_due {
            todo.due_date = None;
            todo.due_time = None;
        } else {
            if let Some(date) = patch.due_date {
                todo.due_date = Some(date);
            }
            if let Some(time) = patch.due_time {
                todo.due_time = Some(time);
            }
        }
        todo.refresh_derived(Local::now());
        self.save()
    }

    pub fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let before = self.todos.len();
        self.todos.retain(|t| t.id != id);
        if self.todos.len() == before {
            return Ok(());
        }
        self.save()
    }

    /// Removes every todo matching the predicate, returning how many went.
    pub fn delete_where(&mut self, pred: impl Fn(&Todo) -> bool) -> Result<usize, StoreError> {
        let before = self.todos.len();
        self.todos.retain(|t| !pred(t));
        let removed = before - self.todos.len();
        if removed > 0 {
            self.save()?;
        }
        Ok(removed)
    }

    pub fn clear_completed(&mut self) -> Result<usize, StoreError> {
        self.delete_where(|t| t.completed)
    }

    /// Moves a todo to `new_index` in iteration order (drag-and-drop).
    /// The index is clamped; unknown ids are a no-op.
    pub fn reorder(&mut self, id: &str, new_index: usize) -> Result<(), StoreError> {
        let Some(pos) = self.todos.iter().position(|t| t.id == id) else {
            return Ok(());
        };
        let todo = self.todos.remove(pos);
        let insert_at = new_index.min(self.todos.len());
        self.todos.insert(insert_at, todo);
        self.save()
    }

    /// Bulk quick action: incomplete first, then score descending, stable.
    pub fn sort_by_priority(&mut self) -> Result<(), StoreError> {
        let now = Local::now();
        self.todos.sort_by(|a, b| match (a.completed, b.completed) {
            (false, true) => Ordering::Less,
            (true, false) => Ordering::Greater,
            _ => score_at(b, now).cmp(&score_at(a, now)),
        });
        self.save()
    }

    /// Reads the persisted collection. A corrupt payload resets the store to
    /// empty and surfaces the parse error; the store stays usable either way.
    pub fn load(&mut self) -> Result<(), StoreError> {
        match self.repo.load() {
            Ok(mut todos) => {
                let now = Local::now();
                for todo in &mut todos {
                    todo.priority = score_at(todo, now);
                }
                self.todos = todos;
                Ok(())
            }
            Err(StoreError::Parse(e)) => {
                error!("discarding corrupt saved todo list: {e}");
                self.todos.clear();
                Err(StoreError::Parse(e))
            }
            Err(e) => Err(e),
        }
    }

    /// Recomputes every priority, writes the full collection, then fires the
    /// post-save hook. On failure the in-memory state is NOT rolled back:
    /// the mutation already happened, only durability is at risk.
    pub fn save(&mut self) -> Result<(), StoreError> {
        let now = Local::now();
        for todo in &mut self.todos {
            todo.priority = score_at(todo, now);
        }
        self.repo.save(&self.todos)?;
        if let Some(hook) = &self.after_save {
            hook(&self.todos);
        }
        Ok(())
    }

    pub fn select(&self, query: &Query) -> Vec<Todo> {
        query::select(&self.todos, query)
    }

    /// The full collection in the wire shape, pretty-printed for a backup
    /// file.
    pub fn export_json(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(&self.todos)
            .map_err(|e| StoreError::Storage(std::io::Error::other(e)))
    }

    /// Default backup filename stamped with the given day.
    pub fn export_filename(today: NaiveDate) -> String {
        format!("todos-backup-{}.json", today.format(DATE_FORMAT))
    }

    /// Merges an exported payload into the collection. The top-level value
    /// must be an array of todo records; ids already present are skipped.
    /// Returns how many records were added.
    pub fn import_json(&mut self, payload: &str) -> Result<usize, StoreError> {
        let value: Value = serde_json::from_str(payload).map_err(|_| StoreError::ImportFormat)?;
        if !value.is_array() {
            return Err(StoreError::ImportFormat);
        }
        let imported: Vec<Todo> =
            serde_json::from_value(value).map_err(|_| StoreError::ImportFormat)?;

        let mut added = 0;
        for todo in imported {
            if self.todos.iter().any(|t| t.id == todo.id) {
                continue;
            }
            self.todos.push(todo);
            added += 1;
        }
        info!("imported {added} todos");
        self.save()?;
        Ok(added)
    }
}
