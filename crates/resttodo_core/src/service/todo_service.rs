//! Todo use-case service.
//!
//! # Responsibility
//! - Provide list/get/create/update/delete entry points for core callers.
//! - Own clock access so every write is stamped consistently.
//!
//! # Invariants
//! - Create stamps `created_at == updated_at`.
//! - Update always refreshes `updated_at`, whichever fields changed.
//! - Log events carry ids only, never titles or descriptions.

use crate::model::timestamp;
use crate::model::todo::{NewTodo, Todo, TodoId, TodoPatch};
use crate::repo::todo_repo::{RepoResult, TodoListQuery, TodoRepository};
use log::{debug, info};

/// Use-case service wrapper for todo CRUD operations.
pub struct TodoService<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists todos matching `query`, most recently created first.
    pub fn list(&self, query: &TodoListQuery) -> RepoResult<Vec<Todo>> {
        let todos = self.repo.list_todos(query)?;
        debug!(
            "event=todo_list module=service status=ok done_filter={:?} has_search={} count={}",
            query.done,
            query.search.as_deref().is_some_and(|q| !q.trim().is_empty()),
            todos.len()
        );
        Ok(todos)
    }

    /// Gets one todo by id. `Ok(None)` when absent.
    pub fn get(&self, id: TodoId) -> RepoResult<Option<Todo>> {
        self.repo.get_todo(id)
    }

    /// Persists a new todo and returns it with assigned id and timestamps.
    pub fn create(&self, input: &NewTodo) -> RepoResult<Todo> {
        let todo = self.repo.create_todo(input, &timestamp::now_utc())?;
        info!(
            "event=todo_create module=service status=ok id={} done={}",
            todo.id, todo.done
        );
        Ok(todo)
    }

    /// Applies a partial update.
    ///
    /// Returns `RepoError::NotFound` unchanged when `id` does not exist.
    pub fn update(&self, id: TodoId, patch: &TodoPatch) -> RepoResult<Todo> {
        let todo = self.repo.update_todo(id, patch, &timestamp::now_utc())?;
        info!(
            "event=todo_update module=service status=ok id={} title_set={} description_set={} done_set={}",
            id,
            patch.title().is_some(),
            patch.description().is_some(),
            patch.done().is_some()
        );
        Ok(todo)
    }

    /// Permanently deletes a todo.
    pub fn delete(&self, id: TodoId) -> RepoResult<()> {
        self.repo.delete_todo(id)?;
        info!("event=todo_delete module=service status=ok id={id}");
        Ok(())
    }
}
