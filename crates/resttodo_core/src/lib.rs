//! Core domain logic for the todo service.
//! This crate is the single source of truth for todo invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::todo::{NewTodo, Todo, TodoId, TodoPatch, TodoValidationError};
pub use repo::todo_repo::{
    RepoError, RepoResult, SqliteTodoRepository, TodoListQuery, TodoRepository,
};
pub use service::todo_service::TodoService;
