//! Todo domain model.
//!
//! # Responsibility
//! - Define the record returned by every read path.
//! - Validate create and partial-update inputs before they reach storage.
//!
//! # Invariants
//! - `NewTodo` and `TodoPatch` titles are trimmed and never empty.
//! - A `TodoPatch` always carries at least one field.

use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned identifier, immutable for the record lifetime.
pub type TodoId = i64;

/// Canonical todo record.
///
/// Serializes to the public JSON shape:
/// `{id, title, description, done, created_at, updated_at}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: String,
    pub done: bool,
    /// ISO-8601 UTC, set once at creation.
    pub created_at: String,
    /// ISO-8601 UTC, refreshed on every successful update.
    pub updated_at: String,
}

/// Validation failure for todo write inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoValidationError {
    /// Create input has no usable title.
    TitleRequired,
    /// Update input sets the title to an empty value.
    EmptyTitle,
    /// Update input does not carry any updatable field.
    NoUpdatableFields,
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TitleRequired => write!(f, "Title is required"),
            Self::EmptyTitle => write!(f, "Title cannot be empty"),
            Self::NoUpdatableFields => write!(f, "No updatable fields provided"),
        }
    }
}

impl Error for TodoValidationError {}

/// Validated input for creating a todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    title: String,
    description: String,
    done: bool,
}

impl NewTodo {
    /// Builds a create input, trimming the title.
    ///
    /// # Errors
    /// - `TitleRequired` when the trimmed title is empty.
    pub fn new(
        title: &str,
        description: impl Into<String>,
        done: bool,
    ) -> Result<Self, TodoValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TodoValidationError::TitleRequired);
        }

        Ok(Self {
            title: title.to_string(),
            description: description.into(),
            done,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn done(&self) -> bool {
        self.done
    }
}

/// Validated partial update: each field is independently present or absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    title: Option<String>,
    description: Option<String>,
    done: Option<bool>,
}

impl TodoPatch {
    /// Builds a partial update, trimming the title when present.
    ///
    /// # Errors
    /// - `EmptyTitle` when a provided title trims to empty.
    /// - `NoUpdatableFields` when every field is absent.
    pub fn new(
        title: Option<&str>,
        description: Option<String>,
        done: Option<bool>,
    ) -> Result<Self, TodoValidationError> {
        let title = match title.map(str::trim) {
            Some("") => return Err(TodoValidationError::EmptyTitle),
            Some(value) => Some(value.to_string()),
            None => None,
        };

        if title.is_none() && description.is_none() && done.is_none() {
            return Err(TodoValidationError::NoUpdatableFields);
        }

        Ok(Self {
            title,
            description,
            done,
        })
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn done(&self) -> Option<bool> {
        self.done
    }
}
