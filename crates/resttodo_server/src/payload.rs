//! Typed request payloads.
//!
//! Bodies are decoded from raw bytes whatever the `Content-Type`, must be a
//! JSON object, and are then turned into validated core inputs.

use crate::error::ApiError;
use log::debug;
use resttodo_core::{NewTodo, TodoPatch};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Query string of `GET /api/todos`.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub done: Option<String>,
    pub q: Option<String>,
}

impl ListParams {
    /// Collects known keys from decoded query pairs. The first value of a
    /// repeated key wins; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "done" => &mut params.done,
                "q" => &mut params.q,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }

    /// `true`/`1` and `false`/`0` (any case) filter; anything else is ignored.
    pub fn done_filter(&self) -> Option<bool> {
        self.done.as_deref().and_then(parse_done_flag)
    }
}

fn parse_done_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Body of `POST /api/todos`. `null` is treated like an absent field.
///
/// `done` takes any JSON value and is read by its truthiness.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTodoBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub done: Option<Value>,
}

impl CreateTodoBody {
    pub fn into_new_todo(self) -> Result<NewTodo, ApiError> {
        let title = self.title.unwrap_or_default();
        Ok(NewTodo::new(
            &title,
            self.description.unwrap_or_default(),
            self.done.as_ref().is_some_and(is_truthy),
        )?)
    }
}

/// Body of `PUT`/`PATCH /api/todos/{id}`.
///
/// The outer `Option` records presence of the key, the inner one an explicit
/// `null`. Present-but-null reads as empty title or empty description.
/// `done` is present whenever its key is, and is read by its truthiness.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodoBody {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub done: Option<Value>,
}

impl UpdateTodoBody {
    pub fn into_patch(self) -> Result<TodoPatch, ApiError> {
        let title = self.title.map(Option::unwrap_or_default);
        Ok(TodoPatch::new(
            title.as_deref(),
            self.description.map(Option::unwrap_or_default),
            self.done.as_ref().map(is_truthy),
        )?)
    }
}

// Marks a key as present even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// JSON truthiness: `false`, `0`, `""`, `null`, `[]` and `{}` are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Decodes a JSON object body into `T`.
///
/// Anything that is not a JSON object, or has mistyped fields, is rejected
/// with `Invalid JSON body`.
pub fn parse_json_object<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let value: Value = serde_json::from_slice(body).map_err(|err| {
        debug!("event=body_parse module=server status=error reason=malformed error={err}");
        ApiError::invalid_body()
    })?;

    if !value.is_object() {
        debug!("event=body_parse module=server status=error reason=not_object");
        return Err(ApiError::invalid_body());
    }

    serde_json::from_value(value).map_err(|err| {
        debug!("event=body_parse module=server status=error reason=field_type error={err}");
        ApiError::invalid_body()
    })
}
