//! Frontend Models
//!
//! Data structures matching the `/api/todos` wire format.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Server-assigned todo identifier.
///
/// Opaque to the client: accepted as a JSON string or integer and
/// serialized back in the same form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TodoId {
    Number(u64),
    Text(String),
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoId::Number(n) => write!(f, "{}", n),
            TodoId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for TodoId {
    fn from(id: u64) -> Self {
        TodoId::Number(id)
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        TodoId::Text(id.to_string())
    }
}

/// Todo record as echoed by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    /// Fields the client does not model, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Todo {
    pub fn new(id: impl Into<TodoId>, title: impl Into<String>, completed: bool) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            completed,
            extra: Map::new(),
        }
    }
}

/// Body of `POST /api/todos`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTodo<'a> {
    pub title: &'a str,
}

/// Body of `PUT /api/todos/{id}`; absent fields are left alone by the server
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Default::default()
        }
    }
}
