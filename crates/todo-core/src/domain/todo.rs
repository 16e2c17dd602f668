//! Todo Entity
//!
//! The only record type of the data schema. Identifiers are assigned by the
//! backend when a todo is created and never change afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Backend-assigned todo identifier.
///
/// There is deliberately no `From<String>`: ids only enter the program through
/// deserialized backend payloads or a backend implementation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Wrap an id handed out by a backend implementation.
    pub fn assigned(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A todo as stored by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub content: String,
    #[serde(default)]
    pub priority: i32,
    /// Platform-managed timestamps, kept opaque
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Todo {
    pub fn new(id: TodoId, content: impl Into<String>, priority: i32) -> Self {
        Self {
            id,
            content: content.into(),
            priority,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Creation payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    pub content: String,
    #[serde(default)]
    pub priority: i32,
}

impl NewTodo {
    /// Content with the default priority of 0
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            priority: 0,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todo_wire_format_is_camel_case() {
        let json = r#"{"id":"1","content":"Buy milk","priority":0,"createdAt":"2024-01-01T00:00:00Z"}"#;
        let todo: Todo = serde_json::from_str(json).unwrap();
        assert_eq!(todo.id.as_str(), "1");
        assert_eq!(todo.content, "Buy milk");
        assert_eq!(todo.created_at.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert!(todo.updated_at.is_none());
    }

    #[test]
    fn test_missing_priority_defaults_to_zero() {
        let todo: Todo = serde_json::from_str(r#"{"id":"a","content":"x"}"#).unwrap();
        assert_eq!(todo.priority, 0);
    }

    #[test]
    fn test_new_todo_default_priority() {
        assert_eq!(NewTodo::new("x").priority, 0);
        assert_eq!(NewTodo::new("x").with_priority(3).priority, 3);
    }
}
