//! Domain Layer
//!
//! Entities and error types shared by every other module.
//! This layer has NO platform dependencies (only serde and thiserror).

mod error;
mod identity;
mod todo;

pub use error::{AuthError, BackendError, BackendResult};
pub use identity::{AuthUser, UserAttributes, UserProfile};
pub use todo::{NewTodo, Todo, TodoId};
