//! Todo Commands
//!
//! Frontend bindings for the Todo model of the data API.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use todo_core::{NewTodo, Todo, TodoId};

use super::{call, js_error, observe};

// ========================
// Argument Structs
// ========================

#[derive(Serialize)]
struct CreateTodoArgs<'a> {
    input: &'a NewTodo,
}

#[derive(Serialize)]
struct DeleteTodoArgs<'a> {
    id: &'a TodoId,
}

/// `list` answer: data and errors can both be present
#[derive(Debug, Default, Deserialize)]
pub struct ListTodosPayload {
    #[serde(default)]
    pub items: Vec<Option<Todo>>,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// One delivery of the observe stream
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoSnapshotPayload {
    pub items: Vec<Todo>,
}

// ========================
// Commands
// ========================

pub async fn create_todo(input: &NewTodo) -> Result<Todo, String> {
    let js_args = serde_wasm_bindgen::to_value(&CreateTodoArgs { input }).map_err(|e| e.to_string())?;
    call("todos.create", js_args).await
}

pub async fn delete_todo(id: &TodoId) -> Result<(), String> {
    let js_args = serde_wasm_bindgen::to_value(&DeleteTodoArgs { id }).map_err(|e| e.to_string())?;
    let _: serde_json::Value = call("todos.delete", js_args).await?;
    Ok(())
}

pub async fn list_todos() -> Result<ListTodosPayload, String> {
    call("todos.list", JsValue::NULL).await
}

/// Open the live query. Every `on_next` value is a full snapshot.
pub fn observe_todos(
    on_next: &Closure<dyn FnMut(JsValue)>,
    on_error: &Closure<dyn FnMut(JsValue)>,
) -> Result<js_sys::Function, String> {
    observe("todos.observeQuery", JsValue::NULL, on_next, on_error).map_err(js_error)
}
