//! Browser Backend
//!
//! The data API and change stream as seen from the page, on top of the SDK
//! bindings in [`crate::commands`]. Callback-driven SDK streams are bridged
//! into a [`Subscription`] through an unbounded channel.

use async_trait::async_trait;
use futures::channel::mpsc;
use wasm_bindgen::prelude::*;

use todo_core::{
    AuthError, BackendError, BackendResult, ListResult, NewTodo, Subscription, Todo, TodoBackend,
    TodoChanges, TodoId, UserProfile,
};

use crate::commands::{self, js_error, TodoSnapshotPayload};

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserBackend;

fn backend_error(message: String) -> BackendError {
    if message.contains("Unauthorized") || message.contains("NotAuthorized") {
        BackendError::Unauthorized(message)
    } else if message.starts_with("NetworkError") || message.contains("Failed to fetch") {
        BackendError::Network(message)
    } else {
        BackendError::rejected(message)
    }
}

impl BrowserBackend {
    /// Current user plus profile attributes, as one auth check
    pub async fn resolve_profile(&self) -> Result<UserProfile, AuthError> {
        let user = commands::get_current_user()
            .await
            .map_err(commands::auth_error)?;
        let attributes = commands::fetch_user_attributes()
            .await
            .map_err(commands::auth_error)?;
        Ok(UserProfile::from_parts(user, attributes))
    }
}

#[async_trait(?Send)]
impl TodoBackend for BrowserBackend {
    async fn create(&self, todo: NewTodo) -> BackendResult<Todo> {
        commands::create_todo(&todo).await.map_err(backend_error)
    }

    async fn delete(&self, id: &TodoId) -> BackendResult<()> {
        commands::delete_todo(id).await.map_err(backend_error)
    }

    async fn list(&self) -> BackendResult<ListResult> {
        let payload = commands::list_todos().await.map_err(backend_error)?;
        Ok(ListResult {
            items: payload.items.into_iter().flatten().collect(),
            errors: payload.errors.into_iter().map(backend_error).collect(),
        })
    }
}

impl TodoChanges for BrowserBackend {
    fn subscribe_to_changes(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded();

        let next_tx = tx.clone();
        let on_next = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
            let event = serde_wasm_bindgen::from_value::<TodoSnapshotPayload>(value)
                .map(|payload| payload.items)
                .map_err(|e| BackendError::Decode(e.to_string()));
            let _ = next_tx.unbounded_send(event);
        });
        let on_error = Closure::<dyn FnMut(JsValue)>::new(move |err: JsValue| {
            let _ = tx.unbounded_send(Err(BackendError::Subscription(js_error(err))));
        });

        let unsubscribe = match commands::observe_todos(&on_next, &on_error) {
            Ok(f) => f,
            Err(e) => {
                web_sys::console::error_1(&format!("[Subscription] observe failed: {}", e).into());
                return Subscription::failed(BackendError::Subscription(e));
            }
        };
        Subscription::new(rx, move || {
            if let Err(e) = unsubscribe.call0(&JsValue::NULL) {
                web_sys::console::error_1(&format!("[Subscription] unsubscribe failed: {}", js_error(e)).into());
            }
            // The SDK holds no references to the callbacks once unsubscribed
            drop(on_next);
            drop(on_error);
        })
    }
}
