//! Application Context
//!
//! Shared state provided via Leptos Context API.

use leptos::prelude::*;

use todo_core::AuthMode;

use crate::backend::BrowserBackend;

/// App-wide values provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Built once at startup and shared by every component
    pub backend: BrowserBackend,
    pub auth_mode: AuthMode,
    /// Provider used for redirect sign-in
    pub sign_in_provider: StoredValue<String>,
    /// Conversation route for the chat widget, if enabled
    pub conversation: StoredValue<Option<String>>,
}

impl AppContext {
    pub fn new(
        backend: BrowserBackend,
        auth_mode: AuthMode,
        sign_in_provider: String,
        conversation: Option<String>,
    ) -> Self {
        Self {
            backend,
            auth_mode,
            sign_in_provider: StoredValue::new(sign_in_provider),
            conversation: StoredValue::new(conversation),
        }
    }
}

pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
