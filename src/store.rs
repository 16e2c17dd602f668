//! Conversation Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity over the chat
//! feed mirrored from the platform.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::commands::{ChatMessage, ConversationPayload};

#[derive(Clone, Debug, Default, Store)]
pub struct ChatState {
    /// Full feed as last reported by the platform
    pub messages: Vec<ChatMessage>,
    /// A reply is being generated
    pub loading: bool,
    /// Last send or stream failure, cleared by the next delivery
    pub error: Option<String>,
}

/// Type alias for the store
pub type ChatStore = Store<ChatState>;

/// Get the chat store from context
pub fn use_chat_store() -> ChatStore {
    expect_context::<ChatStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Replace the feed with a delivery from the platform
pub fn store_apply_payload(store: &ChatStore, payload: ConversationPayload) {
    store.messages().set(payload.messages);
    store.loading().set(payload.loading);
    store.error().set(None);
}

pub fn store_set_error(store: &ChatStore, error: String) {
    store.loading().set(false);
    store.error().set(Some(error));
}
