//! Conversation Commands
//!
//! Bindings for the managed AI conversation route. The conversation itself
//! runs on the platform; the page only sends messages and mirrors the feed.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use super::{call, js_error, observe};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
}

/// One delivery of the conversation feed
#[derive(Debug, Default, Deserialize)]
pub struct ConversationPayload {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub loading: bool,
}

#[derive(Serialize)]
struct RouteArgs<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct SendMessageArgs<'a> {
    name: &'a str,
    content: &'a str,
}

pub async fn send_message(name: &str, content: &str) -> Result<(), String> {
    let js_args = serde_wasm_bindgen::to_value(&SendMessageArgs { name, content }).map_err(|e| e.to_string())?;
    let _: serde_json::Value = call("conversation.sendMessage", js_args).await?;
    Ok(())
}

pub fn observe_conversation(
    name: &str,
    on_next: &Closure<dyn FnMut(JsValue)>,
    on_error: &Closure<dyn FnMut(JsValue)>,
) -> Result<js_sys::Function, String> {
    let js_args = serde_wasm_bindgen::to_value(&RouteArgs { name }).map_err(|e| e.to_string())?;
    observe("conversation.observe", js_args, on_next, on_error).map_err(js_error)
}
