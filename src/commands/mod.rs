//! Platform SDK Bindings
//!
//! Frontend bindings to the managed platform's browser SDK, organized by
//! domain. The SDK is exposed on `window.__TODO_PLATFORM__` as a command
//! dispatcher plus an `observe` entry point for long-lived streams.

mod auth;
mod conversation;
mod platform;
mod todo;

use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["window", "__TODO_PLATFORM__"], catch)]
    async fn invoke(cmd: &str, args: JsValue) -> Result<JsValue, JsValue>;

    /// Start a stream; returns the function that stops it
    #[wasm_bindgen(js_namespace = ["window", "__TODO_PLATFORM__"], catch)]
    fn observe(
        cmd: &str,
        args: JsValue,
        on_next: &Closure<dyn FnMut(JsValue)>,
        on_error: &Closure<dyn FnMut(JsValue)>,
    ) -> Result<js_sys::Function, JsValue>;
}

/// Readable text for a rejected SDK promise
pub fn js_error(err: JsValue) -> String {
    match err.dyn_ref::<js_sys::Error>() {
        Some(e) => format!("{}: {}", String::from(e.name()), String::from(e.message())),
        None => err.as_string().unwrap_or_else(|| format!("{err:?}")),
    }
}

async fn call<T: DeserializeOwned>(cmd: &str, args: JsValue) -> Result<T, String> {
    let result = invoke(cmd, args).await.map_err(js_error)?;
    serde_wasm_bindgen::from_value(result).map_err(|e| e.to_string())
}

// Re-export all public items
pub use auth::*;
pub use conversation::*;
pub use platform::*;
pub use todo::*;
