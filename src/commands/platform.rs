//! Platform Commands

use wasm_bindgen::prelude::*;

use super::call;

/// Configure the SDK with the outputs document the server embedded in the page
pub async fn configure(outputs: &serde_json::Value) -> Result<(), String> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    let js_args = serde::Serialize::serialize(outputs, &serializer).map_err(|e| e.to_string())?;
    let _: serde_json::Value = call("platform.configure", js_args).await?;
    Ok(())
}

/// Whether the SDK shim is present on the page
pub fn is_available() -> bool {
    web_sys::window()
        .and_then(|w| js_sys::Reflect::get(&w, &JsValue::from_str("__TODO_PLATFORM__")).ok())
        .is_some_and(|v| !v.is_undefined())
}
