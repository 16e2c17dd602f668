//! Auth Commands
//!
//! Frontend bindings for the authentication provider.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use todo_core::{AuthError, AuthUser, UserAttributes};

use super::call;

/// Error name the SDK uses for "nobody is signed in"
const UNAUTHENTICATED: &str = "UserUnAuthenticatedException";

#[derive(Serialize)]
struct SignInArgs<'a> {
    provider: &'a str,
}

/// Map an SDK failure onto the auth taxonomy
pub fn auth_error(message: String) -> AuthError {
    if message.starts_with(UNAUTHENTICATED) {
        AuthError::NoSession
    } else {
        AuthError::Provider(message)
    }
}

pub async fn get_current_user() -> Result<AuthUser, String> {
    call("auth.getCurrentUser", JsValue::NULL).await
}

pub async fn fetch_user_attributes() -> Result<UserAttributes, String> {
    call("auth.fetchUserAttributes", JsValue::NULL).await
}

/// Hand control to the provider's hosted login; the browser navigates away
pub async fn sign_in_with_redirect(provider: &str) -> Result<(), String> {
    let js_args = serde_wasm_bindgen::to_value(&SignInArgs { provider }).map_err(|e| e.to_string())?;
    let _: serde_json::Value = call("auth.signInWithRedirect", js_args).await?;
    Ok(())
}

pub async fn sign_out() -> Result<(), String> {
    let _: serde_json::Value = call("auth.signOut", JsValue::NULL).await?;
    Ok(())
}
