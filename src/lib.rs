//! Todo Frontend
//!
//! Browser-only: takes over the page the server rendered, configures the
//! platform SDK from the embedded seed and mounts the app into `#app`.
#![cfg(target_arch = "wasm32")]

mod app;
mod backend;
mod commands;
mod components;
mod context;
mod seed;
mod store;

use leptos::prelude::*;
use wasm_bindgen::JsCast;

use todo_core::config::DEFAULT_SIGN_IN_PROVIDER;
use todo_core::page::MOUNT_ELEMENT_ID;
use todo_core::{AuthMode, InitialState, PageContext};

use app::App;

/// Seed for a page that was not rendered by the page server
fn fallback_state() -> InitialState {
    InitialState {
        context: PageContext::signed_out(),
        auth_mode: AuthMode::Required,
        sign_in_provider: DEFAULT_SIGN_IN_PROVIDER.to_string(),
        platform_config: serde_json::Value::Null,
        conversation: None,
    }
}

fn mount(seed: InitialState) {
    let root = document()
        .get_element_by_id(MOUNT_ELEMENT_ID)
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok());
    match root {
        Some(root) => {
            // Replace the server frame
            root.set_inner_html("");
            leptos::mount::mount_to(root, move || view! { <App seed=seed /> }).forget();
        }
        None => {
            web_sys::console::warn_1(&format!("[App] #{} not found, mounting to body", MOUNT_ELEMENT_ID).into());
            mount_to_body(move || view! { <App seed=seed /> });
        }
    }
}

pub fn start() {
    console_error_panic_hook::set_once();
    let seed = seed::read_initial_state().unwrap_or_else(fallback_state);

    wasm_bindgen_futures::spawn_local(async move {
        if commands::is_available() {
            if let Err(e) = commands::configure(&seed.platform_config).await {
                web_sys::console::error_1(&format!("[App] Platform configure failed: {}", e).into());
            }
        } else {
            web_sys::console::warn_1(&"[App] Platform SDK not loaded".into());
        }
        mount(seed);
    });
}
