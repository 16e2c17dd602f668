//! Auth Button Component
//!
//! Sign-in hands control to the provider's hosted login, which redirects
//! back to this page. Sign-out clears local state and reloads the page so the
//! server renders from the now-empty session.

use leptos::prelude::*;
use leptos::task::spawn_local;

use todo_core::TodoListState;

use crate::commands;
use crate::context::use_app_context;

#[component]
pub fn AuthButton(state: RwSignal<TodoListState>) -> impl IntoView {
    let ctx = use_app_context();
    let (busy, set_busy) = signal(false);
    let signed_in = Memo::new(move |_| state.with(|s| s.is_authenticated()));

    let on_click = move |_| {
        if busy.get_untracked() {
            return;
        }
        set_busy.set(true);

        if signed_in.get_untracked() {
            spawn_local(async move {
                if let Err(e) = commands::sign_out().await {
                    web_sys::console::error_1(&format!("[AuthButton] Sign out failed: {}", e).into());
                }
                state.try_update(|s| s.sign_out());
                if let Err(e) = window().location().reload() {
                    web_sys::console::error_1(&format!("[AuthButton] Reload failed: {:?}", e).into());
                }
            });
        } else {
            let provider = ctx.sign_in_provider.get_value();
            spawn_local(async move {
                if let Err(e) = commands::sign_in_with_redirect(&provider).await {
                    web_sys::console::error_1(&format!("[AuthButton] Sign in failed: {}", e).into());
                    set_busy.try_set(false);
                }
            });
        }
    };

    view! {
        <button class="auth-button" type="button" disabled=move || busy.get() on:click=on_click>
            {move || {
                if signed_in.get() {
                    "Sign out".to_string()
                } else {
                    format!("Sign in with {}", ctx.sign_in_provider.get_value())
                }
            }}
        </button>
    }
}
