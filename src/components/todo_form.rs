//! Todo Form Component
//!
//! Input for new todos. The input is cleared as soon as a submission starts
//! and the text comes back if the backend rejects it. The new todo is never
//! added locally; the list's subscription delivers it.

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

use todo_core::{TodoBackend, TodoFormState};

use crate::context::use_app_context;

#[component]
pub fn TodoForm() -> impl IntoView {
    let ctx = use_app_context();
    let form = RwSignal::new(TodoFormState::new());

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(pending) = form.try_update(|f| f.begin_submit()).flatten() else {
            return;
        };
        let backend = ctx.backend;

        spawn_local(async move {
            let outcome = backend.create(pending.to_new_todo()).await;
            match &outcome {
                Ok(todo) => web_sys::console::log_1(&format!("[TodoForm] Created {}", todo.id).into()),
                Err(e) => web_sys::console::error_1(&format!("[TodoForm] Create failed: {}", e).into()),
            }
            // The form may have been unmounted while the call was in flight
            form.try_update(|f| f.finish_submit(pending, &outcome));
        });
    };

    view! {
        <form class="todo-form" on:submit=submit>
            <input
                class="todo-input"
                type="text"
                placeholder="What needs to be done?"
                prop:value=move || form.with(|f| f.content().to_string())
                prop:disabled=move || form.with(|f| f.is_submitting())
                on:input=move |ev| {
                    if let Some(input) = ev.target().and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok()) {
                        form.update(|f| f.set_content(input.value()));
                    }
                }
            />
            <button type="submit" disabled=move || !form.with(|f| f.can_submit())>
                {move || if form.with(|f| f.is_submitting()) { "..." } else { "+ new" }}
            </button>
            <Show when=move || form.with(|f| f.is_submitting())>
                <p class="todo-form-status">"Adding todo..."</p>
            </Show>
        </form>
    }
}
