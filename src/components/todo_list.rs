//! Todo List Component
//!
//! Shows the seeded first frame, checks auth on mount, and once the caller
//! may see todos keeps one change subscription open. Every snapshot replaces
//! the list; deletes drop the row before the backend answers.

use futures::StreamExt;
use leptos::prelude::*;
use leptos::task::spawn_local;

use todo_core::{
    AuthMode, ListView, SubscriptionSlot, Todo, TodoBackend, TodoChanges, TodoId, TodoListState,
    EMPTY_LIST_MESSAGE,
};

use crate::components::{AuthButton, ChatWidget, TodoForm};
use crate::context::use_app_context;

/// Which top-level layout the list is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Loading,
    SignIn,
    Dashboard,
}

#[component]
pub fn TodoList(
    /// Server-fetched todos shown until the first snapshot arrives
    initial: Vec<Todo>,
) -> impl IntoView {
    let ctx = use_app_context();
    let state = RwSignal::new(TodoListState::seeded(initial, ctx.auth_mode));
    let slot = StoredValue::new_local(SubscriptionSlot::new());

    // Auth check on mount
    Effect::new(move |_| {
        if ctx.auth_mode != AuthMode::Required {
            return;
        }
        state.update(|s| s.begin_auth_check());
        let backend = ctx.backend;
        spawn_local(async move {
            let outcome = backend.resolve_profile().await;
            web_sys::console::log_1(&format!("[TodoList] Auth resolved: signed_in={}", outcome.is_ok()).into());
            state.try_update(|s| s.resolve_auth(outcome));
        });
    });

    // One subscription while allowed, none otherwise
    let can_subscribe = Memo::new(move |_| state.with(|s| s.can_subscribe()));
    Effect::new(move |_| {
        if !can_subscribe.get() {
            if slot.try_update_value(|s| s.release()).unwrap_or(false) {
                web_sys::console::log_1(&"[TodoList] Subscription closed".into());
            }
            return;
        }

        let (mut events, handle) = ctx.backend.subscribe_to_changes().into_parts();
        slot.update_value(|s| s.attach(handle));
        web_sys::console::log_1(&"[TodoList] Subscription opened".into());

        spawn_local(async move {
            // Ends when the handle is cancelled
            while let Some(event) = events.next().await {
                if let Err(e) = &event {
                    web_sys::console::error_1(&format!("[TodoList] Subscription error: {}", e).into());
                }
                if state.try_update(|s| s.apply_event(event)).is_none() {
                    break;
                }
            }
        });
    });

    on_cleanup(move || {
        slot.try_update_value(|s| s.release());
    });

    let delete = move |id: TodoId| {
        state.update(|s| {
            s.remove_optimistic(&id);
        });
        let backend = ctx.backend;
        spawn_local(async move {
            // No rollback: the next snapshot restores the row if this failed
            if let Err(e) = backend.delete(&id).await {
                web_sys::console::error_1(&format!("[TodoList] Delete {} failed: {}", id, e).into());
            }
        });
    };

    let screen = Memo::new(move |_| {
        state.with(|s| match s.view() {
            ListView::Loading => Screen::Loading,
            ListView::SignedOut => Screen::SignIn,
            ListView::Empty | ListView::Items(_) => Screen::Dashboard,
        })
    });
    let email = Memo::new(move |_| state.with(|s| s.profile().and_then(|p| p.email.clone())));
    let is_empty = Memo::new(move |_| state.with(|s| s.todos().is_empty()));
    let has_chat = ctx.conversation.with_value(|c| c.is_some());

    move || match screen.get() {
        Screen::Loading => view! { <p class="todo-loading">"Loading..."</p> }.into_any(),
        Screen::SignIn => view! {
            <AuthButton state=state />
            <ul class="todo-list"></ul>
        }
        .into_any(),
        Screen::Dashboard => view! {
            {move || email.get().map(|email| view! { <p class="greeting">"Hello, " {email}</p> })}
            <Show when=move || ctx.auth_mode == AuthMode::Required>
                <AuthButton state=state />
            </Show>
            <TodoForm />
            <Show
                when=move || !is_empty.get()
                fallback=|| view! { <p class="todo-empty">{EMPTY_LIST_MESSAGE}</p> }
            >
                <ul class="todo-list">
                    <For
                        each=move || state.with(|s| s.todos().to_vec())
                        key=|todo| todo.id.clone()
                        children=move |todo| {
                            let id = todo.id.clone();
                            view! {
                                <li class="todo-item" data-id=todo.id.to_string()>
                                    <span class="todo-content">{todo.content}</span>
                                    <button
                                        class="todo-delete"
                                        type="button"
                                        on:click=move |_| delete(id.clone())
                                    >
                                        "Delete"
                                    </button>
                                </li>
                            }
                        }
                    />
                </ul>
            </Show>
            <Show when=move || has_chat>
                <ChatWidget />
            </Show>
        }
        .into_any(),
    }
}
