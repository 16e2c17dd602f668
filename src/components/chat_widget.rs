//! Chat Widget Component
//!
//! Wiring for the platform's AI conversation route: mirrors the message feed
//! into a store and forwards what the user types. Replies are produced by the
//! platform.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::commands::{self, js_error, ChatRole, ConversationPayload};
use crate::context::use_app_context;
use crate::store::{store_apply_payload, store_set_error, use_chat_store, ChatState, ChatStateStoreFields, ChatStore};

/// Callbacks and stop function of a live conversation feed
struct FeedHandle {
    unsubscribe: js_sys::Function,
    _on_next: Closure<dyn FnMut(JsValue)>,
    _on_error: Closure<dyn FnMut(JsValue)>,
}

fn open_feed(name: &str, store: ChatStore) -> Result<FeedHandle, String> {
    let on_next = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
        match serde_wasm_bindgen::from_value::<ConversationPayload>(value) {
            Ok(payload) => store_apply_payload(&store, payload),
            Err(e) => store_set_error(&store, e.to_string()),
        }
    });
    let on_error = Closure::<dyn FnMut(JsValue)>::new(move |err: JsValue| {
        store_set_error(&store, js_error(err));
    });
    let unsubscribe = commands::observe_conversation(name, &on_next, &on_error)?;
    Ok(FeedHandle {
        unsubscribe,
        _on_next: on_next,
        _on_error: on_error,
    })
}

#[component]
pub fn ChatWidget() -> impl IntoView {
    let ctx = use_app_context();
    let Some(name) = ctx.conversation.get_value() else {
        return ().into_any();
    };

    let store = Store::new(ChatState::default());
    provide_context(store);

    let feed = StoredValue::new_local(None::<FeedHandle>);
    match open_feed(&name, store) {
        Ok(handle) => feed.set_value(Some(handle)),
        Err(e) => {
            web_sys::console::error_1(&format!("[ChatWidget] Could not open conversation: {}", e).into());
            store_set_error(&store, e);
        }
    }
    on_cleanup(move || {
        if let Some(Some(handle)) = feed.try_update_value(|f| f.take()) {
            if let Err(e) = handle.unsubscribe.call0(&JsValue::NULL) {
                web_sys::console::error_1(&format!("[ChatWidget] Unsubscribe failed: {}", js_error(e)).into());
            }
        }
    });

    let name = StoredValue::new(name);
    let (draft, set_draft) = signal(String::new());

    let send = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let content = draft.get_untracked().trim().to_string();
        if content.is_empty() {
            return;
        }
        set_draft.set(String::new());
        store.loading().set(true);
        let name = name.get_value();
        spawn_local(async move {
            if let Err(e) = commands::send_message(&name, &content).await {
                web_sys::console::error_1(&format!("[ChatWidget] Send failed: {}", e).into());
                store_set_error(&store, e);
                set_draft.try_set(content);
            }
        });
    };

    view! {
        <section class="chat-widget">
            <ChatFeed />
            <form class="chat-form" on:submit=send>
                <input
                    type="text"
                    placeholder="Ask about your todos..."
                    prop:value=move || draft.get()
                    on:input=move |ev| {
                        if let Some(input) = ev.target().and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok()) {
                            set_draft.set(input.value());
                        }
                    }
                />
                <button type="submit" disabled=move || store.loading().get()>"Send"</button>
            </form>
        </section>
    }
    .into_any()
}

#[component]
fn ChatFeed() -> impl IntoView {
    let store = use_chat_store();

    view! {
        <ul class="chat-messages">
            <For
                each=move || store.messages().get()
                key=|message| message.id.clone()
                children=|message| {
                    let class = match message.role {
                        ChatRole::User => "chat-message user",
                        ChatRole::Assistant => "chat-message assistant",
                    };
                    view! { <li class=class>{message.content}</li> }
                }
            />
        </ul>
        <Show when=move || store.loading().get()>
            <p class="chat-loading">"..."</p>
        </Show>
        {move || store.error().get().map(|e| view! { <p class="chat-error">{e}</p> })}
    }
}
