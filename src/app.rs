//! Todo Frontend App
//!
//! Root component: provides the shared context and takes over the
//! server-rendered first frame.

use leptos::prelude::*;

use todo_core::page::PAGE_TITLE;
use todo_core::InitialState;

use crate::backend::BrowserBackend;
use crate::components::TodoList;
use crate::context::AppContext;

#[component]
pub fn App(seed: InitialState) -> impl IntoView {
    provide_context(AppContext::new(
        BrowserBackend,
        seed.auth_mode,
        seed.sign_in_provider,
        seed.conversation,
    ));

    view! {
        <h1>{PAGE_TITLE}</h1>
        <TodoList initial=seed.context.todos />
    }
}
