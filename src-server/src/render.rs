//! First-frame HTML.
//!
//! The markup mirrors what the frontend components render so the page does
//! not jump when the client takes over the `#app` element.

use std::fmt::Write;

use todo_core::page::{MOUNT_ELEMENT_ID, PAGE_TITLE, SEED_ELEMENT_ID};
use todo_core::{InitialState, PageView, Todo, EMPTY_LIST_MESSAGE};

/// Module script emitted by `wasm-bindgen --target web`
pub const FRONTEND_SCRIPT: &str = "/pkg/todo_ui.js";

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn render_list(out: &mut String, todos: &[Todo]) {
    if todos.is_empty() {
        let _ = write!(out, r#"<p class="todo-empty">{EMPTY_LIST_MESSAGE}</p>"#);
        return;
    }
    out.push_str(r#"<ul class="todo-list">"#);
    for todo in todos {
        let _ = write!(
            out,
            r#"<li class="todo-item" data-id="{}"><span class="todo-content">{}</span><button class="todo-delete" type="button">Delete</button></li>"#,
            escape_html(todo.id.as_str()),
            escape_html(&todo.content),
        );
    }
    out.push_str("</ul>");
}

fn render_body(out: &mut String, view: &PageView, sign_in_provider: &str) {
    let _ = write!(out, "<h1>{PAGE_TITLE}</h1>");
    match view {
        PageView::SignInPrompt => {
            let _ = write!(
                out,
                r#"<button class="auth-button" type="button">Sign in with {}</button>"#,
                escape_html(sign_in_provider)
            );
            out.push_str(r#"<ul class="todo-list"></ul>"#);
        }
        PageView::Dashboard {
            email,
            todos,
            show_auth_controls,
        } => {
            if let Some(email) = email {
                let _ = write!(out, r#"<p class="greeting">Hello, {}</p>"#, escape_html(email));
            }
            if *show_auth_controls {
                out.push_str(r#"<button class="auth-button" type="button">Sign out</button>"#);
            }
            out.push_str(
                r#"<form class="todo-form"><input class="todo-input" type="text" placeholder="What needs to be done?"/><button type="submit">+ new</button></form>"#,
            );
            render_list(out, todos);
        }
    }
}

/// Render the full document for one request
pub fn render_page(view: &PageView, seed: &InitialState) -> Result<String, serde_json::Error> {
    let seed_json = seed.to_script_json()?;
    let mut out = String::with_capacity(2048);
    let _ = write!(
        out,
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"/><meta name="viewport" content="width=device-width, initial-scale=1"/><title>{PAGE_TITLE}</title></head><body><main id="{MOUNT_ELEMENT_ID}">"#
    );
    render_body(&mut out, view, &seed.sign_in_provider);
    let _ = write!(
        out,
        r#"</main><script type="application/json" id="{SEED_ELEMENT_ID}">{seed_json}</script><script type="module">import init from "{FRONTEND_SCRIPT}"; init();</script></body></html>"#
    );
    Ok(out)
}
