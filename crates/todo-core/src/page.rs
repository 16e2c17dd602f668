//! Page View Model
//!
//! Turns a bootstrapped [`PageContext`] into the first frame, and carries the
//! seed the browser reads to take over from it.

use serde::{Deserialize, Serialize};

use crate::auth::AuthMode;
use crate::bootstrap::PageContext;
use crate::domain::Todo;

/// Page heading
pub const PAGE_TITLE: &str = "My Todos";

/// Element id of the embedded JSON seed
pub const SEED_ELEMENT_ID: &str = "initial-state";

/// Element id the frontend mounts into
pub const MOUNT_ELEMENT_ID: &str = "app";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView {
    /// Signed out: sign-in control, empty list, no form
    SignInPrompt,
    /// Form plus list seeded with server data
    Dashboard {
        email: Option<String>,
        todos: Vec<Todo>,
        show_auth_controls: bool,
    },
}

impl PageView {
    pub fn from_context(ctx: &PageContext, mode: AuthMode) -> Self {
        match mode {
            AuthMode::Required if !ctx.is_authenticated => PageView::SignInPrompt,
            AuthMode::Required => PageView::Dashboard {
                email: ctx.email.clone(),
                todos: ctx.todos.clone(),
                show_auth_controls: true,
            },
            AuthMode::Disabled => PageView::Dashboard {
                email: None,
                todos: ctx.todos.clone(),
                show_auth_controls: false,
            },
        }
    }
}

/// Seed embedded in the server-rendered page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialState {
    pub context: PageContext,
    pub auth_mode: AuthMode,
    /// Provider for the redirect sign-in flow
    pub sign_in_provider: String,
    /// Platform outputs document for configuring the browser SDK
    #[serde(default)]
    pub platform_config: serde_json::Value,
    /// Whether to mount the AI conversation widget
    #[serde(default)]
    pub conversation: Option<String>,
}

impl InitialState {
    /// Serialize for embedding inside a `<script>` element. `<` is escaped so
    /// todo content cannot close the element.
    pub fn to_script_json(&self) -> Result<String, serde_json::Error> {
        Ok(serde_json::to_string(self)?.replace('<', "\\u003c"))
    }
}
