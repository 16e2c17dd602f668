//! Todo List State
//!
//! One list value, seeded from the server-rendered first frame and then owned
//! by the change subscription: every snapshot replaces it wholesale. Local
//! deletes remove the row optimistically and are never rolled back by hand;
//! the next snapshot is the authority.

use crate::auth::{AuthMode, AuthPhase};
use crate::domain::{AuthError, Todo, TodoId, UserProfile};
use crate::subscription::SnapshotEvent;

/// Placeholder shown for an empty list
pub const EMPTY_LIST_MESSAGE: &str = "No todos yet. Add one above!";

/// What the list renders, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListView<'a> {
    Loading,
    SignedOut,
    Empty,
    Items(&'a [Todo]),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoListState {
    todos: Vec<Todo>,
    mode: AuthMode,
    auth: AuthPhase,
}

impl TodoListState {
    /// First frame, seeded with the server-fetched todos
    pub fn seeded(initial: Vec<Todo>, mode: AuthMode) -> Self {
        Self {
            todos: initial,
            mode,
            auth: AuthPhase::Unknown,
        }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn auth(&self) -> &AuthPhase {
        &self.auth
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn is_loading(&self) -> bool {
        self.mode == AuthMode::Required && self.auth.is_loading()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.auth.profile()
    }

    /// Whether a change subscription should be open right now
    pub fn can_subscribe(&self) -> bool {
        match self.mode {
            AuthMode::Disabled => true,
            AuthMode::Required => self.auth.is_authenticated(),
        }
    }

    pub fn begin_auth_check(&mut self) {
        self.auth.begin_check();
    }

    pub fn resolve_auth(&mut self, outcome: Result<UserProfile, AuthError>) {
        self.auth.resolve(outcome);
    }

    /// Local half of sign-out: forget the caller and their todos
    pub fn sign_out(&mut self) {
        self.auth.signed_out();
        self.todos.clear();
    }

    /// Replace the list with an authoritative snapshot
    pub fn apply_snapshot(&mut self, snapshot: Vec<Todo>) {
        self.todos = snapshot;
    }

    /// Apply one subscription delivery. Stream errors leave the list as it
    /// is. Returns whether the list was replaced.
    pub fn apply_event(&mut self, event: SnapshotEvent) -> bool {
        match event {
            Ok(snapshot) => {
                self.apply_snapshot(snapshot);
                true
            }
            Err(err) => {
                log::error!("subscription error: {err}");
                false
            }
        }
    }

    /// Optimistically drop a todo before the backend confirms. Returns
    /// whether it was present.
    pub fn remove_optimistic(&mut self, id: &TodoId) -> bool {
        let before = self.todos.len();
        self.todos.retain(|todo| &todo.id != id);
        self.todos.len() != before
    }

    pub fn view(&self) -> ListView<'_> {
        if self.mode == AuthMode::Required {
            if self.auth.is_loading() {
                return ListView::Loading;
            }
            if !self.auth.is_authenticated() {
                return ListView::SignedOut;
            }
        }
        if self.todos.is_empty() {
            ListView::Empty
        } else {
            ListView::Items(&self.todos)
        }
    }
}
