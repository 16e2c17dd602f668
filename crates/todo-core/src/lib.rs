//! Todo Core
//!
//! Layered like the rest of the workspace:
//! - domain: entities and error types
//! - backend: data API, change stream and identity contracts
//! - subscription / session: stream handles and request-scoped sessions
//! - bootstrap / page: server-side first frame
//! - form / list / auth: client-side state machines

pub mod auth;
pub mod backend;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod form;
pub mod list;
pub mod page;
pub mod session;
pub mod subscription;

pub use auth::{AuthMode, AuthPhase};
pub use backend::{IdentityProvider, ListResult, TodoBackend, TodoChanges};
pub use bootstrap::{bootstrap, PageContext};
pub use config::BackendConfig;
pub use domain::{
    AuthError, AuthUser, BackendError, BackendResult, NewTodo, Todo, TodoId, UserAttributes,
    UserProfile,
};
pub use form::{PendingTodo, TodoFormState};
pub use list::{ListView, TodoListState, EMPTY_LIST_MESSAGE};
pub use page::{InitialState, PageView};
pub use session::{CookieJar, RequestSession};
pub use subscription::{CancelHandle, SnapshotEvent, Subscription, SubscriptionSlot};
