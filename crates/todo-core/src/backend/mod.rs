//! Backend Client Adapter
//!
//! Typed contracts over the managed platform: the Todo data API, its change
//! stream, and the identity provider. Implementations are thin pass-throughs;
//! they validate nothing and report every failure as an error value.
//!
//! In the browser the platform SDK hands back `!Send` futures, so the traits
//! only require `Send` on native targets.

use async_trait::async_trait;

use crate::domain::{
    AuthError, AuthUser, BackendError, BackendResult, NewTodo, Todo, TodoId, UserAttributes,
};
use crate::session::{CookieJar, RequestSession};
use crate::subscription::Subscription;

#[cfg(any(test, feature = "memory"))]
pub mod memory;

#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSendSync: Send + Sync {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync + ?Sized> MaybeSendSync for T {}

#[cfg(target_arch = "wasm32")]
pub trait MaybeSendSync {}
#[cfg(target_arch = "wasm32")]
impl<T: ?Sized> MaybeSendSync for T {}

/// Result of a list call.
///
/// The data API can answer with data and errors at the same time; the items
/// are still usable when `errors` is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListResult {
    pub items: Vec<Todo>,
    pub errors: Vec<BackendError>,
}

impl ListResult {
    pub fn ok(items: Vec<Todo>) -> Self {
        Self {
            items,
            errors: Vec::new(),
        }
    }

    pub fn is_partial(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Request/response operations on the Todo collection
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait TodoBackend: MaybeSendSync {
    async fn create(&self, todo: NewTodo) -> BackendResult<Todo>;

    async fn delete(&self, id: &TodoId) -> BackendResult<()>;

    /// `Err` only for total failure; partial failures come back in
    /// [`ListResult::errors`].
    async fn list(&self) -> BackendResult<ListResult>;
}

/// Live change stream of the Todo collection
pub trait TodoChanges {
    /// Open a subscription. Every event is the full current collection.
    /// Opening never fails synchronously; transport errors arrive as events.
    fn subscribe_to_changes(&self) -> Subscription;
}

/// Server-side identity resolution against a request's cookies
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait IdentityProvider: MaybeSendSync {
    /// Open a request-scoped session from the cookie jar
    fn open_session(&self, cookies: &CookieJar) -> RequestSession;

    async fn current_user(&self, session: &RequestSession) -> Result<AuthUser, AuthError>;

    async fn fetch_user_attributes(
        &self,
        session: &RequestSession,
    ) -> Result<UserAttributes, AuthError>;
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl<T: TodoBackend + ?Sized> TodoBackend for std::sync::Arc<T> {
    async fn create(&self, todo: NewTodo) -> BackendResult<Todo> {
        (**self).create(todo).await
    }

    async fn delete(&self, id: &TodoId) -> BackendResult<()> {
        (**self).delete(id).await
    }

    async fn list(&self) -> BackendResult<ListResult> {
        (**self).list().await
    }
}
