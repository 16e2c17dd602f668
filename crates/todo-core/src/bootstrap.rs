//! Server Context Bootstrapper
//!
//! Runs once per server-rendered page load. Resolves the caller from the
//! request's cookies and, only for a signed-in caller, fetches the initial
//! todo collection. Never fails: every error path lands on a well-defined
//! signed-out or empty state.

use serde::{Deserialize, Serialize};

use crate::auth::AuthMode;
use crate::backend::{IdentityProvider, TodoBackend};
use crate::domain::{AuthError, Todo, UserProfile};
use crate::session::{CookieJar, RequestSession};

/// Everything the first frame needs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    pub is_authenticated: bool,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub todos: Vec<Todo>,
}

impl PageContext {
    pub fn signed_out() -> Self {
        Self::default()
    }
}

async fn resolve_profile<I>(identity: &I, session: &RequestSession) -> Result<UserProfile, AuthError>
where
    I: IdentityProvider + ?Sized,
{
    let user = identity.current_user(session).await?;
    let attributes = identity.fetch_user_attributes(session).await?;
    Ok(UserProfile::from_parts(user, attributes))
}

/// Build the page context for one request.
///
/// `backend_for` binds the data API to the request's session, so the list
/// call runs with the caller's own credentials.
pub async fn bootstrap<I, B, F>(
    identity: &I,
    cookies: &CookieJar,
    mode: AuthMode,
    backend_for: F,
) -> PageContext
where
    I: IdentityProvider + ?Sized,
    B: TodoBackend,
    F: FnOnce(&RequestSession) -> B,
{
    let session = match mode {
        AuthMode::Disabled => RequestSession::anonymous(),
        AuthMode::Required => identity.open_session(cookies),
    };

    let email = match mode {
        AuthMode::Disabled => None,
        AuthMode::Required => match resolve_profile(identity, &session).await {
            Ok(profile) => profile.email,
            Err(AuthError::NoSession) => return PageContext::signed_out(),
            Err(err) => {
                log::info!("treating caller as signed out: {err}");
                return PageContext::signed_out();
            }
        },
    };

    let backend = backend_for(&session);
    match backend.list().await {
        Ok(result) => {
            if result.is_partial() {
                for err in &result.errors {
                    log::error!("error fetching todos: {err}");
                }
            }
            PageContext {
                is_authenticated: true,
                email,
                todos: result.items,
            }
        }
        Err(err) => {
            log::error!("fetching todos failed: {err}");
            match mode {
                // Fail closed
                AuthMode::Required => PageContext::signed_out(),
                AuthMode::Disabled => PageContext {
                    is_authenticated: true,
                    email: None,
                    todos: Vec::new(),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;
    use crate::domain::{AuthUser, UserAttributes};
    use async_trait::async_trait;

    /// Identity that answers from a fixed script
    struct ScriptedIdentity {
        user: Result<AuthUser, AuthError>,
        attributes: Result<UserAttributes, AuthError>,
    }

    impl ScriptedIdentity {
        fn signed_in(email: Option<&str>) -> Self {
            Self {
                user: Ok(AuthUser {
                    user_id: "u1".into(),
                    username: "alice".into(),
                }),
                attributes: Ok(UserAttributes {
                    email: email.map(str::to_string),
                }),
            }
        }

        fn failing(err: AuthError) -> Self {
            Self {
                user: Err(err.clone()),
                attributes: Err(err),
            }
        }
    }

    #[async_trait]
    impl IdentityProvider for ScriptedIdentity {
        fn open_session(&self, cookies: &CookieJar) -> RequestSession {
            RequestSession {
                username: cookies.get("user").map(str::to_string),
                ..RequestSession::default()
            }
        }

        async fn current_user(&self, _session: &RequestSession) -> Result<AuthUser, AuthError> {
            self.user.clone()
        }

        async fn fetch_user_attributes(
            &self,
            _session: &RequestSession,
        ) -> Result<UserAttributes, AuthError> {
            self.attributes.clone()
        }
    }

    #[tokio::test]
    async fn test_signed_in_caller_gets_email_and_todos() {
        let backend = MemoryBackend::with_todos(["Buy milk"]);
        let identity = ScriptedIdentity::signed_in(Some("alice@example.com"));

        let ctx = bootstrap(&identity, &CookieJar::new(), AuthMode::Required, |_| backend.clone()).await;
        assert!(ctx.is_authenticated);
        assert_eq!(ctx.email.as_deref(), Some("alice@example.com"));
        assert_eq!(ctx.todos.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_email_is_still_signed_in() {
        let backend = MemoryBackend::new();
        let identity = ScriptedIdentity::signed_in(None);
        let ctx = bootstrap(&identity, &CookieJar::new(), AuthMode::Required, |_| backend.clone()).await;
        assert!(ctx.is_authenticated);
        assert!(ctx.email.is_none());
    }

    #[tokio::test]
    async fn test_unauthenticated_request_makes_no_list_call() {
        let backend = MemoryBackend::with_todos(["secret"]);
        for err in [AuthError::NoSession, AuthError::Expired, AuthError::Provider("down".into())] {
            let identity = ScriptedIdentity::failing(err);
            let ctx = bootstrap(&identity, &CookieJar::new(), AuthMode::Required, |_| backend.clone()).await;
            assert_eq!(ctx, PageContext::signed_out());
        }
        assert_eq!(backend.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_returned_data() {
        let backend = MemoryBackend::with_todos(["a", "b"]);
        backend.partial_lists(true);
        let identity = ScriptedIdentity::signed_in(None);
        let ctx = bootstrap(&identity, &CookieJar::new(), AuthMode::Required, |_| backend.clone()).await;
        assert!(ctx.is_authenticated);
        assert_eq!(ctx.todos.len(), 2);
    }

    #[tokio::test]
    async fn test_total_list_failure_fails_closed() {
        let backend = MemoryBackend::with_todos(["a"]);
        backend.fail_lists(true);
        let identity = ScriptedIdentity::signed_in(Some("a@example.com"));
        let ctx = bootstrap(&identity, &CookieJar::new(), AuthMode::Required, |_| backend.clone()).await;
        assert_eq!(ctx, PageContext::signed_out());
    }

    #[tokio::test]
    async fn test_disabled_mode_lists_without_identity() {
        let backend = MemoryBackend::with_todos(["a"]);
        let identity = ScriptedIdentity::failing(AuthError::NoSession);
        let ctx = bootstrap(&identity, &CookieJar::new(), AuthMode::Disabled, |_| backend.clone()).await;
        assert!(ctx.is_authenticated);
        assert_eq!(ctx.todos.len(), 1);

        backend.fail_lists(true);
        let ctx = bootstrap(&identity, &CookieJar::new(), AuthMode::Disabled, |_| backend.clone()).await;
        assert!(ctx.todos.is_empty());
    }

    #[tokio::test]
    async fn test_session_is_opened_from_request_cookies() {
        let identity = ScriptedIdentity::signed_in(None);
        let jar = CookieJar::new().with("user", "alice");
        let backend = MemoryBackend::new();
        let mut seen = None;
        bootstrap(&identity, &jar, AuthMode::Required, |session| {
            seen = session.username.clone();
            backend.clone()
        })
        .await;
        assert_eq!(seen.as_deref(), Some("alice"));
    }
}
