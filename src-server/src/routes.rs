//! HTTP routes of the page server.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use percent_encoding::percent_decode_str;

use todo_core::backend::memory::MemoryBackend;
use todo_core::{
    bootstrap, AuthMode, BackendResult, CookieJar, IdentityProvider, InitialState, ListResult,
    NewTodo, PageView, RequestSession, Todo, TodoBackend, TodoId,
};

use crate::data_api::{DataApiClient, ScopedDataApi};
use crate::render::render_page;

/// Where the bootstrapper lists todos from
#[derive(Clone)]
pub enum DataSource {
    Http(DataApiClient),
    Memory(MemoryBackend),
}

/// A data source bound to one request's session
pub enum RequestBackend<'a> {
    Http(ScopedDataApi<'a>),
    Memory(MemoryBackend),
}

impl DataSource {
    pub fn for_session(&self, session: &RequestSession) -> RequestBackend<'_> {
        match self {
            DataSource::Http(client) => RequestBackend::Http(client.scoped(session)),
            DataSource::Memory(backend) => RequestBackend::Memory(backend.clone()),
        }
    }
}

#[async_trait]
impl<'a> TodoBackend for RequestBackend<'a> {
    async fn create(&self, todo: NewTodo) -> BackendResult<Todo> {
        match self {
            RequestBackend::Http(api) => api.create(todo).await,
            RequestBackend::Memory(backend) => backend.create(todo).await,
        }
    }

    async fn delete(&self, id: &TodoId) -> BackendResult<()> {
        match self {
            RequestBackend::Http(api) => api.delete(id).await,
            RequestBackend::Memory(backend) => backend.delete(id).await,
        }
    }

    async fn list(&self) -> BackendResult<ListResult> {
        match self {
            RequestBackend::Http(api) => api.list().await,
            RequestBackend::Memory(backend) => backend.list().await,
        }
    }
}

pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub data: DataSource,
    pub mode: AuthMode,
    pub sign_in_provider: String,
    /// Outputs document handed to the browser SDK
    pub platform_config: serde_json::Value,
    pub conversation: Option<String>,
    pub static_dir: PathBuf,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/pkg/*path", get(static_asset))
        .with_state(state)
}

async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let cookies = CookieJar::from_headers(
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok()),
    );

    let context = bootstrap(state.identity.as_ref(), &cookies, state.mode, |session| {
        state.data.for_session(session)
    })
    .await;
    tracing::info!(
        authenticated = context.is_authenticated,
        todos = context.todos.len(),
        "rendering page"
    );

    let view = PageView::from_context(&context, state.mode);
    let seed = InitialState {
        context,
        auth_mode: state.mode,
        sign_in_provider: state.sign_in_provider.clone(),
        platform_config: state.platform_config.clone(),
        conversation: state.conversation.clone(),
    };

    match render_page(&view, &seed) {
        // Per-user content
        Ok(html) => ([(header::CACHE_CONTROL, "no-store")], Html(html)).into_response(),
        Err(e) => {
            tracing::error!("failed to serialize page seed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn healthz() -> &'static str {
    "ok"
}

/// Resolve a `/pkg/...` request path inside the static directory
fn asset_path(static_dir: &Path, uri_path: &str) -> Option<PathBuf> {
    let relative = uri_path.strip_prefix("/pkg/")?;
    let relative = percent_decode_str(relative).decode_utf8_lossy().to_string();
    let relative = Path::new(&relative);
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(static_dir.join(relative))
}

async fn static_asset(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let Some(path) = asset_path(&state.static_dir, uri.path()) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match tokio::fs::read(&path).await {
        Ok(content) => {
            let mime_type = mime_guess::from_path(&path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime_type.to_string())], content).into_response()
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::error!("failed to read asset {}: {e}", path.display());
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
