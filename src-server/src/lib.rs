//! Page server for the todo app: resolves the caller, fetches the first
//! frame's todos and serves the frontend bundle.

pub mod config;
pub mod data_api;
pub mod error;
pub mod identity;
pub mod logging;
pub mod render;
pub mod routes;

use std::sync::Arc;

use todo_core::backend::memory::MemoryBackend;
use todo_core::{BackendConfig, IdentityProvider};

use crate::config::{BackendKind, ServerConfig};
use crate::data_api::DataApiClient;
use crate::error::ServerError;
use crate::identity::{CookieIdentity, NoIdentity};
use crate::routes::{AppState, DataSource};

pub use routes::build_router;

/// Wire the identity provider and data source for a loaded configuration
pub fn build_state(
    config: &ServerConfig,
    outputs: Option<BackendConfig>,
) -> Result<AppState, ServerError> {
    let http = reqwest::Client::builder().build()?;

    let identity: Arc<dyn IdentityProvider> = match outputs.as_ref().and_then(|o| o.auth.as_ref()) {
        Some(auth) => Arc::new(CookieIdentity::new(auth, http.clone())),
        None => {
            log::warn!("no auth section in backend outputs, every caller is signed out");
            Arc::new(NoIdentity)
        }
    };

    let data = match (config.backend, outputs.as_ref()) {
        (BackendKind::Memory, _) => DataSource::Memory(MemoryBackend::new()),
        (BackendKind::Http, Some(outputs)) => {
            DataSource::Http(DataApiClient::new(&outputs.data, http))
        }
        (BackendKind::Http, None) => {
            return Err(ServerError::Setting {
                name: "TODO_BACKEND",
                message: "http backend needs a backend outputs document".to_string(),
            })
        }
    };

    Ok(AppState {
        identity,
        data,
        mode: config.auth_mode,
        sign_in_provider: outputs
            .as_ref()
            .map(|o| o.sign_in_provider().to_string())
            .unwrap_or_else(|| todo_core::config::DEFAULT_SIGN_IN_PROVIDER.to_string()),
        platform_config: outputs.map(|o| o.raw).unwrap_or_default(),
        conversation: config.conversation.clone(),
        static_dir: config.static_dir.clone(),
    })
}

/// Serve until the process is stopped
pub async fn run(config: ServerConfig, state: AppState) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind_addr.to_string(),
            source,
        })?;
    tracing::info!("listening on http://{}", config.bind_addr);
    axum::serve(listener, build_router(Arc::new(state)))
        .await
        .map_err(ServerError::Serve)
}
