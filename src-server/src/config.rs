//! Server Configuration
//!
//! Settings come from the environment; the platform outputs document is read
//! from disk once at startup.

use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use todo_core::{AuthMode, BackendConfig};

use crate::error::ServerError;

pub const DEFAULT_OUTPUTS_PATH: &str = "amplify_outputs.json";
pub const DEFAULT_STATIC_DIR: &str = "dist";

/// Where todos are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// The managed data API from the outputs document
    Http,
    /// Process-local store for development
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub outputs_path: PathBuf,
    pub static_dir: PathBuf,
    pub auth_mode: AuthMode,
    pub backend: BackendKind,
    /// Name of the conversation route for the chat widget, if enabled
    pub conversation: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            outputs_path: PathBuf::from(DEFAULT_OUTPUTS_PATH),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            auth_mode: AuthMode::Required,
            backend: BackendKind::Http,
            conversation: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source, so tests need not touch the process env
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServerError> {
        let mut config = Self::default();

        if let Some(addr) = lookup("TODO_BIND_ADDR") {
            config.bind_addr = addr.parse().map_err(|e| ServerError::Setting {
                name: "TODO_BIND_ADDR",
                message: format!("{e}"),
            })?;
        }
        if let Some(path) = lookup("TODO_OUTPUTS_PATH") {
            config.outputs_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("TODO_STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(mode) = lookup("TODO_AUTH_MODE") {
            config.auth_mode = mode.parse().map_err(|message| ServerError::Setting {
                name: "TODO_AUTH_MODE",
                message,
            })?;
        }
        if let Some(kind) = lookup("TODO_BACKEND") {
            config.backend = match kind.trim().to_ascii_lowercase().as_str() {
                "http" => BackendKind::Http,
                "memory" => BackendKind::Memory,
                other => {
                    return Err(ServerError::Setting {
                        name: "TODO_BACKEND",
                        message: format!("expected http or memory, got {other}"),
                    })
                }
            };
        }
        config.conversation = lookup("TODO_CONVERSATION").filter(|name| !name.trim().is_empty());

        Ok(config)
    }
}

/// Read and parse the platform outputs document
pub fn load_backend_config(path: &Path) -> Result<BackendConfig, ServerError> {
    let json = std::fs::read_to_string(path).map_err(|source| ServerError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    BackendConfig::from_json_str(&json).map_err(|source| ServerError::ParseConfig {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.auth_mode, AuthMode::Required);
        assert_eq!(config.backend, BackendKind::Http);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("TODO_BIND_ADDR", "0.0.0.0:8080"),
            ("TODO_AUTH_MODE", "disabled"),
            ("TODO_BACKEND", "memory"),
            ("TODO_CONVERSATION", "chat"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.auth_mode, AuthMode::Disabled);
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.conversation.as_deref(), Some("chat"));
    }

    #[test]
    fn test_bad_values_are_rejected() {
        assert!(ServerConfig::from_lookup(lookup(&[("TODO_BACKEND", "sqlite")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("TODO_AUTH_MODE", "sometimes")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("TODO_BIND_ADDR", "nowhere")])).is_err());
    }

    #[test]
    fn test_load_backend_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"data":{{"url":"https://api.example.com/graphql","aws_region":"us-east-1"}}}}"#
        )
        .unwrap();
        let config = load_backend_config(file.path()).unwrap();
        assert_eq!(config.data.aws_region, "us-east-1");
    }

    #[test]
    fn test_missing_outputs_file() {
        let err = load_backend_config(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ServerError::ReadConfig { .. }));
    }
}
