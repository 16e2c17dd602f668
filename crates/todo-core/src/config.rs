//! Backend Configuration
//!
//! The platform's outputs document (endpoint, user pool, region, OAuth
//! settings). Loaded once at process start and otherwise treated as opaque:
//! only the fields the page server and the sign-in control need are typed,
//! the raw document is kept for handing to the browser SDK.

use serde::{Deserialize, Serialize};

/// Identity provider used when the outputs document names none
pub const DEFAULT_SIGN_IN_PROVIDER: &str = "Google";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthConfig {
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub identity_providers: Vec<String>,
    #[serde(default)]
    pub redirect_sign_in_uri: Vec<String>,
    #[serde(default)]
    pub redirect_sign_out_uri: Vec<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    pub aws_region: String,
    pub user_pool_id: String,
    pub user_pool_client_id: String,
    #[serde(default)]
    pub oauth: Option<OAuthConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
    pub url: String,
    pub aws_region: String,
    #[serde(default)]
    pub default_authorization_type: Option<String>,
    /// Present when the API allows key-based access
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub auth: Option<AuthConfig>,
    pub data: DataConfig,
    /// The document exactly as loaded
    #[serde(skip)]
    pub raw: serde_json::Value,
}

impl BackendConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let raw: serde_json::Value = serde_json::from_str(json)?;
        let mut config: BackendConfig = serde_json::from_value(raw.clone())?;
        config.raw = raw;
        Ok(config)
    }

    /// The fixed provider for redirect sign-in
    pub fn sign_in_provider(&self) -> &str {
        self.auth
            .as_ref()
            .and_then(|a| a.oauth.as_ref())
            .and_then(|o| o.identity_providers.first())
            .map(String::as_str)
            .unwrap_or(DEFAULT_SIGN_IN_PROVIDER)
    }
}
