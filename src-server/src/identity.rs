//! Cookie Session Identity
//!
//! Resolves the caller of a page request from the tokens the browser SDK
//! keeps in cookies. The current user comes from the id token's claims; the
//! profile attributes are fetched from the user pool with the access token.
//! Token signatures are checked by the platform on every data call, so the
//! claims here only pick between the signed-in and signed-out first frame.

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;

use todo_core::config::AuthConfig;
use todo_core::{AuthError, AuthUser, CookieJar, IdentityProvider, RequestSession, UserAttributes};

/// Cookie name prefix used by the browser SDK
const COOKIE_PREFIX: &str = "CognitoIdentityServiceProvider";
const GET_USER_TARGET: &str = "AWSCognitoIdentityProviderService.GetUser";

pub struct CookieIdentity {
    client_id: String,
    endpoint: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    exp: i64,
    #[serde(rename = "cognito:username")]
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetUserResponse {
    #[serde(default)]
    user_attributes: Vec<AttributeType>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AttributeType {
    name: String,
    value: Option<String>,
}

impl CookieIdentity {
    pub fn new(auth: &AuthConfig, http: reqwest::Client) -> Self {
        Self {
            client_id: auth.user_pool_client_id.clone(),
            endpoint: format!("https://cognito-idp.{}.amazonaws.com/", auth.aws_region),
            http,
        }
    }

    /// Point attribute lookups at another endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn cookie_name(&self, suffix: &str) -> String {
        format!("{COOKIE_PREFIX}.{}.{suffix}", self.client_id)
    }
}

fn decode_claims(token: &str) -> Result<IdTokenClaims, AuthError> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| AuthError::Provider("malformed id token".to_string()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| AuthError::Provider(format!("id token payload: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| AuthError::Provider(format!("id token claims: {e}")))
}

#[async_trait]
impl IdentityProvider for CookieIdentity {
    fn open_session(&self, cookies: &CookieJar) -> RequestSession {
        let Some(username) = cookies.get(&self.cookie_name("LastAuthUser")) else {
            return RequestSession::anonymous();
        };
        let token = |kind: &str| {
            cookies
                .get(&self.cookie_name(&format!("{username}.{kind}")))
                .map(str::to_string)
        };
        RequestSession {
            username: Some(username.to_string()),
            id_token: token("idToken"),
            access_token: token("accessToken"),
        }
    }

    async fn current_user(&self, session: &RequestSession) -> Result<AuthUser, AuthError> {
        let token = session.id_token.as_deref().ok_or(AuthError::NoSession)?;
        let claims = decode_claims(token)?;
        if claims.exp <= chrono::Utc::now().timestamp() {
            return Err(AuthError::Expired);
        }
        let username = claims
            .username
            .or_else(|| session.username.clone())
            .unwrap_or_else(|| claims.sub.clone());
        Ok(AuthUser {
            user_id: claims.sub,
            username,
        })
    }

    async fn fetch_user_attributes(
        &self,
        session: &RequestSession,
    ) -> Result<UserAttributes, AuthError> {
        let token = session.access_token.as_deref().ok_or(AuthError::NoSession)?;
        let response = self
            .http
            .post(&self.endpoint)
            .header("X-Amz-Target", GET_USER_TARGET)
            .header("Content-Type", "application/x-amz-json-1.1")
            .body(json!({ "AccessToken": token }).to_string())
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if body.contains("NotAuthorizedException") {
                return Err(AuthError::Expired);
            }
            return Err(AuthError::Provider(format!("GetUser returned {status}")));
        }

        let user: GetUserResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Provider(format!("GetUser payload: {e}")))?;
        let email = user
            .user_attributes
            .into_iter()
            .find(|attr| attr.name == "email")
            .and_then(|attr| attr.value);
        Ok(UserAttributes { email })
    }
}

/// Identity for deployments without a user pool: nobody is ever signed in
pub struct NoIdentity;

#[async_trait]
impl IdentityProvider for NoIdentity {
    fn open_session(&self, _cookies: &CookieJar) -> RequestSession {
        RequestSession::anonymous()
    }

    async fn current_user(&self, _session: &RequestSession) -> Result<AuthUser, AuthError> {
        Err(AuthError::NoSession)
    }

    async fn fetch_user_attributes(
        &self,
        _session: &RequestSession,
    ) -> Result<UserAttributes, AuthError> {
        Err(AuthError::NoSession)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with(claims: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.sig")
    }

    fn auth_config() -> AuthConfig {
        AuthConfig {
            aws_region: "eu-west-1".into(),
            user_pool_id: "eu-west-1_pool".into(),
            user_pool_client_id: "client".into(),
            oauth: None,
        }
    }

    fn identity(endpoint: &str) -> CookieIdentity {
        CookieIdentity::new(&auth_config(), reqwest::Client::new()).with_endpoint(endpoint)
    }

    fn session(id_token: Option<String>, access_token: Option<&str>) -> RequestSession {
        RequestSession {
            username: Some("alice".into()),
            id_token,
            access_token: access_token.map(str::to_string),
        }
    }

    #[test]
    fn test_open_session_reads_sdk_cookies() {
        let jar = CookieJar::new()
            .with("CognitoIdentityServiceProvider.client.LastAuthUser", "alice")
            .with("CognitoIdentityServiceProvider.client.alice.idToken", "id")
            .with("CognitoIdentityServiceProvider.client.alice.accessToken", "access");
        let session = identity("http://unused").open_session(&jar);
        assert_eq!(session.username.as_deref(), Some("alice"));
        assert_eq!(session.id_token.as_deref(), Some("id"));
        assert_eq!(session.access_token.as_deref(), Some("access"));
    }

    #[test]
    fn test_open_session_without_cookies_is_anonymous() {
        let session = identity("http://unused").open_session(&CookieJar::new());
        assert_eq!(session, RequestSession::anonymous());
    }

    #[tokio::test]
    async fn test_current_user_from_valid_token() {
        let exp = chrono::Utc::now().timestamp() + 3600;
        let token = token_with(json!({ "sub": "u-1", "exp": exp, "cognito:username": "alice" }));
        let user = identity("http://unused")
            .current_user(&session(Some(token), None))
            .await
            .unwrap();
        assert_eq!(user.user_id, "u-1");
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn test_expired_or_missing_token() {
        let id = identity("http://unused");
        let expired = token_with(json!({ "sub": "u-1", "exp": 1 }));
        assert_eq!(
            id.current_user(&session(Some(expired), None)).await.unwrap_err(),
            AuthError::Expired
        );
        assert_eq!(
            id.current_user(&session(None, None)).await.unwrap_err(),
            AuthError::NoSession
        );
        assert!(matches!(
            id.current_user(&session(Some("garbage".into()), None)).await,
            Err(AuthError::Provider(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_user_attributes_extracts_email() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("x-amz-target", GET_USER_TARGET)
            .with_status(200)
            .with_body(
                r#"{"Username":"alice","UserAttributes":[{"Name":"sub","Value":"u-1"},{"Name":"email","Value":"alice@example.com"}]}"#,
            )
            .create_async()
            .await;

        let attrs = identity(&format!("{}/", server.url()))
            .fetch_user_attributes(&session(None, Some("access")))
            .await
            .unwrap();
        assert_eq!(attrs.email.as_deref(), Some("alice@example.com"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_revoked_access_token_is_expired() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(400)
            .with_body(r#"{"__type":"NotAuthorizedException","message":"Access Token has been revoked"}"#)
            .create_async()
            .await;

        let err = identity(&format!("{}/", server.url()))
            .fetch_user_attributes(&session(None, Some("access")))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::Expired);
    }
}
