//! Identity values resolved by the authentication provider.

use serde::{Deserialize, Serialize};

/// The signed-in user as reported by the provider's "current user" call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub user_id: String,
    pub username: String,
}

/// Profile attributes; every attribute may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAttributes {
    #[serde(default)]
    pub email: Option<String>,
}

/// What the UI knows about a signed-in caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserProfile {
    pub fn from_parts(user: AuthUser, attributes: UserAttributes) -> Self {
        Self {
            user_id: user.user_id,
            email: attributes.email,
        }
    }
}
