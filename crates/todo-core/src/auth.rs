//! Client-Side Auth State Machine
//!
//! `Unknown -> CheckingAuth -> Authenticated | Unauthenticated`.
//! Leaving for the provider's redirect login and coming back reloads the
//! page, which starts the machine again from `Unknown`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{AuthError, UserProfile};

/// Whether the page requires a signed-in caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[default]
    Required,
    Disabled,
}

impl FromStr for AuthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "required" | "on" | "true" => Ok(AuthMode::Required),
            "disabled" | "off" | "false" => Ok(AuthMode::Disabled),
            other => Err(format!("unknown auth mode: {other}")),
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::Required => f.write_str("required"),
            AuthMode::Disabled => f.write_str("disabled"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthPhase {
    #[default]
    Unknown,
    CheckingAuth,
    Authenticated(UserProfile),
    Unauthenticated,
}

impl AuthPhase {
    /// Mount-time auth check started
    pub fn begin_check(&mut self) {
        *self = AuthPhase::CheckingAuth;
    }

    /// Auth check finished. Any failure, including provider errors, is the
    /// plain signed-out state.
    pub fn resolve(&mut self, outcome: Result<UserProfile, AuthError>) {
        *self = match outcome {
            Ok(profile) => AuthPhase::Authenticated(profile),
            Err(err) => {
                if err != AuthError::NoSession {
                    log::warn!("auth check failed: {err}");
                }
                AuthPhase::Unauthenticated
            }
        };
    }

    pub fn signed_out(&mut self) {
        *self = AuthPhase::Unauthenticated;
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AuthPhase::Unknown | AuthPhase::CheckingAuth)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthPhase::Authenticated(_))
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            AuthPhase::Authenticated(profile) => Some(profile),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            user_id: "u1".into(),
            email: Some("a@example.com".into()),
        }
    }

    #[test]
    fn test_check_then_authenticated() {
        let mut phase = AuthPhase::default();
        assert!(phase.is_loading());
        phase.begin_check();
        assert!(phase.is_loading());
        phase.resolve(Ok(profile()));
        assert!(!phase.is_loading());
        assert_eq!(phase.profile().and_then(|p| p.email.as_deref()), Some("a@example.com"));
    }

    #[test]
    fn test_any_failure_is_unauthenticated() {
        for err in [AuthError::NoSession, AuthError::Expired, AuthError::Provider("x".into())] {
            let mut phase = AuthPhase::CheckingAuth;
            phase.resolve(Err(err));
            assert_eq!(phase, AuthPhase::Unauthenticated);
            assert!(!phase.is_loading());
        }
    }

    #[test]
    fn test_auth_mode_parse() {
        assert_eq!("Disabled".parse::<AuthMode>().unwrap(), AuthMode::Disabled);
        assert_eq!("required".parse::<AuthMode>().unwrap(), AuthMode::Required);
        assert!("maybe".parse::<AuthMode>().is_err());
    }
}
