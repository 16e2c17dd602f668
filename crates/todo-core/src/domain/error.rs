//! Error taxonomy for backend and identity calls.
//!
//! None of these are fatal to rendering: callers catch them at the boundary,
//! log them, and fall back to a degraded but consistent state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a data API call (create, delete, list or the change stream)
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(String),
    #[error("not authorized: {0}")]
    Unauthorized(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("rejected by backend: {message}")]
    Rejected { message: String },
    #[error("could not decode backend payload: {0}")]
    Decode(String),
    #[error("subscription error: {0}")]
    Subscription(String),
}

impl BackendError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

/// Failure to resolve the caller's identity.
///
/// `NoSession` is the normal logged-out outcome, not a fault.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum AuthError {
    #[error("no active session")]
    NoSession,
    #[error("session expired")]
    Expired,
    #[error("identity provider error: {0}")]
    Provider(String),
}

pub type BackendResult<T> = Result<T, BackendError>;
