//! Request-Scoped Sessions
//!
//! A session is opened fresh for every incoming page request from its cookie
//! jar and dropped when the request completes. Cookie names and token formats
//! belong to the identity provider; this module only carries them.

use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;

/// Cookies of one request, keyed by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    cookies: BTreeMap<String, String>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one or more `Cookie` header values (`a=1; b=2`).
    ///
    /// Malformed pairs are skipped; values are percent-decoded.
    pub fn from_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut jar = Self::new();
        for header in headers {
            for pair in header.split(';') {
                let Some((name, value)) = pair.split_once('=') else {
                    continue;
                };
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                let value = value.trim().trim_matches('"');
                let value = percent_decode_str(value).decode_utf8_lossy().into_owned();
                jar.cookies.insert(name.to_string(), value);
            }
        }
        jar
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }
}

/// Credentials extracted from a cookie jar by an identity provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSession {
    pub username: Option<String>,
    pub id_token: Option<String>,
    pub access_token: Option<String>,
}

impl RequestSession {
    /// A session with no credentials at all
    pub fn anonymous() -> Self {
        Self::default()
    }}
