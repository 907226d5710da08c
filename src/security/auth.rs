//! Bearer token authentication.

use axum::http::{header::AUTHORIZATION, HeaderMap};

/// Checks the presented bearer credential against the configured token.
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    token: Option<String>,
}

impl Authenticator {
    /// An empty token is treated as no token: authentication disabled.
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.token.is_some()
    }

    pub fn verify(&self, presented: Option<&str>) -> bool {
        verify(self.token.as_deref(), presented)
    }
}

/// `true` when no token is configured, or when `presented` equals it.
pub fn verify(configured: Option<&str>, presented: Option<&str>) -> bool {
    match configured.filter(|t| !t.is_empty()) {
        None => true,
        Some(expected) => {
            presented.is_some_and(|p| constant_time_eq(expected.as_bytes(), p.as_bytes()))
        }
    }
}

/// Credential from `Authorization: Bearer <token>`. Any other shape is `None`.
pub fn bearer_credential(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, credential) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let credential = credential.trim();
    (!credential.is_empty()).then_some(credential)
}

/// Compare without short-circuiting on the first differing byte.
/// Length is not hidden.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
