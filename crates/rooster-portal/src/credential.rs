//! Session credentials and `Set-Cookie` handling.
//!
//! The portal authenticates requests purely by cookie, so a credential is an
//! ordered set of `name=value` pairs. Attributes such as `Path` or `HttpOnly`
//! are dropped: only the first `;`-separated segment of each `Set-Cookie`
//! header is meaningful for echoing back in a `Cookie` request header.

use reqwest::header::{HeaderMap, SET_COOKIE};

/// Where a [`SessionCredential`] came from. Decides whether a stale session
/// may be refreshed by logging in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// A pre-issued token supplied through configuration.
    Injected,
    /// Issued by the portal during a login handshake.
    Login,
}

/// Cookie set presented to the portal. At most one value per name; the set is
/// never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCredential {
    cookies: Vec<(String, String)>,
    source: CredentialSource,
}

impl SessionCredential {
    /// Wraps a pre-issued session token as a single cookie.
    #[must_use]
    pub fn injected(cookie_name: &str, token: &str) -> Self {
        Self {
            cookies: vec![(cookie_name.to_owned(), token.to_owned())],
            source: CredentialSource::Injected,
        }
    }

    /// Merges two cookie jars collected during login.
    ///
    /// Names keep the position of their first appearance; a value from
    /// `later` replaces the `initial` value for the same name.
    #[must_use]
    pub fn from_login(initial: Vec<(String, String)>, later: Vec<(String, String)>) -> Self {
        let mut cookies: Vec<(String, String)> = Vec::with_capacity(initial.len() + later.len());
        for (name, value) in initial.into_iter().chain(later) {
            if let Some(existing) = cookies.iter_mut().find(|(n, _)| *n == name) {
                existing.1 = value;
            } else {
                cookies.push((name, value));
            }
        }
        Self {
            cookies,
            source: CredentialSource::Login,
        }
    }

    #[must_use]
    pub fn source(&self) -> CredentialSource {
        self.source
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[must_use]
    pub fn cookies(&self) -> &[(String, String)] {
        &self.cookies
    }

    /// Renders the credential as a `Cookie` request header value.
    #[must_use]
    pub fn cookie_header(&self) -> String {
        render_cookie_header(&self.cookies)
    }
}

/// Renders `name=value` pairs joined by `"; "`.
#[must_use]
pub fn render_cookie_header(cookies: &[(String, String)]) -> String {
    cookies
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Collects `name=value` pairs from every `Set-Cookie` header in `headers`,
/// in header order.
#[must_use]
pub fn parse_set_cookie(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(parse_set_cookie_value)
        .collect()
}

/// Extracts the `name=value` pair from one `Set-Cookie` header value.
///
/// Returns `None` when the leading segment has no `=` or an empty name.
#[must_use]
pub fn parse_set_cookie_value(raw: &str) -> Option<(String, String)> {
    let pair = raw.split(';').next()?.trim();
    let (name, value) = pair.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_owned(), value.trim().to_owned()))
}
