use reqwest::Url;
use rooster_core::AppConfig;

use crate::client::resolve_path;
use crate::error::PortalError;

/// Everything the portal pipeline needs, validated once at construction.
#[derive(Clone)]
pub struct PortalConfig {
    pub origin: Url,
    pub login_path: String,
    pub roster_path: String,
    /// Name of the cookie that carries the portal session.
    pub session_cookie: String,
    pub session_token: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub user_agent: String,
}

impl std::fmt::Debug for PortalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalConfig")
            .field("origin", &self.origin.as_str())
            .field("login_path", &self.login_path)
            .field("roster_path", &self.roster_path)
            .field("session_cookie", &self.session_cookie)
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "[redacted]"),
            )
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl PortalConfig {
    /// Builds a portal configuration from application settings.
    ///
    /// # Errors
    ///
    /// - [`PortalError::ConfigMissing`] if the roster path is absent, if the
    ///   login or roster path is not origin-relative, or if neither a session
    ///   token nor a complete username/password pair is set.
    /// - [`PortalError::InvalidUrl`] if the origin is not an absolute URL.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, PortalError> {
        let roster_path = config.roster_path.clone().ok_or_else(|| {
            PortalError::ConfigMissing("roster path (ROOSTER_ROSTER_PATH)".to_string())
        })?;

        let origin = parse_origin(&config.portal_origin)?;
        for (var, path) in [
            ("ROOSTER_LOGIN_PATH", config.login_path.as_str()),
            ("ROOSTER_ROSTER_PATH", roster_path.as_str()),
        ] {
            resolve_path(&origin, path).map_err(|e| {
                PortalError::ConfigMissing(format!("usable {var} (got \"{path}\"): {e}"))
            })?;
        }

        let portal = Self {
            origin,
            login_path: config.login_path.clone(),
            roster_path,
            session_cookie: config.session_cookie.clone(),
            session_token: config.session_token.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            user_agent: config.user_agent.clone(),
        };

        if portal.session_token.is_none() && !portal.has_login_credentials() {
            return Err(PortalError::ConfigMissing(
                "either a session token (ROOSTER_SESSION_TOKEN) or ROOSTER_USERNAME and ROOSTER_PASSWORD"
                    .to_string(),
            ));
        }

        Ok(portal)
    }

    /// `true` when both a username and a password are configured.
    #[must_use]
    pub fn has_login_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// Path of the credential submission endpoint: the login path without a
    /// trailing slash, followed by `/authenticate`.
    #[must_use]
    pub fn authenticate_path(&self) -> String {
        format!("{}/authenticate", self.login_path.trim_end_matches('/'))
    }
}

/// Parses the portal origin, keeping only scheme, host, and port.
///
/// # Errors
///
/// Returns [`PortalError::InvalidUrl`] when `raw` is not an absolute URL with a host.
pub fn parse_origin(raw: &str) -> Result<Url, PortalError> {
    let url = Url::parse(raw).map_err(|e| PortalError::InvalidUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })?;
    if url.host_str().is_none() {
        return Err(PortalError::InvalidUrl {
            url: raw.to_owned(),
            reason: "origin has no host".to_string(),
        });
    }
    let origin = url.origin().ascii_serialization();
    Url::parse(&origin).map_err(|e| PortalError::InvalidUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })
}
