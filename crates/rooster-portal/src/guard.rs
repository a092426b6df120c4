//! Session Validity Guard: fetches the roster page and decides whether it is
//! real roster content, a stale session worth one re-login, or a hard failure.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, COOKIE};
use reqwest::Method;
use rooster_core::Day;

use crate::client::{PortalClient, RawPage};
use crate::config::PortalConfig;
use crate::credential::{CredentialSource, SessionCredential};
use crate::error::{PageDiagnostics, PortalError};
use crate::parse::parse_roster;
use crate::session::{acquire_session, login};

/// Lowercase markers whose presence suggests a login or challenge page.
const LOGIN_MARKERS: [&str; 5] = [
    "inloggen",
    "login",
    "wachtwoord",
    "gebruikersnaam",
    "authenticate",
];

const SNIPPET_CHARS: usize = 1000;

/// Case-insensitive check for any login-page marker in `html`.
#[must_use]
pub fn looks_like_login_page(html: &str) -> bool {
    let lower = html.to_lowercase();
    LOGIN_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// First 1000 characters of `html` with whitespace runs collapsed to one space.
#[must_use]
pub fn snippet(html: &str) -> String {
    let head: String = html.chars().take(SNIPPET_CHARS).collect();
    head.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// What to do with a page that yielded zero days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EmptyPageVerdict {
    Reauthenticate,
    LoginDetected,
    RefreshFailed,
    NoData,
}

/// Classifies an empty page. Pure so the retry policy is testable without HTTP.
pub(crate) fn classify_empty_page(
    is_login_page: bool,
    source: CredentialSource,
    has_fallback_credentials: bool,
    reauthenticated: bool,
) -> EmptyPageVerdict {
    if !is_login_page {
        return EmptyPageVerdict::NoData;
    }
    if reauthenticated {
        return EmptyPageVerdict::RefreshFailed;
    }
    if source == CredentialSource::Injected && has_fallback_credentials {
        EmptyPageVerdict::Reauthenticate
    } else {
        EmptyPageVerdict::LoginDetected
    }
}

enum GuardState {
    Fetching {
        credential: SessionCredential,
        reauthenticated: bool,
    },
    ValidatingPage {
        credential: SessionCredential,
        page: RawPage,
        reauthenticated: bool,
    },
    Reauthenticating {
        diagnostics: PageDiagnostics,
    },
    Done(Vec<Day>),
    Failed(PortalError),
}

/// Runs the full acquire → fetch → validate → parse cycle against the portal.
///
/// Holds no session state between calls: every [`RosterClient::get_roster`]
/// starts from configuration again.
#[derive(Debug, Clone)]
pub struct RosterClient {
    client: PortalClient,
    config: PortalConfig,
}

impl RosterClient {
    /// # Errors
    ///
    /// Returns [`PortalError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: PortalConfig) -> Result<Self, PortalError> {
        let client = PortalClient::new(config.origin.clone(), &config.user_agent)?;
        Ok(Self { client, config })
    }

    /// Retrieves and parses the roster, re-authenticating at most once.
    ///
    /// # Errors
    ///
    /// - Session acquisition errors ([`PortalError::ConfigMissing`],
    ///   [`PortalError::LoginIncomplete`], transport/decode failures).
    /// - [`PortalError::LoginDetected`] when the portal served a login page and
    ///   no re-authentication path exists.
    /// - [`PortalError::SessionRefreshFailed`] when the single re-authentication
    ///   attempt failed or led to another login page.
    /// - [`PortalError::NoData`] when a non-login page contained no day cells.
    pub async fn get_roster(&self) -> Result<Vec<Day>, PortalError> {
        let credential = acquire_session(&self.client, &self.config).await?;
        let mut state = GuardState::Fetching {
            credential,
            reauthenticated: false,
        };

        loop {
            state = match state {
                GuardState::Fetching {
                    credential,
                    reauthenticated,
                } => match self.fetch_page(&credential).await {
                    Ok(page) => GuardState::ValidatingPage {
                        credential,
                        page,
                        reauthenticated,
                    },
                    Err(e) => GuardState::Failed(e),
                },
                GuardState::ValidatingPage {
                    credential,
                    page,
                    reauthenticated,
                } => self.validate(&credential, &page, reauthenticated),
                GuardState::Reauthenticating { diagnostics } => {
                    match self.reauthenticate().await {
                        Ok((credential, page)) => GuardState::ValidatingPage {
                            credential,
                            page,
                            reauthenticated: true,
                        },
                        Err(e) => GuardState::Failed(PortalError::SessionRefreshFailed {
                            message: e.to_string(),
                            diagnostics,
                        }),
                    }
                }
                GuardState::Done(days) => return Ok(days),
                GuardState::Failed(e) => return Err(e),
            };
        }
    }

    fn validate(
        &self,
        credential: &SessionCredential,
        page: &RawPage,
        reauthenticated: bool,
    ) -> GuardState {
        let html = page.text();
        let days = parse_roster(&html);
        if !days.is_empty() {
            tracing::info!(
                days = days.len(),
                reauthenticated,
                "roster page parsed"
            );
            return GuardState::Done(days);
        }

        let is_login_page = looks_like_login_page(&html);
        let diagnostics = PageDiagnostics {
            session_token_present: credential.contains(&self.config.session_cookie),
            snippet: snippet(&html),
        };

        match classify_empty_page(
            is_login_page,
            credential.source(),
            self.config.has_login_credentials(),
            reauthenticated,
        ) {
            EmptyPageVerdict::Reauthenticate => {
                tracing::warn!(
                    status = page.status.as_u16(),
                    "injected session looks expired, logging in once"
                );
                GuardState::Reauthenticating { diagnostics }
            }
            EmptyPageVerdict::LoginDetected => {
                tracing::warn!(status = page.status.as_u16(), "portal returned a login page");
                GuardState::Failed(PortalError::LoginDetected { diagnostics })
            }
            EmptyPageVerdict::RefreshFailed => {
                tracing::warn!("login page returned again after re-authentication");
                GuardState::Failed(PortalError::SessionRefreshFailed {
                    message: "login page returned again after re-authentication".to_string(),
                    diagnostics,
                })
            }
            EmptyPageVerdict::NoData => {
                tracing::warn!(status = page.status.as_u16(), "roster page contained no days");
                GuardState::Failed(PortalError::NoData { diagnostics })
            }
        }
    }

    async fn reauthenticate(&self) -> Result<(SessionCredential, RawPage), PortalError> {
        let credential = login(&self.client, &self.config).await?;
        let page = self.fetch_page(&credential).await?;
        Ok((credential, page))
    }

    async fn fetch_page(&self, credential: &SessionCredential) -> Result<RawPage, PortalError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/html"));
        headers.insert(
            ACCEPT_ENCODING,
            HeaderValue::from_static("gzip, deflate, br"),
        );
        match HeaderValue::from_str(&credential.cookie_header()) {
            Ok(cookie) => {
                headers.insert(COOKIE, cookie);
            }
            Err(_) => tracing::warn!("session cookie is not a valid header value, sending none"),
        }

        self.client
            .request(Method::GET, &self.config.roster_path, headers, None)
            .await
    }
}
