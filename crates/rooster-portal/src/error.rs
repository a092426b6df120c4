use serde::Serialize;
use thiserror::Error;

/// Context captured from the page that led to a session-related failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageDiagnostics {
    /// Whether the credential in use carried the session cookie.
    pub session_token_present: bool,
    /// First 1000 characters of the page, whitespace collapsed.
    pub snippet: String,
}

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("missing configuration: {0}")]
    ConfigMissing(String),

    #[error("invalid portal URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unsupported content-encoding \"{0}\"")]
    UnsupportedEncoding(String),

    #[error("failed to decode {encoding} body: {source}")]
    Decode {
        encoding: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("login completed without a {cookie} session cookie")]
    LoginIncomplete { cookie: String },

    #[error("session refresh failed: {message}")]
    SessionRefreshFailed {
        message: String,
        diagnostics: PageDiagnostics,
    },

    #[error("login page returned; check credentials or 2FA")]
    LoginDetected { diagnostics: PageDiagnostics },

    #[error("no days parsed from roster page")]
    NoData { diagnostics: PageDiagnostics },
}

/// Stable identifier for each [`PortalError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ConfigMissing,
    InvalidUrl,
    TransportFailure,
    UnsupportedEncoding,
    DecodeFailure,
    LoginIncomplete,
    SessionRefreshFailed,
    LoginDetected,
    NoData,
}

/// How a consumer should react to an [`ErrorKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Credentials or configuration need a human; maps to an authorization failure.
    Auth,
    /// The session worked but the page was empty.
    NoData,
    /// Network, protocol, or decoding trouble.
    Server,
}

impl ErrorKind {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::ConfigMissing => "CONFIG_MISSING",
            Self::InvalidUrl => "INVALID_URL",
            Self::TransportFailure => "TRANSPORT_FAILURE",
            Self::UnsupportedEncoding => "UNSUPPORTED_ENCODING",
            Self::DecodeFailure => "DECODE_FAILURE",
            Self::LoginIncomplete => "LOGIN_INCOMPLETE",
            Self::SessionRefreshFailed => "SESSID_VERLOPEN_AUTOREFRESH_FAILED",
            Self::LoginDetected => "LOGIN_DETECTED",
            Self::NoData => "NO_DATA",
        }
    }

    #[must_use]
    pub fn class(self) -> ErrorClass {
        match self {
            Self::ConfigMissing
            | Self::LoginIncomplete
            | Self::SessionRefreshFailed
            | Self::LoginDetected => ErrorClass::Auth,
            Self::NoData => ErrorClass::NoData,
            Self::InvalidUrl
            | Self::TransportFailure
            | Self::UnsupportedEncoding
            | Self::DecodeFailure => ErrorClass::Server,
        }
    }
}

impl PortalError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigMissing(_) => ErrorKind::ConfigMissing,
            Self::InvalidUrl { .. } => ErrorKind::InvalidUrl,
            Self::Transport(_) => ErrorKind::TransportFailure,
            Self::UnsupportedEncoding(_) => ErrorKind::UnsupportedEncoding,
            Self::Decode { .. } => ErrorKind::DecodeFailure,
            Self::LoginIncomplete { .. } => ErrorKind::LoginIncomplete,
            Self::SessionRefreshFailed { .. } => ErrorKind::SessionRefreshFailed,
            Self::LoginDetected { .. } => ErrorKind::LoginDetected,
            Self::NoData { .. } => ErrorKind::NoData,
        }
    }

    #[must_use]
    pub fn diagnostics(&self) -> Option<&PageDiagnostics> {
        match self {
            Self::SessionRefreshFailed { diagnostics, .. }
            | Self::LoginDetected { diagnostics }
            | Self::NoData { diagnostics } => Some(diagnostics),
            _ => None,
        }
    }

    /// Flattens the error into the uniform shape reported to API and CLI consumers.
    #[must_use]
    pub fn report(&self) -> ErrorReport {
        let diagnostics = self.diagnostics();
        ErrorReport {
            error: self.kind().code().to_string(),
            message: match self {
                Self::SessionRefreshFailed { message, .. } => message.clone(),
                other => other.to_string(),
            },
            session_token_present: diagnostics.map(|d| d.session_token_present),
            snippet: diagnostics.map(|d| d.snippet.clone()),
        }
    }
}

/// Serializable error payload: kind code, human message, and page diagnostics
/// when the failure came from inspecting a fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token_present: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl ErrorReport {
    /// Wraps a failure that did not originate in the portal pipeline.
    #[must_use]
    pub fn other(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: code.to_string(),
            message: message.into(),
            session_token_present: None,
            snippet: None,
        }
    }
}
