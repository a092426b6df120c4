//! HTTP transport to the roster portal.

mod origin;

use reqwest::header::{HeaderMap, CONTENT_ENCODING};
use reqwest::{Client, Method, StatusCode, Url};

use crate::decode::decompress;
use crate::error::PortalError;

pub(crate) use origin::resolve_path;

/// One decoded response. Lives only as long as the caller inspects it.
#[derive(Debug, Clone)]
pub struct RawPage {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Body after `content-encoding` has been undone.
    pub body: Vec<u8>,
}

impl RawPage {
    /// Body as text; invalid UTF-8 sequences become `U+FFFD`.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Single-exchange HTTP client bound to one portal origin.
///
/// Idle connections are never pooled, so each [`PortalClient::request`]
/// opens its own connection and releases it once the body has been read or
/// the request failed. HTTP/2 is negotiated over TLS when the portal offers
/// it. Redirects are not followed and bodies are not decompressed by the
/// HTTP layer; both are handled explicitly by callers and [`decompress`].
#[derive(Debug, Clone)]
pub struct PortalClient {
    client: Client,
    origin: Url,
}

impl PortalClient {
    /// Creates a client for `origin` sending `user_agent` on every request.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::Transport`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(origin: Url, user_agent: &str) -> Result<Self, PortalError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .pool_max_idle_per_host(0)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client, origin })
    }

    /// Performs one request/response exchange against `path` on the portal
    /// origin and returns the decoded response.
    ///
    /// The body is collected chunk by chunk, then decompressed according to
    /// its `content-encoding`. Non-2xx statuses are returned as pages, not
    /// errors: the portal answers expired sessions with ordinary HTML.
    ///
    /// # Errors
    ///
    /// - [`PortalError::InvalidUrl`]: `path` is not origin-relative.
    /// - [`PortalError::Transport`]: connection or protocol failure.
    /// - [`PortalError::UnsupportedEncoding`] / [`PortalError::Decode`]: the
    ///   body could not be decompressed.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        headers: HeaderMap,
        body: Option<Vec<u8>>,
    ) -> Result<RawPage, PortalError> {
        let url = resolve_path(&self.origin, path)?;

        let mut request = self.client.request(method.clone(), url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let mut response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();

        let mut raw = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            raw.extend_from_slice(&chunk);
        }
        drop(response);

        let encoding = content_encoding(&headers)?;
        tracing::debug!(
            %method,
            path,
            status = status.as_u16(),
            encoding = encoding.as_deref().unwrap_or("identity"),
            bytes = raw.len(),
            "portal response received"
        );
        let body = decompress(raw, encoding.as_deref())?;

        Ok(RawPage {
            status,
            headers,
            body,
        })
    }
}

/// Joins every `content-encoding` header value with `", "`.
///
/// # Errors
///
/// Returns [`PortalError::UnsupportedEncoding`] if a value is not visible
/// ASCII, rendered lossily, since no decoder can be chosen for it.
pub(crate) fn content_encoding(headers: &HeaderMap) -> Result<Option<String>, PortalError> {
    let mut values = Vec::new();
    for value in headers.get_all(CONTENT_ENCODING) {
        let text = value.to_str().map_err(|_| {
            PortalError::UnsupportedEncoding(String::from_utf8_lossy(value.as_bytes()).into_owned())
        })?;
        values.push(text.trim());
    }
    let joined = values
        .into_iter()
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    Ok(Some(joined).filter(|v| !v.is_empty()))
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
