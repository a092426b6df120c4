//! Credential Session Provider: turns configuration into a usable
//! [`SessionCredential`], logging in when no token was supplied.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, COOKIE};
use reqwest::Method;

use crate::client::PortalClient;
use crate::config::PortalConfig;
use crate::credential::{parse_set_cookie, render_cookie_header, SessionCredential};
use crate::csrf::extract_csrf_token;
use crate::error::PortalError;

/// Header carrying the login page's anti-forgery token on credential submission.
pub const CSRF_HEADER: &str = "x-authentication-csrf-token";

/// Returns the injected token as a credential, or logs in when none is configured.
///
/// # Errors
///
/// Any error from [`login`] when no session token is configured.
pub async fn acquire_session(
    client: &PortalClient,
    config: &PortalConfig,
) -> Result<SessionCredential, PortalError> {
    match config.session_token.as_deref() {
        Some(token) => {
            tracing::debug!(cookie = %config.session_cookie, "using injected session token");
            Ok(SessionCredential::injected(&config.session_cookie, token))
        }
        None => login(client, config).await,
    }
}

/// Performs the portal login handshake.
///
/// 1. `GET` the login page and keep its `Set-Cookie` pairs.
/// 2. Look up the anti-forgery token in the page.
/// 3. `POST` the credentials as JSON to `<login_path>/authenticate` with the
///    initial cookies and, when found, the anti-forgery header.
/// 4. Merge the cookies of both responses, later values winning.
///
/// # Errors
///
/// - [`PortalError::ConfigMissing`] if username or password is absent. No
///   request is sent in that case.
/// - [`PortalError::LoginIncomplete`] if the merged cookies lack the session cookie.
/// - Transport and decode errors from either request.
pub async fn login(
    client: &PortalClient,
    config: &PortalConfig,
) -> Result<SessionCredential, PortalError> {
    let (Some(username), Some(password)) = (config.username.as_deref(), config.password.as_deref())
    else {
        return Err(PortalError::ConfigMissing(
            "ROOSTER_USERNAME and ROOSTER_PASSWORD are required to log in".to_string(),
        ));
    };

    let mut page_headers = HeaderMap::new();
    page_headers.insert(ACCEPT, HeaderValue::from_static("text/html"));
    let login_page = client
        .request(Method::GET, &config.login_path, page_headers, None)
        .await?;
    let initial = parse_set_cookie(&login_page.headers);
    let csrf = extract_csrf_token(&login_page.text());
    tracing::debug!(
        cookies = initial.len(),
        csrf_found = csrf.is_some(),
        "login page fetched"
    );

    let body = serde_json::json!({
        "username": username,
        "password": password,
        "authenticatorCode": "",
        "rememberDevice": false,
    })
    .to_string()
    .into_bytes();

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    if !initial.is_empty() {
        if let Ok(value) = HeaderValue::from_str(&render_cookie_header(&initial)) {
            headers.insert(COOKIE, value);
        }
    }
    if let Some(token) = csrf.as_deref() {
        if let Ok(value) = HeaderValue::from_str(token) {
            headers.insert(HeaderName::from_static(CSRF_HEADER), value);
        }
    }

    let response = client
        .request(Method::POST, &config.authenticate_path(), headers, Some(body))
        .await?;
    let issued = parse_set_cookie(&response.headers);
    let credential = SessionCredential::from_login(initial, issued);

    if !credential.contains(&config.session_cookie) {
        tracing::warn!(
            status = response.status.as_u16(),
            cookie = %config.session_cookie,
            "login response carried no session cookie"
        );
        return Err(PortalError::LoginIncomplete {
            cookie: config.session_cookie.clone(),
        });
    }

    tracing::info!(
        status = response.status.as_u16(),
        cookies = credential.cookies().len(),
        "portal login succeeded"
    );
    Ok(credential)
}
