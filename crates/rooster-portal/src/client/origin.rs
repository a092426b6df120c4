//! Request URL construction against the fixed portal origin.

use reqwest::Url;

use crate::error::PortalError;

/// Resolves an absolute path (optionally with a query) against `origin`.
///
/// Only origin-relative paths are accepted so a configured path can never
/// redirect credentials to another host.
///
/// # Errors
///
/// Returns [`PortalError::InvalidUrl`] if `path` does not start with a single
/// `/` or cannot be joined onto the origin.
pub(crate) fn resolve_path(origin: &Url, path: &str) -> Result<Url, PortalError> {
    if !path.starts_with('/') || path.starts_with("//") {
        return Err(PortalError::InvalidUrl {
            url: path.to_owned(),
            reason: "portal paths must be origin-relative and start with '/'".to_string(),
        });
    }
    origin.join(path).map_err(|e| PortalError::InvalidUrl {
        url: path.to_owned(),
        reason: e.to_string(),
    })
}
