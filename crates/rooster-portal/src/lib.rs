//! Client for the roster portal: session handling, page retrieval, and
//! roster extraction.

pub mod client;
pub mod config;
pub mod credential;
pub mod csrf;
pub mod decode;
pub mod error;
pub mod guard;
pub mod parse;
pub mod session;

pub use client::{PortalClient, RawPage};
pub use config::PortalConfig;
pub use credential::{CredentialSource, SessionCredential};
pub use error::{ErrorClass, ErrorKind, ErrorReport, PageDiagnostics, PortalError};
pub use guard::{looks_like_login_page, RosterClient};
pub use parse::parse_roster;
pub use session::{acquire_session, login};
