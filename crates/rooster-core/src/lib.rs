pub mod app_config;
pub mod config;
pub mod filter;
pub mod format;
pub mod roster;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use filter::{today_in, FilterError, OnlyFilter, RosterFilter};
pub use format::{shift_line, to_date_map, OutputFormat};
pub use roster::{weekday_abbrev, weekday_full, Assignment, Day};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
