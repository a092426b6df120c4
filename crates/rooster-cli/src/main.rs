mod output;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rooster_core::{today_in, AppConfig, Day, OutputFormat, RosterFilter};
use rooster_portal::{
    looks_like_login_page, parse_roster, ErrorReport, PageDiagnostics, PortalConfig,
    PortalError, RosterClient,
};
use tracing_subscriber::EnvFilter;

use crate::output::{render_failure, render_success};

#[derive(Debug, Parser)]
#[command(name = "rooster-cli")]
#[command(about = "Fetch and parse the personal work roster")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Log in if needed, fetch the roster page, and print the parsed days
    Fetch {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Parse a saved roster page without touching the network
    Parse {
        /// Path to an HTML file saved from the portal
        file: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
    },
}

/// Filtering and output options shared by every subcommand.
#[derive(Debug, Default, Args)]
struct ViewArgs {
    /// Output shape: object (keyed by date), array, or string
    #[arg(long)]
    format: Option<String>,
    /// `assigned`/`shifts` for days with shifts only, `today` for today only
    #[arg(long)]
    only: Option<String>,
    /// Earliest date to include (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,
    /// Latest date to include (YYYY-MM-DD)
    #[arg(long)]
    to: Option<String>,
    /// Keep today and the following N days
    #[arg(long)]
    days: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = match rooster_core::load_app_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "{}",
                render_failure(&ErrorReport::other("CONFIG_INVALID", e.to_string()))?
            );
            return Ok(ExitCode::FAILURE);
        }
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let (result, view) = match cli.command {
        Commands::Fetch { view } => (fetch(&config).await, view),
        Commands::Parse { file, view } => (parse_file(&file), view),
    };

    let today = today_in(config.timezone);
    match result.and_then(|days| present(today, &days, &view)) {
        Ok(rendered) => {
            println!("{rendered}");
            Ok(ExitCode::SUCCESS)
        }
        Err(report) => {
            tracing::debug!(error = %report.error, "command failed");
            eprintln!("{}", render_failure(&report)?);
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn fetch(config: &AppConfig) -> Result<Vec<Day>, ErrorReport> {
    let portal = PortalConfig::from_app_config(config).map_err(|e| e.report())?;
    let client = RosterClient::new(portal).map_err(|e| e.report())?;
    let deadline = Duration::from_secs(config.fetch_deadline_secs);

    match tokio::time::timeout(deadline, client.get_roster()).await {
        Ok(result) => result.map_err(|e| e.report()),
        Err(_) => Err(ErrorReport::other(
            "TIMEOUT",
            format!("roster fetch exceeded {}s", deadline.as_secs()),
        )),
    }
}

fn parse_file(file: &Path) -> Result<Vec<Day>, ErrorReport> {
    let html = std::fs::read_to_string(file).map_err(|e| {
        ErrorReport::other("IO_ERROR", format!("cannot read {}: {e}", file.display()))
    })?;
    let days = parse_roster(&html);
    if !days.is_empty() {
        return Ok(days);
    }

    let diagnostics = PageDiagnostics {
        session_token_present: false,
        snippet: rooster_portal::guard::snippet(&html),
    };
    let error = if looks_like_login_page(&html) {
        PortalError::LoginDetected { diagnostics }
    } else {
        PortalError::NoData { diagnostics }
    };
    Err(error.report())
}

fn present(today: NaiveDate, days: &[Day], view: &ViewArgs) -> Result<String, ErrorReport> {
    let filter = RosterFilter::from_params(
        view.only.as_deref(),
        view.from.as_deref(),
        view.to.as_deref(),
        view.days.as_deref(),
    )
    .map_err(|e| ErrorReport::other("BAD_REQUEST", e.to_string()))?;

    let days = filter.apply(days, today);
    let format = OutputFormat::parse(view.format.as_deref());
    render_success(&days, format)
        .map_err(|e| ErrorReport::other("INTERNAL_ERROR", e.to_string()))
}

#[cfg(test)]
mod tests;
