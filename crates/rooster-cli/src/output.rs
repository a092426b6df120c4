//! Stdout/stderr envelopes: `{"ok":true,"count":N,"data":..}` on success,
//! `{"ok":false,"error":{..}}` on failure.

use rooster_core::{shift_line, to_date_map, Day, OutputFormat};
use rooster_portal::ErrorReport;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Success<T: Serialize> {
    ok: bool,
    count: usize,
    data: T,
}

#[derive(Debug, Serialize)]
struct Failure<'a> {
    ok: bool,
    error: &'a ErrorReport,
}

/// Renders `days` in `format`. The string format prints the bare shift line.
pub(crate) fn render_success(days: &[Day], format: OutputFormat) -> serde_json::Result<String> {
    let count = days.len();
    match format {
        OutputFormat::String => Ok(shift_line(days)),
        OutputFormat::Array => serde_json::to_string_pretty(&Success {
            ok: true,
            count,
            data: days,
        }),
        OutputFormat::Object => serde_json::to_string_pretty(&Success {
            ok: true,
            count,
            data: to_date_map(days),
        }),
    }
}

pub(crate) fn render_failure(report: &ErrorReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Failure {
        ok: false,
        error: report,
    })
}
