//! Output shapes offered to API and CLI consumers.

use std::collections::BTreeMap;

use crate::roster::Day;

/// Selected via `format=`; matching is case-insensitive and unknown values
/// fall back to [`OutputFormat::Object`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON object keyed by ISO date.
    #[default]
    Object,
    /// JSON array in roster order.
    Array,
    /// Compact `date,time|date,time` text line.
    String,
}

impl OutputFormat {
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("array") => Self::Array,
            Some("string") => Self::String,
            _ => Self::Object,
        }
    }
}

/// Keys days by their ISO date. A later day with the same date replaces an
/// earlier one.
#[must_use]
pub fn to_date_map(days: &[Day]) -> BTreeMap<String, &Day> {
    days.iter().map(|day| (day.date().to_string(), day)).collect()
}

/// Renders days as `date[,time...]` entries joined by `|`.
///
/// Whitespace is stripped from each time label and any `,` or `|` inside it
/// becomes `-` so the delimiters stay unambiguous. Days whose assignments
/// carry no time render as the bare date.
#[must_use]
pub fn shift_line(days: &[Day]) -> String {
    days.iter()
        .map(|day| {
            let mut parts = vec![day.date().to_string()];
            parts.extend(
                day.assignments()
                    .iter()
                    .filter_map(|a| a.time.as_deref())
                    .map(clean_time)
                    .filter(|t| !t.is_empty()),
            );
            parts.join(",")
        })
        .collect::<Vec<_>>()
        .join("|")
}

fn clean_time(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' || c == '|' { '-' } else { c })
        .collect()
}
