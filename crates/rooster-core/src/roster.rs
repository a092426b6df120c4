use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Two-letter Dutch weekday abbreviations, Sunday first.
const WEEKDAY_ABBREV: [&str; 7] = ["zo", "ma", "di", "wo", "do", "vr", "za"];

/// Full Dutch weekday names, Sunday first.
const WEEKDAY_FULL: [&str; 7] = [
    "zondag",
    "maandag",
    "dinsdag",
    "woensdag",
    "donderdag",
    "vrijdag",
    "zaterdag",
];

/// Returns the two-letter Dutch abbreviation for `date`'s weekday (`"ma"` for Monday).
#[must_use]
pub fn weekday_abbrev(date: NaiveDate) -> &'static str {
    WEEKDAY_ABBREV[date.weekday().num_days_from_sunday() as usize]
}

/// Returns the full Dutch weekday name for `date` (`"maandag"` for Monday).
#[must_use]
pub fn weekday_full(date: NaiveDate) -> &'static str {
    WEEKDAY_FULL[date.weekday().num_days_from_sunday() as usize]
}

/// One scheduled shift inside a calendar cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Assignment {
    /// Location path with hierarchy separators normalized to `", "`,
    /// e.g. `"Office, Annex"`.
    pub place: Option<String>,
    /// Shift time label exactly as the portal displays it, e.g. `"09:00–17:00"`.
    pub time: Option<String>,
    /// Break annotation such as `"30 min pauze"`.
    pub pause: Option<String>,
}

/// One calendar day of the roster.
///
/// Fields are private so the weekday names and `hasassignment` flag can never
/// drift from `date` and `assignments`; build values with [`Day::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Day {
    date: NaiveDate,
    weekday: &'static str,
    weekday_full: &'static str,
    assignments: Vec<Assignment>,
    hasassignment: bool,
}

impl Day {
    #[must_use]
    pub fn new(date: NaiveDate, assignments: Vec<Assignment>) -> Self {
        Self {
            date,
            weekday: weekday_abbrev(date),
            weekday_full: weekday_full(date),
            hasassignment: !assignments.is_empty(),
            assignments,
        }
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn weekday(&self) -> &'static str {
        self.weekday
    }

    #[must_use]
    pub fn weekday_full(&self) -> &'static str {
        self.weekday_full
    }

    #[must_use]
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    #[must_use]
    pub fn has_assignment(&self) -> bool {
        self.hasassignment
    }
}
