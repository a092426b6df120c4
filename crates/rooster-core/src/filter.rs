//! Query-string style filtering of a parsed roster.
//!
//! Filtering never reads the clock: callers pass `today` already resolved in
//! the portal's timezone, which keeps every filter a pure function.

use chrono::{Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use thiserror::Error;

use crate::roster::Day;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("invalid {param} date \"{value}\", expected YYYY-MM-DD")]
    InvalidDate { param: &'static str, value: String },
}

/// Current calendar date in `tz`.
#[must_use]
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// The `only=` selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnlyFilter {
    /// Days with at least one assignment (`only=assigned` or `only=shifts`).
    Assigned,
    /// The single day matching `today` (`only=today`).
    Today,
}

impl OnlyFilter {
    /// Parses an `only=` value. Unknown values yield `None` and are ignored.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "assigned" | "shifts" => Some(Self::Assigned),
            "today" => Some(Self::Today),
            _ => None,
        }
    }
}

/// Combined roster filter. Every criterion is optional; set criteria are
/// applied in field order and all must hold for a day to be kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterFilter {
    pub only: Option<OnlyFilter>,
    /// Inclusive lower bound.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound.
    pub to: Option<NaiveDate>,
    /// Rolling window: `today ..= today + days`.
    pub days: Option<i64>,
}

impl RosterFilter {
    /// Builds a filter from raw query parameters.
    ///
    /// Unknown `only` values and a non-numeric `days` are ignored; blank
    /// values count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidDate`] if `from` or `to` is not a valid
    /// `YYYY-MM-DD` date.
    pub fn from_params(
        only: Option<&str>,
        from: Option<&str>,
        to: Option<&str>,
        days: Option<&str>,
    ) -> Result<Self, FilterError> {
        Ok(Self {
            only: non_blank(only).and_then(OnlyFilter::parse),
            from: parse_bound("from", from)?,
            to: parse_bound("to", to)?,
            days: non_blank(days).and_then(|d| d.parse::<i64>().ok()),
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Returns the days that satisfy every set criterion, preserving order.
    #[must_use]
    pub fn apply(&self, days: &[Day], today: NaiveDate) -> Vec<Day> {
        let window_end = self
            .days
            .and_then(Duration::try_days)
            .and_then(|span| today.checked_add_signed(span));

        days.iter()
            .filter(|day| match self.only {
                Some(OnlyFilter::Assigned) => day.has_assignment(),
                Some(OnlyFilter::Today) => day.date() == today,
                None => true,
            })
            .filter(|day| self.from.is_none_or(|from| day.date() >= from))
            .filter(|day| self.to.is_none_or(|to| day.date() <= to))
            .filter(|day| match (self.days, window_end) {
                (Some(_), Some(end)) => day.date() >= today && day.date() <= end,
                // An overflowing window keeps nothing rather than everything.
                (Some(_), None) => false,
                (None, _) => true,
            })
            .cloned()
            .collect()
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_bound(param: &'static str, raw: Option<&str>) -> Result<Option<NaiveDate>, FilterError> {
    non_blank(raw)
        .map(|value| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| FilterError::InvalidDate {
                param,
                value: value.to_string(),
            })
        })
        .transpose()
}
