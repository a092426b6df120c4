//! Roster Parser: extracts [`Day`] records from the portal's roster page.
//!
//! A day is any `<td>` whose `title` is an ISO `YYYY-MM-DD` date. Inside it,
//! every `.ass` element is one shift. The parser is a pure function of the
//! HTML text and never consults the clock.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use rooster_core::{Assignment, Day};
use scraper::{ElementRef, Html, Selector};

static DAY_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td[title]").expect("valid selector"));
static ASSIGNMENT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".ass").expect("valid selector"));
static PLACE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[title]").expect("valid selector"));
static TIME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("b, strong").expect("valid selector"));

static ISO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));
static PLACE_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[>›»]\s*").expect("valid regex"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static PAUSE_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\(([^)]*pauze[^)]*)\)").expect("valid regex"));
static PAUSE_MINUTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\((\d+\s*min[^)]*)\)").expect("valid regex"));

/// Parses every dated calendar cell in `html`, in document order.
///
/// Cells whose `title` is not a real `YYYY-MM-DD` date are skipped.
#[must_use]
pub fn parse_roster(html: &str) -> Vec<Day> {
    let document = Html::parse_document(html);
    document
        .select(&DAY_CELL)
        .filter_map(|cell| {
            let date = parse_cell_date(cell.value().attr("title")?)?;
            let assignments = cell.select(&ASSIGNMENT).map(parse_assignment).collect();
            Some(Day::new(date, assignments))
        })
        .collect()
}

fn parse_cell_date(title: &str) -> Option<NaiveDate> {
    if !ISO_DATE_RE.is_match(title) {
        return None;
    }
    NaiveDate::parse_from_str(title, "%Y-%m-%d").ok()
}

fn parse_assignment(element: ElementRef<'_>) -> Assignment {
    let place = element.select(&PLACE).next().and_then(|el| {
        let text = collapse_whitespace(&el.text().collect::<String>());
        let raw = if text.is_empty() {
            el.value().attr("title")?.to_string()
        } else {
            text
        };
        normalize_place(&raw)
    });

    let time = element
        .select(&TIME)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty());

    let full_text = element.text().collect::<String>();

    Assignment {
        place,
        time,
        pause: extract_pause(&full_text),
    }
}

/// Turns `"Office > Annex"` style paths into `"Office, Annex"`.
fn normalize_place(raw: &str) -> Option<String> {
    let joined = PLACE_SEPARATOR_RE.replace_all(raw, ", ");
    let place = collapse_whitespace(&joined);
    let place = place.trim_matches(|c: char| c == ',' || c.is_whitespace());
    if place.is_empty() {
        None
    } else {
        Some(place.to_string())
    }
}

fn collapse_whitespace(raw: &str) -> String {
    WHITESPACE_RE.replace_all(raw, " ").trim().to_string()
}

/// First parenthesized break note, preferring ones that mention `pauze`.
pub(crate) fn extract_pause(text: &str) -> Option<String> {
    PAUSE_WORD_RE
        .captures(text)
        .or_else(|| PAUSE_MINUTES_RE.captures(text))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|p| !p.is_empty())
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
