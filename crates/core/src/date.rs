//! Textual date recognition.
//!
//! Statements, screenshots and spreadsheets spell dates many ways. Forms with
//! an explicit year (`2026-02-09`, `11/10/2025`, `2/2/26`, `February 09, 2026`,
//! `15 Jan 2024`) parse on their own. Yearless forms (`Feb 2`, `2/2`) and
//! relative forms (`Yesterday`, `3 hours ago`, `Monday`) need an anchor date
//! and always resolve to the most recent occurrence not after it.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::re;

/// A date located inside a line. `start..end` is a byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateToken {
    pub start: usize,
    pub end: usize,
    pub date: NaiveDate,
    /// False for yearless and relative forms whose year came from the anchor.
    pub year_explicit: bool,
}

// ── Compiled regex cache ─────────────────────────────────────────────────────

re!(re_iso, r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b");
re!(re_slash, r"\b(\d{1,2})/(\d{1,2})(?:/(\d{4}|\d{2}))?\b");
re!(re_dash, r"\b(\d{1,2})-(\d{1,2})-(\d{4}|\d{2})\b");
re!(re_month_day,
    r"(?i)\b(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?\s+(\d{1,2})(?:st|nd|rd|th)?\b(?:,?\s+((?:19|20)\d{2})\b)?");
re!(re_day_month,
    r"(?i)\b(\d{1,2})\s+(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\b\.?(?:,?\s+((?:19|20)\d{2})\b)?");
re!(re_month_header,
    r"(?i)^(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?,?\s+((?:19|20)\d{2})$");
re!(re_relative,
    r"(?i)\b(today|yesterday|just\s+now|(?:\d+|an?|one)\s*(?:hours?|hrs?|minutes?|mins?|seconds?|secs?)\s+ago|(\d+)\s*days?\s+ago|monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b");

// ── Public API ───────────────────────────────────────────────────────────────

/// Parses a whole field that carries an explicit year. No anchor is needed,
/// so yearless and relative forms are rejected.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    scan(text, None)
        .into_iter()
        .find(|t| covers(text, t))
        .map(|t| t.date)
}

/// Resolves a whole field in any accepted form, using `reference` for
/// yearless and relative dates. Bare weekday abbreviations (`Tue`) are only
/// honoured here, where the field holds nothing else.
pub fn resolve_date(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    let text = text.trim().trim_end_matches(['.', ',']);
    if let Some(weekday) = weekday_abbreviation(text) {
        return Some(most_recent_weekday(weekday, reference));
    }
    scan(text, Some(reference))
        .into_iter()
        .filter(|t| covers(text, t))
        .max_by_key(|t| t.end - t.start)
        .map(|t| t.date)
}

/// Finds the first date token inside a line.
pub fn find_date(text: &str, reference: NaiveDate) -> Option<DateToken> {
    scan(text, Some(reference))
        .into_iter()
        .min_by_key(|t| (t.start, std::cmp::Reverse(t.end)))
}

/// Every date token in a line, ordered by position. Overlapping candidates
/// keep the longest.
pub fn find_dates(text: &str, reference: NaiveDate) -> Vec<DateToken> {
    let mut tokens = scan(text, Some(reference));
    tokens.sort_by_key(|t| (t.start, std::cmp::Reverse(t.end)));
    let mut kept: Vec<DateToken> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if kept.last().is_some_and(|prev| token.start < prev.end) {
            continue;
        }
        kept.push(token);
    }
    kept
}

/// A standalone `Month YYYY` line, resolved to the first day of that month.
pub fn month_header(text: &str) -> Option<NaiveDate> {
    let c = re_month_header().captures(text.trim())?;
    let month = month_to_num(c.get(1)?.as_str())?;
    let year: i32 = c.get(2)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Most recent `weekday` on or before `reference`.
pub fn most_recent_weekday(weekday: Weekday, reference: NaiveDate) -> NaiveDate {
    let back =
        (reference.weekday().num_days_from_monday() + 7 - weekday.num_days_from_monday()) % 7;
    reference - Duration::days(i64::from(back))
}

/// Most recent `month`/`day` on or before `anchor`.
pub fn infer_year(month: u32, day: u32, anchor: NaiveDate) -> Option<NaiveDate> {
    (0..=4)
        .filter_map(|back| NaiveDate::from_ymd_opt(anchor.year() - back, month, day))
        .find(|d| *d <= anchor)
}

/// Moves `date` to the year that makes it the most recent occurrence of its
/// month/day on or before `anchor`.
pub fn reanchor(date: NaiveDate, anchor: NaiveDate) -> NaiveDate {
    infer_year(date.month(), date.day(), anchor).unwrap_or(date)
}

// ── Scanning ─────────────────────────────────────────────────────────────────

fn covers(text: &str, token: &DateToken) -> bool {
    token.start == 0 && token.end == text.len()
}

fn scan(text: &str, reference: Option<NaiveDate>) -> Vec<DateToken> {
    let mut out = Vec::new();

    for c in re_iso().captures_iter(text) {
        let (Some(m), Some(y), Some(mo), Some(d)) = (c.get(0), c.get(1), c.get(2), c.get(3)) else {
            continue;
        };
        if let Some(date) = ymd(y.as_str(), mo.as_str(), d.as_str()) {
            out.push(DateToken { start: m.start(), end: m.end(), date, year_explicit: true });
        }
    }

    for c in re_slash().captures_iter(text) {
        let (Some(m), Some(mo), Some(d)) = (c.get(0), c.get(1), c.get(2)) else { continue };
        // `4/5%` style fragments are ratios, not dates.
        if text[m.end()..].starts_with(['%', '/']) {
            continue;
        }
        let year = c.get(3).map(|y| y.as_str());
        if let Some(token) = month_day_token(m, mo.as_str(), d.as_str(), year, reference) {
            out.push(token);
        }
    }

    for c in re_dash().captures_iter(text) {
        let (Some(m), Some(mo), Some(d), Some(y)) = (c.get(0), c.get(1), c.get(2), c.get(3)) else {
            continue;
        };
        if let Some(token) = month_day_token(m, mo.as_str(), d.as_str(), Some(y.as_str()), None) {
            out.push(token);
        }
    }

    for c in re_month_day().captures_iter(text) {
        let (Some(m), Some(name), Some(d)) = (c.get(0), c.get(1), c.get(2)) else { continue };
        let Some(month) = month_to_num(name.as_str()) else { continue };
        let year = c.get(3).map(|y| y.as_str());
        if let Some(token) = month_day_token(m, &month.to_string(), d.as_str(), year, reference) {
            out.push(token);
        }
    }

    for c in re_day_month().captures_iter(text) {
        let (Some(m), Some(d), Some(name)) = (c.get(0), c.get(1), c.get(2)) else { continue };
        let Some(month) = month_to_num(name.as_str()) else { continue };
        let year = c.get(3).map(|y| y.as_str());
        if let Some(token) = month_day_token(m, &month.to_string(), d.as_str(), year, reference) {
            out.push(token);
        }
    }

    if let Some(reference) = reference {
        for c in re_relative().captures_iter(text) {
            let Some(m) = c.get(0) else { continue };
            let word = m.as_str().to_lowercase();
            let date = if word == "yesterday" {
                reference - Duration::days(1)
            } else if let Some(days) = c.get(2).and_then(|n| n.as_str().parse::<i64>().ok()) {
                reference - Duration::days(days)
            } else if let Some(weekday) = weekday_name(&word) {
                most_recent_weekday(weekday, reference)
            } else {
                reference
            };
            out.push(DateToken { start: m.start(), end: m.end(), date, year_explicit: false });
        }
    }

    out
}

fn month_day_token(
    m: regex::Match<'_>,
    month: &str,
    day: &str,
    year: Option<&str>,
    reference: Option<NaiveDate>,
) -> Option<DateToken> {
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    let (date, year_explicit) = match year {
        Some(y) => (NaiveDate::from_ymd_opt(expand_year(y.parse().ok()?), month, day)?, true),
        None => (infer_year(month, day, reference?)?, false),
    };
    Some(DateToken { start: m.start(), end: m.end(), date, year_explicit })
}

fn ymd(y: &str, m: &str, d: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)
}

fn expand_year(y: i32) -> i32 {
    if y < 100 { 2000 + y } else { y }
}

fn month_to_num(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    let month = match lower.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn weekday_name(word: &str) -> Option<Weekday> {
    match word {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

fn weekday_abbreviation(text: &str) -> Option<Weekday> {
    match text.to_lowercase().as_str() {
        "mon" => Some(Weekday::Mon),
        "tue" | "tues" => Some(Weekday::Tue),
        "wed" => Some(Weekday::Wed),
        "thu" | "thur" | "thurs" => Some(Weekday::Thu),
        "fri" => Some(Weekday::Fri),
        "sat" => Some(Weekday::Sat),
        "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
