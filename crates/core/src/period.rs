use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::date::{find_dates, reanchor};
use crate::re;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

re!(re_range_separator, r"(?i)^\s*(?:-|–|—|to|through|thru)\s*$");

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Finds a `<date> - <date>` range inside a line (`Dec 8 - Dec 21`,
    /// `12/08/2025 – 12/21/2025`, `Jan 1 to Jan 15`).
    ///
    /// Yearless ends resolve against `reference`; a yearless start resolves
    /// against the end so ranges spanning New Year come out ordered.
    pub fn find_in(text: &str, reference: NaiveDate) -> Option<DateRange> {
        let tokens = find_dates(text, reference);
        tokens.windows(2).find_map(|pair| {
            let (first, second) = (pair[0], pair[1]);
            if !re_range_separator().is_match(&text[first.end..second.start]) {
                return None;
            }
            let end = second.date;
            let start = if first.year_explicit { first.date } else { reanchor(first.date, end) };
            (start <= end).then_some(DateRange::new(start, end))
        })
    }
}
