//! Statement text: section dates, register lines, and boilerplate exclusion.
//!
//! Expected text after extraction:
//!   February 09, 2026
//!   APPLECARD GSBANK PAYMENT ACH WEB x8892      -$1,030.27     $3,397.03
//!   Jul 20  Jul 22  H-E-B #455 SAN MARCOS TX                    $5.82
//!   DOORDASH*SUSHI PLACE
//!                                                               $20.78

use chrono::NaiveDate;
use sift_core::date::{find_date, find_dates, parse_date, reanchor, DateToken};
use sift_core::{
    find_amounts, is_statement_boilerplate, re, resolve_kind, ParsedDocument, SignedAmount,
    TransactionFields,
};
use tracing::{debug, trace};

use crate::error::StatementError;

// ── Compiled regex cache ─────────────────────────────────────────────────────

re!(re_rate, r"(?i)\d+\.\d{2,}\s?%|\b(?:rate|variable)\b.*%");
re!(re_reward_pair, r"\d+(?:\.\d+)?\s?%\s*\$?\d[\d,]*\.\d{2}");
re!(re_percent, r"\d+(?:\.\d+)?\s?%");

// ── Line classification ──────────────────────────────────────────────────────

/// A register date as written on the line. Month/day dates are resolved
/// against the section header once the scan knows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InlineDate {
    date: NaiveDate,
    year_explicit: bool,
}

impl From<DateToken> for InlineDate {
    fn from(t: DateToken) -> Self {
        Self { date: t.date, year_explicit: t.year_explicit }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum StatementLine {
    Blank,
    Excluded,
    SectionHeader(NaiveDate),
    Transaction { date: Option<InlineDate>, description: String, amount: SignedAmount },
    DescriptionOnly { date: Option<InlineDate>, description: String },
    AmountOnly { date: Option<InlineDate>, amount: SignedAmount },
    Other,
}

fn classify(raw: &str, reference: NaiveDate) -> StatementLine {
    let line = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if line.is_empty() {
        return StatementLine::Blank;
    }
    if is_statement_boilerplate(&line) || re_rate().is_match(&line) {
        return StatementLine::Excluded;
    }
    if let Some(date) = parse_date(&line) {
        return StatementLine::SectionHeader(date);
    }

    // Per-row rewards (`2% $0.41`) sit between description and amount.
    let line = re_reward_pair().replace_all(&line, " ");
    let line = re_percent().replace_all(&line, " ").into_owned();

    let amounts = find_amounts(&line);
    let head = amounts.first().map_or(line.as_str(), |t| &line[..t.start]);
    let (date, description) = split_inline_dates(head, reference);
    let description = description.trim().trim_end_matches(['-', ':']).trim().to_string();
    let has_text = description.chars().filter(|c| c.is_alphabetic()).count() >= 2;

    // Any later figure is a running balance, never the amount.
    match (amounts.first(), has_text) {
        (Some(t), true) => StatementLine::Transaction { date, description, amount: t.amount },
        (Some(t), false) => StatementLine::AmountOnly { date, amount: t.amount },
        (None, true) => StatementLine::DescriptionOnly { date, description },
        (None, false) => StatementLine::Other,
    }
}

/// Strips register-style leading dates (`02/09`, `Jul 20 Jul 22`). The first
/// one is the transaction date; a second is the posting date. Without a
/// leading date, a date closing the description (`POINT LOMA 02/09`) is used.
fn split_inline_dates(text: &str, reference: NaiveDate) -> (Option<InlineDate>, &str) {
    let has_digit = |s: &str| s.chars().any(|c| c.is_ascii_digit());
    let mut rest = text.trim();
    let mut first = None;
    for _ in 0..2 {
        match find_date(rest, reference) {
            Some(t) if t.start == 0 && has_digit(&rest[..t.end]) => {
                first.get_or_insert(InlineDate::from(t));
                rest = rest[t.end..].trim_start();
            }
            _ => break,
        }
    }
    if first.is_none() {
        if let Some(t) = find_dates(rest, reference).pop() {
            if t.start > 0 && t.end == rest.len() && has_digit(&rest[t.start..]) {
                first = Some(InlineDate::from(t));
                rest = rest[..t.start].trim_end();
            }
        }
    }
    (first, rest)
}

// ── Synthesis ────────────────────────────────────────────────────────────────

#[derive(Default)]
struct ScanState {
    section_date: Option<NaiveDate>,
    /// A description-only line waiting for its amount on the next line.
    pending: Option<(String, Option<InlineDate>)>,
    rows: Vec<TransactionFields>,
    excluded: usize,
}

impl ScanState {
    /// Year-less register dates take the year that puts them on or before
    /// the section header; without a header they keep the reference year.
    fn resolve(&self, date: Option<InlineDate>) -> Option<NaiveDate> {
        match (date, self.section_date) {
            (Some(d), Some(section)) if !d.year_explicit => Some(reanchor(d.date, section)),
            (Some(d), _) => Some(d.date),
            (None, section) => section,
        }
    }

    fn emit(&mut self, description: &str, amount: SignedAmount, date: Option<InlineDate>) {
        let resolution = resolve_kind(None, amount.sign, description);
        let fields = TransactionFields {
            date: self.resolve(date).map(|d| d.to_string()).unwrap_or_default(),
            description: description.to_string(),
            amount: amount.magnitude.to_plain_string(),
            category_hint: String::new(),
            type_hint: resolution.kind.to_string(),
        };
        trace!(?fields, "statement row");
        self.rows.push(fields);
    }

    fn step(mut self, line: StatementLine) -> Self {
        match line {
            StatementLine::Blank | StatementLine::Other => {}
            StatementLine::Excluded => {
                self.excluded += 1;
                self.pending = None;
            }
            StatementLine::SectionHeader(date) => {
                self.section_date = Some(date);
                self.pending = None;
            }
            StatementLine::Transaction { date, description, amount } => {
                self.pending = None;
                self.emit(&description, amount, date);
            }
            StatementLine::DescriptionOnly { date, description } => {
                self.pending = Some((description, date));
            }
            StatementLine::AmountOnly { date, amount } => match self.pending.take() {
                Some((description, pending_date)) => {
                    self.emit(&description, amount, pending_date.or(date));
                }
                None => {
                    debug!(amount = %amount.magnitude, "amount-only line with no description");
                    self.emit("", amount, date);
                }
            },
        }
        self
    }
}

/// Statement mode: one canonical row per transaction line.
///
/// Returns [`StatementError::NotRecognized`] when non-blank text carries no
/// date anywhere, which means this is not a statement. Text with dates but
/// no transactions is a valid empty statement.
pub fn synthesize_statement<S: AsRef<str>>(
    lines: &[S],
    reference: NaiveDate,
) -> Result<ParsedDocument, StatementError> {
    let classified: Vec<StatementLine> =
        lines.iter().map(|l| classify(l.as_ref(), reference)).collect();
    let state = classified.into_iter().fold(ScanState::default(), ScanState::step);
    debug!(rows = state.rows.len(), excluded = state.excluded, "statement lines scanned");

    let any_text = lines.iter().any(|l| !l.as_ref().trim().is_empty());
    let any_date = lines.iter().any(|l| !find_dates(l.as_ref(), reference).is_empty());
    if state.rows.is_empty() && any_text && !any_date {
        return Err(StatementError::NotRecognized);
    }

    let mut builder = ParsedDocument::canonical_builder();
    for row in state.rows {
        builder.push(row);
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn reference() -> NaiveDate {
        d(2026, 2, 20)
    }

    fn synth(lines: &[&str]) -> ParsedDocument {
        synthesize_statement(lines, reference()).unwrap()
    }

    // ── Register lines ───────────────────────────────────────────────────────

    #[test]
    fn payment_with_minus_and_balance() {
        let doc = synth(&[
            "February 09, 2026",
            "APPLECARD GSBANK PAYMENT ACH WEB x8892 -$1,030.27 $3,397.03",
        ]);
        assert_eq!(doc.len(), 1);
        let row = &doc.rows()[0];
        assert_eq!(row[0], "2026-02-09");
        assert_eq!(row[1], "APPLECARD GSBANK PAYMENT ACH WEB x8892");
        assert_eq!(row[2], "1030.27");
        assert_eq!(row[4], "income");
    }

    #[test]
    fn section_date_carries_until_next_header() {
        let doc = synth(&[
            "February 09, 2026",
            "DOORDASH*SUSHI $20.78 $3,417.81",
            "SHELL OIL 5744 $41.07 $3,458.88",
            "February 10, 2026",
            "TRADER JOES #123 $63.12 $3,522.00",
        ]);
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.rows()[1][0], "2026-02-09");
        assert_eq!(doc.rows()[2][0], "2026-02-10");
        assert!(doc.rows().iter().all(|r| r[4] == "expense"));
    }

    #[test]
    fn inline_dates_override_section() {
        let doc = synth(&[
            "Jul 20 Jul 22 H-E-B #455 SAN MARCOS TX $5.82",
            "02/09 WALMART.COM - $14.05",
        ]);
        assert_eq!(doc.rows()[0][0], "2025-07-20");
        assert_eq!(doc.rows()[0][1], "H-E-B #455 SAN MARCOS TX");
        assert_eq!(doc.rows()[1][0], "2026-02-09");
        assert_eq!(doc.rows()[1][1], "WALMART.COM");
        assert_eq!(doc.rows()[1][4], "expense");
    }

    #[test]
    fn register_dates_take_the_year_of_their_section() {
        let doc = synth(&[
            "January 05, 2025",
            "12/28 AMAZON MKTPLACE $19.99",
            "01/03 STARBUCKS $5.50",
            "12/30/2024 SHELL OIL 5744 $41.07",
        ]);
        assert_eq!(doc.rows()[0][0], "2024-12-28");
        assert_eq!(doc.rows()[1][0], "2025-01-03");
        assert_eq!(doc.rows()[2][0], "2024-12-30");
    }

    #[test]
    fn month_abbreviations_and_point_merchants_are_rows() {
        let doc = synth(&[
            "Apr 05 Apr 07 STARBUCKS $5.50",
            "April 30, 2026",
            "POINT LOMA SEAFOOD $42.00",
            "APR 12 SHELL OIL 5744 $41.07",
            "POINT LOMA SEAFOOD 04/02 $18.25",
        ]);
        assert_eq!(doc.len(), 4, "{:?}", doc.rows());
        assert_eq!(doc.rows()[0][1], "STARBUCKS");
        assert_eq!(doc.rows()[0][0], "2025-04-05");
        assert_eq!(doc.rows()[1][1], "POINT LOMA SEAFOOD");
        assert_eq!(doc.rows()[1][0], "2026-04-30");
        assert_eq!(doc.rows()[2][1], "SHELL OIL 5744");
        assert_eq!(doc.rows()[2][0], "2026-04-12");
        assert_eq!(doc.rows()[3][1], "POINT LOMA SEAFOOD");
        assert_eq!(doc.rows()[3][0], "2026-04-02");
    }

    #[test]
    fn amount_without_description_is_kept() {
        let doc = synth(&["February 09, 2026", "STARBUCKS $5.50", "$14.00"]);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.rows()[1][0], "2026-02-09");
        assert_eq!(doc.rows()[1][1], "");
        assert_eq!(doc.rows()[1][2], "14.00");
    }

    #[test]
    fn two_line_rows_fold() {
        let doc = synth(&["February 09, 2026", "DOORDASH*SUSHI PLACE", "$20.78"]);
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.rows()[0][1], "DOORDASH*SUSHI PLACE");
        assert_eq!(doc.rows()[0][2], "20.78");
    }

    #[test]
    fn reward_percent_is_not_the_amount() {
        let doc = synth(&["02/02/2026 DOORDASH*SUSHI 2% $0.42 $20.78"]);
        assert_eq!(doc.rows()[0][2], "20.78");
        assert_eq!(doc.rows()[0][1], "DOORDASH*SUSHI");
    }

    #[test]
    fn credit_suffix_is_income() {
        let doc = synth(&["02/03/2026 RETURN AMAZON 12.99 CR"]);
        assert_eq!(doc.rows()[0][4], "income");
    }

    // ── Exclusions ───────────────────────────────────────────────────────────

    #[test]
    fn boilerplate_is_excluded() {
        let doc = synth(&[
            "February 09, 2026",
            "Transaction Summary",
            "Total payments for this period -$1,030.27",
            "Annual Percentage Rate (APR) 24.24%",
            "Points earned 1,204",
            "Purchase APR 24.24%",
            "Previous Balance $4,427.30",
            "Minimum Payment Due $35.00",
            "Page 1 of 3",
            "STARBUCKS $5.50",
        ]);
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.rows()[0][1], "STARBUCKS");
    }

    // ── Structural outcomes ──────────────────────────────────────────────────

    #[test]
    fn text_without_dates_is_not_a_statement() {
        let err = synthesize_statement(&["hello world", "no money here"], reference()).unwrap_err();
        assert!(matches!(err, StatementError::NotRecognized));
    }

    #[test]
    fn empty_input_is_an_empty_statement() {
        assert!(synth(&[]).is_empty());
        assert!(synth(&["", "   "]).is_empty());
        assert!(synth(&["February 09, 2026", "Transaction Summary"]).is_empty());
    }
}
