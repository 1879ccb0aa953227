//! Turns classified screenshot lines into canonical rows.

use chrono::NaiveDate;
use sift_core::{
    resolve_kind, ParsedDocument, PayrollSignals, SignedAmount, TransactionFields, TransactionKind,
};
use tracing::{debug, trace};

use crate::classify::classify_line;
use crate::columns::reconstruct_columns;
use crate::types::LineKind;

/// Where a screenshot puts its dates relative to the rows they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateStyle {
    /// `Yesterday` / `DoorDash` / `$20.78`: dates head groups of rows.
    Header,
    /// `DoorDash` / `$20.78` / `2/2/26`: each date closes the row above it.
    Trailing,
}

/// A row under construction.
#[derive(Debug, Default)]
struct Pending {
    description: Option<String>,
    amount: Option<SignedAmount>,
    date: Option<NaiveDate>,
}

/// Scan state threaded through one synthesis pass.
struct ScanState {
    style: DateStyle,
    section_date: Option<NaiveDate>,
    pending: Pending,
    rows: Vec<TransactionFields>,
}

impl ScanState {
    fn new(style: DateStyle) -> Self {
        ScanState { style, section_date: None, pending: Pending::default(), rows: Vec::new() }
    }

    /// Emits the pending row if it has an amount, then clears it.
    fn flush(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        let Some(amount) = pending.amount else { return };
        let description = pending.description.unwrap_or_default();
        self.rows.push(row(&description, amount, pending.date.or(self.section_date)));
    }

    fn step(mut self, kind: LineKind) -> Self {
        match kind {
            LineKind::Noise | LineKind::Detail(_) => {}
            LineKind::Header(date) => {
                self.flush();
                self.section_date = Some(date);
            }
            LineKind::DateLine(date) => match self.style {
                DateStyle::Header => {
                    self.flush();
                    self.section_date = Some(date);
                }
                DateStyle::Trailing if self.pending.amount.is_some() => {
                    self.pending.date.get_or_insert(date);
                    self.flush();
                }
                DateStyle::Trailing if self.pending.description.is_some() => {
                    self.pending.date = Some(date);
                }
                DateStyle::Trailing => self.section_date = Some(date),
            },
            LineKind::MerchantLine(name) => {
                if self.pending.amount.is_some() {
                    self.flush();
                }
                self.pending.description = Some(name);
            }
            LineKind::AmountLine { amount, date } => {
                if self.pending.amount.is_some() {
                    self.flush();
                }
                if self.pending.description.is_none() {
                    debug!(amount = %amount.magnitude, "amount with no merchant above it");
                }
                self.pending.amount = Some(amount);
                if date.is_some() {
                    self.pending.date = date;
                }
                if self.pending.date.is_some() || self.style == DateStyle::Header {
                    self.flush();
                }
            }
            LineKind::CombinedLine { description, amount, date } => {
                if self.pending.amount.is_some() {
                    self.flush();
                }
                self.pending =
                    Pending { description: Some(description), amount: Some(amount), date };
                if date.is_some() || self.style == DateStyle::Header {
                    self.flush();
                }
            }
        }
        self
    }

    fn finish(mut self) -> Vec<TransactionFields> {
        self.flush();
        self.rows
    }
}

fn row(description: &str, amount: SignedAmount, date: Option<NaiveDate>) -> TransactionFields {
    let resolution = resolve_kind(None, amount.sign, description);
    let fields = TransactionFields {
        date: date.map(|d| d.to_string()).unwrap_or_default(),
        description: description.to_string(),
        amount: amount.magnitude.to_plain_string(),
        category_hint: String::new(),
        type_hint: resolution.kind.to_string(),
    };
    trace!(?fields, "screenshot row");
    fields
}

fn detect_style(kinds: &[LineKind]) -> DateStyle {
    match kinds.iter().find(|k| k.is_significant()) {
        Some(LineKind::DateLine(_) | LineKind::Header(_)) => DateStyle::Header,
        _ => DateStyle::Trailing,
    }
}

/// Builds a canonical [`ParsedDocument`] from OCR lines.
///
/// `reference` is "now" for relative dates (`3 hours ago`, `Monday`) and the
/// anchor for yearless ones. A screenshot with no amount on it yields an
/// empty document, not an error.
pub fn synthesize_lines<S: AsRef<str>>(lines: &[S], reference: NaiveDate) -> ParsedDocument {
    let mut builder = ParsedDocument::canonical_builder();

    let payroll = PayrollSignals::scan(lines, reference);
    if payroll.is_implicit_paycheck() {
        if let Some(net_pay) = payroll.net_pay {
            debug!(%net_pay, "payroll screenshot without a paycheck label");
            builder.push(TransactionFields {
                date: payroll.period_end.map(|d| d.to_string()).unwrap_or_default(),
                description: "Paycheck".to_string(),
                amount: net_pay.to_plain_string(),
                category_hint: String::new(),
                type_hint: TransactionKind::Income.to_string(),
            });
            return builder.finish();
        }
    }

    let kinds: Vec<LineKind> = lines.iter().map(|l| classify_line(l.as_ref(), reference)).collect();
    debug!(
        lines = kinds.len(),
        significant = kinds.iter().filter(|k| k.is_significant()).count(),
        "classified screenshot lines"
    );

    if let Some(columns) = reconstruct_columns(&kinds) {
        debug!(rows = columns.len(), "column layout detected");
        let section_date = kinds.iter().find_map(|k| match k {
            LineKind::Header(date) => Some(*date),
            _ => None,
        });
        for c in columns {
            builder.push(row(&c.description, c.amount, c.date.or(section_date)));
        }
        return builder.finish();
    }

    let style = detect_style(&kinds);
    let rows = kinds
        .into_iter()
        .fold(ScanState::new(style), ScanState::step)
        .finish();
    for r in rows {
        builder.push(r);
    }
    builder.finish()
}
