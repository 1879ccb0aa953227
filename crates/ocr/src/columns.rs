//! Column reconstruction for screenshots where the recognizer read a table
//! column by column: every merchant, then every date, then every amount.

use chrono::NaiveDate;
use sift_core::SignedAmount;

use crate::types::LineKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Merchant,
    Amount,
    Date,
}

/// One positionally paired row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRow {
    pub description: String,
    pub amount: SignedAmount,
    pub date: Option<NaiveDate>,
}

/// Pairs merchants, amounts and dates by position when the significant lines
/// form two or three contiguous single-kind runs of equal length (at least
/// two each), one of merchants and one of amounts. Returns `None` for
/// interleaved layouts.
pub fn reconstruct_columns(kinds: &[LineKind]) -> Option<Vec<ColumnRow>> {
    let mut merchants = Vec::new();
    let mut amounts = Vec::new();
    let mut dates = Vec::new();
    let mut runs: Vec<(Column, usize)> = Vec::new();

    for kind in kinds {
        let column = match kind {
            LineKind::MerchantLine(name) => {
                merchants.push(name.clone());
                Column::Merchant
            }
            LineKind::AmountLine { amount, date } => {
                amounts.push((*amount, *date));
                Column::Amount
            }
            LineKind::DateLine(date) => {
                dates.push(*date);
                Column::Date
            }
            LineKind::Noise | LineKind::Detail(_) | LineKind::Header(_) => continue,
            LineKind::CombinedLine { .. } => return None,
        };
        match runs.last_mut() {
            Some((last, len)) if *last == column => *len += 1,
            _ => runs.push((column, 1)),
        }
    }

    if !(2..=3).contains(&runs.len()) {
        return None;
    }
    let n = runs[0].1;
    if n < 2 || runs.iter().any(|(_, len)| *len != n) {
        return None;
    }
    for (i, (column, _)) in runs.iter().enumerate() {
        if runs[..i].iter().any(|(c, _)| c == column) {
            return None;
        }
    }
    if merchants.is_empty() || amounts.is_empty() {
        return None;
    }

    let rows = merchants
        .into_iter()
        .zip(amounts)
        .enumerate()
        .map(|(i, (description, (amount, inline_date)))| ColumnRow {
            description,
            amount,
            date: dates.get(i).copied().or(inline_date),
        })
        .collect();
    Some(rows)
}
