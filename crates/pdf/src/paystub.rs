use chrono::NaiveDate;
use sift_core::{ParsedDocument, PayrollSignals, TransactionFields, TransactionKind};
use tracing::debug;

use crate::error::StatementError;

/// Paystub mode: exactly one income row titled `Paycheck`, carrying the net
/// (take-home) figure and dated at the pay-period end.
///
/// A stub whose period end cannot be found still yields its row, with an
/// empty date for the reviewer to fill in.
pub fn synthesize_paystub<S: AsRef<str>>(
    lines: &[S],
    reference: NaiveDate,
) -> Result<ParsedDocument, StatementError> {
    let signals = PayrollSignals::scan(lines, reference);
    let net_pay = signals.net_pay.ok_or(StatementError::NoNetPay)?;
    debug!(%net_pay, period_end = ?signals.period_end, "paystub parsed");

    let mut builder = ParsedDocument::canonical_builder();
    builder.push(TransactionFields {
        date: signals.period_end.map(|d| d.to_string()).unwrap_or_default(),
        description: "Paycheck".to_string(),
        amount: net_pay.to_plain_string(),
        category_hint: String::new(),
        type_hint: TransactionKind::Income.to_string(),
    });
    Ok(builder.finish())
}
