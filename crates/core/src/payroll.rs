//! Paystub signals shared by the screenshot and statement paths.

use chrono::NaiveDate;

use crate::amount::find_amounts;
use crate::date::find_date;
use crate::money::Money;
use crate::period::DateRange;
use crate::re;

re!(re_net_label,
    r"(?i)\b(net\s+pay|net\s+amount|net\s+check|total\s+net|take[\s-]*home(?:\s+pay)?|earned\s+this\s+period)\b");
re!(re_gross_word, r"(?i)\bgross\b");
re!(re_withholding,
    r"(?i)\b(fed(?:eral)?\s+(?:income\s+)?tax|fed(?:eral)?\s+withholding|state\s+(?:income\s+)?tax|social\s+security|medicare|fica|oasdi|withholding)\b");
re!(re_period_end_label, r"(?i)\bperiod\s+end(?:ing)?(?:\s+date)?\s*:?");
re!(re_paycheck_word, r"(?i)\bpaycheck\b");

/// How far below a net-pay label to look for its figure.
const NET_PAY_LOOKAHEAD: usize = 3;

/// Everything payroll-shaped found in a block of lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayrollSignals {
    /// The net/take-home figure. Never the gross figure or a tax line.
    pub net_pay: Option<Money>,
    pub period: Option<DateRange>,
    pub period_end: Option<NaiveDate>,
    pub has_withholding: bool,
    pub mentions_paycheck: bool,
}

impl PayrollSignals {
    pub fn scan<S: AsRef<str>>(lines: &[S], reference: NaiveDate) -> Self {
        let period = find_pay_period(lines, reference);
        let period_end =
            period.map(|p| p.end).or_else(|| find_labelled_period_end(lines, reference));
        PayrollSignals {
            net_pay: find_net_pay(lines),
            period,
            period_end,
            has_withholding: lines.iter().any(|l| re_withholding().is_match(l.as_ref())),
            mentions_paycheck: lines.iter().any(|l| re_paycheck_word().is_match(l.as_ref())),
        }
    }

    /// A paystub without the word "paycheck": net figure, pay-period range and
    /// tax withholding all present.
    pub fn is_implicit_paycheck(&self) -> bool {
        !self.mentions_paycheck
            && self.net_pay.is_some()
            && self.period.is_some()
            && self.has_withholding
    }
}

/// The amount attached to a net/take-home label, on the label's own line or
/// on one of the few lines right below it.
pub fn find_net_pay<S: AsRef<str>>(lines: &[S]) -> Option<Money> {
    for (i, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let Some(label) = re_net_label().find(line) else { continue };
        if re_gross_word().is_match(line) {
            continue;
        }
        if let Some(token) = find_amounts(&line[label.end()..]).first() {
            return Some(token.amount.magnitude);
        }
        for next in lines.iter().skip(i + 1).take(NET_PAY_LOOKAHEAD) {
            let next = next.as_ref();
            if re_gross_word().is_match(next) || re_withholding().is_match(next) {
                break;
            }
            if let Some(token) = find_amounts(next).first() {
                if !next[..token.start].chars().any(char::is_alphabetic) {
                    return Some(token.amount.magnitude);
                }
                break;
            }
        }
    }
    None
}

/// The first date range in the block, preferring lines that mention a period.
pub fn find_pay_period<S: AsRef<str>>(lines: &[S], reference: NaiveDate) -> Option<DateRange> {
    let ranges: Vec<(bool, DateRange)> = lines
        .iter()
        .filter_map(|l| {
            let l = l.as_ref();
            DateRange::find_in(l, reference).map(|r| (l.to_lowercase().contains("period"), r))
        })
        .collect();
    ranges
        .iter()
        .find(|(labelled, _)| *labelled)
        .or_else(|| ranges.first())
        .map(|(_, r)| *r)
}

fn find_labelled_period_end<S: AsRef<str>>(lines: &[S], reference: NaiveDate) -> Option<NaiveDate> {
    for (i, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let Some(label) = re_period_end_label().find(line) else { continue };
        if let Some(token) = find_date(&line[label.end()..], reference) {
            return Some(token.date);
        }
        if let Some(next) = lines.get(i + 1) {
            if let Some(token) = find_date(next.as_ref(), reference) {
                return Some(token.date);
            }
        }
    }
    None
}
