//! The single ordered decision table for income vs. expense.
//!
//! Every synthesizer and the mapper go through [`resolve_kind`], so a row
//! can never be income by one heuristic and expense by another.

use crate::amount::{find_amounts, Sign};
use crate::document::TransactionKind;
use crate::re;

re!(re_payment_vocabulary,
    r"(?i)\b(payments?|pymt|deposits?|paycheck|payroll|direct\s+dep|ach\s+credit|salary)\b");
re!(re_summary_vocabulary,
    r"(?i)(transaction\s+summary|total\s+payments?\s+(?:and\s+credits\s+)?for\s+this\s+period|\btotals?\b.*\b(?:period|year|cycle)\b|total\s+(?:fees|interest|purchases|charges|credits|debits|payments|daily\s+cash)|interest\s+charge|annual\s+percentage\s+rate|\brewards?\s+(?:earned|balance|summary)|daily\s+cash\s+(?:earned|summary|total)|(?:previous|new|statement|beginning|ending|opening|closing)\s+balance|minimum\s+payment|payment\s+due\s+date|credit\s+limit|available\s+credit|page\s+\d+\s+of\s+\d+)");
re!(re_apr_rate,
    r"(?i)\(apr\)|\bapr\b\s*[:=]?\s*\d+(?:\.\d+)?\s?%|\d+(?:\.\d+)?\s?%\s*\(?apr\b");
re!(re_loyalty_points,
    r"(?i)\bpoints?\s+(?:earned|balance|redeemed|available)\b|\b(?:earned|redeemed|available)\s+points?\b");

/// True when a description reads like money coming in: a payment, deposit,
/// paycheck, payroll or ACH credit.
pub fn has_payment_vocabulary(description: &str) -> bool {
    re_payment_vocabulary().is_match(description)
}

/// True for statement summary and disclosure lines: period totals, balance
/// and due-date labels, APR disclosures, and loyalty point tallies. Month
/// abbreviations (`Apr 05`) and merchants named `Point …` are not boilerplate.
pub fn is_statement_boilerplate(line: &str) -> bool {
    if re_summary_vocabulary().is_match(line) || re_apr_rate().is_match(line) {
        return true;
    }
    re_loyalty_points().is_match(line) && !find_amounts(line).iter().any(|t| t.has_symbol)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindResolution {
    pub kind: TransactionKind,
    /// The row is income because of payment/deposit vocabulary.
    pub by_vocabulary: bool,
}

/// Resolves a row's kind. First matching rule wins:
///
/// 1. an explicit type hint from the source row;
/// 2. payment/deposit vocabulary in the description → income, whatever the sign;
/// 3. a leading `+` → income;
/// 4. anything else (a `-`, or no sign) → expense.
pub fn resolve_kind(
    hint: Option<TransactionKind>,
    sign: Sign,
    description: &str,
) -> KindResolution {
    let vocabulary = has_payment_vocabulary(description);
    let kind = match (hint, vocabulary, sign) {
        (Some(kind), _, _) => kind,
        (None, true, _) => TransactionKind::Income,
        (None, false, Sign::Positive) => TransactionKind::Income,
        (None, false, Sign::Negative | Sign::Unsigned) => TransactionKind::Expense,
    };
    KindResolution { kind, by_vocabulary: kind == TransactionKind::Income && vocabulary }
}
