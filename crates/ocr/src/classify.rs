//! Line classification: one recognized line in, one [`LineKind`] out.
//!
//! Each check is a small predicate tried in a fixed order, so a new app
//! layout means a new predicate rather than a rewrite of the synthesizer.

use chrono::NaiveDate;
use sift_core::date::{find_date, month_header, resolve_date};
use sift_core::{find_amounts, is_statement_boilerplate, re};

use crate::types::{DetailTag, LineKind, PaymentMethod};

// ── Compiled regex cache ─────────────────────────────────────────────────────

re!(re_glyphs, r"[›»❯〉⟩>]");
re!(re_percent, r"[+\-−]?\d+(?:\.\d+)?\s?%");
re!(re_daily_cash, r"(?i)\bdaily\s+cash\b");
re!(re_status_bar,
    r"(?i)^\d{1,2}:\d{2}(?:\s?[ap]m)?(?:\s+(?:[^\sa-z]+|lte|5g|4g|3g|wi-?fi))*$");
re!(re_trend_words,
    r"(?i)\b(today|this\s+(?:week|month|year)|past\s+(?:day|week|month|year)|ytd|all\s+time|1d|1w|1m|1y)\b");
re!(re_balance_label,
    r"(?i)^(?:current|available|statement|total|card|account|new|previous|remaining)?\s*(?:balance|credit\s+limit|available\s+credit|credit\s+available|available|payment\s+due|minimum\s+payment|min\.?\s+payment)\b");
re!(re_reference_label,
    r"(?i)^(?:transaction|reference|ref|confirmation|auth(?:orization)?|trace|order)\s*(?:id\b|#|no\.?|number\b|code\b)");
re!(re_time_of_day, r"(?i)\b\d{1,2}:\d{2}(?:\s?[ap]m)?\b");
re!(re_date_connectors, r"(?i)\bat\b|[·•|]|\s[-–—]\s|\bpending\b|\bposted\b");
re!(re_payment_method,
    r"(?i)^(?:paid\s+(?:with|via)\s+)?(visa|master\s*card|amex|american\s+express|discover|apple\s+pay|google\s+pay|gpay|debit(?:\s+card)?)(?:\s+card)?(?:\s*[•*x]*\s*\d{4})?$");
re!(re_card_ending,
    r"(?i)^(?:\w+\s+)?(?:card\s+)?(?:ending(?:\s+in)?|[•*]{2,}|x{2,})\s*(\d{4})$");
re!(re_locality, r"^[A-Za-z][A-Za-z .'\-]*,\s*[A-Z]{2}(?:\s+\d{5}(?:-\d{4})?)?$");
re!(re_status,
    r"(?i)^(pending|posted|completed?|declined|authorized|processing|refunded|cleared|in\s+progress)$");

/// Exact (case-insensitive) navigation and section labels seen in banking apps.
const NAV_LABELS: &[&str] = &[
    "latest transactions", "recent transactions", "transactions", "activity",
    "recent activity", "home", "wallet", "search", "see all", "show all",
    "view all", "see more", "show more", "done", "back", "edit", "filter",
    "cancel", "menu", "more", "details", "accounts", "statements", "pay early",
    "make a payment", "offers", "rewards", "settings", "help", "spending",
    "summary", "weekly activity", "monthly activity",
];

const MAX_LINE_LEN: usize = 120;

// ── Public API ───────────────────────────────────────────────────────────────

/// Classifies one recognized line. `reference` anchors relative and
/// yearless dates.
pub fn classify_line(raw: &str, reference: NaiveDate) -> LineKind {
    let line = strip_glyphs(raw);
    if is_noise(&line) {
        return LineKind::Noise;
    }
    let line = strip_percentages(&line);
    if line.is_empty() {
        return LineKind::Noise;
    }

    if let Some(kind) = classify_amount_line(&line, reference) {
        return kind;
    }
    if let Some(date) = month_header(&line) {
        return LineKind::Header(date);
    }
    if let Some(date) = date_only(&line, reference) {
        return LineKind::DateLine(date);
    }
    if let Some(tag) = detail_tag(&line) {
        return LineKind::Detail(tag);
    }
    if letter_count(&line) >= 2 {
        return LineKind::MerchantLine(line);
    }
    LineKind::Noise
}

// ── Cleanup ──────────────────────────────────────────────────────────────────

fn strip_glyphs(raw: &str) -> String {
    let replaced = re_glyphs().replace_all(raw, " ");
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_percentages(line: &str) -> String {
    let without = re_percent().replace_all(line, " ");
    let without = re_daily_cash().replace_all(&without, " ");
    without.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn letter_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_alphabetic()).count()
}

// ── Noise ────────────────────────────────────────────────────────────────────

fn is_noise(line: &str) -> bool {
    if !line.chars().any(char::is_alphanumeric) || line.len() > MAX_LINE_LEN {
        return true;
    }
    let lower = line.trim_end_matches([':', '.']).to_lowercase();
    if NAV_LABELS.contains(&lower.as_str()) {
        return true;
    }
    if re_status_bar().is_match(line)
        || re_balance_label().is_match(line)
        || re_reference_label().is_match(line)
        || is_statement_boilerplate(line)
    {
        return true;
    }
    if line.contains('%') {
        // Percent figures with no money on the line, or market-style trend
        // suffixes (`▲ $1.20 (0.4%) Today`), are never transactions.
        return find_amounts(&strip_percentages(line)).is_empty() || re_trend_words().is_match(line);
    }
    false
}

// ── Amount-bearing lines ─────────────────────────────────────────────────────

fn classify_amount_line(line: &str, reference: NaiveDate) -> Option<LineKind> {
    let token = *find_amounts(line).first()?;
    let before = &line[..token.start];
    let after = &line[token.end..];

    let (leading_date, rest) = split_leading_date(before, reference);
    let description = rest
        .trim()
        .trim_matches(|c: char| matches!(c, '-' | ':' | '·' | '•' | '|' | ','))
        .trim();
    let date = leading_date.or_else(|| find_date(after, reference).map(|t| t.date));

    if letter_count(description) >= 2 {
        return Some(LineKind::CombinedLine {
            description: description.to_string(),
            amount: token.amount,
            date,
        });
    }
    let date = date.or_else(|| resolve_date(description, reference));
    Some(LineKind::AmountLine { amount: token.amount, date })
}

/// Splits a date off the front of a description. Only tokens carrying a
/// digit count, so `Sunday Brunch` or `May's Cafe` keep their names.
fn split_leading_date(text: &str, reference: NaiveDate) -> (Option<NaiveDate>, &str) {
    let trimmed = text.trim_start();
    match find_date(trimmed, reference) {
        Some(t) if t.start == 0 && trimmed[..t.end].chars().any(|c| c.is_ascii_digit()) => {
            (Some(t.date), &trimmed[t.end..])
        }
        _ => (None, trimmed),
    }
}

// ── Dates ────────────────────────────────────────────────────────────────────

fn date_only(line: &str, reference: NaiveDate) -> Option<NaiveDate> {
    if let Some(date) = resolve_date(line, reference) {
        return Some(date);
    }
    let stripped = re_time_of_day().replace_all(line, " ");
    let stripped = re_date_connectors().replace_all(&stripped, " ");
    let stripped = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    let stripped = stripped.trim_matches(|c: char| c == ',' || c == '-');
    if stripped.is_empty() {
        return None;
    }
    resolve_date(stripped, reference)
}

// ── Detail tags ──────────────────────────────────────────────────────────────

fn detail_tag(line: &str) -> Option<DetailTag> {
    if let Some(c) = re_payment_method().captures(line) {
        let label = c.get(1)?.as_str();
        return Some(DetailTag::PaymentMethod(PaymentMethod::from_label(label)));
    }
    if let Some(c) = re_card_ending().captures(line) {
        let last4 = c.get(1)?.as_str().to_string();
        return Some(DetailTag::PaymentMethod(PaymentMethod::CardEnding(last4)));
    }
    if re_locality().is_match(line) {
        return Some(DetailTag::Locality(line.to_string()));
    }
    if re_status().is_match(line) {
        return Some(DetailTag::Status(line.to_string()));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_core::{Money, Sign, SignedAmount};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn reference() -> NaiveDate {
        d(2026, 2, 11)
    }

    fn classify(line: &str) -> LineKind {
        classify_line(line, reference())
    }

    // ── Noise ────────────────────────────────────────────────────────────────

    #[test]
    fn ui_chrome_is_noise() {
        for line in [
            "9:41",
            "9:41 AM",
            "9:41 5G 100%",
            "%",
            ">",
            "...",
            "…",
            "›",
            "Latest Transactions",
            "See All",
        ] {
            assert_eq!(classify(line), LineKind::Noise, "{line:?}");
        }
    }

    #[test]
    fn percent_and_trend_lines_are_noise() {
        assert_eq!(classify("2%"), LineKind::Noise);
        assert_eq!(classify("2% Daily Cash"), LineKind::Noise);
        assert_eq!(classify("▲ $1.20 (0.4%) Today"), LineKind::Noise);
    }

    #[test]
    fn balance_and_reference_labels_are_noise() {
        assert_eq!(classify("Card Balance $1,234.56"), LineKind::Noise);
        assert_eq!(classify("Available Credit"), LineKind::Noise);
        assert_eq!(classify("Minimum Payment Due $35.00"), LineKind::Noise);
        assert_eq!(classify("Transaction ID 8823AB"), LineKind::Noise);
        assert_eq!(classify("Order #12345"), LineKind::Noise);
    }

    #[test]
    fn statement_summary_lines_are_noise() {
        for line in [
            "Transaction Summary",
            "Total payments for this period -$1,030.27",
            "Interest Charge on Purchases $12.40",
            "Annual Percentage Rate (APR) 24.24%",
            "Points earned 1,204",
        ] {
            assert_eq!(classify(line), LineKind::Noise, "{line:?}");
        }
        assert!(matches!(classify("POINT LOMA SEAFOOD $42.00"), LineKind::CombinedLine { .. }));
    }

    // ── Amounts ──────────────────────────────────────────────────────────────

    #[test]
    fn amount_with_trailing_glyph_and_percent() {
        assert_eq!(
            classify("$20.78 > 2%"),
            LineKind::AmountLine {
                amount: SignedAmount::unsigned(Money::from_cents(2078)),
                date: None,
            }
        );
    }

    #[test]
    fn combined_line_with_sign() {
        assert_eq!(
            classify("Payment +$1,030.27"),
            LineKind::CombinedLine {
                description: "Payment".into(),
                amount: SignedAmount::new(Money::from_cents(103027), Sign::Positive),
                date: None,
            }
        );
    }

    #[test]
    fn combined_line_with_trailing_and_leading_dates() {
        assert_eq!(
            classify("Starbucks $5.50 Yesterday"),
            LineKind::CombinedLine {
                description: "Starbucks".into(),
                amount: SignedAmount::unsigned(Money::from_cents(550)),
                date: Some(d(2026, 2, 10)),
            }
        );
        assert_eq!(
            classify("2/2 DoorDash $20.78"),
            LineKind::CombinedLine {
                description: "DoorDash".into(),
                amount: SignedAmount::unsigned(Money::from_cents(2078)),
                date: Some(d(2026, 2, 2)),
            }
        );
    }

    #[test]
    fn weekday_named_merchant_keeps_its_name() {
        match classify("Sunday Brunch $42.00") {
            LineKind::CombinedLine { description, date, .. } => {
                assert_eq!(description, "Sunday Brunch");
                assert_eq!(date, None);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn date_then_amount_is_an_amount_line() {
        assert_eq!(
            classify("Feb 2 -$4.50"),
            LineKind::AmountLine {
                amount: SignedAmount::new(Money::from_cents(450), Sign::Negative),
                date: Some(d(2026, 2, 2)),
            }
        );
    }

    // ── Dates ────────────────────────────────────────────────────────────────

    #[test]
    fn date_lines() {
        assert_eq!(classify("2/2/26"), LineKind::DateLine(d(2026, 2, 2)));
        assert_eq!(classify("Yesterday"), LineKind::DateLine(d(2026, 2, 10)));
        assert_eq!(classify("Monday"), LineKind::DateLine(d(2026, 2, 9)));
        assert_eq!(classify("3 hours ago"), LineKind::DateLine(reference()));
        assert_eq!(classify("Pending - Yesterday"), LineKind::DateLine(d(2026, 2, 10)));
        assert_eq!(classify("Feb 2 at 7:42 PM"), LineKind::DateLine(d(2026, 2, 2)));
    }

    #[test]
    fn month_header() {
        assert_eq!(classify("January 2026"), LineKind::Header(d(2026, 1, 1)));
    }

    // ── Details and merchants ────────────────────────────────────────────────

    #[test]
    fn detail_lines() {
        let method = |m| LineKind::Detail(DetailTag::PaymentMethod(m));
        assert_eq!(classify("Apple Pay"), method(PaymentMethod::ApplePay));
        assert_eq!(classify("Visa 1234"), method(PaymentMethod::Visa));
        assert_eq!(
            classify("Card ending in 4821"),
            LineKind::Detail(DetailTag::PaymentMethod(PaymentMethod::CardEnding("4821".into())))
        );
        assert_eq!(
            classify("San Francisco, CA"),
            LineKind::Detail(DetailTag::Locality("San Francisco, CA".into()))
        );
        assert_eq!(classify("Pending"), LineKind::Detail(DetailTag::Status("Pending".into())));
    }

    #[test]
    fn merchant_lines() {
        assert_eq!(classify("DoorDash"), LineKind::MerchantLine("DoorDash".into()));
        assert_eq!(
            classify("Blue Bottle Coffee ›"),
            LineKind::MerchantLine("Blue Bottle Coffee".into())
        );
        assert_eq!(classify("82639"), LineKind::Noise);
    }
}
