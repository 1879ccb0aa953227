use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::money::Money;
use crate::re;

/// Sign as written in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sign {
    Positive,
    Negative,
    Unsigned,
}

/// A parsed amount: a non-negative magnitude plus the sign the source showed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedAmount {
    pub magnitude: Money,
    pub sign: Sign,
}

impl SignedAmount {
    pub fn new(magnitude: Money, sign: Sign) -> Self {
        Self { magnitude, sign }
    }

    pub fn unsigned(magnitude: Money) -> Self {
        Self::new(magnitude, Sign::Unsigned)
    }
}

/// An amount located inside a longer line of text. `start..end` is a byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountToken {
    pub start: usize,
    pub end: usize,
    pub amount: SignedAmount,
    pub has_symbol: bool,
}

re!(re_amount_token,
    r"(?P<sign>[+\-−–]\s?)?(?P<sym>\$\s?)?(?P<sign2>[+\-−])?(?P<num>\d{1,3}(?:,\d{3})+(?:\.\d{2})?|\d+(?:\.\d{2})?)");
re!(re_trailing_marker, r"^\s?(CR|DR)\b");

/// Parses a whole field as an amount: `$1,030.27`, `-45.44`, `+$5`, `(75.25)`,
/// `45.00-`, `12.00 CR`. Returns `None` for anything else.
pub fn parse_amount(raw: &str) -> Option<SignedAmount> {
    let mut s = raw.trim().replace(['−', '–'], "-");
    let mut sign = Sign::Unsigned;

    if s.len() >= 2 && s.starts_with('(') && s.ends_with(')') {
        s = s[1..s.len() - 1].trim().to_string();
        sign = Sign::Negative;
    }

    let upper = s.to_ascii_uppercase();
    if let Some(rest) = upper.strip_suffix("USD") {
        s.truncate(rest.trim_end().len());
    }
    let upper = s.to_ascii_uppercase();
    if let Some(rest) = upper.strip_suffix("CR") {
        s.truncate(rest.trim_end().len());
        sign = Sign::Positive;
    } else if let Some(rest) = upper.strip_suffix("DR") {
        s.truncate(rest.trim_end().len());
        sign = Sign::Negative;
    }

    let mut cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();

    if let Some(rest) = cleaned.strip_prefix('+') {
        cleaned = rest.to_string();
        sign = Sign::Positive;
    } else if let Some(rest) = cleaned.strip_prefix('-') {
        cleaned = rest.to_string();
        sign = Sign::Negative;
    } else if let Some(rest) = cleaned.strip_suffix('-') {
        cleaned = rest.to_string();
        sign = Sign::Negative;
    }

    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let dec = Decimal::from_str(&cleaned).ok()?;
    Some(SignedAmount::new(Money::from_decimal(dec), sign))
}

/// Finds currency amounts inside free text, in order of appearance.
///
/// A token counts as an amount only when it carries a `$` or exactly two
/// decimal places, so dates, times, percentages, card digits and store
/// numbers are never picked up.
pub fn find_amounts(text: &str) -> Vec<AmountToken> {
    let mut tokens = Vec::new();

    for caps in re_amount_token().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let Some(num) = caps.name("num") else { continue };
        let has_symbol = caps.name("sym").is_some();
        if !has_symbol && !num.as_str().contains('.') {
            continue;
        }

        let mut start = whole.start();
        let mut sign_char = caps
            .name("sign")
            .or_else(|| caps.name("sign2"))
            .and_then(|m| m.as_str().chars().next());

        // A sign glued to a preceding word is a hyphen, not a sign.
        if let Some(sign_match) = caps.name("sign") {
            if prev_char(text, sign_match.start()).is_some_and(|c| c.is_alphanumeric()) {
                start = sign_match.end();
                sign_char = caps.name("sign2").and_then(|m| m.as_str().chars().next());
            }
        }

        if prev_char(text, start).is_some_and(|c| c.is_alphanumeric() || c == '/' || c == '.') {
            continue;
        }
        let mut end = whole.end();
        if next_char(text, end).is_some_and(|c| c.is_ascii_digit() || c == '%' || c == '/') {
            continue;
        }

        let mut sign = match sign_char {
            Some('+') => Sign::Positive,
            Some(_) => Sign::Negative,
            None => Sign::Unsigned,
        };

        let rest = &text[end..];
        if sign == Sign::Unsigned {
            if prev_char(text, start) == Some('(') && rest.starts_with(')') {
                start -= 1;
                end += 1;
                sign = Sign::Negative;
            } else if let Some(marker) = re_trailing_marker().captures(rest) {
                let positive = &marker[1] == "CR";
                sign = if positive { Sign::Positive } else { Sign::Negative };
                end += marker[0].len();
            } else if rest.starts_with('-')
                && !next_char(rest, 1).is_some_and(|c| c.is_ascii_digit() || c == '$')
            {
                sign = Sign::Negative;
                end += 1;
            }
        }

        let Ok(dec) = Decimal::from_str(&num.as_str().replace(',', "")) else {
            continue;
        };
        tokens.push(AmountToken {
            start,
            end,
            amount: SignedAmount::new(Money::from_decimal(dec), sign),
            has_symbol,
        });
    }

    tokens
}

fn prev_char(text: &str, byte_idx: usize) -> Option<char> {
    text.get(..byte_idx)?.chars().next_back()
}

fn next_char(text: &str, byte_idx: usize) -> Option<char> {
    text.get(byte_idx..)?.chars().next()
}
