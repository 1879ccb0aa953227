//! Merchant keys: the stable lookup form of a free-text description.

use crate::re;

re!(re_processor_prefix,
    r"^(?:(?:SQ|TST|PAYPAL|PP|SP|PY|DD|IC)\s?\*\s*|(?:POS(?:\s+(?:DEBIT|PURCHASE))?|DEBIT\s+CARD\s+PURCHASE|CHECKCARD|CHECK\s+CARD|PURCHASE\s+AUTHORIZED\s+ON\s+\d{1,2}/\d{1,2})\s+)");

const TRAILING_NOISE: &[&str] = &["STORE", "STR", "NO", "NUM", "POS", "TERMINAL", "TERM", "ID"];

/// Canonicalizes a description into a merchant key.
///
/// Uppercases, strips payment-processor and POS prefixes, turns punctuation
/// into spaces, collapses whitespace, and drops trailing store numbers,
/// terminal IDs and masked card digits. The first word is always kept.
/// Total and deterministic: empty input yields an empty key.
pub fn normalize_key(raw: &str) -> String {
    let mut text = raw.trim().to_uppercase();
    loop {
        let stripped = re_processor_prefix().replace(&text, "").trim_start().to_string();
        if stripped == text || stripped.is_empty() {
            break;
        }
        text = stripped;
    }

    let flattened: String = text
        .chars()
        .filter(|c| !matches!(c, '\'' | '’'))
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    let mut tokens: Vec<&str> = flattened.split_whitespace().collect();
    while tokens.len() > 1 && tokens.last().is_some_and(|t| is_noise_token(t)) {
        tokens.pop();
    }
    tokens.join(" ")
}

fn is_noise_token(token: &str) -> bool {
    if TRAILING_NOISE.contains(&token) {
        return true;
    }
    let digits = token.chars().filter(|c| c.is_ascii_digit()).count();
    digits > 0 && (digits == token.chars().count() || digits >= 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercases_and_collapses_whitespace() {
        assert_eq!(normalize_key("  Door   Dash "), "DOOR DASH");
        assert_eq!(normalize_key("DoorDash"), "DOORDASH");
    }

    #[test]
    fn strips_store_numbers_and_punctuation() {
        assert_eq!(normalize_key("ARCO#82639"), "ARCO");
        assert_eq!(normalize_key("Whole-Foods #123"), "WHOLE FOODS");
        assert_eq!(normalize_key("TARGET STORE 0042"), "TARGET");
        assert_eq!(normalize_key("McDonald's F12345"), "MCDONALDS");
    }

    #[test]
    fn strips_processor_prefixes() {
        assert_eq!(normalize_key("SQ *BLUE BOTTLE COFFEE 0123"), "BLUE BOTTLE COFFEE");
        assert_eq!(normalize_key("TST* Joe's Pizza"), "JOES PIZZA");
        assert_eq!(normalize_key("POS DEBIT SHELL OIL 5744"), "SHELL OIL");
        assert_eq!(normalize_key("PAYPAL *SPOTIFY"), "SPOTIFY");
    }

    #[test]
    fn strips_masked_card_digits() {
        assert_eq!(
            normalize_key("APPLECARD GSBANK PAYMENT ACH WEB x8892"),
            "APPLECARD GSBANK PAYMENT ACH WEB"
        );
        assert_eq!(normalize_key("AMAZON.COM*AB12CD3"), "AMAZON COM");
    }

    #[test]
    fn keeps_leading_numeric_names() {
        assert_eq!(normalize_key("76"), "76");
        assert_eq!(normalize_key("7-ELEVEN 39281"), "7 ELEVEN");
    }

    #[test]
    fn same_merchant_different_noise_same_key() {
        assert_eq!(normalize_key("arco #1234"), normalize_key("ARCO#82639"));
    }

    #[test]
    fn empty_and_symbol_only_inputs_are_empty() {
        assert_eq!(normalize_key(""), "");
        assert_eq!(normalize_key("  *** "), "");
    }
}
