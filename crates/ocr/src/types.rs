use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sift_core::SignedAmount;

/// What one recognized line is, decided in isolation from its neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// UI chrome: status bar, navigation labels, balances, bare symbols.
    Noise,
    /// A standalone `Month YYYY` section header.
    Header(NaiveDate),
    MerchantLine(String),
    AmountLine { amount: SignedAmount, date: Option<NaiveDate> },
    DateLine(NaiveDate),
    CombinedLine { description: String, amount: SignedAmount, date: Option<NaiveDate> },
    /// Incidental detail under a transaction. Never becomes a description.
    Detail(DetailTag),
}

impl LineKind {
    /// Lines that take part in row assembly.
    pub fn is_significant(&self) -> bool {
        !matches!(self, LineKind::Noise | LineKind::Detail(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailTag {
    PaymentMethod(PaymentMethod),
    /// `City, ST` or `City, ST 12345`.
    Locality(String),
    Status(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    Visa,
    Mastercard,
    Amex,
    Discover,
    ApplePay,
    GooglePay,
    Debit,
    /// A masked card reference such as `Card ending in 1234`.
    CardEnding(String),
    Other(String),
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Visa => write!(f, "Visa"),
            PaymentMethod::Mastercard => write!(f, "Mastercard"),
            PaymentMethod::Amex => write!(f, "Amex"),
            PaymentMethod::Discover => write!(f, "Discover"),
            PaymentMethod::ApplePay => write!(f, "Apple Pay"),
            PaymentMethod::GooglePay => write!(f, "Google Pay"),
            PaymentMethod::Debit => write!(f, "Debit"),
            PaymentMethod::CardEnding(last4) => write!(f, "Card ending {last4}"),
            PaymentMethod::Other(s) => write!(f, "{s}"),
        }
    }
}

impl PaymentMethod {
    pub(crate) fn from_label(label: &str) -> Self {
        match label.to_lowercase().split_whitespace().collect::<String>().as_str() {
            "visa" => PaymentMethod::Visa,
            "mastercard" | "mc" => PaymentMethod::Mastercard,
            "amex" | "americanexpress" => PaymentMethod::Amex,
            "discover" => PaymentMethod::Discover,
            "applepay" => PaymentMethod::ApplePay,
            "googlepay" | "gpay" => PaymentMethod::GooglePay,
            "debit" | "debitcard" => PaymentMethod::Debit,
            other => PaymentMethod::Other(other.to_string()),
        }
    }
}
