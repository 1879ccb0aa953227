use serde::{Deserialize, Serialize};
use std::fmt;

/// Header set every line-based synthesizer emits.
pub const CANONICAL_HEADERS: [&str; 5] = ["Date", "Description", "Amount", "Category", "Type"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Expense,
    Income,
}

impl TransactionKind {
    /// Reads a free-text type column (`Sale`, `Payment`, `Credit`, …).
    pub fn from_hint(hint: &str) -> Option<Self> {
        match hint.trim().to_lowercase().as_str() {
            "income" | "credit" | "deposit" | "payment" | "refund" | "return" => {
                Some(TransactionKind::Income)
            }
            "expense" | "debit" | "sale" | "purchase" | "withdrawal" | "fee" => {
                Some(TransactionKind::Expense)
            }
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Expense => write!(f, "expense"),
            TransactionKind::Income => write!(f, "income"),
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expense" => Ok(TransactionKind::Expense),
            "income" => Ok(TransactionKind::Income),
            other => Err(format!("Unknown transaction kind: '{other}'")),
        }
    }
}

/// One canonical row before it is flattened into text fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFields {
    pub date: String,
    pub description: String,
    pub amount: String,
    pub category_hint: String,
    pub type_hint: String,
}

impl TransactionFields {
    fn into_fields(self) -> Vec<String> {
        vec![self.date, self.description, self.amount, self.category_hint, self.type_hint]
    }
}

/// Row/column text produced by a synthesizer. Every row has exactly
/// `headers.len()` fields; field contents are unvalidated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ParsedDocument {
    pub fn builder(headers: Vec<String>) -> DocumentBuilder {
        DocumentBuilder { headers, rows: Vec::new() }
    }

    pub fn canonical_builder() -> DocumentBuilder {
        Self::builder(CANONICAL_HEADERS.iter().map(|h| h.to_string()).collect())
    }

    /// A canonical document with no rows.
    pub fn empty() -> Self {
        Self::canonical_builder().finish()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Accumulates rows for a [`ParsedDocument`]; the document is immutable once
/// [`DocumentBuilder::finish`] returns it.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl DocumentBuilder {
    /// Appends a row, padding with empty fields or truncating to the header
    /// count. Returns how many fields were dropped.
    pub fn push_fields(&mut self, mut fields: Vec<String>) -> usize {
        let width = self.headers.len();
        let dropped = fields.len().saturating_sub(width);
        fields.resize(width, String::new());
        self.rows.push(fields);
        dropped
    }

    /// Appends a canonical row. Only meaningful on a canonical builder.
    pub fn push(&mut self, row: TransactionFields) {
        self.push_fields(row.into_fields());
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn finish(self) -> ParsedDocument {
        ParsedDocument { headers: self.headers, rows: self.rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn canonical_rows_match_header_width() {
        let mut b = ParsedDocument::canonical_builder();
        b.push(TransactionFields {
            date: "2026-02-02".into(),
            description: "DoorDash".into(),
            amount: "20.78".into(),
            ..Default::default()
        });
        let doc = b.finish();
        assert_eq!(doc.headers().len(), 5);
        assert_eq!(doc.rows()[0].len(), 5);
        assert_eq!(doc.rows()[0][1], "DoorDash");
    }

    #[test]
    fn ragged_rows_are_padded_or_truncated() {
        let mut b = ParsedDocument::builder(vec!["A".into(), "B".into()]);
        assert_eq!(b.push_fields(vec!["1".into()]), 0);
        assert_eq!(b.push_fields(vec!["1".into(), "2".into(), "3".into()]), 1);
        let doc = b.finish();
        assert!(doc.rows().iter().all(|r| r.len() == 2));
        assert_eq!(doc.rows()[0], vec!["1".to_string(), String::new()]);
    }

    #[test]
    fn empty_document_is_canonical() {
        let doc = ParsedDocument::empty();
        assert!(doc.is_empty());
        assert_eq!(doc.headers()[4], "Type");
    }

    #[test]
    fn kind_roundtrip_and_hints() {
        assert_eq!(
            TransactionKind::from_str(&TransactionKind::Income.to_string()).unwrap(),
            TransactionKind::Income
        );
        assert_eq!(TransactionKind::from_hint(" Sale "), Some(TransactionKind::Expense));
        assert_eq!(TransactionKind::from_hint("Payment"), Some(TransactionKind::Income));
        assert_eq!(TransactionKind::from_hint("adjustment"), None);
    }
}
