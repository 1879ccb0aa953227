use csv::StringRecord;
use sift_core::date::parse_date;
use sift_core::{parse_amount, ParsedDocument};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabularError {
    #[error("Not tabular: no comma, tab or semicolon in the first line")]
    NotTabular,
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Delimiters tried on the first non-empty line. Ties go to the earlier one.
const DELIMITERS: [u8; 3] = [b',', b'\t', b';'];

/// The delimiter appearing most often in the first non-empty line, if any.
pub fn detect_delimiter(text: &str) -> Option<u8> {
    let first = text.lines().find(|l| !l.trim().is_empty())?;
    let mut best: Option<(u8, usize)> = None;
    for d in DELIMITERS {
        let count = first.bytes().filter(|b| *b == d).count();
        if count > 0 && best.map_or(true, |(_, c)| count > c) {
            best = Some((d, count));
        }
    }
    best.map(|(d, _)| d)
}

fn read_records(text: &str, delimiter: u8) -> Result<Vec<StringRecord>, TabularError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        records.push(record);
    }
    Ok(records)
}

/// A record is data rather than a header when one cell is a dated field and
/// another is an amount.
fn looks_like_data(record: &StringRecord) -> bool {
    let date = record.iter().position(|f| parse_date(f).is_some());
    let amount = record
        .iter()
        .enumerate()
        .position(|(i, f)| Some(i) != date && is_amount_cell(f));
    date.is_some() && amount.is_some()
}

fn is_amount_cell(field: &str) -> bool {
    field.chars().any(|c| c.is_ascii_digit()) && parse_amount(field).is_some()
}

/// Names columns for a headerless file by what the first record holds: the
/// dated cell is `Date`, the first amount `Amount`, the first two text cells
/// `Description` and `Category`, the rest `Column N`.
fn infer_headers(first: &StringRecord) -> Vec<String> {
    let mut headers: Vec<Option<&str>> = vec![None; first.len()];
    if let Some(i) = first.iter().position(|f| parse_date(f).is_some()) {
        headers[i] = Some("Date");
    }
    if let Some(i) = first
        .iter()
        .enumerate()
        .position(|(i, f)| headers[i].is_none() && is_amount_cell(f))
    {
        headers[i] = Some("Amount");
    }
    let mut text_names = ["Description", "Category"].into_iter();
    for (i, field) in first.iter().enumerate() {
        if headers[i].is_none() && field.chars().any(char::is_alphabetic) {
            match text_names.next() {
                Some(name) => headers[i] = Some(name),
                None => break,
            }
        }
    }
    headers
        .into_iter()
        .enumerate()
        .map(|(i, h)| h.map_or_else(|| format!("Column {}", i + 1), str::to_string))
        .collect()
}

/// True when `text` is confidently delimiter-separated: every record has the
/// first record's width (at least two), and either the first record is data
/// or it is a header (no amounts) above at least one record with an amount.
pub fn looks_tabular(text: &str) -> bool {
    let Some(delimiter) = detect_delimiter(text) else { return false };
    let Ok(records) = read_records(text, delimiter) else { return false };
    let Some(first) = records.first() else { return false };
    if first.len() < 2 || records.iter().any(|r| r.len() != first.len()) {
        return false;
    }
    let header_like = !first.iter().any(is_amount_cell);
    looks_like_data(first)
        || (header_like && records[1..].iter().any(|r| r.iter().any(is_amount_cell)))
}

/// Splits delimiter-separated text into a [`ParsedDocument`].
///
/// The first record is the header row unless it already looks like data, in
/// which case column names are inferred. Ragged rows are padded with empty
/// fields or truncated to the header width. Fields are not interpreted.
pub fn synthesize_tabular(text: &str) -> Result<ParsedDocument, TabularError> {
    let delimiter = detect_delimiter(text).ok_or(TabularError::NotTabular)?;
    let records = read_records(text, delimiter)?;
    let Some(first) = records.first() else {
        return Err(TabularError::NotTabular);
    };

    let headerless = looks_like_data(first);
    let headers: Vec<String> = if headerless {
        infer_headers(first)
    } else {
        first.iter().map(str::to_string).collect()
    };
    let width = headers.len();
    tracing::debug!(
        delimiter = %(delimiter as char).escape_default(),
        width,
        headerless,
        "tabular layout"
    );

    let mut builder = ParsedDocument::builder(headers);
    let data = if headerless { &records[..] } else { &records[1..] };
    for (i, record) in data.iter().enumerate() {
        let fields: Vec<String> = record.iter().map(str::to_string).collect();
        let len = fields.len();
        let dropped = builder.push_fields(fields);
        if len != width {
            tracing::warn!(row = i, fields = len, width, dropped, "ragged row padded or truncated");
        }
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── detect_delimiter ──────────────────────────────────────────────────────

    #[test]
    fn detects_each_delimiter() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), Some(b','));
        assert_eq!(detect_delimiter("\n\na\tb\tc"), Some(b'\t'));
        assert_eq!(detect_delimiter("a;b;c"), Some(b';'));
    }

    #[test]
    fn most_frequent_delimiter_wins() {
        assert_eq!(detect_delimiter("Date;Description;Amount, USD"), Some(b';'));
    }

    #[test]
    fn no_delimiter_in_first_line() {
        assert_eq!(detect_delimiter("DoorDash\n$20.78,x"), None);
        assert!(matches!(synthesize_tabular("DoorDash\n$20.78"), Err(TabularError::NotTabular)));
        assert!(matches!(synthesize_tabular(""), Err(TabularError::NotTabular)));
    }

    // ── synthesize_tabular ────────────────────────────────────────────────────

    #[test]
    fn header_row_preserved_in_order() {
        let text = "Posted Date,Payee,Amount\n2024-01-15,AMAZON,49.99\n";
        let doc = synthesize_tabular(text).unwrap();
        assert_eq!(doc.headers(), ["Posted Date", "Payee", "Amount"]);
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.rows()[0][1], "AMAZON");
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let text = "Date,Description,Amount\n2024-01-15,\"Joe's, Inc\",\"$1,049.99\"\n";
        let doc = synthesize_tabular(text).unwrap();
        assert_eq!(doc.rows()[0][1], "Joe's, Inc");
        assert_eq!(doc.rows()[0][2], "$1,049.99");
    }

    #[test]
    fn headerless_rows_get_inferred_headers() {
        let doc = synthesize_tabular("11/10/2025,ARCO#82639,45.44,Transportation-Fuel").unwrap();
        assert_eq!(doc.headers(), ["Date", "Description", "Amount", "Category"]);
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.rows()[0][1], "ARCO#82639");
    }

    #[test]
    fn ragged_rows_match_header_width() {
        let text = "Date,Description,Amount\n2024-01-15,A\n2024-01-16,B,1.00,extra\n";
        let doc = synthesize_tabular(text).unwrap();
        assert!(doc.rows().iter().all(|r| r.len() == 3));
        assert_eq!(doc.rows()[0][2], "");
    }

    #[test]
    fn blank_lines_are_skipped() {
        let doc = synthesize_tabular("Date;Amount\n\n2024-01-15;5.00\n;\n").unwrap();
        assert_eq!(doc.len(), 1);
    }

    // ── looks_tabular ─────────────────────────────────────────────────────────

    #[test]
    fn statement_text_is_not_confidently_tabular() {
        assert!(!looks_tabular("February 09, 2026\nAPPLECARD PAYMENT -$1,030.27"));
        assert!(!looks_tabular("San Francisco, CA"));
        assert!(looks_tabular("11/10/2025,ARCO#82639,45.44,Transportation-Fuel"));
        assert!(looks_tabular("Date,Amount\n2024-01-15,5.00"));
    }
}
