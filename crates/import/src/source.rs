use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sift_core::{find_amounts, ParsedDocument};
use sift_ocr::synthesize_lines;
use sift_pdf::{synthesize_paystub, synthesize_statement, StatementError};
use tracing::debug;

use crate::error::ImportError;
use crate::tabular::{looks_tabular, synthesize_tabular};

/// Which synthesizer reads a text source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Tabular, then OCR lines, then statement text. Text with register
    /// lines (amount plus running balance) tries statement text first.
    #[default]
    Auto,
    Tabular,
    Screenshot,
    Statement,
    Paystub,
}

#[derive(Debug, Clone)]
pub struct Synthesized {
    /// The synthesizer that produced `document`; never `Auto`.
    pub kind: SourceKind,
    pub document: ParsedDocument,
}

/// Runs one synthesizer, or the fallback chain for [`SourceKind::Auto`].
pub fn synthesize(
    text: &str,
    kind: SourceKind,
    reference: NaiveDate,
) -> Result<Synthesized, ImportError> {
    let lines: Vec<&str> = text.lines().collect();
    let document = match kind {
        SourceKind::Auto => return synthesize_auto(text, &lines, reference),
        SourceKind::Tabular => synthesize_tabular(text)?,
        SourceKind::Screenshot => synthesize_lines(&lines, reference),
        SourceKind::Statement => synthesize_statement(&lines, reference)?,
        SourceKind::Paystub => synthesize_paystub(&lines, reference)?,
    };
    Ok(Synthesized { kind, document })
}

/// A line carrying two currency figures and no percentage: an amount and a
/// running balance.
fn is_register_line(line: &str) -> bool {
    !line.contains('%') && find_amounts(line).iter().filter(|t| t.has_symbol).count() >= 2
}

fn synthesize_auto(
    text: &str,
    lines: &[&str],
    reference: NaiveDate,
) -> Result<Synthesized, ImportError> {
    if looks_tabular(text) {
        debug!("auto: tabular");
        return Ok(Synthesized { kind: SourceKind::Tabular, document: synthesize_tabular(text)? });
    }

    if lines.iter().any(|l| is_register_line(l)) {
        if let Ok(document) = synthesize_statement(lines, reference) {
            if !document.is_empty() {
                debug!(rows = document.len(), "auto: statement register");
                return Ok(Synthesized { kind: SourceKind::Statement, document });
            }
        }
    }

    let document = synthesize_lines(lines, reference);
    if !document.is_empty() {
        debug!(rows = document.len(), "auto: screenshot lines");
        return Ok(Synthesized { kind: SourceKind::Screenshot, document });
    }

    match synthesize_statement(lines, reference) {
        Ok(document) => {
            debug!(rows = document.len(), "auto: statement text");
            Ok(Synthesized { kind: SourceKind::Statement, document })
        }
        Err(StatementError::NotRecognized) => Err(ImportError::Unrecognized),
        Err(e) => Err(e.into()),
    }
}
