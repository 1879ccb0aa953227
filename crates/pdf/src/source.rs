use std::path::Path;

use chrono::NaiveDate;
use sift_core::ParsedDocument;
use tracing::info;

use crate::error::StatementError;
use crate::paystub::synthesize_paystub;
use crate::statement::synthesize_statement;

/// Abstraction over PDF text extraction, which the host provides. Page
/// boundaries may be flattened; only the order of lines matters.
pub trait TextExtractor: Send + Sync {
    fn extract_lines(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, StatementError>;
}

/// Returns pre-set lines regardless of input. Used for tests and for hosts
/// that extract text themselves.
pub struct StaticText {
    pub lines: Vec<String>,
}

impl StaticText {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { lines: lines.into_iter().map(Into::into).collect() }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(text.lines())
    }
}

impl TextExtractor for StaticText {
    fn extract_lines(&self, _pdf_bytes: &[u8]) -> Result<Vec<String>, StatementError> {
        Ok(self.lines.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementMode {
    Statement,
    Paystub,
}

/// Orchestrates: extract text → statement or paystub synthesis.
pub struct StatementPipeline<E: TextExtractor> {
    extractor: E,
    reference: NaiveDate,
}

impl<E: TextExtractor> StatementPipeline<E> {
    pub fn new(extractor: E, reference: NaiveDate) -> Self {
        Self { extractor, reference }
    }

    pub fn process_file(
        &self,
        path: &Path,
        mode: StatementMode,
    ) -> Result<ParsedDocument, StatementError> {
        let bytes = std::fs::read(path)?;
        self.process_bytes(&bytes, mode)
    }

    pub fn process_bytes(
        &self,
        data: &[u8],
        mode: StatementMode,
    ) -> Result<ParsedDocument, StatementError> {
        let lines = self.extractor.extract_lines(data)?;
        let document = match mode {
            StatementMode::Statement => synthesize_statement(&lines, self.reference)?,
            StatementMode::Paystub => synthesize_paystub(&lines, self.reference)?,
        };
        info!(?mode, lines = lines.len(), rows = document.len(), "statement synthesized");
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 20).unwrap()
    }

    #[test]
    fn static_text_splits_lines() {
        let source = StaticText::from_text("February 09, 2026\nSTARBUCKS $5.50");
        assert_eq!(source.extract_lines(b"%PDF").unwrap().len(), 2);
    }

    #[test]
    fn pipeline_statement_mode() {
        let source = StaticText::new([
            "February 09, 2026",
            "APPLECARD GSBANK PAYMENT ACH WEB x8892 -$1,030.27 $3,397.03",
        ]);
        let pipeline = StatementPipeline::new(source, reference());
        let doc = pipeline.process_bytes(b"%PDF", StatementMode::Statement).unwrap();
        assert_eq!(doc.rows()[0][4], "income");
    }

    #[test]
    fn pipeline_paystub_mode_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stub.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();
        let pipeline = StatementPipeline::new(
            StaticText::new(["Pay Period: Feb 1 - Feb 14", "Net Pay $2,817.83"]),
            reference(),
        );
        let doc = pipeline.process_file(&path, StatementMode::Paystub).unwrap();
        assert_eq!(doc.rows()[0][0], "2026-02-14");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = StatementPipeline::new(StaticText::new(["Net Pay $1.00"]), reference());
        let path = dir.path().join("absent.pdf");
        let err = pipeline.process_file(&path, StatementMode::Paystub).unwrap_err();
        assert!(matches!(err, StatementError::Io(_)));
    }

    #[test]
    fn paystub_errors_propagate() {
        let pipeline = StatementPipeline::new(StaticText::new(["Gross Pay $100.00"]), reference());
        assert!(matches!(
            pipeline.process_bytes(b"", StatementMode::Paystub),
            Err(StatementError::NoNetPay)
        ));
    }
}
