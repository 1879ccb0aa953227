use std::path::Path;

use chrono::NaiveDate;
use sift_core::ParsedDocument;
use thiserror::Error;
use tracing::info;

use crate::recognizer::{OcrBackend, OcrError};
use crate::synthesize::synthesize_lines;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
}

/// The result of one screenshot run.
#[derive(Debug)]
pub struct ScreenshotResult {
    /// Raw recognized lines, kept for review.
    pub lines: Vec<String>,
    pub document: ParsedDocument,
}

/// Orchestrates: recognize lines → classify → synthesize rows.
pub struct ScreenshotPipeline<R: OcrBackend> {
    recognizer: R,
    reference: NaiveDate,
}

impl<R: OcrBackend> ScreenshotPipeline<R> {
    /// `reference` is the "now" used for relative dates on the screenshot.
    pub fn new(recognizer: R, reference: NaiveDate) -> Self {
        Self { recognizer, reference }
    }

    /// Process a file on disk.
    pub fn process_file(&self, path: &Path) -> Result<ScreenshotResult, PipelineError> {
        let bytes = std::fs::read(path)?;
        self.process_bytes(&bytes)
    }

    /// Process raw image bytes.
    pub fn process_bytes(&self, data: &[u8]) -> Result<ScreenshotResult, PipelineError> {
        let lines = self.recognizer.recognize_lines(data)?;
        let document = synthesize_lines(&lines, self.reference);
        info!(lines = lines.len(), rows = document.len(), "screenshot synthesized");
        Ok(ScreenshotResult { lines, document })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
