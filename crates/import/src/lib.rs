pub mod config;
pub mod error;
pub mod learning;
pub mod mapper;
pub mod matching;
pub mod source;
pub mod summary;
pub mod tabular;

pub use config::{ConfigError, ImportConfig};
pub use error::ImportError;
pub use learning::{LearnedRules, LearningError, MerchantRule};
pub use mapper::{
    map, ColumnMapping, ImportBucket, ImportCandidateRow, ImportContext, ImportMapper,
};
pub use matching::{
    DuplicateDetector, ExistingRecord, ExistingRecords, MatchConfig, MatchQuery, MatchSource,
    RecordMatch,
};
pub use source::{synthesize, SourceKind, Synthesized};
pub use summary::ImportSummary;
pub use tabular::{detect_delimiter, looks_tabular, synthesize_tabular, TabularError};

pub mod import {
    use std::path::Path;

    use chrono::NaiveDate;
    use sift_ocr::{OcrBackend, ScreenshotPipeline};
    use sift_pdf::{StatementMode, StatementPipeline, TextExtractor};

    use crate::*;

    /// Text in, candidate rows out.
    pub fn import_text(
        text: &str,
        kind: SourceKind,
        reference: NaiveDate,
        context: &ImportContext<'_>,
        config: &ImportConfig,
    ) -> Result<Vec<ImportCandidateRow>, ImportError> {
        let synthesized = synthesize(text, kind, reference)?;
        Ok(ImportMapper::with_config(config).map(&synthesized.document, context))
    }

    pub fn import_screenshot<R: OcrBackend>(
        recognizer: R,
        image: &[u8],
        reference: NaiveDate,
        context: &ImportContext<'_>,
        config: &ImportConfig,
    ) -> Result<Vec<ImportCandidateRow>, ImportError> {
        let result = ScreenshotPipeline::new(recognizer, reference).process_bytes(image)?;
        Ok(ImportMapper::with_config(config).map(&result.document, context))
    }

    pub fn import_pdf<E: TextExtractor>(
        extractor: E,
        pdf: &[u8],
        mode: StatementMode,
        reference: NaiveDate,
        context: &ImportContext<'_>,
        config: &ImportConfig,
    ) -> Result<Vec<ImportCandidateRow>, ImportError> {
        let document = StatementPipeline::new(extractor, reference).process_bytes(pdf, mode)?;
        Ok(ImportMapper::with_config(config).map(&document, context))
    }

    pub fn load_learned_rules(path: &Path) -> Result<LearnedRules, ImportError> {
        Ok(LearnedRules::load(path)?)
    }

    pub fn load_config(path: &Path) -> Result<ImportConfig, ImportError> {
        Ok(ImportConfig::load(path)?)
    }
}
