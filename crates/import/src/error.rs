use sift_ocr::PipelineError;
use sift_pdf::StatementError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::learning::LearningError;
use crate::tabular::TabularError;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Tabular error: {0}")]
    Tabular(#[from] TabularError),
    #[error("Statement error: {0}")]
    Statement(#[from] StatementError),
    #[error("Screenshot error: {0}")]
    Screenshot(#[from] PipelineError),
    #[error("Learned rules error: {0}")]
    Learning(#[from] LearningError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Unrecognized input: no synthesizer could read it")]
    Unrecognized,
}
