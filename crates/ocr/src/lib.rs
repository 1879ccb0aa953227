pub mod classify;
pub mod columns;
pub mod pipeline;
pub mod recognizer;
pub mod synthesize;
pub mod types;

pub use classify::classify_line;
pub use columns::{reconstruct_columns, ColumnRow};
pub use pipeline::{PipelineError, ScreenshotPipeline, ScreenshotResult};
pub use recognizer::{MockRecognizer, OcrBackend, OcrError};
pub use synthesize::synthesize_lines;
pub use types::{DetailTag, LineKind, PaymentMethod};
