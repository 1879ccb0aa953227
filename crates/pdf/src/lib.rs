pub mod error;
pub mod paystub;
pub mod source;
pub mod statement;

pub use error::StatementError;
pub use paystub::synthesize_paystub;
pub use source::{StatementMode, StatementPipeline, StaticText, TextExtractor};
pub use statement::synthesize_statement;
