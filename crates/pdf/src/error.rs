use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatementError {
    #[error("Text does not look like a statement: no dates found")]
    NotRecognized,
    #[error("No net pay figure found on paystub")]
    NoNetPay,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
