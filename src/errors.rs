use thiserror::Error;

/// Reasons an expense is refused by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("description is empty")]
    EmptyDescription,
    #[error("date is missing")]
    MissingDate,
    #[error("date is not in yyyy-mm-dd form")]
    InvalidDate,
    #[error("amount is not a number")]
    UnparseableAmount,
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
    #[error("amount must be less than 10 000 000 000 000")]
    AmountTooLarge,
}

#[derive(Debug, Error)]
pub enum RashodyError {
    #[error("Invalid value: {0}")]
    Parse(String),
    #[error("Rejected: {0}")]
    Validation(#[from] ValidationError),
    #[error("No expense with id {0}")]
    UnknownId(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage encoding error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Deserialization(#[from] toml::de::Error),
    #[error("Prompt error: {0}")]
    Prompt(#[from] inquire::InquireError),
    #[error("Collation data unavailable: {0}")]
    Collator(#[from] icu_collator::CollatorError),
    #[error("Logger error: {0}")]
    Logger(#[from] flexi_logger::FlexiLoggerError),
}
