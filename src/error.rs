use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid category or transaction index: {category} #{index}")]
    InvalidReference { category: String, index: usize },

    #[error("Invalid date format: '{0}'. Please use YYYY-MM-DD.")]
    InvalidDate(String),

    #[error("Invalid amount: '{0}'. Please enter a valid number.")]
    InvalidAmount(String),

    #[error("Invalid transaction type: '{0}'. Please enter 'income' or 'expense'.")]
    InvalidType(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TallyError>;
