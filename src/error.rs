use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("round {round_number} already exists")]
    ConstraintViolation { round_number: u64 },

    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] rusqlite::Error),
}

pub type Result<T, E = LedgerError> = std::result::Result<T, E>;
