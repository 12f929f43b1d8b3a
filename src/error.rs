use crate::domain::account::AccountId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),
    #[error("Account already exists: {0}")]
    AccountExists(AccountId),
    #[error("Concurrent update detected on account {0}, retry the operation")]
    Conflict(AccountId),
    #[error("No free one-time codes left on account {0}")]
    CodesExhausted(AccountId),
    #[error("Ticket numbers exhausted on account {0}, reset the queue")]
    TicketNumbersExhausted(AccountId),
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for QueueError {
    fn from(e: rocksdb::Error) -> Self {
        QueueError::InternalError(Box::new(e))
    }
}

pub type Result<T> = std::result::Result<T, QueueError>;
