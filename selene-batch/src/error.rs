use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Partition error: {0}")]
    Partition(String),
}

pub type BatchResult<T> = Result<T, BatchError>;
