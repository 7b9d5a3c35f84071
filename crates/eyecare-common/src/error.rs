use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Exercise not found: {0}")]
    ExerciseNotFound(String),

    #[error("Exercise session not found: {0}")]
    SessionNotFound(String),

    #[error("No user profile has been created")]
    NoUser,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
