use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DbError> for eyecare_common::Error {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Serialization(e) => eyecare_common::Error::Serialization(e),
            DbError::Io(e) => eyecare_common::Error::Io(e),
            other => eyecare_common::Error::Storage(other.to_string()),
        }
    }
}
