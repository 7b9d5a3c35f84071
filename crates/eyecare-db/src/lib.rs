pub mod backend;
pub mod connection;
pub mod error;
pub mod migrations;
pub mod queries;
pub mod storage;

pub use backend::{MemoryBackend, SqliteBackend, StorageBackend};
pub use connection::{Database, DatabaseConfig};
pub use error::{DbError, Result};
pub use storage::StorageService;
