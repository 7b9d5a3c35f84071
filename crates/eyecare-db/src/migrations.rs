use crate::connection::Database;
use crate::error::{DbError, Result};
use sqlx::migrate::Migrator;
use tracing::{debug, info};

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

impl Database {
    /// Bring the schema up to date and return the resulting version.
    pub async fn run_migrations(&self) -> Result<i64> {
        let pool = self.pool()?;

        MIGRATOR.run(pool).await?;

        let version = self.schema_version().await?.unwrap_or(0);
        if version != latest_version() {
            return Err(DbError::InvalidData(format!(
                "Schema version {} does not match the expected version {}",
                version,
                latest_version()
            )));
        }

        info!("Key-value schema at version {}", version);
        Ok(version)
    }

    /// Highest applied migration, or `None` on a fresh file.
    pub async fn schema_version(&self) -> Result<Option<i64>> {
        let pool = self.pool()?;

        let applied: Option<i64> = sqlx::query_scalar(
            "SELECT MAX(version) FROM _sqlx_migrations WHERE success = 1",
        )
        .fetch_one(pool)
        .await
        .or_else(|e| match e {
            // No migration table yet
            sqlx::Error::Database(_) => Ok(None),
            other => Err(other),
        })?;

        debug!("Applied schema version: {:?}", applied);
        Ok(applied)
    }
}

fn latest_version() -> i64 {
    MIGRATOR.iter().map(|m| m.version).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::DatabaseConfig;
    use tempfile::tempdir;

    async fn open(dir: &tempfile::TempDir) -> Database {
        let path = dir.path().join("eyecare.db");
        Database::new(DatabaseConfig::new(path.to_str().unwrap())).await.unwrap()
    }

    #[tokio::test]
    async fn test_run_migrations_creates_kv_table() {
        let dir = tempdir().unwrap();
        let db = open(&dir).await;

        assert_eq!(db.schema_version().await.unwrap(), None);
        db.run_migrations().await.unwrap();

        let pool = db.pool().unwrap();
        let columns: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM pragma_table_info('kv_store') ORDER BY cid")
                .fetch_all(pool)
                .await
                .unwrap();

        let columns: Vec<String> = columns.into_iter().map(|(name,)| name).collect();
        assert_eq!(columns, vec!["key", "value", "updated_at"]);
    }

    #[tokio::test]
    async fn test_migrations_are_rerunnable() {
        let dir = tempdir().unwrap();
        let db = open(&dir).await;

        let first = db.run_migrations().await.unwrap();
        let second = db.run_migrations().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first, 20240101000000);
        assert_eq!(db.schema_version().await.unwrap(), Some(first));
    }
}
