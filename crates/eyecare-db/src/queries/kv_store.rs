use crate::connection::Database;
use crate::error::{DbError, Result};
use chrono::Utc;

pub struct KvQueries;

impl KvQueries {
    pub async fn get(db: &Database, key: &str) -> Result<Option<String>> {
        let pool = db.pool()?;

        sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await
            .map_err(DbError::Sqlx)
    }

    pub async fn set(db: &Database, key: &str, value: &str) -> Result<()> {
        let pool = db.pool()?;

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn delete(db: &Database, key: &str) -> Result<bool> {
        let pool = db.pool()?;

        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?").bind(key).execute(pool).await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_many(db: &Database, keys: &[String]) -> Result<u64> {
        let pool = db.pool()?;

        let mut tx = pool.begin().await?;
        let mut removed = 0;
        for key in keys {
            let result =
                sqlx::query("DELETE FROM kv_store WHERE key = ?").bind(key).execute(&mut *tx).await?;
            removed += result.rows_affected();
        }
        tx.commit().await?;

        Ok(removed)
    }

    pub async fn exists(db: &Database, key: &str) -> Result<bool> {
        let pool = db.pool()?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_one(pool)
            .await?;

        Ok(count > 0)
    }

    pub async fn list_keys(db: &Database) -> Result<Vec<String>> {
        let pool = db.pool()?;

        sqlx::query_scalar::<_, String>("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(pool)
            .await
            .map_err(DbError::Sqlx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::DatabaseConfig;
    use tempfile::{tempdir, TempDir};

    async fn setup_test_db() -> (Database, TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");

        let db = Database::new(DatabaseConfig::new(db_path.to_str().unwrap())).await.unwrap();
        db.run_migrations().await.unwrap();

        (db, dir)
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let (db, _dir) = setup_test_db().await;

        KvQueries::set(&db, "eyecare_user", r#"{"name":"Ada"}"#).await.unwrap();

        let value = KvQueries::get(&db, "eyecare_user").await.unwrap();
        assert_eq!(value.as_deref(), Some(r#"{"name":"Ada"}"#));
    }

    #[tokio::test]
    async fn test_set_overwrites_existing_value() {
        let (db, _dir) = setup_test_db().await;

        KvQueries::set(&db, "k", "1").await.unwrap();
        KvQueries::set(&db, "k", "2").await.unwrap();

        assert_eq!(KvQueries::get(&db, "k").await.unwrap().as_deref(), Some("2"));
        assert_eq!(KvQueries::list_keys(&db).await.unwrap(), vec!["k".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_key() {
        let (db, _dir) = setup_test_db().await;

        assert!(KvQueries::get(&db, "missing").await.unwrap().is_none());
        assert!(!KvQueries::exists(&db, "missing").await.unwrap());
        assert!(!KvQueries::delete(&db, "missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_many() {
        let (db, _dir) = setup_test_db().await;

        for key in ["a", "b", "c"] {
            KvQueries::set(&db, key, "{}").await.unwrap();
        }

        let removed =
            KvQueries::delete_many(&db, &["a".to_string(), "c".to_string(), "zz".to_string()])
                .await
                .unwrap();

        assert_eq!(removed, 2);
        assert_eq!(KvQueries::list_keys(&db).await.unwrap(), vec!["b".to_string()]);
    }
}
