//! SQLite User Repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;
use uuid::Uuid;

use super::{format_timestamp, map_db_error, parse_timestamp, parse_uuid, DbPool};
use crate::application::ports::{RepositoryError, UserRecord, UserRepositoryPort};

/// SQLite User Repository
pub struct SqliteUserRepository {
    pool: DbPool,
}

impl SqliteUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: String,
    external_id: String,
    display_name: String,
    created_at: String,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(UserRecord {
            id: parse_uuid(&row.id)?,
            external_id: row.external_id,
            display_name: row.display_name,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

#[async_trait]
impl UserRepositoryPort for SqliteUserRepository {
    async fn find_or_create(
        &self,
        external_id: &str,
        display_name: &str,
    ) -> Result<UserRecord, RepositoryError> {
        // 并发首次访问时由唯一约束兜底，冲突方直接读取已存在的行
        sqlx::query(
            r#"
            INSERT INTO users (id, external_id, display_name, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(external_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(external_id)
        .bind(display_name)
        .bind(format_timestamp(&Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        let row: UserRow = sqlx::query_as(
            "SELECT id, external_id, display_name, created_at FROM users WHERE external_id = ?",
        )
        .bind(external_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        UserRecord::try_from(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};

    async fn setup() -> SqliteUserRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteUserRepository::new(pool)
    }

    #[tokio::test]
    async fn test_find_or_create_is_stable() {
        let repo = setup().await;
        let first = repo.find_or_create("ext-1", "Alice").await.unwrap();
        let second = repo.find_or_create("ext-1", "Alice again").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.display_name, "Alice");
    }

    #[tokio::test]
    async fn test_distinct_external_ids_get_distinct_users() {
        let repo = setup().await;
        let a = repo.find_or_create("ext-a", "A").await.unwrap();
        let b = repo.find_or_create("ext-b", "B").await.unwrap();
        assert_ne!(a.id, b.id);
    }
}
