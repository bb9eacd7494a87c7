//! SQLite Novel Repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;
use uuid::Uuid;

use super::{format_timestamp, map_db_error, parse_timestamp, parse_uuid, DbPool};
use crate::application::ports::{NovelPatch, NovelRecord, NovelRepositoryPort, RepositoryError};
use crate::domain::novel::{Genre, NovelStatus, Style};

/// SQLite Novel Repository
pub struct SqliteNovelRepository {
    pool: DbPool,
}

impl SqliteNovelRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(super) const NOVEL_COLUMNS: &str =
    "id, owner_id, title, genre, style, description, status, created_at, updated_at";

#[derive(FromRow)]
pub(super) struct NovelRow {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub genre: String,
    pub style: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<NovelRow> for NovelRecord {
    type Error = RepositoryError;

    fn try_from(row: NovelRow) -> Result<Self, Self::Error> {
        let genre = Genre::from_str(&row.genre).ok_or_else(|| {
            RepositoryError::SerializationError(format!("unknown genre: {}", row.genre))
        })?;

        Ok(NovelRecord {
            id: parse_uuid(&row.id)?,
            owner_id: parse_uuid(&row.owner_id)?,
            title: row.title,
            genre,
            style: Style::from_str(&row.style).unwrap_or_default(),
            description: row.description,
            status: NovelStatus::from_str(&row.status).unwrap_or_default(),
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[async_trait]
impl NovelRepositoryPort for SqliteNovelRepository {
    async fn save(&self, novel: &NovelRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO novels (id, owner_id, title, genre, style, description, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(novel.id.to_string())
        .bind(novel.owner_id.to_string())
        .bind(&novel.title)
        .bind(novel.genre.as_str())
        .bind(novel.style.as_str())
        .bind(novel.description.as_deref())
        .bind(novel.status.as_str())
        .bind(format_timestamp(&novel.created_at))
        .bind(format_timestamp(&novel.updated_at))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn find_by_id_for_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<NovelRecord>, RepositoryError> {
        let row: Option<NovelRow> = sqlx::query_as(&format!(
            "SELECT {NOVEL_COLUMNS} FROM novels WHERE id = ? AND owner_id = ?"
        ))
        .bind(id.to_string())
        .bind(owner_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(NovelRecord::try_from).transpose()
    }

    async fn find_all_by_owner(&self, owner_id: Uuid) -> Result<Vec<NovelRecord>, RepositoryError> {
        let rows: Vec<NovelRow> = sqlx::query_as(&format!(
            "SELECT {NOVEL_COLUMNS} FROM novels WHERE owner_id = ? ORDER BY updated_at DESC"
        ))
        .bind(owner_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(NovelRecord::try_from).collect()
    }

    async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: &NovelPatch,
    ) -> Result<bool, RepositoryError> {
        let (set_description, description) = match &patch.description {
            Some(value) => (true, value.as_deref()),
            None => (false, None),
        };

        let result = sqlx::query(
            r#"
            UPDATE novels SET
                title = COALESCE(?, title),
                genre = COALESCE(?, genre),
                style = COALESCE(?, style),
                description = CASE WHEN ? THEN ? ELSE description END,
                status = COALESCE(?, status),
                updated_at = ?
            WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(patch.title.as_deref())
        .bind(patch.genre.map(|g| g.as_str()))
        .bind(patch.style.map(|s| s.as_str()))
        .bind(set_description)
        .bind(description)
        .bind(patch.status.map(|s| s.as_str()))
        .bind(format_timestamp(&Utc::now()))
        .bind(id.to_string())
        .bind(owner_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<bool, RepositoryError> {
        // 使用事务确保原子性
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let owned: Option<(String,)> =
            sqlx::query_as("SELECT id FROM novels WHERE id = ? AND owner_id = ?")
                .bind(id.to_string())
                .bind(owner_id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_db_error)?;

        if owned.is_none() {
            return Ok(false);
        }

        sqlx::query(
            "DELETE FROM generation_tasks WHERE chapter_id IN (SELECT id FROM chapters WHERE novel_id = ?)",
        )
        .bind(id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query("DELETE FROM chapters WHERE novel_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        sqlx::query("DELETE FROM novels WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::test_support::{seed_novel, seed_user, setup_pool};

    #[tokio::test]
    async fn test_save_and_find_scoped_to_owner() {
        let pool = setup_pool().await;
        let repo = SqliteNovelRepository::new(pool.clone());
        let owner = seed_user(&pool, "owner").await;
        let stranger = seed_user(&pool, "stranger").await;
        let novel = seed_novel(&pool, owner, "仙途").await;

        let found = repo.find_by_id_for_owner(novel.id, owner).await.unwrap().unwrap();
        assert_eq!(found.title, "仙途");
        assert_eq!(found.genre, Genre::Fantasy);
        assert_eq!(found.style, Style::Modern);
        assert_eq!(found.status, NovelStatus::Draft);

        assert!(repo.find_by_id_for_owner(novel.id, stranger).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_by_owner_orders_by_updated_desc() {
        let pool = setup_pool().await;
        let repo = SqliteNovelRepository::new(pool.clone());
        let owner = seed_user(&pool, "owner").await;
        let older = seed_novel(&pool, owner, "旧作").await;
        let newer = seed_novel(&pool, owner, "新作").await;

        let patch = NovelPatch {
            title: Some("旧作（修订）".to_string()),
            ..Default::default()
        };
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        assert!(repo.update(older.id, owner, &patch).await.unwrap());

        let novels = repo.find_all_by_owner(owner).await.unwrap();
        let ids: Vec<Uuid> = novels.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![older.id, newer.id]);
    }

    #[tokio::test]
    async fn test_partial_update_and_clear_description() {
        let pool = setup_pool().await;
        let repo = SqliteNovelRepository::new(pool.clone());
        let owner = seed_user(&pool, "owner").await;
        let novel = seed_novel(&pool, owner, "仙途").await;

        let patch = NovelPatch {
            description: Some(Some("简介".to_string())),
            style: Some(Style::Poetic),
            ..Default::default()
        };
        assert!(repo.update(novel.id, owner, &patch).await.unwrap());
        let updated = repo.find_by_id_for_owner(novel.id, owner).await.unwrap().unwrap();
        assert_eq!(updated.description.as_deref(), Some("简介"));
        assert_eq!(updated.style, Style::Poetic);
        assert_eq!(updated.title, "仙途");

        let clear = NovelPatch {
            description: Some(None),
            ..Default::default()
        };
        assert!(repo.update(novel.id, owner, &clear).await.unwrap());
        let cleared = repo.find_by_id_for_owner(novel.id, owner).await.unwrap().unwrap();
        assert!(cleared.description.is_none());
        assert_eq!(cleared.style, Style::Poetic);
    }

    #[tokio::test]
    async fn test_update_and_delete_reject_other_owner() {
        let pool = setup_pool().await;
        let repo = SqliteNovelRepository::new(pool.clone());
        let owner = seed_user(&pool, "owner").await;
        let stranger = seed_user(&pool, "stranger").await;
        let novel = seed_novel(&pool, owner, "仙途").await;

        let patch = NovelPatch {
            status: Some(NovelStatus::Completed),
            ..Default::default()
        };
        assert!(!repo.update(novel.id, stranger, &patch).await.unwrap());
        assert!(!repo.delete(novel.id, stranger).await.unwrap());
        assert!(repo.delete(novel.id, owner).await.unwrap());
        assert!(repo.find_by_id_for_owner(novel.id, owner).await.unwrap().is_none());
    }
}
