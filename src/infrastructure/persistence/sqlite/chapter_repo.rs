//! SQLite Chapter Repository
//!
//! 生成状态机的所有持久化步骤都在这里落地：
//! 条件占用、进度检查点、完成事务、失败回退与启动恢复

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;
use uuid::Uuid;

use super::novel_repo::{NovelRow, NOVEL_COLUMNS};
use super::{format_timestamp, map_db_error, parse_timestamp, parse_uuid, DbPool};
use crate::application::ports::{
    ChapterPatch, ChapterRecord, ChapterRepositoryPort, ChapterWithNovel, NovelRecord,
    RepositoryError,
};
use crate::domain::chapter::{ChapterStatus, Progress};

/// 重启恢复时写入任务的错误信息
const INTERRUPTED_MESSAGE: &str = "generation interrupted by process restart";

/// SQLite Chapter Repository
pub struct SqliteChapterRepository {
    pool: DbPool,
}

impl SqliteChapterRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const CHAPTER_COLUMNS: &str = "id, novel_id, chapter_number, title, summary, content, status, progress, created_at, updated_at";

#[derive(FromRow)]
struct ChapterRow {
    id: String,
    novel_id: String,
    chapter_number: i64,
    title: String,
    summary: Option<String>,
    content: Option<String>,
    status: String,
    progress: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ChapterRow> for ChapterRecord {
    type Error = RepositoryError;

    fn try_from(row: ChapterRow) -> Result<Self, Self::Error> {
        let status = ChapterStatus::from_str(&row.status).ok_or_else(|| {
            RepositoryError::SerializationError(format!("unknown chapter status: {}", row.status))
        })?;
        let chapter_number = u32::try_from(row.chapter_number)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        Ok(ChapterRecord {
            id: parse_uuid(&row.id)?,
            novel_id: parse_uuid(&row.novel_id)?,
            chapter_number,
            title: row.title,
            summary: row.summary,
            content: row.content,
            status,
            progress: Progress::from_i64(row.progress),
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[async_trait]
impl ChapterRepositoryPort for SqliteChapterRepository {
    async fn save(&self, chapter: &ChapterRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO chapters (id, novel_id, chapter_number, title, summary, content, status, progress, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(chapter.id.to_string())
        .bind(chapter.novel_id.to_string())
        .bind(i64::from(chapter.chapter_number))
        .bind(&chapter.title)
        .bind(chapter.summary.as_deref())
        .bind(chapter.content.as_deref())
        .bind(chapter.status.as_str())
        .bind(i64::from(chapter.progress.value()))
        .bind(format_timestamp(&chapter.created_at))
        .bind(format_timestamp(&chapter.updated_at))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn find_by_id_for_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<ChapterWithNovel>, RepositoryError> {
        let novel_row: Option<NovelRow> = sqlx::query_as(&format!(
            "SELECT {NOVEL_COLUMNS} FROM novels \
             WHERE owner_id = ? AND id = (SELECT novel_id FROM chapters WHERE id = ?)"
        ))
        .bind(owner_id.to_string())
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        let Some(novel_row) = novel_row else {
            return Ok(None);
        };

        let chapter_row: Option<ChapterRow> =
            sqlx::query_as(&format!("SELECT {CHAPTER_COLUMNS} FROM chapters WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_error)?;

        match chapter_row {
            Some(row) => Ok(Some(ChapterWithNovel {
                chapter: ChapterRecord::try_from(row)?,
                novel: NovelRecord::try_from(novel_row)?,
            })),
            // 两次读取之间被删除
            None => Ok(None),
        }
    }

    async fn find_by_novel(&self, novel_id: Uuid) -> Result<Vec<ChapterRecord>, RepositoryError> {
        let rows: Vec<ChapterRow> = sqlx::query_as(&format!(
            "SELECT {CHAPTER_COLUMNS} FROM chapters WHERE novel_id = ? ORDER BY chapter_number ASC"
        ))
        .bind(novel_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(ChapterRecord::try_from).collect()
    }

    async fn find_preceding(
        &self,
        novel_id: Uuid,
        before_number: u32,
    ) -> Result<Option<ChapterRecord>, RepositoryError> {
        let row: Option<ChapterRow> = sqlx::query_as(&format!(
            "SELECT {CHAPTER_COLUMNS} FROM chapters \
             WHERE novel_id = ? AND chapter_number < ? \
             ORDER BY chapter_number DESC LIMIT 1"
        ))
        .bind(novel_id.to_string())
        .bind(i64::from(before_number))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(ChapterRecord::try_from).transpose()
    }

    async fn next_chapter_number(&self, novel_id: Uuid) -> Result<u32, RepositoryError> {
        let (max,): (Option<i64>,) =
            sqlx::query_as("SELECT MAX(chapter_number) FROM chapters WHERE novel_id = ?")
                .bind(novel_id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_error)?;

        let next = max.unwrap_or(0) + 1;
        u32::try_from(next).map_err(|e| RepositoryError::SerializationError(e.to_string()))
    }

    async fn update(&self, id: Uuid, patch: &ChapterPatch) -> Result<bool, RepositoryError> {
        let (set_summary, summary) = match &patch.summary {
            Some(value) => (true, value.as_deref()),
            None => (false, None),
        };
        let (set_content, content) = match &patch.content {
            Some(value) => (true, value.as_deref()),
            None => (false, None),
        };

        let result = sqlx::query(
            r#"
            UPDATE chapters SET
                title = COALESCE(?, title),
                summary = CASE WHEN ? THEN ? ELSE summary END,
                content = CASE WHEN ? THEN ? ELSE content END,
                status = COALESCE(?, status),
                progress = COALESCE(?, progress),
                updated_at = ?
            WHERE id = ? AND status <> 'generating'
            "#,
        )
        .bind(patch.title.as_deref())
        .bind(set_summary)
        .bind(summary)
        .bind(set_content)
        .bind(content)
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.status.map(|s| i64::from(s.resting_progress().value())))
        .bind(format_timestamp(&Utc::now()))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let status: Option<(String,)> = sqlx::query_as("SELECT status FROM chapters WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_db_error)?;

        match status {
            Some((status,)) if status != ChapterStatus::Generating.as_str() => {}
            _ => return Ok(false),
        }

        sqlx::query("DELETE FROM generation_tasks WHERE chapter_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        sqlx::query("DELETE FROM chapters WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(true)
    }

    async fn claim_for_generation(
        &self,
        id: Uuid,
        progress: Progress,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE chapters SET status = 'generating', progress = ?, updated_at = ?
            WHERE id = ? AND status <> 'generating'
            "#,
        )
        .bind(i64::from(progress.value()))
        .bind(format_timestamp(&Utc::now()))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn update_progress(&self, id: Uuid, progress: Progress) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE chapters SET progress = ?, updated_at = ? WHERE id = ? AND status = 'generating'",
        )
        .bind(i64::from(progress.value()))
        .bind(format_timestamp(&Utc::now()))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("generating chapter {id}")));
        }
        Ok(())
    }

    async fn complete_generation(
        &self,
        id: Uuid,
        task_id: Uuid,
        content: &str,
    ) -> Result<(), RepositoryError> {
        let now = format_timestamp(&Utc::now());
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let chapter = sqlx::query(
            r#"
            UPDATE chapters SET content = ?, status = 'completed', progress = ?, updated_at = ?
            WHERE id = ? AND status = 'generating'
            "#,
        )
        .bind(content)
        .bind(i64::from(Progress::COMPLETE.value()))
        .bind(&now)
        .bind(id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if chapter.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("generating chapter {id}")));
        }

        let task = sqlx::query(
            r#"
            UPDATE generation_tasks SET status = 'completed', progress = ?, result = ?, updated_at = ?
            WHERE id = ? AND chapter_id = ?
            "#,
        )
        .bind(i64::from(Progress::COMPLETE.value()))
        .bind(content)
        .bind(&now)
        .bind(task_id.to_string())
        .bind(id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if task.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("generation task {task_id}")));
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    async fn fail_generation(&self, id: Uuid) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE chapters SET status = 'error', progress = 0, updated_at = ? WHERE id = ?")
            .bind(format_timestamp(&Utc::now()))
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    async fn reset_interrupted(&self) -> Result<u64, RepositoryError> {
        let now = format_timestamp(&Utc::now());
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            UPDATE generation_tasks SET status = 'failed', error_message = ?, updated_at = ?
            WHERE status = 'running'
              AND chapter_id IN (SELECT id FROM chapters WHERE status = 'generating')
            "#,
        )
        .bind(INTERRUPTED_MESSAGE)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let chapters = sqlx::query(
            "UPDATE chapters SET status = 'error', progress = 0, updated_at = ? WHERE status = 'generating'",
        )
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(chapters.rows_affected())
    }
}
