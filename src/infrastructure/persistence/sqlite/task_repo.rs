//! SQLite Generation Task Repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::FromRow;
use uuid::Uuid;

use super::{format_timestamp, map_db_error, parse_timestamp, parse_uuid, DbPool};
use crate::application::ports::{
    GenerationTaskRecord, GenerationTaskRepositoryPort, RepositoryError, TaskPatch,
};
use crate::domain::chapter::Progress;
use crate::domain::generation::{GenerationParameters, TaskStatus, TaskType};

/// SQLite Generation Task Repository
pub struct SqliteGenerationTaskRepository {
    pool: DbPool,
}

impl SqliteGenerationTaskRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const TASK_COLUMNS: &str =
    "id, chapter_id, task_type, status, parameters, progress, result, error_message, created_at, updated_at";

#[derive(FromRow)]
struct TaskRow {
    id: String,
    chapter_id: String,
    task_type: String,
    status: String,
    parameters: String,
    progress: i64,
    result: Option<String>,
    error_message: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<TaskRow> for GenerationTaskRecord {
    type Error = RepositoryError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let task_type = TaskType::from_str(&row.task_type).ok_or_else(|| {
            RepositoryError::SerializationError(format!("unknown task type: {}", row.task_type))
        })?;
        let status = TaskStatus::from_str(&row.status).ok_or_else(|| {
            RepositoryError::SerializationError(format!("unknown task status: {}", row.status))
        })?;
        let parameters: GenerationParameters = serde_json::from_str(&row.parameters)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        Ok(GenerationTaskRecord {
            id: parse_uuid(&row.id)?,
            chapter_id: parse_uuid(&row.chapter_id)?,
            task_type,
            status,
            parameters,
            progress: Progress::from_i64(row.progress),
            result: row.result,
            error_message: row.error_message,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}

#[async_trait]
impl GenerationTaskRepositoryPort for SqliteGenerationTaskRepository {
    async fn create(&self, task: &GenerationTaskRecord) -> Result<(), RepositoryError> {
        let parameters = serde_json::to_string(&task.parameters)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO generation_tasks (id, chapter_id, task_type, status, parameters, progress, result, error_message, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(task.id.to_string())
        .bind(task.chapter_id.to_string())
        .bind(task.task_type.as_str())
        .bind(task.status.as_str())
        .bind(parameters)
        .bind(i64::from(task.progress.value()))
        .bind(task.result.as_deref())
        .bind(task.error_message.as_deref())
        .bind(format_timestamp(&task.created_at))
        .bind(format_timestamp(&task.updated_at))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn update(&self, id: Uuid, patch: &TaskPatch) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE generation_tasks SET
                status = COALESCE(?, status),
                progress = COALESCE(?, progress),
                result = COALESCE(?, result),
                error_message = COALESCE(?, error_message),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.progress.map(|p| i64::from(p.value())))
        .bind(patch.result.as_deref())
        .bind(patch.error_message.as_deref())
        .bind(format_timestamp(&Utc::now()))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("generation task {id}")));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<GenerationTaskRecord>, RepositoryError> {
        let row: Option<TaskRow> =
            sqlx::query_as(&format!("SELECT {TASK_COLUMNS} FROM generation_tasks WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_error)?;

        row.map(GenerationTaskRecord::try_from).transpose()
    }

    async fn find_by_chapter(
        &self,
        chapter_id: Uuid,
    ) -> Result<Vec<GenerationTaskRecord>, RepositoryError> {
        let rows: Vec<TaskRow> = sqlx::query_as(&format!(
            "SELECT {TASK_COLUMNS} FROM generation_tasks WHERE chapter_id = ? ORDER BY created_at DESC"
        ))
        .bind(chapter_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(GenerationTaskRecord::try_from).collect()
    }
}
