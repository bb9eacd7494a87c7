//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（如 SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::chapter::{ChapterStatus, Progress};
use crate::domain::generation::{GenerationParameters, TaskStatus, TaskType};
use crate::domain::novel::{Genre, NovelStatus, Style};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// User Repository
// ============================================================================

/// 用户实体（外部身份在本地的映射）
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    /// 外部身份服务签发的唯一标识
    pub external_id: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

/// User Repository Port
#[async_trait]
pub trait UserRepositoryPort: Send + Sync {
    /// 按外部身份查找用户，不存在则创建
    async fn find_or_create(
        &self,
        external_id: &str,
        display_name: &str,
    ) -> Result<UserRecord, RepositoryError>;
}

// ============================================================================
// Novel Repository
// ============================================================================

/// 小说实体（用于持久化）
#[derive(Debug, Clone)]
pub struct NovelRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub genre: Genre,
    pub style: Style,
    pub description: Option<String>,
    pub status: NovelStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 小说部分更新
///
/// `None` 表示不修改该字段；`description` 的内层 `None` 表示清空
#[derive(Debug, Clone, Default)]
pub struct NovelPatch {
    pub title: Option<String>,
    pub genre: Option<Genre>,
    pub style: Option<Style>,
    pub description: Option<Option<String>>,
    pub status: Option<NovelStatus>,
}

impl NovelPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.genre.is_none()
            && self.style.is_none()
            && self.description.is_none()
            && self.status.is_none()
    }
}

/// Novel Repository Port
///
/// 所有读写都按 owner 限定范围
#[async_trait]
pub trait NovelRepositoryPort: Send + Sync {
    /// 保存小说
    async fn save(&self, novel: &NovelRecord) -> Result<(), RepositoryError>;

    /// 查找属于 owner 的小说
    async fn find_by_id_for_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<NovelRecord>, RepositoryError>;

    /// 获取 owner 的所有小说（按更新时间倒序）
    async fn find_all_by_owner(&self, owner_id: Uuid) -> Result<Vec<NovelRecord>, RepositoryError>;

    /// 部分更新，返回是否命中
    async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: &NovelPatch,
    ) -> Result<bool, RepositoryError>;

    /// 删除小说（级联删除章节与生成任务），返回是否命中
    async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<bool, RepositoryError>;
}

// ============================================================================
// Chapter Repository
// ============================================================================

/// 章节实体（用于持久化）
#[derive(Debug, Clone)]
pub struct ChapterRecord {
    pub id: Uuid,
    pub novel_id: Uuid,
    pub chapter_number: u32,
    pub title: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub status: ChapterStatus,
    pub progress: Progress,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChapterRecord {
    /// 概要是否可用于生成
    pub fn has_summary(&self) -> bool {
        self.summary
            .as_deref()
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false)
    }
}

/// 章节及其所属小说
#[derive(Debug, Clone)]
pub struct ChapterWithNovel {
    pub chapter: ChapterRecord,
    pub novel: NovelRecord,
}

/// 章节部分更新
///
/// 设置 `status` 时进度随之调整为该状态的静止值
#[derive(Debug, Clone, Default)]
pub struct ChapterPatch {
    pub title: Option<String>,
    pub summary: Option<Option<String>>,
    pub content: Option<Option<String>>,
    pub status: Option<ChapterStatus>,
}

impl ChapterPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.summary.is_none()
            && self.content.is_none()
            && self.status.is_none()
    }
}

/// Chapter Repository Port
#[async_trait]
pub trait ChapterRepositoryPort: Send + Sync {
    /// 保存新章节
    async fn save(&self, chapter: &ChapterRecord) -> Result<(), RepositoryError>;

    /// 查找章节（连同所属小说），小说必须属于 owner
    async fn find_by_id_for_owner(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<ChapterWithNovel>, RepositoryError>;

    /// 获取小说的所有章节（按章节号升序）
    async fn find_by_novel(&self, novel_id: Uuid) -> Result<Vec<ChapterRecord>, RepositoryError>;

    /// 章节号小于 `before_number` 的最近一章
    async fn find_preceding(
        &self,
        novel_id: Uuid,
        before_number: u32,
    ) -> Result<Option<ChapterRecord>, RepositoryError>;

    /// 下一个章节号（当前最大值 + 1，没有章节时为 1）
    async fn next_chapter_number(&self, novel_id: Uuid) -> Result<u32, RepositoryError>;

    /// 部分更新；章节正在生成时不修改，返回 false
    async fn update(&self, id: Uuid, patch: &ChapterPatch) -> Result<bool, RepositoryError>;

    /// 删除章节（级联删除生成任务）；章节正在生成时不删除，返回 false
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;

    /// 条件占用：仅当章节不处于 generating 时切换为 generating 并写入进度
    ///
    /// 返回 false 表示已被其他请求占用
    async fn claim_for_generation(
        &self,
        id: Uuid,
        progress: Progress,
    ) -> Result<bool, RepositoryError>;

    /// 更新生成进度
    async fn update_progress(&self, id: Uuid, progress: Progress) -> Result<(), RepositoryError>;

    /// 在同一事务中写入正文、章节完成状态与任务完成状态
    async fn complete_generation(
        &self,
        id: Uuid,
        task_id: Uuid,
        content: &str,
    ) -> Result<(), RepositoryError>;

    /// 回退到 error 状态，正文不变
    async fn fail_generation(&self, id: Uuid) -> Result<(), RepositoryError>;

    /// 将遗留的 generating 章节回退到 error，并把其运行中的任务标记为失败
    ///
    /// 返回回退的章节数
    async fn reset_interrupted(&self) -> Result<u64, RepositoryError>;
}

// ============================================================================
// Generation Task Repository
// ============================================================================

/// 生成任务实体（用于持久化）
#[derive(Debug, Clone)]
pub struct GenerationTaskRecord {
    pub id: Uuid,
    pub chapter_id: Uuid,
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub parameters: GenerationParameters,
    pub progress: Progress,
    pub result: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 生成任务部分更新
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub status: Option<TaskStatus>,
    pub progress: Option<Progress>,
    pub result: Option<String>,
    pub error_message: Option<String>,
}

/// Generation Task Repository Port
#[async_trait]
pub trait GenerationTaskRepositoryPort: Send + Sync {
    /// 创建任务
    async fn create(&self, task: &GenerationTaskRecord) -> Result<(), RepositoryError>;

    /// 部分更新
    async fn update(&self, id: Uuid, patch: &TaskPatch) -> Result<(), RepositoryError>;

    /// 根据 ID 查找任务
    async fn find_by_id(&self, id: Uuid) -> Result<Option<GenerationTaskRecord>, RepositoryError>;

    /// 获取章节的所有任务（按创建时间倒序）
    async fn find_by_chapter(
        &self,
        chapter_id: Uuid,
    ) -> Result<Vec<GenerationTaskRecord>, RepositoryError>;
}
