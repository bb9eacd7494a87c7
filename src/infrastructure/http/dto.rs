//! Data Transfer Objects

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::application::{
    ChapterDetail, ChapterRecord, GenerationTaskRecord, NovelRecord, NovelView, PolishResult,
};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 通用 `{id}` 请求
#[derive(Debug, Deserialize)]
pub struct IdRequest {
    pub id: Uuid,
}

/// 删除类接口的返回
#[derive(Debug, Serialize)]
pub struct IdResponse {
    pub id: Uuid,
}

/// 区分"字段缺失"和"显式 null"
///
/// 缺失时由 `#[serde(default)]` 得到 `None`，null 得到 `Some(None)`
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ============================================================================
// Novel DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateNovelRequest {
    pub title: String,
    pub genre: String,
    pub style: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNovelRequest {
    pub id: Uuid,
    pub title: Option<String>,
    pub genre: Option<String>,
    pub style: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NovelResponse {
    pub id: Uuid,
    pub title: String,
    pub genre: String,
    pub style: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapters: Option<Vec<ChapterResponse>>,
}

impl From<NovelRecord> for NovelResponse {
    fn from(novel: NovelRecord) -> Self {
        Self {
            id: novel.id,
            title: novel.title,
            genre: novel.genre.as_str().to_string(),
            style: novel.style.as_str().to_string(),
            description: novel.description,
            status: novel.status.as_str().to_string(),
            created_at: novel.created_at.to_rfc3339(),
            updated_at: novel.updated_at.to_rfc3339(),
            chapters: None,
        }
    }
}

impl From<NovelView> for NovelResponse {
    fn from(view: NovelView) -> Self {
        let mut response = NovelResponse::from(view.novel);
        response.chapters = Some(view.chapters.into_iter().map(ChapterResponse::from).collect());
        response
    }
}

// ============================================================================
// Chapter DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateChapterRequest {
    pub novel_id: Uuid,
    pub title: String,
    pub summary: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateChapterRequest {
    pub id: Uuid,
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub summary: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub content: Option<Option<String>>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChapterResponse {
    pub id: Uuid,
    pub novel_id: Uuid,
    pub chapter_number: u32,
    pub title: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub status: String,
    pub progress: u8,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ChapterRecord> for ChapterResponse {
    fn from(chapter: ChapterRecord) -> Self {
        Self {
            id: chapter.id,
            novel_id: chapter.novel_id,
            chapter_number: chapter.chapter_number,
            title: chapter.title,
            summary: chapter.summary,
            content: chapter.content,
            status: chapter.status.as_str().to_string(),
            progress: chapter.progress.value(),
            created_at: chapter.created_at.to_rfc3339(),
            updated_at: chapter.updated_at.to_rfc3339(),
        }
    }
}

/// 章节详情中的小说摘要
#[derive(Debug, Serialize)]
pub struct NovelSummaryResponse {
    pub id: Uuid,
    pub title: String,
    pub genre: String,
    pub style: String,
}

#[derive(Debug, Serialize)]
pub struct GenerationTaskResponse {
    pub id: Uuid,
    pub task_type: String,
    pub status: String,
    pub progress: u8,
    pub parameters: serde_json::Value,
    pub result: Option<String>,
    pub error_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<GenerationTaskRecord> for GenerationTaskResponse {
    fn from(task: GenerationTaskRecord) -> Self {
        Self {
            id: task.id,
            task_type: task.task_type.as_str().to_string(),
            status: task.status.as_str().to_string(),
            progress: task.progress.value(),
            parameters: serde_json::to_value(&task.parameters).unwrap_or_default(),
            result: task.result,
            error_message: task.error_message,
            created_at: task.created_at.to_rfc3339(),
            updated_at: task.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChapterDetailResponse {
    #[serde(flatten)]
    pub chapter: ChapterResponse,
    pub novel: NovelSummaryResponse,
    pub tasks: Vec<GenerationTaskResponse>,
}

impl From<ChapterDetail> for ChapterDetailResponse {
    fn from(detail: ChapterDetail) -> Self {
        Self {
            chapter: detail.chapter.into(),
            novel: NovelSummaryResponse {
                id: detail.novel.id,
                title: detail.novel.title,
                genre: detail.novel.genre.as_str().to_string(),
                style: detail.novel.style.as_str().to_string(),
            },
            tasks: detail.tasks.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PolishResponse {
    pub chapter_id: Uuid,
    pub content: String,
    pub polished: bool,
}

impl From<PolishResult> for PolishResponse {
    fn from(result: PolishResult) -> Self {
        Self {
            chapter_id: result.chapter_id,
            content: result.content,
            polished: result.polished,
        }
    }
}
