//! Chapter HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{CreateChapter, DeleteChapter, GetChapter, UpdateChapter};
use crate::infrastructure::http::auth::Caller;
use crate::infrastructure::http::dto::{
    ApiResponse, ChapterDetailResponse, ChapterResponse, CreateChapterRequest, IdRequest,
    IdResponse, UpdateChapterRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 创建章节（章节号自动分配）
pub async fn create_chapter(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
    Json(req): Json<CreateChapterRequest>,
) -> Result<Json<ApiResponse<ChapterResponse>>, ApiError> {
    let chapter = state
        .create_chapter_handler
        .handle(CreateChapter {
            owner_id: user.id,
            novel_id: req.novel_id,
            title: req.title,
            summary: req.summary,
        })
        .await?;

    Ok(Json(ApiResponse::success(chapter.into())))
}

/// 获取章节详情（含所属小说与生成任务）
pub async fn get_chapter(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
    Json(req): Json<IdRequest>,
) -> Result<Json<ApiResponse<ChapterDetailResponse>>, ApiError> {
    let detail = state
        .get_chapter_handler
        .handle(GetChapter {
            owner_id: user.id,
            chapter_id: req.id,
        })
        .await?;

    Ok(Json(ApiResponse::success(detail.into())))
}

/// 更新章节
pub async fn update_chapter(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
    Json(req): Json<UpdateChapterRequest>,
) -> Result<Json<ApiResponse<ChapterResponse>>, ApiError> {
    let chapter = state
        .update_chapter_handler
        .handle(UpdateChapter {
            owner_id: user.id,
            chapter_id: req.id,
            title: req.title,
            summary: req.summary,
            content: req.content,
            status: req.status,
        })
        .await?;

    Ok(Json(ApiResponse::success(chapter.into())))
}

/// 删除章节
pub async fn delete_chapter(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
    Json(req): Json<IdRequest>,
) -> Result<Json<ApiResponse<IdResponse>>, ApiError> {
    state
        .delete_chapter_handler
        .handle(DeleteChapter {
            owner_id: user.id,
            chapter_id: req.id,
        })
        .await?;

    Ok(Json(ApiResponse::success(IdResponse { id: req.id })))
}
