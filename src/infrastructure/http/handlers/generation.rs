//! Generation HTTP Handlers
//!
//! 生成请求在整个尝试结束后才返回，进度通过 `/ws/events` 推送

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{GenerateChapterContent, PolishChapterContent};
use crate::infrastructure::http::auth::Caller;
use crate::infrastructure::http::dto::{ApiResponse, ChapterResponse, IdRequest, PolishResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 生成章节正文
pub async fn generate_chapter(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
    Json(req): Json<IdRequest>,
) -> Result<Json<ApiResponse<ChapterResponse>>, ApiError> {
    let chapter = state
        .generate_chapter_handler
        .handle(GenerateChapterContent {
            owner_id: user.id,
            chapter_id: req.id,
        })
        .await?;

    Ok(Json(ApiResponse::success(chapter.into())))
}

/// 润色章节正文（预览，不落库）
pub async fn polish_chapter(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
    Json(req): Json<IdRequest>,
) -> Result<Json<ApiResponse<PolishResponse>>, ApiError> {
    let result = state
        .polish_chapter_handler
        .handle(PolishChapterContent {
            owner_id: user.id,
            chapter_id: req.id,
        })
        .await?;

    Ok(Json(ApiResponse::success(result.into())))
}
