//! Novel HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{CreateNovel, DeleteNovel, GetNovel, ListNovels, UpdateNovel};
use crate::infrastructure::http::auth::Caller;
use crate::infrastructure::http::dto::{
    ApiResponse, CreateNovelRequest, IdRequest, IdResponse, NovelResponse, UpdateNovelRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 创建小说
pub async fn create_novel(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
    Json(req): Json<CreateNovelRequest>,
) -> Result<Json<ApiResponse<NovelResponse>>, ApiError> {
    let command = CreateNovel {
        owner_id: user.id,
        title: req.title,
        genre: req.genre,
        style: req.style,
        description: req.description,
    };

    let novel = state.create_novel_handler.handle(command).await?;

    Ok(Json(ApiResponse::success(novel.into())))
}

/// 获取调用方的小说列表（含章节）
pub async fn list_novels(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
) -> Result<Json<ApiResponse<Vec<NovelResponse>>>, ApiError> {
    let views = state
        .list_novels_handler
        .handle(ListNovels { owner_id: user.id })
        .await?;

    Ok(Json(ApiResponse::success(
        views.into_iter().map(NovelResponse::from).collect(),
    )))
}

/// 获取小说详情（含章节）
pub async fn get_novel(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
    Json(req): Json<IdRequest>,
) -> Result<Json<ApiResponse<NovelResponse>>, ApiError> {
    let view = state
        .get_novel_handler
        .handle(GetNovel {
            owner_id: user.id,
            novel_id: req.id,
        })
        .await?;

    Ok(Json(ApiResponse::success(view.into())))
}

/// 更新小说，返回更新后的详情
pub async fn update_novel(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
    Json(req): Json<UpdateNovelRequest>,
) -> Result<Json<ApiResponse<NovelResponse>>, ApiError> {
    let command = UpdateNovel {
        owner_id: user.id,
        novel_id: req.id,
        title: req.title,
        genre: req.genre,
        style: req.style,
        description: req.description,
        status: req.status,
    };

    state.update_novel_handler.handle(command).await?;

    let view = state
        .get_novel_handler
        .handle(GetNovel {
            owner_id: user.id,
            novel_id: req.id,
        })
        .await?;

    Ok(Json(ApiResponse::success(view.into())))
}

/// 删除小说（级联删除章节与生成任务）
pub async fn delete_novel(
    State(state): State<Arc<AppState>>,
    Caller(user): Caller,
    Json(req): Json<IdRequest>,
) -> Result<Json<ApiResponse<IdResponse>>, ApiError> {
    state
        .delete_novel_handler
        .handle(DeleteNovel {
            owner_id: user.id,
            novel_id: req.id,
        })
        .await?;

    Ok(Json(ApiResponse::success(IdResponse { id: req.id })))
}
