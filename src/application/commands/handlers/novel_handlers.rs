//! Novel Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{CreateNovel, DeleteNovel, UpdateNovel};
use crate::application::error::ApplicationError;
use crate::application::ports::{NovelPatch, NovelRecord, NovelRepositoryPort};
use crate::domain::novel::{Genre, NovelStatus, Style, Title};

/// 空白字符串视为未提供
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub(crate) fn parse_title(raw: &str) -> Result<String, ApplicationError> {
    Title::new(raw)
        .map(Title::into_inner)
        .map_err(ApplicationError::validation)
}

fn parse_genre(raw: &str) -> Result<Genre, ApplicationError> {
    Genre::from_str(raw.trim())
        .ok_or_else(|| ApplicationError::validation(format!("unknown genre: {}", raw)))
}

fn parse_style(raw: &str) -> Result<Style, ApplicationError> {
    Style::from_str(raw.trim())
        .ok_or_else(|| ApplicationError::validation(format!("unknown style: {}", raw)))
}

fn parse_novel_status(raw: &str) -> Result<NovelStatus, ApplicationError> {
    NovelStatus::from_str(raw.trim())
        .ok_or_else(|| ApplicationError::validation(format!("unknown novel status: {}", raw)))
}

// ============================================================================
// CreateNovel
// ============================================================================

/// CreateNovel Handler
pub struct CreateNovelHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl CreateNovelHandler {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self { novel_repo }
    }

    pub async fn handle(&self, command: CreateNovel) -> Result<NovelRecord, ApplicationError> {
        let title = parse_title(&command.title)?;
        let genre = parse_genre(&command.genre)?;
        let style = match non_blank(command.style) {
            Some(raw) => parse_style(&raw)?,
            None => Style::default(),
        };

        let now = Utc::now();
        let novel = NovelRecord {
            id: Uuid::new_v4(),
            owner_id: command.owner_id,
            title,
            genre,
            style,
            description: non_blank(command.description),
            status: NovelStatus::Draft,
            created_at: now,
            updated_at: now,
        };

        self.novel_repo.save(&novel).await?;

        tracing::info!(
            novel_id = %novel.id,
            owner_id = %novel.owner_id,
            genre = novel.genre.as_str(),
            "Novel created"
        );

        Ok(novel)
    }
}

// ============================================================================
// UpdateNovel
// ============================================================================

/// UpdateNovel Handler
///
/// 空白的标题/类型/风格/状态视为未提供；简介可以显式清空
pub struct UpdateNovelHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl UpdateNovelHandler {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self { novel_repo }
    }

    pub async fn handle(&self, command: UpdateNovel) -> Result<NovelRecord, ApplicationError> {
        let patch = NovelPatch {
            title: non_blank(command.title).map(|t| parse_title(&t)).transpose()?,
            genre: non_blank(command.genre).map(|g| parse_genre(&g)).transpose()?,
            style: non_blank(command.style).map(|s| parse_style(&s)).transpose()?,
            description: command.description,
            status: non_blank(command.status)
                .map(|s| parse_novel_status(&s))
                .transpose()?,
        };

        if !patch.is_empty()
            && !self
                .novel_repo
                .update(command.novel_id, command.owner_id, &patch)
                .await?
        {
            return Err(ApplicationError::not_found("Novel", command.novel_id));
        }

        let novel = self
            .novel_repo
            .find_by_id_for_owner(command.novel_id, command.owner_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", command.novel_id))?;

        tracing::info!(novel_id = %novel.id, "Novel updated");

        Ok(novel)
    }
}

// ============================================================================
// DeleteNovel
// ============================================================================

/// DeleteNovel Handler（级联删除章节与生成任务）
pub struct DeleteNovelHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl DeleteNovelHandler {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self { novel_repo }
    }

    pub async fn handle(&self, command: DeleteNovel) -> Result<(), ApplicationError> {
        if !self
            .novel_repo
            .delete(command.novel_id, command.owner_id)
            .await?
        {
            return Err(ApplicationError::not_found("Novel", command.novel_id));
        }

        tracing::info!(novel_id = %command.novel_id, "Novel deleted");
        Ok(())
    }
}
