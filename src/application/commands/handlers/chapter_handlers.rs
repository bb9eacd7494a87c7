//! Chapter Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::novel_handlers::{non_blank, parse_title};
use crate::application::commands::{CreateChapter, DeleteChapter, UpdateChapter};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ChapterPatch, ChapterRecord, ChapterRepositoryPort, NovelRepositoryPort,
};
use crate::domain::chapter::{ChapterStatus, Progress};

/// 解析手动设置的章节状态
fn parse_manual_status(raw: &str) -> Result<ChapterStatus, ApplicationError> {
    let status = ChapterStatus::from_str(raw.trim())
        .ok_or_else(|| ApplicationError::validation(format!("unknown chapter status: {}", raw)))?;
    if !status.is_manually_assignable() {
        return Err(ApplicationError::invalid_state(
            "status 'generating' can only be set by content generation",
        ));
    }
    Ok(status)
}

// ============================================================================
// CreateChapter
// ============================================================================

/// CreateChapter Handler
///
/// 章节号取当前最大值 + 1，删除后不回收
pub struct CreateChapterHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl CreateChapterHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
    ) -> Self {
        Self {
            novel_repo,
            chapter_repo,
        }
    }

    pub async fn handle(&self, command: CreateChapter) -> Result<ChapterRecord, ApplicationError> {
        let title = parse_title(&command.title)?;

        self.novel_repo
            .find_by_id_for_owner(command.novel_id, command.owner_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", command.novel_id))?;

        let chapter_number = self.chapter_repo.next_chapter_number(command.novel_id).await?;
        let now = Utc::now();
        let chapter = ChapterRecord {
            id: Uuid::new_v4(),
            novel_id: command.novel_id,
            chapter_number,
            title,
            summary: non_blank(command.summary),
            content: None,
            status: ChapterStatus::Pending,
            progress: Progress::ZERO,
            created_at: now,
            updated_at: now,
        };

        // 并发创建撞上 (novel_id, chapter_number) 唯一约束时返回 Conflict
        self.chapter_repo.save(&chapter).await?;

        tracing::info!(
            chapter_id = %chapter.id,
            novel_id = %chapter.novel_id,
            chapter_number = chapter.chapter_number,
            "Chapter created"
        );

        Ok(chapter)
    }
}

// ============================================================================
// UpdateChapter
// ============================================================================

/// UpdateChapter Handler
pub struct UpdateChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl UpdateChapterHandler {
    pub fn new(chapter_repo: Arc<dyn ChapterRepositoryPort>) -> Self {
        Self { chapter_repo }
    }

    pub async fn handle(&self, command: UpdateChapter) -> Result<ChapterRecord, ApplicationError> {
        let patch = ChapterPatch {
            title: non_blank(command.title).map(|t| parse_title(&t)).transpose()?,
            summary: command.summary,
            content: command.content,
            status: non_blank(command.status)
                .map(|s| parse_manual_status(&s))
                .transpose()?,
        };

        let current = self
            .chapter_repo
            .find_by_id_for_owner(command.chapter_id, command.owner_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", command.chapter_id))?;

        if current.chapter.status == ChapterStatus::Generating {
            return Err(ApplicationError::conflict("chapter is being generated"));
        }

        if !patch.is_empty() && !self.chapter_repo.update(command.chapter_id, &patch).await? {
            // 读取之后被生成占用
            return Err(ApplicationError::conflict("chapter is being generated"));
        }

        let updated = self
            .chapter_repo
            .find_by_id_for_owner(command.chapter_id, command.owner_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", command.chapter_id))?;

        tracing::info!(
            chapter_id = %updated.chapter.id,
            status = updated.chapter.status.as_str(),
            "Chapter updated"
        );

        Ok(updated.chapter)
    }
}

// ============================================================================
// DeleteChapter
// ============================================================================

/// DeleteChapter Handler
pub struct DeleteChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl DeleteChapterHandler {
    pub fn new(chapter_repo: Arc<dyn ChapterRepositoryPort>) -> Self {
        Self { chapter_repo }
    }

    pub async fn handle(&self, command: DeleteChapter) -> Result<(), ApplicationError> {
        let current = self
            .chapter_repo
            .find_by_id_for_owner(command.chapter_id, command.owner_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", command.chapter_id))?;

        if current.chapter.status == ChapterStatus::Generating
            || !self.chapter_repo.delete(command.chapter_id).await?
        {
            return Err(ApplicationError::conflict("chapter is being generated"));
        }

        tracing::info!(chapter_id = %command.chapter_id, "Chapter deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::test_support::{
        seed_chapter, seed_novel, seed_user, setup_pool,
    };
    use crate::infrastructure::persistence::sqlite::{SqliteChapterRepository, SqliteNovelRepository};

    struct Fixture {
        novels: Arc<dyn NovelRepositoryPort>,
        chapters: Arc<dyn ChapterRepositoryPort>,
        owner: Uuid,
        novel_id: Uuid,
        pool: crate::infrastructure::persistence::sqlite::DbPool,
    }

    async fn setup() -> Fixture {
        let pool = setup_pool().await;
        let owner = seed_user(&pool, "owner").await;
        let novel = seed_novel(&pool, owner, "仙途").await;
        Fixture {
            novels: Arc::new(SqliteNovelRepository::new(pool.clone())),
            chapters: Arc::new(SqliteChapterRepository::new(pool.clone())),
            owner,
            novel_id: novel.id,
            pool,
        }
    }

    fn create_cmd(fx: &Fixture, title: &str) -> CreateChapter {
        CreateChapter {
            owner_id: fx.owner,
            novel_id: fx.novel_id,
            title: title.to_string(),
            summary: Some("  ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_next_number() {
        let fx = setup().await;
        seed_chapter(&fx.pool, fx.novel_id, 1, None).await;
        seed_chapter(&fx.pool, fx.novel_id, 2, None).await;

        let handler = CreateChapterHandler::new(fx.novels.clone(), fx.chapters.clone());
        let chapter = handler.handle(create_cmd(&fx, "第三章")).await.unwrap();

        assert_eq!(chapter.chapter_number, 3);
        assert_eq!(chapter.status, ChapterStatus::Pending);
        assert!(chapter.summary.is_none());
    }

    #[tokio::test]
    async fn test_create_numbers_are_not_reused_after_delete() {
        let fx = setup().await;
        let handler = CreateChapterHandler::new(fx.novels.clone(), fx.chapters.clone());
        handler.handle(create_cmd(&fx, "一")).await.unwrap();
        let second = handler.handle(create_cmd(&fx, "二")).await.unwrap();
        let third = handler.handle(create_cmd(&fx, "三")).await.unwrap();

        DeleteChapterHandler::new(fx.chapters.clone())
            .handle(DeleteChapter {
                owner_id: fx.owner,
                chapter_id: second.id,
            })
            .await
            .unwrap();

        let fourth = handler.handle(create_cmd(&fx, "四")).await.unwrap();
        assert_eq!(third.chapter_number, 3);
        assert_eq!(fourth.chapter_number, 4);
    }

    #[tokio::test]
    async fn test_create_in_foreign_novel_is_not_found() {
        let fx = setup().await;
        let stranger = seed_user(&fx.pool, "stranger").await;
        let mut cmd = create_cmd(&fx, "一");
        cmd.owner_id = stranger;

        let err = CreateChapterHandler::new(fx.novels.clone(), fx.chapters.clone())
            .handle(cmd)
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_rejects_generating_status() {
        let fx = setup().await;
        let chapter = seed_chapter(&fx.pool, fx.novel_id, 1, Some("开篇")).await;

        let err = UpdateChapterHandler::new(fx.chapters.clone())
            .handle(UpdateChapter {
                owner_id: fx.owner,
                chapter_id: chapter.id,
                status: Some("generating".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidState(_)));

        let err = UpdateChapterHandler::new(fx.chapters.clone())
            .handle(UpdateChapter {
                owner_id: fx.owner,
                chapter_id: chapter.id,
                status: Some("drafted".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_update_sets_content_and_progress() {
        let fx = setup().await;
        let chapter = seed_chapter(&fx.pool, fx.novel_id, 1, Some("开篇")).await;

        let updated = UpdateChapterHandler::new(fx.chapters.clone())
            .handle(UpdateChapter {
                owner_id: fx.owner,
                chapter_id: chapter.id,
                content: Some(Some("手写正文".to_string())),
                status: Some("completed".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.status, ChapterStatus::Completed);
        assert_eq!(updated.progress, Progress::COMPLETE);
        assert_eq!(updated.content.as_deref(), Some("手写正文"));
        assert_eq!(updated.summary.as_deref(), Some("开篇"));
    }

    #[tokio::test]
    async fn test_edit_and_delete_conflict_while_generating() {
        let fx = setup().await;
        let chapter = seed_chapter(&fx.pool, fx.novel_id, 1, Some("开篇")).await;
        fx.chapters
            .claim_for_generation(chapter.id, Progress::new(10))
            .await
            .unwrap();

        let err = UpdateChapterHandler::new(fx.chapters.clone())
            .handle(UpdateChapter {
                owner_id: fx.owner,
                chapter_id: chapter.id,
                title: Some("新标题".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Conflict(_)));

        let err = DeleteChapterHandler::new(fx.chapters.clone())
            .handle(DeleteChapter {
                owner_id: fx.owner,
                chapter_id: chapter.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Conflict(_)));
    }
}
