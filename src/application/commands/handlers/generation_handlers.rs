//! Generation Command Handlers - 章节生成编排
//!
//! 一次生成尝试按固定顺序推进，每个检查点都是一次持久化写入：
//! 占用(10) -> 查找前文 -> 创建任务 -> 调用前(30) -> 返回后(80) -> 完成(100)
//! 占用之后的任何失败都回退到 error/0，章节不会停留在 generating

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::application::commands::{GenerateChapterContent, PolishChapterContent};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ChapterRecord, ChapterRepositoryPort, ContentGeneratorPort, GenerationMode,
    GenerationTaskRecord, GenerationTaskRepositoryPort, GeneratorError, NovelRecord,
    RepositoryError, TaskPatch,
};
use crate::domain::chapter::{GenerationStep, Progress};
use crate::domain::generation::{GenerationParameters, TaskStatus, TaskType};
use crate::domain::{build_chapter_prompt, build_polish_prompt, PromptContext};
use crate::infrastructure::events::EventPublisher;

/// 对调用方暴露的失败信息，具体原因只写日志
const GENERATION_FAILED_MESSAGE: &str = "content generation failed";

/// 占用之后的失败原因
#[derive(Debug, Error)]
enum AttemptError {
    #[error("store write failed: {0}")]
    Store(#[from] RepositoryError),

    #[error("generator failed: {0}")]
    Generator(#[from] GeneratorError),

    #[error("generator timed out after {0:?}")]
    TimedOut(Duration),
}

// ============================================================================
// GenerateChapterContent
// ============================================================================

/// GenerateChapterContent Handler
pub struct GenerateChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    task_repo: Arc<dyn GenerationTaskRepositoryPort>,
    generator: Arc<dyn ContentGeneratorPort>,
    event_publisher: Arc<EventPublisher>,
    timeout: Duration,
}

impl GenerateChapterHandler {
    pub fn new(
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        task_repo: Arc<dyn GenerationTaskRepositoryPort>,
        generator: Arc<dyn ContentGeneratorPort>,
        event_publisher: Arc<EventPublisher>,
        timeout: Duration,
    ) -> Self {
        Self {
            chapter_repo,
            task_repo,
            generator,
            event_publisher,
            timeout,
        }
    }

    /// 生成章节正文，成功时返回已完成的章节
    pub async fn handle(
        &self,
        command: GenerateChapterContent,
    ) -> Result<ChapterRecord, ApplicationError> {
        let found = self
            .chapter_repo
            .find_by_id_for_owner(command.chapter_id, command.owner_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", command.chapter_id))?;

        if !found.chapter.has_summary() {
            return Err(ApplicationError::invalid_state(
                "chapter summary is required before generation",
            ));
        }

        if !found.chapter.status.can_start_generation()
            || !self
                .chapter_repo
                .claim_for_generation(command.chapter_id, GenerationStep::Claimed.progress())
                .await?
        {
            tracing::warn!(chapter_id = %command.chapter_id, "Chapter is already being generated");
            return Err(ApplicationError::conflict("chapter is already being generated"));
        }

        self.event_publisher.publish_generation_started(
            command.owner_id,
            found.chapter.id,
            found.novel.id,
            GenerationStep::Claimed.progress().value(),
        );

        tracing::info!(
            chapter_id = %found.chapter.id,
            novel_id = %found.novel.id,
            chapter_number = found.chapter.chapter_number,
            "Chapter generation started"
        );

        let attempt = GenerationAttempt {
            chapter_repo: self.chapter_repo.clone(),
            task_repo: self.task_repo.clone(),
            generator: self.generator.clone(),
            event_publisher: self.event_publisher.clone(),
            timeout: self.timeout,
            owner_id: command.owner_id,
            chapter: found.chapter,
            novel: found.novel,
            step: GenerationStep::Claimed,
        };

        // 在独立任务中执行，调用方断开连接也会走完成功或失败路径
        match tokio::spawn(attempt.run()).await {
            Ok(result) => result,
            Err(join_error) => {
                tracing::error!(
                    chapter_id = %command.chapter_id,
                    error = %join_error,
                    "Generation attempt aborted"
                );
                if let Err(e) = self.chapter_repo.fail_generation(command.chapter_id).await {
                    tracing::error!(
                        chapter_id = %command.chapter_id,
                        error = %e,
                        "Failed to roll back aborted generation"
                    );
                }
                Err(ApplicationError::GenerationFailed(
                    GENERATION_FAILED_MESSAGE.to_string(),
                ))
            }
        }
    }
}

/// 一次已占用的生成尝试
struct GenerationAttempt {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    task_repo: Arc<dyn GenerationTaskRepositoryPort>,
    generator: Arc<dyn ContentGeneratorPort>,
    event_publisher: Arc<EventPublisher>,
    timeout: Duration,
    owner_id: Uuid,
    chapter: ChapterRecord,
    novel: NovelRecord,
    step: GenerationStep,
}

impl GenerationAttempt {
    async fn run(mut self) -> Result<ChapterRecord, ApplicationError> {
        let mut task_id = None;
        match self.drive(&mut task_id).await {
            Ok(chapter) => Ok(chapter),
            Err(cause) => {
                self.fail(task_id, &cause).await;
                Err(ApplicationError::GenerationFailed(
                    GENERATION_FAILED_MESSAGE.to_string(),
                ))
            }
        }
    }

    async fn drive(&mut self, task_id: &mut Option<Uuid>) -> Result<ChapterRecord, AttemptError> {
        let prior_content = self
            .chapter_repo
            .find_preceding(self.novel.id, self.chapter.chapter_number)
            .await?
            .and_then(|prior| prior.content);

        let summary = self.chapter.summary.clone().unwrap_or_default();
        let now = Utc::now();
        let task = GenerationTaskRecord {
            id: Uuid::new_v4(),
            chapter_id: self.chapter.id,
            task_type: TaskType::ChapterGeneration,
            status: TaskStatus::Running,
            parameters: GenerationParameters {
                summary: summary.clone(),
                genre: self.novel.genre,
                style: self.novel.style,
                chapter_number: self.chapter.chapter_number,
                novel_title: self.novel.title.clone(),
            },
            progress: self.step.progress(),
            result: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        };
        self.task_repo.create(&task).await?;
        *task_id = Some(task.id);

        self.checkpoint(GenerationStep::Invoking).await?;

        let prompt = build_chapter_prompt(&PromptContext {
            summary: &summary,
            genre: self.novel.genre,
            style: self.novel.style,
            chapter_number: self.chapter.chapter_number,
            novel_title: &self.novel.title,
            prior_content: prior_content.as_deref(),
        });

        let content = tokio::time::timeout(
            self.timeout,
            self.generator.generate(&prompt, GenerationMode::Draft),
        )
        .await
        .map_err(|_| AttemptError::TimedOut(self.timeout))??;

        if content.trim().is_empty() {
            return Err(GeneratorError::EmptyResponse.into());
        }

        self.checkpoint(GenerationStep::Received).await?;

        self.chapter_repo
            .complete_generation(self.chapter.id, task.id, &content)
            .await?;
        self.advance(GenerationStep::Completed);

        let content_chars = content.chars().count();
        self.event_publisher.publish_generation_completed(
            self.owner_id,
            self.chapter.id,
            self.novel.id,
            task.id,
            content_chars,
        );

        tracing::info!(
            chapter_id = %self.chapter.id,
            task_id = %task.id,
            content_chars = content_chars,
            "Chapter generation completed"
        );

        let mut chapter = self.chapter.clone();
        chapter.content = Some(content);
        chapter.status = self.step.chapter_status();
        chapter.progress = self.step.progress();
        chapter.updated_at = Utc::now();
        Ok(chapter)
    }

    /// 持久化进度检查点并推送事件
    async fn checkpoint(&mut self, next: GenerationStep) -> Result<(), RepositoryError> {
        self.chapter_repo
            .update_progress(self.chapter.id, next.progress())
            .await?;
        self.advance(next);
        self.event_publisher.publish_generation_progress(
            self.owner_id,
            self.chapter.id,
            self.novel.id,
            next.progress().value(),
        );
        Ok(())
    }

    fn advance(&mut self, next: GenerationStep) {
        debug_assert!(
            self.step.can_advance_to(next),
            "illegal generation step {:?} -> {:?}",
            self.step,
            next
        );
        self.step = next;
    }

    /// 失败路径：章节回退到 error/0，任务标记为 failed
    async fn fail(&mut self, task_id: Option<Uuid>, cause: &AttemptError) {
        tracing::error!(
            chapter_id = %self.chapter.id,
            task_id = ?task_id,
            step = ?self.step,
            error = %cause,
            "Chapter generation failed"
        );
        self.advance(GenerationStep::Failed);

        if let Err(e) = self.chapter_repo.fail_generation(self.chapter.id).await {
            // 启动时的恢复流程会处理遗留的 generating 章节
            tracing::error!(
                chapter_id = %self.chapter.id,
                error = %e,
                "Failed to roll back chapter status"
            );
        }

        if let Some(task_id) = task_id {
            let patch = TaskPatch {
                status: Some(TaskStatus::Failed),
                progress: Some(Progress::ZERO),
                error_message: Some(cause.to_string()),
                ..Default::default()
            };
            if let Err(e) = self.task_repo.update(task_id, &patch).await {
                tracing::error!(task_id = %task_id, error = %e, "Failed to mark task as failed");
            }
        }

        self.event_publisher.publish_generation_failed(
            self.owner_id,
            self.chapter.id,
            self.novel.id,
            task_id,
            GENERATION_FAILED_MESSAGE,
        );
    }
}

// ============================================================================
// PolishChapterContent
// ============================================================================

/// 润色结果（预览，不落库）
#[derive(Debug, Clone)]
pub struct PolishResult {
    pub chapter_id: Uuid,
    pub content: String,
    /// false 表示生成失败，返回的是原文
    pub polished: bool,
}

/// PolishChapterContent Handler
pub struct PolishChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    generator: Arc<dyn ContentGeneratorPort>,
    timeout: Duration,
}

impl PolishChapterHandler {
    pub fn new(
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        generator: Arc<dyn ContentGeneratorPort>,
        timeout: Duration,
    ) -> Self {
        Self {
            chapter_repo,
            generator,
            timeout,
        }
    }

    pub async fn handle(&self, command: PolishChapterContent) -> Result<PolishResult, ApplicationError> {
        let found = self
            .chapter_repo
            .find_by_id_for_owner(command.chapter_id, command.owner_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", command.chapter_id))?;

        let original = found
            .chapter
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ApplicationError::invalid_state("chapter has no content to polish"))?;

        let prompt = build_polish_prompt(&original, found.novel.genre);
        let outcome = tokio::time::timeout(
            self.timeout,
            self.generator.generate(&prompt, GenerationMode::Polish),
        )
        .await;

        match outcome {
            Ok(Ok(polished)) if !polished.trim().is_empty() => {
                tracing::info!(chapter_id = %command.chapter_id, "Chapter content polished");
                Ok(PolishResult {
                    chapter_id: command.chapter_id,
                    content: polished,
                    polished: true,
                })
            }
            other => {
                let reason = match other {
                    Ok(Err(e)) => e.to_string(),
                    Err(_) => format!("timed out after {:?}", self.timeout),
                    Ok(Ok(_)) => GeneratorError::EmptyResponse.to_string(),
                };
                tracing::warn!(
                    chapter_id = %command.chapter_id,
                    reason = %reason,
                    "Polish failed, returning original content"
                );
                Ok(PolishResult {
                    chapter_id: command.chapter_id,
                    content: original,
                    polished: false,
                })
            }
        }
    }
}
