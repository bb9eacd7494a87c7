//! Chapter Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    ChapterRecord, ChapterRepositoryPort, GenerationTaskRecord, GenerationTaskRepositoryPort,
    NovelRecord,
};
use crate::application::queries::GetChapter;

/// 章节详情：所属小说与生成任务（最新在前）
#[derive(Debug, Clone)]
pub struct ChapterDetail {
    pub chapter: ChapterRecord,
    pub novel: NovelRecord,
    pub tasks: Vec<GenerationTaskRecord>,
}

/// GetChapter Handler
pub struct GetChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    task_repo: Arc<dyn GenerationTaskRepositoryPort>,
}

impl GetChapterHandler {
    pub fn new(
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        task_repo: Arc<dyn GenerationTaskRepositoryPort>,
    ) -> Self {
        Self {
            chapter_repo,
            task_repo,
        }
    }

    pub async fn handle(&self, query: GetChapter) -> Result<ChapterDetail, ApplicationError> {
        let found = self
            .chapter_repo
            .find_by_id_for_owner(query.chapter_id, query.owner_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", query.chapter_id))?;

        let tasks = self.task_repo.find_by_chapter(found.chapter.id).await?;

        Ok(ChapterDetail {
            chapter: found.chapter,
            novel: found.novel,
            tasks,
        })
    }
}
