//! Novel Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{ChapterRecord, ChapterRepositoryPort, NovelRecord, NovelRepositoryPort};
use crate::application::queries::{GetNovel, ListNovels};

/// 小说及其章节（按章节号升序）
#[derive(Debug, Clone)]
pub struct NovelView {
    pub novel: NovelRecord,
    pub chapters: Vec<ChapterRecord>,
}

/// GetNovel Handler
pub struct GetNovelHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl GetNovelHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
    ) -> Self {
        Self {
            novel_repo,
            chapter_repo,
        }
    }

    pub async fn handle(&self, query: GetNovel) -> Result<NovelView, ApplicationError> {
        let novel = self
            .novel_repo
            .find_by_id_for_owner(query.novel_id, query.owner_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", query.novel_id))?;

        let chapters = self.chapter_repo.find_by_novel(novel.id).await?;

        Ok(NovelView { novel, chapters })
    }
}

/// ListNovels Handler
pub struct ListNovelsHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl ListNovelsHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
    ) -> Self {
        Self {
            novel_repo,
            chapter_repo,
        }
    }

    pub async fn handle(&self, query: ListNovels) -> Result<Vec<NovelView>, ApplicationError> {
        let novels = self.novel_repo.find_all_by_owner(query.owner_id).await?;

        let mut views = Vec::with_capacity(novels.len());
        for novel in novels {
            let chapters = self.chapter_repo.find_by_novel(novel.id).await?;
            views.push(NovelView { novel, chapters });
        }

        Ok(views)
    }
}
