//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;
use std::time::Duration;

use crate::application::{
    // Command handlers
    CreateChapterHandler, CreateNovelHandler, DeleteChapterHandler, DeleteNovelHandler,
    GenerateChapterHandler, PolishChapterHandler, ResolveCallerHandler, UpdateChapterHandler,
    UpdateNovelHandler,
    // Query handlers
    GetChapterHandler, GetNovelHandler, ListNovelsHandler,
    // Ports
    ChapterRepositoryPort, ContentGeneratorPort, GenerationTaskRepositoryPort,
    IdentityProviderPort, NovelRepositoryPort, UserRepositoryPort,
};
use crate::infrastructure::events::EventPublisher;

/// 应用状态
pub struct AppState {
    // ========== Events ==========
    pub event_publisher: Arc<EventPublisher>,

    // ========== Command Handlers ==========
    pub resolve_caller_handler: ResolveCallerHandler,
    pub create_novel_handler: CreateNovelHandler,
    pub update_novel_handler: UpdateNovelHandler,
    pub delete_novel_handler: DeleteNovelHandler,
    pub create_chapter_handler: CreateChapterHandler,
    pub update_chapter_handler: UpdateChapterHandler,
    pub delete_chapter_handler: DeleteChapterHandler,
    pub generate_chapter_handler: GenerateChapterHandler,
    pub polish_chapter_handler: PolishChapterHandler,

    // ========== Query Handlers ==========
    pub get_novel_handler: GetNovelHandler,
    pub list_novels_handler: ListNovelsHandler,
    pub get_chapter_handler: GetChapterHandler,
}

impl AppState {
    /// 创建应用状态
    ///
    /// `generation_timeout` 限定单次生成调用的最长耗时
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_repo: Arc<dyn UserRepositoryPort>,
        novel_repo: Arc<dyn NovelRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        task_repo: Arc<dyn GenerationTaskRepositoryPort>,
        generator: Arc<dyn ContentGeneratorPort>,
        identity_provider: Arc<dyn IdentityProviderPort>,
        event_publisher: Arc<EventPublisher>,
        generation_timeout: Duration,
    ) -> Self {
        Self {
            event_publisher: event_publisher.clone(),

            // Command handlers
            resolve_caller_handler: ResolveCallerHandler::new(identity_provider, user_repo),
            create_novel_handler: CreateNovelHandler::new(novel_repo.clone()),
            update_novel_handler: UpdateNovelHandler::new(novel_repo.clone()),
            delete_novel_handler: DeleteNovelHandler::new(novel_repo.clone()),
            create_chapter_handler: CreateChapterHandler::new(
                novel_repo.clone(),
                chapter_repo.clone(),
            ),
            update_chapter_handler: UpdateChapterHandler::new(chapter_repo.clone()),
            delete_chapter_handler: DeleteChapterHandler::new(chapter_repo.clone()),
            generate_chapter_handler: GenerateChapterHandler::new(
                chapter_repo.clone(),
                task_repo.clone(),
                generator.clone(),
                event_publisher,
                generation_timeout,
            ),
            polish_chapter_handler: PolishChapterHandler::new(
                chapter_repo.clone(),
                generator,
                generation_timeout,
            ),

            // Query handlers
            get_novel_handler: GetNovelHandler::new(novel_repo.clone(), chapter_repo.clone()),
            list_novels_handler: ListNovelsHandler::new(novel_repo, chapter_repo.clone()),
            get_chapter_handler: GetChapterHandler::new(chapter_repo, task_repo),
        }
    }
}
