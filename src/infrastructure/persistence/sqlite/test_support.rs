//! 测试夹具：内存库与种子数据

use chrono::Utc;
use uuid::Uuid;

use super::{
    create_pool, run_migrations, DatabaseConfig, DbPool, SqliteChapterRepository,
    SqliteGenerationTaskRepository, SqliteNovelRepository, SqliteUserRepository,
};
use crate::application::ports::{
    ChapterRecord, ChapterRepositoryPort, GenerationTaskRecord, GenerationTaskRepositoryPort,
    NovelRecord, NovelRepositoryPort, UserRepositoryPort,
};
use crate::domain::chapter::{ChapterStatus, Progress};
use crate::domain::generation::{GenerationParameters, TaskStatus, TaskType};
use crate::domain::novel::{Genre, NovelStatus, Style};

pub async fn setup_pool() -> DbPool {
    let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

pub async fn seed_user(pool: &DbPool, external_id: &str) -> Uuid {
    SqliteUserRepository::new(pool.clone())
        .find_or_create(external_id, external_id)
        .await
        .unwrap()
        .id
}

pub async fn seed_novel(pool: &DbPool, owner_id: Uuid, title: &str) -> NovelRecord {
    let now = Utc::now();
    let novel = NovelRecord {
        id: Uuid::new_v4(),
        owner_id,
        title: title.to_string(),
        genre: Genre::Fantasy,
        style: Style::Modern,
        description: None,
        status: NovelStatus::Draft,
        created_at: now,
        updated_at: now,
    };
    SqliteNovelRepository::new(pool.clone()).save(&novel).await.unwrap();
    novel
}

pub async fn seed_chapter(
    pool: &DbPool,
    novel_id: Uuid,
    chapter_number: u32,
    summary: Option<&str>,
) -> ChapterRecord {
    let now = Utc::now();
    let chapter = ChapterRecord {
        id: Uuid::new_v4(),
        novel_id,
        chapter_number,
        title: format!("第{chapter_number}章"),
        summary: summary.map(str::to_string),
        content: None,
        status: ChapterStatus::Pending,
        progress: Progress::ZERO,
        created_at: now,
        updated_at: now,
    };
    SqliteChapterRepository::new(pool.clone()).save(&chapter).await.unwrap();
    chapter
}

pub async fn seed_task(pool: &DbPool, chapter_id: Uuid) -> GenerationTaskRecord {
    let now = Utc::now();
    let task = GenerationTaskRecord {
        id: Uuid::new_v4(),
        chapter_id,
        task_type: TaskType::ChapterGeneration,
        status: TaskStatus::Running,
        parameters: GenerationParameters {
            summary: "开篇".to_string(),
            genre: Genre::Fantasy,
            style: Style::Modern,
            chapter_number: 1,
            novel_title: "仙途".to_string(),
        },
        progress: Progress::new(10),
        result: None,
        error_message: None,
        created_at: now,
        updated_at: now,
    };
    SqliteGenerationTaskRepository::new(pool.clone())
        .create(&task)
        .await
        .unwrap();
    task
}
