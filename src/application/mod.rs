//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Repository、ContentGenerator、IdentityProvider）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Caller commands
    ResolveCaller,
    // Novel commands
    CreateNovel,
    DeleteNovel,
    UpdateNovel,
    // Chapter commands
    CreateChapter,
    DeleteChapter,
    UpdateChapter,
    // Generation commands
    GenerateChapterContent,
    PolishChapterContent,
    // Handlers
    handlers::{
        CreateChapterHandler, CreateNovelHandler, DeleteChapterHandler, DeleteNovelHandler,
        GenerateChapterHandler, PolishChapterHandler, PolishResult, ResolveCallerHandler,
        UpdateChapterHandler, UpdateNovelHandler,
    },
};

pub use error::ApplicationError;

pub use ports::{
    // Repositories
    ChapterRecord,
    ChapterRepositoryPort,
    GenerationTaskRecord,
    GenerationTaskRepositoryPort,
    NovelRecord,
    NovelRepositoryPort,
    RepositoryError,
    UserRecord,
    UserRepositoryPort,
    // Content generator
    ContentGeneratorPort,
    GenerationMode,
    GeneratorError,
    // Identity
    ExternalIdentity,
    IdentityProviderPort,
};

pub use queries::{
    GetChapter,
    GetNovel,
    ListNovels,
    // Handlers
    handlers::{ChapterDetail, GetChapterHandler, GetNovelHandler, ListNovelsHandler, NovelView},
};
