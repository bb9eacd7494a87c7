//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod content_generator;
mod identity;
mod repositories;

pub use content_generator::{ContentGeneratorPort, GenerationMode, GeneratorError};
pub use identity::{ExternalIdentity, IdentityProviderPort};
pub use repositories::{
    ChapterPatch, ChapterRecord, ChapterRepositoryPort, ChapterWithNovel,
    GenerationTaskRecord, GenerationTaskRepositoryPort, NovelPatch, NovelRecord,
    NovelRepositoryPort, RepositoryError, TaskPatch, UserRecord, UserRepositoryPort,
};
