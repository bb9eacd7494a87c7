//! Domain Layer - 领域层
//!
//! 包含三个限界上下文:
//! - Novel Context: 小说元数据
//! - Chapter Context: 章节状态与生成流程
//! - Generation Context: 生成任务记录

pub mod chapter;
pub mod generation;
pub mod novel;

mod prompt;

pub use prompt::{
    build_chapter_prompt, build_polish_prompt, trailing_excerpt, Prompt, PromptContext,
    PRIOR_CONTEXT_CHARS,
};
