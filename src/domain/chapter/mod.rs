//! Chapter Context - 章节限界上下文
//!
//! 职责:
//! - 章节状态与进度
//! - 内容生成流程的检查点

mod lifecycle;
mod value_objects;

pub use lifecycle::GenerationStep;
pub use value_objects::{ChapterStatus, Progress};
