//! Chapter Context - 生成流程状态机
//!
//! 一次生成尝试的每个检查点都对应一次持久化写入，顺序固定:
//!
//! ```text
//! Claimed(10) -> Invoking(30) -> Received(80) -> Completed(100)
//!      \______________\_______________\________> Failed(0)
//! ```

use super::{ChapterStatus, Progress};

/// 生成流程检查点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStep {
    /// 已占用章节（status -> generating）
    Claimed,
    /// 即将调用内容生成器
    Invoking,
    /// 生成器已返回，尚未持久化
    Received,
    /// 内容已写入
    Completed,
    /// 失败，回退到 error
    Failed,
}

impl GenerationStep {
    /// 该检查点写入的章节状态
    pub fn chapter_status(&self) -> ChapterStatus {
        match self {
            GenerationStep::Claimed | GenerationStep::Invoking | GenerationStep::Received => {
                ChapterStatus::Generating
            }
            GenerationStep::Completed => ChapterStatus::Completed,
            GenerationStep::Failed => ChapterStatus::Error,
        }
    }

    /// 该检查点写入的进度
    pub fn progress(&self) -> Progress {
        match self {
            GenerationStep::Claimed => Progress::new(10),
            GenerationStep::Invoking => Progress::new(30),
            GenerationStep::Received => Progress::new(80),
            GenerationStep::Completed => Progress::COMPLETE,
            GenerationStep::Failed => Progress::ZERO,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationStep::Completed | GenerationStep::Failed)
    }

    /// 合法的下一步
    pub fn can_advance_to(&self, next: GenerationStep) -> bool {
        use GenerationStep::*;
        match (self, next) {
            (Claimed, Invoking) | (Invoking, Received) | (Received, Completed) => true,
            (Claimed | Invoking | Received, Failed) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_monotonic_until_terminal() {
        let happy = [
            GenerationStep::Claimed,
            GenerationStep::Invoking,
            GenerationStep::Received,
            GenerationStep::Completed,
        ];
        for pair in happy.windows(2) {
            assert!(pair[0].can_advance_to(pair[1]));
            assert!(pair[0].progress() < pair[1].progress());
        }
    }

    #[test]
    fn test_every_non_terminal_step_can_fail() {
        for step in [
            GenerationStep::Claimed,
            GenerationStep::Invoking,
            GenerationStep::Received,
        ] {
            assert!(step.can_advance_to(GenerationStep::Failed));
            assert_eq!(step.chapter_status(), ChapterStatus::Generating);
        }
        assert!(!GenerationStep::Completed.can_advance_to(GenerationStep::Failed));
        assert!(!GenerationStep::Failed.can_advance_to(GenerationStep::Invoking));
    }

    #[test]
    fn test_terminal_steps_match_chapter_invariant() {
        assert!(GenerationStep::Completed.is_terminal());
        assert_eq!(GenerationStep::Completed.progress(), Progress::COMPLETE);
        assert_eq!(GenerationStep::Failed.chapter_status(), ChapterStatus::Error);
        assert_eq!(GenerationStep::Failed.progress(), Progress::ZERO);
    }
}
