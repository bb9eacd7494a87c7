//! Chapter Context - Value Objects

use serde::{Deserialize, Serialize};

/// 章节生成状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChapterStatus {
    /// 等待生成
    Pending,
    /// 生成中
    Generating,
    /// 已完成
    Completed,
    /// 生成失败
    Error,
}

impl ChapterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChapterStatus::Pending => "pending",
            ChapterStatus::Generating => "generating",
            ChapterStatus::Completed => "completed",
            ChapterStatus::Error => "error",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ChapterStatus::Pending),
            "generating" => Some(ChapterStatus::Generating),
            "completed" => Some(ChapterStatus::Completed),
            "error" => Some(ChapterStatus::Error),
            _ => None,
        }
    }

    /// 是否可以开始一次新的生成
    pub fn can_start_generation(&self) -> bool {
        !matches!(self, ChapterStatus::Generating)
    }

    /// 手动编辑是否允许设置为该状态
    ///
    /// `generating` 只能由生成流程写入
    pub fn is_manually_assignable(&self) -> bool {
        !matches!(self, ChapterStatus::Generating)
    }

    /// 非生成状态下对应的进度值
    pub fn resting_progress(&self) -> Progress {
        match self {
            ChapterStatus::Completed => Progress::COMPLETE,
            _ => Progress::ZERO,
        }
    }
}

impl Default for ChapterStatus {
    fn default() -> Self {
        ChapterStatus::Pending
    }
}

/// 进度百分比，取值范围 [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress(u8);

impl Progress {
    pub const ZERO: Progress = Progress(0);
    pub const COMPLETE: Progress = Progress(100);

    /// 超出范围的值截断为 100
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    pub fn from_i64(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Progress {
    fn default() -> Self {
        Progress::ZERO
    }
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}
