//! Generation Context - 生成任务记录
//!
//! 每次生成尝试对应一条 GenerationTask，参数快照在创建时固定

use serde::{Deserialize, Serialize};

use crate::domain::novel::{Genre, Style};

/// 任务类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    ChapterGeneration,
    ContentAnalysis,
    StyleAdaptation,
    QualityReview,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::ChapterGeneration => "chapter_generation",
            TaskType::ContentAnalysis => "content_analysis",
            TaskType::StyleAdaptation => "style_adaptation",
            TaskType::QualityReview => "quality_review",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "chapter_generation" => Some(TaskType::ChapterGeneration),
            "content_analysis" => Some(TaskType::ContentAnalysis),
            "style_adaptation" => Some(TaskType::StyleAdaptation),
            "quality_review" => Some(TaskType::QualityReview),
            _ => None,
        }
    }
}

/// 任务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Running,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "running" => Some(TaskStatus::Running),
            "completed" => Some(TaskStatus::Completed),
            "failed" => Some(TaskStatus::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskStatus::Running)
    }
}

/// 生成输入快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParameters {
    pub summary: String,
    pub genre: Genre,
    pub style: Style,
    pub chapter_number: u32,
    pub novel_title: String,
}
