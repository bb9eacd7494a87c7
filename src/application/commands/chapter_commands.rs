//! Chapter Commands

use uuid::Uuid;

/// 创建章节命令，章节号自动分配
#[derive(Debug, Clone)]
pub struct CreateChapter {
    pub owner_id: Uuid,
    pub novel_id: Uuid,
    pub title: String,
    pub summary: Option<String>,
}

/// 更新章节命令（`None` 表示不修改）
#[derive(Debug, Clone, Default)]
pub struct UpdateChapter {
    pub owner_id: Uuid,
    pub chapter_id: Uuid,
    pub title: Option<String>,
    pub summary: Option<Option<String>>,
    pub content: Option<Option<String>>,
    pub status: Option<String>,
}

/// 删除章节命令
#[derive(Debug, Clone)]
pub struct DeleteChapter {
    pub owner_id: Uuid,
    pub chapter_id: Uuid,
}
