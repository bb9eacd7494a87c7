//! Generation Commands - 内容生成相关命令

use uuid::Uuid;

/// 生成章节正文命令
#[derive(Debug, Clone)]
pub struct GenerateChapterContent {
    pub owner_id: Uuid,
    pub chapter_id: Uuid,
}

/// 润色章节正文命令（只返回预览，不落库）
#[derive(Debug, Clone)]
pub struct PolishChapterContent {
    pub owner_id: Uuid,
    pub chapter_id: Uuid,
}
