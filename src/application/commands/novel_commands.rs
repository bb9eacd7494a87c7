//! Novel Commands

use uuid::Uuid;

/// 创建小说命令
#[derive(Debug, Clone)]
pub struct CreateNovel {
    pub owner_id: Uuid,
    pub title: String,
    pub genre: String,
    pub style: Option<String>,
    pub description: Option<String>,
}

/// 更新小说命令（`None` 表示不修改）
#[derive(Debug, Clone, Default)]
pub struct UpdateNovel {
    pub owner_id: Uuid,
    pub novel_id: Uuid,
    pub title: Option<String>,
    pub genre: Option<String>,
    pub style: Option<String>,
    /// 内层 `None` 表示清空简介
    pub description: Option<Option<String>>,
    pub status: Option<String>,
}

/// 删除小说命令
#[derive(Debug, Clone)]
pub struct DeleteNovel {
    pub owner_id: Uuid,
    pub novel_id: Uuid,
}
