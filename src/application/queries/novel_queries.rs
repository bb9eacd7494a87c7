//! Novel Queries

use uuid::Uuid;

/// 获取小说详情查询（含章节）
#[derive(Debug, Clone)]
pub struct GetNovel {
    pub owner_id: Uuid,
    pub novel_id: Uuid,
}

/// 列出调用方的所有小说查询
#[derive(Debug, Clone)]
pub struct ListNovels {
    pub owner_id: Uuid,
}
