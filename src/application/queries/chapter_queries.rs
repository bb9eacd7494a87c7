//! Chapter Queries

use uuid::Uuid;

/// 获取章节详情查询（含所属小说与生成任务）
#[derive(Debug, Clone)]
pub struct GetChapter {
    pub owner_id: Uuid,
    pub chapter_id: Uuid,
}
