//! Novel Context - Value Objects

use serde::{Deserialize, Serialize};

/// 标题（小说与章节共用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title(String);

impl Title {
    pub fn new(title: impl Into<String>) -> Result<Self, &'static str> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err("标题不能为空");
        }
        if title.chars().count() > 200 {
            return Err("标题长度不能超过200字符");
        }
        Ok(Self(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 小说类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Genre {
    Fantasy,
    Romance,
    Urban,
    History,
    Scifi,
    MartialArts,
    Mystery,
    Youth,
}

impl Genre {
    pub const ALL: [Genre; 8] = [
        Genre::Fantasy,
        Genre::Romance,
        Genre::Urban,
        Genre::History,
        Genre::Scifi,
        Genre::MartialArts,
        Genre::Mystery,
        Genre::Youth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Fantasy => "fantasy",
            Genre::Romance => "romance",
            Genre::Urban => "urban",
            Genre::History => "history",
            Genre::Scifi => "scifi",
            Genre::MartialArts => "martial-arts",
            Genre::Mystery => "mystery",
            Genre::Youth => "youth",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.as_str() == s)
    }

    /// 展示名称（用于提示词）
    pub fn label(&self) -> &'static str {
        match self {
            Genre::Fantasy => "玄幻",
            Genre::Romance => "言情",
            Genre::Urban => "都市",
            Genre::History => "历史",
            Genre::Scifi => "科幻",
            Genre::MartialArts => "武侠",
            Genre::Mystery => "悬疑",
            Genre::Youth => "青春",
        }
    }
}

/// 写作风格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Modern,
    Classical,
    Humorous,
    Dramatic,
    Poetic,
}

impl Style {
    pub const ALL: [Style; 5] = [
        Style::Modern,
        Style::Classical,
        Style::Humorous,
        Style::Dramatic,
        Style::Poetic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Modern => "modern",
            Style::Classical => "classical",
            Style::Humorous => "humorous",
            Style::Dramatic => "dramatic",
            Style::Poetic => "poetic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|st| st.as_str() == s)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Style::Modern => "现代简约",
            Style::Classical => "古典优雅",
            Style::Humorous => "幽默轻松",
            Style::Dramatic => "戏剧化",
            Style::Poetic => "诗意抒情",
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Style::Modern
    }
}

/// 小说生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NovelStatus {
    /// 创作中
    Draft,
    /// 已完结
    Completed,
}

impl NovelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NovelStatus::Draft => "draft",
            NovelStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(NovelStatus::Draft),
            "completed" => Some(NovelStatus::Completed),
            _ => None,
        }
    }
}

impl Default for NovelStatus {
    fn default() -> Self {
        NovelStatus::Draft
    }
}
