//! 提示词组装
//!
//! 纯函数，不做任何 I/O，输入相同则输出相同

use serde::Serialize;

use crate::domain::novel::{Genre, Style};

/// 前文衔接片段的最大字符数（按 Unicode 字符计）
pub const PRIOR_CONTEXT_CHARS: usize = 500;

/// 发送给内容生成器的两段式提示词
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// 章节生成的提示词上下文
#[derive(Debug, Clone)]
pub struct PromptContext<'a> {
    pub summary: &'a str,
    pub genre: Genre,
    pub style: Style,
    pub chapter_number: u32,
    pub novel_title: &'a str,
    /// 前一章正文（可选）
    pub prior_content: Option<&'a str>,
}

/// 取文本末尾最多 `max_chars` 个字符
///
/// 不做句子边界识别，只保证不会切断 UTF-8 字符
pub fn trailing_excerpt(text: &str, max_chars: usize) -> &str {
    let total = text.chars().count();
    if total <= max_chars {
        return text;
    }
    let skip = total - max_chars;
    match text.char_indices().nth(skip) {
        Some((offset, _)) => &text[offset..],
        None => "",
    }
}

/// 组装章节生成提示词
pub fn build_chapter_prompt(ctx: &PromptContext<'_>) -> Prompt {
    let system = format!(
        "你是一位专业的小说作家。请根据给定的章节概要创作高质量的小说正文。\n\
         \n\
         写作要求:\n\
         1. 写作风格: {style}\n\
         2. 小说类型: {genre}\n\
         3. 章节序号: 第{number}章\n\
         4. 小说标题: 《{title}》\n\
         5. 篇幅: 2000-3000字\n\
         6. 与前文情节保持连贯\n\
         7. 多用生动的细节描写与人物对话\n\
         8. 贴合{genre}类小说的题材特点\n\
         \n\
         只输出章节正文，不要附加任何说明、标题或格式标记。",
        style = ctx.style.label(),
        genre = ctx.genre.label(),
        number = ctx.chapter_number,
        title = ctx.novel_title,
    );

    let mut user = format!("章节概要: {}\n\n", ctx.summary.trim());

    if let Some(prior) = ctx.prior_content.filter(|p| !p.trim().is_empty()) {
        user.push_str("前文结尾: ");
        user.push_str(trailing_excerpt(prior, PRIOR_CONTEXT_CHARS));
        user.push_str("\n\n");
    }

    user.push_str(&format!(
        "请根据以上信息创作第{}章的正文。",
        ctx.chapter_number
    ));

    Prompt { system, user }
}

/// 组装内容润色提示词
pub fn build_polish_prompt(content: &str, genre: Genre) -> Prompt {
    let system = format!(
        "你是一位资深的文学编辑。请润色下面这段{genre}类小说正文，提升文字质量、情节连贯性与可读性。\n\
         \n\
         润色要求:\n\
         1. 保留原有情节与人物设定\n\
         2. 改进措辞与描写\n\
         3. 让对话更自然\n\
         4. 优化段落结构\n\
         5. 保证情节逻辑通顺\n\
         \n\
         只输出润色后的正文。",
        genre = genre.label(),
    );

    Prompt {
        system,
        user: content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context<'a>(prior: Option<&'a str>) -> PromptContext<'a> {
        PromptContext {
            summary: "主角与宿敌在雪夜对峙",
            genre: Genre::MartialArts,
            style: Style::Dramatic,
            chapter_number: 2,
            novel_title: "剑影",
            prior_content: prior,
        }
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let a = build_chapter_prompt(&context(Some("上一章的结尾。")));
        let b = build_chapter_prompt(&context(Some("上一章的结尾。")));
        assert_eq!(a, b);
    }

    #[test]
    fn test_system_prompt_carries_parameters() {
        let prompt = build_chapter_prompt(&context(None));
        assert!(prompt.system.contains("戏剧化"));
        assert!(prompt.system.contains("武侠"));
        assert!(prompt.system.contains("第2章"));
        assert!(prompt.system.contains("《剑影》"));
        assert!(prompt.system.contains("2000-3000字"));
        assert!(prompt.user.contains("主角与宿敌在雪夜对峙"));
        assert!(prompt.user.ends_with("请根据以上信息创作第2章的正文。"));
    }

    #[test]
    fn test_no_prior_content_omits_continuity_section() {
        let prompt = build_chapter_prompt(&context(None));
        assert!(!prompt.user.contains("前文结尾"));

        // 空白前文等同于没有前文
        let blank = build_chapter_prompt(&context(Some("   ")));
        assert_eq!(blank, prompt);
    }

    #[test]
    fn test_prior_content_only_changes_continuity_section() {
        let without = build_chapter_prompt(&context(None));
        let with = build_chapter_prompt(&context(Some("雪落无声。")));

        assert_eq!(with.system, without.system);
        let removed = with.user.replace("前文结尾: 雪落无声。\n\n", "");
        assert_eq!(removed, without.user);
    }

    #[test]
    fn test_prior_content_truncated_to_trailing_window() {
        let prior = format!("{}{}", "甲".repeat(300), "乙".repeat(500));
        let prompt = build_chapter_prompt(&context(Some(&prior)));

        let excerpt = prompt
            .user
            .split("前文结尾: ")
            .nth(1)
            .and_then(|rest| rest.split("\n\n").next())
            .unwrap();
        assert_eq!(excerpt.chars().count(), PRIOR_CONTEXT_CHARS);
        assert!(excerpt.chars().all(|c| c == '乙'));
    }

    #[test]
    fn test_trailing_excerpt_is_char_safe() {
        assert_eq!(trailing_excerpt("abc", 5), "abc");
        assert_eq!(trailing_excerpt("abcdef", 3), "def");
        assert_eq!(trailing_excerpt("一二三四", 2), "三四");
        assert_eq!(trailing_excerpt("一二三四", 0), "");
    }

    #[test]
    fn test_polish_prompt() {
        let prompt = build_polish_prompt("原文内容", Genre::Mystery);
        assert!(prompt.system.contains("悬疑"));
        assert_eq!(prompt.user, "原文内容");
    }
}
