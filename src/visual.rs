use colored::*;

use crate::models::{ApiConfig, Notice, NoticeLevel, Template, Topic};

/// Terminal rendering. `render_*` build text, the rest print it to stdout.
pub struct Visual;

impl Visual {
    pub fn display_banner() {
        println!("{}", "社交话题生成器".bright_magenta().bold());
        println!("{}", "快速生成有趣的社交话题，让对话更加流畅".dimmed());
        println!("{}", "输入场景关键词直接生成，输入 help 查看全部命令".dimmed());
    }

    pub fn display_notice(notice: &Notice) {
        println!("{}", Self::render_notice(notice));
    }

    pub fn render_notice(notice: &Notice) -> String {
        let (icon, title) = match notice.level {
            NoticeLevel::Success => ("✔", notice.title.green()),
            NoticeLevel::Info => ("★", notice.title.cyan()),
            NoticeLevel::Warning => ("!", notice.title.yellow()),
            NoticeLevel::Error => ("✘", notice.title.red()),
        };
        match &notice.description {
            Some(description) => format!("{icon} {title} {}", description.dimmed()),
            None => format!("{icon} {title}"),
        }
    }

    pub fn display_loading() {
        println!("{}", "生成中...".bright_cyan());
    }

    pub fn display_topics(topics: &[Topic], category: Option<&str>, is_favorite: impl Fn(&str) -> bool) {
        print!("{}", Self::render_topics(topics, category, is_favorite));
    }

    pub fn render_topics(
        topics: &[Topic],
        category: Option<&str>,
        is_favorite: impl Fn(&str) -> bool,
    ) -> String {
        if topics.is_empty() {
            return format!("{}\n", "还没有生成的话题".dimmed());
        }

        let mut out = format!(
            "{} [{}]\n",
            "生成的话题".bold(),
            category.unwrap_or_default().bright_yellow()
        );
        for (i, topic) in topics.iter().enumerate() {
            out.push_str(&Self::render_topic_line(i + 1, topic, is_favorite(&topic.id)));
        }
        out
    }

    pub fn display_favorites(favorites: &[Topic]) {
        print!("{}", Self::render_favorites(favorites));
    }

    pub fn render_favorites(favorites: &[Topic]) -> String {
        if favorites.is_empty() {
            return format!(
                "{}\n{}\n",
                "您还没有收藏任何话题".dimmed(),
                "生成话题后，输入 star <编号> 即可添加收藏".dimmed()
            );
        }

        let mut out = format!("{} ({})\n", "我的收藏".bold(), favorites.len());
        for (i, topic) in favorites.iter().enumerate() {
            out.push_str(&Self::render_topic_line(i + 1, topic, true));
        }
        out
    }

    fn render_topic_line(position: usize, topic: &Topic, favorite: bool) -> String {
        let star = if favorite {
            "★".bright_yellow()
        } else {
            "☆".dimmed()
        };
        format!(
            "  {}. {} {}  {}\n",
            position.to_string().cyan(),
            star,
            topic.content,
            format!("#{}", topic.category).dimmed()
        )
    }

    pub fn display_templates(templates: &[Template]) {
        print!("{}", Self::render_templates(templates));
    }

    pub fn render_templates(templates: &[Template]) -> String {
        let mut out = format!("{}\n", "模板选择".bold());
        for (i, template) in templates.iter().enumerate() {
            out.push_str(&format!(
                "  {}. {} {}  {}\n",
                (i + 1).to_string().cyan(),
                template.icon,
                template.name.bright_white(),
                template.description.dimmed()
            ));
        }
        out.push_str(&format!("{}\n", "输入 t <编号> 使用模板生成话题".dimmed()));
        out
    }

    pub fn display_settings(config: &ApiConfig) {
        print!("{}", Self::render_settings(config));
    }

    pub fn render_settings(config: &ApiConfig) -> String {
        format!(
            "{}\n{}\n  API 地址: {}\n  API Key: {}\n  模型: {}\n",
            "API 设置".bold(),
            "配置 LLM API 用于生成社交话题 (直接回车保留当前值)".dimmed(),
            config.api_url,
            config.masked_key(),
            config.model
        )
    }

    pub fn display_help() {
        let rows = [
            ("<关键词>", "按场景关键词生成话题"),
            ("go <关键词>", "同上"),
            ("templates | t", "查看模板"),
            ("t <编号>", "使用模板生成话题"),
            ("list | l", "查看生成的话题"),
            ("star <编号> | s <编号>", "收藏/取消收藏话题"),
            ("favs | f", "查看我的收藏"),
            ("unfav <编号>", "从收藏夹移除"),
            ("clear", "清空生成的话题"),
            ("settings", "API 设置"),
            ("quit | exit", "退出"),
        ];
        for (cmd, desc) in rows {
            println!("  {:<24} {}", cmd.cyan(), desc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::TEMPLATES;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_render_topics_marks_favorites() {
        plain();
        let topics = vec![
            Topic::new("1-0", "你最近读的一本书是什么？", "约会"),
            Topic::new("1-1", "如果能立刻掌握一项技能，你会选什么？", "约会"),
        ];
        let out = Visual::render_topics(&topics, Some("约会"), |id| id == "1-1");
        assert!(out.starts_with("生成的话题 [约会]"));
        assert!(out.contains("1. ☆ 你最近读的一本书是什么？"));
        assert!(out.contains("2. ★ 如果能立刻掌握一项技能，你会选什么？"));
    }

    #[test]
    fn test_render_empty_favorites() {
        plain();
        assert!(Visual::render_favorites(&[]).contains("您还没有收藏任何话题"));
    }

    #[test]
    fn test_render_settings_masks_key() {
        plain();
        let config = ApiConfig {
            api_url: "https://api.siliconflow.cn/v1/chat/completions".into(),
            api_key: "sk-abcdefgh".into(),
            model: "Qwen/Qwen3-8B".into(),
        };
        let out = Visual::render_settings(&config);
        assert!(out.contains("sk-a****"));
        assert!(!out.contains("sk-abcdefgh"));
    }

    #[test]
    fn test_render_templates_numbered() {
        plain();
        let out = Visual::render_templates(&TEMPLATES);
        assert!(out.contains("1. 🏢 职场破冰"));
        assert!(out.contains("6. 🧠 深度交流"));
    }

    #[test]
    fn test_render_notice_with_description() {
        plain();
        let notice = Notice::info("已添加到收藏夹").with_description("你好");
        assert_eq!(Visual::render_notice(&notice), "★ 已添加到收藏夹 你好");
    }
}
