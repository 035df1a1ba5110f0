use serde::{Deserialize, Serialize};
use std::fmt;

/// A single generated conversation starter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub content: String,
    /// Scenario that produced this topic
    pub category: String,
}

impl Topic {
    pub fn new(id: impl Into<String>, content: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            category: category.into(),
        }
    }

    /// First 20 characters of the content, with `...` appended when truncated
    pub fn preview(&self) -> String {
        const PREVIEW_CHARS: usize = 20;
        let mut chars = self.content.chars();
        let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

/// Outbound chat-completion settings, persisted as the sole durable config record.
///
/// Field names are camelCase on disk so records written by earlier builds stay readable.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
}

impl ApiConfig {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Key rendered for display; never the full secret
    pub fn masked_key(&self) -> String {
        if self.api_key.is_empty() {
            return "(未设置)".to_string();
        }
        let visible: String = self.api_key.chars().take(4).collect();
        format!("{visible}****")
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.masked_key())
            .field("model", &self.model)
            .finish()
    }
}

/// Entry in the fixed scenario gallery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Transient user-facing message emitted by controller actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: Option<String>,
}

impl Notice {
    pub fn success(title: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, title)
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, title)
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, title)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn new(level: NoticeLevel, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Generator,
    Settings,
}

// Chat message format shared by OpenAI-compatible providers
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

// Chat-completion request format
#[derive(Debug, Serialize, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    pub max_tokens: u32,
    /// Provider switch for extended reasoning (Qwen3 on SiliconFlow and similar)
    pub enable_thinking: bool,
}

// Chat-completion response format; anything beyond choices is ignored
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: String,
}
