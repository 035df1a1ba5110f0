//! Orchestration of topic generation, favorites and API settings.
//!
//! `GeneratorController` owns all mutable application state. Every user action
//! is a method on it; the presentation layer only reads state back and drains
//! the notices each action leaves behind.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Result, TopicError};
use crate::generator::TopicSource;
use crate::models::{ApiConfig, Notice, Template, Topic, View};
use crate::repository::{ConfigStore, FavoritesStore};

pub const MSG_EMPTY_SCENARIO: &str = "请输入场景关键词";
pub const MSG_MISSING_KEY: &str = "请先设置 API Key";
pub const MSG_BUSY: &str = "正在生成话题，请稍候";
pub const MSG_GENERATED: &str = "话题生成成功！";
pub const MSG_GENERATION_FAILED: &str = "生成话题失败，请检查 API 配置或网络连接";
pub const MSG_FAVORITE_ADDED: &str = "已添加到收藏夹";
pub const MSG_FAVORITE_REMOVED: &str = "已从收藏夹移除";
pub const MSG_SETTINGS_SAVED: &str = "API 设置已保存";
pub const MSG_SETTINGS_NOT_PERSISTED: &str = "API 设置已应用，但保存到本地失败";

/// Single-slot token for the one generation request allowed in flight
#[derive(Debug, Default)]
pub struct RequestSlot {
    busy: Arc<AtomicBool>,
}

impl RequestSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` while another holder exists
    pub fn try_acquire(&self) -> Option<SlotGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SlotGuard {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the slot on drop, whatever the request outcome
#[derive(Debug)]
pub struct SlotGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

pub struct GeneratorController {
    source: Arc<dyn TopicSource>,
    config_store: ConfigStore,
    favorites_store: FavoritesStore,
    api_config: ApiConfig,
    topics: Vec<Topic>,
    favorites: Vec<Topic>,
    view: View,
    slot: RequestSlot,
    notices: Vec<Notice>,
}

impl GeneratorController {
    /// Loads the API config and favorites once from their stores
    pub fn new(
        source: Arc<dyn TopicSource>,
        config_store: ConfigStore,
        favorites_store: FavoritesStore,
    ) -> Self {
        let api_config = config_store.load();
        let favorites = favorites_store.load();
        tracing::info!(
            "Controller ready: model={}, api key set={}, {} saved favorites",
            api_config.model,
            api_config.has_api_key(),
            favorites.len()
        );

        Self {
            source,
            config_store,
            favorites_store,
            api_config,
            topics: Vec::new(),
            favorites,
            view: View::default(),
            slot: RequestSlot::new(),
            notices: Vec::new(),
        }
    }

    // ===== Queries =====

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn favorites(&self) -> &[Topic] {
        &self.favorites
    }

    pub fn api_config(&self) -> &ApiConfig {
        &self.api_config
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn is_loading(&self) -> bool {
        self.slot.is_busy()
    }

    pub fn request_slot(&self) -> &RequestSlot {
        &self.slot
    }

    pub fn is_favorite(&self, topic_id: &str) -> bool {
        self.favorites.iter().any(|fav| fav.id == topic_id)
    }

    /// Scenario of the current batch, shown next to the topics heading
    pub fn current_category(&self) -> Option<&str> {
        self.topics.first().map(|t| t.category.as_str())
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // ===== Actions =====

    /// Free-text scenario submission. Blank input never reaches the network.
    pub async fn submit_scenario(&mut self, text: &str) -> Result<usize> {
        let scenario = text.trim();
        if scenario.is_empty() {
            self.notices.push(Notice::warning(MSG_EMPTY_SCENARIO));
            return Err(TopicError::Validation("scenario is empty".to_string()));
        }
        self.generate(scenario).await
    }

    pub async fn select_template(&mut self, template: &Template) -> Result<usize> {
        self.generate(template.name).await
    }

    /// Generate a fresh batch for `scenario`, replacing the current topics on
    /// success. Returns the number of topics generated.
    pub async fn generate(&mut self, scenario: &str) -> Result<usize> {
        if !self.api_config.has_api_key() {
            self.notices.push(Notice::warning(MSG_MISSING_KEY));
            self.view = View::Settings;
            return Err(TopicError::MissingApiKey);
        }

        let Some(_guard) = self.slot.try_acquire() else {
            tracing::warn!("Rejected generation for '{}': request already in flight", scenario);
            self.notices.push(Notice::warning(MSG_BUSY));
            return Err(TopicError::Busy);
        };

        match self.source.generate(scenario, &self.api_config).await {
            Ok(topics) => {
                let count = topics.len();
                self.topics = topics;
                self.notices.push(Notice::success(MSG_GENERATED));
                Ok(count)
            }
            Err(e) => {
                tracing::error!("Topic generation failed for '{}': {}", scenario, e);
                self.notices.push(Notice::error(MSG_GENERATION_FAILED));
                Err(e)
            }
        }
    }

    /// Add or remove `topic` from favorites by id. Returns whether it is now a favorite.
    pub fn toggle_favorite(&mut self, topic: &Topic) -> bool {
        let now_favorite = if self.is_favorite(&topic.id) {
            self.favorites.retain(|fav| fav.id != topic.id);
            self.notices
                .push(Notice::info(MSG_FAVORITE_REMOVED).with_description(topic.preview()));
            false
        } else {
            self.favorites.push(topic.clone());
            self.notices
                .push(Notice::info(MSG_FAVORITE_ADDED).with_description(topic.preview()));
            true
        };

        if let Err(e) = self.favorites_store.persist(&self.favorites) {
            tracing::error!("Failed to persist favorites: {}", e);
        }
        now_favorite
    }

    pub fn clear_topics(&mut self) {
        self.topics.clear();
    }

    pub fn open_settings(&mut self) {
        self.view = View::Settings;
    }

    pub fn cancel_settings(&mut self) {
        self.view = View::Generator;
    }

    /// Apply and persist new settings, then return to the generator view
    pub fn save_settings(&mut self, config: ApiConfig) {
        self.api_config = config;
        self.view = View::Generator;

        match self.config_store.save(&self.api_config) {
            Ok(()) => self.notices.push(Notice::success(MSG_SETTINGS_SAVED)),
            Err(e) => {
                tracing::error!("Failed to persist API config: {}", e);
                self.notices.push(Notice::error(MSG_SETTINGS_NOT_PERSISTED));
            }
        }
    }
}
