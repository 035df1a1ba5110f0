use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::config::GenerationConfig;
use crate::error::{Result, TopicError};
use crate::models::{ApiConfig, ChatMessage, ChatRequest, Topic};
use crate::prompt;
use crate::transport::{Endpoint, Transport};

#[async_trait]
pub trait TopicSource: Send + Sync {
    async fn generate(&self, scenario: &str, config: &ApiConfig) -> Result<Vec<Topic>>;
}

/// Millisecond stamps for topic ids. Strictly increasing within a process, so two
/// batches issued in the same millisecond still get distinct ids.
#[derive(Debug, Default)]
pub struct TopicIds {
    last: AtomicI64,
}

impl TopicIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_stamp(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let next = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }
}

/// Whitespace or a stray byte-order mark only
fn is_blank(line: &str) -> bool {
    line.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .is_empty()
}

/// Split model output into topics: one per non-blank line, raw text kept.
pub fn parse_topics(content: &str, scenario: &str, stamp: i64) -> Vec<Topic> {
    content
        .split('\n')
        .filter(|line| !is_blank(line))
        .enumerate()
        .map(|(index, line)| Topic::new(format!("{stamp}-{index}"), line, scenario))
        .collect()
}

/// Chat-completion backed topic generator
pub struct TopicClient {
    tx: Arc<dyn Transport>,
    generation: GenerationConfig,
    ids: TopicIds,
}

impl TopicClient {
    pub fn new(tx: Arc<dyn Transport>, generation: GenerationConfig) -> Self {
        Self {
            tx,
            generation,
            ids: TopicIds::new(),
        }
    }

    pub fn build_request(&self, scenario: &str, model: &str) -> ChatRequest {
        ChatRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage::system(prompt::system_prompt(scenario)),
                ChatMessage::user(prompt::user_prompt(scenario)),
            ],
            stream: false,
            max_tokens: self.generation.max_tokens,
            enable_thinking: self.generation.enable_thinking,
        }
    }
}

#[async_trait]
impl TopicSource for TopicClient {
    async fn generate(&self, scenario: &str, config: &ApiConfig) -> Result<Vec<Topic>> {
        tracing::info!("Generating topics for scenario: {}", scenario);

        let request = self.build_request(scenario, &config.model);
        let endpoint = Endpoint {
            url: &config.api_url,
            api_key: &config.api_key,
        };
        let response = self.tx.chat(endpoint, &request).await?;

        let choice = response.choices.into_iter().next().ok_or_else(|| {
            TopicError::MalformedResponse("chat-completion returned empty choices".to_string())
        })?;

        let topics = parse_topics(&choice.message.content, scenario, self.ids.next_stamp());
        tracing::info!("Parsed {} topics for scenario: {}", topics.len(), scenario);
        Ok(topics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChatResponse, Choice, ResponseMessage};
    use std::sync::Mutex;

    // Mock Transport for testing
    struct MockTransport {
        responses: Mutex<Vec<Result<ChatResponse>>>,
        requests: Mutex<Vec<(String, String, ChatRequest)>>,
    }

    impl MockTransport {
        fn new(responses: Vec<Result<ChatResponse>>) -> Self {
            MockTransport {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn chat(&self, endpoint: Endpoint<'_>, req: &ChatRequest) -> Result<ChatResponse> {
            self.requests
                .lock()
                .expect("Mock transport mutex should not be poisoned")
                .push((endpoint.url.to_string(), endpoint.api_key.to_string(), req.clone()));
            self.responses
                .lock()
                .expect("Mock transport mutex should not be poisoned")
                .pop()
                .unwrap_or_else(|| Err(TopicError::Internal("No more mock responses".to_string())))
        }
    }

    fn content_response(content: &str) -> ChatResponse {
        ChatResponse {
            choices: vec![Choice {
                message: ResponseMessage {
                    content: content.to_string(),
                },
            }],
        }
    }

    fn api_config() -> ApiConfig {
        ApiConfig {
            api_url: "https://llm.test/v1/chat/completions".to_string(),
            api_key: "sk-test".to_string(),
            model: "Qwen/Qwen3-8B".to_string(),
        }
    }

    fn generation() -> GenerationConfig {
        GenerationConfig {
            max_tokens: 512,
            enable_thinking: false,
        }
    }

    #[test]
    fn test_parse_topics_skips_blank_lines() {
        let content = "第一个话题\n\n   \n第二个话题\n\t\n第三个话题\n";
        let topics = parse_topics(content, "朋友聚会", 1700000000000);
        assert_eq!(topics.len(), 3);
        assert_eq!(topics[0].content, "第一个话题");
        assert_eq!(topics[1].content, "第二个话题");
        assert_eq!(topics[2].content, "第三个话题");
        assert_eq!(topics[0].id, "1700000000000-0");
        assert_eq!(topics[2].id, "1700000000000-2");
        assert!(topics.iter().all(|t| t.category == "朋友聚会"));
    }

    #[test]
    fn test_parse_topics_drops_bom_only_lines() {
        let topics = parse_topics("a\n\u{feff}\n \u{feff}\t\nb", "x", 1);
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].content, "a");
        assert_eq!(topics[1].content, "b");
        assert_eq!(topics[1].id, "1-1");
    }

    #[test]
    fn test_parse_topics_keeps_raw_line_text() {
        let topics = parse_topics("  leading space  \nnext", "x", 1);
        assert_eq!(topics[0].content, "  leading space  ");
    }

    #[test]
    fn test_topic_ids_strictly_increase() {
        let ids = TopicIds::new();
        let first = ids.next_stamp();
        let second = ids.next_stamp();
        let third = ids.next_stamp();
        assert!(second > first);
        assert!(third > second);
    }

    #[tokio::test]
    async fn test_generate_dating_example() {
        let mock = Arc::new(MockTransport::new(vec![Ok(content_response(
            "你最近读的一本书是什么？\n\n如果能立刻掌握一项技能，你会选什么？",
        ))]));
        let client = TopicClient::new(mock.clone(), generation());

        let topics = client
            .generate("约会", &api_config())
            .await
            .expect("generation should succeed");

        assert_eq!(topics.len(), 2);
        assert!(topics.iter().all(|t| t.category == "约会"));
        assert_eq!(topics[1].content, "如果能立刻掌握一项技能，你会选什么？");

        let requests = mock.requests.lock().expect("lock");
        let (url, key, req) = &requests[0];
        assert_eq!(url, "https://llm.test/v1/chat/completions");
        assert_eq!(key, "sk-test");
        assert_eq!(req.model, "Qwen/Qwen3-8B");
        assert_eq!(req.messages[0].role, "system");
        assert_eq!(req.messages[1].role, "user");
        assert_eq!(req.messages[1].content, "请为\"约会\"场景生成适合的社交话题。");
        assert!(!req.stream);
        assert_eq!(req.max_tokens, 512);
        assert!(!req.enable_thinking);
    }

    #[tokio::test]
    async fn test_generate_empty_choices_fails() {
        let mock = Arc::new(MockTransport::new(vec![Ok(ChatResponse { choices: vec![] })]));
        let client = TopicClient::new(mock, generation());

        let err = client
            .generate("约会", &api_config())
            .await
            .expect_err("empty choices must fail");
        assert!(matches!(err, TopicError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_generate_propagates_transport_error() {
        let mock = Arc::new(MockTransport::new(vec![Err(TopicError::RequestFailed {
            status: 500,
        })]));
        let client = TopicClient::new(mock, generation());

        let err = client
            .generate("约会", &api_config())
            .await
            .expect_err("transport failure must surface");
        assert!(matches!(err, TopicError::RequestFailed { status: 500 }));
    }

    #[tokio::test]
    async fn test_back_to_back_batches_have_distinct_ids() {
        let mock = Arc::new(MockTransport::new(vec![
            Ok(content_response("a\nb")),
            Ok(content_response("c\nd")),
        ]));
        let client = TopicClient::new(mock, generation());

        let first = client.generate("x", &api_config()).await.expect("first batch");
        let second = client.generate("x", &api_config()).await.expect("second batch");
        for topic in &second {
            assert!(first.iter().all(|t| t.id != topic.id));
        }
    }
}
