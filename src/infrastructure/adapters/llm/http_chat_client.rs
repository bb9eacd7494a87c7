//! HTTP Chat Client - 调用 OpenAI 兼容的对话补全服务
//!
//! 实现 ContentGeneratorPort trait
//!
//! 外部 API:
//! POST {base_url}/chat/completions
//! Request: {"model": "...", "messages": [...], "max_tokens": 4000, "temperature": 0.8}
//! Response: {"choices": [{"message": {"role": "assistant", "content": "..."}}]}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{ContentGeneratorPort, GenerationMode, GeneratorError};
use crate::domain::Prompt;

/// HTTP 对话客户端配置
#[derive(Debug, Clone)]
pub struct HttpChatClientConfig {
    /// 服务基础 URL（不含 /chat/completions）
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    /// 章节创作采样温度
    pub temperature: f32,
    /// 润色采样温度
    pub polish_temperature: f32,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpChatClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4".to_string(),
            max_tokens: 4000,
            temperature: 0.8,
            polish_temperature: 0.3,
            timeout_secs: 120,
        }
    }
}

impl HttpChatClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    fn temperature_for(&self, mode: GenerationMode) -> f32 {
        match mode {
            GenerationMode::Draft => self.temperature,
            GenerationMode::Polish => self.polish_temperature,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// HTTP 对话客户端
///
/// 单次请求，不做重试
pub struct HttpChatClient {
    client: Client,
    config: HttpChatClientConfig,
}

impl HttpChatClient {
    pub fn new(config: HttpChatClientConfig) -> Result<Self, GeneratorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GeneratorError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ContentGeneratorPort for HttpChatClient {
    async fn generate(
        &self,
        prompt: &Prompt,
        mode: GenerationMode,
    ) -> Result<String, GeneratorError> {
        let temperature = self.config.temperature_for(mode);
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature,
            stream: false,
        };

        tracing::debug!(
            url = %self.completions_url(),
            model = %self.config.model,
            mode = ?mode,
            temperature = temperature,
            prompt_chars = prompt.user.chars().count(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeneratorError::Timeout
                } else if e.is_connect() {
                    GeneratorError::NetworkError(format!("Cannot connect to LLM service: {}", e))
                } else {
                    GeneratorError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeneratorError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                GeneratorError::Timeout
            } else {
                GeneratorError::InvalidResponse(e.to_string())
            }
        })?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GeneratorError::InvalidResponse("missing choices[0].message.content".to_string()))?;

        if content.trim().is_empty() {
            return Err(GeneratorError::EmptyResponse);
        }

        tracing::info!(
            model = %self.config.model,
            mode = ?mode,
            content_chars = content.chars().count(),
            "Chat completion received"
        );

        Ok(content)
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.models_url())
            .bearer_auth(&self.config.api_key)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
