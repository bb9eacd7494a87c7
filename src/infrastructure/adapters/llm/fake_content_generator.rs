//! Fake Content Generator - 用于测试与离线运行的内容生成器
//!
//! 不调用任何外部服务，可按脚本依次返回结果并记录收到的提示词

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::application::ports::{ContentGeneratorPort, GenerationMode, GeneratorError};
use crate::domain::Prompt;

/// 单次调用的预设结果
#[derive(Debug, Clone)]
pub enum FakeReply {
    Text(String),
    Fail(String),
    Timeout,
}

/// Fake Content Generator 配置
#[derive(Debug, Clone)]
pub struct FakeContentGeneratorConfig {
    /// 脚本耗尽后使用的正文
    pub default_text: String,
    /// 模拟生成延迟
    pub latency: Duration,
}

impl Default for FakeContentGeneratorConfig {
    fn default() -> Self {
        Self {
            default_text: "夜色沉沉，山门外的石阶上积了一层薄雪。".to_string(),
            latency: Duration::from_millis(0),
        }
    }
}

/// Fake Content Generator
pub struct FakeContentGenerator {
    config: FakeContentGeneratorConfig,
    script: Mutex<VecDeque<FakeReply>>,
    prompts: Mutex<Vec<(Prompt, GenerationMode)>>,
}

impl FakeContentGenerator {
    pub fn new(config: FakeContentGeneratorConfig) -> Self {
        tracing::info!(
            latency_ms = config.latency.as_millis() as u64,
            "FakeContentGenerator initialized"
        );
        Self {
            config,
            script: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeContentGeneratorConfig::default())
    }

    /// 追加预设结果，按调用顺序消费
    pub fn push_reply(&self, reply: FakeReply) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(reply);
        }
    }

    /// 收到过的提示词
    pub fn prompts(&self) -> Vec<(Prompt, GenerationMode)> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }
}

#[async_trait]
impl ContentGeneratorPort for FakeContentGenerator {
    async fn generate(
        &self,
        prompt: &Prompt,
        mode: GenerationMode,
    ) -> Result<String, GeneratorError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push((prompt.clone(), mode));
        }
        let reply = self.script.lock().ok().and_then(|mut s| s.pop_front());

        tracing::debug!(mode = ?mode, scripted = reply.is_some(), "FakeContentGenerator: replying");

        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }

        let text = match reply {
            Some(FakeReply::Text(text)) => text,
            Some(FakeReply::Fail(message)) => return Err(GeneratorError::ServiceError(message)),
            Some(FakeReply::Timeout) => return Err(GeneratorError::Timeout),
            None => match mode {
                GenerationMode::Draft => self.config.default_text.clone(),
                GenerationMode::Polish => format!("{}（润色）", prompt.user),
            },
        };

        if text.trim().is_empty() {
            return Err(GeneratorError::EmptyResponse);
        }
        Ok(text)
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt() -> Prompt {
        Prompt {
            system: "s".to_string(),
            user: "u".to_string(),
        }
    }

    #[tokio::test]
    async fn test_script_is_consumed_in_order() {
        let generator = FakeContentGenerator::with_defaults();
        generator.push_reply(FakeReply::Text("一".to_string()));
        generator.push_reply(FakeReply::Fail("quota".to_string()));

        assert_eq!(generator.generate(&prompt(), GenerationMode::Draft).await.unwrap(), "一");
        assert!(matches!(
            generator.generate(&prompt(), GenerationMode::Draft).await,
            Err(GeneratorError::ServiceError(_))
        ));
        let fallback = generator.generate(&prompt(), GenerationMode::Draft).await.unwrap();
        assert_eq!(fallback, FakeContentGeneratorConfig::default().default_text);
        assert_eq!(generator.call_count(), 3);
    }

    #[tokio::test]
    async fn test_blank_text_is_empty_response() {
        let generator = FakeContentGenerator::with_defaults();
        generator.push_reply(FakeReply::Text("   ".to_string()));
        let err = generator.generate(&prompt(), GenerationMode::Draft).await.unwrap_err();
        assert!(matches!(err, GeneratorError::EmptyResponse));
    }
}
