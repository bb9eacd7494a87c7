//! Content Generator Port - 大模型内容生成抽象
//!
//! 定义内容生成的抽象接口，具体实现在 infrastructure/adapters 层
//! 实现方不得自行重试，重试策略属于调用方

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Prompt;

/// 内容生成错误
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Empty response")]
    EmptyResponse,
}

/// 生成用途，决定采样参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// 章节正文创作
    Draft,
    /// 正文润色
    Polish,
}

/// Content Generator Port
#[async_trait]
pub trait ContentGeneratorPort: Send + Sync {
    /// 单次阻塞调用，返回生成的正文
    async fn generate(&self, prompt: &Prompt, mode: GenerationMode)
        -> Result<String, GeneratorError>;

    /// 检查生成服务是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
