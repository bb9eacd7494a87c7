//! LLM Adapter - 内容生成客户端实现

mod fake_content_generator;
mod http_chat_client;

pub use fake_content_generator::{FakeContentGenerator, FakeContentGeneratorConfig, FakeReply};
pub use http_chat_client::*;
