//! AI Novel - 小说章节内容生成服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Novel Context: 小说元数据与题材/文风标签
//! - Chapter Context: 章节状态与生成进度
//! - Generation Context: 生成任务记录
//! - 提示词组装（纯函数）
//!
//! 应用层 (application/):
//! - Ports: 端口定义（Repositories, ContentGenerator, IdentityProvider）
//! - Commands: CQRS 命令处理器（含章节生成编排）
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: JSON API + WebSocket
//! - Persistence: SQLite 存储
//! - Adapters: LLM Client, Identity Provider
//! - Events: WebSocket 事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
