//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "AINOVEL";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `AINOVEL_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `AINOVEL_SERVER__PORT=8080`
/// - `AINOVEL_LLM__BASE_URL=https://api.deepseek.com/v1`
/// - `AINOVEL_LLM__API_KEY=sk-...`
/// - `AINOVEL_DATABASE__PATH=/data/ainovel.db`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5060)?
        .set_default("llm.base_url", "https://api.openai.com/v1")?
        .set_default("llm.api_key", "")?
        .set_default("llm.model", "gpt-4")?
        .set_default("llm.max_tokens", 4000)?
        .set_default("llm.temperature", 0.8)?
        .set_default("llm.polish_temperature", 0.3)?
        .set_default("llm.timeout_secs", 120)?
        .set_default("llm.fake", false)?
        .set_default("database.path", "data/ainovel.db")?
        .set_default("database.max_connections", 5)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 注意: 环境变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.database.path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    if config.llm.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "LLM base URL cannot be empty".to_string(),
        ));
    }

    if config.llm.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "LLM timeout cannot be 0".to_string(),
        ));
    }

    for (name, value) in [
        ("temperature", config.llm.temperature),
        ("polish_temperature", config.llm.polish_temperature),
    ] {
        if !(0.0..=2.0).contains(&value) {
            return Err(ConfigError::ValidationError(format!(
                "LLM {} must be within [0, 2], got {}",
                name, value
            )));
        }
    }

    if !config.llm.fake && config.llm.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "LLM API key is required unless llm.fake is enabled".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    if config.llm.fake {
        tracing::info!("LLM: fake generator");
    } else {
        tracing::info!("LLM Base URL: {}", config.llm.base_url);
        tracing::info!("LLM Model: {}", config.llm.model);
        tracing::info!("LLM API Key: {}", config.llm.masked_api_key());
    }
    tracing::info!("LLM Timeout: {}s", config.llm.timeout_secs);
    tracing::info!(
        "LLM Temperature: {} (polish {})",
        config.llm.temperature,
        config.llm.polish_temperature
    );
    tracing::info!("Database: {}", config.database.path);
    tracing::info!("Database Max Connections: {}", config.database.max_connections);
    tracing::info!("Auth Tokens: {}", config.auth.tokens.len());
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
