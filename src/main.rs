//! AI Novel - 章节内容生成服务
//!
//! - Domain: novel/, chapter/, generation/ 与提示词组装
//! - Application: commands, queries, ports
//! - Infrastructure: http, persistence, adapters, events

use std::sync::Arc;

use ainovel::application::{ChapterRepositoryPort, ContentGeneratorPort};
use ainovel::config::{load_config, print_config, AppConfig};
use ainovel::infrastructure::adapters::{
    FakeContentGenerator, HttpChatClient, HttpChatClientConfig, StaticTokenIdentityProvider,
};
use ainovel::infrastructure::events::EventPublisher;
use ainovel::infrastructure::http::{AppState, HttpServer};
use ainovel::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteChapterRepository,
    SqliteGenerationTaskRepository, SqliteNovelRepository, SqliteUserRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("AI Novel - 章节内容生成服务");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db_config = DatabaseConfig::new(&config.database.path, config.database.max_connections);
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // 创建 Repositories
    let user_repo = Arc::new(SqliteUserRepository::new(pool.clone()));
    let novel_repo = Arc::new(SqliteNovelRepository::new(pool.clone()));
    let chapter_repo = Arc::new(SqliteChapterRepository::new(pool.clone()));
    let task_repo = Arc::new(SqliteGenerationTaskRepository::new(pool.clone()));

    // 上次进程退出时仍在生成的章节回退到 error
    let recovered = chapter_repo.reset_interrupted().await?;
    if recovered > 0 {
        tracing::warn!(chapters = recovered, "Reset chapters interrupted by previous shutdown");
    }

    let generator = build_generator(&config)?;
    if !generator.health_check().await {
        tracing::warn!(base_url = %config.llm.base_url, "Content generator is not reachable yet");
    }
    let identity_provider = Arc::new(StaticTokenIdentityProvider::new(config.auth.tokens.clone()));
    let event_publisher = Arc::new(EventPublisher::new());

    let state = AppState::new(
        user_repo,
        novel_repo,
        chapter_repo,
        task_repo,
        generator,
        identity_provider,
        event_publisher,
        config.llm.timeout(),
    );

    let server = HttpServer::new(config.server.clone(), state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                return;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    pool.close().await;
    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 初始化日志，`RUST_LOG` 优先
fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},ainovel={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// 根据配置选择内容生成器
fn build_generator(config: &AppConfig) -> anyhow::Result<Arc<dyn ContentGeneratorPort>> {
    if config.llm.fake {
        tracing::warn!("Using fake content generator, output is canned text");
        return Ok(Arc::new(FakeContentGenerator::with_defaults()));
    }

    let llm = &config.llm;
    let client = HttpChatClient::new(HttpChatClientConfig {
        base_url: llm.base_url.clone(),
        api_key: llm.api_key.clone(),
        model: llm.model.clone(),
        max_tokens: llm.max_tokens,
        temperature: llm.temperature,
        polish_temperature: llm.polish_temperature,
        timeout_secs: llm.timeout_secs,
    })
    .map_err(|e| anyhow::anyhow!("Failed to create LLM client: {}", e))?;

    Ok(Arc::new(client))
}
