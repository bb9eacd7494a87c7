//! HTTP Server
//!
//! Axum HTTP 服务器启动和配置

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::Router;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::middleware::error_logging_middleware;
use super::routes::create_routes;
use super::state::AppState;
use crate::config::ServerConfig;

/// 章节正文整段提交，请求体上限 8MB
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// HTTP 服务器
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    /// 创建新的 HTTP 服务器
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// 构建 Router
    pub fn build_router(&self) -> Router {
        // CORS 配置 - 允许所有来源的跨域请求
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
            .expose_headers(Any)
            .max_age(std::time::Duration::from_secs(3600));

        create_routes()
            .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
            .layer(middleware::from_fn(error_logging_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// 启动服务器（带优雅关闭）
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router();
        let addr = self.config.addr();

        info!("Starting HTTP server on {} (with graceful shutdown)", addr);

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use std::collections::HashMap;
    use std::time::Duration;
    use tower::util::ServiceExt;

    use crate::infrastructure::adapters::{FakeContentGenerator, StaticTokenIdentityProvider};
    use crate::infrastructure::events::EventPublisher;
    use crate::infrastructure::persistence::sqlite::test_support::setup_pool;
    use crate::infrastructure::persistence::sqlite::{
        SqliteChapterRepository, SqliteGenerationTaskRepository, SqliteNovelRepository,
        SqliteUserRepository,
    };

    async fn server() -> HttpServer {
        let pool = setup_pool().await;
        let state = AppState::new(
            Arc::new(SqliteUserRepository::new(pool.clone())),
            Arc::new(SqliteNovelRepository::new(pool.clone())),
            Arc::new(SqliteChapterRepository::new(pool.clone())),
            Arc::new(SqliteGenerationTaskRepository::new(pool)),
            Arc::new(FakeContentGenerator::with_defaults()),
            Arc::new(StaticTokenIdentityProvider::new(HashMap::new())),
            Arc::new(EventPublisher::new()),
            Duration::from_secs(1),
        );
        HttpServer::new(ServerConfig::default(), state)
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_authorization_header() {
        let router = server().await.build_router();
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/novel/create")
            .header("origin", "http://localhost:3000")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "authorization")
            .body(Body::empty())
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let router = server().await.build_router();
        let request = Request::builder()
            .uri("/api/chapter/unknown")
            .body(Body::empty())
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
