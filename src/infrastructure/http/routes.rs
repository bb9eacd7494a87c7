//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping              GET   健康检查（无需认证）
//! - /api/novel/create      POST  创建小说
//! - /api/novel/list        GET   列出调用方的小说（含章节）
//! - /api/novel/get         POST  获取小说详情（含章节）
//! - /api/novel/update      POST  更新小说
//! - /api/novel/delete      POST  删除小说
//! - /api/chapter/create    POST  创建章节
//! - /api/chapter/get       POST  获取章节详情（含小说与生成任务）
//! - /api/chapter/update    POST  更新章节
//! - /api/chapter/delete    POST  删除章节
//! - /api/chapter/generate  POST  生成章节正文
//! - /api/chapter/polish    POST  润色预览
//! - /ws/events             WS    调用方的生成事件

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws/events", get(handlers::events_websocket_handler))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/novel", novel_routes())
        .nest("/chapter", chapter_routes())
}

/// Novel 路由
fn novel_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(handlers::create_novel))
        .route("/list", get(handlers::list_novels))
        .route("/get", post(handlers::get_novel))
        .route("/update", post(handlers::update_novel))
        .route("/delete", post(handlers::delete_novel))
}

/// Chapter 路由
fn chapter_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(handlers::create_chapter))
        .route("/get", post(handlers::get_chapter))
        .route("/update", post(handlers::update_chapter))
        .route("/delete", post(handlers::delete_chapter))
        .route("/generate", post(handlers::generate_chapter))
        .route("/polish", post(handlers::polish_chapter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::time::Duration;
    use tower::util::ServiceExt;

    use crate::infrastructure::adapters::{
        FakeContentGenerator, FakeContentGeneratorConfig, FakeReply, StaticTokenIdentityProvider,
    };
    use crate::infrastructure::events::EventPublisher;
    use crate::infrastructure::persistence::sqlite::test_support::setup_pool;
    use crate::infrastructure::persistence::sqlite::{
        SqliteChapterRepository, SqliteGenerationTaskRepository, SqliteNovelRepository,
        SqliteUserRepository,
    };

    const ALICE: &str = "alice-token";
    const BOB: &str = "bob-token";

    async fn test_app(generator: Arc<FakeContentGenerator>) -> Router {
        let pool = setup_pool().await;
        let tokens = HashMap::from([
            (ALICE.to_string(), "alice".to_string()),
            (BOB.to_string(), "bob".to_string()),
        ]);

        let state = AppState::new(
            Arc::new(SqliteUserRepository::new(pool.clone())),
            Arc::new(SqliteNovelRepository::new(pool.clone())),
            Arc::new(SqliteChapterRepository::new(pool.clone())),
            Arc::new(SqliteGenerationTaskRepository::new(pool)),
            generator,
            Arc::new(StaticTokenIdentityProvider::new(tokens)),
            Arc::new(EventPublisher::new()),
            Duration::from_secs(5),
        );

        create_routes().with_state(Arc::new(state))
    }

    fn fake_generator() -> Arc<FakeContentGenerator> {
        Arc::new(FakeContentGenerator::new(FakeContentGeneratorConfig {
            default_text: "夜色如墨，少年提剑出门。".to_string(),
            latency: Duration::ZERO,
        }))
    }

    async fn call(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Value) -> Value {
        let mut builder = Request::builder().method(method.clone()).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = if method == Method::GET {
            builder.body(Body::empty()).unwrap()
        } else {
            builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap()
        };

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create_novel(app: &Router, token: &str) -> String {
        let resp = call(
            app,
            Method::POST,
            "/api/novel/create",
            Some(token),
            json!({ "title": "剑影", "genre": "martial-arts", "style": "classical" }),
        )
        .await;
        assert_eq!(resp["errno"], 0, "{resp}");
        resp["data"]["id"].as_str().unwrap().to_string()
    }

    async fn create_chapter(app: &Router, token: &str, novel_id: &str, summary: Option<&str>) -> Value {
        let resp = call(
            app,
            Method::POST,
            "/api/chapter/create",
            Some(token),
            json!({ "novel_id": novel_id, "title": "第一章", "summary": summary }),
        )
        .await;
        assert_eq!(resp["errno"], 0, "{resp}");
        resp["data"].clone()
    }

    #[tokio::test]
    async fn test_ping_requires_no_auth() {
        let app = test_app(fake_generator()).await;
        let resp = call(&app, Method::GET, "/api/ping", None, Value::Null).await;
        assert_eq!(resp["status"], "ok");
    }

    #[tokio::test]
    async fn test_missing_or_unknown_token_is_unauthorized() {
        let app = test_app(fake_generator()).await;

        let resp = call(&app, Method::GET, "/api/novel/list", None, Value::Null).await;
        assert_eq!(resp["errno"], 401);

        let resp = call(&app, Method::GET, "/api/novel/list", Some("nope"), Value::Null).await;
        assert_eq!(resp["errno"], 401);
    }

    #[tokio::test]
    async fn test_novels_are_scoped_to_caller() {
        let app = test_app(fake_generator()).await;
        let novel_id = create_novel(&app, ALICE).await;

        let resp = call(&app, Method::GET, "/api/novel/list", Some(BOB), Value::Null).await;
        assert_eq!(resp["data"].as_array().unwrap().len(), 0);

        let resp = call(&app, Method::POST, "/api/novel/get", Some(BOB), json!({ "id": novel_id })).await;
        assert_eq!(resp["errno"], 404);

        let resp = call(&app, Method::POST, "/api/novel/get", Some(ALICE), json!({ "id": novel_id })).await;
        assert_eq!(resp["errno"], 0);
        assert_eq!(resp["data"]["genre"], "martial-arts");
        assert_eq!(resp["data"]["chapters"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_invalid_genre_is_bad_request() {
        let app = test_app(fake_generator()).await;
        let resp = call(
            &app,
            Method::POST,
            "/api/novel/create",
            Some(ALICE),
            json!({ "title": "剑影", "genre": "cooking" }),
        )
        .await;
        assert_eq!(resp["errno"], 400);
    }

    #[tokio::test]
    async fn test_update_novel_clears_description_with_null() {
        let app = test_app(fake_generator()).await;
        let novel_id = create_novel(&app, ALICE).await;

        let resp = call(
            &app,
            Method::POST,
            "/api/novel/update",
            Some(ALICE),
            json!({ "id": novel_id, "description": "江湖旧事" }),
        )
        .await;
        assert_eq!(resp["data"]["description"], "江湖旧事");

        let resp = call(
            &app,
            Method::POST,
            "/api/novel/update",
            Some(ALICE),
            json!({ "id": novel_id, "description": null, "status": "completed" }),
        )
        .await;
        assert_eq!(resp["errno"], 0, "{resp}");
        assert!(resp["data"]["description"].is_null());
        assert_eq!(resp["data"]["status"], "completed");
    }

    #[tokio::test]
    async fn test_generate_chapter_end_to_end() {
        let app = test_app(fake_generator()).await;
        let novel_id = create_novel(&app, ALICE).await;
        let chapter = create_chapter(&app, ALICE, &novel_id, Some("少年初入江湖")).await;
        assert_eq!(chapter["chapter_number"], 1);
        assert_eq!(chapter["status"], "pending");

        let chapter_id = chapter["id"].as_str().unwrap();
        let resp = call(
            &app,
            Method::POST,
            "/api/chapter/generate",
            Some(ALICE),
            json!({ "id": chapter_id }),
        )
        .await;
        assert_eq!(resp["errno"], 0, "{resp}");
        assert_eq!(resp["data"]["status"], "completed");
        assert_eq!(resp["data"]["progress"], 100);
        assert_eq!(resp["data"]["content"], "夜色如墨，少年提剑出门。");

        let resp = call(&app, Method::POST, "/api/chapter/get", Some(ALICE), json!({ "id": chapter_id })).await;
        assert_eq!(resp["data"]["novel"]["title"], "剑影");
        let tasks = resp["data"]["tasks"].as_array().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0]["status"], "completed");
        assert_eq!(tasks[0]["parameters"]["chapterNumber"], 1);
    }

    #[tokio::test]
    async fn test_generate_without_summary_is_bad_request() {
        let app = test_app(fake_generator()).await;
        let novel_id = create_novel(&app, ALICE).await;
        let chapter = create_chapter(&app, ALICE, &novel_id, None).await;

        let resp = call(
            &app,
            Method::POST,
            "/api/chapter/generate",
            Some(ALICE),
            json!({ "id": chapter["id"] }),
        )
        .await;
        assert_eq!(resp["errno"], 400);
    }

    #[tokio::test]
    async fn test_generator_failure_is_bad_gateway_with_generic_message() {
        let generator = fake_generator();
        generator.push_reply(FakeReply::Fail("quota exceeded".to_string()));
        let app = test_app(generator).await;
        let novel_id = create_novel(&app, ALICE).await;
        let chapter = create_chapter(&app, ALICE, &novel_id, Some("决战")).await;

        let resp = call(
            &app,
            Method::POST,
            "/api/chapter/generate",
            Some(ALICE),
            json!({ "id": chapter["id"] }),
        )
        .await;
        assert_eq!(resp["errno"], 502);
        assert!(!resp["error"].as_str().unwrap().contains("quota"));

        let resp = call(&app, Method::POST, "/api/chapter/get", Some(ALICE), json!({ "id": chapter["id"] })).await;
        assert_eq!(resp["data"]["status"], "error");
        assert_eq!(resp["data"]["progress"], 0);
    }

    #[tokio::test]
    async fn test_chapter_update_and_polish() {
        let app = test_app(fake_generator()).await;
        let novel_id = create_novel(&app, ALICE).await;
        let chapter = create_chapter(&app, ALICE, &novel_id, Some("雨夜")).await;
        let chapter_id = chapter["id"].as_str().unwrap();

        let resp = call(
            &app,
            Method::POST,
            "/api/chapter/polish",
            Some(ALICE),
            json!({ "id": chapter_id }),
        )
        .await;
        assert_eq!(resp["errno"], 400);

        let resp = call(
            &app,
            Method::POST,
            "/api/chapter/update",
            Some(ALICE),
            json!({ "id": chapter_id, "content": "雨打芭蕉。", "status": "completed" }),
        )
        .await;
        assert_eq!(resp["errno"], 0, "{resp}");
        assert_eq!(resp["data"]["progress"], 100);

        let resp = call(
            &app,
            Method::POST,
            "/api/chapter/update",
            Some(ALICE),
            json!({ "id": chapter_id, "status": "generating" }),
        )
        .await;
        assert_eq!(resp["errno"], 400);

        let resp = call(
            &app,
            Method::POST,
            "/api/chapter/polish",
            Some(ALICE),
            json!({ "id": chapter_id }),
        )
        .await;
        assert_eq!(resp["errno"], 0, "{resp}");
        assert_eq!(resp["data"]["polished"], true);
        assert_eq!(resp["data"]["chapter_id"], chapter_id);
    }

    #[tokio::test]
    async fn test_delete_novel_cascades_to_chapters() {
        let app = test_app(fake_generator()).await;
        let novel_id = create_novel(&app, ALICE).await;
        let chapter = create_chapter(&app, ALICE, &novel_id, Some("开篇")).await;

        let resp = call(&app, Method::POST, "/api/novel/delete", Some(ALICE), json!({ "id": novel_id })).await;
        assert_eq!(resp["data"]["id"], novel_id.as_str());

        let resp = call(&app, Method::POST, "/api/chapter/get", Some(ALICE), json!({ "id": chapter["id"] })).await;
        assert_eq!(resp["errno"], 404);
    }

    #[tokio::test]
    async fn test_delete_chapter_returns_id() {
        let app = test_app(fake_generator()).await;
        let novel_id = create_novel(&app, ALICE).await;
        let first = create_chapter(&app, ALICE, &novel_id, None).await;
        create_chapter(&app, ALICE, &novel_id, None).await;

        let resp = call(&app, Method::POST, "/api/chapter/delete", Some(ALICE), json!({ "id": first["id"] })).await;
        assert_eq!(resp["data"]["id"], first["id"]);

        let third = create_chapter(&app, ALICE, &novel_id, None).await;
        assert_eq!(third["chapter_number"], 3);
    }
}
